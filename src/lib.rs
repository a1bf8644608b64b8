//! posedash - Live exercise form tracking dashboard
//!
//! Polls a pose-estimation backend for rep counts, joint angles and form
//! scores, and keeps the session's samples until they are saved.

pub mod api;
pub mod config;
pub mod controller;
pub mod dashboard;
pub mod exercises;
pub mod metrics;
pub mod session;
pub mod shortcuts;
pub mod tui;

pub use api::{Backend, HttpBackend};
pub use controller::Controller;
pub use exercises::ExerciseKind;
