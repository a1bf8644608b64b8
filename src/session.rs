//! Session accumulator and the rolling trend window

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::exercises::ExerciseKind;
use crate::metrics::MetricSample;

/// Points kept on the progress chart
pub const TREND_CAPACITY: usize = 20;

/// Samples recorded this session, per exercise, in arrival order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionHistory {
    exercises: BTreeMap<ExerciseKind, Vec<MetricSample>>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, kind: ExerciseKind, sample: MetricSample) {
        self.exercises.entry(kind).or_default().push(sample);
    }

    pub fn samples(&self, kind: ExerciseKind) -> &[MetricSample] {
        self.exercises.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Drop one exercise's samples, leaving the rest untouched
    pub fn clear(&mut self, kind: ExerciseKind) {
        self.exercises.remove(&kind);
    }

    pub fn clear_all(&mut self) {
        self.exercises.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.values().all(Vec::is_empty)
    }

    /// Total samples across all exercises
    pub fn len(&self) -> usize {
        self.exercises.values().map(Vec::len).sum()
    }
}

/// One plotted point: wall-clock label and value
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub label: String,
    pub value: f64,
}

/// Bounded FIFO of recent trend points
#[derive(Debug, Clone)]
pub struct TrendSeries {
    points: VecDeque<TrendPoint>,
    capacity: usize,
}

impl Default for TrendSeries {
    fn default() -> Self {
        Self::with_capacity(TREND_CAPACITY)
    }
}

impl TrendSeries {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity + 1),
            capacity: capacity.max(1),
        }
    }

    /// Append a point, evicting the oldest once over capacity
    pub fn push(&mut self, label: impl Into<String>, value: f64) {
        self.points.push_back(TrendPoint { label: label.into(), value });
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrendPoint> {
        self.points.iter()
    }

    pub fn latest(&self) -> Option<&TrendPoint> {
        self.points.back()
    }

    /// Chart data as (index, value) pairs
    pub fn chart_data(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| (i as f64, p.value))
            .collect()
    }

    pub fn max_value(&self) -> Option<f64> {
        self.points.iter().map(|p| p.value).reduce(f64::max)
    }
}
