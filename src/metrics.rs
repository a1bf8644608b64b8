//! Metric samples and card rendering

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::exercises::ExerciseKind;

/// A single value reported by the pose backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Flag(bool),
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl MetricValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Number(n) => Some(*n),
            MetricValue::Flag(b) => Some(if *b { 1.0 } else { 0.0 }),
            MetricValue::Text(s) => s.trim().parse().ok(),
            MetricValue::Other(_) => None,
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Flag(true) => f.write_str("Yes"),
            MetricValue::Flag(false) => f.write_str("No"),
            // Counters and angles arrive as integers; keep them free of ".0"
            MetricValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            MetricValue::Number(n) => write!(f, "{:.1}", n),
            MetricValue::Text(s) => f.write_str(s),
            MetricValue::Other(v) => write!(f, "{}", v),
        }
    }
}

/// Named metrics as returned by `/api/get_metrics`
pub type Metrics = BTreeMap<String, MetricValue>;

/// One timestamped reading of the backend metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub timestamp: DateTime<Utc>,
    pub metrics: Metrics,
}

impl MetricSample {
    pub fn new(timestamp: DateTime<Utc>, metrics: Metrics) -> Self {
        Self { timestamp, metrics }
    }
}

/// Rendered card, ready for display
#[derive(Debug, Clone, PartialEq)]
pub struct MetricCard {
    pub label: &'static str,
    pub value: String,
    pub unit: &'static str,
}

impl MetricCard {
    /// Value with its unit suffix, e.g. "90°"
    pub fn display(&self) -> String {
        format!("{}{}", self.value, self.unit)
    }
}

/// Map metrics onto the exercise's card layout, filling gaps with defaults
pub fn render_cards(kind: ExerciseKind, metrics: &Metrics) -> Vec<MetricCard> {
    kind.schema()
        .iter()
        .map(|field| MetricCard {
            label: field.label,
            value: metrics
                .get(field.key)
                .map(|v| v.to_string())
                .unwrap_or_else(|| field.fallback.text().to_string()),
            unit: field.unit,
        })
        .collect()
}

/// Scalar plotted on the trend chart; missing or non-numeric reads as 0
pub fn trend_value(kind: ExerciseKind, metrics: &Metrics) -> f64 {
    metrics
        .get(kind.trend_key())
        .and_then(MetricValue::as_f64)
        .unwrap_or(0.0)
}
