//! Dashboard state - everything the screen shows, with no I/O

use std::collections::BTreeMap;

use chrono::{DateTime, Local, Utc};

use crate::exercises::{ExerciseInfo, ExerciseKind};
use crate::metrics::{self, MetricCard, MetricSample, Metrics};
use crate::session::{SessionHistory, TrendSeries};

/// Controller state mirrored from backend responses
#[derive(Debug, Default)]
pub struct Dashboard {
    active: Option<ExerciseKind>,
    recording: bool,
    cards: Vec<MetricCard>,
    history: SessionHistory,
    trends: BTreeMap<ExerciseKind, TrendSeries>,
    notice: Option<String>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `kind` the only active exercise and show its default cards
    pub fn select(&mut self, kind: ExerciseKind) {
        self.active = Some(kind);
        self.notice = None;
        self.cards = metrics::render_cards(kind, &Metrics::new());
    }

    pub fn active(&self) -> Option<ExerciseKind> {
        self.active
    }

    pub fn is_active(&self, kind: ExerciseKind) -> bool {
        self.active == Some(kind)
    }

    /// Static name, description and instructions of the active exercise
    pub fn exercise_info(&self) -> Option<&'static ExerciseInfo> {
        self.active.map(|k| k.info())
    }

    /// Render a metrics response, record it, and extend the trend.
    ///
    /// Responses polled for an exercise that is no longer active are
    /// dropped; returns whether the sample was applied.
    pub fn apply_metrics(&mut self, kind: ExerciseKind, metrics: Metrics, now: DateTime<Utc>) -> bool {
        if self.active != Some(kind) {
            return false;
        }

        self.cards = metrics::render_cards(kind, &metrics);

        let value = metrics::trend_value(kind, &metrics);
        self.history.record(kind, MetricSample::new(now, metrics));

        let label = now.with_timezone(&Local).format("%H:%M:%S").to_string();
        self.trends.entry(kind).or_default().push(label, value);
        true
    }

    /// Forget one exercise's samples and chart
    pub fn reset(&mut self, kind: ExerciseKind) {
        self.history.clear(kind);
        if let Some(series) = self.trends.get_mut(&kind) {
            series.clear();
        }
    }

    /// Forget everything recorded this session
    pub fn clear_session(&mut self) {
        self.history.clear_all();
        self.trends.values_mut().for_each(TrendSeries::clear);
    }

    pub fn toggle_recording(&mut self) -> bool {
        self.recording = !self.recording;
        self.recording
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn cards(&self) -> &[MetricCard] {
        &self.cards
    }

    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    pub fn trend(&self, kind: ExerciseKind) -> Option<&TrendSeries> {
        self.trends.get(&kind)
    }

    pub fn active_trend(&self) -> Option<&TrendSeries> {
        self.active.and_then(|k| self.trend(k))
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }
}
