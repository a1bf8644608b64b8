//! Dashboard controller - selection, polling loop, reset and save

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::api::{AthleteInfo, Backend, SaveReceipt};
use crate::dashboard::Dashboard;
use crate::exercises::ExerciseKind;
use crate::metrics::Metrics;

/// Default metrics poll period
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Backend outcomes delivered to the UI loop, applied in arrival order
#[derive(Debug)]
pub enum ControllerEvent {
    /// One poll result, tagged with the exercise it was fetched for
    Metrics {
        exercise: ExerciseKind,
        result: Result<Metrics>,
    },
    ResetDone {
        exercise: ExerciseKind,
        result: Result<()>,
    },
    SaveDone {
        athlete: String,
        samples: usize,
        result: Result<SaveReceipt>,
    },
}

pub struct Controller<B: Backend> {
    backend: Arc<B>,
    dashboard: Dashboard,
    poll_every: Duration,
    poller: Option<JoinHandle<()>>,
    /// Reset/save requests still waiting on the backend
    in_flight: usize,
    events_tx: mpsc::UnboundedSender<ControllerEvent>,
    events_rx: mpsc::UnboundedReceiver<ControllerEvent>,
}

impl<B: Backend> Controller<B> {
    pub fn new(backend: Arc<B>, poll_every: Duration) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            backend,
            dashboard: Dashboard::new(),
            poll_every,
            poller: None,
            in_flight: 0,
            events_tx,
            events_rx,
        }
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Switch exercises: notify the backend and restart polling
    pub fn select(&mut self, kind: ExerciseKind) {
        info!("Selected exercise: {}", kind);
        self.dashboard.select(kind);

        let backend = Arc::clone(&self.backend);
        tokio::spawn(async move {
            if let Err(e) = backend.set_exercise(kind).await {
                warn!("Exercise notification ignored: {:#}", e);
            }
        });

        self.start_polling(kind);
    }

    fn start_polling(&mut self, kind: ExerciseKind) {
        self.stop_polling();

        let backend = Arc::clone(&self.backend);
        let tx = self.events_tx.clone();
        let period = self.poll_every;

        self.poller = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let result = backend.get_metrics().await;
                if tx.send(ControllerEvent::Metrics { exercise: kind, result }).is_err() {
                    break;
                }
            }
        }));
    }

    fn stop_polling(&mut self) {
        if let Some(handle) = self.poller.take() {
            handle.abort();
        }
    }

    /// Whether a poll task is running
    pub fn is_polling(&self) -> bool {
        self.poller.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Whether a reset or save request is still outstanding
    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    /// Apply one backend outcome; returns whether it changed recorded data
    pub fn apply(&mut self, event: ControllerEvent) -> bool {
        match event {
            ControllerEvent::Metrics { exercise, result: Ok(metrics) } => {
                let applied = self.dashboard.apply_metrics(exercise, metrics, Utc::now());
                if !applied {
                    debug!("Dropped stale metrics for {}", exercise);
                }
                applied
            }
            ControllerEvent::Metrics { result: Err(e), .. } => {
                debug!("Metrics poll skipped: {:#}", e);
                false
            }
            ControllerEvent::ResetDone { exercise, result } => {
                self.in_flight = self.in_flight.saturating_sub(1);
                match result {
                    Ok(()) => {
                        self.dashboard.reset(exercise);
                        self.dashboard.set_notice(format!("{} reset", exercise.info().name));
                        info!("Reset {}", exercise);
                        true
                    }
                    Err(e) => {
                        warn!("Reset failed: {:#}", e);
                        false
                    }
                }
            }
            ControllerEvent::SaveDone { athlete, samples, result } => {
                self.in_flight = self.in_flight.saturating_sub(1);
                match result {
                    Ok(receipt) => {
                        info!("Saved session for {} ({} samples)", athlete, samples);
                        let notice = match receipt.filename {
                            Some(file) => format!("Session saved: {}", file),
                            None => "Session saved".to_string(),
                        };
                        self.dashboard.clear_session();
                        self.dashboard.set_notice(notice);
                        true
                    }
                    Err(e) => {
                        warn!("Save failed: {:#}", e);
                        false
                    }
                }
            }
        }
    }

    /// Apply every backend outcome that has arrived so far
    pub fn drain_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            if self.apply(event) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait for the next backend outcome
    pub async fn next_event(&mut self) -> Option<ControllerEvent> {
        self.events_rx.recv().await
    }

    pub fn toggle_recording(&mut self) -> bool {
        let recording = self.dashboard.toggle_recording();
        debug!("Recording indicator: {}", recording);
        recording
    }

    /// Ask the backend to reset the active exercise.
    ///
    /// Local data is cleared when the outcome is applied, after any poll
    /// results that arrived before it.
    pub fn reset(&mut self) {
        let Some(exercise) = self.dashboard.active() else {
            return;
        };
        if self.is_busy() {
            debug!("Reset ignored while a request is outstanding");
            return;
        }

        self.in_flight += 1;
        let backend = Arc::clone(&self.backend);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = backend.reset().await;
            let _ = tx.send(ControllerEvent::ResetDone { exercise, result });
        });
    }

    /// Post the session recorded so far; it is cleared once the backend accepts it
    pub fn save(&mut self, athlete: AthleteInfo) {
        if self.is_busy() {
            debug!("Save ignored while a request is outstanding");
            return;
        }

        self.in_flight += 1;
        let session = self.dashboard.history().clone();
        let backend = Arc::clone(&self.backend);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = backend.save_session(&athlete, &session).await;
            let _ = tx.send(ControllerEvent::SaveDone {
                athlete: athlete.name,
                samples: session.len(),
                result,
            });
        });
    }
}

impl<B: Backend> Drop for Controller<B> {
    fn drop(&mut self) {
        self.stop_polling();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricValue;
    use crate::session::SessionHistory;
    use std::sync::Mutex;
    use tokio::time::timeout;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        SetExercise(ExerciseKind),
        GetMetrics,
        Reset,
        Save(String, usize),
    }

    #[derive(Default)]
    struct FakeBackend {
        calls: Mutex<Vec<Call>>,
        metrics: Metrics,
        failing: bool,
        reset_delay: Duration,
    }

    impl FakeBackend {
        fn with_metrics(pairs: &[(&str, f64)]) -> Self {
            let metrics = pairs
                .iter()
                .map(|(k, v)| (k.to_string(), MetricValue::Number(*v)))
                .collect();
            Self {
                metrics,
                ..Default::default()
            }
        }

        fn failing() -> Self {
            Self {
                failing: true,
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn log(&self, call: Call) -> Result<()> {
            self.calls.lock().unwrap().push(call);
            if self.failing {
                anyhow::bail!("backend unavailable");
            }
            Ok(())
        }
    }

    impl Backend for FakeBackend {
        async fn set_exercise(&self, exercise: ExerciseKind) -> Result<()> {
            self.log(Call::SetExercise(exercise))
        }

        async fn get_metrics(&self) -> Result<Metrics> {
            self.log(Call::GetMetrics)?;
            Ok(self.metrics.clone())
        }

        async fn reset(&self) -> Result<()> {
            tokio::time::sleep(self.reset_delay).await;
            self.log(Call::Reset)
        }

        async fn save_session(&self, athlete: &AthleteInfo, session: &SessionHistory) -> Result<SaveReceipt> {
            self.log(Call::Save(athlete.name.clone(), session.len()))?;
            Ok(SaveReceipt {
                filename: Some("session_test.json".to_string()),
            })
        }
    }

    fn controller(backend: FakeBackend) -> Controller<FakeBackend> {
        Controller::new(Arc::new(backend), Duration::from_millis(10))
    }

    fn metrics_event(exercise: ExerciseKind, key: &str, value: f64) -> ControllerEvent {
        let mut metrics = Metrics::new();
        metrics.insert(key.to_string(), MetricValue::Number(value));
        ControllerEvent::Metrics { exercise, result: Ok(metrics) }
    }

    async fn poll_once(ctl: &mut Controller<FakeBackend>) -> bool {
        let event = timeout(Duration::from_secs(2), ctl.next_event())
            .await
            .expect("poll tick")
            .expect("channel open");
        ctl.apply(event)
    }

    /// Apply events in arrival order until no reset/save is outstanding
    async fn settle(ctl: &mut Controller<FakeBackend>) {
        timeout(Duration::from_secs(5), async {
            while ctl.is_busy() {
                if let Some(event) = ctl.next_event().await {
                    ctl.apply(event);
                }
            }
        })
        .await
        .expect("request finished");
    }

    #[tokio::test]
    async fn test_select_notifies_and_polls() {
        let mut ctl = controller(FakeBackend::with_metrics(&[
            ("count", 5.0),
            ("arm_angle", 90.0),
            ("body_angle", 170.0),
            ("form_score", 80.0),
        ]));
        ctl.select(ExerciseKind::PushUps);
        assert!(ctl.is_polling());

        assert!(poll_once(&mut ctl).await);

        let dash = ctl.dashboard();
        let values: Vec<_> = dash.cards().iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, vec!["5", "90", "170", "80"]);
        assert_eq!(dash.history().samples(ExerciseKind::PushUps).len(), 1);
        assert_eq!(dash.active_trend().unwrap().latest().unwrap().value, 5.0);

        tokio::task::yield_now().await;
        let calls = ctl.backend().calls();
        assert!(calls.contains(&Call::SetExercise(ExerciseKind::PushUps)));
        assert!(calls.contains(&Call::GetMetrics));
    }

    #[tokio::test]
    async fn test_reselect_keeps_single_poller() {
        let mut ctl = controller(FakeBackend::with_metrics(&[("count", 1.0)]));
        ctl.select(ExerciseKind::JumpingJacks);
        let first = ctl.poller.as_ref().unwrap().abort_handle();
        ctl.select(ExerciseKind::SitUps);
        timeout(Duration::from_secs(2), async {
            while !first.is_finished() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("previous poller stopped");
        assert!(ctl.is_polling());

        // Results still queued for jumping jacks must not land on sit-ups
        for _ in 0..3 {
            poll_once(&mut ctl).await;
        }
        assert!(ctl.dashboard().history().samples(ExerciseKind::JumpingJacks).is_empty());
        assert!(!ctl.dashboard().history().samples(ExerciseKind::SitUps).is_empty());
    }

    #[tokio::test]
    async fn test_failed_poll_records_nothing() {
        let mut ctl = controller(FakeBackend::failing());
        ctl.select(ExerciseKind::Plank);

        assert!(!poll_once(&mut ctl).await);
        assert!(ctl.dashboard().history().is_empty());
        assert_eq!(ctl.dashboard().cards()[0].value, "0");
        // Notification failure does not stop polling
        assert!(ctl.is_polling());
    }

    #[tokio::test]
    async fn test_reset_without_selection_is_noop() {
        let mut ctl = controller(FakeBackend::default());
        ctl.reset();
        assert!(!ctl.is_busy());
        tokio::task::yield_now().await;
        assert!(ctl.backend().calls().is_empty());
    }

    #[tokio::test]
    async fn test_reset_clears_active_only() {
        let mut ctl = controller(FakeBackend::with_metrics(&[("count", 2.0)]));
        ctl.select(ExerciseKind::SitUps);
        poll_once(&mut ctl).await;
        ctl.select(ExerciseKind::PushUps);
        while !poll_once(&mut ctl).await {}

        ctl.reset();
        settle(&mut ctl).await;

        let history = ctl.dashboard().history();
        assert!(history.samples(ExerciseKind::PushUps).is_empty());
        assert_eq!(history.samples(ExerciseKind::SitUps).len(), 1);
        assert!(ctl.dashboard().active_trend().unwrap().is_empty());
        assert!(ctl.backend().calls().contains(&Call::Reset));
        assert_eq!(ctl.dashboard().notice(), Some("Push-ups reset"));
    }

    #[tokio::test]
    async fn test_slow_reset_does_not_block_and_clears_queued_samples() {
        let backend = FakeBackend {
            reset_delay: Duration::from_millis(300),
            ..FakeBackend::with_metrics(&[("count", 4.0)])
        };
        let mut ctl = controller(backend);
        ctl.select(ExerciseKind::PushUps);
        poll_once(&mut ctl).await;

        let started = std::time::Instant::now();
        ctl.reset();
        assert!(started.elapsed() < Duration::from_millis(100));
        assert!(ctl.is_busy());

        // Polling keeps going while the reset request is outstanding
        tokio::time::sleep(Duration::from_millis(100)).await;
        ctl.drain_events();
        assert!(ctl.dashboard().history().samples(ExerciseKind::PushUps).len() > 1);

        // Samples queued before the reset outcome are applied first, then cleared
        let mut cleared = false;
        timeout(Duration::from_secs(5), async {
            while let Some(event) = ctl.next_event().await {
                let is_reset = matches!(event, ControllerEvent::ResetDone { .. });
                ctl.apply(event);
                if is_reset {
                    cleared = ctl.dashboard().history().is_empty()
                        && ctl.dashboard().active_trend().unwrap().is_empty();
                    break;
                }
            }
        })
        .await
        .expect("reset finished");
        assert!(cleared);
        assert!(!ctl.is_busy());
    }

    #[tokio::test]
    async fn test_failed_reset_keeps_history() {
        let mut ctl = controller(FakeBackend::failing());
        ctl.select(ExerciseKind::PushUps);
        ctl.apply(metrics_event(ExerciseKind::PushUps, "count", 1.0));

        ctl.reset();
        settle(&mut ctl).await;
        assert_eq!(ctl.dashboard().history().len(), 1);
    }

    #[tokio::test]
    async fn test_save_posts_history_and_clears() {
        let mut ctl = controller(FakeBackend::with_metrics(&[("count", 3.0)]));
        ctl.select(ExerciseKind::JumpingJacks);
        poll_once(&mut ctl).await;
        poll_once(&mut ctl).await;

        ctl.save(AthleteInfo::default());
        assert!(ctl.is_busy());
        settle(&mut ctl).await;

        assert!(ctl.dashboard().history().is_empty());
        assert!(ctl.dashboard().active_trend().unwrap().is_empty());
        assert_eq!(ctl.dashboard().notice(), Some("Session saved: session_test.json"));
        assert!(ctl.backend().calls().contains(&Call::Save("Anonymous".to_string(), 2)));
    }

    #[tokio::test]
    async fn test_failed_save_keeps_history() {
        let mut ctl = controller(FakeBackend::failing());
        ctl.select(ExerciseKind::Plank);
        ctl.apply(metrics_event(ExerciseKind::Plank, "current_hold", 8.0));

        ctl.save(AthleteInfo::default());
        settle(&mut ctl).await;
        assert_eq!(ctl.dashboard().history().len(), 1);
        assert_eq!(ctl.dashboard().notice(), None);
    }

    #[tokio::test]
    async fn test_second_request_ignored_while_busy() {
        let backend = FakeBackend {
            reset_delay: Duration::from_millis(100),
            ..Default::default()
        };
        let mut ctl = controller(backend);
        ctl.select(ExerciseKind::SitUps);
        ctl.reset();
        ctl.save(AthleteInfo::default());
        settle(&mut ctl).await;

        let calls = ctl.backend().calls();
        assert!(calls.contains(&Call::Reset));
        assert!(!calls.iter().any(|c| matches!(c, Call::Save(..))));
    }

    #[tokio::test]
    async fn test_recording_toggle_has_no_backend_calls() {
        let mut ctl = controller(FakeBackend::default());
        assert!(ctl.toggle_recording());
        assert!(ctl.dashboard().is_recording());
        assert!(!ctl.toggle_recording());
        assert!(ctl.backend().calls().is_empty());
    }
}
