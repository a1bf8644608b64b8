//! Backend client - request/response calls to the pose tracking server

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::exercises::ExerciseKind;
use crate::metrics::Metrics;
use crate::session::SessionHistory;

/// Athlete details attached to a saved session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AthleteInfo {
    pub name: String,
    pub age: Option<u32>,
    pub sport: Option<String>,
    pub location: Option<String>,
}

impl Default for AthleteInfo {
    fn default() -> Self {
        Self {
            name: "Anonymous".to_string(),
            age: None,
            sport: None,
            location: None,
        }
    }
}

impl AthleteInfo {
    /// Build from raw form input; blank fields become defaults
    pub fn from_form(name: &str, age: &str, sport: &str, location: &str) -> Self {
        let text = |s: &str| Some(s.trim().to_string()).filter(|s| !s.is_empty());
        Self {
            name: text(name).unwrap_or_else(|| "Anonymous".to_string()),
            age: age.trim().parse().ok(),
            sport: text(sport),
            location: text(location),
        }
    }
}

#[derive(Debug, Serialize)]
struct SetExerciseRequest {
    exercise: ExerciseKind,
}

#[derive(Debug, Deserialize)]
struct MetricsResponse {
    #[serde(default)]
    metrics: Metrics,
}

#[derive(Debug, Serialize)]
struct SaveSessionRequest<'a> {
    athlete_info: &'a AthleteInfo,
    session_data: &'a SessionHistory,
}

/// Server acknowledgement of a saved session
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaveReceipt {
    #[serde(default)]
    pub filename: Option<String>,
}

/// Calls the dashboard makes against the pose backend
pub trait Backend: Send + Sync + 'static {
    /// Tell the backend which exercise to count
    fn set_exercise(&self, exercise: ExerciseKind) -> impl Future<Output = Result<()>> + Send;

    /// Current metrics for the active exercise
    fn get_metrics(&self) -> impl Future<Output = Result<Metrics>> + Send;

    /// Reset the backend counter for the active exercise
    fn reset(&self) -> impl Future<Output = Result<()>> + Send;

    fn save_session(
        &self,
        athlete: &AthleteInfo,
        session: &SessionHistory,
    ) -> impl Future<Output = Result<SaveReceipt>> + Send;
}

/// reqwest-backed client for the HTTP API
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Backend for HttpBackend {
    async fn set_exercise(&self, exercise: ExerciseKind) -> Result<()> {
        self.client
            .post(self.url("/api/set_exercise"))
            .json(&SetExerciseRequest { exercise })
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .context("POST /api/set_exercise")?;
        Ok(())
    }

    async fn get_metrics(&self) -> Result<Metrics> {
        let response: MetricsResponse = self.client
            .get(self.url("/api/get_metrics"))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .context("GET /api/get_metrics")?
            .json()
            .await
            .context("decoding /api/get_metrics response")?;
        Ok(response.metrics)
    }

    async fn reset(&self) -> Result<()> {
        self.client
            .get(self.url("/api/reset"))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .context("GET /api/reset")?
            .json::<serde_json::Value>()
            .await
            .context("decoding /api/reset response")?;
        Ok(())
    }

    async fn save_session(&self, athlete: &AthleteInfo, session: &SessionHistory) -> Result<SaveReceipt> {
        let body = SaveSessionRequest {
            athlete_info: athlete,
            session_data: session,
        };
        let receipt = self.client
            .post(self.url("/api/save_session"))
            .json(&body)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .context("POST /api/save_session")?
            .json()
            .await
            .context("decoding /api/save_session response")?;
        Ok(receipt)
    }
}
