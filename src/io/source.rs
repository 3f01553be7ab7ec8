//! Dataset retrieval
//!
//! `DataSource` is the seam between the analytics and wherever the venue and
//! session arrays come from. `HttpSource` fetches them with plain GETs.
//! `load_datasets` applies the run policy: a failed fetch is logged and treated
//! as absent, and an absent or empty dataset ends the run early without error.

use crate::domain::types::{UserSession, Venue};
use crate::infra::config::Config;
use crate::infra::error::{AnalysisError, Dataset};
use anyhow::{bail, Context};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

#[async_trait]
pub trait DataSource: Send + Sync {
    async fn venues(&self) -> anyhow::Result<Vec<Venue>>;
    async fn sessions(&self) -> anyhow::Result<Vec<UserSession>>;
}

/// Both datasets, guaranteed non-empty
#[derive(Debug, Clone)]
pub struct Datasets {
    pub venues: Vec<Venue>,
    pub sessions: Vec<UserSession>,
}

/// Fetches datasets from two HTTP endpoints
pub struct HttpSource {
    client: reqwest::Client,
    venues_url: String,
    sessions_url: String,
}

impl HttpSource {
    pub fn new(
        venues_url: impl Into<String>,
        sessions_url: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        // One client for both requests (connection pooling)
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, venues_url: venues_url.into(), sessions_url: sessions_url.into() })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Self::new(
            config.venues_url(),
            config.sessions_url(),
            Duration::from_millis(config.timeout_ms()),
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> anyhow::Result<Vec<T>> {
        let start = Instant::now();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {url} failed"))?;

        let status = response.status();
        if !status.is_success() {
            bail!("GET {url} returned HTTP {status}");
        }

        let body = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read response body from {url}"))?;

        let items: Vec<T> = serde_json::from_slice(&body)
            .with_context(|| format!("Failed to decode JSON array from {url}"))?;

        debug!(
            url = %url,
            bytes = %body.len(),
            items = %items.len(),
            elapsed_ms = %start.elapsed().as_millis(),
            "dataset_fetched"
        );
        Ok(items)
    }
}

#[async_trait]
impl DataSource for HttpSource {
    async fn venues(&self) -> anyhow::Result<Vec<Venue>> {
        self.get_json(&self.venues_url).await
    }

    async fn sessions(&self) -> anyhow::Result<Vec<UserSession>> {
        self.get_json(&self.sessions_url).await
    }
}

/// Turn a fetch result into an optional dataset, logging failures
fn settle<T>(dataset: Dataset, result: anyhow::Result<Vec<T>>) -> Option<Vec<T>> {
    match result {
        Ok(items) => Some(items),
        Err(source) => {
            let e = AnalysisError::FetchFailure { dataset, source };
            error!(dataset = %dataset, error = %e, "dataset_fetch_failed");
            None
        }
    }
}

/// Reject absent or empty datasets
fn require<T>(dataset: Dataset, items: Option<Vec<T>>) -> Result<Vec<T>, AnalysisError> {
    match items {
        Some(items) if !items.is_empty() => Ok(items),
        _ => Err(AnalysisError::MissingDataset { dataset }),
    }
}

/// Fetch both datasets concurrently
///
/// Returns `None` when either dataset is unavailable; the caller should stop
/// without producing a report. Sessions are checked before venues.
pub async fn load_datasets(source: &dyn DataSource) -> Option<Datasets> {
    let start = Instant::now();
    let (sessions, venues) = tokio::join!(source.sessions(), source.venues());

    let sessions = settle(Dataset::Sessions, sessions);
    let venues = settle(Dataset::Venues, venues);

    let checked = require(Dataset::Sessions, sessions)
        .and_then(|sessions| require(Dataset::Venues, venues).map(|venues| (sessions, venues)));

    match checked {
        Ok((sessions, venues)) => {
            info!(
                venues = %venues.len(),
                sessions = %sessions.len(),
                samples = %sessions.iter().map(|s| s.path.len()).sum::<usize>(),
                elapsed_ms = %start.elapsed().as_millis(),
                "datasets_loaded"
            );
            Some(Datasets { venues, sessions })
        }
        Err(AnalysisError::MissingDataset { dataset: Dataset::Sessions }) => {
            warn!("no_sessions_data_exiting");
            None
        }
        Err(e) => {
            warn!(reason = %e, "no_venues_data_exiting");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Coordinate;

    struct StaticSource {
        venues: anyhow::Result<Vec<Venue>>,
        sessions: anyhow::Result<Vec<UserSession>>,
    }

    fn clone_result<T: Clone>(r: &anyhow::Result<Vec<T>>) -> anyhow::Result<Vec<T>> {
        match r {
            Ok(items) => Ok(items.clone()),
            Err(e) => Err(anyhow::anyhow!("{e}")),
        }
    }

    #[async_trait]
    impl DataSource for StaticSource {
        async fn venues(&self) -> anyhow::Result<Vec<Venue>> {
            clone_result(&self.venues)
        }

        async fn sessions(&self) -> anyhow::Result<Vec<UserSession>> {
            clone_result(&self.sessions)
        }
    }

    fn one_venue() -> Vec<Venue> {
        vec![Venue {
            id: "1".to_string(),
            name: "Ducati".to_string(),
            position: Coordinate::new(0.0, 0.0),
        }]
    }

    fn one_session() -> Vec<UserSession> {
        vec![UserSession {
            user_id: "u1".to_string(),
            session_id: "s1".to_string(),
            start_time_utc: None,
            end_time_utc: None,
            start_time_local: None,
            path: Vec::new(),
        }]
    }

    #[tokio::test]
    async fn test_load_datasets_ok() {
        let source = StaticSource { venues: Ok(one_venue()), sessions: Ok(one_session()) };
        let datasets = load_datasets(&source).await.unwrap();
        assert_eq!(datasets.venues.len(), 1);
        assert_eq!(datasets.sessions.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_absent() {
        let source = StaticSource {
            venues: Err(anyhow::anyhow!("connection refused")),
            sessions: Ok(one_session()),
        };
        assert!(load_datasets(&source).await.is_none());

        let source = StaticSource {
            venues: Ok(one_venue()),
            sessions: Err(anyhow::anyhow!("HTTP 500")),
        };
        assert!(load_datasets(&source).await.is_none());
    }

    #[tokio::test]
    async fn test_empty_dataset_is_absent() {
        let source = StaticSource { venues: Ok(Vec::new()), sessions: Ok(one_session()) };
        assert!(load_datasets(&source).await.is_none());

        let source = StaticSource { venues: Ok(one_venue()), sessions: Ok(Vec::new()) };
        assert!(load_datasets(&source).await.is_none());
    }

    #[test]
    fn test_require_checks_emptiness() {
        assert!(require(Dataset::Venues, Some(vec![1])).is_ok());
        assert!(matches!(
            require::<u8>(Dataset::Venues, Some(Vec::new())),
            Err(AnalysisError::MissingDataset { dataset: Dataset::Venues })
        ));
        assert!(matches!(
            require::<u8>(Dataset::Sessions, None),
            Err(AnalysisError::MissingDataset { dataset: Dataset::Sessions })
        ));
    }
}
