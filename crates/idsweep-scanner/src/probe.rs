//! Network probes.
//!
//! A [`Prober`] turns one ID into one [`ProbeOutcome`]. The production
//! implementation is [`HttpProber`]; tests substitute their own.

use crate::error::{Result, ScanError};
use crate::parser::classify_body;
use async_trait::async_trait;
use idsweep_core::{ScanningConfig, TargetConfig};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Result of a completed probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// HTTP 200; `matched` tells whether the body carried the marker.
    Success {
        /// Body contained the marker
        matched: bool,
        /// Extracted title, present only for matches
        title: Option<String>,
    },
    /// Timeout, connection failure or any other request-level error
    TransientFailure,
    /// Any status other than 200
    NonOkStatus(u16),
}

impl ProbeOutcome {
    /// Feedback for the rate controller, if this outcome carries any.
    ///
    /// A body without the marker says nothing about network health.
    #[must_use]
    pub fn rate_signal(&self) -> Option<bool> {
        match self {
            Self::Success { matched: true, .. } => Some(true),
            Self::Success { matched: false, .. } => None,
            Self::TransientFailure | Self::NonOkStatus(_) => Some(false),
        }
    }
}

/// Probes a single ID.
///
/// An `Err` drops the job without touching any counter.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Probe `id` once. No retries.
    async fn probe(&self, id: u64) -> Result<ProbeOutcome>;
}

/// Probes IDs with an HTTP GET.
pub struct HttpProber {
    client: Client,
    target: TargetConfig,
}

impl HttpProber {
    /// Create a prober with the configured timeout and user agent.
    pub fn new(scanning: &ScanningConfig, target: TargetConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(scanning.request_timeout_secs))
            .user_agent(scanning.user_agent.clone())
            .build()
            .map_err(ScanError::ClientBuild)?;

        Ok(Self { client, target })
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, id: u64) -> Result<ProbeOutcome> {
        let request = self
            .client
            .get(self.target.probe_url(id))
            .build()
            .map_err(|e| ScanError::InvalidRequest {
                id,
                reason: e.to_string(),
            })?;

        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("Probe for {} failed: {}", id, e);
                return Ok(ProbeOutcome::TransientFailure);
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            return Ok(ProbeOutcome::NonOkStatus(status.as_u16()));
        }

        let body = response.text().await.map_err(|e| ScanError::BodyRead {
            id,
            reason: e.to_string(),
        })?;

        Ok(classify_body(
            &body,
            &self.target.marker,
            &self.target.untitled_placeholder,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_signal() {
        let hit = ProbeOutcome::Success {
            matched: true,
            title: Some("x".to_string()),
        };
        let miss = ProbeOutcome::Success {
            matched: false,
            title: None,
        };
        assert_eq!(hit.rate_signal(), Some(true));
        assert_eq!(miss.rate_signal(), None);
        assert_eq!(ProbeOutcome::TransientFailure.rate_signal(), Some(false));
        assert_eq!(ProbeOutcome::NonOkStatus(429).rate_signal(), Some(false));
    }

    #[tokio::test]
    async fn test_malformed_url_is_invalid_request() {
        let target = TargetConfig {
            probe_url_template: "not a url/{id}".to_string(),
            ..TargetConfig::default()
        };
        let prober = HttpProber::new(&ScanningConfig::default(), target).expect("build prober");

        let result = prober.probe(1).await;
        assert!(matches!(result, Err(ScanError::InvalidRequest { id: 1, .. })));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transient() {
        // Bind then drop to get a port nothing listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().expect("local addr").port();
        drop(listener);

        let target = TargetConfig {
            probe_url_template: format!("http://127.0.0.1:{port}/video/{{id}}"),
            ..TargetConfig::default()
        };
        let prober = HttpProber::new(&ScanningConfig::default(), target).expect("build prober");

        let outcome = prober.probe(5).await.expect("probe completes");
        assert_eq!(outcome, ProbeOutcome::TransientFailure);
    }
}
