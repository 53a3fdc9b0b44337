use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use tracing::{error, trace};

use super::event::TelemetryEvent;
use crate::error::DeliveryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Empty URL, nothing sent
    Skipped,
    /// Any HTTP status counts
    Delivered(u16),
    TimedOut,
    Failed,
}

/// Best-effort, single-shot POST of one event. The caller is released after `timeout` at most.
#[derive(Debug, Clone)]
pub struct DeliveryChannel {
    client: Client,
    timeout: Duration,
}

impl DeliveryChannel {
    pub fn new(timeout: Duration) -> Self {
        // No client-level timeout: the deadline is enforced on the await, not the transport.
        Self {
            client: Client::new(),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn deliver(&self, url: &str, event: &TelemetryEvent) -> DeliveryOutcome {
        if url.is_empty() {
            return DeliveryOutcome::Skipped;
        }
        let name = event.event;

        let body = match serde_json::to_vec(event) {
            Ok(body) => body,
            Err(e) => {
                error!("error on {} telemetry resource: {}", name, DeliveryError::from(e));
                return DeliveryOutcome::Failed;
            }
        };

        trace!("sending tags to {}", url);
        let request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body);

        // Fire with deadline: on timeout the handle is dropped, the task keeps running detached.
        let handle = tokio::spawn(async move { request.send().await.map(|resp| resp.status()) });

        match tokio::time::timeout(self.timeout, handle).await {
            Ok(Ok(Ok(status))) => {
                trace!("response Status for {} telemetry resource: {}", name, status);
                DeliveryOutcome::Delivered(status.as_u16())
            }
            Ok(Ok(Err(e))) => {
                error!("error on {} telemetry resource: {}", name, DeliveryError::from(e));
                DeliveryOutcome::Failed
            }
            Ok(Err(e)) => {
                error!("error on {} telemetry resource: {}", name, DeliveryError::from(e));
                DeliveryOutcome::Failed
            }
            Err(_) => {
                error!("timeout on {} telemetry resource", name);
                DeliveryOutcome::TimedOut
            }
        }
    }
}
