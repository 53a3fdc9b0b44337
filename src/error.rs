use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::telemetry::validator::RESERVED_TAGS_DESCRIPTION;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// What the host shows the user. Mirrors Terraform's diagnostic shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
}

impl Diagnostic {
    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: detail.into(),
        }
    }
}

/// Hard errors. Only these ever block a lifecycle operation.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("`tags` must not contains keys {keys:?}.")]
    ReservedTagKey { keys: Vec<String> },

    #[error("invalid import id: {0:?}")]
    InvalidImportId(String),

    #[error("missing resource id in prior state")]
    MissingId,
}

impl ProviderError {
    pub fn diagnostic(&self) -> Diagnostic {
        match self {
            ProviderError::ReservedTagKey { .. } => {
                Diagnostic::error(self.to_string(), RESERVED_TAGS_DESCRIPTION)
            }
            ProviderError::InvalidImportId(_) | ProviderError::MissingId => {
                Diagnostic::error(self.to_string(), "")
            }
        }
    }
}

/// Why a single delivery attempt did not reach the endpoint. Logged, never surfaced.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("error on marshal telemetry payload: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("delivery task aborted: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Failure of the remote default-endpoint fetch. Degrades to "disabled".
#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("default endpoint document returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("default endpoint document is empty")]
    Empty,

    #[error("timeout on reading default endpoint")]
    Timeout,

    #[error("default endpoint task aborted: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Failure to read the module manifest. Degrades to "metadata unavailable".
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("malformed modules.json: {0}")]
    Parse(#[from] serde_json::Error),
}
