use std::path::PathBuf;
use std::time::Duration;

pub const ENDPOINT_ENV: &str = "MODTM_ENDPOINT";
pub const DATA_DIR_ENV: &str = "TF_DATA_DIR";
pub const DEFAULT_DATA_DIR: &str = ".terraform";
pub const DEFAULT_ENDPOINT_URL: &str = "https://avmtftelemetrysvc.blob.core.windows.net/blob/endpoint";

/// HARD ceiling for any telemetry network call (delivery and default-endpoint fetch).
pub const DELIVERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Process-level inputs the provider reads once, at configure time.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Where the plain-text default endpoint document lives
    pub default_endpoint_url: String,
    /// Value of `MODTM_ENDPOINT`, empty counts as unset
    pub env_endpoint: Option<String>,
    pub delivery_timeout: Duration,
    pub fetch_timeout: Duration,
    pub data_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_endpoint_url: DEFAULT_ENDPOINT_URL.to_string(),
            env_endpoint: None,
            delivery_timeout: DELIVERY_TIMEOUT,
            fetch_timeout: DELIVERY_TIMEOUT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        let env_endpoint = std::env::var(ENDPOINT_ENV).ok().filter(|v| !v.is_empty());
        let data_dir = std::env::var(DATA_DIR_ENV)
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        Self {
            env_endpoint,
            data_dir,
            ..Self::default()
        }
    }

    pub fn with_default_endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.default_endpoint_url = url.into();
        self
    }

    pub fn with_env_endpoint(mut self, endpoint: Option<String>) -> Self {
        self.env_endpoint = endpoint.filter(|v| !v.is_empty());
        self
    }

    pub fn with_delivery_timeout(mut self, timeout: Duration) -> Self {
        self.delivery_timeout = timeout;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// `${TF_DATA_DIR:-.terraform}/modules/modules.json`
    pub fn manifest_path(&self) -> PathBuf {
        crate::module::manifest::manifest_path(&self.data_dir)
    }
}
