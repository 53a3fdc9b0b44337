use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::config::Settings;
use crate::error::EndpointError;

/// Which tier supplied the URL. Diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointSource {
    Resource,
    Provider,
    Environment,
    RemoteDefault,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    pub url: String,
    pub enabled: bool,
    pub source: Option<EndpointSource>,
}

impl EndpointConfig {
    pub fn disabled() -> Self {
        Self {
            url: String::new(),
            enabled: false,
            source: None,
        }
    }

    fn resolved(url: &str, source: EndpointSource) -> Self {
        Self {
            url: url.to_string(),
            enabled: true,
            source: Some(source),
        }
    }
}

/// What the provider block and environment decided at configure time.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ProviderTier {
    Explicit { url: String, source: EndpointSource },
    /// Neither provider block nor env set: resource override, else remote document
    Default,
}

/// Resolves the destination once per provider instance.
///
/// Precedence, highest first, each tier short-circuiting the rest:
/// provider block, `MODTM_ENDPOINT`, resource `endpoint`, remote default document.
/// The resource tier only applies when the provider would otherwise fall through to the
/// remote default. The remote fetch runs at most once; concurrent first callers wait on it.
#[derive(Debug)]
pub struct EndpointResolver {
    enabled: bool,
    tier: ProviderTier,
    default_url: String,
    fetch_timeout: Duration,
    client: Client,
    remote: OnceCell<Option<String>>,
}

impl EndpointResolver {
    pub fn new(provider_endpoint: Option<String>, enabled: bool, settings: &Settings) -> Self {
        let tier = match (provider_endpoint, settings.env_endpoint.clone()) {
            (Some(url), _) => ProviderTier::Explicit { url, source: EndpointSource::Provider },
            (None, Some(url)) => ProviderTier::Explicit { url, source: EndpointSource::Environment },
            (None, None) => ProviderTier::Default,
        };

        Self {
            enabled,
            tier,
            default_url: settings.default_endpoint_url.clone(),
            fetch_timeout: settings.fetch_timeout,
            client: Client::new(),
            remote: OnceCell::new(),
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub async fn resolve(&self, resource_endpoint: Option<&str>) -> EndpointConfig {
        if !self.enabled {
            return EndpointConfig::disabled();
        }

        match &self.tier {
            ProviderTier::Explicit { url, source } => {
                if resource_endpoint.is_some() {
                    debug!("resource endpoint ignored, provider endpoint comes from {:?}", source);
                }
                EndpointConfig::resolved(url, *source)
            }
            ProviderTier::Default => {
                if let Some(url) = resource_endpoint {
                    return EndpointConfig::resolved(url, EndpointSource::Resource);
                }
                match self.remote.get_or_init(|| self.fetch_default()).await {
                    Some(url) => EndpointConfig::resolved(url, EndpointSource::RemoteDefault),
                    None => EndpointConfig::disabled(),
                }
            }
        }
    }

    async fn fetch_default(&self) -> Option<String> {
        match fetch_endpoint_document(&self.client, &self.default_url, self.fetch_timeout).await {
            Ok(url) => {
                debug!("default endpoint resolved to {}", url);
                Some(url)
            }
            Err(e) => {
                debug!("default endpoint unavailable, telemetry disabled: {}", e);
                None
            }
        }
    }
}

/// GET a plain-text document holding a bare URL, bounded by `timeout`.
pub async fn fetch_endpoint_document(
    client: &Client,
    url: &str,
    timeout: Duration,
) -> Result<String, EndpointError> {
    let client = client.clone();
    let url = url.to_string();

    let handle = tokio::spawn(async move {
        let response = client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(EndpointError::Status(response.status()));
        }
        let body = response.text().await?;
        let endpoint = body.trim();
        if endpoint.is_empty() {
            return Err(EndpointError::Empty);
        }
        Ok::<_, EndpointError>(endpoint.to_string())
    });

    match tokio::time::timeout(timeout, handle).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => Err(EndpointError::Join(e)),
        Err(_) => Err(EndpointError::Timeout),
    }
}
