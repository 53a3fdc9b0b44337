pub mod endpoint;

pub use endpoint::{EndpointConfig, EndpointResolver, EndpointSource};

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::config::Settings;
use crate::module::{ModuleSourceDataSource, ModuleSourceFunction, ModuleVersionFunction};
use crate::resource::TelemetryResource;
use crate::telemetry::DeliveryChannel;

pub const PROVIDER_TYPE_NAME: &str = "modtm";

/// The `provider "modtm" {}` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderModel {
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Defaults to `true`
    #[serde(default)]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderMetadata {
    pub type_name: String,
    pub version: String,
}

#[derive(Debug)]
struct ProviderContext {
    settings: Settings,
    resolver: EndpointResolver,
    delivery: DeliveryChannel,
}

/// Shared by every resource and data source configured from one provider instance.
/// The endpoint memo lives here, so cloning never re-resolves.
#[derive(Debug, Clone)]
pub struct ProviderData {
    inner: Arc<ProviderContext>,
}

impl ProviderData {
    pub fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    pub fn resolver(&self) -> &EndpointResolver {
        &self.inner.resolver
    }

    pub fn delivery(&self) -> &DeliveryChannel {
        &self.inner.delivery
    }

    pub fn enabled(&self) -> bool {
        self.inner.resolver.enabled()
    }
}

#[derive(Debug, Clone)]
pub struct ModtmProvider {
    /// Release version, "dev" for local builds, "test" under tests
    version: String,
    settings: Option<Settings>,
}

impl ModtmProvider {
    /// Environment is read at configure time.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            settings: None,
        }
    }

    pub fn with_settings(version: impl Into<String>, settings: Settings) -> Self {
        Self {
            version: version.into(),
            settings: Some(settings),
        }
    }

    pub fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            type_name: PROVIDER_TYPE_NAME.to_string(),
            version: self.version.clone(),
        }
    }

    fn settings(&self) -> Settings {
        self.settings.clone().unwrap_or_else(Settings::from_env)
    }

    /// Never fails and never touches the network: the remote default is fetched lazily.
    pub fn configure(&self, config: ProviderModel) -> ProviderData {
        let settings = self.settings();
        let enabled = config.enabled.unwrap_or(true);
        debug!(
            "configuring {} provider, enabled: {}, explicit endpoint: {}",
            PROVIDER_TYPE_NAME,
            enabled,
            config.endpoint.is_some()
        );

        let resolver = EndpointResolver::new(config.endpoint, enabled, &settings);
        let delivery = DeliveryChannel::new(settings.delivery_timeout);

        ProviderData {
            inner: Arc::new(ProviderContext {
                settings,
                resolver,
                delivery,
            }),
        }
    }

    pub fn resources(&self) -> Vec<String> {
        vec![TelemetryResource::type_name(PROVIDER_TYPE_NAME)]
    }

    pub fn data_sources(&self) -> Vec<String> {
        vec![ModuleSourceDataSource::type_name(PROVIDER_TYPE_NAME)]
    }

    pub fn functions(&self) -> Vec<&'static str> {
        vec![ModuleSourceFunction::NAME, ModuleVersionFunction::NAME]
    }

    /// Functions run without a configured provider, so they only see process settings.
    pub fn module_source_function(&self) -> ModuleSourceFunction {
        ModuleSourceFunction::new(self.settings().data_dir)
    }

    pub fn module_version_function(&self) -> ModuleVersionFunction {
        ModuleVersionFunction::new(self.settings().data_dir)
    }
}
