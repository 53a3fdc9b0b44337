use serde::{Deserialize, Serialize};
use tracing::trace;
use uuid::Uuid;

use crate::error::ProviderError;
use crate::module::{with_module_source_and_version, ModuleCoordinates, ModuleSource};
use crate::provider::ProviderData;
use crate::telemetry::{validate_tags, DeliveryOutcome, LifecycleEvent, Tags, TelemetryEvent};

pub const RESOURCE_TYPE: &str = "telemetry";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryResourceModel {
    /// Computed at create, kept from prior state afterwards
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub tags: Tags,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_version: Option<String>,
}

impl TelemetryResourceModel {
    pub fn new(tags: Tags) -> Self {
        Self {
            tags,
            ..Self::default()
        }
    }
}

impl ModuleSource for TelemetryResourceModel {
    fn module_path(&self) -> Option<&str> {
        self.module_path.as_deref()
    }

    fn set_module_coordinates(&mut self, coordinates: ModuleCoordinates) {
        self.module_source = coordinates.source;
        self.module_version = coordinates.version;
    }
}

/// `modtm_telemetry`: every lifecycle call reports one event and always succeeds
/// unless the configuration itself is invalid.
#[derive(Debug, Clone, Default)]
pub struct TelemetryResource {
    provider: Option<ProviderData>,
}

impl TelemetryResource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn type_name(provider_type_name: &str) -> String {
        format!("{}_{}", provider_type_name, RESOURCE_TYPE)
    }

    /// `None` when the host calls before the provider is configured; events are then skipped.
    pub fn configure(&mut self, provider: Option<ProviderData>) {
        self.provider = provider;
    }

    pub fn validate_config(&self, config: &TelemetryResourceModel) -> Result<(), ProviderError> {
        validate_tags(&config.tags)
    }

    pub async fn create(
        &self,
        plan: TelemetryResourceModel,
    ) -> Result<TelemetryResourceModel, ProviderError> {
        self.validate_config(&plan)?;

        let mut data = self.with_module(plan);
        let id = Uuid::new_v4().to_string();
        trace!("created telemetry resource with id {}", id);
        data.id = Some(id);

        self.send_tags(&data, LifecycleEvent::Create).await;
        Ok(data)
    }

    pub async fn read(
        &self,
        state: TelemetryResourceModel,
    ) -> Result<TelemetryResourceModel, ProviderError> {
        let id = state.id.clone().ok_or(ProviderError::MissingId)?;
        trace!("read telemetry resource with id {}", id);

        let data = self.with_module(state);
        self.send_tags(&data, LifecycleEvent::Read).await;
        Ok(data)
    }

    pub async fn update(
        &self,
        prior: &TelemetryResourceModel,
        plan: TelemetryResourceModel,
    ) -> Result<TelemetryResourceModel, ProviderError> {
        self.validate_config(&plan)?;

        let mut data = self.with_module(plan);
        // Use state for unknown: the id never changes after create.
        if data.id.is_none() {
            data.id = prior.id.clone();
        }
        let id = data.id.clone().ok_or(ProviderError::MissingId)?;
        trace!("update telemetry resource with id {}", id);

        self.send_tags(&data, LifecycleEvent::Update).await;
        Ok(data)
    }

    pub async fn delete(&self, state: TelemetryResourceModel) -> Result<(), ProviderError> {
        let id = state.id.clone().ok_or(ProviderError::MissingId)?;
        trace!("delete telemetry resource with id {}", id);

        let data = self.with_module(state);
        self.send_tags(&data, LifecycleEvent::Delete).await;
        Ok(())
    }

    /// Passthrough: the import id becomes the resource id, tags arrive on the next plan.
    pub fn import_state(&self, id: &str) -> Result<TelemetryResourceModel, ProviderError> {
        if id.trim().is_empty() {
            return Err(ProviderError::InvalidImportId(id.to_string()));
        }
        Ok(TelemetryResourceModel {
            id: Some(id.to_string()),
            ..TelemetryResourceModel::default()
        })
    }

    fn with_module(&self, data: TelemetryResourceModel) -> TelemetryResourceModel {
        match (&self.provider, data.module_path.is_some()) {
            (Some(provider), true) => {
                with_module_source_and_version(data, &provider.settings().data_dir)
            }
            _ => data,
        }
    }

    async fn send_tags(&self, data: &TelemetryResourceModel, event: LifecycleEvent) {
        let Some(provider) = &self.provider else {
            return;
        };
        if !provider.enabled() {
            return;
        }

        let endpoint = provider.resolver().resolve(data.endpoint.as_deref()).await;
        if !endpoint.enabled {
            trace!("no telemetry endpoint available, {} event dropped", event);
            return;
        }

        trace!("sending {} event, endpoint from {:?}", event, endpoint.source);
        let resource_id = data.id.clone().unwrap_or_default();
        let payload = TelemetryEvent::new(event, resource_id, data.tags.clone())
            .with_module(data.module_source.clone(), data.module_version.clone());

        if provider.delivery().deliver(&endpoint.url, &payload).await == DeliveryOutcome::Skipped {
            trace!("empty telemetry endpoint, {} event dropped", event);
        }
    }
}
