use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::trace;

use super::{with_module_source_and_version, ModuleCoordinates, ModuleSource};
use crate::provider::ProviderData;

pub const DATA_SOURCE_TYPE: &str = "module_source";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSourceDataSourceModel {
    pub module_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_version: Option<String>,
}

impl ModuleSourceDataSourceModel {
    pub fn new(module_path: impl Into<String>) -> Self {
        Self {
            module_path: module_path.into(),
            ..Self::default()
        }
    }
}

impl ModuleSource for ModuleSourceDataSourceModel {
    fn module_path(&self) -> Option<&str> {
        Some(&self.module_path)
    }

    fn set_module_coordinates(&mut self, coordinates: ModuleCoordinates) {
        self.module_source = coordinates.source;
        self.module_version = coordinates.version;
    }
}

/// `modtm_module_source`: reads the module's source and version during plan.
#[derive(Debug, Clone)]
pub struct ModuleSourceDataSource {
    data_dir: PathBuf,
}

impl ModuleSourceDataSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into() }
    }

    pub fn configure(data: &ProviderData) -> Self {
        Self::new(data.settings().data_dir.clone())
    }

    pub fn type_name(provider_type_name: &str) -> String {
        format!("{}_{}", provider_type_name, DATA_SOURCE_TYPE)
    }

    pub fn read(&self, config: ModuleSourceDataSourceModel) -> ModuleSourceDataSourceModel {
        let data = with_module_source_and_version(config, &self.data_dir);
        trace!(
            "read module source for path {}, source: {:?}, version: {:?}",
            data.module_path,
            data.module_source,
            data.module_version
        );
        data
    }
}
