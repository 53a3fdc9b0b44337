use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::ManifestError;

/// One record of Terraform's `modules.json`. Field names follow Terraform's casing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleManifestEntry {
    #[serde(rename = "Key", default)]
    pub key: String,
    #[serde(rename = "Source", default)]
    pub source: String,
    /// Missing for local (path) modules
    #[serde(rename = "Version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(rename = "Dir", default)]
    pub dir: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleManifest {
    #[serde(rename = "Modules", default)]
    pub modules: Vec<ModuleManifestEntry>,
}

/// Resolved `source`/`version` of a module. `None` means Terraform has not recorded it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleCoordinates {
    pub source: Option<String>,
    pub version: Option<String>,
}

impl ModuleCoordinates {
    pub fn is_known(&self) -> bool {
        self.source.is_some()
    }
}

impl From<&ModuleManifestEntry> for ModuleCoordinates {
    fn from(entry: &ModuleManifestEntry) -> Self {
        Self {
            source: Some(entry.source.clone()),
            version: Some(entry.version.clone().unwrap_or_default()),
        }
    }
}

impl ModuleManifest {
    pub fn parse(content: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Exact `Dir` match first, then the key derived from the path under `<data_dir>/modules/`.
    pub fn find(&self, module_path: &str, data_dir: &Path) -> Option<&ModuleManifestEntry> {
        let wanted = normalize(module_path);

        if let Some(entry) = self.modules.iter().find(|m| normalize(&m.dir) == wanted) {
            return Some(entry);
        }

        let key = derive_key(&wanted, data_dir)?;
        self.modules.iter().find(|m| m.key == key)
    }
}

/// Reads the manifest fresh on every call. Any failure degrades to absent coordinates.
pub fn lookup(data_dir: &Path, module_path: &str) -> ModuleCoordinates {
    let path = manifest_path(data_dir);

    let manifest = match ModuleManifest::load(&path) {
        Ok(manifest) => manifest,
        Err(ManifestError::Io(e)) => {
            debug!("module manifest {} not readable: {}", path.display(), e);
            return ModuleCoordinates::default();
        }
        Err(e) => {
            warn!("module manifest {} ignored: {}", path.display(), e);
            return ModuleCoordinates::default();
        }
    };

    match manifest.find(module_path, data_dir) {
        Some(entry) => ModuleCoordinates::from(entry),
        None => {
            debug!("no manifest entry for module path {}", module_path);
            ModuleCoordinates::default()
        }
    }
}

pub fn manifest_path(data_dir: &Path) -> PathBuf {
    data_dir.join("modules").join("modules.json")
}

fn normalize(path: &str) -> String {
    let mut p = path.replace('\\', "/");
    while let Some(rest) = p.strip_prefix("./") {
        p = rest.to_string();
    }
    while p.len() > 1 && p.ends_with('/') {
        p.pop();
    }
    p
}

fn derive_key(module_path: &str, data_dir: &Path) -> Option<String> {
    let root = format!("{}/", normalize(&data_dir.join("modules").to_string_lossy()));
    let rest = module_path.strip_prefix(&root)?;
    rest.split('/').next().filter(|s| !s.is_empty()).map(str::to_string)
}
