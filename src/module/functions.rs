use std::path::PathBuf;

use super::lookup;

/// `provider::modtm::module_source(path.module)`. Empty string when unknown.
#[derive(Debug, Clone)]
pub struct ModuleSourceFunction {
    data_dir: PathBuf,
}

impl ModuleSourceFunction {
    pub const NAME: &'static str = "module_source";

    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into() }
    }

    pub fn run(&self, module_path: &str) -> String {
        lookup(&self.data_dir, module_path).source.unwrap_or_default()
    }
}

/// `provider::modtm::module_version(path.module)`. Empty string when unknown or local.
#[derive(Debug, Clone)]
pub struct ModuleVersionFunction {
    data_dir: PathBuf,
}

impl ModuleVersionFunction {
    pub const NAME: &'static str = "module_version";

    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into() }
    }

    pub fn run(&self, module_path: &str) -> String {
        lookup(&self.data_dir, module_path).version.unwrap_or_default()
    }
}
