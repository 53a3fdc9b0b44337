pub mod data_source;
pub mod functions;
pub mod manifest;

pub use data_source::{ModuleSourceDataSource, ModuleSourceDataSourceModel};
pub use functions::{ModuleSourceFunction, ModuleVersionFunction};
pub use manifest::{lookup, ModuleCoordinates, ModuleManifest, ModuleManifestEntry};

use std::path::Path;

/// Any model carrying a `module_path` that wants `module_source`/`module_version` filled in.
pub trait ModuleSource {
    fn module_path(&self) -> Option<&str>;
    fn set_module_coordinates(&mut self, coordinates: ModuleCoordinates);
}

/// Fills the coordinates from the manifest. A model without a path is cleared.
pub fn with_module_source_and_version<M: ModuleSource>(mut model: M, data_dir: &Path) -> M {
    let coordinates = match model.module_path() {
        Some(path) => lookup(data_dir, path),
        None => ModuleCoordinates::default(),
    };
    model.set_module_coordinates(coordinates);
    model
}
