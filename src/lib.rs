pub mod config;
pub mod error;
pub mod module;
pub mod provider;
pub mod resource;
pub mod telemetry;

pub use config::Settings;
pub use error::{Diagnostic, ProviderError};
pub use provider::{ModtmProvider, ProviderData, ProviderModel};
