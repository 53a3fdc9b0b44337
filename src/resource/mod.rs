pub mod telemetry;

pub use telemetry::{TelemetryResource, TelemetryResourceModel};
