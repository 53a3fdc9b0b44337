//! Lifecycle telemetry: event shape, tag validation, bounded delivery.
//!
//! # BEST-EFFORT INVARIANT
//! Nothing in this module may fail a lifecycle operation.
//! Delivery problems are logged and swallowed; only tag validation returns an error,
//! and it runs before anything touches the network.

pub mod delivery;
pub mod event;
pub mod validator;

pub use delivery::{DeliveryChannel, DeliveryOutcome};
pub use event::{LifecycleEvent, Tags, TelemetryEvent};
pub use validator::validate_tags;
