use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const EVENT_KEY: &str = "event";
pub const RESOURCE_ID_KEY: &str = "resource_id";
pub const SOURCE_KEY: &str = "source";
pub const VERSION_KEY: &str = "version";

/// Keys the user must not set in `tags`.
pub const RESERVED_TAG_KEYS: &[&str] = &[EVENT_KEY];

pub type Tags = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleEvent {
    Create,
    Read,
    Update,
    Delete,
}

impl LifecycleEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleEvent::Create => "create",
            LifecycleEvent::Read => "read",
            LifecycleEvent::Update => "update",
            LifecycleEvent::Delete => "delete",
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One lifecycle report. On the wire it is a single flat map, reserved keys win.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryEvent {
    pub event: LifecycleEvent,
    pub resource_id: String,
    pub source: Option<String>,
    pub version: Option<String>,
    pub tags: Tags,
}

impl TelemetryEvent {
    pub fn new(event: LifecycleEvent, resource_id: impl Into<String>, tags: Tags) -> Self {
        Self {
            event,
            resource_id: resource_id.into(),
            source: None,
            version: None,
            tags,
        }
    }

    pub fn with_module(mut self, source: Option<String>, version: Option<String>) -> Self {
        self.source = source;
        self.version = version;
        self
    }

    pub fn payload(&self) -> Tags {
        let mut payload = self.tags.clone();
        if let Some(source) = &self.source {
            payload.insert(SOURCE_KEY.to_string(), source.clone());
        }
        if let Some(version) = &self.version {
            payload.insert(VERSION_KEY.to_string(), version.clone());
        }
        payload.insert(EVENT_KEY.to_string(), self.event.as_str().to_string());
        payload.insert(RESOURCE_ID_KEY.to_string(), self.resource_id.clone());
        payload
    }
}

impl Serialize for TelemetryEvent {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.payload().serialize(serializer)
    }
}
