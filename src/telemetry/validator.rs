use super::event::{Tags, RESERVED_TAG_KEYS};
use crate::error::ProviderError;

pub const RESERVED_TAGS_DESCRIPTION: &str = "`tags` could not contains key `event`.";

/// Runs before any endpoint resolution or delivery.
pub fn validate_tags(tags: &Tags) -> Result<(), ProviderError> {
    if tags.keys().any(|k| RESERVED_TAG_KEYS.contains(&k.as_str())) {
        return Err(ProviderError::ReservedTagKey {
            keys: RESERVED_TAG_KEYS.iter().map(|k| k.to_string()).collect(),
        });
    }
    Ok(())
}
