//! Document (de)serialization. Pure, no I/O.

use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Decode a persisted document, recovering a missing or corrupt blob as the
/// collection's empty value. Writes only ever start from a value produced
/// here, so previously-valid data is never silently dropped by a write.
pub fn decode_or_default<T: Default + DeserializeOwned>(key: &str, blob: Option<&str>) -> T {
    match blob {
        None => T::default(),
        Some(raw) => match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("document {key} failed to decode, treating as empty: {e}");
                T::default()
            }
        },
    }
}

pub fn encode<T: Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string(value)?)
}
