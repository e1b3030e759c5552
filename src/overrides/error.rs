//! Error definitions for override resolution.

use thiserror::Error;

/// Errors raised by the codec, the override store and the config facade.
#[derive(Debug, Error)]
pub enum OverrideError {
    /// Cookie payload could not be unescaped or is not a JSON object.
    #[error("Malformed override payload: {0}")]
    MalformedPayload(String),

    /// Key is not in the overridable whitelist.
    #[error("Not allowed to override this config: {key}")]
    NotOverridable { key: String },

    /// Neither the override set nor the baseline holds the key.
    #[error("Configuration key not found: {key}")]
    KeyNotFound { key: String },

    /// Value exists but does not deserialize into the requested type.
    #[error("Configuration key {key} has an unexpected type: {source}")]
    InvalidValue {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl OverrideError {
    /// The configuration key this error refers to, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            OverrideError::MalformedPayload(_) => None,
            OverrideError::NotOverridable { key }
            | OverrideError::KeyNotFound { key }
            | OverrideError::InvalidValue { key, .. } => Some(key),
        }
    }
}
