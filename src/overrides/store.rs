//! Request-scoped override store.
//!
//! # Responsibilities
//! - Hold the override set of exactly one request
//! - Gate admin writes on the overridable-keys whitelist
//! - Answer whether a key currently resolves to an override
//!
//! # Design Decisions
//! - The whitelist is checked on write, never on read
//! - Cookie installs replace the set verbatim and skip the whitelist; only
//!   the reserved-key guard applies to them
//! - The reserved whitelist key never resolves to an override and is never
//!   writable, even when listed in the whitelist itself

use std::collections::BTreeSet;
use std::sync::Arc;
use serde_json::Value;

use crate::config::baseline::OVERRIDABLE_KEYS_KEY;
use crate::overrides::error::OverrideError;
use crate::overrides::OverrideSet;

/// Keys eligible for a request-scoped override.
///
/// Cheap to clone; every request holds a handle to the same snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverridableKeys(Arc<BTreeSet<String>>);

impl OverridableKeys {
    /// Build a whitelist from any iterator of key names.
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(Arc::new(keys.into_iter().map(Into::into).collect()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Override state for a single request.
#[derive(Debug, Clone, Default)]
pub struct OverrideStore {
    /// `None` until a cookie is installed or the first admin write happens.
    overrides: Option<OverrideSet>,
    allowed: OverridableKeys,
}

impl OverrideStore {
    /// Create an empty store bound to the given whitelist.
    pub fn new(allowed: OverridableKeys) -> Self {
        Self {
            overrides: None,
            allowed,
        }
    }

    /// The whitelist this store enforces on writes.
    pub fn allowed(&self) -> &OverridableKeys {
        &self.allowed
    }

    /// Whether `key` currently resolves to an overridden value.
    pub fn is_overridden(&self, key: &str) -> bool {
        if is_reserved(key) {
            return false;
        }

        self.overrides
            .as_ref()
            .map(|set| set.contains_key(key))
            .unwrap_or(false)
    }

    /// The overridden value for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&Value> {
        if !self.is_overridden(key) {
            return None;
        }

        let value = self.overrides.as_ref()?.get(key)?;
        tracing::debug!(key = %key, value = %value, "Using overridden value");
        Some(value)
    }

    /// Override one key, creating the set if needed.
    ///
    /// Fails with [`OverrideError::NotOverridable`] when the key is not
    /// whitelisted or is the reserved whitelist key.
    pub fn set_for_write(&mut self, key: &str, value: Value) -> Result<(), OverrideError> {
        if is_reserved(key) || !self.allowed.contains(key) {
            return Err(OverrideError::NotOverridable { key: key.to_string() });
        }

        self.overrides
            .get_or_insert_with(OverrideSet::new)
            .insert(key.to_string(), value);
        Ok(())
    }

    /// Replace the whole override set with a decoded cookie payload.
    ///
    /// No whitelist filtering happens here; see the module docs.
    pub fn install_from_decoded(&mut self, overrides: OverrideSet) {
        tracing::debug!(keys = ?overrides.keys().collect::<Vec<_>>(), "Registering config override");
        self.overrides = Some(overrides);
    }

    /// The current override set, or `None` if nothing was ever installed.
    pub fn current(&self) -> Option<&OverrideSet> {
        self.overrides.as_ref()
    }
}

fn is_reserved(key: &str) -> bool {
    key == OVERRIDABLE_KEYS_KEY
}
