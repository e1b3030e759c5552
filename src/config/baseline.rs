//! Baseline configuration store.
//!
//! # Responsibilities
//! - Hold the service's ordinary key/value settings
//! - Inject defaults for the override feature's own settings
//! - Share one atomically swappable snapshot across all requests
//!
//! # Design Decisions
//! - Values are `serde_json::Value` so any TOML/JSON setting fits
//! - Writes and reloads publish a new snapshot; readers never block

use std::sync::Arc;
use arc_swap::ArcSwap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::overrides::error::OverrideError;
use crate::overrides::store::OverridableKeys;

/// Setting holding the override cookie name.
pub const COOKIE_NAME_KEY: &str = "CONFIG_OVERRIDE_COOKIE_NAME";
/// Setting holding the master switch.
pub const ENABLED_KEY: &str = "CONFIG_OVERRIDE_COOKIE_ENABLED";
/// Setting holding the overridable-keys whitelist. Never overridable itself.
pub const OVERRIDABLE_KEYS_KEY: &str = "CONFIG_OVERRIDE_EXTENDABLE_VARS";

pub const DEFAULT_COOKIE_NAME: &str = "config_override_options";

/// Typed read/write access to configuration keys.
pub trait Settings {
    /// Read the effective value of `key`.
    fn read(&self, key: &str) -> Result<Value, OverrideError>;

    /// Write `key` to the underlying baseline.
    fn write(&mut self, key: &str, value: Value);

    /// Read `key` and deserialize it into `T`.
    fn read_as<T: DeserializeOwned>(&self, key: &str) -> Result<T, OverrideError> {
        let value = self.read(key)?;
        serde_json::from_value(value).map_err(|source| OverrideError::InvalidValue {
            key: key.to_string(),
            source,
        })
    }
}

/// The service's baseline settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct BaselineConfig {
    values: Map<String, Value>,
}

impl BaselineConfig {
    pub fn new(values: Map<String, Value>) -> Self {
        Self { values }
    }

    /// Fill in the override feature's settings where the operator left them out.
    pub fn with_override_defaults(mut self) -> Self {
        self.values
            .entry(COOKIE_NAME_KEY)
            .or_insert_with(|| Value::String(DEFAULT_COOKIE_NAME.to_string()));
        self.values
            .entry(ENABLED_KEY)
            .or_insert(Value::Bool(true));
        self.values
            .entry(OVERRIDABLE_KEYS_KEY)
            .or_insert_with(|| Value::Array(Vec::new()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.values.insert(key.into(), value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Name of the override cookie.
    pub fn cookie_name(&self) -> &str {
        self.values
            .get(COOKIE_NAME_KEY)
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_COOKIE_NAME)
    }

    /// Whether the override feature is switched on.
    pub fn override_enabled(&self) -> bool {
        self.values
            .get(ENABLED_KEY)
            .and_then(Value::as_bool)
            .unwrap_or(true)
    }

    /// The whitelist of overridable keys. Non-string entries are ignored.
    pub fn overridable_keys(&self) -> OverridableKeys {
        let keys = self
            .values
            .get(OVERRIDABLE_KEYS_KEY)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect::<Vec<_>>())
            .unwrap_or_default();
        OverridableKeys::new(keys)
    }
}

impl Settings for BaselineConfig {
    fn read(&self, key: &str) -> Result<Value, OverrideError> {
        self.values
            .get(key)
            .cloned()
            .ok_or_else(|| OverrideError::KeyNotFound { key: key.to_string() })
    }

    fn write(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }
}

impl From<Map<String, Value>> for BaselineConfig {
    fn from(values: Map<String, Value>) -> Self {
        Self::new(values)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for BaselineConfig {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Process-wide handle to the current baseline snapshot.
#[derive(Debug, Clone)]
pub struct SharedBaseline(Arc<ArcSwap<BaselineConfig>>);

impl SharedBaseline {
    pub fn new(baseline: BaselineConfig) -> Self {
        Self(Arc::new(ArcSwap::from_pointee(baseline)))
    }

    /// Current snapshot.
    pub fn load(&self) -> Arc<BaselineConfig> {
        self.0.load_full()
    }

    /// Publish an entirely new baseline (used by hot reload).
    pub fn replace(&self, baseline: BaselineConfig) {
        self.0.store(Arc::new(baseline));
    }

    /// Apply `f` to a copy of the current baseline and publish the result.
    ///
    /// `f` may run more than once under contention.
    pub fn update<F>(&self, f: F)
    where
        F: Fn(&mut BaselineConfig),
    {
        self.0.rcu(|current| {
            let mut next = BaselineConfig::clone(current);
            f(&mut next);
            next
        });
    }
}

impl Default for SharedBaseline {
    fn default() -> Self {
        Self::new(BaselineConfig::default().with_override_defaults())
    }
}
