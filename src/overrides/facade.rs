//! Config facade: baseline settings seen through a request's overrides.

use std::sync::Arc;
use serde_json::Value;

use crate::config::baseline::{BaselineConfig, Settings, SharedBaseline};
use crate::overrides::error::OverrideError;
use crate::overrides::store::OverrideStore;
use crate::overrides::OverrideSet;

/// Per-request view over the shared baseline.
///
/// Reads consult the request's [`OverrideStore`] first. Writes always land
/// in the baseline; the override layer is only populated by the cookie hook
/// and the admin endpoints.
#[derive(Debug, Clone)]
pub struct ConfigFacade {
    baseline: SharedBaseline,
    store: OverrideStore,
}

impl ConfigFacade {
    pub fn new(baseline: SharedBaseline, store: OverrideStore) -> Self {
        Self { baseline, store }
    }

    /// A facade with no overrides, bound to the baseline's current whitelist.
    pub fn without_overrides(baseline: SharedBaseline) -> Self {
        let store = OverrideStore::new(baseline.load().overridable_keys());
        Self::new(baseline, store)
    }

    /// Snapshot of the underlying baseline, for anything the facade does not
    /// intercept.
    pub fn baseline(&self) -> Arc<BaselineConfig> {
        self.baseline.load()
    }

    pub fn shared_baseline(&self) -> &SharedBaseline {
        &self.baseline
    }

    pub fn store(&self) -> &OverrideStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut OverrideStore {
        &mut self.store
    }

    /// Whether `key` resolves to an override for this request.
    pub fn is_overridden(&self, key: &str) -> bool {
        self.store.is_overridden(key)
    }

    /// The request's override set, if any.
    pub fn overrides(&self) -> Option<&OverrideSet> {
        self.store.current()
    }

    /// Override one whitelisted key for the rest of this request.
    pub fn set_override(&mut self, key: &str, value: Value) -> Result<(), OverrideError> {
        self.store.set_for_write(key, value)
    }
}

impl Settings for ConfigFacade {
    fn read(&self, key: &str) -> Result<Value, OverrideError> {
        if let Some(value) = self.store.get(key) {
            return Ok(value.clone());
        }
        self.baseline.load().read(key)
    }

    fn write(&mut self, key: &str, value: Value) {
        self.baseline.update(|b| {
            b.insert(key, value.clone());
        });
    }
}
