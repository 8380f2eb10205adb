//! Registry of configured file-store providers
//!
//! The host wires one or more providers at startup and resolves them by
//! name per request. Registration order is preserved so that the first
//! provider flagged default wins when several are.

use std::sync::Arc;

use tracing::debug;

use crate::provider::FileStore;

#[derive(Default)]
pub struct FileStoreRegistry {
    stores: Vec<Arc<dyn FileStore>>,
}

impl FileStoreRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider. A provider with the same name replaces the
    /// earlier registration in place.
    pub fn register(&mut self, store: Arc<dyn FileStore>) {
        debug!("registering file store '{}'", store.name());
        if let Some(slot) = self.stores.iter_mut().find(|s| s.name() == store.name()) {
            *slot = store;
        } else {
            self.stores.push(store);
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn FileStore>> {
        self.stores.iter().find(|s| s.name() == name).cloned()
    }

    /// The provider flagged default; first registered wins a tie.
    pub fn default_store(&self) -> Option<Arc<dyn FileStore>> {
        self.stores.iter().find(|s| s.is_default()).cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        self.stores.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}
