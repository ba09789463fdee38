use std::sync::{Arc, RwLock};

use crate::Configuration;

/// Holds the current [`Configuration`] snapshot and lets a background refresher swap it while
/// evaluations run on other threads.
///
/// Readers clone an `Arc`, so swapping in a new configuration never affects evaluations that
/// already hold the old one.
#[derive(Default)]
pub struct ConfigurationStore {
    configuration: RwLock<Option<Arc<Configuration>>>,
}

impl ConfigurationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the current configuration snapshot, if any was set.
    pub fn get_configuration(&self) -> Option<Arc<Configuration>> {
        // A poisoned lock reads as "no configuration", so callers fall back to unknown features.
        self.configuration.read().ok()?.clone()
    }

    /// Set new configuration, returning the previous one.
    pub fn set_configuration(&self, configuration: Configuration) -> Option<Arc<Configuration>> {
        // Allocate outside of the critical section.
        let snapshot = Arc::new(configuration);
        self.configuration.write().ok()?.replace(snapshot)
    }
}
