//! In-memory backend, used by tests and local fixtures.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use ab_domain::error::{Error, Result};

use crate::store::SecretStore;

#[derive(Debug, Default)]
pub struct MemorySecretStore {
    values: RwLock<HashMap<String, String>>,
    reads: AtomicUsize,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.write().insert(name.into(), value.into());
        self
    }

    pub fn set(&self, name: impl Into<String>, value: impl Into<String>) {
        self.values.write().insert(name.into(), value.into());
    }

    pub fn remove(&self, name: &str) {
        self.values.write().remove(name);
    }

    /// Number of `get` calls served so far, hits and misses alike.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn get(&self, name: &str) -> Result<String> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.values
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| Error::ConfigUnavailable(format!("{name}: no such parameter")))
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
