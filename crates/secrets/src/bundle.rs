//! The per-request secret bundle.

use std::fmt;
use std::time::Instant;

use ab_domain::config::SecretsConfig;
use ab_domain::error::Result;
use ab_domain::trace::TraceEvent;

use crate::store::SecretStore;

/// Read one secret and record how long the store took.
async fn resolve_one(store: &dyn SecretStore, name: &str) -> Result<String> {
    let start = Instant::now();
    let value = store.get(name).await?;
    TraceEvent::SecretResolved {
        name: name.to_owned(),
        backend: store.backend().to_owned(),
        duration_ms: start.elapsed().as_millis() as u64,
    }
    .emit();
    Ok(value)
}

/// API key and base id for the tabular datastore.
#[derive(Clone)]
pub struct DatastoreCredentials {
    pub api_key: String,
    pub base_id: String,
}

impl DatastoreCredentials {
    /// Resolve the datastore pair from `store`; no caching.
    pub async fn resolve(store: &dyn SecretStore, names: &SecretsConfig) -> Result<Self> {
        let api_key = resolve_one(store, &names.datastore_api_key).await?;
        let base_id = resolve_one(store, &names.datastore_base_id).await?;
        Ok(Self { api_key, base_id })
    }
}

impl fmt::Debug for DatastoreCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatastoreCredentials")
            .field("api_key", &"[REDACTED]")
            .field("base_id", &"[REDACTED]")
            .finish()
    }
}

/// Everything one request needs from the secret store.
///
/// Lives for a single request and is dropped with it.
#[derive(Clone)]
pub struct Secrets {
    pub assistant_api_key: String,
    pub datastore: DatastoreCredentials,
}

impl Secrets {
    /// Resolve the assistant credential, the datastore credential and the
    /// datastore base id, in that order.
    pub async fn resolve(store: &dyn SecretStore, names: &SecretsConfig) -> Result<Self> {
        let assistant_api_key = resolve_one(store, &names.assistant_api_key).await?;
        let datastore = DatastoreCredentials::resolve(store, names).await?;
        Ok(Self {
            assistant_api_key,
            datastore,
        })
    }
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("assistant_api_key", &"[REDACTED]")
            .field("datastore", &self.datastore)
            .finish()
    }
}
