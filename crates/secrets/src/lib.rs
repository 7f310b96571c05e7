//! `ab-secrets`: per-request secret resolution.
//!
//! Provides the [`SecretStore`] trait, an AWS SSM Parameter Store backend
//! ([`SsmSecretStore`]), an in-memory backend for tests
//! ([`MemorySecretStore`]), and the [`Secrets`] bundle that the gateway
//! resolves at the start of every request.
//!
//! Nothing here caches: every call goes back to the store.

pub mod bundle;
pub mod memory;
pub mod ssm;
pub mod store;

pub use bundle::{DatastoreCredentials, Secrets};
pub use memory::MemorySecretStore;
pub use ssm::SsmSecretStore;
pub use store::SecretStore;

use std::sync::Arc;

use ab_domain::config::SecretsConfig;

/// Build the production [`SecretStore`]: SSM Parameter Store in `secrets.region`.
pub async fn create_store(cfg: &SecretsConfig) -> Arc<dyn SecretStore> {
    tracing::info!(region = %cfg.region, "using SSM parameter store for secrets");
    Arc::new(SsmSecretStore::from_region(&cfg.region).await)
}
