//! The `SecretStore` trait implemented by every secret backend.

use async_trait::async_trait;
use ab_domain::error::Result;

/// Fetch-by-name access to a secret store.
///
/// Implementations must fail with
/// [`Error::ConfigUnavailable`](ab_domain::error::Error::ConfigUnavailable)
/// when the store is unreachable or the name does not exist.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Read and decrypt a single secret value.
    async fn get(&self, name: &str) -> Result<String>;

    /// Short backend label used in logs (`ssm`, `memory`).
    fn backend(&self) -> &'static str;
}
