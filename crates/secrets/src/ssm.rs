//! AWS SSM Parameter Store backend.

use async_trait::async_trait;
use aws_sdk_ssm::config::Region;
use aws_sdk_ssm::error::DisplayErrorContext;
use aws_sdk_ssm::Client;

use ab_domain::error::{Error, Result};

use crate::store::SecretStore;

/// Reads `SecureString` parameters with decryption always on.
#[derive(Debug, Clone)]
pub struct SsmSecretStore {
    client: Client,
}

impl SsmSecretStore {
    /// Build a client from the ambient AWS credential chain for `region`.
    pub async fn from_region(region: &str) -> Self {
        let shared = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(region.to_owned()))
            .load()
            .await;
        Self::new(Client::new(&shared))
    }

    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecretStore for SsmSecretStore {
    async fn get(&self, name: &str) -> Result<String> {
        let output = self
            .client
            .get_parameter()
            .name(name)
            .with_decryption(true)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(parameter = %name, error = %DisplayErrorContext(&e), "SSM GetParameter failed");
                Error::ConfigUnavailable(format!("{name}: {}", DisplayErrorContext(&e)))
            })?;

        output
            .parameter()
            .and_then(|p| p.value())
            .map(str::to_owned)
            .ok_or_else(|| Error::ConfigUnavailable(format!("{name}: parameter has no value")))
    }

    fn backend(&self) -> &'static str {
        "ssm"
    }
}
