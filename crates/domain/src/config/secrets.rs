use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Secret store
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Where the three per-request secrets live in SSM Parameter Store.
///
/// Parameters are `SecureString` values, decrypted on every read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretsConfig {
    #[serde(default = "d_region")]
    pub region: String,
    /// Parameter holding the assistant service API key.
    #[serde(default = "d_assistant_key")]
    pub assistant_api_key: String,
    /// Parameter holding the datastore API key.
    #[serde(default = "d_datastore_key")]
    pub datastore_api_key: String,
    /// Parameter holding the datastore base identifier.
    #[serde(default = "d_datastore_base")]
    pub datastore_base_id: String,
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            region: d_region(),
            assistant_api_key: d_assistant_key(),
            datastore_api_key: d_datastore_key(),
            datastore_base_id: d_datastore_base(),
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_region() -> String {
    "us-east-2".into()
}
fn d_assistant_key() -> String {
    "integraled/central/OpenAI_API_Key".into()
}
fn d_datastore_key() -> String {
    "integraled/central/Airtable_API_Key".into()
}
fn d_datastore_base() -> String {
    "integraled/central/Airtable_Base_ID".into()
}
