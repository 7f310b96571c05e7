use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tabular datastore (Airtable) connection
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Connection settings for the tabular datastore.
///
/// The API key and base id are secrets and are resolved per request from
/// the secret store; only the non-secret parts live here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatastoreConfig {
    #[serde(default = "d_airtable_url")]
    pub base_url: String,
    /// Table holding one record per assistant, keyed by record id.
    #[serde(default = "d_assistants")]
    pub assistants_table: String,
    /// Append-only table receiving one row per completed exchange.
    #[serde(default = "d_transcripts")]
    pub transcripts_table: String,
    #[serde(default = "d_8000")]
    pub timeout_ms: u64,
}

impl Default for DatastoreConfig {
    fn default() -> Self {
        Self {
            base_url: d_airtable_url(),
            assistants_table: d_assistants(),
            transcripts_table: d_transcripts(),
            timeout_ms: 8000,
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_airtable_url() -> String {
    "https://api.airtable.com/v0".into()
}
fn d_assistants() -> String {
    "Assistants".into()
}
fn d_transcripts() -> String {
    "LRS".into()
}
fn d_8000() -> u64 {
    8000
}
