use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Assistant service (OpenAI Assistants v2)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default = "d_openai_url")]
    pub base_url: String,
    /// Per-HTTP-call timeout.
    #[serde(default = "d_60000")]
    pub timeout_ms: u64,
    /// Delay between run status polls.
    #[serde(default = "d_1000")]
    pub poll_interval_ms: u64,
    /// Upper bound on how long a single run may stay queued / in progress.
    #[serde(default = "d_300")]
    pub run_timeout_secs: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            base_url: d_openai_url(),
            timeout_ms: 60_000,
            poll_interval_ms: 1000,
            run_timeout_secs: 300,
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_openai_url() -> String {
    "https://api.openai.com/v1".into()
}
fn d_60000() -> u64 {
    60_000
}
fn d_1000() -> u64 {
    1000
}
fn d_300() -> u64 {
    300
}
