use serde::Serialize;

/// Structured trace events emitted across all assistant-bridge crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    SecretResolved {
        name: String,
        backend: String,
        duration_ms: u64,
    },
    DatastoreCall {
        endpoint: String,
        status: u16,
        duration_ms: u64,
    },
    AssistantCall {
        endpoint: String,
        status: u16,
        duration_ms: u64,
    },
    ThreadResolved {
        thread_id: String,
        is_new: bool,
    },
    RunPolled {
        thread_id: String,
        run_id: String,
        status: String,
        attempt: u32,
    },
    TurnCompleted {
        assistant_id: String,
        thread_id: String,
        mode: String,
        reply_chars: usize,
        duration_ms: u64,
    },
    TranscriptWritten {
        table: String,
        record_id: String,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "ab_event");
    }
}
