//! Transcript logger. Best-effort: a failed write is logged, never returned.

use ab_datastore::Record;
use ab_domain::error::{Error, Result};
use ab_domain::trace::TraceEvent;
use ab_domain::transcript::TranscriptRecord;
use ab_secrets::DatastoreCredentials;

use crate::state::AppState;

/// Append `record` to the transcripts table, swallowing any failure.
pub async fn log_turn(state: &AppState, record: &TranscriptRecord) {
    if let Err(e) = try_log(state, record).await {
        let err = Error::LogWriteFailed(e.to_string());
        tracing::error!(
            error = %err,
            kind = err.kind(),
            cause = ?e,
            thread_id = %record.thread_id,
            "transcript not persisted"
        );
    }
}

async fn try_log(state: &AppState, record: &TranscriptRecord) -> Result<Record> {
    // Credentials are re-read here rather than borrowed from the request.
    let creds = DatastoreCredentials::resolve(state.secrets.as_ref(), &state.config.secrets).await?;
    let records = state.backends.records(&creds);

    let table = &state.config.datastore.transcripts_table;
    let created = records.create(table, record.to_fields()).await?;
    TraceEvent::TranscriptWritten {
        table: table.clone(),
        record_id: created.id.clone(),
    }
    .emit();
    Ok(created)
}
