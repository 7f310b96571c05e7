//! The request pipeline behind a validated turn request:
//! classify → resolve secrets → load context → run turn → log transcript.

pub mod context;
pub mod transcript;
pub mod turn;

use std::time::Instant;

use chrono::Utc;

use ab_domain::context::TurnReply;
use ab_domain::error::Result;
use ab_domain::trace::TraceEvent;
use ab_domain::transcript::{GoalIntake, TranscriptRecord};
use ab_domain::url_context;
use ab_secrets::Secrets;

use crate::state::AppState;

pub use context::load_context;
pub use transcript::log_turn;
pub use turn::{run_turn, PollSettings};

/// A validated request, independent of the body shape it arrived in.
#[derive(Debug, Clone, Default)]
pub struct TurnRequest {
    pub assistant_id: String,
    pub org_id: Option<String>,
    pub user_id: Option<String>,
    pub thread_id: Option<String>,
    pub message: String,
    pub url: Option<String>,
    /// Present for goal-setter submissions only.
    pub intake: Option<GoalIntake>,
}

/// Run one turn end to end. The transcript write is awaited but its
/// outcome never changes the result.
pub async fn execute(state: &AppState, req: TurnRequest) -> Result<TurnReply> {
    let started = Instant::now();
    let url_context = url_context::classify(req.url.as_deref());

    let secrets = Secrets::resolve(state.secrets.as_ref(), &state.config.secrets).await?;
    let records = state.backends.records(&secrets.datastore);
    let assistant = state.backends.assistant(&secrets.assistant_api_key);

    let ctx = load_context(
        records.as_ref(),
        &state.config.datastore.assistants_table,
        req.org_id.as_deref(),
        &req.assistant_id,
        url_context,
    )
    .await?;

    let reply = run_turn(
        assistant.as_ref(),
        &req.assistant_id,
        req.thread_id.as_deref(),
        &req.message,
        &ctx,
        PollSettings::from_config(&state.config.assistant),
        &state.shutdown,
    )
    .await?;

    TraceEvent::TurnCompleted {
        assistant_id: req.assistant_id.clone(),
        thread_id: reply.thread_id.clone(),
        mode: ctx.url_context.mode.as_str().to_owned(),
        reply_chars: reply.message.chars().count(),
        duration_ms: started.elapsed().as_millis() as u64,
    }
    .emit();

    let record = TranscriptRecord {
        timestamp: Utc::now(),
        org_id: req.org_id,
        assistant_id: req.assistant_id,
        user_id: req.user_id,
        thread_id: reply.thread_id.clone(),
        message: req.message,
        response: reply.message.clone(),
        url: req.url,
        url_context: ctx.url_context,
        intake: req.intake,
    };
    log_turn(state, &record).await;

    Ok(reply)
}
