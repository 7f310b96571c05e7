//! Turn executor: thread resolution, message append, run creation and
//! the bounded poll loop.

use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use ab_assistant::{AssistantService, Run, RunStatus};
use ab_domain::config::AssistantConfig;
use ab_domain::context::{AssistantContext, TurnReply};
use ab_domain::error::{Error, Result};
use ab_domain::trace::TraceEvent;
use ab_domain::url_context::UrlContext;

/// Poll cadence and upper bound for one run.
#[derive(Debug, Clone, Copy)]
pub struct PollSettings {
    pub interval: Duration,
    pub deadline: Duration,
}

impl PollSettings {
    pub fn from_config(cfg: &AssistantConfig) -> Self {
        Self {
            interval: Duration::from_millis(cfg.poll_interval_ms),
            deadline: Duration::from_secs(cfg.run_timeout_secs),
        }
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        Self::from_config(&AssistantConfig::default())
    }
}

/// Outbound text for `mode`: review and temp messages carry a marker.
pub fn compose_message(url_context: &UrlContext, message: &str) -> String {
    if url_context.is_review {
        format!("[Review Mode] {message}")
    } else if url_context.is_temp {
        format!("[Temporary Mode] {message}")
    } else {
        message.to_owned()
    }
}

/// Execute one assistant turn and return the reply with the thread it ran on.
pub async fn run_turn(
    service: &dyn AssistantService,
    assistant_id: &str,
    handle: Option<&str>,
    message: &str,
    context: &AssistantContext,
    poll: PollSettings,
    cancel: &CancellationToken,
) -> Result<TurnReply> {
    let thread_id = resolve_thread(service, handle).await?;

    let content = compose_message(&context.url_context, message);
    service.add_user_message(&thread_id, &content).await?;

    let run = service
        .create_run(&thread_id, assistant_id, context.instructions())
        .await?;
    let run = wait_for_run(service, &thread_id, &run.id, poll, cancel).await?;

    if run.status == RunStatus::Failed {
        let message = run
            .last_error
            .map(|e| e.message)
            .unwrap_or_else(|| "run failed without an error message".into());
        return Err(Error::AssistantRunFailed {
            run_id: run.id,
            message,
        });
    }
    if run.status != RunStatus::Completed {
        tracing::warn!(
            thread_id = %thread_id,
            run_id = %run.id,
            status = run.status.as_str(),
            "run ended without completing; reading latest message anyway"
        );
    }

    let messages = service.list_messages(&thread_id).await?;
    let reply = messages
        .first()
        .and_then(|m| m.first_text())
        .ok_or_else(|| Error::Assistant(format!("thread {thread_id} has no text reply")))?
        .to_owned();

    Ok(TurnReply {
        message: reply,
        thread_id,
    })
}

/// Thread ids issued by the service are `[A-Za-z0-9_-]+`; anything else
/// cannot name a live thread.
fn is_thread_handle(handle: &str) -> bool {
    !handle.is_empty()
        && handle
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// Reuse the caller's thread when it still exists, otherwise start a new one.
async fn resolve_thread(service: &dyn AssistantService, handle: Option<&str>) -> Result<String> {
    match handle {
        Some(h) if !h.is_empty() && !is_thread_handle(h) => {
            tracing::warn!(handle = h, "malformed thread handle, starting a new thread");
        }
        _ => {}
    }

    if let Some(id) = handle.filter(|h| is_thread_handle(h)) {
        match service.retrieve_thread(id).await {
            Ok(thread) => {
                TraceEvent::ThreadResolved {
                    thread_id: thread.id.clone(),
                    is_new: false,
                }
                .emit();
                return Ok(thread.id);
            }
            Err(e) => {
                tracing::warn!(thread_id = id, error = %e, "thread unavailable, starting a new one");
            }
        }
    }

    let thread = service.create_thread().await?;
    TraceEvent::ThreadResolved {
        thread_id: thread.id.clone(),
        is_new: true,
    }
    .emit();
    Ok(thread.id)
}

/// Poll until the run leaves `queued` / `in_progress`.
async fn wait_for_run(
    service: &dyn AssistantService,
    thread_id: &str,
    run_id: &str,
    poll: PollSettings,
    cancel: &CancellationToken,
) -> Result<Run> {
    let started = Instant::now();
    let mut attempt: u32 = 1;
    let mut run = service.retrieve_run(thread_id, run_id).await?;

    loop {
        TraceEvent::RunPolled {
            thread_id: thread_id.to_owned(),
            run_id: run_id.to_owned(),
            status: run.status.as_str().to_owned(),
            attempt,
        }
        .emit();
        tracing::debug!(thread_id, run_id, status = run.status.as_str(), attempt, "run polled");

        if !run.status.is_in_flight() {
            return Ok(run);
        }
        if started.elapsed() >= poll.deadline {
            return Err(Error::Timeout(format!(
                "run {run_id} still {} after {}s",
                run.status.as_str(),
                poll.deadline.as_secs()
            )));
        }

        tokio::select! {
            _ = cancel.cancelled() => {
                return Err(Error::Cancelled(format!("polling run {run_id} stopped")));
            }
            _ = tokio::time::sleep(poll.interval) => {}
        }

        attempt += 1;
        run = service.retrieve_run(thread_id, run_id).await?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ab_assistant::{MessageContent, RunError, TextContent, Thread, ThreadMessage};
    use ab_domain::url_context::{Mode, Page};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::VecDeque;

    /// Scripted service: run statuses are served in order, the last one repeats.
    #[derive(Default)]
    struct Scripted {
        known_threads: Vec<String>,
        statuses: Mutex<VecDeque<RunStatus>>,
        last_error: Option<String>,
        reply: Option<String>,
        appended: Mutex<Vec<(String, String)>>,
        instructions: Mutex<Option<String>>,
        created: Mutex<u32>,
    }

    impl Scripted {
        fn with_statuses(statuses: &[RunStatus]) -> Self {
            Self {
                statuses: Mutex::new(statuses.iter().copied().collect()),
                reply: Some("Nice goal.".into()),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl AssistantService for Scripted {
        async fn create_thread(&self) -> Result<Thread> {
            let mut n = self.created.lock();
            *n += 1;
            Ok(Thread {
                id: format!("thread_new{}", *n),
                created_at: None,
            })
        }

        async fn retrieve_thread(&self, thread_id: &str) -> Result<Thread> {
            if self.known_threads.iter().any(|t| t == thread_id) {
                Ok(Thread {
                    id: thread_id.to_owned(),
                    created_at: None,
                })
            } else {
                Err(Error::Assistant("GET /threads/{id} returned 404 Not Found".into()))
            }
        }

        async fn add_user_message(&self, thread_id: &str, content: &str) -> Result<ThreadMessage> {
            self.appended
                .lock()
                .push((thread_id.to_owned(), content.to_owned()));
            Ok(ThreadMessage {
                id: "msg_u".into(),
                role: "user".into(),
                content: vec![],
            })
        }

        async fn create_run(
            &self,
            _thread_id: &str,
            _assistant_id: &str,
            instructions: Option<&str>,
        ) -> Result<Run> {
            *self.instructions.lock() = instructions.map(str::to_owned);
            Ok(Run {
                id: "run_1".into(),
                status: RunStatus::Queued,
                last_error: None,
            })
        }

        async fn retrieve_run(&self, _thread_id: &str, run_id: &str) -> Result<Run> {
            let mut q = self.statuses.lock();
            let status = if q.len() > 1 {
                q.pop_front().unwrap()
            } else {
                *q.front().unwrap()
            };
            Ok(Run {
                id: run_id.to_owned(),
                status,
                last_error: self.last_error.clone().map(|message| RunError {
                    code: Some("server_error".into()),
                    message,
                }),
            })
        }

        async fn list_messages(&self, _thread_id: &str) -> Result<Vec<ThreadMessage>> {
            Ok(self
                .reply
                .iter()
                .map(|text| ThreadMessage {
                    id: "msg_a".into(),
                    role: "assistant".into(),
                    content: vec![MessageContent::Text {
                        text: TextContent {
                            value: text.clone(),
                        },
                    }],
                })
                .collect())
        }
    }

    fn fast() -> PollSettings {
        PollSettings {
            interval: Duration::from_millis(2),
            deadline: Duration::from_secs(5),
        }
    }

    fn ctx(mode: Mode) -> AssistantContext {
        let mut ctx = AssistantContext {
            url_context: UrlContext::new(Page::Goalsetter, mode),
            ..Default::default()
        };
        ctx.assistant_profile
            .insert("instructions".into(), "Coach kindly.".into());
        ctx
    }

    #[tokio::test]
    async fn completes_after_polling_through_in_flight_states() {
        let svc = Scripted::with_statuses(&[
            RunStatus::Queued,
            RunStatus::InProgress,
            RunStatus::Completed,
        ]);
        let reply = run_turn(
            &svc,
            "asst_1",
            None,
            "hello",
            &ctx(Mode::Prod),
            fast(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(reply.message, "Nice goal.");
        assert_eq!(reply.thread_id, "thread_new1");
        assert_eq!(svc.appended.lock()[0].1, "hello");
        assert_eq!(svc.instructions.lock().as_deref(), Some("Coach kindly."));
    }

    #[tokio::test]
    async fn review_and_temp_messages_are_prefixed() {
        for (mode, expected) in [
            (Mode::Review, "[Review Mode] hi"),
            (Mode::Temp, "[Temporary Mode] hi"),
            (Mode::Live, "hi"),
        ] {
            let svc = Scripted::with_statuses(&[RunStatus::Completed]);
            run_turn(&svc, "asst_1", None, "hi", &ctx(mode), fast(), &CancellationToken::new())
                .await
                .unwrap();
            assert_eq!(svc.appended.lock()[0].1, expected);
        }
    }

    #[tokio::test]
    async fn known_handle_is_reused() {
        let mut svc = Scripted::with_statuses(&[RunStatus::Completed]);
        svc.known_threads = vec!["thread_old".into()];
        let reply = run_turn(
            &svc,
            "asst_1",
            Some("thread_old"),
            "again",
            &ctx(Mode::Prod),
            fast(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();
        assert_eq!(reply.thread_id, "thread_old");
        assert_eq!(*svc.created.lock(), 0);
    }

    #[tokio::test]
    async fn stale_or_empty_handle_starts_a_new_thread() {
        for handle in [Some("thread_gone"), Some("")] {
            let svc = Scripted::with_statuses(&[RunStatus::Completed]);
            let reply = run_turn(
                &svc,
                "asst_1",
                handle,
                "hi",
                &ctx(Mode::Prod),
                fast(),
                &CancellationToken::new(),
            )
            .await
            .unwrap();
            assert_eq!(reply.thread_id, "thread_new1");
        }
    }

    #[tokio::test]
    async fn path_like_handle_never_reaches_the_service() {
        let mut svc = Scripted::with_statuses(&[RunStatus::Completed]);
        // Would be "found" if the handle were passed through.
        svc.known_threads = vec!["../assistants/x".into()];
        let reply = run_turn(
            &svc,
            "asst_1",
            Some("../assistants/x"),
            "hi",
            &ctx(Mode::Prod),
            fast(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();
        assert_eq!(reply.thread_id, "thread_new1");
        assert_eq!(svc.appended.lock()[0].0, "thread_new1");
    }

    #[test]
    fn thread_handle_shape() {
        assert!(is_thread_handle("thread_abc123"));
        assert!(is_thread_handle("thread-XYZ"));
        assert!(!is_thread_handle(""));
        assert!(!is_thread_handle("../assistants/x"));
        assert!(!is_thread_handle("thread_1?x=1"));
    }

    #[tokio::test]
    async fn failed_run_carries_last_error() {
        let mut svc = Scripted::with_statuses(&[RunStatus::InProgress, RunStatus::Failed]);
        svc.last_error = Some("rate limited".into());
        let err = run_turn(&svc, "asst_1", None, "hi", &ctx(Mode::Prod), fast(), &CancellationToken::new())
            .await
            .unwrap_err();
        match err {
            Error::AssistantRunFailed { run_id, message } => {
                assert_eq!(run_id, "run_1");
                assert_eq!(message, "rate limited");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn stuck_run_times_out() {
        let svc = Scripted::with_statuses(&[RunStatus::InProgress]);
        let poll = PollSettings {
            interval: Duration::from_millis(5),
            deadline: Duration::from_millis(30),
        };
        let err = run_turn(&svc, "asst_1", None, "hi", &ctx(Mode::Prod), poll, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Timeout(_)), "{err:?}");
    }

    #[tokio::test]
    async fn cancellation_stops_polling() {
        let svc = Scripted::with_statuses(&[RunStatus::Queued]);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = run_turn(&svc, "asst_1", None, "hi", &ctx(Mode::Prod), fast(), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Cancelled(_)), "{err:?}");
    }

    #[tokio::test]
    async fn missing_reply_is_a_protocol_error() {
        let mut svc = Scripted::with_statuses(&[RunStatus::Completed]);
        svc.reply = None;
        let err = run_turn(&svc, "asst_1", None, "hi", &ctx(Mode::Prod), fast(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Assistant(_)));
    }

    #[test]
    fn poll_settings_follow_config() {
        let poll = PollSettings::default();
        assert_eq!(poll.interval, Duration::from_secs(1));
        assert_eq!(poll.deadline, Duration::from_secs(300));
    }
}
