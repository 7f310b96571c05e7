use async_trait::async_trait;

use ab_domain::error::Result;

use crate::types::{Run, Thread, ThreadMessage};

/// Trait every assistant-service adapter implements.
///
/// Threads and runs are owned by the remote service; the gateway only
/// ever holds their ids.
#[async_trait]
pub trait AssistantService: Send + Sync {
    /// Start a new, empty conversation thread.
    async fn create_thread(&self) -> Result<Thread>;

    /// Look up an existing thread. Fails when the service no longer knows it.
    async fn retrieve_thread(&self, thread_id: &str) -> Result<Thread>;

    /// Append a `user` message to a thread.
    async fn add_user_message(&self, thread_id: &str, content: &str) -> Result<ThreadMessage>;

    /// Start a run of `assistant_id` over the thread, optionally replacing
    /// the assistant's default instructions.
    async fn create_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
        instructions: Option<&str>,
    ) -> Result<Run>;

    /// Fetch the current state of a run.
    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run>;

    /// List a thread's messages, newest first.
    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>>;
}
