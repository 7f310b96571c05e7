//! OpenAI Assistants v2 adapter.
//!
//! Threads, messages and runs live on the OpenAI side; this adapter only
//! translates the [`AssistantService`] calls into REST requests and the
//! responses back into the crate's wire types.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;

use ab_domain::config::AssistantConfig;
use ab_domain::error::{Error, Result};
use ab_domain::trace::TraceEvent;

use crate::service::AssistantService;
use crate::types::{
    CreateMessageRequest, CreateRunRequest, MessageList, Run, Thread, ThreadMessage,
};
use crate::util::from_reqwest;

const BETA_HEADER: &str = "OpenAI-Beta";
const BETA_VALUE: &str = "assistants=v2";

/// Build the pooled HTTP client shared by every per-request
/// [`OpenAiAssistantsClient`].
pub fn http_client(cfg: &AssistantConfig) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_millis(cfg.timeout_ms))
        .build()
        .map_err(from_reqwest)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Adapter struct
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Assistants API client bound to one API key.
#[derive(Clone)]
pub struct OpenAiAssistantsClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for OpenAiAssistantsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiAssistantsClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl OpenAiAssistantsClient {
    pub fn new(http: Client, cfg: &AssistantConfig, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Build `{base_url}/{segments...}`. Each segment is percent-encoded,
    /// so a caller-supplied thread id can never leave `/threads/`.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| Error::Config(format!("invalid assistant base_url: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| Error::Config("assistant base_url cannot be a base".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ── Internal: authenticated send + decode ─────────────────────

    async fn send_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        rb: RequestBuilder,
    ) -> Result<T> {
        let start = Instant::now();
        let result = rb
            .bearer_auth(&self.api_key)
            .header(BETA_HEADER, BETA_VALUE)
            .send()
            .await;
        let duration_ms = start.elapsed().as_millis() as u64;

        let resp = match result {
            Ok(r) => r,
            Err(e) => {
                TraceEvent::AssistantCall {
                    endpoint: endpoint.to_owned(),
                    status: e.status().map(|s| s.as_u16()).unwrap_or(0),
                    duration_ms,
                }
                .emit();
                return Err(from_reqwest(e));
            }
        };

        let status = resp.status();
        TraceEvent::AssistantCall {
            endpoint: endpoint.to_owned(),
            status: status.as_u16(),
            duration_ms,
        }
        .emit();

        let body = resp.text().await.map_err(from_reqwest)?;
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Error::Auth(format!("{endpoint} auth failed ({status}): {body}")));
        }
        if !status.is_success() {
            return Err(Error::Assistant(format!("{endpoint} returned {status}: {body}")));
        }

        serde_json::from_str(&body).map_err(|e| {
            Error::Assistant(format!("failed to parse {endpoint} response: {e}: {body}"))
        })
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trait implementation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[async_trait]
impl AssistantService for OpenAiAssistantsClient {
    async fn create_thread(&self) -> Result<Thread> {
        let rb = self
            .http
            .post(self.url(&["threads"])?)
            .json(&serde_json::json!({}));
        self.send_json("POST /threads", rb).await
    }

    async fn retrieve_thread(&self, thread_id: &str) -> Result<Thread> {
        let rb = self.http.get(self.url(&["threads", thread_id])?);
        self.send_json("GET /threads/{id}", rb).await
    }

    async fn add_user_message(&self, thread_id: &str, content: &str) -> Result<ThreadMessage> {
        let rb = self
            .http
            .post(self.url(&["threads", thread_id, "messages"])?)
            .json(&CreateMessageRequest {
                role: "user",
                content,
            });
        self.send_json("POST /threads/{id}/messages", rb).await
    }

    async fn create_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
        instructions: Option<&str>,
    ) -> Result<Run> {
        let rb = self
            .http
            .post(self.url(&["threads", thread_id, "runs"])?)
            .json(&CreateRunRequest {
                assistant_id,
                instructions,
            });
        self.send_json("POST /threads/{id}/runs", rb).await
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        let rb = self
            .http
            .get(self.url(&["threads", thread_id, "runs", run_id])?);
        self.send_json("GET /threads/{id}/runs/{run_id}", rb).await
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>> {
        let rb = self
            .http
            .get(self.url(&["threads", thread_id, "messages"])?);
        let list: MessageList = self.send_json("GET /threads/{id}/messages", rb).await?;
        Ok(list.data)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
