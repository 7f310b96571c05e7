//! In-process fakes for the datastore, the assistant service and the
//! secret store, plus request helpers for driving the router.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use parking_lot::Mutex;
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use ab_assistant::{
    AssistantService, MessageContent, Run, RunError, RunStatus, TextContent, Thread, ThreadMessage,
};
use ab_datastore::{Record, RecordStore};
use ab_domain::config::Config;
use ab_domain::error::{Error, Result};
use ab_gateway::backends::BackendFactory;
use ab_gateway::state::AppState;
use ab_secrets::{DatastoreCredentials, MemorySecretStore};

pub const OPENAI_KEY: &str = "integraled/central/OpenAI_API_Key";
pub const AIRTABLE_KEY: &str = "integraled/central/Airtable_API_Key";
pub const AIRTABLE_BASE: &str = "integraled/central/Airtable_Base_ID";

// ── Datastore ────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeRecords {
    rows: Mutex<HashMap<(String, String), Record>>,
    pub created: Mutex<Vec<(String, Map<String, Value>)>>,
    pub fail_creates: Mutex<bool>,
}

impl FakeRecords {
    pub fn insert_profile(&self, id: &str, fields: Value) {
        let fields = match fields {
            Value::Object(m) => m,
            _ => panic!("profile fields must be an object"),
        };
        self.rows.lock().insert(
            ("Assistants".into(), id.into()),
            Record {
                id: id.into(),
                created_time: None,
                fields,
            },
        );
    }
}

#[async_trait]
impl RecordStore for FakeRecords {
    async fn find(&self, table: &str, record_id: &str) -> Result<Option<Record>> {
        Ok(self
            .rows
            .lock()
            .get(&(table.to_owned(), record_id.to_owned()))
            .cloned())
    }

    async fn create(&self, table: &str, fields: Map<String, Value>) -> Result<Record> {
        if *self.fail_creates.lock() {
            return Err(Error::Datastore("POST returned 503 Service Unavailable".into()));
        }
        let mut created = self.created.lock();
        created.push((table.to_owned(), fields.clone()));
        Ok(Record {
            id: format!("rec{}", created.len()),
            created_time: None,
            fields,
        })
    }
}

// ── Assistant service ────────────────────────────────────────────────

/// Threads keep their messages; runs answer with a scripted status
/// sequence (the last status repeats) and a fixed reply.
pub struct FakeAssistant {
    pub threads: Mutex<HashMap<String, Vec<ThreadMessage>>>,
    pub statuses: Mutex<VecDeque<RunStatus>>,
    pub reply: Mutex<String>,
    pub last_error: Mutex<Option<String>>,
    pub run_instructions: Mutex<Vec<Option<String>>>,
    next_id: Mutex<u32>,
}

impl Default for FakeAssistant {
    fn default() -> Self {
        Self {
            threads: Mutex::new(HashMap::new()),
            statuses: Mutex::new(VecDeque::from([RunStatus::InProgress, RunStatus::Completed])),
            reply: Mutex::new("Here is some feedback.".into()),
            last_error: Mutex::new(None),
            run_instructions: Mutex::new(Vec::new()),
            next_id: Mutex::new(0),
        }
    }
}

impl FakeAssistant {
    pub fn script(&self, statuses: &[RunStatus]) {
        *self.statuses.lock() = statuses.iter().copied().collect();
    }

    pub fn user_messages(&self, thread_id: &str) -> Vec<String> {
        self.threads
            .lock()
            .get(thread_id)
            .map(|msgs| {
                msgs.iter()
                    .filter(|m| m.role == "user")
                    .filter_map(|m| m.first_text().map(str::to_owned))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn thread_count(&self) -> usize {
        self.threads.lock().len()
    }

    fn next(&self, prefix: &str) -> String {
        let mut n = self.next_id.lock();
        *n += 1;
        format!("{prefix}_{}", *n)
    }
}

fn text_message(id: String, role: &str, text: &str) -> ThreadMessage {
    ThreadMessage {
        id,
        role: role.into(),
        content: vec![MessageContent::Text {
            text: TextContent { value: text.into() },
        }],
    }
}

#[async_trait]
impl AssistantService for FakeAssistant {
    async fn create_thread(&self) -> Result<Thread> {
        let id = self.next("thread");
        self.threads.lock().insert(id.clone(), Vec::new());
        Ok(Thread {
            id,
            created_at: Some(1_700_000_000),
        })
    }

    async fn retrieve_thread(&self, thread_id: &str) -> Result<Thread> {
        if self.threads.lock().contains_key(thread_id) {
            Ok(Thread {
                id: thread_id.to_owned(),
                created_at: None,
            })
        } else {
            Err(Error::Assistant(
                "GET /threads/{id} returned 404 Not Found".into(),
            ))
        }
    }

    async fn add_user_message(&self, thread_id: &str, content: &str) -> Result<ThreadMessage> {
        let msg = text_message(self.next("msg"), "user", content);
        self.threads
            .lock()
            .get_mut(thread_id)
            .ok_or_else(|| Error::Assistant("no such thread".into()))?
            .insert(0, msg.clone());
        Ok(msg)
    }

    async fn create_run(
        &self,
        _thread_id: &str,
        _assistant_id: &str,
        instructions: Option<&str>,
    ) -> Result<Run> {
        self.run_instructions
            .lock()
            .push(instructions.map(str::to_owned));
        Ok(Run {
            id: self.next("run"),
            status: RunStatus::Queued,
            last_error: None,
        })
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        let status = {
            let mut q = self.statuses.lock();
            if q.len() > 1 {
                q.pop_front().unwrap_or(RunStatus::Completed)
            } else {
                q.front().copied().unwrap_or(RunStatus::Completed)
            }
        };
        if status == RunStatus::Completed {
            let reply = text_message(self.next("msg"), "assistant", &self.reply.lock());
            if let Some(msgs) = self.threads.lock().get_mut(thread_id) {
                if msgs.first().map(|m| m.role.as_str()) != Some("assistant") {
                    msgs.insert(0, reply);
                }
            }
        }
        Ok(Run {
            id: run_id.to_owned(),
            status,
            last_error: self.last_error.lock().clone().map(|message| RunError {
                code: Some("server_error".into()),
                message,
            }),
        })
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>> {
        Ok(self
            .threads
            .lock()
            .get(thread_id)
            .cloned()
            .unwrap_or_default())
    }
}

// ── Factory + state ──────────────────────────────────────────────────

pub struct FakeBackends {
    pub records: Arc<FakeRecords>,
    pub assistant: Arc<FakeAssistant>,
    pub seen_assistant_keys: Mutex<Vec<String>>,
    pub seen_base_ids: Mutex<Vec<String>>,
}

impl BackendFactory for FakeBackends {
    fn records(&self, creds: &DatastoreCredentials) -> Arc<dyn RecordStore> {
        self.seen_base_ids.lock().push(creds.base_id.clone());
        self.records.clone()
    }

    fn assistant(&self, api_key: &str) -> Arc<dyn AssistantService> {
        self.seen_assistant_keys.lock().push(api_key.to_owned());
        self.assistant.clone()
    }
}

pub struct Harness {
    pub state: AppState,
    pub backends: Arc<FakeBackends>,
    pub secrets: Arc<MemorySecretStore>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(fast_config())
    }

    pub fn with_config(config: Config) -> Self {
        let secrets = Arc::new(
            MemorySecretStore::new()
                .with(OPENAI_KEY, "sk-test")
                .with(AIRTABLE_KEY, "pat-test")
                .with(AIRTABLE_BASE, "appBase"),
        );
        let records = Arc::new(FakeRecords::default());
        records.insert_profile(
            "recAssistant1",
            serde_json::json!({"instructions": "You help teachers set goals.", "branding": {"color": "teal"}}),
        );
        let backends = Arc::new(FakeBackends {
            records,
            assistant: Arc::new(FakeAssistant::default()),
            seen_assistant_keys: Mutex::new(Vec::new()),
            seen_base_ids: Mutex::new(Vec::new()),
        });
        let state = AppState {
            config: Arc::new(config),
            secrets: secrets.clone(),
            backends: backends.clone(),
            shutdown: CancellationToken::new(),
        };
        Self {
            state,
            backends,
            secrets,
        }
    }

    pub fn records(&self) -> &FakeRecords {
        &self.backends.records
    }

    pub fn assistant(&self) -> &FakeAssistant {
        &self.backends.assistant
    }

    pub async fn post(&self, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, "/", Body::from(body.to_string())).await
    }

    pub async fn send(&self, method: Method, uri: &str, body: Body) -> (StatusCode, Value) {
        let resp = self.raw(method, uri, body).await;
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    pub async fn raw(&self, method: Method, uri: &str, body: Body) -> Response<Body> {
        let app = ab_gateway::api::router(self.state.clone());
        app.oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(body)
                .unwrap(),
        )
        .await
        .unwrap()
    }
}

/// Defaults with a poll loop fast enough for tests.
pub fn fast_config() -> Config {
    let mut config = Config::default();
    config.assistant.poll_interval_ms = 1;
    config
}
