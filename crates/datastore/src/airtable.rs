//! REST implementation of [`RecordStore`] for Airtable.
//!
//! `AirtableClient` wraps a shared `reqwest::Client` and translates the
//! trait methods into Airtable REST calls. Every call is sent exactly
//! once: a timed-out `create` may already have been committed, so a
//! resend could append a duplicate transcript row.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde_json::{Map, Value};

use ab_domain::config::DatastoreConfig;
use ab_domain::error::{Error, Result};
use ab_domain::trace::TraceEvent;

use crate::store::RecordStore;
use crate::types::{CreateRecordRequest, Record};

/// Build the pooled HTTP client shared by every per-request
/// [`AirtableClient`].
pub fn http_client(cfg: &DatastoreConfig) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_millis(cfg.timeout_ms))
        .build()
        .map_err(|e| Error::Http(e.to_string()))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Client
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A handle on one Airtable base, authenticated with one API key.
#[derive(Clone)]
pub struct AirtableClient {
    http: Client,
    base_url: String,
    base_id: String,
    api_key: String,
}

impl std::fmt::Debug for AirtableClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AirtableClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl AirtableClient {
    pub fn new(
        http: Client,
        cfg: &DatastoreConfig,
        api_key: impl Into<String>,
        base_id: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_owned(),
            base_id: base_id.into(),
            api_key: api_key.into(),
        }
    }

    // ── request helpers ──────────────────────────────────────────────

    /// Build `{base_url}/{base_id}/{segments...}` with each segment
    /// percent-encoded (table names may contain spaces).
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| Error::Config(format!("invalid datastore base_url: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| Error::Config("datastore base_url cannot be a base".into()))?
            .pop_if_empty()
            .push(&self.base_id)
            .extend(segments);
        Ok(url)
    }

    /// Send one authenticated request and classify the response.
    ///
    /// * `404` is handed back to the caller, which decides whether it
    ///   means "no such record".
    /// * `401` / `403` become `Error::Auth`; other non-2xx statuses become
    ///   `Error::Datastore`.
    /// * Emits a `TraceEvent::DatastoreCall` for the attempt.
    async fn execute(&self, endpoint: &str, request: RequestBuilder) -> Result<Response> {
        let start = Instant::now();
        let result = request.bearer_auth(&self.api_key).send().await;
        let duration_ms = start.elapsed().as_millis() as u64;

        let resp = match result {
            Ok(resp) => resp,
            Err(e) => {
                TraceEvent::DatastoreCall {
                    endpoint: endpoint.to_owned(),
                    status: e.status().map(|s| s.as_u16()).unwrap_or(0),
                    duration_ms,
                }
                .emit();
                return Err(from_reqwest(e));
            }
        };

        let status = resp.status();
        TraceEvent::DatastoreCall {
            endpoint: endpoint.to_owned(),
            status: status.as_u16(),
            duration_ms,
        }
        .emit();

        if status.is_success() || status == StatusCode::NOT_FOUND {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Error::Auth(format!("{endpoint} auth failed ({status}): {body}")));
        }
        Err(Error::Datastore(format!("{endpoint} returned {status}: {body}")))
    }

    async fn parse_record(endpoint: &str, resp: Response) -> Result<Record> {
        let body = resp.text().await.map_err(from_reqwest)?;
        serde_json::from_str(&body).map_err(|e| {
            Error::Datastore(format!("failed to parse {endpoint} response: {e}: {body}"))
        })
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trait implementation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[async_trait]
impl RecordStore for AirtableClient {
    async fn find(&self, table: &str, record_id: &str) -> Result<Option<Record>> {
        let url = self.url(&[table, record_id])?;
        let endpoint = format!("GET /{table}/{{id}}");
        let resp = self.execute(&endpoint, self.http.get(url)).await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::parse_record(&endpoint, resp).await.map(Some)
    }

    async fn create(&self, table: &str, fields: Map<String, Value>) -> Result<Record> {
        let url = self.url(&[table])?;
        let endpoint = format!("POST /{table}");
        let req = CreateRecordRequest { fields };
        let resp = self.execute(&endpoint, self.http.post(url).json(&req)).await?;

        if resp.status() == StatusCode::NOT_FOUND {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Datastore(format!("{endpoint}: table not found: {body}")));
        }
        Self::parse_record(&endpoint, resp).await
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Error conversion helper
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Convert a `reqwest::Error` into a domain `Error`.
///
/// Timeout errors become `Error::Timeout`; everything else becomes
/// `Error::Http`.
pub fn from_reqwest(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout(e.to_string())
    } else {
        Error::Http(e.to_string())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
