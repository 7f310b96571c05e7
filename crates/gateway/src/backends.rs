//! Per-request construction of the datastore and assistant clients.
//!
//! Credentials come out of the secret store on every request, so the
//! clients that carry them are built per request too. The factory holds
//! the long-lived parts (connection pools, endpoints) and is injected
//! through [`AppState`](crate::state::AppState); tests substitute fakes.

use std::sync::Arc;

use ab_assistant::{AssistantService, OpenAiAssistantsClient};
use ab_datastore::{AirtableClient, RecordStore};
use ab_domain::config::{AssistantConfig, DatastoreConfig};
use ab_domain::error::Result;
use ab_secrets::DatastoreCredentials;

/// Builds credential-bound clients for one request.
pub trait BackendFactory: Send + Sync {
    fn records(&self, creds: &DatastoreCredentials) -> Arc<dyn RecordStore>;

    fn assistant(&self, api_key: &str) -> Arc<dyn AssistantService>;
}

/// Production factory: Airtable for records, OpenAI for the assistant.
pub struct HttpBackends {
    datastore_cfg: DatastoreConfig,
    datastore_http: reqwest::Client,
    assistant_cfg: AssistantConfig,
    assistant_http: reqwest::Client,
}

impl HttpBackends {
    pub fn new(datastore_cfg: &DatastoreConfig, assistant_cfg: &AssistantConfig) -> Result<Self> {
        Ok(Self {
            datastore_http: ab_datastore::http_client(datastore_cfg)?,
            datastore_cfg: datastore_cfg.clone(),
            assistant_http: ab_assistant::http_client(assistant_cfg)?,
            assistant_cfg: assistant_cfg.clone(),
        })
    }
}

impl BackendFactory for HttpBackends {
    fn records(&self, creds: &DatastoreCredentials) -> Arc<dyn RecordStore> {
        Arc::new(AirtableClient::new(
            self.datastore_http.clone(),
            &self.datastore_cfg,
            creds.api_key.clone(),
            creds.base_id.clone(),
        ))
    }

    fn assistant(&self, api_key: &str) -> Arc<dyn AssistantService> {
        Arc::new(OpenAiAssistantsClient::new(
            self.assistant_http.clone(),
            &self.assistant_cfg,
            api_key,
        ))
    }
}
