//! Airtable wire DTOs.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single table row as returned by the REST API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    #[serde(default)]
    pub created_time: Option<String>,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

/// POST /{base}/{table} request body.
#[derive(Debug, Clone, Serialize)]
pub struct CreateRecordRequest {
    pub fields: Map<String, Value>,
}
