//! The `RecordStore` trait defines the datastore surface the gateway uses.

use async_trait::async_trait;
use serde_json::{Map, Value};

use ab_domain::error::Result;

use crate::types::Record;

/// Keyed reads and append-only writes against named tables.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch a single record by id. `Ok(None)` when the table has no such
    /// record.
    async fn find(&self, table: &str, record_id: &str) -> Result<Option<Record>>;

    /// Append a new record and return it as stored.
    async fn create(&self, table: &str, fields: Map<String, Value>) -> Result<Record>;
}
