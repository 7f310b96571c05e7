//! `ab-datastore`: tabular datastore client.
//!
//! Provides the [`RecordStore`] trait used by the context loader and the
//! transcript logger, a production REST implementation for Airtable
//! ([`AirtableClient`]), and the wire DTOs ([`Record`],
//! [`CreateRecordRequest`]).
//!
//! Clients are cheap: the gateway builds one per request from the
//! credentials it just resolved, sharing a single `reqwest::Client`
//! connection pool.

pub mod airtable;
pub mod store;
pub mod types;

pub use airtable::{from_reqwest, http_client, AirtableClient};
pub use store::RecordStore;
pub use types::{CreateRecordRequest, Record};
