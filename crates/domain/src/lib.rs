//! `ab-domain`: shared types for the assistant bridge.
//!
//! Everything the other crates agree on lives here: configuration, the
//! error taxonomy, the page/mode classifier, the per-request assistant
//! context and the transcript row written after each exchange.

pub mod config;
pub mod context;
pub mod error;
pub mod trace;
pub mod transcript;
pub mod url_context;
