//! `ab-assistant`: conversational-assistant service client.
//!
//! The [`AssistantService`] trait covers the six thread / message / run
//! calls a turn needs. [`OpenAiAssistantsClient`] implements it against
//! the OpenAI Assistants v2 REST API.

pub mod openai;
pub mod service;
pub mod types;
mod util;

pub use openai::{http_client, OpenAiAssistantsClient};
pub use service::AssistantService;
pub use types::{MessageContent, Run, RunError, RunStatus, TextContent, Thread, ThreadMessage};
