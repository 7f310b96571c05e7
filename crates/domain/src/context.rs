use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::url_context::UrlContext;

/// Per-request assistant context assembled from the stored profile.
///
/// `assistant_profile` holds every field of the profile record, with
/// `instructions` replaced by the mode-augmented text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantContext {
    pub assistant_profile: Map<String, Value>,
    pub branding: Value,
    pub url_context: UrlContext,
}

impl AssistantContext {
    /// The instructions override sent with each run, if the profile has one.
    pub fn instructions(&self) -> Option<&str> {
        self.assistant_profile
            .get("instructions")
            .and_then(Value::as_str)
    }
}

/// The outcome of one assistant turn; serialized as the success body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReply {
    pub message: String,
    pub thread_id: String,
}
