//! The transcript row persisted after each completed exchange.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::url_context::UrlContext;

/// Intake fields submitted by the goal-setter form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalIntake {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject_and_grade: Option<String>,
    pub learning_target: Option<String>,
    pub measure_of_success: Option<String>,
    pub goal_statement: Option<String>,
    pub source: Option<String>,
}

/// One completed exchange. Write-once; rows are only ever appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptRecord {
    pub timestamp: DateTime<Utc>,
    pub org_id: Option<String>,
    pub assistant_id: String,
    pub user_id: Option<String>,
    pub thread_id: String,
    pub message: String,
    pub response: String,
    pub url: Option<String>,
    pub url_context: UrlContext,
    #[serde(default)]
    pub intake: Option<GoalIntake>,
}

impl TranscriptRecord {
    /// Render the record as datastore fields.
    ///
    /// Absent optional values are left out of the row rather than written
    /// as empty cells.
    pub fn to_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        let mut put = |key: &str, value: Option<&str>| {
            if let Some(v) = value {
                fields.insert(key.to_owned(), Value::String(v.to_owned()));
            }
        };

        let time = self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true);
        put("Time", Some(time.as_str()));
        put("Org_ID", self.org_id.as_deref());
        put("Assistant_ID", Some(self.assistant_id.as_str()));
        put("User_ID", self.user_id.as_deref());
        put("Thread_ID", Some(self.thread_id.as_str()));
        put("Message", Some(self.message.as_str()));
        put("URL", self.url.as_deref());
        let url_context = serde_json::to_string(&self.url_context).unwrap_or_default();
        put("URL_Context", Some(url_context.as_str()));
        put("Response", Some(self.response.as_str()));

        if let Some(intake) = &self.intake {
            put("Name", intake.name.as_deref());
            put("Email", intake.email.as_deref());
            put("Subject_Grade", intake.subject_and_grade.as_deref());
            put("Learning_Target", intake.learning_target.as_deref());
            put("Measure_Of_Success", intake.measure_of_success.as_deref());
            put("Goal_Statement", intake.goal_statement.as_deref());
            put("Source", intake.source.as_deref());
        }

        fields
    }
}
