//! Request-shape detection and validation.
//!
//! Two body shapes arrive on the same endpoint: the goal-setter intake form
//! (`intake_token == "goalsetter_chat"`, snake_case fields) and the standard
//! chat widget (`Assistant_ID`-style fields). Both are normalized into a
//! [`TurnRequest`] before anything external is called.

use serde_json::{Map, Value};

use ab_domain::error::{Error, Result};
use ab_domain::transcript::GoalIntake;
use ab_domain::url_context;

use crate::pipeline::TurnRequest;

pub const GOALSETTER_TOKEN: &str = "goalsetter_chat";

pub const MISSING_FIELDS: &str = "Missing required fields";

/// Parse a raw body. Empty means `{}`.
///
/// Malformed JSON and non-object values fail with `Error::Json`, which the
/// handler reports as an internal error rather than a validation failure.
pub fn parse_body(raw: &[u8]) -> Result<Map<String, Value>> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    Ok(serde_json::from_slice(raw)?)
}

/// Normalize either body shape into a [`TurnRequest`].
pub fn to_turn_request(body: &Map<String, Value>) -> Result<TurnRequest> {
    if body.get("intake_token").and_then(Value::as_str) == Some(GOALSETTER_TOKEN) {
        goalsetter(body)
    } else {
        standard(body)
    }
}

/// A field's text, or `None` when the value is falsy: absent, `null`,
/// `""`, `false` or numeric zero.
fn field(body: &Map<String, Value>, key: &str) -> Option<String> {
    match body.get(key)? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn required(body: &Map<String, Value>, key: &str) -> Result<String> {
    field(body, key).ok_or_else(|| Error::Validation(MISSING_FIELDS.into()))
}

fn standard(body: &Map<String, Value>) -> Result<TurnRequest> {
    let assistant_id = required(body, "Assistant_ID")?;
    let message = required(body, "message")?;
    Ok(TurnRequest {
        assistant_id,
        org_id: field(body, "Org_ID"),
        user_id: field(body, "User_ID"),
        thread_id: field(body, "Thread_ID"),
        message,
        url: field(body, "url"),
        intake: None,
    })
}

fn goalsetter(body: &Map<String, Value>) -> Result<TurnRequest> {
    let assistant_id = required(body, "assistant_id")?;
    let org_id = required(body, "org_id")?;
    let url = field(body, "url");

    let intake = GoalIntake {
        name: field(body, "name"),
        email: field(body, "email"),
        subject_and_grade: field(body, "subject_and_grade"),
        learning_target: field(body, "learning_target"),
        measure_of_success: field(body, "measure_of_success"),
        goal_statement: field(body, "classroom_goal_statement"),
        source: field(body, "source"),
    };
    let mode = url_context::classify(url.as_deref()).mode;

    Ok(TurnRequest {
        assistant_id,
        org_id: Some(org_id),
        user_id: field(body, "user_id"),
        thread_id: field(body, "thread_id"),
        message: goal_message(&mode.tag(), &intake),
        url,
        intake: Some(intake),
    })
}

/// The text sent to the assistant for a goal-setter submission.
pub fn goal_message(tag: &str, intake: &GoalIntake) -> String {
    let v = |o: &Option<String>| o.clone().unwrap_or_default();
    format!(
        "[{tag}] Name: {}\nEmail: {}\nSubject and Grade: {}\nLearning Target: {}\nMeasure of Success: {}\nClassroom Goal Statement: {}",
        v(&intake.name),
        v(&intake.email),
        v(&intake.subject_and_grade),
        v(&intake.learning_target),
        v(&intake.measure_of_success),
        v(&intake.goal_statement),
    )
}
