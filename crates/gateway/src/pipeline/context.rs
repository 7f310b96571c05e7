//! Context loader: assistant profile lookup plus mode-driven
//! instruction augmentation.

use serde_json::Value;

use ab_datastore::RecordStore;
use ab_domain::context::AssistantContext;
use ab_domain::error::{Error, Result};
use ab_domain::url_context::{Mode, UrlContext};

const REVIEW_SUFFIX: &str = "\nYou are in review mode. Provide detailed feedback and suggestions.";
const TEMP_SUFFIX: &str = "\nYou are in temporary mode. Keep responses simple and focused.";
const LIVE_SUFFIX: &str =
    "\nYou are in live production mode. Provide polished, professional responses.";

/// The instruction sentence appended for `mode`, if any.
pub fn instruction_suffix(mode: Mode) -> Option<&'static str> {
    match mode {
        Mode::Review => Some(REVIEW_SUFFIX),
        Mode::Temp => Some(TEMP_SUFFIX),
        Mode::Live => Some(LIVE_SUFFIX),
        Mode::Prod | Mode::Unknown => None,
    }
}

/// Fetch the assistant's profile record and build the request context.
///
/// `org_id` is only logged: profiles are looked up by assistant id alone.
pub async fn load_context(
    records: &dyn RecordStore,
    assistants_table: &str,
    org_id: Option<&str>,
    assistant_id: &str,
    url_context: UrlContext,
) -> Result<AssistantContext> {
    tracing::debug!(org_id = ?org_id, assistant_id, table = assistants_table, "loading assistant profile");

    let record = records
        .find(assistants_table, assistant_id)
        .await?
        .ok_or_else(|| Error::ProfileNotFound(assistant_id.to_owned()))?;

    let mut profile = record.fields;

    let mut instructions = profile
        .get("instructions")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned();
    if let Some(suffix) = instruction_suffix(url_context.mode) {
        instructions.push_str(suffix);
    }
    profile.insert("instructions".into(), Value::String(instructions));

    let branding = profile
        .get("branding")
        .cloned()
        .unwrap_or_else(|| Value::Object(Default::default()));

    Ok(AssistantContext {
        assistant_profile: profile,
        branding,
        url_context,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ab_datastore::Record;
    use ab_domain::url_context::Page;
    use async_trait::async_trait;
    use serde_json::{json, Map};

    struct OneRecord(Option<Record>);

    #[async_trait]
    impl RecordStore for OneRecord {
        async fn find(&self, _table: &str, record_id: &str) -> Result<Option<Record>> {
            Ok(self.0.clone().filter(|r| r.id == record_id))
        }

        async fn create(&self, _table: &str, _fields: Map<String, Value>) -> Result<Record> {
            unreachable!("context loading never writes")
        }
    }

    fn profile(fields: Value) -> OneRecord {
        OneRecord(Some(Record {
            id: "recA1".into(),
            created_time: None,
            fields: serde_json::from_value(fields).unwrap(),
        }))
    }

    #[tokio::test]
    async fn review_mode_appends_feedback_instruction() {
        let store = profile(json!({"instructions": "You coach teachers.", "name": "Coach"}));
        let ctx = load_context(
            &store,
            "Assistants",
            Some("O1"),
            "recA1",
            UrlContext::new(Page::Goalsetter, Mode::Review),
        )
        .await
        .unwrap();

        assert_eq!(
            ctx.instructions(),
            Some("You coach teachers.\nYou are in review mode. Provide detailed feedback and suggestions.")
        );
        assert_eq!(ctx.assistant_profile["name"], "Coach");
        assert!(ctx.url_context.is_review);
    }

    #[tokio::test]
    async fn prod_and_unknown_leave_instructions_alone() {
        for url_context in [UrlContext::new(Page::Goalsetter, Mode::Prod), UrlContext::unknown()] {
            let store = profile(json!({"instructions": "Base."}));
            let ctx = load_context(&store, "Assistants", None, "recA1", url_context)
                .await
                .unwrap();
            assert_eq!(ctx.instructions(), Some("Base."));
        }
    }

    #[tokio::test]
    async fn missing_instructions_default_to_empty() {
        let store = profile(json!({}));
        let ctx = load_context(
            &store,
            "Assistants",
            None,
            "recA1",
            UrlContext::new(Page::Bbh, Mode::Temp),
        )
        .await
        .unwrap();
        assert_eq!(
            ctx.instructions(),
            Some("\nYou are in temporary mode. Keep responses simple and focused.")
        );
        assert_eq!(ctx.branding, json!({}));
    }

    #[tokio::test]
    async fn branding_is_lifted_from_the_record() {
        let store = profile(json!({"branding": {"logo": "x.png"}}));
        let ctx = load_context(&store, "Assistants", None, "recA1", UrlContext::unknown())
            .await
            .unwrap();
        assert_eq!(ctx.branding, json!({"logo": "x.png"}));
    }

    #[tokio::test]
    async fn unknown_assistant_is_profile_not_found() {
        let store = profile(json!({}));
        let err = load_context(&store, "Assistants", Some("O1"), "recOther", UrlContext::unknown())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ProfileNotFound(id) if id == "recOther"));
    }

    #[test]
    fn exactly_one_suffix_per_known_mode() {
        assert!(instruction_suffix(Mode::Live).unwrap().contains("live production"));
        assert!(instruction_suffix(Mode::Temp).unwrap().contains("temporary"));
        assert!(instruction_suffix(Mode::Review).unwrap().contains("review"));
        assert!(instruction_suffix(Mode::Prod).is_none());
        assert!(instruction_suffix(Mode::Unknown).is_none());
    }
}
