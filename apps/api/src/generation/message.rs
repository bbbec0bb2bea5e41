//! Connection messages and voice-note scripts written from two profiles.
//!
//! Profiles are accepted as any serializable value: raw provider JSON or a
//! `NormalizedProfile`. Each call makes exactly one completion request; nothing
//! is retried or cached.

use serde::Serialize;
use tracing::debug;

use crate::errors::AppError;
use crate::generation::prompts::{
    fill_template, CONNECTION_MESSAGE_PROMPT_TEMPLATE, DEFAULT_ATTRIBUTES,
    DEFAULT_CHARACTER_LENGTH, VOICE_SCRIPT_PROMPT_TEMPLATE,
};
use crate::llm_client::prompts::{BODY_ONLY_INSTRUCTION, NETWORKING_EXPERT_SYSTEM};
use crate::llm_client::TextGenerator;

/// Generates one connection message from the two profiles.
///
/// `attributes` defaults to experience, skills, education and location when
/// absent or empty; `character_length` defaults to 200.
pub async fn generate_message<U, T>(
    llm: &dyn TextGenerator,
    user_profile: &U,
    target_profile: &T,
    intent: &str,
    attributes: Option<&[String]>,
    character_length: Option<u32>,
) -> Result<String, AppError>
where
    U: Serialize + ?Sized + Sync,
    T: Serialize + ?Sized + Sync,
{
    let attributes = resolve_attributes(attributes);
    let character_length = character_length.unwrap_or(DEFAULT_CHARACTER_LENGTH);
    let prompt = build_message_prompt(
        user_profile,
        target_profile,
        intent,
        &attributes,
        character_length,
    )?;

    debug!(
        "Generating connection message: intent={intent}, attributes={attributes:?}, length={character_length}"
    );

    llm.complete(&prompt, NETWORKING_EXPERT_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Message generation failed: {e}")))
}

/// Generates a 50–80 word voice-note script ending in a call to action.
pub async fn generate_voice_script<U, T>(
    llm: &dyn TextGenerator,
    user_profile: &U,
    target_profile: &T,
    intent: &str,
) -> Result<String, AppError>
where
    U: Serialize + ?Sized + Sync,
    T: Serialize + ?Sized + Sync,
{
    let prompt = build_voice_script_prompt(user_profile, target_profile, intent)?;

    debug!("Generating voice script: intent={intent}");

    llm.complete(&prompt, NETWORKING_EXPERT_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Voice script generation failed: {e}")))
}

fn resolve_attributes(attributes: Option<&[String]>) -> Vec<String> {
    match attributes {
        Some(list) if !list.is_empty() => list.to_vec(),
        _ => DEFAULT_ATTRIBUTES.iter().map(|a| a.to_string()).collect(),
    }
}

/// Builds the connection message prompt. Each profile is embedded exactly once.
pub fn build_message_prompt<U, T>(
    user_profile: &U,
    target_profile: &T,
    intent: &str,
    attributes: &[String],
    character_length: u32,
) -> Result<String, AppError>
where
    U: Serialize + ?Sized,
    T: Serialize + ?Sized,
{
    let attributes = attributes.join(", ");
    let character_length = character_length.to_string();
    let user_profile = profile_text(user_profile)?;
    let target_profile = profile_text(target_profile)?;

    Ok(fill_template(
        CONNECTION_MESSAGE_PROMPT_TEMPLATE,
        &[
            ("attributes", attributes.as_str()),
            ("intent", intent),
            ("character_length", character_length.as_str()),
            ("body_only_instruction", BODY_ONLY_INSTRUCTION),
            ("user_profile", user_profile.as_str()),
            ("target_profile", target_profile.as_str()),
        ],
    ))
}

/// Builds the voice script prompt by filling the template.
pub fn build_voice_script_prompt<U, T>(
    user_profile: &U,
    target_profile: &T,
    intent: &str,
) -> Result<String, AppError>
where
    U: Serialize + ?Sized,
    T: Serialize + ?Sized,
{
    let user_profile = profile_text(user_profile)?;
    let target_profile = profile_text(target_profile)?;

    Ok(fill_template(
        VOICE_SCRIPT_PROMPT_TEMPLATE,
        &[
            ("intent", intent),
            ("body_only_instruction", BODY_ONLY_INSTRUCTION),
            ("user_profile", user_profile.as_str()),
            ("target_profile", target_profile.as_str()),
        ],
    ))
}

fn profile_text<P: Serialize + ?Sized>(profile: &P) -> Result<String, AppError> {
    serde_json::to_string_pretty(profile)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize profile: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_dependencies::StubGenerator;
    use crate::profile::normalize;
    use serde_json::json;

    fn user() -> serde_json::Value {
        json!({"headline": "Backend Engineer", "skills": ["Go", "SQL"]})
    }

    fn target() -> serde_json::Value {
        json!({"headline": "ML Researcher", "skills": ["Python", "PyTorch"]})
    }

    #[tokio::test]
    async fn test_generate_message_prompt_contains_both_headlines_and_intent() {
        let llm = StubGenerator::replying("Hi! Loved your work on PyTorch.");

        let message = generate_message(&llm, &user(), &target(), "network", None, Some(150))
            .await
            .unwrap();

        assert_eq!(message, "Hi! Loved your work on PyTorch.");
        let calls = llm.calls();
        assert_eq!(calls.len(), 1, "exactly one upstream call per invocation");
        let (prompt, system) = &calls[0];
        assert!(prompt.contains("Backend Engineer"));
        assert!(prompt.contains("ML Researcher"));
        assert!(prompt.contains("\"network\""));
        assert!(prompt.contains("150 characters"));
        assert_eq!(system, NETWORKING_EXPERT_SYSTEM);
    }

    #[tokio::test]
    async fn test_generate_message_returns_first_completion_unchanged() {
        let llm = StubGenerator::replying("first").then_replying("second");

        let message = generate_message(&llm, &user(), &target(), "network", None, None)
            .await
            .unwrap();

        assert_eq!(message, "first");
        assert_eq!(llm.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_generate_message_default_attributes_and_length() {
        let llm = StubGenerator::replying("ok");

        generate_message(&llm, &user(), &target(), "network", None, None)
            .await
            .unwrap();

        let prompt = &llm.calls()[0].0;
        assert!(prompt.contains("[experience, skills, education, location]"));
        assert!(prompt.contains("200 characters"));
    }

    #[test]
    fn test_resolve_attributes_defaults() {
        assert_eq!(
            resolve_attributes(None),
            vec!["experience", "skills", "education", "location"]
        );
        assert_eq!(resolve_attributes(Some(&[][..])), resolve_attributes(None));
    }

    #[test]
    fn test_resolve_attributes_keeps_caller_choice() {
        let chosen = vec!["projects".to_string()];
        assert_eq!(resolve_attributes(Some(chosen.as_slice())), vec!["projects"]);
    }

    #[tokio::test]
    async fn test_generate_message_accepts_normalized_profiles() {
        let llm = StubGenerator::replying("ok");
        let user = normalize(&json!({"headline": "Backend Engineer"}));
        let target = normalize(&json!({"headline": "ML Researcher"}));

        generate_message(&llm, &user, &target, "collaboration", None, None)
            .await
            .unwrap();

        let prompt = &llm.calls()[0].0;
        assert!(prompt.contains("\"headline\": \"Backend Engineer\""));
        assert!(prompt.contains("\"headline\": \"ML Researcher\""));
    }

    #[tokio::test]
    async fn test_generate_message_upstream_failure_is_llm_error() {
        let llm = StubGenerator::failing();

        let result = generate_message(&llm, &user(), &target(), "network", None, None).await;

        assert!(matches!(result, Err(AppError::Llm(_))));
        assert_eq!(llm.calls().len(), 1, "no retry after a failure");
    }

    #[tokio::test]
    async fn test_voice_script_prompt_requires_word_count_and_call_to_action() {
        let llm = StubGenerator::replying("Hey Grace...");

        let script = generate_voice_script(&llm, &user(), &target(), "mentorship")
            .await
            .unwrap();

        assert_eq!(script, "Hey Grace...");
        let prompt = &llm.calls()[0].0;
        assert!(prompt.contains("50-80 words"));
        assert!(prompt.contains("call-to-action"));
        assert!(prompt.contains("one or two things the two people have in common"));
        assert!(prompt.contains("\"mentorship\""));
    }

    #[test]
    fn test_voice_script_prompt_is_always_bounded() {
        for intent in ["network", "hiring", ""] {
            let prompt = build_voice_script_prompt(&json!({}), &json!({}), intent).unwrap();
            assert!(prompt.contains("50-80 words"));
            assert!(prompt.contains("call-to-action closing line"));
        }
    }

    #[test]
    fn test_message_prompt_asks_for_body_only() {
        let prompt =
            build_message_prompt(&json!({}), &json!({}), "network", &["skills".to_string()], 300)
                .unwrap();
        assert!(prompt.contains(BODY_ONLY_INSTRUCTION));
        assert!(prompt.contains("about 300 characters"));
    }

    #[test]
    fn test_message_prompt_embeds_braced_text_verbatim() {
        let user = json!({"summary": "I write {target_profile} templates"});
        let target = json!({"headline": "TARGET_HEADLINE"});

        let prompt = build_message_prompt(
            &user,
            &target,
            "{user_profile}",
            &["{character_length}".to_string()],
            200,
        )
        .unwrap();

        assert_eq!(prompt.matches("TARGET_HEADLINE").count(), 1);
        assert_eq!(prompt.matches("I write {target_profile} templates").count(), 1);
        assert!(prompt.contains("(\"{user_profile}\")"));
        assert!(prompt.contains("[{character_length}]"));
    }

    #[test]
    fn test_voice_script_prompt_does_not_expand_intent() {
        let prompt =
            build_voice_script_prompt(&json!({"headline": "USER_HEADLINE"}), &json!({}), "{user_profile}")
                .unwrap();

        assert_eq!(prompt.matches("USER_HEADLINE").count(), 1);
        assert!(prompt.contains("\"{user_profile}\""));
    }
}
