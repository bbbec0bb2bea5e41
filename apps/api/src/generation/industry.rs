//! Best-effort, single-word industry label for a profile.
//!
//! The label is whatever the model answers, cleaned to one line. It is not
//! checked against the few-shot examples or any fixed list.

use serde_json::Value;
use tracing::debug;

use crate::errors::AppError;
use crate::generation::prompts::{fill_template, INDUSTRY_PROMPT_TEMPLATE, INDUSTRY_SYSTEM};
use crate::llm_client::TextGenerator;
use crate::profile::normalize;
use crate::scraper::ProfileSource;

/// Fetches the profile at `profile_url` and classifies its industry.
pub async fn classify_industry(
    scraper: &dyn ProfileSource,
    llm: &dyn TextGenerator,
    profile_url: &str,
) -> Result<String, AppError> {
    let raw = scraper.fetch_profile(profile_url).await?;
    classify_profile(llm, &raw).await
}

/// Classifies an already-fetched raw profile.
pub async fn classify_profile(llm: &dyn TextGenerator, raw: &Value) -> Result<String, AppError> {
    let prompt = build_industry_prompt(raw)?;

    let answer = llm
        .complete(&prompt, INDUSTRY_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Industry classification failed: {e}")))?;

    let label = clean_label(&answer)
        .ok_or_else(|| AppError::Llm("Industry classification returned no label".to_string()))?;

    debug!("Classified industry: {label}");
    Ok(label)
}

/// Embeds the normalized profile: the raw provider payload is mostly noise for this task.
fn build_industry_prompt(raw: &Value) -> Result<String, AppError> {
    let profile = serde_json::to_string_pretty(&normalize(raw))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize profile: {e}")))?;
    Ok(fill_template(INDUSTRY_PROMPT_TEMPLATE, &[("profile", profile.as_str())]))
}

/// First non-empty line, minus an echoed `Industry:` prefix, quotes and trailing punctuation.
fn clean_label(answer: &str) -> Option<String> {
    let line = answer.lines().map(str::trim).find(|l| !l.is_empty())?;
    let line = line
        .strip_prefix("Industry:")
        .map(str::trim_start)
        .unwrap_or(line);
    let label = line
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '*' | '`'))
        .trim_end_matches(|c: char| matches!(c, '.' | ',' | ';' | ':' | '!'))
        .trim();

    (!label.is_empty()).then(|| label.to_string())
}
