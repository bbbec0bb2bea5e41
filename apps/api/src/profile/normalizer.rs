//! Maps the scraping provider's loosely structured JSON into a
//! `NormalizedProfile`.
//!
//! Every lookup has a default, so normalization cannot fail. Values of an
//! unexpected shape (a list where an object was expected, a number where a
//! string was expected) are treated as missing.

use serde_json::Value;

use crate::profile::models::{EducationEntry, ExperienceEntry, NormalizedProfile, NOT_AVAILABLE};

/// Normalizes a raw provider profile. Pure; never fails.
pub fn normalize(raw: &Value) -> NormalizedProfile {
    NormalizedProfile {
        username: text_field(raw, "username"),
        first_name: text_field(raw, "firstName"),
        last_name: text_field(raw, "lastName"),
        summary: text_field(raw, "summary"),
        headline: text_field(raw, "headline"),
        location: match raw.get("geo") {
            Some(geo @ Value::Object(_)) => text_field(geo, "country"),
            _ => NOT_AVAILABLE.to_string(),
        },
        certifications: opaque_list(raw.get("certifications")),
        projects: opaque_list(raw.get("projects")),
        education: list(raw.get("educations")).map(normalize_education).collect(),
        experience: list(raw.get("position")).map(normalize_experience).collect(),
        skills: list(raw.get("skills")).map(skill_name).collect(),
    }
}

fn normalize_education(entry: &Value) -> EducationEntry {
    EducationEntry {
        field_of_study: text_field(entry, "fieldOfStudy"),
        degree: text_field(entry, "degree"),
        institution: text_field(entry, "schoolName"),
        start_year: year(entry.get("start")),
        end_year: year(entry.get("end")),
    }
}

fn normalize_experience(entry: &Value) -> ExperienceEntry {
    ExperienceEntry {
        title: text_field(entry, "title"),
        company: text_field(entry, "companyName"),
        duration: text_field(entry, "duration"),
        responsibilities: match entry.get("description") {
            None | Some(Value::Null) => Value::Array(Vec::new()),
            Some(v) => v.clone(),
        },
    }
}

/// `Value::get` yields `None` on non-objects, so entries of the wrong shape
/// come out fully defaulted.
fn text_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

fn list(value: Option<&Value>) -> impl Iterator<Item = &Value> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter())
        .into_iter()
        .flatten()
}

/// Accepts a plain list or the provider's `{ "items": [...] }` envelope.
fn opaque_list(value: Option<&Value>) -> Vec<Value> {
    match value {
        Some(Value::Array(items)) => items.clone(),
        Some(Value::Object(obj)) => obj
            .get("items")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn skill_name(skill: &Value) -> String {
    match skill {
        Value::String(name) => name.clone(),
        other => text_field(other, "name"),
    }
}

/// The provider reports unknown dates as year 0.
fn year(date: Option<&Value>) -> Option<i64> {
    let year = match date?.get("year")? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }?;
    (year > 0).then_some(year)
}
