use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder used for every missing text field.
pub const NOT_AVAILABLE: &str = "N/A";

/// Fixed-shape profile produced by the normalizer. Request-scoped, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedProfile {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub summary: String,
    pub headline: String,
    pub location: String,
    pub certifications: Vec<Value>,
    pub projects: Vec<Value>,
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub field_of_study: String,
    pub degree: String,
    pub institution: String,
    pub start_year: Option<i64>,
    pub end_year: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub duration: String,
    /// Provider-defined; usually a free-text description.
    pub responsibilities: Value,
}
