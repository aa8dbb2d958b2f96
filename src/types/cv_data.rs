// src/types/cv_data.rs
//! Structured CV extraction payload and the persisted CV analysis record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::grading::grade::{clamp_score, Grade, APPLY_THRESHOLD};
use crate::types::response::AnalysisResult;

// ===== Extraction payload =====

/// Resume fields extracted by the grading service. Every member is
/// independently optional; unknown fields sent by the service are dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedData {
    #[serde(
        rename = "Name",
        default,
        deserialize_with = "first_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    #[serde(
        rename = "Email",
        default,
        deserialize_with = "first_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub email: Option<String>,
    #[serde(
        rename = "Sector",
        default,
        deserialize_with = "first_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub sector: Option<String>,
    #[serde(
        rename = "Skills",
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub skills: Option<Vec<String>>,
    #[serde(
        rename = "Experience",
        default,
        deserialize_with = "text_or_lines",
        skip_serializing_if = "Option::is_none"
    )]
    pub experience: Option<String>,
    #[serde(rename = "Education", default, skip_serializing_if = "Option::is_none")]
    pub education: Option<SectionValue>,
    #[serde(
        rename = "Projects",
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub projects: Option<Vec<String>>,
    #[serde(
        rename = "Certifications",
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub certifications: Option<Vec<String>>,
    #[serde(rename = "Languages", default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<SectionValue>,
}

/// A free-form section whose shape varies between resumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionValue {
    Text(String),
    List(Vec<Value>),
    Structured(Map<String, Value>),
    Other(Value),
}

impl SectionValue {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Structured(map) => map.is_empty(),
            Self::Other(value) => value.is_null(),
        }
    }
}

impl ExtractedData {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn name(&self) -> Option<&str> {
        non_blank(&self.name)
    }

    pub fn email(&self) -> Option<&str> {
        non_blank(&self.email)
    }

    pub fn sector(&self) -> Option<&str> {
        non_blank(&self.sector)
    }

    pub fn experience(&self) -> Option<&str> {
        non_blank(&self.experience)
    }

    /// Skills list, `None` when absent or empty
    pub fn skills(&self) -> Option<&[String]> {
        self.skills.as_deref().filter(|skills| !skills.is_empty())
    }
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.trim().is_empty())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<Value>),
    Other(Value),
}

/// Accepts a list of strings, or a single string as a one-element list
fn one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<OneOrMany>::deserialize(deserializer)?;
    Ok(raw.map(|value| match value {
        OneOrMany::One(text) if text.trim().is_empty() => Vec::new(),
        OneOrMany::One(text) => vec![text],
        OneOrMany::Many(items) => items.into_iter().map(value_to_text).collect(),
        OneOrMany::Other(other) => vec![value_to_text(other)],
    }))
}

/// Accepts text, or a list of which the first non-blank entry is kept
fn first_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<OneOrMany>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match value {
        OneOrMany::One(text) => Some(text),
        OneOrMany::Many(items) => items
            .into_iter()
            .map(value_to_text)
            .find(|text| !text.trim().is_empty()),
        OneOrMany::Other(other) => Some(value_to_text(other)),
    }))
}

/// Accepts text, or a list joined line by line
fn text_or_lines<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<OneOrMany>::deserialize(deserializer)?;
    Ok(raw.map(|value| match value {
        OneOrMany::One(text) => text,
        OneOrMany::Many(items) => items
            .into_iter()
            .map(value_to_text)
            .collect::<Vec<_>>()
            .join("\n"),
        OneOrMany::Other(other) => value_to_text(other),
    }))
}

fn value_to_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

// ===== Persisted analysis record =====

/// The last analyzed CV, overwritten by every successful upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvData {
    pub file_name: String,
    pub score: f64,
    /// Raw grading response body
    pub analysis: Value,
    pub extracted_data: ExtractedData,
    pub uploaded_at: DateTime<Utc>,
}

impl CvData {
    /// Build the record from a successful grading response
    pub fn from_analysis(file_name: &str, result: &AnalysisResult) -> Self {
        let mut extracted_data = result
            .json_data
            .clone()
            .or_else(|| result.extracted_data.clone())
            .unwrap_or_default();

        if extracted_data.sector().is_none() {
            if let Some(sector) = result.sector.as_deref().filter(|s| !s.trim().is_empty()) {
                extracted_data.sector = Some(sector.to_string());
            }
        }

        Self {
            file_name: file_name.to_string(),
            score: clamp_score(result.score.unwrap_or(0.0)),
            analysis: result.raw.clone(),
            extracted_data,
            uploaded_at: Utc::now(),
        }
    }

    pub fn grade(&self) -> Grade {
        Grade::from_score(self.score)
    }

    pub fn eligible_to_apply(&self) -> bool {
        self.score >= APPLY_THRESHOLD
    }
}
