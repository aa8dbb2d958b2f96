// src/grading/format.rs
//! Human-readable rendering of extracted resume fields

use serde_json::Value;

use crate::types::cv_data::{ExtractedData, SectionValue};

pub const NO_STRUCTURED_DATA: &str = "No structured data available";
pub const NO_CV_DATA: &str = "No CV data available";
pub const CV_DATA_AVAILABLE: &str = "CV data available";

const SUMMARY_EXPERIENCE_CHARS: usize = 100;
const SUMMARY_SKILLS: usize = 5;

enum Section<'a> {
    Items(&'a [String]),
    Text(&'a str),
    Value(&'a SectionValue),
}

/// Render the extraction in a fixed field order. Missing or empty input
/// yields [`NO_STRUCTURED_DATA`].
pub fn format_cv_data(data: Option<&ExtractedData>) -> String {
    let Some(data) = data else {
        return NO_STRUCTURED_DATA.to_string();
    };

    let mut formatted = String::new();

    if let Some(name) = data.name() {
        formatted.push_str(&format!("**Name:** {}\n\n", name));
    }
    if let Some(email) = data.email() {
        formatted.push_str(&format!("**Email:** {}\n\n", email));
    }
    if let Some(sector) = data.sector() {
        formatted.push_str(&format!("**Sector/Role:** {}\n\n", sector));
    }

    let sections = [
        ("Skills", data.skills.as_deref().map(Section::Items)),
        ("Experience", data.experience().map(Section::Text)),
        ("Education", data.education.as_ref().map(Section::Value)),
        ("Projects", data.projects.as_deref().map(Section::Items)),
        ("Certifications", data.certifications.as_deref().map(Section::Items)),
        ("Languages", data.languages.as_ref().map(Section::Value)),
    ];

    for (title, section) in sections {
        let Some(body) = section.and_then(render_section) else {
            continue;
        };
        formatted.push_str(&format!("**{}:**\n", title));
        formatted.push_str(&body);
        formatted.push('\n');
    }

    if formatted.is_empty() {
        NO_STRUCTURED_DATA.to_string()
    } else {
        formatted
    }
}

fn render_section(section: Section<'_>) -> Option<String> {
    match section {
        Section::Items(items) if items.is_empty() => None,
        Section::Items(items) => Some(items.iter().map(|item| format!("• {}\n", item)).collect()),
        Section::Text(text) => Some(format!("{}\n", text)),
        Section::Value(value) if value.is_empty() => None,
        Section::Value(SectionValue::Text(text)) => Some(format!("{}\n", text)),
        Section::Value(SectionValue::List(items)) => {
            Some(items.iter().map(|item| format!("• {}\n", render_item(item))).collect())
        }
        Section::Value(SectionValue::Structured(map)) => {
            Some(format!("{}\n", pretty(&Value::Object(map.clone()))))
        }
        Section::Value(SectionValue::Other(value)) => Some(format!("{}\n", value)),
    }
}

fn render_item(item: &Value) -> String {
    match item {
        Value::String(text) => text.clone(),
        other => pretty(other),
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Short personalization summary shown next to the chat.
pub fn summarize_cv_context(data: Option<&ExtractedData>) -> String {
    let Some(data) = data else {
        return NO_CV_DATA.to_string();
    };

    let mut summary = String::new();

    if let Some(name) = data.name() {
        summary.push_str(&format!("**Name:** {}\n", name));
    }
    if let Some(sector) = data.sector() {
        summary.push_str(&format!("**Sector:** {}\n", sector));
    }
    if let Some(email) = data.email() {
        summary.push_str(&format!("**Email:** {}\n", email));
    }
    if let Some(experience) = data.experience() {
        let head: String = experience.chars().take(SUMMARY_EXPERIENCE_CHARS).collect();
        summary.push_str(&format!("**Experience:** {}...\n", head));
    }
    if let Some(skills) = data.skills() {
        let head = skills
            .iter()
            .take(SUMMARY_SKILLS)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        summary.push_str(&format!("**Skills:** {}\n", head));
    }

    if summary.is_empty() {
        CV_DATA_AVAILABLE.to_string()
    } else {
        summary
    }
}
