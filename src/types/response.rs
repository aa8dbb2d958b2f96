// src/types/response.rs
//! Wire types for the grading and chat services

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::types::cv_data::ExtractedData;

// ===== Grading service =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub extracted_data: Option<ExtractedData>,
    #[serde(default)]
    pub json_data: Option<ExtractedData>,
    /// Untouched response body, kept for the persisted CV record
    #[serde(skip)]
    pub raw: Value,
}

impl AnalysisResult {
    pub fn from_raw(raw: Value) -> Result<Self, serde_json::Error> {
        let mut result: AnalysisResult = serde_json::from_value(raw.clone())?;
        result.raw = raw;
        Ok(result)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingHealth {
    pub status: String,
    #[serde(default)]
    pub spacy_loaded: bool,
    #[serde(default)]
    pub classifier_loaded: bool,
    #[serde(default)]
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorInfo {
    pub sectors: BTreeMap<String, u64>,
    pub total_sectors: u64,
}

// ===== Chat service =====

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cv_context: Option<ExtractedData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cv_score: Option<f64>,
}

impl ChatRequest {
    pub fn new(query: &str) -> Self {
        Self {
            query: query.to_string(),
            ..Default::default()
        }
    }

    pub fn with_conversation_id(mut self, conversation_id: Option<String>) -> Self {
        self.conversation_id = conversation_id;
        self
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSource {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub preview: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default)]
    pub sources: Vec<ChatSource>,
    pub conversation_id: String,
    #[serde(default)]
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatHealth {
    pub status: String,
    #[serde(default)]
    pub vector_database_status: String,
    #[serde(default)]
    pub vector_database_count: u64,
    #[serde(default)]
    pub ollama_status: String,
    #[serde(default)]
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatStats {
    pub total_documents: u64,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub document_types: Vec<String>,
    #[serde(default)]
    pub collection_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: Option<String>,
    pub name: Option<String>,
    pub sector: Option<String>,
    pub email: Option<String>,
    pub instruction: Option<String>,
    pub response: Option<String>,
    pub content_preview: Option<String>,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    #[serde(default)]
    pub results: Vec<SearchResult>,
    pub count: u64,
}

// ===== Error bodies =====

/// Error payload of a non-2xx response, FastAPI style (`detail`) or plain
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub detail: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        match self.detail {
            Some(Value::String(detail)) if !detail.is_empty() => Some(detail),
            Some(Value::Null) | None => self.message.filter(|m| !m.is_empty()),
            Some(other) => Some(other.to_string()),
        }
    }
}
