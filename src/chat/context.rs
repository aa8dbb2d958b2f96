// src/chat/context.rs
//! When to attach the candidate's CV to a chat request
//!
//! Attaching CV context personalizes the answer but slows the backend down.
//! Queries that already ask for long-form answers skip it; everything else
//! carries the extracted fields and score. Retrieval is pinned to one
//! document either way.

use serde::{Deserialize, Serialize};

use crate::types::cv_data::CvData;
use crate::types::response::ChatRequest;

/// Documents retrieved per Job Finder query
pub const JOB_FINDER_TOP_K: u32 = 1;

pub const DEFAULT_COMPLEX_KEYWORDS: &[&str] = &[
    "improve",
    "detailed",
    "comprehensive",
    "explain",
    "how to",
    "what should",
    "recommend",
];

/// Case-insensitive substring predicate over a fixed keyword list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexityRule {
    keywords: Vec<String>,
}

impl Default for ComplexityRule {
    fn default() -> Self {
        Self::new(DEFAULT_COMPLEX_KEYWORDS.iter().copied())
    }
}

impl ComplexityRule {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn is_complex(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.keywords.iter().any(|keyword| query.contains(keyword.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextDecision {
    NoCvData,
    /// Caller supplied its own context
    AlreadyProvided,
    SkippedComplex,
    Attached,
}

/// Shape an outgoing Job Finder request in place.
pub fn apply_cv_context(
    request: &mut ChatRequest,
    cv_data: Option<&CvData>,
    rule: &ComplexityRule,
) -> ContextDecision {
    let decision = match cv_data {
        None => ContextDecision::NoCvData,
        Some(_) if request.cv_context.is_some() => ContextDecision::AlreadyProvided,
        Some(_) if rule.is_complex(&request.query) => ContextDecision::SkippedComplex,
        Some(cv) => {
            request.cv_context = Some(cv.extracted_data.clone());
            request.cv_score = Some(cv.score);
            ContextDecision::Attached
        }
    };

    request.top_k = Some(JOB_FINDER_TOP_K);
    decision
}
