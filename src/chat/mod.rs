// src/chat/mod.rs
//! Chat clients: HR assistant and the CV-aware Job Finder assistant

pub mod client;
pub mod context;
pub mod hr;
pub mod job_finder;
pub mod message;
pub mod session;
pub mod suggestions;

pub use client::{validate_query, ChatClient, DEFAULT_SEARCH_TOP_K, MAX_QUERY_CHARS};
pub use context::{apply_cv_context, ComplexityRule, ContextDecision};
pub use hr::HrChat;
pub use job_finder::JobFinderChat;
pub use message::{ChatMessage, MessageRole};
pub use session::{ChatBackend, ChatSession};
pub use suggestions::{suggested_questions, welcome_message};
