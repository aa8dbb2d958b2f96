// src/grading/mod.rs
//! Resume grading: upload validation, service client, grade mapping, formatting

pub mod analysis;
pub mod client;
pub mod format;
pub mod grade;
pub mod upload;

pub use analysis::{CvAnalysis, CvAnalysisFlow};
pub use client::GradingClient;
pub use format::{format_cv_data, summarize_cv_context};
pub use grade::Grade;
pub use upload::{validate_upload, CvUpload};
