// src/types/mod.rs
pub mod cv_data;
pub mod profile;
pub mod response;

pub use cv_data::{CvData, ExtractedData, SectionValue};
pub use profile::{HrCredentials, HrProfileUpdate, JobFinderProfile, Role, Session};
pub use response::{
    AnalysisResult, ChatHealth, ChatRequest, ChatResponse, ChatSource, ChatStats, GradingHealth,
    SearchResponse, SearchResult, SectorInfo,
};
