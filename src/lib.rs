//! Client-side orchestration for CV scoring and career chat: a local
//! session/profile store, the grading and chat service clients, and the
//! health indicators shown next to them.

pub mod chat;
pub mod cli;
pub mod core;
pub mod error;
pub mod grading;
pub mod health;
pub mod store;
pub mod types;
pub mod utils;

pub use chat::{ChatClient, ChatSession, HrChat, JobFinderChat};
pub use error::{ClientError, FlowError, StoreError};
pub use grading::{CvAnalysisFlow, Grade, GradingClient};
pub use health::{HealthCheck, HealthMonitor, HealthState};
pub use store::{KeyValueStore, LocalStore, MemoryStore};
