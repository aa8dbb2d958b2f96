// src/core/mod.rs
//! Shared plumbing: configuration, HTTP, SQLite and filesystem helpers

pub mod config_manager;
pub mod database;
pub mod fs_ops;
pub mod service_client;

pub use config_manager::ConfigManager;
pub use database::Database;
pub use fs_ops::FsOps;
pub use service_client::ServiceClient;
