// src/types/profile.rs
//! Session and profile records kept in the local store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Hr,
    JobFinder,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hr => "hr",
            Self::JobFinder => "job_finder",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub role: Role,
    /// Username for HR, email for Job Finder
    pub identity: String,
    pub is_valid: bool,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(role: Role, identity: &str) -> Self {
        Self {
            role,
            identity: identity.to_string(),
            is_valid: true,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HrCredentials {
    pub username: String,
    pub company_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

/// Partial update applied to the stored HR credentials
#[derive(Debug, Clone, Default)]
pub struct HrProfileUpdate {
    pub company_name: Option<String>,
    pub profile_image: Option<String>,
}

impl HrCredentials {
    pub fn apply(&mut self, update: HrProfileUpdate) {
        if let Some(company_name) = update.company_name {
            self.company_name = company_name;
        }
        if let Some(profile_image) = update.profile_image {
            self.profile_image = Some(profile_image);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobFinderProfile {
    pub full_name: String,
    pub email: String,
    /// Plaintext, local mock login only
    pub password: String,
    pub age: u32,
    pub degree: String,
    pub college: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

impl JobFinderProfile {
    pub fn matches_login(&self, email: &str, password: &str) -> bool {
        self.email.trim().eq_ignore_ascii_case(email.trim()) && self.password == password
    }
}
