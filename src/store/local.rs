// src/store/local.rs
//! Typed schema over the key-value store: sessions, profiles, last CV

use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use super::KeyValueStore;
use crate::error::StoreError;
use crate::types::cv_data::CvData;
use crate::types::profile::{HrCredentials, HrProfileUpdate, JobFinderProfile, Role, Session};

/// Fixed storage keys, one JSON document each
pub mod keys {
    pub const HR_SESSION: &str = "hr_session";
    pub const HR_CREDENTIALS: &str = "hr_credentials";
    pub const JOB_FINDER_SESSION: &str = "job_finder_session";
    pub const JOB_FINDER_PROFILE: &str = "job_finder_profile";
    pub const CV_DATA: &str = "cv_data";
}

fn session_key(role: Role) -> &'static str {
    match role {
        Role::Hr => keys::HR_SESSION,
        Role::JobFinder => keys::JOB_FINDER_SESSION,
    }
}

#[derive(Clone)]
pub struct LocalStore {
    kv: Arc<dyn KeyValueStore>,
}

impl LocalStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    async fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.kv.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        self.kv.set(key, &raw).await?;
        debug!("Stored {}", key);
        Ok(())
    }

    // ===== Sessions =====

    pub async fn session(&self, role: Role) -> Result<Option<Session>, StoreError> {
        let session: Option<Session> = self.read(session_key(role)).await?;
        Ok(session.filter(|s| s.is_valid))
    }

    /// Entry gate for every dashboard, profile and chat operation
    pub async fn require_session(&self, role: Role) -> Result<Session, StoreError> {
        self.session(role)
            .await?
            .ok_or(StoreError::NotAuthenticated(role))
    }

    pub async fn logout(&self, role: Role) -> Result<(), StoreError> {
        self.kv.remove(session_key(role)).await?;
        info!("Cleared {} session", role);
        Ok(())
    }

    // ===== HR =====

    /// Record the HR account and open a session for it
    pub async fn login_hr(&self, credentials: &HrCredentials) -> Result<Session, StoreError> {
        let session = Session::new(Role::Hr, &credentials.username);
        self.write(keys::HR_CREDENTIALS, credentials).await?;
        self.write(keys::HR_SESSION, &session).await?;
        info!("HR session opened for {}", credentials.username);
        Ok(session)
    }

    pub async fn hr_credentials(&self) -> Result<Option<HrCredentials>, StoreError> {
        self.read(keys::HR_CREDENTIALS).await
    }

    pub async fn update_hr_profile(
        &self,
        username: &str,
        update: HrProfileUpdate,
    ) -> Result<HrCredentials, StoreError> {
        let mut credentials = self
            .hr_credentials()
            .await?
            .filter(|c| c.username == username)
            .ok_or(StoreError::ProfileNotFound)?;
        credentials.apply(update);
        self.write(keys::HR_CREDENTIALS, &credentials).await?;
        Ok(credentials)
    }

    // ===== Job Finder =====

    pub async fn job_finder_profile(&self) -> Result<Option<JobFinderProfile>, StoreError> {
        self.read(keys::JOB_FINDER_PROFILE).await
    }

    /// Single-user store: a second signup is refused
    pub async fn signup_job_finder(
        &self,
        profile: &JobFinderProfile,
    ) -> Result<Session, StoreError> {
        if self.job_finder_profile().await?.is_some() {
            return Err(StoreError::AccountExists);
        }
        self.write(keys::JOB_FINDER_PROFILE, profile).await?;
        let session = Session::new(Role::JobFinder, &profile.email);
        self.write(keys::JOB_FINDER_SESSION, &session).await?;
        info!("Job finder account created for {}", profile.email);
        Ok(session)
    }

    pub async fn login_job_finder(
        &self,
        email: &str,
        password: &str,
    ) -> Result<JobFinderProfile, StoreError> {
        let profile = self
            .job_finder_profile()
            .await?
            .filter(|p| p.matches_login(email, password))
            .ok_or(StoreError::InvalidCredentials)?;
        self.write(
            keys::JOB_FINDER_SESSION,
            &Session::new(Role::JobFinder, &profile.email),
        )
        .await?;
        Ok(profile)
    }

    pub async fn update_job_finder_profile(
        &self,
        profile: &JobFinderProfile,
    ) -> Result<(), StoreError> {
        if self.job_finder_profile().await?.is_none() {
            return Err(StoreError::ProfileNotFound);
        }
        self.write(keys::JOB_FINDER_PROFILE, profile).await
    }

    // ===== CV data =====

    pub async fn cv_data(&self) -> Result<Option<CvData>, StoreError> {
        self.read(keys::CV_DATA).await
    }

    pub async fn save_cv_data(&self, cv_data: &CvData) -> Result<(), StoreError> {
        self.write(keys::CV_DATA, cv_data).await?;
        info!(
            "Saved CV analysis for {} (score {})",
            cv_data.file_name, cv_data.score
        );
        Ok(())
    }

    pub async fn clear_cv_data(&self) -> Result<(), StoreError> {
        self.kv.remove(keys::CV_DATA).await
    }

    /// Drop every persisted record
    pub async fn reset(&self) -> Result<(), StoreError> {
        self.kv.clear().await
    }
}
