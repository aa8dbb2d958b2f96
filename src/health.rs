// src/health.rs
//! Tri-state reachability indicator per backend

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use tracing::{info, warn};

use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Unknown,
    Healthy,
    Unhealthy,
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Unknown => "unknown",
            Self::Healthy => "healthy",
            Self::Unhealthy => "unhealthy",
        };
        f.pad(label)
    }
}

/// A backend that can report whether it is fit to serve requests.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    fn backend_name(&self) -> &str;

    /// `Ok(true)` only when the backend and its required subsystems report healthy.
    async fn report_healthy(&self) -> Result<bool, ClientError>;
}

/// Keeps the last observed state only; every check replaces it.
#[derive(Debug, Clone)]
pub struct HealthMonitor {
    backend: String,
    state: HealthState,
    last_checked: Option<DateTime<Utc>>,
}

impl HealthMonitor {
    pub fn new(backend: &str) -> Self {
        Self {
            backend: backend.to_string(),
            state: HealthState::Unknown,
            last_checked: None,
        }
    }

    pub fn backend(&self) -> &str {
        &self.backend
    }

    pub fn state(&self) -> HealthState {
        self.state
    }

    pub fn last_checked(&self) -> Option<DateTime<Utc>> {
        self.last_checked
    }

    /// `None` until the first check completes
    pub fn is_healthy(&self) -> Option<bool> {
        match self.state {
            HealthState::Unknown => None,
            HealthState::Healthy => Some(true),
            HealthState::Unhealthy => Some(false),
        }
    }

    /// Ask the backend; failures resolve to `Unhealthy`, never to an error.
    pub async fn check<P: HealthCheck + ?Sized>(&mut self, target: &P) -> HealthState {
        let state = match target.report_healthy().await {
            Ok(true) => HealthState::Healthy,
            Ok(false) => {
                warn!("{} reported a degraded status", target.backend_name());
                HealthState::Unhealthy
            }
            Err(e) => {
                warn!("{} health check failed: {}", target.backend_name(), e);
                HealthState::Unhealthy
            }
        };
        self.record(state);
        state
    }

    pub fn mark_healthy(&mut self) {
        if self.state != HealthState::Healthy {
            info!("{} marked healthy", self.backend);
        }
        self.record(HealthState::Healthy);
    }

    pub fn mark_unhealthy(&mut self) {
        if self.state != HealthState::Unhealthy {
            warn!("{} marked unhealthy", self.backend);
        }
        self.record(HealthState::Unhealthy);
    }

    /// Degraded-mode notice for the UI, only while unhealthy
    pub fn banner(&self) -> Option<String> {
        (self.state == HealthState::Unhealthy).then(|| {
            format!(
                "Backend Connection Issue: please ensure the {} is running.",
                self.backend
            )
        })
    }

    fn record(&mut self, state: HealthState) {
        self.state = state;
        self.last_checked = Some(Utc::now());
    }
}
