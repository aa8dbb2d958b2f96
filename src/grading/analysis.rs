// src/grading/analysis.rs
//! Upload → grade → persist, as driven by the Job Finder dashboard

use tracing::{error, info};

use super::client::GradingClient;
use super::grade::Grade;
use super::upload::CvUpload;
use crate::error::{ClientError, FlowError};
use crate::health::{HealthCheck, HealthMonitor, HealthState};
use crate::store::LocalStore;
use crate::types::cv_data::CvData;
use crate::types::profile::Role;
use crate::types::response::AnalysisResult;

const DEFAULT_FAILURE_MESSAGE: &str = "Failed to analyze CV";

#[derive(Debug, Clone)]
pub struct CvAnalysis {
    pub cv_data: CvData,
    pub grade: Grade,
    pub result: AnalysisResult,
}

impl CvAnalysis {
    /// One-line toast text, e.g. `CV analyzed! Score: 82/100 (A)`
    pub fn summary(&self) -> String {
        format!(
            "CV analyzed! Score: {}/100 ({})",
            self.cv_data.score, self.grade
        )
    }
}

pub struct CvAnalysisFlow {
    client: GradingClient,
    store: LocalStore,
    health: HealthMonitor,
}

impl CvAnalysisFlow {
    pub fn new(client: GradingClient, store: LocalStore) -> Self {
        let health = HealthMonitor::new(client.backend_name());
        Self {
            client,
            store,
            health,
        }
    }

    pub fn health(&self) -> &HealthMonitor {
        &self.health
    }

    pub async fn check_health(&mut self) -> HealthState {
        self.health.check(&self.client).await
    }

    /// Validate, grade and store. Any failure leaves the previously stored
    /// CV data untouched.
    pub async fn submit(&mut self, upload: CvUpload) -> Result<CvAnalysis, FlowError> {
        self.store.require_session(Role::JobFinder).await?;
        upload.validate()?;

        let file_name = upload.file_name.clone();
        let result = match self.client.grade_cv(upload).await {
            Ok(result) => {
                self.health.mark_healthy();
                result
            }
            Err(e) => {
                error!("Error grading CV {}: {}", file_name, e);
                if e.is_retryable() {
                    self.health.mark_unhealthy();
                }
                return Err(e.into());
            }
        };

        if !result.success {
            let message = if result.message.trim().is_empty() {
                DEFAULT_FAILURE_MESSAGE.to_string()
            } else {
                result.message.clone()
            };
            return Err(ClientError::AnalysisFailed(message).into());
        }

        let cv_data = CvData::from_analysis(&file_name, &result);
        self.store.save_cv_data(&cv_data).await?;

        let grade = cv_data.grade();
        info!("CV {} graded {} ({})", file_name, cv_data.score, grade);
        Ok(CvAnalysis {
            cv_data,
            grade,
            result,
        })
    }
}
