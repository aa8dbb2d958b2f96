// src/grading/client.rs
//! Client for the resume grading service

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::info;

use super::upload::CvUpload;
use crate::core::ServiceClient;
use crate::error::ClientError;
use crate::health::HealthCheck;
use crate::types::response::{AnalysisResult, GradingHealth, SectorInfo};

const GRADE_CV_ENDPOINT: &str = "/api/grade-cv";
const HEALTH_ENDPOINT: &str = "/api/health";
const SECTORS_ENDPOINT: &str = "/api/sectors";

pub const HEALTHY_STATUS: &str = "healthy";

#[derive(Debug, Clone)]
pub struct GradingClient {
    service: ServiceClient,
}

impl GradingClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        Ok(Self {
            service: ServiceClient::new(base_url, timeout)?,
        })
    }

    pub fn base_url(&self) -> &str {
        self.service.base_url()
    }

    /// Upload a resume and return the service's analysis. Type and size
    /// checks are the caller's job (see [`CvUpload::validate`]).
    pub async fn grade_cv(&self, upload: CvUpload) -> Result<AnalysisResult, ClientError> {
        let file_name = upload.file_name.clone();
        info!(
            "Calling grading service for {} ({} bytes)",
            file_name,
            upload.size()
        );

        let raw: Value = self
            .service
            .post_multipart(GRADE_CV_ENDPOINT, upload.into_form()?)
            .await?;

        let result = AnalysisResult::from_raw(raw)
            .map_err(|e| ClientError::Decode(format!("Unexpected grading response: {}", e)))?;

        info!(
            "Graded {}: success={} score={:?} sector={:?}",
            file_name, result.success, result.score, result.sector
        );
        Ok(result)
    }

    pub async fn check_health(&self) -> Result<GradingHealth, ClientError> {
        self.service.get(HEALTH_ENDPOINT).await
    }

    /// Sectors known to the grader with their CV counts
    pub async fn available_sectors(&self) -> Result<SectorInfo, ClientError> {
        self.service.get(SECTORS_ENDPOINT).await
    }
}

#[async_trait]
impl HealthCheck for GradingClient {
    fn backend_name(&self) -> &str {
        "grading service"
    }

    async fn report_healthy(&self) -> Result<bool, ClientError> {
        let health = self.check_health().await?;
        Ok(health.status == HEALTHY_STATUS)
    }
}
