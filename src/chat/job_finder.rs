// src/chat/job_finder.rs
//! Career assistant for the signed-in candidate, personalized by the last CV
//! analysis in the local store.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::client::{validate_query, ChatClient};
use super::context::{apply_cv_context, ComplexityRule, ContextDecision};
use super::session::{ChatBackend, CANCELLED_MESSAGE};
use super::suggestions::{suggested_questions, welcome_message};
use crate::error::ClientError;
use crate::grading::format::summarize_cv_context;
use crate::store::LocalStore;
use crate::types::cv_data::CvData;
use crate::types::response::{ChatRequest, ChatResponse};

pub const JOB_FINDER_APOLOGY: &str =
    "I'm having trouble connecting right now. Please ensure the AI backend is running and try again.";

pub const TIMEOUT_MESSAGE: &str =
    "The AI is taking longer than expected. Try asking a simpler question for a faster response.";

pub struct JobFinderChat {
    client: ChatClient,
    store: LocalStore,
    rule: ComplexityRule,
}

impl JobFinderChat {
    pub fn new(client: ChatClient, store: LocalStore) -> Self {
        Self {
            client,
            store,
            rule: ComplexityRule::default(),
        }
    }

    pub fn with_rule(mut self, rule: ComplexityRule) -> Self {
        self.rule = rule;
        self
    }

    /// Last analyzed CV. An unreadable record is treated as absent.
    pub async fn current_cv(&self) -> Option<CvData> {
        match self.store.cv_data().await {
            Ok(cv) => cv,
            Err(e) => {
                warn!("Ignoring unreadable CV record: {}", e);
                None
            }
        }
    }

    pub fn prepare_request(
        &self,
        mut request: ChatRequest,
        cv_data: Option<&CvData>,
    ) -> (ChatRequest, ContextDecision) {
        let decision = apply_cv_context(&mut request, cv_data, &self.rule);
        (request, decision)
    }

    pub async fn send_message(
        &self,
        request: ChatRequest,
        cancel: Option<&CancellationToken>,
    ) -> Result<ChatResponse, ClientError> {
        let mut request = request;
        request.query = validate_query(&request.query)?.to_string();

        let cv = self.current_cv().await;
        let (request, decision) = self.prepare_request(request, cv.as_ref());
        debug!("CV context decision: {:?}", decision);
        self.client.send_message_with_cancel(&request, cancel).await
    }

    pub async fn suggested_questions(&self) -> Vec<String> {
        suggested_questions(self.current_cv().await.as_ref())
    }

    pub async fn cv_summary(&self) -> String {
        let cv = self.current_cv().await;
        summarize_cv_context(cv.as_ref().map(|c| &c.extracted_data))
    }
}

#[async_trait]
impl ChatBackend for JobFinderChat {
    fn client(&self) -> &ChatClient {
        &self.client
    }

    async fn ask(
        &mut self,
        query: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<ChatResponse, ClientError> {
        self.send_message(ChatRequest::new(query), cancel).await
    }

    fn failure_message(&self, err: &ClientError) -> String {
        match err {
            ClientError::Timeout(_) => TIMEOUT_MESSAGE.to_string(),
            ClientError::Cancelled => CANCELLED_MESSAGE.to_string(),
            _ => JOB_FINDER_APOLOGY.to_string(),
        }
    }

    async fn welcome(&self) -> Option<String> {
        Some(welcome_message(self.current_cv().await.as_ref()))
    }
}
