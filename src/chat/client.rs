// src/chat/client.rs
//! Client for the retrieval-augmented chat service

use async_trait::async_trait;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::core::ServiceClient;
use crate::error::ClientError;
use crate::health::HealthCheck;
use crate::types::response::{ChatHealth, ChatRequest, ChatResponse, ChatStats, SearchResponse};

const CHAT_ENDPOINT: &str = "/api/chat";
const HEALTH_ENDPOINT: &str = "/api/health";
const STATS_ENDPOINT: &str = "/api/stats";
const SEARCH_ENDPOINT: &str = "/api/search";

/// Longest query the chat service accepts
pub const MAX_QUERY_CHARS: usize = 1000;
pub const DEFAULT_SEARCH_TOP_K: u32 = 5;

/// Retrieval depth accepted by `/api/chat`
pub const MIN_TOP_K: u32 = 1;
pub const MAX_TOP_K: u32 = 5;

const HEALTHY_STATUS: &str = "healthy";

/// Trim and bound a query before it is sent anywhere.
pub fn validate_query(query: &str) -> Result<&str, ClientError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(ClientError::Validation("Query must not be empty".to_string()));
    }
    if trimmed.chars().count() > MAX_QUERY_CHARS {
        return Err(ClientError::Validation(format!(
            "Query must be at most {} characters",
            MAX_QUERY_CHARS
        )));
    }
    Ok(trimmed)
}

#[derive(Debug, Clone)]
pub struct ChatClient {
    service: ServiceClient,
    name: String,
}

impl ChatClient {
    pub fn new(name: &str, base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        Ok(Self {
            service: ServiceClient::new(base_url, timeout)?,
            name: name.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        self.service.base_url()
    }

    pub async fn send_message(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError> {
        self.send_message_with_cancel(request, None).await
    }

    /// Send a chat request. A fired token aborts the in-flight call with
    /// [`ClientError::Cancelled`]; the client timeout yields [`ClientError::Timeout`].
    pub async fn send_message_with_cancel(
        &self,
        request: &ChatRequest,
        cancel: Option<&CancellationToken>,
    ) -> Result<ChatResponse, ClientError> {
        validate_query(&request.query)?;

        info!(
            "Calling {} (top_k={:?}, cv_context={}, conversation={:?})",
            self.name,
            request.top_k,
            request.cv_context.is_some(),
            request.conversation_id
        );

        let call = self.service.post_json::<_, ChatResponse>(CHAT_ENDPOINT, request);

        match cancel {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        warn!("{} request cancelled", self.name);
                        Err(ClientError::Cancelled)
                    }
                    result = call => result,
                }
            }
            None => call.await,
        }
    }

    pub async fn check_health(&self) -> Result<ChatHealth, ClientError> {
        self.service.get(HEALTH_ENDPOINT).await
    }

    pub async fn stats(&self) -> Result<ChatStats, ClientError> {
        self.service.get(STATS_ENDPOINT).await
    }

    /// Retrieval only, no generated answer
    pub async fn search(&self, query: &str, top_k: u32) -> Result<SearchResponse, ClientError> {
        let query = validate_query(query)?;
        let top_k = top_k.to_string();
        self.service
            .get_with_query(SEARCH_ENDPOINT, &[("query", query), ("top_k", top_k.as_str())])
            .await
    }
}

#[async_trait]
impl HealthCheck for ChatClient {
    fn backend_name(&self) -> &str {
        &self.name
    }

    /// The chat service is only usable when its LLM runtime is up as well.
    async fn report_healthy(&self) -> Result<bool, ClientError> {
        let health = self.check_health().await?;
        Ok(health.status == HEALTHY_STATUS && health.ollama_status == HEALTHY_STATUS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_query_trims() {
        assert_eq!(validate_query("  hello \n").unwrap(), "hello");
    }

    #[test]
    fn test_validate_query_rejects_blank_and_long() {
        assert!(matches!(validate_query("   "), Err(ClientError::Validation(_))));
        assert!(validate_query(&"a".repeat(MAX_QUERY_CHARS)).is_ok());
        assert!(validate_query(&"a".repeat(MAX_QUERY_CHARS + 1)).is_err());
    }

    #[tokio::test]
    async fn test_blank_query_never_hits_network() {
        // Port 9 (discard) is never contacted: validation fails first
        let client = ChatClient::new("chat service", "http://127.0.0.1:9", Duration::from_secs(1))
            .unwrap();
        let err = client.send_message(&ChatRequest::new(" ")).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[tokio::test]
    async fn test_cancelled_token_short_circuits() {
        let client = ChatClient::new("chat service", "http://10.255.255.1:81", Duration::from_secs(30))
            .unwrap();
        let token = CancellationToken::new();
        token.cancel();
        let err = client
            .send_message_with_cancel(&ChatRequest::new("hello"), Some(&token))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Cancelled));
    }
}
