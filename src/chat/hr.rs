// src/chat/hr.rs
//! HR assistant: general recruiting questions over the knowledge base

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::client::{ChatClient, MAX_TOP_K, MIN_TOP_K};
use super::session::{ChatBackend, CANCELLED_MESSAGE};
use crate::error::ClientError;
use crate::types::response::{ChatRequest, ChatResponse};

pub const HR_TOP_K: u32 = 5;

pub const HR_APOLOGY: &str = "I apologize, but I'm having trouble connecting to the AI service. Please ensure the backend server is running and Ollama is available.";

const HR_WELCOME: &str = "Hello! I'm your HR assistant. Ask me about candidates, recruiting practices, or hiring in any sector.";

/// Keeps the backend's conversation id across turns
pub struct HrChat {
    client: ChatClient,
    top_k: u32,
    conversation_id: Option<String>,
}

impl HrChat {
    pub fn new(client: ChatClient) -> Self {
        Self {
            client,
            top_k: HR_TOP_K,
            conversation_id: None,
        }
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = top_k.clamp(MIN_TOP_K, MAX_TOP_K);
        self
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    pub fn build_request(&self, query: &str) -> ChatRequest {
        ChatRequest::new(query)
            .with_conversation_id(self.conversation_id.clone())
            .with_top_k(self.top_k)
    }
}

#[async_trait]
impl ChatBackend for HrChat {
    fn client(&self) -> &ChatClient {
        &self.client
    }

    async fn ask(
        &mut self,
        query: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<ChatResponse, ClientError> {
        let request = self.build_request(query);
        let response = self.client.send_message_with_cancel(&request, cancel).await?;
        if !response.conversation_id.is_empty() {
            debug!("HR conversation {}", response.conversation_id);
            self.conversation_id = Some(response.conversation_id.clone());
        }
        Ok(response)
    }

    fn failure_message(&self, err: &ClientError) -> String {
        match err {
            ClientError::Cancelled => CANCELLED_MESSAGE.to_string(),
            _ => HR_APOLOGY.to_string(),
        }
    }

    async fn welcome(&self) -> Option<String> {
        Some(HR_WELCOME.to_string())
    }

    fn reset(&mut self) {
        self.conversation_id = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn chat() -> HrChat {
        HrChat::new(
            ChatClient::new("chat service", "http://127.0.0.1:9", Duration::from_secs(1)).unwrap(),
        )
    }

    #[test]
    fn test_first_request_has_no_conversation() {
        let request = chat().build_request("Who should I hire?");
        assert_eq!(request.top_k, Some(HR_TOP_K));
        assert!(request.conversation_id.is_none());
        assert!(request.cv_context.is_none());
    }

    #[test]
    fn test_reset_forgets_conversation() {
        let mut hr = chat().with_top_k(0);
        hr.conversation_id = Some("abc".into());
        assert_eq!(hr.build_request("next").conversation_id.as_deref(), Some("abc"));
        assert_eq!(hr.build_request("next").top_k, Some(1));
        assert_eq!(chat().with_top_k(10).build_request("q").top_k, Some(MAX_TOP_K));

        hr.reset();
        assert!(hr.conversation_id().is_none());
    }

    #[test]
    fn test_failure_messages() {
        let hr = chat();
        assert_eq!(hr.failure_message(&ClientError::Timeout(25)), HR_APOLOGY);
        assert_eq!(hr.failure_message(&ClientError::Cancelled), CANCELLED_MESSAGE);
    }
}
