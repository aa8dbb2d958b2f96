// src/chat/session.rs
//! Transcript controller: one conversation thread, one request at a time

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use super::client::{validate_query, ChatClient};
use super::message::ChatMessage;
use crate::error::ClientError;
use crate::health::{HealthCheck, HealthMonitor, HealthState};
use crate::types::response::{ChatResponse, ChatSource};

pub const CANCELLED_MESSAGE: &str = "Request cancelled. Ask again whenever you're ready.";

/// A chat variant: how requests are built and how failures read to the user.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    fn client(&self) -> &ChatClient;

    async fn ask(
        &mut self,
        query: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<ChatResponse, ClientError>;

    /// Assistant text shown in place of a failed answer
    fn failure_message(&self, err: &ClientError) -> String;

    async fn welcome(&self) -> Option<String> {
        None
    }

    /// Forget conversation state kept between turns
    fn reset(&mut self) {}
}

pub struct ChatSession<B: ChatBackend> {
    backend: B,
    messages: Vec<ChatMessage>,
    sources: Vec<ChatSource>,
    health: HealthMonitor,
    last_error: Option<ClientError>,
}

impl<B: ChatBackend> ChatSession<B> {
    /// Open a session and post the backend's welcome turn, if any
    pub async fn start(backend: B) -> Self {
        let health = HealthMonitor::new(backend.client().backend_name());
        let mut session = Self {
            backend,
            messages: Vec::new(),
            sources: Vec::new(),
            health,
            last_error: None,
        };
        session.post_welcome().await;
        session
    }

    async fn post_welcome(&mut self) {
        if let Some(welcome) = self.backend.welcome().await {
            self.messages.push(ChatMessage::assistant(&welcome));
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Citations of the last successful answer
    pub fn sources(&self) -> &[ChatSource] {
        &self.sources
    }

    pub fn health(&self) -> &HealthMonitor {
        &self.health
    }

    pub fn last_error(&self) -> Option<&ClientError> {
        self.last_error.as_ref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub async fn check_health(&mut self) -> HealthState {
        self.health.check(self.backend.client()).await
    }

    /// Append the user's turn and the assistant's reply. Only a blank or
    /// oversized query is returned as an error; service failures become an
    /// assistant turn and flip the health indicator.
    pub async fn submit(
        &mut self,
        input: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<&ChatMessage, ClientError> {
        let query = validate_query(input)?.to_string();

        self.messages.push(ChatMessage::user(&query));
        self.sources.clear();
        self.last_error = None;

        let reply = match self.backend.ask(&query, cancel).await {
            Ok(response) => {
                if self.health.state() == HealthState::Unhealthy {
                    self.health.mark_healthy();
                }
                info!("Received answer with {} sources", response.sources.len());
                self.sources = response.sources;
                ChatMessage::assistant(&response.response)
            }
            Err(e) => {
                error!("Error sending message: {}", e);
                let content = self.backend.failure_message(&e);
                if !matches!(e, ClientError::Cancelled) {
                    self.health.mark_unhealthy();
                }
                self.last_error = Some(e);
                ChatMessage::assistant(&content)
            }
        };

        self.messages.push(reply);
        Ok(&self.messages[self.messages.len() - 1])
    }

    /// Clear the transcript and start over with a fresh welcome
    pub async fn reset(&mut self) {
        self.messages.clear();
        self.sources.clear();
        self.last_error = None;
        self.backend.reset();
        self.post_welcome().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::message::MessageRole;
    use std::collections::VecDeque;
    use std::time::Duration;

    struct ScriptedBackend {
        client: ChatClient,
        replies: VecDeque<Result<ChatResponse, ClientError>>,
        asked: Vec<String>,
        resets: usize,
    }

    impl ScriptedBackend {
        fn new(replies: Vec<Result<ChatResponse, ClientError>>) -> Self {
            Self {
                client: ChatClient::new("chat service", "http://127.0.0.1:9", Duration::from_secs(1))
                    .unwrap(),
                replies: replies.into(),
                asked: Vec::new(),
                resets: 0,
            }
        }
    }

    #[async_trait]
    impl ChatBackend for ScriptedBackend {
        fn client(&self) -> &ChatClient {
            &self.client
        }

        async fn ask(
            &mut self,
            query: &str,
            _cancel: Option<&CancellationToken>,
        ) -> Result<ChatResponse, ClientError> {
            self.asked.push(query.to_string());
            self.replies
                .pop_front()
                .unwrap_or_else(|| Err(ClientError::Network("script exhausted".into())))
        }

        fn failure_message(&self, _err: &ClientError) -> String {
            "sorry".to_string()
        }

        async fn welcome(&self) -> Option<String> {
            Some("hi".to_string())
        }

        fn reset(&mut self) {
            self.resets += 1;
        }
    }

    fn answer(text: &str) -> ChatResponse {
        ChatResponse {
            response: text.to_string(),
            sources: vec![ChatSource {
                title: "Guide".into(),
                source: "guide.pdf".into(),
                category: "career".into(),
                url: String::new(),
                preview: "...".into(),
            }],
            conversation_id: "c1".into(),
            timestamp: "2026-01-01T00:00:00".into(),
        }
    }

    #[tokio::test]
    async fn test_failure_becomes_assistant_turn_and_recovers() {
        let backend = ScriptedBackend::new(vec![
            Err(ClientError::Backend {
                status: 500,
                message: "boom".into(),
            }),
            Ok(answer("Here you go")),
        ]);
        let mut session = ChatSession::start(backend).await;
        assert_eq!(session.messages().len(), 1);

        let reply = session.submit("  first  ", None).await.unwrap();
        assert_eq!(reply.content, "sorry");
        assert_eq!(reply.role, MessageRole::Assistant);
        assert_eq!(session.health().state(), HealthState::Unhealthy);
        assert!(session.last_error().is_some());
        assert!(session.sources().is_empty());

        let reply = session.submit("second", None).await.unwrap();
        assert_eq!(reply.content, "Here you go");
        assert_eq!(session.health().state(), HealthState::Healthy);
        assert_eq!(session.sources().len(), 1);
        assert!(session.last_error().is_none());

        assert_eq!(session.backend().asked, vec!["first", "second"]);
        assert_eq!(session.messages().len(), 5);
        assert_eq!(session.messages()[1].content, "first");
    }

    #[tokio::test]
    async fn test_blank_input_is_rejected_without_turns() {
        let mut session = ChatSession::start(ScriptedBackend::new(vec![])).await;
        assert!(matches!(
            session.submit("   ", None).await,
            Err(ClientError::Validation(_))
        ));
        assert_eq!(session.messages().len(), 1);
        assert!(session.backend().asked.is_empty());
    }

    #[tokio::test]
    async fn test_cancel_does_not_flip_health() {
        let backend = ScriptedBackend::new(vec![Err(ClientError::Cancelled)]);
        let mut session = ChatSession::start(backend).await;
        session.submit("hello", None).await.unwrap();
        assert_eq!(session.health().state(), HealthState::Unknown);
    }

    #[tokio::test]
    async fn test_success_from_unknown_keeps_unknown() {
        let backend = ScriptedBackend::new(vec![Ok(answer("ok"))]);
        let mut session = ChatSession::start(backend).await;
        session.submit("hello", None).await.unwrap();
        assert_eq!(session.health().state(), HealthState::Unknown);
    }

    #[tokio::test]
    async fn test_reset_restores_welcome() {
        let backend = ScriptedBackend::new(vec![Ok(answer("ok"))]);
        let mut session = ChatSession::start(backend).await;
        session.submit("hello", None).await.unwrap();
        session.reset().await;
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].content, "hi");
        assert!(session.sources().is_empty());
        assert_eq!(session.backend().resets, 1);
    }
}
