mod common;

use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use common::{captured, closed_port, serve, timeout, Captured};
use cv_pilot::chat::job_finder::{JOB_FINDER_APOLOGY, TIMEOUT_MESSAGE};
use cv_pilot::chat::hr::HR_APOLOGY;
use cv_pilot::chat::{ChatClient, ChatSession, HrChat, JobFinderChat};
use cv_pilot::health::{HealthMonitor, HealthState};
use cv_pilot::store::{LocalStore, MemoryStore};
use cv_pilot::types::{ChatRequest, CvData, ExtractedData};
use cv_pilot::ClientError;

async fn chat_echo(State(seen): State<Captured<Value>>, Json(body): Json<Value>) -> Json<Value> {
    let turn = {
        let mut seen = seen.lock().unwrap();
        seen.push(body);
        seen.len()
    };
    Json(json!({
        "response": format!("answer {}", turn),
        "sources": [{
            "title": "Salary guide",
            "source": "salary.pdf",
            "category": "compensation",
            "url": "",
            "preview": "Median pay..."
        }],
        "conversation_id": "conv-1",
        "timestamp": "2026-10-19T10:00:00"
    }))
}

async fn chat_server() -> (String, Captured<Value>) {
    let seen = captured();
    let app = Router::new()
        .route("/api/chat", post(chat_echo))
        .with_state(seen.clone());
    (serve(app).await, seen)
}

fn stored_cv() -> CvData {
    CvData {
        file_name: "jane.pdf".into(),
        score: 72.0,
        analysis: json!({ "success": true }),
        extracted_data: ExtractedData {
            name: Some("Jane Doe".into()),
            sector: Some("Engineering".into()),
            skills: Some(vec!["Rust".into()]),
            ..Default::default()
        },
        uploaded_at: Utc::now(),
    }
}

async fn job_finder(base_url: &str, chat_timeout: Duration) -> (JobFinderChat, LocalStore) {
    let store = LocalStore::new(Arc::new(MemoryStore::new()));
    let client = ChatClient::new("Job Finder chat service", base_url, chat_timeout).unwrap();
    (JobFinderChat::new(client, store.clone()), store)
}

#[tokio::test]
async fn test_job_finder_context_heuristic_on_the_wire() {
    let (url, seen) = chat_server().await;
    let (chat, store) = job_finder(&url, timeout()).await;
    store.save_cv_data(&stored_cv()).await.unwrap();

    chat.send_message(ChatRequest::new("How can I improve my CV?"), None)
        .await
        .unwrap();
    chat.send_message(ChatRequest::new("What is a good salary"), None)
        .await
        .unwrap();

    let bodies = seen.lock().unwrap().clone();
    assert_eq!(bodies.len(), 2);

    assert_eq!(bodies[0]["top_k"], 1);
    assert!(bodies[0].get("cv_context").is_none());
    assert!(bodies[0].get("cv_score").is_none());

    assert_eq!(bodies[1]["top_k"], 1);
    assert_eq!(bodies[1]["cv_context"]["Name"], "Jane Doe");
    assert_eq!(bodies[1]["cv_context"]["Sector"], "Engineering");
    assert_eq!(bodies[1]["cv_score"], 72.0);
    assert!(bodies[1].get("conversation_id").is_none());
}

#[tokio::test]
async fn test_job_finder_without_cv_sends_bare_query() {
    let (url, seen) = chat_server().await;
    let (chat, _store) = job_finder(&url, timeout()).await;

    chat.send_message(ChatRequest::new("What is a good salary"), None)
        .await
        .unwrap();
    let bodies = seen.lock().unwrap().clone();
    assert_eq!(bodies[0], json!({ "query": "What is a good salary", "top_k": 1 }));
}

#[tokio::test]
async fn test_job_finder_trims_query_before_sending() {
    let (url, seen) = chat_server().await;
    let (chat, store) = job_finder(&url, timeout()).await;
    store.save_cv_data(&stored_cv()).await.unwrap();

    chat.send_message(ChatRequest::new("  What is a good salary \n"), None)
        .await
        .unwrap();
    let err = chat
        .send_message(ChatRequest::new("   "), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));

    let bodies = seen.lock().unwrap().clone();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["query"], "What is a good salary");
    assert_eq!(bodies[0]["cv_context"]["Name"], "Jane Doe");
}

#[tokio::test]
async fn test_hr_session_keeps_conversation_until_reset() {
    let (url, seen) = chat_server().await;
    let client = ChatClient::new("HR chat service", &url, timeout()).unwrap();
    let mut session = ChatSession::start(HrChat::new(client)).await;

    let reply = session.submit("Who is hiring?", None).await.unwrap();
    assert_eq!(reply.content, "answer 1");
    assert_eq!(session.sources().len(), 1);
    assert_eq!(session.backend().conversation_id(), Some("conv-1"));

    session.submit("And in Berlin?", None).await.unwrap();
    session.reset().await;
    session.submit("Fresh start", None).await.unwrap();

    let bodies = seen.lock().unwrap().clone();
    assert!(bodies[0].get("conversation_id").is_none());
    assert_eq!(bodies[0]["top_k"], 5);
    assert_eq!(bodies[1]["conversation_id"], "conv-1");
    assert!(bodies[2].get("conversation_id").is_none());
}

#[tokio::test]
async fn test_slow_backend_times_out_with_friendly_message() {
    let app = Router::new().route(
        "/api/chat",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(json!({ "response": "late", "conversation_id": "x" }))
        }),
    );
    let url = serve(app).await;
    let (chat, _store) = job_finder(&url, Duration::from_millis(200)).await;
    let mut session = ChatSession::start(chat).await;

    let reply = session.submit("What is a good salary", None).await.unwrap();
    assert_eq!(reply.content, TIMEOUT_MESSAGE);
    assert!(matches!(session.last_error(), Some(ClientError::Timeout(_))));
    assert_eq!(session.health().state(), HealthState::Unhealthy);
    // welcome, user turn, reply
    assert_eq!(session.messages().len(), 3);
}

#[tokio::test]
async fn test_unreachable_backend_gets_apology() {
    let url = closed_port().await;

    let (chat, _store) = job_finder(&url, timeout()).await;
    let mut session = ChatSession::start(chat).await;
    let reply = session.submit("Hello", None).await.unwrap();
    assert_eq!(reply.content, JOB_FINDER_APOLOGY);
    assert!(session.health().banner().is_some());

    let client = ChatClient::new("HR chat service", &url, timeout()).unwrap();
    let mut session = ChatSession::start(HrChat::new(client)).await;
    let reply = session.submit("Hello", None).await.unwrap();
    assert_eq!(reply.content, HR_APOLOGY);
}

#[tokio::test]
async fn test_cancellation_aborts_pending_request() {
    let app = Router::new().route(
        "/api/chat",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Json(json!({ "response": "late", "conversation_id": "x" }))
        }),
    );
    let client = ChatClient::new("chat service", &serve(app).await, Duration::from_secs(30)).unwrap();

    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let err = client
        .send_message_with_cancel(&ChatRequest::new("hello"), Some(&token))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Cancelled));
}

#[tokio::test]
async fn test_chat_health_requires_llm_runtime() {
    let app = Router::new().route(
        "/api/health",
        get(|| async {
            Json(json!({
                "status": "healthy",
                "vector_database_status": "healthy",
                "vector_database_count": 42,
                "ollama_status": "unhealthy",
                "timestamp": "2026-10-19T10:00:00"
            }))
        }),
    );
    let client = ChatClient::new("chat service", &serve(app).await, timeout()).unwrap();

    let health = client.check_health().await.unwrap();
    assert_eq!(health.vector_database_count, 42);

    let mut monitor = HealthMonitor::new("chat service");
    assert_eq!(monitor.check(&client).await, HealthState::Unhealthy);
}

#[tokio::test]
async fn test_search_and_stats() {
    let seen: Captured<HashMap<String, String>> = captured();
    let app = Router::new()
        .route(
            "/api/search",
            get(
                |State(seen): State<Captured<HashMap<String, String>>>,
                 Query(params): Query<HashMap<String, String>>| async move {
                    let query = params.get("query").cloned().unwrap_or_default();
                    seen.lock().unwrap().push(params);
                    Json(json!({
                        "query": query,
                        "results": [{
                            "id": "cv-1",
                            "name": "Jane Doe",
                            "sector": "Engineering",
                            "content_preview": "Rust developer",
                            "score": 0.91
                        }],
                        "count": 1
                    }))
                },
            ),
        )
        .route(
            "/api/stats",
            get(|| async {
                Json(json!({
                    "total_documents": 350,
                    "categories": ["cv", "guide"],
                    "document_types": ["pdf"],
                    "collection_name": "career_docs"
                }))
            }),
        )
        .with_state(seen.clone());
    let client = ChatClient::new("chat service", &serve(app).await, timeout()).unwrap();

    let response = client.search("  rust engineers ", 3).await.unwrap();
    assert_eq!(response.count, 1);
    assert_eq!(response.results[0].name.as_deref(), Some("Jane Doe"));
    assert!(response.results[0].email.is_none());

    let params = seen.lock().unwrap()[0].clone();
    assert_eq!(params.get("query").map(String::as_str), Some("rust engineers"));
    assert_eq!(params.get("top_k").map(String::as_str), Some("3"));

    let stats = client.stats().await.unwrap();
    assert_eq!(stats.total_documents, 350);
    assert_eq!(stats.collection_name, "career_docs");
}
