// src/core/service_client.rs
//! Unified HTTP service client - JSON and multipart calls with uniform error mapping

use reqwest::multipart::Form;
use reqwest::{RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::{debug, error, trace};

use crate::error::ClientError;
use crate::types::response::ErrorBody;

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct ServiceClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl ServiceClient {
    /// Create new service client; the timeout bounds each whole request
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Generic GET request
    pub async fn get<R>(&self, endpoint: &str) -> Result<R, ClientError>
    where
        R: DeserializeOwned,
    {
        let url = self.url(endpoint);
        self.execute(self.client.get(&url), &url).await
    }

    /// GET with query-string parameters
    pub async fn get_with_query<Q, R>(&self, endpoint: &str, query: &Q) -> Result<R, ClientError>
    where
        Q: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.url(endpoint);
        self.execute(self.client.get(&url).query(query), &url).await
    }

    /// Generic POST request with JSON
    pub async fn post_json<T, R>(&self, endpoint: &str, payload: &T) -> Result<R, ClientError>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.url(endpoint);
        self.execute(self.client.post(&url).json(payload), &url).await
    }

    /// POST a multipart form; the transport sets the boundary header
    pub async fn post_multipart<R>(&self, endpoint: &str, form: Form) -> Result<R, ClientError>
    where
        R: DeserializeOwned,
    {
        let url = self.url(endpoint);
        self.execute(self.client.post(&url).multipart(form), &url).await
    }

    async fn execute<R>(&self, request: RequestBuilder, url: &str) -> Result<R, ClientError>
    where
        R: DeserializeOwned,
    {
        debug!("Calling service: {}", url);

        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(e, url))?;

        let status = response.status();
        trace!("Response status from {}: {}", url, status);

        if !status.is_success() {
            let message = error_message(response).await;
            error!("Service {} returned {}: {}", url, status, message);
            return Err(ClientError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<R>()
            .await
            .map_err(|e| self.transport_error(e, url))
    }

    fn transport_error(&self, err: reqwest::Error, url: &str) -> ClientError {
        let mapped = ClientError::from_reqwest(err, self.timeout.as_secs());
        error!("Request to {} failed: {}", url, mapped);
        mapped
    }
}

/// Best-effort message from an error body, falling back to the status code
async fn error_message(response: Response) -> String {
    let status = response.status();
    let fallback = format!("HTTP error! status: {}", status.as_u16());

    match response.text().await {
        Ok(text) => serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or(fallback),
        Err(_) => fallback,
    }
}
