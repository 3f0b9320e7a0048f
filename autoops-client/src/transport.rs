//! HTTP transport to the AutoOps API

use std::time::Duration;

use async_trait::async_trait;
use autoops_core::{EventDetail, EventsResponse, ErrorResponse, OverrideRequest, OverrideResponse};
use reqwest::{Response, StatusCode, Url};

use crate::client::EventApi;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Event API over HTTP
pub struct HttpEventApi {
    base_url: Url,
    http_client: reqwest::Client,
}

impl HttpEventApi {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ClientError::InvalidConfig(format!("base_url '{}': {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidConfig(format!(
                "base_url '{}' cannot be a base",
                config.base_url
            )));
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ClientError::InvalidConfig(format!("HTTP client: {}", e)))?;

        Ok(Self {
            base_url,
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Base URL with path segments appended, each segment escaped
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> ClientResult<Response> {
        request.send().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Network("request timed out".to_string())
            } else {
                ClientError::Network(e.to_string())
            }
        })
    }
}

/// Server-supplied message for a failed response, falling back to the status text
async fn error_message(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(parsed) => parsed.error.message,
        Err(_) if !body.trim().is_empty() => body,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    }
}

async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> ClientResult<T> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| ClientError::Network(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::MalformedResponse(e.to_string()))
}

#[async_trait]
impl EventApi for HttpEventApi {
    fn name(&self) -> &str {
        "http"
    }

    async fn list_events(&self) -> ClientResult<EventsResponse> {
        let url = self.endpoint(&["events"]);
        tracing::debug!(%url, "Fetching events");

        let response = self.send(self.http_client.get(url)).await?;
        let status = response.status();
        if !status.is_success() {
            let message = error_message(response).await;
            return Err(ClientError::Network(format!(
                "Failed to fetch events ({}): {}",
                status.as_u16(),
                message
            )));
        }

        decode(response).await
    }

    async fn get_event_detail(&self, event_id: &str) -> ClientResult<EventDetail> {
        let url = self.endpoint(&["events", event_id]);
        tracing::debug!(%url, "Fetching event detail");

        let response = self.send(self.http_client.get(url)).await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(event_id.to_string()));
        }
        if !status.is_success() {
            let message = error_message(response).await;
            return Err(ClientError::Network(format!(
                "Failed to fetch event detail ({}): {}",
                status.as_u16(),
                message
            )));
        }

        decode(response).await
    }

    async fn override_decision(
        &self,
        event_id: &str,
        request: &OverrideRequest,
    ) -> ClientResult<OverrideResponse> {
        let url = self.endpoint(&["events", event_id, "override"]);
        tracing::debug!(%url, "Submitting override");

        let response = self.send(self.http_client.post(url).json(request)).await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(event_id.to_string()));
        }
        if !status.is_success() {
            return Err(ClientError::Server {
                status: status.as_u16(),
                message: error_message(response).await,
            });
        }

        decode(response).await
    }
}
