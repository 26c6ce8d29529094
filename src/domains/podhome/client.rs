//! Podhome REST client.
//!
//! One method per endpoint. Every call goes through the shared
//! [`ResilientTransport`]; non-2xx responses are turned into a
//! [`PodhomeError`] by [`PodhomeError::classify`].

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::error::PodhomeError;
use super::types::{
    CreateClipRequest, CreateEpisodeOutput, CreateEpisodeRequest, Episode, EpisodeIncludes,
    ListEpisodesQuery, PublishEpisodeOutput, PublishEpisodeRequest, RegisterWebhookRequest,
    UpdateEpisodeOutput, UpdateEpisodeRequest, WebhookIdRequest,
};
use crate::core::http_client::{HttpRequest, HttpResponse, ResilientTransport};

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-API-KEY";

pub type PodhomeResult<T> = Result<T, PodhomeError>;

/// Client bound to one base URL and one API key.
pub struct PodhomeClient {
    base_url: String,
    api_key: String,
    transport: ResilientTransport,
}

impl std::fmt::Debug for PodhomeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PodhomeClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl PodhomeClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        transport: ResilientTransport,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            transport,
        }
    }

    pub async fn create_episode(
        &self,
        request: &CreateEpisodeRequest,
    ) -> PodhomeResult<CreateEpisodeOutput> {
        let request = self.post("/api/createepisode").json(request)?;
        self.send_decode(request).await
    }

    pub async fn list_episodes(&self, query: &ListEpisodesQuery) -> PodhomeResult<Vec<Episode>> {
        let url = self.url_with_query("/api/episodes", &query.query_pairs());
        self.send_decode(self.with_headers(HttpRequest::get(url)))
            .await
    }

    pub async fn get_episode(
        &self,
        episode_id: &str,
        includes: &EpisodeIncludes,
    ) -> PodhomeResult<Episode> {
        let path = format!("/api/episode/{}", episode_id);
        let url = self.url_with_query(&path, &includes.query_pairs());
        self.send_decode(self.with_headers(HttpRequest::get(url)))
            .await
    }

    pub async fn update_episode(
        &self,
        request: &UpdateEpisodeRequest,
    ) -> PodhomeResult<UpdateEpisodeOutput> {
        let request = self
            .with_headers(HttpRequest::put(self.url("/api/updateepisode")))
            .json(request)?;
        self.send_decode(request).await
    }

    pub async fn delete_episode(&self, episode_id: &str) -> PodhomeResult<()> {
        let url = self.url(&format!("/api/deleteepisode/{}", episode_id));
        self.send(self.with_headers(HttpRequest::delete(url)))
            .await
            .map(|_| ())
    }

    pub async fn publish_episode(
        &self,
        request: &PublishEpisodeRequest,
    ) -> PodhomeResult<PublishEpisodeOutput> {
        let request = self.post("/api/scheduleepisode").json(request)?;
        self.send_decode(request).await
    }

    pub async fn create_clip(&self, request: &CreateClipRequest) -> PodhomeResult<Value> {
        let request = self.post("/api/createclip").json(request)?;
        self.send_value(request).await
    }

    pub async fn list_webhooks(&self) -> PodhomeResult<Value> {
        self.send_value(self.with_headers(HttpRequest::get(self.url("/api/hook"))))
            .await
    }

    pub async fn register_webhook(&self, request: &RegisterWebhookRequest) -> PodhomeResult<Value> {
        let request = self.post("/api/hook").json(request)?;
        self.send_value(request).await
    }

    pub async fn delete_webhook(&self, integration_id: &str) -> PodhomeResult<Value> {
        let body = WebhookIdRequest {
            integration_id: integration_id.to_string(),
        };
        let request = self
            .with_headers(HttpRequest::delete(self.url("/api/hook")))
            .json(&body)?;
        self.send_value(request).await
    }

    /// Trigger registered webhooks, or only `integration_id` when given.
    pub async fn test_webhook(&self, integration_id: Option<&str>) -> PodhomeResult<Value> {
        let request = match integration_id {
            Some(id) => self.post("/api/hooktest").json(&WebhookIdRequest {
                integration_id: id.to_string(),
            })?,
            None => self.post("/api/hooktest").json(&serde_json::json!({}))?,
        };
        self.send_value(request).await
    }

    // ------------------------------------------------------------------------

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn url_with_query(&self, path: &str, pairs: &[(&'static str, String)]) -> String {
        let base = self.url(path);
        if pairs.is_empty() {
            return base;
        }
        match serde_urlencoded::to_string(pairs) {
            Ok(query) => format!("{}?{}", base, query),
            Err(e) => {
                warn!("Dropping unencodable query for {}: {}", path, e);
                base
            }
        }
    }

    fn with_headers(&self, request: HttpRequest) -> HttpRequest {
        request
            .header("Content-Type", "application/json")
            .header(API_KEY_HEADER, self.api_key.as_str())
    }

    fn post(&self, path: &str) -> HttpRequest {
        self.with_headers(HttpRequest::post(self.url(path)))
    }

    async fn send(&self, request: HttpRequest) -> PodhomeResult<HttpResponse> {
        debug!("Podhome {} {}", request.method, request.url);
        let response = self.transport.send(&request).await?;

        if !response.is_success() {
            let err = PodhomeError::classify(response.status, &response.body);
            warn!(
                status = ?err.status(),
                "Podhome {} {} failed: {}",
                request.method, request.url, err
            );
            return Err(err);
        }

        Ok(response)
    }

    async fn send_decode<T: DeserializeOwned>(&self, request: HttpRequest) -> PodhomeResult<T> {
        let response = self.send(request).await?;
        serde_json::from_str(&response.body).map_err(|e| PodhomeError::Decode(e.to_string()))
    }

    async fn send_value(&self, request: HttpRequest) -> PodhomeResult<Value> {
        let response = self.send(request).await?;
        decode_value(&response.body)
    }
}

/// Parse a body that may legitimately be empty.
fn decode_value(body: &str) -> PodhomeResult<Value> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| PodhomeError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::http_client::{HttpClientError, HttpExecutor, RetryPolicy};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// Records every request and answers with a fixed response.
    struct RecordingExecutor {
        status: u16,
        body: String,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl RecordingExecutor {
        fn new(status: u16, body: &str) -> Arc<Self> {
            Arc::new(Self {
                status,
                body: body.to_string(),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<HttpRequest> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpExecutor for RecordingExecutor {
        async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, HttpClientError> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(HttpResponse::new(self.status, self.body.clone()))
        }
    }

    fn client(executor: Arc<RecordingExecutor>) -> PodhomeClient {
        let transport = ResilientTransport::new(executor, RetryPolicy::immediate(0));
        PodhomeClient::new("https://api.test.podhome.fm/", "secret-key", transport)
    }

    fn body_json(request: &HttpRequest) -> Value {
        serde_json::from_slice(request.body.as_deref().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_headers_and_base_url() {
        let executor = RecordingExecutor::new(200, "[]");
        let episodes = client(executor.clone())
            .list_episodes(&ListEpisodesQuery::default())
            .await
            .unwrap();
        assert!(episodes.is_empty());

        let request = &executor.requests()[0];
        assert_eq!(request.url, "https://api.test.podhome.fm/api/episodes");
        assert_eq!(request.header_value("x-api-key"), Some("secret-key"));
        assert_eq!(request.header_value("content-type"), Some("application/json"));
    }

    #[tokio::test]
    async fn test_list_query_string() {
        let executor = RecordingExecutor::new(200, "[]");
        let query = ListEpisodesQuery {
            status: Some(1),
            includes: EpisodeIncludes {
                transcript: Some(true),
                ..Default::default()
            },
        };
        client(executor.clone()).list_episodes(&query).await.unwrap();
        assert_eq!(
            executor.requests()[0].url,
            "https://api.test.podhome.fm/api/episodes?status=1&includeTranscript=true"
        );
    }

    #[tokio::test]
    async fn test_delete_path_and_method() {
        let executor = RecordingExecutor::new(204, "");
        let id = "550e8400-e29b-41d4-a716-446655440000";
        client(executor.clone()).delete_episode(id).await.unwrap();

        let request = &executor.requests()[0];
        assert_eq!(request.method, reqwest::Method::DELETE);
        assert!(request.url.ends_with(&format!("/api/deleteepisode/{}", id)));
        assert!(request.body.is_none());
    }

    #[tokio::test]
    async fn test_publish_body() {
        let executor = RecordingExecutor::new(
            200,
            r#"{"episode_id": "e1", "publish_date": "2024-01-15T10:30:00Z", "status": 2}"#,
        );
        let output = client(executor.clone())
            .publish_episode(&PublishEpisodeRequest {
                episode_id: "e1".to_string(),
                publish_now: true,
                publish_date: None,
            })
            .await
            .unwrap();
        assert_eq!(output.episode_id, "e1");

        let body = body_json(&executor.requests()[0]);
        assert_eq!(body, serde_json::json!({ "episode_id": "e1", "publish_now": true }));
    }

    #[tokio::test]
    async fn test_webhook_bodies() {
        let executor = RecordingExecutor::new(200, "");
        let c = client(executor.clone());
        assert_eq!(c.test_webhook(None).await.unwrap(), Value::Null);
        c.delete_webhook("hook-1").await.unwrap();

        let requests = executor.requests();
        assert!(requests[0].url.ends_with("/api/hooktest"));
        assert_eq!(body_json(&requests[0]), serde_json::json!({}));
        assert_eq!(requests[1].method, reqwest::Method::DELETE);
        assert_eq!(
            body_json(&requests[1]),
            serde_json::json!({ "integration_id": "hook-1" })
        );
    }

    #[tokio::test]
    async fn test_error_status_is_classified() {
        let executor = RecordingExecutor::new(401, "nope");
        let err = client(executor)
            .get_episode("e1", &EpisodeIncludes::default())
            .await
            .unwrap_err();
        assert!(matches!(err, PodhomeError::Auth));
    }

    #[tokio::test]
    async fn test_unexpected_body_is_decode_error() {
        let executor = RecordingExecutor::new(200, "<html>");
        let err = client(executor)
            .get_episode("e1", &EpisodeIncludes::default())
            .await
            .unwrap_err();
        assert!(matches!(err, PodhomeError::Decode(_)));
    }

    #[test]
    fn test_debug_redacts_key() {
        let executor = RecordingExecutor::new(200, "");
        assert!(!format!("{:?}", client(executor)).contains("secret-key"));
    }
}
