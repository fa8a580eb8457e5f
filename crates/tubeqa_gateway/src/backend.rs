use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tubeqa_logging::{tubeqa_debug, tubeqa_warn};

use crate::types::{
    AskRequest, AskResponse, DeleteResponse, HealthResponse, IngestRequest, IngestResponse,
};
use crate::{ApiError, Envelope};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct GatewaySettings {
    /// Scheme, host and optional path prefix of the backend.
    pub base_url: String,
    pub connect_timeout: Duration,
    /// `None` leaves requests bounded only by the transport. Ingestion of long
    /// videos routinely takes more than a minute.
    pub request_timeout: Option<Duration>,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
        }
    }
}

/// The four operations the RAG backend exposes.
///
/// Each call is a single request: no retries, no caching, no deduplication.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    async fn ingest(&self, url: &str) -> Envelope<IngestResponse>;

    /// Asks across all videos when `video_id` is `None`.
    async fn ask(&self, question: &str, video_id: Option<&str>) -> Envelope<AskResponse>;

    async fn check_health(&self) -> Envelope<HealthResponse>;

    /// Deletes every stored chunk on the server. Irreversible.
    async fn clear_all(&self) -> Envelope<DeleteResponse>;
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    settings: GatewaySettings,
}

impl ReqwestBackend {
    pub fn new(settings: GatewaySettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &GatewaySettings {
        &self.settings
    }

    fn build_client(&self) -> Result<reqwest::Client, ApiError> {
        let mut builder = reqwest::Client::builder().connect_timeout(self.settings.connect_timeout);
        if let Some(timeout) = self.settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        builder
            .build()
            .map_err(|err| ApiError::transport(err.to_string()))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.settings.base_url.trim_end_matches('/'), path)
    }

    async fn call<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Envelope<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let client = self.build_client()?;
        let url = self.endpoint(path);
        tubeqa_debug!("{} {}", method, url);

        let mut request = client
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");
        if let Some(body) = body {
            let bytes = serde_json::to_vec(body)
                .map_err(|err| ApiError::transport(format!("request encoding: {err}")))?;
            request = request.body(bytes);
        }

        let response = request.send().await.map_err(|err| {
            tubeqa_warn!("{} {} failed: {}", method, url, err);
            map_reqwest_error(err)
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            let err = ApiError::from_status(status.as_u16(), &bytes);
            tubeqa_warn!("{} {} returned {}: {}", method, url, status, err);
            return Err(err);
        }

        serde_json::from_slice(&bytes).map_err(|err| {
            tubeqa_warn!("{} {} returned a malformed body: {}", method, url, err);
            ApiError::transport(format!("malformed response: {err}"))
        })
    }
}

#[async_trait::async_trait]
impl Backend for ReqwestBackend {
    async fn ingest(&self, url: &str) -> Envelope<IngestResponse> {
        let body = IngestRequest { youtube_url: url };
        self.call(Method::POST, "/ingest", Some(&body)).await
    }

    async fn ask(&self, question: &str, video_id: Option<&str>) -> Envelope<AskResponse> {
        let body = AskRequest {
            question,
            video_id: video_id.filter(|id| !id.is_empty()),
        };
        self.call(Method::POST, "/ask", Some(&body)).await
    }

    async fn check_health(&self) -> Envelope<HealthResponse> {
        self.call::<(), _>(Method::GET, "/health", None).await
    }

    async fn clear_all(&self) -> Envelope<DeleteResponse> {
        self.call::<(), _>(Method::DELETE, "/videos", None).await
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::transport(format!("timeout: {err}"));
    }
    ApiError::transport(err.to_string())
}
