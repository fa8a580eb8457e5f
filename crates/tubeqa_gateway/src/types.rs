//! Request and response bodies exchanged with the RAG backend.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestRequest<'a> {
    pub youtube_url: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IngestResponse {
    pub message: String,
    pub video_id: String,
    pub chunks_created: u32,
    pub title: String,
    pub suggested_questions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AskRequest<'a> {
    pub question: &'a str,
    /// Omitted entirely when asking across all videos.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
    pub deleted_count: u64,
}

/// Error body the backend attaches to non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: Option<serde_json::Value>,
}
