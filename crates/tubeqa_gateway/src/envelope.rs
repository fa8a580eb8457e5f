use thiserror::Error;

use crate::types::ErrorBody;

pub const UNREACHABLE_MESSAGE: &str = "Cannot reach the server. Is the backend running?";
pub const GENERIC_SERVER_DETAIL: &str = "Something went wrong on the server.";

/// Outcome of every backend call. Expected failures are values, never panics.
pub type Envelope<T> = Result<T, ApiError>;

/// Failure of a backend call. `Display` is the text shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Host unreachable, timeout, or a success body that could not be decoded.
    #[error("Cannot reach the server. Is the backend running?")]
    Transport { reason: String },
    /// 400 and 404: the server's detail is shown verbatim.
    #[error("{detail}")]
    Rejected { status: u16, detail: String },
    /// Any other non-2xx status.
    #[error("Server error: {detail}")]
    Server { status: u16, detail: String },
}

impl ApiError {
    pub(crate) fn transport(reason: impl Into<String>) -> Self {
        ApiError::Transport {
            reason: reason.into(),
        }
    }

    /// Builds the error for a non-2xx response from its status and raw body.
    pub(crate) fn from_status(status: u16, body: &[u8]) -> Self {
        let detail = extract_detail(body).unwrap_or_else(|| GENERIC_SERVER_DETAIL.to_string());
        match status {
            400 | 404 => ApiError::Rejected { status, detail },
            _ => ApiError::Server { status, detail },
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Transport { .. } => None,
            ApiError::Rejected { status, .. } | ApiError::Server { status, .. } => Some(*status),
        }
    }
}

fn extract_detail(body: &[u8]) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    match parsed.detail? {
        serde_json::Value::String(detail) => Some(detail),
        _ => None,
    }
}
