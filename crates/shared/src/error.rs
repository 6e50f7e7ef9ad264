use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error body the detection service sends with a non-2xx status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct ApiError {
    pub status: u16,
    pub reason: String,
}

impl ApiError {
    pub fn new(status: u16, reason: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason.into(),
        }
    }

    /// Uses the body's `detail` verbatim when there is one, otherwise a generic
    /// status line. Bodies that are not JSON are treated as having no detail.
    pub fn from_body(status: u16, body: &[u8]) -> Self {
        let detail = serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|body| body.detail)
            .filter(|detail| !detail.trim().is_empty());
        match detail {
            Some(detail) => Self::new(status, detail),
            None => Self::new(status, format!("API error: {status}")),
        }
    }
}
