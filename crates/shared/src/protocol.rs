use serde::{Deserialize, Serialize};

use crate::domain::Modality;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const HEALTH_PATH: &str = "/health";
pub const MULTIPART_FILE_FIELD: &str = "file";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetectRoute {
    Text,
    Image,
    Voice,
}

impl DetectRoute {
    pub fn for_modality(modality: Modality) -> Self {
        match modality {
            Modality::Text | Modality::Url => DetectRoute::Text,
            Modality::Image => DetectRoute::Image,
            Modality::Voice => DetectRoute::Voice,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            DetectRoute::Text => "/api/detect/text",
            DetectRoute::Image => "/api/detect/image",
            DetectRoute::Voice => "/api/detect/voice",
        }
    }
}

/// Tag the text route uses to tell free text from a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextInputKind {
    Text,
    Url,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextDetectionRequest {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: TextInputKind,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub model_loaded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}
