use std::fmt;

use serde::{Deserialize, Serialize};

pub const VOICE_RECORDING_FILENAME: &str = "voice-recording";
pub const VOICE_RECORDING_MIME_TYPE: &str = "audio/webm";
pub const DEFAULT_BINARY_MIME_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    #[default]
    Text,
    Url,
    Image,
    Voice,
}

impl Modality {
    pub const ALL: [Modality; 4] = [Modality::Text, Modality::Url, Modality::Image, Modality::Voice];

    pub fn as_str(self) -> &'static str {
        match self {
            Modality::Text => "text",
            Modality::Url => "url",
            Modality::Image => "image",
            Modality::Voice => "voice",
        }
    }

    /// Text and URL input travel as a string; image and voice as a binary upload.
    pub fn is_textual(self) -> bool {
        matches!(self, Modality::Text | Modality::Url)
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Modality::Text => "Paste or type the text you want to verify...",
            Modality::Url => "Paste a URL to check its authenticity...",
            Modality::Image => "Upload an image to verify...",
            Modality::Voice => "Record your voice to verify...",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw bytes handed over by a file picker or the recorder.
#[derive(Clone, PartialEq, Eq)]
pub struct BinaryPayload {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl BinaryPayload {
    pub fn new(filename: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn voice_recording(bytes: Vec<u8>) -> Self {
        Self::new(VOICE_RECORDING_FILENAME, VOICE_RECORDING_MIME_TYPE, bytes)
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// Payloads can be megabytes of image data; keep them out of log lines.
impl fmt::Debug for BinaryPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryPayload")
            .field("filename", &self.filename)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputPayload {
    Text(String),
    Url(String),
    Image(BinaryPayload),
    Voice(BinaryPayload),
}

impl InputPayload {
    pub fn modality(&self) -> Modality {
        match self {
            InputPayload::Text(_) => Modality::Text,
            InputPayload::Url(_) => Modality::Url,
            InputPayload::Image(_) => Modality::Image,
            InputPayload::Voice(_) => Modality::Voice,
        }
    }

    /// The user-visible query text, exactly as typed. Binary uploads have none.
    pub fn query_text(&self) -> &str {
        match self {
            InputPayload::Text(text) | InputPayload::Url(text) => text.as_str(),
            InputPayload::Image(_) | InputPayload::Voice(_) => "",
        }
    }

    /// Whether the payload carries something worth submitting.
    pub fn is_ready(&self) -> bool {
        match self {
            InputPayload::Text(text) | InputPayload::Url(text) => !text.trim().is_empty(),
            InputPayload::Image(file) | InputPayload::Voice(file) => !file.is_empty(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Confidence {
    pub fake: f64,
    pub real: f64,
}

impl Confidence {
    pub const UNDECIDED: Confidence = Confidence {
        fake: 50.0,
        real: 50.0,
    };

    pub fn from_fake(fake: f64) -> Self {
        Self {
            fake,
            real: 100.0 - fake,
        }
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self::UNDECIDED
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightSegment {
    pub text: String,
    pub is_suspicious: bool,
}

impl HighlightSegment {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_suspicious: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    pub verdict: String,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedArticle {
    pub title: String,
    pub source: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services_checked: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services_successful: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_prediction: Option<String>,
}

/// Normalized verdict handed to whatever renders results. Failures use the
/// same shape with an `"Error"` verdict label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayModel {
    pub query: String,
    pub confidence: Confidence,
    pub is_fake: bool,
    pub verdict_label: String,
    pub highlighted_query: Vec<HighlightSegment>,
    pub explanation: Explanation,
    pub description: String,
    pub related_articles: Vec<RelatedArticle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<AnalysisMetadata>,
}
