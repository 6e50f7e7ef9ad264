//! Maps an input payload onto the request the detection service expects.

use shared::{
    domain::{BinaryPayload, InputPayload, Modality},
    protocol::{DetectRoute, TextDetectionRequest, TextInputKind, MULTIPART_FILE_FIELD},
};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Json,
    Multipart,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field_name: &'static str,
    pub file: BinaryPayload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    Json(TextDetectionRequest),
    Multipart(FilePart),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub route: DetectRoute,
    pub body: RequestBody,
}

impl RequestDescriptor {
    pub fn encoding(&self) -> Encoding {
        match self.body {
            RequestBody::Json(_) => Encoding::Json,
            RequestBody::Multipart(_) => Encoding::Multipart,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("{modality} input is empty")]
    EmptyText { modality: Modality },
    #[error("{modality} input has no file attached")]
    MissingFile { modality: Modality },
}

pub fn build(payload: InputPayload) -> Result<RequestDescriptor, BuildError> {
    let route = DetectRoute::for_modality(payload.modality());
    let body = match payload {
        InputPayload::Text(text) => text_body(text, TextInputKind::Text, Modality::Text)?,
        InputPayload::Url(url) => text_body(url, TextInputKind::Url, Modality::Url)?,
        InputPayload::Image(file) => file_body(file, Modality::Image)?,
        // Voice always goes out under the recorder's name and type.
        InputPayload::Voice(file) => file_body(
            BinaryPayload::voice_recording(file.bytes),
            Modality::Voice,
        )?,
    };
    Ok(RequestDescriptor { route, body })
}

fn text_body(
    text: String,
    kind: TextInputKind,
    modality: Modality,
) -> Result<RequestBody, BuildError> {
    if text.trim().is_empty() {
        return Err(BuildError::EmptyText { modality });
    }
    Ok(RequestBody::Json(TextDetectionRequest { text, kind }))
}

fn file_body(file: BinaryPayload, modality: Modality) -> Result<RequestBody, BuildError> {
    if file.is_empty() {
        return Err(BuildError::MissingFile { modality });
    }
    Ok(RequestBody::Multipart(FilePart {
        field_name: MULTIPART_FILE_FIELD,
        file,
    }))
}
