//! HTTP plumbing between the workflow controller and the detection service.

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use shared::protocol::{HealthResponse, HEALTH_PATH};
use thiserror::Error;
use tracing::debug;

use crate::{
    request::{RequestBody, RequestDescriptor},
    settings::ClientSettings,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to reach verification service: {0}")]
    Connect(String),
    #[error("request to verification service timed out: {0}")]
    Timeout(String),
    #[error("invalid upload: {0}")]
    Encoding(String),
    #[error("malformed response body: {0}")]
    Decode(String),
    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let message = err.to_string();
        if err.is_connect() {
            TransportError::Connect(message)
        } else if err.is_timeout() {
            TransportError::Timeout(message)
        } else if err.is_decode() {
            TransportError::Decode(message)
        } else if err.is_builder() {
            TransportError::Encoding(message)
        } else {
            TransportError::Request(message)
        }
    }
}

#[async_trait]
pub trait DetectionTransport: Send + Sync {
    async fn send(&self, request: RequestDescriptor) -> Result<TransportResponse, TransportError>;
}

pub struct HttpTransport {
    http: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn health(&self) -> Result<HealthResponse, TransportError> {
        let health = self
            .http
            .get(format!("{}{HEALTH_PATH}", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(health)
    }
}

#[async_trait]
impl DetectionTransport for HttpTransport {
    async fn send(&self, request: RequestDescriptor) -> Result<TransportResponse, TransportError> {
        let url = format!("{}{}", self.base_url, request.route.path());
        let builder = self.http.post(&url);
        let builder = match request.body {
            RequestBody::Json(body) => builder.json(&body),
            RequestBody::Multipart(part) => {
                let file = Part::bytes(part.file.bytes)
                    .file_name(part.file.filename)
                    .mime_str(&part.file.mime_type)
                    .map_err(|err| TransportError::Encoding(err.to_string()))?;
                builder.multipart(Form::new().part(part.field_name, file))
            }
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        debug!(%url, status, len = body.len(), "verification service responded");
        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
