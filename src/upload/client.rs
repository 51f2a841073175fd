use super::types::UploadRequest;
use crate::config::ClientConfig;
use crate::error::UploadError;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};
use url::Url;

pub const FALLBACK_ERROR: &str = "Processing failed";

#[derive(Deserialize)]
struct ErrorResponse {
    error: Option<Value>,
}

impl ErrorResponse {
    /// Text shown for a rejected upload. Empty, null, false and zero values
    /// fall back to the generic message; other non-strings use their JSON text.
    fn message(self) -> String {
        match self.error {
            Some(Value::String(error)) if !error.is_empty() => error,
            Some(Value::Bool(true)) => "true".to_string(),
            Some(Value::Number(n)) if n.as_f64() != Some(0.0) => n.to_string(),
            Some(other @ (Value::Array(_) | Value::Object(_))) => other.to_string(),
            _ => FALLBACK_ERROR.to_string(),
        }
    }
}

/// Sends one file to the server and returns the processed bytes.
#[async_trait]
pub trait UploadTransport: Send + Sync {
    async fn upload(&self, request: UploadRequest) -> Result<Vec<u8>, UploadError>;
}

#[derive(Clone)]
pub struct HttpUploadClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpUploadClient {
    pub fn new(config: &ClientConfig) -> Result<Self, UploadError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.upload_url(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl UploadTransport for HttpUploadClient {
    async fn upload(&self, request: UploadRequest) -> Result<Vec<u8>, UploadError> {
        info!(
            file = %request.file_name,
            size = request.contents.len(),
            endpoint = %self.endpoint,
            "uploading"
        );

        let part = Part::bytes(request.contents)
            .file_name(request.file_name)
            .mime_str(request.content_type)?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let body = response.bytes().await?;
            info!(status = status.as_u16(), size = body.len(), "upload processed");
            return Ok(body.to_vec());
        }

        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.message(),
            Err(e) => {
                warn!("Failed to parse error response: {}", e);
                FALLBACK_ERROR.to_string()
            }
        };

        warn!(status = status.as_u16(), error = %message, "upload rejected");
        Err(UploadError::Server(message))
    }
}
