use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::debug;

use crate::api::{ApiError, ensure_success};
use crate::model::ImageFile;

/// Somewhere to put image bytes in exchange for a public URL.
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Uploads `file` and returns its remote URL.
    async fn upload(&self, file: &ImageFile) -> Result<String, ApiError>;
}

#[derive(Debug, Deserialize)]
struct UploadReply {
    data: Option<UploadedImage>,
}

#[derive(Debug, Deserialize)]
struct UploadedImage {
    url: Option<String>,
}

/// [`ImageHost`] for imgbb-style endpoints: multipart `image` field, optional
/// `key` query parameter, URL at `data.url` in the reply.
#[derive(Debug, Clone)]
pub struct HttpImageHost {
    upload_url: String,
    key: Option<String>,
    http: Client,
}

impl HttpImageHost {
    pub fn new(upload_url: impl Into<String>, key: Option<String>) -> Result<Self, ApiError> {
        let http = Client::builder().build()?;
        Ok(Self {
            upload_url: upload_url.into(),
            key,
            http,
        })
    }
}

#[async_trait]
impl ImageHost for HttpImageHost {
    async fn upload(&self, file: &ImageFile) -> Result<String, ApiError> {
        let bytes = tokio::fs::read(&file.path).await?;
        debug!(path = %file.path.display(), size = bytes.len(), "uploading image");

        let part = Part::bytes(bytes)
            .file_name(file.file_name())
            .mime_str(&file.mime_type)?;
        let form = Form::new().part("image", part);

        let mut request = self.http.post(&self.upload_url).multipart(form);
        if let Some(key) = &self.key {
            request = request.query(&[("key", key)]);
        }
        let response = ensure_success(request.send().await?).await?;
        let body = response.bytes().await?;
        let reply: UploadReply = serde_json::from_slice(&body)?;

        reply
            .data
            .and_then(|image| image.url)
            .filter(|url| !url.is_empty())
            .ok_or(ApiError::MissingUrl)
    }
}
