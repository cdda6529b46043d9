use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::debug;

use super::error::ApiError;
use crate::model::{ImagePage, NewImage};

const IMAGES_PATH: &str = "api/images";

/// The images collection endpoint.
#[async_trait]
pub trait ImageApi: Send + Sync {
    /// Persists a new image record. The response body is ignored.
    async fn create_image(&self, image: &NewImage) -> Result<(), ApiError>;

    /// Fetches one page of images, starting after `after` when given.
    async fn list_images(&self, after: Option<&str>) -> Result<ImagePage, ApiError>;
}

/// [`ImageApi`] over HTTP with reqwest.
#[derive(Debug, Clone)]
pub struct HttpImageApi {
    base_url: String,
    http: Client,
}

impl HttpImageApi {
    /// Creates a client rooted at `base_url` (e.g. `http://localhost:3000`).
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let http = Client::builder().build()?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

#[async_trait]
impl ImageApi for HttpImageApi {
    async fn create_image(&self, image: &NewImage) -> Result<(), ApiError> {
        let url = self.url(IMAGES_PATH);
        debug!(%url, title = %image.title, "creating image");
        let response = self.http.post(&url).json(image).send().await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn list_images(&self, after: Option<&str>) -> Result<ImagePage, ApiError> {
        let url = self.url(IMAGES_PATH);
        debug!(%url, ?after, "listing images");
        let mut request = self.http.get(&url);
        if let Some(cursor) = after {
            request = request.query(&[("after", cursor)]);
        }
        let response = ensure_success(request.send().await?).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Maps a non-2xx response to [`ApiError::Status`].
pub(crate) async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        body,
    })
}
