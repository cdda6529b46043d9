/// Errors from the images API and the image host.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request could not be sent or its body could not be read.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server responded with {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// A response body was not the expected JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The image host accepted the upload but returned no URL.
    #[error("image host response did not include a URL")]
    MissingUrl,

    /// The picked file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
