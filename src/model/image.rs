use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The record sent to `POST /api/images` once the file has been hosted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewImage {
    pub title: String,
    pub description: String,
    /// Remote URL returned by the image host.
    pub url: String,
}

/// An image as returned by the listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredImage {
    pub title: String,
    pub description: String,
    pub url: String,
    /// Creation timestamp assigned by the server.
    #[serde(default)]
    pub ts: i64,
    pub id: String,
}

/// One cursor page of `GET /api/images`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImagePage {
    pub data: Vec<StoredImage>,
    /// Cursor for the next page; `None` on the last page.
    #[serde(default)]
    pub after: Option<String>,
}

impl ImagePage {
    /// Appends a following page, taking over its cursor.
    pub fn extend(&mut self, next: ImagePage) {
        self.data.extend(next.data);
        self.after = next.after;
    }
}

/// A file chosen in the picker, before upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// MIME type sniffed from the file contents.
    pub mime_type: String,
}

impl ImageFile {
    /// Returns the final path component, or `"image"` if the path has none.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string())
    }
}
