/// Result of the upload sub-flow, held by the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadState {
    image_url: String,
    local_image_url: String,
}

impl UploadState {
    /// Remote URL of the hosted image; empty until the upload completes.
    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn set_image_url(&mut self, url: impl Into<String>) {
        self.image_url = url.into();
    }

    /// Local preview reference of the picked file.
    pub fn local_image_url(&self) -> &str {
        &self.local_image_url
    }

    pub fn set_local_image_url(&mut self, url: impl Into<String>) {
        self.local_image_url = url.into();
    }

    /// Returns `true` once the host has returned a URL.
    pub fn is_uploaded(&self) -> bool {
        !self.image_url.is_empty()
    }

    pub fn clear(&mut self) {
        self.image_url.clear();
        self.local_image_url.clear();
    }
}
