use std::path::Path;
use std::sync::Arc;

use tracing::warn;

use super::host::ImageHost;
use super::picker::pick_file;
use crate::form::AddImageForm;
use crate::model::Field;

/// Image field error when the host rejects the upload.
pub const UPLOAD_FAILED: &str = "Upload failed";
/// Image field error when the picked path cannot be read.
pub const UNREADABLE_FILE: &str = "Could not read file";

/// The image field's picker: reads the chosen file, validates it and uploads
/// it, reporting back into the form.
#[derive(Clone)]
pub struct FileInput {
    host: Arc<dyn ImageHost>,
}

impl FileInput {
    pub fn new(host: Arc<dyn ImageHost>) -> Self {
        Self { host }
    }

    /// Picks the file at `path` for `form` and uploads it if the image rules
    /// pass. Returns `true` once the form holds a remote URL.
    ///
    /// An empty path clears the selection.
    pub async fn select(&self, form: &mut AddImageForm, path: &Path) -> bool {
        form.set_image_url("");
        form.set_local_image_url("");

        if path.as_os_str().is_empty() {
            form.set_image(None);
            form.trigger(Field::Image);
            return false;
        }

        let file = match pick_file(path).await {
            Ok(file) => file,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read picked file");
                form.set_image(None);
                form.set_error(Field::Image, UNREADABLE_FILE);
                return false;
            }
        };

        form.set_image(Some(file.clone()));
        if !form.trigger(Field::Image) {
            return false;
        }
        form.set_local_image_url(file.path.display().to_string());

        match self.host.upload(&file).await {
            Ok(url) => {
                form.set_image_url(url);
                true
            }
            Err(e) => {
                warn!(path = %file.path.display(), error = %e, "image upload failed");
                form.set_error(Field::Image, UPLOAD_FAILED);
                false
            }
        }
    }
}
