//! The file picker and the image host it uploads to.
//!
//! Picking a file never touches the images API: the host returns a remote
//! URL which the form later sends along with the title and description.

mod host;
mod input;
mod picker;
mod state;

pub use host::{HttpImageHost, ImageHost};
pub use input::{FileInput, UNREADABLE_FILE, UPLOAD_FAILED};
pub use picker::{pick_file, sniff_mime};
pub use state::UploadState;
