//! TUI screen implementations.

pub mod add_image;
pub mod gallery;

pub use add_image::{AddImageState, draw_add_image};
pub use gallery::{GalleryState, draw_gallery};
