//! Clients for the images API and the in-memory query cache.

mod cache;
mod client;
mod error;

pub use cache::{IMAGES_KEY, QueryCache, QueryClient};
pub(crate) use client::ensure_success;
pub use client::{HttpImageApi, ImageApi};
pub use error::ApiError;
