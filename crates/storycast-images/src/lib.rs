//! Illustration image acquisition.
//!
//! This crate provides:
//! - A search-API client that downloads the first decodable candidate
//! - Deterministic placeholder generation for failed downloads
//! - Cover-resize of arbitrary images to the output frame size

pub mod client;
pub mod error;
pub mod placeholder;
pub mod resize;
pub mod types;

pub use client::{ImageSearchClient, ImageSearchConfig};
pub use error::{ImageError, ImageResult};
pub use placeholder::generate_placeholder;
pub use resize::cover_resize;
