//! Shared data models for the Storycast pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Tasks and their persisted progress records
//! - The video plan manifest
//! - Generated content blocks
//! - Encoding configuration

pub mod content;
pub mod encoding;
pub mod manifest;
pub mod progress;
pub mod task;
pub mod utils;

// Re-export common types
pub use content::{parse_content, ContentBlock};
pub use encoding::EncodingConfig;
pub use manifest::{parse_manifest, ManifestEntry};
pub use progress::{TaskRecord, TaskStatus};
pub use task::Task;
pub use utils::{extract_index, sanitize_title};
