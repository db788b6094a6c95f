//! Chat-completion client and narration script generation.
//!
//! This crate provides:
//! - A thin OpenAI-compatible chat client with bounded retry
//! - The multi-step narration script writer
//! - Per-paragraph image keyword extraction

pub mod client;
pub mod error;
pub mod keywords;
pub mod script;

pub use client::{ChatClient, ChatClientConfig};
pub use error::{LlmError, LlmResult};
pub use keywords::extract_keyword;
pub use script::ScriptWriter;
