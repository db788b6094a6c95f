//! Batch content-to-video pipeline driver.
//!
//! This crate provides:
//! - The task scheduler with timeout-bounded retries
//! - The three-stage per-video pipeline (audio, images, video)
//! - Content generation and plan building
//! - The durable progress store

pub mod config;
pub mod content_gen;
pub mod error;
pub mod plan;
pub mod progress;
pub mod runner;
pub mod scheduler;
pub mod stages;
pub mod workdir;

pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use progress::{JsonFileStore, ProgressPersistence, ProgressStore};
pub use runner::VideoTaskRunner;
pub use scheduler::{AttemptOutcome, RunSummary, Scheduler, TaskRunner};
pub use workdir::WorkDirs;
