//! Persisted per-task progress records.
//!
//! The progress store is the only durable state shared between runs. It is
//! a title-keyed map of records, reloaded at startup so completed videos
//! are skipped on resume.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Terminal and intermediate status of a task attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Video was produced successfully
    Done,
    /// Last attempt hit the stage timeout; may be retried
    Timeout,
    /// Attempt failed with an execution error; not retried
    Error,
    /// Timed out more times than the retry budget allows
    Failed,
}

impl TaskStatus {
    /// Get string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Done => "done",
            TaskStatus::Timeout => "timeout",
            TaskStatus::Error => "error",
            TaskStatus::Failed => "failed",
        }
    }

    /// Check if this status ends the task for the current run.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TaskStatus::Timeout)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One task's persisted record, keyed by title in the progress store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Current status
    pub status: TaskStatus,

    /// Timeout retries consumed
    #[serde(default)]
    pub retries: u32,

    /// Error detail for `error`/`failed` records
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// When the record was last written
    pub updated_at: DateTime<Utc>,
}

impl TaskRecord {
    fn new(status: TaskStatus, retries: u32, message: Option<String>) -> Self {
        Self {
            status,
            retries,
            message,
            updated_at: Utc::now(),
        }
    }

    /// Record a completed video.
    pub fn done(retries: u32) -> Self {
        Self::new(TaskStatus::Done, retries, None)
    }

    /// Record a timed-out attempt that is still inside the retry budget.
    pub fn timeout(retries: u32) -> Self {
        Self::new(TaskStatus::Timeout, retries, None)
    }

    /// Record a terminal execution error.
    pub fn error(retries: u32, message: impl Into<String>) -> Self {
        Self::new(TaskStatus::Error, retries, Some(message.into()))
    }

    /// Record a task that exhausted its timeout retries.
    pub fn failed(retries: u32, message: impl Into<String>) -> Self {
        Self::new(TaskStatus::Failed, retries, Some(message.into()))
    }

    /// Check if the record marks a completed video.
    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_strings() {
        assert_eq!(TaskStatus::Done.as_str(), "done");
        assert_eq!(TaskStatus::Failed.to_string(), "failed");
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(TaskStatus::Done.is_terminal());
        assert!(TaskStatus::Error.is_terminal());
        assert!(TaskStatus::Failed.is_terminal());
        assert!(!TaskStatus::Timeout.is_terminal());
    }

    #[test]
    fn test_record_constructors() {
        assert!(TaskRecord::done(1).is_done());

        let rec = TaskRecord::failed(2, "timeout exceeded");
        assert_eq!(rec.status, TaskStatus::Failed);
        assert_eq!(rec.retries, 2);
        assert_eq!(rec.message.as_deref(), Some("timeout exceeded"));
    }

    #[test]
    fn test_record_serde_roundtrip() {
        let rec = TaskRecord::error(0, "ffmpeg exited with status 1");
        let json = serde_json::to_string(&rec).unwrap();
        assert!(json.contains("\"error\""));

        let back: TaskRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rec);
    }

    #[test]
    fn test_record_omits_empty_message() {
        let json = serde_json::to_string(&TaskRecord::done(0)).unwrap();
        assert!(!json.contains("message"));
    }
}
