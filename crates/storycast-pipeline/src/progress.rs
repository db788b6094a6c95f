//! Durable task progress store.
//!
//! A title-keyed map of task records, reloaded at startup and rewritten
//! as a whole after every attempt. Persistence is injected so the
//! scheduler can be tested against an in-memory store.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::debug;

use storycast_models::TaskRecord;

use crate::error::PipelineResult;

/// Injected persistence for the progress map.
pub trait ProgressPersistence: Send + Sync {
    /// Load all records; an absent store is an empty map.
    fn load(&self) -> PipelineResult<BTreeMap<String, TaskRecord>>;

    /// Replace the stored records with `records`.
    fn save(&self, records: &BTreeMap<String, TaskRecord>) -> PipelineResult<()>;
}

/// JSON-file persistence, pretty-printed for hand inspection.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ProgressPersistence for JsonFileStore {
    fn load(&self) -> PipelineResult<BTreeMap<String, TaskRecord>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let text = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&text)?)
    }

    fn save(&self, records: &BTreeMap<String, TaskRecord>) -> PipelineResult<()> {
        let text = serde_json::to_string_pretty(records)?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}

/// The loaded progress map plus its persistence.
pub struct ProgressStore {
    records: BTreeMap<String, TaskRecord>,
    persistence: Box<dyn ProgressPersistence>,
}

impl ProgressStore {
    /// Load the store through the given persistence.
    pub fn load(persistence: Box<dyn ProgressPersistence>) -> PipelineResult<Self> {
        let records = persistence.load()?;
        debug!("Loaded {} progress records", records.len());
        Ok(Self {
            records,
            persistence,
        })
    }

    /// Check whether a title completed in a previous run.
    pub fn is_done(&self, title: &str) -> bool {
        self.records.get(title).map(TaskRecord::is_done).unwrap_or(false)
    }

    /// Retry count carried over from a previous run, if any.
    pub fn seeded_retries(&self, title: &str) -> u32 {
        self.records.get(title).map(|r| r.retries).unwrap_or(0)
    }

    /// Get a title's record.
    pub fn get(&self, title: &str) -> Option<&TaskRecord> {
        self.records.get(title)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Write a record and persist the whole store.
    pub fn record(&mut self, title: &str, record: TaskRecord) -> PipelineResult<()> {
        self.records.insert(title.to_string(), record);
        self.persistence.save(&self.records)
    }
}
