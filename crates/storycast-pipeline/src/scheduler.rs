//! Task scheduler with timeout-bounded retries.
//!
//! Drives every pending task through the per-video pipeline. Only
//! timeouts are retried, up to the configured budget; execution errors
//! are terminal on the first attempt. Progress is persisted after every
//! attempt so a crashed run resumes at task granularity.

use async_trait::async_trait;
use tracing::{error, info, warn};

use storycast_models::{Task, TaskRecord};

use crate::error::PipelineResult;
use crate::progress::ProgressStore;

/// Typed result of one task attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The video was produced
    Completed,
    /// A stage exceeded its wall-clock budget
    TimedOut,
    /// A stage failed with an execution error
    Errored(String),
}

/// Abstracted per-task pipeline, injectable for tests.
#[async_trait]
pub trait TaskRunner: Send + Sync {
    /// Run all stages for one task.
    async fn run_task(&self, task: &Task) -> AttemptOutcome;
}

/// Counts of terminal statuses reached during one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub done: u32,
    pub errored: u32,
    pub failed: u32,
    pub skipped: u32,
}

impl RunSummary {
    /// Total tasks that reached a terminal status this run.
    pub fn settled(&self) -> u32 {
        self.done + self.errored + self.failed
    }
}

/// Round-based retry scheduler.
pub struct Scheduler {
    max_retries: u32,
}

impl Scheduler {
    pub fn new(max_retries: u32) -> Self {
        Self { max_retries }
    }

    /// Drive `tasks` to terminal statuses.
    ///
    /// Tasks already `done` in the store are skipped. Every attempt writes
    /// the store through before the next task starts.
    pub async fn run(
        &self,
        tasks: Vec<Task>,
        store: &mut ProgressStore,
        runner: &dyn TaskRunner,
    ) -> PipelineResult<RunSummary> {
        let mut summary = RunSummary::default();

        let mut pending: Vec<Task> = Vec::new();
        for task in tasks {
            if store.is_done(&task.title) {
                info!("Video '{}' already completed, skipping", task.title);
                summary.skipped += 1;
            } else {
                let retries = store.seeded_retries(&task.title);
                pending.push(task.with_retries(retries));
            }
        }

        info!("{} videos to process", pending.len());

        while !pending.is_empty() {
            let mut next_round = Vec::new();

            for mut task in pending {
                info!("Processing video: {}", task.title);

                match runner.run_task(&task).await {
                    AttemptOutcome::Completed => {
                        store.record(&task.title, TaskRecord::done(task.retries))?;
                        summary.done += 1;
                        info!("Video '{}' completed", task.title);
                    }
                    AttemptOutcome::TimedOut => {
                        if task.retries < self.max_retries {
                            task.retries += 1;
                            store.record(&task.title, TaskRecord::timeout(task.retries))?;
                            warn!(
                                "Video '{}' timed out, retrying ({}/{})",
                                task.title, task.retries, self.max_retries
                            );
                            next_round.push(task);
                        } else {
                            store.record(
                                &task.title,
                                TaskRecord::failed(task.retries, "timeout exceeded"),
                            )?;
                            summary.failed += 1;
                            error!(
                                "Video '{}' exhausted its {} retries, giving up",
                                task.title, self.max_retries
                            );
                        }
                    }
                    AttemptOutcome::Errored(message) => {
                        store.record(&task.title, TaskRecord::error(task.retries, &message))?;
                        summary.errored += 1;
                        error!("Error processing '{}': {}", task.title, message);
                    }
                }
            }

            pending = next_round;
        }

        info!(
            "All videos processed: {} done, {} errored, {} failed, {} skipped",
            summary.done, summary.errored, summary.failed, summary.skipped
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use storycast_models::TaskStatus;

    use crate::progress::testing::MemoryStore;

    /// Scripted runner: returns each title's outcomes in order, repeating
    /// the last one when attempts run past the script.
    struct ScriptedRunner {
        script: HashMap<String, Vec<AttemptOutcome>>,
        attempts: Mutex<HashMap<String, u32>>,
    }

    impl ScriptedRunner {
        fn new(script: &[(&str, Vec<AttemptOutcome>)]) -> Self {
            Self {
                script: script
                    .iter()
                    .map(|(title, outcomes)| (title.to_string(), outcomes.clone()))
                    .collect(),
                attempts: Mutex::new(HashMap::new()),
            }
        }

        fn attempts_for(&self, title: &str) -> u32 {
            self.attempts.lock().unwrap().get(title).copied().unwrap_or(0)
        }
    }

    #[async_trait]
    impl TaskRunner for ScriptedRunner {
        async fn run_task(&self, task: &Task) -> AttemptOutcome {
            let mut attempts = self.attempts.lock().unwrap();
            let n = attempts.entry(task.title.clone()).or_insert(0);
            let outcomes = &self.script[&task.title];
            let outcome = outcomes
                .get(*n as usize)
                .or_else(|| outcomes.last())
                .cloned()
                .expect("scripted outcome");
            *n += 1;
            outcome
        }
    }

    fn tasks(titles: &[&str]) -> Vec<Task> {
        titles
            .iter()
            .map(|t| Task::new(*t, format!("{t}.txt")))
            .collect()
    }

    fn store_with(memory: &MemoryStore) -> ProgressStore {
        ProgressStore::load(Box::new(memory.clone())).unwrap()
    }

    #[tokio::test]
    async fn test_always_timing_out_task_attempted_max_retries_plus_one_times() {
        const MAX_RETRIES: u32 = 2;
        let memory = MemoryStore::default();
        let mut store = store_with(&memory);
        let runner = ScriptedRunner::new(&[("stuck", vec![AttemptOutcome::TimedOut])]);

        let summary = Scheduler::new(MAX_RETRIES)
            .run(tasks(&["stuck"]), &mut store, &runner)
            .await
            .unwrap();

        // the initial attempt plus one per retry
        assert_eq!(runner.attempts_for("stuck"), MAX_RETRIES + 1);
        assert_eq!(summary.failed, 1);

        let records = memory.records.lock().unwrap();
        let record = records.get("stuck").unwrap();
        assert_eq!(record.status, TaskStatus::Failed);
        assert_eq!(record.retries, MAX_RETRIES);
        assert_eq!(record.message.as_deref(), Some("timeout exceeded"));
    }

    #[tokio::test]
    async fn test_erroring_task_attempted_exactly_once() {
        let memory = MemoryStore::default();
        let mut store = store_with(&memory);
        let runner = ScriptedRunner::new(&[(
            "broken",
            vec![AttemptOutcome::Errored("image stage exploded".into())],
        )]);

        let summary = Scheduler::new(2)
            .run(tasks(&["broken"]), &mut store, &runner)
            .await
            .unwrap();

        assert_eq!(runner.attempts_for("broken"), 1);
        assert_eq!(summary.errored, 1);

        let records = memory.records.lock().unwrap();
        let record = records.get("broken").unwrap();
        assert_eq!(record.status, TaskStatus::Error);
        assert_eq!(record.message.as_deref(), Some("image stage exploded"));
    }

    #[tokio::test]
    async fn test_done_task_is_never_reattempted() {
        let memory = MemoryStore::default();
        memory
            .records
            .lock()
            .unwrap()
            .insert("finished".to_string(), TaskRecord::done(0));
        let mut store = store_with(&memory);
        let runner = ScriptedRunner::new(&[
            ("finished", vec![AttemptOutcome::Completed]),
            ("fresh", vec![AttemptOutcome::Completed]),
        ]);

        let summary = Scheduler::new(2)
            .run(tasks(&["finished", "fresh"]), &mut store, &runner)
            .await
            .unwrap();

        assert_eq!(runner.attempts_for("finished"), 0);
        assert_eq!(runner.attempts_for("fresh"), 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.done, 1);
    }

    #[tokio::test]
    async fn test_timeout_then_success_retries_within_budget() {
        let memory = MemoryStore::default();
        let mut store = store_with(&memory);
        let runner = ScriptedRunner::new(&[(
            "flaky",
            vec![AttemptOutcome::TimedOut, AttemptOutcome::Completed],
        )]);

        let summary = Scheduler::new(2)
            .run(tasks(&["flaky"]), &mut store, &runner)
            .await
            .unwrap();

        assert_eq!(runner.attempts_for("flaky"), 2);
        assert_eq!(summary.done, 1);

        let records = memory.records.lock().unwrap();
        let record = records.get("flaky").unwrap();
        assert_eq!(record.status, TaskStatus::Done);
        assert_eq!(record.retries, 1);
    }

    #[tokio::test]
    async fn test_one_failure_does_not_abort_the_run() {
        // three tasks: one pre-done, one erroring, one succeeding
        let memory = MemoryStore::default();
        memory
            .records
            .lock()
            .unwrap()
            .insert("already".to_string(), TaskRecord::done(0));
        let mut store = store_with(&memory);

        let runner = ScriptedRunner::new(&[
            ("already", vec![AttemptOutcome::Completed]),
            ("bad", vec![AttemptOutcome::Errored("stage failed".into())]),
            ("good", vec![AttemptOutcome::Completed]),
        ]);

        let summary = Scheduler::new(2)
            .run(tasks(&["already", "bad", "good"]), &mut store, &runner)
            .await
            .unwrap();

        // exactly two tasks executed, both reaching a terminal status
        assert_eq!(runner.attempts_for("already"), 0);
        assert_eq!(runner.attempts_for("bad"), 1);
        assert_eq!(runner.attempts_for("good"), 1);
        assert_eq!(summary.settled(), 2);
        assert_eq!((summary.done, summary.errored), (1, 1));
    }

    #[tokio::test]
    async fn test_progress_persisted_after_each_attempt() {
        let memory = MemoryStore::default();
        let saves = memory.saves.clone();
        let mut store = store_with(&memory);
        let runner = ScriptedRunner::new(&[(
            "stuck",
            vec![AttemptOutcome::TimedOut, AttemptOutcome::TimedOut],
        )]);

        Scheduler::new(2)
            .run(tasks(&["stuck"]), &mut store, &runner)
            .await
            .unwrap();

        // one save per attempt: timeout, timeout, failed
        assert_eq!(*saves.lock().unwrap(), 3);
    }

    #[tokio::test]
    async fn test_seeded_retries_shrink_the_remaining_budget() {
        let memory = MemoryStore::default();
        memory
            .records
            .lock()
            .unwrap()
            .insert("carried".to_string(), TaskRecord::timeout(1));
        let mut store = store_with(&memory);
        let runner = ScriptedRunner::new(&[("carried", vec![AttemptOutcome::TimedOut])]);

        Scheduler::new(2)
            .run(tasks(&["carried"]), &mut store, &runner)
            .await
            .unwrap();

        // one retry already consumed in a prior run leaves two attempts
        assert_eq!(runner.attempts_for("carried"), 2);
        let records = memory.records.lock().unwrap();
        let record = records.get("carried").unwrap();
        assert_eq!(record.status, TaskStatus::Failed);
        assert_eq!(record.retries, 2);
    }
}
