//! Plan building: content blocks to per-video scripts plus a manifest.

use std::collections::HashSet;

use tokio::fs;
use tracing::{info, warn};

use storycast_models::{parse_content, parse_manifest, sanitize_title, ManifestEntry, Task};

use crate::error::{PipelineError, PipelineResult};
use crate::workdir::{reset_dir, WorkDirs};

/// Split the generated content into per-video script files and write the
/// manifest. Deterministic: identical content produces identical output.
pub async fn build_plan(dirs: &WorkDirs) -> PipelineResult<usize> {
    let content_path = dirs.content_file();
    if !content_path.exists() {
        return Err(PipelineError::missing_input(content_path));
    }

    let text = fs::read_to_string(&content_path).await?;
    let blocks = parse_content(&text);

    reset_dir(&dirs.plan_dir()).await?;

    let mut manifest = String::new();
    let mut seen = HashSet::new();

    for block in &blocks {
        if !seen.insert(block.title.clone()) {
            // duplicate titles alias the same progress record; last one wins
            warn!("Duplicate title '{}' in content", block.title);
        }

        let filename = format!("{}.txt", sanitize_title(&block.title));
        fs::write(dirs.plan_dir().join(&filename), block.body()).await?;

        manifest.push_str(&ManifestEntry::new(&block.title, &filename).to_line());
        manifest.push('\n');
    }

    fs::write(dirs.plan_file(), manifest).await?;

    info!("Created {} script files in {}", blocks.len(), dirs.plan_dir().display());
    Ok(blocks.len())
}

/// Read the manifest into ordered tasks.
pub async fn load_tasks(dirs: &WorkDirs) -> PipelineResult<Vec<Task>> {
    let plan_path = dirs.plan_file();
    if !plan_path.exists() {
        return Err(PipelineError::missing_input(plan_path));
    }

    let text = fs::read_to_string(&plan_path).await?;
    let plan_dir = dirs.plan_dir();

    Ok(parse_manifest(&text)
        .iter()
        .map(|entry| Task::from_manifest_entry(entry, &plan_dir))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    const CONTENT: &str = "Mytitle: Black Holes\n\
        The first paragraph of narration.\n\
        The second paragraph.\n\
        \n\
        Mytitle: Zeno's Paradoxes!\n\
        A single paragraph about arrows.\n";

    async fn dirs_with_content(content: &str) -> (tempfile::TempDir, WorkDirs) {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = WorkDirs::new(tmp.path().join("work"), tmp.path().join("out"));
        dirs.ensure_base().await.unwrap();
        fs::write(dirs.content_file(), content).await.unwrap();
        (tmp, dirs)
    }

    async fn snapshot(dirs: &WorkDirs) -> BTreeMap<String, String> {
        let mut files = BTreeMap::new();
        files.insert(
            "plan.txt".to_string(),
            fs::read_to_string(dirs.plan_file()).await.unwrap(),
        );
        let mut entries = fs::read_dir(dirs.plan_dir()).await.unwrap();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            files.insert(
                entry.file_name().to_string_lossy().to_string(),
                fs::read_to_string(entry.path()).await.unwrap(),
            );
        }
        files
    }

    #[tokio::test]
    async fn test_build_plan_writes_scripts_and_manifest() {
        let (_tmp, dirs) = dirs_with_content(CONTENT).await;

        let count = build_plan(&dirs).await.unwrap();
        assert_eq!(count, 2);

        let manifest = fs::read_to_string(dirs.plan_file()).await.unwrap();
        assert_eq!(
            manifest,
            "Black Holes | Black Holes.txt\nZeno's Paradoxes! | Zeno_s Paradoxes_.txt\n"
        );

        let script = fs::read_to_string(dirs.plan_dir().join("Black Holes.txt"))
            .await
            .unwrap();
        assert_eq!(
            script,
            "The first paragraph of narration.\nThe second paragraph."
        );
    }

    #[tokio::test]
    async fn test_build_plan_is_idempotent() {
        let (_tmp, dirs) = dirs_with_content(CONTENT).await;

        build_plan(&dirs).await.unwrap();
        let first = snapshot(&dirs).await;

        build_plan(&dirs).await.unwrap();
        let second = snapshot(&dirs).await;

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_build_plan_clears_stale_scripts() {
        let (_tmp, dirs) = dirs_with_content(CONTENT).await;
        fs::create_dir_all(dirs.plan_dir()).await.unwrap();
        fs::write(dirs.plan_dir().join("stale.txt"), b"old").await.unwrap();

        build_plan(&dirs).await.unwrap();

        assert!(!dirs.plan_dir().join("stale.txt").exists());
    }

    #[tokio::test]
    async fn test_build_plan_missing_content_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = WorkDirs::new(tmp.path().join("work"), tmp.path().join("out"));
        dirs.ensure_base().await.unwrap();

        let err = build_plan(&dirs).await.unwrap_err();
        assert!(matches!(err, PipelineError::MissingInput(_)));
    }

    #[tokio::test]
    async fn test_load_tasks_resolves_script_paths_in_order() {
        let (_tmp, dirs) = dirs_with_content(CONTENT).await;
        build_plan(&dirs).await.unwrap();

        let tasks = load_tasks(&dirs).await.unwrap();

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].title, "Black Holes");
        assert_eq!(tasks[0].script_path, dirs.plan_dir().join("Black Holes.txt"));
        assert!(tasks[0].script_path.exists());
        assert_eq!(tasks[1].title, "Zeno's Paradoxes!");
    }

    #[tokio::test]
    async fn test_load_tasks_without_plan_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = WorkDirs::new(tmp.path().join("work"), tmp.path().join("out"));

        let err = load_tasks(&dirs).await.unwrap_err();
        assert!(matches!(err, PipelineError::MissingInput(_)));
    }
}
