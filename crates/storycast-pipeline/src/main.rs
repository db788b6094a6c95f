//! Batch content-to-video pipeline binary.

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use storycast_images::ImageSearchClient;
use storycast_llm::ChatClient;
use storycast_pipeline::content_gen::{read_subjects, run_content_generation};
use storycast_pipeline::plan::{build_plan, load_tasks};
use storycast_pipeline::workdir::copy_dir_replacing;
use storycast_pipeline::{
    JsonFileStore, PipelineConfig, ProgressStore, RunSummary, Scheduler, VideoTaskRunner, WorkDirs,
};
use storycast_speech::Synthesizer;

#[derive(Parser, Debug)]
#[command(name = "storycast")]
#[command(about = "Turn subject lines into narrated slideshow videos", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the full pipeline: generate, plan, process, export
    Run,
    /// Generate narration content for every subject
    Generate,
    /// Build the per-video plan from generated content
    Plan,
    /// Produce a video for every plan entry
    Process,
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for TLS/HTTPS)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("storycast=info".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    let cli = Cli::parse();
    let config = PipelineConfig::from_env();
    info!("Pipeline config: {:?}", config);

    if let Err(e) = run(cli.command, config).await {
        error!("Pipeline failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: PipelineConfig) -> anyhow::Result<()> {
    let dirs = WorkDirs::new(&config.work_dir, &config.output_dir);
    dirs.ensure_base().await?;

    match command {
        Commands::Generate => {
            generate(&dirs, &config).await?;
        }
        Commands::Plan => {
            let count = build_plan(&dirs).await?;
            info!("Plan created with {} videos", count);
        }
        Commands::Process => {
            process(&dirs, &config).await?;
        }
        Commands::Run => {
            check_subjects(&config).await?;

            info!("Step 1: generating content");
            generate(&dirs, &config).await?;

            info!("Step 2: building plan");
            let count = build_plan(&dirs).await?;
            info!("Plan created with {} videos", count);

            info!("Step 3: processing videos");
            let summary = process(&dirs, &config).await?;

            export_artifacts(&dirs).await?;

            info!(
                "Pipeline finished: {} done, {} errored, {} failed, {} skipped; results in {}",
                summary.done,
                summary.errored,
                summary.failed,
                summary.skipped,
                dirs.result_dir().display()
            );
        }
    }

    Ok(())
}

async fn check_subjects(config: &PipelineConfig) -> anyhow::Result<()> {
    let subjects = read_subjects(&config.subjects_file).await?;
    anyhow::ensure!(
        !subjects.is_empty(),
        "subjects file {} is empty",
        config.subjects_file.display()
    );
    info!(
        "Found {} subjects in {}",
        subjects.len(),
        config.subjects_file.display()
    );
    Ok(())
}

async fn generate(dirs: &WorkDirs, config: &PipelineConfig) -> anyhow::Result<()> {
    let chat = ChatClient::from_env()?;
    let count = run_content_generation(dirs, &config.subjects_file, &chat).await?;
    info!("Generated content for {} subjects", count);
    Ok(())
}

async fn process(dirs: &WorkDirs, config: &PipelineConfig) -> anyhow::Result<RunSummary> {
    let tasks = load_tasks(dirs).await?;
    info!("Found {} videos to process", tasks.len());

    let mut store = ProgressStore::load(Box::new(JsonFileStore::new(dirs.progress_file())))?;

    let chat = ChatClient::from_env()?;
    let images = ImageSearchClient::from_env()?;
    let synth = Synthesizer::from_env();

    let runner = VideoTaskRunner::new(dirs.clone(), config.clone(), chat, images, synth);
    let summary = Scheduler::new(config.max_retries)
        .run(tasks, &mut store, &runner)
        .await?;

    Ok(summary)
}

/// Copy the plan, content, and scripts next to the results for review.
async fn export_artifacts(dirs: &WorkDirs) -> anyhow::Result<()> {
    if dirs.plan_file().exists() {
        tokio::fs::copy(dirs.plan_file(), dirs.output_dir().join("plan.txt")).await?;
    }
    if dirs.content_file().exists() {
        tokio::fs::copy(dirs.content_file(), dirs.output_dir().join("content.txt")).await?;
    }
    if dirs.plan_dir().exists() {
        copy_dir_replacing(&dirs.plan_dir(), &dirs.scripts_export_dir()).await?;
    }
    info!("Run artifacts exported to {}", dirs.output_dir().display());
    Ok(())
}
