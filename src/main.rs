use anyhow::{Context, Result};
use dexploy::cli::commands::{CleanCommand, RunCommand, ValidateCommand};
use dexploy::cli::output::*;
use dexploy::cli::{Cli, Command};
use dexploy::core::{ArtifactSet, DeviceTarget, Pipeline, PipelineConfig, Signing};
use dexploy::execution::{ExecutionEngine, ExecutionEvent};
use dexploy::process::ProcessRunner;
use dexploy::steps;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    match &cli.command {
        Command::Run(cmd) => run_pipeline(cmd).await?,
        Command::Validate(cmd) => validate_pipeline(cmd)?,
        Command::Clean(cmd) => clean_workspace(cmd)?,
    }

    Ok(())
}

async fn run_pipeline(cmd: &RunCommand) -> Result<()> {
    let mut config = PipelineConfig::from_file(&cmd.file)
        .context("Failed to load pipeline config")?;

    if let Some(device) = &cmd.device {
        println!("{} Device override: {}", INFO, style(device).cyan());
        config.device_id = Some(device.clone());
    }

    let mut pipeline =
        Pipeline::from_config(&config).context("Failed to assemble pipeline")?;
    println!(
        "{} Loaded pipeline: {}",
        INFO,
        style(&pipeline.name).bold()
    );

    let progress = create_progress_bar(pipeline.tasks.len());

    let mut engine = ExecutionEngine::new(ProcessRunner::new());
    let bar = progress.clone();
    engine.add_event_handler(move |event| {
        bar.println(format_execution_event(&event));
        match &event {
            ExecutionEvent::TaskStarted { task_id } => {
                bar.set_message(task_id.clone());
            }
            ExecutionEvent::TaskCompleted { .. }
            | ExecutionEvent::TaskSkipped { .. }
            | ExecutionEvent::TaskFailed { .. } => {
                bar.inc(1);
            }
            _ => {}
        }
    });

    println!();
    let result = engine.execute(&mut pipeline).await;
    progress.finish_and_clear();

    println!("\n{} Task summary:", INFO);
    for task_id in pipeline.execution_order() {
        if let Some(task) = pipeline.task(task_id) {
            println!(
                "  {} {}",
                style(task_id).bold(),
                format_task_state(&task.state)
            );
        }
    }

    match result {
        Ok(()) => {
            println!(
                "\n{} {} completed {}",
                CHECK,
                style(&pipeline.name).bold(),
                style("successfully").green()
            );
            Ok(())
        }
        Err(e) => {
            println!(
                "\n{} {} {}: {}",
                CROSS,
                style(&pipeline.name).bold(),
                style("failed").red(),
                e
            );
            std::process::exit(1);
        }
    }
}

fn validate_pipeline(cmd: &ValidateCommand) -> Result<()> {
    println!("{} Validating pipeline...", INFO);

    let config = match PipelineConfig::from_file(&cmd.file) {
        Ok(config) => config,
        Err(e) => {
            println!("{} Validation failed:", CROSS);
            println!("  {}", style(e).red());
            std::process::exit(1);
        }
    };

    let pipeline = match Pipeline::from_config(&config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            println!("{} Pipeline assembly failed:", CROSS);
            println!("  {}", style(e).red());
            std::process::exit(1);
        }
    };

    println!("{} Pipeline configuration is valid!", CHECK);
    println!("  Plugin: {}", style(&pipeline.name).bold());
    println!(
        "  Tasks: {}",
        style(pipeline.execution_order().join(" → ")).cyan()
    );
    match &pipeline.signing {
        Signing::Enabled { certs_dir, .. } => {
            println!("  Signing: {}", style(certs_dir.display()).cyan());
        }
        Signing::Disabled => println!("  Signing: {}", style("disabled").dim()),
    }
    match &pipeline.device {
        DeviceTarget::Device(id) => println!("  Device: {}", style(id).cyan()),
        DeviceTarget::None => println!("  Device: {}", style("none").dim()),
    }

    if cmd.json {
        let json = serde_json::to_string_pretty(&config)?;
        println!("\n{}", json);
    }

    Ok(())
}

fn clean_workspace(cmd: &CleanCommand) -> Result<()> {
    let config = PipelineConfig::from_file(&cmd.file)
        .context("Failed to load pipeline config")?;
    let artifacts = ArtifactSet::new(&config.root_dir, &config.plugin_name);

    let removed = steps::clean::clean(&artifacts.cleanable())?;
    if removed.is_empty() {
        println!("{} Nothing to clean", INFO);
    } else {
        for path in &removed {
            println!("{} Removed {}", CHECK, style(path.display()).dim());
        }
    }

    Ok(())
}
