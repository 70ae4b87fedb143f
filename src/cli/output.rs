//! CLI output formatting

use crate::core::{ExecutionStatus, TaskState};
use crate::execution::ExecutionEvent;
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static SPINNER: Emoji<'_, '_> = Emoji("⏳ ", "~ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "!");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Create a progress bar over the pipeline's tasks
pub fn create_progress_bar(total: usize) -> ProgressBar {
    let progress = ProgressBar::new(total as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}

/// Format a task state for display
pub fn format_task_state(state: &TaskState) -> String {
    match state {
        TaskState::Pending => style("PENDING").dim().to_string(),
        TaskState::Running { .. } => style("RUNNING").yellow().to_string(),
        TaskState::Completed { .. } => style("COMPLETED").green().to_string(),
        TaskState::Failed { .. } => style("FAILED").red().to_string(),
        TaskState::Skipped { .. } => style("SKIPPED").dim().to_string(),
    }
}

/// Format an execution status for display
pub fn format_status(status: ExecutionStatus) -> String {
    match status {
        ExecutionStatus::Pending => style("PENDING").dim().to_string(),
        ExecutionStatus::Running => style("RUNNING").yellow().to_string(),
        ExecutionStatus::Completed => style("COMPLETED").green().to_string(),
        ExecutionStatus::Failed => style("FAILED").red().to_string(),
    }
}

/// Format an execution event for display
pub fn format_execution_event(event: &ExecutionEvent) -> String {
    match event {
        ExecutionEvent::PipelineStarted {
            execution_id,
            pipeline_name,
        } => format!(
            "{} Starting pipeline {} ({})",
            ROCKET,
            style(pipeline_name).bold(),
            style(&execution_id.to_string()[..8]).dim()
        ),
        ExecutionEvent::TaskStarted { task_id } => {
            format!("{} {}", SPINNER, style(task_id).cyan())
        }
        ExecutionEvent::TaskOutput { task_id, output } => {
            format!(
                "{} Output from {}:\n{}",
                INFO,
                style(task_id).dim(),
                format_output(output, 5)
            )
        }
        ExecutionEvent::TaskCompleted { task_id } => {
            format!("{} {}", CHECK, style(task_id).cyan())
        }
        ExecutionEvent::TaskSkipped { task_id, reason } => {
            format!(
                "{} {} skipped: {}",
                WARN,
                style(task_id).cyan(),
                style(reason).dim()
            )
        }
        ExecutionEvent::TaskFailed { task_id, error } => {
            format!("{} {}: {}", CROSS, style(task_id).cyan(), style(error).red())
        }
        ExecutionEvent::PipelineCompleted { status, .. } => {
            let icon = match status {
                ExecutionStatus::Completed => CHECK,
                ExecutionStatus::Failed => CROSS,
                _ => INFO,
            };
            format!("{} Pipeline {}", icon, format_status(*status))
        }
    }
}

/// Format tool output, keeping at most `max_lines` trailing lines
pub fn format_output(output: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = output.lines().collect();
    let shown = if lines.len() > max_lines {
        &lines[lines.len() - max_lines..]
    } else {
        &lines[..]
    };
    shown
        .iter()
        .map(|line| format!("  {}", style(line).dim()))
        .collect::<Vec<_>>()
        .join("\n")
}
