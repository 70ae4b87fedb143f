//! Main execution engine - orchestrates the entire pipeline run

use crate::{
    core::{
        DeviceTarget, ExecutionStatus, Pipeline, Signing, TaskKind, TaskState,
    },
    process::CommandRunner,
    steps::{self, archive::ArchiveEntry, install::InstallOutcome, StepError},
};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Events that can occur during pipeline execution
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    PipelineStarted {
        execution_id: Uuid,
        pipeline_name: String,
    },
    TaskStarted {
        task_id: String,
    },
    TaskOutput {
        task_id: String,
        output: String,
    },
    TaskCompleted {
        task_id: String,
    },
    TaskSkipped {
        task_id: String,
        reason: String,
    },
    TaskFailed {
        task_id: String,
        error: String,
    },
    PipelineCompleted {
        execution_id: Uuid,
        status: ExecutionStatus,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(ExecutionEvent) + Send + Sync>;

/// Fatal pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("task `{task}` failed: {error}")]
    TaskFailed { task: String, error: String },
}

/// How a single task run ended
enum TaskRun {
    /// Task did its work
    Completed { output: String },
    /// Task had nothing to do (unconfigured branch, unreachable device)
    Skipped { reason: String },
    /// Task failed, but not fatally for the pipeline
    SoftFailed { error: String },
}

/// Main pipeline execution engine
///
/// Tasks run strictly sequentially in topological order; each external
/// command is awaited before anything else happens. There are no retries:
/// every task and every external call runs at most once per pipeline run.
pub struct ExecutionEngine<R> {
    runner: R,
    event_handlers: Vec<EventHandler>,
}

impl<R: CommandRunner> ExecutionEngine<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            event_handlers: Vec::new(),
        }
    }

    /// Add an event handler
    pub fn add_event_handler<F>(&mut self, handler: F)
    where
        F: Fn(ExecutionEvent) + Send + Sync + 'static,
    {
        self.event_handlers.push(Arc::new(handler));
    }

    /// Emit an event to all handlers
    fn emit(&self, event: ExecutionEvent) {
        for handler in &self.event_handlers {
            handler(event.clone());
        }
    }

    /// Execute the entire pipeline
    pub async fn execute(&self, pipeline: &mut Pipeline) -> Result<(), PipelineError> {
        let execution_id = pipeline.state.execution_id;
        info!(
            "Starting pipeline execution: {} ({})",
            pipeline.name, execution_id
        );
        self.emit(ExecutionEvent::PipelineStarted {
            execution_id,
            pipeline_name: pipeline.name.clone(),
        });

        pipeline.state.start(pipeline.tasks.len());

        let order = pipeline.execution_order().to_vec();
        let mut fatal: Option<PipelineError> = None;

        for task_id in &order {
            let finished: HashSet<String> = pipeline
                .tasks
                .values()
                .filter(|t| {
                    matches!(
                        t.state,
                        TaskState::Completed { .. } | TaskState::Skipped { .. }
                    )
                })
                .map(|t| t.id.clone())
                .collect();

            let Some(task) = pipeline.task(task_id) else {
                continue;
            };
            let kind = task.kind;

            if !task.dependencies_met(&finished) {
                let reason = "a predecessor task did not complete".to_string();
                self.mark_task_skipped(pipeline, task_id, reason);
                continue;
            }

            if let Some(task) = pipeline.task_mut(task_id) {
                task.state = TaskState::Running {
                    started_at: Utc::now(),
                };
            }
            self.emit(ExecutionEvent::TaskStarted {
                task_id: task_id.clone(),
            });

            match self.run_task(pipeline, kind).await {
                Ok(TaskRun::Completed { output }) => {
                    self.mark_task_success(pipeline, task_id, output);
                }
                Ok(TaskRun::Skipped { reason }) => {
                    self.mark_task_skipped(pipeline, task_id, reason);
                }
                Ok(TaskRun::SoftFailed { error }) => {
                    warn!("Task {} failed (non-fatal): {}", task_id, error);
                    self.mark_task_failed(pipeline, task_id, error);
                }
                Err(e) => {
                    let message = e.to_string();
                    error!("Task {} failed: {}", task_id, message);
                    self.mark_task_failed(pipeline, task_id, message.clone());
                    pipeline.state.fail();
                    fatal = Some(PipelineError::TaskFailed {
                        task: task_id.clone(),
                        error: message,
                    });
                    break;
                }
            }
        }

        if let Some(err) = fatal {
            self.emit(ExecutionEvent::PipelineCompleted {
                execution_id,
                status: ExecutionStatus::Failed,
            });
            return Err(err);
        }

        pipeline.state.complete();
        info!("Pipeline execution finished: {}", pipeline.name);
        self.emit(ExecutionEvent::PipelineCompleted {
            execution_id,
            status: ExecutionStatus::Completed,
        });
        Ok(())
    }

    /// Execute a single task
    async fn run_task(
        &self,
        pipeline: &Pipeline,
        kind: TaskKind,
    ) -> Result<TaskRun, StepError> {
        let config = &pipeline.config;
        let artifacts = &pipeline.artifacts;

        match kind {
            TaskKind::Clean => {
                let removed = steps::clean::clean(&artifacts.cleanable())?;
                let output = removed
                    .iter()
                    .map(|p| format!("removed {}", p.display()))
                    .collect::<Vec<_>>()
                    .join("\n");
                Ok(TaskRun::Completed { output })
            }
            TaskKind::BuildArchive => {
                steps::archive::build_from_dir(&artifacts.staging_jar, &config.classes_dir)?;
                Ok(TaskRun::Completed {
                    output: format!("wrote {}", artifacts.staging_jar.display()),
                })
            }
            TaskKind::ConvertDex => {
                let outcome = steps::convert::convert(
                    &self.runner,
                    &config.d8(),
                    &artifacts.staging_jar,
                    &config.root_dir,
                )
                .await?;
                if !outcome.success() {
                    return Err(StepError::ToolFailed {
                        tool: "d8",
                        code: outcome.exit_code,
                        output: outcome.output,
                    });
                }
                Ok(TaskRun::Completed {
                    output: outcome.output,
                })
            }
            TaskKind::Package => {
                steps::stamp::write_version_file(
                    &artifacts.version_file,
                    config.version,
                    &config.plugin_name,
                )?;
                steps::archive::build(
                    &artifacts.final_jar,
                    &[
                        ArchiveEntry::from_path(&artifacts.dex_file),
                        ArchiveEntry::from_path(&artifacts.version_file),
                    ],
                )?;
                // The intermediates are folded into the final archive now;
                // they are removed whatever signing or installation do later.
                steps::clean::clean(&artifacts.intermediates())?;
                Ok(TaskRun::Completed {
                    output: format!("wrote {}", artifacts.final_jar.display()),
                })
            }
            TaskKind::Sign => {
                let Signing::Enabled {
                    certs_dir,
                    tools_dir,
                } = &pipeline.signing
                else {
                    return Ok(TaskRun::Skipped {
                        reason: "signing is not configured".to_string(),
                    });
                };
                steps::sign::sign(
                    &self.runner,
                    &tools_dir.join("apksigner"),
                    certs_dir,
                    config.min_sdk,
                    &artifacts.final_jar,
                )
                .await?;
                Ok(TaskRun::Completed {
                    output: format!("signed {}", artifacts.final_jar.display()),
                })
            }
            TaskKind::Install => {
                let DeviceTarget::Device(device_id) = &pipeline.device else {
                    return Ok(TaskRun::Skipped {
                        reason: "no device configured".to_string(),
                    });
                };
                let outcome = steps::install::install(
                    &self.runner,
                    device_id,
                    &artifacts.final_jar,
                    &config.package,
                )
                .await?;
                match outcome {
                    InstallOutcome::Completed => Ok(TaskRun::Completed {
                        output: format!("installed on {}", device_id),
                    }),
                    InstallOutcome::DeviceNotConnected => Ok(TaskRun::Skipped {
                        reason: format!("device {} is not connected", device_id),
                    }),
                    InstallOutcome::Aborted { command, exit_code } => {
                        Ok(TaskRun::SoftFailed {
                            error: format!(
                                "`{}` exited with code {}; installation abandoned",
                                command, exit_code
                            ),
                        })
                    }
                }
            }
        }
    }

    /// Mark a task as completed successfully
    fn mark_task_success(&self, pipeline: &mut Pipeline, task_id: &str, output: String) {
        if let Some(task) = pipeline.task_mut(task_id) {
            let started_at = match &task.state {
                TaskState::Running { started_at } => *started_at,
                _ => Utc::now(),
            };
            task.state = TaskState::Completed {
                output: output.clone(),
                started_at,
                completed_at: Utc::now(),
            };
        }
        pipeline.state.completed_tasks += 1;

        if !output.is_empty() {
            self.emit(ExecutionEvent::TaskOutput {
                task_id: task_id.to_string(),
                output,
            });
        }
        self.emit(ExecutionEvent::TaskCompleted {
            task_id: task_id.to_string(),
        });
    }

    /// Mark a task as failed
    fn mark_task_failed(&self, pipeline: &mut Pipeline, task_id: &str, error: String) {
        if let Some(task) = pipeline.task_mut(task_id) {
            let started_at = match &task.state {
                TaskState::Running { started_at } => *started_at,
                _ => Utc::now(),
            };
            task.state = TaskState::Failed {
                error: error.clone(),
                started_at,
                failed_at: Utc::now(),
            };
        }
        pipeline.state.failed_tasks += 1;

        self.emit(ExecutionEvent::TaskFailed {
            task_id: task_id.to_string(),
            error,
        });
    }

    /// Mark a task as skipped
    fn mark_task_skipped(&self, pipeline: &mut Pipeline, task_id: &str, reason: String) {
        if let Some(task) = pipeline.task_mut(task_id) {
            task.state = TaskState::Skipped {
                reason: reason.clone(),
            };
        }

        self.emit(ExecutionEvent::TaskSkipped {
            task_id: task_id.to_string(),
            reason,
        });
    }
}
