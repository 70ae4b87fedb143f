//! dexploy - packages, dexes, signs and deploys Android plugin jars

pub mod cli;
pub mod core;
pub mod execution;
pub mod process;
pub mod steps;

// Re-export commonly used types
pub use crate::core::{
    ArtifactSet, DeviceTarget, ExecutionStatus, Pipeline, PipelineConfig, Signing, Task,
    TaskKind, TaskState,
};
pub use crate::execution::{ExecutionEngine, ExecutionEvent, PipelineError};
pub use crate::process::{
    CommandOutcome, CommandRunner, ExternalCommand, ProcessRunner, RunnerError,
};
