//! Task domain model

use crate::core::state::TaskState;
use std::collections::HashSet;

/// The kind of work a task performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Delete leftover artifacts from a previous run
    Clean,
    /// Package the compiled classes into the staging archive
    BuildArchive,
    /// Run the external converter over the staging archive
    ConvertDex,
    /// Write the version stamp and build the final plugin archive
    Package,
    /// Sign the final archive in place
    Sign,
    /// Push the archive to the device and restart the application
    Install,
}

impl TaskKind {
    /// Stable task identifier, used for dependency edges and display
    pub fn id(&self) -> &'static str {
        match self {
            TaskKind::Clean => "clean",
            TaskKind::BuildArchive => "build-archive",
            TaskKind::ConvertDex => "convert-dex",
            TaskKind::Package => "package",
            TaskKind::Sign => "sign",
            TaskKind::Install => "install",
        }
    }
}

/// A single task in the pipeline graph
///
/// Declared once during assembly, executed at most once per run, in an order
/// consistent with both `depends_on` and `run_after`.
#[derive(Debug, Clone)]
pub struct Task {
    /// Unique task identifier
    pub id: String,

    /// What this task does
    pub kind: TaskKind,

    /// Tasks whose output this task consumes
    pub depends_on: Vec<String>,

    /// Ordering-only predecessors (no data dependency)
    pub run_after: Vec<String>,

    /// Runtime state
    pub state: TaskState,
}

impl Task {
    pub fn new(kind: TaskKind) -> Self {
        Self {
            id: kind.id().to_string(),
            kind,
            depends_on: Vec::new(),
            run_after: Vec::new(),
            state: TaskState::Pending,
        }
    }

    pub fn depends_on(mut self, predecessors: &[&str]) -> Self {
        self.depends_on = predecessors.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn run_after(mut self, predecessors: &[&str]) -> Self {
        self.run_after = predecessors.iter().map(|s| s.to_string()).collect();
        self
    }

    /// All predecessor edges, data-bearing and ordering-only
    pub fn predecessors(&self) -> impl Iterator<Item = &String> {
        self.depends_on.iter().chain(self.run_after.iter())
    }

    /// Check whether every predecessor has finished successfully
    pub fn dependencies_met(&self, finished: &HashSet<String>) -> bool {
        self.predecessors().all(|dep| finished.contains(dep))
    }
}
