//! Pipeline domain model and task-graph assembly

use crate::core::{
    artifacts::ArtifactSet,
    config::{DeviceTarget, PipelineConfig, Signing},
    state::{ExecutionStatus, PipelineState},
    task::{Task, TaskKind},
};
use anyhow::Result;
use std::collections::{HashMap, HashSet};

/// An assembled pipeline: the task graph plus everything the tasks need
///
/// Branch membership (signing, installation) is resolved exactly once here,
/// after the configuration is fully loaded; execution never re-evaluates it.
#[derive(Debug, Clone)]
pub struct Pipeline {
    /// Pipeline name (the plugin name)
    pub name: String,

    /// Immutable configuration snapshot
    pub config: PipelineConfig,

    /// Artifact paths owned by this run
    pub artifacts: ArtifactSet,

    /// Resolved signing branch
    pub signing: Signing,

    /// Resolved install branch
    pub device: DeviceTarget,

    /// Declared tasks by id
    pub tasks: HashMap<String, Task>,

    /// Execution state
    pub state: PipelineState,

    /// Task execution order (topological sort)
    execution_order: Vec<String>,
}

impl Pipeline {
    /// Assemble the task graph for a validated configuration
    ///
    /// The graph is fixed: clean, build-archive, convert-dex and package are
    /// always present; sign joins when signing is configured; install joins
    /// when a device target resolved on top of that.
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        config.validate()?;

        let signing = config.signing();
        let device = config.device_target();
        let artifacts = ArtifactSet::new(&config.root_dir, &config.plugin_name);

        let mut declared = vec![
            Task::new(TaskKind::Clean),
            Task::new(TaskKind::BuildArchive).run_after(&["clean"]),
            Task::new(TaskKind::ConvertDex).depends_on(&["build-archive"]),
            Task::new(TaskKind::Package)
                .depends_on(&["convert-dex"])
                .run_after(&["clean"]),
        ];

        if let Signing::Enabled { .. } = signing {
            declared.push(Task::new(TaskKind::Sign).depends_on(&["package"]));
        }
        if let DeviceTarget::Device(_) = device {
            declared.push(Task::new(TaskKind::Install).depends_on(&["sign"]));
        }

        Self::validate_graph(&declared)?;

        let tasks: HashMap<String, Task> = declared
            .into_iter()
            .map(|task| (task.id.clone(), task))
            .collect();
        let execution_order = Self::topological_sort(&tasks);

        Ok(Pipeline {
            name: config.plugin_name.clone(),
            config: config.clone(),
            artifacts,
            signing,
            device,
            tasks,
            state: PipelineState::new(),
            execution_order,
        })
    }

    /// Get a task by ID
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    /// Get a mutable task by ID
    pub fn task_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.get_mut(id)
    }

    /// Check if all tasks are in a terminal state
    pub fn is_complete(&self) -> bool {
        self.tasks.values().all(|t| t.state.is_terminal())
    }

    /// Check if the pipeline has failed
    pub fn has_failed(&self) -> bool {
        self.state.status == ExecutionStatus::Failed
    }

    /// Get execution order (topological sort)
    pub fn execution_order(&self) -> &[String] {
        &self.execution_order
    }

    /// Validate the declared graph: unique ids, known edges, no cycles
    fn validate_graph(tasks: &[Task]) -> Result<()> {
        let mut seen_ids = HashSet::new();
        for task in tasks {
            if !seen_ids.insert(&task.id) {
                anyhow::bail!("Duplicate task id: {}", task.id);
            }
        }

        let ids: HashSet<_> = tasks.iter().map(|t| t.id.as_str()).collect();
        for task in tasks {
            for dep in task.predecessors() {
                if !ids.contains(dep.as_str()) {
                    anyhow::bail!(
                        "Task '{}' depends on undeclared task '{}'",
                        task.id,
                        dep
                    );
                }
            }
        }

        let by_id: HashMap<&str, &Task> =
            tasks.iter().map(|t| (t.id.as_str(), t)).collect();
        let mut visited = HashSet::new();
        let mut stack = HashSet::new();
        for task in tasks {
            Self::dfs_check(&task.id, &by_id, &mut visited, &mut stack)?;
        }

        Ok(())
    }

    fn dfs_check(
        task_id: &str,
        tasks: &HashMap<&str, &Task>,
        visited: &mut HashSet<String>,
        stack: &mut HashSet<String>,
    ) -> Result<()> {
        if visited.contains(task_id) {
            return Ok(());
        }
        stack.insert(task_id.to_string());

        if let Some(task) = tasks.get(task_id) {
            for dep in task.predecessors() {
                if stack.contains(dep.as_str()) {
                    anyhow::bail!("Cycle detected in task graph involving '{}'", dep);
                }
                Self::dfs_check(dep, tasks, visited, stack)?;
            }
        }

        stack.remove(task_id);
        visited.insert(task_id.to_string());
        Ok(())
    }

    /// Calculate a deterministic topological order over all predecessor edges
    fn topological_sort(tasks: &HashMap<String, Task>) -> Vec<String> {
        let mut result = Vec::new();
        let mut visited = HashSet::new();

        // Sort for deterministic order
        let mut task_ids: Vec<_> = tasks.keys().cloned().collect();
        task_ids.sort();

        for task_id in task_ids {
            Self::visit(&task_id, tasks, &mut visited, &mut result);
        }

        result
    }

    fn visit(
        task_id: &str,
        tasks: &HashMap<String, Task>,
        visited: &mut HashSet<String>,
        result: &mut Vec<String>,
    ) {
        if visited.contains(task_id) {
            return;
        }
        visited.insert(task_id.to_string());

        if let Some(task) = tasks.get(task_id) {
            for dep in task.predecessors() {
                Self::visit(dep, tasks, visited, result);
            }
        }

        result.push(task_id.to_string());
    }
}
