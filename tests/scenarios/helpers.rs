//! Test utilities for pipeline scenarios

use async_trait::async_trait;
use dexploy::core::{Pipeline, PipelineConfig, TaskState};
use dexploy::process::{CommandOutcome, CommandRunner, ExternalCommand, RunnerError};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

type Effect = Box<dyn Fn() + Send + Sync>;

/// Mock runner: canned outcomes matched by command substring, with optional
/// filesystem side effects standing in for what the real tools produce
pub struct MockRunner {
    rules: Vec<(String, CommandOutcome)>,
    effects: Vec<(String, Effect)>,
    log: Arc<Mutex<Vec<String>>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            effects: Vec::new(),
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Commands containing `needle` return this outcome (first match wins);
    /// everything else succeeds with empty output.
    pub fn with_rule(mut self, needle: &str, exit_code: i32, output: &str) -> Self {
        self.rules.push((
            needle.to_string(),
            CommandOutcome {
                exit_code,
                output: output.to_string(),
            },
        ));
        self
    }

    /// Commands containing `needle` trigger this side effect before the
    /// outcome is resolved.
    pub fn with_effect<F>(mut self, needle: &str, effect: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.effects.push((needle.to_string(), Box::new(effect)));
        self
    }

    /// Shared handle to the invocation log; survives moving the runner into
    /// an engine.
    pub fn log(&self) -> Arc<Mutex<Vec<String>>> {
        self.log.clone()
    }
}

#[async_trait]
impl CommandRunner for MockRunner {
    async fn run(
        &self,
        command: &ExternalCommand,
    ) -> Result<Option<CommandOutcome>, RunnerError> {
        if command.is_empty() {
            return Ok(None);
        }
        let line = command.to_string();
        self.log.lock().unwrap().push(line.clone());

        for (needle, effect) in &self.effects {
            if line.contains(needle) {
                effect();
            }
        }
        for (needle, outcome) in &self.rules {
            if line.contains(needle) {
                return Ok(Some(outcome.clone()));
            }
        }
        Ok(Some(CommandOutcome {
            exit_code: 0,
            output: String::new(),
        }))
    }
}

pub fn recorded(log: &Arc<Mutex<Vec<String>>>) -> Vec<String> {
    log.lock().unwrap().clone()
}

pub fn index_of(log: &[String], needle: &str) -> usize {
    log.iter()
        .position(|line| line.contains(needle))
        .unwrap_or_else(|| panic!("no recorded command contains `{}`", needle))
}

/// A throwaway workspace: a compiled-classes tree plus a pipeline config
/// rooted in a temp directory
pub struct TestWorkspace {
    pub dir: tempfile::TempDir,
    pub config: PipelineConfig,
}

impl TestWorkspace {
    pub fn new(signing: bool, device: Option<&str>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let classes = dir.path().join("classes");
        std::fs::create_dir_all(classes.join("com/example")).unwrap();
        std::fs::write(classes.join("com/example/Plugin.class"), b"cafebabe").unwrap();

        let mut yaml = format!(
            r#"
plugin_name: "mqtt-bridge"
version: 7
package: "com.example.mqtt"
root_dir: "{root}"
classes_dir: "{classes}"
build_tools: "{tools}"
"#,
            root = dir.path().display(),
            classes = classes.display(),
            tools = dir.path().join("build-tools").display(),
        );
        if signing {
            yaml.push_str(&format!(
                "sign_certs: \"{}\"\n",
                dir.path().join("keys").display()
            ));
        }
        if let Some(id) = device {
            yaml.push_str(&format!("device_id: \"{}\"\n", id));
        }

        let config = PipelineConfig::from_yaml(&yaml).unwrap();
        Self { dir, config }
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    pub fn pipeline(&self) -> Pipeline {
        Pipeline::from_config(&self.config).unwrap()
    }

    /// Side effect standing in for the converter: drops classes.dex into the
    /// workspace root
    pub fn dex_effect(&self) -> impl Fn() + Send + Sync + 'static {
        let dex = self.root().join("classes.dex");
        move || {
            std::fs::write(&dex, b"dex bytes").unwrap();
        }
    }
}

pub fn assert_task_completed(pipeline: &Pipeline, id: &str) {
    let task = pipeline.task(id).unwrap_or_else(|| panic!("no task `{}`", id));
    assert!(
        matches!(task.state, TaskState::Completed { .. }),
        "task `{}` is {:?}, expected Completed",
        id,
        task.state
    );
}

pub fn assert_task_failed(pipeline: &Pipeline, id: &str) {
    let task = pipeline.task(id).unwrap_or_else(|| panic!("no task `{}`", id));
    assert!(
        matches!(task.state, TaskState::Failed { .. }),
        "task `{}` is {:?}, expected Failed",
        id,
        task.state
    );
}

pub fn assert_task_skipped(pipeline: &Pipeline, id: &str) {
    let task = pipeline.task(id).unwrap_or_else(|| panic!("no task `{}`", id));
    assert!(
        matches!(task.state, TaskState::Skipped { .. }),
        "task `{}` is {:?}, expected Skipped",
        id,
        task.state
    );
}

pub fn assert_task_pending(pipeline: &Pipeline, id: &str) {
    let task = pipeline.task(id).unwrap_or_else(|| panic!("no task `{}`", id));
    assert!(
        matches!(task.state, TaskState::Pending),
        "task `{}` is {:?}, expected Pending",
        id,
        task.state
    );
}
