//! Test: a failing signer aborts the pipeline before installation

use crate::helpers::*;
use dexploy::execution::{ExecutionEngine, PipelineError};

#[tokio::test]
async fn test_signing_failure_is_fatal_and_blocks_install() {
    let ws = TestWorkspace::new(true, Some("emulator-5554"));
    let mut pipeline = ws.pipeline();

    let runner = MockRunner::new()
        .with_effect("--no-desugaring", ws.dex_effect())
        .with_rule("apksigner", 1, "Failed to load signer");
    let log = runner.log();

    let engine = ExecutionEngine::new(runner);
    let result = engine.execute(&mut pipeline).await;

    assert!(matches!(
        result,
        Err(PipelineError::TaskFailed { ref task, .. }) if task == "sign"
    ));
    assert!(pipeline.has_failed());
    assert_task_failed(&pipeline, "sign");

    // The install phase never started
    assert_task_pending(&pipeline, "install");
    assert!(!recorded(&log).iter().any(|c| c.starts_with("adb")));
}
