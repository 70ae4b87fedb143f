//! Test: install sequence aborts on first failure, degrades when no device

use crate::helpers::*;
use dexploy::core::ExecutionStatus;
use dexploy::execution::ExecutionEngine;

#[tokio::test]
async fn test_push_failure_abandons_rest_of_sequence() {
    let ws = TestWorkspace::new(true, Some("emulator-5554"));
    let mut pipeline = ws.pipeline();

    let runner = MockRunner::new()
        .with_effect("--no-desugaring", ws.dex_effect())
        .with_rule("adb devices", 0, "emulator-5554\tdevice\n")
        .with_rule(" push ", 1, "error: device offline");
    let log = runner.log();

    let engine = ExecutionEngine::new(runner);
    let result = engine.execute(&mut pipeline).await;

    // An aborted install is a diagnostic, not a pipeline failure
    assert!(result.is_ok());
    assert_eq!(pipeline.state.status, ExecutionStatus::Completed);
    assert_task_failed(&pipeline, "install");

    let log = recorded(&log);
    assert!(log.iter().any(|c| c.contains(" push ")));
    assert!(!log.iter().any(|c| c.contains("broadcast")));
}

#[tokio::test]
async fn test_unreachable_device_skips_sequence_entirely() {
    let ws = TestWorkspace::new(true, Some("emulator-5554"));
    let mut pipeline = ws.pipeline();

    let runner = MockRunner::new()
        .with_effect("--no-desugaring", ws.dex_effect())
        .with_rule("adb devices", 0, "List of devices attached\n\n");
    let log = runner.log();

    let engine = ExecutionEngine::new(runner);
    engine.execute(&mut pipeline).await.unwrap();

    assert_eq!(pipeline.state.status, ExecutionStatus::Completed);
    assert_task_skipped(&pipeline, "install");

    // Only the listing was attempted; the bridge sequence never ran
    let adb_calls: Vec<String> = recorded(&log)
        .into_iter()
        .filter(|c| c.starts_with("adb"))
        .collect();
    assert_eq!(adb_calls, vec!["adb devices".to_string()]);
}
