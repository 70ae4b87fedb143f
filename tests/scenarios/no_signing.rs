//! Test: without signing configured the pipeline stops after packaging

use crate::helpers::*;
use dexploy::execution::ExecutionEngine;

#[tokio::test]
async fn test_unsigned_build_completes_without_sign_or_install() {
    let ws = TestWorkspace::new(false, None);
    let mut pipeline = ws.pipeline();

    let runner = MockRunner::new().with_effect("--no-desugaring", ws.dex_effect());
    let log = runner.log();

    let engine = ExecutionEngine::new(runner);
    engine.execute(&mut pipeline).await.unwrap();

    for id in ["clean", "build-archive", "convert-dex", "package"] {
        assert_task_completed(&pipeline, id);
    }
    assert!(pipeline.task("sign").is_none());
    assert!(pipeline.task("install").is_none());

    assert!(ws.root().join("mqtt-bridge.jar").exists());

    // The converter was the only external tool
    let log = recorded(&log);
    assert_eq!(log.len(), 1);
    assert!(log[0].contains("--no-desugaring"));
}
