//! Test: full happy path - clean through device install

use crate::helpers::*;
use dexploy::execution::ExecutionEngine;
use std::fs::File;
use std::io::Read;

#[tokio::test]
async fn test_full_build_deploys_in_order() {
    let ws = TestWorkspace::new(true, Some("emulator-5554"));
    let mut pipeline = ws.pipeline();

    let runner = MockRunner::new()
        .with_effect("--no-desugaring", ws.dex_effect())
        .with_rule(
            "adb devices",
            0,
            "List of devices attached\nemulator-5554\tdevice\n",
        );
    let log = runner.log();

    let engine = ExecutionEngine::new(runner);
    engine.execute(&mut pipeline).await.unwrap();

    for id in [
        "clean",
        "build-archive",
        "convert-dex",
        "package",
        "sign",
        "install",
    ] {
        assert_task_completed(&pipeline, id);
    }

    // Staging archive was built from the classes tree
    assert!(ws.root().join("app.jar").exists());

    // Final jar holds the converted code and the stamp, in that order
    let jar = ws.root().join("mqtt-bridge.jar");
    let mut archive = zip::ZipArchive::new(File::open(&jar).unwrap()).unwrap();
    assert_eq!(archive.len(), 2);
    {
        let entry = archive.by_index(0).unwrap();
        assert_eq!(entry.name(), "classes.dex");
    }
    {
        let mut entry = archive.by_index(1).unwrap();
        assert_eq!(entry.name(), "version.txt");
        let mut stamp = String::new();
        entry.read_to_string(&mut stamp).unwrap();
        assert!(stamp.starts_with("Version: 7\n"));
        assert!(stamp.contains("PluginName: mqtt-bridge"));
    }

    // Intermediates were consumed during packaging
    assert!(!ws.root().join("classes.dex").exists());
    assert!(!ws.root().join("version.txt").exists());

    // Tools ran in pipeline order
    let log = recorded(&log);
    let convert = index_of(&log, "--no-desugaring");
    let sign = index_of(&log, "apksigner");
    let listing = index_of(&log, "adb devices");
    let root = index_of(&log, "-s emulator-5554 root");
    let stop = index_of(&log, "force-stop");
    let push = index_of(&log, " push ");
    let broadcast = index_of(&log, "broadcast");
    assert!(convert < sign);
    assert!(sign < listing);
    assert!(listing < root);
    assert!(root < stop);
    assert!(stop < push);
    assert!(push < broadcast);
}
