//! Test: a missing target package is fatal before anything runs

use crate::helpers::*;
use dexploy::core::PipelineConfig;

const NO_PACKAGE: &str = r#"
plugin_name: "mqtt-bridge"
version: 7
classes_dir: "build/classes"
build_tools: "/opt/bt"
"#;

const BLANK_PACKAGE: &str = r#"
plugin_name: "mqtt-bridge"
version: 7
package: ""
classes_dir: "build/classes"
build_tools: "/opt/bt"
"#;

#[test]
fn test_missing_package_fails_validation() {
    assert!(PipelineConfig::from_yaml(NO_PACKAGE).is_err());
}

#[test]
fn test_blank_package_fails_validation() {
    assert!(PipelineConfig::from_yaml(BLANK_PACKAGE).is_err());
}

#[tokio::test]
async fn test_no_process_spawns_on_config_error() {
    let runner = MockRunner::new();
    let log = runner.log();

    // Validation fails before a pipeline, and therefore an engine, exists
    let result = PipelineConfig::from_yaml(BLANK_PACKAGE);
    assert!(result.is_err());

    assert!(recorded(&log).is_empty());
}
