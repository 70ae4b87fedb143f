//! Scenario-based tests for the dexploy pipeline

mod helpers;

mod full_build;
mod install_sequence;
mod missing_package;
mod no_signing;
mod signing_failure;
