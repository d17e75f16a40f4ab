// Installation pipeline and its supporting pieces.

// External process boundary (python, pip, admin setup, final launch).
pub mod command_runner;
// Locating and parsing `installer.yaml`.
pub mod config_loading;
// Administrator credential gate for web-capable modes.
pub mod credential_gate;
// Manifest construction and package installation.
pub mod dependency_resolver;
// Stage error types.
pub mod errors;
// Start scripts for the installed applications.
pub mod launcher_generator;
// The stage-by-stage installation state machine.
pub mod orchestrator;
// Install directory creation and payload copy.
pub mod payload;
// Outcome report printed at the end of a run.
pub mod reporting;
pub mod utilities;
