// Small helpers shared by the pipeline stages.

// Line-oriented file reads and deterministic writes.
pub mod file_operations;
// Tilde expansion and install path resolution.
pub mod path_helpers;
// Launcher flavour per host platform, executable permissions.
pub mod platform;
