// This file implements the installer's logging system.
// It provides leveled macros (INFO, WARN, ERROR, DEBUG) plus a stage banner,
// all written to stderr so that stdout stays free for `--json` output.

use colored::*; // Used for adding color to log messages.
use std::sync::OnceLock; // Ensures the DEBUG_ENABLED flag is initialized exactly once.
use std::sync::atomic::{AtomicBool, Ordering}; // Thread-safe storage for the debug flag.

// `log_info!` for general installation progress.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => (eprintln!("{} {}", "[INFO]".bright_green(), format!($($arg)*)));
}

// `log_warn!` for non-fatal problems (e.g. a failed pip self-upgrade).
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => (eprintln!("{} {}", "[WARN]".bright_yellow(), format!($($arg)*)));
}

// `log_error!` for fatal stage failures and unusable input.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => (eprintln!("{} {}", "[ERROR]".bright_red(), format!($($arg)*)));
}

// `log_debug!` is only printed when `--debug` was passed.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if $crate::logger::is_debug_enabled() {
           eprintln!("{} {}", "[DEBUG]".dimmed(), format!($($arg)*));
        }
    };
}

// `log_stage!` prints a banner when the orchestrator enters a pipeline stage.
#[macro_export]
macro_rules! log_stage {
    ($($arg:tt)*) => {
        eprintln!("\n{} {}", "==>".bright_cyan().bold(), format!($($arg)*).bold());
    };
}

// Global flag to control debug logging, initialized once from the CLI.
static DEBUG_ENABLED: OnceLock<AtomicBool> = OnceLock::new();

/// Initializes the logger, setting the global debug mode.
/// Called once from `main` before any command runs.
///
/// # Arguments
/// * `debug`: If `true`, `log_debug!` output is shown.
pub fn init(debug: bool) {
    DEBUG_ENABLED
        .get_or_init(|| AtomicBool::new(debug))
        .store(debug, Ordering::Relaxed);

    log_debug!("Logger initialized in DEBUG mode");
}

/// Checks if debug logging is currently enabled.
/// Used by the `log_debug!` macro; `false` when `init` was never called (tests).
pub fn is_debug_enabled() -> bool {
    DEBUG_ENABLED
        .get()
        .map(|f| f.load(Ordering::Relaxed))
        .unwrap_or(false)
}
