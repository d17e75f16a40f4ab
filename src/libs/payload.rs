// Materializes the install directory and copies the application payload into
// `{install}/Main`. Copies overwrite in place and are never rolled back; running
// the installer again is how a half-finished copy gets repaired.

use crate::libs::errors::{InstallError, PayloadError};
use crate::libs::utilities::path_helpers::payload_dir;
use crate::{log_debug, log_info};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directory names never copied into an installation.
const SKIPPED_DIRS: [&str; 3] = [".git", "__pycache__", ".pytest_cache"];

/// Creates the install directory and its `Main/` subdirectory.
///
/// # Returns
/// The path of `Main/` on success. Any failure is a `DirectoryCreate` error;
/// it is not retried.
pub fn prepare_directories(install_path: &Path) -> Result<PathBuf, InstallError> {
    let main_dir = payload_dir(install_path);
    log_info!(
        "[Payload] Creating directory: {}",
        main_dir.display().to_string().cyan()
    );
    fs::create_dir_all(&main_dir).map_err(|source| InstallError::DirectoryCreate {
        path: main_dir.clone(),
        source,
    })?;
    Ok(main_dir)
}

/// Copies everything under `source_dir` into `main_dir`, preserving the tree.
///
/// The source must exist and contain `entry_script`. Version-control and cache
/// directories are skipped, as are `install_path` and `main_dir` when they lie
/// inside the payload source. A source that already is `main_dir` is left
/// untouched.
///
/// # Returns
/// Number of files copied.
pub fn copy_payload(
    source_dir: &Path,
    install_path: &Path,
    main_dir: &Path,
    entry_script: &str,
) -> Result<usize, PayloadError> {
    if !source_dir.is_dir() {
        return Err(PayloadError::SourceMissing(source_dir.to_path_buf()));
    }
    if !source_dir.join(entry_script).is_file() {
        return Err(PayloadError::EntryPointMissing {
            source_dir: source_dir.to_path_buf(),
            entry: entry_script.to_string(),
        });
    }

    let copy_error = |from: &Path, to: &Path, source| PayloadError::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };
    let source_root = source_dir
        .canonicalize()
        .map_err(|e| copy_error(source_dir, main_dir, e))?;
    // Both directories exist at this point: `prepare_directories` ran first.
    let install_root = install_path.canonicalize().ok();
    let main_root = main_dir.canonicalize().ok();

    if main_root.as_deref() == Some(source_root.as_path()) {
        log_info!(
            "[Payload] Running from {}, files are already in place",
            main_dir.display().to_string().cyan()
        );
        return Ok(0);
    }

    log_info!(
        "[Payload] Copying files from {} to {}",
        source_root.display().to_string().cyan(),
        main_dir.display().to_string().cyan()
    );

    let walker = WalkDir::new(&source_root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            let skipped_name = entry.file_type().is_dir()
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| SKIPPED_DIRS.contains(&name));
            let is_destination = install_root.as_deref() == Some(entry.path())
                || main_root.as_deref() == Some(entry.path());
            !(skipped_name || is_destination)
        });

    let mut copied = 0;
    for entry in walker {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(&source_root)
            .unwrap_or(entry.path());
        let target = main_dir.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| copy_error(entry.path(), &target, e))?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| copy_error(entry.path(), &target, e))?;
            }
            fs::copy(entry.path(), &target).map_err(|e| copy_error(entry.path(), &target, e))?;
            log_debug!("[Payload] Copied {}", relative.display());
            copied += 1;
        }
    }

    log_info!("[Payload] {} file(s) copied", copied.to_string().green());
    Ok(copied)
}
