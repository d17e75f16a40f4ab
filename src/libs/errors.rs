// Error types for the installation pipeline.
// Each stage has its own error enum; `InstallError` wraps them and knows which
// stage a failure belongs to, so the reporting layer can print the stage and
// pick the exit code.

use crate::schemas::install::Stage;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures while copying the application payload into `Main/`.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("payload source {0} does not exist or is not a directory")]
    SourceMissing(PathBuf),

    #[error("payload source {source_dir} does not contain the entry script '{entry}'")]
    EntryPointMissing { source_dir: PathBuf, entry: String },

    #[error("failed to walk payload tree: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failures while building the manifest or running the package installer.
#[derive(Debug, Error)]
pub enum DependencyError {
    #[error("failed to read manifest {path}: {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write manifest {path}: {source}")]
    ManifestWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("python interpreter '{python}' is not usable: {reason}")]
    InterpreterUnavailable { python: String, reason: String },

    #[error("failed to start the package installer: {0}")]
    InstallerSpawn(#[source] io::Error),

    #[error("package installer exited with {status}: {stderr}")]
    InstallerFailed { status: String, stderr: String },
}

/// Failures of the administrator credential bootstrap.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("admin setup script {0} is missing from the payload")]
    ScriptMissing(PathBuf),

    #[error("failed to start the admin setup script: {0}")]
    Spawn(#[source] io::Error),

    #[error("admin setup exited with {0}; the web panel cannot be used without an administrator")]
    Failed(String),
}

/// Failures while writing launcher scripts.
#[derive(Debug, Error)]
pub enum LauncherError {
    #[error("failed to write launcher {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to make launcher {path} executable: {source}")]
    Permissions {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A fatal pipeline failure, tagged with the stage it happened in.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("could not create install directory {path}: {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    PayloadCopy(#[from] PayloadError),

    #[error(transparent)]
    DependencyResolve(#[from] DependencyError),

    #[error(transparent)]
    CredentialBootstrap(#[from] CredentialError),

    #[error(transparent)]
    LauncherGenerate(#[from] LauncherError),
}

impl InstallError {
    pub fn stage(&self) -> Stage {
        match self {
            InstallError::DirectoryCreate { .. } => Stage::DirectoryCreate,
            InstallError::PayloadCopy(_) => Stage::PayloadCopy,
            InstallError::DependencyResolve(_) => Stage::DependencyResolve,
            InstallError::CredentialBootstrap(_) => Stage::CredentialBootstrap,
            InstallError::LauncherGenerate(_) => Stage::LauncherGenerate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_follows_variant() {
        let err = InstallError::from(CredentialError::Failed("exit status: 1".into()));
        assert_eq!(err.stage(), Stage::CredentialBootstrap);

        let err = InstallError::from(DependencyError::InstallerFailed {
            status: "exit status: 1".into(),
            stderr: "No matching distribution".into(),
        });
        assert_eq!(err.stage(), Stage::DependencyResolve);
        assert!(err.to_string().contains("No matching distribution"));
    }
}
