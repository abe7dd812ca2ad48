//! Repackaging error types.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Result type for repackaging operations.
pub type RepackResult<T> = Result<T, RepackError>;

/// Errors that can occur while repackaging a plugin.
#[derive(Debug, Error)]
pub enum RepackError {
    /// Downloading the plugin package failed.
    #[error("Download failed for {url}: {reason}")]
    Download { url: String, reason: String },

    /// The plugin archive could not be unpacked.
    #[error("Extraction failed: {0}")]
    Extraction(String),

    /// The plugin package path does not point at an existing file.
    #[error("Plugin package not found: {0}")]
    PackageNotFound(PathBuf),

    /// A pip invocation exited non-zero while vendoring dependencies.
    #[error("Dependency build failed: {stage} exited with {status}")]
    DependencyBuild { stage: &'static str, status: ExitStatus },

    /// The final packaging invocation failed.
    #[error("Repackage failed: {0}")]
    Repackage(String),

    /// The bundled dify-plugin executable is missing.
    #[error("Packaging executable not found: {0}")]
    MissingPackager(PathBuf),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The plugin manifest could not be parsed or written.
    #[error("Invalid manifest: {0}")]
    Manifest(#[from] serde_yaml::Error),

    /// The verification record could not be parsed or written.
    #[error("Invalid verification record: {0}")]
    Verification(#[from] serde_json::Error),
}
