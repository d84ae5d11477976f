use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the launch engine and its collaborators.
/// Every module returns `Result<T, LauncherError>`.
#[derive(Debug, Error)]
pub enum LauncherError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    // ── JSON ────────────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Version graph ───────────────────────────────────
    #[error("Version not found: {0}")]
    VersionNotFound(String),

    #[error("Cyclic inheritance detected: version {id} appears twice in its ancestor chain")]
    CyclicInheritance { id: String },

    #[error("Version {id} inherits from {parent}, which could not be found")]
    MissingParentVersion { id: String, parent: String },

    // ── Libraries ───────────────────────────────────────
    #[error("Invalid Maven coordinate: {0}")]
    InvalidMavenCoordinate(String),

    #[error("Library {name} has no artifact path and no parseable coordinate")]
    MissingArtifactPath { name: String },

    // ── Arguments ───────────────────────────────────────
    #[error("Required argument value is missing: {name}")]
    MissingRequiredArgumentValue { name: String },

    // ── Launch options ──────────────────────────────────
    #[error("Invalid launch option: {0}")]
    InvalidLaunchOption(String),
}

/// Convenience alias used throughout the crate.
pub type LauncherResult<T> = Result<T, LauncherError>;

impl From<std::io::Error> for LauncherError {
    fn from(source: std::io::Error) -> Self {
        LauncherError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}
