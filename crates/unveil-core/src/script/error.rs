use std::path::PathBuf;

use thiserror::Error;

/// Why a script could not be loaded or validated.
///
/// Stage and line indices are stored zero-based and printed one-based.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("script id must not be empty")]
    MissingId,

    #[error("script `{id}` has no stages")]
    NoStages { id: String },

    #[error("script `{id}`: stage {} has no lines", .stage + 1)]
    EmptyStage { id: String, stage: usize },

    #[error("script `{id}`: stage {} has an empty name", .stage + 1)]
    UnnamedStage { id: String, stage: usize },

    #[error(
        "script `{id}`: stage {} line {}: typing delay must be greater than zero",
        .stage + 1,
        .line + 1
    )]
    ZeroTypingDelay {
        id: String,
        stage: usize,
        line: usize,
    },

    #[error("unknown script `{0}` (see `unveil scripts list`)")]
    UnknownScript(String),

    #[error("duplicate script id `{0}`")]
    DuplicateId(String),

    #[error("unsupported script format: {} (expected .toml, .yaml or .yml)", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {origin}: {message}")]
    Parse { origin: String, message: String },
}
