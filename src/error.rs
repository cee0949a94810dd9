use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Parse or shape error, annotated with the JSON path it occurred at.
    #[error("{file}: at JSON path {path} → {message}")]
    Json { file: String, path: String, message: String },

    #[error(transparent)]
    GlobPattern(#[from] glob::PatternError),

    #[error(transparent)]
    Glob(#[from] glob::GlobError),

    #[error("glob pattern matched no files: {0}")]
    NoGlobMatch(String),

    #[error("{file}: JSON pointer {pointer} selects nothing")]
    MissingPointer { file: String, pointer: String },

    #[error("{file}: jq filter failed: {message}")]
    Jq { file: String, message: String },
}
