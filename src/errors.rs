
use std::path::PathBuf;

/// Result type used across the crate, defaults to [`CoocError`].
pub type Result<T, E = CoocError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum CoocError {

    /// A vocabulary, corpus or output file could not be opened. Fatal.
    #[error("Failed to open {role} file: {}", path.display())]
    FileOpen {
        role: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A vocabulary row that cannot be used. The loader skips these rows,
    /// the variant only surfaces through `VocabIndex::parse_record`.
    #[error("malformed vocabulary record at line {line}: {reason}")]
    MalformedRecord {
        line: u64,
        reason: String,
    },

    /// Bad or missing command line / json parameters.
    #[error("{0}")]
    Argument(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl CoocError {

    pub fn argument<S: Into<String>>(msg: S) -> Self {
        CoocError::Argument(msg.into())
    }

    pub fn file_open(role: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CoocError::FileOpen { role, path: path.into(), source }
    }

}
