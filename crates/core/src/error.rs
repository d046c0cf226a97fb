use thiserror::Error;

/// Top-level error type used across the entire application.
#[derive(Debug, Error)]
pub enum VigilError {
    #[error("config error: {0}")]
    Config(String),

    #[error("buffer error: {0}")]
    Buffer(String),

    #[error("metric source error: {0}")]
    Source(String),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

pub type Result<T, E = VigilError> = std::result::Result<T, E>;
