use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("source text is empty after normalization")]
    EmptyInput,

    #[error("could not extract text from {path}: {message}")]
    Extraction { path: PathBuf, message: String },

    #[error("unsupported source document: {path}")]
    UnsupportedSource { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Config(#[from] config::ConfigError),
}
