// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MoveCheckError {
    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("Invalid input: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Ontology error: {0}")]
    Ontology(#[from] toml::de::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, MoveCheckError>;

impl MoveCheckError {
    #[must_use]
    pub fn io(source: std::io::Error, path: &std::path::Path) -> Self {
        MoveCheckError::Io {
            source,
            path: path.to_path_buf(),
        }
    }
}
