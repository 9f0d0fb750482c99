//! Game layer errors

use std::path::PathBuf;
use thiserror::Error;

/// Failures while loading game data or plugins
///
/// Script-visible failures stay [`quasar_interpreter::Error`]; this type
/// covers the embedding side (files, manifests, data definitions).
#[derive(Debug, Error)]
pub enum GameError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid ship list: {0}")]
    ShipList(#[from] serde_json::Error),

    #[error("duplicate {kind} id {id}")]
    DuplicateId { kind: &'static str, id: i32 },

    #[error("invalid {kind} id {id}")]
    InvalidId { kind: &'static str, id: i32 },

    #[error("{file}:{line}: {message}")]
    Manifest {
        file: String,
        line: usize,
        message: String,
    },

    #[error("compile error: {0}")]
    Compile(#[from] quasar_interpreter::CompileError),

    #[error("script error: {0}")]
    Script(#[from] quasar_interpreter::Error),
}

impl GameError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GameError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
