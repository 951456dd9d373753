//! Error types for the gomoku-rl crate

use thiserror::Error;

use crate::types::Position;

/// Main error type for the gomoku-rl crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid move: position {position} is already occupied")]
    InvalidMove { position: Position },

    #[error("position {position} is outside the {size}x{size} board")]
    InvalidPosition { position: Position, size: usize },

    #[error("invalid transition distribution: probabilities sum to {total}, draw was {draw}")]
    InvalidDistribution { total: f64, draw: f64 },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("board rows have inconsistent length: expected {expected} cells, got {got} in '{context}'")]
    InvalidBoardLength {
        expected: usize,
        got: usize,
        context: String,
    },

    #[error("invalid character '{character}' at column {column} in '{context}'")]
    InvalidCellCharacter {
        character: char,
        column: usize,
        context: String,
    },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
