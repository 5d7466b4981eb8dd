//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! invalid configuration, unknown options, malformed colors, exhausted placements,
//! external engine failures, IO, and generic errors.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown option '{option}'")]
    UnknownOption { option: String },

    #[error("invalid color: {0}")]
    InvalidColor(String),

    #[error("could not place '{phrase}' after {attempts} attempts")]
    PlacementExhausted { phrase: String, attempts: usize },

    #[error("no zones available for placement")]
    MissingZones,

    #[error("image engine failed: {0}")]
    Render(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}
