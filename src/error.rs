use thiserror::Error;

use crate::modules::reorder::ReorderError;

pub type Result<T> = std::result::Result<T, WatchlistError>;

#[derive(Debug, Error)]
pub enum WatchlistError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error(transparent)]
    Reorder(#[from] ReorderError),
    #[error("network error: {0}")]
    Network(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("only the list owner can edit this list")]
    NotOwner,
    #[error("a save is already in progress")]
    SaveInProgress,
    #[error("no list has been loaded")]
    NotLoaded,
}

impl From<std::io::Error> for WatchlistError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<reqwest::Error> for WatchlistError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}
