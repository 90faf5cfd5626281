use thiserror::Error;

use draftflow_core::error::{CoreError, StoreError};

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("Input error: {0}")]
    Input(String),
}

/// A review channel or publisher could not complete its side effect.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Delivery rejected: {0}")]
    Rejected(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// An image generator produced nothing usable for a prompt.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Generation failed: {0}")]
    Failed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
