//! Error types for the risk core

use thiserror::Error;

/// Risk core error
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid rule configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
