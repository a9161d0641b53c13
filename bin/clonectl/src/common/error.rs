use alloy_primitives::hex::FromHexError;
use immutable_clone::{DeployError, EvmHostError};

/// Error types for clonectl commands
#[derive(Debug, thiserror::Error)]
pub enum CloneCtlError {
    /// Failed to read file
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Invalid hex string
    #[error("Invalid hex string: {0}")]
    InvalidHex(#[from] FromHexError),

    /// Invalid host configuration file
    #[error("Invalid config: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    /// Clone construction or deployment failed
    #[error(transparent)]
    Deploy(#[from] DeployError),

    /// The EVM rejected a transaction
    #[error("EVM host error: {0}")]
    Host(#[from] EvmHostError),
}

/// Result type for clonectl commands
pub type Result<T> = std::result::Result<T, CloneCtlError>;
