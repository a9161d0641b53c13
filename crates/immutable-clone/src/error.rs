//! Error types for clone construction and deployment.

use alloy_primitives::Address;

/// Reasons a clone deployment fails.
///
/// Every variant is a "deployment failed" outcome. Callers racing for the same deterministic
/// address should expect [`DeployError::AddressOccupied`] and retry with a different salt if they
/// need to.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeployError {
    /// The argument blob does not fit in the 16-bit length suffix.
    #[error("deployment failed: argument blob is {len} bytes, the maximum is {max}")]
    ArgsTooLarge {
        /// Length of the rejected blob
        len: usize,
        /// The largest blob a clone can carry
        max: usize,
    },
    /// The host reported that the creation did not produce a contract.
    #[error("deployment failed: the host did not create a contract")]
    CreateFailed,
    /// A contract already lives at the deterministic target address.
    #[error("deployment failed: {0} is already occupied")]
    AddressOccupied(Address),
    /// The host created the contract somewhere other than the predicted address.
    #[error("deployment failed: expected the clone at {expected}, host created it at {actual}")]
    AddressMismatch {
        /// The address derived from deployer, salt and init code hash
        expected: Address,
        /// The address the host reported
        actual: Address,
    },
    /// The host itself failed.
    #[error("deployment failed: {0}")]
    Host(String),
}

/// Errors from packing an argument blob with [`ArgsBuilder`](crate::ArgsBuilder).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgsError {
    /// A field was appended after the variable-length tail, so its offset would depend on the
    /// tail's length.
    #[error("field at offset {offset} follows the variable-length tail")]
    FieldAfterTail {
        /// Offset the misplaced field was written at
        offset: usize,
    },
    /// The packed blob does not fit in a clone.
    #[error("packed arguments are {len} bytes, the maximum is {max}")]
    TooLarge {
        /// Length of the packed blob
        len: usize,
        /// The largest blob a clone can carry
        max: usize,
    },
}
