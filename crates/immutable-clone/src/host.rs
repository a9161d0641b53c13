//! The host runtime a clone factory deploys through.

use core::fmt::Display;

use alloy_primitives::{Address, Bytes, B256, U256};
use auto_impl::auto_impl;

/// The host runtime that executes deployments. It owns account state, including whether an
/// address is already occupied.
///
/// A host serializes deployments: for two `create2` calls targeting the same address, the first
/// one wins and the rest return `Ok(None)`.
#[auto_impl(&mut, Box)]
pub trait DeployHost {
    /// The error type for host failures unrelated to the deployment outcome itself.
    type Error: Display;

    /// The deployer identity `create2` addresses are derived from.
    fn deterministic_deployer(&self) -> Address;

    /// Runs `init_code` with a sequential-nonce `CREATE`, transferring `value` to the new
    /// contract.
    ///
    /// # Returns
    ///
    /// The new contract's address, or `None` if the creation failed.
    fn create(&mut self, init_code: Bytes, value: U256) -> Result<Option<Address>, Self::Error>;

    /// Runs `init_code` with `CREATE2` from [`Self::deterministic_deployer`], transferring
    /// `value` to the new contract.
    ///
    /// # Returns
    ///
    /// The new contract's address, or `None` if the creation failed, including when the target
    /// address is already occupied.
    fn create2(
        &mut self,
        init_code: Bytes,
        salt: B256,
        value: U256,
    ) -> Result<Option<Address>, Self::Error>;

    /// Whether a contract creation targeting `address` would collide with an existing account,
    /// i.e. the account has code or a non-zero nonce.
    fn is_occupied(&mut self, address: Address) -> Result<bool, Self::Error>;
}
