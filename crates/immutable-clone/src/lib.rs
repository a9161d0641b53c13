//! Minimal proxy clones that carry immutable, per-instance argument data.
//!
//! A clone is a tiny EVM stub that forwards every call to a shared implementation with
//! `DELEGATECALL`, appending an argument blob baked into its own code. The implementation reads
//! the blob back with [`ImmutableArgs`].
//!
//! Deployment goes through a [`DeployHost`]. [`CloneFactory::deploy_deterministic`] derives the
//! instance address from `(deployer, salt, keccak256(init_code))`, so
//! [`predict_deterministic_address`] knows it before anything is deployed.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod constants;

mod args;
pub use args::*;

mod error;
pub use error::*;

mod evm;
pub use evm::*;

mod factory;
pub use factory::*;

mod hasher;
pub use hasher::*;

mod host;
pub use host::*;

mod stub;
pub use stub::*;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use alloy_primitives;
pub use revm;
