//! Predicts the address of a deterministically deployed clone.

use alloy_primitives::{Address, B256};
use clap::Parser;
use immutable_clone::{constants::create2_proxy, predict_deterministic_address};

use crate::common::{CloneArgs, Result};

/// Predict the address of a deterministically deployed clone
#[derive(Parser, Debug)]
pub struct Cmd {
    /// The clone to build
    #[command(flatten)]
    pub clone_args: CloneArgs,

    /// Salt of the deployment
    #[arg(long, short = 's')]
    pub salt: B256,

    /// The deployer executing CREATE2. Defaults to the canonical deterministic-deployment proxy
    #[arg(long, short = 'd')]
    pub deployer: Option<Address>,
}

impl Cmd {
    /// Execute the predict command, returning what to print
    pub fn run(&self) -> Result<String> {
        let args = self.clone_args.load_args()?;
        let deployer = self.deployer.unwrap_or(create2_proxy::ADDRESS);
        let implementation = self.clone_args.implementation;
        let address = predict_deterministic_address(implementation, &args, self.salt, deployer)?;
        Ok(address.to_string())
    }
}
