//! Prints the init code of a clone.

use clap::Parser;
use immutable_clone::{build_init_code, init_code_hash};
use tracing::info;

use crate::common::{CloneArgs, Result};

/// Print the init code of a clone, or its hash
#[derive(Parser, Debug)]
pub struct Cmd {
    /// The clone to build
    #[command(flatten)]
    pub clone_args: CloneArgs,

    /// Print `keccak256(init_code)` instead of the init code
    #[arg(long)]
    pub hash: bool,
}

impl Cmd {
    /// Execute the init-code command, returning what to print
    pub fn run(&self) -> Result<String> {
        let args = self.clone_args.load_args()?;
        let implementation = self.clone_args.implementation;
        info!(%implementation, args_len = args.len(), hash = self.hash, "Building init code");

        if self.hash {
            Ok(init_code_hash(implementation, &args)?.to_string())
        } else {
            Ok(build_init_code(implementation, &args)?.to_string())
        }
    }
}
