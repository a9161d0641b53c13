use std::path::PathBuf;

use alloy_primitives::{Address, Bytes};
use clap::Args;
use immutable_clone::EvmHostConfig;

use super::{read_hex_file, Result};

/// The clone to build: its implementation and argument blob.
#[derive(Args, Debug, Clone)]
pub struct CloneArgs {
    /// Address of the implementation the clone delegates to
    #[arg(long, short = 'i')]
    pub implementation: Address,

    /// Argument blob, hex-encoded with an optional 0x prefix
    #[arg(long, conflicts_with = "args_file")]
    pub args: Option<Bytes>,

    /// File holding the hex-encoded argument blob, or `-` for stdin
    #[arg(long = "args-file")]
    pub args_file: Option<String>,
}

impl CloneArgs {
    /// Loads the argument blob. No blob given means an empty one.
    pub fn load_args(&self) -> Result<Bytes> {
        match (&self.args, &self.args_file) {
            (Some(args), _) => Ok(args.clone()),
            (None, Some(path)) => read_hex_file(path),
            (None, None) => Ok(Bytes::new()),
        }
    }
}

/// Configuration of the in-memory EVM host.
#[derive(Args, Debug, Clone, Default)]
pub struct HostArgs {
    /// JSON file with the host configuration (`deployer`, `maxCodeSize`, `gasLimit`)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl HostArgs {
    /// Loads the host configuration, falling back to the defaults.
    pub fn load_config(&self) -> Result<EvmHostConfig> {
        let Some(path) = &self.config else { return Ok(EvmHostConfig::default()) };
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
