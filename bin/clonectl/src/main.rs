//! `clonectl`: a command-line tool for clones with immutable arguments.
//!
//! It builds clone init code, predicts deterministic clone addresses and simulates deploying and
//! calling a clone in an in-memory EVM.

use clap::Parser;

mod cmd;
pub use cmd::*;

mod common;
mod init_code;
mod predict;
mod simulate;

fn main() -> Result<(), Error> {
    let cli = Cli::parse();
    cli.log_args.init()?;
    cli.cmd.run().inspect_err(|e| eprintln!("{e}"))
}
