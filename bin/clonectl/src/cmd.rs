use clap::{Parser, Subcommand};

use crate::common::{CloneCtlError, LogArgs};

/// Command-line interface of `clonectl`
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// The subcommand to run
    #[command(subcommand)]
    pub cmd: MainCmd,

    /// Logging configuration
    #[command(flatten)]
    pub log_args: LogArgs,
}

/// Main command enumeration for the clonectl CLI tool
#[derive(Subcommand, Debug)]
#[command(infer_subcommands = true)]
pub enum MainCmd {
    /// Print the init code of a clone, or its hash
    InitCode(crate::init_code::Cmd),
    /// Predict the address of a deterministically deployed clone
    Predict(crate::predict::Cmd),
    /// Deploy a clone into an in-memory EVM and call it
    Simulate(crate::simulate::Cmd),
}

/// Error types for the main command system
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to set up logging
    #[error("Failed to set up logging: {0}")]
    Logging(#[from] std::io::Error),
    /// Command error
    #[error("{0}")]
    CloneCtl(#[from] CloneCtlError),
}

impl MainCmd {
    /// Execute the main command and print its output
    pub fn run(&self) -> Result<(), Error> {
        let output = match self {
            Self::InitCode(cmd) => cmd.run()?,
            Self::Predict(cmd) => cmd.run()?,
            Self::Simulate(cmd) => cmd.run()?,
        };
        println!("{output}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::try_parse_from([
            "clonectl",
            "-vv",
            "predict",
            "--implementation",
            "0x0000000000000000000000000000000000100001",
            "--args",
            "0x01",
            "--salt",
            "0x0000000000000000000000000000000000000000000000000000000000000001",
        ])
        .unwrap();
        assert_eq!(cli.log_args.verbose, 2);
        assert!(matches!(cli.cmd, MainCmd::Predict(_)));

        let cli = Cli::try_parse_from([
            "clonectl",
            "init-code",
            "--implementation",
            "0x0000000000000000000000000000000000100001",
            "--hash",
        ])
        .unwrap();
        assert!(matches!(cli.cmd, MainCmd::InitCode(ref cmd) if cmd.hash));
    }

    #[test]
    fn test_hex_arguments_parse_into_bytes() {
        let cli = Cli::try_parse_from([
            "clonectl",
            "simulate",
            "--implementation-code",
            "365f5f37365ff3",
            "--args",
            "0xAABB",
            "--calldata",
            "0x",
        ])
        .unwrap();
        let MainCmd::Simulate(cmd) = cli.cmd else { panic!("expected simulate") };
        let code = cmd.implementation_code.unwrap();
        assert_eq!(code.to_vec(), [0x36, 0x5f, 0x5f, 0x37, 0x36, 0x5f, 0xf3]);
        assert_eq!(cmd.args.unwrap().to_vec(), [0xaa, 0xbb]);
        assert!(cmd.calldata.is_empty());

        for bad in ["0x123", "0xzz"] {
            assert!(Cli::try_parse_from([
                "clonectl",
                "init-code",
                "--implementation",
                "0x0000000000000000000000000000000000100001",
                "--args",
                bad,
            ])
            .is_err());
        }
    }

    #[test]
    fn test_missing_implementation_is_rejected() {
        assert!(Cli::try_parse_from(["clonectl", "init-code", "--args", "0x01"]).is_err());
    }
}
