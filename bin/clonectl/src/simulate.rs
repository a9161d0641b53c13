//! Deploys a clone into an in-memory EVM and calls it.

use alloy_primitives::{address, Address, Bytes, B256, U256};
use clap::Parser;
use immutable_clone::{CloneFactory, DeployHost, EvmHost};
use serde::Serialize;
use tracing::{debug, info};

use crate::common::{read_hex_file, CloneArgs, HostArgs, Result};

/// Where the implementation code is installed unless `--implementation` says otherwise.
const DEFAULT_IMPLEMENTATION: Address = address!("0x0000000000000000000000000000000000100001");

/// Deploy a clone into an in-memory EVM and call it
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Runtime code of the implementation, hex-encoded
    #[arg(long = "implementation-code", conflicts_with = "implementation_code_file")]
    pub implementation_code: Option<Bytes>,

    /// File holding the hex-encoded runtime code of the implementation, or `-` for stdin
    #[arg(long = "implementation-code-file")]
    pub implementation_code_file: Option<String>,

    /// Address to install the implementation code at
    #[arg(long, short = 'i', default_value_t = DEFAULT_IMPLEMENTATION)]
    pub implementation: Address,

    /// Argument blob, hex-encoded with an optional 0x prefix
    #[arg(long, conflicts_with = "args_file")]
    pub args: Option<Bytes>,

    /// File holding the hex-encoded argument blob, or `-` for stdin
    #[arg(long = "args-file")]
    pub args_file: Option<String>,

    /// Deploy deterministically with this salt instead of with a sequential nonce
    #[arg(long, short = 's')]
    pub salt: Option<B256>,

    /// Call data sent to the clone, hex-encoded
    #[arg(long, default_value = "")]
    pub calldata: Bytes,

    /// Value sent with the call, in wei
    #[arg(long, default_value_t = U256::ZERO)]
    pub value: U256,

    /// Host configuration
    #[command(flatten)]
    pub host_args: HostArgs,
}

/// What a simulation prints, as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulateOutcome {
    /// Address the clone was deployed at
    pub clone: Address,
    /// Address the clone was expected at before deploying
    pub predicted: Address,
    /// Whether the call to the clone succeeded
    pub success: bool,
    /// Return or revert data of the call
    pub output: Bytes,
    /// Gas used by the call
    pub gas_used: u64,
}

impl Cmd {
    /// Execute the simulate command, returning what to print
    pub fn run(&self) -> Result<String> {
        let outcome = self.simulate()?;
        Ok(serde_json::to_string_pretty(&outcome)?)
    }

    fn clone_args(&self) -> CloneArgs {
        CloneArgs {
            implementation: self.implementation,
            args: self.args.clone(),
            args_file: self.args_file.clone(),
        }
    }

    fn simulate(&self) -> Result<SimulateOutcome> {
        let config = self.host_args.load_config()?;
        let code = match (&self.implementation_code, &self.implementation_code_file) {
            (Some(code), _) => code.clone(),
            (None, Some(path)) => read_hex_file(path)?,
            (None, None) => Bytes::new(),
        };
        let args = self.clone_args().load_args()?;

        let mut host = EvmHost::new(config);
        host.set_code(self.implementation, code);
        host.fund(config.deployer, self.value);
        let mut factory = CloneFactory::new(host);

        let (predicted, clone) = match self.salt {
            Some(salt) => {
                let predicted =
                    factory.predict_deterministic_address(self.implementation, &args, salt)?;
                (predicted, factory.deploy_deterministic(self.implementation, &args, salt)?)
            }
            None => {
                let nonce = factory.host().account(config.deployer).map(|info| info.nonce);
                let predicted = config.deployer.create(nonce.unwrap_or_default());
                (predicted, factory.deploy(self.implementation, &args)?)
            }
        };
        debug!(
            %predicted,
            %clone,
            deterministic_deployer = %factory.host().deterministic_deployer(),
            "Clone deployed"
        );

        let call = factory.host_mut().call(clone, self.calldata.clone(), self.value)?;
        info!(%clone, success = call.success, gas_used = call.gas_used, "Called clone");

        Ok(SimulateOutcome {
            clone,
            predicted,
            success: call.success,
            output: call.output,
            gas_used: call.gas_used,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::CloneCtlError;
    use immutable_clone::{DeployError, ImmutableArgs};

    /// calldatacopy(0, 0, calldatasize()); return(0, calldatasize())
    const ECHO_CALLDATA: Bytes = Bytes::from_static(&[0x36, 0x5f, 0x5f, 0x37, 0x36, 0x5f, 0xf3]);

    fn cmd(salt: Option<B256>) -> Cmd {
        Cmd {
            implementation_code: Some(ECHO_CALLDATA),
            implementation_code_file: None,
            implementation: DEFAULT_IMPLEMENTATION,
            args: Some(Bytes::from_static(&[0xaa, 0xbb, 0xcc])),
            args_file: None,
            salt,
            calldata: Bytes::from_static(&[0x12, 0x34]),
            value: U256::ZERO,
            host_args: HostArgs::default(),
        }
    }

    #[test]
    fn test_simulate_sequential_deploy() {
        let outcome = cmd(None).simulate().unwrap();
        assert_eq!(outcome.clone, outcome.predicted);
        assert!(outcome.success);
        assert_eq!(
            outcome.output,
            Bytes::from_static(&[0x12, 0x34, 0xaa, 0xbb, 0xcc, 0x00, 0x05])
        );
        assert_eq!(ImmutableArgs::from_calldata(&outcome.output).blob(), [0xaa, 0xbb, 0xcc]);
    }

    #[test]
    fn test_simulate_deterministic_deploy() {
        let outcome = cmd(Some(B256::repeat_byte(0x11))).simulate().unwrap();
        assert_eq!(outcome.clone, outcome.predicted);
        assert!(outcome.success);

        let printed = cmd(Some(B256::ZERO)).run().unwrap();
        let json: serde_json::Value = serde_json::from_str(&printed).unwrap();
        for field in ["clone", "predicted", "success", "output", "gas_used"] {
            assert!(json.get(field).is_some(), "missing {field}");
        }
        assert_eq!(json["output"], "0x1234aabbcc0005");
    }

    #[test]
    fn test_simulate_reports_failures() {
        let mut cmd = cmd(None);
        cmd.args = Some(Bytes::from(vec![0; 70_000]));
        assert!(matches!(
            cmd.simulate().unwrap_err(),
            CloneCtlError::Deploy(DeployError::ArgsTooLarge { .. })
        ));

        // An implementation that reverts with empty data.
        let mut cmd = self::cmd(None);
        cmd.implementation_code = Some(Bytes::from_static(&[0x5f, 0x5f, 0xfd]));
        let outcome = cmd.simulate().unwrap();
        assert!(!outcome.success);
        assert!(outcome.output.is_empty());
    }
}
