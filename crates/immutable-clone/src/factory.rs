//! Deployment of clones through a [`DeployHost`].

use alloy_primitives::{keccak256, Address, B256, U256};
use tracing::{debug, info, warn};

use crate::{build_init_code, init_code_hash, DeployError, DeployHost};

/// Predicts the address [`CloneFactory::deploy_deterministic`] deploys a clone at when
/// `deployer` is the host's deterministic deployer.
///
/// # Errors
///
/// Returns [`DeployError::ArgsTooLarge`] if `args` does not fit in a clone.
pub fn predict_deterministic_address(
    implementation: Address,
    args: &[u8],
    salt: B256,
    deployer: Address,
) -> Result<Address, DeployError> {
    let hash = init_code_hash(implementation, args)?;
    let address = deployer.create2(salt, hash);
    debug!(
        %implementation,
        args_len = args.len(),
        %salt,
        %deployer,
        %address,
        "Predicted clone address"
    );
    Ok(address)
}

/// Deploys clones of implementations through a host.
#[derive(Debug)]
pub struct CloneFactory<H> {
    host: H,
}

impl<H: DeployHost> CloneFactory<H> {
    /// Creates a new `CloneFactory` deploying through `host`.
    pub const fn new(host: H) -> Self {
        Self { host }
    }

    /// Returns a reference to the host.
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Returns a mutable reference to the host.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Consumes the factory and returns the host.
    pub fn into_host(self) -> H {
        self.host
    }

    /// Deploys a clone of `implementation` carrying `args` with a sequential-nonce creation.
    pub fn deploy(&mut self, implementation: Address, args: &[u8]) -> Result<Address, DeployError> {
        self.deploy_with_value(implementation, args, U256::ZERO)
    }

    /// Same as [`Self::deploy`], transferring `value` to the clone.
    pub fn deploy_with_value(
        &mut self,
        implementation: Address,
        args: &[u8],
        value: U256,
    ) -> Result<Address, DeployError> {
        let init_code = build_init_code(implementation, args)?;
        let created = self
            .host
            .create(init_code, value)
            .map_err(|err| DeployError::Host(err.to_string()))?;

        let Some(address) = created else {
            warn!(%implementation, args_len = args.len(), "Clone creation failed");
            return Err(DeployError::CreateFailed);
        };
        info!(%implementation, args_len = args.len(), %address, "Deployed clone");
        Ok(address)
    }

    /// Deploys a clone of `implementation` carrying `args` at the address derived from the host's
    /// deterministic deployer, `salt` and the init code hash.
    ///
    /// The target address can be deployed to only once. Later attempts with the same arguments
    /// fail with [`DeployError::AddressOccupied`].
    pub fn deploy_deterministic(
        &mut self,
        implementation: Address,
        args: &[u8],
        salt: B256,
    ) -> Result<Address, DeployError> {
        self.deploy_deterministic_with_value(implementation, args, salt, U256::ZERO)
    }

    /// Same as [`Self::deploy_deterministic`], transferring `value` to the clone.
    pub fn deploy_deterministic_with_value(
        &mut self,
        implementation: Address,
        args: &[u8],
        salt: B256,
        value: U256,
    ) -> Result<Address, DeployError> {
        let init_code = build_init_code(implementation, args)?;
        let deployer = self.host.deterministic_deployer();
        let expected = deployer.create2(salt, keccak256(&init_code));
        debug!(%implementation, args_len = args.len(), %salt, %expected, "Deploying clone deterministically");

        let created = self
            .host
            .create2(init_code, salt, value)
            .map_err(|err| DeployError::Host(err.to_string()))?;

        match created {
            Some(actual) if actual == expected => {
                info!(%implementation, args_len = args.len(), %salt, address = %actual, "Deployed clone");
                Ok(actual)
            }
            Some(actual) => {
                warn!(%expected, %actual, "Clone deployed at an unexpected address");
                Err(DeployError::AddressMismatch { expected, actual })
            }
            None => {
                let occupied = self
                    .host
                    .is_occupied(expected)
                    .map_err(|err| DeployError::Host(err.to_string()))?;
                warn!(%implementation, %salt, address = %expected, occupied, "Clone creation failed");
                if occupied {
                    Err(DeployError::AddressOccupied(expected))
                } else {
                    Err(DeployError::CreateFailed)
                }
            }
        }
    }

    /// Predicts the address [`Self::deploy_deterministic`] would deploy at, without deploying.
    pub fn predict_deterministic_address(
        &self,
        implementation: Address,
        args: &[u8],
        salt: B256,
    ) -> Result<Address, DeployError> {
        predict_deterministic_address(
            implementation,
            args,
            salt,
            self.host.deterministic_deployer(),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::constants::stub::MAX_ARGS_LEN;
    use alloy_primitives::{address, b256, Bytes};

    const IMPLEMENTATION: Address = address!("0x3333333333333333333333333333333333333333");
    const SALT: B256 = b256!("0x0000000000000000000000000000000000000000000000000000000000000001");

    /// A host that tracks occupancy without executing anything: the init code itself is stored
    /// as the account's code.
    #[derive(Debug, Default)]
    struct LedgerHost {
        deployer: Address,
        nonce: u64,
        accounts: HashMap<Address, Bytes>,
        /// Address to report from `create2` instead of the real one
        misroute: Option<Address>,
        out_of_gas: bool,
    }

    impl LedgerHost {
        fn try_occupy(&mut self, address: Address, code: Bytes) -> bool {
            if self.out_of_gas || self.accounts.contains_key(&address) {
                return false;
            }
            self.accounts.insert(address, code);
            true
        }
    }

    impl DeployHost for LedgerHost {
        type Error = String;

        fn deterministic_deployer(&self) -> Address {
            self.deployer
        }

        fn create(&mut self, init_code: Bytes, _value: U256) -> Result<Option<Address>, String> {
            let address = self.deployer.create(self.nonce);
            self.nonce += 1;
            Ok(self.try_occupy(address, init_code).then_some(address))
        }

        fn create2(
            &mut self,
            init_code: Bytes,
            salt: B256,
            _value: U256,
        ) -> Result<Option<Address>, String> {
            let address = self.deployer.create2(salt, keccak256(&init_code));
            let created = self.try_occupy(address, init_code);
            Ok(created.then(|| self.misroute.unwrap_or(address)))
        }

        fn is_occupied(&mut self, address: Address) -> Result<bool, String> {
            Ok(self.accounts.contains_key(&address))
        }
    }

    fn ledger_factory() -> CloneFactory<LedgerHost> {
        CloneFactory::new(LedgerHost {
            deployer: address!("0x00000000000000000000000000000000000000d0"),
            ..Default::default()
        })
    }

    #[test]
    fn test_deploy_uses_sequential_addresses() {
        let mut factory = ledger_factory();
        let deployer = factory.host().deployer;

        assert_eq!(factory.deploy(IMPLEMENTATION, b"a").unwrap(), deployer.create(0));
        assert_eq!(factory.deploy(IMPLEMENTATION, b"a").unwrap(), deployer.create(1));
    }

    #[test]
    fn test_deterministic_deploy_matches_prediction() {
        let mut factory = ledger_factory();
        let predicted =
            factory.predict_deterministic_address(IMPLEMENTATION, b"args", SALT).unwrap();
        let deployed = factory.deploy_deterministic(IMPLEMENTATION, b"args", SALT).unwrap();

        assert_eq!(predicted, deployed);
        let code = &factory.host().accounts[&deployed];
        assert_eq!(code, &build_init_code(IMPLEMENTATION, b"args").unwrap());
    }

    #[test]
    fn test_deterministic_deploy_twice_fails() {
        let mut factory = ledger_factory();
        let address = factory.deploy_deterministic(IMPLEMENTATION, b"args", SALT).unwrap();

        assert_eq!(
            factory.deploy_deterministic(IMPLEMENTATION, b"args", SALT),
            Err(DeployError::AddressOccupied(address))
        );
        // A different salt is a different address.
        let other = b256!("0x0000000000000000000000000000000000000000000000000000000000000002");
        assert_ne!(factory.deploy_deterministic(IMPLEMENTATION, b"args", other).unwrap(), address);
    }

    #[test]
    fn test_host_failures() {
        let mut factory = ledger_factory();
        factory.host_mut().out_of_gas = true;
        assert_eq!(factory.deploy(IMPLEMENTATION, b""), Err(DeployError::CreateFailed));
        assert_eq!(
            factory.deploy_deterministic(IMPLEMENTATION, b"", SALT),
            Err(DeployError::CreateFailed)
        );

        let mut factory = ledger_factory();
        let elsewhere = address!("0x00000000000000000000000000000000000000ee");
        factory.host_mut().misroute = Some(elsewhere);
        let expected = factory.predict_deterministic_address(IMPLEMENTATION, b"", SALT).unwrap();
        assert_eq!(
            factory.deploy_deterministic(IMPLEMENTATION, b"", SALT),
            Err(DeployError::AddressMismatch { expected, actual: elsewhere })
        );
    }

    #[test]
    fn test_oversized_args_never_reach_the_host() {
        let mut factory = ledger_factory();
        let args = vec![0u8; MAX_ARGS_LEN + 1];
        let err = DeployError::ArgsTooLarge { len: MAX_ARGS_LEN + 1, max: MAX_ARGS_LEN };

        assert_eq!(factory.deploy(IMPLEMENTATION, &args), Err(err.clone()));
        assert_eq!(factory.deploy_deterministic(IMPLEMENTATION, &args, SALT), Err(err.clone()));
        assert_eq!(factory.predict_deterministic_address(IMPLEMENTATION, &args, SALT), Err(err));
        assert_eq!(factory.host().nonce, 0);
        assert!(factory.host().accounts.is_empty());
    }
}
