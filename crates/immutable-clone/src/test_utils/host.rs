use alloy_primitives::{address, Address, Bytes, U256};

use crate::{CloneFactory, EvmHost, EvmHostConfig};

/// Where [`factory_with_implementation`] installs the implementation.
pub const IMPLEMENTATION: Address = address!("0x0000000000000000000000000000000000100001");

/// Balance [`factory_with_implementation`] credits to the deployer.
pub const DEPLOYER_BALANCE: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// Creates a clone factory over a fresh [`EvmHost`] with `code` installed at [`IMPLEMENTATION`]
/// and a funded deployer.
pub fn factory_with_implementation(code: Bytes) -> CloneFactory<EvmHost> {
    let mut host = EvmHost::new(EvmHostConfig::default());
    host.set_code(IMPLEMENTATION, code);
    let deployer = host.config().deployer;
    host.fund(deployer, DEPLOYER_BALANCE);
    CloneFactory::new(host)
}
