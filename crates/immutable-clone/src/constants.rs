//! Constants for the clone stub layout and the EVM host.
//!
//! It groups the constants by the component that owns them as sub-modules.

/// Constants describing the bytes of a clone's init code.
///
/// ```text
/// [creation: 11][runtime head: 22][implementation: 20][runtime tail: 13][args][suffix: 2]
///               |<---------------- runtime code: 55 + args + 2 ---------------------->|
/// ```
pub mod stub {
    /// Size of the length suffix appended after the argument blob.
    pub const SUFFIX_LEN: usize = 2;
    /// The largest argument blob a clone can carry. The suffix stores `len + 2` in 16 bits.
    pub const MAX_ARGS_LEN: usize = u16::MAX as usize - SUFFIX_LEN;
    /// Size of the creation preamble which copies the runtime code out and returns it.
    pub const CREATION_CODE_LEN: usize = 11;
    /// Size of the fixed part of the runtime code. The argument blob starts right after it.
    pub const RUNTIME_CODE_LEN: usize = 55;
    /// Offset of the implementation address within the runtime code.
    pub const RUNTIME_IMPLEMENTATION_OFFSET: usize = 22;
    /// Offset of the implementation address within the init code.
    pub const IMPLEMENTATION_OFFSET: usize = CREATION_CODE_LEN + RUNTIME_IMPLEMENTATION_OFFSET;
    /// Offset of the forwarding logic that follows the implementation address.
    pub const RUNTIME_TAIL_OFFSET: usize = RUNTIME_IMPLEMENTATION_OFFSET + 20;
    /// Size of the fixed runtime code following the implementation address.
    pub const RUNTIME_TAIL_LEN: usize = RUNTIME_CODE_LEN - RUNTIME_TAIL_OFFSET;
    /// Number of init code bytes on top of the argument blob.
    pub const INIT_CODE_OVERHEAD: usize = CREATION_CODE_LEN + RUNTIME_CODE_LEN + SUFFIX_LEN;
}

/// Constants for the canonical deterministic-deployment proxy.
///
/// The proxy takes `salt ++ init_code` as call data, runs `CREATE2` with the call value and
/// returns the 20-byte address of the new contract. It reverts with empty data when `CREATE2`
/// fails, e.g. because the target address is already occupied.
pub mod create2_proxy {
    use alloy_primitives::{address, bytes, Address, Bytes};

    /// The address the proxy lives at on every chain that has it.
    pub const ADDRESS: Address = address!("0x4e59b44847b379578588920ca78fbf26c0b4956c");

    /// The runtime code of the proxy.
    pub const CODE: Bytes = bytes!(
        "7fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffe03601600081602082378035828234f58015156039578182fd5b8082525050506014600cf3"
    );
}

/// Defaults for the revm-backed [`EvmHost`](crate::EvmHost).
pub mod host {
    use alloy_primitives::{address, Address};

    /// The maximum contract size. The mainnet limit (24 KiB) is too small for clones carrying
    /// large argument blobs; the initcode limit is twice this value.
    pub const MAX_CODE_SIZE: usize = 512 * 1024;
    /// The gas limit of every transaction the host sends.
    pub const GAS_LIMIT: u64 = 1_000_000_000;
    /// The account sending deployment transactions.
    pub const DEPLOYER: Address = address!("0x0000000000000000000000000000000000100000");
}
