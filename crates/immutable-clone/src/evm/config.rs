use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::constants::host::{DEPLOYER, GAS_LIMIT, MAX_CODE_SIZE};

/// Configuration of an [`EvmHost`](crate::EvmHost).
///
/// Deserializes from JSON with every field optional, e.g.
/// `{ "deployer": "0x...", "maxCodeSize": 65536, "gasLimit": 30000000 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EvmHostConfig {
    /// The account that sends every transaction, including sequential-nonce deployments.
    pub deployer: Address,
    /// The maximum contract size. The maximum initcode size is twice this value.
    pub max_code_size: usize,
    /// The gas limit of every transaction and of the block it executes in.
    pub gas_limit: u64,
}

impl Default for EvmHostConfig {
    fn default() -> Self {
        Self { deployer: DEPLOYER, max_code_size: MAX_CODE_SIZE, gas_limit: GAS_LIMIT }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: EvmHostConfig = serde_json::from_str(r#"{ "gasLimit": 30000000 }"#).unwrap();
        assert_eq!(config, EvmHostConfig { gas_limit: 30_000_000, ..Default::default() });

        let config: EvmHostConfig = serde_json::from_str(
            r#"{ "deployer": "0x00000000000000000000000000000000000000aa", "maxCodeSize": 24576 }"#,
        )
        .unwrap();
        assert_eq!(config.deployer, address!("0x00000000000000000000000000000000000000aa"));
        assert_eq!(config.max_code_size, 24576);
        assert_eq!(config.gas_limit, GAS_LIMIT);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let config: EvmHostConfig = serde_json::from_str(r#"{ "chainId": 1 }"#).unwrap();
        assert_eq!(config, EvmHostConfig::default());
    }
}
