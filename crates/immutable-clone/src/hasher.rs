//! Content hashing used for init code hashes and deterministic addresses.

use core::fmt::Debug;

use alloy_primitives::{Address, Keccak256, B256};
use auto_impl::auto_impl;

/// A fixed-output hash function over a sequence of byte slices.
///
/// Hashing a sequence must equal hashing the concatenation of its parts, which lets the init
/// code hash be computed without materializing the init code.
#[auto_impl(&, Box, Arc)]
pub trait ContentHasher: Debug {
    /// Hashes the concatenation of `parts`.
    fn hash_parts(&self, parts: &[&[u8]]) -> B256;

    /// Hashes a single byte slice.
    fn hash(&self, data: &[u8]) -> B256 {
        self.hash_parts(&[data])
    }
}

/// Keccak-256, the hash the EVM uses for code hashes and `CREATE2`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Keccak;

impl ContentHasher for Keccak {
    fn hash_parts(&self, parts: &[&[u8]]) -> B256 {
        let mut hasher = Keccak256::new();
        for part in parts {
            hasher.update(part);
        }
        hasher.finalize()
    }
}

/// Computes the `CREATE2` address `hash(0xff ++ deployer ++ salt ++ init_code_hash)[12..]` with
/// the given hasher.
pub fn create2_address_with<H: ContentHasher>(
    hasher: &H,
    deployer: Address,
    salt: B256,
    init_code_hash: B256,
) -> Address {
    let digest =
        hasher.hash_parts(&[&[0xff], deployer.as_slice(), salt.as_slice(), init_code_hash.as_slice()]);
    Address::from_slice(&digest[12..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, b256, keccak256};

    #[test]
    fn test_keccak_parts_equal_concatenation() {
        let whole = keccak256(b"clone with immutable args");
        let parts = Keccak.hash_parts(&[b"clone ", b"with immutable", b"", b" args"]);
        assert_eq!(parts, whole);
        assert_eq!(Keccak.hash(b"clone with immutable args"), whole);
    }

    #[test]
    fn test_create2_address_matches_eip1014() {
        // Example 5 from EIP-1014.
        let deployer = address!("0x00000000000000000000000000000000deadbeef");
        let salt = b256!("0x00000000000000000000000000000000000000000000000000000000cafebabe");
        let init_code_hash = keccak256(alloy_primitives::hex!("deadbeef"));
        let expected = address!("0x60f3f640a8508fc6a86d45df051962668e1e8ac7");

        assert_eq!(create2_address_with(&Keccak, deployer, salt, init_code_hash), expected);
        assert_eq!(deployer.create2(salt, init_code_hash), expected);
    }
}
