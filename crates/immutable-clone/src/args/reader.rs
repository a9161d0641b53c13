//! Offset-based reads of a clone's immutable arguments.
//!
//! Reads never fail. Bytes past the end of the blob read as zero, the same way `CALLDATALOAD`
//! zero-fills past the end of the call data; the layout of the blob is entirely the reader's
//! responsibility.

use alloy_primitives::{Address, Bytes, Uint, B256, U256};

use crate::constants::stub::{RUNTIME_CODE_LEN, SUFFIX_LEN};

/// A view of the argument blob appended by a clone stub.
///
/// The blob's extent is recomputed from the trailing length suffix on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImmutableArgs<'a> {
    data: &'a [u8],
}

impl<'a> ImmutableArgs<'a> {
    /// Creates a view over the call data an implementation receives through a clone, i.e.
    /// `calldata ++ args ++ suffix`.
    pub const fn from_calldata(calldata: &'a [u8]) -> Self {
        Self { data: calldata }
    }

    /// Creates a view over a deployed clone's runtime code.
    pub fn from_runtime_code(code: &'a [u8]) -> Self {
        Self { data: code.get(RUNTIME_CODE_LEN..).unwrap_or_default() }
    }

    /// Offset of the argument blob within the underlying data.
    ///
    /// Data shorter than the suffix, or a suffix larger than the data, yields an empty blob.
    pub fn args_offset(&self) -> usize {
        let len = self.data.len();
        if len < SUFFIX_LEN {
            return len;
        }
        let extra = u16::from_be_bytes([self.data[len - 2], self.data[len - 1]]);
        len.saturating_sub(usize::from(extra))
    }

    /// Length of the argument blob.
    pub fn args_len(&self) -> usize {
        self.data.len().saturating_sub(SUFFIX_LEN).saturating_sub(self.args_offset())
    }

    /// The argument blob, without the suffix.
    pub fn blob(&self) -> &'a [u8] {
        let start = self.args_offset();
        &self.data[start..start + self.args_len()]
    }

    /// Copies the blob starting at `offset` into `out`, zero-filling whatever lies past the end.
    pub fn read_into(&self, offset: usize, out: &mut [u8]) {
        out.fill(0);
        if let Some(available) = self.blob().get(offset..) {
            let len = available.len().min(out.len());
            out[..len].copy_from_slice(&available[..len]);
        }
    }

    fn read_array<const N: usize>(&self, offset: usize) -> [u8; N] {
        let mut out = [0u8; N];
        self.read_into(offset, &mut out);
        out
    }

    /// Reads `length` bytes at `offset`.
    pub fn read_bytes(&self, offset: usize, length: usize) -> Bytes {
        let mut out = vec![0u8; length];
        self.read_into(offset, &mut out);
        out.into()
    }

    /// Reads the entire argument blob.
    pub fn read_whole_blob(&self) -> Bytes {
        Bytes::copy_from_slice(self.blob())
    }

    /// Reads a 20-byte address at `offset`.
    pub fn read_address(&self, offset: usize) -> Address {
        Address::from(self.read_array::<20>(offset))
    }

    /// Reads a 32-byte word at `offset`.
    pub fn read_b256(&self, offset: usize) -> B256 {
        B256::from(self.read_array::<32>(offset))
    }

    /// Reads a big-endian unsigned integer of `BITS / 8` bytes at `offset`.
    ///
    /// `BITS` must be a multiple of 8 no larger than 256, e.g. `read_uint::<24, 1>` for a 3-byte
    /// field. Adjacent fields are packed without padding, so truncating a wide read to its low
    /// bits equals a narrow read at the correspondingly shifted offset.
    pub fn read_uint<const BITS: usize, const LIMBS: usize>(
        &self,
        offset: usize,
    ) -> Uint<BITS, LIMBS> {
        const { assert!(BITS % 8 == 0 && BITS <= 256, "BITS must be a multiple of 8 up to 256") };
        let mut word = [0u8; 32];
        let field = &mut word[32 - BITS / 8..];
        self.read_into(offset, field);
        Uint::from_be_slice(field)
    }

    /// Reads a `u8` at `offset`.
    pub fn read_u8(&self, offset: usize) -> u8 {
        u8::from_be_bytes(self.read_array(offset))
    }

    /// Reads a big-endian `u16` at `offset`.
    pub fn read_u16(&self, offset: usize) -> u16 {
        u16::from_be_bytes(self.read_array(offset))
    }

    /// Reads a big-endian `u32` at `offset`.
    pub fn read_u32(&self, offset: usize) -> u32 {
        u32::from_be_bytes(self.read_array(offset))
    }

    /// Reads a big-endian `u64` at `offset`.
    pub fn read_u64(&self, offset: usize) -> u64 {
        u64::from_be_bytes(self.read_array(offset))
    }

    /// Reads a big-endian `u128` at `offset`.
    pub fn read_u128(&self, offset: usize) -> u128 {
        u128::from_be_bytes(self.read_array(offset))
    }

    /// Reads a big-endian 256-bit word at `offset`.
    pub fn read_u256(&self, offset: usize) -> U256 {
        U256::from_be_bytes(self.read_array::<32>(offset))
    }

    /// Reads `count` consecutive 256-bit words starting at `offset`.
    pub fn read_uint256_array(&self, offset: usize, count: usize) -> Vec<U256> {
        (0..count).map(|i| self.read_u256(offset.saturating_add(i.saturating_mul(32)))).collect()
    }
}
