//! Packing of typed fields into an argument blob.

use alloy_primitives::{Address, Bytes, Uint, B256, U256};

use crate::{constants::stub::MAX_ARGS_LEN, ArgsError};

/// The type of a packed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// A big-endian unsigned integer of `bits / 8` bytes.
    Uint {
        /// Width of the integer in bits
        bits: usize,
    },
    /// A 20-byte address.
    Address,
    /// A 32-byte word.
    Bytes32,
    /// Consecutive 32-byte words.
    Uint256Array {
        /// Number of words
        count: usize,
    },
    /// The variable-length tail. At most one, and always last.
    Bytes {
        /// Number of bytes
        len: usize,
    },
}

impl ArgKind {
    /// Number of bytes the field occupies.
    pub const fn width(&self) -> usize {
        match self {
            Self::Uint { bits } => *bits / 8,
            Self::Address => 20,
            Self::Bytes32 => 32,
            Self::Uint256Array { count } => *count * 32,
            Self::Bytes { len } => *len,
        }
    }
}

/// A packed field and where it landed in the blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgField {
    /// Offset to pass to the matching [`ImmutableArgs`](crate::ImmutableArgs) read
    pub offset: usize,
    /// The field type
    pub kind: ArgKind,
}

/// A packed argument blob together with its layout table.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Deref)]
pub struct PackedArgs {
    #[deref]
    data: Bytes,
    layout: Vec<ArgField>,
}

impl PackedArgs {
    /// The offset and type of every field, in packing order.
    pub fn layout(&self) -> &[ArgField] {
        &self.layout
    }

    /// Consumes `self` and returns the packed bytes.
    pub fn into_bytes(self) -> Bytes {
        self.data
    }
}

/// A builder for argument blobs.
///
/// Fields are concatenated without padding in the order they are appended:
///
/// ```
/// use immutable_clone::{alloy_primitives::{Address, U256}, ArgsBuilder};
///
/// let args = ArgsBuilder::default()
///     .address(Address::repeat_byte(0xaa))
///     .u256(U256::from(42))
///     .u64(7)
///     .build()
///     .unwrap();
/// assert_eq!(args.len(), 60);
/// assert_eq!(args.layout()[2].offset, 52);
/// ```
#[derive(Debug, Default, Clone)]
pub struct ArgsBuilder {
    data: Vec<u8>,
    layout: Vec<ArgField>,
    error: Option<ArgsError>,
}

impl ArgsBuilder {
    fn push(mut self, kind: ArgKind, bytes: &[u8]) -> Self {
        let offset = self.data.len();
        if self.error.is_none() &&
            self.layout.last().is_some_and(|field| matches!(field.kind, ArgKind::Bytes { .. }))
        {
            self.error = Some(ArgsError::FieldAfterTail { offset });
        }
        self.data.extend_from_slice(bytes);
        self.layout.push(ArgField { offset, kind });
        self
    }

    /// Current length of the packed blob.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether nothing has been packed yet.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Appends a 20-byte address.
    pub fn address(self, address: Address) -> Self {
        self.push(ArgKind::Address, address.as_slice())
    }

    /// Appends a 32-byte word.
    pub fn bytes32(self, word: B256) -> Self {
        self.push(ArgKind::Bytes32, word.as_slice())
    }

    /// Appends an unsigned integer of `BITS / 8` bytes. `BITS` must be a multiple of 8.
    pub fn uint<const BITS: usize, const LIMBS: usize>(self, value: Uint<BITS, LIMBS>) -> Self {
        const { assert!(BITS % 8 == 0 && BITS <= 256, "BITS must be a multiple of 8 up to 256") };
        self.push(ArgKind::Uint { bits: BITS }, &value.to_be_bytes_vec())
    }

    /// Appends a `u8`.
    pub fn u8(self, value: u8) -> Self {
        self.push(ArgKind::Uint { bits: 8 }, &[value])
    }

    /// Appends a big-endian `u16`.
    pub fn u16(self, value: u16) -> Self {
        self.push(ArgKind::Uint { bits: 16 }, &value.to_be_bytes())
    }

    /// Appends a big-endian `u32`.
    pub fn u32(self, value: u32) -> Self {
        self.push(ArgKind::Uint { bits: 32 }, &value.to_be_bytes())
    }

    /// Appends a big-endian `u64`.
    pub fn u64(self, value: u64) -> Self {
        self.push(ArgKind::Uint { bits: 64 }, &value.to_be_bytes())
    }

    /// Appends a big-endian `u128`.
    pub fn u128(self, value: u128) -> Self {
        self.push(ArgKind::Uint { bits: 128 }, &value.to_be_bytes())
    }

    /// Appends a big-endian 256-bit word.
    pub fn u256(self, value: U256) -> Self {
        self.push(ArgKind::Uint { bits: 256 }, &value.to_be_bytes::<32>())
    }

    /// Appends consecutive 256-bit words.
    pub fn uint256_array(self, values: &[U256]) -> Self {
        let bytes: Vec<u8> = values.iter().flat_map(|value| value.to_be_bytes::<32>()).collect();
        self.push(ArgKind::Uint256Array { count: values.len() }, &bytes)
    }

    /// Appends the variable-length tail. Nothing may follow it.
    pub fn bytes(self, bytes: &[u8]) -> Self {
        self.push(ArgKind::Bytes { len: bytes.len() }, bytes)
    }

    /// Finishes packing.
    ///
    /// # Errors
    ///
    /// Fails if a field was appended after the variable-length tail or the blob is longer than
    /// a clone can carry.
    pub fn build(self) -> Result<PackedArgs, ArgsError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if self.data.len() > MAX_ARGS_LEN {
            return Err(ArgsError::TooLarge { len: self.data.len(), max: MAX_ARGS_LEN });
        }
        Ok(PackedArgs { data: self.data.into(), layout: self.layout })
    }
}
