//! Construction of the clone stub bytecode.
//!
//! The runtime code copies the call data into memory, appends the argument blob and its length
//! suffix straight from its own code, and `DELEGATECALL`s the implementation with the result:
//!
//! ```text
//! 3d3d3d3d363d3d37  | calldatacopy(0, 0, calldatasize())
//! 61 <extra> 6037   | codecopy(calldatasize(), 0x37, extra)
//! 3639              |
//! 36 61 <extra> 01  | calldatasize() + extra
//! 3d 73 <impl>      |
//! 5af4              | delegatecall(gas(), impl, 0, calldatasize() + extra, 0, 0)
//! 3d3d93803e        | returndatacopy(0, 0, returndatasize())
//! 603557fd5bf3      | success ? return(0, rds) : revert(0, rds)
//! ```
//!
//! where `extra = args.len() + 2`. The last two bytes of the code store `extra` big-endian, so
//! the implementation finds the blob at `calldatasize() - extra`.

use alloy_primitives::{Address, Bytes, B256};
use revm::bytecode::opcode::{
    ADD, CALLDATACOPY, CALLDATASIZE, CODECOPY, DELEGATECALL, DUP1, DUP2, GAS, JUMPDEST, JUMPI,
    PUSH1, PUSH2, PUSH20, PUSH3, RETURN, RETURNDATACOPY, RETURNDATASIZE, REVERT, SWAP4,
};

use crate::{
    constants::stub::{
        CREATION_CODE_LEN, INIT_CODE_OVERHEAD, MAX_ARGS_LEN, RUNTIME_CODE_LEN,
        RUNTIME_IMPLEMENTATION_OFFSET, RUNTIME_TAIL_LEN, RUNTIME_TAIL_OFFSET, SUFFIX_LEN,
    },
    ContentHasher, DeployError, Keccak,
};

/// Runtime code after the implementation address: delegate, copy the return data out and bubble
/// up success or failure.
const RUNTIME_TAIL: [u8; RUNTIME_TAIL_LEN] = [
    GAS,
    DELEGATECALL,
    RETURNDATASIZE,
    RETURNDATASIZE,
    SWAP4,
    DUP1,
    RETURNDATACOPY,
    PUSH1,
    // Position of the JUMPDEST below.
    (RUNTIME_CODE_LEN - 2) as u8,
    JUMPI,
    REVERT,
    JUMPDEST,
    RETURN,
];

/// The pieces of a clone's init code, in order. Concatenating them yields the init code; the
/// runtime code is everything but `creation`.
#[derive(Debug)]
struct StubParts<'a> {
    creation: [u8; CREATION_CODE_LEN],
    head: [u8; RUNTIME_IMPLEMENTATION_OFFSET],
    implementation: Address,
    args: &'a [u8],
    suffix: [u8; SUFFIX_LEN],
}

impl<'a> StubParts<'a> {
    fn new(implementation: Address, args: &'a [u8]) -> Result<Self, DeployError> {
        let extra = encoded_suffix(args.len())?;
        let run_size = RUNTIME_CODE_LEN + usize::from(extra);
        let [_, size_hi, size_mid, size_lo] = (run_size as u32).to_be_bytes();
        let [extra_hi, extra_lo] = extra.to_be_bytes();

        let creation = [
            PUSH3,
            size_hi,
            size_mid,
            size_lo,
            RETURNDATASIZE,
            DUP2,
            PUSH1,
            CREATION_CODE_LEN as u8,
            RETURNDATASIZE,
            CODECOPY,
            RETURN,
        ];
        let head = [
            RETURNDATASIZE,
            RETURNDATASIZE,
            RETURNDATASIZE,
            RETURNDATASIZE,
            CALLDATASIZE,
            RETURNDATASIZE,
            RETURNDATASIZE,
            CALLDATACOPY,
            PUSH2,
            extra_hi,
            extra_lo,
            PUSH1,
            RUNTIME_CODE_LEN as u8,
            CALLDATASIZE,
            CODECOPY,
            CALLDATASIZE,
            PUSH2,
            extra_hi,
            extra_lo,
            ADD,
            RETURNDATASIZE,
            PUSH20,
        ];

        Ok(Self { creation, head, implementation, args, suffix: extra.to_be_bytes() })
    }

    fn runtime(&self) -> [&[u8]; 5] {
        [&self.head, self.implementation.as_slice(), &RUNTIME_TAIL, self.args, &self.suffix]
    }

    fn init(&self) -> [&[u8]; 6] {
        let [head, implementation, tail, args, suffix] = self.runtime();
        [&self.creation, head, implementation, tail, args, suffix]
    }
}

/// Returns the length suffix for an argument blob of `len` bytes, i.e. `len + 2`.
fn encoded_suffix(len: usize) -> Result<u16, DeployError> {
    if len > MAX_ARGS_LEN {
        return Err(DeployError::ArgsTooLarge { len, max: MAX_ARGS_LEN });
    }
    Ok((len + SUFFIX_LEN) as u16)
}

fn concat(parts: &[&[u8]]) -> Bytes {
    let mut code = Vec::with_capacity(parts.iter().map(|part| part.len()).sum());
    for part in parts {
        code.extend_from_slice(part);
    }
    code.into()
}

/// Builds the init code deploying a clone of `implementation` that carries `args`.
///
/// The returned buffer is freshly allocated; `args` is only read.
///
/// # Errors
///
/// Returns [`DeployError::ArgsTooLarge`] if `args` is longer than
/// [`MAX_ARGS_LEN`](crate::constants::stub::MAX_ARGS_LEN).
pub fn build_init_code(implementation: Address, args: &[u8]) -> Result<Bytes, DeployError> {
    let parts = StubParts::new(implementation, args)?;
    Ok(concat(&parts.init()))
}

/// Builds the runtime code a clone of `implementation` carrying `args` ends up with.
pub fn runtime_code(implementation: Address, args: &[u8]) -> Result<Bytes, DeployError> {
    let parts = StubParts::new(implementation, args)?;
    Ok(concat(&parts.runtime()))
}

/// Returns the Keccak-256 hash of [`build_init_code`]'s output without building it.
pub fn init_code_hash(implementation: Address, args: &[u8]) -> Result<B256, DeployError> {
    init_code_hash_with(&Keccak, implementation, args)
}

/// Same as [`init_code_hash`] with a custom hasher. The init code is streamed into the hasher
/// piece by piece.
pub fn init_code_hash_with<H: ContentHasher>(
    hasher: &H,
    implementation: Address,
    args: &[u8],
) -> Result<B256, DeployError> {
    let parts = StubParts::new(implementation, args)?;
    Ok(hasher.hash_parts(&parts.init()))
}

/// Returns the length of the init code for an argument blob of `args_len` bytes.
pub const fn init_code_len(args_len: usize) -> usize {
    INIT_CODE_OVERHEAD + args_len
}

/// Recovers the implementation address from a clone's runtime code.
///
/// Returns `None` if `code` is not a clone stub, including stubs whose embedded lengths do not
/// agree with the code size.
pub fn implementation_of(code: &[u8]) -> Option<Address> {
    if code.len() < RUNTIME_CODE_LEN + SUFFIX_LEN {
        return None;
    }
    let extra = u16::from_be_bytes([code[code.len() - 2], code[code.len() - 1]]);
    let args_len = usize::from(extra).checked_sub(SUFFIX_LEN)?;
    let implementation =
        Address::from_slice(&code[RUNTIME_IMPLEMENTATION_OFFSET..RUNTIME_TAIL_OFFSET]);
    let args = &code[RUNTIME_CODE_LEN..code.len() - SUFFIX_LEN];
    if args.len() != args_len {
        return None;
    }

    let parts = StubParts::new(implementation, args).ok()?;
    let [head, _, tail, _, _] = parts.runtime();
    (code.starts_with(head) && code[RUNTIME_TAIL_OFFSET..RUNTIME_CODE_LEN] == *tail)
        .then_some(implementation)
}
