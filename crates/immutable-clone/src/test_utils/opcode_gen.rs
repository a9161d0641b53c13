//! This module provides utility functions to generate EVM bytecode for implementation contracts.

use alloy_primitives::Bytes;
use revm::bytecode::opcode::{
    CALLDATACOPY, CALLDATALOAD, CALLDATASIZE, DUP1, MSTORE, PUSH0, PUSH1, RETURN, REVERT, SHR,
    SUB, SWAP1, SWAP2,
};

use crate::constants::stub::SUFFIX_LEN;

/// A builder for assembling EVM bytecode.
#[derive(Debug, Default)]
pub struct BytecodeBuilder {
    code: Vec<u8>,
}

impl BytecodeBuilder {
    /// Build the bytecode.
    pub fn build(self) -> Bytes {
        self.code.into()
    }

    /// Append a single opcode or byte.
    pub fn append(mut self, opcode: u8) -> Self {
        self.code.push(opcode);
        self
    }

    /// Append a series of opcodes or bytes.
    pub fn append_many(mut self, items: impl IntoIterator<Item = u8>) -> Self {
        self.code.extend(items);
        self
    }

    /// Append a PUSH opcode and the bytes to push.
    pub fn push_bytes(mut self, bytes: impl AsRef<[u8]>) -> Self {
        let bytes: &[u8] = bytes.as_ref();
        assert!(bytes.len() <= 32);
        self.code.push(PUSH0 + bytes.len() as u8);
        self.code.extend_from_slice(bytes);
        self
    }

    /// Append a PUSH opcode and the number to push, using the fewest bytes that hold it.
    pub fn push_number(self, number: u64) -> Self {
        let bytes = number.to_be_bytes();
        let leading_zeros = bytes.iter().take_while(|byte| **byte == 0).count();
        self.push_bytes(&bytes[leading_zeros..])
    }

    /// Append a series of MSTORE opcodes to store the given bytes at the given offset. The last
    /// word is right-padded with zeros.
    pub fn mstore(self, offset: usize, bytes: impl AsRef<[u8]>) -> Self {
        let mut this = self;
        for (i, chunk) in bytes.as_ref().chunks(32).enumerate() {
            let mut word = [0u8; 32];
            word[..chunk.len()].copy_from_slice(chunk);
            this = this.push_bytes(word);
            this = this.push_number((offset + i * 32) as u64);
            this.code.push(MSTORE);
        }
        this
    }

    /// Append a REVERT opcode with the given return data.
    pub fn revert_with_data(mut self, data: impl AsRef<[u8]>) -> Self {
        let data_len = data.as_ref().len();
        self = self.mstore(0x0, data);
        self = self.push_number(data_len as u64);
        self = self.push_number(0x0);
        self.append(REVERT)
    }

    /// Append code that returns the top of the stack as a 32-byte word.
    pub fn return_top(self) -> Self {
        self.append_many([PUSH0, MSTORE, PUSH1, 0x20, PUSH0, RETURN])
    }

    /// Append code that copies the whole call data to memory at offset 0.
    pub fn copy_calldata(self) -> Self {
        self.append_many([CALLDATASIZE, PUSH0, PUSH0, CALLDATACOPY])
    }

    /// Append code that returns the whole call data. Called through a clone, this is the
    /// caller's data followed by the argument blob and its length suffix.
    pub fn echo_calldata(self) -> Self {
        self.copy_calldata().append_many([CALLDATASIZE, PUSH0, RETURN])
    }

    /// Append code that reverts with the whole call data.
    pub fn revert_with_calldata(self) -> Self {
        self.copy_calldata().append_many([CALLDATASIZE, PUSH0, REVERT])
    }

    /// Append code that locates the argument blob at the end of the call data, using the length
    /// suffix, and returns it.
    pub fn return_immutable_args(self) -> Self {
        let suffix_len = SUFFIX_LEN as u8;
        self.append_many([
            // extra = calldataload(calldatasize() - 2) >> 240
            PUSH1,
            suffix_len,
            CALLDATASIZE,
            SUB,
            CALLDATALOAD,
            PUSH1,
            240,
            SHR,
            // start = calldatasize() - extra
            CALLDATASIZE,
            SUB,
            // len = calldatasize() - start - 2
            DUP1,
            CALLDATASIZE,
            SUB,
            PUSH1,
            suffix_len,
            SWAP1,
            SUB,
            // calldatacopy(0, start, len)
            DUP1,
            SWAP2,
            PUSH0,
            CALLDATACOPY,
            // return(0, len)
            PUSH0,
            RETURN,
        ])
    }
}
