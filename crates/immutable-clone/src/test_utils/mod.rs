//! Test utilities for clones: bytecode for implementation contracts and host setup helpers.

mod host;
mod opcode_gen;

pub use host::*;
pub use opcode_gen::*;
