//! Packing and reading of the immutable argument blob.

mod builder;
pub use builder::*;

mod reader;
pub use reader::*;
