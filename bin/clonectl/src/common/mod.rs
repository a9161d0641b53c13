mod args;
mod error;
mod hex;
mod logging;

pub use args::*;
pub use error::*;
pub use hex::*;
pub use logging::*;
