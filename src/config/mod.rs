// This module re-exports important pieces for convenience,
// so we can "use crate::config::*" easily.
pub mod config;
pub mod guards;
pub mod logging;
pub mod storage;

pub use config::*;
pub use guards::*;
pub use logging::*;
pub use storage::*;
