// This module re-exports important pieces for convenience,
// so we can "use crate::config::*" easily.
pub mod config;
pub mod error;
pub mod logging;
pub mod podio;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use podio::*;
