//! Steward Common - Shared utilities and constants for the Steward workspace

pub mod constants;
pub mod utils;

pub use constants::*;
pub use utils::*;
