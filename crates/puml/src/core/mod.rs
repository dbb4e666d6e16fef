//! Core types shared across the crate
//!
//! Errors, logging setup, render kinds and client configuration.

mod error;
pub mod logging;
mod types;

pub use error::*;
pub use logging::*;
pub use types::*;
