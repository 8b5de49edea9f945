//! # chatrelay_core
//!
//! Core relay logic: talk to the upstream chat API, pull the reply text out
//! of its response tree and turn it into an HTML-ready fragment.

pub mod client;
pub mod error;
pub mod extract;
pub mod models;
pub mod process;
pub mod relay;

pub use error::{RelayError, RelayResult};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
