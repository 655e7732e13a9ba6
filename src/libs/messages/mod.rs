//! Typed user-facing and log messages.
//!
//! All text lives in the `Display` implementation of [`Message`]; the macros
//! in [`macros`] decide whether a message reaches the console or `tracing`.

pub mod display;
pub mod macros;
pub mod types;

pub use types::Message;
