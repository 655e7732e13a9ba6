//! Message macros routing output to the console or to `tracing`.
//!
//! In debug mode (`PATTS_DEBUG` or `RUST_LOG` set) every macro forwards to
//! the matching `tracing` level so the subscriber installed by the binary
//! can filter and format it. Otherwise user-facing macros print directly and
//! `msg_debug!` is silent.
//!
//! ## Macro Categories
//!
//! - **`msg_print!`**: Plain output
//! - **`msg_success!`**: Success notifications with ✅ prefix
//! - **`msg_info!`**: Informational messages with ℹ️ prefix
//! - **`msg_warning!`**: Warnings with ⚠️ prefix
//! - **`msg_error!`**: Errors with ❌ prefix, written to stderr
//! - **`msg_debug!`**: Debug-only diagnostics with 🔍 prefix
//! - **`msg_bail_anyhow!`**: Early return with an `anyhow` error built from a message
//!
//! ```rust
//! use patts::{msg_debug, msg_success};
//! use patts::libs::messages::Message;
//!
//! msg_success!(Message::ClockedIn(12));
//! msg_debug!(format!("cascade closed {} items", 3));
//! ```

use std::sync::OnceLock;

static DEBUG_MODE: OnceLock<bool> = OnceLock::new();

/// Returns whether debug output is enabled. The environment is read once.
#[doc(hidden)]
pub fn is_debug_mode() -> bool {
    *DEBUG_MODE.get_or_init(|| std::env::var("PATTS_DEBUG").is_ok() || std::env::var("RUST_LOG").is_ok())
}

#[macro_export]
macro_rules! msg_print {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("{}", $msg);
        } else {
            println!("{}", $msg);
        }
    };
    ($msg:expr, true) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("\n{}\n", $msg);
        } else {
            println!("\n{}\n", $msg);
        }
    };
}

#[macro_export]
macro_rules! msg_success {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("✅ {}", $msg);
        } else {
            println!("✅ {}", $msg);
        }
    };
}

/// Errors go to stderr so scripted callers can keep result output clean.
#[macro_export]
macro_rules! msg_error {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::error!("❌ {}", $msg);
        } else {
            eprintln!("❌ {}", $msg);
        }
    };
}

#[macro_export]
macro_rules! msg_warning {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::warn!("⚠️ {}", $msg);
        } else {
            eprintln!("⚠️ {}", $msg);
        }
    };
}

/// Informational messages. Library code only emits these through `tracing`,
/// so embedding applications never see unsolicited console output.
#[macro_export]
macro_rules! msg_info {
    ($msg:expr) => {
        tracing::info!("ℹ️ {}", $msg);
    };
}

/// Debug-only diagnostics; suppressed entirely outside debug mode.
#[macro_export]
macro_rules! msg_debug {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::debug!("🔍 {}", $msg);
        }
    };
}

/// Returns early from a function yielding `anyhow::Result`.
#[macro_export]
macro_rules! msg_bail_anyhow {
    ($msg:expr) => {
        anyhow::bail!("❌ {}", $msg)
    };
}
