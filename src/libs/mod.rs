//! Core library modules for PATTS.
//!
//! ## Features
//!
//! - **Session**: Connection lifecycle and the authenticated identity
//! - **Accounts**: User administration
//! - **Hierarchy**: Task types and item parent/child navigation
//! - **Clock**: Clock-in, cascading clock-out and on-clock queries
//! - **Infrastructure**: Configuration, data storage, errors, messaging, console tables
//!
//! The operation modules extend [`session::Session`] with `impl` blocks, so
//! everything is called on one session value:
//!
//! ```rust,no_run
//! use patts::libs::session::{ConnectionParams, Session};
//!
//! let params = ConnectionParams::sqlite("patts.db", "alice", Some("pw"));
//! let mut session = Session::open(&params)?;
//! if let Some(item) = session.get_active_task()? {
//!     session.clockout(item.id)?;
//! }
//! # Ok::<(), patts::PattsError>(())
//! ```

pub mod accounts;
pub mod clock;
pub mod config;
pub mod data_storage;
pub mod error;
pub mod hierarchy;
pub mod messages;
pub mod session;
pub mod view;
