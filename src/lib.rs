//! # PATTS - PATTS Ain't Time Tracking Software
//!
//! Backend library for tracking time spent on work. Users clock in to
//! concrete task items instantiated from a hierarchy of task types; clocking
//! in while already on the clock nests the new item under the active one, and
//! clocking out of an item closes its whole open subtree.
//!
//! ## Features
//!
//! - **Users**: Accounts with host-pattern scoping, admin rights and soft deletion
//! - **Task Types**: A forest of named categories that items are created from
//! - **Clock Engine**: Nested clock-in chains with cascading, atomic clock-out
//! - **Structured Results**: Every query result serializes to JSON via serde
//! - **Schema Versioning**: Migrations and a compatibility check against the store
//!
//! ## Usage
//!
//! ```rust,no_run
//! use patts::libs::session::{setup, ConnectionParams, Session};
//!
//! let params = ConnectionParams::sqlite("patts.db", "admin", Some("secret"));
//! setup(&params)?;
//!
//! let mut session = Session::open(&params)?;
//! let root = session.create_task(0, "Development")?;
//! session.clockin(root)?;
//! let active = session.get_active_task()?;
//! # Ok::<(), patts::PattsError>(())
//! ```

pub mod commands;
pub mod db;
pub mod libs;

pub use libs::error::{PattsError, Result};

include!(concat!(env!("OUT_DIR"), "/app_metadata.rs"));

/// Version identifier of this library.
pub const VERSION: &str = APP_METADATA_VERSION;
