//! Persistence layer for PATTS.
//!
//! Built on SQLite through `rusqlite`. [`db::Db`] opens connections,
//! [`migrations`] evolves the schema, [`query`] runs escaped SQL and returns
//! JSON rows, [`store`] provides generic create/read/soft-delete over the
//! tables, and the remaining modules wrap one table each.
//!
//! ```rust,no_run
//! use patts::db::{db::Db, migrations::init_with_migrations, task_types::TaskTypes};
//! use patts::libs::config::ConnectionParams;
//!
//! let params = ConnectionParams::sqlite("patts.db", "admin", None);
//! let mut db = Db::create(&params)?;
//! init_with_migrations(&mut db.conn)?;
//! let id = TaskTypes::new(&db.conn).create(0, "Support")?;
//! # Ok::<(), patts::PattsError>(())
//! ```

/// Connection setup for the configured store.
pub mod db;

/// Versioned schema migrations and the schema compatibility check.
pub mod migrations;

/// Escaping helpers and JSON result assembly for free-form queries.
pub mod query;

/// Generic record access keyed by each table's primary key.
pub mod store;

/// Task items and the open-item chains built from them.
pub mod task_items;

/// The task type forest.
pub mod task_types;

/// User accounts and credential checks.
pub mod users;
