//! Versioned schema migrations.
//!
//! The schema version of a store is the highest version recorded in the
//! `migrations` table, or 0 for a store that has never been set up. Each
//! migration is a forward-only transformation applied inside a transaction
//! together with its tracking row, so a failed migration leaves no trace.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use patts::db::migrations::{get_db_version, init_with_migrations};
//! use rusqlite::Connection;
//!
//! let mut conn = Connection::open("patts.db")?;
//! init_with_migrations(&mut conn)?;
//! let version = get_db_version(&conn)?;
//! # Ok::<(), patts::PattsError>(())
//! ```

use crate::libs::error::{PattsError, Result};
use crate::libs::messages::Message;
use crate::{msg_debug, msg_error, msg_info};
use rusqlite::{params, Connection, OptionalExtension, Transaction};

/// Schema version this build of the library reads and writes.
pub const SUPPORTED_DB_VERSION: u32 = 2;

const MIGRATIONS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS migrations (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

#[derive(Debug, Clone)]
struct Migration {
    version: u32,
    name: &'static str,
    up: fn(&Transaction) -> rusqlite::Result<()>,
}

/// Ordered registry of every schema migration.
pub struct MigrationManager {
    migrations: Vec<Migration>,
}

impl MigrationManager {
    pub fn new() -> Self {
        let mut manager = Self { migrations: Vec::new() };
        manager.register_migrations();
        manager
    }

    fn register_migrations(&mut self) {
        // Version 1: users, task types and task items
        self.add_migration(1, "create_tables", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS users (
                    id TEXT NOT NULL PRIMARY KEY,
                    host TEXT NOT NULL DEFAULT '%',
                    password_hash TEXT,
                    admin INTEGER NOT NULL DEFAULT 0,
                    active INTEGER NOT NULL DEFAULT 1
                )",
                [],
            )?;

            // parent_id 0 marks a top-level type, so it cannot be a foreign key
            tx.execute(
                "CREATE TABLE IF NOT EXISTS task_types (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    parent_id INTEGER NOT NULL DEFAULT 0,
                    display_name TEXT NOT NULL,
                    active INTEGER NOT NULL DEFAULT 1
                )",
                [],
            )?;

            tx.execute(
                "CREATE TABLE IF NOT EXISTS task_items (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id TEXT NOT NULL REFERENCES users(id),
                    type_id INTEGER NOT NULL REFERENCES task_types(id),
                    start_time TEXT NOT NULL,
                    end_time TEXT,
                    parent_id INTEGER REFERENCES task_items(id)
                )",
                [],
            )?;
            Ok(())
        });

        // Version 2: lookup indices for hierarchy walks and on-clock queries
        self.add_migration(2, "add_lookup_indices", |tx| {
            tx.execute("CREATE INDEX IF NOT EXISTS idx_task_types_parent_id ON task_types(parent_id)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_task_items_user_open ON task_items(user_id, end_time)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_task_items_parent_id ON task_items(parent_id)", [])?;
            Ok(())
        });
    }

    fn add_migration(&mut self, version: u32, name: &'static str, up: fn(&Transaction) -> rusqlite::Result<()>) {
        self.migrations.push(Migration { version, name, up });
    }

    /// Highest registered migration version.
    pub fn latest_version(&self) -> u32 {
        self.migrations.last().map(|m| m.version).unwrap_or(0)
    }

    /// Applies every pending migration in one transaction.
    pub fn run_migrations(&self, conn: &mut Connection) -> Result<u32> {
        conn.execute(MIGRATIONS_TABLE, [])?;

        let current_version = self.get_current_version(conn)?;
        let pending: Vec<&Migration> = self.migrations.iter().filter(|m| m.version > current_version).collect();

        if pending.is_empty() {
            msg_debug!(Message::DatabaseUpToDate);
            return Ok(current_version);
        }

        msg_info!(Message::MigrationsFound(pending.len()));

        let tx = conn.transaction()?;
        let mut version = current_version;
        for migration in pending {
            Self::apply(&tx, migration)?;
            version = migration.version;
        }
        tx.commit()?;

        msg_info!(Message::AllMigrationsCompleted);
        Ok(version)
    }

    /// Applies exactly one migration. It must be the next one after the current version.
    pub fn apply_migration(&self, conn: &mut Connection, version: u32) -> Result<()> {
        conn.execute(MIGRATIONS_TABLE, [])?;

        let migration = self
            .migrations
            .iter()
            .find(|m| m.version == version)
            .ok_or_else(|| PattsError::Unexpected(Message::MigrationUnknown(version).to_string()))?;

        let current_version = self.get_current_version(conn)?;
        if version <= current_version {
            return Err(PattsError::Unexpected(Message::MigrationAlreadyApplied(version).to_string()));
        }
        let next = self.migrations.iter().map(|m| m.version).find(|v| *v > current_version);
        if next != Some(version) {
            return Err(PattsError::Unexpected(Message::MigrationOutOfOrder(version, current_version).to_string()));
        }

        let tx = conn.transaction()?;
        Self::apply(&tx, migration)?;
        tx.commit()?;
        Ok(())
    }

    fn apply(tx: &Transaction, migration: &Migration) -> Result<()> {
        msg_info!(Message::RunningMigration(migration.version, migration.name.to_string()));

        if let Err(e) = (migration.up)(tx) {
            msg_error!(Message::MigrationFailed(migration.version, e.to_string()));
            return Err(e.into());
        }
        tx.execute(
            "INSERT INTO migrations (version, name) VALUES (?1, ?2)",
            params![migration.version, migration.name],
        )?;

        msg_debug!(Message::MigrationCompleted(migration.version));
        Ok(())
    }

    /// Current schema version; 0 when the store has no migrations table yet.
    fn get_current_version(&self, conn: &Connection) -> Result<u32> {
        let has_table: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'migrations'",
                [],
                |row| row.get(0),
            )
            .optional()?;
        if has_table.is_none() {
            return Ok(0);
        }

        let version: Option<u32> = conn.query_row("SELECT MAX(version) FROM migrations", [], |row| row.get(0))?;
        Ok(version.unwrap_or(0))
    }

    pub fn is_migration_applied(&self, conn: &Connection, version: u32) -> Result<bool> {
        if self.get_current_version(conn)? == 0 {
            return Ok(false);
        }
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM migrations WHERE version = ?1", params![version], |row| row.get(0))?;
        Ok(count > 0)
    }

    /// Applied migrations as `(version, name, applied_at)`, oldest first.
    pub fn get_migration_history(&self, conn: &Connection) -> Result<Vec<(u32, String, String)>> {
        if self.get_current_version(conn)? == 0 {
            return Ok(Vec::new());
        }
        let mut stmt = conn.prepare("SELECT version, name, applied_at FROM migrations ORDER BY version")?;
        let history = stmt
            .query_map([], |row| Ok((row.get::<_, u32>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(history)
    }
}

impl Default for MigrationManager {
    fn default() -> Self {
        Self::new()
    }
}

pub fn init_with_migrations(conn: &mut Connection) -> Result<u32> {
    MigrationManager::new().run_migrations(conn)
}

/// Schema version recorded in the store; 0 for a store that was never set up.
pub fn get_schema_version(conn: &Connection) -> Result<u32> {
    MigrationManager::new().get_current_version(conn)
}

pub fn get_db_version(conn: &Connection) -> Result<u32> {
    get_schema_version(conn)
}

pub fn needs_migration(conn: &Connection) -> Result<bool> {
    let manager = MigrationManager::new();
    Ok(manager.get_current_version(conn)? < manager.latest_version())
}

/// Compares the store's schema version with [`SUPPORTED_DB_VERSION`].
///
/// Positive when the store needs upgrading, negative when the store is newer
/// than this library, zero when they match.
pub fn version_check(conn: &Connection) -> Result<i64> {
    let store = get_db_version(conn)?;
    Ok(i64::from(SUPPORTED_DB_VERSION) - i64::from(store))
}
