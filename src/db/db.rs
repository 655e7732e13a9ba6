use crate::libs::config::{ConnectionParams, StoreKind};
use crate::libs::error::{PattsError, Result};
use crate::libs::messages::Message;
use crate::msg_debug;
use rusqlite::{Connection, OpenFlags};
use std::time::Duration;

/// How long a statement waits on a lock held by another process.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug)]
pub struct Db {
    pub conn: Connection,
}

impl Db {
    /// Opens an existing store. A missing database file is a connection error.
    pub fn open(params: &ConnectionParams) -> Result<Db> {
        Self::open_with_flags(params, OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX | OpenFlags::SQLITE_OPEN_URI)
    }

    /// Opens the store, creating the database file if it does not exist yet.
    pub fn create(params: &ConnectionParams) -> Result<Db> {
        Self::open_with_flags(params, OpenFlags::default())
    }

    fn open_with_flags(params: &ConnectionParams, flags: OpenFlags) -> Result<Db> {
        let path = match params.kind {
            StoreKind::Sqlite => params.database_path()?,
        };
        msg_debug!(Message::Connecting(path.display().to_string()));

        let conn = Connection::open_with_flags(&path, flags)
            .map_err(|e| PattsError::Connection(format!("{}: {}", path.display(), e)))?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.pragma_update(None, "foreign_keys", true)?;

        Ok(Db { conn })
    }
}
