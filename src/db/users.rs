//! User accounts.
//!
//! A user is identified by name and may only connect from hosts matching its
//! host pattern (`%` and `_` wildcards, as in SQL `LIKE`). Users are never
//! removed; deactivation keeps the row so their task items stay attributable.

use crate::db::store::{bool_from_int, Entity, Filter, Record, Store};
use crate::libs::error::{PattsError, Result};
use crate::libs::messages::Message;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Host pattern matching every client host.
pub const ANY_HOST: &str = "%";

const SELECT_CREDENTIALS: &str = "SELECT password_hash FROM users WHERE id = ?1 AND active = 1 AND ?2 LIKE host";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub host: String,
    #[serde(deserialize_with = "bool_from_int")]
    pub admin: bool,
    #[serde(deserialize_with = "bool_from_int")]
    pub active: bool,
}

impl Record for User {
    const ENTITY: Entity = Entity::User;
    type Id = String;

    fn id(&self) -> String {
        self.id.clone()
    }
}

/// Stored credential for `password`, salted with the user name.
pub fn hash_password(id: &str, password: Option<&str>) -> Option<String> {
    password.map(|password| {
        let mut hasher = Sha256::new();
        hasher.update(id.as_bytes());
        hasher.update(b":");
        hasher.update(password.as_bytes());
        format!("{:x}", hasher.finalize())
    })
}

pub struct Users<'a> {
    store: Store<'a>,
}

impl<'a> Users<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { store: Store::new(conn) }
    }

    pub fn create(&self, id: &str, host: &str, password: Option<&str>, admin: bool) -> Result<()> {
        let password_hash = match hash_password(id, password) {
            Some(hash) => SqlValue::Text(hash),
            None => SqlValue::Null,
        };
        self.store.create(
            Entity::User,
            &[
                ("id", SqlValue::Text(id.to_string())),
                ("host", SqlValue::Text(host.to_string())),
                ("password_hash", password_hash),
                ("admin", SqlValue::Integer(i64::from(admin))),
                ("active", SqlValue::Integer(1)),
            ],
        )?;
        Ok(())
    }

    pub fn deactivate(&self, id: &str) -> Result<()> {
        self.store.soft_delete(Entity::User, id)
    }

    /// Sets the admin flag of the active user registered for `host`.
    pub fn set_admin(&self, id: &str, host: &str, admin: bool) -> Result<()> {
        let filter = Filter::eq("id", id).and(Filter::eq("host", host)).and(Filter::eq("active", true));
        let changed = self.store.update(Entity::User, &[("admin", SqlValue::Integer(i64::from(admin)))], &filter)?;
        if changed == 0 {
            return Err(PattsError::InvalidUser(
                Message::UserHostMismatch {
                    user: id.to_string(),
                    host: host.to_string(),
                }
                .to_string(),
            ));
        }
        Ok(())
    }

    pub fn list(&self) -> Result<BTreeMap<String, User>> {
        self.store.find_all(&Filter::All)
    }

    pub fn get(&self, id: &str) -> Result<User> {
        self.store
            .find_by_id::<User>(id)
            .map_err(|e| match e {
                PattsError::NotFound(_) => PattsError::NotFound(Message::UserNotFound(id.to_string()).to_string()),
                other => other,
            })
    }

    /// Checks credentials for a connection from `client_host`.
    ///
    /// Any mismatch (unknown or inactive user, host outside the pattern,
    /// wrong password) is reported as `InvalidUser` without saying which.
    pub fn authenticate(&self, id: &str, client_host: &str, password: Option<&str>) -> Result<User> {
        let stored: Option<Option<String>> = self
            .store
            .conn()
            .query_row(SELECT_CREDENTIALS, params![id, client_host], |row| row.get(0))
            .optional()?;

        let matches = match stored {
            Some(stored) => stored == hash_password(id, password),
            None => false,
        };
        if !matches {
            return Err(PattsError::InvalidUser(Message::AuthenticationFailed(id.to_string()).to_string()));
        }

        self.get(id)
    }
}
