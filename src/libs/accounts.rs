//! User administration on a [`Session`].
//!
//! Every mutation requires the session user to be an administrator. Reads are
//! open to any authenticated user.

use crate::db::users::{User, Users};
use crate::libs::error::{PattsError, Result};
use crate::libs::messages::Message;
use crate::libs::session::Session;
use crate::msg_info;
use std::collections::BTreeMap;

impl Session {
    /// Registers `id`, allowed to connect from hosts matching `host`.
    /// A `None` password lets the user connect without one.
    pub fn create_user(&mut self, id: &str, host: &str, password: Option<&str>) -> Result<()> {
        self.require_admin()?;
        Users::new(self.conn()?).create(id, host, password, false)?;
        msg_info!(Message::UserCreated(id.to_string()));
        Ok(())
    }

    /// Deactivates `id`. Their items stay in the store.
    pub fn delete_user(&mut self, id: &str) -> Result<()> {
        self.require_admin()?;
        Users::new(self.conn()?).deactivate(id).map_err(|e| match e {
            PattsError::NotFound(_) => PattsError::NotFound(Message::UserNotFound(id.to_string()).to_string()),
            other => other,
        })?;
        msg_info!(Message::UserDeactivated(id.to_string()));
        Ok(())
    }

    pub fn grant_admin(&mut self, id: &str, host: &str) -> Result<()> {
        self.require_admin()?;
        Users::new(self.conn()?).set_admin(id, host, true)?;
        msg_info!(Message::AdminGranted(id.to_string()));
        Ok(())
    }

    pub fn revoke_admin(&mut self, id: &str, host: &str) -> Result<()> {
        self.require_admin()?;
        Users::new(self.conn()?).set_admin(id, host, false)?;
        msg_info!(Message::AdminRevoked(id.to_string()));
        Ok(())
    }

    /// Active users keyed by name.
    pub fn get_users(&mut self) -> Result<BTreeMap<String, User>> {
        Users::new(self.conn()?).list()
    }

    pub fn get_user_byid(&mut self, id: &str) -> Result<User> {
        Users::new(self.conn()?).get(id)
    }
}
