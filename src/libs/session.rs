//! Session context: connection parameters, the connection handle and the
//! authenticated identity.
//!
//! A [`Session`] is created uninitialized, initialized once with
//! [`Session::init`], and torn down with [`Session::cleanup`]. Calling
//! `init` on an initialized session is an error; `cleanup` must come first.
//!
//! The connection is opened lazily. [`Session::connect`] and
//! [`Session::close`] only decide when that happens: every operation that
//! needs the store connects on demand. The user's identity and admin flag
//! are looked up when the connection opens and cached until it closes.
//!
//! Sessions are independent of each other; several may be open in one
//! process. A session is not meant to be shared between threads without
//! external synchronization.

use crate::db::db::Db;
use crate::db::migrations::{self, MigrationManager, SUPPORTED_DB_VERSION};
use crate::db::users::{Users, ANY_HOST};
use crate::libs::error::{PattsError, Result};
use crate::libs::messages::Message;
use crate::{msg_debug, msg_info};
use rusqlite::Connection;
use std::cmp::Ordering;

pub use crate::libs::config::{ConnectionParams, StoreKind};

/// The authenticated user of a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user: String,
    pub admin: bool,
}

#[derive(Default, Debug)]
pub struct Session {
    params: Option<ConnectionParams>,
    db: Option<Db>,
    identity: Option<Identity>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session and initializes it with `params`.
    pub fn open(params: &ConnectionParams) -> Result<Self> {
        let mut session = Self::new();
        session.init(params)?;
        Ok(session)
    }

    /// Validates `params`, connects and authenticates.
    ///
    /// Fails with `Session` if the session is already initialized. On any
    /// failure the session is left uninitialized.
    pub fn init(&mut self, params: &ConnectionParams) -> Result<()> {
        if self.params.is_some() {
            return Err(PattsError::Session(Message::SessionAlreadyInitialized.to_string()));
        }

        self.params = Some(params.clone());
        if let Err(e) = self.connect() {
            self.cleanup();
            return Err(e);
        }

        msg_info!(Message::SessionInitialized(params.user.clone()));
        Ok(())
    }

    /// Closes the connection and forgets the parameters, allowing a new `init`.
    pub fn cleanup(&mut self) {
        self.close();
        if self.params.take().is_some() {
            msg_debug!(Message::SessionCleanedUp);
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.params.is_some()
    }

    pub fn is_connected(&self) -> bool {
        self.db.is_some()
    }

    /// Opens the connection now instead of on first use. No-op when connected.
    pub fn connect(&mut self) -> Result<()> {
        if self.db.is_some() {
            return Ok(());
        }

        let params = self.params()?;
        let db = Db::open(params)?;
        let user = Users::new(&db.conn).authenticate(&params.user, &params.host, params.password.as_deref())?;

        let identity = Identity {
            user: user.id,
            admin: user.admin,
        };
        msg_debug!(Message::IdentityResolved {
            user: identity.user.clone(),
            admin: identity.admin,
        });

        self.identity = Some(identity);
        self.db = Some(db);
        Ok(())
    }

    /// Drops the connection; the next operation reconnects.
    pub fn close(&mut self) {
        self.identity = None;
        if self.db.take().is_some() {
            msg_debug!(Message::ConnectionClosed);
        }
    }

    /// Name of the user this session authenticates as.
    pub fn get_user(&self) -> Result<&str> {
        Ok(&self.params()?.user)
    }

    pub fn have_admin(&mut self) -> Result<bool> {
        Ok(self.identity()?.admin)
    }

    /// Schema version persisted in the store.
    pub fn get_db_version(&mut self) -> Result<u32> {
        migrations::get_db_version(self.conn()?)
    }

    /// Positive when the store needs upgrading, negative when it is newer
    /// than this library, zero when they match.
    pub fn version_check(&mut self) -> Result<i64> {
        let store = migrations::get_db_version(self.conn()?)?;
        let check = i64::from(SUPPORTED_DB_VERSION) - i64::from(store);
        match check.cmp(&0) {
            Ordering::Greater => tracing::warn!("{}", Message::DatabaseNeedsUpdate(store, SUPPORTED_DB_VERSION)),
            Ordering::Less => tracing::warn!("{}", Message::DatabaseNewerThanLibrary(store, SUPPORTED_DB_VERSION)),
            Ordering::Equal => msg_debug!(Message::DatabaseUpToDate),
        }
        Ok(check)
    }

    /// Applies pending migrations. Requires admin rights.
    pub fn upgrade(&mut self) -> Result<u32> {
        self.require_admin()?;
        let version = MigrationManager::new().run_migrations(self.conn()?)?;
        msg_info!(Message::DatabaseUpgraded(version));
        Ok(version)
    }

    fn params(&self) -> Result<&ConnectionParams> {
        self.params
            .as_ref()
            .ok_or_else(|| PattsError::Session(Message::SessionNotInitialized.to_string()))
    }

    /// The open connection, connecting first if needed.
    pub(crate) fn conn(&mut self) -> Result<&mut Connection> {
        self.connect()?;
        match self.db.as_mut() {
            Some(db) => Ok(&mut db.conn),
            None => Err(PattsError::Connection(Message::SessionNotInitialized.to_string())),
        }
    }

    /// The cached identity, connecting first if needed.
    pub(crate) fn identity(&mut self) -> Result<Identity> {
        self.connect()?;
        self.identity
            .clone()
            .ok_or_else(|| PattsError::Session(Message::SessionNotInitialized.to_string()))
    }

    pub(crate) fn require_admin(&mut self) -> Result<()> {
        if self.identity()?.admin {
            Ok(())
        } else {
            Err(PattsError::PermissionDenied(Message::AdminRequired.to_string()))
        }
    }
}

/// Creates the store described by `params`, applies every migration and
/// registers `params.user` as an administrator allowed from any host.
pub fn setup(params: &ConnectionParams) -> Result<()> {
    let mut db = Db::create(params)?;
    let version = migrations::init_with_migrations(&mut db.conn)?;
    msg_info!(Message::StoreCreated(params.database_path()?.display().to_string()));
    msg_debug!(Message::DatabaseVersion(version));

    Users::new(&db.conn).create(&params.user, ANY_HOST, params.password.as_deref(), true)?;
    msg_info!(Message::BootstrapAdminCreated(params.user.clone()));
    Ok(())
}
