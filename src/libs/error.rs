//! Error taxonomy shared by every layer of the library.
//!
//! Each failure surfaces as one variant of [`PattsError`]. Variants carry a
//! human-readable message, and [`PattsError::code`] exposes the numeric code
//! from the reserved negative range used for diagnostics across process
//! boundaries.

use rusqlite::ffi;
use thiserror::Error;

pub type Result<T, E = PattsError> = std::result::Result<T, E>;

pub const ERR_NOT_IMPLEMENTED: i32 = -14;
pub const ERR_CONNECTION: i32 = -20;
pub const ERR_NO_COLUMNS_IN_SET: i32 = -21;
pub const ERR_NO_PRIMARY_KEY: i32 = -23;
pub const ERR_PRIMARY_KEY_NOT_UNIQUE: i32 = -24;
pub const ERR_LOAD: i32 = -60;
pub const ERR_MEMORY: i32 = -62;
pub const ERR_BUFFER_OVERFLOW: i32 = -63;
pub const ERR_UNEXPECTED: i32 = -64;
pub const ERR_TASK_UNAVAILABLE: i32 = -65;
pub const ERR_NOT_FOUND: i32 = -71;
pub const ERR_UNIQUE_CONSTRAINT: i32 = -72;
pub const ERR_INVALID_USER: i32 = -73;
pub const ERR_PERMISSION_DENIED: i32 = -74;
pub const ERR_SESSION: i32 = -75;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PattsError {
    #[error("{0}")]
    Memory(String),

    #[error("{0}")]
    BufferOverflow(String),

    #[error("{0}")]
    NotImplemented(String),

    // ---------------------------
    // Store and query layer
    // ---------------------------
    #[error("{0}")]
    Connection(String),

    #[error("{0}")]
    NoColumnsInSet(String),

    #[error("{0}")]
    NoPrimaryKey(String),

    #[error("{0}")]
    PrimaryKeyNotUnique(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    UniqueConstraint(String),

    #[error("{0}")]
    Load(String),

    // ---------------------------
    // Domain
    // ---------------------------
    #[error("{0}")]
    TaskUnavailable(String),

    #[error("{0}")]
    InvalidUser(String),

    #[error("{0}")]
    PermissionDenied(String),

    #[error("{0}")]
    Session(String),

    #[error("{0}")]
    Unexpected(String),
}

impl PattsError {
    /// Numeric diagnostic code of this error.
    pub fn code(&self) -> i32 {
        match self {
            PattsError::Memory(_) => ERR_MEMORY,
            PattsError::BufferOverflow(_) => ERR_BUFFER_OVERFLOW,
            PattsError::NotImplemented(_) => ERR_NOT_IMPLEMENTED,
            PattsError::Connection(_) => ERR_CONNECTION,
            PattsError::NoColumnsInSet(_) => ERR_NO_COLUMNS_IN_SET,
            PattsError::NoPrimaryKey(_) => ERR_NO_PRIMARY_KEY,
            PattsError::PrimaryKeyNotUnique(_) => ERR_PRIMARY_KEY_NOT_UNIQUE,
            PattsError::NotFound(_) => ERR_NOT_FOUND,
            PattsError::UniqueConstraint(_) => ERR_UNIQUE_CONSTRAINT,
            PattsError::Load(_) => ERR_LOAD,
            PattsError::TaskUnavailable(_) => ERR_TASK_UNAVAILABLE,
            PattsError::InvalidUser(_) => ERR_INVALID_USER,
            PattsError::PermissionDenied(_) => ERR_PERMISSION_DENIED,
            PattsError::Session(_) => ERR_SESSION,
            PattsError::Unexpected(_) => ERR_UNEXPECTED,
        }
    }

    /// Name of the error kind, e.g. `"TaskUnavailableError"`.
    pub fn kind(&self) -> &'static str {
        match self {
            PattsError::Memory(_) => "MemoryError",
            PattsError::BufferOverflow(_) => "BufferOverflowError",
            PattsError::NotImplemented(_) => "NotImplementedError",
            PattsError::Connection(_) => "ConnectionError",
            PattsError::NoColumnsInSet(_) => "NoColumnsInSetError",
            PattsError::NoPrimaryKey(_) => "NoPrimaryKeyError",
            PattsError::PrimaryKeyNotUnique(_) => "PrimaryKeyNotUniqueError",
            PattsError::NotFound(_) => "NotFoundError",
            PattsError::UniqueConstraint(_) => "UniqueConstraintError",
            PattsError::Load(_) => "LoadError",
            PattsError::TaskUnavailable(_) => "TaskUnavailableError",
            PattsError::InvalidUser(_) => "InvalidUserError",
            PattsError::PermissionDenied(_) => "PermissionDeniedError",
            PattsError::Session(_) => "SessionError",
            PattsError::Unexpected(_) => "UnexpectedError",
        }
    }

    /// Rebuilds the canonical error for a numeric code.
    pub fn from_code(code: i32) -> Self {
        match code {
            -12 | ERR_MEMORY => PattsError::Memory("An error occurred while allocating memory".to_string()),
            -13 | ERR_BUFFER_OVERFLOW => PattsError::BufferOverflow("A buffer overflow error occurred while handling the query".to_string()),
            ERR_NOT_IMPLEMENTED => PattsError::NotImplemented("The requested operation is not implemented".to_string()),
            ERR_CONNECTION => PattsError::Connection("There was an error establishing a connection with the database".to_string()),
            ERR_NO_COLUMNS_IN_SET => PattsError::NoColumnsInSet("No columns were in the result set".to_string()),
            ERR_NO_PRIMARY_KEY => PattsError::NoPrimaryKey("Requested primary key was not found in the table".to_string()),
            ERR_PRIMARY_KEY_NOT_UNIQUE => PattsError::PrimaryKeyNotUnique("Requested primary key was not unique".to_string()),
            ERR_LOAD => PattsError::Load("An error occurred when internally loading JSON-encoded data".to_string()),
            ERR_TASK_UNAVAILABLE => PattsError::TaskUnavailable("Invalid task chosen for clocking in".to_string()),
            ERR_NOT_FOUND => PattsError::NotFound("The requested record was not found".to_string()),
            ERR_UNIQUE_CONSTRAINT => PattsError::UniqueConstraint("A record with the same key already exists".to_string()),
            ERR_INVALID_USER => PattsError::InvalidUser("Selected user was not found in the database".to_string()),
            ERR_PERMISSION_DENIED => PattsError::PermissionDenied("Administrative rights are required".to_string()),
            ERR_SESSION => PattsError::Session("The session is not in a valid state for this operation".to_string()),
            ERR_UNEXPECTED => PattsError::Unexpected("An error occurred which was not anticipated".to_string()),
            other => PattsError::Unexpected(format!("Error code {} occurred while processing the request", other)),
        }
    }
}

impl From<rusqlite::Error> for PattsError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::QueryReturnedNoRows => PattsError::NotFound(err.to_string()),
            rusqlite::Error::SqliteFailure(failure, _) => match failure.code {
                rusqlite::ErrorCode::ConstraintViolation => match failure.extended_code {
                    ffi::SQLITE_CONSTRAINT_PRIMARYKEY | ffi::SQLITE_CONSTRAINT_UNIQUE => PattsError::UniqueConstraint(err.to_string()),
                    _ => PattsError::Unexpected(err.to_string()),
                },
                rusqlite::ErrorCode::CannotOpen
                | rusqlite::ErrorCode::NotADatabase
                | rusqlite::ErrorCode::DatabaseBusy
                | rusqlite::ErrorCode::DatabaseLocked
                | rusqlite::ErrorCode::PermissionDenied => PattsError::Connection(err.to_string()),
                rusqlite::ErrorCode::OutOfMemory => PattsError::Memory(err.to_string()),
                rusqlite::ErrorCode::TooBig => PattsError::BufferOverflow(err.to_string()),
                _ => PattsError::Unexpected(err.to_string()),
            },
            _ => PattsError::Unexpected(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for PattsError {
    fn from(err: serde_json::Error) -> Self {
        PattsError::Load(err.to_string())
    }
}

impl From<std::collections::TryReserveError> for PattsError {
    fn from(err: std::collections::TryReserveError) -> Self {
        PattsError::Memory(err.to_string())
    }
}
