//! Text for every [`Message`] variant.
//!
//! Messages read in sentence case and carry the identifiers a user needs to
//! act on them (item ids, type ids, usernames).

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter) -> Result {
        let s = match self {
            // === SESSION MESSAGES ===
            Message::Connecting(path) => format!("Connecting to database: {}", path),
            Message::ConnectionClosed => "Database connection closed".to_string(),
            Message::IdentityResolved { user, admin } => {
                format!("Authenticated as '{}'{}", user, if *admin { " (admin)" } else { "" })
            }
            Message::SessionInitialized(user) => format!("Session initialized for '{}'", user),
            Message::SessionCleanedUp => "Session cleaned up".to_string(),
            Message::SessionAlreadyInitialized => "Session is already initialized; call cleanup() before init() again".to_string(),
            Message::SessionNotInitialized => "Session is not initialized; call init() first".to_string(),
            Message::InvalidPort(port) => format!("Invalid port number: '{}'", port),
            Message::UnknownStoreKind(kind) => format!("Unsupported database type: '{}'", kind),
            Message::AuthenticationFailed(user) => format!("Could not authenticate user '{}'", user),

            // === SETUP MESSAGES ===
            Message::StoreCreated(path) => format!("Database created at {}", path),
            Message::BootstrapAdminCreated(user) => format!("Administrator '{}' created", user),

            // === USER MESSAGES ===
            Message::UserCreated(user) => format!("User '{}' created", user),
            Message::UserDeactivated(user) => format!("User '{}' deactivated", user),
            Message::UserNotFound(user) => format!("User '{}' not found", user),
            Message::AdminGranted(user) => format!("Admin rights granted to '{}'", user),
            Message::AdminRevoked(user) => format!("Admin rights revoked from '{}'", user),
            Message::UserHostMismatch { user, host } => {
                format!("User '{}' is not registered for host '{}'", user, host)
            }
            Message::AdminRequired => "Administrative rights are required for this operation".to_string(),
            Message::UsersHeader => "Users".to_string(),
            Message::NoUsers => "No users found".to_string(),

            // === TASK TYPE MESSAGES ===
            Message::TypeCreated(id, name) => format!("Task type '{}' created with ID {}", name, id),
            Message::TypeDeactivated(id) => format!("Task type {} deactivated", id),
            Message::TypeNotFound(id) => format!("Task type {} not found", id),
            Message::ParentTypeNotFound(id) => format!("Parent task type {} not found", id),
            Message::TypesHeader => "Task types".to_string(),
            Message::NoTypes => "No task types found".to_string(),

            // === CLOCK MESSAGES ===
            Message::ClockedIn(id) => format!("Clocked in to item {}", id),
            Message::ClockedOut(id) => format!("Clocked out of item {}", id),
            Message::CascadeClosed(id, count) => format!("Closed {} open item(s) starting at item {}", count, id),
            Message::TaskUnavailable(id) => format!("Invalid task chosen for clocking in: type {} is not available", id),
            Message::ItemUnavailable(id) => format!("Item {} is not open or not available to this user", id),
            Message::ItemNotFound(id) => format!("Item {} not found", id),
            Message::ActiveTaskHeader => "Active task".to_string(),
            Message::NotOnClock => "Not on the clock".to_string(),
            Message::TreeHeader => "Who is working on what".to_string(),
            Message::NoOpenItems => "Nobody is on the clock".to_string(),
            Message::ItemsHeader => "Task items".to_string(),
            Message::NoItems => "No task items found".to_string(),
            Message::LastItem(id) => format!("Last item: {}", id),
            Message::NoLastItem(user) => format!("User '{}' has no items", user),

            // === QUERY MESSAGES ===
            Message::RunningQuery(sql) => format!("Query: {}", sql),
            Message::QueryTooLong(len, limit) => {
                format!("A buffer overflow error occurred while handling the query ({} bytes, limit {})", len, limit)
            }
            Message::NoColumnsInSet => "No columns were in the result set".to_string(),
            Message::NoPrimaryKey(name) => format!("Requested primary key was not found: {}", name),
            Message::PrimaryKeyNotUnique(key) => format!("Requested primary key was not unique: {}", key),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigParseError => "Failed to parse configuration".to_string(),
            Message::DataStoragePathError => "Failed to resolve the data storage path".to_string(),

            // === PROMPTS ===
            Message::PromptPassword => "Password".to_string(),
            Message::PromptNewUserPassword => "Password for the new user".to_string(),
            Message::PromptConfirmPassword => "Repeat password".to_string(),
            Message::PasswordMismatch => "Passwords do not match".to_string(),

            // === VERSION MESSAGES ===
            Message::LibraryVersion(version) => format!("patts {}", version),
            Message::DatabaseVersion(version) => format!("Database schema version: {}", version),
            Message::DatabaseUpToDate => "Database schema is up to date".to_string(),
            Message::DatabaseNeedsUpdate(store, supported) => {
                format!("Database schema {} is older than supported version {}; run an upgrade", store, supported)
            }
            Message::DatabaseNewerThanLibrary(store, supported) => {
                format!("Database schema {} is newer than supported version {}; update patts", store, supported)
            }
            Message::DatabaseUpgraded(version) => format!("Database upgraded to schema version {}", version),

            // === MIGRATION MESSAGES ===
            Message::MigrationsFound(count) => format!("Found {} pending migration(s)", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationCompleted(version) => format!("Migration v{} completed", version),
            Message::MigrationFailed(version, error) => format!("Migration v{} failed: {}", version, error),
            Message::MigrationUnknown(version) => format!("No migration registered for version {}", version),
            Message::MigrationAlreadyApplied(version) => format!("Migration v{} has already been applied", version),
            Message::MigrationOutOfOrder(requested, current) => {
                format!("Cannot apply migration v{} on top of schema version {}", requested, current)
            }
            Message::AllMigrationsCompleted => "All migrations completed".to_string(),
        };
        write!(f, "{}", s)
    }
}
