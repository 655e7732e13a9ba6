#[derive(Debug, Clone)]
pub enum Message {
    // === SESSION MESSAGES ===
    Connecting(String), // database path
    ConnectionClosed,
    IdentityResolved { user: String, admin: bool },
    SessionInitialized(String), // user
    SessionCleanedUp,
    SessionAlreadyInitialized,
    SessionNotInitialized,
    InvalidPort(String),
    UnknownStoreKind(String),
    AuthenticationFailed(String), // user

    // === SETUP MESSAGES ===
    StoreCreated(String),       // database path
    BootstrapAdminCreated(String), // user

    // === USER MESSAGES ===
    UserCreated(String),
    UserDeactivated(String),
    UserNotFound(String),
    AdminGranted(String),
    AdminRevoked(String),
    UserHostMismatch { user: String, host: String },
    AdminRequired,
    UsersHeader,
    NoUsers,

    // === TASK TYPE MESSAGES ===
    TypeCreated(u32, String), // id, display name
    TypeDeactivated(u32),
    TypeNotFound(u32),
    ParentTypeNotFound(u32),
    TypesHeader,
    NoTypes,

    // === CLOCK MESSAGES ===
    ClockedIn(u32),   // item id
    ClockedOut(u32),  // item id
    CascadeClosed(u32, usize), // root item id, count
    TaskUnavailable(u32), // type id
    ItemUnavailable(u32), // item id
    ItemNotFound(u32),
    ActiveTaskHeader,
    NotOnClock,
    TreeHeader,
    NoOpenItems,
    ItemsHeader,
    NoItems,
    LastItem(u32),
    NoLastItem(String), // user

    // === QUERY MESSAGES ===
    RunningQuery(String),
    QueryTooLong(usize, usize), // length, limit
    NoColumnsInSet,
    NoPrimaryKey(String),            // table or column
    PrimaryKeyNotUnique(String),     // key value

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigParseError,
    DataStoragePathError,

    // === PROMPTS ===
    PromptPassword,
    PromptNewUserPassword,
    PromptConfirmPassword,
    PasswordMismatch,

    // === VERSION MESSAGES ===
    LibraryVersion(String),
    DatabaseVersion(u32),
    DatabaseUpToDate,
    DatabaseNeedsUpdate(u32, u32), // store, supported
    DatabaseNewerThanLibrary(u32, u32), // store, supported
    DatabaseUpgraded(u32),

    // === MIGRATION MESSAGES ===
    MigrationsFound(usize),        // count
    RunningMigration(u32, String), // version, name
    MigrationCompleted(u32),       // version
    MigrationFailed(u32, String),  // version, error
    MigrationUnknown(u32),
    MigrationAlreadyApplied(u32),
    MigrationOutOfOrder(u32, u32), // requested, current
    AllMigrationsCompleted,
}
