#[cfg(test)]
mod tests {
    use patts::db::migrations::SUPPORTED_DB_VERSION;
    use patts::libs::session::{setup, ConnectionParams, Session};
    use patts::PattsError;
    use rusqlite::{params, Connection};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct SessionTestContext {
        temp_dir: TempDir,
        admin: ConnectionParams,
    }

    impl SessionTestContext {
        fn db_path(&self) -> String {
            self.temp_dir.path().join("patts.db").display().to_string()
        }

        fn params(&self, user: &str, password: Option<&str>) -> ConnectionParams {
            ConnectionParams::sqlite(self.db_path(), user, password)
        }
    }

    impl TestContext for SessionTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db_path = temp_dir.path().join("patts.db").display().to_string();
            let admin = ConnectionParams::sqlite(db_path, "admin", Some("secret"));
            setup(&admin).unwrap();
            SessionTestContext { temp_dir, admin }
        }
    }

    #[test_context(SessionTestContext)]
    #[test]
    fn test_init_and_identity(ctx: &mut SessionTestContext) {
        let mut session = Session::open(&ctx.admin).unwrap();

        assert!(session.is_initialized());
        assert!(session.is_connected());
        assert_eq!(session.get_user().unwrap(), "admin");
        assert!(session.have_admin().unwrap());
    }

    #[test_context(SessionTestContext)]
    #[test]
    fn test_init_twice_requires_cleanup(ctx: &mut SessionTestContext) {
        let mut session = Session::new();
        session.init(&ctx.admin).unwrap();

        let err = session.init(&ctx.admin).unwrap_err();
        assert!(matches!(err, PattsError::Session(_)));
        assert_eq!(err.code(), -75);

        session.cleanup();
        assert!(!session.is_initialized());
        session.init(&ctx.admin).unwrap();
        assert!(session.is_initialized());
    }

    #[test_context(SessionTestContext)]
    #[test]
    fn test_uninitialized_session_fails(_ctx: &mut SessionTestContext) {
        let mut session = Session::new();

        assert!(matches!(session.get_user(), Err(PattsError::Session(_))));
        assert!(matches!(session.get_types(), Err(PattsError::Session(_))));
        assert!(matches!(session.clockin(1), Err(PattsError::Session(_))));
    }

    #[test_context(SessionTestContext)]
    #[test]
    fn test_close_reconnects_lazily(ctx: &mut SessionTestContext) {
        let mut session = Session::open(&ctx.admin).unwrap();

        session.close();
        assert!(!session.is_connected());
        assert!(session.is_initialized());

        // Any operation reconnects
        assert!(session.get_types().unwrap().is_empty());
        assert!(session.is_connected());

        // Connect on an open connection is a no-op
        session.connect().unwrap();
        assert!(session.is_connected());
    }

    #[test_context(SessionTestContext)]
    #[test]
    fn test_invalid_credentials(ctx: &mut SessionTestContext) {
        let wrong_password = ctx.params("admin", Some("wrong"));
        assert!(matches!(Session::open(&wrong_password), Err(PattsError::InvalidUser(_))));

        let no_password = ctx.params("admin", None);
        assert!(matches!(Session::open(&no_password), Err(PattsError::InvalidUser(_))));

        let unknown = ctx.params("mallory", Some("secret"));
        assert!(matches!(Session::open(&unknown), Err(PattsError::InvalidUser(_))));

        // A failed init leaves the session uninitialized
        let mut session = Session::new();
        assert!(session.init(&unknown).is_err());
        assert!(!session.is_initialized());
        session.init(&ctx.admin).unwrap();
    }

    #[test_context(SessionTestContext)]
    #[test]
    fn test_host_pattern(ctx: &mut SessionTestContext) {
        let mut admin = Session::open(&ctx.admin).unwrap();
        admin.create_user("bob", "10.0.%", Some("pw")).unwrap();

        let from_lan = ctx.params("bob", Some("pw")).with_host("10.0.3.7");
        assert!(Session::open(&from_lan).is_ok());

        let from_localhost = ctx.params("bob", Some("pw"));
        assert!(matches!(Session::open(&from_localhost), Err(PattsError::InvalidUser(_))));
    }

    #[test_context(SessionTestContext)]
    #[test]
    fn test_missing_store_is_connection_error(ctx: &mut SessionTestContext) {
        let params = ConnectionParams::sqlite(
            ctx.temp_dir.path().join("missing.db").display().to_string(),
            "admin",
            Some("secret"),
        );

        let err = Session::open(&params).unwrap_err();
        assert!(matches!(err, PattsError::Connection(_)));
        assert_eq!(err.code(), -20);
    }

    #[test_context(SessionTestContext)]
    #[test]
    fn test_version_check(ctx: &mut SessionTestContext) {
        let mut session = Session::open(&ctx.admin).unwrap();
        assert_eq!(session.get_db_version().unwrap(), SUPPORTED_DB_VERSION);
        assert_eq!(session.version_check().unwrap(), 0);

        let conn = Connection::open(ctx.db_path()).unwrap();

        // Store newer than the library
        conn.execute("INSERT INTO migrations (version, name) VALUES (?1, ?2)", params![SUPPORTED_DB_VERSION + 1, "future"])
            .unwrap();
        assert_eq!(session.version_check().unwrap(), -1);

        // Store older than the library
        conn.execute("DELETE FROM migrations WHERE version >= ?1", params![SUPPORTED_DB_VERSION])
            .unwrap();
        assert_eq!(session.version_check().unwrap(), 1);
        assert_eq!(session.get_db_version().unwrap(), SUPPORTED_DB_VERSION - 1);
    }

    #[test_context(SessionTestContext)]
    #[test]
    fn test_upgrade_applies_pending_migrations(ctx: &mut SessionTestContext) {
        let conn = Connection::open(ctx.db_path()).unwrap();
        conn.execute("DELETE FROM migrations WHERE version = ?1", params![SUPPORTED_DB_VERSION])
            .unwrap();

        let mut session = Session::open(&ctx.admin).unwrap();
        assert_eq!(session.version_check().unwrap(), 1);
        assert_eq!(session.upgrade().unwrap(), SUPPORTED_DB_VERSION);
        assert_eq!(session.version_check().unwrap(), 0);
    }

    #[test_context(SessionTestContext)]
    #[test]
    fn test_upgrade_requires_admin(ctx: &mut SessionTestContext) {
        let mut admin = Session::open(&ctx.admin).unwrap();
        admin.create_user("alice", "%", None).unwrap();

        let mut alice = Session::open(&ctx.params("alice", None)).unwrap();
        assert!(!alice.have_admin().unwrap());
        assert!(matches!(alice.upgrade(), Err(PattsError::PermissionDenied(_))));
    }

    #[test_context(SessionTestContext)]
    #[test]
    fn test_setup_twice_fails(ctx: &mut SessionTestContext) {
        assert!(matches!(setup(&ctx.admin), Err(PattsError::UniqueConstraint(_))));
    }
}
