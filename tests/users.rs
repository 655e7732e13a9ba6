#[cfg(test)]
mod tests {
    use patts::libs::session::{setup, ConnectionParams, Session};
    use patts::PattsError;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct UserTestContext {
        _temp_dir: TempDir,
        db_path: String,
        admin: Session,
    }

    impl UserTestContext {
        fn connect(&self, user: &str, password: Option<&str>) -> patts::Result<Session> {
            Session::open(&ConnectionParams::sqlite(self.db_path.clone(), user, password))
        }
    }

    impl TestContext for UserTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db_path = temp_dir.path().join("patts.db").display().to_string();
            let params = ConnectionParams::sqlite(db_path.clone(), "admin", Some("secret"));
            setup(&params).unwrap();
            let admin = Session::open(&params).unwrap();
            UserTestContext {
                _temp_dir: temp_dir,
                db_path,
                admin,
            }
        }
    }

    #[test_context(UserTestContext)]
    #[test]
    fn test_user_crud(ctx: &mut UserTestContext) {
        ctx.admin.create_user("alice", "%", Some("pw")).unwrap();

        let alice = ctx.admin.get_user_byid("alice").unwrap();
        assert_eq!(alice.id, "alice");
        assert_eq!(alice.host, "%");
        assert!(!alice.admin);
        assert!(alice.active);

        let users = ctx.admin.get_users().unwrap();
        assert_eq!(users.keys().cloned().collect::<Vec<_>>(), vec!["admin", "alice"]);

        ctx.admin.delete_user("alice").unwrap();
        assert!(matches!(ctx.admin.get_user_byid("alice"), Err(PattsError::NotFound(_))));
        assert!(!ctx.admin.get_users().unwrap().contains_key("alice"));

        // A deactivated user can no longer connect
        assert!(matches!(ctx.connect("alice", Some("pw")), Err(PattsError::InvalidUser(_))));
    }

    #[test_context(UserTestContext)]
    #[test]
    fn test_duplicate_user(ctx: &mut UserTestContext) {
        ctx.admin.create_user("alice", "%", None).unwrap();

        let err = ctx.admin.create_user("alice", "%", None).unwrap_err();
        assert!(matches!(err, PattsError::UniqueConstraint(_)));
        assert_eq!(err.code(), -72);
    }

    #[test_context(UserTestContext)]
    #[test]
    fn test_delete_missing_user(ctx: &mut UserTestContext) {
        assert!(matches!(ctx.admin.delete_user("nobody"), Err(PattsError::NotFound(_))));

        ctx.admin.create_user("alice", "%", None).unwrap();
        ctx.admin.delete_user("alice").unwrap();
        assert!(matches!(ctx.admin.delete_user("alice"), Err(PattsError::NotFound(_))));
    }

    #[test_context(UserTestContext)]
    #[test]
    fn test_grant_and_revoke_admin(ctx: &mut UserTestContext) {
        ctx.admin.create_user("alice", "%", None).unwrap();

        ctx.admin.grant_admin("alice", "%").unwrap();
        assert!(ctx.admin.get_user_byid("alice").unwrap().admin);
        assert!(ctx.connect("alice", None).unwrap().have_admin().unwrap());

        ctx.admin.revoke_admin("alice", "%").unwrap();
        assert!(!ctx.admin.get_user_byid("alice").unwrap().admin);
        assert!(!ctx.connect("alice", None).unwrap().have_admin().unwrap());
    }

    #[test_context(UserTestContext)]
    #[test]
    fn test_grant_with_wrong_host(ctx: &mut UserTestContext) {
        ctx.admin.create_user("alice", "10.0.%", None).unwrap();

        assert!(matches!(ctx.admin.grant_admin("alice", "%"), Err(PattsError::InvalidUser(_))));
        assert!(matches!(ctx.admin.grant_admin("bob", "%"), Err(PattsError::InvalidUser(_))));
        ctx.admin.grant_admin("alice", "10.0.%").unwrap();
    }

    #[test_context(UserTestContext)]
    #[test]
    fn test_user_management_requires_admin(ctx: &mut UserTestContext) {
        ctx.admin.create_user("alice", "%", None).unwrap();
        let mut alice = ctx.connect("alice", None).unwrap();

        assert!(matches!(alice.create_user("bob", "%", None), Err(PattsError::PermissionDenied(_))));
        assert!(matches!(alice.delete_user("admin"), Err(PattsError::PermissionDenied(_))));
        assert!(matches!(alice.grant_admin("alice", "%"), Err(PattsError::PermissionDenied(_))));
        assert!(matches!(alice.revoke_admin("admin", "%"), Err(PattsError::PermissionDenied(_))));

        // Reads are open to everyone
        assert_eq!(alice.get_users().unwrap().len(), 2);
        assert_eq!(alice.get_user_byid("admin").unwrap().id, "admin");
    }

    #[test_context(UserTestContext)]
    #[test]
    fn test_users_serialize_without_password(ctx: &mut UserTestContext) {
        ctx.admin.create_user("alice", "%", Some("hunter2")).unwrap();

        let json = serde_json::to_string(&ctx.admin.get_users().unwrap()).unwrap();
        assert!(json.contains("\"alice\""));
        assert!(!json.contains("password"));
        assert!(!json.contains("hunter2"));
    }
}
