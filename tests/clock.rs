#[cfg(test)]
mod tests {
    use patts::libs::hierarchy::ROOT_TYPE;
    use patts::libs::session::{setup, ConnectionParams, Session};
    use patts::PattsError;
    use rusqlite::Connection;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct ClockTestContext {
        _temp_dir: TempDir,
        db_path: String,
        admin: Session,
        alice: Session,
        bob: Session,
        development: u32,
        review: u32,
    }

    impl TestContext for ClockTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db_path = temp_dir.path().join("patts.db").display().to_string();
            let params = ConnectionParams::sqlite(db_path.clone(), "admin", Some("secret"));
            setup(&params).unwrap();

            let mut admin = Session::open(&params).unwrap();
            admin.create_user("alice", "%", Some("alice-pw")).unwrap();
            admin.create_user("bob", "%", Some("bob-pw")).unwrap();
            let development = admin.create_task(ROOT_TYPE, "Development").unwrap();
            let review = admin.create_task(development, "Review").unwrap();

            let alice = Session::open(&ConnectionParams::sqlite(db_path.clone(), "alice", Some("alice-pw"))).unwrap();
            let bob = Session::open(&ConnectionParams::sqlite(db_path.clone(), "bob", Some("bob-pw"))).unwrap();

            ClockTestContext {
                _temp_dir: temp_dir,
                db_path,
                admin,
                alice,
                bob,
                development,
                review,
            }
        }
    }

    #[test_context(ClockTestContext)]
    #[test]
    fn test_nested_clockin_and_cascading_clockout(ctx: &mut ClockTestContext) {
        assert!(ctx.alice.get_active_task().unwrap().is_none());

        let outer = ctx.alice.clockin(ctx.development).unwrap();
        let active = ctx.alice.get_active_task().unwrap().unwrap();
        assert_eq!(active.id, outer);
        assert_eq!(active.parent_id, None);
        assert_eq!(active.user_id, "alice");

        let inner = ctx.alice.clockin(ctx.review).unwrap();
        let active = ctx.alice.get_active_task().unwrap().unwrap();
        assert_eq!(active.id, inner);
        assert_eq!(active.parent_id, Some(outer));

        let closed = ctx.alice.clockout(outer).unwrap();
        assert_eq!(closed, 2);
        assert!(ctx.alice.get_active_task().unwrap().is_none());

        let outer_item = ctx.alice.get_item_byid(outer).unwrap();
        let inner_item = ctx.alice.get_item_byid(inner).unwrap();
        assert!(!outer_item.is_open());
        assert!(!inner_item.is_open());
        assert_eq!(outer_item.end_time, inner_item.end_time);
        assert!(outer_item.end_time.unwrap() >= outer_item.start_time);
    }

    #[test_context(ClockTestContext)]
    #[test]
    fn test_clockout_of_leaf_keeps_parent_open(ctx: &mut ClockTestContext) {
        let outer = ctx.alice.clockin(ctx.development).unwrap();
        let inner = ctx.alice.clockin(ctx.review).unwrap();

        assert_eq!(ctx.alice.clockout(inner).unwrap(), 1);

        let active = ctx.alice.get_active_task().unwrap().unwrap();
        assert_eq!(active.id, outer);
        assert!(active.is_open());
    }

    #[test_context(ClockTestContext)]
    #[test]
    fn test_deep_chain_closes_completely(ctx: &mut ClockTestContext) {
        let root = ctx.alice.clockin(ctx.development).unwrap();
        let mut ids = vec![root];
        for _ in 0..9 {
            ids.push(ctx.alice.clockin(ctx.review).unwrap());
        }

        let open = ctx.alice.get_items_byuser_onclock("alice").unwrap();
        assert_eq!(open.len(), 10);

        assert_eq!(ctx.alice.clockout(root).unwrap(), 10);
        assert!(ctx.alice.get_items_byuser_onclock("alice").unwrap().is_empty());
        assert_eq!(ctx.alice.get_items_byuser("alice").unwrap().len(), 10);
    }

    #[test_context(ClockTestContext)]
    #[test]
    fn test_clockin_unavailable_type(ctx: &mut ClockTestContext) {
        let err = ctx.alice.clockin(9999).unwrap_err();
        assert!(matches!(err, PattsError::TaskUnavailable(_)));
        assert_eq!(err.code(), -65);

        let retired = ctx.admin.create_task(ROOT_TYPE, "Retired").unwrap();
        ctx.admin.delete_task(retired).unwrap();
        assert!(matches!(ctx.alice.clockin(retired), Err(PattsError::TaskUnavailable(_))));

        assert!(ctx.alice.get_items_byuser("alice").unwrap().is_empty());
    }

    #[test_context(ClockTestContext)]
    #[test]
    fn test_clockout_unavailable_item(ctx: &mut ClockTestContext) {
        assert!(matches!(ctx.alice.clockout(9999), Err(PattsError::TaskUnavailable(_))));

        let item = ctx.alice.clockin(ctx.development).unwrap();
        ctx.alice.clockout(item).unwrap();
        assert!(matches!(ctx.alice.clockout(item), Err(PattsError::TaskUnavailable(_))));
    }

    #[test_context(ClockTestContext)]
    #[test]
    fn test_clockout_of_other_users_item(ctx: &mut ClockTestContext) {
        let item = ctx.alice.clockin(ctx.development).unwrap();

        assert!(matches!(ctx.bob.clockout(item), Err(PattsError::TaskUnavailable(_))));
        assert!(ctx.alice.get_item_byid(item).unwrap().is_open());

        // Administrators may close anyone's item
        assert_eq!(ctx.admin.clockout(item).unwrap(), 1);
        assert!(!ctx.alice.get_item_byid(item).unwrap().is_open());
    }

    #[test_context(ClockTestContext)]
    #[test]
    fn test_users_have_independent_chains(ctx: &mut ClockTestContext) {
        let alice_item = ctx.alice.clockin(ctx.development).unwrap();
        let bob_item = ctx.bob.clockin(ctx.review).unwrap();

        let bob_active = ctx.bob.get_active_task().unwrap().unwrap();
        assert_eq!(bob_active.id, bob_item);
        assert_eq!(bob_active.parent_id, None);
        assert_eq!(ctx.alice.get_active_task().unwrap().unwrap().id, alice_item);

        ctx.alice.clockout(alice_item).unwrap();
        assert!(ctx.bob.get_item_byid(bob_item).unwrap().is_open());
    }

    #[test_context(ClockTestContext)]
    #[test]
    fn test_tree(ctx: &mut ClockTestContext) {
        assert!(ctx.admin.get_tree().unwrap().is_empty());

        let outer = ctx.alice.clockin(ctx.development).unwrap();
        let inner = ctx.alice.clockin(ctx.review).unwrap();
        let bob_item = ctx.bob.clockin(ctx.development).unwrap();
        let closed = ctx.bob.clockin(ctx.review).unwrap();
        ctx.bob.clockout(closed).unwrap();

        let tree = ctx.admin.get_tree().unwrap();
        assert_eq!(tree.keys().copied().collect::<Vec<_>>(), vec![outer, inner, bob_item]);
        assert_eq!(tree[&outer].type_name, "Development");
        assert_eq!(tree[&inner].type_name, "Review");
        assert_eq!(tree[&inner].parent_id, Some(outer));
        assert_eq!(tree[&bob_item].user_id, "bob");

        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json[outer.to_string()]["user_id"], "alice");
    }

    #[test_context(ClockTestContext)]
    #[test]
    fn test_last_item(ctx: &mut ClockTestContext) {
        assert_eq!(ctx.admin.get_last_item("alice").unwrap(), None);

        let first = ctx.alice.clockin(ctx.development).unwrap();
        let second = ctx.alice.clockin(ctx.review).unwrap();
        ctx.alice.clockout(first).unwrap();
        assert!(second > first);

        assert_eq!(ctx.admin.get_last_item("alice").unwrap(), Some(second));
        assert_eq!(ctx.admin.get_last_item("bob").unwrap(), None);
    }

    #[test_context(ClockTestContext)]
    #[test]
    fn test_item_queries(ctx: &mut ClockTestContext) {
        let alice_done = ctx.alice.clockin(ctx.development).unwrap();
        ctx.alice.clockout(alice_done).unwrap();
        let alice_open = ctx.alice.clockin(ctx.review).unwrap();
        let bob_open = ctx.bob.clockin(ctx.development).unwrap();

        let all = ctx.admin.get_items().unwrap();
        assert_eq!(all.keys().copied().collect::<Vec<_>>(), vec![alice_done, alice_open, bob_open]);

        let alice_items = ctx.admin.get_items_byuser("alice").unwrap();
        assert_eq!(alice_items.keys().copied().collect::<Vec<_>>(), vec![alice_done, alice_open]);

        let alice_on_clock = ctx.admin.get_items_byuser_onclock("alice").unwrap();
        assert_eq!(alice_on_clock.keys().copied().collect::<Vec<_>>(), vec![alice_open]);

        assert!(ctx.admin.get_items_byuser("nobody").unwrap().is_empty());
        assert!(matches!(ctx.admin.get_item_byid(9999), Err(PattsError::NotFound(_))));
    }

    #[test_context(ClockTestContext)]
    #[test]
    fn test_items_survive_user_deletion(ctx: &mut ClockTestContext) {
        let item = ctx.alice.clockin(ctx.development).unwrap();
        ctx.admin.delete_user("alice").unwrap();

        let stored = ctx.admin.get_item_byid(item).unwrap();
        assert_eq!(stored.user_id, "alice");
        assert!(ctx.admin.get_tree().unwrap().contains_key(&item));
    }

    #[test_context(ClockTestContext)]
    #[test]
    fn test_clockout_cascade_is_atomic(ctx: &mut ClockTestContext) {
        let outer = ctx.alice.clockin(ctx.development).unwrap();
        let middle = ctx.alice.clockin(ctx.review).unwrap();
        let inner = ctx.alice.clockin(ctx.review).unwrap();

        // Make closing the innermost item fail midway through the cascade
        let conn = Connection::open(&ctx.db_path).unwrap();
        conn.execute_batch(&format!(
            "CREATE TRIGGER reject_close BEFORE UPDATE OF end_time ON task_items
             WHEN OLD.id = {}
             BEGIN SELECT RAISE(ABORT, 'close rejected'); END;",
            inner
        ))
        .unwrap();

        assert!(ctx.alice.clockout(outer).is_err());

        for id in [outer, middle, inner] {
            assert!(ctx.alice.get_item_byid(id).unwrap().is_open(), "item {} was closed", id);
        }
        assert_eq!(ctx.alice.get_active_task().unwrap().unwrap().id, inner);
        assert_eq!(ctx.alice.get_items_byuser_onclock("alice").unwrap().len(), 3);
    }
}
