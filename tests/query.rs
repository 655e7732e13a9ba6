#[cfg(test)]
mod tests {
    use patts::db::db::Db;
    use patts::db::migrations::init_with_migrations;
    use patts::db::query::{escape, primary_key, query, QueryResult};
    use patts::libs::config::ConnectionParams;
    use patts::PattsError;
    use serde_json::json;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct QueryTestContext {
        _temp_dir: TempDir,
        db: Db,
    }

    impl TestContext for QueryTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db_path = temp_dir.path().join("patts.db").display().to_string();
            let mut db = Db::create(&ConnectionParams::sqlite(db_path, "admin", None)).unwrap();
            init_with_migrations(&mut db.conn).unwrap();
            db.conn
                .execute_batch(
                    "INSERT INTO task_types (parent_id, display_name) VALUES (0, 'Support');
                     INSERT INTO task_types (parent_id, display_name) VALUES (1, 'O''Brien account');",
                )
                .unwrap();
            QueryTestContext { _temp_dir: temp_dir, db }
        }
    }

    #[test_context(QueryTestContext)]
    #[test]
    fn test_rows_in_result_order(ctx: &mut QueryTestContext) {
        let result = query(&ctx.db.conn, "SELECT id, display_name FROM task_types ORDER BY id DESC", None).unwrap();

        assert_eq!(
            result.into_json(),
            json!([
                {"id": 2, "display_name": "O'Brien account"},
                {"id": 1, "display_name": "Support"}
            ])
        );
    }

    #[test_context(QueryTestContext)]
    #[test]
    fn test_rows_keyed_by_primary_key(ctx: &mut QueryTestContext) {
        let result = query(&ctx.db.conn, "SELECT * FROM task_types", Some("id")).unwrap();

        let QueryResult::Keyed(rows) = result else {
            panic!("expected keyed rows");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows["1"]["display_name"], "Support");
        assert_eq!(rows["2"]["parent_id"], 1);
    }

    #[test_context(QueryTestContext)]
    #[test]
    fn test_escaped_value_round_trips(ctx: &mut QueryTestContext) {
        let sql = format!(
            "SELECT * FROM task_types WHERE display_name = {}",
            escape("O'Brien account", true).unwrap()
        );
        let result = query(&ctx.db.conn, &sql, Some("id")).unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result.into_json()["2"]["display_name"], "O'Brien account");
    }

    #[test_context(QueryTestContext)]
    #[test]
    fn test_empty_result(ctx: &mut QueryTestContext) {
        let result = query(&ctx.db.conn, "SELECT * FROM task_types WHERE id = 99", Some("id")).unwrap();
        assert!(result.is_empty());
        assert_eq!(serde_json::to_string(&result).unwrap(), "{}");
    }

    #[test_context(QueryTestContext)]
    #[test]
    fn test_missing_key_column(ctx: &mut QueryTestContext) {
        let err = query(&ctx.db.conn, "SELECT display_name FROM task_types", Some("id")).unwrap_err();
        assert!(matches!(err, PattsError::NoPrimaryKey(_)));
        assert_eq!(err.code(), -23);
    }

    #[test_context(QueryTestContext)]
    #[test]
    fn test_duplicate_key(ctx: &mut QueryTestContext) {
        let err = query(&ctx.db.conn, "SELECT parent_id AS id FROM task_types UNION ALL SELECT 0", Some("id")).unwrap_err();
        assert!(matches!(err, PattsError::PrimaryKeyNotUnique(_)));
        assert_eq!(err.code(), -24);
    }

    #[test_context(QueryTestContext)]
    #[test]
    fn test_statement_without_columns(ctx: &mut QueryTestContext) {
        let err = query(&ctx.db.conn, "UPDATE task_types SET active = 1", None).unwrap_err();
        assert!(matches!(err, PattsError::NoColumnsInSet(_)));
        assert_eq!(err.code(), -21);
    }

    #[test_context(QueryTestContext)]
    #[test]
    fn test_primary_key_lookup(ctx: &mut QueryTestContext) {
        assert_eq!(primary_key(&ctx.db.conn, "users").unwrap(), "id");
        assert_eq!(primary_key(&ctx.db.conn, "task_items").unwrap(), "id");

        ctx.db.conn.execute("CREATE TABLE notes (body TEXT)", []).unwrap();
        assert!(matches!(primary_key(&ctx.db.conn, "notes"), Err(PattsError::NoPrimaryKey(_))));
    }
}
