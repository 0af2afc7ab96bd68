use memoryforge_storage::migrations::{get_schema_version, list_backups, run_migration};
use memoryforge_storage::schema::LATEST_SCHEMA_VERSION;
use rusqlite::Connection;

#[test]
fn fresh_database_lands_on_latest_schema() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("memoryforge.sqlite");

    run_migration(&db_path, true, None).unwrap();

    let conn = Connection::open(&db_path).unwrap();
    assert_eq!(get_schema_version(&conn).unwrap(), LATEST_SCHEMA_VERSION);

    let has_confidence: bool = conn
        .query_row(
            "SELECT 1 FROM pragma_table_info('memories') WHERE name = 'confidence_score'",
            [],
            |_| Ok(true),
        )
        .unwrap_or(false);
    assert!(has_confidence);
}

#[test]
fn upgrading_an_old_database_preserves_rows_and_backs_up() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("memoryforge.sqlite");

    {
        let conn = Connection::open(&db_path).unwrap();
        memoryforge_storage::schema::create_v1_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO projects (id, name, root_path, created_at) VALUES ('p1','demo','/tmp','2024-01-01T00:00:00Z')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO memories (id, project_id, content, type, source, created_at, confirmed, metadata, content_hash)
             VALUES ('m1','p1','uses postgres','stack','manual','2024-01-01T00:00:00Z',0,'null','abc')",
            [],
        )
        .unwrap();
    }

    run_migration(&db_path, true, None).unwrap();

    let conn = Connection::open(&db_path).unwrap();
    assert_eq!(get_schema_version(&conn).unwrap(), LATEST_SCHEMA_VERSION);
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM memories", [], |r| r.get(0)).unwrap();
    assert_eq!(count, 1);

    let backups = list_backups(&db_path).unwrap();
    assert_eq!(backups.len(), 1);
}

#[test]
fn rerunning_migration_on_current_schema_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("memoryforge.sqlite");
    run_migration(&db_path, true, None).unwrap();
    run_migration(&db_path, true, None).unwrap();

    let backups = list_backups(&db_path).unwrap();
    assert!(backups.is_empty());
}
