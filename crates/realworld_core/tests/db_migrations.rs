use realworld_core::db::migrations::latest_version;
use realworld_core::db::{open_db, open_db_in_memory, DbError};
use realworld_core::{RepoError, SqliteStore};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    for table in [
        "users",
        "profiles",
        "articles",
        "tags",
        "article_tags",
        "comments",
        "follows",
        "favorites",
    ] {
        assert_table_exists(&conn, table);
    }
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("realworld.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "articles");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn foreign_keys_are_enforced_on_opened_connections() {
    let conn = open_db_in_memory().unwrap();
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);
}

#[test]
fn edge_tables_are_keyed_by_their_pair() {
    let conn = open_db_in_memory().unwrap();
    for table in ["follows", "favorites"] {
        let sql: String = conn
            .query_row(
                "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = ?1;",
                [table],
                |row| row.get(0),
            )
            .unwrap();
        assert!(sql.contains("WITHOUT ROWID"), "`{table}` should be WITHOUT ROWID");
    }

    conn.execute_batch(
        "INSERT INTO users (email, username, password_hash) VALUES ('a@b.c', 'a', 'h');
         INSERT INTO profiles (user_id) VALUES (last_insert_rowid());",
    )
    .unwrap();
    let self_edge = conn.execute(
        "INSERT INTO follows (follower_id, followee_id) SELECT id, id FROM profiles;",
        [],
    );
    assert!(self_edge.is_err());
}

#[test]
fn store_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqliteStore::try_new(&conn).unwrap_err();
    match err {
        RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        } => {
            assert_eq!(expected_version, latest_version());
            assert_eq!(actual_version, 0);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn store_rejects_connection_missing_a_table() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch("DROP TABLE favorites;").unwrap();

    let err = SqliteStore::try_new(&conn).unwrap_err();
    assert!(matches!(err, RepoError::MissingRequiredTable("favorites")));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "expected table `{table_name}` to exist");
}
