//! SQLite connection bootstrap and schema migrations.
//!
//! Returned connections always have every migration applied; the schema
//! version is tracked with `PRAGMA user_version`.

use std::path::Path;
use std::time::Instant;

use rusqlite::Connection;

const MIGRATIONS: &[&str] = &[
    // 1: projects
    "CREATE TABLE projects (
        id          TEXT PRIMARY KEY NOT NULL,
        slug        TEXT NOT NULL UNIQUE,
        title       TEXT NOT NULL,
        description TEXT NOT NULL,
        category    TEXT NOT NULL,
        year        TEXT NOT NULL,
        thumbnail   TEXT NOT NULL,
        created_at  INTEGER NOT NULL,
        updated_at  INTEGER NOT NULL
    );
    CREATE INDEX idx_projects_created_at ON projects (created_at DESC);",
];

pub fn latest_version() -> u32 {
    MIGRATIONS.len() as u32
}

/// Open (creating if needed) a database file.
pub fn open_db(path: &Path) -> rusqlite::Result<Connection> {
    let started = Instant::now();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            // Connection::open reports the real error if this fails.
            let _ = std::fs::create_dir_all(parent);
        }
    }
    let mut conn = Connection::open(path)?;
    bootstrap(&mut conn)?;
    tracing::info!(
        path = %path.display(),
        duration_ms = started.elapsed().as_millis() as u64,
        "database opened"
    );
    Ok(conn)
}

#[cfg(test)]
pub fn open_db_in_memory() -> rusqlite::Result<Connection> {
    let mut conn = Connection::open_in_memory()?;
    bootstrap(&mut conn)?;
    Ok(conn)
}

fn bootstrap(conn: &mut Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")?;
    apply_migrations(conn)
}

fn apply_migrations(conn: &mut Connection) -> rusqlite::Result<()> {
    let current: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    if current > latest_version() {
        tracing::warn!(current, latest = latest_version(), "database is newer than this build");
    }
    for (i, sql) in MIGRATIONS.iter().enumerate().skip(current as usize) {
        let version = i as u32 + 1;
        let tx = conn.transaction()?;
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
        tx.commit()?;
        tracing::debug!(version, "applied migration");
    }
    Ok(())
}
