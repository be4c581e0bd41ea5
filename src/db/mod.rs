pub mod migrations;
pub mod repository;

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

/// Opens (creating if needed) the database at `path` and brings its schema up to date.
pub fn open(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path).with_context(|| format!("Opening database at {:?}", path))?;

    // Enable WAL mode for better concurrent access
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    migrations::run_migrations(&conn)?;
    Ok(conn)
}
