use anyhow::Result;
use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch("
        CREATE TABLE IF NOT EXISTS schedule_cache (
            date        TEXT PRIMARY KEY,
            fajr        TEXT NOT NULL,
            sunrise     TEXT NOT NULL,
            dhuhr       TEXT NOT NULL,
            asr         TEXT NOT NULL,
            maghrib     TEXT NOT NULL,
            isha        TEXT NOT NULL,
            source      TEXT NOT NULL,
            fingerprint TEXT NOT NULL DEFAULT '',
            cached_at   TEXT DEFAULT (datetime('now'))
        );
    ")?;

    // Databases created before fingerprints were stored; their rows keep ''
    // and never match a live provider.
    add_column_if_missing(conn, "schedule_cache", "fingerprint", "TEXT NOT NULL DEFAULT ''")?;
    Ok(())
}

fn add_column_if_missing(conn: &Connection, table: &str, column: &str, decl: &str) -> Result<()> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    if !names.iter().any(|n| n == column) {
        conn.execute_batch(&format!("ALTER TABLE {} ADD COLUMN {} {};", table, column, decl))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM schedule_cache", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn adds_fingerprint_to_an_older_cache_table() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("
            CREATE TABLE schedule_cache (
                date TEXT PRIMARY KEY, fajr TEXT NOT NULL, sunrise TEXT NOT NULL,
                dhuhr TEXT NOT NULL, asr TEXT NOT NULL, maghrib TEXT NOT NULL,
                isha TEXT NOT NULL, source TEXT NOT NULL,
                cached_at TEXT DEFAULT (datetime('now'))
            );
            INSERT INTO schedule_cache (date, fajr, sunrise, dhuhr, asr, maghrib, isha, source)
            VALUES ('2026-10-18', '05:01', '06:40', '12:29', '15:44', '18:16', '19:44', 'fixed');
        ")
        .unwrap();

        run_migrations(&conn).unwrap();
        let fingerprint: String = conn
            .query_row("SELECT fingerprint FROM schedule_cache", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fingerprint, "");
    }
}
