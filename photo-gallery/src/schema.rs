use rusqlite::{Connection, Result};

/// Initialize photo library database schema
pub fn init_photo_schema(conn: &Connection) -> Result<()> {
    conn.execute("PRAGMA foreign_keys = ON", [])?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS photo_schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    let current_version: i32 = conn
        .query_row(
            "SELECT version FROM photo_schema_version ORDER BY version DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    if current_version < 1 {
        create_photo_schema_v1(conn)?;
        conn.execute("INSERT INTO photo_schema_version (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Create photo library schema version 1
fn create_photo_schema_v1(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS albums (
            uuid TEXT PRIMARY KEY,
            title TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    // creation_time is unix milliseconds (UTC)
    conn.execute(
        "CREATE TABLE IF NOT EXISTS assets (
            uuid TEXT PRIMARY KEY,
            album_id TEXT NOT NULL REFERENCES albums(uuid) ON DELETE CASCADE,
            media_type TEXT NOT NULL DEFAULT 'photo' CHECK(media_type IN ('photo','video')),
            relative_path TEXT NOT NULL,
            thumbnail_path TEXT,
            width INTEGER,
            height INTEGER,
            creation_time INTEGER NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_assets_album_time ON assets(album_id, creation_time)",
        [],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_photo_schema(&conn).unwrap();
        init_photo_schema(&conn).unwrap();

        let versions: i32 = conn
            .query_row("SELECT COUNT(*) FROM photo_schema_version", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(versions, 1);
    }

    #[test]
    fn test_media_type_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        init_photo_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO albums (uuid, title) VALUES ('a', 'Camera')",
            [],
        )
        .unwrap();

        let result = conn.execute(
            "INSERT INTO assets (uuid, album_id, media_type, relative_path, creation_time)
             VALUES ('x', 'a', 'audio', 'x.jpg', 0)",
            [],
        );
        assert!(result.is_err());
    }
}
