use crate::error::AppError;
use crate::filesystem;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Path of the photo library database
pub fn get_database_path() -> PathBuf {
    filesystem::get_app_data_dir().join("photos.db")
}

/// Opens a database at `path` and brings the schema up to date
pub fn open_database(path: &Path) -> Result<Connection, AppError> {
    // Make sure the directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(path)?;
    photo_gallery::init_photo_schema(&conn)?;

    Ok(conn)
}

/// Initializes the database at the default location
pub fn init_database() -> Result<Connection, AppError> {
    let path = get_database_path();
    log::debug!("Opening database at {}", path.display());
    open_database(&path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_database_creates_schema() {
        let dir = std::env::temp_dir().join(format!("snapgrid-db-{}", uuid::Uuid::new_v4()));
        let conn = open_database(&dir.join("nested").join("photos.db")).unwrap();

        let count: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN ('albums', 'assets')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 2);

        drop(conn);
        std::fs::remove_dir_all(dir).ok();
    }
}
