use crate::models::{
    Album, AssetQuery, DeleteReport, MediaType, PhotoAsset, PhotoGalleryConfig, PhotoId, SortOrder,
};
use crate::thumbnail::{import_photo_with_uuid, ThumbnailError};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

/// Error type for photo gallery operations
#[derive(Debug)]
pub enum PhotoGalleryError {
    DatabaseError(rusqlite::Error),
    ThumbnailError(ThumbnailError),
    NotFound(String),
    IoError(std::io::Error),
    Other(String),
}

impl std::fmt::Display for PhotoGalleryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PhotoGalleryError::DatabaseError(e) => write!(f, "Database error: {}", e),
            PhotoGalleryError::ThumbnailError(e) => write!(f, "Thumbnail error: {}", e),
            PhotoGalleryError::NotFound(msg) => write!(f, "Not found: {}", msg),
            PhotoGalleryError::IoError(e) => write!(f, "IO error: {}", e),
            PhotoGalleryError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for PhotoGalleryError {}

impl From<rusqlite::Error> for PhotoGalleryError {
    fn from(err: rusqlite::Error) -> Self {
        PhotoGalleryError::DatabaseError(err)
    }
}

impl From<ThumbnailError> for PhotoGalleryError {
    fn from(err: ThumbnailError) -> Self {
        PhotoGalleryError::ThumbnailError(err)
    }
}

impl From<std::io::Error> for PhotoGalleryError {
    fn from(err: std::io::Error) -> Self {
        PhotoGalleryError::IoError(err)
    }
}

const ASSET_COLUMNS: &str = "uuid, album_id, media_type, relative_path, thumbnail_path, width, height, creation_time";

/// Photo Gallery Service
pub struct PhotoGalleryService {
    config: PhotoGalleryConfig,
}

impl PhotoGalleryService {
    /// Initialize the photo gallery service with configuration
    pub fn new(config: PhotoGalleryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PhotoGalleryConfig {
        &self.config
    }

    /// Returns the absolute path to a stored file (for UI display and sharing)
    pub fn get_absolute_photo_path(&self, relative_path: &str) -> String {
        if self.config.storage_path.is_empty() || relative_path.starts_with('/') {
            relative_path.to_string()
        } else {
            format!(
                "{}/{}",
                self.config.storage_path.trim_end_matches('/'),
                relative_path
            )
        }
    }

    /// Look up an album by its title
    pub fn find_album(
        &self,
        conn: &Connection,
        title: &str,
    ) -> Result<Option<Album>, PhotoGalleryError> {
        let album = conn
            .query_row(
                "SELECT a.uuid, a.title, a.created_at,
                        (SELECT COUNT(*) FROM assets WHERE album_id = a.uuid)
                 FROM albums a WHERE a.title = ?1",
                params![title],
                |row| {
                    let uuid_str: String = row.get(0)?;
                    Ok(Album {
                        id: Uuid::parse_str(&uuid_str)
                            .map_err(|_| rusqlite::Error::InvalidQuery)?,
                        title: row.get(1)?,
                        created_at: row.get(2)?,
                        asset_count: row.get(3)?,
                    })
                },
            )
            .optional()?;

        Ok(album)
    }

    /// Return the album with `title`, creating it on first use
    pub fn get_or_create_album(
        &self,
        conn: &Connection,
        title: &str,
    ) -> Result<Album, PhotoGalleryError> {
        if let Some(album) = self.find_album(conn, title)? {
            return Ok(album);
        }

        log::info!("Creating album '{}'", title);
        conn.execute(
            "INSERT INTO albums (uuid, title) VALUES (?1, ?2)",
            params![Uuid::new_v4().to_string(), title],
        )?;

        self.find_album(conn, title)?
            .ok_or_else(|| PhotoGalleryError::NotFound(format!("Album {}", title)))
    }

    /// List the assets of an album, ordered by creation time
    pub fn list_assets(
        &self,
        conn: &Connection,
        album: &Album,
        query: &AssetQuery,
    ) -> Result<Vec<PhotoAsset>, PhotoGalleryError> {
        let order = match query.order {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        };
        let sql = format!(
            "SELECT {} FROM assets
             WHERE album_id = ?1 AND media_type = ?2
             ORDER BY creation_time {order}, rowid {order}",
            ASSET_COLUMNS
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![album.id.to_string(), query.media_type.as_str()],
            |row| self.asset_from_row(row),
        )?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Get a single asset
    pub fn get_asset(
        &self,
        conn: &Connection,
        id: &PhotoId,
    ) -> Result<PhotoAsset, PhotoGalleryError> {
        let sql = format!("SELECT {} FROM assets WHERE uuid = ?1", ASSET_COLUMNS);
        conn.query_row(&sql, params![id.to_string()], |row| {
            self.asset_from_row(row)
        })
        .optional()?
        .ok_or_else(|| PhotoGalleryError::NotFound(format!("Photo {}", id)))
    }

    /// Import a captured file into `album_title` and return the new asset.
    ///
    /// The file is moved into storage before the row is written; if the insert
    /// fails the imported files are removed again.
    pub async fn create_asset(
        &self,
        conn: &Connection,
        album_title: &str,
        source_path: &str,
    ) -> Result<PhotoAsset, PhotoGalleryError> {
        log::debug!("Creating asset from {} in '{}'", source_path, album_title);

        let thumbnail_size = self
            .config
            .enable_thumbnails
            .then_some(self.config.thumbnail_size);
        let imported =
            import_photo_with_uuid(source_path, &self.config.storage_path, thumbnail_size).await?;

        let album = self.get_or_create_album(conn, album_title)?;
        let creation_time = Utc::now();

        let inserted = conn.execute(
            "INSERT INTO assets (uuid, album_id, media_type, relative_path, thumbnail_path, width, height, creation_time)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                imported.uuid.to_string(),
                album.id.to_string(),
                MediaType::Photo.as_str(),
                &imported.file_name,
                &imported.thumbnail_file_name,
                imported.width,
                imported.height,
                creation_time.timestamp_millis(),
            ],
        );

        if let Err(e) = inserted {
            log::error!("Insert of asset {} failed: {}", imported.uuid, e);
            self.remove_files(&imported.file_name, imported.thumbnail_file_name.as_deref());
            return Err(e.into());
        }

        self.get_asset(conn, &imported.uuid)
    }

    /// Delete several assets in one transaction.
    ///
    /// Files are removed after the commit; a file that cannot be removed is
    /// only logged since the row is already gone.
    pub fn delete_assets(
        &self,
        conn: &mut Connection,
        ids: &[PhotoId],
    ) -> Result<DeleteReport, PhotoGalleryError> {
        let mut report = DeleteReport::default();
        let mut files = Vec::new();

        let tx = conn.transaction()?;
        for id in ids {
            let paths: Option<(String, Option<String>)> = tx
                .query_row(
                    "SELECT relative_path, thumbnail_path FROM assets WHERE uuid = ?1",
                    params![id.to_string()],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;

            match paths {
                Some(paths) => {
                    tx.execute("DELETE FROM assets WHERE uuid = ?1", params![id.to_string()])?;
                    files.push(paths);
                    report.deleted.push(*id);
                }
                None => report.missing.push(*id),
            }
        }
        tx.commit()?;

        for (file, thumb) in &files {
            self.remove_files(file, thumb.as_deref());
        }

        log::info!(
            "Deleted {} assets ({} missing)",
            report.deleted.len(),
            report.missing.len()
        );
        Ok(report)
    }

    fn remove_files(&self, file: &str, thumb: Option<&str>) {
        for rel in std::iter::once(file).chain(thumb) {
            let abs = self.get_absolute_photo_path(rel);
            if let Err(e) = std::fs::remove_file(&abs) {
                log::warn!("Could not remove {}: {}", abs, e);
            }
        }
    }

    fn asset_from_row(&self, row: &rusqlite::Row<'_>) -> rusqlite::Result<PhotoAsset> {
        let uuid_str: String = row.get(0)?;
        let album_str: String = row.get(1)?;
        let media_type: String = row.get(2)?;
        let relative_path: String = row.get(3)?;
        let thumbnail: Option<String> = row.get(4)?;
        let creation_ms: i64 = row.get(7)?;

        Ok(PhotoAsset {
            id: Uuid::parse_str(&uuid_str).map_err(|_| rusqlite::Error::InvalidQuery)?,
            album_id: Uuid::parse_str(&album_str).map_err(|_| rusqlite::Error::InvalidQuery)?,
            uri: self.get_absolute_photo_path(&relative_path),
            thumbnail_uri: thumbnail.map(|t| self.get_absolute_photo_path(&t)),
            media_type: MediaType::from_str(&media_type),
            width: row.get(5)?,
            height: row.get(6)?,
            creation_time: DateTime::from_timestamp_millis(creation_ms)
                .ok_or(rusqlite::Error::InvalidQuery)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::init_photo_schema;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::path::PathBuf;

    struct Fixture {
        conn: Connection,
        service: PhotoGalleryService,
        dir: PathBuf,
    }

    impl Drop for Fixture {
        fn drop(&mut self) {
            std::fs::remove_dir_all(&self.dir).ok();
        }
    }

    fn setup() -> Fixture {
        let conn = Connection::open_in_memory().unwrap();
        init_photo_schema(&conn).unwrap();
        let dir = std::env::temp_dir().join(format!("photo-gallery-svc-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let service = PhotoGalleryService::new(PhotoGalleryConfig {
            storage_path: dir.join("photos").to_string_lossy().to_string(),
            enable_thumbnails: true,
            thumbnail_size: 16,
        });
        Fixture { conn, service, dir }
    }

    fn capture(fx: &Fixture, name: &str) -> String {
        let path = fx.dir.join(name);
        RgbImage::from_pixel(20, 10, Rgb([10, 200, 10]))
            .save_with_format(&path, ImageFormat::Jpeg)
            .unwrap();
        path.to_string_lossy().to_string()
    }

    fn insert_raw(fx: &Fixture, album: &Album, ms: i64) -> PhotoId {
        let id = Uuid::new_v4();
        fx.conn
            .execute(
                "INSERT INTO assets (uuid, album_id, relative_path, creation_time) VALUES (?1, ?2, ?3, ?4)",
                params![id.to_string(), album.id.to_string(), format!("{}.jpg", id), ms],
            )
            .unwrap();
        id
    }

    #[test]
    fn test_find_album_absent() {
        let fx = setup();
        assert!(fx.service.find_album(&fx.conn, "Camera").unwrap().is_none());
    }

    #[test]
    fn test_get_or_create_album_is_stable() {
        let fx = setup();
        let first = fx.service.get_or_create_album(&fx.conn, "Camera").unwrap();
        let second = fx.service.get_or_create_album(&fx.conn, "Camera").unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.asset_count, 0);
    }

    #[test]
    fn test_list_assets_orders_by_creation_time() {
        let fx = setup();
        let album = fx.service.get_or_create_album(&fx.conn, "Camera").unwrap();
        let b = insert_raw(&fx, &album, 2_000);
        let a = insert_raw(&fx, &album, 3_000);
        let c = insert_raw(&fx, &album, 1_000);

        let asc = fx
            .service
            .list_assets(&fx.conn, &album, &AssetQuery::default())
            .unwrap();
        assert_eq!(
            asc.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![c, b, a]
        );

        let desc = fx
            .service
            .list_assets(
                &fx.conn,
                &album,
                &AssetQuery {
                    media_type: MediaType::Photo,
                    order: SortOrder::Descending,
                },
            )
            .unwrap();
        assert_eq!(desc.first().map(|p| p.id), Some(a));
    }

    #[test]
    fn test_list_assets_filters_media_type_and_album() {
        let fx = setup();
        let camera = fx.service.get_or_create_album(&fx.conn, "Camera").unwrap();
        let other = fx.service.get_or_create_album(&fx.conn, "Other").unwrap();
        insert_raw(&fx, &camera, 1);
        insert_raw(&fx, &other, 2);
        fx.conn
            .execute(
                "INSERT INTO assets (uuid, album_id, media_type, relative_path, creation_time) VALUES (?1, ?2, 'video', 'v.mp4', 3)",
                params![Uuid::new_v4().to_string(), camera.id.to_string()],
            )
            .unwrap();

        let photos = fx
            .service
            .list_assets(&fx.conn, &camera, &AssetQuery::default())
            .unwrap();
        assert_eq!(photos.len(), 1);
        assert!(photos.iter().all(|p| p.media_type == MediaType::Photo));
    }

    #[tokio::test]
    async fn test_create_asset_imports_file() {
        let fx = setup();
        let source = capture(&fx, "tmp_capture.jpg");

        let asset = fx
            .service
            .create_asset(&fx.conn, "Camera", &source)
            .await
            .unwrap();

        assert!(std::path::Path::new(&asset.uri).exists());
        assert!(asset.uri.starts_with(&fx.service.config().storage_path));
        assert!(asset.thumbnail_uri.is_some());
        assert_eq!(asset.width, Some(20));

        let album = fx.service.find_album(&fx.conn, "Camera").unwrap().unwrap();
        assert_eq!(album.asset_count, 1);
        assert_eq!(asset.album_id, album.id);
    }

    #[tokio::test]
    async fn test_delete_assets_reports_missing() {
        let mut fx = setup();
        let source = capture(&fx, "tmp_capture.jpg");
        let asset = fx
            .service
            .create_asset(&fx.conn, "Camera", &source)
            .await
            .unwrap();
        let ghost = Uuid::new_v4();

        let report = fx
            .service
            .delete_assets(&mut fx.conn, &[asset.id, ghost])
            .unwrap();

        assert_eq!(report.deleted, vec![asset.id]);
        assert_eq!(report.missing, vec![ghost]);
        assert!(!report.is_complete());
        assert!(!std::path::Path::new(&asset.uri).exists());
        assert!(matches!(
            fx.service.get_asset(&fx.conn, &asset.id),
            Err(PhotoGalleryError::NotFound(_))
        ));
    }

    #[test]
    fn test_absolute_path() {
        let service = PhotoGalleryService::new(PhotoGalleryConfig {
            storage_path: "/data/photos/".to_string(),
            ..Default::default()
        });
        assert_eq!(
            service.get_absolute_photo_path("a.jpg"),
            "/data/photos/a.jpg"
        );
        assert_eq!(service.get_absolute_photo_path("/abs/b.jpg"), "/abs/b.jpg");
    }
}
