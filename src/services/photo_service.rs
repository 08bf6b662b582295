use crate::camera::run_blocking;
use crate::capabilities::PhotoStore;
use crate::config::AppConfig;
use crate::database;
use crate::error::AppError;
use crate::filesystem;
use crate::models::{Album, DeleteOutcome, PhotoAsset, PhotoId};
use crate::models::AssetQuery;
use photo_gallery::{device, PhotoGalleryConfig, PhotoGalleryService};
use rusqlite::Connection;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Asks the user to confirm deleting `n` photos
pub type DeleteConfirmation = Arc<dyn Fn(usize) -> bool + Send + Sync>;

/// Photo store backed by the photo-gallery SQLite library.
///
/// Captures land in a single configured album. The connection sits behind an
/// async mutex because imports await the blocking pool while writing.
pub struct SqlitePhotoStore {
    conn: Mutex<Connection>,
    service: PhotoGalleryService,
    album_name: String,
    confirm: DeleteConfirmation,
}

impl SqlitePhotoStore {
    pub fn new(conn: Connection, gallery: PhotoGalleryConfig, album_name: String) -> Self {
        Self {
            conn: Mutex::new(conn),
            service: PhotoGalleryService::new(gallery),
            album_name,
            confirm: Arc::new(|_| true),
        }
    }

    /// Open the on-device library described by `config`
    pub fn open(config: &AppConfig) -> Result<Self, AppError> {
        let conn = database::init_database()?;
        let gallery = PhotoGalleryConfig {
            storage_path: filesystem::photo_storage_dir().to_string_lossy().to_string(),
            enable_thumbnails: true,
            thumbnail_size: config.thumbnail_size,
        };

        let bridge = config.bridge_config();
        let confirm: DeleteConfirmation = Arc::new(move |count| {
            match device::confirm_delete(&bridge, count) {
                Ok(confirmed) => confirmed,
                Err(e) => {
                    log::warn!("Delete confirmation failed: {}", e);
                    false
                }
            }
        });

        Ok(Self::new(conn, gallery, config.album_name.clone()).with_confirmation(confirm))
    }

    pub fn with_confirmation(mut self, confirm: DeleteConfirmation) -> Self {
        self.confirm = confirm;
        self
    }
}

impl PhotoStore for SqlitePhotoStore {
    async fn find_album(&self, name: &str) -> Result<Option<Album>, AppError> {
        let conn = self.conn.lock().await;
        Ok(self.service.find_album(&conn, name)?)
    }

    async fn list_assets(
        &self,
        album: &Album,
        query: &AssetQuery,
    ) -> Result<Vec<PhotoAsset>, AppError> {
        let conn = self.conn.lock().await;
        Ok(self.service.list_assets(&conn, album, query)?)
    }

    async fn create_asset(&self, uri: &str) -> Result<PhotoAsset, AppError> {
        let conn = self.conn.lock().await;
        let asset = self
            .service
            .create_asset(&conn, &self.album_name, uri)
            .await?;
        log::info!("Stored photo {} in '{}'", asset.id, self.album_name);
        Ok(asset)
    }

    async fn delete_assets(&self, ids: &[PhotoId]) -> Result<DeleteOutcome, AppError> {
        let confirm = Arc::clone(&self.confirm);
        let count = ids.len();
        if !run_blocking(move || confirm(count)).await? {
            log::info!("Deletion of {} photos cancelled", count);
            return Ok(DeleteOutcome::Cancelled);
        }

        let mut conn = self.conn.lock().await;
        let report = self.service.delete_assets(&mut conn, ids)?;
        Ok(report.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::path::PathBuf;
    use uuid::Uuid;

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("snapgrid-store-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn setup_store(dir: &PathBuf) -> SqlitePhotoStore {
        let conn = Connection::open_in_memory().unwrap();
        photo_gallery::init_photo_schema(&conn).unwrap();
        let gallery = PhotoGalleryConfig {
            storage_path: dir.join("photos").to_string_lossy().to_string(),
            enable_thumbnails: true,
            thumbnail_size: 64,
        };
        SqlitePhotoStore::new(conn, gallery, "Camera".to_string())
    }

    fn fake_capture(dir: &PathBuf) -> String {
        let path = dir.join(format!("capture-{}.jpg", Uuid::new_v4()));
        RgbImage::from_pixel(8, 8, Rgb([0, 0, 255]))
            .save_with_format(&path, ImageFormat::Jpeg)
            .unwrap();
        path.to_string_lossy().to_string()
    }

    #[tokio::test]
    async fn test_album_absent_until_first_capture() {
        let dir = scratch_dir();
        let store = setup_store(&dir);
        assert!(store.find_album("Camera").await.unwrap().is_none());

        let asset = store.create_asset(&fake_capture(&dir)).await.unwrap();
        let album = store.find_album("Camera").await.unwrap().unwrap();
        let assets = store.list_assets(&album, &AssetQuery::default()).await.unwrap();
        assert_eq!(assets, vec![asset]);

        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn test_list_is_oldest_first() {
        let dir = scratch_dir();
        let store = setup_store(&dir);
        let first = store.create_asset(&fake_capture(&dir)).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = store.create_asset(&fake_capture(&dir)).await.unwrap();

        let album = store.find_album("Camera").await.unwrap().unwrap();
        let ids: Vec<_> = store
            .list_assets(&album, &AssetQuery::default())
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec![first.id, second.id]);

        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn test_delete_confirmed_and_cancelled() {
        let dir = scratch_dir();
        let asset;
        {
            let store = setup_store(&dir).with_confirmation(Arc::new(|_| false));
            asset = store.create_asset(&fake_capture(&dir)).await.unwrap();
            assert_eq!(
                store.delete_assets(&[asset.id]).await.unwrap(),
                DeleteOutcome::Cancelled
            );
            let album = store.find_album("Camera").await.unwrap().unwrap();
            assert_eq!(store.list_assets(&album, &AssetQuery::default()).await.unwrap().len(), 1);

            let store = store.with_confirmation(Arc::new(|n| n == 1));
            assert_eq!(
                store.delete_assets(&[asset.id]).await.unwrap(),
                DeleteOutcome::Deleted(vec![asset.id])
            );
            assert!(store.list_assets(&album, &AssetQuery::default()).await.unwrap().is_empty());
        }
        assert!(!std::path::Path::new(&asset.uri).exists());

        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn test_create_from_missing_file_fails() {
        let dir = scratch_dir();
        let store = setup_store(&dir);
        let result = store
            .create_asset(dir.join("gone.jpg").to_str().unwrap())
            .await;
        assert!(matches!(result, Err(AppError::Store(_))));
        assert!(store.find_album("Camera").await.unwrap().is_none());

        std::fs::remove_dir_all(dir).ok();
    }
}
