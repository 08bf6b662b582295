use image::{imageops::FilterType, GenericImageView, ImageFormat};
use std::io::Cursor;
use std::path::Path;
use uuid::Uuid;

/// Error type for import and thumbnail operations
#[derive(Debug)]
pub enum ThumbnailError {
    ImageLoadError(String),
    ImageSaveError(String),
    IoError(std::io::Error),
    PathError(String),
}

impl std::fmt::Display for ThumbnailError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThumbnailError::ImageLoadError(msg) => write!(f, "Image load error: {}", msg),
            ThumbnailError::ImageSaveError(msg) => write!(f, "Image save error: {}", msg),
            ThumbnailError::IoError(e) => write!(f, "IO error: {}", e),
            ThumbnailError::PathError(msg) => write!(f, "Path error: {}", msg),
        }
    }
}

impl std::error::Error for ThumbnailError {}

impl From<std::io::Error> for ThumbnailError {
    fn from(err: std::io::Error) -> Self {
        ThumbnailError::IoError(err)
    }
}

/// A file that has been moved into managed storage
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedPhoto {
    pub uuid: Uuid,
    /// File name relative to the storage directory
    pub file_name: String,
    pub thumbnail_file_name: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Creates a square-bounded WebP thumbnail next to the original.
/// Returns (thumbnail_filename, original_width, original_height)
pub fn create_thumbnail(
    original_path: &Path,
    uuid: &str,
    size: u32,
) -> Result<(String, u32, u32), ThumbnailError> {
    log::debug!("Creating thumbnail for UUID: {}", uuid);

    let img = image::open(original_path)
        .map_err(|e| ThumbnailError::ImageLoadError(format!("Failed to load image: {}", e)))?;
    let (width, height) = img.dimensions();

    let parent_dir = original_path
        .parent()
        .ok_or_else(|| ThumbnailError::PathError("No parent directory found".to_string()))?;

    let thumb_filename = format!("{}_thumb.webp", uuid);
    let thumb_path = parent_dir.join(&thumb_filename);
    let thumb_img = img.resize(size, size, FilterType::Lanczos3);

    let mut buffer = Cursor::new(Vec::new());
    thumb_img
        .write_to(&mut buffer, ImageFormat::WebP)
        .map_err(|e| ThumbnailError::ImageSaveError(format!("Failed to write thumbnail: {}", e)))?;

    std::fs::write(&thumb_path, buffer.into_inner())?;

    log::debug!("Thumbnail created: {:?}", thumb_path);

    Ok((thumb_filename, width, height))
}

/// Imports a captured file into `storage_dir` under a fresh UUID name and
/// optionally creates its thumbnail.
/// Uses spawn_blocking to avoid blocking the async runtime
pub async fn import_photo_with_uuid(
    source_path: &str,
    storage_dir: &str,
    thumbnail_size: Option<u32>,
) -> Result<ImportedPhoto, ThumbnailError> {
    let source_path = source_path.to_string();
    let storage_dir = storage_dir.to_string();

    tokio::task::spawn_blocking(move || {
        let source = Path::new(&source_path);
        if !source.is_file() {
            log::error!("Captured file doesn't exist: {}", source_path);
            return Err(ThumbnailError::PathError(format!(
                "Source file not found: {}",
                source_path
            )));
        }

        let uuid = Uuid::new_v4();
        let ext = source
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_else(|| "jpg".to_string());
        let file_name = format!("{}.{}", uuid, ext);

        let target_dir = Path::new(&storage_dir);
        std::fs::create_dir_all(target_dir)?;
        let target = target_dir.join(&file_name);

        log::debug!("Importing {:?} -> {:?}", source, target);

        // the source stays in place until the copy is fully imported
        if let Err(e) = std::fs::copy(source, &target) {
            discard_partial_import(target_dir, &file_name, &uuid);
            return Err(e.into());
        }

        let dimensions = match thumbnail_size {
            Some(size) => create_thumbnail(&target, &uuid.to_string(), size)
                .map(|(thumb, w, h)| (Some(thumb), Some(w), Some(h))),
            None => match image::image_dimensions(&target) {
                Ok((w, h)) => Ok((None, Some(w), Some(h))),
                Err(e) => {
                    log::warn!("Could not read dimensions of {:?}: {}", target, e);
                    Ok((None, None, None))
                }
            },
        };
        let (thumbnail_file_name, width, height) = match dimensions {
            Ok(dimensions) => dimensions,
            Err(e) => {
                log::error!("Import of {} failed: {}", source_path, e);
                discard_partial_import(target_dir, &file_name, &uuid);
                return Err(e);
            }
        };

        if let Err(e) = std::fs::remove_file(source) {
            log::warn!("Could not remove original: {}", e);
        }

        Ok(ImportedPhoto {
            uuid,
            file_name,
            thumbnail_file_name,
            width,
            height,
        })
    })
    .await
    .map_err(|e| ThumbnailError::PathError(format!("Task join error: {}", e)))?
}

fn discard_partial_import(dir: &Path, file_name: &str, uuid: &Uuid) {
    for name in [file_name.to_string(), format!("{}_thumb.webp", uuid)] {
        let path = dir.join(name);
        if path.exists() {
            if let Err(e) = std::fs::remove_file(&path) {
                log::warn!("Could not remove {:?}: {}", path, e);
            }
        }
    }
}
