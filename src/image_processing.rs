use crate::error::AppError;
use crate::models::{PhotoAsset, PhotoId};
use base64::Engine;
use std::collections::HashMap;
use std::path::Path;

/// Simple MIME type from the file extension
fn guess_mime_from_ext(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("heic") | Some("heif") => "image/heic",
        _ => "image/jpeg",
    }
}

/// Read the image at `path` into a base64 data URL
pub fn image_path_to_data_url(path: &str) -> Result<String, AppError> {
    let p = Path::new(path);
    let mime = guess_mime_from_ext(p);
    let data = std::fs::read(p)?;
    let b64 = base64::engine::general_purpose::STANDARD.encode(data);
    Ok(format!("data:{};base64,{}", mime, b64))
}

/// Data URL for a grid tile: the thumbnail if it can be read, else the
/// full image. None if neither is readable.
pub fn preview_data_url(uri: &str, thumbnail_uri: Option<&str>) -> Option<String> {
    if let Some(thumb) = thumbnail_uri {
        match image_path_to_data_url(thumb) {
            Ok(url) => return Some(url),
            Err(e) => log::debug!("Thumbnail {} unreadable: {}", thumb, e),
        }
    }
    match image_path_to_data_url(uri) {
        Ok(url) => Some(url),
        Err(e) => {
            log::warn!("Photo {} unreadable: {}", uri, e);
            None
        }
    }
}

/// Tile previews keyed by photo id, encoded once per photo
#[derive(Debug, Default)]
pub struct PreviewCache {
    entries: HashMap<PhotoId, Option<String>>,
}

impl PreviewCache {
    /// Encode previews for photos not seen yet and drop those no longer
    /// listed. Returns the previews for `photos`.
    pub fn refresh(&mut self, photos: &[PhotoAsset]) -> HashMap<PhotoId, Option<String>> {
        self.entries
            .retain(|id, _| photos.iter().any(|p| p.id == *id));
        for p in photos {
            self.entries
                .entry(p.id)
                .or_insert_with(|| preview_data_url(&p.uri, p.thumbnail_uri.as_deref()));
        }
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(name: &str, bytes: &[u8]) -> String {
        let path = std::env::temp_dir().join(format!("{}-{}", uuid::Uuid::new_v4(), name));
        std::fs::write(&path, bytes).unwrap();
        path.to_string_lossy().to_string()
    }

    #[test]
    fn test_mime_from_extension() {
        assert_eq!(guess_mime_from_ext(Path::new("a.JPG")), "image/jpeg");
        assert_eq!(guess_mime_from_ext(Path::new("a_thumb.webp")), "image/webp");
        assert_eq!(guess_mime_from_ext(Path::new("noext")), "image/jpeg");
    }

    #[test]
    fn test_data_url() {
        let path = write_temp("x.png", b"abc");
        assert_eq!(
            image_path_to_data_url(&path).unwrap(),
            "data:image/png;base64,YWJj"
        );
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(matches!(
            image_path_to_data_url("/nonexistent/x.jpg"),
            Err(AppError::Filesystem(_))
        ));
    }

    #[test]
    fn test_preview_falls_back_to_full_image() {
        let full = write_temp("full.jpg", b"abc");
        let url = preview_data_url(&full, Some("/nonexistent/t.webp")).unwrap();
        assert!(url.starts_with("data:image/jpeg;base64,"));

        let thumb = write_temp("t.webp", b"abc");
        let url = preview_data_url(&full, Some(&thumb)).unwrap();
        assert!(url.starts_with("data:image/webp;base64,"));

        assert!(preview_data_url("/nonexistent/x.jpg", None).is_none());
        std::fs::remove_file(full).ok();
        std::fs::remove_file(thumb).ok();
    }

    #[test]
    fn test_preview_cache_encodes_once() {
        let mut photo = crate::screen::state::tests::asset(1);
        photo.uri = write_temp("cached.jpg", b"abc");
        let mut cache = PreviewCache::default();

        let first = cache.refresh(std::slice::from_ref(&photo));
        assert!(first[&photo.id].is_some());

        // a second refresh must not touch the file again
        std::fs::remove_file(&photo.uri).unwrap();
        let second = cache.refresh(std::slice::from_ref(&photo));
        assert_eq!(first, second);

        cache.refresh(&[]);
        assert_eq!(cache.len(), 0);
    }
}
