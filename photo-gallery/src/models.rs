use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Store-assigned, stable identifier of an asset
pub type PhotoId = Uuid;

/// A named grouping of assets
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Album {
    pub id: Uuid,
    pub title: String,
    pub asset_count: i64,
    pub created_at: String,
}

/// Kind of media stored for an asset
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Photo,
    Video,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Photo => "photo",
            MediaType::Video => "video",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "video" => MediaType::Video,
            _ => MediaType::Photo,
        }
    }
}

/// Represents a stored photo with metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhotoAsset {
    pub id: PhotoId,
    pub album_id: Uuid,
    /// Absolute location of the stored file
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_uri: Option<String>,
    pub media_type: MediaType,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub creation_time: DateTime<Utc>,
}

/// Ordering of assets by creation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Filter and ordering for asset listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetQuery {
    pub media_type: MediaType,
    pub order: SortOrder,
}

impl Default for AssetQuery {
    fn default() -> Self {
        Self {
            media_type: MediaType::Photo,
            order: SortOrder::Ascending,
        }
    }
}

/// Result of a bulk delete
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteReport {
    pub deleted: Vec<PhotoId>,
    /// Requested ids that were not in the store
    pub missing: Vec<PhotoId>,
}

impl DeleteReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Configuration for photo gallery initialization
#[derive(Debug, Clone)]
pub struct PhotoGalleryConfig {
    /// Base directory for photo storage
    pub storage_path: String,
    pub enable_thumbnails: bool,
    /// Edge length of grid thumbnails in pixels
    pub thumbnail_size: u32,
}

impl Default for PhotoGalleryConfig {
    fn default() -> Self {
        Self {
            storage_path: String::new(),
            enable_thumbnails: true,
            thumbnail_size: 256,
        }
    }
}
