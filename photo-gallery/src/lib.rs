//! # Photo Gallery
//!
//! A reusable album-based photo store with thumbnail generation.
//!
//! This crate provides cross-platform photo library functionality, including:
//! - Albums as named groupings of assets
//! - Importing captured images into managed storage
//! - Automatic grid thumbnail generation (WebP format)
//! - Database integration with SQLite
//! - A device bridge for camera capture, permissions and the share sheet
//!
//! ## Platform Separation
//!
//! The store itself is platform independent. The `device` module talks to the
//! Android host activity through JNI and returns `PlatformNotSupported` (or a
//! sensible desktop default) everywhere else.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use photo_gallery::{PhotoGalleryService, PhotoGalleryConfig};
//!
//! let config = PhotoGalleryConfig {
//!     storage_path: "/path/to/photos".to_string(),
//!     enable_thumbnails: true,
//!     thumbnail_size: 256,
//! };
//!
//! let service = PhotoGalleryService::new(config);
//! let album = service.find_album(&conn, "Camera")?;
//! ```

pub mod device;
pub mod models;
pub mod schema;
pub mod service;
pub mod thumbnail;

pub use device::{
    AndroidBridgeConfig, DeviceError, Facing, PermissionState,
};
pub use models::{
    Album, AssetQuery, DeleteReport, MediaType, PhotoAsset, PhotoGalleryConfig, PhotoId, SortOrder,
};
pub use schema::init_photo_schema;
pub use service::{PhotoGalleryError, PhotoGalleryService};
pub use thumbnail::{create_thumbnail, import_photo_with_uuid, ImportedPhoto, ThumbnailError};
