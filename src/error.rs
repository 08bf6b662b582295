use photo_gallery::{DeviceError, PhotoGalleryError};
use std::fmt;

/// Central error types for the capture screen
#[derive(Debug)]
pub enum AppError {
    /// Database error (rusqlite)
    Database(rusqlite::Error),
    /// Filesystem error
    Filesystem(std::io::Error),
    /// Photo store error (list, create, delete)
    Store(PhotoGalleryError),
    /// Camera or media permission denied
    PermissionDenied(String),
    /// The user backed out of the camera
    CaptureCancelled,
    /// Capturing a photo failed
    CaptureFailure(String),
    /// The share sheet failed to open
    ShareFailure(String),
    /// The device bridge is not available on this platform
    PlatformNotSupported(String),
    /// Invalid configuration file
    Config(String),
    /// General error
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Database(e) => write!(f, "Database error: {}", e),
            AppError::Filesystem(e) => write!(f, "Filesystem error: {}", e),
            AppError::Store(e) => write!(f, "Photo store error: {}", e),
            AppError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            AppError::CaptureCancelled => write!(f, "Capture cancelled"),
            AppError::CaptureFailure(msg) => write!(f, "Capture failed: {}", msg),
            AppError::ShareFailure(msg) => write!(f, "Share failed: {}", msg),
            AppError::PlatformNotSupported(msg) => write!(f, "Not supported: {}", msg),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for AppError {}

// Conversions from other error types
impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        AppError::Database(e)
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Filesystem(e)
    }
}

impl From<PhotoGalleryError> for AppError {
    fn from(e: PhotoGalleryError) -> Self {
        match e {
            PhotoGalleryError::DatabaseError(e) => AppError::Database(e),
            other => AppError::Store(other),
        }
    }
}

impl From<toml::de::Error> for AppError {
    fn from(e: toml::de::Error) -> Self {
        AppError::Config(e.to_string())
    }
}

impl AppError {
    /// Map a device bridge failure during capture
    pub fn from_capture(e: DeviceError) -> Self {
        match e {
            DeviceError::PermissionDenied(msg) => AppError::PermissionDenied(msg),
            DeviceError::PlatformNotSupported(msg) => AppError::PlatformNotSupported(msg),
            DeviceError::Cancelled(_) => AppError::CaptureCancelled,
            other => AppError::CaptureFailure(other.to_string()),
        }
    }

    /// Map a device bridge failure while sharing
    pub fn from_share(e: DeviceError) -> Self {
        match e {
            DeviceError::PlatformNotSupported(msg) => AppError::PlatformNotSupported(msg),
            other => AppError::ShareFailure(other.to_string()),
        }
    }
}

/// User-friendly error messages for UI
impl AppError {
    pub fn user_message(&self) -> String {
        match self {
            AppError::Database(_) | AppError::Store(_) => {
                "The photo library could not be updated. Please try again.".to_string()
            }
            AppError::Filesystem(_) => {
                "Error accessing files. Please check app permissions.".to_string()
            }
            AppError::PermissionDenied(msg) => format!("Permission required: {}", msg),
            AppError::CaptureCancelled => "No photo taken.".to_string(),
            AppError::CaptureFailure(_) => "The photo could not be taken.".to_string(),
            AppError::ShareFailure(_) => "The photo could not be shared.".to_string(),
            AppError::PlatformNotSupported(msg) => msg.clone(),
            AppError::Config(_) => "Invalid settings, using defaults.".to_string(),
            AppError::Other(msg) => msg.clone(),
        }
    }
}
