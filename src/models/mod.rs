pub mod capture;

pub use capture::{CameraHandle, CapturedImage, DeleteOutcome};
pub use photo_gallery::{Album, AssetQuery, Facing, MediaType, PermissionState, PhotoAsset, PhotoId};
