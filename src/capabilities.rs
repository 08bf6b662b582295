//! The three outside services the capture screen depends on.
//!
//! The screen never touches JNI, SQLite or the filesystem directly; it goes
//! through these traits so that the handlers can run against in-memory fakes.
//! Futures are not required to be `Send`: everything runs on the UI executor.
#![allow(async_fn_in_trait)]

use crate::error::AppError;
use crate::models::{
    Album, AssetQuery, CameraHandle, CapturedImage, DeleteOutcome, Facing, PermissionState, PhotoAsset,
    PhotoId,
};

pub trait Camera {
    /// Combined camera + media library permission
    async fn current_permission(&self) -> PermissionState;

    /// Show the OS permission prompt and report its result
    async fn request_permission(&self) -> PermissionState;

    async fn attach(&self) -> Result<CameraHandle, AppError>;

    async fn capture(
        &self,
        handle: &CameraHandle,
        facing: Facing,
    ) -> Result<CapturedImage, AppError>;
}

pub trait PhotoStore {
    async fn find_album(&self, name: &str) -> Result<Option<Album>, AppError>;

    /// Assets of `album` matching `query`
    async fn list_assets(
        &self,
        album: &Album,
        query: &AssetQuery,
    ) -> Result<Vec<PhotoAsset>, AppError>;

    /// Persist a captured file as a new asset
    async fn create_asset(&self, uri: &str) -> Result<PhotoAsset, AppError>;

    /// Delete assets; the store may ask the user to confirm first
    async fn delete_assets(&self, ids: &[PhotoId]) -> Result<DeleteOutcome, AppError>;
}

pub trait ShareSheet {
    async fn is_available(&self) -> bool;

    /// Resolves once the share surface is dismissed; the outcome is not reported
    async fn share(&self, uri: &str) -> Result<(), AppError>;
}
