// Camera capability backed by photo-gallery's device bridge. The bridge polls
// the activity synchronously, so every call is moved off the UI executor.

use crate::capabilities::Camera;
use crate::error::AppError;
use crate::models::{CameraHandle, CapturedImage, Facing, PermissionState};
use photo_gallery::{device, AndroidBridgeConfig};

/// Run a blocking bridge call on tokio's blocking pool
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Other(format!("Task join error: {}", e)))
}

pub struct DeviceCamera {
    bridge: AndroidBridgeConfig,
}

impl DeviceCamera {
    pub fn new(bridge: AndroidBridgeConfig) -> Self {
        Self { bridge }
    }
}

impl Camera for DeviceCamera {
    async fn current_permission(&self) -> PermissionState {
        let bridge = self.bridge.clone();
        match run_blocking(move || device::permission_state(&bridge)).await {
            Ok(Ok(state)) => state,
            Ok(Err(e)) => {
                log::warn!("Permission query failed: {}", e);
                PermissionState::Unknown
            }
            Err(e) => {
                log::warn!("Permission query failed: {}", e);
                PermissionState::Unknown
            }
        }
    }

    async fn request_permission(&self) -> PermissionState {
        let bridge = self.bridge.clone();
        match run_blocking(move || device::request_permissions(&bridge)).await {
            Ok(Ok(state)) => state,
            // no answer from the dialog counts as a refusal
            Ok(Err(e)) => {
                log::warn!("Permission request failed: {}", e);
                PermissionState::Denied
            }
            Err(e) => {
                log::warn!("Permission request failed: {}", e);
                PermissionState::Denied
            }
        }
    }

    async fn attach(&self) -> Result<CameraHandle, AppError> {
        let bridge = self.bridge.clone();
        match run_blocking(move || device::has_camera(&bridge)).await? {
            Ok(true) => Ok(CameraHandle::new(std::env::consts::OS)),
            Ok(false) => Err(AppError::PlatformNotSupported(
                "This device has no camera".to_string(),
            )),
            Err(e) => Err(AppError::from_capture(e)),
        }
    }

    async fn capture(
        &self,
        handle: &CameraHandle,
        facing: Facing,
    ) -> Result<CapturedImage, AppError> {
        log::debug!("Capturing on {} with {:?} camera", handle.device(), facing);
        let bridge = self.bridge.clone();
        let path = run_blocking(move || device::capture_photo(&bridge, facing))
            .await?
            .map_err(AppError::from_capture)?;

        Ok(CapturedImage {
            temporary_uri: path.to_string_lossy().to_string(),
        })
    }
}

#[cfg(all(test, not(target_os = "android")))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_desktop_has_no_camera() {
        let camera = DeviceCamera::new(AndroidBridgeConfig::default());
        assert_eq!(camera.request_permission().await, PermissionState::Granted);
        assert!(matches!(
            camera.attach().await,
            Err(AppError::PlatformNotSupported(_))
        ));
    }
}
