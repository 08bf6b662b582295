use crate::camera::run_blocking;
use crate::capabilities::ShareSheet;
use crate::error::AppError;
use photo_gallery::{device, AndroidBridgeConfig};

/// Platform share sheet
pub struct DeviceShareSheet {
    bridge: AndroidBridgeConfig,
}

impl DeviceShareSheet {
    pub fn new(bridge: AndroidBridgeConfig) -> Self {
        Self { bridge }
    }
}

impl ShareSheet for DeviceShareSheet {
    async fn is_available(&self) -> bool {
        let bridge = self.bridge.clone();
        match run_blocking(move || device::is_share_available(&bridge)).await {
            Ok(Ok(available)) => available,
            Ok(Err(e)) => {
                log::debug!("Sharing unavailable: {}", e);
                false
            }
            Err(e) => {
                log::debug!("Sharing unavailable: {}", e);
                false
            }
        }
    }

    async fn share(&self, uri: &str) -> Result<(), AppError> {
        let bridge = self.bridge.clone();
        let uri = uri.to_string();
        run_blocking(move || device::share_file(&bridge, &uri))
            .await?
            .map_err(AppError::from_share)
    }
}
