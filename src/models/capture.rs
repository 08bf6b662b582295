use photo_gallery::{DeleteReport, PhotoId};

/// Proof that a camera is attached and ready to capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraHandle {
    device: String,
}

impl CameraHandle {
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
        }
    }

    pub fn device(&self) -> &str {
        &self.device
    }
}

/// A freshly captured image that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    pub temporary_uri: String,
}

/// What the store did with a delete request
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    Deleted(Vec<PhotoId>),
    /// The user declined the store's confirmation
    Cancelled,
    Partial {
        deleted: Vec<PhotoId>,
        missing: Vec<PhotoId>,
    },
}

impl From<DeleteReport> for DeleteOutcome {
    fn from(report: DeleteReport) -> Self {
        if report.is_complete() {
            DeleteOutcome::Deleted(report.deleted)
        } else {
            DeleteOutcome::Partial {
                deleted: report.deleted,
                missing: report.missing,
            }
        }
    }
}
