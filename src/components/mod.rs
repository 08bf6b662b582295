pub mod capture_screen;

pub use capture_screen::{CaptureScreen, DeviceController};
