//! The photo capture screen as an explicit state object.
//!
//! `ScreenState` holds everything the screen shows, `view` turns it into a
//! render model, and `ScreenController` runs the user-triggered handlers
//! against the camera, photo store and share sheet.

pub mod controller;
pub mod selection;
pub mod state;
pub mod view;

pub use controller::{ScreenController, StateHandle};
pub use selection::SelectionSet;
pub use state::{Notice, NoticeKind, ScreenState};
pub use view::{ReadyView, ScreenView, Tile};
