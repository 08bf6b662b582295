use super::state::{Notice, ScreenState};
use crate::models::{Facing, PermissionState, PhotoId};

/// One grid cell
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub id: PhotoId,
    pub uri: String,
    pub thumbnail_uri: Option<String>,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadyView {
    pub facing: Facing,
    /// False when no camera could be attached
    pub camera_ready: bool,
    pub capture_enabled: bool,
    pub delete_enabled: bool,
    pub share_enabled: bool,
    pub selected_count: usize,
    pub tiles: Vec<Tile>,
    pub notice: Option<Notice>,
}

/// What the screen shows; exactly one of these at a time
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenView {
    Loading,
    Denied,
    Ready(ReadyView),
}

impl ScreenState {
    pub fn view(&self) -> ScreenView {
        match self.permission() {
            PermissionState::Unknown => ScreenView::Loading,
            PermissionState::Denied => ScreenView::Denied,
            PermissionState::Granted => ScreenView::Ready(self.ready_view()),
        }
    }

    fn ready_view(&self) -> ReadyView {
        let busy = self.is_capturing() || self.is_deleting();
        let has_selection = !self.selected().is_empty();

        ReadyView {
            facing: self.facing(),
            camera_ready: self.camera().is_some(),
            capture_enabled: self.camera().is_some() && !busy,
            delete_enabled: has_selection && !busy,
            share_enabled: has_selection && !self.is_sharing(),
            selected_count: self.selected().len(),
            tiles: self
                .photos()
                .iter()
                .map(|p| Tile {
                    id: p.id,
                    uri: p.uri.clone(),
                    thumbnail_uri: p.thumbnail_uri.clone(),
                    selected: self.selected().contains(&p.id),
                })
                .collect(),
            notice: self.notice().cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CameraHandle;
    use crate::screen::state::tests::asset;

    #[test]
    fn test_permission_views() {
        let mut state = ScreenState::new(Facing::Back);
        assert_eq!(state.view(), ScreenView::Loading);

        state.set_permission(PermissionState::Denied);
        assert_eq!(state.view(), ScreenView::Denied);

        state.set_permission(PermissionState::Granted);
        assert!(matches!(state.view(), ScreenView::Ready(_)));
    }

    #[test]
    fn test_ready_view_reflects_selection() {
        let mut state = ScreenState::new(Facing::Back);
        state.set_permission(PermissionState::Granted);
        let (a, b) = (asset(1), asset(2));
        state.reconcile(vec![a.clone(), b.clone()]);
        state.toggle_select(a.id);

        let ScreenView::Ready(view) = state.view() else {
            panic!("expected ready view");
        };
        assert_eq!(view.tiles.len(), 2);
        assert_eq!(view.tiles[0].id, b.id);
        assert!(!view.tiles[0].selected);
        assert!(view.tiles[1].selected);
        assert_eq!(view.selected_count, 1);
        assert!(view.delete_enabled);
        assert!(view.share_enabled);
        assert!(!view.capture_enabled, "no camera attached");
    }

    #[test]
    fn test_capture_disabled_while_pending() {
        let mut state = ScreenState::new(Facing::Back);
        state.set_permission(PermissionState::Granted);
        state.attach_camera(CameraHandle::new("test"));

        let ScreenView::Ready(view) = state.view() else {
            panic!("expected ready view");
        };
        assert!(view.capture_enabled);
        assert!(!view.delete_enabled);

        state.begin_capture().unwrap();
        let ScreenView::Ready(view) = state.view() else {
            panic!("expected ready view");
        };
        assert!(!view.capture_enabled);
    }
}
