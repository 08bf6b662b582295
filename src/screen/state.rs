use super::selection::SelectionSet;
use crate::error::AppError;
use crate::models::{CameraHandle, DeleteOutcome, Facing, PermissionState, PhotoAsset, PhotoId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// Transient message shown above the grid
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub text: String,
}

/// Everything the capture screen renders from.
///
/// `photos` is kept newest first. A capture is prepended optimistically and
/// the next reload replaces the list wholesale, so the two may briefly differ
/// from what the store holds.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenState {
    permission: PermissionState,
    photos: Vec<PhotoAsset>,
    selected: SelectionSet,
    facing: Facing,
    camera: Option<CameraHandle>,
    notice: Option<Notice>,
    capture_pending: bool,
    delete_pending: bool,
    share_pending: bool,
    next_notice_id: u64,
}

impl ScreenState {
    pub fn new(facing: Facing) -> Self {
        Self {
            permission: PermissionState::Unknown,
            photos: Vec::new(),
            selected: SelectionSet::new(),
            facing,
            camera: None,
            notice: None,
            capture_pending: false,
            delete_pending: false,
            share_pending: false,
            next_notice_id: 1,
        }
    }

    pub fn permission(&self) -> PermissionState {
        self.permission
    }

    pub fn photos(&self) -> &[PhotoAsset] {
        &self.photos
    }

    pub fn selected(&self) -> &SelectionSet {
        &self.selected
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn camera(&self) -> Option<&CameraHandle> {
        self.camera.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn notice_id(&self) -> Option<u64> {
        self.notice.as_ref().map(|n| n.id)
    }

    pub fn is_capturing(&self) -> bool {
        self.capture_pending
    }

    pub fn is_deleting(&self) -> bool {
        self.delete_pending
    }

    pub fn is_sharing(&self) -> bool {
        self.share_pending
    }

    pub fn set_permission(&mut self, permission: PermissionState) {
        self.permission = permission;
    }

    pub fn attach_camera(&mut self, handle: CameraHandle) {
        self.camera = Some(handle);
    }

    pub fn toggle_facing(&mut self) -> Facing {
        self.facing = self.facing.flipped();
        self.facing
    }

    pub fn toggle_select(&mut self, id: PhotoId) -> bool {
        self.selected.toggle(id)
    }

    /// Replace `photos` with the store's listing (oldest first) and drop
    /// selected ids that no longer exist
    pub fn reconcile(&mut self, mut ascending: Vec<PhotoAsset>) {
        ascending.reverse();
        // stable, so equal timestamps keep the reversed store order
        ascending.sort_by(|a, b| b.creation_time.cmp(&a.creation_time));
        self.photos = ascending;

        let photos = &self.photos;
        self.selected.retain(|id| photos.iter().any(|p| p.id == *id));
    }

    /// Claim the capture slot. None when no camera is attached or a capture
    /// or delete is still running.
    pub fn begin_capture(&mut self) -> Option<(CameraHandle, Facing)> {
        if self.capture_pending || self.delete_pending {
            return None;
        }
        let handle = self.camera.clone()?;
        self.capture_pending = true;
        Some((handle, self.facing))
    }

    pub fn finish_capture(&mut self, result: Result<PhotoAsset, AppError>) {
        self.capture_pending = false;
        match result {
            Ok(asset) => {
                self.photos.retain(|p| p.id != asset.id);
                self.photos.insert(0, asset);
            }
            Err(AppError::CaptureCancelled) => log::info!("Capture cancelled"),
            Err(e) => {
                self.report_error(&e);
            }
        }
    }

    /// Claim the delete slot and return the ids to delete
    pub fn begin_delete(&mut self) -> Option<Vec<PhotoId>> {
        if self.selected.is_empty() || self.delete_pending || self.capture_pending {
            return None;
        }
        self.delete_pending = true;
        Some(self.selected.to_vec())
    }

    pub fn apply_delete_outcome(&mut self, outcome: Result<DeleteOutcome, AppError>) {
        match outcome {
            Ok(DeleteOutcome::Deleted(_)) => self.selected.clear(),
            Ok(DeleteOutcome::Partial { deleted, missing }) => {
                log::warn!(
                    "Partial delete: {} removed, {} not found",
                    deleted.len(),
                    missing.len()
                );
                self.selected.clear();
            }
            Ok(DeleteOutcome::Cancelled) => {}
            Err(e) => {
                self.report_error(&e);
            }
        }
    }

    pub fn end_delete(&mut self) {
        self.delete_pending = false;
    }

    pub fn begin_share(&mut self) -> Option<Vec<PhotoId>> {
        if self.share_pending || self.selected.is_empty() {
            return None;
        }
        self.share_pending = true;
        Some(self.selected.to_vec())
    }

    pub fn end_share(&mut self) {
        self.share_pending = false;
    }

    /// URI of the photo with `id`, if it is still in the list
    pub fn uri_of(&self, id: &PhotoId) -> Option<String> {
        self.photos
            .iter()
            .find(|p| p.id == *id)
            .map(|p| p.uri.clone())
    }

    /// Show a notice, replacing the current one. Returns its id.
    pub fn report(&mut self, kind: NoticeKind, text: impl Into<String>) -> u64 {
        let id = self.next_notice_id;
        self.next_notice_id += 1;
        self.notice = Some(Notice {
            id,
            kind,
            text: text.into(),
        });
        id
    }

    pub fn report_error(&mut self, error: &AppError) -> u64 {
        log::error!("{}", error);
        self.report(NoticeKind::Error, error.user_message())
    }

    /// Remove the notice if it is still the one with `id`
    pub fn dismiss_notice(&mut self, id: u64) {
        if self.notice.as_ref().is_some_and(|n| n.id == id) {
            self.notice = None;
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    pub(crate) fn asset(ms: i64) -> PhotoAsset {
        let id = Uuid::new_v4();
        PhotoAsset {
            id,
            album_id: Uuid::nil(),
            uri: format!("/photos/{}.jpg", id),
            thumbnail_uri: None,
            media_type: photo_gallery::MediaType::Photo,
            width: None,
            height: None,
            creation_time: DateTime::<Utc>::from_timestamp_millis(ms).unwrap(),
        }
    }

    #[test]
    fn test_reconcile_orders_newest_first() {
        let mut state = ScreenState::new(Facing::Back);
        let (a, b, c) = (asset(1), asset(2), asset(3));
        state.reconcile(vec![a.clone(), b.clone(), c.clone()]);
        assert_eq!(state.photos(), &[c, b, a]);

        for pair in state.photos().windows(2) {
            assert!(pair[0].creation_time >= pair[1].creation_time);
        }
    }

    #[test]
    fn test_reconcile_repairs_unsorted_listing() {
        let mut state = ScreenState::new(Facing::Back);
        state.reconcile(vec![asset(5), asset(1), asset(9), asset(3)]);
        for pair in state.photos().windows(2) {
            assert!(pair[0].creation_time >= pair[1].creation_time);
        }
    }

    #[test]
    fn test_reconcile_prunes_stale_selection() {
        let mut state = ScreenState::new(Facing::Back);
        let (a, b) = (asset(1), asset(2));
        state.reconcile(vec![a.clone(), b.clone()]);
        state.toggle_select(a.id);
        state.toggle_select(b.id);

        state.reconcile(vec![b.clone()]);
        assert!(!state.selected().contains(&a.id));
        assert!(state.selected().contains(&b.id));
    }

    #[test]
    fn test_capture_requires_camera() {
        let mut state = ScreenState::new(Facing::Front);
        assert!(state.begin_capture().is_none());

        state.attach_camera(CameraHandle::new("test"));
        let (_, facing) = state.begin_capture().unwrap();
        assert_eq!(facing, Facing::Front);
        assert!(state.begin_capture().is_none(), "second capture while pending");
    }

    #[test]
    fn test_capture_and_delete_exclude_each_other() {
        let mut state = ScreenState::new(Facing::Back);
        state.attach_camera(CameraHandle::new("test"));
        let a = asset(1);
        state.reconcile(vec![a.clone()]);
        state.toggle_select(a.id);

        assert!(state.begin_delete().is_some());
        assert!(state.begin_capture().is_none());
        state.end_delete();

        assert!(state.begin_capture().is_some());
        assert!(state.begin_delete().is_none());
    }

    #[test]
    fn test_failed_capture_keeps_photos() {
        let mut state = ScreenState::new(Facing::Back);
        state.attach_camera(CameraHandle::new("test"));
        state.reconcile(vec![asset(1)]);
        let before = state.photos().to_vec();

        state.begin_capture().unwrap();
        state.finish_capture(Err(AppError::CaptureFailure("lens cap".into())));

        assert_eq!(state.photos(), before.as_slice());
        assert_eq!(state.notice().map(|n| n.kind), Some(NoticeKind::Error));
        assert!(!state.is_capturing());
    }

    #[test]
    fn test_cancelled_delete_keeps_selection() {
        let mut state = ScreenState::new(Facing::Back);
        let a = asset(1);
        state.reconcile(vec![a.clone()]);
        state.toggle_select(a.id);

        state.begin_delete().unwrap();
        state.apply_delete_outcome(Ok(DeleteOutcome::Cancelled));
        state.end_delete();
        assert!(state.selected().contains(&a.id));

        state.begin_delete().unwrap();
        state.apply_delete_outcome(Ok(DeleteOutcome::Deleted(vec![a.id])));
        state.end_delete();
        assert!(state.selected().is_empty());
    }

    #[test]
    fn test_dismiss_only_matching_notice() {
        let mut state = ScreenState::new(Facing::Back);
        let first = state.report(NoticeKind::Info, "one");
        let second = state.report(NoticeKind::Info, "two");

        state.dismiss_notice(first);
        assert_eq!(state.notice().map(|n| n.id), Some(second));
        state.dismiss_notice(second);
        assert!(state.notice().is_none());
    }

    #[test]
    fn test_toggle_facing() {
        let mut state = ScreenState::new(Facing::Back);
        assert_eq!(state.toggle_facing(), Facing::Front);
        assert_eq!(state.toggle_facing(), Facing::Back);
    }

    #[test]
    fn test_cancelled_capture_is_silent() {
        let mut state = ScreenState::new(Facing::Back);
        state.attach_camera(CameraHandle::new("test"));
        state.reconcile(vec![asset(1)]);
        let before = state.photos().to_vec();

        state.begin_capture().unwrap();
        state.finish_capture(Err(AppError::CaptureCancelled));

        assert_eq!(state.photos(), before.as_slice());
        assert!(state.notice().is_none());
        assert!(!state.is_capturing());
    }

    #[test]
    fn test_notice_id_ignores_other_changes() {
        let mut state = ScreenState::new(Facing::Back);
        assert_eq!(state.notice_id(), None);
        let id = state.report(NoticeKind::Info, "saved");

        let a = asset(1);
        state.reconcile(vec![a.clone()]);
        state.toggle_select(a.id);
        state.toggle_facing();
        assert_eq!(state.notice_id(), Some(id));
    }
}
