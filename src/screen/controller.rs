use super::state::{NoticeKind, ScreenState};
use crate::capabilities::{Camera, PhotoStore, ShareSheet};
use crate::error::AppError;
use crate::models::{AssetQuery, CameraHandle, Facing, PhotoAsset, PhotoId};
use std::rc::Rc;

/// Mutable access to the screen state.
///
/// Handlers only touch state inside `update`, never across an await, so the
/// same handler code drives a Dioxus signal and a plain `ScreenState` in tests.
pub trait StateHandle {
    fn update<R>(&mut self, f: impl FnOnce(&mut ScreenState) -> R) -> R;
}

impl StateHandle for ScreenState {
    fn update<R>(&mut self, f: impl FnOnce(&mut ScreenState) -> R) -> R {
        f(self)
    }
}

/// Runs the screen's handlers against its three capabilities
pub struct ScreenController<C, S, H> {
    camera: Rc<C>,
    store: Rc<S>,
    share: Rc<H>,
    album_name: Rc<str>,
}

impl<C, S, H> Clone for ScreenController<C, S, H> {
    fn clone(&self) -> Self {
        Self {
            camera: Rc::clone(&self.camera),
            store: Rc::clone(&self.store),
            share: Rc::clone(&self.share),
            album_name: Rc::clone(&self.album_name),
        }
    }
}

// Handles are compared by identity so Dioxus props stay stable
impl<C, S, H> PartialEq for ScreenController<C, S, H> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.camera, &other.camera)
            && Rc::ptr_eq(&self.store, &other.store)
            && Rc::ptr_eq(&self.share, &other.share)
    }
}

impl<C: Camera, S: PhotoStore, H: ShareSheet> ScreenController<C, S, H> {
    pub fn new(camera: C, store: S, share: H, album_name: &str) -> Self {
        Self {
            camera: Rc::new(camera),
            store: Rc::new(store),
            share: Rc::new(share),
            album_name: Rc::from(album_name),
        }
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn share_sheet(&self) -> &H {
        &self.share
    }

    /// Permission gate. Runs once when the screen mounts: asks for access if
    /// needed, then attaches the camera and loads the album. A denied
    /// permission is final for the session.
    pub async fn activate(&self, state: &mut impl StateHandle) {
        let mut permission = self.camera.current_permission().await;
        if !permission.is_granted() {
            permission = self.camera.request_permission().await;
        }
        // a request that settles without an answer counts as denied
        if !permission.is_granted() {
            log::info!("Camera/media permission not granted ({:?})", permission);
            state.update(|s| s.set_permission(crate::models::PermissionState::Denied));
            return;
        }
        state.update(|s| s.set_permission(permission));

        match self.camera.attach().await {
            Ok(handle) => {
                log::debug!("Camera attached: {}", handle.device());
                state.update(|s| s.attach_camera(handle));
            }
            Err(e) => {
                log::warn!("Camera unavailable: {}", e);
                state.update(|s| s.report(NoticeKind::Info, e.user_message()));
            }
        }

        self.load_photos(state).await;
    }

    /// Gallery loader: replace `photos` with the album's contents
    pub async fn load_photos(&self, state: &mut impl StateHandle) {
        match self.fetch_album().await {
            Ok(Some(assets)) => {
                log::debug!("Loaded {} photos", assets.len());
                state.update(|s| s.reconcile(assets));
            }
            Ok(None) => log::debug!("Album '{}' does not exist yet", self.album_name),
            Err(e) => {
                state.update(|s| s.report_error(&e));
            }
        }
    }

    async fn fetch_album(&self) -> Result<Option<Vec<PhotoAsset>>, AppError> {
        let Some(album) = self.store.find_album(&self.album_name).await? else {
            return Ok(None);
        };
        Ok(Some(
            self.store
                .list_assets(&album, &AssetQuery::default())
                .await?,
        ))
    }

    /// Capture, persist and prepend one photo
    pub async fn take_picture(&self, state: &mut impl StateHandle) {
        let Some((handle, facing)) = state.update(|s| s.begin_capture()) else {
            log::debug!("Capture ignored: no camera or another operation is running");
            return;
        };

        let result = self.capture_and_store(&handle, facing).await;
        state.update(|s| s.finish_capture(result));
    }

    async fn capture_and_store(
        &self,
        handle: &CameraHandle,
        facing: Facing,
    ) -> Result<PhotoAsset, AppError> {
        let image = self.camera.capture(handle, facing).await?;
        self.store.create_asset(&image.temporary_uri).await
    }

    pub fn toggle_facing(&self, state: &mut impl StateHandle) -> Facing {
        state.update(|s| s.toggle_facing())
    }

    pub fn toggle_select(&self, state: &mut impl StateHandle, id: PhotoId) -> bool {
        state.update(|s| s.toggle_select(id))
    }

    /// Delete the selection, then reload from the store. The reload is
    /// authoritative: a cancelled or partial delete shows up there.
    pub async fn delete_selected(&self, state: &mut impl StateHandle) {
        let Some(ids) = state.update(|s| s.begin_delete()) else {
            return;
        };

        log::info!("Deleting {} photos", ids.len());
        let outcome = self.store.delete_assets(&ids).await;
        state.update(|s| s.apply_delete_outcome(outcome));

        // still holding the delete slot so a capture cannot interleave
        self.load_photos(state).await;
        state.update(|s| s.end_delete());
    }

    /// Share selected photos one after another, in selection order
    pub async fn share_selected(&self, state: &mut impl StateHandle) {
        if !self.share.is_available().await {
            log::debug!("Sharing not available");
            return;
        }
        let Some(ids) = state.update(|s| s.begin_share()) else {
            return;
        };

        for id in ids {
            let Some(uri) = state.update(|s| s.uri_of(&id)) else {
                continue;
            };
            if let Err(e) = self.share.share(&uri).await {
                state.update(|s| s.report_error(&e));
            }
        }

        state.update(|s| s.end_share());
    }

    pub fn dismiss_notice(&self, state: &mut impl StateHandle, id: u64) {
        state.update(|s| s.dismiss_notice(id));
    }
}
