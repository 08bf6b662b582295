use crate::camera::DeviceCamera;
use crate::image_processing::PreviewCache;
use crate::models::{Facing, PhotoId};
use crate::screen::{NoticeKind, ReadyView, ScreenController, ScreenState, ScreenView, StateHandle};
use crate::services::SqlitePhotoStore;
use crate::sharing::DeviceShareSheet;
use dioxus::prelude::*;
use dioxus_gallery::{Gallery, GalleryConfig, GalleryItem};
use dioxus_i18n::t;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;
use uuid::Uuid;

pub type DeviceController = ScreenController<DeviceCamera, SqlitePhotoStore, DeviceShareSheet>;

impl StateHandle for Signal<ScreenState> {
    fn update<R>(&mut self, f: impl FnOnce(&mut ScreenState) -> R) -> R {
        f(&mut self.write())
    }
}

#[component]
pub fn CaptureScreen(
    controller: DeviceController,
    default_facing: Facing,
    grid_columns: u32,
    notice_timeout_secs: u64,
) -> Element {
    let state = use_signal(|| ScreenState::new(default_facing));

    // Permission gate and first load, once on mount
    let ctrl = controller.clone();
    use_hook(move || {
        let mut state = state;
        spawn(async move {
            ctrl.activate(&mut state).await;
        });
    });

    // Auto-dismiss whichever notice is current
    let notice_id = use_memo(move || state.read().notice_id());
    use_effect(move || {
        let Some(id) = notice_id() else {
            return;
        };
        if notice_timeout_secs == 0 {
            return;
        }
        let mut state = state;
        spawn(async move {
            tokio::time::sleep(Duration::from_secs(notice_timeout_secs)).await;
            state.write().dismiss_notice(id);
        });
    });

    // Encoded previews, reused across renders and dropped with their photo
    let photos = use_memo(move || state.read().photos().to_vec());
    let cache = use_hook(|| Rc::new(RefCell::new(PreviewCache::default())));
    let previews = use_memo(move || cache.borrow_mut().refresh(&photos.read()));

    let view = state.read().view();
    match view {
        ScreenView::Loading => rsx! {
            div { style: "padding:48px; text-align:center;",
                div { style: "font-size:48px; margin-bottom:16px;", "⏳" }
                div { style: "color:#666;", {t!("screen-loading")} }
            }
        },
        ScreenView::Denied => rsx! {
            div { style: "padding:48px; text-align:center;",
                div { style: "font-size:48px; margin-bottom:16px;", "🚫" }
                h2 { style: "margin:0 0 8px 0; font-size:22px; color:#333;", {t!("screen-denied-title")} }
                div { style: "color:#666; font-size:14px;", {t!("screen-denied-hint")} }
            }
        },
        ScreenView::Ready(view) => rsx! {
            ReadyScreen { controller, state, view, previews, grid_columns }
        },
    }
}

#[component]
fn ReadyScreen(
    controller: DeviceController,
    state: Signal<ScreenState>,
    view: ReadyView,
    previews: Memo<HashMap<PhotoId, Option<String>>>,
    grid_columns: u32,
) -> Element {
    let facing_key = match view.facing {
        Facing::Front => "front",
        Facing::Back => "back",
    };

    let items: Vec<GalleryItem> = view
        .tiles
        .iter()
        .map(|tile| GalleryItem {
            id: tile.id.to_string(),
            data_url: previews.read().get(&tile.id).cloned().flatten(),
            selected: tile.selected,
        })
        .collect();

    let gallery_config = GalleryConfig {
        columns: grid_columns,
        empty_text: t!("gallery-empty"),
    };

    let capture_ctrl = controller.clone();
    let flip_ctrl = controller.clone();
    let delete_ctrl = controller.clone();
    let share_ctrl = controller.clone();
    let select_ctrl = controller.clone();
    let dismiss_ctrl = controller;

    rsx! {
        div { style: "display:flex; flex-direction:column; height:100%;",
            // Camera controls
            div { style: "padding:16px; background:#222; color:white; display:flex; flex-direction:column; gap:12px; align-items:center;",
                if view.camera_ready {
                    div { style: "font-size:13px; color:#ccc;", {t!("camera-facing", facing: facing_key)} }
                } else {
                    div { style: "font-size:13px; color:#f99;", {t!("camera-unavailable")} }
                }
                div { style: "display:flex; gap:12px;",
                    button {
                        style: "padding:14px 24px; background:white; color:#222; border-radius:32px; font-size:16px; font-weight:600;",
                        disabled: !view.capture_enabled,
                        onclick: move |_| {
                            let ctrl = capture_ctrl.clone();
                            let mut state = state;
                            spawn(async move {
                                ctrl.take_picture(&mut state).await;
                            });
                        },
                        {t!("camera-capture")}
                    }
                    button {
                        style: "padding:14px 18px; background:rgba(255,255,255,0.2); color:white; border-radius:32px; font-size:16px;",
                        disabled: !view.camera_ready,
                        onclick: move |_| {
                            let mut state = state;
                            flip_ctrl.toggle_facing(&mut state);
                        },
                        {t!("camera-flip")}
                    }
                }
            }

            // Selection actions
            div { style: "display:flex; gap:8px; padding:8px; align-items:center;",
                if view.selected_count > 0 {
                    span { style: "flex:1; font-size:13px; color:#666;", {t!("selection-count", count: view.selected_count)} }
                } else {
                    span { style: "flex:1;" }
                }
                button {
                    class: "btn-danger",
                    style: "padding:8px 14px; font-size:14px;",
                    disabled: !view.delete_enabled,
                    onclick: move |_| {
                        let ctrl = delete_ctrl.clone();
                        let mut state = state;
                        spawn(async move {
                            ctrl.delete_selected(&mut state).await;
                        });
                    },
                    {t!("action-delete")}
                }
                button {
                    class: "btn-primary",
                    style: "padding:8px 14px; font-size:14px;",
                    disabled: !view.share_enabled,
                    onclick: move |_| {
                        let ctrl = share_ctrl.clone();
                        let mut state = state;
                        spawn(async move {
                            ctrl.share_selected(&mut state).await;
                        });
                    },
                    {t!("action-share")}
                }
            }

            if let Some(notice) = view.notice.clone() {
                div {
                    style: match notice.kind {
                        NoticeKind::Error => "margin:0 8px 8px 8px; padding:12px; background:#fee; border:1px solid #fcc; color:#c33; border-radius:8px; font-size:14px; display:flex; gap:8px;",
                        NoticeKind::Info => "margin:0 8px 8px 8px; padding:12px; background:#e8f4f8; color:#0066cc; border-radius:8px; font-size:14px; display:flex; gap:8px;",
                    },
                    span { style: "flex:1;", "{notice.text}" }
                    button {
                        style: "background:none; color:inherit; font-size:14px;",
                        onclick: move |_| {
                            let mut state = state;
                            dismiss_ctrl.dismiss_notice(&mut state, notice.id);
                        },
                        {t!("action-dismiss")}
                    }
                }
            }

            div { style: "flex:1; overflow-y:auto;",
                Gallery {
                    items,
                    config: gallery_config,
                    on_toggle: move |id: String| {
                        match Uuid::parse_str(&id) {
                            Ok(id) => {
                                let mut state = state;
                                select_ctrl.toggle_select(&mut state, id);
                            }
                            Err(e) => log::warn!("Ignoring tile with invalid id {}: {}", id, e),
                        }
                    },
                }
            }
        }
    }
}
