use dioxus::prelude::*;

/// Represents a single item in the gallery
#[derive(Clone, PartialEq, Debug)]
pub struct GalleryItem {
    /// Unique identifier for the item
    pub id: String,
    /// Data URL or path to the image (can be base64-encoded)
    pub data_url: Option<String>,
    /// Whether the item is part of the current selection
    pub selected: bool,
}

/// Configuration for the Gallery component
#[derive(Clone, PartialEq)]
pub struct GalleryConfig {
    /// Number of thumbnail columns
    pub columns: u32,
    /// Text shown when there are no items
    pub empty_text: String,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            columns: 3,
            empty_text: "No photos available".to_string(),
        }
    }
}

/// Inline style for the grid container
pub fn grid_style(columns: u32) -> String {
    format!(
        "display: grid; grid-template-columns: repeat({}, 1fr); gap: 4px; padding: 4px;",
        columns.max(1)
    )
}

/// A multi-select photo grid for Dioxus
///
/// This component displays a fixed-column grid of thumbnails. Tapping a tile
/// reports its id through `on_toggle`; the parent owns the selection and
/// passes it back through `GalleryItem::selected`.
///
/// # Example
/// ```rust,ignore
/// Gallery {
///     items: vec![
///         GalleryItem {
///             id: "1".to_string(),
///             data_url: Some("data:image/webp;base64,...".to_string()),
///             selected: false,
///         }
///     ],
///     config: GalleryConfig::default(),
///     on_toggle: move |id| {
///         // Flip selection in parent
///     },
/// }
/// ```
#[component]
pub fn Gallery(
    /// List of gallery items to display, in display order
    items: Vec<GalleryItem>,
    /// Gallery configuration
    #[props(default)]
    config: GalleryConfig,
    /// Callback when user taps an item
    on_toggle: EventHandler<String>,
) -> Element {
    if items.is_empty() {
        return rsx! {
            div {
                style: "padding: 24px; text-align: center; background: #f5f5f5; border-radius: 8px; color: #999;",
                "{config.empty_text}"
            }
        };
    }

    rsx! {
        div {
            style: grid_style(config.columns),
            for item in items {
                GalleryTile {
                    key: "{item.id}",
                    item: item.clone(),
                    on_toggle,
                }
            }
        }
    }
}

/// Internal component for rendering a single gallery tile
#[component]
fn GalleryTile(item: GalleryItem, on_toggle: EventHandler<String>) -> Element {
    let border = if item.selected {
        "3px solid #0066cc"
    } else {
        "3px solid transparent"
    };
    let tile_style = format!(
        "position: relative; aspect-ratio: 1/1; border-radius: 6px; overflow: hidden; border: {}; background: #f0f0f0; cursor: pointer;",
        border
    );

    rsx! {
        div {
            style: "{tile_style}",
            onclick: {
                let item_id = item.id.clone();
                move |_| on_toggle.call(item_id.clone())
            },
            if let Some(url) = &item.data_url {
                img {
                    src: "{url}",
                    style: "width: 100%; height: 100%; object-fit: cover;",
                }
            } else {
                div {
                    style: "width: 100%; height: 100%; display: flex; align-items: center; justify-content: center; color: #999;",
                    "📷"
                }
            }
            // Selection indicator
            if item.selected {
                div {
                    style: "position: absolute; bottom: 4px; right: 4px; width: 24px; height: 24px; background: #0066cc; border-radius: 50%; display: flex; align-items: center; justify-content: center; color: white; font-size: 16px;",
                    "✓"
                }
            }
        }
    }
}
