use dioxus::prelude::*;
use dioxus_i18n::prelude::use_init_i18n;
use dioxus_i18n::t;

mod camera;
mod capabilities;
mod components;
mod config;
mod database;
mod error;
mod filesystem;
mod i18n;
mod image_processing;
mod models;
mod screen;
mod services;
mod sharing;

use camera::DeviceCamera;
use components::{CaptureScreen, DeviceController};
use config::AppConfig;
use services::SqlitePhotoStore;
use sharing::DeviceShareSheet;

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    let config = AppConfig::load();
    init_logger(&config);
    log::info!("Starting with album '{}'", config.album_name);

    dioxus::LaunchBuilder::new().with_context(config).launch(App);
}

#[cfg(target_os = "android")]
fn init_logger(config: &AppConfig) {
    let level = config
        .log_level
        .parse()
        .unwrap_or(log::LevelFilter::Info);
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(level)
            .with_tag("snapgrid"),
    );
}

#[cfg(not(target_os = "android"))]
fn init_logger(config: &AppConfig) {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();
}

fn build_controller(config: &AppConfig) -> Result<DeviceController, String> {
    let store = SqlitePhotoStore::open(config).map_err(|e| {
        log::error!("Opening photo library failed: {}", e);
        e.to_string()
    })?;
    Ok(DeviceController::new(
        DeviceCamera::new(config.bridge_config()),
        store,
        DeviceShareSheet::new(config.bridge_config()),
        &config.album_name,
    ))
}

#[component]
fn App() -> Element {
    use_init_i18n(i18n::init_i18n);
    let config = use_context::<AppConfig>();
    let controller = use_hook(|| build_controller(&config));

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        div { style: "display: flex; flex-direction: column; height: 100vh; font-family: sans-serif;",
            match controller {
                Ok(controller) => rsx! {
                    CaptureScreen {
                        controller,
                        default_facing: config.default_facing,
                        grid_columns: config.grid_columns,
                        notice_timeout_secs: config.notice_timeout_secs,
                    }
                },
                Err(e) => rsx! {
                    div { style: "background: #fee; border: 1px solid #fcc; color: #c33; padding: 12px; margin: 16px; border-radius: 8px; font-size: 14px;",
                        "⚠️ "
                        {t!("error-startup", error: e)}
                    }
                },
            }
        }
    }
}
