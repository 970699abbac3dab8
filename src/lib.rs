mod utils;

pub mod clock;
pub mod idle;
pub mod kiosk;
pub mod models;
pub mod navigation;
pub mod schedule;
pub mod screens;
pub mod settings;

use std::sync::Arc;

use anyhow::{Context, Result};
use log::info;

use clock::SystemClock;
use kiosk::Kiosk;
use settings::{settings_path, SettingsStore};

/// Load settings and datasets, then run the kiosk on stdin/stdout until the
/// input closes or the process is interrupted.
pub async fn run() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Open Day kiosk starting up...");

    let store = SettingsStore::new(settings_path())?;
    let settings = store.settings();
    info!("settings from {}", store.path().display());

    let calendar = settings.calendar().context("invalid event calendar in settings")?;
    let talks = settings.load_talks()?;
    let videos = settings.load_videos()?;

    info!(
        "{} talks on {} ({}), {} videos, idle timeout {}s",
        talks.len(),
        calendar.date,
        calendar.timezone,
        videos.len(),
        settings.idle_timeout().as_secs()
    );

    let (kiosk, nav_rx) = Kiosk::new(settings, calendar, talks, videos, Arc::new(SystemClock));
    kiosk::run_console(kiosk, nav_rx).await
}
