use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    models::{default_talks, default_videos, parse_talks, parse_videos, Talk, VideoItem},
    schedule::EventCalendar,
};

const SETTINGS_ENV: &str = "OPEN_DAY_SETTINGS";
const DEBUG_ENV: &str = "KIOSK_DEBUG";
const DEBUG_IDLE_TIMEOUT_SECS: u64 = 10;

/// Operator configuration for one event deployment. Read-only at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KioskSettings {
    pub idle_timeout_secs: u64,
    pub refresh_interval_secs: u64,
    pub carousel_interval_secs: u64,
    pub event_date: String,
    pub timezone: String,
    pub talks_path: Option<PathBuf>,
    pub videos_path: Option<PathBuf>,
}

impl Default for KioskSettings {
    fn default() -> Self {
        Self {
            idle_timeout_secs: 3 * 60,
            refresh_interval_secs: 5,
            carousel_interval_secs: 5,
            event_date: "2025-11-22".into(),
            timezone: "Europe/London".into(),
            talks_path: None,
            videos_path: None,
        }
    }
}

impl KioskSettings {
    pub fn calendar(&self) -> Result<EventCalendar> {
        EventCalendar::from_settings(&self.event_date, &self.timezone)
    }

    /// `KIOSK_DEBUG=1` shortens the idle timeout for bench testing.
    pub fn idle_timeout(&self) -> Duration {
        let debug_mode = env::var(DEBUG_ENV)
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        if debug_mode {
            Duration::from_secs(DEBUG_IDLE_TIMEOUT_SECS)
        } else {
            Duration::from_secs(self.idle_timeout_secs.max(1))
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    pub fn carousel_interval(&self) -> Duration {
        Duration::from_secs(self.carousel_interval_secs.max(1))
    }

    pub fn load_talks(&self) -> Result<Vec<Talk>> {
        match &self.talks_path {
            Some(path) => parse_talks(&read_dataset(path)?)
                .with_context(|| format!("while loading {}", path.display())),
            None => default_talks(),
        }
    }

    pub fn load_videos(&self) -> Result<Vec<VideoItem>> {
        match &self.videos_path {
            Some(path) => parse_videos(&read_dataset(path)?)
                .with_context(|| format!("while loading {}", path.display())),
            None => default_videos(),
        }
    }
}

fn read_dataset(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read dataset {}", path.display()))
}

/// `$OPEN_DAY_SETTINGS`, else `<config dir>/open-day-kiosk/settings.json`.
pub fn settings_path() -> PathBuf {
    if let Ok(path) = env::var(SETTINGS_ENV) {
        return PathBuf::from(path);
    }

    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("open-day-kiosk")
        .join("settings.json")
}

pub struct SettingsStore {
    path: PathBuf,
    data: KioskSettings,
}

impl SettingsStore {
    /// A missing file means defaults; a malformed one is logged and ignored.
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            parse_or_default(&contents, &path)
        } else {
            KioskSettings::default()
        };

        Ok(Self { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> KioskSettings {
        self.data.clone()
    }
}

fn parse_or_default(contents: &str, path: &Path) -> KioskSettings {
    match serde_json::from_str(contents) {
        Ok(settings) => settings,
        Err(err) => {
            log::warn!("Ignoring malformed settings in {}: {err}", path.display());
            KioskSettings::default()
        }
    }
}
