use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_TALKS: &str = include_str!("../../data/university_talks.json");

/// One scheduled talk as it appears in the static dataset.
///
/// `start_time` and `end_time` are 12-hour wall-clock strings such as
/// `"10:45am"`; they only become instants once bound to the event calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Talk {
    pub id: u32,
    pub title: String,
    pub subtitle: String,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
}

pub fn parse_talks(json: &str) -> Result<Vec<Talk>> {
    serde_json::from_str(json).context("talk dataset is not a valid JSON array of talks")
}

/// The dataset shipped with the kiosk.
pub fn default_talks() -> Result<Vec<Talk>> {
    parse_talks(DEFAULT_TALKS)
}
