use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_VIDEOS: &str = include_str!("../../data/videos.json");
const TIKTOK_EMBED_BASE: &str = "https://www.tiktok.com/embed/v2";

/// A promotional clip shown in the gallery carousel.
///
/// `thumbnail` is filled by the external oembed collaborator and is never
/// fetched here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoItem {
    pub id: u32,
    pub title: String,
    pub tiktok_url: String,
    #[serde(default)]
    pub embed_url: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    pub video_url: String,
}

impl VideoItem {
    /// Fill `embed_url` from the share link when the dataset left it empty.
    pub fn with_derived_embed(mut self) -> Self {
        if self.embed_url.is_none() {
            self.embed_url = tiktok_embed_url(&self.tiktok_url);
        }
        self
    }
}

/// Build the autoplaying, muted embed URL for a TikTok share link.
///
/// Returns `None` when the link has no `video/<digits>` segment.
pub fn tiktok_embed_url(share_url: &str) -> Option<String> {
    let (_, rest) = share_url.split_once("video/")?;
    let id: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();

    if id.is_empty() {
        return None;
    }

    Some(format!("{TIKTOK_EMBED_BASE}/{id}?autoplay=1&muted=1"))
}

pub fn parse_videos(json: &str) -> Result<Vec<VideoItem>> {
    let videos: Vec<VideoItem> =
        serde_json::from_str(json).context("video catalogue is not a valid JSON array")?;
    Ok(videos.into_iter().map(VideoItem::with_derived_embed).collect())
}

pub fn default_videos() -> Result<Vec<VideoItem>> {
    parse_videos(DEFAULT_VIDEOS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embed_url_from_share_link_with_query() {
        let url = "https://www.tiktok.com/@sheffielduni/video/7533262488993926422?_r=1&_t=ZN";
        assert_eq!(
            tiktok_embed_url(url).as_deref(),
            Some("https://www.tiktok.com/embed/v2/7533262488993926422?autoplay=1&muted=1")
        );
    }

    #[test]
    fn embed_url_absent_without_video_id() {
        assert_eq!(tiktok_embed_url("https://www.tiktok.com/@sheffielduni"), None);
        assert_eq!(tiktok_embed_url("https://www.tiktok.com/video/abc"), None);
    }

    #[test]
    fn catalogue_derives_missing_embeds() {
        let videos = default_videos().unwrap();
        assert!(videos.iter().all(|v| v.embed_url.is_some()));
    }
}
