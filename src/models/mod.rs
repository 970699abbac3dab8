pub mod talk;
pub mod video;

pub use talk::{default_talks, parse_talks, Talk};
pub use video::{default_videos, parse_videos, tiktok_embed_url, VideoItem};
