use std::fmt::Write;

use chrono_tz::Tz;

use crate::{
    schedule::{Board, Tier},
    screens::CarouselSnapshot,
};

pub const NOTHING_LEFT: &str = "No more talks today.";

fn tier_marker(tier: Tier) -> &'static str {
    match tier {
        Tier::InProgress => "●",
        Tier::MostUrgent => "!!",
        Tier::High => "! ",
        Tier::Medium => "~ ",
        Tier::Upcoming => "  ",
    }
}

pub fn render_home() -> String {
    [
        "== Open Day ==",
        "  [go /university-talks]  University talks",
        "  [go /video-gallery]     Student life videos",
    ]
    .join("\n")
}

pub fn render_board(board: &Board, timezone: Tz) -> String {
    let mut out = String::from("== University talks ==\n");

    if board.is_exhausted() {
        out.push_str(NOTHING_LEFT);
        return out;
    }

    let as_of = board.generated_at.with_timezone(&timezone);
    let _ = writeln!(out, "as of {}", as_of.format("%H:%M:%S %Z"));

    for entry in &board.entries {
        let talk = &entry.talk.talk;
        let _ = writeln!(
            out,
            "{} [{}] {}\n     {} - {} | {}\n     {}",
            tier_marker(entry.status.tier),
            entry.status.label,
            talk.title,
            talk.start_time,
            talk.end_time,
            talk.location,
            talk.subtitle,
        );
    }

    out.truncate(out.trim_end().len());
    out
}

pub fn render_gallery(snapshot: &CarouselSnapshot) -> String {
    let mut out = String::from("== Video gallery ==\n");

    let Some(current) = &snapshot.current else {
        out.push_str("No videos available.");
        return out;
    };

    let state = match snapshot.playing {
        Some(_) => "playing",
        None => "paused",
    };
    let _ = write!(
        out,
        "{}/{} {} ({state})\n     {}",
        snapshot.index + 1,
        snapshot.len,
        current.title,
        current.embed_url.as_deref().unwrap_or(&current.video_url),
    );
    out
}
