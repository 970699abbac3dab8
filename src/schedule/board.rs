use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::Talk;

use super::calendar::{EventCalendar, TimeParseError};
use super::status::{compute_status, StatusBadge};

const ENABLE_LOGS: bool = true;

use crate::log_warn;

/// A talk with its wall-clock strings bound to absolute instants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTalk {
    #[serde(flatten)]
    pub talk: Talk,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ResolvedTalk {
    pub fn resolve(talk: &Talk, calendar: &EventCalendar) -> Result<Self, TimeParseError> {
        Ok(Self {
            start: calendar.resolve(&talk.start_time)?,
            end: calendar.resolve(&talk.end_time)?,
            talk: talk.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardEntry {
    pub talk: ResolvedTalk,
    pub status: StatusBadge,
}

/// The talks still worth showing at `generated_at`, earliest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    pub generated_at: DateTime<Utc>,
    pub entries: Vec<BoardEntry>,
}

impl Board {
    /// True when every talk has finished; the display shows
    /// "No more talks today." instead of an empty list.
    pub fn is_exhausted(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Bind every talk to the calendar once, warning about each one that cannot
/// be shown. Dataset order is kept.
pub fn resolve_talks(talks: &[Talk], calendar: &EventCalendar) -> Vec<ResolvedTalk> {
    talks
        .iter()
        .filter_map(|talk| match ResolvedTalk::resolve(talk, calendar) {
            Ok(resolved) => Some(resolved),
            Err(err) => {
                log_warn!("hiding talk {} ({}): {err}", talk.id, talk.title);
                None
            }
        })
        .collect()
}

/// Board at `now` from talks already bound to the calendar. Silent, so it
/// can run on every refresh.
pub fn board_at(resolved: &[ResolvedTalk], now: DateTime<Utc>) -> Board {
    let mut entries: Vec<BoardEntry> = resolved
        .iter()
        .filter_map(|talk| {
            compute_status(now, talk.start, talk.end).map(|status| BoardEntry {
                talk: talk.clone(),
                status,
            })
        })
        .collect();

    entries.sort_by_key(|entry| entry.talk.start);

    Board {
        generated_at: now,
        entries,
    }
}

/// Resolve, drop finished or unparseable talks, and sort by start.
///
/// Pure in `(talks, now, calendar)`. Ties keep dataset order.
pub fn produce_board(talks: &[Talk], now: DateTime<Utc>, calendar: &EventCalendar) -> Board {
    board_at(&resolve_talks(talks, calendar), now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::status::Tier;
    use chrono::{NaiveDate, TimeZone};
    use chrono_tz::Europe::London;

    fn calendar() -> EventCalendar {
        EventCalendar::new(NaiveDate::from_ymd_opt(2025, 11, 22).unwrap(), London)
    }

    fn talk(id: u32, start: &str, end: &str) -> Talk {
        Talk {
            id,
            title: format!("Talk {id}"),
            subtitle: String::new(),
            start_time: start.into(),
            end_time: end.into(),
            location: "Diamond LT1".into(),
        }
    }

    fn local(h: u32, m: u32) -> DateTime<Utc> {
        calendar().bind(chrono::NaiveTime::from_hms_opt(h, m, 0).unwrap())
    }

    fn ids(board: &Board) -> Vec<u32> {
        board.entries.iter().map(|e| e.talk.talk.id).collect()
    }

    #[test]
    fn two_talk_scenario_at_ten_past_ten() {
        let talks = [talk(1, "10:00am", "10:20am"), talk(2, "10:30am", "10:50am")];
        let board = produce_board(&talks, local(10, 10), &calendar());

        assert_eq!(ids(&board), vec![1, 2]);
        assert_eq!(board.entries[0].status.label, "In progress");
        assert_eq!(board.entries[1].status.label, "Starting in 20 minutes");
        assert_eq!(board.entries[1].status.tier, Tier::High);
    }

    #[test]
    fn finished_talks_are_dropped() {
        let talks = [talk(1, "9:00am", "9:30am"), talk(2, "11:00am", "11:30am")];
        let board = produce_board(&talks, local(10, 0), &calendar());
        assert_eq!(ids(&board), vec![2]);
    }

    #[test]
    fn talk_ending_now_is_still_shown() {
        let talks = [talk(1, "9:00am", "10:00am")];
        let board = produce_board(&talks, local(10, 0), &calendar());
        assert_eq!(ids(&board), vec![1]);
        assert!(board.entries[0].status.is_in_progress());
    }

    #[test]
    fn sorted_by_start_with_stable_ties() {
        let talks = [
            talk(1, "2:00pm", "2:20pm"),
            talk(2, "11:00am", "11:20am"),
            talk(3, "2:00pm", "2:30pm"),
            talk(4, "11:00am", "11:45am"),
            talk(5, "9:30am", "9:50am"),
        ];
        let board = produce_board(&talks, local(9, 0), &calendar());
        assert_eq!(ids(&board), vec![5, 2, 4, 1, 3]);

        for pair in board.entries.windows(2) {
            assert!(pair[0].talk.start <= pair[1].talk.start);
        }
    }

    #[test]
    fn unparseable_talks_are_hidden_without_disturbing_the_rest() {
        let talks = [
            talk(1, "11:00am", "11:20am"),
            talk(2, "soon", "11:30am"),
            talk(3, "10:00am", "half ten"),
            talk(4, "10:30am", "10:50am"),
        ];
        let board = produce_board(&talks, local(9, 0), &calendar());
        assert_eq!(ids(&board), vec![4, 1]);
    }

    #[test]
    fn folded_hours_resolve_like_twelve_hour_ones() {
        let talks = [talk(1, "13:05pm", "13:25pm"), talk(2, "1:05pm", "1:25pm")];
        let board = produce_board(&talks, local(12, 0), &calendar());
        assert_eq!(board.entries[0].talk.start, board.entries[1].talk.start);
    }

    #[test]
    fn empty_when_everything_is_over() {
        let talks = [talk(1, "9:00am", "9:30am")];
        let board = produce_board(&talks, local(18, 0), &calendar());
        assert!(board.is_exhausted());
    }

    #[test]
    fn bad_talks_are_dropped_once_at_resolution() {
        let talks = [
            talk(1, "11:00am", "11:20am"),
            talk(2, "soon", "11:30am"),
            talk(3, "10:30am", "10:50am"),
        ];
        let resolved = resolve_talks(&talks, &calendar());
        let kept: Vec<u32> = resolved.iter().map(|r| r.talk.id).collect();
        assert_eq!(kept, vec![1, 3]);

        for (h, m) in [(9, 0), (10, 35), (11, 10), (12, 0)] {
            assert_eq!(
                board_at(&resolved, local(h, m)),
                produce_board(&talks, local(h, m), &calendar())
            );
        }
    }

    #[test]
    fn recomputation_is_idempotent() {
        let talks = crate::models::default_talks().unwrap();
        let now = Utc.with_ymd_and_hms(2025, 11, 22, 10, 5, 0).unwrap();
        assert_eq!(
            produce_board(&talks, now, &calendar()),
            produce_board(&talks, now, &calendar())
        );
    }
}
