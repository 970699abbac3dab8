pub mod board;
pub mod calendar;
pub mod status;

pub use board::{board_at, produce_board, resolve_talks, Board, BoardEntry, ResolvedTalk};
pub use calendar::{parse_wall_clock_time, EventCalendar, TimeParseError, WallClock};
pub use status::{compute_status, StatusBadge, Tier};
