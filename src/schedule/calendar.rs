use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;

const ENABLE_LOGS: bool = true;

use crate::log_warn;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeParseError {
    #[error("'{0}' is not a 12-hour time like 9am or 10:45pm")]
    Malformed(String),
    #[error("'{input}' normalises to {hour:02}:{minute:02}, which is not a time of day")]
    InvalidClock { input: String, hour: u32, minute: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

/// A 12-hour wall-clock reading, not yet bound to any date or zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallClock {
    hour: u32,
    minute: u32,
    meridiem: Meridiem,
    /// Hour was written 24-hour style (e.g. `13:05pm`) and got folded back.
    normalised: bool,
}

impl WallClock {
    /// Accepts `H` or `H:MM`, optional whitespace, then `am`/`pm` in any case.
    pub fn parse(input: &str) -> Result<Self, TimeParseError> {
        let malformed = || TimeParseError::Malformed(input.to_string());
        let trimmed = input.trim();

        if trimmed.len() < 2 || !trimmed.is_char_boundary(trimmed.len() - 2) {
            return Err(malformed());
        }
        let (clock, suffix) = trimmed.split_at(trimmed.len() - 2);
        let meridiem = if suffix.eq_ignore_ascii_case("am") {
            Meridiem::Am
        } else if suffix.eq_ignore_ascii_case("pm") {
            Meridiem::Pm
        } else {
            return Err(malformed());
        };

        let clock = clock.trim_end();
        let (hour_raw, minute_raw) = match clock.split_once(':') {
            Some((hour, minute)) => (hour, Some(minute)),
            None => (clock, None),
        };

        if !(1..=2).contains(&hour_raw.len()) || !hour_raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let mut hour: u32 = hour_raw.parse().map_err(|_| malformed())?;

        let minute = match minute_raw {
            Some(raw) if raw.len() == 2 && raw.bytes().all(|b| b.is_ascii_digit()) => {
                raw.parse().map_err(|_| malformed())?
            }
            Some(_) => return Err(malformed()),
            None => 0,
        };

        let normalised = hour > 12;
        if normalised {
            hour -= 12;
        }

        let clock = Self {
            hour,
            minute,
            meridiem,
            normalised,
        };

        let (hour24, minute) = clock.to_24h();
        if hour24 > 23 || minute > 59 {
            return Err(TimeParseError::InvalidClock {
                input: input.to_string(),
                hour: hour24,
                minute,
            });
        }

        Ok(clock)
    }

    fn to_24h(self) -> (u32, u32) {
        let hour = match (self.meridiem, self.hour) {
            (Meridiem::Pm, h) if h != 12 => h + 12,
            (Meridiem::Am, 12) => 0,
            (_, h) => h,
        };
        (hour, self.minute)
    }

    pub fn is_normalised(&self) -> bool {
        self.normalised
    }

    pub fn to_naive_time(self) -> Option<NaiveTime> {
        let (hour, minute) = self.to_24h();
        NaiveTime::from_hms_opt(hour, minute, 0)
    }
}

/// The single date and zone every talk time is interpreted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventCalendar {
    pub date: NaiveDate,
    pub timezone: Tz,
}

impl EventCalendar {
    pub fn new(date: NaiveDate, timezone: Tz) -> Self {
        Self { date, timezone }
    }

    /// Build from the settings strings, e.g. `"2025-11-22"` and `"Europe/London"`.
    pub fn from_settings(date: &str, timezone: &str) -> Result<Self> {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .with_context(|| format!("event date '{date}' is not YYYY-MM-DD"))?;
        let timezone = timezone
            .parse::<Tz>()
            .map_err(|err| anyhow!("unknown timezone '{timezone}': {err}"))?;
        Ok(Self::new(date, timezone))
    }

    /// Bind a naive wall time to the event date using the zone's offset
    /// rules on that date, independent of the host's local zone.
    pub fn bind(&self, time: NaiveTime) -> DateTime<Utc> {
        let local = self.date.and_time(time);
        match self.timezone.from_local_datetime(&local) {
            LocalResult::Single(instant) => instant.with_timezone(&Utc),
            LocalResult::Ambiguous(earliest, latest) => {
                let shifted = self.shift_by_offset_at_utc(local);
                let (earliest, latest) = (earliest.with_timezone(&Utc), latest.with_timezone(&Utc));
                if shifted == latest {
                    latest
                } else {
                    earliest
                }
            }
            LocalResult::None => self.shift_by_offset_at_utc(local),
        }
    }

    // Folds and gaps both take the offset in effect at the naive-as-UTC instant.
    fn shift_by_offset_at_utc(&self, local: NaiveDateTime) -> DateTime<Utc> {
        let offset = self
            .timezone
            .offset_from_utc_datetime(&local)
            .fix()
            .local_minus_utc();
        Utc.from_utc_datetime(&(local - chrono::Duration::seconds(i64::from(offset))))
    }

    /// Parse a 12-hour string and bind it to the event date.
    pub fn resolve(&self, time_str: &str) -> Result<DateTime<Utc>, TimeParseError> {
        let clock = WallClock::parse(time_str)?;
        if clock.is_normalised() {
            log_warn!(
                "time '{}' uses a 24-hour hour with an am/pm suffix; treating it as 12-hour",
                time_str.trim()
            );
        }

        let time = clock.to_naive_time().ok_or_else(|| {
            let (hour, minute) = clock.to_24h();
            TimeParseError::InvalidClock {
                input: time_str.to_string(),
                hour,
                minute,
            }
        })?;

        Ok(self.bind(time))
    }
}

/// Free-function form of [`EventCalendar::resolve`].
pub fn parse_wall_clock_time(
    time_str: &str,
    event_date: NaiveDate,
    timezone: Tz,
) -> Result<DateTime<Utc>, TimeParseError> {
    EventCalendar::new(event_date, timezone).resolve(time_str)
}
