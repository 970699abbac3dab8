use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Urgency classification driving badge styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Tier {
    Upcoming,
    Medium,
    High,
    MostUrgent,
    InProgress,
}

impl Tier {
    fn tokens(self) -> (&'static str, &'static str, Option<&'static str>) {
        match self {
            Tier::InProgress => ("bg-emerald-100", "text-emerald-800", Some("emerald")),
            Tier::Upcoming => ("bg-gray-200", "text-[#7000FF]", None),
            Tier::Medium => ("bg-amber-100", "text-amber-800", None),
            Tier::High => ("bg-orange-100", "text-orange-800", None),
            Tier::MostUrgent => ("bg-red-100", "text-red-800", None),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
    pub label: String,
    pub bg: &'static str,
    pub text: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent: Option<&'static str>,
    pub tier: Tier,
}

impl StatusBadge {
    fn new(label: impl Into<String>, tier: Tier) -> Self {
        let (bg, text, accent) = tier.tokens();
        Self {
            label: label.into(),
            bg,
            text,
            accent,
            tier,
        }
    }

    pub fn is_in_progress(&self) -> bool {
        self.tier == Tier::InProgress
    }
}

/// Whole minutes until `start`, rounding a positive sub-minute remainder up
/// to 1 so a countdown never reads zero before the talk begins.
fn minutes_until(now: DateTime<Utc>, start: DateTime<Utc>) -> i64 {
    let gap = start - now;
    let minutes = gap.num_minutes();
    if minutes == 0 && gap > Duration::zero() {
        1
    } else {
        minutes.max(0)
    }
}

fn countdown_label(minutes: i64) -> String {
    let unit = if minutes == 1 { "minute" } else { "minutes" };
    format!("Starting in {minutes} {unit}")
}

/// Badge for a talk at `now`, or `None` once the talk has ended.
///
/// The end bound is inclusive: at exactly `end` the talk is still in progress.
pub fn compute_status(
    now: DateTime<Utc>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Option<StatusBadge> {
    if now > end {
        return None;
    }

    if start <= now {
        return Some(StatusBadge::new("In progress", Tier::InProgress));
    }

    let badge = match minutes_until(now, start) {
        m if m > 60 => StatusBadge::new("Upcoming", Tier::Upcoming),
        60 => StatusBadge::new("Starting in 1hr", Tier::Medium),
        m @ 31..=59 => StatusBadge::new(countdown_label(m), Tier::Medium),
        m @ 16..=30 => StatusBadge::new(countdown_label(m), Tier::High),
        m @ 1..=15 => StatusBadge::new(countdown_label(m), Tier::MostUrgent),
        _ => StatusBadge::new("Upcoming", Tier::Upcoming),
    };

    Some(badge)
}
