//! Weekly time model: days and intra-day time slots.
//!
//! # Time Model
//! Times are minutes since midnight (`0..=1440`). There is no calendar date:
//! a slot repeats every week on its day.
//!
//! # Wire Format
//! The Catalog Provider encodes a slot as `{ "day": "Mon", "time": "08:00 - 10:00" }`.
//! [`TimeSlot`] serializes to and from exactly that shape.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Minutes in a day; the largest valid slot end.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// A teaching day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Day {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
}

impl Day {
    /// All days in week order.
    pub const ALL: [Day; 5] = [Day::Mon, Day::Tue, Day::Wed, Day::Thu, Day::Fri];

    /// Short English name (`"Mon"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Day::Mon => "Mon",
            Day::Tue => "Tue",
            Day::Wed => "Wed",
            Day::Thu => "Thu",
            Day::Fri => "Fri",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Day {
    type Err = ModelError;

    /// Accepts short or long names, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mon" | "monday" => Ok(Day::Mon),
            "tue" | "tues" | "tuesday" => Ok(Day::Tue),
            "wed" | "wednesday" => Ok(Day::Wed),
            "thu" | "thur" | "thurs" | "thursday" => Ok(Day::Thu),
            "fri" | "friday" => Ok(Day::Fri),
            _ => Err(ModelError::UnknownDay(s.to_string())),
        }
    }
}

/// Parses `HH:MM` into minutes-of-day. `24:00` is accepted as end of day.
pub fn parse_clock(text: &str) -> Result<u16, ModelError> {
    let invalid = || ModelError::InvalidClock(text.to_string());
    let (h, m) = text.trim().split_once(':').ok_or_else(invalid)?;
    let hours: u32 = h.trim().parse().map_err(|_| invalid())?;
    let minutes: u32 = m.trim().parse().map_err(|_| invalid())?;
    if hours > 24 || minutes >= 60 {
        return Err(invalid());
    }
    let total = hours * 60 + minutes;
    if total > u32::from(MINUTES_PER_DAY) {
        return Err(invalid());
    }
    Ok(total as u16)
}

/// Formats minutes-of-day as zero-padded `HH:MM`.
pub fn format_clock(minutes: u16) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// One weekly meeting: `[start, end)` on `day`.
///
/// Invariant: `start < end <= 24:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawSlot", into = "RawSlot")]
pub struct TimeSlot {
    /// Day of the week.
    pub day: Day,
    /// Start (minutes-of-day, inclusive).
    pub start: u16,
    /// End (minutes-of-day, exclusive).
    pub end: u16,
}

impl TimeSlot {
    /// Creates a slot, rejecting empty or inverted ranges.
    pub fn new(day: Day, start: u16, end: u16) -> Result<Self, ModelError> {
        if start >= end || end > MINUTES_PER_DAY {
            return Err(ModelError::InvalidTimeRange { start, end });
        }
        Ok(Self { day, start, end })
    }

    /// Creates a slot from whole hours, e.g. `at(Day::Mon, 8, 10)`.
    pub fn at(day: Day, start_hour: u16, end_hour: u16) -> Result<Self, ModelError> {
        match (start_hour.checked_mul(60), end_hour.checked_mul(60)) {
            (Some(start), Some(end)) => Self::new(day, start, end),
            _ => Err(ModelError::InvalidTimeRange {
                start: start_hour.saturating_mul(60),
                end: end_hour.saturating_mul(60),
            }),
        }
    }

    /// Parses a `"HH:MM - HH:MM"` range on the given day.
    pub fn parse(day: Day, range: &str) -> Result<Self, ModelError> {
        let (start, end) = range
            .split_once('-')
            .ok_or_else(|| ModelError::MalformedRange(range.to_string()))?;
        Self::new(day, parse_clock(start)?, parse_clock(end)?)
    }

    /// Length in minutes.
    #[inline]
    pub fn duration_minutes(&self) -> u16 {
        self.end - self.start
    }

    /// Whether two slots share time on the same day.
    ///
    /// Half-open semantics: touching slots (`a.end == b.start`) do not overlap.
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.day == other.day && self.start < other.end && other.start < self.end
    }

    /// `"08:00 - 10:00"`.
    pub fn range_label(&self) -> String {
        format!("{} - {}", format_clock(self.start), format_clock(self.end))
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.day, self.range_label())
    }
}

/// Wire shape of a slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawSlot {
    day: String,
    time: String,
}

impl TryFrom<RawSlot> for TimeSlot {
    type Error = ModelError;

    fn try_from(raw: RawSlot) -> Result<Self, Self::Error> {
        let day: Day = raw.day.parse()?;
        TimeSlot::parse(day, &raw.time)
    }
}

impl From<TimeSlot> for RawSlot {
    fn from(slot: TimeSlot) -> Self {
        RawSlot {
            day: slot.day.to_string(),
            time: slot.range_label(),
        }
    }
}

/// Serde adapter storing minutes-of-day as `"HH:MM"`.
pub(crate) mod clock_serde {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(minutes: &u16, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_clock(*minutes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u16, D::Error> {
        let text = String::deserialize(deserializer)?;
        super::parse_clock(&text).map_err(serde::de::Error::custom)
    }
}
