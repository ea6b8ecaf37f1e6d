//! Course section model.
//!
//! A section is one offered instance of a course with a fixed weekly
//! meeting pattern. Sections come from the Catalog Provider and are never
//! mutated by the engine.

use serde::{Deserialize, Serialize};

use super::TimeSlot;

/// Enrollment status reported by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SectionStatus {
    /// Seats available.
    Open,
    /// Full or otherwise not enrollable.
    Closed,
    /// The student already holds a seat.
    Enrolled,
    /// Anything the catalog reports that is not recognised.
    Unknown,
}

impl SectionStatus {
    /// Lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionStatus::Open => "open",
            SectionStatus::Closed => "closed",
            SectionStatus::Enrolled => "enrolled",
            SectionStatus::Unknown => "unknown",
        }
    }
}

impl From<String> for SectionStatus {
    fn from(text: String) -> Self {
        match text.trim().to_ascii_lowercase().as_str() {
            "open" => SectionStatus::Open,
            "close" | "closed" => SectionStatus::Closed,
            "enrolled" => SectionStatus::Enrolled,
            _ => SectionStatus::Unknown,
        }
    }
}

impl From<SectionStatus> for String {
    fn from(status: SectionStatus) -> Self {
        status.as_str().to_string()
    }
}

/// An offered section of a course.
///
/// Field names on the wire follow the scraped record
/// (`sectionId`, `courseCode`, `courseName`, `status`, `schedule`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Unique section identifier (e.g. `"CS101 G20"`).
    #[serde(rename = "sectionId", alias = "id")]
    pub id: String,
    /// Owning course code.
    pub course_code: String,
    /// Human-readable course name.
    #[serde(default)]
    pub course_name: String,
    /// Enrollment status.
    #[serde(default = "default_status")]
    pub status: SectionStatus,
    /// Weekly meetings, in catalog order.
    #[serde(rename = "schedule", default)]
    pub time_slots: Vec<TimeSlot>,
}

fn default_status() -> SectionStatus {
    SectionStatus::Unknown
}

impl Section {
    /// Creates an open section with no meetings.
    pub fn new(id: impl Into<String>, course_code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            course_code: course_code.into(),
            course_name: String::new(),
            status: SectionStatus::Open,
            time_slots: Vec::new(),
        }
    }

    /// Sets the course name.
    pub fn with_course_name(mut self, name: impl Into<String>) -> Self {
        self.course_name = name.into();
        self
    }

    /// Sets the enrollment status.
    pub fn with_status(mut self, status: SectionStatus) -> Self {
        self.status = status;
        self
    }

    /// Adds a weekly meeting.
    pub fn with_slot(mut self, slot: TimeSlot) -> Self {
        self.time_slots.push(slot);
        self
    }

    /// Whether the section is open for enrollment.
    pub fn is_open(&self) -> bool {
        self.status == SectionStatus::Open
    }

    /// Last whitespace-separated token of the id (`"CS101 G20"` → `"G20"`).
    pub fn short_id(&self) -> &str {
        self.id.split_whitespace().last().unwrap_or(&self.id)
    }

    /// Course name, falling back to the code when the catalog has none.
    pub fn display_name(&self) -> &str {
        if self.course_name.is_empty() {
            &self.course_code
        } else {
            &self.course_name
        }
    }

    /// First overlapping slot pair `(mine, theirs)`, scanning in slot order.
    pub fn first_clash(&self, other: &Section) -> Option<(TimeSlot, TimeSlot)> {
        self.time_slots.iter().find_map(|a| {
            other
                .time_slots
                .iter()
                .find(|b| a.overlaps(b))
                .map(|b| (*a, *b))
        })
    }

    /// Whether any meeting of `self` overlaps any meeting of `other`.
    ///
    /// O(|slots| x |slots|); sections rarely meet more than three times a week.
    pub fn conflicts_with(&self, other: &Section) -> bool {
        self.time_slots
            .iter()
            .any(|a| other.time_slots.iter().any(|b| a.overlaps(b)))
    }
}
