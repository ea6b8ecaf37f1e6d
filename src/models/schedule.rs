//! Schedule (solution) models.
//!
//! A [`ScheduleCandidate`] picks at most one section per course. A
//! [`ConflictRecord`] is one pairwise overlap found while diagnosing an
//! infeasible request, and a [`RankedSchedule`] is a candidate with its
//! derived metrics.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{Day, Section, TimeSlot};

/// Eligible sections of one selected course, in catalog order.
///
/// Invariant: `sections` is non-empty once built by the filter evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseGroup {
    /// Course code.
    pub course_code: String,
    /// Course name (may be empty).
    pub course_name: String,
    /// Eligible sections.
    pub sections: Vec<Section>,
}

impl CourseGroup {
    /// Creates an empty group.
    pub fn new(course_code: impl Into<String>, course_name: impl Into<String>) -> Self {
        Self {
            course_code: course_code.into(),
            course_name: course_name.into(),
            sections: Vec::new(),
        }
    }

    /// Adds a section.
    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Number of eligible sections.
    #[inline]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the group has no sections.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// A selection of sections, at most one per course.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleCandidate {
    /// Chosen sections, in course order.
    pub sections: Vec<Section>,
}

impl ScheduleCandidate {
    /// Creates a candidate from chosen sections.
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    /// Clones a borrowed combination into an owned candidate.
    pub fn from_refs(sections: &[&Section]) -> Self {
        Self {
            sections: sections.iter().map(|s| (*s).clone()).collect(),
        }
    }

    /// Number of chosen sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether nothing was chosen.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// All meetings of all chosen sections.
    pub fn slots(&self) -> impl Iterator<Item = &TimeSlot> {
        self.sections.iter().flat_map(|s| s.time_slots.iter())
    }

    /// Distinct days with at least one meeting.
    pub fn days(&self) -> BTreeSet<Day> {
        self.slots().map(|s| s.day).collect()
    }

    /// Course codes in selection order.
    pub fn course_codes(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.course_code.as_str()).collect()
    }

    /// Whether any two chosen sections overlap.
    pub fn has_conflict(&self) -> bool {
        self.sections.iter().enumerate().any(|(i, a)| {
            self.sections[i + 1..]
                .iter()
                .any(|b| a.conflicts_with(b))
        })
    }
}

/// One pairwise overlap between two sections of different courses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictRecord {
    /// First course code.
    pub course_a: String,
    /// First section id.
    pub section_a: String,
    /// Second course code.
    pub course_b: String,
    /// Second section id.
    pub section_b: String,
    /// Day of the clash.
    pub day: Day,
    /// Meeting of the first section.
    pub time_a: TimeSlot,
    /// Meeting of the second section.
    pub time_b: TimeSlot,
}

impl ConflictRecord {
    /// Builds the record for the first clash between two sections, if any.
    pub fn between(a: &Section, b: &Section) -> Option<Self> {
        a.first_clash(b).map(|(time_a, time_b)| Self {
            course_a: a.course_code.clone(),
            section_a: a.id.clone(),
            course_b: b.course_code.clone(),
            section_b: b.id.clone(),
            day: time_a.day,
            time_a,
            time_b,
        })
    }

    /// Whether either side belongs to `course`.
    pub fn involves(&self, course: &str) -> bool {
        self.course_a == course || self.course_b == course
    }

    /// The course on the other side of `course`, if `course` is involved.
    pub fn counterpart(&self, course: &str) -> Option<&str> {
        if self.course_a == course {
            Some(&self.course_b)
        } else if self.course_b == course {
            Some(&self.course_a)
        } else {
            None
        }
    }

    /// Identity used to deduplicate reports: both courses and both sections.
    pub fn identity(&self) -> (&str, &str, &str, &str) {
        (
            &self.course_a,
            &self.section_a,
            &self.course_b,
            &self.section_b,
        )
    }
}

/// A candidate with its ranking metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedSchedule {
    /// The schedule.
    pub candidate: ScheduleCandidate,
    /// Distinct days on campus.
    pub days_used: u32,
    /// Total idle hours between classes.
    pub total_gap_hours: u32,
    /// Weighted score (higher is better).
    pub score: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(id: &str, course: &str, day: Day, start: u16, end: u16) -> Section {
        Section::new(id, course).with_slot(TimeSlot::at(day, start, end).unwrap())
    }

    #[test]
    fn test_conflict_record_between() {
        let a = section("A1", "ALG", Day::Mon, 8, 10);
        let b = section("B1", "BIO", Day::Mon, 9, 11);

        let rec = ConflictRecord::between(&a, &b).unwrap();
        assert_eq!(rec.course_a, "ALG");
        assert_eq!(rec.section_b, "B1");
        assert_eq!(rec.day, Day::Mon);
        assert_eq!(rec.time_a.range_label(), "08:00 - 10:00");
        assert_eq!(rec.time_b.range_label(), "09:00 - 11:00");
        assert!(rec.involves("BIO"));
        assert_eq!(rec.counterpart("ALG"), Some("BIO"));
        assert_eq!(rec.counterpart("CHEM"), None);

        let c = section("C1", "CHEM", Day::Tue, 9, 11);
        assert!(ConflictRecord::between(&a, &c).is_none());
    }

    #[test]
    fn test_candidate_days_and_conflict() {
        let ok = ScheduleCandidate::new(vec![
            section("A1", "ALG", Day::Mon, 8, 10),
            section("B1", "BIO", Day::Wed, 8, 10),
        ]);
        assert_eq!(ok.days().len(), 2);
        assert!(!ok.has_conflict());
        assert_eq!(ok.course_codes(), vec!["ALG", "BIO"]);

        let bad = ScheduleCandidate::new(vec![
            section("A1", "ALG", Day::Mon, 8, 10),
            section("B1", "BIO", Day::Wed, 8, 10),
            section("C1", "CHEM", Day::Wed, 9, 10),
        ]);
        assert!(bad.has_conflict());
    }

    #[test]
    fn test_course_group() {
        let g = CourseGroup::new("ALG", "Algebra")
            .with_section(section("A1", "ALG", Day::Mon, 8, 10));
        assert_eq!(g.len(), 1);
        assert!(!g.is_empty());
        assert!(CourseGroup::new("X", "").is_empty());
    }
}
