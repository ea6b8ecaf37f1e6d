//! Filter evaluator: per-course candidate pruning.
//!
//! A section is kept only if **every** meeting satisfies the filter. One
//! out-of-window meeting excludes the whole section; sections are never
//! split.

use serde::{Deserialize, Serialize};

use crate::catalog::course_name_in;
use crate::models::{CourseGroup, FilterConfig, Section};

/// Whether every meeting of `section` lies on an allowed day inside the
/// daily window.
pub fn fits(section: &Section, filter: &FilterConfig) -> bool {
    section.time_slots.iter().all(|slot| {
        filter.allowed_days.contains(&slot.day)
            && slot.start >= filter.start_bound
            && slot.end <= filter.end_bound
    })
}

/// Whether a section may take part in generation: open (unless the filter
/// admits closed sections) and fitting the day/time window.
pub fn is_eligible(section: &Section, filter: &FilterConfig) -> bool {
    (filter.include_closed || section.is_open()) && fits(section, filter)
}

/// Why a selected course cannot take part in generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExclusionReason {
    /// The catalog has no section of this course.
    NotInCatalog,
    /// Every section is closed, enrolled or of unknown status.
    NoOpenSection,
    /// Open sections exist but none fits the day/time filter.
    NoSectionFitsFilter,
}

/// A selected course with no eligible section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedCourse {
    /// Course code.
    pub code: String,
    /// Course name, or the code when the catalog has none.
    pub name: String,
    /// Cause.
    pub reason: ExclusionReason,
}

/// Output of the filter evaluator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseGrouping {
    /// One group per selected course that kept at least one section, in
    /// selection order.
    pub groups: Vec<CourseGroup>,
    /// Selected courses left with nothing, in selection order.
    pub excluded: Vec<ExcludedCourse>,
}

/// Builds course groups from catalog sections.
#[derive(Debug, Clone)]
pub struct FilterEvaluator<'f> {
    filter: &'f FilterConfig,
}

impl<'f> FilterEvaluator<'f> {
    /// Creates an evaluator for a filter.
    pub fn new(filter: &'f FilterConfig) -> Self {
        Self { filter }
    }

    /// Groups the eligible sections of each selected course.
    ///
    /// Course order follows `selected`; section order within a group follows
    /// the catalog. Both orders are tie-breaks downstream and are preserved.
    pub fn group<S: AsRef<str>>(&self, sections: &[Section], selected: &[S]) -> CourseGrouping {
        let mut grouping = CourseGrouping::default();

        for code in selected {
            let code = code.as_ref();
            let name = course_name_in(sections, code).unwrap_or(code);
            let mut group = CourseGroup::new(code, name);
            let mut seen_any = false;
            let mut seen_status_ok = false;

            for section in sections.iter().filter(|s| s.course_code == code) {
                seen_any = true;
                if self.filter.include_closed || section.is_open() {
                    seen_status_ok = true;
                    if fits(section, self.filter) {
                        group.sections.push(section.clone());
                    }
                }
            }

            if group.is_empty() {
                let reason = if !seen_any {
                    ExclusionReason::NotInCatalog
                } else if !seen_status_ok {
                    ExclusionReason::NoOpenSection
                } else {
                    ExclusionReason::NoSectionFitsFilter
                };
                grouping.excluded.push(ExcludedCourse {
                    code: code.to_string(),
                    name: name.to_string(),
                    reason,
                });
            } else {
                grouping.groups.push(group);
            }
        }

        log::debug!(
            "filter kept {} course group(s), excluded {}",
            grouping.groups.len(),
            grouping.excluded.len()
        );
        grouping
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Day, SectionStatus, TimeSlot};

    fn at(day: Day, start: u16, end: u16) -> TimeSlot {
        TimeSlot::at(day, start, end).unwrap()
    }

    #[test]
    fn test_fits_all_or_nothing() {
        let filter = FilterConfig::new()
            .with_days([Day::Mon, Day::Wed])
            .with_window(8 * 60, 14 * 60);

        let inside = Section::new("A", "X")
            .with_slot(at(Day::Mon, 8, 10))
            .with_slot(at(Day::Wed, 12, 14));
        assert!(fits(&inside, &filter));

        let wrong_day = Section::new("B", "X")
            .with_slot(at(Day::Mon, 8, 10))
            .with_slot(at(Day::Tue, 8, 10));
        assert!(!fits(&wrong_day, &filter));

        let too_late = Section::new("C", "X")
            .with_slot(at(Day::Mon, 8, 10))
            .with_slot(at(Day::Wed, 13, 15));
        assert!(!fits(&too_late, &filter));

        let too_early = Section::new("D", "X").with_slot(at(Day::Mon, 7, 9));
        assert!(!fits(&too_early, &filter));
    }

    #[test]
    fn test_eligibility_respects_status() {
        let filter = FilterConfig::new();
        let closed = Section::new("A", "X")
            .with_status(SectionStatus::Closed)
            .with_slot(at(Day::Mon, 8, 10));
        assert!(!is_eligible(&closed, &filter));
        assert!(is_eligible(&closed, &filter.clone().with_closed_sections(true)));
    }

    #[test]
    fn test_group_preserves_orders() {
        let sections = vec![
            Section::new("B2", "B").with_slot(at(Day::Tue, 9, 10)),
            Section::new("A1", "A").with_slot(at(Day::Mon, 9, 10)),
            Section::new("B1", "B").with_slot(at(Day::Tue, 8, 9)),
            Section::new("A2", "A").with_slot(at(Day::Mon, 10, 11)),
        ];
        let filter = FilterConfig::new();
        let grouping = FilterEvaluator::new(&filter).group(&sections, &["B", "A"]);

        assert!(grouping.excluded.is_empty());
        let codes: Vec<&str> = grouping.groups.iter().map(|g| g.course_code.as_str()).collect();
        assert_eq!(codes, vec!["B", "A"]);
        let b_ids: Vec<&str> = grouping.groups[0].sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(b_ids, vec!["B2", "B1"]);
    }

    #[test]
    fn test_group_exclusion_reasons() {
        let sections = vec![
            Section::new("C1", "C")
                .with_course_name("Chemistry")
                .with_status(SectionStatus::Closed)
                .with_slot(at(Day::Mon, 9, 10)),
            Section::new("D1", "D").with_slot(at(Day::Fri, 16, 19)),
            Section::new("E1", "E").with_slot(at(Day::Mon, 9, 10)),
        ];
        let filter = FilterConfig::new().with_window(8 * 60, 17 * 60);
        let grouping = FilterEvaluator::new(&filter).group(&sections, &["C", "D", "E", "Z"]);

        assert_eq!(grouping.groups.len(), 1);
        assert_eq!(grouping.groups[0].course_code, "E");

        let reasons: Vec<(&str, ExclusionReason)> = grouping
            .excluded
            .iter()
            .map(|e| (e.code.as_str(), e.reason))
            .collect();
        assert_eq!(
            reasons,
            vec![
                ("C", ExclusionReason::NoOpenSection),
                ("D", ExclusionReason::NoSectionFitsFilter),
                ("Z", ExclusionReason::NotInCatalog),
            ]
        );
        assert_eq!(grouping.excluded[0].name, "Chemistry");
        assert_eq!(grouping.excluded[2].name, "Z");
    }
}
