//! Input validation for timetable requests.
//!
//! Checks structural integrity of catalog sections and the course
//! selection before generation. Detects:
//! - Duplicate section IDs
//! - Sections without any meeting
//! - Sections whose own meetings overlap
//! - Selected courses unknown to the catalog
//!
//! Validation never blocks generation: the engine logs what it finds and
//! lets the filter evaluator deal with the consequences (an unknown course
//! becomes an excluded course).

use crate::models::Section;
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two sections share the same ID.
    DuplicateId,
    /// A section has no time slots.
    EmptySchedule,
    /// Two meetings of the same section overlap.
    SelfOverlap,
    /// A selected course has no section in the catalog.
    UnknownCourse,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validates catalog sections against a course selection.
///
/// Checks:
/// 1. No duplicate section IDs
/// 2. Every section meets at least once
/// 3. No section overlaps itself
/// 4. Every selected course appears in the catalog
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input<S: AsRef<str>>(sections: &[Section], selected: &[S]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut section_ids = HashSet::new();
    let mut course_codes = HashSet::new();
    for s in sections {
        course_codes.insert(s.course_code.as_str());

        if !section_ids.insert(s.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate section ID: {}", s.id),
            ));
        }

        if s.time_slots.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptySchedule,
                format!("Section '{}' has no meetings", s.id),
            ));
        }

        if let Some((a, b)) = self_overlap(s) {
            errors.push(ValidationError::new(
                ValidationErrorKind::SelfOverlap,
                format!("Section '{}' overlaps itself: {a} and {b}", s.id),
            ));
        }
    }

    for code in selected {
        let code = code.as_ref();
        if !course_codes.contains(code) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownCourse,
                format!("Selected course '{code}' is not in the catalog"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn self_overlap(section: &Section) -> Option<(String, String)> {
    let slots = &section.time_slots;
    for (i, a) in slots.iter().enumerate() {
        if let Some(b) = slots[i + 1..].iter().find(|b| a.overlaps(b)) {
            return Some((a.to_string(), b.to_string()));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Day, TimeSlot};

    fn sample_sections() -> Vec<Section> {
        vec![
            Section::new("CS101 G1", "CS101")
                .with_slot(TimeSlot::at(Day::Mon, 8, 10).unwrap())
                .with_slot(TimeSlot::at(Day::Wed, 8, 10).unwrap()),
            Section::new("MTH1 A", "MTH1").with_slot(TimeSlot::at(Day::Tue, 9, 11).unwrap()),
        ]
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_input(&sample_sections(), &["CS101", "MTH1"]).is_ok());
    }

    #[test]
    fn test_duplicate_section_id() {
        let mut sections = sample_sections();
        sections.push(
            Section::new("CS101 G1", "CS101").with_slot(TimeSlot::at(Day::Fri, 8, 9).unwrap()),
        );

        let errors = validate_input(&sections, &["CS101"]).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId));
    }

    #[test]
    fn test_empty_schedule() {
        let sections = vec![Section::new("X1", "X")];
        let errors = validate_input(&sections, &["X"]).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::EmptySchedule);
    }

    #[test]
    fn test_self_overlap() {
        let sections = vec![Section::new("X1", "X")
            .with_slot(TimeSlot::at(Day::Mon, 8, 10).unwrap())
            .with_slot(TimeSlot::at(Day::Mon, 9, 11).unwrap())];

        let errors = validate_input(&sections, &["X"]).unwrap_err();
        assert!(errors.iter().any(|e| {
            e.kind == ValidationErrorKind::SelfOverlap && e.message.contains("Mon 08:00")
        }));
    }

    #[test]
    fn test_unknown_course() {
        let errors = validate_input(&sample_sections(), &["PHY9"]).unwrap_err();
        assert!(errors.iter().any(|e| {
            e.kind == ValidationErrorKind::UnknownCourse && e.to_string().contains("PHY9")
        }));
    }

    #[test]
    fn test_multiple_errors() {
        let sections = vec![Section::new("X1", "X"), Section::new("X1", "X")];
        let errors = validate_input(&sections, &["Y"]).unwrap_err();
        // two empty schedules + duplicate + unknown course
        assert_eq!(errors.len(), 4);
    }
}
