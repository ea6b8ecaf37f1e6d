//! Partial-schedule resolution.
//!
//! When no full schedule exists, drop the course most implicated in the
//! diagnosed conflicts and look for a schedule of the remaining courses.
//!
//! # Algorithm
//!
//! 1. Count, per course, the conflict records naming it on either side.
//! 2. Order courses by descending count (ties keep first-appearance order)
//!    and take at most `max_removal_candidates`.
//! 3. For each candidate: remove its group; if any course remains, enumerate
//!    the reduced set (prefix of `sections_per_course` per group when the
//!    product exceeds the threshold) up to `sample_limit` combinations.
//! 4. The first candidate whose enumeration contains an admissible
//!    combination wins: every admissible combination from that same
//!    enumeration is ranked and the best are returned.

use serde::{Deserialize, Serialize};

use super::combinations::{enumerate_limited, has_conflict, prefix_groups, total_combinations};
use super::kpi::{total_gap_hours, Ranker};
use crate::config::ResolverLimits;
use crate::models::{ConflictRecord, CourseGroup, FilterConfig, RankedSchedule, ScheduleCandidate};

/// A schedule for all but one of the selected courses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialSchedule {
    /// Ranked schedules of the remaining courses.
    pub schedules: Vec<RankedSchedule>,
    /// Code of the dropped course.
    pub removed_course: String,
    /// First diagnosed conflict naming the dropped course.
    pub representative_conflict: ConflictRecord,
}

impl PartialSchedule {
    /// The course the dropped one clashed with in the representative conflict.
    pub fn clashed_with(&self) -> Option<&str> {
        self.representative_conflict.counterpart(&self.removed_course)
    }
}

/// Conflict tally for one course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictTally {
    /// Course code.
    pub course: String,
    /// Records naming the course.
    pub count: usize,
    /// Index of the first record naming the course.
    pub first_record: usize,
}

/// Counts records per course, most conflicted first.
pub fn tally_conflicts(conflicts: &[ConflictRecord]) -> Vec<ConflictTally> {
    let mut tallies: Vec<ConflictTally> = Vec::new();
    for (idx, rec) in conflicts.iter().enumerate() {
        for course in [&rec.course_a, &rec.course_b] {
            match tallies.iter_mut().find(|t| &t.course == course) {
                Some(t) => t.count += 1,
                None => tallies.push(ConflictTally {
                    course: course.clone(),
                    count: 1,
                    first_record: idx,
                }),
            }
        }
    }
    tallies.sort_by(|a, b| b.count.cmp(&a.count));
    tallies
}

/// Drops the most conflicting course and schedules the rest.
#[derive(Debug, Clone, Default)]
pub struct PartialScheduleResolver {
    limits: ResolverLimits,
    ranker: Ranker,
}

impl PartialScheduleResolver {
    /// Creates a resolver.
    pub fn new(limits: ResolverLimits, ranker: Ranker) -> Self {
        Self { limits, ranker }
    }

    /// Tries the top conflict courses for removal, one at a time.
    ///
    /// Returns `None` when no candidate yields an admissible combination.
    pub fn resolve(
        &self,
        groups: &[CourseGroup],
        conflicts: &[ConflictRecord],
        filter: &FilterConfig,
    ) -> Option<PartialSchedule> {
        let tallies = tally_conflicts(conflicts);

        for tally in tallies.iter().take(self.limits.max_removal_candidates) {
            let remaining: Vec<CourseGroup> = groups
                .iter()
                .filter(|g| g.course_code != tally.course)
                .cloned()
                .collect();
            if remaining.is_empty() {
                continue;
            }

            let admissible = self.admissible_combinations(&remaining, filter);
            if admissible.is_empty() {
                log::debug!(
                    "dropping {} ({} conflict record(s)) leaves no admissible schedule",
                    tally.course,
                    tally.count
                );
                continue;
            }

            log::debug!(
                "dropping {} leaves {} admissible schedule(s)",
                tally.course,
                admissible.len()
            );
            return Some(PartialSchedule {
                schedules: self.ranker.rank(admissible, filter),
                removed_course: tally.course.clone(),
                representative_conflict: conflicts[tally.first_record].clone(),
            });
        }

        None
    }

    fn admissible_combinations(
        &self,
        groups: &[CourseGroup],
        filter: &FilterConfig,
    ) -> Vec<ScheduleCandidate> {
        let total = total_combinations(groups.iter().map(CourseGroup::len));
        let width = (total > self.limits.combination_threshold)
            .then_some(self.limits.sections_per_course);
        let borrowed = prefix_groups(groups, width);

        enumerate_limited(&borrowed, self.limits.sample_limit)
            .into_iter()
            .filter(|combo| !has_conflict(combo))
            .filter(|combo| {
                !filter.no_gap_mode()
                    || total_gap_hours(combo.iter().flat_map(|s| s.time_slots.iter())) == 0
            })
            .map(|combo| ScheduleCandidate::from_refs(&combo))
            .collect()
    }
}
