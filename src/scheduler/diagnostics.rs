//! Sampled conflict diagnostics.
//!
//! Runs only after the search found nothing, to collect concrete evidence
//! of which sections clash.
//!
//! # Algorithm
//!
//! 1. Compute the product of group sizes.
//! 2. If it exceeds the threshold, keep a prefix of `K` sections per group,
//!    with `K` stepping down from 8 until the product fits or `K` reaches the
//!    floor (3 by default).
//! 3. Enumerate combinations in order, up to the sample limit.
//! 4. For each combination with overlaps, append all of its pairwise records
//!    unless the accumulator already holds `conflict_cap` records.
//!
//! The cap is checked once per combination, so the last batch may push the
//! total a little past it.

use super::combinations::{
    enumerate_limited, pairwise_conflicts, prefix_groups, sizes, total_combinations,
};
use crate::config::DiagnosticsLimits;
use crate::models::{ConflictRecord, CourseGroup};

/// Evidence gathered from the sampled combinations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticsReport {
    /// Pairwise overlaps, in discovery order.
    pub conflicts: Vec<ConflictRecord>,
    /// Combinations examined.
    pub sampled: usize,
    /// Sampled combinations without any overlap.
    pub conflict_free_sampled: usize,
    /// Prefix length applied per group, if truncation happened.
    pub sections_per_course: Option<usize>,
}

impl DiagnosticsReport {
    /// Whether any overlap was found.
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}

/// Collects conflict evidence for an infeasible request.
#[derive(Debug, Clone, Default)]
pub struct ConflictDiagnostics {
    limits: DiagnosticsLimits,
}

impl ConflictDiagnostics {
    /// Creates diagnostics with the given limits.
    pub fn new(limits: DiagnosticsLimits) -> Self {
        Self { limits }
    }

    /// Chooses the prefix length that brings the product under the threshold.
    ///
    /// Returns `None` when no truncation is needed.
    pub fn sample_width(&self, groups: &[CourseGroup]) -> Option<usize> {
        let total = total_combinations(groups.iter().map(CourseGroup::len));
        if total <= self.limits.combination_threshold {
            return None;
        }

        let floor = self.limits.min_sections_per_course;
        let mut k = self.limits.initial_sections_per_course.max(floor);
        loop {
            let t = total_combinations(groups.iter().map(|g| g.len().min(k)));
            if t <= self.limits.combination_threshold || k <= floor {
                return Some(k);
            }
            k -= 1;
        }
    }

    /// Samples combinations and records their overlaps.
    pub fn diagnose(&self, groups: &[CourseGroup]) -> DiagnosticsReport {
        let width = self.sample_width(groups);
        let borrowed = prefix_groups(groups, width);
        let combos = enumerate_limited(&borrowed, self.limits.sample_limit);

        let mut report = DiagnosticsReport {
            sampled: combos.len(),
            sections_per_course: width,
            ..DiagnosticsReport::default()
        };

        for combo in &combos {
            let records = pairwise_conflicts(combo);
            if records.is_empty() {
                report.conflict_free_sampled += 1;
            } else if report.conflicts.len() < self.limits.conflict_cap {
                report.conflicts.extend(records);
            }
        }

        log::debug!(
            "diagnostics sampled {} of {} combination(s) (width {:?}), {} conflict record(s)",
            report.sampled,
            total_combinations(sizes(&borrowed)),
            width,
            report.conflicts.len()
        );
        report
    }
}
