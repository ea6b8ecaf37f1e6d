//! Bounded cartesian products over course groups.
//!
//! Used by diagnostics and partial resolution, which look at a
//! deterministic prefix of the combination space rather than the whole of
//! it. Enumeration order is lexicographic in (course index, section index),
//! the same order the backtracking search walks.

use crate::models::{ConflictRecord, CourseGroup, Section};

/// Product of group sizes, saturating at `u64::MAX`.
pub fn total_combinations<I>(sizes: I) -> u64
where
    I: IntoIterator<Item = usize>,
{
    sizes
        .into_iter()
        .fold(1u64, |acc, n| acc.saturating_mul(n as u64))
}

/// Borrows every group's sections, keeping at most `per_course` of each.
pub fn prefix_groups(groups: &[CourseGroup], per_course: Option<usize>) -> Vec<Vec<&Section>> {
    groups
        .iter()
        .map(|g| {
            let take = per_course.unwrap_or(g.sections.len());
            g.sections.iter().take(take).collect()
        })
        .collect()
}

/// Sizes of borrowed groups.
pub fn sizes<T>(groups: &[Vec<T>]) -> Vec<usize> {
    groups.iter().map(Vec::len).collect()
}

/// Enumerates combinations, stopping once `limit` have been produced.
///
/// With no groups the single empty combination is returned.
pub fn enumerate_limited<'a>(groups: &[Vec<&'a Section>], limit: usize) -> Vec<Vec<&'a Section>> {
    let mut out = Vec::new();
    if limit == 0 {
        return out;
    }
    let mut current = Vec::with_capacity(groups.len());
    enumerate_rec(groups, 0, &mut current, limit, &mut out);
    out
}

fn enumerate_rec<'a>(
    groups: &[Vec<&'a Section>],
    index: usize,
    current: &mut Vec<&'a Section>,
    limit: usize,
    out: &mut Vec<Vec<&'a Section>>,
) {
    if out.len() >= limit {
        return;
    }
    if index == groups.len() {
        out.push(current.clone());
        return;
    }
    for &section in &groups[index] {
        if out.len() >= limit {
            return;
        }
        current.push(section);
        enumerate_rec(groups, index + 1, current, limit, out);
        current.pop();
    }
}

/// Whether any two sections of a combination overlap.
pub fn has_conflict(combo: &[&Section]) -> bool {
    combo
        .iter()
        .enumerate()
        .any(|(i, a)| combo[i + 1..].iter().any(|b| a.conflicts_with(b)))
}

/// One record per overlapping pair, in pair order `(i, j)` with `i < j`.
pub fn pairwise_conflicts(combo: &[&Section]) -> Vec<ConflictRecord> {
    let mut records = Vec::new();
    for (i, a) in combo.iter().enumerate() {
        for b in &combo[i + 1..] {
            if let Some(rec) = ConflictRecord::between(a, b) {
                records.push(rec);
            }
        }
    }
    records
}
