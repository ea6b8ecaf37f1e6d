//! Schedule quality metrics and ranking.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Days used | Distinct days with at least one meeting |
//! | Total gap hours | Sum over days of whole idle hours between consecutive meetings |
//! | Score | Weighted combination of the two, see [`ScheduleMetrics::calculate`] |
//!
//! # Gap Arithmetic
//! Gaps are measured in real minutes and floored to whole hours per pair of
//! consecutive meetings, so a 90-minute break counts as one hour and a
//! 30-minute break as none.
//!
//! # Ranking
//! Sequential comparison: fewer gap hours first, then higher score, then
//! fewer days. Fully tied schedules keep their discovery order.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::config::{RankingConfig, ScoreWeights};
use crate::models::{Day, FilterConfig, RankedSchedule, ScheduleCandidate, TimeSlot};

/// Number of distinct days among the given meetings.
pub fn days_used<'a, I>(slots: I) -> u32
where
    I: IntoIterator<Item = &'a TimeSlot>,
{
    let mut seen = [false; Day::ALL.len()];
    for slot in slots {
        seen[slot.day as usize] = true;
    }
    seen.iter().filter(|&&d| d).count() as u32
}

/// Whole idle hours between consecutive meetings, summed over all days.
pub fn total_gap_hours<'a, I>(slots: I) -> u32
where
    I: IntoIterator<Item = &'a TimeSlot>,
{
    let mut by_day: BTreeMap<Day, Vec<(u16, u16)>> = BTreeMap::new();
    for slot in slots {
        by_day.entry(slot.day).or_default().push((slot.start, slot.end));
    }

    let mut total = 0u32;
    for intervals in by_day.values_mut() {
        intervals.sort_unstable();
        for pair in intervals.windows(2) {
            let gap = i32::from(pair[1].0) - i32::from(pair[0].1);
            if gap > 0 {
                total += (gap / 60) as u32;
            }
        }
    }
    total
}

/// Metrics of one schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleMetrics {
    /// Distinct days on campus.
    pub days_used: u32,
    /// Total whole gap hours.
    pub total_gap_hours: u32,
    /// Weighted score (higher is better).
    pub score: i64,
}

impl ScheduleMetrics {
    /// Computes metrics for a set of meetings.
    ///
    /// `score = (baseline - days) * day_weight`
    /// `+ within_max_days_bonus` if `days <= max_days_on_campus`
    /// `- gap_hours * gap_penalty`
    /// `+ no_gap_bonus` if the no-gap policy is active and there are no gaps.
    pub fn calculate<'a, I>(slots: I, filter: &FilterConfig, weights: &ScoreWeights) -> Self
    where
        I: IntoIterator<Item = &'a TimeSlot> + Clone,
    {
        let days = days_used(slots.clone());
        let gaps = total_gap_hours(slots);

        let mut score = (weights.day_baseline - i64::from(days)) * weights.day_weight;
        if days <= u32::from(filter.max_days_on_campus) {
            score += weights.within_max_days_bonus;
        }
        score -= i64::from(gaps) * weights.gap_penalty;
        if filter.no_gap_mode() && gaps == 0 {
            score += weights.no_gap_bonus;
        }

        Self {
            days_used: days,
            total_gap_hours: gaps,
            score,
        }
    }

    /// Metrics of a candidate.
    pub fn of(
        candidate: &ScheduleCandidate,
        filter: &FilterConfig,
        weights: &ScoreWeights,
    ) -> Self {
        let slots: Vec<&TimeSlot> = candidate.slots().collect();
        Self::calculate(slots.iter().copied(), filter, weights)
    }
}

/// Ranking order: gap hours ascending, score descending, days ascending.
pub fn compare_ranked(a: &RankedSchedule, b: &RankedSchedule) -> Ordering {
    a.total_gap_hours
        .cmp(&b.total_gap_hours)
        .then_with(|| b.score.cmp(&a.score))
        .then_with(|| a.days_used.cmp(&b.days_used))
}

/// Scores, sorts and truncates schedules.
#[derive(Debug, Clone, Default)]
pub struct Ranker {
    config: RankingConfig,
}

impl Ranker {
    /// Creates a ranker.
    pub fn new(config: RankingConfig) -> Self {
        Self { config }
    }

    /// Attaches metrics to a candidate.
    pub fn score(&self, candidate: ScheduleCandidate, filter: &FilterConfig) -> RankedSchedule {
        let m = ScheduleMetrics::of(&candidate, filter, &self.config.weights);
        RankedSchedule {
            candidate,
            days_used: m.days_used,
            total_gap_hours: m.total_gap_hours,
            score: m.score,
        }
    }

    /// Scores every candidate and keeps the best `top_n`.
    ///
    /// The sort is stable, so candidates with identical metrics stay in the
    /// order they were found.
    pub fn rank<I>(&self, candidates: I, filter: &FilterConfig) -> Vec<RankedSchedule>
    where
        I: IntoIterator<Item = ScheduleCandidate>,
    {
        let mut ranked: Vec<RankedSchedule> = candidates
            .into_iter()
            .map(|c| self.score(c, filter))
            .collect();
        ranked.sort_by(compare_ranked);
        ranked.truncate(self.config.top_n);
        ranked
    }
}
