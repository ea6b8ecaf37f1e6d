//! Student day/time preferences.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::time::clock_serde;
use super::Day;

/// How idle time between classes is treated.
///
/// Only [`GapPolicy::NoGap`] affects admissibility. An `UpTo` limit is a
/// preference: gaps lower the score but never reject a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapPolicy {
    /// Accept only schedules whose total gap is zero.
    NoGap,
    /// Preferred maximum gap in hours (scoring only).
    UpTo(u32),
}

impl Default for GapPolicy {
    fn default() -> Self {
        GapPolicy::UpTo(2)
    }
}

/// Filter applied to every section before search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Days a section may meet on. Must be non-empty.
    #[serde(default = "default_days")]
    pub allowed_days: BTreeSet<Day>,
    /// Earliest allowed slot start (minutes-of-day).
    #[serde(with = "clock_serde", default = "default_start")]
    pub start_bound: u16,
    /// Latest allowed slot end (minutes-of-day).
    #[serde(with = "clock_serde", default = "default_end")]
    pub end_bound: u16,
    /// Preferred maximum number of days on campus (scoring only).
    #[serde(default = "default_max_days")]
    pub max_days_on_campus: u8,
    /// Gap handling.
    #[serde(default)]
    pub gap_policy: GapPolicy,
    /// Also consider sections that are not open.
    #[serde(default)]
    pub include_closed: bool,
}

fn default_days() -> BTreeSet<Day> {
    Day::ALL.into_iter().collect()
}
fn default_start() -> u16 {
    8 * 60
}
fn default_end() -> u16 {
    18 * 60
}
fn default_max_days() -> u8 {
    5
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            allowed_days: default_days(),
            start_bound: default_start(),
            end_bound: default_end(),
            max_days_on_campus: default_max_days(),
            gap_policy: GapPolicy::default(),
            include_closed: false,
        }
    }
}

impl FilterConfig {
    /// Creates the default filter: Mon..Fri, 08:00-18:00, gaps allowed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the allowed days.
    pub fn with_days(mut self, days: impl IntoIterator<Item = Day>) -> Self {
        self.allowed_days = days.into_iter().collect();
        self
    }

    /// Sets the daily window in minutes-of-day.
    pub fn with_window(mut self, start_bound: u16, end_bound: u16) -> Self {
        self.start_bound = start_bound;
        self.end_bound = end_bound;
        self
    }

    /// Sets the preferred maximum number of campus days.
    pub fn with_max_days(mut self, max_days: u8) -> Self {
        self.max_days_on_campus = max_days;
        self
    }

    /// Sets the gap policy.
    pub fn with_gap_policy(mut self, policy: GapPolicy) -> Self {
        self.gap_policy = policy;
        self
    }

    /// Admits closed, enrolled and unknown-status sections too.
    pub fn with_closed_sections(mut self, include: bool) -> Self {
        self.include_closed = include;
        self
    }

    /// Whether only zero-gap schedules are admissible.
    #[inline]
    pub fn no_gap_mode(&self) -> bool {
        self.gap_policy == GapPolicy::NoGap
    }
}
