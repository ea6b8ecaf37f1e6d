//! Budgeted backtracking search.
//!
//! # Algorithm
//!
//! 1. Walk courses in selection order, depth-first.
//! 2. At each course, try its sections in catalog order.
//! 3. Skip a section that overlaps anything already placed (O(depth) checks).
//! 4. At full depth, accept the schedule (under the no-gap policy only if its
//!    total gap is zero).
//!
//! # Budget
//! Every examined section costs one step. The search stops as soon as the
//! step ceiling is exceeded, the result cap is reached, or the optional
//! wall-clock deadline passes. Hitting a limit is not an error: the caller
//! gets what was found so far and a [`SearchTermination`] saying why the
//! walk ended. A truncated search may miss valid schedules deeper in the tree.
//!
//! # Complexity
//! O(prod |group|) in the worst case, capped by the step budget.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::kpi::total_gap_hours;
use crate::config::SearchBudget;
use crate::models::{CourseGroup, FilterConfig, ScheduleCandidate, Section};

/// Deadline is polled every this many steps.
const DEADLINE_POLL_INTERVAL: u64 = 1024;

/// Why the search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchTermination {
    /// The whole tree was walked.
    Exhausted,
    /// `max_results` schedules were found.
    ResultCap,
    /// The step ceiling was exceeded.
    StepBudget,
    /// The wall-clock deadline passed.
    Deadline,
}

/// Search output.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Conflict-free (and, under no-gap, gap-free) schedules in discovery order.
    pub candidates: Vec<ScheduleCandidate>,
    /// Sections examined.
    pub steps: u64,
    /// Why the search stopped.
    pub termination: SearchTermination,
}

impl SearchResult {
    /// Whether a limit cut the walk short, so more schedules may exist.
    pub fn is_truncated(&self) -> bool {
        self.termination != SearchTermination::Exhausted
    }
}

/// Depth-first search over one-section-per-course choices.
///
/// # Example
///
/// ```
/// use u_timetable::config::SearchBudget;
/// use u_timetable::models::{CourseGroup, Day, FilterConfig, Section, TimeSlot};
/// use u_timetable::scheduler::BacktrackingSearch;
///
/// let groups = vec![
///     CourseGroup::new("A", "").with_section(
///         Section::new("A1", "A").with_slot(TimeSlot::at(Day::Mon, 8, 10).unwrap())),
///     CourseGroup::new("B", "").with_section(
///         Section::new("B1", "B").with_slot(TimeSlot::at(Day::Mon, 10, 12).unwrap())),
/// ];
/// let result = BacktrackingSearch::new(SearchBudget::default())
///     .run(&groups, &FilterConfig::new());
/// assert_eq!(result.candidates.len(), 1);
/// assert!(!result.is_truncated());
/// ```
#[derive(Debug, Clone, Default)]
pub struct BacktrackingSearch {
    budget: SearchBudget,
}

struct SearchState<'a> {
    groups: &'a [CourseGroup],
    no_gap: bool,
    budget: &'a SearchBudget,
    started: Instant,
    steps: u64,
    timed_out: bool,
    placed: Vec<&'a Section>,
    results: Vec<ScheduleCandidate>,
}

impl<'a> SearchState<'a> {
    fn budget_spent(&self) -> bool {
        self.steps > self.budget.max_steps || self.timed_out
    }

    fn should_stop(&self) -> bool {
        self.results.len() >= self.budget.max_results || self.budget_spent()
    }

    fn tick(&mut self) {
        self.steps += 1;
        if self.steps % DEADLINE_POLL_INTERVAL == 0 {
            if let Some(limit) = self.budget.deadline() {
                self.timed_out = self.started.elapsed() >= limit;
            }
        }
    }

    fn accept(&mut self) {
        if self.no_gap {
            let gaps = total_gap_hours(self.placed.iter().flat_map(|s| s.time_slots.iter()));
            if gaps != 0 {
                return;
            }
        }
        self.results.push(ScheduleCandidate::from_refs(&self.placed));
    }

    fn backtrack(&mut self, index: usize) {
        if self.should_stop() {
            return;
        }
        if index == self.groups.len() {
            self.accept();
            return;
        }

        let groups = self.groups;
        for section in &groups[index].sections {
            if self.budget_spent() {
                return;
            }
            self.tick();
            if self.budget_spent() {
                return;
            }

            if self.placed.iter().any(|p| p.conflicts_with(section)) {
                continue;
            }

            self.placed.push(section);
            self.backtrack(index + 1);
            self.placed.pop();

            if self.results.len() >= self.budget.max_results {
                return;
            }
        }
    }

    fn termination(&self) -> SearchTermination {
        if self.results.len() >= self.budget.max_results {
            SearchTermination::ResultCap
        } else if self.steps > self.budget.max_steps {
            SearchTermination::StepBudget
        } else if self.timed_out {
            SearchTermination::Deadline
        } else {
            SearchTermination::Exhausted
        }
    }
}

impl BacktrackingSearch {
    /// Creates a search with the given budget.
    pub fn new(budget: SearchBudget) -> Self {
        Self { budget }
    }

    /// The budget in use.
    pub fn budget(&self) -> &SearchBudget {
        &self.budget
    }

    /// Finds up to `max_results` admissible schedules.
    ///
    /// Output order is fully determined by course order and section order,
    /// so identical inputs give identical results.
    pub fn run(&self, groups: &[CourseGroup], filter: &FilterConfig) -> SearchResult {
        let mut state = SearchState {
            groups,
            no_gap: filter.no_gap_mode(),
            budget: &self.budget,
            started: Instant::now(),
            steps: 0,
            timed_out: false,
            placed: Vec::with_capacity(groups.len()),
            results: Vec::new(),
        };
        state.backtrack(0);

        let termination = state.termination();
        if termination != SearchTermination::Exhausted {
            log::debug!(
                "search stopped early ({termination:?}) after {} steps with {} result(s)",
                state.steps,
                state.results.len()
            );
        }
        SearchResult {
            candidates: state.results,
            steps: state.steps,
            termination,
        }
    }
}
