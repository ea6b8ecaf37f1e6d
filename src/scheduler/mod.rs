//! Timetable generation pipeline stages.
//!
//! Each stage is usable on its own; [`crate::engine::TimetableEngine`] wires
//! them together.
//!
//! # Stages
//!
//! 1. **Filter** (`FilterEvaluator`): per-course eligible sections.
//! 2. **Search** (`BacktrackingSearch`): budgeted depth-first search for
//!    conflict-free schedules.
//! 3. **Ranking** (`Ranker`): days, gap hours and score; sort and truncate.
//! 4. **Diagnostics** (`ConflictDiagnostics`): sampled conflict evidence when
//!    the search finds nothing.
//! 5. **Resolution** (`PartialScheduleResolver`): drop the most conflicting
//!    course and schedule the rest.
//!
//! All stages are deterministic: identical inputs give identical outputs.

pub mod combinations;
mod diagnostics;
mod filter;
mod kpi;
mod resolver;
mod search;

pub use diagnostics::{ConflictDiagnostics, DiagnosticsReport};
pub use filter::{
    fits, is_eligible, CourseGrouping, ExcludedCourse, ExclusionReason, FilterEvaluator,
};
pub use kpi::{compare_ranked, days_used, total_gap_hours, Ranker, ScheduleMetrics};
pub use resolver::{tally_conflicts, ConflictTally, PartialSchedule, PartialScheduleResolver};
pub use search::{BacktrackingSearch, SearchResult, SearchTermination};
