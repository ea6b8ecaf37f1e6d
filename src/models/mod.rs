//! Timetable domain models.
//!
//! Provides the data types the engine consumes and produces. All of them are
//! request-scoped values: built at the start of a generation request and
//! discarded after the results are rendered.
//!
//! | Type | Role |
//! |------|------|
//! | [`TimeSlot`] | One weekly meeting (day + `[start, end)`) |
//! | [`Section`] | An offered instance of a course |
//! | [`FilterConfig`] | Day/time preferences and gap policy |
//! | [`CourseGroup`] | Eligible sections of one course |
//! | [`ScheduleCandidate`] | One section per course |
//! | [`ConflictRecord`] | A pairwise overlap |
//! | [`RankedSchedule`] | A candidate with its metrics |

mod filter;
mod schedule;
mod section;
pub(crate) mod time;

pub use filter::{FilterConfig, GapPolicy};
pub use schedule::{ConflictRecord, CourseGroup, RankedSchedule, ScheduleCandidate};
pub use section::{Section, SectionStatus};
pub use time::{format_clock, parse_clock, Day, TimeSlot, MINUTES_PER_DAY};
