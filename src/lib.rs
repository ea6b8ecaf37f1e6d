//! Timetable generation engine.
//!
//! Given a catalog of course sections, a set of selected courses and
//! day/time preferences, picks one section per course so that nothing
//! overlaps, ranks the feasible timetables, and when none exists explains
//! the conflicts and tries a timetable without the most conflicting course.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `TimeSlot`, `Section`, `FilterConfig`,
//!   `CourseGroup`, `ScheduleCandidate`, `ConflictRecord`, `RankedSchedule`
//! - **`catalog`**: The `CatalogProvider` seam and the JSON-backed `Catalog`
//! - **`validation`**: Input integrity checks (duplicate IDs, empty or
//!   self-overlapping sections, unknown courses)
//! - **`scheduler`**: Pipeline stages: filter, backtracking search,
//!   diagnostics, partial resolution, ranking
//! - **`engine`**: `TimetableEngine`, wiring the stages into one request
//! - **`config`**: Budgets, limits and score weights, loadable from TOML
//!
//! # Architecture
//!
//! The engine is synchronous and holds no shared mutable state. Acquiring
//! section data and rendering results belong to the caller.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 2
//! - Russell & Norvig (2021), "Artificial Intelligence: A Modern Approach",
//!   Ch. 6 (backtracking search for constraint satisfaction)

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use catalog::{Catalog, CatalogProvider};
pub use config::EngineConfig;
pub use engine::{GenerationOutcome, GenerationReport, GenerationRequest, TimetableEngine};
pub use error::GenerationError;
