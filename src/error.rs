//! Error types for u-timetable.
//!
//! Only request rejections and malformed input are errors. Everything that
//! happens after a request is accepted (excluded courses, infeasible search,
//! detected conflicts, failed partial resolution) is reported as a
//! [`GenerationOutcome`](crate::engine::GenerationOutcome) variant instead.

use std::path::PathBuf;
use thiserror::Error;

/// Malformed time or day values in domain models.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Day name outside Mon..Fri.
    #[error("Unknown day '{0}' (expected Mon..Fri)")]
    UnknownDay(String),

    /// Clock string that is not `HH:MM` within a day.
    #[error("Invalid clock time '{0}' (expected HH:MM)")]
    InvalidClock(String),

    /// Range text without the `start - end` separator.
    #[error("Malformed time range '{0}' (expected 'HH:MM - HH:MM')")]
    MalformedRange(String),

    /// Interval whose end does not come after its start.
    #[error("Invalid time range: end ({end}) must be greater than start ({start})")]
    InvalidTimeRange { start: u16, end: u16 },
}

/// Catalog ingestion errors.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The section records could not be decoded.
    #[error("Failed to decode catalog: {0}")]
    Json(#[from] serde_json::Error),

    /// The catalog file could not be read.
    #[error("Failed to read catalog from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// TOML syntax or type mismatch.
    #[error("Failed to parse configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// The configuration file could not be read.
    #[error("Failed to load configuration from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A value parsed but is out of range.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Reasons a generation request is rejected before any filtering happens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// The request selected zero courses.
    #[error("No course selected")]
    NoCourseSelected,

    /// The filter can never admit a section.
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),
}
