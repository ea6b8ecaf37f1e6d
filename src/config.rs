//! Engine configuration.
//!
//! Every limit the pipeline applies is an explicit value here rather than a
//! constant buried in an algorithm. All sections are optional in TOML; a
//! missing key takes the default shown below.
//!
//! ```toml
//! conflict_report_limit = 5
//!
//! [search]
//! max_steps = 500000
//! max_results = 100
//! # deadline_ms = 250
//!
//! [diagnostics]
//! combination_threshold = 10000
//! initial_sections_per_course = 8
//! min_sections_per_course = 3
//! sample_limit = 2000
//! conflict_cap = 50
//!
//! [resolver]
//! max_removal_candidates = 2
//! sections_per_course = 5
//! sample_limit = 5000
//!
//! [ranking]
//! top_n = 10
//!
//! [ranking.weights]
//! day_baseline = 6
//! day_weight = 100
//! within_max_days_bonus = 200
//! gap_penalty = 50
//! no_gap_bonus = 300
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;

/// Work limits for the backtracking search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchBudget {
    /// Candidate sections examined before the search gives up.
    pub max_steps: u64,
    /// Stop once this many schedules have been found.
    pub max_results: usize,
    /// Optional wall-clock deadline (ms), checked alongside the step budget.
    pub deadline_ms: Option<u64>,
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self {
            max_steps: 500_000,
            max_results: 100,
            deadline_ms: None,
        }
    }
}

impl SearchBudget {
    /// Sets the step ceiling.
    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Sets the result cap.
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Sets a wall-clock deadline.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline_ms = Some(deadline.as_millis() as u64);
        self
    }

    /// The deadline as a [`Duration`].
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }
}

/// Limits for sampled conflict diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsLimits {
    /// Above this many combinations, groups are truncated to a prefix.
    pub combination_threshold: u64,
    /// First prefix length tried when truncating.
    pub initial_sections_per_course: usize,
    /// Shortest prefix the truncation will go down to.
    pub min_sections_per_course: usize,
    /// Combinations enumerated at most.
    pub sample_limit: usize,
    /// Soft cap on collected records; checked once per combination.
    pub conflict_cap: usize,
}

impl Default for DiagnosticsLimits {
    fn default() -> Self {
        Self {
            combination_threshold: 10_000,
            initial_sections_per_course: 8,
            min_sections_per_course: 3,
            sample_limit: 2_000,
            conflict_cap: 50,
        }
    }
}

/// Limits for partial-schedule resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverLimits {
    /// Most-conflicting courses tried for removal, one at a time.
    pub max_removal_candidates: usize,
    /// Prefix length per group when the reduced set is too large.
    pub sections_per_course: usize,
    /// Combinations enumerated at most for the reduced set.
    pub sample_limit: usize,
    /// Above this many combinations, groups are truncated.
    pub combination_threshold: u64,
}

impl Default for ResolverLimits {
    fn default() -> Self {
        Self {
            max_removal_candidates: 2,
            sections_per_course: 5,
            sample_limit: 5_000,
            combination_threshold: 10_000,
        }
    }
}

/// Score weights.
///
/// These were tuned by hand against real timetables. Keep them as they are
/// unless the ranking is deliberately being re-tuned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Days counted from when rewarding fewer campus days.
    pub day_baseline: i64,
    /// Reward per day below the baseline.
    pub day_weight: i64,
    /// Bonus when the schedule respects `max_days_on_campus`.
    pub within_max_days_bonus: i64,
    /// Penalty per gap hour.
    pub gap_penalty: i64,
    /// Bonus for a gap-free schedule under the no-gap policy.
    pub no_gap_bonus: i64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            day_baseline: 6,
            day_weight: 100,
            within_max_days_bonus: 200,
            gap_penalty: 50,
            no_gap_bonus: 300,
        }
    }
}

/// Ranking settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Schedules kept after sorting.
    pub top_n: usize,
    /// Score weights.
    pub weights: ScoreWeights,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            weights: ScoreWeights::default(),
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Backtracking budget.
    pub search: SearchBudget,
    /// Diagnostics sampling limits.
    pub diagnostics: DiagnosticsLimits,
    /// Partial resolution limits.
    pub resolver: ResolverLimits,
    /// Ranking settings.
    pub ranking: RankingConfig,
    /// Distinct conflicts shown when nothing can be scheduled.
    pub conflict_report_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            search: SearchBudget::default(),
            diagnostics: DiagnosticsLimits::default(),
            resolver: ResolverLimits::default(),
            ranking: RankingConfig::default(),
            conflict_report_limit: 5,
        }
    }
}

impl EngineConfig {
    /// Parses a TOML document and checks value ranges.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Serializes to TOML.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Rejects limits that would make a stage do nothing useful.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.to_string(),
        };

        if self.search.max_results == 0 {
            return Err(invalid("search.max_results", "must be at least 1"));
        }
        if self.diagnostics.min_sections_per_course == 0 {
            return Err(invalid("diagnostics.min_sections_per_course", "must be at least 1"));
        }
        if self.diagnostics.initial_sections_per_course < self.diagnostics.min_sections_per_course
        {
            return Err(invalid(
                "diagnostics.initial_sections_per_course",
                "must not be below min_sections_per_course",
            ));
        }
        if self.resolver.sections_per_course == 0 {
            return Err(invalid("resolver.sections_per_course", "must be at least 1"));
        }
        if self.ranking.top_n == 0 {
            return Err(invalid("ranking.top_n", "must be at least 1"));
        }
        Ok(())
    }
}
