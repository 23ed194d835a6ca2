//! Scheduler configuration
//!
//! Every tunable constant of the engine lives here under a name. Defaults
//! reproduce the stock behaviour; a JSON file and a handful of environment
//! variables can override them.
//!
//! Precedence, lowest to highest: [`SchedulerConfig::default`], JSON file,
//! environment (`STUDYBOX_TARGET_RISK`, `STUDYBOX_SHORT_TERM_HALF_LIFE`,
//! `STUDYBOX_CRITICAL_RISK`).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Default forgetting-risk threshold used to plan the next review
pub const DEFAULT_TARGET_RISK: f64 = 0.10;

/// Half-life (minutes) of the short-term decay for never-consolidated cards
pub const DEFAULT_SHORT_TERM_HALF_LIFE_MINUTES: f64 = 20.0;

/// Difficulty assigned to freshly created cards
pub const DEFAULT_INITIAL_DIFFICULTY: f64 = 0.3;

/// Risk above which a card counts as critical for deck health
pub const DEFAULT_CRITICAL_RISK: f64 = 0.30;

/// Longest delay (days) the scheduler will plan, about a century
pub const DEFAULT_MAX_INTERVAL_DAYS: f64 = 36_500.0;

/// Env var overriding [`SchedulerConfig::target_risk`]
pub const ENV_TARGET_RISK: &str = "STUDYBOX_TARGET_RISK";

/// Env var overriding [`SchedulerConfig::short_term_half_life_minutes`]
pub const ENV_SHORT_TERM_HALF_LIFE: &str = "STUDYBOX_SHORT_TERM_HALF_LIFE";

/// Env var overriding [`SchedulerConfig::critical_risk`]
pub const ENV_CRITICAL_RISK: &str = "STUDYBOX_CRITICAL_RISK";

// ============================================================================
// SUB-SECTIONS
// ============================================================================

/// Stability (days) a card must exceed to be promoted into each stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StageThresholds {
    pub fixation: f64,
    pub consolidation: f64,
    pub retention: f64,
}

impl Default for StageThresholds {
    fn default() -> Self {
        Self {
            fixation: 3.0,
            consolidation: 14.0,
            retention: 60.0,
        }
    }
}

/// Minute offsets used while a card is still in acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LearningSteps {
    pub fail: i64,
    pub hard: i64,
    pub good: i64,
}

impl Default for LearningSteps {
    fn default() -> Self {
        Self {
            fail: 1,
            hard: 6,
            good: 10,
        }
    }
}

/// How much session fatigue each grade adds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FatigueCosts {
    pub fail: f64,
    pub hard: f64,
    pub other: f64,
}

impl Default for FatigueCosts {
    fn default() -> Self {
        Self {
            fail: 0.05,
            hard: 0.03,
            other: 0.01,
        }
    }
}

// ============================================================================
// SCHEDULER CONFIG
// ============================================================================

/// All tunables of the scheduling engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SchedulerConfig {
    /// Forgetting risk at which the next review is planned
    pub target_risk: f64,
    /// Half-life of the short-term (minutes-scale) decay
    pub short_term_half_life_minutes: f64,
    pub stage_thresholds: StageThresholds,
    pub learning_steps: LearningSteps,
    pub fatigue_costs: FatigueCosts,
    /// Fatigue above which lapses lose extra stability
    pub fatigue_threshold: f64,
    /// Risk above which a card is critical (health score, explanations)
    pub critical_risk: f64,
    pub initial_difficulty: f64,
    /// Recall latency (seconds) beyond which a correct answer is "hesitant"
    pub slow_recall_seconds: f64,
    /// Imported intervals up to this many days land in consolidation
    pub import_retention_cutoff_days: f64,
    /// Minimum risk for a not-yet-due card to enter the focus queue
    pub focus_risk_threshold: f64,
    /// Upper bound on any planned or imported interval
    pub max_interval_days: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            target_risk: DEFAULT_TARGET_RISK,
            short_term_half_life_minutes: DEFAULT_SHORT_TERM_HALF_LIFE_MINUTES,
            stage_thresholds: StageThresholds::default(),
            learning_steps: LearningSteps::default(),
            fatigue_costs: FatigueCosts::default(),
            fatigue_threshold: 0.7,
            critical_risk: DEFAULT_CRITICAL_RISK,
            initial_difficulty: DEFAULT_INITIAL_DIFFICULTY,
            slow_recall_seconds: 15.0,
            import_retention_cutoff_days: 21.0,
            focus_risk_threshold: 0.20,
            max_interval_days: DEFAULT_MAX_INTERVAL_DAYS,
        }
    }
}

impl SchedulerConfig {
    /// Load from a JSON file. Missing keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: SchedulerConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides on top of `self`.
    ///
    /// Unparseable values are ignored with a warning rather than failing.
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Some(v) = read_env_f64(ENV_TARGET_RISK) {
            self.target_risk = v;
        }
        if let Some(v) = read_env_f64(ENV_SHORT_TERM_HALF_LIFE) {
            self.short_term_half_life_minutes = v;
        }
        if let Some(v) = read_env_f64(ENV_CRITICAL_RISK) {
            self.critical_risk = v;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check every value is inside the range the formulas assume.
    pub fn validate(&self) -> Result<()> {
        fn open_unit(name: &str, v: f64) -> Result<()> {
            if v > 0.0 && v < 1.0 {
                Ok(())
            } else {
                Err(EngineError::InvalidConfig(format!(
                    "{name} must be in (0, 1), got {v}"
                )))
            }
        }

        open_unit("targetRisk", self.target_risk)?;
        open_unit("criticalRisk", self.critical_risk)?;
        open_unit("focusRiskThreshold", self.focus_risk_threshold)?;

        if !(0.0..=1.0).contains(&self.fatigue_threshold) {
            return Err(EngineError::InvalidConfig(format!(
                "fatigueThreshold must be in [0, 1], got {}",
                self.fatigue_threshold
            )));
        }
        if !(0.1..=1.0).contains(&self.initial_difficulty) {
            return Err(EngineError::InvalidConfig(format!(
                "initialDifficulty must be in [0.1, 1.0], got {}",
                self.initial_difficulty
            )));
        }
        if self.short_term_half_life_minutes <= 0.0 {
            return Err(EngineError::InvalidConfig(
                "shortTermHalfLifeMinutes must be positive".to_string(),
            ));
        }

        if !(self.max_interval_days.is_finite() && self.max_interval_days >= 1.0) {
            return Err(EngineError::InvalidConfig(format!(
                "maxIntervalDays must be finite and at least 1, got {}",
                self.max_interval_days
            )));
        }

        let t = &self.stage_thresholds;
        if !(0.0 < t.fixation && t.fixation < t.consolidation && t.consolidation < t.retention) {
            return Err(EngineError::InvalidConfig(format!(
                "stageThresholds must be increasing and positive, got {}/{}/{}",
                t.fixation, t.consolidation, t.retention
            )));
        }

        let s = &self.learning_steps;
        if s.fail < 0 || s.hard < 0 || s.good < 0 {
            return Err(EngineError::InvalidConfig(
                "learningSteps must not be negative".to_string(),
            ));
        }

        let c = &self.fatigue_costs;
        if c.fail < 0.0 || c.hard < 0.0 || c.other < 0.0 {
            return Err(EngineError::InvalidConfig(
                "fatigueCosts must not be negative".to_string(),
            ));
        }

        Ok(())
    }
}

fn read_env_f64(key: &str) -> Option<f64> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse::<f64>() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Ignoring unparseable numeric override");
            None
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
