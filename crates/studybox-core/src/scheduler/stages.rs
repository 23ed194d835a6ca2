//! Cognitive-stage state machine
//!
//! Given the grade, the card's current stage and stability, the difficulty
//! *after* this review, and the session fatigue, derive the next stage and
//! stability.
//!
//! ## Failure
//! - Acquisition: stability resets to 0, stage unchanged.
//! - Elsewhere: `s' = max(1, s * 0.7 * (1 - d) * f)` where `f` is 0.7 when the
//!   session is fatigued and 1.0 otherwise. Stage becomes lapse.
//!
//! ## Success
//! - Acquisition: hard leaves the card unconsolidated; good enters fixation
//!   with stability 1, easy with stability 4.
//! - Elsewhere: `s' = s * max(1.1, 2.5 / (1 + 1.5 d) * bonus)`, then the stage
//!   is upgraded by stability thresholds. A lapsed card always returns to at
//!   least fixation.

use serde::{Deserialize, Serialize};

use crate::card::{CognitiveStage, Grade};
use crate::config::{SchedulerConfig, StageThresholds};

/// Base of the success multiplier
pub const BASE_GROWTH: f64 = 2.5;

/// Floor of the success multiplier
pub const MIN_GROWTH: f64 = 1.1;

/// Difficulty weight inside the success multiplier
pub const DIFFICULTY_WEIGHT: f64 = 1.5;

/// Share of stability kept by a failure before difficulty and fatigue
pub const LAPSE_RETENTION: f64 = 0.7;

/// Extra damping of lapse stability when the session is fatigued
pub const FATIGUED_LAPSE_FACTOR: f64 = 0.7;

/// Stability floor after a lapse
pub const MIN_LAPSE_STABILITY: f64 = 1.0;

/// Stability on graduating from acquisition with "good"
pub const GRADUATION_STABILITY: f64 = 1.0;

/// Stability on graduating from acquisition with "easy"
pub const EASY_GRADUATION_STABILITY: f64 = 4.0;

/// Outcome of one transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTransition {
    pub stage: CognitiveStage,
    pub stability: f64,
}

/// Grade bonus applied to the success multiplier.
#[inline]
pub fn grade_bonus(grade: Grade) -> f64 {
    match grade {
        Grade::Easy => 1.3,
        Grade::Hard => 0.8,
        _ => 1.0,
    }
}

/// Stage implied by stability alone, if it clears any threshold.
pub fn stage_for_stability(stability: f64, thresholds: &StageThresholds) -> Option<CognitiveStage> {
    if stability > thresholds.retention {
        Some(CognitiveStage::Retention)
    } else if stability > thresholds.consolidation {
        Some(CognitiveStage::Consolidation)
    } else if stability > thresholds.fixation {
        Some(CognitiveStage::Fixation)
    } else {
        None
    }
}

/// Apply one graded review to the stage machine.
pub fn transition(
    stage: CognitiveStage,
    stability: f64,
    grade: Grade,
    new_difficulty: f64,
    fatigue: f64,
    config: &SchedulerConfig,
) -> StageTransition {
    let stability = stability.max(0.0);

    if grade == Grade::Fail {
        if stage == CognitiveStage::Acquisition {
            return StageTransition {
                stage,
                stability: 0.0,
            };
        }

        let fatigue_factor = if fatigue > config.fatigue_threshold {
            FATIGUED_LAPSE_FACTOR
        } else {
            1.0
        };
        let retention_factor = LAPSE_RETENTION * (1.0 - new_difficulty) * fatigue_factor;

        return StageTransition {
            stage: CognitiveStage::Lapse,
            stability: (stability * retention_factor).max(MIN_LAPSE_STABILITY),
        };
    }

    if stage == CognitiveStage::Acquisition {
        return match grade {
            Grade::Hard => StageTransition {
                stage,
                stability: 0.0,
            },
            Grade::Easy => StageTransition {
                stage: CognitiveStage::Fixation,
                stability: EASY_GRADUATION_STABILITY,
            },
            _ => StageTransition {
                stage: CognitiveStage::Fixation,
                stability: GRADUATION_STABILITY,
            },
        };
    }

    let difficulty_mod = 1.0 / (1.0 + new_difficulty * DIFFICULTY_WEIGHT);
    let multiplier = (BASE_GROWTH * difficulty_mod * grade_bonus(grade)).max(MIN_GROWTH);
    let new_stability = stability * multiplier;

    let mut new_stage = stage;
    if let Some(by_threshold) = stage_for_stability(new_stability, &config.stage_thresholds) {
        if by_threshold.maturity() > new_stage.maturity() {
            new_stage = by_threshold;
        }
    }
    if new_stage == CognitiveStage::Lapse {
        new_stage = CognitiveStage::Fixation;
    }

    StageTransition {
        stage: new_stage,
        stability: new_stability,
    }
}
