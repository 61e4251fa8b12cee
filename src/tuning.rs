//! Data-driven game balance
//!
//! Every timing, probability and cap the simulation uses. Defaults match
//! [`crate::consts`]; a JSON file may override any subset of fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors from loading or validating a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Simulation balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Timing ===
    pub tick_ms: u64,
    pub bonus_duration_ms: u64,
    pub area_warning_ms: u64,
    pub area_active_ms: u64,
    pub projectile_telegraph_ms: u64,
    pub ground_hazard_ms: u64,
    pub gift_spawn_interval_ms: u64,
    pub power_up_interval_ms: u64,

    // === Difficulty ===
    pub base_hazard_interval_ms: u64,
    pub min_hazard_interval_ms: u64,
    /// Interval reduction per point of score
    pub hazard_scaling_step_ms: u64,
    pub area_cooldown_cycles: i32,

    // === Chances (0.0 - 1.0) ===
    pub area_chance: f64,
    pub sweeper_chance: f64,
    pub power_up_chance: f64,
    pub carrier_drop_chance: f64,
    pub carrier_gift_chance: f64,

    // === Caps and scoring ===
    pub max_gifts: usize,
    pub initial_gifts: usize,
    pub max_carrier_drops: u32,
    pub score_per_gift: u64,
    pub bonus_multiplier: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tick_ms: TICK_MS,
            bonus_duration_ms: BONUS_DURATION_MS,
            area_warning_ms: AREA_WARNING_MS,
            area_active_ms: AREA_ACTIVE_MS,
            projectile_telegraph_ms: PROJECTILE_TELEGRAPH_MS,
            ground_hazard_ms: GROUND_HAZARD_MS,
            gift_spawn_interval_ms: GIFT_SPAWN_INTERVAL_MS,
            power_up_interval_ms: POWER_UP_INTERVAL_MS,

            base_hazard_interval_ms: BASE_HAZARD_INTERVAL_MS,
            min_hazard_interval_ms: MIN_HAZARD_INTERVAL_MS,
            hazard_scaling_step_ms: HAZARD_SCALING_STEP_MS,
            area_cooldown_cycles: AREA_COOLDOWN_CYCLES,

            area_chance: AREA_CHANCE,
            sweeper_chance: SWEEPER_CHANCE,
            power_up_chance: POWER_UP_CHANCE,
            carrier_drop_chance: CARRIER_DROP_CHANCE,
            carrier_gift_chance: CARRIER_GIFT_CHANCE,

            max_gifts: MAX_GIFTS,
            initial_gifts: INITIAL_GIFTS,
            max_carrier_drops: MAX_CARRIER_DROPS,
            score_per_gift: SCORE_PER_GIFT,
            bonus_multiplier: BONUS_MULTIPLIER,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON tuning document and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let chances = [
            ("area_chance", self.area_chance),
            ("sweeper_chance", self.sweeper_chance),
            ("power_up_chance", self.power_up_chance),
            ("carrier_drop_chance", self.carrier_drop_chance),
            ("carrier_gift_chance", self.carrier_gift_chance),
        ];
        for (field, p) in chances {
            if !(0.0..=1.0).contains(&p) {
                return Err(TuningError::Invalid {
                    field,
                    reason: format!("{} is not a probability", p),
                });
            }
        }

        let periods = [
            ("tick_ms", self.tick_ms),
            ("bonus_duration_ms", self.bonus_duration_ms),
            ("area_warning_ms", self.area_warning_ms),
            ("area_active_ms", self.area_active_ms),
            ("projectile_telegraph_ms", self.projectile_telegraph_ms),
            ("ground_hazard_ms", self.ground_hazard_ms),
            ("gift_spawn_interval_ms", self.gift_spawn_interval_ms),
            ("power_up_interval_ms", self.power_up_interval_ms),
            ("base_hazard_interval_ms", self.base_hazard_interval_ms),
            ("min_hazard_interval_ms", self.min_hazard_interval_ms),
        ];
        for (field, ms) in periods {
            if ms == 0 {
                return Err(TuningError::Invalid {
                    field,
                    reason: "must be positive".to_string(),
                });
            }
        }

        if self.tick_ms > MAX_TICK_MS {
            return Err(TuningError::Invalid {
                field: "tick_ms",
                reason: format!("{} exceeds {}", self.tick_ms, MAX_TICK_MS),
            });
        }

        if self.min_hazard_interval_ms > self.base_hazard_interval_ms {
            return Err(TuningError::Invalid {
                field: "min_hazard_interval_ms",
                reason: format!(
                    "{} exceeds base_hazard_interval_ms {}",
                    self.min_hazard_interval_ms, self.base_hazard_interval_ms
                ),
            });
        }

        if self.initial_gifts > self.max_gifts {
            return Err(TuningError::Invalid {
                field: "initial_gifts",
                reason: format!("{} exceeds max_gifts {}", self.initial_gifts, self.max_gifts),
            });
        }

        Ok(())
    }

    /// Current hazard-selection interval for a score
    ///
    /// Linear in score, saturating at the minimum.
    pub fn hazard_interval_ms(&self, score: u64) -> u64 {
        let reduction = score.saturating_mul(self.hazard_scaling_step_ms);
        self.base_hazard_interval_ms
            .saturating_sub(reduction)
            .max(self.min_hazard_interval_ms)
    }

    /// Points for one gift pickup
    pub fn gift_points(&self, bonus_active: bool) -> u64 {
        if bonus_active {
            self.score_per_gift * self.bonus_multiplier
        } else {
            self.score_per_gift
        }
    }
}
