//! Consecutive-correct streaks and score multipliers

use serde::{Deserialize, Serialize};

use crate::tuning::{ComboTier, Tuning};

/// Streak and multiplier state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComboState {
    /// Consecutive correct interceptions
    pub streak: u32,
    /// Current score multiplier; never decreases while the streak lives
    pub multiplier: f32,
}

impl Default for ComboState {
    fn default() -> Self {
        Self {
            streak: 0,
            multiplier: 1.0,
        }
    }
}

impl ComboState {
    /// Record a correct interception. Returns the tier whose threshold the
    /// streak landed on exactly, if any; streaks grow one hit at a time,
    /// so a tier can never be skipped over.
    pub fn record_hit(&mut self, tuning: &Tuning) -> Option<ComboTier> {
        self.streak += 1;
        self.multiplier = tuning.multiplier_for_streak(self.streak);
        tuning
            .combo_tiers
            .iter()
            .find(|t| t.streak == self.streak)
            .copied()
    }

    /// Points for a correct interception at the current multiplier
    pub fn award(&self, base: u64) -> u64 {
        (base as f32 * self.multiplier).floor() as u64
    }

    /// An unshielded miss ends the streak
    pub fn reset(&mut self) {
        self.streak = 0;
        self.multiplier = 1.0;
    }
}
