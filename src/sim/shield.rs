//! Timed shield protection

use serde::{Deserialize, Serialize};

/// Countdown shield state. Expiry is detected during the tick that crosses
/// zero, and protection extends through that tick (`grace`) so a collision
/// resolved in the same frame as the expiry is still absorbed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShieldState {
    pub active: bool,
    /// Milliseconds left; clamped to zero on expiry
    pub remaining_ms: f32,
    grace: bool,
    duration_ms: f32,
}

impl ShieldState {
    /// Arm the shield for `duration_ms`. Re-activation restarts the clock.
    pub fn activate(&mut self, duration_ms: f32) {
        self.active = true;
        self.remaining_ms = duration_ms;
        self.duration_ms = duration_ms;
    }

    /// Advance the countdown. Returns true on the tick the shield expires.
    pub fn decay(&mut self, delta_ms: f32) -> bool {
        if !self.active {
            return false;
        }
        self.remaining_ms -= delta_ms;
        if self.remaining_ms <= 0.0 {
            self.remaining_ms = 0.0;
            self.active = false;
            self.grace = true;
            return true;
        }
        false
    }

    /// Drop the expiry grace window. Called at the top of the next tick,
    /// before that tick's decay runs.
    pub fn clear_grace(&mut self) {
        if !self.active {
            self.grace = false;
        }
    }

    /// Whether a wrong-obstacle collision is absorbed right now
    pub fn protects(&self) -> bool {
        self.active || self.grace
    }

    /// Remaining fraction of the countdown, for hosts that render a gauge
    pub fn intensity(&self) -> f32 {
        if !self.active || self.duration_ms <= 0.0 {
            return 0.0;
        }
        (self.remaining_ms / self.duration_ms).clamp(0.0, 1.0)
    }
}
