//! Data-driven game balance
//!
//! Every number a designer might want to nudge lives here rather than in
//! the rules code. A `Tuning` is created once per session and travels
//! inside [`crate::sim::GameState`]; partial JSON overrides fall back to
//! the baseline values field by field.

use serde::{Deserialize, Serialize};

// Serde default functions so partial tuning files keep baseline values
fn default_tier1_score() -> u64 {
    30
}
fn default_tier2_score() -> u64 {
    100
}
fn default_base_award() -> u64 {
    10
}
fn default_combo_tiers() -> Vec<ComboTier> {
    vec![
        ComboTier { streak: 3, multiplier: 1.5 },
        ComboTier { streak: 8, multiplier: 2.0 },
        ComboTier { streak: 15, multiplier: 5.0 },
        ComboTier { streak: 25, multiplier: 10.0 },
        ComboTier { streak: 50, multiplier: 20.0 },
    ]
}
fn default_base_speed() -> f32 {
    100.0
}
fn default_speed_increment() -> f32 {
    20.0
}
fn default_speed_score_step() -> u64 {
    50
}
fn default_obstacle_spacing() -> f32 {
    375.0
}
fn default_lane_cooldown_ms() -> f32 {
    150.0
}
fn default_strafe_base_speed() -> f32 {
    200.0
}
fn default_strafe_max_speed() -> f32 {
    800.0
}
fn default_strafe_double_ms() -> f32 {
    300.0
}
fn default_shield_duration_ms() -> f32 {
    7000.0
}
fn default_shield_spawn_denominator() -> u32 {
    10_000
}

/// A combo tier: reaching `streak` consecutive correct answers grants
/// `multiplier` on every award until a higher tier is reached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComboTier {
    pub streak: u32,
    pub multiplier: f32,
}

/// Serializable balance values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    // === Difficulty ===
    /// Score at which mixed-operator problems begin
    #[serde(default = "default_tier1_score")]
    pub tier1_score: u64,
    /// Score at which compound problems begin
    #[serde(default = "default_tier2_score")]
    pub tier2_score: u64,

    // === Scoring ===
    /// Points for a correct interception before the combo multiplier
    #[serde(default = "default_base_award")]
    pub base_award: u64,
    /// Streak thresholds and their multipliers, ascending
    #[serde(default = "default_combo_tiers")]
    pub combo_tiers: Vec<ComboTier>,

    // === Scrolling ===
    /// Obstacle speed at score 0 (pixels/s)
    #[serde(default = "default_base_speed")]
    pub base_speed: f32,
    /// Speed added per score step
    #[serde(default = "default_speed_increment")]
    pub speed_increment: f32,
    /// Score needed for each speed increment
    #[serde(default = "default_speed_score_step")]
    pub speed_score_step: u64,
    /// Minimum x gap between consecutive rows
    #[serde(default = "default_obstacle_spacing")]
    pub obstacle_spacing: f32,

    // === Movement ===
    /// Lockout after a lane switch (ms)
    #[serde(default = "default_lane_cooldown_ms")]
    pub lane_cooldown_ms: f32,
    /// Horizontal speed when a direction key is first held (pixels/s)
    #[serde(default = "default_strafe_base_speed")]
    pub strafe_base_speed: f32,
    /// Horizontal speed cap (pixels/s)
    #[serde(default = "default_strafe_max_speed")]
    pub strafe_max_speed: f32,
    /// Hold time per speed doubling (ms)
    #[serde(default = "default_strafe_double_ms")]
    pub strafe_double_ms: f32,

    // === Shield ===
    /// Invincibility window granted by a shield pickup (ms)
    #[serde(default = "default_shield_duration_ms")]
    pub shield_duration_ms: f32,
    /// Per-tick spawn chance is 1 in this many
    #[serde(default = "default_shield_spawn_denominator")]
    pub shield_spawn_denominator: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tier1_score: default_tier1_score(),
            tier2_score: default_tier2_score(),
            base_award: default_base_award(),
            combo_tiers: default_combo_tiers(),
            base_speed: default_base_speed(),
            speed_increment: default_speed_increment(),
            speed_score_step: default_speed_score_step(),
            obstacle_spacing: default_obstacle_spacing(),
            lane_cooldown_ms: default_lane_cooldown_ms(),
            strafe_base_speed: default_strafe_base_speed(),
            strafe_max_speed: default_strafe_max_speed(),
            strafe_double_ms: default_strafe_double_ms(),
            shield_duration_ms: default_shield_duration_ms(),
            shield_spawn_denominator: default_shield_spawn_denominator(),
        }
    }
}

impl Tuning {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Largest multiplier among tiers whose streak threshold is met,
    /// 1.0 below the first tier.
    pub fn multiplier_for_streak(&self, streak: u32) -> f32 {
        self.combo_tiers
            .iter()
            .filter(|t| streak >= t.streak)
            .map(|t| t.multiplier)
            .fold(1.0, f32::max)
    }

    /// Obstacle speed for a given score
    pub fn speed_for_score(&self, score: u64) -> f32 {
        let steps = score / self.speed_score_step.max(1);
        self.base_speed + steps as f32 * self.speed_increment
    }
}
