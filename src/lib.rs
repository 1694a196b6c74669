//! Math Runner - gameplay core for a lane-based arithmetic runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (problems, lanes, spawning, scoring)
//! - `tuning`: Data-driven game balance
//! - `highscores`: In-memory session leaderboard
//!
//! The crate owns rules and state only. Rendering, physics bodies, input
//! polling and audio live in the host: it drives [`sim::tick`] once per
//! frame, reports sprite overlaps via [`sim::collide_with_obstacle`] /
//! [`sim::collide_with_power_up`], and drains
//! [`sim::GameState::take_events`] for presentation effects.

pub mod highscores;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Playfield dimensions
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Lane center heights, top to bottom
    pub const LANE_YS: [f32; 3] = [200.0, 400.0, 600.0];
    /// Number of lanes (one obstacle per lane per row)
    pub const LANE_COUNT: usize = LANE_YS.len();
    /// Lane the runner starts in
    pub const START_LANE: usize = 1;

    /// Runner home x position
    pub const RUNNER_X: f32 = 100.0;
    /// Horizontal travel bounds for continuous movement
    pub const TRAVEL_MIN_X: f32 = 50.0;
    pub const TRAVEL_MAX_X: f32 = 750.0;

    /// Obstacles spawn at the right screen edge (or beyond, to keep spacing)
    pub const SPAWN_X: f32 = 800.0;
    /// Entities past this x are retired
    pub const RETIRE_X: f32 = -50.0;
}

/// Center y of a lane, clamped to the last lane for out-of-range indices
#[inline]
pub fn lane_y(lane: usize) -> f32 {
    consts::LANE_YS[lane.min(consts::LANE_COUNT - 1)]
}
