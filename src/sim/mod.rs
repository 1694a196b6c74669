//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod combo;
pub mod problem;
pub mod shield;
pub mod spawn;
pub mod state;
pub mod tick;

pub use combo::ComboState;
pub use problem::{Problem, Tier, generate, tier_for_score};
pub use shield::ShieldState;
pub use spawn::{maybe_spawn_power_up, retire_offscreen, spawn_row, wrong_answers};
pub use state::{
    GameEvent, GamePhase, GameState, Obstacle, PowerUp, PowerUpKind, RngState, Runner,
};
pub use tick::{TickInput, collide_with_obstacle, collide_with_power_up, tick};
