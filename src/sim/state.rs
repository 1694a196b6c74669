//! Game state and core simulation types
//!
//! Everything a session needs for determinism lives here.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::combo::ComboState;
use super::problem::Problem;
use super::shield::ShieldState;
use crate::consts::*;
use crate::lane_y;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the start input
    Ready,
    /// Active gameplay
    Running,
    /// Run ended on a wrong answer
    GameOver,
}

/// The player's runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Runner {
    /// Current lane index (0 = top)
    pub lane: usize,
    /// Continuous horizontal position
    pub x: f32,
    /// Time left until the next lane switch is accepted (ms)
    pub lane_cooldown_ms: f32,
    /// Horizontal direction currently held (-1, 0, +1)
    pub strafe_dir: i8,
    /// How long the current direction has been held (ms)
    pub strafe_hold_ms: f32,
}

impl Default for Runner {
    fn default() -> Self {
        Self {
            lane: START_LANE,
            x: RUNNER_X,
            lane_cooldown_ms: 0.0,
            strafe_dir: 0,
            strafe_hold_ms: 0.0,
        }
    }
}

impl Runner {
    /// Position in playfield coordinates
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, lane_y(self.lane))
    }

    /// Move one lane up (-1) or down (+1). Refused while the cooldown is
    /// running; requests past the boundary lanes are no-ops and leave the
    /// cooldown untouched.
    pub fn switch_lane(&mut self, dir: i8, cooldown_ms: f32) -> bool {
        if self.lane_cooldown_ms > 0.0 {
            return false;
        }
        let target = self.lane as i32 + dir as i32;
        if target < 0 || target >= LANE_COUNT as i32 {
            return false;
        }
        self.lane = target as usize;
        self.lane_cooldown_ms = cooldown_ms;
        true
    }

    /// Integrate continuous horizontal movement. Speed starts at the base
    /// and doubles for every full hold interval, up to the cap; the hold
    /// timer restarts whenever the direction changes or movement stops.
    pub fn strafe(&mut self, dir: i8, dt: f32, tuning: &Tuning) {
        if dir != self.strafe_dir {
            self.strafe_dir = dir;
            self.strafe_hold_ms = 0.0;
        }
        if dir == 0 {
            return;
        }
        let doublings = (self.strafe_hold_ms / tuning.strafe_double_ms).floor() as i32;
        let speed = (tuning.strafe_base_speed * 2.0_f32.powi(doublings))
            .min(tuning.strafe_max_speed);
        self.x = (self.x + dir as f32 * speed * dt).clamp(TRAVEL_MIN_X, TRAVEL_MAX_X);
        self.strafe_hold_ms += dt * 1000.0;
    }
}

/// One labeled obstacle of a row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub lane: usize,
    pub pos: Vec2,
    /// Answer candidate shown on the label
    pub value: i32,
    /// Whether intercepting this one solves the live problem
    pub correct: bool,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Shield,
}

/// A collectible power-up entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub lane: usize,
    pub pos: Vec2,
}

/// Presentation-facing moments produced by the simulation. Collected
/// during tick/collision calls and drained by the host via
/// [`GameState::take_events`]; gameplay never reads them back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Correct obstacle intercepted; `points` already includes the multiplier
    CorrectHit { pos: Vec2, points: u64 },
    /// Wrong obstacle intercepted without protection
    WrongHit { pos: Vec2 },
    /// Wrong obstacle absorbed by the shield
    ShieldBlocked { pos: Vec2 },
    /// Streak just crossed into a new combo tier
    ComboTierReached { streak: u32, multiplier: f32 },
    ShieldActivated,
    ShieldExpired,
    /// Run ended with the final score
    GameOver { score: u64 },
}

/// RNG state wrapper for serialization
///
/// Each draw site takes a generator from the next PCG stream, so the pair
/// of counters reproduces every draw after a snapshot round-trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// Generator for the next draw site
    pub fn next_rng(&mut self) -> Pcg32 {
        self.stream = self.stream.wrapping_add(1);
        Pcg32::new(self.seed, self.stream)
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// RNG state
    pub rng_state: RngState,
    /// Current phase
    pub phase: GamePhase,
    /// Score
    pub score: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Scroll speed, recomputed from score every tick (pixels/s)
    pub speed: f32,
    /// Player runner
    pub runner: Runner,
    /// The problem the current row answers
    pub problem: Option<Problem>,
    /// Active obstacles (sorted by id for determinism)
    pub obstacles: Vec<Obstacle>,
    /// Active power-ups (sorted by id for determinism)
    pub power_ups: Vec<PowerUp>,
    /// Streak and multiplier
    pub combo: ComboState,
    /// Invincibility lifecycle
    pub shield: ShieldState,
    /// Correct interceptions this run
    pub problems_solved: u32,
    /// Longest streak this run
    pub best_streak: u32,
    /// Balance values for this session
    pub tuning: Tuning,
    /// Events pending pickup by the presentation layer
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new session with the given seed and baseline tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a new session with custom tuning
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let speed = tuning.speed_for_score(0);
        Self {
            seed,
            rng_state: RngState::new(seed),
            phase: GamePhase::Ready,
            score: 0,
            time_ticks: 0,
            speed,
            runner: Runner::default(),
            problem: None,
            obstacles: Vec::new(),
            power_ups: Vec::new(),
            combo: ComboState::default(),
            shield: ShieldState::default(),
            problems_solved: 0,
            best_streak: 0,
            tuning,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Start over after a run ends. The successor seed keeps back-to-back
    /// runs distinct while the whole sequence stays reproducible from the
    /// first seed. Normally reached through the restart input at game over.
    pub fn restart(&mut self) {
        let tuning = self.tuning.clone();
        *self = Self::with_tuning(self.seed.wrapping_add(1), tuning);
    }

    /// Drain events accumulated since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Lane holding the correct answer of the live row, if any
    pub fn correct_lane(&self) -> Option<usize> {
        self.obstacles.iter().find(|o| o.correct).map(|o| o.lane)
    }

    /// Ensure entity vectors stay sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.obstacles.sort_by_key(|o| o.id);
        self.power_ups.sort_by_key(|p| p.id);
    }
}
