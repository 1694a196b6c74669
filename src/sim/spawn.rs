//! Obstacle rows and power-up spawning

use glam::Vec2;
use rand::Rng;

use super::problem;
use super::state::{GameState, Obstacle, PowerUp, PowerUpKind};
use crate::consts::*;
use crate::lane_y;

/// Tries per wrong answer before falling back to sequential offsets
const WRONG_ANSWER_ATTEMPTS: u32 = 16;

/// Spawn a full row for a fresh problem: one obstacle per lane, exactly one
/// carrying the correct answer. The row enters at the right edge, pushed
/// further out if earlier obstacles are still close to it.
pub fn spawn_row(state: &mut GameState) {
    let mut rng = state.rng_state.next_rng();
    let problem = problem::generate(state.score, &state.tuning, &mut rng);
    let correct_lane = rng.random_range(0..LANE_COUNT);
    let wrong = wrong_answers(problem.answer, LANE_COUNT - 1, &mut rng);
    let x = spawn_x(state);

    let mut wrong_iter = wrong.into_iter();
    for lane in 0..LANE_COUNT {
        let correct = lane == correct_lane;
        let value = if correct {
            problem.answer
        } else {
            wrong_iter.next().unwrap_or(problem.answer + 1)
        };
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle {
            id,
            lane,
            pos: Vec2::new(x, lane_y(lane)),
            value,
            correct,
        });
    }

    log::info!(
        "Spawned row \"{}\" = {} (lane {}) at x={:.0}",
        problem.text,
        problem.answer,
        correct_lane,
        x
    );
    state.problem = Some(problem);
}

/// Decoy values near the answer, pairwise distinct and never the answer
/// itself. Falls back to sequential offsets when random picks keep
/// colliding.
pub fn wrong_answers(answer: i32, count: usize, rng: &mut impl Rng) -> Vec<i32> {
    let mut values: Vec<i32> = Vec::with_capacity(count);
    for _ in 0..count {
        let mut picked = None;
        for _ in 0..WRONG_ANSWER_ATTEMPTS {
            let magnitude: i32 = rng.random_range(1..=10);
            let candidate = if rng.random_bool(0.5) {
                answer + magnitude
            } else {
                answer - magnitude
            };
            if !values.contains(&candidate) {
                picked = Some(candidate);
                break;
            }
        }
        let value = picked.unwrap_or_else(|| {
            let mut candidate = answer + 1;
            while values.contains(&candidate) {
                candidate += 1;
            }
            candidate
        });
        values.push(value);
    }
    values
}

/// Roll for a shield pickup. At most one power-up is in flight at a time.
pub fn maybe_spawn_power_up(state: &mut GameState) {
    if !state.power_ups.is_empty() {
        return;
    }
    let denominator = state.tuning.shield_spawn_denominator.max(1);
    let mut rng = state.rng_state.next_rng();
    if !rng.random_bool(1.0 / denominator as f64) {
        return;
    }

    let lane = rng.random_range(0..LANE_COUNT);
    let x = spawn_x(state);
    let id = state.next_entity_id();
    state.power_ups.push(PowerUp {
        id,
        kind: PowerUpKind::Shield,
        lane,
        pos: Vec2::new(x, lane_y(lane)),
    });
    log::info!("Spawned shield power-up in lane {} at x={:.0}", lane, x);
}

/// Drop entities that have scrolled past the left edge
pub fn retire_offscreen(state: &mut GameState) {
    state.obstacles.retain(|o| o.pos.x > RETIRE_X);
    state.power_ups.retain(|p| p.pos.x > RETIRE_X);
}

/// Entry x for the next row: the right screen edge, or one spacing beyond
/// the rightmost obstacle still in flight, whichever is further out
fn spawn_x(state: &GameState) -> f32 {
    if state.obstacles.is_empty() {
        return SPAWN_X;
    }
    let rightmost = state
        .obstacles
        .iter()
        .map(|o| o.pos.x)
        .fold(f32::MIN, f32::max);
    SPAWN_X.max(rightmost + state.tuning.obstacle_spacing)
}
