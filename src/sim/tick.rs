//! Fixed-timestep tick and host-reported collision resolution
//!
//! The host calls [`tick`] once per frame with a [`TickInput`] snapshot,
//! detects overlaps itself, and reports them back through the collide
//! functions. Everything here is deterministic given the seed and the
//! call sequence.

use super::problem;
use super::spawn;
use super::state::{GameEvent, GamePhase, GameState, PowerUpKind};

/// Input snapshot for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Switch toward lane 0; one-shot, the driver clears it after the tick
    pub up: bool,
    /// Switch away from lane 0; one-shot
    pub down: bool,
    /// Strafe left (held)
    pub left: bool,
    /// Strafe right (held)
    pub right: bool,
    /// Begin the run from the ready phase; one-shot
    pub start: bool,
    /// Begin a fresh run from game over; one-shot
    pub restart: bool,
    /// Let the built-in pilot steer (demo mode)
    pub idle_mode: bool,
}

/// Advance the simulation by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    match state.phase {
        GamePhase::Ready => {
            if input.start || input.idle_mode {
                start_run(state);
            }
            return;
        }
        GamePhase::GameOver => {
            if input.restart {
                log::info!("Restarting after game over (score {})", state.score);
                state.restart();
            }
            return;
        }
        GamePhase::Running => {}
    }

    let delta_ms = dt * 1000.0;
    state.time_ticks += 1;

    // Shield countdown. Grace from the previous tick's expiry drops first,
    // then this tick's decay may raise it again.
    state.shield.clear_grace();
    if state.shield.decay(delta_ms) {
        state.events.push(GameEvent::ShieldExpired);
        log::info!("Shield expired");
    }

    state.speed = state.tuning.speed_for_score(state.score);

    let mut input = input.clone();
    if input.idle_mode {
        autopilot(state, &mut input);
    }

    // Movement. Up wins when both lane inputs arrive in one tick.
    state.runner.lane_cooldown_ms = (state.runner.lane_cooldown_ms - delta_ms).max(0.0);
    if input.up {
        state.runner.switch_lane(-1, state.tuning.lane_cooldown_ms);
    } else if input.down {
        state.runner.switch_lane(1, state.tuning.lane_cooldown_ms);
    }
    let strafe_dir = match (input.left, input.right) {
        (true, false) => -1,
        (false, true) => 1,
        _ => 0,
    };
    state.runner.strafe(strafe_dir, dt, &state.tuning);

    // Scroll the field toward the runner
    let dx = state.speed * dt;
    for o in &mut state.obstacles {
        o.pos.x -= dx;
    }
    for p in &mut state.power_ups {
        p.pos.x -= dx;
    }

    spawn::retire_offscreen(state);
    if state.obstacles.is_empty() {
        spawn::spawn_row(state);
    }
    spawn::maybe_spawn_power_up(state);

    state.normalize_order();
}

fn start_run(state: &mut GameState) {
    state.phase = GamePhase::Running;
    spawn::spawn_row(state);
    log::info!("Run started (seed {})", state.seed);
}

/// Steer toward the correct answer, detouring to a shield pickup when one
/// sits closer than the correct obstacle
fn autopilot(state: &GameState, input: &mut TickInput) {
    let runner_x = state.runner.x;
    let correct = state
        .obstacles
        .iter()
        .filter(|o| o.correct && o.pos.x > runner_x)
        .min_by(|a, b| {
            a.pos
                .x
                .partial_cmp(&b.pos.x)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    let pickup = state
        .power_ups
        .iter()
        .filter(|p| p.pos.x > runner_x)
        .min_by(|a, b| {
            a.pos
                .x
                .partial_cmp(&b.pos.x)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    let target_lane = match (correct, pickup) {
        (Some(o), Some(p)) if p.pos.x < o.pos.x => Some(p.lane),
        (Some(o), _) => Some(o.lane),
        (None, Some(p)) => Some(p.lane),
        (None, None) => None,
    };

    if let Some(lane) = target_lane {
        input.up = lane < state.runner.lane;
        input.down = lane > state.runner.lane;
    }
}

/// Resolve a runner/obstacle overlap reported by the host. Unknown IDs and
/// reports outside the running phase are ignored, since the host's detection
/// may trail the simulation by a frame.
pub fn collide_with_obstacle(state: &mut GameState, id: u32) {
    if state.phase != GamePhase::Running {
        return;
    }
    let obstacle = match state.obstacles.iter().find(|o| o.id == id) {
        Some(o) => o.clone(),
        None => return,
    };

    if obstacle.correct {
        let tier_before = problem::tier_for_score(state.score, &state.tuning);
        if let Some(tier) = state.combo.record_hit(&state.tuning) {
            state.events.push(GameEvent::ComboTierReached {
                streak: tier.streak,
                multiplier: tier.multiplier,
            });
            log::info!(
                "Combo tier reached: streak {} pays x{}",
                tier.streak,
                tier.multiplier
            );
        }
        let points = state.combo.award(state.tuning.base_award);
        state.score += points;
        state.problems_solved += 1;
        state.best_streak = state.best_streak.max(state.combo.streak);
        state.events.push(GameEvent::CorrectHit {
            pos: obstacle.pos,
            points,
        });

        let tier_after = problem::tier_for_score(state.score, &state.tuning);
        if tier_after != tier_before {
            log::info!("Difficulty now {:?} at score {}", tier_after, state.score);
        }

        // The solved row leaves with its problem; the next one enters at once
        state.obstacles.clear();
        state.problem = None;
        spawn::spawn_row(state);
    } else if state.shield.protects() {
        state.obstacles.retain(|o| o.id != id);
        state.events.push(GameEvent::ShieldBlocked { pos: obstacle.pos });
        log::debug!("Shield absorbed wrong answer {}", obstacle.value);
    } else {
        state.combo.reset();
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::WrongHit { pos: obstacle.pos });
        state.events.push(GameEvent::GameOver { score: state.score });
        log::info!(
            "Game over: wrong answer {} ended the run at score {}",
            obstacle.value,
            state.score
        );
    }
}

/// Resolve a runner/power-up overlap reported by the host
pub fn collide_with_power_up(state: &mut GameState, id: u32) {
    if state.phase != GamePhase::Running {
        return;
    }
    let power_up = match state.power_ups.iter().position(|p| p.id == id) {
        Some(idx) => state.power_ups.remove(idx),
        None => return,
    };

    match power_up.kind {
        PowerUpKind::Shield => {
            state.shield.activate(state.tuning.shield_duration_ms);
            state.events.push(GameEvent::ShieldActivated);
            log::info!("Shield activated for {}ms", state.tuning.shield_duration_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    fn running_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        let input = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Running);
        state
    }

    fn correct_id(state: &GameState) -> u32 {
        state
            .obstacles
            .iter()
            .find(|o| o.correct)
            .map(|o| o.id)
            .unwrap()
    }

    fn wrong_id(state: &GameState) -> u32 {
        state
            .obstacles
            .iter()
            .find(|o| !o.correct)
            .map(|o| o.id)
            .unwrap()
    }

    #[test]
    fn test_start_spawns_first_row() {
        let state = running_state(3);
        assert_eq!(state.obstacles.len(), LANE_COUNT);
        assert_eq!(state.obstacles.iter().filter(|o| o.correct).count(), 1);
        assert!(state.problem.is_some());
    }

    #[test]
    fn test_ready_ignores_movement_inputs() {
        let mut state = GameState::new(3);
        let input = TickInput {
            up: true,
            left: true,
            restart: true,
            ..Default::default()
        };
        for _ in 0..10 {
            tick(&mut state, &input, SIM_DT);
        }
        assert_eq!(state.phase, GamePhase::Ready);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_correct_hit_scores_and_respawns() {
        let mut state = running_state(3);
        let id = correct_id(&state);
        collide_with_obstacle(&mut state, id);

        assert_eq!(state.score, state.tuning.base_award);
        assert_eq!(state.problems_solved, 1);
        assert_eq!(state.combo.streak, 1);
        // Fresh row for the next problem is already in
        assert_eq!(state.obstacles.len(), LANE_COUNT);
        assert!(state.problem.is_some());
        assert!(state.obstacles.iter().all(|o| o.id != id));

        let events = state.take_events();
        assert!(
            events
                .iter()
                .any(|e| matches!(e, GameEvent::CorrectHit { points: 10, .. }))
        );
    }

    #[test]
    fn test_streak_awards_follow_combo_tiers() {
        let mut state = running_state(3);
        let mut awards = Vec::new();
        let mut tiers = Vec::new();

        for _ in 0..8 {
            let id = correct_id(&state);
            collide_with_obstacle(&mut state, id);
            for event in state.take_events() {
                match event {
                    GameEvent::CorrectHit { points, .. } => awards.push(points),
                    GameEvent::ComboTierReached { streak, multiplier } => {
                        tiers.push((streak, multiplier));
                    }
                    _ => {}
                }
            }
        }

        assert_eq!(awards, vec![10, 10, 15, 15, 15, 15, 15, 20]);
        assert_eq!(tiers, vec![(3, 1.5), (8, 2.0)]);
        assert_eq!(state.score, 115);
        assert_eq!(state.best_streak, 8);
    }

    #[test]
    fn test_wrong_hit_without_shield_ends_run() {
        let mut state = running_state(3);
        for _ in 0..2 {
            let id = correct_id(&state);
            collide_with_obstacle(&mut state, id);
        }
        assert_eq!(state.score, 20);
        state.take_events();

        let id = wrong_id(&state);
        collide_with_obstacle(&mut state, id);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.combo.streak, 0);
        assert_eq!(state.combo.multiplier, 1.0);
        // The run keeps the points it earned
        assert_eq!(state.score, 20);

        let events = state.take_events();
        assert!(
            events
                .iter()
                .any(|e| matches!(e, GameEvent::WrongHit { .. }))
        );
        assert!(
            events
                .iter()
                .any(|e| matches!(e, GameEvent::GameOver { score: 20 }))
        );
    }

    #[test]
    fn test_shield_absorbs_wrong_hit() {
        let mut state = running_state(3);
        let id = correct_id(&state);
        collide_with_obstacle(&mut state, id);
        state.take_events();

        state.shield.activate(state.tuning.shield_duration_ms);
        let id = wrong_id(&state);
        collide_with_obstacle(&mut state, id);

        assert_eq!(state.phase, GamePhase::Running);
        // Streak and score ride through untouched
        assert_eq!(state.combo.streak, 1);
        assert_eq!(state.score, 10);
        // Only the absorbed obstacle is gone
        assert_eq!(state.obstacles.len(), LANE_COUNT - 1);
        assert!(
            state
                .take_events()
                .iter()
                .any(|e| matches!(e, GameEvent::ShieldBlocked { .. }))
        );
    }

    #[test]
    fn test_game_over_freezes_the_world() {
        let mut state = running_state(3);
        let id = wrong_id(&state);
        collide_with_obstacle(&mut state, id);
        assert_eq!(state.phase, GamePhase::GameOver);
        state.take_events();

        let ticks_before = state.time_ticks;
        let xs_before: Vec<f32> = state.obstacles.iter().map(|o| o.pos.x).collect();
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.time_ticks, ticks_before);
        let xs_after: Vec<f32> = state.obstacles.iter().map(|o| o.pos.x).collect();
        assert_eq!(xs_before, xs_after);

        // Late collision reports land in the void
        let id = correct_id(&state);
        collide_with_obstacle(&mut state, id);
        assert_eq!(state.score, 0);
        assert!(state.take_events().is_empty());

        let input = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.seed, 4);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_shield_expiry_protects_through_the_tick() {
        let mut state = running_state(3);
        state.shield.activate(10.0);

        // One 16.7ms tick crosses zero
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(!state.shield.active);
        assert!(
            state
                .take_events()
                .iter()
                .any(|e| matches!(e, GameEvent::ShieldExpired))
        );

        // A collision resolved this same frame is still absorbed
        let id = wrong_id(&state);
        collide_with_obstacle(&mut state, id);
        assert_eq!(state.phase, GamePhase::Running);

        // The next tick drops the grace; now a wrong hit ends the run
        tick(&mut state, &TickInput::default(), SIM_DT);
        let id = wrong_id(&state);
        collide_with_obstacle(&mut state, id);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_lane_cooldown_blocks_rapid_switches() {
        let mut state = running_state(5);
        let dt = 0.016;

        let down = TickInput {
            down: true,
            ..Default::default()
        };
        let up = TickInput {
            up: true,
            ..Default::default()
        };

        tick(&mut state, &down, dt);
        assert_eq!(state.runner.lane, START_LANE + 1);

        // Queued immediately, refused while the cooldown runs
        tick(&mut state, &up, dt);
        assert_eq!(state.runner.lane, START_LANE + 1);

        // 150ms at 16ms ticks clears within nine more
        for _ in 0..9 {
            tick(&mut state, &up, dt);
        }
        assert_eq!(state.runner.lane, START_LANE);
    }

    #[test]
    fn test_opposing_strafe_inputs_cancel() {
        let mut state = running_state(3);
        let x0 = state.runner.x;
        let input = TickInput {
            left: true,
            right: true,
            ..Default::default()
        };
        for _ in 0..30 {
            tick(&mut state, &input, SIM_DT);
        }
        assert_eq!(state.runner.x, x0);
    }

    #[test]
    fn test_scrolled_off_row_is_replaced() {
        let mut state = running_state(11);
        let max_first = state.obstacles.iter().map(|o| o.id).max().unwrap();

        // 850px of travel at 100px/s is 510 ticks; give it a few more
        for _ in 0..520 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }

        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.obstacles.len(), LANE_COUNT);
        assert!(state.obstacles.iter().all(|o| o.id > max_first));
        assert!(state.obstacles.iter().all(|o| o.pos.x > 700.0));
        // Letting a row escape costs nothing
        assert_eq!(state.score, 0);
        assert_eq!(state.combo.streak, 0);
    }

    #[test]
    fn test_power_up_collection_activates_shield() {
        let mut state = running_state(9);
        state.tuning.shield_spawn_denominator = 1;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.power_ups.len(), 1);

        let id = state.power_ups[0].id;
        collide_with_power_up(&mut state, id);

        assert!(state.shield.active);
        assert!(state.power_ups.is_empty());
        assert!(
            state
                .take_events()
                .iter()
                .any(|e| matches!(e, GameEvent::ShieldActivated))
        );

        // Stale report for the consumed pickup is ignored
        collide_with_power_up(&mut state, id);
        assert!(
            !state
                .take_events()
                .iter()
                .any(|e| matches!(e, GameEvent::ShieldActivated))
        );
    }

    #[test]
    fn test_shield_pickups_do_spawn() {
        let mut state = running_state(7);
        state.tuning.shield_spawn_denominator = 10;
        let mut saw_power_up = false;
        for _ in 0..1000 {
            tick(&mut state, &TickInput::default(), SIM_DT);
            saw_power_up |= !state.power_ups.is_empty();
        }
        assert!(saw_power_up);
    }

    #[test]
    fn test_idle_mode_steers_to_correct_lane() {
        let mut state = running_state(13);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..60 {
            tick(&mut state, &input, SIM_DT);
        }
        assert_eq!(Some(state.runner.lane), state.correct_lane());
    }

    #[test]
    fn test_speed_tracks_score() {
        let mut state = running_state(3);
        assert_eq!(state.speed, 100.0);
        state.score = 150;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.speed, 160.0);
    }

    #[test]
    fn test_take_events_drains_queue() {
        let mut state = running_state(3);
        let id = correct_id(&state);
        collide_with_obstacle(&mut state, id);
        assert!(!state.take_events().is_empty());
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn test_identical_scripts_replay_identically() {
        let script = |state: &mut GameState| {
            for i in 0..600u32 {
                let input = TickInput {
                    up: i % 90 == 10,
                    down: i % 90 == 55,
                    left: (i / 60) % 2 == 0,
                    right: (i / 60) % 2 == 1,
                    ..Default::default()
                };
                tick(state, &input, SIM_DT);
                if i % 100 == 99 {
                    let id = correct_id(state);
                    collide_with_obstacle(state, id);
                }
            }
        };

        let mut a = running_state(42);
        let mut b = running_state(42);
        script(&mut a);
        script(&mut b);

        assert!(a.score > 0);
        let ja = serde_json::to_string(&a).unwrap();
        let jb = serde_json::to_string(&b).unwrap();
        assert_eq!(ja, jb);
    }
}
