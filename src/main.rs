//! Math Runner entry point
//!
//! Headless demo driver: the built-in pilot plays a few runs and the
//! leaderboard is printed at the end. Real hosts embed the `sim` module and
//! bring their own rendering, input, and overlap detection; the naive
//! same-lane box check below stands in for the latter.
//!
//! Usage: `math-runner [seed] [tuning.json]`

use std::time::{SystemTime, UNIX_EPOCH};

use math_runner::consts::*;
use math_runner::sim::{
    GameEvent, GamePhase, GameState, TickInput, collide_with_obstacle, collide_with_power_up,
    tick,
};
use math_runner::{HighScores, Tuning};

/// Half-widths for the demo's overlap check
const RUNNER_HALF: f32 = 30.0;
const OBSTACLE_HALF: f32 = 30.0;

const RUNS: usize = 3;
/// Five minutes of simulated time per run
const MAX_TICKS_PER_RUN: u64 = 60 * 60 * 5;

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or_else(now_millis);
    log::info!("Math Runner demo starting with seed {}", seed);

    let mut state = GameState::with_tuning(seed, load_tuning());
    let mut scores = HighScores::new();

    for run in 1..=RUNS {
        play_run(&mut state);
        log::info!(
            "Run {}: score {}, {} solved, best streak {}",
            run,
            state.score,
            state.problems_solved,
            state.best_streak
        );
        scores.add_score(state.score, state.problems_solved, state.best_streak);

        if state.phase == GamePhase::GameOver {
            let input = TickInput {
                restart: true,
                ..Default::default()
            };
            tick(&mut state, &input, SIM_DT);
        } else {
            // Tick cap reached; cut the run short
            state.restart();
        }
    }

    println!("Leaderboard after {} runs:", RUNS);
    for (i, entry) in scores.entries.iter().enumerate() {
        println!(
            "  {:>2}. {:>6} pts  {:>3} solved  best streak {}",
            i + 1,
            entry.score,
            entry.problems_solved,
            entry.best_streak
        );
    }
}

/// Drive one run with the built-in pilot until it ends or hits the tick cap
fn play_run(state: &mut GameState) {
    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    for _ in 0..MAX_TICKS_PER_RUN {
        tick(state, &input, SIM_DT);

        // Power-ups first, so a shield grabbed this frame covers a wrong
        // answer hit in the same frame
        let pickup_ids: Vec<u32> = state
            .power_ups
            .iter()
            .filter(|p| overlaps_runner(state, p.lane, p.pos.x))
            .map(|p| p.id)
            .collect();
        for id in pickup_ids {
            collide_with_power_up(state, id);
        }

        let obstacle_ids: Vec<u32> = state
            .obstacles
            .iter()
            .filter(|o| overlaps_runner(state, o.lane, o.pos.x))
            .map(|o| o.id)
            .collect();
        for id in obstacle_ids {
            collide_with_obstacle(state, id);
        }

        report(state.take_events());

        if state.phase == GamePhase::GameOver {
            return;
        }
    }
    log::warn!("Run capped at {} ticks", MAX_TICKS_PER_RUN);
}

fn overlaps_runner(state: &GameState, lane: usize, x: f32) -> bool {
    lane == state.runner.lane && (x - state.runner.x).abs() < RUNNER_HALF + OBSTACLE_HALF
}

fn report(events: Vec<GameEvent>) {
    for event in events {
        match event {
            GameEvent::CorrectHit { points, .. } => log::info!("Correct! +{} points", points),
            GameEvent::WrongHit { .. } => log::info!("Wrong answer"),
            GameEvent::ShieldBlocked { .. } => log::info!("Shield absorbed a wrong answer"),
            GameEvent::ComboTierReached { streak, multiplier } => {
                log::info!("Combo x{} at streak {}", multiplier, streak)
            }
            GameEvent::ShieldActivated => log::info!("Shield up"),
            GameEvent::ShieldExpired => log::info!("Shield down"),
            GameEvent::GameOver { score } => log::info!("Game over with {} points", score),
        }
    }
}

/// Optional tuning overrides from a JSON file given as the second argument
fn load_tuning() -> Tuning {
    let path = match std::env::args().nth(2) {
        Some(path) => path,
        None => return Tuning::default(),
    };
    let json = match std::fs::read_to_string(&path) {
        Ok(json) => json,
        Err(e) => {
            log::warn!("Could not read {}: {}", path, e);
            return Tuning::default();
        }
    };
    match Tuning::from_json(&json) {
        Ok(tuning) => {
            log::info!("Loaded tuning from {}", path);
            tuning
        }
        Err(e) => {
            log::warn!("Ignoring tuning file {}: {}", path, e);
            Tuning::default()
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
