use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use pacman_core::config::GameConfig;
use pacman_core::events::{GameCommand, GameEvent};
use pacman_core::game::Game;
use pacman_core::logging::setup_logging;
use pacman_core::map::direction::Direction;
use pacman_core::persistence::InMemoryLeaderboard;
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use thousands::Separable;
use tracing::{debug, info, warn};

/// How often the autopilot picks a new direction, in ticks.
const AUTOPILOT_PERIOD: u64 = 20;

fn main() -> anyhow::Result<()> {
    setup_logging();

    let config = GameConfig::load().context("failed to load configuration")?;
    info!(?config, "Configuration loaded");

    let leaderboard = Arc::new(InMemoryLeaderboard::new());
    let mut game = Game::new(config.clone()).context("failed to build the game")?;
    game.attach_score_repository(leaderboard.clone());

    let mut autopilot = SmallRng::seed_from_u64(config.rng_seed.rotate_left(17));
    let started = Instant::now();
    let mut ticks = 0;

    while ticks < config.max_ticks && !game.is_game_over() {
        if ticks % AUTOPILOT_PERIOD == 0 {
            if let Some(&direction) = Direction::DIRECTIONS.choose(&mut autopilot) {
                game.handle_command(GameCommand::MovePlayer(direction));
            }
        }

        game.update(config.tick_ms);
        ticks += 1;

        for event in game.drain_events() {
            log_event(&event);
        }
    }

    // Give the background submission a chance to land
    let deadline = Instant::now() + Duration::from_millis(config.submit_timeout_ms);
    while game.pending_submissions() > 0 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(10));
        game.poll_submissions();
    }
    game.poll_submissions();
    for event in game.drain_events() {
        log_event(&event);
    }

    let snapshot = game.snapshot();
    info!(
        score = %snapshot.score.separate_with_commas(),
        level = snapshot.level,
        lives = snapshot.lives,
        ticks = %ticks.separate_with_commas(),
        virtual_ms = %snapshot.time_ms.separate_with_commas(),
        elapsed = ?started.elapsed(),
        game_over = snapshot.game_over,
        victory = snapshot.victory,
        "Run finished"
    );
    if let Some(best) = leaderboard.best() {
        info!(player = %best.player_name, score = %best.score.separate_with_commas(), "Leaderboard best");
    }

    Ok(())
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::ScoreSubmissionFailed { score, reason } => {
            warn!(score, reason = %reason, "Score submission failed")
        }
        GameEvent::ModeChanged { .. } | GameEvent::GhostReleased { .. } => debug!(?event, "Game event"),
        _ => info!(?event, "Game event"),
    }
}
