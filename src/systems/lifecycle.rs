//! The mode state machine and the death, respawn and release lifecycle.
//!
//! Every mode change goes through [`replace_mode_timer`], which cancels the
//! outstanding timer before scheduling its successor, so a game never has two
//! live mode timers.

use tracing::{debug, info, warn};

use crate::constants::delays;
use crate::entity::ghost::GhostPersonality;
use crate::entity::mode::{Mode, Vulnerability};
use crate::events::GameEvent;
use crate::game::scheduler::Task;
use crate::game::state::{GameEntity, GameStatus};

/// Runs a task popped from the scheduler.
pub fn run_task(state: &mut GameEntity, task: Task) {
    if state.is_game_over() {
        return;
    }
    match task {
        Task::ModeExpiry => expire_mode(state),
        Task::RespawnPacman => respawn_pacman(state),
        Task::ReleaseGhost(personality) => release_ghost(state, personality),
    }
}

/// Starts a level: scatter first, then ghosts released on the staggered schedule.
pub fn begin_level(state: &mut GameEntity) {
    state.previous_mode = None;
    state.suspended_remaining_ms = None;
    set_mode(state, Mode::Scatter);
    replace_mode_timer(state, Mode::Scatter.duration_ms());
    schedule_staggered_release(state);
    info!(level = state.level, "Level started");
}

/// Cancels the outstanding mode timer and schedules a new one `delay_ms` from now.
pub fn replace_mode_timer(state: &mut GameEntity, delay_ms: u64) {
    if let Some(handle) = state.mode_timer.take() {
        state.scheduler.cancel(handle);
    }
    state.mode_timer = Some(state.scheduler.schedule(state.now_ms, delay_ms, Task::ModeExpiry));
}

/// Switches the global mode and brings every ghost in line with it.
///
/// Leaving scared turns still-vulnerable ghosts back to normal; consumed ghosts
/// stay consumed until they reach home.
fn set_mode(state: &mut GameEntity, mode: Mode) {
    let from = state.mode;
    let speed = state.ghost_speed(mode);
    state.mode = mode;

    for ghost in state.ghosts.iter_mut() {
        ghost.mode = mode;
        ghost.speed = speed;
        if mode != Mode::Scared && ghost.vulnerability == Vulnerability::Vulnerable {
            ghost.vulnerability = Vulnerability::Normal;
        }
    }

    if from != mode {
        debug!(from = from.as_ref(), to = mode.as_ref(), at_ms = state.now_ms, "Mode changed");
        state.emit(GameEvent::ModeChanged { from, to: mode });
    }
}

/// A power pill was eaten: suspend the current phase and turn every ghost vulnerable.
///
/// Eating another pill while already scared restarts the scared phase but keeps
/// the originally interrupted mode and its remaining time.
pub fn activate_scared(state: &mut GameEntity) {
    if state.mode != Mode::Scared {
        let remaining = state
            .mode_timer
            .and_then(|handle| state.scheduler.deadline(handle))
            .map(|due| due.saturating_sub(state.now_ms))
            .unwrap_or_else(|| state.mode.duration_ms());
        state.previous_mode = Some(state.mode);
        state.suspended_remaining_ms = Some(remaining);
    }

    set_mode(state, Mode::Scared);
    for ghost in state.ghosts.iter_mut() {
        ghost.vulnerability = Vulnerability::Vulnerable;
        ghost.clear_plan();
    }
    replace_mode_timer(state, Mode::Scared.duration_ms());

    info!(
        resume = ?state.previous_mode,
        remaining_ms = ?state.suspended_remaining_ms,
        "Scared mode activated"
    );
    state.emit(GameEvent::ScaredActivated);
}

/// The mode timer fired: resume an interrupted phase or continue the alternation.
pub fn expire_mode(state: &mut GameEntity) {
    state.mode_timer = None;

    let (next, duration) = match (state.mode, state.previous_mode.take()) {
        (Mode::Scared, Some(previous)) => {
            let remaining = state
                .suspended_remaining_ms
                .take()
                .unwrap_or_else(|| previous.duration_ms());
            (previous, remaining)
        }
        (current, _) => {
            let next = current.next_in_cycle();
            (next, next.duration_ms())
        }
    };

    set_mode(state, next);
    replace_mode_timer(state, duration);
}

/// Pac-Man touched a lethal ghost.
pub fn kill_pacman(state: &mut GameEntity) {
    if !state.pacman.alive {
        return;
    }

    state.pacman.die();
    let lives_remaining = state.lose_life();
    info!(lives_remaining, score = state.score(), "Pac-Man died");
    state.emit(GameEvent::PacmanDied { lives_remaining });

    if lives_remaining == 0 {
        end_game(state, false);
    } else {
        state
            .scheduler
            .schedule(state.now_ms, delays::RESPAWN_MS, Task::RespawnPacman);
    }
}

/// Brings Pac-Man back on the spawn point and restarts the ghost releases.
pub fn respawn_pacman(state: &mut GameEntity) {
    state.reset_positions();
    debug!(at_ms = state.now_ms, "Pac-Man respawned");
    state.emit(GameEvent::PacmanRespawned);
    schedule_staggered_release(state);
}

/// Schedules the four ghost releases, one every release interval, in ghost list order.
///
/// Any release still pending from an earlier schedule is cancelled first.
pub fn schedule_staggered_release(state: &mut GameEntity) {
    state
        .scheduler
        .cancel_where(|task| matches!(task, Task::ReleaseGhost(_)));

    for (index, personality) in GhostPersonality::ALL.into_iter().enumerate() {
        let delay = delays::RELEASE_INTERVAL_MS * index as u64;
        state
            .scheduler
            .schedule(state.now_ms, delay, Task::ReleaseGhost(personality));
    }
}

/// Lets a ghost out onto the house exit.
pub fn release_ghost(state: &mut GameEntity, personality: GhostPersonality) {
    let exit = state.map.house_exit;
    let exit_position = state.map.house_exit_position();
    let scared = state.mode == Mode::Scared;
    let ghost = state.ghost_mut(personality);

    if ghost.entered_maze {
        return;
    }

    ghost.enter_maze(exit, exit_position);
    if !scared || ghost.vulnerability.is_consumed() {
        ghost.vulnerability = Vulnerability::Normal;
    }

    debug!(ghost = personality.as_ref(), vulnerability = ghost.vulnerability.as_ref(), "Ghost released");
    state.emit(GameEvent::GhostReleased { ghost: personality });
}

/// A consumed ghost reached the house: park it and let it out again shortly.
pub fn return_ghost_home(state: &mut GameEntity, personality: GhostPersonality) {
    state.ghost_mut(personality).send_home();
    let delay = state.config.consumed_respawn_ms;
    state
        .scheduler
        .schedule(state.now_ms, delay, Task::ReleaseGhost(personality));
    debug!(ghost = personality.as_ref(), delay_ms = delay, "Ghost returned home");
}

/// Every collectible is gone: move to the next level or finish the game.
pub fn complete_level(state: &mut GameEntity) {
    let level = state.level;
    info!(level, score = state.score(), "Level complete");
    state.emit(GameEvent::LevelComplete { level });

    if level >= state.config.max_levels {
        end_game(state, true);
        return;
    }

    let cancelled = state.scheduler.cancel_all();
    state.mode_timer = None;
    state.install_level(level + 1);
    state.reset_positions();
    debug!(cancelled, level = state.level, "Level re-initialized");
    begin_level(state);
}

/// Enters the terminal state. Nothing scheduled survives.
pub fn end_game(state: &mut GameEntity, victory: bool) {
    let cancelled = state.scheduler.cancel_all();
    state.mode_timer = None;
    state.status = GameStatus::GameOver { victory };
    if cancelled > 0 && !victory {
        warn!(cancelled, "Pending tasks dropped at game over");
    }
    info!(score = state.score(), victory, level = state.level, "Game over");
    state.emit(GameEvent::GameOver {
        score: state.score(),
        victory,
    });
}
