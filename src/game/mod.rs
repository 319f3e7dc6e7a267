//! The game orchestrator: owns one [`GameEntity`] and drives its tick loop.
//!
//! Time only moves through [`Game::advance`]. Deferred tasks fire there, in due
//! order, between ticks; [`Game::tick`] moves entities and resolves collisions
//! without touching the clock.

use std::sync::Arc;
use std::time::Duration;

use smallvec::SmallVec;
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::entity::ghost::GhostPersonality;
use crate::error::{GameError, GameResult};
use crate::events::{GameCommand, GameEvent};
use crate::formatter;
use crate::map::builder::{LevelMaps, Map};
use crate::map::direction::Direction;
use crate::map::provider::{Maze, MazeProvider};
use crate::persistence::{ScoreDispatcher, ScoreRepository, ScoreSubmission, SubmissionOutcome};
use crate::systems::collision;
use crate::systems::lifecycle;
use crate::systems::movement::{self, GhostStep};
use crate::systems::targeting::{GhostController, TargetContext};

use self::snapshot::GameSnapshot;
use self::state::GameEntity;

pub mod scheduler;
pub mod snapshot;
pub mod state;

/// The `Game` struct is the main entry point for the engine.
///
/// It owns the current game instance, the static maps of every level, and the
/// optional score submission pipeline.
pub struct Game {
    state: GameEntity,
    levels: LevelMaps,
    config: GameConfig,
    dispatcher: Option<ScoreDispatcher>,
    paused: bool,
    /// Whether this instance's final score was already handed off.
    score_submitted: bool,
}

impl Game {
    /// Creates a game on the built-in level layouts.
    pub fn new(config: GameConfig) -> GameResult<Game> {
        let mazes = Maze::level_set()?;
        let providers: Vec<&dyn MazeProvider> = mazes.iter().map(|maze| maze as &dyn MazeProvider).collect();
        Self::with_mazes(&providers, config)
    }

    /// Creates a game that plays every level on one maze. The provider is only read here.
    pub fn with_maze(provider: &dyn MazeProvider, config: GameConfig) -> GameResult<Game> {
        Self::with_mazes(&[provider], config)
    }

    /// Creates a game with one maze per level; levels past the last maze reuse it.
    pub fn with_mazes(providers: &[&dyn MazeProvider], config: GameConfig) -> GameResult<Game> {
        if config.tick_ms == 0 {
            return Err(GameError::InvalidState("tick length must be positive".to_string()));
        }
        if config.max_levels == 0 {
            return Err(GameError::InvalidState("at least one level is required".to_string()));
        }

        let levels = LevelMaps::build(providers)?;
        let state = Self::fresh_state(&levels, &config);
        info!(
            layouts = levels.len(),
            nodes = state.map.graph.node_count(),
            dots = state.map.dots.len(),
            "Game created"
        );

        Ok(Self {
            state,
            levels,
            config,
            dispatcher: None,
            paused: false,
            score_submitted: false,
        })
    }

    fn fresh_state(levels: &LevelMaps, config: &GameConfig) -> GameEntity {
        let mut state = GameEntity::with_levels(levels.clone(), config);
        lifecycle::begin_level(&mut state);
        Self::run_due_tasks(&mut state);
        state
    }

    /// Routes a score repository behind a background dispatcher.
    pub fn attach_score_repository(&mut self, repository: Arc<dyn ScoreRepository>) {
        let timeout = Duration::from_millis(self.config.submit_timeout_ms);
        self.dispatcher = Some(ScoreDispatcher::new(repository, timeout));
    }

    pub fn handle_command(&mut self, command: GameCommand) {
        match command {
            GameCommand::MovePlayer(direction) => self.request_direction(direction),
            GameCommand::Restart => self.restart(),
            GameCommand::TogglePause => {
                self.paused = !self.paused;
                info!(paused = self.paused, "Pause toggled");
            }
        }
    }

    /// Buffers a direction for Pac-Man to take at the next opportunity.
    pub fn request_direction(&mut self, direction: Direction) {
        if self.state.is_game_over() {
            return;
        }
        self.state.pacman.request_direction(direction);
    }

    /// Moves the virtual clock forward, firing every task that falls due on the way.
    ///
    /// Each task runs with the clock set to its own deadline, so anything it
    /// schedules is timed from that exact moment.
    pub fn advance(&mut self, ms: u64) {
        self.poll_submissions();
        if self.paused || self.state.is_game_over() {
            return;
        }

        let target = self.state.now_ms.saturating_add(ms);
        while let Some((due, task)) = self.state.scheduler.pop_due(target) {
            self.state.now_ms = due.max(self.state.now_ms);
            lifecycle::run_task(&mut self.state, task);
        }
        self.state.now_ms = target;
        formatter::set_game_clock(target);
        self.finish_if_over();
    }

    /// Runs one gameplay tick of the configured length.
    pub fn tick(&mut self) -> GameSnapshot {
        self.step(self.config.tick_ms)
    }

    /// Advances the clock by `ms` and then runs a tick covering the same span.
    pub fn update(&mut self, ms: u64) -> GameSnapshot {
        self.advance(ms);
        self.step(ms)
    }

    fn step(&mut self, dt_ms: u64) -> GameSnapshot {
        if !self.paused && !self.state.is_game_over() {
            self.state.tick_count += 1;
            formatter::record_tick(self.state.now_ms);

            if self.state.pacman.alive {
                self.simulate(dt_ms as f32 / 1000.0);
            }
            Self::run_due_tasks(&mut self.state);
            self.finish_if_over();
        }
        self.poll_submissions();
        self.snapshot()
    }

    /// Movement, then collisions, then whatever they set off.
    fn simulate(&mut self, dt: f32) {
        let state = &mut self.state;
        let map = Arc::clone(&state.map);

        movement::move_pacman(&map.graph, &mut state.pacman, dt);

        let controller = GhostController::new(&map);
        let context = TargetContext {
            pacman_position: state.pacman.position,
            pacman_direction: state.pacman.direction,
            mode: state.mode,
        };
        let mut returned: SmallVec<[GhostPersonality; 4]> = SmallVec::new();
        for ghost in state.ghosts.iter_mut() {
            let step = movement::move_ghost(&map, &controller, ghost, &context, dt, &mut state.rng);
            if step == GhostStep::ReturnedHome {
                returned.push(ghost.personality);
            }
        }
        for personality in returned {
            lifecycle::return_ghost_home(state, personality);
        }

        let outcome = collision::resolve_collisions(state);
        if outcome.pacman_died {
            debug!(killer = ?outcome.killer, position = %state.pacman.position, "Caught");
            lifecycle::kill_pacman(state);
        } else if outcome.power_pill.is_some() {
            lifecycle::activate_scared(state);
        }

        if !state.is_game_over() && state.level_cleared() {
            lifecycle::complete_level(state);
        }
    }

    /// Fires tasks already due at the current time, such as zero-delay releases.
    fn run_due_tasks(state: &mut GameEntity) {
        while let Some((_, task)) = state.scheduler.pop_due(state.now_ms) {
            lifecycle::run_task(state, task);
        }
    }

    fn finish_if_over(&mut self) {
        if !self.state.is_game_over() || self.score_submitted {
            return;
        }
        self.score_submitted = true;

        let Some(dispatcher) = self.dispatcher.as_mut() else {
            debug!(score = self.state.score(), "No score repository attached");
            return;
        };
        let submission = ScoreSubmission {
            score: self.state.score(),
            player_name: self.config.player_name.clone(),
            max_level_reached: self.state.max_level_reached,
        };
        if let Some(outcome) = dispatcher.submit(submission) {
            self.report(outcome);
        }
    }

    /// Turns finished submissions into events. Never blocks.
    pub fn poll_submissions(&mut self) {
        let Some(dispatcher) = self.dispatcher.as_mut() else {
            return;
        };
        for outcome in dispatcher.poll() {
            self.report(outcome);
        }
    }

    fn report(&mut self, outcome: SubmissionOutcome) {
        let event = match outcome {
            SubmissionOutcome::Submitted(submission) => GameEvent::ScoreSubmitted {
                score: submission.score,
            },
            SubmissionOutcome::Failed { submission, error } => GameEvent::ScoreSubmissionFailed {
                score: submission.score,
                reason: error.to_string(),
            },
        };
        self.state.emit(event);
    }

    /// Throws the current instance away and starts over at level one.
    ///
    /// Everything the old instance scheduled is cancelled before the new one exists.
    pub fn restart(&mut self) {
        let cancelled = self.state.scheduler.cancel_all();
        self.state.mode_timer = None;
        let carried = self.state.drain_events();

        self.state = Self::fresh_state(&self.levels, &self.config);
        for event in carried {
            if matches!(
                event,
                GameEvent::ScoreSubmitted { .. } | GameEvent::ScoreSubmissionFailed { .. }
            ) {
                self.state.emit(event);
            }
        }
        self.paused = false;
        self.score_submitted = false;
        info!(cancelled, "Game restarted");
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(&self.state, self.paused)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    pub fn state(&self) -> &GameEntity {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameEntity {
        &mut self.state
    }

    /// The current level's map.
    pub fn map(&self) -> &Map {
        &self.state.map
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn now_ms(&self) -> u64 {
        self.state.now_ms
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    /// Score submissions still in flight.
    pub fn pending_submissions(&self) -> usize {
        self.dispatcher.as_ref().map_or(0, ScoreDispatcher::pending)
    }
}
