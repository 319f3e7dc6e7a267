//! The single mutable game instance.

use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use strum::EnumCount;
use tracing::debug;

use crate::config::GameConfig;
use crate::entity::ghost::{GhostEntity, GhostPersonality};
use crate::entity::mode::Mode;
use crate::entity::pacman::PacmanEntity;
use crate::entity::position::Position;
use crate::events::GameEvent;
use crate::game::scheduler::{Scheduler, TaskHandle};
use crate::map::builder::{LevelMaps, Map};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    /// Terminal. `victory` is set when every level was cleared.
    GameOver { victory: bool },
}

/// Everything that changes while a game is played.
///
/// Holds exactly one Pac-Man and one ghost per personality, in
/// [`GhostPersonality::ALL`] order. It also owns every pending deferred task, so
/// dropping or replacing an instance takes its schedule with it.
pub struct GameEntity {
    pub pacman: PacmanEntity,
    pub ghosts: [GhostEntity; GhostPersonality::COUNT],
    pub lives: u8,
    score: u32,
    pub mode: Mode,
    /// The mode a scared phase interrupted.
    pub previous_mode: Option<Mode>,
    /// Time the interrupted mode had left when it was suspended.
    pub suspended_remaining_ms: Option<u64>,
    /// The current level's map.
    pub map: Arc<Map>,
    levels: LevelMaps,
    pub dots: Vec<Position>,
    pub power_pills: Vec<Position>,
    /// The one outstanding mode timer.
    pub mode_timer: Option<TaskHandle>,
    pub scheduler: Scheduler,
    /// Virtual clock, in milliseconds since this instance was created.
    pub now_ms: u64,
    pub level: u8,
    pub max_level_reached: u8,
    pub status: GameStatus,
    pub tick_count: u64,
    pub rng: SmallRng,
    pub config: GameConfig,
    events: Vec<GameEvent>,
}

impl GameEntity {
    /// Creates a fresh level-one instance that plays every level on `map`.
    pub fn new(map: Arc<Map>, config: &GameConfig) -> Self {
        Self::with_levels(LevelMaps::single(map), config)
    }

    /// Creates a fresh level-one instance. Nothing is scheduled yet.
    pub fn with_levels(levels: LevelMaps, config: &GameConfig) -> Self {
        let map = levels.for_level(1);
        let mode = Mode::Scatter;
        let ghost_speed = config.pacman_speed * mode.speed_multiplier();
        let ghosts = GhostPersonality::ALL.map(|p| GhostEntity::new(p, map.ghost_home(p), mode, ghost_speed));
        let pacman = PacmanEntity::new(
            map.pacman_spawn,
            Some(map.spawn_traversal),
            config.pacman_speed,
        );

        debug!(
            lives = config.starting_lives,
            dots = map.dots.len(),
            power_pills = map.power_pills.len(),
            "Game state created"
        );

        Self {
            pacman,
            ghosts,
            lives: config.starting_lives,
            score: 0,
            mode,
            previous_mode: None,
            suspended_remaining_ms: None,
            dots: map.dots.clone(),
            power_pills: map.power_pills.clone(),
            map,
            levels,
            mode_timer: None,
            scheduler: Scheduler::new(),
            now_ms: 0,
            level: 1,
            max_level_reached: 1,
            status: GameStatus::Playing,
            tick_count: 0,
            rng: SmallRng::seed_from_u64(config.rng_seed),
            config: config.clone(),
            events: Vec::new(),
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Adds points. The score never decreases.
    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Takes a life away, stopping at zero. Returns the lives left.
    pub fn lose_life(&mut self) -> u8 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }

    pub fn ghost(&self, personality: GhostPersonality) -> &GhostEntity {
        &self.ghosts[personality.index()]
    }

    pub fn ghost_mut(&mut self, personality: GhostPersonality) -> &mut GhostEntity {
        &mut self.ghosts[personality.index()]
    }

    /// Ghost speed for a mode, in pixels per second.
    pub fn ghost_speed(&self, mode: Mode) -> f32 {
        self.config.pacman_speed * mode.speed_multiplier()
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.status, GameStatus::GameOver { .. })
    }

    pub fn level_cleared(&self) -> bool {
        self.dots.is_empty() && self.power_pills.is_empty()
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Switches to `level`, loading its map and a full set of its collectibles.
    pub fn install_level(&mut self, level: u8) {
        self.level = level;
        self.max_level_reached = self.max_level_reached.max(level);
        self.map = self.levels.for_level(level);
        self.reload_collectibles();
        debug!(
            level,
            nodes = self.map.graph.node_count(),
            dots = self.dots.len(),
            "Level map installed"
        );
    }

    /// Restores the level's dots and power pills.
    pub fn reload_collectibles(&mut self) {
        self.dots = self.map.dots.clone();
        self.power_pills = self.map.power_pills.clone();
    }

    /// Puts Pac-Man on the spawn point and every ghost back in the house.
    pub fn reset_positions(&mut self) {
        self.pacman.respawn(self.map.pacman_spawn, Some(self.map.spawn_traversal));
        for ghost in self.ghosts.iter_mut() {
            ghost.home = self.map.ghost_home(ghost.personality);
            ghost.send_home();
        }
    }
}
