//! Pac-Man's contacts with ghosts and collectibles.
//!
//! Two things touch when `|dx| < 16` and `|dy| < 16`. At most one dot and one
//! power pill are picked up per tick, the first in list order.

use smallvec::SmallVec;
use tracing::debug;

use crate::constants::{points, COLLISION_THRESHOLD};
use crate::entity::ghost::GhostPersonality;
use crate::entity::mode::Vulnerability;
use crate::entity::position::Position;
use crate::events::GameEvent;
use crate::game::state::GameEntity;

/// Everything one collision pass changed.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CollisionOutcome {
    pub ghosts_eaten: SmallVec<[GhostPersonality; 4]>,
    pub pacman_died: bool,
    /// The ghost that caught Pac-Man.
    pub killer: Option<GhostPersonality>,
    pub dot: Option<Position>,
    pub power_pill: Option<Position>,
    /// Points awarded by this pass.
    pub points: u32,
}

impl CollisionOutcome {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Checks Pac-Man against every ghost, then against the collectibles.
///
/// Ghosts are visited in list order. Vulnerable ghosts are eaten, a normal ghost
/// ends the scan and kills Pac-Man, consumed ghosts pass through harmlessly.
/// Collectibles under Pac-Man are still picked up on the tick he dies. Applying
/// a death or a power pill is left to the caller.
pub fn resolve_collisions(state: &mut GameEntity) -> CollisionOutcome {
    let mut outcome = CollisionOutcome::default();
    let pacman = state.pacman.position;

    for ghost in state.ghosts.iter_mut() {
        if !pacman.within_box(ghost.position, COLLISION_THRESHOLD) {
            continue;
        }
        match ghost.vulnerability {
            Vulnerability::Vulnerable => {
                ghost.vulnerability = Vulnerability::Consumed;
                ghost.clear_plan();
                outcome.ghosts_eaten.push(ghost.personality);
                outcome.points += points::GHOST;
            }
            Vulnerability::Normal => {
                outcome.pacman_died = true;
                outcome.killer = Some(ghost.personality);
                break;
            }
            Vulnerability::Consumed => {}
        }
    }

    if let Some(index) = state.dots.iter().position(|dot| pacman.within_box(*dot, COLLISION_THRESHOLD)) {
        outcome.dot = Some(state.dots.remove(index));
        outcome.points += points::DOT;
    }
    if let Some(index) = state
        .power_pills
        .iter()
        .position(|pill| pacman.within_box(*pill, COLLISION_THRESHOLD))
    {
        outcome.power_pill = Some(state.power_pills.remove(index));
        outcome.points += points::POWER_PILL;
    }

    state.add_score(outcome.points);
    for &ghost in &outcome.ghosts_eaten {
        debug!(ghost = ghost.as_ref(), score = state.score(), "Ghost eaten");
        state.emit(GameEvent::GhostEaten {
            ghost,
            points: points::GHOST,
        });
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::entity::mode::Mode;
    use crate::map::builder::Map;
    use crate::map::provider::Maze;
    use std::sync::Arc;

    const SPOT: Position = Position { x: 100.0, y: 100.0 };

    /// A state with Pac-Man off the graph at (100, 100) and nothing around him.
    fn isolated() -> GameEntity {
        let maze = Maze::classic().unwrap();
        let mut state = GameEntity::new(Arc::new(Map::new(&maze).unwrap()), &GameConfig::default());
        state.pacman.traversal = None;
        state.pacman.position = SPOT;
        state.dots.retain(|dot| !dot.within_box(SPOT, COLLISION_THRESHOLD));
        state.power_pills.retain(|pill| !pill.within_box(SPOT, COLLISION_THRESHOLD));
        state
    }

    #[test]
    fn test_nothing_nearby() {
        let mut state = isolated();
        assert!(resolve_collisions(&mut state).is_empty());
    }

    #[test]
    fn test_only_first_dot_in_range() {
        let mut state = isolated();
        state.dots.push(SPOT.offset(4.0, 0.0));
        state.dots.push(SPOT.offset(-4.0, 0.0));
        let before = state.dots.len();

        let outcome = resolve_collisions(&mut state);

        assert_eq!(outcome.dot, Some(SPOT.offset(4.0, 0.0)));
        assert_eq!(outcome.points, 10);
        assert_eq!(state.dots.len(), before - 1);
        assert_eq!(state.score(), 10);
    }

    #[test]
    fn test_box_edge_is_exclusive() {
        let mut state = isolated();
        state.dots.push(SPOT.offset(16.0, 0.0));
        assert_eq!(resolve_collisions(&mut state).dot, None);
    }

    #[test]
    fn test_vulnerable_ghost_is_eaten() {
        let mut state = isolated();
        state.mode = Mode::Scared;
        let pinky = state.ghost_mut(GhostPersonality::Pinky);
        pinky.position = SPOT;
        pinky.vulnerability = Vulnerability::Vulnerable;

        let outcome = resolve_collisions(&mut state);

        assert_eq!(outcome.ghosts_eaten.as_slice(), &[GhostPersonality::Pinky]);
        assert!(!outcome.pacman_died);
        assert_eq!(state.score(), 200);
        assert_eq!(state.ghost(GhostPersonality::Pinky).vulnerability, Vulnerability::Consumed);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::GhostEaten {
                ghost: GhostPersonality::Pinky,
                points: 200
            }]
        );
    }

    #[test]
    fn test_normal_ghost_kills_and_stops_scan() {
        let mut state = isolated();
        for personality in [GhostPersonality::Pinky, GhostPersonality::Clyde] {
            state.ghost_mut(personality).position = SPOT;
        }
        state.ghost_mut(GhostPersonality::Clyde).vulnerability = Vulnerability::Vulnerable;

        let outcome = resolve_collisions(&mut state);

        assert!(outcome.pacman_died);
        assert_eq!(outcome.killer, Some(GhostPersonality::Pinky));
        assert!(outcome.ghosts_eaten.is_empty());
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn test_consumed_ghost_is_harmless() {
        let mut state = isolated();
        let inky = state.ghost_mut(GhostPersonality::Inky);
        inky.position = SPOT;
        inky.vulnerability = Vulnerability::Consumed;

        assert!(resolve_collisions(&mut state).is_empty());
    }
}
