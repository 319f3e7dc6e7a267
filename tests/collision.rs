use pacman_core::entity::ghost::GhostPersonality;
use pacman_core::entity::mode::{Mode, Vulnerability};
use pacman_core::events::GameEvent;
use pacman_core::game::Game;
use pacman_core::systems::lifecycle;
use speculoos::prelude::*;

mod common;

use common::SPOT;

fn scared_game() -> Game {
    let mut game = common::new_game();
    common::isolate_pacman(&mut game, SPOT);
    lifecycle::activate_scared(game.state_mut());
    game.drain_events();
    game
}

#[test]
fn test_vulnerable_ghost_is_consumed_for_200() {
    let mut game = scared_game();
    common::park_ghost(&mut game, GhostPersonality::Pinky, SPOT, Vulnerability::Vulnerable);
    let before = game.snapshot();

    let after = game.tick();

    assert_that(&after.ghost(GhostPersonality::Pinky).vulnerability).is_equal_to(Vulnerability::Consumed);
    assert_that(&after.score).is_equal_to(before.score + 200);
    assert_that(&after.pacman.alive).is_true();
    assert_that(&after.lives).is_equal_to(before.lives);
    assert_that(&game.drain_events()).is_equal_to(vec![GameEvent::GhostEaten {
        ghost: GhostPersonality::Pinky,
        points: 200,
    }]);
}

#[test]
fn test_normal_ghost_kills() {
    let mut game = common::new_game();
    common::isolate_pacman(&mut game, SPOT);
    common::park_ghost(&mut game, GhostPersonality::Pinky, SPOT, Vulnerability::Normal);
    assert_that(&game.state().mode).is_not_equal_to(Mode::Scared);
    let before = game.snapshot();

    let after = game.tick();

    assert_that(&after.pacman.alive).is_false();
    assert_that(&after.lives).is_equal_to(before.lives - 1);
    assert_that(&after.score).is_equal_to(before.score);
}

#[test]
fn test_consumed_ghost_passes_through() {
    let mut game = scared_game();
    common::park_ghost(&mut game, GhostPersonality::Inky, SPOT, Vulnerability::Consumed);

    let after = game.tick();

    assert_that(&after.pacman.alive).is_true();
    assert_that(&after.score).is_equal_to(0);
    assert_that(&after.ghost(GhostPersonality::Inky).vulnerability).is_equal_to(Vulnerability::Consumed);
}

#[test]
fn test_several_vulnerable_ghosts_in_one_tick() {
    let mut game = scared_game();
    for personality in [GhostPersonality::Pinky, GhostPersonality::Inky, GhostPersonality::Clyde] {
        common::park_ghost(&mut game, personality, SPOT.offset(3.0, -3.0), Vulnerability::Vulnerable);
    }

    let after = game.tick();

    assert_that(&after.score).is_equal_to(600);
    let eaten = game
        .drain_events()
        .into_iter()
        .filter(|event| matches!(event, GameEvent::GhostEaten { .. }))
        .count();
    assert_that(&eaten).is_equal_to(3);
}

#[test]
fn test_scan_stops_at_first_lethal_ghost() {
    let mut game = common::new_game();
    common::isolate_pacman(&mut game, SPOT);
    common::park_ghost(&mut game, GhostPersonality::Pinky, SPOT, Vulnerability::Normal);
    // Out of place outside scared mode, but it shows the scan never got this far
    common::park_ghost(&mut game, GhostPersonality::Clyde, SPOT, Vulnerability::Vulnerable);

    let after = game.tick();

    assert_that(&after.pacman.alive).is_false();
    assert_that(&after.ghost(GhostPersonality::Clyde).vulnerability).is_equal_to(Vulnerability::Vulnerable);
}

#[test]
fn test_one_dot_per_tick() {
    let mut game = common::new_game();
    common::isolate_pacman(&mut game, SPOT);
    let state = game.state_mut();
    state.dots.push(SPOT.offset(8.0, 0.0));
    state.dots.push(SPOT.offset(0.0, -8.0));
    state.dots.push(SPOT.offset(-15.5, 15.5));
    let dots = state.dots.len();

    let first = game.tick();
    assert_that(&first.score).is_equal_to(10);
    assert_that(&first.dots_remaining).is_equal_to(dots - 1);

    let second = game.tick();
    let third = game.tick();
    let fourth = game.tick();
    assert_that(&second.score).is_equal_to(20);
    assert_that(&third.score).is_equal_to(30);
    assert_that(&fourth.score).is_equal_to(30);
    assert_that(&fourth.dots_remaining).is_equal_to(dots - 3);
}

#[test]
fn test_box_test_is_not_euclidean() {
    let mut game = common::new_game();
    common::isolate_pacman(&mut game, SPOT);
    // About 21 pixels away as the crow flies, but inside the box on both axes
    game.state_mut().dots.push(SPOT.offset(15.0, 15.0));
    // Exactly 16 away on one axis is outside
    game.state_mut().dots.push(SPOT.offset(16.0, 0.0));

    let first = game.tick();
    let second = game.tick();

    assert_that(&first.score).is_equal_to(10);
    assert_that(&second.score).is_equal_to(10);
}

#[test]
fn test_power_pill_scores_and_scares() {
    let mut game = common::new_game();
    common::isolate_pacman(&mut game, SPOT);
    game.state_mut().power_pills.push(SPOT);
    game.state_mut().dots.push(SPOT);
    game.drain_events();

    let after = game.tick();

    assert_that(&after.score).is_equal_to(60);
    assert_that(&after.mode).is_equal_to(Mode::Scared);
    assert_that(&game.drain_events().contains(&GameEvent::ScaredActivated)).is_true();
}
