use pacman_core::config::GameConfig;
use pacman_core::game::snapshot::GameSnapshot;
use pacman_core::map::direction::Direction;
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use speculoos::prelude::*;

mod common;

/// Plays `ticks` ticks with a random direction request every few ticks.
fn play(seed: u64, ticks: usize) -> Vec<GameSnapshot> {
    let mut game = common::game_with(GameConfig {
        rng_seed: seed,
        ..GameConfig::default()
    });
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut history = vec![game.snapshot()];

    for tick in 0..ticks {
        if tick % 15 == 0 {
            if let Some(&direction) = Direction::DIRECTIONS.choose(&mut rng) {
                game.request_direction(direction);
            }
        }
        history.push(game.update(16));
        if game.is_game_over() {
            break;
        }
    }
    history
}

#[test]
fn test_score_never_decreases() {
    for seed in [1, 7, 42] {
        let history = play(seed, 3_000);
        for pair in history.windows(2) {
            assert_that(&pair[1].score).is_greater_than_or_equal_to(pair[0].score);
        }
    }
}

#[test]
fn test_collectibles_only_shrink_within_a_level() {
    for seed in [3, 11] {
        let history = play(seed, 3_000);
        for pair in history.windows(2) {
            let (before, after) = (&pair[0], &pair[1]);
            if before.level != after.level {
                continue;
            }
            assert_that(&after.dots_remaining).is_less_than_or_equal_to(before.dots_remaining);
            assert_that(&after.power_pills_remaining).is_less_than_or_equal_to(before.power_pills_remaining);
            // At most one of each per tick
            assert_that(&(before.dots_remaining - after.dots_remaining)).is_less_than_or_equal_to(1);
            assert_that(&(before.power_pills_remaining - after.power_pills_remaining)).is_less_than_or_equal_to(1);
        }
    }
}

#[test]
fn test_lives_never_grow() {
    let history = play(5, 3_000);
    for pair in history.windows(2) {
        assert_that(&pair[1].lives).is_less_than_or_equal_to(pair[0].lives);
    }
}

#[test]
fn test_score_is_made_of_whole_awards() {
    let history = play(9, 3_000);
    for snapshot in &history {
        assert_that(&(snapshot.score % 10)).is_equal_to(0);
    }
}

#[test]
fn test_same_seed_same_game() {
    assert_that(&play(21, 1_500)).is_equal_to(play(21, 1_500));
}
