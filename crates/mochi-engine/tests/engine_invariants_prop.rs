//! Property tests for the merge engine and the game built on it.
//!
//! Invariants covered:
//! - The line transform is a fixed point on compacted lines without equal neighbours.
//! - Shifting conserves the tile sum; a move adds exactly the spawned tile.
//! - The legality oracle agrees with trying all four directions.
//! - Undo restores grid and counters exactly and only once.
//! - Every grid produced by play still satisfies the grid invariants.

use mochi_engine::engine::{self, Grid, Move, Tile, legal_moves, transform_line};
use mochi_engine::{Game, Rules};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn tile() -> impl Strategy<Value = Tile> {
    prop_oneof![
        3 => Just(0u32),
        5 => (1u32..=11).prop_map(|e| 1 << e),
    ]
}

fn line() -> impl Strategy<Value = Vec<Tile>> {
    prop::collection::vec(tile(), 4)
}

fn grid() -> impl Strategy<Value = Grid> {
    prop::collection::vec(tile(), 16).prop_map(|cells| Grid::from_cells(4, cells).unwrap())
}

fn is_settled(line: &[Tile]) -> bool {
    let first_zero = line.iter().position(|&t| t == 0).unwrap_or(line.len());
    let compact = line[first_zero..].iter().all(|&t| t == 0);
    let no_pairs = line.windows(2).all(|w| w[0] == 0 || w[0] != w[1]);
    compact && no_pairs
}

#[test]
fn leading_pair_merges_left() {
    let mut cells = vec![0; 16];
    cells[0] = 2;
    cells[1] = 2;
    let grid = Grid::from_cells(4, cells).unwrap();
    let shifted = engine::shift(&grid, Move::Left).unwrap();
    assert!(shifted.moved);
    assert_eq!(&shifted.grid.cells()[..4], &[4, 0, 0, 0]);
    assert_eq!(shifted.points, 4);
    assert_eq!(shifted.sleepiness(Rules::default().merge_sleepiness), 5);
}

#[test]
fn checkerboard_is_stuck_in_every_direction() {
    let cells = vec![2, 4, 2, 4, 4, 2, 4, 2, 2, 4, 2, 4, 4, 2, 4, 2];
    let grid = Grid::from_cells(4, cells.clone()).unwrap();
    assert!(!grid.can_move());
    let mut game =
        Game::from_parts(Rules::default(), grid, 0, 0, StdRng::seed_from_u64(3)).unwrap();
    for dir in Move::ALL {
        let out = game.apply_move(dir).unwrap();
        assert!(!out.moved);
        assert_eq!(game.grid().cells(), cells.as_slice());
    }
}

#[test]
fn long_seeded_game_keeps_invariants() {
    let mut game = Game::seeded(Rules::default(), 20260228).unwrap();
    let mut steps = 0;
    while game.can_move() && steps < 2_000 {
        let dir = Move::ALL[steps % 4];
        let before = game.grid().total();
        let out = game.apply_move(dir).unwrap();
        game.grid().check().unwrap();
        if out.moved {
            let spawned = out.spawned.map(|i| game.grid().cells()[i] as u64).unwrap_or(0);
            assert_eq!(game.grid().total(), before + spawned);
        }
        steps += 1;
    }
    assert!(game.sleepiness() >= 1);
}

proptest! {
    #[test]
    fn transform_is_fixed_point_on_settled_lines(l in line()) {
        let once = transform_line(&l).unwrap();
        if is_settled(&once.tiles) {
            let twice = transform_line(&once.tiles).unwrap();
            prop_assert_eq!(&twice.tiles, &once.tiles);
            prop_assert_eq!(twice.points, 0);
        }
        if is_settled(&l) {
            prop_assert_eq!(&once.tiles, &l);
            prop_assert_eq!(once.merges, 0);
        }
    }

    #[test]
    fn transform_conserves_sum_and_counts_merges(l in line()) {
        let out = transform_line(&l).unwrap();
        let sum = |t: &[Tile]| t.iter().map(|&v| v as u64).sum::<u64>();
        let count = |t: &[Tile]| t.iter().filter(|&&v| v != 0).count();
        prop_assert_eq!(out.tiles.len(), l.len());
        prop_assert_eq!(sum(&out.tiles), sum(&l));
        prop_assert_eq!(count(&out.tiles) + out.merges as usize, count(&l));
        prop_assert!(out.points % 4 == 0 || out.merges == 0);
    }

    #[test]
    fn oracle_matches_brute_force(g in grid()) {
        let full_and_locked = !g.has_empty_cell() && !g.has_adjacent_equal_pair();
        prop_assert_eq!(g.can_move(), !full_and_locked);
        // An all-empty grid counts as movable although no direction changes it.
        if g.total() > 0 {
            prop_assert_eq!(g.can_move(), !legal_moves(&g).unwrap().is_empty());
        }
    }

    #[test]
    fn right_is_mirrored_left(g in grid()) {
        let mirror = |g: &Grid| {
            let cells = g.rows().flat_map(|r| r.iter().rev().copied()).collect();
            Grid::from_cells(g.size(), cells).unwrap()
        };
        let right = engine::shift(&g, Move::Right).unwrap();
        let left = engine::shift(&mirror(&g), Move::Left).unwrap();
        prop_assert_eq!(mirror(&left.grid), right.grid);
        prop_assert_eq!(left.points, right.points);
    }

    #[test]
    fn second_shift_without_spawn_changes_nothing_when_settled(g in grid(), d in 0usize..4) {
        let dir = Move::ALL[d];
        let first = engine::shift(&g, dir).unwrap();
        let second = engine::shift(&first.grid, dir).unwrap();
        if first.merges == 0 {
            prop_assert!(!second.moved);
        }
    }

    #[test]
    fn move_adds_only_the_spawned_tile(g in grid(), d in 0usize..4, seed in any::<u64>()) {
        let before = g.total();
        let mut game = Game::from_parts(Rules::default(), g, 0, 0, StdRng::seed_from_u64(seed)).unwrap();
        let out = game.apply_move(Move::ALL[d]).unwrap();
        game.grid().check().unwrap();
        if out.moved {
            let idx = out.spawned.expect("a move always leaves a hole");
            let spawned = game.grid().cells()[idx];
            prop_assert!(spawned == 2 || spawned == 4);
            prop_assert_eq!(game.grid().total(), before + spawned as u64);
            prop_assert_eq!(game.currency(), out.points_gained);
        } else {
            prop_assert_eq!(game.grid().total(), before);
            prop_assert!(!game.can_undo());
        }
    }

    #[test]
    fn undo_restores_exactly_once(
        g in grid(),
        d in 0usize..4,
        currency in 0u64..10_000,
        sleepiness in 0u64..10_000,
    ) {
        let mut game = Game::from_parts(
            Rules::default(), g.clone(), currency, sleepiness, StdRng::seed_from_u64(1),
        ).unwrap();
        let out = game.apply_move(Move::ALL[d]).unwrap();
        prop_assert_eq!(game.undo(), out.moved);
        prop_assert_eq!(game.grid(), &g);
        prop_assert_eq!(game.currency(), currency);
        prop_assert_eq!(game.sleepiness(), sleepiness);
        prop_assert!(!game.undo());
        prop_assert_eq!(game.grid(), &g);
    }
}
