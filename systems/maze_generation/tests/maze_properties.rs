use std::collections::VecDeque;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use raycast_maze_core::{CellCoord, CellKind, GridMap, START_CELL};
use raycast_maze_system_maze_generation::{approach_cell, generate, place_finish, FinishPlacement};

const SIZES: [(u32, u32); 5] = [(5, 5), (21, 21), (24, 17), (31, 9), (64, 48)];
// Odd edges put the cell inside every border on the carved lattice, so the
// finish approach always joins the maze. Even edges can leave it as a stub.
const ODD_SIZES: [(u32, u32); 4] = [(5, 5), (21, 21), (31, 9), (63, 47)];
const SEEDS_PER_SIZE: u64 = 40;

fn reachable_from_start(grid: &GridMap) -> Vec<bool> {
    let width = grid.columns() as usize;
    let mut seen = vec![false; width * grid.rows() as usize];
    let mut queue = VecDeque::new();
    seen[START_CELL.row() as usize * width + START_CELL.column() as usize] = true;
    queue.push_back(START_CELL);

    while let Some(cell) = queue.pop_front() {
        let column = i64::from(cell.column());
        let row = i64::from(cell.row());
        for (next_column, next_row) in [
            (column + 1, row),
            (column - 1, row),
            (column, row + 1),
            (column, row - 1),
        ] {
            if !grid.get(next_column, next_row).is_passable() {
                continue;
            }
            let index = next_row as usize * width + next_column as usize;
            if !seen[index] {
                seen[index] = true;
                queue.push_back(CellCoord::new(next_column as u32, next_row as u32));
            }
        }
    }

    seen
}

fn assert_border_walled_except_finish(grid: &GridMap, allow_finish: bool) {
    let mut finishes = 0;
    for (cell, kind) in grid.iter() {
        if !grid.is_border(cell) {
            assert_ne!(kind, CellKind::Finish, "finish must sit on the border");
            continue;
        }
        match kind {
            CellKind::Wall => {}
            CellKind::Finish if allow_finish => finishes += 1,
            other => panic!("border cell {cell:?} holds {other:?}"),
        }
    }
    let expected = usize::from(allow_finish);
    assert_eq!(finishes, expected, "unexpected number of finish cells");
}

fn assert_fully_connected(grid: &GridMap, seed: u64) {
    let reachable = reachable_from_start(grid);
    let width = grid.columns() as usize;
    for (cell, kind) in grid.iter() {
        if kind.is_passable() {
            let index = cell.row() as usize * width + cell.column() as usize;
            assert!(
                reachable[index],
                "cell {cell:?} isolated in {}x{} maze for seed {seed}",
                grid.columns(),
                grid.rows()
            );
        }
    }
}

#[test]
fn every_open_cell_is_reachable_from_start() {
    for (columns, rows) in SIZES {
        for seed in 0..SEEDS_PER_SIZE {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let grid = generate(columns, rows, FinishPlacement::Omit, &mut rng);
            assert_fully_connected(&grid, seed);
        }
    }
}

#[test]
fn finish_joins_the_maze_on_odd_grids() {
    for (columns, rows) in ODD_SIZES {
        for seed in 0..SEEDS_PER_SIZE {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let grid = generate(columns, rows, FinishPlacement::RandomBorder, &mut rng);
            assert_fully_connected(&grid, seed);
        }
    }
}

#[test]
fn border_is_walled_without_finish() {
    for (columns, rows) in SIZES {
        for seed in 0..SEEDS_PER_SIZE {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let grid = generate(columns, rows, FinishPlacement::Omit, &mut rng);
            assert_border_walled_except_finish(&grid, false);
        }
    }
}

#[test]
fn border_holds_exactly_one_finish_when_requested() {
    for (columns, rows) in SIZES {
        for seed in 0..SEEDS_PER_SIZE {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let grid = generate(columns, rows, FinishPlacement::RandomBorder, &mut rng);
            assert_border_walled_except_finish(&grid, true);
        }
    }
}

#[test]
fn finish_approach_is_always_passable() {
    for seed in 0..400 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let grid = generate(24, 17, FinishPlacement::RandomBorder, &mut rng);
        let finish = grid.finish().expect("finish placed");
        let approach = approach_cell(&grid, finish).expect("finish is not a corner");
        assert!(
            grid.kind(approach).is_passable(),
            "approach {approach:?} of finish {finish:?} blocked for seed {seed}"
        );
    }
}

#[test]
fn finish_lands_on_every_border() {
    let mut seen = [false; 4];
    for seed in 0..200 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let grid = generate(11, 11, FinishPlacement::RandomBorder, &mut rng);
        let finish = grid.finish().expect("finish placed");
        if finish.row() == 0 {
            seen[0] = true;
        } else if finish.row() == 10 {
            seen[1] = true;
        } else if finish.column() == 0 {
            seen[2] = true;
        } else if finish.column() == 10 {
            seen[3] = true;
        }
    }
    assert_eq!(seen, [true; 4], "finish never placed on some border");
}

#[test]
fn mazes_without_finish_are_spanning_trees() {
    for (columns, rows) in SIZES {
        for seed in 0..SEEDS_PER_SIZE {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let grid = generate(columns, rows, FinishPlacement::Omit, &mut rng);

            let mut nodes = 0;
            let mut edges = 0;
            for (cell, kind) in grid.iter() {
                if kind != CellKind::Empty {
                    continue;
                }
                nodes += 1;
                let column = i64::from(cell.column());
                let row = i64::from(cell.row());
                if grid.get(column + 1, row) == CellKind::Empty {
                    edges += 1;
                }
                if grid.get(column, row + 1) == CellKind::Empty {
                    edges += 1;
                }
            }

            assert_eq!(
                edges,
                nodes - 1,
                "{columns}x{rows} maze for seed {seed} contains a cycle"
            );
        }
    }
}

#[test]
fn reference_sized_maze_is_connected() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
    let grid = generate(250, 250, FinishPlacement::Omit, &mut rng);
    let reachable = reachable_from_start(&grid);
    let open = grid.iter().filter(|(_, kind)| kind.is_passable()).count();
    let reached = reachable.iter().filter(|seen| **seen).count();
    assert_eq!(open, reached);
    assert_border_walled_except_finish(&grid, false);
}

#[test]
fn placing_finish_on_fresh_grid_opens_its_approach() {
    let mut grid = GridMap::filled(9, 7, CellKind::Wall);
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let finish = place_finish(&mut grid, &mut rng).expect("grid has interior");
    assert_eq!(grid.kind(finish), CellKind::Finish);
    let approach = approach_cell(&grid, finish).expect("finish on border edge");
    assert_eq!(grid.kind(approach), CellKind::Empty);
    assert_eq!(grid.count(CellKind::Empty), 1);
}
