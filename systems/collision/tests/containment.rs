use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use raycast_maze_core::{CellKind, GridMap, HITBOX_RADIUS, START_CELL};
use raycast_maze_system_collision::{resolve, slide};
use raycast_maze_system_maze_generation::{generate, FinishPlacement};

const WALK_STEPS: usize = 4_000;
const MAX_STEP: f64 = 0.12;

fn nearest_wall_distance(position: DVec2, grid: &GridMap) -> f64 {
    let column = position.x.floor() as i64;
    let row = position.y.floor() as i64;
    let mut nearest = f64::INFINITY;
    for neighbour_row in row - 1..=row + 1 {
        for neighbour_column in column - 1..=column + 1 {
            if grid.get(neighbour_column, neighbour_row) != CellKind::Wall {
                continue;
            }
            let cell_min = DVec2::new(neighbour_column as f64, neighbour_row as f64);
            let closest = position.clamp(cell_min, cell_min + DVec2::ONE);
            nearest = nearest.min(position.distance(closest));
        }
    }
    nearest
}

#[test]
fn random_walks_never_enter_walls() {
    for seed in 0..12 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let grid = generate(21, 21, FinishPlacement::RandomBorder, &mut rng);
        let mut position = START_CELL.center();

        for step in 0..WALK_STEPS {
            let heading = DVec2::from_angle(rng.gen_range(0.0..std::f64::consts::TAU));
            let length = rng.gen_range(0.0..MAX_STEP);
            position = slide(position, heading * length, HITBOX_RADIUS, &grid);

            let cell = grid
                .cell_at(position)
                .unwrap_or_else(|| panic!("left the grid at step {step} for seed {seed}"));
            assert!(
                grid.kind(cell).is_passable(),
                "centre entered wall {cell:?} at step {step} for seed {seed}"
            );
            assert!(
                nearest_wall_distance(position, &grid) >= HITBOX_RADIUS - 1e-9,
                "hitbox sank into a wall at step {step} for seed {seed}"
            );
        }
    }
}

#[test]
fn resolved_positions_are_stable() {
    let mut rng = ChaCha8Rng::seed_from_u64(77);
    let grid = generate(15, 15, FinishPlacement::Omit, &mut rng);
    let mut position = START_CELL.center();

    for _ in 0..500 {
        let heading = DVec2::from_angle(rng.gen_range(0.0..std::f64::consts::TAU));
        position = slide(position, heading * 0.1, HITBOX_RADIUS, &grid);
        let again = resolve(position, HITBOX_RADIUS, &grid);
        assert!(
            position.distance(again) < 1e-6,
            "second resolution moved {position:?} to {again:?}"
        );
    }
}

#[test]
fn walking_into_a_dead_end_stops_at_hitbox_distance() {
    let grid = GridMap::from_ascii(&["#####", "#...#", "#####"]);
    let mut position = DVec2::new(1.5, 1.5);
    for _ in 0..100 {
        position = slide(position, DVec2::new(0.05, 0.0), HITBOX_RADIUS, &grid);
    }
    assert!((position.x - (4.0 - HITBOX_RADIUS)).abs() < 1e-9);
    assert!((position.y - 1.5).abs() < 1e-12);
}
