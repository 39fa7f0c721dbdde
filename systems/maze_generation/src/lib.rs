#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Randomised depth-first maze generation.
//!
//! Chambers sit on the lattice of cells reachable from [`START_CELL`] in steps
//! of two; the odd cell between two chambers is the wall that gets knocked out
//! when the backtracker moves between them. The result is a perfect maze: one
//! path between any two carved cells.

use rand::Rng;
use raycast_maze_core::{CellCoord, CellKind, GridMap, MIN_MAP_EDGE, START_CELL};

const LATTICE_STEPS: [(i64, i64); 4] = [(0, -2), (0, 2), (-2, 0), (2, 0)];

/// Controls whether a finish cell is carved into the border.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FinishPlacement {
    /// Leave the border fully walled.
    #[default]
    Omit,
    /// Place one finish cell on a random border with an open approach.
    RandomBorder,
}

/// Borders of the grid a finish cell may be placed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Border {
    /// Row zero.
    Top,
    /// Last row.
    Bottom,
    /// Column zero.
    Left,
    /// Last column.
    Right,
}

impl Border {
    const ALL: [Self; 4] = [Self::Top, Self::Bottom, Self::Left, Self::Right];
}

/// Generates a fresh maze of the requested size.
///
/// Grids smaller than three cells on either edge have no interior and come
/// back fully walled.
#[must_use]
pub fn generate<R>(columns: u32, rows: u32, finish: FinishPlacement, rng: &mut R) -> GridMap
where
    R: Rng + ?Sized,
{
    let mut grid = GridMap::filled(columns, rows, CellKind::Wall);
    if columns < MIN_MAP_EDGE || rows < MIN_MAP_EDGE {
        return grid;
    }

    carve_passages(&mut grid, rng);
    seal_border(&mut grid);

    if finish == FinishPlacement::RandomBorder {
        let _ = place_finish(&mut grid, rng);
    }

    grid
}

/// Places a finish cell on a uniformly chosen border and opens the cell just inside it.
///
/// The inner cell is opened unconditionally, even when it is not a lattice
/// chamber, so the finish is always adjacent to passable floor. Returns the
/// finish cell, or `None` when the grid has no interior.
pub fn place_finish<R>(grid: &mut GridMap, rng: &mut R) -> Option<CellCoord>
where
    R: Rng + ?Sized,
{
    let columns = grid.columns();
    let rows = grid.rows();
    if columns < MIN_MAP_EDGE || rows < MIN_MAP_EDGE {
        return None;
    }

    let border = Border::ALL[rng.gen_range(0..Border::ALL.len())];
    let (finish, approach) = match border {
        Border::Top => {
            let column = rng.gen_range(1..columns - 1);
            (CellCoord::new(column, 0), CellCoord::new(column, 1))
        }
        Border::Bottom => {
            let column = rng.gen_range(1..columns - 1);
            (
                CellCoord::new(column, rows - 1),
                CellCoord::new(column, rows - 2),
            )
        }
        Border::Left => {
            let row = rng.gen_range(1..rows - 1);
            (CellCoord::new(0, row), CellCoord::new(1, row))
        }
        Border::Right => {
            let row = rng.gen_range(1..rows - 1);
            (
                CellCoord::new(columns - 1, row),
                CellCoord::new(columns - 2, row),
            )
        }
    };

    grid.set(approach, CellKind::Empty);
    grid.set(finish, CellKind::Finish);
    Some(finish)
}

/// Returns the cell just inside a border cell, or `None` for corners and interior cells.
#[must_use]
pub fn approach_cell(grid: &GridMap, cell: CellCoord) -> Option<CellCoord> {
    let last_column = grid.columns().checked_sub(1)?;
    let last_row = grid.rows().checked_sub(1)?;
    let interior_column = cell.column() > 0 && cell.column() < last_column;
    let interior_row = cell.row() > 0 && cell.row() < last_row;

    match (cell.column(), cell.row()) {
        (column, 0) if interior_column => Some(CellCoord::new(column, 1)),
        (column, row) if row == last_row && interior_column => {
            Some(CellCoord::new(column, row - 1))
        }
        (0, row) if interior_row => Some(CellCoord::new(1, row)),
        (column, row) if column == last_column && interior_row => {
            Some(CellCoord::new(column - 1, row))
        }
        _ => None,
    }
}

fn carve_passages<R>(grid: &mut GridMap, rng: &mut R)
where
    R: Rng + ?Sized,
{
    let columns = i64::from(grid.columns());
    let rows = i64::from(grid.rows());

    grid.set(START_CELL, CellKind::Empty);
    let mut stack = vec![(i64::from(START_CELL.column()), i64::from(START_CELL.row()))];

    while let Some(&(column, row)) = stack.last() {
        let mut candidates = [(0_i64, 0_i64); LATTICE_STEPS.len()];
        let mut count = 0;
        for (step_column, step_row) in LATTICE_STEPS {
            let next_column = column + step_column;
            let next_row = row + step_row;
            let inside =
                next_column > 0 && next_column < columns - 1 && next_row > 0 && next_row < rows - 1;
            if inside && grid.get(next_column, next_row) == CellKind::Wall {
                candidates[count] = (next_column, next_row);
                count += 1;
            }
        }

        if count == 0 {
            let _ = stack.pop();
            continue;
        }

        let (next_column, next_row) = candidates[rng.gen_range(0..count)];
        let between = (column + (next_column - column) / 2, row + (next_row - row) / 2);
        carve(grid, between);
        carve(grid, (next_column, next_row));
        stack.push((next_column, next_row));
    }
}

fn carve(grid: &mut GridMap, (column, row): (i64, i64)) {
    if let (Ok(column), Ok(row)) = (u32::try_from(column), u32::try_from(row)) {
        grid.set(CellCoord::new(column, row), CellKind::Empty);
    }
}

fn seal_border(grid: &mut GridMap) {
    let columns = grid.columns();
    let rows = grid.rows();
    for row in 0..rows {
        grid.set(CellCoord::new(0, row), CellKind::Wall);
        grid.set(CellCoord::new(columns - 1, row), CellKind::Wall);
    }
    for column in 0..columns {
        grid.set(CellCoord::new(column, 0), CellKind::Wall);
        grid.set(CellCoord::new(column, rows - 1), CellKind::Wall);
    }
}
