#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-level record of which maze cells the player has stood in.

use raycast_maze_core::CellCoord;

/// Visited-cell bitmap paired with a distinct-visit counter.
///
/// The counter always equals the number of set entries in the bitmap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExplorationTracker {
    columns: u32,
    rows: u32,
    visited: Vec<bool>,
    distinct: u32,
}

impl ExplorationTracker {
    /// Creates an empty tracker covering a grid of the provided size.
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            visited: vec![false; capacity],
            distinct: 0,
        }
    }

    /// Clears every visit and zeroes the counter.
    pub fn reset(&mut self) {
        self.visited.fill(false);
        self.distinct = 0;
    }

    /// Clears the tracker and adopts new grid dimensions.
    pub fn reset_with_dimensions(&mut self, columns: u32, rows: u32) {
        if (columns, rows) == (self.columns, self.rows) {
            self.reset();
        } else {
            *self = Self::new(columns, rows);
        }
    }

    /// Marks the cell as visited.
    ///
    /// Returns `true` only for the first visit of an in-bounds cell;
    /// repeated or out-of-bounds visits leave the tracker untouched.
    pub fn record_visit(&mut self, column: i64, row: i64) -> bool {
        let Some(index) = self.index(column, row) else {
            return false;
        };
        let Some(slot) = self.visited.get_mut(index) else {
            return false;
        };
        if *slot {
            return false;
        }
        *slot = true;
        self.distinct = self.distinct.saturating_add(1);
        true
    }

    /// Number of distinct cells visited since the last reset.
    #[must_use]
    pub const fn distinct_count(&self) -> u32 {
        self.distinct
    }

    /// Reports whether the cell was visited since the last reset.
    #[must_use]
    pub fn is_visited(&self, cell: CellCoord) -> bool {
        self.index(i64::from(cell.column()), i64::from(cell.row()))
            .and_then(|index| self.visited.get(index).copied())
            .unwrap_or(false)
    }

    /// Provides the dimensions of the tracked grid.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    fn index(&self, column: i64, row: i64) -> Option<usize> {
        let column = u32::try_from(column).ok()?;
        let row = u32::try_from(row).ok()?;
        if column < self.columns && row < self.rows {
            let width = usize::try_from(self.columns).ok()?;
            Some(usize::try_from(row).ok()? * width + usize::try_from(column).ok()?)
        } else {
            None
        }
    }
}
