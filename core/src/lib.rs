#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the raycast maze engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to. Systems consume event streams, query immutable snapshots, and
//! respond exclusively with new command batches.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Number of columns in the reference maze.
pub const DEFAULT_MAP_COLUMNS: u32 = 250;
/// Number of rows in the reference maze.
pub const DEFAULT_MAP_ROWS: u32 = 250;
/// Smallest grid edge that still leaves an interior to carve.
pub const MIN_MAP_EDGE: u32 = 3;
/// Largest grid edge accepted; bounds the grid and visited bitmap allocations.
pub const MAX_MAP_EDGE: u32 = 4096;
/// Edge length of the square wall texture, in texels.
pub const TEXTURE_SIZE: usize = 64;
/// Radius of the circular collision proxy representing the player, in cells.
pub const HITBOX_RADIUS: f64 = 0.2;
/// Walking speed expressed in cells per second.
pub const MOVE_SPEED: f64 = 3.0;
/// Factor applied to the walking speed while the run modifier is held.
pub const RUN_MULTIPLIER: f64 = 2.0;
/// Yaw speed applied while a turn key is held, in radians per second.
pub const TURN_SPEED: f64 = 2.0;
/// Yaw applied per pixel of horizontal mouse motion, in radians.
pub const MOUSE_SENSITIVITY: f64 = 0.003;
/// Distinct cells a player must visit before the exploration win triggers.
pub const EXPLORATION_THRESHOLD: u32 = 300;
/// Window size used when running in windowed mode.
pub const WINDOWED_SIZE: (u32, u32) = (640, 480);
/// Screen size assumed when the desktop resolution cannot be queried.
pub const FALLBACK_SCREEN_SIZE: (u32, u32) = (1920, 1080);
/// Lattice cell where carving starts and the player spawns.
pub const START_CELL: CellCoord = CellCoord::new(1, 1);

/// Kind of content stored in a single maze cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Open floor the player may walk through.
    #[default]
    Empty,
    /// Solid wall blocking movement and rays.
    Wall,
    /// Exit cell; passable for the player but rendered as a wall.
    Finish,
}

impl CellKind {
    /// Reports whether the player's hitbox may overlap the cell.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        matches!(self, Self::Empty | Self::Finish)
    }

    /// Reports whether a ray marching through the grid stops at the cell.
    #[must_use]
    pub const fn stops_rays(self) -> bool {
        !matches!(self, Self::Empty)
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Continuous position of the cell's centre.
    #[must_use]
    pub fn center(&self) -> DVec2 {
        DVec2::new(f64::from(self.column) + 0.5, f64::from(self.row) + 0.5)
    }
}

/// Dense rectangular grid of cell kinds.
///
/// Coordinates outside the grid read as [`CellKind::Wall`], so every consumer
/// treats the world edge as solid without special casing.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GridMap {
    columns: u32,
    rows: u32,
    cells: Vec<CellKind>,
}

impl GridMap {
    /// Creates a grid where every cell holds `kind`.
    ///
    /// A size whose cell count does not fit in memory addressing yields an
    /// empty 0×0 grid, so the dimensions always match the stored cells.
    #[must_use]
    pub fn filled(columns: u32, rows: u32, kind: CellKind) -> Self {
        let Ok(capacity) = usize::try_from(u64::from(columns) * u64::from(rows)) else {
            return Self {
                columns: 0,
                rows: 0,
                cells: Vec::new(),
            };
        };
        Self {
            columns,
            rows,
            cells: vec![kind; capacity],
        }
    }

    /// Builds a grid from ASCII rows where `#` is a wall, `F` a finish cell
    /// and any other character open floor. Rows shorter than the widest one
    /// are padded with walls.
    #[must_use]
    pub fn from_ascii(rows: &[&str]) -> Self {
        let columns = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0);
        let mut grid = Self::filled(
            u32::try_from(columns).unwrap_or(u32::MAX),
            u32::try_from(rows.len()).unwrap_or(u32::MAX),
            CellKind::Wall,
        );
        for (row_index, row) in rows.iter().enumerate() {
            for (column_index, symbol) in row.chars().enumerate() {
                let kind = match symbol {
                    '#' => CellKind::Wall,
                    'F' => CellKind::Finish,
                    _ => CellKind::Empty,
                };
                let (Ok(column), Ok(row)) =
                    (u32::try_from(column_index), u32::try_from(row_index))
                else {
                    continue;
                };
                grid.set(CellCoord::new(column, row), kind);
            }
        }
        grid
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Returns the kind stored at the provided signed coordinate.
    ///
    /// Out-of-range coordinates report [`CellKind::Wall`].
    #[must_use]
    pub fn get(&self, column: i64, row: i64) -> CellKind {
        self.signed_index(column, row)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(CellKind::Wall)
    }

    /// Returns the kind stored at the provided cell.
    #[must_use]
    pub fn kind(&self, cell: CellCoord) -> CellKind {
        self.get(i64::from(cell.column()), i64::from(cell.row()))
    }

    /// Overwrites the kind stored at the provided cell. Out-of-range writes are ignored.
    pub fn set(&mut self, cell: CellCoord, kind: CellKind) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = kind;
            }
        }
    }

    /// Resolves the cell containing a continuous position.
    ///
    /// Positions on a cell boundary belong to the higher-index cell. Returns
    /// `None` when the position lies outside the grid.
    #[must_use]
    pub fn cell_at(&self, position: DVec2) -> Option<CellCoord> {
        let column = position.x.floor();
        let row = position.y.floor();
        if !(column >= 0.0 && row >= 0.0) {
            return None;
        }
        if column >= f64::from(self.columns) || row >= f64::from(self.rows) {
            return None;
        }
        Some(CellCoord::new(column as u32, row as u32))
    }

    /// Returns the kind of the cell containing a continuous position.
    #[must_use]
    pub fn kind_at(&self, position: DVec2) -> CellKind {
        self.cell_at(position)
            .map_or(CellKind::Wall, |cell| self.kind(cell))
    }

    /// Reports whether the cell lies on the outermost ring of the grid.
    #[must_use]
    pub const fn is_border(&self, cell: CellCoord) -> bool {
        cell.column() == 0
            || cell.row() == 0
            || cell.column() + 1 == self.columns
            || cell.row() + 1 == self.rows
    }

    /// Counts cells holding the provided kind.
    #[must_use]
    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|cell| **cell == kind).count()
    }

    /// Returns the first finish cell in row-major order, if any.
    #[must_use]
    pub fn finish(&self) -> Option<CellCoord> {
        self.iter()
            .find(|(_, kind)| *kind == CellKind::Finish)
            .map(|(cell, _)| cell)
    }

    /// Iterates over every cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, CellKind)> + '_ {
        let width = usize::try_from(self.columns).unwrap_or(0).max(1);
        self.cells.iter().enumerate().map(move |(index, kind)| {
            let column = u32::try_from(index % width).unwrap_or(u32::MAX);
            let row = u32::try_from(index / width).unwrap_or(u32::MAX);
            (CellCoord::new(column, row), *kind)
        })
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }

    fn signed_index(&self, column: i64, row: i64) -> Option<usize> {
        let column = u32::try_from(column).ok()?;
        let row = u32::try_from(row).ok()?;
        self.index(CellCoord::new(column, row))
    }
}

/// Continuous player pose: position, facing and camera plane.
///
/// `direction` stays unit length and `plane` perpendicular to it because the
/// only mutation applied to either is a pure rotation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    /// Position in grid-cell units.
    pub position: DVec2,
    /// Unit-length facing vector.
    pub direction: DVec2,
    /// Camera plane vector; its length encodes the horizontal field of view.
    pub plane: DVec2,
}

impl Pose {
    /// Pose assumed at session start and after every completed level.
    #[must_use]
    pub fn spawn(display_mode: DisplayMode) -> Self {
        Self {
            position: START_CELL.center(),
            direction: DVec2::new(1.0, 0.0),
            plane: DVec2::new(0.0, display_mode.camera_plane_length()),
        }
    }

    /// Rotates facing and camera plane by `radians`; positive turns clockwise on screen.
    pub fn rotate(&mut self, radians: f64) {
        let rotation = DVec2::from_angle(radians);
        self.direction = rotation.rotate(self.direction);
        self.plane = rotation.rotate(self.plane);
    }

    /// Unit vector pointing to the player's right.
    #[must_use]
    pub fn right(&self) -> DVec2 {
        DVec2::new(-self.direction.y, self.direction.x)
    }
}

/// Selects which conditions complete a level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WinMode {
    /// Only stepping onto the finish cell completes the level.
    FinishOnly,
    /// Only visiting enough distinct cells completes the level.
    ThresholdOnly,
    /// Either condition completes the level.
    #[default]
    Both,
}

impl WinMode {
    /// Reports whether generated mazes carry a finish cell.
    #[must_use]
    pub const fn places_finish(self) -> bool {
        matches!(self, Self::FinishOnly | Self::Both)
    }

    /// Reports whether distinct visited cells count toward completion.
    #[must_use]
    pub const fn counts_exploration(self) -> bool {
        matches!(self, Self::ThresholdOnly | Self::Both)
    }
}

/// Reason a level was completed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WinReason {
    /// The player stepped onto the finish cell.
    ReachedFinish,
    /// The player visited enough distinct cells.
    ExploredThreshold,
}

/// How the view is presented on screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayMode {
    /// Fixed-size desktop window.
    #[default]
    Windowed,
    /// Fullscreen at the desktop resolution.
    Fullscreen,
}

impl DisplayMode {
    /// Length of the camera plane vector, which sets the horizontal field of view.
    #[must_use]
    pub const fn camera_plane_length(self) -> f64 {
        match self {
            Self::Windowed => 0.66,
            Self::Fullscreen => 1.0,
        }
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the maze configuration and regenerates the level.
    ConfigureMaze {
        /// Number of columns in the generated grid.
        columns: u32,
        /// Number of rows in the generated grid.
        rows: u32,
        /// Conditions that complete a level.
        win_mode: WinMode,
        /// Presentation mode, which determines the spawn camera plane.
        display_mode: DisplayMode,
    },
    /// Rotates the player's facing and camera plane.
    RotatePlayer {
        /// Rotation in radians; positive turns right.
        radians: f64,
    },
    /// Requests that the player move by the provided displacement.
    MovePlayer {
        /// Desired displacement in cells before collision resolution.
        displacement: DVec2,
    },
    /// Completes the current level, regenerating the maze and resetting the player.
    CompleteLevel {
        /// Condition that triggered completion.
        reason: WinReason,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Announces that a fresh maze replaced the previous one.
    MazeGenerated {
        /// One-based index of the level the maze belongs to.
        level: u32,
        /// Number of columns in the grid.
        columns: u32,
        /// Number of rows in the grid.
        rows: u32,
        /// Finish cell placed on the border, if the win mode uses one.
        finish: Option<CellCoord>,
    },
    /// Confirms the player's position after collision resolution.
    PlayerMoved {
        /// Resolved position in grid-cell units.
        position: DVec2,
        /// Cell containing the resolved position, if inside the grid.
        cell: Option<CellCoord>,
        /// Kind of the cell containing the resolved position.
        kind: CellKind,
    },
    /// Reports the first visit of a cell during the current level.
    CellVisited {
        /// Cell that was visited for the first time.
        cell: CellCoord,
        /// Number of distinct cells visited so far, including this one.
        distinct: u32,
    },
    /// Announces that the level was completed.
    LevelCompleted {
        /// One-based index of the level that was completed.
        level: u32,
        /// Condition that triggered completion.
        reason: WinReason,
    },
}
