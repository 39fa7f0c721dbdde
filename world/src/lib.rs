#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state for the raycast maze.
//!
//! The world owns the grid, the exploration tracker, the player pose and the
//! seeded random source feeding maze generation. It changes only through
//! [`apply`] and is read through the [`query`] module.

use glam::DVec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use raycast_maze_core::{
    CellCoord, Command, DisplayMode, Event, GridMap, Pose, WinMode, DEFAULT_MAP_COLUMNS,
    DEFAULT_MAP_ROWS, HITBOX_RADIUS, MAX_MAP_EDGE, MIN_MAP_EDGE,
};
use raycast_maze_system_exploration::ExplorationTracker;
use raycast_maze_system_maze_generation::{generate, place_finish, FinishPlacement};

/// Represents the authoritative raycast maze session state.
#[derive(Debug)]
pub struct World {
    columns: u32,
    rows: u32,
    grid: GridMap,
    exploration: ExplorationTracker,
    pose: Pose,
    win_mode: WinMode,
    display_mode: DisplayMode,
    hitbox_radius: f64,
    level: u32,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates a world holding a freshly generated reference-sized maze.
    ///
    /// Worlds created with the same seed and fed the same commands evolve
    /// identically.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_hitbox_radius(seed, HITBOX_RADIUS)
    }

    /// Creates a world whose player collides using the provided hitbox radius.
    ///
    /// Negative or non-finite radii fall back to [`HITBOX_RADIUS`].
    #[must_use]
    pub fn with_hitbox_radius(seed: u64, hitbox_radius: f64) -> Self {
        let mut world = Self::awaiting_configuration(seed, hitbox_radius);
        let _ = world.regenerate();
        world
    }

    /// Creates a world whose grid stays empty until the first
    /// `ConfigureMaze` command generates a maze.
    ///
    /// Every cell of the empty grid reads as a wall. Negative or non-finite
    /// radii fall back to [`HITBOX_RADIUS`].
    #[must_use]
    pub fn awaiting_configuration(seed: u64, hitbox_radius: f64) -> Self {
        let hitbox_radius = if hitbox_radius.is_finite() && hitbox_radius >= 0.0 {
            hitbox_radius
        } else {
            HITBOX_RADIUS
        };
        let display_mode = DisplayMode::default();
        Self {
            columns: DEFAULT_MAP_COLUMNS,
            rows: DEFAULT_MAP_ROWS,
            grid: GridMap::filled(0, 0, Default::default()),
            exploration: ExplorationTracker::new(0, 0),
            pose: Pose::spawn(display_mode),
            win_mode: WinMode::default(),
            display_mode,
            hitbox_radius,
            level: 1,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Replaces grid, tracker and pose in one step and returns the new finish cell.
    fn regenerate(&mut self) -> Option<CellCoord> {
        let mut grid = generate(self.columns, self.rows, FinishPlacement::Omit, &mut self.rng);
        let finish = if self.win_mode.places_finish() {
            place_finish(&mut grid, &mut self.rng)
        } else {
            None
        };
        self.grid = grid;
        self.exploration
            .reset_with_dimensions(self.columns, self.rows);
        self.pose = Pose::spawn(self.display_mode);
        finish
    }

    fn maze_generated(&self, finish: Option<CellCoord>) -> Event {
        Event::MazeGenerated {
            level: self.level,
            columns: self.columns,
            rows: self.rows,
            finish,
        }
    }

    fn move_player(&mut self, displacement: DVec2, out_events: &mut Vec<Event>) {
        let displacement = if displacement.is_finite() {
            displacement
        } else {
            DVec2::ZERO
        };
        let position = raycast_maze_system_collision::slide(
            self.pose.position,
            displacement,
            self.hitbox_radius,
            &self.grid,
        );
        self.pose.position = position;

        let cell = self.grid.cell_at(position);
        out_events.push(Event::PlayerMoved {
            position,
            cell,
            kind: self.grid.kind_at(position),
        });

        if !self.win_mode.counts_exploration() {
            return;
        }
        if let Some(cell) = cell {
            let first_visit = self
                .exploration
                .record_visit(i64::from(cell.column()), i64::from(cell.row()));
            if first_visit {
                out_events.push(Event::CellVisited {
                    cell,
                    distinct: self.exploration.distinct_count(),
                });
            }
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureMaze {
            columns,
            rows,
            win_mode,
            display_mode,
        } => {
            world.columns = columns.clamp(MIN_MAP_EDGE, MAX_MAP_EDGE);
            world.rows = rows.clamp(MIN_MAP_EDGE, MAX_MAP_EDGE);
            world.win_mode = win_mode;
            world.display_mode = display_mode;
            world.level = 1;
            let finish = world.regenerate();
            out_events.push(world.maze_generated(finish));
        }
        Command::RotatePlayer { radians } => {
            if radians.is_finite() {
                world.pose.rotate(radians);
            }
        }
        Command::MovePlayer { displacement } => world.move_player(displacement, out_events),
        Command::CompleteLevel { reason } => {
            out_events.push(Event::LevelCompleted {
                level: world.level,
                reason,
            });
            world.level = world.level.saturating_add(1);
            let finish = world.regenerate();
            out_events.push(world.maze_generated(finish));
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use raycast_maze_core::{CellCoord, DisplayMode, GridMap, Pose, WinMode};

    /// Provides read-only access to the current maze.
    #[must_use]
    pub fn grid(world: &World) -> &GridMap {
        &world.grid
    }

    /// Retrieves the player's pose.
    #[must_use]
    pub fn pose(world: &World) -> Pose {
        world.pose
    }

    /// Number of distinct cells visited during the current level.
    #[must_use]
    pub fn distinct_visited(world: &World) -> u32 {
        world.exploration.distinct_count()
    }

    /// One-based index of the level currently being played.
    #[must_use]
    pub fn level(world: &World) -> u32 {
        world.level
    }

    /// Conditions that complete the current level.
    #[must_use]
    pub fn win_mode(world: &World) -> WinMode {
        world.win_mode
    }

    /// Presentation mode the pose was spawned for.
    #[must_use]
    pub fn display_mode(world: &World) -> DisplayMode {
        world.display_mode
    }

    /// Finish cell of the current maze, if one was placed.
    #[must_use]
    pub fn finish(world: &World) -> Option<CellCoord> {
        world.grid.finish()
    }

    /// Radius of the player's collision circle.
    #[must_use]
    pub fn hitbox_radius(world: &World) -> f64 {
        world.hitbox_radius
    }
}
