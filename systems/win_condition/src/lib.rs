#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Decides when the current level is complete.

use raycast_maze_core::{CellKind, Command, Event, WinMode, WinReason, EXPLORATION_THRESHOLD};

/// Pure system that watches world events and requests level completion.
///
/// Within one event batch the exploration threshold is evaluated before the
/// finish cell, and at most one completion is requested. After requesting a
/// completion the system stays quiet until the world reports a new maze.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WinCondition {
    mode: WinMode,
    threshold: u32,
    armed: bool,
}

impl WinCondition {
    /// Creates a win-condition system for the provided mode and exploration threshold.
    #[must_use]
    pub const fn new(mode: WinMode, threshold: u32) -> Self {
        Self {
            mode,
            threshold,
            armed: true,
        }
    }

    /// Mode currently dispatched on.
    #[must_use]
    pub const fn mode(&self) -> WinMode {
        self.mode
    }

    /// Number of distinct cells required by the exploration condition.
    #[must_use]
    pub const fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Replaces the mode, typically after the session reconfigures the maze.
    pub fn set_mode(&mut self, mode: WinMode) {
        self.mode = mode;
    }

    /// Consumes world events and emits at most one `CompleteLevel` command.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        let mut explored = false;
        let mut reached_finish = false;

        for event in events {
            match event {
                Event::MazeGenerated { .. } => {
                    self.armed = true;
                    explored = false;
                    reached_finish = false;
                }
                Event::CellVisited { distinct, .. } => {
                    explored |= *distinct >= self.threshold;
                }
                Event::PlayerMoved { kind, .. } => {
                    reached_finish |= *kind == CellKind::Finish;
                }
                Event::LevelCompleted { .. } => {}
            }
        }

        if !self.armed {
            return;
        }

        let reason = if explored && self.mode.counts_exploration() {
            Some(WinReason::ExploredThreshold)
        } else if reached_finish && self.mode.places_finish() {
            Some(WinReason::ReachedFinish)
        } else {
            None
        };

        if let Some(reason) = reason {
            self.armed = false;
            out.push(Command::CompleteLevel { reason });
        }
    }
}

impl Default for WinCondition {
    fn default() -> Self {
        Self::new(WinMode::default(), EXPLORATION_THRESHOLD)
    }
}
