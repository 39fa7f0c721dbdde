//! Frame-by-frame orchestration of world, systems and renderer.

use std::time::Duration;

use log::info;
use raycast_maze_core::{Command, Event, WinMode, WinReason};
use raycast_maze_rendering::{Announcement, FrameBuffer, FrameInput, FrameOutcome, WallTexture};
use raycast_maze_system_locomotion::{Locomotion, LocomotionInput};
use raycast_maze_system_raycasting::render_frame;
use raycast_maze_system_win_condition::WinCondition;
use raycast_maze_world::{apply, query, World};

use crate::config::SessionConfig;

const COMPLETION_TITLE: &str = "Level Complete";
const FINISH_MESSAGE: &str = "You found the finish! Click OK to generate a new maze.";
const EXPLORED_MESSAGE: &str = "You explored long enough, new level! Click OK to continue.";

/// Owns the world and the systems that drive it for one play session.
#[derive(Debug)]
pub struct Session {
    world: World,
    locomotion: Locomotion,
    win_condition: WinCondition,
    texture: WallTexture,
    commands: Vec<Command>,
    events: Vec<Event>,
}

impl Session {
    /// Creates a session and generates its first maze.
    #[must_use]
    pub fn new(config: &SessionConfig, seed: u64, texture: WallTexture) -> Self {
        let mut session = Self {
            world: World::awaiting_configuration(seed, config.movement.hitbox_radius),
            locomotion: Locomotion::new(config.locomotion()),
            win_condition: WinCondition::new(
                WinMode::default(),
                config.maze.exploration_threshold,
            ),
            texture,
            commands: Vec::new(),
            events: Vec::new(),
        };
        session.commands.push(Command::ConfigureMaze {
            columns: config.maze.columns,
            rows: config.maze.rows,
            win_mode: config.maze.win_mode,
            display_mode: config.display.mode,
        });
        let _ = session.dispatch();
        session
    }

    /// Title shown on the window.
    #[must_use]
    pub fn window_title(&self) -> String {
        format!(
            "Raycast Maze - Explore {} Cells",
            self.win_condition.threshold()
        )
    }

    /// Read-only view of the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Advances the session by one frame and renders the resulting view.
    ///
    /// The outcome carries an announcement when the frame completed a level;
    /// the frame already shows the freshly generated maze in that case.
    pub fn step(&mut self, dt: Duration, input: &FrameInput, frame: &mut FrameBuffer) -> FrameOutcome {
        let locomotion_input = LocomotionInput {
            forward: input.forward,
            backward: input.backward,
            strafe_left: input.strafe_left,
            strafe_right: input.strafe_right,
            run: input.run,
            turn_left: input.turn_left,
            turn_right: input.turn_right,
            mouse_delta_x: input.mouse_delta.x,
        };
        self.locomotion.handle(
            dt,
            &locomotion_input,
            &query::pose(&self.world),
            &mut self.commands,
        );
        let announcement = self.dispatch();

        render_frame(
            &query::pose(&self.world),
            query::grid(&self.world),
            &self.texture,
            frame,
        );

        announcement.map_or_else(FrameOutcome::default, FrameOutcome::announce)
    }

    /// Applies queued commands and feeds resulting events back to the win
    /// condition until no further commands are produced.
    ///
    /// The win condition adopts the world's mode whenever a maze is generated.
    fn dispatch(&mut self) -> Option<Announcement> {
        let mut announcement = None;
        while !self.commands.is_empty() {
            self.events.clear();
            for command in self.commands.drain(..) {
                apply(&mut self.world, command, &mut self.events);
            }

            for event in &self.events {
                match event {
                    Event::MazeGenerated {
                        level,
                        columns,
                        rows,
                        finish,
                    } => {
                        self.win_condition.set_mode(query::win_mode(&self.world));
                        match finish {
                            Some(cell) => info!(
                                "level {level}: generated {columns}x{rows} maze with finish at ({}, {})",
                                cell.column(),
                                cell.row()
                            ),
                            None => info!("level {level}: generated {columns}x{rows} maze"),
                        }
                    }
                    Event::LevelCompleted { level, reason } => {
                        info!("level {level} completed: {reason:?}");
                        announcement = Some(completion_announcement(*reason));
                    }
                    Event::PlayerMoved { .. } | Event::CellVisited { .. } => {}
                }
            }

            self.win_condition.handle(&self.events, &mut self.commands);
        }
        announcement
    }
}

fn completion_announcement(reason: WinReason) -> Announcement {
    let message = match reason {
        WinReason::ReachedFinish => FINISH_MESSAGE,
        WinReason::ExploredThreshold => EXPLORED_MESSAGE,
    };
    Announcement::new(COMPLETION_TITLE, message)
}
