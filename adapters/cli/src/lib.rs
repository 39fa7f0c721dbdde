#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the raycast maze.
//!
//! Settings come from an optional TOML file overridden by command-line
//! flags. A [`Session`] wires the world to the locomotion, win-condition and
//! raycasting systems and is driven one frame at a time by a rendering
//! backend.

mod args;
mod config;
mod session;

pub use args::{Cli, WinModeArg};
pub use config::{ConfigError, DisplaySettings, MazeSettings, MovementSettings, SessionConfig};
pub use session::Session;
