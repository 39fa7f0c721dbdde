//! Command-line flags layered on top of the settings file.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use raycast_maze_core::{DisplayMode, WinMode, MAX_MAP_EDGE, MIN_MAP_EDGE};

use crate::config::{ConfigError, SessionConfig};

/// First-person raycast maze explorer.
#[derive(Debug, Default, Parser)]
#[command(name = "raycast-maze", version)]
pub struct Cli {
    /// Runs in a 640x480 window instead of fullscreen.
    #[arg(long, conflicts_with = "fullscreen")]
    pub windowed: bool,

    /// Runs fullscreen even when the settings file asks for a window.
    #[arg(long)]
    pub fullscreen: bool,

    /// Conditions that complete a level.
    #[arg(long, value_enum, value_name = "MODE")]
    pub win_mode: Option<WinModeArg>,

    /// Seed for maze generation; drawn at random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// 64x64 image used for wall faces.
    #[arg(long, value_name = "PATH")]
    pub texture: Option<PathBuf>,

    /// TOML settings file with `[maze]`, `[movement]` and `[display]` tables.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Number of maze columns.
    #[arg(long, value_parser = clap::value_parser!(u32).range(i64::from(MIN_MAP_EDGE)..=i64::from(MAX_MAP_EDGE)))]
    pub columns: Option<u32>,

    /// Number of maze rows.
    #[arg(long, value_parser = clap::value_parser!(u32).range(i64::from(MIN_MAP_EDGE)..=i64::from(MAX_MAP_EDGE)))]
    pub rows: Option<u32>,

    /// Forces vsync on or off.
    #[arg(long, value_name = "BOOL")]
    pub vsync: Option<bool>,

    /// Logs frame timing once per second.
    #[arg(long)]
    pub show_fps: bool,
}

/// Win mode spelling accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum WinModeArg {
    /// Only the finish cell completes a level.
    Finish,
    /// Only exploring enough cells completes a level.
    Threshold,
    /// Either condition completes a level.
    Both,
}

impl From<WinModeArg> for WinMode {
    fn from(value: WinModeArg) -> Self {
        match value {
            WinModeArg::Finish => Self::FinishOnly,
            WinModeArg::Threshold => Self::ThresholdOnly,
            WinModeArg::Both => Self::Both,
        }
    }
}

impl Cli {
    /// Loads the settings file, if any, applies the flags and validates the result.
    ///
    /// # Errors
    ///
    /// Propagates load failures and rejects invalid settings.
    pub fn session_config(&self) -> Result<SessionConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => SessionConfig::load(path)?,
            None => SessionConfig::default(),
        };
        self.apply_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Overwrites settings with every flag that was supplied.
    pub fn apply_overrides(&self, config: &mut SessionConfig) {
        if self.windowed {
            config.display.mode = DisplayMode::Windowed;
        }
        if self.fullscreen {
            config.display.mode = DisplayMode::Fullscreen;
        }
        if let Some(win_mode) = self.win_mode {
            config.maze.win_mode = win_mode.into();
        }
        if let Some(seed) = self.seed {
            config.maze.seed = Some(seed);
        }
        if let Some(texture) = &self.texture {
            config.display.texture = Some(texture.clone());
        }
        if let Some(columns) = self.columns {
            config.maze.columns = columns;
        }
        if let Some(rows) = self.rows {
            config.maze.rows = rows;
        }
        if let Some(vsync) = self.vsync {
            config.display.vsync = Some(vsync);
        }
        config.display.show_fps |= self.show_fps;
    }
}
