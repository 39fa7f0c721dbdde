//! Session settings loaded from TOML and validated before play starts.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use raycast_maze_core::{
    DisplayMode, WinMode, DEFAULT_MAP_COLUMNS, DEFAULT_MAP_ROWS, EXPLORATION_THRESHOLD,
    HITBOX_RADIUS, MAX_MAP_EDGE, MIN_MAP_EDGE, MOUSE_SENSITIVITY, MOVE_SPEED, RUN_MULTIPLIER, TURN_SPEED,
    WINDOWED_SIZE,
};
use raycast_maze_system_locomotion::{LocomotionConfig, DEFAULT_MAX_FRAME_DELTA};
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading or validating session settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings file could not be read.
    #[error("failed to read config file {}", path.display())]
    Read {
        /// Location that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The settings file is not valid TOML or holds unknown keys.
    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),
    /// A setting holds a value the session cannot run with.
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending setting.
        field: &'static str,
        /// What is wrong with the value.
        reason: &'static str,
    },
}

/// Complete set of tunables for one play session.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Maze shape and completion rules.
    pub maze: MazeSettings,
    /// Player motion tunables.
    pub movement: MovementSettings,
    /// Window and presentation settings.
    pub display: DisplaySettings,
}

/// `[maze]` table.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MazeSettings {
    /// Grid columns.
    pub columns: u32,
    /// Grid rows.
    pub rows: u32,
    /// Conditions that complete a level.
    pub win_mode: WinMode,
    /// Distinct cells required by the exploration condition.
    pub exploration_threshold: u32,
    /// Fixed seed; a random one is drawn when absent.
    pub seed: Option<u64>,
}

impl Default for MazeSettings {
    fn default() -> Self {
        Self {
            columns: DEFAULT_MAP_COLUMNS,
            rows: DEFAULT_MAP_ROWS,
            win_mode: WinMode::default(),
            exploration_threshold: EXPLORATION_THRESHOLD,
            seed: None,
        }
    }
}

/// `[movement]` table.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MovementSettings {
    /// Walking speed in cells per second.
    pub move_speed: f64,
    /// Speed factor applied while running.
    pub run_multiplier: f64,
    /// Key turn speed in radians per second.
    pub turn_speed: f64,
    /// Radians of yaw per pixel of mouse motion.
    pub mouse_sensitivity: f64,
    /// Player collision radius in cells.
    pub hitbox_radius: f64,
    /// Longest frame delta integrated in one step, in milliseconds.
    pub max_frame_delta_ms: u64,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            move_speed: MOVE_SPEED,
            run_multiplier: RUN_MULTIPLIER,
            turn_speed: TURN_SPEED,
            mouse_sensitivity: MOUSE_SENSITIVITY,
            hitbox_radius: HITBOX_RADIUS,
            max_frame_delta_ms: DEFAULT_MAX_FRAME_DELTA.as_millis() as u64,
        }
    }
}

/// `[display]` table.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplaySettings {
    /// Windowed or fullscreen presentation.
    pub mode: DisplayMode,
    /// Window width in windowed mode.
    pub window_width: u32,
    /// Window height in windowed mode.
    pub window_height: u32,
    /// Forces vsync on or off; the platform default applies when absent.
    pub vsync: Option<bool>,
    /// Logs frame timing once per second.
    pub show_fps: bool,
    /// Hides and confines the cursor while playing.
    pub grab_cursor: bool,
    /// Wall texture image; the built-in brick pattern is used when absent.
    pub texture: Option<PathBuf>,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            mode: DisplayMode::Fullscreen,
            window_width: WINDOWED_SIZE.0,
            window_height: WINDOWED_SIZE.1,
            vsync: None,
            show_fps: false,
            grab_cursor: true,
            texture: None,
        }
    }
}

impl SessionConfig {
    /// Parses settings from TOML text. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Reads and parses a settings file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file is unreadable and
    /// [`ConfigError::Parse`] when its contents are rejected.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Checks that every setting is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let maze = &self.maze;
        ensure(
            (MIN_MAP_EDGE..=MAX_MAP_EDGE).contains(&maze.columns),
            "maze.columns",
            "must lie in [3, 4096]",
        )?;
        ensure(
            (MIN_MAP_EDGE..=MAX_MAP_EDGE).contains(&maze.rows),
            "maze.rows",
            "must lie in [3, 4096]",
        )?;
        ensure(
            maze.exploration_threshold > 0,
            "maze.exploration_threshold",
            "must be positive",
        )?;

        let movement = &self.movement;
        ensure(
            positive(movement.move_speed),
            "movement.move_speed",
            "must be a positive number",
        )?;
        ensure(
            movement.run_multiplier.is_finite() && movement.run_multiplier >= 1.0,
            "movement.run_multiplier",
            "must be at least 1",
        )?;
        ensure(
            movement.turn_speed.is_finite() && movement.turn_speed >= 0.0,
            "movement.turn_speed",
            "must be a non-negative number",
        )?;
        ensure(
            movement.mouse_sensitivity.is_finite(),
            "movement.mouse_sensitivity",
            "must be a finite number",
        )?;
        ensure(
            movement.hitbox_radius.is_finite()
                && movement.hitbox_radius >= 0.0
                && movement.hitbox_radius < 0.5,
            "movement.hitbox_radius",
            "must lie in [0, 0.5)",
        )?;
        ensure(
            movement.max_frame_delta_ms > 0,
            "movement.max_frame_delta_ms",
            "must be positive",
        )?;

        let display = &self.display;
        ensure(
            display.window_width > 0 && display.window_height > 0,
            "display.window_width",
            "window size must be non-zero",
        )?;
        Ok(())
    }

    /// Locomotion tunables derived from the `[movement]` table.
    #[must_use]
    pub fn locomotion(&self) -> LocomotionConfig {
        let movement = &self.movement;
        LocomotionConfig {
            move_speed: movement.move_speed,
            run_multiplier: movement.run_multiplier,
            turn_speed: movement.turn_speed,
            mouse_sensitivity: movement.mouse_sensitivity,
            max_frame_delta: Duration::from_millis(movement.max_frame_delta_ms),
        }
    }
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn ensure(condition: bool, field: &'static str, reason: &'static str) -> Result<(), ConfigError> {
    if condition {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_reference_settings() {
        let config = SessionConfig::from_toml_str("").expect("empty config parses");
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.maze.columns, 250);
        assert_eq!(config.maze.exploration_threshold, 300);
        assert_eq!(config.display.mode, DisplayMode::Fullscreen);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_tables_keep_remaining_defaults() {
        let config = SessionConfig::from_toml_str(
            r#"
                [maze]
                columns = 31
                win-mode = "finish-only"

                [display]
                mode = "windowed"
                vsync = false
            "#,
        );
        assert!(matches!(config, Err(ConfigError::Parse(_))), "keys use snake case");

        let config = SessionConfig::from_toml_str(
            r#"
                [maze]
                columns = 31
                win_mode = "finish-only"
                seed = 7

                [display]
                mode = "windowed"
                vsync = false
            "#,
        )
        .expect("config parses");
        assert_eq!(config.maze.columns, 31);
        assert_eq!(config.maze.rows, 250);
        assert_eq!(config.maze.win_mode, WinMode::FinishOnly);
        assert_eq!(config.maze.seed, Some(7));
        assert_eq!(config.display.mode, DisplayMode::Windowed);
        assert_eq!(config.display.vsync, Some(false));
        assert!(config.display.grab_cursor);
        assert_eq!(config.movement, MovementSettings::default());

        let config = SessionConfig::from_toml_str("[display]\ngrab_cursor = false\n")
            .expect("config parses");
        assert!(!config.display.grab_cursor);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = SessionConfig::from_toml_str("[maze]\nwidth = 10\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn validation_names_the_offending_field() {
        let mut config = SessionConfig::default();
        config.maze.rows = 2;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "maze.rows", .. })
        ));

        let mut config = SessionConfig::default();
        config.maze.columns = MAX_MAP_EDGE + 1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "maze.columns",
                ..
            })
        ));

        let mut config = SessionConfig::default();
        config.maze.columns = MAX_MAP_EDGE;
        assert!(config.validate().is_ok());

        let mut config = SessionConfig::default();
        config.movement.hitbox_radius = 0.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "movement.hitbox_radius",
                ..
            })
        ));

        let mut config = SessionConfig::default();
        config.movement.move_speed = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "movement.move_speed",
                ..
            })
        ));
    }

    #[test]
    fn missing_file_reports_its_path() {
        let path = Path::new("definitely/not/here.toml");
        let error = SessionConfig::load(path).expect_err("file is missing");
        assert!(error.to_string().contains("definitely/not/here.toml"));
    }

    #[test]
    fn locomotion_mirrors_movement_table() {
        let mut config = SessionConfig::default();
        config.movement.move_speed = 5.0;
        config.movement.max_frame_delta_ms = 40;
        let locomotion = config.locomotion();
        assert_eq!(locomotion.move_speed, 5.0);
        assert_eq!(locomotion.max_frame_delta, Duration::from_millis(40));
        assert_eq!(locomotion.turn_speed, TURN_SPEED);
    }
}
