#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line entry point for the raycast maze.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use raycast_maze_cli::{Cli, Session};
use raycast_maze_rendering::{Presentation, RenderingBackend, WallTexture};
use raycast_maze_rendering_macroquad::{load_wall_texture, MacroquadBackend};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.session_config().context("failed to load settings")?;

    let texture = match &config.display.texture {
        Some(path) => load_wall_texture(path)?,
        None => {
            info!("no wall texture given; using the built-in brick pattern");
            WallTexture::brick()
        }
    };

    let seed = config.maze.seed.unwrap_or_else(rand::random);
    info!("maze seed {seed}");

    let mut session = Session::new(&config, seed, texture);
    let presentation = Presentation::new(session.window_title(), config.display.mode)
        .with_window_size(config.display.window_width, config.display.window_height);

    let mut backend = MacroquadBackend::new()
        .with_show_fps(config.display.show_fps)
        .with_cursor_grab(config.display.grab_cursor);
    if let Some(enabled) = config.display.vsync {
        backend = backend.with_vsync(enabled);
    }

    backend.run(presentation, move |dt, input, frame| {
        session.step(dt, &input, frame)
    })
}
