#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel World
//!
//! A deterministic, procedurally generated voxel world with user edits.
//!
//! The crate is the simulation core of a block-building game: it generates
//! chunks of terrain from a seed, keeps track of which cells need a visual
//! representation, applies user edits and saves them. It never renders; a
//! renderer consumes [`render::VisibilityEvent`]s and the visible cells of
//! each loaded chunk.
//!
//! ## Key Modules
//!
//! * `procedural` - Seeded random numbers, noise fields and biome classification
//! * `voxels` - Blocks, chunks, the generation pipeline, the edit overlay and the world
//! * `task_management` - Cooperative idle-time scheduling of chunk generation
//! * `persistence` - String-keyed stores the world saves into
//! * `config` - Session configuration and generation parameters
//!
//! ## Usage
//!
//! ```rust
//! use voxel_world::config::WorldConfig;
//! use voxel_world::voxels::world::World;
//!
//! let mut config = WorldConfig::default();
//! config.async_loading = false;
//! config.draw_distance = 0;
//!
//! let mut world = World::new(config).unwrap();
//! world.regenerate(false);
//! assert!(world.get_block(0, 0, 0).is_some());
//! ```

use std::path::PathBuf;
use std::time::Duration;

use log::info;
use web_time::Instant;

use config::WorldConfig;
use error::WorldError;
use persistence::FileStore;
use voxels::world::World;

pub mod config;
pub mod error;
pub mod persistence;
pub mod procedural;
pub mod render;
pub mod task_management;
pub mod voxels;

/// Idle time handed to the scheduler per simulated frame by [`run`].
const FRAME_IDLE_BUDGET: Duration = Duration::from_millis(16);

/// Headless entry point used by the `voxel-world` binary.
///
/// Usage: `voxel-world [CONFIG_JSON] [SAVE_DIR]`
///
/// Generates the world described by the optional configuration file, drives
/// the scheduler until every chunk is loaded, logs statistics and, when a
/// save directory is given, saves into it.
pub fn run() -> Result<(), WorldError> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => WorldConfig::from_file(path)?,
        None => WorldConfig::default(),
    };
    let save_dir = args.next().map(PathBuf::from);

    let start = Instant::now();
    let mut world = World::new(config)?;
    world.regenerate(false);

    let mut frames = 0;
    while world.pending_generation() > 0 {
        world.process_tasks(FRAME_IDLE_BUDGET);
        frames += 1;
    }

    let events = world.drain_events();
    let solid: usize = world.loaded_chunks().map(|chunk| chunk.solid_count()).sum();
    let visible: usize = world
        .loaded_chunks()
        .map(|chunk| chunk.visible_blocks().count())
        .sum();
    info!(
        "Generated {} chunks in {:.2}ms over {} frames: {} solid blocks, {} visible, {} events",
        world.loaded_chunk_count(),
        start.elapsed().as_secs_f64() * 1000.0,
        frames,
        solid,
        visible,
        events.len()
    );

    if let Some(dir) = save_dir {
        let mut store = FileStore::new(dir)?;
        world.save(&mut store)?;
        info!("Saved world to {}", store.root().display());
    }

    Ok(())
}
