//! # World Module
//!
//! This module provides the `World` struct which manages the collection of chunks in the voxel world.
//! It serves as the central coordinator for chunk loading, unloading, mutation and access.
//!
//! ## Architecture
//!
//! The world uses sparse storage: only chunks within the draw distance of the
//! focal chunk are kept in memory, in a map keyed by chunk coordinate so lookups
//! are O(1). User edits live in an [`EditOverlay`] that outlives individual
//! chunks and is reapplied whenever a chunk is generated again.
//!
//! ## Chunk Lifecycle
//!
//! `Unloaded → Generating → Loaded → Disposed`. A chunk that is not `Loaded`
//! is invisible to every query and mutation. With async loading enabled,
//! generation is handed to the [`IdleScheduler`] and completes when the host
//! calls [`World::process_tasks`]; otherwise it runs inline.
//!
//! ## Visibility
//!
//! Every loaded cell carries a visibility flag: it is set iff the cell is
//! non-empty and at least one of its six neighbors is empty or not inside a
//! loaded chunk. The flag is kept current across chunk borders when blocks are
//! edited and when neighboring chunks load or go away. Every change the
//! renderer has to mirror is queued as a [`VisibilityEvent`].

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use cgmath::Point3;
use log::{debug, info, warn};

use crate::config::{WorldConfig, WorldParams};
use crate::error::{PersistenceError, WorldError};
use crate::persistence::{KeyValueStore, EDITS_KEY, PARAMS_KEY};
use crate::render::{RenderSink, VisibilityEvent};
use crate::task_management::{IdleScheduler, TaskManager};

use super::block::block_side::BlockSide;
use super::block::block_type::BlockType;
use super::block::{Block, BlockTypeSize};
use super::chunk::{generation, Chunk, ChunkCoord, ChunkSize, ChunkState};
use super::coordinates::{self, BlockLocation};
use super::edit_overlay::EditOverlay;
use super::tasks::chunk_generation_task::ChunkGenerationTask;

const EMPTY_ID: BlockTypeSize = BlockType::AIR as BlockTypeSize;

/// Represents a voxel world composed of multiple chunks.
///
/// A world owns its chunks, its edit overlay and its scheduler, so several
/// independent worlds can coexist in one process.
///
/// # Example
/// ```rust
/// use voxel_world::config::WorldConfig;
/// use voxel_world::voxels::world::World;
///
/// let mut config = WorldConfig::default();
/// config.async_loading = false;
/// config.draw_distance = 0;
///
/// let mut world = World::new(config).unwrap();
/// world.regenerate(false);
/// assert_eq!(world.loaded_chunk_count(), 1);
/// ```
pub struct World {
    config: WorldConfig,
    /// Chunks that finished generating, keyed by coordinate
    chunks: HashMap<ChunkCoord, Chunk>,
    /// Chunks whose generation was requested but has not been installed
    generating: HashSet<ChunkCoord>,
    overlay: EditOverlay,
    scheduler: Box<dyn IdleScheduler>,
    events: Vec<VisibilityEvent>,
    /// Bumped on every regeneration; results from older epochs are stale
    epoch: u64,
    focal_chunk: ChunkCoord,
}

impl World {
    /// Creates an empty world using the bundled [`TaskManager`].
    ///
    /// No chunk is loaded until [`World::regenerate`] or [`World::update`] is called.
    ///
    /// # Errors
    /// [`WorldError::Config`] if the configuration does not validate.
    pub fn new(config: WorldConfig) -> Result<Self, WorldError> {
        Self::with_scheduler(config, Box::new(TaskManager::new()))
    }

    /// Creates an empty world that defers generation to `scheduler`.
    pub fn with_scheduler(
        config: WorldConfig,
        scheduler: Box<dyn IdleScheduler>,
    ) -> Result<Self, WorldError> {
        config.validate()?;
        Ok(World {
            config,
            chunks: HashMap::new(),
            generating: HashSet::new(),
            overlay: EditOverlay::new(),
            scheduler,
            events: Vec::new(),
            epoch: 0,
            focal_chunk: ChunkCoord::new(0, 0),
        })
    }

    /// The session configuration.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// The generation parameters.
    pub fn params(&self) -> &WorldParams {
        &self.config.params
    }

    /// Chunk dimensions.
    pub fn chunk_size(&self) -> ChunkSize {
        self.config.chunk
    }

    /// The recorded user edits.
    pub fn overlay(&self) -> &EditOverlay {
        &self.overlay
    }

    /// The chunk the loaded area is centered on.
    pub fn focal_chunk(&self) -> ChunkCoord {
        self.focal_chunk
    }

    /// Splits world position `(x, y, z)` into chunk and local coordinates.
    pub fn world_to_chunk_coords(&self, x: i32, y: i32, z: i32) -> BlockLocation {
        coordinates::world_to_chunk_coords(self.config.chunk, x, y, z)
    }

    /// Returns the loaded chunk at `coord`.
    ///
    /// Chunks that are still generating are reported as not found.
    pub fn lookup_chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Lifecycle state of the chunk at `coord`.
    pub fn chunk_state(&self, coord: ChunkCoord) -> ChunkState {
        if let Some(chunk) = self.chunks.get(&coord) {
            chunk.state()
        } else if self.generating.contains(&coord) {
            ChunkState::Generating
        } else {
            ChunkState::Unloaded
        }
    }

    /// Iterates over every loaded chunk, in no particular order.
    pub fn loaded_chunks(&self) -> impl Iterator<Item = &Chunk> + '_ {
        self.chunks.values()
    }

    /// Number of loaded chunks.
    pub fn loaded_chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Number of chunks requested but not yet installed.
    pub fn pending_generation(&self) -> usize {
        self.generating.len()
    }

    /// Returns the cell at world position `(x, y, z)` if its chunk is loaded.
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> Option<Block> {
        let location = self.world_to_chunk_coords(x, y, z);
        self.lookup_chunk(location.chunk)?
            .get_block_at(location.local)
            .copied()
    }

    /// Throws away every chunk and generates the draw distance around the
    /// focal chunk again.
    ///
    /// Chunks are requested with `cx` ascending in the outer loop and `cz`
    /// ascending in the inner loop. Generation that was scheduled before this
    /// call still runs, but its result is discarded.
    ///
    /// # Arguments
    /// * `clear_overlay` - Forget every user edit first
    pub fn regenerate(&mut self, clear_overlay: bool) {
        if clear_overlay {
            self.overlay.clear();
        }
        self.dispose_all();
        self.epoch += 1;

        let draw_distance = self.config.draw_distance as i32;
        info!(
            "Regenerating world around chunk ({}, {}) with draw distance {}",
            self.focal_chunk.x, self.focal_chunk.z, draw_distance
        );
        for dx in -draw_distance..=draw_distance {
            for dz in -draw_distance..=draw_distance {
                self.request_chunk(self.focal_chunk.offset(dx, dz));
            }
        }
    }

    /// Re-centers the loaded area on the chunk containing `focal_point`.
    ///
    /// Chunks farther than the draw distance are disposed, missing chunks
    /// within it are requested.
    ///
    /// # Returns
    /// The number of newly requested chunks.
    pub fn update(&mut self, focal_point: Point3<f32>) -> usize {
        let focal = coordinates::clamp_focal_chunk(
            self.config.chunk,
            self.config.draw_distance,
            coordinates::chunk_containing(self.config.chunk, focal_point.x, focal_point.z),
        );
        self.focal_chunk = focal;
        let draw_distance = self.config.draw_distance;

        let mut out_of_range: Vec<ChunkCoord> = self
            .chunks
            .keys()
            .filter(|coord| coord.ring_distance(focal) > draw_distance)
            .copied()
            .collect();
        out_of_range.sort();
        for coord in out_of_range {
            self.dispose_chunk(coord);
        }
        // Their tasks still run; the results no longer have a slot to land in.
        self.generating
            .retain(|coord| coord.ring_distance(focal) <= draw_distance);

        let draw_distance = draw_distance as i32;
        let mut requested = 0;
        for dx in -draw_distance..=draw_distance {
            for dz in -draw_distance..=draw_distance {
                let coord = focal.offset(dx, dz);
                if !self.chunks.contains_key(&coord) && !self.generating.contains(&coord) {
                    self.request_chunk(coord);
                    requested += 1;
                }
            }
        }
        requested
    }

    /// Places `block_type` at world position `(x, y, z)`, overwriting whatever
    /// is there, and records the edit.
    ///
    /// Placing the empty id is treated as [`World::remove_block`].
    ///
    /// # Returns
    /// `false` if the position is not inside a loaded chunk and nothing changed.
    pub fn add_block(&mut self, x: i32, y: i32, z: i32, block_type: BlockTypeSize) -> bool {
        if block_type == EMPTY_ID {
            return self.remove_block(x, y, z);
        }

        let location = self.world_to_chunk_coords(x, y, z);
        let Some(chunk) = self.chunks.get_mut(&location.chunk) else {
            return false;
        };
        let Some(previous) = chunk.get_block_at(location.local).copied() else {
            return false;
        };

        chunk.set_block_id(location.local, block_type);
        if previous.is_visible() && previous.block_type != block_type {
            // The renderer has to swap the instance, not just keep it.
            chunk.set_visible(location.local, false);
            self.events.push(VisibilityEvent::BlockHidden {
                chunk: location.chunk,
                local: location.local,
            });
        }
        self.overlay.set(location.chunk, location.local, block_type);
        self.refresh_around(Point3::new(x, y, z));

        debug!("Added block {} at ({}, {}, {})", block_type, x, y, z);
        true
    }

    /// Empties the cell at world position `(x, y, z)` and records the edit.
    ///
    /// The bottom layer (`y == 0`) is immutable; removals there are ignored.
    ///
    /// # Returns
    /// `false` if nothing changed.
    pub fn remove_block(&mut self, x: i32, y: i32, z: i32) -> bool {
        if y == 0 {
            debug!("Ignoring removal at ({}, 0, {}) in the bedrock layer", x, z);
            return false;
        }

        let location = self.world_to_chunk_coords(x, y, z);
        let Some(chunk) = self.chunks.get_mut(&location.chunk) else {
            return false;
        };
        let Some(previous) = chunk.get_block_at(location.local).copied() else {
            return false;
        };

        chunk.set_block_id(location.local, EMPTY_ID);
        if previous.is_visible() {
            self.events.push(VisibilityEvent::BlockHidden {
                chunk: location.chunk,
                local: location.local,
            });
        }
        self.overlay.set(location.chunk, location.local, EMPTY_ID);
        self.refresh_around(Point3::new(x, y, z));

        debug!("Removed block at ({}, {}, {})", x, y, z);
        true
    }

    /// Runs scheduled generation and installs the results.
    ///
    /// # Arguments
    /// * `idle_budget` - Idle time the host can spare; overdue tasks run regardless
    ///
    /// # Returns
    /// The number of tasks that ran.
    pub fn process_tasks(&mut self, idle_budget: Duration) -> usize {
        let results = self.scheduler.run(idle_budget);
        let processed = results.len();
        let timeout = self.generation_timeout();
        for result in results {
            for follow_up in result.handle_result(self) {
                self.scheduler.schedule(follow_up, timeout);
            }
        }
        processed
    }

    /// Installs a chunk produced by a [`ChunkGenerationTask`].
    ///
    /// Computes the chunk's visibility flags, marks it loaded and re-evaluates
    /// the facing border cells of loaded neighbors.
    ///
    /// # Returns
    /// `false` if the result is stale: it belongs to an older regeneration, or
    /// the chunk is no longer wanted.
    pub fn install_generated_chunk(&mut self, mut chunk: Chunk, epoch: u64) -> bool {
        let coord = chunk.coord();
        if epoch != self.epoch || chunk.size() != self.config.chunk {
            return false;
        }
        if !self.generating.remove(&coord) {
            return false;
        }

        compute_visibility(&self.chunks, &mut chunk);
        chunk.mark_loaded();
        self.chunks.insert(coord, chunk);
        self.events.push(VisibilityEvent::ChunkLoaded(coord));
        debug!("Loaded chunk ({}, {})", coord.x, coord.z);

        self.refresh_borders_around(coord);
        true
    }

    /// Takes every queued visibility event.
    pub fn drain_events(&mut self) -> Vec<VisibilityEvent> {
        std::mem::take(&mut self.events)
    }

    /// Hands every queued visibility event to `sink`, in order.
    ///
    /// # Returns
    /// The number of events delivered.
    pub fn dispatch_events(&mut self, sink: &mut dyn RenderSink) -> usize {
        let events = self.drain_events();
        for event in &events {
            sink.handle_event(event);
        }
        events.len()
    }

    /// Writes the generation parameters and the edit overlay to `store`.
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), WorldError> {
        let params = serde_json::to_string(&self.config.params).map_err(PersistenceError::from)?;
        let edits = self.overlay.to_json()?;
        store.set(PARAMS_KEY, params)?;
        store.set(EDITS_KEY, edits)?;
        info!("Saved world with {} edits", self.overlay.len());
        Ok(())
    }

    /// Replaces the generation parameters and the edit overlay with the ones
    /// saved in `store`, then regenerates.
    ///
    /// Both entries are decoded and validated before anything is applied, so
    /// on error the world is exactly as it was.
    pub fn load(&mut self, store: &dyn KeyValueStore) -> Result<(), WorldError> {
        let (params, overlay) = match read_saved_state(store, self.config.chunk) {
            Ok(state) => state,
            Err(err) => {
                warn!("Failed to load world: {}", err);
                return Err(err);
            }
        };

        self.config.params = params;
        self.overlay = overlay;
        info!(
            "Loaded world with seed {} and {} edits",
            self.config.params.seed,
            self.overlay.len()
        );
        self.regenerate(false);
        Ok(())
    }

    fn generation_timeout(&self) -> Duration {
        Duration::from_millis(self.config.generation_timeout_ms)
    }

    fn request_chunk(&mut self, coord: ChunkCoord) {
        if self.chunks.contains_key(&coord) || !self.generating.insert(coord) {
            return;
        }

        let size = self.config.chunk;
        let edits = self.overlay.chunk_edits(coord);
        if self.config.async_loading {
            let task = ChunkGenerationTask::new(
                coord,
                size,
                self.config.params.clone(),
                edits,
                self.epoch,
            );
            self.scheduler
                .schedule(Box::new(task), self.generation_timeout());
            debug!("Scheduled generation of chunk ({}, {})", coord.x, coord.z);
        } else {
            let mut chunk = Chunk::new(coord, size);
            chunk.begin_generation();
            generation::generate(&mut chunk, &self.config.params, &edits);
            self.install_generated_chunk(chunk, self.epoch);
        }
    }

    fn dispose_all(&mut self) {
        let mut loaded: Vec<ChunkCoord> = self.chunks.keys().copied().collect();
        loaded.sort();
        for coord in loaded {
            if let Some(mut chunk) = self.chunks.remove(&coord) {
                chunk.dispose();
                self.events.push(VisibilityEvent::ChunkDisposed(coord));
            }
        }
        self.generating.clear();
    }

    fn dispose_chunk(&mut self, coord: ChunkCoord) {
        if let Some(mut chunk) = self.chunks.remove(&coord) {
            chunk.dispose();
            self.events.push(VisibilityEvent::ChunkDisposed(coord));
            debug!("Disposed chunk ({}, {})", coord.x, coord.z);
            self.refresh_borders_around(coord);
        }
    }

    /// Re-evaluates the cells of loaded neighbors that face chunk `coord`.
    fn refresh_borders_around(&mut self, coord: ChunkCoord) {
        let size = self.config.chunk;
        let width = size.width as i32;
        let height = size.height as i32;

        for (dx, dz) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
            let neighbor = coord.offset(dx, dz);
            if !self.chunks.contains_key(&neighbor) {
                continue;
            }
            let origin_x = neighbor.x * width;
            let origin_z = neighbor.z * width;
            for y in 0..height {
                for along in 0..width {
                    let local = match (dx, dz) {
                        (1, _) => Point3::new(0, y, along),
                        (-1, _) => Point3::new(width - 1, y, along),
                        (_, 1) => Point3::new(along, y, 0),
                        _ => Point3::new(along, y, width - 1),
                    };
                    self.refresh_visibility(Point3::new(origin_x + local.x, y, origin_z + local.z));
                }
            }
        }
    }

    /// Re-evaluates `position` and its six neighbors.
    fn refresh_around(&mut self, position: Point3<i32>) {
        self.refresh_visibility(position);
        for neighbor in BlockSide::neighbors(position) {
            self.refresh_visibility(neighbor);
        }
    }

    /// Brings the visibility flag at world `position` up to date and queues an
    /// event if it changed.
    fn refresh_visibility(&mut self, position: Point3<i32>) {
        let size = self.config.chunk;
        let location = coordinates::world_to_chunk_coords(size, position.x, position.y, position.z);
        let exposed = is_exposed(&self.chunks, size, position);

        let Some(chunk) = self.chunks.get_mut(&location.chunk) else {
            return;
        };
        let Some(block) = chunk.get_block_at(location.local).copied() else {
            return;
        };
        let visible = exposed && !block.is_empty();
        if block.is_visible() == visible {
            return;
        }

        chunk.set_visible(location.local, visible);
        self.events.push(if visible {
            VisibilityEvent::BlockShown {
                chunk: location.chunk,
                local: location.local,
                block_type: block.block_type,
            }
        } else {
            VisibilityEvent::BlockHidden {
                chunk: location.chunk,
                local: location.local,
            }
        });
    }
}

fn read_saved_state(
    store: &dyn KeyValueStore,
    size: ChunkSize,
) -> Result<(WorldParams, EditOverlay), WorldError> {
    let params_text = store
        .get(PARAMS_KEY)?
        .ok_or_else(|| PersistenceError::Missing(PARAMS_KEY.to_string()))?;
    let params: WorldParams =
        serde_json::from_str(&params_text).map_err(|source| PersistenceError::Malformed {
            key: PARAMS_KEY.to_string(),
            source,
        })?;
    params.validate()?;

    let edits_text = store
        .get(EDITS_KEY)?
        .ok_or_else(|| PersistenceError::Missing(EDITS_KEY.to_string()))?;
    let overlay = EditOverlay::from_json(EDITS_KEY, &edits_text)?;
    overlay.check_bounds(size)?;
    Ok((params, overlay))
}

/// The block id at world `position`, or `None` when no loaded chunk holds it.
fn loaded_block_id(
    chunks: &HashMap<ChunkCoord, Chunk>,
    size: ChunkSize,
    position: Point3<i32>,
) -> Option<BlockTypeSize> {
    let location = coordinates::world_to_chunk_coords(size, position.x, position.y, position.z);
    chunks.get(&location.chunk)?.block_id_at(location.local)
}

/// Whether any neighbor of world `position` is empty or outside every loaded chunk.
fn is_exposed(chunks: &HashMap<ChunkCoord, Chunk>, size: ChunkSize, position: Point3<i32>) -> bool {
    BlockSide::neighbors(position)
        .iter()
        .any(|neighbor| loaded_block_id(chunks, size, *neighbor).map_or(true, |id| id == EMPTY_ID))
}

/// Sets every visibility flag of a chunk that is about to be installed.
///
/// Neighbors inside the chunk are read from the chunk itself, the rest from
/// the already loaded `chunks`.
fn compute_visibility(chunks: &HashMap<ChunkCoord, Chunk>, chunk: &mut Chunk) {
    let size = chunk.size();
    let origin = chunk.origin();
    let height = size.height as i32;

    for index in 0..size.volume() {
        let local = size.position_of(index);
        if chunk.is_empty_at(local) {
            continue;
        }
        let exposed = BlockSide::neighbors(local).iter().any(|neighbor| {
            if size.contains(*neighbor) {
                chunk.is_empty_at(*neighbor)
            } else if neighbor.y < 0 || neighbor.y >= height {
                true
            } else {
                let world = Point3::new(origin.x + neighbor.x, neighbor.y, origin.z + neighbor.z);
                loaded_block_id(chunks, size, world).map_or(true, |id| id == EMPTY_ID)
            }
        });
        chunk.set_visible(local, exposed);
    }
}
