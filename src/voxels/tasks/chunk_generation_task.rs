//! # Chunk Generation Task
//!
//! This module defines the `ChunkGenerationTask` which handles deferred
//! generation of chunk data. This task is scheduled by the world whenever a
//! chunk is requested while async loading is enabled.

use cgmath::Point3;
use log::warn;

use crate::config::WorldParams;
use crate::task_management::task::{Task, TaskResult};
use crate::voxels::block::BlockTypeSize;
use crate::voxels::chunk::{generation, Chunk, ChunkCoord, ChunkSize};
use crate::voxels::world::World;

/// A task that generates one chunk away from the world.
///
/// The task owns a snapshot of everything generation depends on: parameters,
/// dimensions and the overlay entries recorded for the chunk at the time it
/// was scheduled. The world is only touched once the result is handled.
pub struct ChunkGenerationTask {
    /// The chunk coordinate to generate
    coord: ChunkCoord,
    /// Chunk dimensions
    size: ChunkSize,
    /// Generation parameters at scheduling time
    params: WorldParams,
    /// Overlay entries keyed to this chunk
    edits: Vec<(Point3<i32>, BlockTypeSize)>,
    /// Regeneration epoch the task belongs to
    epoch: u64,
}

impl ChunkGenerationTask {
    /// Creates a new chunk generation task.
    ///
    /// # Arguments
    /// * `coord` - The chunk coordinates where the chunk should be generated
    /// * `size` - The chunk dimensions
    /// * `params` - World generation parameters
    /// * `edits` - Overlay entries for this chunk as `(local, block id)`
    /// * `epoch` - The world's regeneration epoch; results from older epochs are discarded
    pub fn new(
        coord: ChunkCoord,
        size: ChunkSize,
        params: WorldParams,
        edits: Vec<(Point3<i32>, BlockTypeSize)>,
        epoch: u64,
    ) -> Self {
        ChunkGenerationTask {
            coord,
            size,
            params,
            edits,
            epoch,
        }
    }

    /// The chunk this task generates.
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }
}

impl Task for ChunkGenerationTask {
    /// Runs the generation pipeline and hands the finished chunk back.
    fn process(&self) -> Box<dyn TaskResult + Send> {
        let mut chunk = Chunk::new(self.coord, self.size);
        chunk.begin_generation();
        generation::generate(&mut chunk, &self.params, &self.edits);

        Box::new(ChunkGenerationTaskResult {
            chunk,
            epoch: self.epoch,
        })
    }
}

/// The result of a chunk generation task: a fully generated chunk waiting to
/// be installed.
pub struct ChunkGenerationTaskResult {
    chunk: Chunk,
    epoch: u64,
}

impl TaskResult for ChunkGenerationTaskResult {
    /// Installs the chunk into the world.
    ///
    /// Results produced for a superseded regeneration, or for a chunk the world
    /// no longer wants, are dropped.
    fn handle_result(self: Box<Self>, world: &mut World) -> Vec<Box<dyn Task + Send>> {
        let coord = self.chunk.coord();
        if !world.install_generated_chunk(self.chunk, self.epoch) {
            warn!(
                "Discarding stale generation result for chunk ({}, {})",
                coord.x, coord.z
            );
        }
        Vec::new()
    }
}
