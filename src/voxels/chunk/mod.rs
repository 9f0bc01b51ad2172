//! # Chunk Module
//!
//! This module provides the `Chunk` struct and related functionality for
//! managing a fixed-size column of voxel data, `width × height × width` cells.
//!
//! ## Storage
//!
//! Chunks store every cell densely in a single `Vec<Block>`, indexed x first,
//! then z, then y. Every in-bounds coordinate always has exactly one cell;
//! generation only rewrites cell values and never replaces the vector.
//!
//! ## Lifecycle
//!
//! `Unloaded → Generating → Loaded → Disposed`. A chunk only answers block
//! queries through the world once it is `Loaded`; the world treats every other
//! state as "chunk not found".
//!
//! ### Performance Characteristics
//! - **Block Lookup**: O(1) index arithmetic
//! - **Memory Usage**: 2 bytes per cell

use cgmath::Point3;
use serde::{Deserialize, Serialize};

use super::block::block_type::BlockType;
use super::block::{Block, BlockTypeSize};

pub mod chunk_iteration;
pub mod generation;

use chunk_iteration::VisibleBlockIterator;

/// Default horizontal extent of a chunk in blocks.
pub const DEFAULT_CHUNK_WIDTH: u32 = 32;
/// Default vertical extent of a chunk in blocks.
pub const DEFAULT_CHUNK_HEIGHT: u32 = 32;

/// Position of a chunk in the chunk grid (not block coordinates).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    /// Grid position along x.
    pub x: i32,
    /// Grid position along z.
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a chunk coordinate.
    pub fn new(x: i32, z: i32) -> Self {
        ChunkCoord { x, z }
    }

    /// The chunk `dx`/`dz` steps away from this one.
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        ChunkCoord::new(self.x + dx, self.z + dz)
    }

    /// Chebyshev distance on the chunk grid, which is what draw distance measures.
    pub fn ring_distance(self, other: ChunkCoord) -> u32 {
        self.x.abs_diff(other.x).max(self.z.abs_diff(other.z))
    }
}

/// Dimensions shared by every chunk of a world.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkSize {
    /// Extent along x and z.
    pub width: u32,
    /// Extent along y.
    pub height: u32,
}

impl Default for ChunkSize {
    fn default() -> Self {
        ChunkSize {
            width: DEFAULT_CHUNK_WIDTH,
            height: DEFAULT_CHUNK_HEIGHT,
        }
    }
}

impl ChunkSize {
    /// Creates a chunk size.
    pub fn new(width: u32, height: u32) -> Self {
        ChunkSize { width, height }
    }

    /// Number of cells in one chunk.
    pub fn volume(&self) -> usize {
        self.width as usize * self.width as usize * self.height as usize
    }

    /// Whether `local` lies inside a chunk of this size.
    pub fn contains(&self, local: Point3<i32>) -> bool {
        let width = self.width as i32;
        (0..width).contains(&local.x)
            && (0..self.height as i32).contains(&local.y)
            && (0..width).contains(&local.z)
    }

    /// Dense index of `local`, or `None` when it is outside the chunk.
    pub fn index_of(&self, local: Point3<i32>) -> Option<usize> {
        if !self.contains(local) {
            return None;
        }
        let width = self.width as usize;
        Some(local.x as usize + width * (local.z as usize + width * local.y as usize))
    }

    /// Inverse of [`ChunkSize::index_of`].
    pub fn position_of(&self, index: usize) -> Point3<i32> {
        let width = self.width as usize;
        let x = index % width;
        let z = (index / width) % width;
        let y = index / (width * width);
        Point3::new(x as i32, y as i32, z as i32)
    }
}

/// Where a chunk is in its lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ChunkState {
    /// Allocated and empty, generation not started.
    Unloaded,
    /// Generation has been started or scheduled.
    Generating,
    /// Fully generated; accepts queries and mutations.
    Loaded,
    /// Released by the world; rendering resources should be dropped.
    Disposed,
}

/// Represents one `width × height × width` column of voxel cells.
///
/// Chunks are the unit of generation, loading and disposal. Each chunk owns
/// its cells exclusively and knows its own grid coordinate.
#[derive(Clone, Debug)]
pub struct Chunk {
    coord: ChunkCoord,
    size: ChunkSize,
    state: ChunkState,
    blocks: Vec<Block>,
}

impl Chunk {
    /// Creates a new, completely empty chunk in the `Unloaded` state.
    ///
    /// # Arguments
    /// * `coord` - The chunk coordinates of the new chunk
    /// * `size` - The chunk dimensions
    pub fn new(coord: ChunkCoord, size: ChunkSize) -> Self {
        Chunk {
            coord,
            size,
            state: ChunkState::Unloaded,
            blocks: vec![Block::EMPTY; size.volume()],
        }
    }

    /// The chunk's grid coordinate.
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// The chunk's dimensions.
    pub fn size(&self) -> ChunkSize {
        self.size
    }

    /// The chunk's lifecycle state.
    pub fn state(&self) -> ChunkState {
        self.state
    }

    /// Shorthand for `state() == ChunkState::Loaded`.
    pub fn is_loaded(&self) -> bool {
        self.state == ChunkState::Loaded
    }

    /// Moves the chunk into `Generating`.
    pub fn begin_generation(&mut self) {
        self.state = ChunkState::Generating;
    }

    /// Moves the chunk into `Loaded`.
    pub fn mark_loaded(&mut self) {
        self.state = ChunkState::Loaded;
    }

    /// Moves the chunk into `Disposed`.
    pub fn dispose(&mut self) {
        self.state = ChunkState::Disposed;
    }

    /// World-space position of local cell `(0, 0, 0)`.
    pub fn origin(&self) -> Point3<i32> {
        let width = self.size.width as i32;
        Point3::new(self.coord.x * width, 0, self.coord.z * width)
    }

    /// Gets the block at the specified chunk-relative coordinates.
    ///
    /// # Returns
    /// The cell, or `None` if the coordinates are out of bounds.
    pub fn get_block_at(&self, local: Point3<i32>) -> Option<&Block> {
        self.size.index_of(local).map(|index| &self.blocks[index])
    }

    /// Mutable variant of [`Chunk::get_block_at`].
    pub fn get_block_at_mut(&mut self, local: Point3<i32>) -> Option<&mut Block> {
        self.size.index_of(local).map(move |index| &mut self.blocks[index])
    }

    /// Returns the block id at `local`, or `None` when out of bounds.
    pub fn block_id_at(&self, local: Point3<i32>) -> Option<BlockTypeSize> {
        self.get_block_at(local).map(|block| block.block_type)
    }

    /// Whether `local` is in bounds and holds the empty block.
    pub fn is_empty_at(&self, local: Point3<i32>) -> bool {
        self.get_block_at(local).is_some_and(Block::is_empty)
    }

    /// Sets the block id at `local`.
    ///
    /// # Returns
    /// `false` if the coordinates are out of bounds and nothing changed.
    pub fn set_block_id(&mut self, local: Point3<i32>, block_type: BlockTypeSize) -> bool {
        match self.get_block_at_mut(local) {
            Some(block) => {
                block.set_id(block_type);
                true
            }
            None => false,
        }
    }

    /// Typed variant of [`Chunk::set_block_id`].
    pub fn set_block_type(&mut self, local: Point3<i32>, block_type: BlockType) -> bool {
        self.set_block_id(local, block_type as BlockTypeSize)
    }

    /// Updates the cached visibility flag at `local`.
    ///
    /// # Returns
    /// `Some(previous_flag)` if the cell exists.
    pub fn set_visible(&mut self, local: Point3<i32>, visible: bool) -> Option<bool> {
        let block = self.get_block_at_mut(local)?;
        let previous = block.is_visible();
        block.set_visible(visible);
        Some(previous)
    }

    /// Checks whether all six neighbors of `local` that lie inside this chunk
    /// are occupied and none lies outside it.
    ///
    /// Neighbors outside the chunk count as exposed; the world refines this
    /// with cross-chunk lookups.
    pub fn is_block_obscured(&self, local: Point3<i32>) -> bool {
        super::block::block_side::BlockSide::neighbors(local)
            .iter()
            .all(|neighbor| self.get_block_at(*neighbor).is_some_and(|b| !b.is_empty()))
    }

    /// All cells in dense index order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Iterates over every visible cell together with its local position.
    pub fn visible_blocks(&self) -> VisibleBlockIterator<'_> {
        VisibleBlockIterator::new(self)
    }

    /// Number of non-empty cells.
    pub fn solid_count(&self) -> usize {
        self.blocks.iter().filter(|block| !block.is_empty()).count()
    }
}
