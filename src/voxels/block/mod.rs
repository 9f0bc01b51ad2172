//! # Block Module
//!
//! This module provides the block cell stored in every chunk position, the
//! registry of named block types, and the six block faces used for neighbor
//! lookups.

use block_type::BlockType;

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block ids in memory.
/// This is used for efficient storage and serialization of block data.
pub type BlockTypeSize = u8;

/// Bit in [`Block::flags`] marking the block as exposed to empty space.
const VISIBLE_FLAG: u8 = 0b0000_0001;

/// Represents a single voxel cell in a chunk.
///
/// A cell stores its block id and a cached visibility flag. The flag is
/// derived state: a cell is visible when it is not empty and at least one of
/// its six neighbors is empty or outside every loaded chunk. The world keeps
/// it current as blocks are added and removed.
///
/// # Memory Layout
/// The `#[repr(C)]` attribute ensures a consistent memory layout so a
/// renderer can upload a chunk's cells directly with `bytemuck::cast_slice`.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq, Eq, Default)]
pub struct Block {
    /// The block id, see [`BlockType`] for the named ids.
    pub block_type: BlockTypeSize,
    /// Packed cell flags.
    pub flags: u8,
}

impl Block {
    /// The empty, invisible cell every chunk starts with.
    pub const EMPTY: Block = Block {
        block_type: BlockType::AIR as BlockTypeSize,
        flags: 0,
    };

    /// Creates a hidden block of the specified type.
    pub fn new(block_type: BlockType) -> Self {
        Self::from_id(block_type as BlockTypeSize)
    }

    /// Creates a hidden block from a raw id.
    pub fn from_id(block_type: BlockTypeSize) -> Self {
        Block {
            block_type,
            flags: 0,
        }
    }

    /// The named type of this block, if the id is registered.
    pub fn block_type(&self) -> Option<BlockType> {
        BlockType::from_id(self.block_type)
    }

    /// Whether this cell holds the empty block.
    pub fn is_empty(&self) -> bool {
        self.block_type == BlockType::AIR as BlockTypeSize
    }

    /// Whether the cell is currently flagged visible.
    pub fn is_visible(&self) -> bool {
        self.flags & VISIBLE_FLAG != 0
    }

    /// Sets or clears the visibility flag. Empty cells are never flagged.
    pub fn set_visible(&mut self, visible: bool) {
        if visible && !self.is_empty() {
            self.flags |= VISIBLE_FLAG;
        } else {
            self.flags &= !VISIBLE_FLAG;
        }
    }

    /// Replaces the id. An emptied cell loses its visibility flag.
    pub fn set_id(&mut self, block_type: BlockTypeSize) {
        self.block_type = block_type;
        if self.is_empty() {
            self.flags &= !VISIBLE_FLAG;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeroed_block_is_empty_and_hidden() {
        let block: Block = bytemuck::Zeroable::zeroed();
        assert_eq!(block, Block::EMPTY);
        assert!(block.is_empty());
        assert!(!block.is_visible());
    }

    #[test]
    fn empty_blocks_never_become_visible() {
        let mut block = Block::EMPTY;
        block.set_visible(true);
        assert!(!block.is_visible());
    }

    #[test]
    fn clearing_the_id_clears_visibility() {
        let mut block = Block::new(BlockType::STONE);
        block.set_visible(true);
        assert!(block.is_visible());
        block.set_id(BlockType::AIR.id());
        assert!(!block.is_visible());
    }

    #[test]
    fn cells_cast_to_bytes() {
        let cells = [Block::new(BlockType::DIRT), Block::new(BlockType::SAND)];
        let bytes: &[u8] = bytemuck::cast_slice(&cells);
        assert_eq!(bytes, &[2, 0, 8, 0]);
    }
}
