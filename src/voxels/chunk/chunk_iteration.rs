//! # Chunk Iteration Module
//!
//! This module provides an iterator over the visible cells of a chunk. It is
//! the enumeration a renderer consumes to build instances for a freshly loaded
//! chunk: one `(local position, block)` pair per cell whose visibility flag is
//! set.

use cgmath::Point3;

use crate::voxels::block::Block;

use super::Chunk;

/// An iterator over all visible blocks in a chunk.
///
/// The iterator walks the dense cell vector in index order (x fastest, then z,
/// then y) while tracking the matching local position, so it never has to
/// divide to recover coordinates.
pub struct VisibleBlockIterator<'a> {
    /// Reference to the chunk being iterated over
    chunk_ref: &'a Chunk,
    /// Current position in the cell vector
    current_offset: usize,
    /// Current X position within the chunk
    local_x: i32,
    /// Current Y position within the chunk
    local_y: i32,
    /// Current Z position within the chunk
    local_z: i32,
}

impl<'a> VisibleBlockIterator<'a> {
    /// Creates a new `VisibleBlockIterator` positioned at the first cell.
    pub fn new(chunk_ref: &'a Chunk) -> Self {
        VisibleBlockIterator {
            chunk_ref,
            current_offset: 0,
            local_x: 0,
            local_y: 0,
            local_z: 0,
        }
    }

    /// Moves the cursor one cell forward, wrapping rows and planes.
    fn advance(&mut self) {
        let width = self.chunk_ref.size().width as i32;
        self.current_offset += 1;
        self.local_x += 1;
        if self.local_x == width {
            self.local_x = 0;
            self.local_z += 1;
            if self.local_z == width {
                self.local_z = 0;
                self.local_y += 1;
            }
        }
    }
}

impl<'a> Iterator for VisibleBlockIterator<'a> {
    type Item = (Point3<i32>, &'a Block);

    fn next(&mut self) -> Option<Self::Item> {
        let blocks = self.chunk_ref.blocks();
        while self.current_offset < blocks.len() {
            let block = &blocks[self.current_offset];
            let position = Point3::new(self.local_x, self.local_y, self.local_z);
            self.advance();
            if block.is_visible() {
                return Some((position, block));
            }
        }
        None
    }
}
