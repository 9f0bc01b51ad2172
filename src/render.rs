//! # Render Notifications
//!
//! The world never renders. It records what a renderer needs to know as
//! [`VisibilityEvent`]s: which chunks appeared or went away, and which
//! individual cells became visible or hidden after an edit. A renderer drains
//! these once per frame and, for every `ChunkLoaded`, enumerates
//! [`Chunk::visible_blocks`](crate::voxels::chunk::Chunk::visible_blocks).

use cgmath::Point3;

use crate::voxels::block::BlockTypeSize;
use crate::voxels::chunk::ChunkCoord;

/// A change the rendering side has to mirror.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VisibilityEvent {
    /// A chunk finished generating; all of its visible cells should be instantiated.
    ChunkLoaded(ChunkCoord),
    /// A chunk was released; everything instantiated for it should be dropped.
    ChunkDisposed(ChunkCoord),
    /// A cell gained a visual representation.
    BlockShown {
        /// Owning chunk.
        chunk: ChunkCoord,
        /// Position inside the chunk.
        local: Point3<i32>,
        /// Block id to draw.
        block_type: BlockTypeSize,
    },
    /// A cell lost its visual representation.
    BlockHidden {
        /// Owning chunk.
        chunk: ChunkCoord,
        /// Position inside the chunk.
        local: Point3<i32>,
    },
}

/// Receives visibility notifications from a world.
pub trait RenderSink {
    /// Called once per event, in the order the events happened.
    fn handle_event(&mut self, event: &VisibilityEvent);
}

impl<F: FnMut(&VisibilityEvent)> RenderSink for F {
    fn handle_event(&mut self, event: &VisibilityEvent) {
        self(event)
    }
}
