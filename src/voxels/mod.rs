//! # Voxel World Core
//!
//! This module contains the voxel data model and the world that orchestrates it.
//!
//! ## Architecture
//!
//! The voxel system is organized into several key components:
//!
//! * **Block**: Individual cells, the block id registry and neighbor offsets
//! * **Chunk**: Fixed-size 3D arrays of blocks plus the procedural generation pipeline
//! * **EditOverlay**: Sparse user edits that survive regeneration
//! * **World**: Owns the loaded chunks, translates coordinates, applies edits and
//!   keeps visibility flags consistent across chunk borders
//! * **Tasks**: Deferred chunk generation
//!
//! ## Data Flow
//!
//! 1. World receives requests for block access or modification
//! 2. World resolves the owning chunk through a coordinate-keyed map
//! 3. Edits are recorded in the overlay and neighbor visibility is re-evaluated
//! 4. Visibility changes are queued as events for the renderer

pub mod block;
pub mod chunk;
pub mod coordinates;
pub mod edit_overlay;
pub mod tasks;
pub mod world;
