//! # Block Type Module
//!
//! This module defines the named block types of the voxel world.
//! It provides conversion between the compact stored id and the rich enum.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use super::BlockTypeSize;

/// Enumerates the named block types in the voxel world.
///
/// Each variant's discriminant is the id stored in chunks and in the edit
/// overlay. The `FromPrimitive` derive allows conversion back from that id.
/// Ids outside this list are still storable; they simply have no name.
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// The empty block. Never visible, never obscures a neighbor.
    AIR = 0,

    /// Surface cover for temperate and jungle columns.
    GRASS = 1,

    /// Default underground filler.
    DIRT = 2,

    /// Common underground resource.
    STONE = 3,

    /// Underground resource.
    COAL_ORE = 4,

    /// Rare underground resource.
    IRON_ORE = 5,

    /// Trunk of temperate and tundra trees.
    TREE = 6,

    /// Canopy of temperate trees.
    LEAVES = 7,

    /// Desert surface, beaches and underwater surface.
    SAND = 8,

    /// Cloud layer at the top of the chunk.
    CLOUD = 9,

    /// Tundra surface.
    SNOW = 10,

    /// Trunk of jungle trees.
    JUNGLE_TREE = 11,

    /// Canopy of jungle trees.
    JUNGLE_LEAVES = 12,

    /// Desert "trunk"; never gets a canopy.
    CACTUS = 13,

    /// Registered jungle surface variant. Ground cover selection never picks it.
    JUNGLE_GRASS = 14,
}

impl BlockType {
    /// Converts a stored id to a `BlockType`.
    ///
    /// # Returns
    /// The named type, or `None` if the id is not registered.
    pub fn from_id(id: BlockTypeSize) -> Option<Self> {
        FromPrimitive::from_u8(id)
    }

    /// The id stored for this type.
    pub fn id(self) -> BlockTypeSize {
        self as BlockTypeSize
    }

    /// Whether this is the empty block.
    pub fn is_empty(self) -> bool {
        self == BlockType::AIR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_from_id() {
        for id in 0..=14 {
            let block_type = BlockType::from_id(id).unwrap();
            assert_eq!(block_type.id(), id);
        }
    }

    #[test]
    fn unknown_ids_have_no_name() {
        assert_eq!(BlockType::from_id(15), None);
        assert_eq!(BlockType::from_id(255), None);
    }

    #[test]
    fn only_air_is_empty() {
        assert!(BlockType::AIR.is_empty());
        assert!(!BlockType::DIRT.is_empty());
    }
}
