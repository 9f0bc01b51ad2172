//! # Biome Module
//!
//! Column-level climate classification. A biome decides the surface block of a
//! column and what kind of vegetation grows on it.

use serde::{Deserialize, Serialize};

use crate::config::BiomeParams;
use crate::voxels::block::block_type::BlockType;

use super::noise_field::NoiseField;

/// The four biomes, ordered by ascending biome noise.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Biome {
    /// Coldest band. Snow cover, plain trees without canopy.
    Tundra,
    /// Grass cover, trees with leaf canopies.
    Temperate,
    /// Grass cover, jungle trees with jungle leaf canopies.
    Jungle,
    /// Sand cover, cacti.
    Desert,
}

impl Biome {
    /// Classifies the world-space column `(x, z)`.
    ///
    /// The base sample is remapped from `[-1, 1]` into roughly `[0, 1]`; the
    /// variation sample is added on top without remapping, then the sum is
    /// compared against the three ascending thresholds.
    pub fn classify(field: &impl NoiseField, params: &BiomeParams, x: f64, z: f64) -> Biome {
        let mut value = 0.5 * field.noise2(x / params.scale, z / params.scale) + 0.5;
        value += params.variation.amplitude
            * field.noise2(x / params.variation.scale, z / params.variation.scale);
        Self::from_value(value, params)
    }

    /// Maps an already sampled biome value onto a biome.
    pub fn from_value(value: f64, params: &BiomeParams) -> Biome {
        if value < params.tundra_to_temperate {
            Biome::Tundra
        } else if value < params.temperate_to_jungle {
            Biome::Temperate
        } else if value < params.jungle_to_desert {
            Biome::Jungle
        } else {
            Biome::Desert
        }
    }

    /// The block placed on the surface of a column above the water line.
    pub fn ground_block(self) -> BlockType {
        match self {
            Biome::Desert => BlockType::SAND,
            // Jungle columns share temperate grass; JUNGLE_GRASS is never chosen here.
            Biome::Temperate | Biome::Jungle => BlockType::GRASS,
            Biome::Tundra => BlockType::SNOW,
        }
    }

    /// The block a trunk is built from.
    pub fn trunk_block(self) -> BlockType {
        match self {
            Biome::Temperate | Biome::Tundra => BlockType::TREE,
            Biome::Jungle => BlockType::JUNGLE_TREE,
            Biome::Desert => BlockType::CACTUS,
        }
    }

    /// The leaf block of the canopy, or `None` for biomes whose trees are bare.
    pub fn canopy_block(self) -> Option<BlockType> {
        match self {
            Biome::Temperate => Some(BlockType::LEAVES),
            Biome::Jungle => Some(BlockType::JUNGLE_LEAVES),
            Biome::Tundra | Biome::Desert => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ConstantField(f64);

    impl NoiseField for ConstantField {
        fn noise2(&self, _x: f64, _z: f64) -> f64 {
            self.0
        }

        fn noise3(&self, _x: f64, _y: f64, _z: f64) -> f64 {
            self.0
        }
    }

    #[test]
    fn thresholds_are_exclusive_upper_bounds() {
        let params = BiomeParams::default();
        assert_eq!(Biome::from_value(0.0, &params), Biome::Tundra);
        assert_eq!(Biome::from_value(0.25, &params), Biome::Temperate);
        assert_eq!(Biome::from_value(0.5, &params), Biome::Jungle);
        assert_eq!(Biome::from_value(0.749, &params), Biome::Jungle);
        assert_eq!(Biome::from_value(0.75, &params), Biome::Desert);
    }

    #[test]
    fn variation_is_added_after_remap() {
        let params = BiomeParams::default();
        // 0.5 * 0 + 0.5 + 0.2 * 0 = 0.5 -> Jungle
        assert_eq!(Biome::classify(&ConstantField(0.0), &params, 3.0, 4.0), Biome::Jungle);
        // 0.5 * -1 + 0.5 + 0.2 * -1 = -0.2 -> Tundra
        assert_eq!(Biome::classify(&ConstantField(-1.0), &params, 3.0, 4.0), Biome::Tundra);
        // 0.5 * 1 + 0.5 + 0.2 * 1 = 1.2 -> Desert
        assert_eq!(Biome::classify(&ConstantField(1.0), &params, 3.0, 4.0), Biome::Desert);
    }

    #[test]
    fn jungle_ground_is_plain_grass() {
        assert_eq!(Biome::Jungle.ground_block(), BlockType::GRASS);
        assert_eq!(Biome::Temperate.ground_block(), BlockType::GRASS);
        assert_eq!(Biome::Desert.ground_block(), BlockType::SAND);
        assert_eq!(Biome::Tundra.ground_block(), BlockType::SNOW);
    }

    #[test]
    fn only_temperate_and_jungle_grow_canopies() {
        assert!(Biome::Temperate.canopy_block().is_some());
        assert!(Biome::Jungle.canopy_block().is_some());
        assert!(Biome::Tundra.canopy_block().is_none());
        assert!(Biome::Desert.canopy_block().is_none());
        assert_eq!(Biome::Desert.trunk_block(), BlockType::CACTUS);
    }
}
