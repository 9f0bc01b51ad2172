//! # Configuration Module
//!
//! Every tunable the world engine reads. [`WorldParams`] is the persisted
//! generation record (what a save file stores); [`WorldConfig`] adds the
//! session options around it (chunk dimensions, draw distance, scheduling).
//!
//! Both serialize with camelCase keys so a configuration file reads like:
//!
//! ```json
//! {
//!   "seed": 7,
//!   "chunk": { "width": 32, "height": 32 },
//!   "drawDistance": 2,
//!   "terrain": { "scale": 100, "magnitude": 8, "offset": 6, "waterOffset": 4 },
//!   "trees": { "frequency": 0.01 }
//! }
//! ```
//!
//! Missing keys fall back to the defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::voxels::block::block_type::BlockType;
use crate::voxels::block::BlockTypeSize;
use crate::voxels::chunk::ChunkSize;

/// Widest chunk a world accepts.
pub const MAX_CHUNK_WIDTH: u32 = 256;
/// Tallest chunk a world accepts.
pub const MAX_CHUNK_HEIGHT: u32 = 256;
/// Largest number of chunk rings kept loaded around the focal chunk.
pub const MAX_DRAW_DISTANCE: u32 = 32;
/// Tallest tree trunk, in blocks.
pub const MAX_TRUNK_HEIGHT: f64 = 256.0;
/// Largest canopy radius, in blocks.
pub const MAX_CANOPY_RADIUS: f64 = 16.0;

/// Height map parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TerrainParams {
    /// Horizontal noise scale; larger values give broader hills.
    pub scale: f64,
    /// Height swing around `offset`.
    pub magnitude: f64,
    /// Base surface height.
    pub offset: f64,
    /// Surface cells at or below this height are sand.
    pub water_offset: f64,
}

impl Default for TerrainParams {
    fn default() -> Self {
        TerrainParams {
            scale: 100.0,
            magnitude: 8.0,
            offset: 6.0,
            water_offset: 4.0,
        }
    }
}

/// Second, finer octave added to the biome noise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BiomeVariation {
    /// Weight of the variation sample.
    pub amplitude: f64,
    /// Horizontal scale of the variation sample.
    pub scale: f64,
}

impl Default for BiomeVariation {
    fn default() -> Self {
        BiomeVariation {
            amplitude: 0.2,
            scale: 50.0,
        }
    }
}

/// Biome map parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BiomeParams {
    /// Horizontal scale of the base biome sample.
    pub scale: f64,
    /// Finer variation octave.
    pub variation: BiomeVariation,
    /// Upper bound of the tundra band.
    pub tundra_to_temperate: f64,
    /// Upper bound of the temperate band.
    pub temperate_to_jungle: f64,
    /// Upper bound of the jungle band; everything above is desert.
    pub jungle_to_desert: f64,
}

impl Default for BiomeParams {
    fn default() -> Self {
        BiomeParams {
            scale: 500.0,
            variation: BiomeVariation::default(),
            tundra_to_temperate: 0.25,
            temperate_to_jungle: 0.5,
            jungle_to_desert: 0.75,
        }
    }
}

/// Trunk height range.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrunkParams {
    /// Shortest trunk, in blocks.
    pub min_height: f64,
    /// Tallest trunk, in blocks.
    pub max_height: f64,
}

impl Default for TrunkParams {
    fn default() -> Self {
        TrunkParams {
            min_height: 4.0,
            max_height: 7.0,
        }
    }
}

/// Canopy shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CanopyParams {
    /// Smallest canopy radius.
    pub min_radius: f64,
    /// Largest canopy radius.
    pub max_radius: f64,
    /// Chance in `[0, 1]` that a cell inside the sphere becomes a leaf.
    pub density: f64,
}

impl Default for CanopyParams {
    fn default() -> Self {
        CanopyParams {
            min_radius: 3.0,
            max_radius: 3.0,
            density: 0.7,
        }
    }
}

/// Vegetation parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TreeParams {
    /// Trunk height range.
    pub trunk: TrunkParams,
    /// Canopy shape.
    pub canopy: CanopyParams,
    /// Chance per surface column of rooting a tree.
    pub frequency: f64,
}

impl Default for TreeParams {
    fn default() -> Self {
        TreeParams {
            trunk: TrunkParams::default(),
            canopy: CanopyParams::default(),
            frequency: 0.005,
        }
    }
}

/// Cloud layer parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CloudParams {
    /// Horizontal noise scale of the cloud layer.
    pub scale: f64,
    /// Fraction of the sky covered; `0` disables clouds.
    pub density: f64,
}

impl Default for CloudParams {
    fn default() -> Self {
        CloudParams {
            scale: 30.0,
            density: 0.3,
        }
    }
}

/// Per-axis noise scale of a resource field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourceScale {
    /// Scale along x.
    pub x: f64,
    /// Scale along y.
    pub y: f64,
    /// Scale along z.
    pub z: f64,
}

/// An ore-like block scattered through the underground filler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceParams {
    /// Display name, only used for logging.
    #[serde(default)]
    pub name: String,
    /// Noise scale per axis.
    pub scale: ResourceScale,
    /// Noise cutoff; cells whose sample exceeds it become this resource.
    pub scarcity: f64,
    /// Block placed where the cutoff is exceeded.
    pub block_id: BlockTypeSize,
}

impl ResourceParams {
    fn new(name: &str, scale: f64, scarcity: f64, block: BlockType) -> Self {
        ResourceParams {
            name: name.to_string(),
            scale: ResourceScale {
                x: scale,
                y: scale,
                z: scale,
            },
            scarcity,
            block_id: block as BlockTypeSize,
        }
    }
}

/// The resources generated when none are configured.
///
/// Order matters: when several fields exceed their cutoff at the same cell the
/// last one in the list wins.
pub fn default_resources() -> Vec<ResourceParams> {
    vec![
        ResourceParams::new("stone", 30.0, 0.8, BlockType::STONE),
        ResourceParams::new("coalOre", 20.0, 0.8, BlockType::COAL_ORE),
        ResourceParams::new("ironOre", 40.0, 0.9, BlockType::IRON_ORE),
    ]
}

/// The generation record. Together with a chunk coordinate this fully
/// determines the procedural content of that chunk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorldParams {
    /// World seed.
    pub seed: i64,
    /// Height map.
    pub terrain: TerrainParams,
    /// Biome map.
    pub biomes: BiomeParams,
    /// Vegetation.
    pub trees: TreeParams,
    /// Cloud layer.
    pub clouds: CloudParams,
    /// Underground resources, evaluated in order.
    pub resources: Vec<ResourceParams>,
}

impl Default for WorldParams {
    fn default() -> Self {
        WorldParams {
            seed: 0,
            terrain: TerrainParams::default(),
            biomes: BiomeParams::default(),
            trees: TreeParams::default(),
            clouds: CloudParams::default(),
            resources: default_resources(),
        }
    }
}

fn require(condition: bool, name: &'static str, reason: &'static str) -> Result<(), ConfigError> {
    if condition {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter { name, reason })
    }
}

impl WorldParams {
    /// Checks that every parameter is usable by the generator.
    ///
    /// Noise scales are divisors, so they must be strictly positive; ranges
    /// must not be inverted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require(self.terrain.scale > 0.0, "terrain.scale", "must be positive")?;
        require(self.biomes.scale > 0.0, "biomes.scale", "must be positive")?;
        require(
            self.biomes.variation.scale > 0.0,
            "biomes.variation.scale",
            "must be positive",
        )?;
        require(
            self.biomes.tundra_to_temperate <= self.biomes.temperate_to_jungle
                && self.biomes.temperate_to_jungle <= self.biomes.jungle_to_desert,
            "biomes",
            "thresholds must be ascending",
        )?;
        require(
            self.trees.trunk.min_height >= 0.0
                && self.trees.trunk.min_height <= self.trees.trunk.max_height,
            "trees.trunk",
            "minHeight must be non-negative and not above maxHeight",
        )?;
        require(
            self.trees.trunk.max_height <= MAX_TRUNK_HEIGHT,
            "trees.trunk.maxHeight",
            "must not exceed 256",
        )?;
        require(
            self.trees.canopy.min_radius >= 0.0
                && self.trees.canopy.min_radius <= self.trees.canopy.max_radius,
            "trees.canopy",
            "minRadius must be non-negative and not above maxRadius",
        )?;
        require(
            self.trees.canopy.max_radius <= MAX_CANOPY_RADIUS,
            "trees.canopy.maxRadius",
            "must not exceed 16",
        )?;
        require(
            (0.0..=1.0).contains(&self.trees.frequency),
            "trees.frequency",
            "must be within [0, 1]",
        )?;
        require(self.clouds.scale > 0.0, "clouds.scale", "must be positive")?;
        for resource in &self.resources {
            require(
                resource.scale.x > 0.0 && resource.scale.y > 0.0 && resource.scale.z > 0.0,
                "resources.scale",
                "every axis must be positive",
            )?;
        }
        Ok(())
    }
}

/// Session configuration for a [`World`](crate::voxels::world::World).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorldConfig {
    /// Chunk dimensions.
    pub chunk: ChunkSize,
    /// Number of chunk rings kept loaded around the focal chunk.
    pub draw_distance: u32,
    /// Whether chunk generation is handed to the idle-time scheduler.
    pub async_loading: bool,
    /// Latest point, in milliseconds after submission, at which a scheduled
    /// generation runs even if the host never goes idle.
    pub generation_timeout_ms: u64,
    /// Generation parameters.
    #[serde(flatten)]
    pub params: WorldParams,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            chunk: ChunkSize::default(),
            draw_distance: 3,
            async_loading: true,
            generation_timeout_ms: 1000,
            params: WorldParams::default(),
        }
    }
}

impl WorldConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: WorldConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Validates chunk dimensions and generation parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require(
            (1..=MAX_CHUNK_WIDTH).contains(&self.chunk.width),
            "chunk.width",
            "must be within [1, 256]",
        )?;
        require(
            (1..=MAX_CHUNK_HEIGHT).contains(&self.chunk.height),
            "chunk.height",
            "must be within [1, 256]",
        )?;
        require(
            self.draw_distance <= MAX_DRAW_DISTANCE,
            "drawDistance",
            "must not exceed 32",
        )?;
        self.params.validate()
    }
}
