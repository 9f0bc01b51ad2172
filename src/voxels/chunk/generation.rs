//! # Chunk Generation Module
//!
//! The procedural pipeline that fills a freshly created chunk:
//!
//! 1. terrain: per column biome, height, surface cover, trees and underground fill
//! 2. clouds: a sparse layer in the top row of the chunk
//! 3. overlay: user edits recorded for this chunk replace whatever was generated
//!
//! Generation is a pure function of the world parameters, the chunk coordinate
//! and the edits passed in. A fresh [`RandomSource`] is built from the world
//! seed for every chunk, so the noise fields are identical for all chunks and
//! terrain lines up across borders.

use cgmath::Point3;
use log::{debug, info};
use web_time::Instant;

use crate::config::WorldParams;
use crate::procedural::biome::Biome;
use crate::procedural::noise_field::{NoiseField, SimplexField};
use crate::procedural::random::RandomSource;
use crate::voxels::block::block_type::BlockType;
use crate::voxels::block::BlockTypeSize;

use super::Chunk;

/// The terrain noise field shared by every column of a chunk.
///
/// One field serves biomes, surface height and every underground resource;
/// resources differ only in the scale they sample it at. It is the first value
/// drawn from the seeded [`RandomSource`] that later decides tree placement.
/// The cloud field is drawn after it and lives outside the sampler.
#[derive(Clone, Debug)]
pub struct TerrainSampler {
    terrain: SimplexField,
}

impl TerrainSampler {
    /// Builds the terrain field from the next value of `rng`.
    pub fn new(rng: &mut RandomSource) -> Self {
        TerrainSampler {
            terrain: SimplexField::from_random(rng),
        }
    }

    /// Builds the sampler a chunk generated with `seed` would use.
    pub fn from_seed(seed: i64) -> Self {
        Self::new(&mut RandomSource::new(seed))
    }

    /// The biome of world column `(x, z)`.
    pub fn biome(&self, params: &WorldParams, x: i32, z: i32) -> Biome {
        Biome::classify(&self.terrain, &params.biomes, x as f64, z as f64)
    }

    /// The surface height of world column `(x, z)`, clamped into
    /// `[0, chunk_height - 1]`.
    pub fn surface_height(&self, params: &WorldParams, x: i32, z: i32, chunk_height: u32) -> i32 {
        let terrain = &params.terrain;
        let value = self
            .terrain
            .noise2(x as f64 / terrain.scale, z as f64 / terrain.scale);
        let height = (terrain.offset + terrain.magnitude * value).floor();
        height.clamp(0.0, (chunk_height as f64 - 1.0).max(0.0)) as i32
    }

    fn resource_sample(&self, scale_x: f64, scale_y: f64, scale_z: f64, world: Point3<i32>) -> f64 {
        self.terrain.noise3(
            world.x as f64 / scale_x,
            world.y as f64 / scale_y,
            world.z as f64 / scale_z,
        )
    }
}

/// Runs the full pipeline over `chunk`, then applies `edits`.
///
/// The chunk's cells are overwritten in place. Lifecycle state is left to the
/// caller. Visibility flags are not computed here because they depend on
/// neighboring chunks.
///
/// # Arguments
/// * `chunk` - A freshly created chunk
/// * `params` - World generation parameters
/// * `edits` - Overlay entries keyed to this chunk, as `(local, block id)`
pub fn generate(chunk: &mut Chunk, params: &WorldParams, edits: &[(Point3<i32>, BlockTypeSize)]) {
    let start = Instant::now();

    let mut rng = RandomSource::new(params.seed);
    let sampler = TerrainSampler::new(&mut rng);
    generate_terrain(chunk, params, &sampler, &mut rng);

    let clouds = SimplexField::from_random(&mut rng);
    generate_clouds(chunk, params, &clouds);

    apply_edits(chunk, edits);

    info!(
        "Generated chunk ({}, {}) in {:.2}ms",
        chunk.coord().x,
        chunk.coord().z,
        start.elapsed().as_secs_f64() * 1000.0
    );
}

/// Fills every column of the chunk: surface, trees and underground.
fn generate_terrain(
    chunk: &mut Chunk,
    params: &WorldParams,
    sampler: &TerrainSampler,
    rng: &mut RandomSource,
) {
    let size = chunk.size();
    let origin = chunk.origin();
    let width = size.width as i32;
    let chunk_height = size.height as i32;

    for x in 0..width {
        for z in 0..width {
            let world_x = origin.x + x;
            let world_z = origin.z + z;
            let biome = sampler.biome(params, world_x, world_z);
            let height = sampler.surface_height(params, world_x, world_z, size.height);

            for y in (0..chunk_height).rev() {
                let local = Point3::new(x, y, z);
                if y == height && y as f64 <= params.terrain.water_offset {
                    chunk.set_block_type(local, BlockType::SAND);
                } else if y == height {
                    chunk.set_block_type(local, biome.ground_block());
                    if rng.next() < params.trees.frequency {
                        generate_tree(chunk, params, rng, biome, Point3::new(x, height + 1, z));
                    }
                } else if y < height && chunk.is_empty_at(local) {
                    generate_underground(chunk, params, sampler, local);
                }
            }
        }
    }
}

/// Sets the filler block, then lets each resource field claim the cell.
/// Later resources in the configured order win ties.
fn generate_underground(
    chunk: &mut Chunk,
    params: &WorldParams,
    sampler: &TerrainSampler,
    local: Point3<i32>,
) {
    let origin = chunk.origin();
    let world = Point3::new(origin.x + local.x, local.y, origin.z + local.z);
    let mut block_id = BlockType::DIRT.id();
    for resource in &params.resources {
        let value =
            sampler.resource_sample(resource.scale.x, resource.scale.y, resource.scale.z, world);
        if value > resource.scarcity {
            block_id = resource.block_id;
        }
    }
    chunk.set_block_id(local, block_id);
}

/// Builds a trunk rooted at `base`, then a canopy for biomes that have one.
fn generate_tree(
    chunk: &mut Chunk,
    params: &WorldParams,
    rng: &mut RandomSource,
    biome: Biome,
    base: Point3<i32>,
) {
    let trunk = &params.trees.trunk;
    let trunk_height = rng.next_rounded(trunk.min_height, trunk.max_height);
    let trunk_block = biome.trunk_block();

    for y in base.y..base.y + trunk_height {
        chunk.set_block_type(Point3::new(base.x, y, base.z), trunk_block);
    }

    if let Some(leaves) = biome.canopy_block() {
        let top = Point3::new(base.x, base.y + trunk_height, base.z);
        generate_canopy(chunk, params, rng, leaves, top);
    }
}

/// Grows a sparse sphere of leaves around `center`.
///
/// One random value is drawn per cell of the bounding cube, inside the sphere
/// or not, so the sequence consumed does not depend on the radius test.
/// Leaves only go into empty cells.
fn generate_canopy(
    chunk: &mut Chunk,
    params: &WorldParams,
    rng: &mut RandomSource,
    leaves: BlockType,
    center: Point3<i32>,
) {
    let canopy = &params.trees.canopy;
    let radius = rng.next_rounded(canopy.min_radius, canopy.max_radius);

    for dx in -radius..=radius {
        for dy in -radius..=radius {
            for dz in -radius..=radius {
                let roll = rng.next();
                if dx * dx + dy * dy + dz * dz > radius * radius {
                    continue;
                }
                let target = Point3::new(center.x + dx, center.y + dy, center.z + dz);
                if chunk.is_empty_at(target) && roll < canopy.density {
                    chunk.set_block_type(target, leaves);
                }
            }
        }
    }
}

/// Places clouds in the top row where the cloud field falls below the density.
fn generate_clouds(chunk: &mut Chunk, params: &WorldParams, field: &impl NoiseField) {
    let size = chunk.size();
    let origin = chunk.origin();
    let width = size.width as i32;
    let top = size.height as i32 - 1;
    let scale = params.clouds.scale;

    for x in 0..width {
        for z in 0..width {
            let value = (field.noise2(
                (origin.x + x) as f64 / scale,
                (origin.z + z) as f64 / scale,
            ) + 1.0)
                * 0.5;
            if value < params.clouds.density {
                chunk.set_block_type(Point3::new(x, top, z), BlockType::CLOUD);
            }
        }
    }
}

/// Overwrites generated cells with recorded user edits.
fn apply_edits(chunk: &mut Chunk, edits: &[(Point3<i32>, BlockTypeSize)]) {
    for (local, block_id) in edits {
        chunk.set_block_id(*local, *block_id);
    }
    if !edits.is_empty() {
        debug!(
            "Applied {} overlay edits to chunk ({}, {})",
            edits.len(),
            chunk.coord().x,
            chunk.coord().z
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::chunk::{ChunkCoord, ChunkSize};

    fn generate_fresh(coord: ChunkCoord, size: ChunkSize, params: &WorldParams) -> Chunk {
        let mut chunk = Chunk::new(coord, size);
        generate(&mut chunk, params, &[]);
        chunk
    }

    fn flat_params(offset: f64) -> WorldParams {
        let mut params = WorldParams::default();
        params.terrain.magnitude = 0.0;
        params.terrain.offset = offset;
        params.trees.frequency = 0.0;
        params.clouds.density = 0.0;
        params
    }

    #[test]
    fn generation_is_deterministic() {
        let params = WorldParams::default();
        let size = ChunkSize::default();
        let a = generate_fresh(ChunkCoord::new(0, 0), size, &params);
        let b = generate_fresh(ChunkCoord::new(0, 0), size, &params);
        assert_eq!(a.blocks(), b.blocks());
    }

    #[test]
    fn different_seeds_produce_different_chunks() {
        let size = ChunkSize::new(16, 32);
        let mut params = WorldParams::default();
        params.terrain.magnitude = 12.0;
        let a = generate_fresh(ChunkCoord::new(0, 0), size, &params);
        params.seed = 99;
        let b = generate_fresh(ChunkCoord::new(0, 0), size, &params);
        assert_ne!(a.blocks(), b.blocks());
    }

    #[test]
    fn flat_terrain_has_surface_at_offset_and_fill_below() {
        let params = flat_params(10.0);
        let chunk = generate_fresh(ChunkCoord::new(-1, 3), ChunkSize::new(8, 16), &params);
        for x in 0..8 {
            for z in 0..8 {
                // Flat temperate/jungle/desert/tundra ground cover, never empty.
                assert!(!chunk.is_empty_at(Point3::new(x, 10, z)));
                assert!(chunk.is_empty_at(Point3::new(x, 11, z)));
                for y in 0..10 {
                    let id = chunk.block_id_at(Point3::new(x, y, z)).unwrap();
                    let allowed = [
                        BlockType::DIRT.id(),
                        BlockType::STONE.id(),
                        BlockType::COAL_ORE.id(),
                        BlockType::IRON_ORE.id(),
                    ];
                    assert!(allowed.contains(&id), "unexpected underground id {id}");
                }
            }
        }
    }

    #[test]
    fn surface_at_or_below_water_is_sand() {
        let params = flat_params(3.0);
        let chunk = generate_fresh(ChunkCoord::new(5, 5), ChunkSize::new(8, 16), &params);
        for x in 0..8 {
            for z in 0..8 {
                assert_eq!(
                    chunk.block_id_at(Point3::new(x, 3, z)),
                    Some(BlockType::SAND.id())
                );
            }
        }
    }

    #[test]
    fn height_is_clamped_into_the_chunk() {
        let sampler = TerrainSampler::from_seed(0);
        let mut params = flat_params(500.0);
        assert_eq!(sampler.surface_height(&params, 7, 7, 16), 15);
        params.terrain.offset = -40.0;
        assert_eq!(sampler.surface_height(&params, 7, 7, 16), 0);
    }

    #[test]
    fn later_resource_wins_when_both_exceed() {
        let mut params = flat_params(6.0);
        // Every sample exceeds a scarcity of -2, so the last entry must win.
        for resource in &mut params.resources {
            resource.scarcity = -2.0;
        }
        let chunk = generate_fresh(ChunkCoord::new(0, 0), ChunkSize::new(4, 8), &params);
        assert_eq!(
            chunk.block_id_at(Point3::new(1, 2, 1)),
            Some(BlockType::IRON_ORE.id())
        );
    }

    #[test]
    fn edits_override_generated_cells() {
        let params = flat_params(6.0);
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0), ChunkSize::new(4, 8));
        let edits = [
            (Point3::new(0, 6, 0), BlockType::AIR.id()),
            (Point3::new(1, 7, 1), BlockType::CACTUS.id()),
        ];
        generate(&mut chunk, &params, &edits);
        assert!(chunk.is_empty_at(Point3::new(0, 6, 0)));
        assert_eq!(
            chunk.block_id_at(Point3::new(1, 7, 1)),
            Some(BlockType::CACTUS.id())
        );
    }

    #[test]
    fn full_cloud_density_covers_the_top_row() {
        let mut params = flat_params(2.0);
        params.clouds.density = 2.0;
        let chunk = generate_fresh(ChunkCoord::new(0, 0), ChunkSize::new(4, 8), &params);
        for x in 0..4 {
            for z in 0..4 {
                assert_eq!(
                    chunk.block_id_at(Point3::new(x, 7, z)),
                    Some(BlockType::CLOUD.id())
                );
            }
        }
    }

    #[test]
    fn certain_trees_grow_trunks_and_canopies() {
        let mut params = flat_params(5.0);
        params.trees.frequency = 1.0;
        params.trees.canopy.density = 1.0;
        let chunk = generate_fresh(ChunkCoord::new(0, 0), ChunkSize::new(8, 24), &params);
        let tree_blocks = [
            BlockType::TREE.id(),
            BlockType::JUNGLE_TREE.id(),
            BlockType::CACTUS.id(),
        ];
        // Column (0, 0) is processed first, so nothing can pre-empt its trunk base.
        let base = chunk.block_id_at(Point3::new(0, 6, 0)).unwrap();
        assert!(tree_blocks.contains(&base), "expected a trunk, found {base}");
    }

    #[test]
    fn canopy_never_overwrites_existing_blocks() {
        let mut params = flat_params(5.0);
        params.trees.canopy.density = 1.0;
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0), ChunkSize::new(8, 16));
        let occupied = Point3::new(4, 9, 4);
        chunk.set_block_type(occupied, BlockType::STONE);
        let mut rng = RandomSource::new(1);
        generate_canopy(&mut chunk, &params, &mut rng, BlockType::LEAVES, Point3::new(4, 9, 4));
        assert_eq!(chunk.block_id_at(occupied), Some(BlockType::STONE.id()));
        assert_eq!(
            chunk.block_id_at(Point3::new(4, 10, 4)),
            Some(BlockType::LEAVES.id())
        );
    }
}
