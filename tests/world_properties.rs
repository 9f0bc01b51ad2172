//! World-level properties that must hold for any seed and any edit sequence.

use cgmath::Point3;
use voxel_world::config::{WorldConfig, WorldParams};
use voxel_world::voxels::block::block_side::BlockSide;
use voxel_world::voxels::block::block_type::BlockType;
use voxel_world::voxels::block::BlockTypeSize;
use voxel_world::voxels::chunk::generation::{self, TerrainSampler};
use voxel_world::voxels::chunk::{Chunk, ChunkCoord, ChunkSize};
use voxel_world::voxels::coordinates::world_to_chunk_coords;
use voxel_world::voxels::world::World;

fn small_config(seed: i64) -> WorldConfig {
    let mut config = WorldConfig::default();
    config.chunk = ChunkSize::new(8, 16);
    config.draw_distance = 1;
    config.async_loading = false;
    config.params.seed = seed;
    // Dense trees so canopies straddle chunk borders.
    config.params.trees.frequency = 0.05;
    config
}

fn loaded_world(config: WorldConfig) -> World {
    let mut world = World::new(config).unwrap();
    world.regenerate(false);
    world
}

/// Checks every loaded cell against the definition of visibility.
fn assert_visibility_consistent(world: &World) {
    for chunk in world.loaded_chunks() {
        let size = chunk.size();
        let origin = chunk.origin();
        for (index, block) in chunk.blocks().iter().enumerate() {
            let local = size.position_of(index);
            let position = Point3::new(origin.x + local.x, local.y, origin.z + local.z);
            let exposed = BlockSide::neighbors(position)
                .iter()
                .any(|n| world.get_block(n.x, n.y, n.z).map_or(true, |b| b.is_empty()));
            assert_eq!(
                block.is_visible(),
                !block.is_empty() && exposed,
                "visibility flag wrong at {:?}",
                position
            );
        }
    }
}

#[test]
fn same_chunk_generates_identically_twice() {
    let params = WorldParams::default();
    let size = ChunkSize::new(32, 32);

    let mut first = Chunk::new(ChunkCoord::new(0, 0), size);
    generation::generate(&mut first, &params, &[]);
    let mut second = Chunk::new(ChunkCoord::new(0, 0), size);
    generation::generate(&mut second, &params, &[]);

    assert_eq!(first.blocks().len(), 32 * 32 * 32);
    assert_eq!(first.blocks(), second.blocks());
    assert!(first.solid_count() > 0);
}

#[test]
fn independent_worlds_agree_cell_for_cell() {
    let a = loaded_world(small_config(1234));
    let b = loaded_world(small_config(1234));
    for chunk in a.loaded_chunks() {
        let other = b.lookup_chunk(chunk.coord()).unwrap();
        assert_eq!(chunk.blocks(), other.blocks());
    }
}

#[test]
fn coordinate_round_trip_for_random_positions() {
    let mut rng = fastrand::Rng::with_seed(99);
    for _ in 0..10_000 {
        let width = rng.u32(1..=64);
        let size = ChunkSize::new(width, 16);
        let x = rng.i32(-1_000_000..1_000_000);
        let z = rng.i32(-1_000_000..1_000_000);
        let location = world_to_chunk_coords(size, x, 3, z);
        let w = width as i32;
        assert_eq!(location.chunk.x * w + location.local.x, x);
        assert_eq!(location.chunk.z * w + location.local.z, z);
        assert_eq!(location.local.y, 3);
    }
}

#[test]
fn bedrock_is_never_removed() {
    let mut world = loaded_world(small_config(5));
    for x in -8..16 {
        for z in -8..16 {
            let before = world.get_block(x, 0, z).unwrap();
            assert!(!world.remove_block(x, 0, z));
            assert_eq!(world.get_block(x, 0, z).unwrap(), before);
        }
    }
}

#[test]
fn visibility_stays_consistent_under_random_edits() {
    let mut world = loaded_world(small_config(42));
    assert_visibility_consistent(&world);

    let mut rng = fastrand::Rng::with_seed(7);
    for _ in 0..400 {
        let x = rng.i32(-8..16);
        let y = rng.i32(0..16);
        let z = rng.i32(-8..16);
        if rng.bool() {
            world.add_block(x, y, z, rng.u8(1..=14));
        } else {
            world.remove_block(x, y, z);
        }
    }
    assert_visibility_consistent(&world);

    // Regeneration with the recorded edits must agree too.
    world.regenerate(false);
    assert_visibility_consistent(&world);
}

#[test]
fn visibility_stays_consistent_while_streaming() {
    let mut world = loaded_world(small_config(3));
    world.add_block(10, 15, 10, BlockType::STONE as BlockTypeSize);
    world.update(Point3::new(17.0, 0.0, -1.0));
    assert_visibility_consistent(&world);
    world.update(Point3::new(-30.0, 0.0, 40.0));
    assert_visibility_consistent(&world);
}

#[test]
fn overlay_wins_over_regeneration() {
    let mut world = loaded_world(small_config(11));
    let mut rng = fastrand::Rng::with_seed(1);
    let mut expected = Vec::new();
    for _ in 0..50 {
        let (x, y, z) = (rng.i32(-8..16), rng.i32(1..16), rng.i32(-8..16));
        let id = rng.u8(1..=14);
        assert!(world.add_block(x, y, z, id));
        expected.retain(|(p, _)| *p != (x, y, z));
        expected.push(((x, y, z), id));
    }

    world.regenerate(false);
    for ((x, y, z), id) in expected {
        assert_eq!(world.get_block(x, y, z).unwrap().block_type, id);
    }
}

#[test]
fn clearing_the_overlay_restores_procedural_content() {
    let mut world = loaded_world(small_config(11));
    world.add_block(2, 14, 2, BlockType::CLOUD as BlockTypeSize);
    world.remove_block(-3, 3, 5);
    world.regenerate(true);
    assert!(world.overlay().is_empty());

    let fresh = loaded_world(small_config(11));
    for chunk in fresh.loaded_chunks() {
        assert_eq!(chunk.blocks(), world.lookup_chunk(chunk.coord()).unwrap().blocks());
    }
}

#[test]
fn low_columns_are_sand() {
    let mut config = WorldConfig::default();
    config.draw_distance = 1;
    config.async_loading = false;
    config.params.terrain.water_offset = 4.0;
    config.params.terrain.offset = 4.0;
    config.params.terrain.magnitude = 8.0;
    let world = loaded_world(config.clone());

    let sampler = TerrainSampler::from_seed(config.params.seed);
    let mut beaches = 0;
    for x in -32..64 {
        for z in -32..64 {
            let height = sampler.surface_height(&config.params, x, z, config.chunk.height);
            if height <= 4 {
                beaches += 1;
                let surface = world.get_block(x, height, z).unwrap();
                assert_eq!(surface.block_type(), Some(BlockType::SAND), "column ({x}, {z})");
            }
        }
    }
    assert!(beaches > 0);
}
