//! Saving and loading whole worlds.

use voxel_world::config::WorldConfig;
use voxel_world::error::{PersistenceError, WorldError};
use voxel_world::persistence::{FileStore, KeyValueStore, MemoryStore, EDITS_KEY, PARAMS_KEY};
use voxel_world::voxels::block::block_type::BlockType;
use voxel_world::voxels::block::BlockTypeSize;
use voxel_world::voxels::chunk::ChunkSize;
use voxel_world::voxels::world::World;

fn config(seed: i64) -> WorldConfig {
    let mut config = WorldConfig::default();
    config.chunk = ChunkSize::new(8, 16);
    config.draw_distance = 1;
    config.async_loading = false;
    config.params.seed = seed;
    config
}

fn edited_world() -> World {
    let mut world = World::new(config(77)).unwrap();
    world.regenerate(false);
    world.add_block(1, 15, 1, BlockType::IRON_ORE as BlockTypeSize);
    world.remove_block(-2, 2, 9);
    world
}

#[test]
fn round_trip_through_files() {
    let dir = tempfile::tempdir().unwrap();
    let world = edited_world();
    let mut store = FileStore::new(dir.path()).unwrap();
    world.save(&mut store).unwrap();

    let mut restored = World::new(config(1)).unwrap();
    restored.load(&FileStore::new(dir.path()).unwrap()).unwrap();

    assert_eq!(restored.params(), world.params());
    assert_eq!(restored.overlay(), world.overlay());
    for chunk in world.loaded_chunks() {
        assert_eq!(chunk.blocks(), restored.lookup_chunk(chunk.coord()).unwrap().blocks());
    }
}

#[test]
fn saved_edits_use_composite_keys() {
    let world = edited_world();
    let mut store = MemoryStore::new();
    world.save(&mut store).unwrap();
    let edits = store.get(EDITS_KEY).unwrap().unwrap();
    assert!(edits.contains("\"0,0,1,15,1\":5"), "{edits}");
    assert!(edits.contains("\"-1,1,6,2,1\":0"), "{edits}");
}

#[test]
fn missing_state_is_reported() {
    let mut world = edited_world();
    let err = world.load(&MemoryStore::new()).unwrap_err();
    assert!(matches!(
        err,
        WorldError::Persistence(PersistenceError::Missing(ref key)) if key == PARAMS_KEY
    ));
}

#[test]
fn failed_load_leaves_world_untouched() {
    let mut world = edited_world();
    let params_before = world.params().clone();
    let overlay_before = world.overlay().clone();
    let block_before = world.get_block(1, 15, 1).unwrap();

    let mut store = MemoryStore::new();
    store.set(PARAMS_KEY, r#"{"seed": 5}"#.to_string()).unwrap();
    store.set(EDITS_KEY, r#"{"0,0,1,2": 3}"#.to_string()).unwrap();
    assert!(matches!(
        world.load(&store),
        Err(WorldError::Persistence(PersistenceError::InvalidKey(_)))
    ));

    store.set(PARAMS_KEY, "not json".to_string()).unwrap();
    assert!(matches!(
        world.load(&store),
        Err(WorldError::Persistence(PersistenceError::Malformed { .. }))
    ));

    store.set(PARAMS_KEY, r#"{"terrain": {"scale": 0}}"#.to_string()).unwrap();
    store.set(EDITS_KEY, "{}".to_string()).unwrap();
    assert!(matches!(world.load(&store), Err(WorldError::Config(_))));

    assert_eq!(world.params(), &params_before);
    assert_eq!(world.overlay(), &overlay_before);
    assert_eq!(world.get_block(1, 15, 1).unwrap(), block_before);
}

fn store_with(params: &str, edits: &str) -> MemoryStore {
    let mut store = MemoryStore::new();
    store.set(PARAMS_KEY, params.to_string()).unwrap();
    store.set(EDITS_KEY, edits.to_string()).unwrap();
    store
}

#[test]
fn oversized_tree_records_are_rejected() {
    let mut world = edited_world();
    let overlay_before = world.overlay().clone();
    for params in [
        r#"{"trees":{"frequency":1.0,"canopy":{"minRadius":60000,"maxRadius":60000}}}"#,
        r#"{"trees":{"frequency":1.0,"trunk":{"minHeight":1e12,"maxHeight":1e12}}}"#,
    ] {
        let err = world.load(&store_with(params, "{}")).unwrap_err();
        assert!(matches!(err, WorldError::Config(_)), "{params}: {err}");
    }
    assert_eq!(world.overlay(), &overlay_before);
    assert_eq!(world.params().seed, 77);
}

#[test]
fn edits_outside_the_chunk_are_rejected() {
    let mut world = edited_world();
    let overlay_before = world.overlay().clone();
    let err = world
        .load(&store_with(r#"{"seed": 3}"#, r#"{"0,0,999,-4,999": 2}"#))
        .unwrap_err();
    assert!(matches!(
        err,
        WorldError::Persistence(PersistenceError::InvalidKey(ref key)) if key == "0,0,999,-4,999"
    ));
    assert_eq!(world.overlay(), &overlay_before);
    assert_eq!(world.params().seed, 77);

    // The last cell of the chunk is still fine.
    world
        .load(&store_with(r#"{"seed": 3}"#, r#"{"-1,0,7,15,7": 2}"#))
        .unwrap();
    assert_eq!(world.get_block(-1, 15, 7).unwrap().block_type, 2);
}
