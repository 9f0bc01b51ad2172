//! # Coordinates Module
//!
//! Translation between world block coordinates and `(chunk, local)` pairs.
//! Uses floor division so the chunk grid extends symmetrically into negative
//! space: block `x = -1` lives in chunk `-1` at local `width - 1`.

use cgmath::Point3;

use super::chunk::{ChunkCoord, ChunkSize};

/// A world block position split into its owning chunk and local offset.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BlockLocation {
    /// Chunk that owns the block.
    pub chunk: ChunkCoord,
    /// Position inside that chunk. `y` is passed through unchanged and may be
    /// outside `[0, height)`.
    pub local: Point3<i32>,
}

/// Splits world position `(x, y, z)` into chunk and local coordinates.
///
/// For every integer `x` and `z`: `chunk.x * width + local.x == x` and
/// `chunk.z * width + local.z == z`, with `0 <= local.x, local.z < width`.
pub fn world_to_chunk_coords(size: ChunkSize, x: i32, y: i32, z: i32) -> BlockLocation {
    let width = size.width as i32;
    let chunk_x = x.div_euclid(width);
    let chunk_z = z.div_euclid(width);
    BlockLocation {
        chunk: ChunkCoord::new(chunk_x, chunk_z),
        local: Point3::new(x - width * chunk_x, y, z - width * chunk_z),
    }
}

/// Inverse of [`world_to_chunk_coords`].
pub fn chunk_to_world_coords(size: ChunkSize, location: BlockLocation) -> Point3<i32> {
    let width = size.width as i32;
    Point3::new(
        location.chunk.x * width + location.local.x,
        location.local.y,
        location.chunk.z * width + location.local.z,
    )
}

/// The chunk containing floating point world position `(x, z)`.
pub fn chunk_containing(size: ChunkSize, x: f32, z: f32) -> ChunkCoord {
    world_to_chunk_coords(size, x.floor() as i32, 0, z.floor() as i32).chunk
}

/// Largest chunk coordinate magnitude a focal chunk may take.
///
/// Every chunk within `draw_distance` of a focal chunk in
/// `[-limit, limit]`, plus one ring of neighbors, has world coordinates that
/// fit in an `i32` on both sides of its borders.
pub fn focal_chunk_limit(size: ChunkSize, draw_distance: u32) -> i32 {
    let width = size.width.max(1) as i32;
    let margin = (draw_distance as i32).saturating_add(2);
    (i32::MAX / width).saturating_sub(margin).max(0)
}

/// Clamps `coord` into the range allowed by [`focal_chunk_limit`].
pub fn clamp_focal_chunk(size: ChunkSize, draw_distance: u32, coord: ChunkCoord) -> ChunkCoord {
    let limit = focal_chunk_limit(size, draw_distance);
    ChunkCoord::new(coord.x.clamp(-limit, limit), coord.z.clamp(-limit, limit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_coordinates() {
        let size = ChunkSize::new(32, 32);
        let location = world_to_chunk_coords(size, 40, 7, 5);
        assert_eq!(location.chunk, ChunkCoord::new(1, 0));
        assert_eq!(location.local, Point3::new(8, 7, 5));
    }

    #[test]
    fn negative_coordinates_floor_instead_of_truncating() {
        let size = ChunkSize::new(32, 32);
        let location = world_to_chunk_coords(size, -1, 3, -32);
        assert_eq!(location.chunk, ChunkCoord::new(-1, -1));
        assert_eq!(location.local, Point3::new(31, 3, 0));

        let location = world_to_chunk_coords(size, -33, 0, -64);
        assert_eq!(location.chunk, ChunkCoord::new(-2, -2));
        assert_eq!(location.local, Point3::new(31, 0, 0));
    }

    #[test]
    fn round_trip_for_every_width() {
        for width in [1u32, 2, 5, 16, 32] {
            let size = ChunkSize::new(width, 8);
            for x in -100..100 {
                for z in [-77, -1, 0, 1, 63] {
                    let location = world_to_chunk_coords(size, x, 2, z);
                    let w = width as i32;
                    assert_eq!(location.chunk.x * w + location.local.x, x);
                    assert_eq!(location.chunk.z * w + location.local.z, z);
                    assert!((0..w).contains(&location.local.x));
                    assert!((0..w).contains(&location.local.z));
                    assert_eq!(chunk_to_world_coords(size, location), Point3::new(x, 2, z));
                }
            }
        }
    }

    #[test]
    fn y_is_passed_through() {
        let size = ChunkSize::default();
        assert_eq!(world_to_chunk_coords(size, 0, -5, 0).local.y, -5);
        assert_eq!(world_to_chunk_coords(size, 0, 500, 0).local.y, 500);
    }

    #[test]
    fn fractional_positions_use_floor() {
        let size = ChunkSize::new(32, 32);
        assert_eq!(chunk_containing(size, -0.5, 31.9), ChunkCoord::new(-1, 0));
        assert_eq!(chunk_containing(size, 64.0, -64.1), ChunkCoord::new(2, -3));
    }

    #[test]
    fn far_focal_chunks_are_clamped_to_representable_rings() {
        let size = ChunkSize::new(32, 32);
        let far = chunk_containing(size, 1.0e10, -1.0e10);
        let clamped = clamp_focal_chunk(size, 3, far);
        let limit = focal_chunk_limit(size, 3);
        assert_eq!(clamped, ChunkCoord::new(limit, -limit));
        // The outermost border of the ring still fits in i32.
        let edge = (clamped.x as i64 + 3 + 1) * 32 + 32;
        assert!(edge <= i32::MAX as i64);
        assert!((clamped.z as i64 - 3 - 1) * 32 - 1 >= i32::MIN as i64);
        // Nearby chunks are untouched.
        assert_eq!(
            clamp_focal_chunk(size, 3, ChunkCoord::new(-5, 7)),
            ChunkCoord::new(-5, 7)
        );
    }
}
