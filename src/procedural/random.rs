//! # Random Source
//!
//! A small multiply-with-carry generator used for every random decision the
//! terrain generator makes. It is seeded only from the world seed, so two
//! sources built from the same seed always walk the same sequence.

/// Initial value of the `w` lane before the seed is mixed in.
const W_LANE_BASE: i64 = 123_456_789;
/// Initial value of the `z` lane before the seed is mixed in.
const Z_LANE_BASE: i64 = 987_654_321;
/// Multiplier applied to the low half of the `z` lane on each step.
const Z_MULTIPLIER: u32 = 36_969;
/// Multiplier applied to the low half of the `w` lane on each step.
const W_MULTIPLIER: u32 = 18_000;
/// 2^32, used to normalise a 32-bit output into `[0, 1)`.
const U32_RANGE: f64 = 4_294_967_296.0;

/// Deterministic pseudo-random number generator.
///
/// Each call to [`RandomSource::next`] is O(1) and allocation free, which
/// matters because chunk generation draws from it once per surface column and
/// once per canopy cell.
///
/// # Examples
///
/// ```
/// use voxel_world::procedural::random::RandomSource;
///
/// let mut a = RandomSource::new(42);
/// let mut b = RandomSource::new(42);
/// assert_eq!(a.next(), b.next());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RandomSource {
    m_w: u32,
    m_z: u32,
}

impl RandomSource {
    /// Creates a generator from an integer seed.
    ///
    /// The two lanes are derived from `123456789 + seed` and
    /// `987654321 - seed`, truncated to 32 bits.
    pub fn new(seed: i64) -> Self {
        RandomSource {
            m_w: W_LANE_BASE.wrapping_add(seed) as u32,
            m_z: Z_LANE_BASE.wrapping_sub(seed) as u32,
        }
    }

    /// Advances both lanes and returns the combined 32-bit output.
    pub fn next_u32(&mut self) -> u32 {
        self.m_z = Z_MULTIPLIER
            .wrapping_mul(self.m_z & 0xFFFF)
            .wrapping_add(self.m_z >> 16);
        self.m_w = W_MULTIPLIER
            .wrapping_mul(self.m_w & 0xFFFF)
            .wrapping_add(self.m_w >> 16);
        (self.m_z << 16).wrapping_add(self.m_w & 0xFFFF)
    }

    /// Returns the next value in `[0, 1)`.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> f64 {
        self.next_u32() as f64 / U32_RANGE
    }

    /// Returns `min + (max - min) * next()` rounded to the nearest integer.
    ///
    /// Used for trunk heights and canopy radii, which are configured as a
    /// floating range but placed on the integer grid.
    pub fn next_rounded(&mut self, min: f64, max: f64) -> i32 {
        (min + (max - min) * self.next()).round() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = RandomSource::new(1234);
        let mut b = RandomSource::new(1234);
        for _ in 0..1000 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = RandomSource::new(1);
        let mut b = RandomSource::new(2);
        let a_values: Vec<u32> = (0..8).map(|_| a.next_u32()).collect();
        let b_values: Vec<u32> = (0..8).map(|_| b.next_u32()).collect();
        assert_ne!(a_values, b_values);
    }

    #[test]
    fn values_stay_in_unit_interval() {
        let mut rng = RandomSource::new(-77);
        for _ in 0..10_000 {
            let value = rng.next();
            assert!((0.0..1.0).contains(&value), "{value} escaped [0, 1)");
        }
    }

    #[test]
    fn negative_and_large_seeds_are_masked() {
        // Both wrap into 32-bit lanes instead of overflowing.
        let mut negative = RandomSource::new(-1);
        let mut large = RandomSource::new(i64::MAX);
        assert!(negative.next() < 1.0);
        assert!(large.next() < 1.0);
    }

    #[test]
    fn first_output_for_seed_zero() {
        let mut rng = RandomSource::new(0);
        // z = 36969 * (987654321 & 0xFFFF) + (987654321 >> 16)
        // w = 18000 * (123456789 & 0xFFFF) + (123456789 >> 16)
        let z: u32 = 36_969 * (987_654_321 & 0xFFFF) + (987_654_321 >> 16);
        let w: u32 = 18_000 * (123_456_789 & 0xFFFF) + (123_456_789 >> 16);
        assert_eq!(rng.next_u32(), (z << 16).wrapping_add(w & 0xFFFF));
    }

    #[test]
    fn rounded_range_respects_bounds() {
        let mut rng = RandomSource::new(9);
        for _ in 0..1000 {
            let value = rng.next_rounded(4.0, 7.0);
            assert!((4..=7).contains(&value));
        }
        assert_eq!(rng.next_rounded(3.0, 3.0), 3);
    }
}
