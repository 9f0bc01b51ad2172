//! # Procedural Module
//!
//! The deterministic building blocks of world generation: a seeded random
//! source, a noise field contract with a simplex implementation, and biome
//! classification.

pub mod biome;
pub mod noise_field;
pub mod random;
