//! # Voxel Task System
//!
//! This module contains tasks related to voxel world generation.
//! These tasks run during idle time so a host frame loop is never blocked by
//! a full chunk generation pass.

pub mod chunk_generation_task;
