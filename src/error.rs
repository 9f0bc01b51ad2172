//! # Error Module
//!
//! Error types surfaced by the world engine.
//!
//! Most failure paths in the voxel core are not errors at all: out-of-bounds cell
//! access and chunk lookup misses are expressed as `Option`, and removing a bedrock
//! block is a silent no-op. The types here cover the recoverable failures that a
//! caller genuinely has to react to: bad configuration and bad persisted state.

use thiserror::Error;

/// Failures while reading or writing persisted world state.
///
/// Every variant is recoverable. Loading code validates the complete payload
/// before touching any in-memory state, so receiving one of these means the
/// world is exactly as it was before the call.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The store has no value under the requested key.
    #[error("no saved value under key `{0}`")]
    Missing(String),

    /// An overlay key did not have the `chunkX,chunkZ,x,y,z` shape.
    #[error("malformed overlay key `{0}`")]
    InvalidKey(String),

    /// The stored text could not be decoded.
    #[error("malformed saved data under `{key}`: {source}")]
    Malformed {
        /// Store key the value was read from.
        key: String,
        /// Underlying decoder error.
        #[source]
        source: serde_json::Error,
    },

    /// Encoding in-memory state failed.
    #[error("failed to encode world state: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backing store could not be read or written.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures while building or validating a [`WorldConfig`](crate::config::WorldConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A parameter is outside its usable range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Dotted configuration path, e.g. `terrain.scale`.
        name: &'static str,
        /// Human readable constraint that was violated.
        reason: &'static str,
    },

    /// The configuration text was not valid JSON for the expected shape.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Top level error returned by [`World`](crate::voxels::world::World) operations.
#[derive(Debug, Error)]
pub enum WorldError {
    /// Saving or loading failed.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Loaded or supplied parameters were rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
