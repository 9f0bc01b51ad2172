//! # Edit Overlay Module
//!
//! Sparse record of user edits, keyed by `(chunkX, chunkZ, x, y, z)`.
//!
//! Entries exist only for cells the user explicitly added or removed; absence
//! means "use the procedural value". Entries outlive the chunks they describe
//! and are reapplied every time those chunks are regenerated. The overlay is
//! indexed by chunk so that reapplying is proportional to the edits of one
//! chunk, not to the size of the chunk.
//!
//! ## Persistence
//!
//! [`EditOverlay::dump`] produces a `"cx,cz,x,y,z" -> id` map and
//! [`EditOverlay::restore`] reads one back. Restoring parses everything into a
//! new index first and only swaps it in when every key is valid.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use cgmath::Point3;
use log::debug;

use crate::error::PersistenceError;

use super::block::BlockTypeSize;
use super::chunk::{ChunkCoord, ChunkSize};

/// Serialized form of an overlay: one entry per edited cell.
pub type OverlaySnapshot = BTreeMap<String, BlockTypeSize>;

/// The composite key of one edited cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct OverlayKey {
    /// Chunk holding the cell.
    pub chunk: ChunkCoord,
    /// Cell position inside the chunk.
    pub local: Point3<i32>,
}

impl OverlayKey {
    /// Creates a key.
    pub fn new(chunk: ChunkCoord, local: Point3<i32>) -> Self {
        OverlayKey { chunk, local }
    }
}

impl fmt::Display for OverlayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{}",
            self.chunk.x, self.chunk.z, self.local.x, self.local.y, self.local.z
        )
    }
}

impl FromStr for OverlayKey {
    type Err = PersistenceError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || PersistenceError::InvalidKey(text.to_string());
        let mut parts = [0i32; 5];
        let mut fields = text.split(',');
        for part in &mut parts {
            let field = fields.next().ok_or_else(invalid)?;
            *part = field.trim().parse().map_err(|_| invalid())?;
        }
        if fields.next().is_some() {
            return Err(invalid());
        }
        let [chunk_x, chunk_z, x, y, z] = parts;
        Ok(OverlayKey::new(
            ChunkCoord::new(chunk_x, chunk_z),
            Point3::new(x, y, z),
        ))
    }
}

/// Sparse map of user edits overriding procedural generation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EditOverlay {
    chunks: HashMap<ChunkCoord, HashMap<Point3<i32>, BlockTypeSize>>,
    len: usize,
}

impl EditOverlay {
    /// Creates an empty overlay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded id for a cell, if the user edited it.
    pub fn get(&self, chunk: ChunkCoord, local: Point3<i32>) -> Option<BlockTypeSize> {
        self.chunks.get(&chunk)?.get(&local).copied()
    }

    /// Records an edit, replacing any earlier edit of the same cell.
    pub fn set(&mut self, chunk: ChunkCoord, local: Point3<i32>, block_type: BlockTypeSize) {
        if self
            .chunks
            .entry(chunk)
            .or_default()
            .insert(local, block_type)
            .is_none()
        {
            self.len += 1;
        }
    }

    /// Forgets every edit.
    pub fn clear(&mut self) {
        debug!("Clearing {} overlay edits", self.len);
        self.chunks.clear();
        self.len = 0;
    }

    /// Number of edited cells.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no cell has been edited.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Copies out the edits of one chunk as `(local, id)` pairs.
    pub fn chunk_edits(&self, chunk: ChunkCoord) -> Vec<(Point3<i32>, BlockTypeSize)> {
        self.chunks
            .get(&chunk)
            .map(|cells| cells.iter().map(|(local, id)| (*local, *id)).collect())
            .unwrap_or_default()
    }

    /// Iterates over every edit.
    pub fn iter(&self) -> impl Iterator<Item = (OverlayKey, BlockTypeSize)> + '_ {
        self.chunks.iter().flat_map(|(chunk, cells)| {
            cells
                .iter()
                .map(move |(local, id)| (OverlayKey::new(*chunk, *local), *id))
        })
    }

    /// Serializes every edit into a string-keyed map.
    pub fn dump(&self) -> OverlaySnapshot {
        self.iter().map(|(key, id)| (key.to_string(), id)).collect()
    }

    /// Replaces the contents with `snapshot`.
    ///
    /// # Errors
    /// [`PersistenceError::InvalidKey`] if any key is malformed. The overlay
    /// is left unchanged in that case.
    pub fn restore(&mut self, snapshot: &OverlaySnapshot) -> Result<(), PersistenceError> {
        *self = Self::from_snapshot(snapshot)?;
        Ok(())
    }

    /// Builds an overlay from a snapshot.
    pub fn from_snapshot(snapshot: &OverlaySnapshot) -> Result<Self, PersistenceError> {
        let mut overlay = EditOverlay::new();
        for (key, id) in snapshot {
            let key: OverlayKey = key.parse()?;
            overlay.set(key.chunk, key.local, *id);
        }
        Ok(overlay)
    }

    /// Checks that every edited cell lies inside a chunk of `size`.
    ///
    /// # Errors
    /// [`PersistenceError::InvalidKey`] naming the first key that does not.
    pub fn check_bounds(&self, size: ChunkSize) -> Result<(), PersistenceError> {
        match self.iter().find(|(key, _)| !size.contains(key.local)) {
            Some((key, _)) => Err(PersistenceError::InvalidKey(key.to_string())),
            None => Ok(()),
        }
    }

    /// Encodes the overlay as JSON.
    pub fn to_json(&self) -> Result<String, PersistenceError> {
        Ok(serde_json::to_string(&self.dump())?)
    }

    /// Decodes an overlay from JSON produced by [`EditOverlay::to_json`].
    ///
    /// `key` names the store entry the text came from and is only used in errors.
    pub fn from_json(key: &str, text: &str) -> Result<Self, PersistenceError> {
        let snapshot: OverlaySnapshot =
            serde_json::from_str(text).map_err(|source| PersistenceError::Malformed {
                key: key.to_string(),
                source,
            })?;
        Self::from_snapshot(&snapshot)
    }
}
