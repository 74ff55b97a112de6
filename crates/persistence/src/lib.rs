#![deny(warnings)]

//! Snapshot save/load for the game state.
//!
//! The contract: the whole [`GameState`] serializes structurally; restoring
//! an older snapshot defaults any missing field (additive schema evolution);
//! the game always comes back `Paused`. JSON is the save-slot codec, bincode
//! the compact autosave codec. The `saved_at` stamp feeds the offline
//! catch-up computation on resume.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sim_core::{GameSpeed, GameState};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Bump only for breaking changes; additive fields keep the same version.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("snapshot version {0} is newer than this build supports")]
    UnsupportedVersion(u32),
    #[error("codec error: {0}")]
    Codec(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A saved game with its metadata envelope.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub state: GameState,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            version: SCHEMA_VERSION,
            saved_at: Utc::now(),
            state: state.clone(),
        }
    }

    /// Seconds the save sat on disk, for offline catch-up. Clock skew is
    /// treated as zero elapsed rather than an error.
    pub fn offline_elapsed(&self, now: DateTime<Utc>) -> u64 {
        (now - self.saved_at).num_seconds().max(0) as u64
    }
}

fn restore(mut snapshot: Snapshot) -> Result<Snapshot, PersistError> {
    if snapshot.version > SCHEMA_VERSION {
        return Err(PersistError::UnsupportedVersion(snapshot.version));
    }
    // Never resume ticking on the player's behalf.
    snapshot.state.speed = GameSpeed::Paused;
    Ok(snapshot)
}

/// Save-slot codec: human-inspectable JSON.
pub fn to_json(snapshot: &Snapshot) -> Result<String, PersistError> {
    serde_json::to_string_pretty(snapshot).map_err(|e| PersistError::Codec(e.to_string()))
}

pub fn from_json(json: &str) -> Result<Snapshot, PersistError> {
    let snapshot: Snapshot =
        serde_json::from_str(json).map_err(|e| PersistError::Codec(e.to_string()))?;
    restore(snapshot)
}

/// Autosave codec: compact binary.
pub fn to_bytes(snapshot: &Snapshot) -> Result<Vec<u8>, PersistError> {
    bincode::serialize(snapshot).map_err(|e| PersistError::Codec(e.to_string()))
}

pub fn from_bytes(bytes: &[u8]) -> Result<Snapshot, PersistError> {
    let snapshot: Snapshot =
        bincode::deserialize(bytes).map_err(|e| PersistError::Codec(e.to_string()))?;
    restore(snapshot)
}

pub fn write_file<P: AsRef<Path>>(path: P, state: &GameState) -> Result<(), PersistError> {
    let snapshot = Snapshot::capture(state);
    let json = to_json(&snapshot)?;
    fs::write(&path, json)?;
    info!(path = %path.as_ref().display(), day = state.day, "snapshot written");
    Ok(())
}

pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Snapshot, PersistError> {
    let json = fs::read_to_string(&path)?;
    let snapshot = from_json(&json)?;
    info!(
        path = %path.as_ref().display(),
        day = snapshot.state.day,
        "snapshot restored"
    );
    Ok(snapshot)
}
