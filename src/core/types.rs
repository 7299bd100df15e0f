//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Unique identifier for marshals (commanders of field forces)
///
/// Ordered so turn processing can walk a side's marshals deterministically.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct MarshalId(pub u32);

/// Unique identifier for campaign map locations
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct LocationId(pub u32);

/// Unique identifier for factions (the sides of the war)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FactionId(pub u32);

impl FactionId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Game turn counter
pub type Turn = u32;
