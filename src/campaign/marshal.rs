//! Marshals and the campaign roster
//!
//! A marshal is a named commander with a force on the map. The engine
//! owns its location, its order slot, and its combat-memory fields;
//! strength and morale belong to the combat resolver.

use serde::{Deserialize, Serialize};

use crate::core::error::{OrderError, Result};
use crate::core::types::{FactionId, LocationId, MarshalId, Turn};
use crate::orders::{CombatMemory, Order};

/// Command temperament. Every step handler matches exhaustively on this,
/// so a new archetype breaks every branch site at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Personality {
    Aggressive,
    Cautious,
    Literal,
}

impl Personality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aggressive => "aggressive",
            Self::Cautious => "cautious",
            Self::Literal => "literal",
        }
    }
}

/// A commander and the force marching under them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Marshal {
    pub id: MarshalId,
    pub name: String,
    pub faction: FactionId,
    pub location: LocationId,
    pub personality: Personality,
    /// Road hops the column can cover per turn (always >= 1)
    pub movement_budget: u32,
    pub strength: u32,
    pub morale: f32, // 0.0 - 1.0
    pub fortified: bool,
    /// Literal HOLD stance: never moves, defends harder
    pub immovable: bool,
    /// Literal completion bonus: drilled sharp until this turn
    pub drill_bonus_until: Option<Turn>,
    /// Most recent fight, regardless of which order caused it
    pub recent_combat: Option<CombatMemory>,
    pub order: Option<Order>,
}

impl Marshal {
    pub fn new(id: MarshalId, name: &str, faction: FactionId, location: LocationId) -> Self {
        Self {
            id,
            name: name.to_string(),
            faction,
            location,
            personality: Personality::Cautious,
            movement_budget: 1,
            strength: 100,
            morale: 1.0,
            fortified: false,
            immovable: false,
            drill_bonus_until: None,
            recent_combat: None,
            order: None,
        }
    }

    pub fn with_personality(mut self, personality: Personality) -> Self {
        self.personality = personality;
        self
    }

    pub fn with_budget(mut self, budget: u32) -> Self {
        self.movement_budget = budget.max(1);
        self
    }

    pub fn with_strength(mut self, strength: u32) -> Self {
        self.strength = strength;
        self
    }

    pub fn is_destroyed(&self) -> bool {
        self.strength == 0
    }

    pub fn is_hostile_to(&self, other: &Marshal) -> bool {
        self.faction != other.faction
    }

    /// Strength ratio of self against other; infinite against a ghost
    pub fn strength_ratio_against(&self, other: &Marshal) -> f32 {
        if other.strength == 0 {
            f32::INFINITY
        } else {
            self.strength as f32 / other.strength as f32
        }
    }

    pub fn has_drill_bonus(&self, now: Turn) -> bool {
        self.drill_bonus_until.is_some_and(|until| now <= until)
    }
}

/// All marshals in the campaign
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    marshals: Vec<Marshal>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enlist a marshal. Replaces nothing; ids must be unique.
    pub fn enlist(&mut self, marshal: Marshal) -> MarshalId {
        debug_assert!(
            !self.marshals.iter().any(|m| m.id == marshal.id),
            "duplicate marshal id"
        );
        let id = marshal.id;
        self.marshals.push(marshal);
        id
    }

    /// Remove a destroyed or disbanded marshal from play
    pub fn muster_out(&mut self, id: MarshalId) -> Option<Marshal> {
        let idx = self.marshals.iter().position(|m| m.id == id)?;
        Some(self.marshals.remove(idx))
    }

    pub fn get(&self, id: MarshalId) -> Option<&Marshal> {
        self.marshals.iter().find(|m| m.id == id)
    }

    pub fn get_mut(&mut self, id: MarshalId) -> Option<&mut Marshal> {
        self.marshals.iter_mut().find(|m| m.id == id)
    }

    pub fn require(&self, id: MarshalId) -> Result<&Marshal> {
        self.get(id).ok_or(OrderError::UnknownMarshal(id))
    }

    pub fn require_mut(&mut self, id: MarshalId) -> Result<&mut Marshal> {
        self.get_mut(id).ok_or(OrderError::UnknownMarshal(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marshal> {
        self.marshals.iter()
    }

    pub fn len(&self) -> usize {
        self.marshals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marshals.is_empty()
    }

    /// Ids of one side's marshals, ascending - the deterministic
    /// processing order for a turn
    pub fn ids_of_faction(&self, faction: FactionId) -> Vec<MarshalId> {
        let mut ids: Vec<MarshalId> = self
            .marshals
            .iter()
            .filter(|m| m.faction == faction)
            .map(|m| m.id)
            .collect();
        ids.sort();
        ids
    }

    /// All marshals standing at a location, ascending by id
    pub fn at_location(&self, location: LocationId) -> Vec<&Marshal> {
        let mut here: Vec<&Marshal> = self
            .marshals
            .iter()
            .filter(|m| m.location == location)
            .collect();
        here.sort_by_key(|m| m.id);
        here
    }

    /// Mutable access to two distinct marshals at once, for combat
    pub fn pair_mut(
        &mut self,
        a: MarshalId,
        b: MarshalId,
    ) -> Option<(&mut Marshal, &mut Marshal)> {
        if a == b {
            return None;
        }
        let ia = self.marshals.iter().position(|m| m.id == a)?;
        let ib = self.marshals.iter().position(|m| m.id == b)?;
        if ia < ib {
            let (left, right) = self.marshals.split_at_mut(ib);
            Some((&mut left[ia], &mut right[0]))
        } else {
            let (left, right) = self.marshals.split_at_mut(ia);
            Some((&mut right[0], &mut left[ib]))
        }
    }
}
