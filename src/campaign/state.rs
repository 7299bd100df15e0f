//! Campaign state - the strategic situation the engine advances
//!
//! Holds the map, the roster, the turn counter, each side's action-point
//! pool, and the transient battle-event list. The whole struct is
//! serializable; battle events are per-turn noise and are deliberately
//! dropped across a save/load boundary.

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

use crate::campaign::map::CampaignMap;
use crate::campaign::marshal::Roster;
use crate::core::error::{OrderError, Result};
use crate::core::types::{FactionId, LocationId, MarshalId, Turn};

/// A battle fought this turn, visible to the interrupt detector
#[derive(Debug, Clone)]
pub struct BattleEvent {
    pub location: LocationId,
    pub attacker: MarshalId,
    pub defender: MarshalId,
    pub turn: Turn,
}

/// The strategic situation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub map: CampaignMap,
    pub roster: Roster,
    pub turn: Turn,
    action_points: AHashMap<FactionId, u32>,
    /// Battles fought this turn. Not persisted: cleared on load and at
    /// the top of every turn.
    #[serde(skip)]
    pub battle_events: Vec<BattleEvent>,
}

impl Campaign {
    pub fn new(map: CampaignMap) -> Self {
        Self {
            map,
            roster: Roster::new(),
            turn: 1,
            action_points: AHashMap::new(),
            battle_events: Vec::new(),
        }
    }

    /// Advance the turn counter and forget last turn's battles
    pub fn begin_turn(&mut self) {
        self.turn += 1;
        self.battle_events.clear();
    }

    // === ACTION POINTS ===

    pub fn grant_action_points(&mut self, faction: FactionId, points: u32) {
        *self.action_points.entry(faction).or_insert(0) += points;
    }

    pub fn set_action_points(&mut self, faction: FactionId, points: u32) {
        self.action_points.insert(faction, points);
    }

    pub fn action_points(&self, faction: FactionId) -> u32 {
        self.action_points.get(&faction).copied().unwrap_or(0)
    }

    /// Debit a side's pool, rejecting the spend wholesale if short
    pub fn spend_action_points(&mut self, faction: FactionId, cost: u32) -> Result<()> {
        let available = self.action_points(faction);
        if available < cost {
            return Err(OrderError::InsufficientActionPoints {
                required: cost,
                available,
            });
        }
        self.action_points.insert(faction, available - cost);
        Ok(())
    }

    // === SITUATION QUERIES ===

    /// Hostiles of `faction` standing at `location`, ascending by id
    pub fn hostiles_at(&self, location: LocationId, faction: FactionId) -> Vec<MarshalId> {
        self.roster
            .at_location(location)
            .into_iter()
            .filter(|m| m.faction != faction && !m.is_destroyed())
            .map(|m| m.id)
            .collect()
    }

    /// Every location currently held by a living hostile of `faction`
    pub fn hostile_held_ground(&self, faction: FactionId) -> AHashSet<LocationId> {
        self.roster
            .iter()
            .filter(|m| m.faction != faction && !m.is_destroyed())
            .map(|m| m.location)
            .collect()
    }

    // === BATTLE EVENTS ===

    pub fn record_battle(&mut self, event: BattleEvent) {
        self.battle_events.push(event);
    }

    /// A battle this turn within `range` road hops of `location`,
    /// excluding battles the given marshal fought in personally
    pub fn battle_near(
        &self,
        location: LocationId,
        range: u32,
        observer: MarshalId,
    ) -> Option<&BattleEvent> {
        self.battle_events.iter().find(|e| {
            e.attacker != observer
                && e.defender != observer
                && self
                    .map
                    .distance(location, e.location)
                    .is_some_and(|d| d <= range)
        })
    }

    // === PERSISTENCE ===

    pub fn save_to_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load_from_str(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::map::GroundKind;
    use crate::campaign::marshal::Marshal;

    fn small_campaign() -> Campaign {
        let mut map = CampaignMap::new();
        for i in 0..4 {
            map.add_location(LocationId(i), &format!("Post {}", i), GroundKind::Open);
            if i > 0 {
                map.link(LocationId(i - 1), LocationId(i));
            }
        }
        let mut campaign = Campaign::new(map);
        campaign.roster.enlist(Marshal::new(
            MarshalId(1),
            "Ostra",
            FactionId(1),
            LocationId(0),
        ));
        campaign.roster.enlist(Marshal::new(
            MarshalId(2),
            "Kel",
            FactionId(2),
            LocationId(2),
        ));
        campaign
    }

    #[test]
    fn test_action_point_spend() {
        let mut campaign = small_campaign();
        campaign.grant_action_points(FactionId(1), 3);
        assert!(campaign.spend_action_points(FactionId(1), 2).is_ok());
        assert_eq!(campaign.action_points(FactionId(1)), 1);

        let err = campaign.spend_action_points(FactionId(1), 2).unwrap_err();
        assert!(matches!(
            err,
            OrderError::InsufficientActionPoints {
                required: 2,
                available: 1
            }
        ));
        // Failed spend leaves the pool untouched.
        assert_eq!(campaign.action_points(FactionId(1)), 1);
    }

    #[test]
    fn test_hostiles_at() {
        let campaign = small_campaign();
        assert_eq!(
            campaign.hostiles_at(LocationId(2), FactionId(1)),
            vec![MarshalId(2)]
        );
        assert!(campaign.hostiles_at(LocationId(2), FactionId(2)).is_empty());
    }

    #[test]
    fn test_hostile_held_ground() {
        let campaign = small_campaign();
        let held = campaign.hostile_held_ground(FactionId(1));
        assert!(held.contains(&LocationId(2)));
        assert_eq!(held.len(), 1);
    }

    #[test]
    fn test_battle_near_respects_range_and_observer() {
        let mut campaign = small_campaign();
        campaign.record_battle(BattleEvent {
            location: LocationId(1),
            attacker: MarshalId(2),
            defender: MarshalId(9),
            turn: campaign.turn,
        });

        // Post 0 is one hop from Post 1.
        assert!(campaign.battle_near(LocationId(0), 1, MarshalId(1)).is_some());
        // Post 3 is two hops away.
        assert!(campaign.battle_near(LocationId(3), 1, MarshalId(1)).is_none());
        // A participant does not observe its own battle.
        assert!(campaign.battle_near(LocationId(0), 1, MarshalId(2)).is_none());
    }

    #[test]
    fn test_battle_events_dropped_on_load() {
        let mut campaign = small_campaign();
        campaign.record_battle(BattleEvent {
            location: LocationId(1),
            attacker: MarshalId(1),
            defender: MarshalId(2),
            turn: campaign.turn,
        });

        let saved = campaign.save_to_string().unwrap();
        let loaded = Campaign::load_from_str(&saved).unwrap();
        assert!(loaded.battle_events.is_empty());
        assert_eq!(loaded.turn, campaign.turn);
        assert_eq!(loaded.roster.len(), 2);
    }

    #[test]
    fn test_begin_turn_clears_events() {
        let mut campaign = small_campaign();
        campaign.record_battle(BattleEvent {
            location: LocationId(1),
            attacker: MarshalId(1),
            defender: MarshalId(2),
            turn: campaign.turn,
        });
        campaign.begin_turn();
        assert!(campaign.battle_events.is_empty());
        assert_eq!(campaign.turn, 2);
    }
}
