//! Combat resolver interface for the campaign engine
//!
//! The engine never computes combat math. It hands both forces to a
//! resolver, then classifies the result per side to decide order fate.
//! A reference resolver with a simplified strength/morale model ships
//! here for the demo binary and the test suite.

use serde::{Deserialize, Serialize};

use crate::campaign::marshal::Marshal;

/// Base casualties per combat round as fraction of the smaller force
pub const BASE_CASUALTY_RATE: f32 = 0.05;

/// Morale loss per combat round
pub const BASE_MORALE_LOSS: f32 = 0.1;

/// Morale threshold below which a force breaks
pub const ROUT_THRESHOLD: f32 = 0.2;

/// Who carried the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Victor {
    Attacker,
    Defender,
    None,
}

/// A resolved engagement, as reported by the combat resolver
#[derive(Debug, Clone)]
pub struct CombatResult {
    pub victor: Victor,
    pub attacker_casualties: u32,
    pub defender_casualties: u32,
    pub attacker_routed: bool,
    pub defender_routed: bool,
    pub rounds_fought: u32,
}

/// Outcome classification from one side's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatOutcome {
    DecisiveWin,
    DecisiveLoss,
    Stalemate,
}

impl CombatResult {
    pub fn outcome_for_attacker(&self) -> CombatOutcome {
        match self.victor {
            Victor::Attacker => CombatOutcome::DecisiveWin,
            Victor::Defender => CombatOutcome::DecisiveLoss,
            Victor::None => CombatOutcome::Stalemate,
        }
    }

    pub fn outcome_for_defender(&self) -> CombatOutcome {
        match self.victor {
            Victor::Attacker => CombatOutcome::DecisiveLoss,
            Victor::Defender => CombatOutcome::DecisiveWin,
            Victor::None => CombatOutcome::Stalemate,
        }
    }
}

/// The single-battle resolver the engine consumes
///
/// Implementations own strength and morale; the engine only reads them.
pub trait CombatResolver {
    fn resolve(&mut self, attacker: &mut Marshal, defender: &mut Marshal) -> CombatResult;
}

/// Reference resolver: deterministic strength/morale attrition
///
/// Fights rounds until one side breaks or `max_rounds` pass. Fortified
/// and immovable defenders fight harder. Good enough for the demo and
/// for deterministic tests; a real campaign wires in the full battle
/// system instead.
#[derive(Debug, Clone)]
pub struct FieldResolver {
    pub max_rounds: u32,
}

impl Default for FieldResolver {
    fn default() -> Self {
        Self { max_rounds: 8 }
    }
}

impl FieldResolver {
    fn effective_strength(marshal: &Marshal, is_attacker: bool) -> f32 {
        let base = marshal.strength as f32;
        // 50% to 100% effectiveness by morale
        let morale_mod = 0.5 + (marshal.morale * 0.5);
        let posture_mod = if is_attacker {
            1.0
        } else {
            let mut m = 1.0;
            if marshal.fortified {
                m += 0.3;
            }
            if marshal.immovable {
                m += 0.2;
            }
            m
        };
        base * morale_mod * posture_mod
    }

    fn round_casualties(att_strength: f32, def_strength: f32, smaller: u32) -> (u32, u32) {
        let total = att_strength + def_strength;
        if total <= 0.0 {
            return (0, 0);
        }
        let base = (smaller as f32 * BASE_CASUALTY_RATE).max(1.0);
        let att_cas = (base * (def_strength / total) * 1.5) as u32;
        let def_cas = (base * (att_strength / total) * 1.5) as u32;
        (att_cas.max(1), def_cas.max(1))
    }

    fn broken(marshal: &Marshal) -> bool {
        marshal.morale < ROUT_THRESHOLD || marshal.strength == 0
    }
}

impl CombatResolver for FieldResolver {
    fn resolve(&mut self, attacker: &mut Marshal, defender: &mut Marshal) -> CombatResult {
        let mut att_total = 0u32;
        let mut def_total = 0u32;
        let mut rounds = 0u32;

        while rounds < self.max_rounds {
            rounds += 1;

            let att_strength = Self::effective_strength(attacker, true);
            let def_strength = Self::effective_strength(defender, false);
            let smaller = attacker.strength.min(defender.strength);
            let (att_cas, def_cas) = Self::round_casualties(att_strength, def_strength, smaller);

            attacker.strength = attacker.strength.saturating_sub(att_cas);
            defender.strength = defender.strength.saturating_sub(def_cas);
            att_total += att_cas;
            def_total += def_cas;

            attacker.morale = (attacker.morale - BASE_MORALE_LOSS).max(0.0);
            defender.morale = (defender.morale - BASE_MORALE_LOSS * 0.8).max(0.0);

            let att_broken = Self::broken(attacker);
            let def_broken = Self::broken(defender);

            if att_broken || def_broken {
                let victor = match (att_broken, def_broken) {
                    (true, true) => Victor::None,
                    (true, false) => Victor::Defender,
                    (false, true) => Victor::Attacker,
                    (false, false) => unreachable!(),
                };
                return CombatResult {
                    victor,
                    attacker_casualties: att_total,
                    defender_casualties: def_total,
                    attacker_routed: att_broken,
                    defender_routed: def_broken,
                    rounds_fought: rounds,
                };
            }
        }

        CombatResult {
            victor: Victor::None,
            attacker_casualties: att_total,
            defender_casualties: def_total,
            attacker_routed: false,
            defender_routed: false,
            rounds_fought: rounds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::marshal::Personality;
    use crate::core::types::{FactionId, LocationId, MarshalId};

    fn test_marshal(id: u32, faction: u32, strength: u32) -> Marshal {
        Marshal::new(
            MarshalId(id),
            &format!("Marshal {}", id),
            FactionId(faction),
            LocationId(0),
        )
        .with_personality(Personality::Aggressive)
        .with_strength(strength)
    }

    #[test]
    fn test_larger_force_prevails() {
        let mut attacker = test_marshal(1, 1, 400);
        let mut defender = test_marshal(2, 2, 100);
        let mut resolver = FieldResolver { max_rounds: 30 };

        let result = resolver.resolve(&mut attacker, &mut defender);
        assert_eq!(result.victor, Victor::Attacker);
        assert_eq!(result.outcome_for_attacker(), CombatOutcome::DecisiveWin);
        assert_eq!(result.outcome_for_defender(), CombatOutcome::DecisiveLoss);
    }

    #[test]
    fn test_even_forces_stall() {
        let mut attacker = test_marshal(1, 1, 300);
        let mut defender = test_marshal(2, 2, 300);
        let mut resolver = FieldResolver { max_rounds: 3 };

        let result = resolver.resolve(&mut attacker, &mut defender);
        assert_eq!(result.victor, Victor::None);
        assert_eq!(result.outcome_for_attacker(), CombatOutcome::Stalemate);
    }

    #[test]
    fn test_fortification_helps_defender() {
        let mut att_a = test_marshal(1, 1, 200);
        let mut def_plain = test_marshal(2, 2, 200);
        let mut resolver = FieldResolver { max_rounds: 1 };
        let open = resolver.resolve(&mut att_a, &mut def_plain);

        let mut att_b = test_marshal(3, 1, 200);
        let mut def_dug_in = test_marshal(4, 2, 200);
        def_dug_in.fortified = true;
        let dug_in = resolver.resolve(&mut att_b, &mut def_dug_in);

        assert!(dug_in.attacker_casualties >= open.attacker_casualties);
    }

    #[test]
    fn test_casualties_recorded() {
        let mut attacker = test_marshal(1, 1, 250);
        let mut defender = test_marshal(2, 2, 250);
        let mut resolver = FieldResolver::default();

        let result = resolver.resolve(&mut attacker, &mut defender);
        assert!(result.attacker_casualties > 0);
        assert!(result.defender_casualties > 0);
        assert!(attacker.strength < 250);
        assert!(defender.strength < 250);
    }
}
