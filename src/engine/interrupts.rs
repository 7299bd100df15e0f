//! Interrupt logic: blocked roads, nearby battles, the combat-loop guard
//!
//! Pure decision functions; the executor owns the state changes. The
//! personality asymmetries here are deliberate game rules: literal
//! marshals never improvise on unrelated events, and a stalemate always
//! goes back to the player no matter how favorable the odds.

use crate::campaign::marshal::Personality;
use crate::campaign::profiles::PersonalityProfile;
use crate::combat::CombatOutcome;
use crate::orders::ChoiceOption;

/// How a marshal answers a hostile force barring the road
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockedDecision {
    /// Quietly replan around all known hostile-held ground
    Reroute,
    /// Fall on the blocking force without asking
    AutoAttack,
    /// Halt the column and ask the player
    Ask,
}

/// Personality-conditioned response to a blocked road
pub fn blocked_decision(
    personality: Personality,
    strength_ratio: f32,
    profile: &PersonalityProfile,
) -> BlockedDecision {
    match personality {
        Personality::Literal => BlockedDecision::Reroute,
        Personality::Aggressive => {
            if strength_ratio >= profile.engage_ratio {
                BlockedDecision::AutoAttack
            } else {
                BlockedDecision::Ask
            }
        }
        Personality::Cautious => BlockedDecision::Ask,
    }
}

/// What an order does after combat, by outcome classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatFate {
    /// Decisive win: the order marches on
    Continues,
    /// Decisive loss: the order is cleared
    Fails,
    /// Stalemate: never auto-resolved, the player decides
    Asks,
}

pub fn combat_fate(outcome: CombatOutcome) -> CombatFate {
    match outcome {
        CombatOutcome::DecisiveWin => CombatFate::Continues,
        CombatOutcome::DecisiveLoss => CombatFate::Fails,
        CombatOutcome::Stalemate => CombatFate::Asks,
    }
}

/// Whether this personality heeds a battle within earshot
pub fn heeds_nearby_battle(personality: Personality) -> bool {
    match personality {
        // Literal marshals execute orders exactly as given and do not
        // improvise on unrelated events.
        Personality::Literal => false,
        Personality::Aggressive | Personality::Cautious => true,
    }
}

// Option sets offered with each interrupt. Kept in one place so the
// resumption entry point and the tests agree on them.

pub fn blocked_options() -> Vec<ChoiceOption> {
    vec![
        ChoiceOption::Attack,
        ChoiceOption::GoAround,
        ChoiceOption::HoldPosition,
        ChoiceOption::CancelOrder,
    ]
}

pub fn rematch_options() -> Vec<ChoiceOption> {
    vec![
        ChoiceOption::AttackAgain,
        ChoiceOption::HoldPosition,
        ChoiceOption::CancelOrder,
    ]
}

pub fn stalemate_options() -> Vec<ChoiceOption> {
    vec![
        ChoiceOption::AttackAgain,
        ChoiceOption::HoldPosition,
        ChoiceOption::CancelOrder,
    ]
}

pub fn nearby_battle_options() -> Vec<ChoiceOption> {
    vec![
        ChoiceOption::PressOn,
        ChoiceOption::HoldPosition,
        ChoiceOption::CancelOrder,
    ]
}

pub fn ally_marching_options() -> Vec<ChoiceOption> {
    vec![
        ChoiceOption::Follow,
        ChoiceOption::HoldPosition,
        ChoiceOption::CancelOrder,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::profiles::PersonalityProfiles;

    #[test]
    fn test_literal_always_reroutes() {
        let profiles = PersonalityProfiles::default();
        for ratio in [0.1, 1.0, 10.0] {
            assert_eq!(
                blocked_decision(Personality::Literal, ratio, &profiles.literal),
                BlockedDecision::Reroute
            );
        }
    }

    #[test]
    fn test_aggressive_threshold() {
        let profiles = PersonalityProfiles::default();
        assert_eq!(
            blocked_decision(Personality::Aggressive, 0.69, &profiles.aggressive),
            BlockedDecision::Ask
        );
        assert_eq!(
            blocked_decision(Personality::Aggressive, 0.7, &profiles.aggressive),
            BlockedDecision::AutoAttack
        );
    }

    #[test]
    fn test_cautious_always_asks() {
        let profiles = PersonalityProfiles::default();
        for ratio in [0.1, 1.0, 10.0] {
            assert_eq!(
                blocked_decision(Personality::Cautious, ratio, &profiles.cautious),
                BlockedDecision::Ask
            );
        }
    }

    #[test]
    fn test_stalemate_always_asks() {
        // Even a marshal spoiling for a fight does not press a drawn
        // field without orders.
        assert_eq!(combat_fate(CombatOutcome::Stalemate), CombatFate::Asks);
        assert_eq!(combat_fate(CombatOutcome::DecisiveWin), CombatFate::Continues);
        assert_eq!(combat_fate(CombatOutcome::DecisiveLoss), CombatFate::Fails);
    }

    #[test]
    fn test_literal_ignores_nearby_battle() {
        assert!(!heeds_nearby_battle(Personality::Literal));
        assert!(heeds_nearby_battle(Personality::Cautious));
        assert!(heeds_nearby_battle(Personality::Aggressive));
    }

    #[test]
    fn test_blocked_options_cover_scenario() {
        let options = blocked_options();
        assert!(options.contains(&ChoiceOption::Attack));
        assert!(options.contains(&ChoiceOption::GoAround));
        assert!(options.contains(&ChoiceOption::HoldPosition));
        assert!(options.contains(&ChoiceOption::CancelOrder));
    }
}
