//! Completion-condition evaluation
//!
//! Runs before anything else in a marshal's step: a satisfied condition
//! ends the order without moving, fighting, or asking anyone anything.

use crate::campaign::state::Campaign;
use crate::combat::CombatOutcome;
use crate::core::types::MarshalId;
use crate::orders::{CompletionCondition, Order, OrderKind, OrderTarget};

/// Result of checking an order's completion predicate
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionVerdict {
    Unmet,
    /// Condition satisfied; the string is the reported reason
    Met(String),
    /// The condition references a unit that no longer exists
    Stale(MarshalId),
}

/// Evaluate the order's completion condition for the given marshal
pub fn evaluate(campaign: &Campaign, marshal: MarshalId, order: &Order) -> ConditionVerdict {
    let Some(condition) = order.condition else {
        return ConditionVerdict::Unmet;
    };
    let Some(me) = campaign.roster.get(marshal) else {
        return ConditionVerdict::Unmet;
    };

    match condition {
        CompletionCondition::MaxTurns(turns) => {
            if campaign.turn.saturating_sub(order.started_turn) >= turns {
                ConditionVerdict::Met(format!("the appointed {} turns have passed", turns))
            } else {
                ConditionVerdict::Unmet
            }
        }

        CompletionCondition::UntilArrives(who) => match campaign.roster.get(who) {
            None => ConditionVerdict::Stale(who),
            Some(unit) if unit.is_destroyed() => ConditionVerdict::Stale(who),
            Some(unit) if unit.location == me.location => {
                ConditionVerdict::Met(format!("{} has arrived", unit.name))
            }
            Some(_) => ConditionVerdict::Unmet,
        },

        CompletionCondition::UntilDestroyed(who) => match campaign.roster.get(who) {
            None => ConditionVerdict::Met("the target is destroyed".into()),
            Some(unit) if unit.is_destroyed() => {
                ConditionVerdict::Met(format!("{} is destroyed", unit.name))
            }
            Some(_) => ConditionVerdict::Unmet,
        },

        CompletionCondition::UntilBattleWon => {
            // SUPPORT watches the ally's fortunes; everything else
            // watches its own.
            let watched = match (order.kind, &order.target) {
                (OrderKind::Support, OrderTarget::Friendly(ally)) => {
                    campaign.roster.get(*ally).and_then(|a| a.recent_combat)
                }
                _ => me.recent_combat,
            };
            match watched {
                Some(mem) if mem.outcome == CombatOutcome::DecisiveWin => {
                    ConditionVerdict::Met("the battle is won".into())
                }
                _ => ConditionVerdict::Unmet,
            }
        }

        CompletionCondition::UntilRelieved => {
            let relief = campaign
                .roster
                .at_location(me.location)
                .into_iter()
                .find(|m| m.id != marshal && m.faction == me.faction && !m.is_destroyed());
            match relief {
                Some(unit) => ConditionVerdict::Met(format!("relieved by {}", unit.name)),
                None => ConditionVerdict::Unmet,
            }
        }
    }
}
