//! PURSUE step handler
//!
//! The quarry's position is a live query, never a snapshot: the route
//! is recomputed every turn from wherever the quarry actually stands.

use crate::campaign::state::Campaign;
use crate::core::types::MarshalId;
use crate::engine::report::ReportDetail;
use crate::engine::{interrupts, march, MarchResult, OrderEngine, StepOutcome};
use crate::orders::{InterruptContext, Order, OrderTarget};

pub(crate) fn step(
    engine: &mut OrderEngine,
    campaign: &mut Campaign,
    id: MarshalId,
    order: &mut Order,
) -> StepOutcome {
    let OrderTarget::Enemy(quarry) = order.target else {
        return StepOutcome::Fail {
            message: "the pursuit orders name no quarry".into(),
            detail: ReportDetail::None,
        };
    };
    let Some(me) = campaign.roster.get(id) else {
        return StepOutcome::Fail {
            message: "the command has dissolved".into(),
            detail: ReportDetail::None,
        };
    };
    let (name, budget, here) = (me.name.clone(), me.movement_budget, me.location);

    // Re-resolve the quarry every turn.
    let Some(prey) = campaign.roster.get(quarry) else {
        return StepOutcome::Complete {
            message: format!("{}'s quarry is no longer in the field", name),
            detail: ReportDetail::None,
        };
    };
    if prey.is_destroyed() {
        return StepOutcome::Complete {
            message: format!("{}'s quarry is destroyed", name),
            detail: ReportDetail::None,
        };
    }
    let (quarry_loc, quarry_name) = (prey.location, prey.name.clone());

    // Standing on the same ground: close for battle.
    if here == quarry_loc {
        return engage_quarry(engine, campaign, id, order, quarry, &name, &quarry_name);
    }

    // Fresh route to the quarry's current position.
    match campaign.map.shortest_path(here, quarry_loc) {
        Some(route) => order.replace_path(route),
        None => {
            return StepOutcome::Fail {
                message: format!("{} can find no road to run {} down", name, quarry_name),
                detail: ReportDetail::None,
            };
        }
    }

    match march(campaign, id, order, quarry_loc, budget) {
        MarchResult::Blocked { enemy, .. } if enemy == quarry => {
            // Caught up: the quarry stands in the next location.
            engage_quarry(engine, campaign, id, order, quarry, &name, &quarry_name)
        }
        MarchResult::Blocked { enemy, at, entered } => {
            let steps_left = budget.saturating_sub(entered.len() as u32);
            engine.blocked_response(campaign, id, order, quarry_loc, enemy, at, steps_left)
        }
        MarchResult::Arrived { entered } | MarchResult::Underway { entered } => {
            let now_at = campaign
                .roster
                .get(id)
                .map(|m| m.location)
                .unwrap_or(here);
            StepOutcome::Continue {
                message: format!(
                    "{} presses the pursuit of {}, reaching {}",
                    name,
                    quarry_name,
                    campaign.map.name_of(now_at)
                ),
                detail: ReportDetail::Marched { entered },
            }
        }
        MarchResult::NoPath => StepOutcome::Fail {
            message: format!("{} can find no road to run {} down", name, quarry_name),
            detail: ReportDetail::None,
        },
    }
}

/// Battle with the quarry, loop-guard gated
fn engage_quarry(
    engine: &mut OrderEngine,
    campaign: &mut Campaign,
    id: MarshalId,
    order: &mut Order,
    quarry: MarshalId,
    name: &str,
    quarry_name: &str,
) -> StepOutcome {
    if engine.rematch_refused(order, quarry, campaign.turn) {
        return StepOutcome::Await {
            context: InterruptContext::Rematch { enemy: quarry },
            options: interrupts::rematch_options(),
            message: format!(
                "{} has {} at bay but fought them only recently; awaiting word",
                name, quarry_name
            ),
        };
    }

    let Some((outcome, _)) = engine.fight(campaign, id, quarry, order) else {
        return StepOutcome::Complete {
            message: format!("{}'s quarry is no longer in the field", name),
            detail: ReportDetail::None,
        };
    };
    let detail = ReportDetail::Fought {
        opponent: quarry,
        outcome,
    };

    let quarry_destroyed = campaign
        .roster
        .get(quarry)
        .map(|m| m.is_destroyed())
        .unwrap_or(true);
    if quarry_destroyed {
        return StepOutcome::Complete {
            message: format!("{} has destroyed {}", name, quarry_name),
            detail,
        };
    }

    match interrupts::combat_fate(outcome) {
        interrupts::CombatFate::Continues => StepOutcome::Continue {
            message: format!(
                "{} mauls {}, who slips away; the pursuit continues",
                name, quarry_name
            ),
            detail,
        },
        interrupts::CombatFate::Fails => StepOutcome::Fail {
            message: format!("{} is broken by {} and abandons the pursuit", name, quarry_name),
            detail,
        },
        interrupts::CombatFate::Asks => StepOutcome::Await {
            context: InterruptContext::Stalemate { enemy: quarry },
            options: interrupts::stalemate_options(),
            message: format!(
                "{} and {} fight to a standstill; awaiting orders",
                name, quarry_name
            ),
        },
    }
}
