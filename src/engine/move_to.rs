//! MOVE_TO step handler
//!
//! March toward a named destination, up to the movement budget per
//! turn, halting at contact. Arrival completes the order, optionally
//! after clearing the destination of hostiles.

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
    let OrderTarget::Location(destination) = order.target else {
        return StepOutcome::Fail {
            message: "the march orders name no destination".into(),
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

    if here == destination {
        return finalize_arrival(engine, campaign, id, order, Vec::new());
    }

    match march(campaign, id, order, destination, budget) {
        MarchResult::Arrived { entered } => {
            finalize_arrival(engine, campaign, id, order, entered)
        }
        MarchResult::Underway { entered } => {
            let now_at = campaign
                .roster
                .get(id)
                .map(|m| m.location)
                .unwrap_or(here);
            StepOutcome::Continue {
                message: format!(
                    "{} presses along the road, camping at {}",
                    name,
                    campaign.map.name_of(now_at)
                ),
                detail: ReportDetail::Marched { entered },
            }
        }
        MarchResult::Blocked { enemy, at, entered } => {
            let steps_left = budget.saturating_sub(entered.len() as u32);
            engine.blocked_response(campaign, id, order, destination, enemy, at, steps_left)
        }
        MarchResult::NoPath => StepOutcome::Fail {
            message: format!(
                "{} can find no road to {}",
                name,
                campaign.map.name_of(destination)
            ),
            detail: ReportDetail::None,
        },
    }
}

/// The column stands at its destination; fight for it if so ordered,
/// then complete.
fn finalize_arrival(
    engine: &mut OrderEngine,
    campaign: &mut Campaign,
    id: MarshalId,
    order: &mut Order,
    entered: Vec<crate::core::types::LocationId>,
) -> StepOutcome {
    let Some(me) = campaign.roster.get(id) else {
        return StepOutcome::Fail {
            message: "the command has dissolved".into(),
            detail: ReportDetail::None,
        };
    };
    let (name, faction, here) = (me.name.clone(), me.faction, me.location);
    let here_name = campaign.map.name_of(here).to_string();

    if order.attack_on_arrival {
        if let Some(&enemy) = campaign.hostiles_at(here, faction).first() {
            let foe_name = campaign
                .roster
                .get(enemy)
                .map(|m| m.name.clone())
                .unwrap_or_default();
            if engine.rematch_refused(order, enemy, campaign.turn) {
                return StepOutcome::Await {
                    context: InterruptContext::Rematch { enemy },
                    options: interrupts::rematch_options(),
                    message: format!(
                        "{} reaches {} but will not re-engage {} unbidden",
                        name, here_name, foe_name
                    ),
                };
            }
            let Some((outcome, _)) = engine.fight(campaign, id, enemy, order) else {
                return complete_arrival(name, here_name, entered);
            };
            let detail = ReportDetail::Fought {
                opponent: enemy,
                outcome,
            };
            return match interrupts::combat_fate(outcome) {
                interrupts::CombatFate::Continues => StepOutcome::Complete {
                    message: format!("{} clears {} of {} and secures it", name, here_name, foe_name),
                    detail,
                },
                interrupts::CombatFate::Fails => StepOutcome::Fail {
                    message: format!("{} is thrown back from {}", name, here_name),
                    detail,
                },
                interrupts::CombatFate::Asks => StepOutcome::Await {
                    context: InterruptContext::Stalemate { enemy },
                    options: interrupts::stalemate_options(),
                    message: format!(
                        "{} fights {} for {} without decision",
                        name, foe_name, here_name
                    ),
                },
            };
        }
    }

    complete_arrival(name, here_name, entered)
}

fn complete_arrival(
    name: String,
    here_name: String,
    entered: Vec<crate::core::types::LocationId>,
) -> StepOutcome {
    StepOutcome::Complete {
        message: format!("{} arrives at {}", name, here_name),
        detail: ReportDetail::Marched { entered },
    }
}
