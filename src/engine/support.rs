//! SUPPORT step handler
//!
//! Shadow a friendly force: stand with it when co-located, chase its
//! live position when not. The ally's location is re-resolved every
//! turn, exactly like a pursuit.

use crate::campaign::marshal::Personality;
use crate::campaign::state::Campaign;
use crate::core::types::MarshalId;
use crate::engine::report::ReportDetail;
use crate::engine::{interrupts, march, MarchResult, OrderEngine, StepOutcome};
use crate::orders::{InterruptContext, Order, OrderKind, OrderTarget};

pub(crate) fn step(
    engine: &mut OrderEngine,
    campaign: &mut Campaign,
    id: MarshalId,
    order: &mut Order,
) -> StepOutcome {
    let OrderTarget::Friendly(ally_id) = order.target else {
        return StepOutcome::Fail {
            message: "the support orders name no ally".into(),
            detail: ReportDetail::None,
        };
    };
    let Some(me) = campaign.roster.get(id) else {
        return StepOutcome::Fail {
            message: "the command has dissolved".into(),
            detail: ReportDetail::None,
        };
    };
    let (name, personality, here, budget) =
        (me.name.clone(), me.personality, me.location, me.movement_budget);

    // Re-resolve the ally every turn.
    let Some(ally) = campaign.roster.get(ally_id) else {
        return StepOutcome::Fail {
            message: format!("{}'s ally has fallen; the support order lapses", name),
            detail: ReportDetail::None,
        };
    };
    if ally.is_destroyed() {
        return StepOutcome::Fail {
            message: format!("{}'s ally has fallen; the support order lapses", name),
            detail: ReportDetail::None,
        };
    }
    let (ally_loc, ally_name, ally_fortified) =
        (ally.location, ally.name.clone(), ally.fortified);
    let ally_marching = ally
        .order
        .as_ref()
        .is_some_and(|o| o.kind == OrderKind::MoveTo);

    if here == ally_loc {
        return stand_with_ally(campaign, id, personality, &name, &ally_name, ally_fortified);
    }

    // A cautious marshal will not chase a marching ally unasked.
    if ally_marching && personality == Personality::Cautious && !order.follow_confirmed {
        return StepOutcome::Await {
            context: InterruptContext::AllyMarching { ally: ally_id },
            options: interrupts::ally_marching_options(),
            message: format!(
                "{} is on the march; does {} follow or hold?",
                ally_name, name
            ),
        };
    }

    match campaign.map.shortest_path(here, ally_loc) {
        Some(route) => order.replace_path(route),
        None => {
            return StepOutcome::Fail {
                message: format!("{} can find no road to reach {}", name, ally_name),
                detail: ReportDetail::None,
            };
        }
    }

    match march(campaign, id, order, ally_loc, budget) {
        MarchResult::Arrived { entered } => StepOutcome::Continue {
            message: format!("{} joins {} at {}", name, ally_name, campaign.map.name_of(ally_loc)),
            detail: ReportDetail::Marched { entered },
        },
        MarchResult::Underway { entered } => StepOutcome::Continue {
            message: format!("{} moves to support {}", name, ally_name),
            detail: ReportDetail::Marched { entered },
        },
        MarchResult::Blocked { enemy, at, entered } => {
            let steps_left = budget.saturating_sub(entered.len() as u32);
            engine.blocked_response(campaign, id, order, ally_loc, enemy, at, steps_left)
        }
        MarchResult::NoPath => StepOutcome::Fail {
            message: format!("{} can find no road to reach {}", name, ally_name),
            detail: ReportDetail::None,
        },
    }
}

/// Shoulder to shoulder with the ally: posture by personality
fn stand_with_ally(
    campaign: &mut Campaign,
    id: MarshalId,
    personality: Personality,
    name: &str,
    ally_name: &str,
    ally_fortified: bool,
) -> StepOutcome {
    match personality {
        Personality::Aggressive => StepOutcome::Continue {
            message: format!("{} stands ready to join {}'s battles", name, ally_name),
            detail: ReportDetail::None,
        },
        Personality::Cautious => {
            let already = campaign.roster.get(id).map(|m| m.fortified).unwrap_or(false);
            if let Some(m) = campaign.roster.get_mut(id) {
                m.fortified = true;
            }
            StepOutcome::Continue {
                message: if already {
                    format!("{} holds the works beside {}", name, ally_name)
                } else {
                    format!("{} fortifies alongside {}", name, ally_name)
                },
                detail: ReportDetail::None,
            }
        }
        Personality::Literal => {
            // Mirror the ally's dispositions exactly.
            if let Some(m) = campaign.roster.get_mut(id) {
                m.fortified = ally_fortified;
            }
            StepOutcome::Continue {
                message: format!("{} matches {}'s dispositions precisely", name, ally_name),
                detail: ReportDetail::None,
            }
        }
    }
}
