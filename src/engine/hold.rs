//! HOLD step handler
//!
//! Holding ground is personality work: literal marshals plant the
//! standard and refuse to move, cautious marshals dig in, aggressive
//! marshals sally against favorable neighbors. A sally never relocates
//! the holder - the hold ground is restored whatever the outcome.

use ordered_float::OrderedFloat;
use std::cmp::Reverse;

use crate::campaign::marshal::Personality;
use crate::campaign::state::Campaign;
use crate::core::types::MarshalId;
use crate::engine::report::ReportDetail;
use crate::engine::{interrupts, march, MarchResult, OrderEngine, StepOutcome};
use crate::orders::{InterruptContext, Order};

pub(crate) fn step(
    engine: &mut OrderEngine,
    campaign: &mut Campaign,
    id: MarshalId,
    order: &mut Order,
) -> StepOutcome {
    let Some(hold_loc) = order.hold_location() else {
        return StepOutcome::Fail {
            message: "the hold orders name no ground".into(),
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
    let ground_name = campaign.map.name_of(hold_loc).to_string();

    // Displaced from the hold ground: march back first.
    if here != hold_loc {
        return match march(campaign, id, order, hold_loc, budget) {
            MarchResult::Arrived { entered } => StepOutcome::Continue {
                message: format!("{} takes up position at {}", name, ground_name),
                detail: ReportDetail::Marched { entered },
            },
            MarchResult::Underway { entered } => StepOutcome::Continue {
                message: format!("{} marches back toward {}", name, ground_name),
                detail: ReportDetail::Marched { entered },
            },
            MarchResult::Blocked { enemy, at, entered } => {
                let steps_left = budget.saturating_sub(entered.len() as u32);
                engine.blocked_response(campaign, id, order, hold_loc, enemy, at, steps_left)
            }
            MarchResult::NoPath => StepOutcome::Fail {
                message: format!("{} can find no road back to {}", name, ground_name),
                detail: ReportDetail::None,
            },
        };
    }

    match personality {
        Personality::Literal => {
            let m = match campaign.roster.get_mut(id) {
                Some(m) => m,
                None => {
                    return StepOutcome::Fail {
                        message: "the command has dissolved".into(),
                        detail: ReportDetail::None,
                    }
                }
            };
            if !m.immovable {
                m.immovable = true;
                StepOutcome::Continue {
                    message: format!("{} plants the standard at {} and will not move", name, ground_name),
                    detail: ReportDetail::None,
                }
            } else {
                StepOutcome::Continue {
                    message: format!("{} stands immovable at {}", name, ground_name),
                    detail: ReportDetail::None,
                }
            }
        }

        Personality::Cautious => {
            let m = match campaign.roster.get_mut(id) {
                Some(m) => m,
                None => {
                    return StepOutcome::Fail {
                        message: "the command has dissolved".into(),
                        detail: ReportDetail::None,
                    }
                }
            };
            if !m.fortified {
                m.fortified = true;
                StepOutcome::Continue {
                    message: format!("{} fortifies {}", name, ground_name),
                    detail: ReportDetail::None,
                }
            } else {
                StepOutcome::Continue {
                    message: format!("{} holds the works at {}", name, ground_name),
                    detail: ReportDetail::None,
                }
            }
        }

        Personality::Aggressive => {
            match favorable_neighbor(campaign, id, hold_loc, engine) {
                Some(enemy) => {
                    if engine.rematch_refused(order, enemy, campaign.turn) {
                        let foe_name = campaign
                            .roster
                            .get(enemy)
                            .map(|m| m.name.clone())
                            .unwrap_or_default();
                        return StepOutcome::Await {
                            context: InterruptContext::Rematch { enemy },
                            options: interrupts::rematch_options(),
                            message: format!(
                                "{} eyes {} from {} but fought them only recently",
                                name, foe_name, ground_name
                            ),
                        };
                    }
                    sally(engine, campaign, id, order, enemy)
                }
                None => StepOutcome::Continue {
                    message: format!("{} holds {}, finding no favorable target", name, ground_name),
                    detail: ReportDetail::None,
                },
            }
        }
    }
}

/// Best adjacent hostile by strength ratio, ties to the lowest id;
/// None unless the ratio clears the sally threshold
fn favorable_neighbor(
    campaign: &Campaign,
    id: MarshalId,
    hold_loc: crate::core::types::LocationId,
    engine: &OrderEngine,
) -> Option<MarshalId> {
    let me = campaign.roster.get(id)?;
    let threshold = engine.profiles.for_personality(me.personality).sally_ratio;

    let mut candidates: Vec<(MarshalId, f32)> = Vec::new();
    for &neighbor in campaign.map.neighbors(hold_loc) {
        for enemy_id in campaign.hostiles_at(neighbor, me.faction) {
            if let Some(enemy) = campaign.roster.get(enemy_id) {
                candidates.push((enemy_id, me.strength_ratio_against(enemy)));
            }
        }
    }

    candidates
        .into_iter()
        .filter(|&(_, ratio)| ratio >= threshold)
        .max_by_key(|&(enemy, ratio)| (OrderedFloat(ratio), Reverse(enemy)))
        .map(|(enemy, _)| enemy)
}

/// The sally sub-maneuver: sortie, fight, and return to the walls
///
/// The holder's location is forcibly restored afterward regardless of
/// the outcome - a sally never causes position drift.
pub(crate) fn sally(
    engine: &mut OrderEngine,
    campaign: &mut Campaign,
    id: MarshalId,
    order: &mut Order,
    enemy: MarshalId,
) -> StepOutcome {
    let Some(me) = campaign.roster.get(id) else {
        return StepOutcome::Fail {
            message: "the command has dissolved".into(),
            detail: ReportDetail::None,
        };
    };
    let (name, hold_loc) = (me.name.clone(), me.location);
    let Some(foe) = campaign.roster.get(enemy) else {
        return StepOutcome::Continue {
            message: format!("{}'s target has already slipped away", name),
            detail: ReportDetail::None,
        };
    };
    let (foe_name, field) = (foe.name.clone(), foe.location);
    let ground_name = campaign.map.name_of(hold_loc).to_string();

    // Sortie out to the enemy's ground for the fight itself.
    if let Some(m) = campaign.roster.get_mut(id) {
        m.location = field;
    }
    let fought = engine.fight(campaign, id, enemy, order);
    // Back behind the walls, win or lose.
    if let Some(m) = campaign.roster.get_mut(id) {
        m.location = hold_loc;
    }

    let Some((outcome, _)) = fought else {
        return StepOutcome::Continue {
            message: format!("{}'s target has already slipped away", name),
            detail: ReportDetail::None,
        };
    };
    let detail = ReportDetail::Fought {
        opponent: enemy,
        outcome,
    };

    match interrupts::combat_fate(outcome) {
        interrupts::CombatFate::Continues => StepOutcome::Continue {
            message: format!(
                "{} sallies from {}, breaks {}, and returns to the walls",
                name, ground_name, foe_name
            ),
            detail,
        },
        interrupts::CombatFate::Fails => StepOutcome::Fail {
            message: format!(
                "{}'s sally from {} is repulsed by {}",
                name, ground_name, foe_name
            ),
            detail,
        },
        interrupts::CombatFate::Asks => StepOutcome::Await {
            context: InterruptContext::Stalemate { enemy },
            options: interrupts::stalemate_options(),
            message: format!(
                "{}'s sally against {} ends without decision",
                name, foe_name
            ),
        },
    }
}
