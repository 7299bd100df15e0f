//! Turn executor for standing orders
//!
//! One entry point advances every standing order a side holds, exactly
//! one decision per marshal per turn, in ascending marshal-id order. A
//! second entry point resumes a marshal that paused for player input.
//! All mutation of unit locations and order slots funnels through here.

pub mod conditions;
pub mod hold;
pub mod interrupts;
pub mod move_to;
pub mod pursue;
pub mod report;
pub mod support;

pub use report::{OrderReport, OrderStatus, ReportDetail};

use crate::campaign::marshal::Personality;
use crate::campaign::profiles::PersonalityProfiles;
use crate::campaign::state::{BattleEvent, Campaign};
use crate::combat::{CombatOutcome, CombatResolver, CombatResult};
use crate::core::config::EngineConfig;
use crate::core::error::{OrderError, Result};
use crate::core::types::{FactionId, LocationId, MarshalId, Turn};
use crate::orders::{
    ChoiceOption, CombatMemory, InterruptContext, Order, OrderKind, OrderRequest, OrderTarget,
    PendingChoice,
};
use crate::trust::TrustLedger;

use conditions::ConditionVerdict;

/// What the batch driver does when a marshal pauses for input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchPolicy {
    /// Stop the batch at the first fresh request (reference behavior)
    HaltOnInput,
    /// Keep stepping the remaining marshals
    ProcessAll,
}

/// Outcome of one kind handler for one marshal this turn
#[derive(Debug)]
pub(crate) enum StepOutcome {
    Continue {
        message: String,
        detail: ReportDetail,
    },
    Complete {
        message: String,
        detail: ReportDetail,
    },
    Fail {
        message: String,
        detail: ReportDetail,
    },
    Await {
        context: InterruptContext,
        options: Vec<ChoiceOption>,
        message: String,
    },
}

/// Result of marching along an order's path
#[derive(Debug)]
pub(crate) enum MarchResult {
    Arrived { entered: Vec<LocationId> },
    Underway { entered: Vec<LocationId> },
    Blocked {
        enemy: MarshalId,
        at: LocationId,
        entered: Vec<LocationId>,
    },
    NoPath,
}

/// Consume up to `budget` road hops toward `destination`
///
/// Stops short of any hostile-held location; already-taken steps are
/// never rolled back. Replans in place when the stored path has gone
/// stale. Movement breaks entrenchment.
pub(crate) fn march(
    campaign: &mut Campaign,
    id: MarshalId,
    order: &mut Order,
    destination: LocationId,
    budget: u32,
) -> MarchResult {
    let Some(me) = campaign.roster.get(id) else {
        return MarchResult::NoPath;
    };
    let faction = me.faction;
    let mut entered: Vec<LocationId> = Vec::new();

    loop {
        let here = match campaign.roster.get(id) {
            Some(m) => m.location,
            None => return MarchResult::NoPath,
        };
        if here == destination {
            return MarchResult::Arrived { entered };
        }

        // The head of the path is popped once we stand on it.
        while order.path.front() == Some(&here) {
            order.path.pop_front();
        }

        let next = match order.path.front() {
            Some(&n) if campaign.map.adjacent(here, n) => n,
            _ => {
                // Stale or missing route; replan from where we stand.
                match campaign.map.shortest_path(here, destination) {
                    Some(route) => {
                        order.replace_path(route);
                        continue;
                    }
                    None => return MarchResult::NoPath,
                }
            }
        };

        if entered.len() as u32 >= budget {
            return MarchResult::Underway { entered };
        }

        if let Some(&enemy) = campaign.hostiles_at(next, faction).first() {
            return MarchResult::Blocked {
                enemy,
                at: next,
                entered,
            };
        }

        if let Some(m) = campaign.roster.get_mut(id) {
            m.location = next;
            m.fortified = false;
            m.immovable = false;
        }
        order.path.pop_front();
        entered.push(next);
    }
}

struct StepReport {
    report: OrderReport,
    fresh_input: bool,
}

/// The order-execution engine
///
/// Borrows its collaborators for the duration of a call; the borrow
/// checker is what guarantees the engine is never re-entered mid-turn.
pub struct OrderEngine<'a> {
    resolver: &'a mut dyn CombatResolver,
    trust: &'a mut dyn TrustLedger,
    pub config: EngineConfig,
    pub profiles: PersonalityProfiles,
    pub policy: BatchPolicy,
}

impl<'a> OrderEngine<'a> {
    pub fn new(resolver: &'a mut dyn CombatResolver, trust: &'a mut dyn TrustLedger) -> Self {
        Self {
            resolver,
            trust,
            config: EngineConfig::default(),
            profiles: PersonalityProfiles::default(),
            policy: BatchPolicy::HaltOnInput,
        }
    }

    pub fn with_policy(mut self, policy: BatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_profiles(mut self, profiles: PersonalityProfiles) -> Self {
        self.profiles = profiles;
        self
    }

    // === ORDER REGISTRY ===

    /// Install a standing order, debiting the side's action points
    ///
    /// Replaces any prior standing order silently. A request whose
    /// route cannot be planned costs its points and fails with a
    /// report, per the rule that every outcome is reported.
    pub fn issue_order(
        &mut self,
        campaign: &mut Campaign,
        id: MarshalId,
        request: OrderRequest,
    ) -> Result<OrderReport> {
        let me = campaign.roster.require(id)?;
        let (faction, personality, here, name) =
            (me.faction, me.personality, me.location, me.name.clone());

        // A request naming a unit that no longer exists never went
        // through a live command layer; reject it outright.
        if let Some(unit) = request.target.unit() {
            if campaign.roster.get(unit).is_none() {
                return Err(OrderError::StaleOrderReference(unit));
            }
        }

        let profile = self.profiles.for_personality(personality);
        campaign.spend_action_points(faction, profile.issue_cost)?;

        let mut order = Order::new(request.kind, request.target.clone(), campaign.turn);
        order.condition = request.condition;
        order.attack_on_arrival = request.attack_on_arrival && request.kind == OrderKind::MoveTo;

        // Initial route for orders that know their destination now.
        let destination = match (&request.kind, &request.target) {
            (OrderKind::MoveTo | OrderKind::Hold, OrderTarget::Location(loc)) => Some(*loc),
            (OrderKind::Support, OrderTarget::Friendly(ally)) => {
                campaign.roster.get(*ally).map(|a| a.location)
            }
            _ => None,
        };
        if let Some(dest) = destination {
            if dest != here {
                match campaign.map.shortest_path(here, dest) {
                    Some(route) => order.replace_path(route),
                    None => {
                        tracing::warn!(marshal = ?id, "no route for new order");
                        return Ok(OrderReport::new(
                            id,
                            &name,
                            request.kind,
                            OrderStatus::Failed,
                            format!(
                                "{} can find no road to {}",
                                name,
                                campaign.map.name_of(dest)
                            ),
                            ReportDetail::None,
                        ));
                    }
                }
            }
        }

        let kind = order.kind;
        let previous = campaign
            .roster
            .require_mut(id)
            .map(|m| m.order.replace(order))?;
        if previous.is_some() {
            tracing::debug!(marshal = ?id, "standing order superseded");
        }
        tracing::info!(marshal = ?id, ?kind, "standing order issued");

        Ok(OrderReport::new(
            id,
            &name,
            kind,
            OrderStatus::Continues,
            format!("{} takes up the {}", name, kind),
            ReportDetail::None,
        ))
    }

    /// Explicit cancellation: costs a point and, past the first turn,
    /// a measure of the marshal's trust
    pub fn cancel_order(&mut self, campaign: &mut Campaign, id: MarshalId) -> Result<OrderReport> {
        let me = campaign.roster.require(id)?;
        let (faction, name) = (me.faction, me.name.clone());
        let Some(order) = &me.order else {
            return Err(OrderError::NoActiveOrder(id));
        };
        let kind = order.kind;
        let mid_execution = order.started_turn < campaign.turn;

        campaign.spend_action_points(faction, self.config.cancel_cost)?;
        if mid_execution {
            self.trust.adjust(id, self.config.cancel_trust_penalty);
        }

        let m = campaign.roster.require_mut(id)?;
        m.order = None;
        m.immovable = false;
        tracing::info!(marshal = ?id, ?kind, mid_execution, "standing order cancelled");

        Ok(OrderReport::new(
            id,
            &name,
            kind,
            OrderStatus::Failed,
            format!("{} stands down from the {}", name, kind),
            ReportDetail::None,
        ))
    }

    /// A direct tactical command silently displaces the standing order
    /// at no cost. Returns the displaced order's kind, if any.
    pub fn override_with_direct_command(
        &mut self,
        campaign: &mut Campaign,
        id: MarshalId,
    ) -> Result<Option<OrderKind>> {
        let m = campaign.roster.require_mut(id)?;
        let displaced = m.order.take().map(|o| o.kind);
        m.immovable = false;
        if let Some(kind) = displaced {
            tracing::debug!(marshal = ?id, ?kind, "standing order displaced by direct command");
        }
        Ok(displaced)
    }

    // === TURN EXECUTION ===

    /// Advance all standing orders for one side this turn
    pub fn advance_standing_orders(
        &mut self,
        campaign: &mut Campaign,
        side: FactionId,
    ) -> Vec<OrderReport> {
        let ids = campaign.roster.ids_of_faction(side);
        let mut reports = Vec::new();

        for id in ids {
            let Some(step) = self.step_marshal(campaign, id) else {
                continue;
            };
            let halt = step.fresh_input && self.policy == BatchPolicy::HaltOnInput;
            reports.push(step.report);
            if halt {
                break;
            }
        }

        reports
    }

    /// Resume a marshal left awaiting input with the player's choice
    pub fn resume_order(
        &mut self,
        campaign: &mut Campaign,
        id: MarshalId,
        choice: ChoiceOption,
    ) -> Result<OrderReport> {
        let me = campaign.roster.require(id)?;
        let name = me.name.clone();
        let Some(order_ref) = &me.order else {
            return Err(OrderError::NoActiveOrder(id));
        };
        let Some(pending) = order_ref.pending.clone() else {
            return Err(OrderError::NotAwaitingInput(id));
        };
        if !pending.options.contains(&choice) {
            return Err(OrderError::InvalidChoice);
        }

        // Detach the order; it goes back unless the choice ends it.
        let Some(mut order) = campaign.roster.require_mut(id)?.order.take() else {
            return Err(OrderError::NoActiveOrder(id));
        };
        order.pending = None;
        tracing::info!(marshal = ?id, ?choice, "order resumed");

        let PendingChoice { context, options: offered } = pending;
        let outcome = match (context, choice) {
            (_, ChoiceOption::CancelOrder) => StepOutcome::Fail {
                message: format!("{} stands down at the player's word", name),
                detail: ReportDetail::None,
            },

            (InterruptContext::AllyMarching { .. }, ChoiceOption::HoldPosition) => {
                // The support becomes a hold where the column stands.
                let here = campaign.roster.require(id)?.location;
                order.kind = OrderKind::Hold;
                order.target = OrderTarget::Location(here);
                order.path.clear();
                StepOutcome::Continue {
                    message: format!(
                        "{} lets the ally march on and holds {}",
                        name,
                        campaign.map.name_of(here)
                    ),
                    detail: ReportDetail::None,
                }
            }

            (_, ChoiceOption::HoldPosition) => StepOutcome::Continue {
                message: format!("{} holds in place", name),
                detail: ReportDetail::None,
            },

            (InterruptContext::AllyMarching { .. }, ChoiceOption::Follow) => {
                order.follow_confirmed = true;
                support::step(self, campaign, id, &mut order)
            }

            (InterruptContext::NearbyBattle { .. }, ChoiceOption::PressOn) => {
                self.dispatch(campaign, id, &mut order)
            }

            (
                InterruptContext::BlockedPath { enemy, .. }
                | InterruptContext::Rematch { enemy }
                | InterruptContext::Stalemate { enemy },
                ChoiceOption::Attack | ChoiceOption::AttackAgain,
            ) => self.resume_attack(campaign, id, &mut order, enemy),

            (InterruptContext::BlockedPath { .. }, ChoiceOption::GoAround) => {
                self.resume_go_around(campaign, id, &mut order)
            }

            // The option list and the context are built together, so
            // any other pairing is a command-layer bug. Leave the
            // pending decision standing.
            (context, choice) => {
                tracing::warn!(?context, ?choice, "mismatched resumption choice");
                order.pending = Some(PendingChoice {
                    context,
                    options: offered,
                });
                campaign.roster.require_mut(id)?.order = Some(order);
                return Err(OrderError::InvalidChoice);
            }
        };

        Ok(self.apply_outcome(campaign, id, order, outcome))
    }

    // === INTERNALS ===

    fn step_marshal(&mut self, campaign: &mut Campaign, id: MarshalId) -> Option<StepReport> {
        let me = campaign.roster.get(id)?;
        let (name, personality, here, destroyed) = (
            me.name.clone(),
            me.personality,
            me.location,
            me.is_destroyed(),
        );
        let order_ref = me.order.as_ref()?;
        let kind = order_ref.kind;
        let pending_options = order_ref.pending.as_ref().map(|p| p.options.clone());
        let already_stepped = order_ref.last_step_turn == Some(campaign.turn);

        // A destroyed force answers no orders.
        if destroyed {
            campaign.roster.get_mut(id)?.order = None;
            return Some(StepReport {
                report: OrderReport::new(
                    id,
                    &name,
                    kind,
                    OrderStatus::Failed,
                    format!("{}'s command has been destroyed", name),
                    ReportDetail::None,
                ),
                fresh_input: false,
            });
        }

        // Dormant until the player answers; remind, never re-step.
        if let Some(options) = pending_options {
            return Some(StepReport {
                report: OrderReport::new(
                    id,
                    &name,
                    kind,
                    OrderStatus::AwaitingInput,
                    format!("{} still awaits a decision", name),
                    ReportDetail::Choice { options },
                ),
                fresh_input: false,
            });
        }

        // A halted batch may be re-run within the same turn.
        if already_stepped {
            return None;
        }

        let mut order = campaign.roster.get_mut(id)?.order.take()?;
        order.last_step_turn = Some(campaign.turn);

        // 1. Completion condition, before any other logic.
        match conditions::evaluate(campaign, id, &order) {
            ConditionVerdict::Met(reason) => {
                let report = self.finish_success(campaign, id, &name, kind, reason, ReportDetail::None);
                return Some(StepReport {
                    report,
                    fresh_input: false,
                });
            }
            ConditionVerdict::Stale(unit) => {
                let report = self.finish_failure(
                    campaign,
                    id,
                    &name,
                    kind,
                    format!("{}'s orders name a force that no longer exists", name),
                    ReportDetail::None,
                );
                tracing::debug!(marshal = ?id, ?unit, "stale order reference treated as vanished");
                return Some(StepReport {
                    report,
                    fresh_input: false,
                });
            }
            ConditionVerdict::Unmet => {}
        }

        // 2. Orders without a resolved target cannot be executed.
        if let OrderTarget::Unresolved(what) = &order.target {
            let message = format!("{} awaits clarification: \"{}\"", name, what);
            let outcome = StepOutcome::Await {
                context: InterruptContext::UnresolvedTarget,
                options: vec![ChoiceOption::CancelOrder],
                message,
            };
            let report = self.apply_outcome(campaign, id, order, outcome);
            return Some(StepReport {
                report,
                fresh_input: true,
            });
        }

        // 3. Nearby-battle interrupt. Literal marshals are deaf to it.
        if interrupts::heeds_nearby_battle(personality) {
            if let Some(event) =
                campaign.battle_near(here, self.config.nearby_battle_range, id)
            {
                let at = event.location;
                match personality {
                    Personality::Cautious => {
                        let message = format!(
                            "{} hears battle at {} and halts for orders",
                            name,
                            campaign.map.name_of(at)
                        );
                        let outcome = StepOutcome::Await {
                            context: InterruptContext::NearbyBattle { at },
                            options: interrupts::nearby_battle_options(),
                            message,
                        };
                        let report = self.apply_outcome(campaign, id, order, outcome);
                        return Some(StepReport {
                            report,
                            fresh_input: true,
                        });
                    }
                    Personality::Aggressive => {
                        tracing::debug!(marshal = ?id, ?at, "presses on past a nearby battle");
                    }
                    Personality::Literal => unreachable!("literal marshals ignore nearby battles"),
                }
            }
        }

        // 4. The kind handler.
        let outcome = self.dispatch(campaign, id, &mut order);
        let fresh_input = matches!(outcome, StepOutcome::Await { .. });
        let report = self.apply_outcome(campaign, id, order, outcome);
        Some(StepReport {
            report,
            fresh_input,
        })
    }

    fn dispatch(
        &mut self,
        campaign: &mut Campaign,
        id: MarshalId,
        order: &mut Order,
    ) -> StepOutcome {
        match order.kind {
            OrderKind::MoveTo => move_to::step(self, campaign, id, order),
            OrderKind::Pursue => pursue::step(self, campaign, id, order),
            OrderKind::Hold => hold::step(self, campaign, id, order),
            OrderKind::Support => support::step(self, campaign, id, order),
        }
    }

    fn apply_outcome(
        &mut self,
        campaign: &mut Campaign,
        id: MarshalId,
        mut order: Order,
        outcome: StepOutcome,
    ) -> OrderReport {
        let kind = order.kind;
        let name = campaign
            .roster
            .get(id)
            .map(|m| m.name.clone())
            .unwrap_or_default();

        match outcome {
            StepOutcome::Continue { message, detail } => {
                if let Some(m) = campaign.roster.get_mut(id) {
                    m.order = Some(order);
                }
                OrderReport::new(id, &name, kind, OrderStatus::Continues, message, detail)
            }
            StepOutcome::Complete { message, detail } => {
                self.finish_success(campaign, id, &name, kind, message, detail)
            }
            StepOutcome::Fail { message, detail } => {
                self.finish_failure(campaign, id, &name, kind, message, detail)
            }
            StepOutcome::Await {
                context,
                options,
                message,
            } => {
                order.pending = Some(PendingChoice {
                    context,
                    options: options.clone(),
                });
                if let Some(m) = campaign.roster.get_mut(id) {
                    m.order = Some(order);
                }
                OrderReport::new(
                    id,
                    &name,
                    kind,
                    OrderStatus::AwaitingInput,
                    message,
                    ReportDetail::Choice { options },
                )
            }
        }
    }

    /// Success path: personality completion bonus, trust reward, order
    /// cleared. The order was already detached by the caller.
    fn finish_success(
        &mut self,
        campaign: &mut Campaign,
        id: MarshalId,
        name: &str,
        kind: OrderKind,
        message: String,
        detail: ReportDetail,
    ) -> OrderReport {
        let turn = campaign.turn;
        if let Some(m) = campaign.roster.get_mut(id) {
            m.immovable = false;
            let profile = self.profiles.for_personality(m.personality);
            if m.personality == Personality::Literal && profile.drill_bonus_turns > 0 {
                m.drill_bonus_until = Some(turn + profile.drill_bonus_turns);
            }
            self.trust.adjust(id, profile.completion_trust);
        }
        tracing::info!(marshal = ?id, ?kind, "standing order completed");
        OrderReport::new(id, name, kind, OrderStatus::Completed, message, detail)
    }

    /// Failure path: order cleared, reason reported, nothing else
    fn finish_failure(
        &mut self,
        campaign: &mut Campaign,
        id: MarshalId,
        name: &str,
        kind: OrderKind,
        message: String,
        detail: ReportDetail,
    ) -> OrderReport {
        if let Some(m) = campaign.roster.get_mut(id) {
            m.immovable = false;
        }
        tracing::info!(marshal = ?id, ?kind, "standing order failed");
        OrderReport::new(id, name, kind, OrderStatus::Failed, message, detail)
    }

    // === COMBAT PLUMBING ===

    /// Loop guard: true when this foe was fought too recently for an
    /// automatic rematch
    pub(crate) fn rematch_refused(&self, order: &Order, enemy: MarshalId, now: Turn) -> bool {
        order.fought_recently(enemy, now, self.config.rematch_window)
    }

    /// Resolve an engagement and book-keep both sides' combat memory
    ///
    /// Returns None if either force has left the field, which callers
    /// treat as a vanished target.
    pub(crate) fn fight(
        &mut self,
        campaign: &mut Campaign,
        attacker: MarshalId,
        defender: MarshalId,
        order: &mut Order,
    ) -> Option<(CombatOutcome, CombatResult)> {
        let turn = campaign.turn;
        let location = campaign.roster.get(defender)?.location;
        let (att, def) = campaign.roster.pair_mut(attacker, defender)?;

        let result = self.resolver.resolve(att, def);
        let attacker_outcome = result.outcome_for_attacker();
        let att_mem = CombatMemory {
            opponent: defender,
            turn,
            outcome: attacker_outcome,
        };
        let def_mem = CombatMemory {
            opponent: attacker,
            turn,
            outcome: result.outcome_for_defender(),
        };
        att.recent_combat = Some(att_mem);
        def.recent_combat = Some(def_mem);
        if let Some(def_order) = def.order.as_mut() {
            def_order.remember_combat(def_mem);
        }
        order.remember_combat(att_mem);

        campaign.record_battle(BattleEvent {
            location,
            attacker,
            defender,
            turn,
        });
        tracing::info!(?attacker, ?defender, outcome = ?attacker_outcome, "engagement resolved");
        Some((attacker_outcome, result))
    }

    /// Shared response when a march finds the road barred
    pub(crate) fn blocked_response(
        &mut self,
        campaign: &mut Campaign,
        id: MarshalId,
        order: &mut Order,
        destination: LocationId,
        enemy: MarshalId,
        at: LocationId,
        steps_left: u32,
    ) -> StepOutcome {
        let Some(me) = campaign.roster.get(id) else {
            return StepOutcome::Fail {
                message: "the command has dissolved".into(),
                detail: ReportDetail::None,
            };
        };
        let (name, faction, personality, here) =
            (me.name.clone(), me.faction, me.personality, me.location);
        let Some(foe) = campaign.roster.get(enemy) else {
            // The blocker vanished between detection and response.
            return StepOutcome::Continue {
                message: format!("{} finds the road clear after all", name),
                detail: ReportDetail::None,
            };
        };
        let ratio = me.strength_ratio_against(foe);
        let foe_name = foe.name.clone();
        let at_name = campaign.map.name_of(at).to_string();

        // Marching on a held destination with orders to clear it is
        // contact, not an obstacle.
        if order.kind == OrderKind::MoveTo && order.attack_on_arrival && at == destination {
            return self.attack_blocking(campaign, id, order, enemy, &name, &foe_name);
        }

        let profile = self.profiles.for_personality(personality);
        match interrupts::blocked_decision(personality, ratio, profile) {
            interrupts::BlockedDecision::Reroute => {
                if at == destination {
                    return StepOutcome::Fail {
                        message: format!(
                            "{} cannot reach {}: the destination itself is held by {}",
                            name, at_name, foe_name
                        ),
                        detail: ReportDetail::None,
                    };
                }
                let avoid = campaign.hostile_held_ground(faction);
                match campaign.map.shortest_path_avoiding(here, destination, &avoid) {
                    Some(route) => {
                        order.replace_path(route);
                        tracing::debug!(marshal = ?id, "rerouted around hostile ground");
                        StepOutcome::Continue {
                            message: format!(
                                "{} detours around {} at {}",
                                name, foe_name, at_name
                            ),
                            detail: ReportDetail::None,
                        }
                    }
                    None => StepOutcome::Fail {
                        message: format!(
                            "{} can find no road to {} that avoids the enemy",
                            name,
                            campaign.map.name_of(destination)
                        ),
                        detail: ReportDetail::None,
                    },
                }
            }
            interrupts::BlockedDecision::AutoAttack => {
                self.attack_blocking(campaign, id, order, enemy, &name, &foe_name)
            }
            interrupts::BlockedDecision::Ask => StepOutcome::Await {
                context: InterruptContext::BlockedPath { enemy, at, steps_left },
                options: interrupts::blocked_options(),
                message: format!(
                    "{} finds the road at {} barred by {}",
                    name, at_name, foe_name
                ),
            },
        }
    }

    /// Attack the force barring the way, loop-guard gated
    fn attack_blocking(
        &mut self,
        campaign: &mut Campaign,
        id: MarshalId,
        order: &mut Order,
        enemy: MarshalId,
        name: &str,
        foe_name: &str,
    ) -> StepOutcome {
        if self.rematch_refused(order, enemy, campaign.turn) {
            return StepOutcome::Await {
                context: InterruptContext::Rematch { enemy },
                options: interrupts::rematch_options(),
                message: format!(
                    "{} fought {} only recently and will not re-engage unbidden",
                    name, foe_name
                ),
            };
        }
        let Some((outcome, _result)) = self.fight(campaign, id, enemy, order) else {
            return StepOutcome::Continue {
                message: format!("{} finds {} gone from the field", name, foe_name),
                detail: ReportDetail::None,
            };
        };
        let detail = ReportDetail::Fought {
            opponent: enemy,
            outcome,
        };
        match interrupts::combat_fate(outcome) {
            interrupts::CombatFate::Continues => StepOutcome::Continue {
                message: format!("{} falls upon {} and breaks them", name, foe_name),
                detail,
            },
            interrupts::CombatFate::Fails => StepOutcome::Fail {
                message: format!("{} is broken before {}", name, foe_name),
                detail,
            },
            interrupts::CombatFate::Asks => StepOutcome::Await {
                context: InterruptContext::Stalemate { enemy },
                options: interrupts::stalemate_options(),
                message: format!(
                    "{} fights {} to a standstill and awaits orders",
                    name, foe_name
                ),
            },
        }
    }

    // === RESUMPTION HELPERS ===

    fn resume_attack(
        &mut self,
        campaign: &mut Campaign,
        id: MarshalId,
        order: &mut Order,
        enemy: MarshalId,
    ) -> StepOutcome {
        let name = campaign
            .roster
            .get(id)
            .map(|m| m.name.clone())
            .unwrap_or_default();
        let Some(foe) = campaign.roster.get(enemy) else {
            return StepOutcome::Continue {
                message: format!("{} finds the enemy gone", name),
                detail: ReportDetail::None,
            };
        };
        let foe_name = foe.name.clone();

        // A sally resumed is still a sally: the hold ground is sacred.
        if order.kind == OrderKind::Hold {
            if let Some(hold_loc) = order.hold_location() {
                if campaign.roster.get(id).map(|m| m.location) == Some(hold_loc) {
                    return hold::sally(self, campaign, id, order, enemy);
                }
            }
        }

        let Some((outcome, _)) = self.fight(campaign, id, enemy, order) else {
            return StepOutcome::Continue {
                message: format!("{} finds the enemy gone", name),
                detail: ReportDetail::None,
            };
        };
        let detail = ReportDetail::Fought {
            opponent: enemy,
            outcome,
        };

        // A pursuit that kills its quarry is done.
        if order.kind == OrderKind::Pursue
            && order.target == OrderTarget::Enemy(enemy)
            && campaign
                .roster
                .get(enemy)
                .map(|m| m.is_destroyed())
                .unwrap_or(true)
        {
            return StepOutcome::Complete {
                message: format!("{} has destroyed {}", name, foe_name),
                detail,
            };
        }

        match interrupts::combat_fate(outcome) {
            interrupts::CombatFate::Continues => StepOutcome::Continue {
                message: format!("{} attacks {} and carries the field", name, foe_name),
                detail,
            },
            interrupts::CombatFate::Fails => StepOutcome::Fail {
                message: format!("{} is broken by {}", name, foe_name),
                detail,
            },
            interrupts::CombatFate::Asks => StepOutcome::Await {
                context: InterruptContext::Stalemate { enemy },
                options: interrupts::stalemate_options(),
                message: format!("{} and {} fight to another standstill", name, foe_name),
            },
        }
    }

    fn resume_go_around(
        &mut self,
        campaign: &mut Campaign,
        id: MarshalId,
        order: &mut Order,
    ) -> StepOutcome {
        let Some(me) = campaign.roster.get(id) else {
            return StepOutcome::Fail {
                message: "the command has dissolved".into(),
                detail: ReportDetail::None,
            };
        };
        let (name, faction, here) = (me.name.clone(), me.faction, me.location);

        let destination = match (&order.kind, &order.target) {
            (OrderKind::MoveTo | OrderKind::Hold, OrderTarget::Location(loc)) => Some(*loc),
            (OrderKind::Pursue, OrderTarget::Enemy(quarry)) => {
                campaign.roster.get(*quarry).map(|m| m.location)
            }
            (OrderKind::Support, OrderTarget::Friendly(ally)) => {
                campaign.roster.get(*ally).map(|m| m.location)
            }
            _ => None,
        };
        let Some(destination) = destination else {
            return match order.kind {
                OrderKind::Pursue => StepOutcome::Complete {
                    message: format!("{}'s quarry is no longer in the field", name),
                    detail: ReportDetail::None,
                },
                _ => StepOutcome::Fail {
                    message: format!("{}'s orders no longer point anywhere", name),
                    detail: ReportDetail::None,
                },
            };
        };

        let avoid = campaign.hostile_held_ground(faction);
        match campaign.map.shortest_path_avoiding(here, destination, &avoid) {
            Some(route) => {
                order.replace_path(route);
                StepOutcome::Continue {
                    message: format!(
                        "{} swings wide toward {}",
                        name,
                        campaign.map.name_of(destination)
                    ),
                    detail: ReportDetail::None,
                }
            }
            None => StepOutcome::Fail {
                message: format!(
                    "{} can find no road around the enemy to {}",
                    name,
                    campaign.map.name_of(destination)
                ),
                detail: ReportDetail::None,
            },
        }
    }
}
