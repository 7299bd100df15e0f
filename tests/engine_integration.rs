//! Standing-order engine integration tests
//!
//! Exercises each order kind through the public entry points, with a
//! scripted resolver so combat outcomes are chosen by the test.

use warmarch::campaign::{Campaign, CampaignMap, GroundKind, Marshal, Personality};
use warmarch::combat::{CombatResolver, CombatResult, Victor};
use warmarch::core::types::{FactionId, LocationId, MarshalId};
use warmarch::engine::{BatchPolicy, OrderEngine, OrderStatus, ReportDetail};
use warmarch::orders::{ChoiceOption, OrderRequest};
use warmarch::trust::NullLedger;

/// Resolver whose outcome is chosen by the test
struct ScriptedResolver {
    victor: Victor,
    kill_loser: bool,
}

impl ScriptedResolver {
    fn attacker_wins() -> Self {
        Self {
            victor: Victor::Attacker,
            kill_loser: true,
        }
    }

    fn defender_wins() -> Self {
        Self {
            victor: Victor::Defender,
            kill_loser: false,
        }
    }

    fn stalemate() -> Self {
        Self {
            victor: Victor::None,
            kill_loser: false,
        }
    }
}

impl CombatResolver for ScriptedResolver {
    fn resolve(&mut self, attacker: &mut Marshal, defender: &mut Marshal) -> CombatResult {
        if self.kill_loser {
            match self.victor {
                Victor::Attacker => defender.strength = 0,
                Victor::Defender => attacker.strength = 0,
                Victor::None => {}
            }
        }
        CombatResult {
            victor: self.victor,
            attacker_casualties: 10,
            defender_casualties: 10,
            attacker_routed: self.victor == Victor::Defender,
            defender_routed: self.victor == Victor::Attacker,
            rounds_fought: 1,
        }
    }
}

/// A straight road of `len` posts: 0 - 1 - ... - len-1
fn line_campaign(len: u32) -> Campaign {
    let mut map = CampaignMap::new();
    for i in 0..len {
        map.add_location(LocationId(i), &format!("Post {}", i), GroundKind::Open);
        if i > 0 {
            map.link(LocationId(i - 1), LocationId(i));
        }
    }
    let mut campaign = Campaign::new(map);
    campaign.grant_action_points(FactionId(1), 20);
    campaign.grant_action_points(FactionId(2), 20);
    campaign
}

fn marshal(
    id: u32,
    faction: u32,
    location: u32,
    personality: Personality,
    budget: u32,
    strength: u32,
) -> Marshal {
    Marshal::new(
        MarshalId(id),
        &format!("Marshal {}", id),
        FactionId(faction),
        LocationId(location),
    )
    .with_personality(personality)
    .with_budget(budget)
    .with_strength(strength)
}

fn choice_options(detail: &ReportDetail) -> Vec<ChoiceOption> {
    match detail {
        ReportDetail::Choice { options } => options.clone(),
        _ => Vec::new(),
    }
}

// === MOVE_TO ===

#[test]
fn test_march_completes_within_budget() {
    // Scenario: budget 2, route [A, B, C] with the column standing on A.
    let mut campaign = line_campaign(3);
    campaign
        .roster
        .enlist(marshal(1, 1, 0, Personality::Aggressive, 2, 300));

    let mut resolver = ScriptedResolver::stalemate();
    let mut trust = NullLedger;
    let mut engine = OrderEngine::new(&mut resolver, &mut trust);

    engine
        .issue_order(&mut campaign, MarshalId(1), OrderRequest::move_to(LocationId(2)))
        .unwrap();

    let reports = engine.advance_standing_orders(&mut campaign, FactionId(1));
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].status, OrderStatus::Completed);

    let m = campaign.roster.get(MarshalId(1)).unwrap();
    assert_eq!(m.location, LocationId(2));
    assert!(m.order.is_none());

    match &reports[0].detail {
        ReportDetail::Marched { entered } => {
            assert_eq!(entered, &vec![LocationId(1), LocationId(2)]);
        }
        other => panic!("expected march detail, got {:?}", other),
    }
}

#[test]
fn test_march_partial_progress_kept() {
    let mut campaign = line_campaign(5);
    campaign
        .roster
        .enlist(marshal(1, 1, 0, Personality::Literal, 2, 300));

    let mut resolver = ScriptedResolver::stalemate();
    let mut trust = NullLedger;
    let mut engine = OrderEngine::new(&mut resolver, &mut trust);

    engine
        .issue_order(&mut campaign, MarshalId(1), OrderRequest::move_to(LocationId(4)))
        .unwrap();

    let reports = engine.advance_standing_orders(&mut campaign, FactionId(1));
    assert_eq!(reports[0].status, OrderStatus::Continues);
    assert_eq!(
        campaign.roster.get(MarshalId(1)).unwrap().location,
        LocationId(2)
    );

    campaign.begin_turn();
    let reports = engine.advance_standing_orders(&mut campaign, FactionId(1));
    assert_eq!(reports[0].status, OrderStatus::Completed);
    assert_eq!(
        campaign.roster.get(MarshalId(1)).unwrap().location,
        LocationId(4)
    );
}

#[test]
fn test_cautious_blocked_awaits_input() {
    // Scenario: a hostile stands on the very next step of the route.
    let mut campaign = line_campaign(3);
    campaign
        .roster
        .enlist(marshal(1, 1, 0, Personality::Cautious, 2, 300));
    campaign
        .roster
        .enlist(marshal(9, 2, 1, Personality::Aggressive, 1, 100));

    let mut resolver = ScriptedResolver::stalemate();
    let mut trust = NullLedger;
    let mut engine = OrderEngine::new(&mut resolver, &mut trust);

    engine
        .issue_order(&mut campaign, MarshalId(1), OrderRequest::move_to(LocationId(2)))
        .unwrap();

    let reports = engine.advance_standing_orders(&mut campaign, FactionId(1));
    assert_eq!(reports[0].status, OrderStatus::AwaitingInput);

    let options = choice_options(&reports[0].detail);
    for expected in [
        ChoiceOption::Attack,
        ChoiceOption::GoAround,
        ChoiceOption::HoldPosition,
        ChoiceOption::CancelOrder,
    ] {
        assert!(options.contains(&expected), "missing {:?}", expected);
    }

    // The column never stepped into contact.
    assert_eq!(
        campaign.roster.get(MarshalId(1)).unwrap().location,
        LocationId(0)
    );
}

#[test]
fn test_aggressive_auto_attacks_blocking_force() {
    let mut campaign = line_campaign(3);
    campaign
        .roster
        .enlist(marshal(1, 1, 0, Personality::Aggressive, 2, 300));
    campaign
        .roster
        .enlist(marshal(9, 2, 1, Personality::Cautious, 1, 100));

    let mut resolver = ScriptedResolver::attacker_wins();
    let mut trust = NullLedger;
    let mut engine = OrderEngine::new(&mut resolver, &mut trust);

    engine
        .issue_order(&mut campaign, MarshalId(1), OrderRequest::move_to(LocationId(2)))
        .unwrap();

    let reports = engine.advance_standing_orders(&mut campaign, FactionId(1));
    // Decisive win: the order continues.
    assert_eq!(reports[0].status, OrderStatus::Continues);
    assert!(campaign.roster.get(MarshalId(9)).unwrap().is_destroyed());

    // Next turn the road is clear and the march completes.
    campaign.begin_turn();
    let reports = engine.advance_standing_orders(&mut campaign, FactionId(1));
    assert_eq!(reports[0].status, OrderStatus::Completed);
    assert_eq!(
        campaign.roster.get(MarshalId(1)).unwrap().location,
        LocationId(2)
    );
}

#[test]
fn test_aggressive_outmatched_asks_instead() {
    let mut campaign = line_campaign(3);
    // Ratio 100/300 is well under the engagement threshold.
    campaign
        .roster
        .enlist(marshal(1, 1, 0, Personality::Aggressive, 1, 100));
    campaign
        .roster
        .enlist(marshal(9, 2, 1, Personality::Cautious, 1, 300));

    let mut resolver = ScriptedResolver::stalemate();
    let mut trust = NullLedger;
    let mut engine = OrderEngine::new(&mut resolver, &mut trust);

    engine
        .issue_order(&mut campaign, MarshalId(1), OrderRequest::move_to(LocationId(2)))
        .unwrap();

    let reports = engine.advance_standing_orders(&mut campaign, FactionId(1));
    assert_eq!(reports[0].status, OrderStatus::AwaitingInput);
}

#[test]
fn test_literal_reroutes_around_block() {
    // Diamond: 0 - 1 - 3 and 0 - 2 - 3, hostile on 1.
    let mut map = CampaignMap::new();
    for i in 0..4 {
        map.add_location(LocationId(i), &format!("Post {}", i), GroundKind::Open);
    }
    map.link(LocationId(0), LocationId(1));
    map.link(LocationId(1), LocationId(3));
    map.link(LocationId(0), LocationId(2));
    map.link(LocationId(2), LocationId(3));

    let mut campaign = Campaign::new(map);
    campaign.grant_action_points(FactionId(1), 20);
    campaign
        .roster
        .enlist(marshal(1, 1, 0, Personality::Literal, 2, 100));
    campaign
        .roster
        .enlist(marshal(9, 2, 1, Personality::Aggressive, 1, 500));

    let mut resolver = ScriptedResolver::stalemate();
    let mut trust = NullLedger;
    let mut engine = OrderEngine::new(&mut resolver, &mut trust);

    engine
        .issue_order(&mut campaign, MarshalId(1), OrderRequest::move_to(LocationId(3)))
        .unwrap();

    // First turn: contact found, route silently recomputed.
    let reports = engine.advance_standing_orders(&mut campaign, FactionId(1));
    assert_eq!(reports[0].status, OrderStatus::Continues);
    assert_eq!(
        campaign.roster.get(MarshalId(1)).unwrap().location,
        LocationId(0)
    );

    // Second turn: the detour through 2 reaches the destination.
    campaign.begin_turn();
    let reports = engine.advance_standing_orders(&mut campaign, FactionId(1));
    assert_eq!(reports[0].status, OrderStatus::Completed);
    assert_eq!(
        campaign.roster.get(MarshalId(1)).unwrap().location,
        LocationId(3)
    );
}

#[test]
fn test_literal_fails_when_no_route_avoids_enemy() {
    let mut campaign = line_campaign(3);
    campaign
        .roster
        .enlist(marshal(1, 1, 0, Personality::Literal, 1, 100));
    campaign
        .roster
        .enlist(marshal(9, 2, 1, Personality::Aggressive, 1, 500));

    let mut resolver = ScriptedResolver::stalemate();
    let mut trust = NullLedger;
    let mut engine = OrderEngine::new(&mut resolver, &mut trust);

    engine
        .issue_order(&mut campaign, MarshalId(1), OrderRequest::move_to(LocationId(2)))
        .unwrap();

    let reports = engine.advance_standing_orders(&mut campaign, FactionId(1));
    assert_eq!(reports[0].status, OrderStatus::Failed);
    assert!(campaign.roster.get(MarshalId(1)).unwrap().order.is_none());
}

// === PURSUE ===

#[test]
fn test_pursuit_completes_when_quarry_destroyed_elsewhere() {
    // Scenario: the quarry's strength drops to zero via a battle this
    // engine never saw; the next step completes without moving.
    let mut campaign = line_campaign(5);
    campaign
        .roster
        .enlist(marshal(1, 1, 0, Personality::Aggressive, 2, 300));
    campaign
        .roster
        .enlist(marshal(9, 2, 4, Personality::Cautious, 1, 200));

    let mut resolver = ScriptedResolver::stalemate();
    let mut trust = NullLedger;
    let mut engine = OrderEngine::new(&mut resolver, &mut trust);

    engine
        .issue_order(&mut campaign, MarshalId(1), OrderRequest::pursue(MarshalId(9)))
        .unwrap();

    campaign.roster.get_mut(MarshalId(9)).unwrap().strength = 0;

    let reports = engine.advance_standing_orders(&mut campaign, FactionId(1));
    assert_eq!(reports[0].status, OrderStatus::Completed);
    assert!(reports[0].message.contains("destroyed"));
    assert_eq!(
        campaign.roster.get(MarshalId(1)).unwrap().location,
        LocationId(0),
        "no movement should be attempted"
    );
}

#[test]
fn test_pursuit_tracks_moving_quarry() {
    let mut campaign = line_campaign(6);
    campaign
        .roster
        .enlist(marshal(1, 1, 0, Personality::Aggressive, 2, 300));
    campaign
        .roster
        .enlist(marshal(9, 2, 3, Personality::Cautious, 1, 200));

    let mut resolver = ScriptedResolver::stalemate();
    let mut trust = NullLedger;
    let mut engine = OrderEngine::new(&mut resolver, &mut trust);

    engine
        .issue_order(&mut campaign, MarshalId(1), OrderRequest::pursue(MarshalId(9)))
        .unwrap();

    let reports = engine.advance_standing_orders(&mut campaign, FactionId(1));
    assert_eq!(reports[0].status, OrderStatus::Continues);
    assert_eq!(
        campaign.roster.get(MarshalId(1)).unwrap().location,
        LocationId(2)
    );

    // The quarry slips away; the route must re-resolve, not chase a
    // stale snapshot.
    campaign.roster.get_mut(MarshalId(9)).unwrap().location = LocationId(5);
    campaign.begin_turn();
    engine.advance_standing_orders(&mut campaign, FactionId(1));
    assert_eq!(
        campaign.roster.get(MarshalId(1)).unwrap().location,
        LocationId(4)
    );
}

#[test]
fn test_no_automatic_rematch_next_turn() {
    // Scenario: stalemate on turn T, co-located again on turn T+1 - the
    // loop guard demands a human decision, offering attack_again.
    let mut campaign = line_campaign(3);
    campaign
        .roster
        .enlist(marshal(1, 1, 1, Personality::Aggressive, 2, 300));
    campaign
        .roster
        .enlist(marshal(9, 2, 1, Personality::Cautious, 1, 300));

    let mut resolver = ScriptedResolver::stalemate();
    let mut trust = NullLedger;
    let mut engine = OrderEngine::new(&mut resolver, &mut trust);

    engine
        .issue_order(&mut campaign, MarshalId(1), OrderRequest::pursue(MarshalId(9)))
        .unwrap();

    // Turn 1: the fight happens and stalls.
    let reports = engine.advance_standing_orders(&mut campaign, FactionId(1));
    assert_eq!(reports[0].status, OrderStatus::AwaitingInput);

    // The player elects to hold rather than press.
    let report = engine
        .resume_order(&mut campaign, MarshalId(1), ChoiceOption::HoldPosition)
        .unwrap();
    assert_eq!(report.status, OrderStatus::Continues);

    // Turn 2: still co-located. No automatic attack; attack_again offered.
    campaign.begin_turn();
    let reports = engine.advance_standing_orders(&mut campaign, FactionId(1));
    assert_eq!(reports[0].status, OrderStatus::AwaitingInput);
    let options = choice_options(&reports[0].detail);
    assert!(options.contains(&ChoiceOption::AttackAgain));

    // The guard, not a new fight: combat memory still points at turn 1.
    let order = campaign
        .roster
        .get(MarshalId(1))
        .unwrap()
        .order
        .as_ref()
        .unwrap();
    assert_eq!(order.last_combat.unwrap().turn, 1);
}

#[test]
fn test_pursuit_kill_completes_order() {
    let mut campaign = line_campaign(3);
    campaign
        .roster
        .enlist(marshal(1, 1, 1, Personality::Aggressive, 2, 500));
    campaign
        .roster
        .enlist(marshal(9, 2, 1, Personality::Cautious, 1, 100));

    let mut resolver = ScriptedResolver::attacker_wins();
    let mut trust = NullLedger;
    let mut engine = OrderEngine::new(&mut resolver, &mut trust);

    engine
        .issue_order(&mut campaign, MarshalId(1), OrderRequest::pursue(MarshalId(9)))
        .unwrap();

    let reports = engine.advance_standing_orders(&mut campaign, FactionId(1));
    assert_eq!(reports[0].status, OrderStatus::Completed);
    assert!(campaign.roster.get(MarshalId(1)).unwrap().order.is_none());
}

#[test]
fn test_pursuit_loss_clears_order() {
    let mut campaign = line_campaign(3);
    campaign
        .roster
        .enlist(marshal(1, 1, 1, Personality::Aggressive, 2, 100));
    campaign
        .roster
        .enlist(marshal(9, 2, 1, Personality::Cautious, 1, 500));

    let mut resolver = ScriptedResolver::defender_wins();
    let mut trust = NullLedger;
    let mut engine = OrderEngine::new(&mut resolver, &mut trust);

    engine
        .issue_order(&mut campaign, MarshalId(1), OrderRequest::pursue(MarshalId(9)))
        .unwrap();

    let reports = engine.advance_standing_orders(&mut campaign, FactionId(1));
    assert_eq!(reports[0].status, OrderStatus::Failed);
    assert!(campaign.roster.get(MarshalId(1)).unwrap().order.is_none());
}

// === HOLD ===

#[test]
fn test_literal_hold_ignores_nearby_battle() {
    // Scenario: a battle one location away never touches a literal
    // marshal's hold; the immovable stance is raised as normal.
    let mut campaign = line_campaign(3);
    campaign
        .roster
        .enlist(marshal(1, 1, 2, Personality::Literal, 1, 200));

    let mut resolver = ScriptedResolver::stalemate();
    let mut trust = NullLedger;
    let mut engine = OrderEngine::new(&mut resolver, &mut trust);

    engine
        .issue_order(&mut campaign, MarshalId(1), OrderRequest::hold(LocationId(2)))
        .unwrap();

    campaign.record_battle(warmarch::campaign::BattleEvent {
        location: LocationId(1),
        attacker: MarshalId(50),
        defender: MarshalId(51),
        turn: campaign.turn,
    });

    let reports = engine.advance_standing_orders(&mut campaign, FactionId(1));
    assert_eq!(reports[0].status, OrderStatus::Continues);
    assert!(campaign.roster.get(MarshalId(1)).unwrap().immovable);
}

#[test]
fn test_cautious_halts_for_nearby_battle() {
    let mut campaign = line_campaign(4);
    campaign
        .roster
        .enlist(marshal(1, 1, 0, Personality::Cautious, 1, 200));

    let mut resolver = ScriptedResolver::stalemate();
    let mut trust = NullLedger;
    let mut engine = OrderEngine::new(&mut resolver, &mut trust);

    engine
        .issue_order(&mut campaign, MarshalId(1), OrderRequest::move_to(LocationId(3)))
        .unwrap();

    campaign.record_battle(warmarch::campaign::BattleEvent {
        location: LocationId(1),
        attacker: MarshalId(50),
        defender: MarshalId(51),
        turn: campaign.turn,
    });

    let reports = engine.advance_standing_orders(&mut campaign, FactionId(1));
    assert_eq!(reports[0].status, OrderStatus::AwaitingInput);
    let options = choice_options(&reports[0].detail);
    assert!(options.contains(&ChoiceOption::PressOn));

    // Pressing on runs the march this turn.
    let report = engine
        .resume_order(&mut campaign, MarshalId(1), ChoiceOption::PressOn)
        .unwrap();
    assert_eq!(report.status, OrderStatus::Continues);
    assert_eq!(
        campaign.roster.get(MarshalId(1)).unwrap().location,
        LocationId(1)
    );
}

#[test]
fn test_cautious_hold_fortifies() {
    let mut campaign = line_campaign(3);
    campaign
        .roster
        .enlist(marshal(1, 1, 1, Personality::Cautious, 1, 200));

    let mut resolver = ScriptedResolver::stalemate();
    let mut trust = NullLedger;
    let mut engine = OrderEngine::new(&mut resolver, &mut trust);

    engine
        .issue_order(&mut campaign, MarshalId(1), OrderRequest::hold(LocationId(1)))
        .unwrap();

    engine.advance_standing_orders(&mut campaign, FactionId(1));
    assert!(campaign.roster.get(MarshalId(1)).unwrap().fortified);
}

#[test]
fn test_sally_never_drifts_position() {
    let mut campaign = line_campaign(3);
    campaign
        .roster
        .enlist(marshal(1, 1, 1, Personality::Aggressive, 1, 400));
    campaign
        .roster
        .enlist(marshal(9, 2, 2, Personality::Cautious, 1, 100));

    let mut resolver = ScriptedResolver::attacker_wins();
    let mut trust = NullLedger;
    let mut engine = OrderEngine::new(&mut resolver, &mut trust);

    engine
        .issue_order(&mut campaign, MarshalId(1), OrderRequest::hold(LocationId(1)))
        .unwrap();

    let reports = engine.advance_standing_orders(&mut campaign, FactionId(1));
    assert_eq!(reports[0].status, OrderStatus::Continues);
    assert!(reports[0].message.contains("sallies"));
    // The hard invariant: the sally never relocates the holder.
    assert_eq!(
        campaign.roster.get(MarshalId(1)).unwrap().location,
        LocationId(1)
    );
    assert!(campaign.roster.get(MarshalId(9)).unwrap().is_destroyed());
}

#[test]
fn test_sally_repulse_still_restores_position() {
    let mut campaign = line_campaign(3);
    campaign
        .roster
        .enlist(marshal(1, 1, 1, Personality::Aggressive, 1, 400));
    campaign
        .roster
        .enlist(marshal(9, 2, 2, Personality::Cautious, 1, 300));

    let mut resolver = ScriptedResolver::defender_wins();
    let mut trust = NullLedger;
    let mut engine = OrderEngine::new(&mut resolver, &mut trust);

    engine
        .issue_order(&mut campaign, MarshalId(1), OrderRequest::hold(LocationId(1)))
        .unwrap();

    let reports = engine.advance_standing_orders(&mut campaign, FactionId(1));
    assert_eq!(reports[0].status, OrderStatus::Failed);
    assert_eq!(
        campaign.roster.get(MarshalId(1)).unwrap().location,
        LocationId(1)
    );
}

#[test]
fn test_hold_ignores_unfavorable_target() {
    let mut campaign = line_campaign(3);
    // Ratio 200/300 is under the sally threshold of 1.0.
    campaign
        .roster
        .enlist(marshal(1, 1, 1, Personality::Aggressive, 1, 200));
    campaign
        .roster
        .enlist(marshal(9, 2, 2, Personality::Cautious, 1, 300));

    let mut resolver = ScriptedResolver::stalemate();
    let mut trust = NullLedger;
    let mut engine = OrderEngine::new(&mut resolver, &mut trust);

    engine
        .issue_order(&mut campaign, MarshalId(1), OrderRequest::hold(LocationId(1)))
        .unwrap();

    let reports = engine.advance_standing_orders(&mut campaign, FactionId(1));
    assert_eq!(reports[0].status, OrderStatus::Continues);
    assert!(!campaign.roster.get(MarshalId(9)).unwrap().is_destroyed());
}

#[test]
fn test_displaced_holder_marches_back() {
    let mut campaign = line_campaign(4);
    campaign
        .roster
        .enlist(marshal(1, 1, 3, Personality::Cautious, 2, 200));

    let mut resolver = ScriptedResolver::stalemate();
    let mut trust = NullLedger;
    let mut engine = OrderEngine::new(&mut resolver, &mut trust);

    engine
        .issue_order(&mut campaign, MarshalId(1), OrderRequest::hold(LocationId(1)))
        .unwrap();

    let reports = engine.advance_standing_orders(&mut campaign, FactionId(1));
    assert_eq!(reports[0].status, OrderStatus::Continues);
    assert_eq!(
        campaign.roster.get(MarshalId(1)).unwrap().location,
        LocationId(1)
    );

    // Back on the hold ground, the next turn digs in.
    campaign.begin_turn();
    engine.advance_standing_orders(&mut campaign, FactionId(1));
    assert!(campaign.roster.get(MarshalId(1)).unwrap().fortified);
}

// === SUPPORT ===

#[test]
fn test_cautious_support_asks_before_following() {
    let mut campaign = line_campaign(5);
    campaign
        .roster
        .enlist(marshal(1, 1, 0, Personality::Cautious, 2, 200));
    campaign
        .roster
        .enlist(marshal(2, 1, 2, Personality::Aggressive, 1, 300));

    let mut resolver = ScriptedResolver::stalemate();
    let mut trust = NullLedger;
    let mut engine = OrderEngine::new(&mut resolver, &mut trust);

    // The ally is itself under marching orders.
    engine
        .issue_order(&mut campaign, MarshalId(2), OrderRequest::move_to(LocationId(4)))
        .unwrap();
    engine
        .issue_order(&mut campaign, MarshalId(1), OrderRequest::support(MarshalId(2)))
        .unwrap();

    let reports = engine.advance_standing_orders(&mut campaign, FactionId(1));
    let support_report = reports
        .iter()
        .find(|r| r.marshal == MarshalId(1))
        .expect("support column should report");
    assert_eq!(support_report.status, OrderStatus::AwaitingInput);
    let options = choice_options(&support_report.detail);
    assert!(options.contains(&ChoiceOption::Follow));
    assert!(options.contains(&ChoiceOption::HoldPosition));

    // Follow: the approval sticks and the column moves at once.
    let report = engine
        .resume_order(&mut campaign, MarshalId(1), ChoiceOption::Follow)
        .unwrap();
    assert_eq!(report.status, OrderStatus::Continues);
    assert_ne!(
        campaign.roster.get(MarshalId(1)).unwrap().location,
        LocationId(0)
    );
    let order = campaign
        .roster
        .get(MarshalId(1))
        .unwrap()
        .order
        .as_ref()
        .unwrap();
    assert!(order.follow_confirmed);
}

#[test]
fn test_aggressive_support_follows_unasked() {
    let mut campaign = line_campaign(5);
    campaign
        .roster
        .enlist(marshal(1, 1, 0, Personality::Aggressive, 2, 200));
    campaign
        .roster
        .enlist(marshal(2, 1, 2, Personality::Aggressive, 1, 300));

    let mut resolver = ScriptedResolver::stalemate();
    let mut trust = NullLedger;
    let mut engine = OrderEngine::new(&mut resolver, &mut trust);

    engine
        .issue_order(&mut campaign, MarshalId(2), OrderRequest::move_to(LocationId(4)))
        .unwrap();
    engine
        .issue_order(&mut campaign, MarshalId(1), OrderRequest::support(MarshalId(2)))
        .unwrap();

    let reports = engine.advance_standing_orders(&mut campaign, FactionId(1));
    let support_report = reports
        .iter()
        .find(|r| r.marshal == MarshalId(1))
        .expect("support column should report");
    assert_eq!(support_report.status, OrderStatus::Continues);
    assert_eq!(
        campaign.roster.get(MarshalId(1)).unwrap().location,
        LocationId(2)
    );
}

#[test]
fn test_support_fails_when_ally_falls() {
    let mut campaign = line_campaign(4);
    campaign
        .roster
        .enlist(marshal(1, 1, 0, Personality::Aggressive, 2, 200));
    campaign
        .roster
        .enlist(marshal(2, 1, 3, Personality::Cautious, 1, 300));

    let mut resolver = ScriptedResolver::stalemate();
    let mut trust = NullLedger;
    let mut engine = OrderEngine::new(&mut resolver, &mut trust);

    engine
        .issue_order(&mut campaign, MarshalId(1), OrderRequest::support(MarshalId(2)))
        .unwrap();

    campaign.roster.muster_out(MarshalId(2));

    let reports = engine.advance_standing_orders(&mut campaign, FactionId(1));
    assert_eq!(reports[0].status, OrderStatus::Failed);
    assert!(reports[0].message.contains("fallen"));
}

#[test]
fn test_support_completes_on_ally_victory() {
    use warmarch::combat::CombatOutcome;
    use warmarch::orders::{CombatMemory, CompletionCondition};

    let mut campaign = line_campaign(4);
    campaign
        .roster
        .enlist(marshal(1, 1, 2, Personality::Aggressive, 2, 200));
    campaign
        .roster
        .enlist(marshal(2, 1, 2, Personality::Cautious, 1, 300));

    let mut resolver = ScriptedResolver::stalemate();
    let mut trust = NullLedger;
    let mut engine = OrderEngine::new(&mut resolver, &mut trust);

    engine
        .issue_order(
            &mut campaign,
            MarshalId(1),
            OrderRequest::support(MarshalId(2))
                .with_condition(CompletionCondition::UntilBattleWon),
        )
        .unwrap();

    // The ally's victory is recorded by whatever resolved its battle.
    campaign.roster.get_mut(MarshalId(2)).unwrap().recent_combat = Some(CombatMemory {
        opponent: MarshalId(9),
        turn: campaign.turn,
        outcome: CombatOutcome::DecisiveWin,
    });

    let reports = engine.advance_standing_orders(&mut campaign, FactionId(1));
    assert_eq!(reports[0].status, OrderStatus::Completed);
    assert!(reports[0].message.contains("won"));
}

#[test]
fn test_literal_support_mirrors_ally() {
    let mut campaign = line_campaign(3);
    campaign
        .roster
        .enlist(marshal(1, 1, 1, Personality::Literal, 1, 200));
    campaign
        .roster
        .enlist(marshal(2, 1, 1, Personality::Cautious, 1, 300));
    campaign.roster.get_mut(MarshalId(2)).unwrap().fortified = true;

    let mut resolver = ScriptedResolver::stalemate();
    let mut trust = NullLedger;
    let mut engine = OrderEngine::new(&mut resolver, &mut trust);

    engine
        .issue_order(&mut campaign, MarshalId(1), OrderRequest::support(MarshalId(2)))
        .unwrap();

    engine.advance_standing_orders(&mut campaign, FactionId(1));
    assert!(campaign.roster.get(MarshalId(1)).unwrap().fortified);
}

// === BATCH BEHAVIOR ===

#[test]
fn test_batch_halts_on_first_request_by_default() {
    let mut campaign = line_campaign(4);
    // Both cautious columns will hit the same hostile block.
    campaign
        .roster
        .enlist(marshal(1, 1, 0, Personality::Cautious, 1, 200));
    campaign
        .roster
        .enlist(marshal(2, 1, 0, Personality::Cautious, 1, 200));
    campaign
        .roster
        .enlist(marshal(9, 2, 1, Personality::Aggressive, 1, 100));

    let mut resolver = ScriptedResolver::stalemate();
    let mut trust = NullLedger;
    let mut engine = OrderEngine::new(&mut resolver, &mut trust);

    engine
        .issue_order(&mut campaign, MarshalId(1), OrderRequest::move_to(LocationId(3)))
        .unwrap();
    engine
        .issue_order(&mut campaign, MarshalId(2), OrderRequest::move_to(LocationId(3)))
        .unwrap();

    let reports = engine.advance_standing_orders(&mut campaign, FactionId(1));
    // Reference policy: one requires-input unit at a time.
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].status, OrderStatus::AwaitingInput);

    // Answer it, re-run the batch: the first column does not re-step,
    // the second now gets its turn.
    engine
        .resume_order(&mut campaign, MarshalId(1), ChoiceOption::HoldPosition)
        .unwrap();
    let reports = engine.advance_standing_orders(&mut campaign, FactionId(1));
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].marshal, MarshalId(2));
}

#[test]
fn test_process_all_policy_keeps_going() {
    let mut campaign = line_campaign(4);
    campaign
        .roster
        .enlist(marshal(1, 1, 0, Personality::Cautious, 1, 200));
    campaign
        .roster
        .enlist(marshal(2, 1, 0, Personality::Cautious, 1, 200));
    campaign
        .roster
        .enlist(marshal(9, 2, 1, Personality::Aggressive, 1, 100));

    let mut resolver = ScriptedResolver::stalemate();
    let mut trust = NullLedger;
    let mut engine =
        OrderEngine::new(&mut resolver, &mut trust).with_policy(BatchPolicy::ProcessAll);

    engine
        .issue_order(&mut campaign, MarshalId(1), OrderRequest::move_to(LocationId(3)))
        .unwrap();
    engine
        .issue_order(&mut campaign, MarshalId(2), OrderRequest::move_to(LocationId(3)))
        .unwrap();

    let reports = engine.advance_standing_orders(&mut campaign, FactionId(1));
    assert_eq!(reports.len(), 2);
}

#[test]
fn test_one_failure_never_aborts_the_batch() {
    let mut campaign = line_campaign(4);
    campaign
        .roster
        .enlist(marshal(1, 1, 0, Personality::Literal, 1, 200));
    campaign
        .roster
        .enlist(marshal(2, 1, 0, Personality::Literal, 2, 200));
    // The literal column at the front finds every road severed.
    campaign
        .roster
        .enlist(marshal(9, 2, 1, Personality::Aggressive, 1, 500));

    let mut resolver = ScriptedResolver::stalemate();
    let mut trust = NullLedger;
    let mut engine = OrderEngine::new(&mut resolver, &mut trust);

    engine
        .issue_order(&mut campaign, MarshalId(1), OrderRequest::move_to(LocationId(2)))
        .unwrap();
    engine
        .issue_order(&mut campaign, MarshalId(2), OrderRequest::hold(LocationId(0)))
        .unwrap();

    let reports = engine.advance_standing_orders(&mut campaign, FactionId(1));
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].status, OrderStatus::Failed);
    assert_eq!(reports[1].status, OrderStatus::Continues);
}
