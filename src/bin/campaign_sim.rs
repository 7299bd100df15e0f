//! Standing-order campaign simulation
//!
//! Runs a scripted campaign exercising every order kind: a pursuit, a
//! march, a hold with sally opportunities, and a support column. Pending
//! decisions are auto-answered with the first offered option so the
//! simulation runs unattended.

use clap::Parser;

use warmarch::campaign::{Campaign, CampaignMap, Marshal, Personality};
use warmarch::combat::FieldResolver;
use warmarch::core::types::{FactionId, LocationId, MarshalId};
use warmarch::engine::{BatchPolicy, OrderEngine, OrderStatus, ReportDetail};
use warmarch::orders::{CompletionCondition, OrderRequest};
use warmarch::trust::CommandLedger;

#[derive(Parser, Debug)]
#[command(about = "Scripted standing-order campaign")]
struct Args {
    /// World generation seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of turns to simulate
    #[arg(long, default_value_t = 12)]
    turns: u32,

    /// Locations on the generated map
    #[arg(long, default_value_t = 16)]
    regions: u32,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("warmarch=info")
        .init();

    let args = Args::parse();

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║            WARMARCH: STANDING-ORDER CAMPAIGN                 ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    let map = CampaignMap::generate_marches(args.regions, args.seed);
    println!("Generated campaign map with {} locations\n", map.len());

    let mut campaign = Campaign::new(map);
    let east = FactionId(1);
    let west = FactionId(2);

    // Eastern command: one of each temperament.
    campaign.roster.enlist(
        Marshal::new(MarshalId(1), "Marshal Ostra", east, LocationId(0))
            .with_personality(Personality::Aggressive)
            .with_budget(2)
            .with_strength(350),
    );
    campaign.roster.enlist(
        Marshal::new(MarshalId(2), "Marshal Brenn", east, LocationId(1))
            .with_personality(Personality::Cautious)
            .with_budget(2)
            .with_strength(250),
    );
    campaign.roster.enlist(
        Marshal::new(MarshalId(3), "Marshal Tylo", east, LocationId(2))
            .with_personality(Personality::Literal)
            .with_budget(1)
            .with_strength(200),
    );

    // Western command.
    let half = args.regions / 2;
    campaign.roster.enlist(
        Marshal::new(MarshalId(10), "Warlord Kresh", west, LocationId(half))
            .with_personality(Personality::Aggressive)
            .with_budget(1)
            .with_strength(220),
    );
    campaign.roster.enlist(
        Marshal::new(MarshalId(11), "Warlord Moag", west, LocationId(half + 1))
            .with_personality(Personality::Cautious)
            .with_budget(1)
            .with_strength(300),
    );

    let mut resolver = FieldResolver::default();
    let mut trust = CommandLedger::new();
    let mut engine =
        OrderEngine::new(&mut resolver, &mut trust).with_policy(BatchPolicy::ProcessAll);

    // Issue the standing orders.
    campaign.grant_action_points(east, 10);
    campaign.grant_action_points(west, 10);

    let openings = [
        (MarshalId(1), OrderRequest::pursue(MarshalId(10))),
        (
            MarshalId(2),
            OrderRequest::move_to(LocationId(half + 2)).with_attack_on_arrival(),
        ),
        (
            MarshalId(3),
            OrderRequest::hold(LocationId(2)).with_condition(CompletionCondition::MaxTurns(8)),
        ),
        (MarshalId(10), OrderRequest::move_to(LocationId(1))),
        (MarshalId(11), OrderRequest::support(MarshalId(10))),
    ];
    for (id, request) in openings {
        match engine.issue_order(&mut campaign, id, request) {
            Ok(report) => println!("  ORDER  {}", report.message),
            Err(e) => println!("  ORDER REFUSED  {}", e),
        }
    }
    println!();

    for turn in 1..=args.turns {
        if turn > 1 {
            campaign.begin_turn();
        }
        println!("━━━ Turn {} ━━━", campaign.turn);

        for side in [west, east] {
            let reports = engine.advance_standing_orders(&mut campaign, side);
            let mut resumptions = Vec::new();
            for report in &reports {
                println!("  [{}] {}", status_tag(report.status), report.message);
                if let ReportDetail::Choice { options } = &report.detail {
                    if let Some(&first) = options.first() {
                        resumptions.push((report.marshal, first));
                    }
                }
            }
            // Auto-answer every request with its first option.
            for (marshal, choice) in resumptions {
                match engine.resume_order(&mut campaign, marshal, choice) {
                    Ok(report) => println!(
                        "  [{}] (chose {:?}) {}",
                        status_tag(report.status),
                        choice,
                        report.message
                    ),
                    Err(e) => println!("  RESUME FAILED  {}", e),
                }
            }
        }
        println!();
    }

    // Release the engine's borrows before reading the ledger.
    drop(engine);

    println!("━━━ Muster at campaign's end ━━━");
    for marshal in campaign.roster.iter() {
        println!(
            "  {} at {}: strength {}, morale {:.2}, trust {:+.2}{}",
            marshal.name,
            campaign.map.name_of(marshal.location),
            marshal.strength,
            marshal.morale,
            trust.score(marshal.id),
            if marshal.order.is_some() {
                " (order standing)"
            } else {
                ""
            }
        );
    }

    // Round-trip the campaign through the save format as a sanity check.
    let saved = campaign
        .save_to_string()
        .expect("campaign state should serialize");
    let restored = Campaign::load_from_str(&saved).expect("campaign state should restore");
    println!(
        "\nSave/load check: {} marshals restored, battle log cleared: {}",
        restored.roster.len(),
        restored.battle_events.is_empty()
    );
}

fn status_tag(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Continues => "..",
        OrderStatus::Completed => "OK",
        OrderStatus::Failed => "XX",
        OrderStatus::AwaitingInput => "??",
    }
}
