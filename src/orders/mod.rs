//! Standing orders - multi-turn autonomous instructions
//!
//! A standing order is executed one step per turn by the engine until its
//! completion condition is met, it fails, or the player intervenes. The
//! whole record is serializable so a campaign can be saved mid-march.

pub mod request;

pub use request::OrderRequest;

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::combat::CombatOutcome;
use crate::core::types::{LocationId, MarshalId, Turn};

/// The four standing-order kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderKind {
    MoveTo,
    Pursue,
    Hold,
    Support,
}

impl std::fmt::Display for OrderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let word = match self {
            Self::MoveTo => "march",
            Self::Pursue => "pursuit",
            Self::Hold => "hold",
            Self::Support => "support",
        };
        write!(f, "{}", word)
    }
}

/// What an order is aimed at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderTarget {
    Location(LocationId),
    Enemy(MarshalId),
    Friendly(MarshalId),
    /// Placeholder from the command layer awaiting clarification
    Unresolved(String),
}

impl OrderTarget {
    /// The unit this order references, if it references one at all
    pub fn unit(&self) -> Option<MarshalId> {
        match self {
            Self::Enemy(id) | Self::Friendly(id) => Some(*id),
            Self::Location(_) | Self::Unresolved(_) => None,
        }
    }
}

/// Completion predicate. At most one per order; deliberately not composable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletionCondition {
    /// Order ends after this many turns of execution
    MaxTurns(u32),
    /// Order ends when the named unit stands in the same location
    UntilArrives(MarshalId),
    /// Order ends when the named unit is destroyed or gone
    UntilDestroyed(MarshalId),
    /// Order ends when the relevant force wins a battle decisively
    UntilBattleWon,
    /// Order ends when any other friendly force shares the location
    UntilRelieved,
}

/// Memory of the most recent fight, kept for loop prevention
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombatMemory {
    pub opponent: MarshalId,
    pub turn: Turn,
    pub outcome: CombatOutcome,
}

/// Options the player may pick from when an order pauses for input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChoiceOption {
    Attack,
    AttackAgain,
    GoAround,
    HoldPosition,
    PressOn,
    Follow,
    CancelOrder,
}

/// What interrupted the order, with enough state to resume from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InterruptContext {
    /// A hostile force bars the next step of the route
    BlockedPath {
        enemy: MarshalId,
        at: LocationId,
        /// Movement points still unspent when the column halted
        steps_left: u32,
    },
    /// The loop guard refused an automatic rematch with a recent foe
    Rematch { enemy: MarshalId },
    /// A fight ended without a victor
    Stalemate { enemy: MarshalId },
    /// A battle rages within earshot of the column
    NearbyBattle { at: LocationId },
    /// The supported ally is itself under marching orders
    AllyMarching { ally: MarshalId },
    /// The command layer never resolved who or where the target is
    UnresolvedTarget,
}

/// A pending decision: the order is dormant until the player answers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingChoice {
    pub context: InterruptContext,
    pub options: Vec<ChoiceOption>,
}

/// An active standing order carried by a marshal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub kind: OrderKind,
    pub target: OrderTarget,
    /// Remaining route, head first. May begin with the current location,
    /// which is popped without spending movement. Always empty for HOLD
    /// while standing on the hold ground.
    pub path: VecDeque<LocationId>,
    pub started_turn: Turn,
    pub condition: Option<CompletionCondition>,
    /// MoveTo only: fight any hostile found at the destination
    pub attack_on_arrival: bool,
    pub last_combat: Option<CombatMemory>,
    /// Set while the order waits on a player decision
    pub pending: Option<PendingChoice>,
    /// SUPPORT: the player already approved following a marching ally
    pub follow_confirmed: bool,
    /// Guard against double-stepping when a halted batch is re-run
    pub last_step_turn: Option<Turn>,
}

impl Order {
    pub fn new(kind: OrderKind, target: OrderTarget, started_turn: Turn) -> Self {
        Self {
            kind,
            target,
            path: VecDeque::new(),
            started_turn,
            condition: None,
            attack_on_arrival: false,
            last_combat: None,
            pending: None,
            follow_confirmed: false,
            last_step_turn: None,
        }
    }

    pub fn awaiting_input(&self) -> bool {
        self.pending.is_some()
    }

    /// Loop-guard predicate: did this order fight `opponent` within
    /// `window` turns of `now`?
    pub fn fought_recently(&self, opponent: MarshalId, now: Turn, window: Turn) -> bool {
        match self.last_combat {
            Some(mem) => mem.opponent == opponent && now.saturating_sub(mem.turn) <= window,
            None => false,
        }
    }

    pub fn remember_combat(&mut self, memory: CombatMemory) {
        self.last_combat = Some(memory);
    }

    /// The designated hold ground, for HOLD orders
    pub fn hold_location(&self) -> Option<LocationId> {
        match (self.kind, &self.target) {
            (OrderKind::Hold, OrderTarget::Location(loc)) => Some(*loc),
            _ => None,
        }
    }

    pub fn replace_path(&mut self, route: Vec<LocationId>) {
        self.path = route.into();
    }
}
