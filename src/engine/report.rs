//! Per-marshal order reports
//!
//! One report per marshal per turn, success or failure - silent
//! outcomes are forbidden by design.

use serde::{Deserialize, Serialize};

use crate::combat::CombatOutcome;
use crate::core::types::{LocationId, MarshalId};
use crate::orders::{ChoiceOption, OrderKind};

/// What became of the order this turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Continues,
    Completed,
    Failed,
    AwaitingInput,
}

/// Structured detail alongside the human-readable message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReportDetail {
    None,
    /// Locations actually entered this turn, in order
    Marched { entered: Vec<LocationId> },
    Fought {
        opponent: MarshalId,
        outcome: CombatOutcome,
    },
    /// Options offered to the player
    Choice { options: Vec<ChoiceOption> },
}

/// The outcome of one marshal's step, fit for display and for scripting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderReport {
    pub marshal: MarshalId,
    pub name: String,
    pub kind: OrderKind,
    pub status: OrderStatus,
    pub message: String,
    pub detail: ReportDetail,
}

impl OrderReport {
    pub fn new(
        marshal: MarshalId,
        name: &str,
        kind: OrderKind,
        status: OrderStatus,
        message: String,
        detail: ReportDetail,
    ) -> Self {
        Self {
            marshal,
            name: name.to_string(),
            kind,
            status,
            message,
            detail,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.status, OrderStatus::Completed | OrderStatus::Failed)
    }
}
