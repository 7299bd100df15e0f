//! Validated order requests from the command layer
//!
//! The natural-language front end and the trust negotiation both run
//! before a request reaches the engine; what arrives here is already
//! legal and economy-checked except for the action-point debit.

use serde::{Deserialize, Serialize};

use crate::core::types::{LocationId, MarshalId};
use crate::orders::{CompletionCondition, OrderKind, OrderTarget};

/// A validated request to install a standing order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    pub kind: OrderKind,
    pub target: OrderTarget,
    pub condition: Option<CompletionCondition>,
    pub attack_on_arrival: bool,
}

impl OrderRequest {
    pub fn move_to(destination: LocationId) -> Self {
        Self {
            kind: OrderKind::MoveTo,
            target: OrderTarget::Location(destination),
            condition: None,
            attack_on_arrival: false,
        }
    }

    pub fn pursue(quarry: MarshalId) -> Self {
        Self {
            kind: OrderKind::Pursue,
            target: OrderTarget::Enemy(quarry),
            condition: None,
            attack_on_arrival: false,
        }
    }

    pub fn hold(ground: LocationId) -> Self {
        Self {
            kind: OrderKind::Hold,
            target: OrderTarget::Location(ground),
            condition: None,
            attack_on_arrival: false,
        }
    }

    pub fn support(ally: MarshalId) -> Self {
        Self {
            kind: OrderKind::Support,
            target: OrderTarget::Friendly(ally),
            condition: None,
            attack_on_arrival: false,
        }
    }

    pub fn with_condition(mut self, condition: CompletionCondition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn with_attack_on_arrival(mut self) -> Self {
        self.attack_on_arrival = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builders() {
        let req = OrderRequest::move_to(LocationId(4))
            .with_condition(CompletionCondition::MaxTurns(10))
            .with_attack_on_arrival();
        assert_eq!(req.kind, OrderKind::MoveTo);
        assert!(req.attack_on_arrival);
        assert_eq!(req.condition, Some(CompletionCondition::MaxTurns(10)));

        let req = OrderRequest::support(MarshalId(2));
        assert_eq!(req.target, OrderTarget::Friendly(MarshalId(2)));
        assert!(!req.attack_on_arrival);
    }
}
