//! Command-trust interface
//!
//! The negotiation layer that may argue with or refuse orders lives
//! outside this crate; the engine only reports additive adjustments:
//! positive on a completed order, negative on a mid-execution recall.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::MarshalId;

/// Sink for trust adjustments emitted by the engine
pub trait TrustLedger {
    fn adjust(&mut self, marshal: MarshalId, delta: f32);
}

/// Reference ledger: a running score per marshal
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandLedger {
    scores: AHashMap<MarshalId, f32>,
}

impl CommandLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self, marshal: MarshalId) -> f32 {
        self.scores.get(&marshal).copied().unwrap_or(0.0)
    }
}

impl TrustLedger for CommandLedger {
    fn adjust(&mut self, marshal: MarshalId, delta: f32) {
        *self.scores.entry(marshal).or_insert(0.0) += delta;
    }
}

/// Ledger that discards adjustments, for callers that do not track trust
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLedger;

impl TrustLedger for NullLedger {
    fn adjust(&mut self, _marshal: MarshalId, _delta: f32) {}
}
