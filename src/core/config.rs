//! Engine tuning constants with documented rationale
//!
//! Values that are not personality-specific live here. Per-personality
//! thresholds are in `campaign::profiles`.

/// Configuration for the order-execution engine
///
/// These values have been tuned for campaign pacing. Changing them shifts
/// how often play pauses for player decisions.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    // === ORDER ECONOMY ===
    /// Action points charged for an explicit cancellation of a standing order
    ///
    /// Cancelling is a courier ride, not a free thought. Direct tactical
    /// commands override standing orders at no cost instead.
    pub cancel_cost: u32,

    /// Trust adjustment applied when a standing order is cancelled
    /// mid-execution
    ///
    /// A marshal who was already marching resents the recall. Cancelling on
    /// the turn the order was issued carries no penalty.
    pub cancel_trust_penalty: f32,

    // === INTERRUPTS ===
    /// Distance (in road hops) at which a battle counts as "nearby"
    ///
    /// At 1, only battles in adjacent locations interrupt cautious marshals.
    /// Larger values make the map feel noisier.
    pub nearby_battle_range: u32,

    /// Turn window of the combat-loop guard
    ///
    /// A foe fought within this many turns is never re-engaged
    /// automatically; the player is asked instead.
    pub rematch_window: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cancel_cost: 1,
            cancel_trust_penalty: -0.5,
            nearby_battle_range: 1,
            rematch_window: 1,
        }
    }
}
