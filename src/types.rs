// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Ad Exchange Simulation Suite ("The Exchange") - Type Definitions

use serde::{Deserialize, Serialize};

// ─── Budget ──────────────────────────────────────────────────────────────────

/// Spend ceiling. "No ceiling" is a named state, never an absent field.
///
/// Deserializes from a plain JSON number (`"daily_budget": 12.5`) or from
/// `null`/absence for `Unlimited`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Budget {
    Capped(f64),
    Unlimited,
}

impl Default for Budget {
    fn default() -> Self {
        Budget::Unlimited
    }
}

impl Budget {
    pub fn has_remaining(&self) -> bool {
        match self {
            Budget::Unlimited => true,
            Budget::Capped(v) => *v > 0.0,
        }
    }

    pub fn can_afford(&self, cost: f64) -> bool {
        match self {
            Budget::Unlimited => true,
            Budget::Capped(v) => *v >= cost,
        }
    }

    /// Subtract `cost`, flooring at zero. Remaining budget is never negative.
    pub fn debit(&mut self, cost: f64) {
        if let Budget::Capped(v) = self {
            *v = (*v - cost).max(0.0);
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Budget::Unlimited => None,
            Budget::Capped(v) => Some(*v),
        }
    }
}

// ─── Advertiser ──────────────────────────────────────────────────────────────

/// Static advertiser record, loaded from configuration at run start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Advertiser {
    pub id: String,
    /// Willingness to pay per 1000 impressions.
    pub bid_cpm: f64,
    /// Static quality multiplier, >= 0.
    pub quality: f64,
    /// Organic click-through rate in [0, 1].
    pub base_click_rate: f64,
    /// Slot formats this advertiser has creative for.
    pub formats: Vec<String>,
    /// Lifetime spend ceiling across the run.
    #[serde(default)]
    pub total_budget: Budget,
    /// Pacing ceiling, restored on reset.
    #[serde(default)]
    pub daily_budget: Budget,
}

impl Advertiser {
    pub fn supports_format(&self, format: &str) -> bool {
        self.formats.iter().any(|f| f == format)
    }
}

// ─── PacingState ─────────────────────────────────────────────────────────────

/// Mutable per-advertiser spend state, parallel to the advertiser list.
#[derive(Debug, Clone, Serialize)]
pub struct PacingState {
    pub remaining: Budget,
    pub spent: f64,
}

impl PacingState {
    pub fn new(advertiser: &Advertiser) -> Self {
        Self {
            remaining: advertiser.daily_budget,
            spent: 0.0,
        }
    }

    /// Zero spend and restore the pacing ceiling.
    pub fn reset(&mut self, advertiser: &Advertiser) {
        self.remaining = advertiser.daily_budget;
        self.spent = 0.0;
    }

    /// Eligible to enter an auction: pacing budget left and lifetime ceiling
    /// not yet reached.
    pub fn is_eligible(&self, advertiser: &Advertiser) -> bool {
        if !self.remaining.has_remaining() {
            return false;
        }
        match advertiser.total_budget {
            Budget::Unlimited => true,
            Budget::Capped(total) => self.spent < total,
        }
    }

    /// Can the advertiser actually pay `cost` right now?
    pub fn can_afford(&self, advertiser: &Advertiser, cost: f64) -> bool {
        if !self.remaining.can_afford(cost) {
            return false;
        }
        match advertiser.total_budget {
            Budget::Unlimited => true,
            Budget::Capped(total) => self.spent + cost <= total,
        }
    }

    pub fn charge(&mut self, cost: f64) {
        self.remaining.debit(cost);
        self.spent += cost;
    }
}

// ─── Slot ────────────────────────────────────────────────────────────────────

/// An inventory placement that can be opened for auction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    pub id: String,
    /// Categorical tag matched against advertiser formats.
    pub format: String,
    /// Minimum acceptable bid before the run-time floor multiplier.
    pub floor_cpm: f64,
    /// Probability in [0, 1] that a served impression is actually seen.
    pub viewability: f64,
}

// ─── FillReason ──────────────────────────────────────────────────────────────

/// Per-slot outcome taxonomy. These are normal results, never errors.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FillReason {
    /// A winner was declared and the slot was served.
    Filled,
    /// The policy opened zero slots this tick.
    NoSlot,
    /// No advertiser passed the format + budget filter.
    NoEligible,
    /// The best candidate's bid sat under the effective floor.
    BelowFloor,
    /// The winner could not cover the clearing cost; attempt recorded,
    /// nothing spent.
    BudgetExhausted,
}

// ─── ScoredBid ───────────────────────────────────────────────────────────────

/// One row of the auction score breakdown, kept for diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredBid {
    pub advertiser_index: usize,
    pub advertiser_id: String,
    /// Bid after the regime multiplier; derived, never written back.
    pub effective_bid_cpm: f64,
    pub predicted_click_rate: f64,
    pub quality: f64,
    pub score: f64,
    /// Same formula as `score`, carried under the name downstream pricing
    /// and reporting consume.
    pub effective_value: f64,
}

// ─── SlotResult ──────────────────────────────────────────────────────────────

/// Outcome of one opened slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotResult {
    pub slot_id: String,
    pub winner: Option<String>,
    pub price_cpm: f64,
    pub predicted_click_rate: f64,
    pub impression: bool,
    pub click: bool,
    pub reason: FillReason,
    pub eligible_count: usize,
    /// Full score breakdown, sorted descending.
    pub scores: Vec<ScoredBid>,
}

// ─── EventResult ─────────────────────────────────────────────────────────────

/// Per-tick aggregate. Exactly one of these is produced per tick, including
/// no-op ticks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventResult {
    pub tick: u64,
    pub slots_opened: u32,
    pub slots_filled: u32,
    pub results: Vec<SlotResult>,
    /// Revenue committed this tick (sum of realized charges).
    pub revenue: f64,
    pub impressions: u32,
    pub clicks: u32,
    /// `Some(NoSlot)` on a no-op tick, `None` otherwise.
    #[serde(default)]
    pub reason: Option<FillReason>,
    /// Top-ranked candidates of the first opened slot, for explainability.
    #[serde(default)]
    pub top_candidates: Vec<ScoredBid>,
}

// ─── Totals ──────────────────────────────────────────────────────────────────

/// Cumulative run-wide counters exposed to dashboards.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Totals {
    pub tick: u64,
    pub revenue: f64,
    pub impressions: u64,
    pub clicks: u64,
    pub slots_filled: u64,
    pub slots_opened: u64,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn advertiser(daily: Budget, total: Budget) -> Advertiser {
        Advertiser {
            id: "a".to_string(),
            bid_cpm: 5.0,
            quality: 1.0,
            base_click_rate: 0.02,
            formats: vec!["banner".to_string()],
            total_budget: total,
            daily_budget: daily,
        }
    }

    #[test]
    fn test_budget_debit_floors_at_zero() {
        let mut b = Budget::Capped(0.5);
        b.debit(0.8);
        assert_eq!(b, Budget::Capped(0.0));
        assert!(!b.has_remaining());
    }

    #[test]
    fn test_unlimited_budget_always_affords() {
        let b = Budget::Unlimited;
        assert!(b.has_remaining());
        assert!(b.can_afford(1e12));
        assert_eq!(b.value(), None);
    }

    #[test]
    fn test_budget_deserializes_from_number_and_null() {
        let capped: Budget = serde_json::from_str("2.5").unwrap();
        assert_eq!(capped, Budget::Capped(2.5));
        let unlimited: Budget = serde_json::from_str("null").unwrap();
        assert_eq!(unlimited, Budget::Unlimited);
    }

    #[test]
    fn test_pacing_reset_restores_daily() {
        let adv = advertiser(Budget::Capped(1.0), Budget::Unlimited);
        let mut pacing = PacingState::new(&adv);
        pacing.charge(0.7);
        assert!((pacing.spent - 0.7).abs() < f64::EPSILON);
        pacing.reset(&adv);
        assert_eq!(pacing.remaining, Budget::Capped(1.0));
        assert_eq!(pacing.spent, 0.0);
    }

    #[test]
    fn test_exhausted_pacing_is_ineligible() {
        let adv = advertiser(Budget::Capped(0.001), Budget::Unlimited);
        let mut pacing = PacingState::new(&adv);
        assert!(pacing.is_eligible(&adv));
        pacing.charge(0.001);
        assert!(!pacing.is_eligible(&adv));
    }

    #[test]
    fn test_total_budget_ceiling_blocks_eligibility() {
        let adv = advertiser(Budget::Unlimited, Budget::Capped(0.002));
        let mut pacing = PacingState::new(&adv);
        assert!(pacing.is_eligible(&adv));
        assert!(!pacing.can_afford(&adv, 0.003));
        pacing.charge(0.002);
        assert!(!pacing.is_eligible(&adv));
    }

    #[test]
    fn test_supports_format() {
        let adv = advertiser(Budget::Unlimited, Budget::Unlimited);
        assert!(adv.supports_format("banner"));
        assert!(!adv.supports_format("video"));
    }
}
