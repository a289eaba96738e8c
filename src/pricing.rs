// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Ad Exchange Simulation Suite ("The Exchange") - Clearing Price

use serde::{Deserialize, Serialize};

/// Price rule applied to an auction outcome. A closed variant set; an
/// unrecognized `mode` tag fails at deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PricingConfig {
    /// Winner pays its own effective bid.
    FirstPrice,
    /// Winner pays the runner-up's score unwound through its own predicted
    /// click-rate and quality, plus a small increment.
    SecondPrice {
        #[serde(default = "default_increment_cpm")]
        increment_cpm: f64,
    },
}

fn default_increment_cpm() -> f64 {
    0.01
}

impl PricingConfig {
    /// CPM charged to the winner.
    ///
    /// Always within `[effective_floor_cpm, winner_bid_cpm]`; an uncontested
    /// second-price winner pays the reserve.
    pub fn clearing_price(
        &self,
        winner_bid_cpm: f64,
        winner_click_rate: f64,
        winner_quality: f64,
        second_best_score: f64,
        effective_floor_cpm: f64,
    ) -> f64 {
        match self {
            PricingConfig::FirstPrice => winner_bid_cpm,
            PricingConfig::SecondPrice { increment_cpm } => {
                if second_best_score > 0.0 {
                    // second_best_score > 0 implies the winner's own score is
                    // positive, so the denominator is non-zero.
                    let unwound =
                        second_best_score / (winner_click_rate * winner_quality) + increment_cpm;
                    unwound.clamp(effective_floor_cpm, winner_bid_cpm)
                } else {
                    effective_floor_cpm
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
