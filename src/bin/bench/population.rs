// Randomized Population Generator — seedable, segment-weighted
// Builds advertiser catalogs and slot inventories per run seed so the
// invariant audits sweep a different market every run.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use auction_engine::{Advertiser, Budget, Slot};

pub const FORMATS: [&str; 3] = ["banner", "sidebar", "video"];

/// Advertiser segment mix: retail 55%, brand 30%, performance 15%.
const SEGMENT_CDF: [f64; 3] = [0.55, 0.85, 1.00];

/// Per-segment (bid_lo, bid_hi, ctr_lo, ctr_hi, budget_lo, budget_hi).
const SEGMENT_RANGES: [(f64, f64, f64, f64, f64, f64); 3] = [
    (1.0, 4.0, 0.010, 0.050, 5.0, 25.0),   // retail
    (4.0, 12.0, 0.005, 0.020, 20.0, 100.0), // brand
    (2.0, 8.0, 0.020, 0.080, 10.0, 50.0),  // performance
];

#[derive(Debug, Clone, Copy)]
pub struct PopulationSpec {
    pub advertiser_count: usize,
    pub slot_count: usize,
    /// Share of advertisers running without a pacing cap.
    pub unlimited_budget_share: f64,
    /// Scale on every sampled bid, for thin/hot market variants.
    pub bid_scale: f64,
}

pub struct PopulationGenerator {
    rng: ChaCha8Rng,
}

impl PopulationGenerator {
    pub fn new(rng: ChaCha8Rng) -> Self {
        Self { rng }
    }

    pub fn advertisers(&mut self, spec: &PopulationSpec) -> Vec<Advertiser> {
        (0..spec.advertiser_count)
            .map(|i| {
                let segment = select_segment(&mut self.rng);
                let (bid_lo, bid_hi, ctr_lo, ctr_hi, budget_lo, budget_hi) =
                    SEGMENT_RANGES[segment];

                let primary = self.rng.gen_range(0..FORMATS.len());
                let mut formats = vec![FORMATS[primary].to_string()];
                if self.rng.gen::<f64>() < 0.4 {
                    let secondary = (primary + 1 + self.rng.gen_range(0..FORMATS.len() - 1))
                        % FORMATS.len();
                    formats.push(FORMATS[secondary].to_string());
                }

                let daily_budget = if self.rng.gen::<f64>() < spec.unlimited_budget_share {
                    Budget::Unlimited
                } else {
                    Budget::Capped(self.rng.gen_range(budget_lo..budget_hi))
                };

                Advertiser {
                    id: format!("adv-{i}"),
                    bid_cpm: self.rng.gen_range(bid_lo..bid_hi) * spec.bid_scale,
                    quality: self.rng.gen_range(0.7..1.3),
                    base_click_rate: self.rng.gen_range(ctr_lo..ctr_hi),
                    formats,
                    total_budget: Budget::Unlimited,
                    daily_budget,
                }
            })
            .collect()
    }

    pub fn slots(&mut self, spec: &PopulationSpec) -> Vec<Slot> {
        (0..spec.slot_count)
            .map(|i| Slot {
                id: format!("slot-{i}"),
                format: FORMATS[i % FORMATS.len()].to_string(),
                floor_cpm: self.rng.gen_range(0.5..2.0),
                viewability: self.rng.gen_range(0.5..1.0),
            })
            .collect()
    }
}

/// Segment selection by CDF.
fn select_segment(rng: &mut ChaCha8Rng) -> usize {
    let r: f64 = rng.gen();
    for (i, &cdf) in SEGMENT_CDF.iter().enumerate() {
        if r < cdf {
            return i;
        }
    }
    SEGMENT_CDF.len() - 1
}
