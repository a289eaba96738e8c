// Scenario Definitions — market shapes exercised by the Monte Carlo runner
// All scenario logic lives in configuration; zero engine changes.

use auction_engine::{FatigueConfig, PolicyConfig, PricingConfig, RegimeEntry};

use crate::population::PopulationSpec;

// ─── Scenario Configuration ─────────────────────────────────────────────────

pub struct Scenario {
    pub name: &'static str,
    pub label: &'static str,
    pub category: &'static str,
    pub horizon: u64,
    pub population: PopulationSpec,
    pub policy: PolicyConfig,
    pub pricing: PricingConfig,
    pub fatigue: FatigueConfig,
    pub floor_multiplier: f64,
    pub regimes: Vec<RegimeEntry>,
    pub criteria: PassCriteria,
}

/// Per-scenario bounds. The structural invariants (determinism, tick
/// completeness, budget monotonicity, floor compliance) are audited
/// unconditionally on every run.
#[derive(Default)]
pub struct PassCriteria {
    pub min_fill_rate: Option<f64>,
    pub max_fill_rate: Option<f64>,
    pub min_revenue: Option<f64>,
}

fn population(advertisers: usize, slots: usize) -> PopulationSpec {
    PopulationSpec {
        advertiser_count: advertisers,
        slot_count: slots,
        unlimited_budget_share: 0.3,
        bid_scale: 1.0,
    }
}

fn fixed(slots_per_open: u32, every_n_ticks: u64) -> PolicyConfig {
    PolicyConfig::Fixed {
        slots_per_open,
        every_n_ticks,
    }
}

fn second_price() -> PricingConfig {
    PricingConfig::SecondPrice { increment_cpm: 0.01 }
}

fn mild_fatigue() -> FatigueConfig {
    FatigueConfig {
        fatigue_strength: 0.5,
        baseline_noise: 0.002,
        viewability_enabled: true,
    }
}

// ─── Scenario Definitions ───────────────────────────────────────────────────

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "NORMAL_MARKET",
            label: "Normal Market",
            category: "market",
            horizon: 600,
            population: population(12, 4),
            policy: fixed(1, 1),
            pricing: second_price(),
            fatigue: mild_fatigue(),
            floor_multiplier: 1.0,
            regimes: Vec::new(),
            criteria: PassCriteria {
                min_fill_rate: Some(0.5),
                ..Default::default()
            },
        },
        Scenario {
            name: "CROWDED_EXCHANGE",
            label: "Crowded Exchange",
            category: "market",
            horizon: 400,
            population: population(60, 6),
            policy: fixed(3, 1),
            pricing: second_price(),
            fatigue: mild_fatigue(),
            floor_multiplier: 1.0,
            regimes: Vec::new(),
            criteria: PassCriteria {
                min_fill_rate: Some(0.6),
                min_revenue: Some(0.0),
                ..Default::default()
            },
        },
        Scenario {
            name: "BUDGET_DROUGHT",
            label: "Budget Drought",
            category: "stress",
            horizon: 800,
            population: PopulationSpec {
                advertiser_count: 10,
                slot_count: 3,
                unlimited_budget_share: 0.0,
                bid_scale: 3.0,
            },
            policy: fixed(2, 1),
            pricing: PricingConfig::FirstPrice,
            fatigue: mild_fatigue(),
            floor_multiplier: 1.0,
            regimes: Vec::new(),
            criteria: PassCriteria::default(),
        },
        Scenario {
            name: "FLOOR_SQUEEZE",
            label: "Floor Squeeze",
            category: "stress",
            horizon: 400,
            population: population(15, 4),
            policy: fixed(1, 1),
            pricing: second_price(),
            fatigue: mild_fatigue(),
            floor_multiplier: 8.0,
            regimes: Vec::new(),
            criteria: PassCriteria {
                max_fill_rate: Some(0.5),
                ..Default::default()
            },
        },
        Scenario {
            name: "FATIGUE_BURN",
            label: "Fatigue Burn-In",
            category: "stress",
            horizon: 600,
            population: population(12, 4),
            policy: fixed(2, 1),
            pricing: second_price(),
            fatigue: FatigueConfig {
                fatigue_strength: 4.0,
                baseline_noise: 0.002,
                viewability_enabled: true,
            },
            floor_multiplier: 1.0,
            regimes: Vec::new(),
            criteria: PassCriteria::default(),
        },
        Scenario {
            name: "REGIME_SHOCK",
            label: "Regime Shock",
            category: "market",
            horizon: 600,
            population: population(20, 4),
            policy: fixed(1, 1),
            pricing: second_price(),
            fatigue: mild_fatigue(),
            floor_multiplier: 1.0,
            regimes: vec![
                RegimeEntry {
                    start_tick: 200,
                    bid_multiplier: 0.4,
                    click_rate_multiplier: 0.7,
                    floor_multiplier_delta: 0.5,
                },
                RegimeEntry {
                    start_tick: 400,
                    bid_multiplier: 1.2,
                    click_rate_multiplier: 1.1,
                    floor_multiplier_delta: 0.0,
                },
            ],
            criteria: PassCriteria::default(),
        },
        Scenario {
            name: "THRESHOLD_GATING",
            label: "Threshold Gating",
            category: "policy",
            horizon: 600,
            population: population(20, 4),
            policy: PolicyConfig::Threshold {
                max_slots: 2,
                threshold_ecpm: 3.0,
            },
            pricing: second_price(),
            fatigue: mild_fatigue(),
            floor_multiplier: 1.0,
            regimes: Vec::new(),
            criteria: PassCriteria::default(),
        },
        Scenario {
            name: "UTILITY_TRADEOFF",
            label: "Utility Trade-Off",
            category: "policy",
            horizon: 600,
            population: population(20, 4),
            policy: PolicyConfig::Utility {
                max_slots: 4,
                annoyance_weight: 0.01,
            },
            pricing: second_price(),
            fatigue: mild_fatigue(),
            floor_multiplier: 1.0,
            regimes: Vec::new(),
            criteria: PassCriteria::default(),
        },
        Scenario {
            name: "FIRST_PRICE_BASELINE",
            label: "First Price Baseline",
            category: "pricing",
            horizon: 400,
            population: population(12, 4),
            policy: fixed(1, 1),
            pricing: PricingConfig::FirstPrice,
            fatigue: mild_fatigue(),
            floor_multiplier: 1.0,
            regimes: Vec::new(),
            criteria: PassCriteria {
                min_fill_rate: Some(0.5),
                ..Default::default()
            },
        },
        Scenario {
            name: "LONG_HORIZON",
            label: "Long Horizon (5K ticks)",
            category: "stress",
            horizon: 5000,
            population: population(30, 6),
            policy: fixed(1, 2),
            pricing: second_price(),
            fatigue: mild_fatigue(),
            floor_multiplier: 1.0,
            regimes: Vec::new(),
            criteria: PassCriteria::default(),
        },
    ]
}
