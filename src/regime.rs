// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Ad Exchange Simulation Suite ("The Exchange") - Regime Schedule

use serde::{Deserialize, Serialize};

/// Exogenous market shock, active from `start_tick` until superseded.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RegimeEntry {
    pub start_tick: u64,
    #[serde(default = "default_multiplier")]
    pub bid_multiplier: f64,
    #[serde(default = "default_multiplier")]
    pub click_rate_multiplier: f64,
    #[serde(default)]
    pub floor_multiplier_delta: f64,
}

fn default_multiplier() -> f64 {
    1.0
}

/// Multipliers applied while resolving one tick. Derived values only:
/// regimes never write into advertiser or slot state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Regime {
    pub bid_multiplier: f64,
    pub click_rate_multiplier: f64,
    pub floor_multiplier_delta: f64,
}

pub const NEUTRAL: Regime = Regime {
    bid_multiplier: 1.0,
    click_rate_multiplier: 1.0,
    floor_multiplier_delta: 0.0,
};

/// Resolve the active regime: the last entry whose `start_tick <= tick`.
/// Neutral before the first entry or when the schedule is empty. The
/// schedule is validated as sorted at configuration time.
pub fn active(schedule: &[RegimeEntry], tick: u64) -> Regime {
    schedule
        .iter()
        .rev()
        .find(|entry| entry.start_tick <= tick)
        .map(|entry| Regime {
            bid_multiplier: entry.bid_multiplier,
            click_rate_multiplier: entry.click_rate_multiplier,
            floor_multiplier_delta: entry.floor_multiplier_delta,
        })
        .unwrap_or(NEUTRAL)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(start_tick: u64, bid: f64) -> RegimeEntry {
        RegimeEntry {
            start_tick,
            bid_multiplier: bid,
            click_rate_multiplier: 1.0,
            floor_multiplier_delta: 0.0,
        }
    }

    #[test]
    fn test_empty_schedule_is_neutral() {
        assert_eq!(active(&[], 0), NEUTRAL);
        assert_eq!(active(&[], 500), NEUTRAL);
    }

    #[test]
    fn test_neutral_before_first_entry() {
        let schedule = [entry(10, 2.0)];
        assert_eq!(active(&schedule, 9), NEUTRAL);
        assert_eq!(active(&schedule, 10).bid_multiplier, 2.0);
    }

    #[test]
    fn test_last_matching_entry_wins() {
        let schedule = [entry(0, 1.5), entry(100, 0.5), entry(200, 3.0)];
        assert_eq!(active(&schedule, 50).bid_multiplier, 1.5);
        assert_eq!(active(&schedule, 100).bid_multiplier, 0.5);
        assert_eq!(active(&schedule, 199).bid_multiplier, 0.5);
        assert_eq!(active(&schedule, 10_000).bid_multiplier, 3.0);
    }

    #[test]
    fn test_serde_defaults_are_neutral() {
        let entry: RegimeEntry = serde_json::from_str(r#"{"start_tick": 5}"#).unwrap();
        assert_eq!(entry.bid_multiplier, 1.0);
        assert_eq!(entry.click_rate_multiplier, 1.0);
        assert_eq!(entry.floor_multiplier_delta, 0.0);
    }
}
