// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Ad Exchange Simulation Suite ("The Exchange") - Placement Policy

use serde::{Deserialize, Serialize};

use crate::fatigue;

/// Inputs a policy may consult. Built by the runner so that the policies
/// themselves stay pure.
#[derive(Debug, Clone, Copy)]
pub struct PolicyInputs {
    pub tick: u64,
    pub impressions_so_far: u64,
    /// Trailing revenue-per-impression x1000 over the rolling window.
    /// `None` until the first impression lands in the window.
    pub trailing_ecpm: Option<f64>,
    /// Highest raw bid among advertisers eligible for the next slot's
    /// format. Cold-start stand-in for the eCPM estimate.
    pub highest_eligible_bid_cpm: f64,
}

/// Slot-opening mechanism, selected by configuration.
///
/// A closed set of variants dispatched through one `decide` contract; an
/// unrecognized `mode` tag fails at deserialization instead of defaulting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PolicyConfig {
    /// Open `slots_per_open` slots every `every_n_ticks` ticks, else 0.
    Fixed {
        slots_per_open: u32,
        every_n_ticks: u64,
    },
    /// Open `max_slots` iff the expected eCPM clears `threshold_ecpm`.
    Threshold {
        max_slots: u32,
        threshold_ecpm: f64,
    },
    /// Brute-force the slot count maximizing expected revenue minus
    /// pressure-driven annoyance.
    Utility {
        max_slots: u32,
        annoyance_weight: f64,
    },
}

impl PolicyConfig {
    /// How many slots to open this tick.
    pub fn decide(&self, inputs: &PolicyInputs) -> u32 {
        match self {
            PolicyConfig::Fixed {
                slots_per_open,
                every_n_ticks,
            } => {
                if inputs.tick % every_n_ticks == 0 {
                    *slots_per_open
                } else {
                    0
                }
            }
            PolicyConfig::Threshold {
                max_slots,
                threshold_ecpm,
            } => {
                let estimate = inputs
                    .trailing_ecpm
                    .unwrap_or(inputs.highest_eligible_bid_cpm);
                if estimate >= *threshold_ecpm {
                    *max_slots
                } else {
                    0
                }
            }
            PolicyConfig::Utility {
                max_slots,
                annoyance_weight,
            } => {
                let value_per_slot = inputs
                    .trailing_ecpm
                    .unwrap_or(inputs.highest_eligible_bid_cpm)
                    / 1000.0;
                let mut best_count = 0u32;
                let mut best_utility = f64::NEG_INFINITY;
                // Ascending scan with strict `>`: the lowest slot count
                // wins exact ties.
                for count in 0..=*max_slots {
                    let projected = fatigue::pressure(
                        inputs.impressions_so_far + u64::from(count),
                        inputs.tick,
                    );
                    let utility =
                        f64::from(count) * value_per_slot - annoyance_weight * projected;
                    if utility > best_utility {
                        best_utility = utility;
                        best_count = count;
                    }
                }
                best_count
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(tick: u64, trailing_ecpm: Option<f64>, highest_bid: f64) -> PolicyInputs {
        PolicyInputs {
            tick,
            impressions_so_far: 0,
            trailing_ecpm,
            highest_eligible_bid_cpm: highest_bid,
        }
    }

    #[test]
    fn test_fixed_cadence() {
        let policy = PolicyConfig::Fixed {
            slots_per_open: 2,
            every_n_ticks: 3,
        };
        let opened: Vec<u32> = (0..7)
            .map(|t| policy.decide(&inputs(t, None, 0.0)))
            .collect();
        assert_eq!(opened, vec![2, 0, 0, 2, 0, 0, 2]);
    }

    #[test]
    fn test_fixed_every_tick() {
        let policy = PolicyConfig::Fixed {
            slots_per_open: 1,
            every_n_ticks: 1,
        };
        assert!((0..50).all(|t| policy.decide(&inputs(t, None, 0.0)) == 1));
    }

    #[test]
    fn test_threshold_uses_trailing_ecpm() {
        let policy = PolicyConfig::Threshold {
            max_slots: 3,
            threshold_ecpm: 5.0,
        };
        assert_eq!(policy.decide(&inputs(10, Some(6.0), 0.0)), 3);
        assert_eq!(policy.decide(&inputs(10, Some(4.9), 100.0)), 0);
    }

    #[test]
    fn test_threshold_cold_start_falls_back_to_highest_bid() {
        let policy = PolicyConfig::Threshold {
            max_slots: 2,
            threshold_ecpm: 5.0,
        };
        assert_eq!(policy.decide(&inputs(0, None, 8.0)), 2);
        assert_eq!(policy.decide(&inputs(0, None, 3.0)), 0);
    }

    #[test]
    fn test_utility_opens_when_value_dominates() {
        let policy = PolicyConfig::Utility {
            max_slots: 4,
            annoyance_weight: 0.001,
        };
        // value_per_slot = 0.02 per slot vs tiny annoyance: open the max.
        let result = policy.decide(&inputs(100, Some(20.0), 0.0));
        assert_eq!(result, 4);
    }

    #[test]
    fn test_utility_closes_when_annoyance_dominates() {
        let policy = PolicyConfig::Utility {
            max_slots: 4,
            annoyance_weight: 10.0,
        };
        let result = policy.decide(&inputs(10, Some(1.0), 0.0));
        assert_eq!(result, 0);
    }

    #[test]
    fn test_utility_tie_prefers_lowest_count() {
        // Utility is linear in the count: value_per_slot == weight / tick
        // makes every count score identically, so the first one scanned
        // must win.
        let policy = PolicyConfig::Utility {
            max_slots: 5,
            annoyance_weight: 1.0,
        };
        let result = policy.decide(&inputs(10, Some(100.0), 0.0));
        assert_eq!(result, 0);
    }

    #[test]
    fn test_unknown_mode_fails_deserialization() {
        let err = serde_json::from_str::<PolicyConfig>(
            r#"{"mode": "adaptive", "max_slots": 1}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_mode_tags_roundtrip() {
        let policy: PolicyConfig = serde_json::from_str(
            r#"{"mode": "fixed", "slots_per_open": 1, "every_n_ticks": 2}"#,
        )
        .unwrap();
        assert!(matches!(policy, PolicyConfig::Fixed { .. }));
    }
}
