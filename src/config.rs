// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Ad Exchange Simulation Suite ("The Exchange") - Run Configuration

use serde::{Deserialize, Serialize};

use crate::policy::PolicyConfig;
use crate::pricing::PricingConfig;
use crate::regime::RegimeEntry;
use crate::types::{Advertiser, Budget, Slot};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Configuration rejected at initialization. The engine fails fast instead
/// of proceeding with degenerate behavior.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("horizon must be at least one tick")]
    ZeroHorizon,
    #[error("no advertisers configured")]
    NoAdvertisers,
    #[error("no slots configured")]
    NoSlots,
    #[error("advertiser `{id}`: {field} out of range ({value})")]
    AdvertiserField {
        id: String,
        field: &'static str,
        value: f64,
    },
    #[error("slot `{id}`: {field} out of range ({value})")]
    SlotField {
        id: String,
        field: &'static str,
        value: f64,
    },
    #[error("policy: {0}")]
    Policy(&'static str),
    #[error("pricing: {0}")]
    Pricing(&'static str),
    #[error("fatigue: {field} must be non-negative ({value})")]
    FatigueField { field: &'static str, value: f64 },
    #[error("floor_multiplier must be non-negative ({0})")]
    NegativeFloorMultiplier(f64),
    #[error("regime schedule must be sorted by start_tick (entry {index})")]
    UnsortedRegimes { index: usize },
}

// ---------------------------------------------------------------------------
// Fatigue / noise knobs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FatigueConfig {
    /// Exponential decay strength applied to ad pressure.
    #[serde(default)]
    pub fatigue_strength: f64,
    /// Half-width of the uniform noise added to each prediction.
    #[serde(default)]
    pub baseline_noise: f64,
    /// When disabled, slot viewability drops out of prediction and the
    /// impression draw always realizes.
    #[serde(default = "default_true")]
    pub viewability_enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for FatigueConfig {
    fn default() -> Self {
        Self {
            fatigue_strength: 0.0,
            baseline_noise: 0.0,
            viewability_enabled: true,
        }
    }
}

// ---------------------------------------------------------------------------
// SimConfig
// ---------------------------------------------------------------------------

/// Complete description of one simulation run, as handed over by the
/// external configuration loader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Number of ticks in a batch run.
    pub horizon: u64,
    /// Seed of the run's single RNG stream.
    pub seed: u32,
    pub policy: PolicyConfig,
    pub pricing: PricingConfig,
    #[serde(default)]
    pub fatigue: FatigueConfig,
    /// Run-time scale on every slot's floor price.
    #[serde(default = "default_floor_multiplier")]
    pub floor_multiplier: f64,
    #[serde(default)]
    pub regimes: Vec<RegimeEntry>,
    pub advertisers: Vec<Advertiser>,
    pub slots: Vec<Slot>,
}

fn default_floor_multiplier() -> f64 {
    1.0
}

impl SimConfig {
    /// Validate structural invariants before any tick runs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.horizon == 0 {
            return Err(ConfigError::ZeroHorizon);
        }
        if self.advertisers.is_empty() {
            return Err(ConfigError::NoAdvertisers);
        }
        if self.slots.is_empty() {
            return Err(ConfigError::NoSlots);
        }

        for adv in &self.advertisers {
            if !adv.bid_cpm.is_finite() || adv.bid_cpm < 0.0 {
                return Err(ConfigError::AdvertiserField {
                    id: adv.id.clone(),
                    field: "bid_cpm",
                    value: adv.bid_cpm,
                });
            }
            if !adv.quality.is_finite() || adv.quality < 0.0 {
                return Err(ConfigError::AdvertiserField {
                    id: adv.id.clone(),
                    field: "quality",
                    value: adv.quality,
                });
            }
            if !(0.0..=1.0).contains(&adv.base_click_rate) {
                return Err(ConfigError::AdvertiserField {
                    id: adv.id.clone(),
                    field: "base_click_rate",
                    value: adv.base_click_rate,
                });
            }
            for budget in [&adv.total_budget, &adv.daily_budget] {
                if let Budget::Capped(v) = budget {
                    if !v.is_finite() || *v < 0.0 {
                        return Err(ConfigError::AdvertiserField {
                            id: adv.id.clone(),
                            field: "budget",
                            value: *v,
                        });
                    }
                }
            }
        }

        for slot in &self.slots {
            if !slot.floor_cpm.is_finite() || slot.floor_cpm < 0.0 {
                return Err(ConfigError::SlotField {
                    id: slot.id.clone(),
                    field: "floor_cpm",
                    value: slot.floor_cpm,
                });
            }
            if !(0.0..=1.0).contains(&slot.viewability) {
                return Err(ConfigError::SlotField {
                    id: slot.id.clone(),
                    field: "viewability",
                    value: slot.viewability,
                });
            }
        }

        match &self.policy {
            PolicyConfig::Fixed { every_n_ticks, .. } => {
                if *every_n_ticks == 0 {
                    return Err(ConfigError::Policy("every_n_ticks must be >= 1"));
                }
            }
            PolicyConfig::Threshold {
                max_slots,
                threshold_ecpm,
            } => {
                if *max_slots == 0 {
                    return Err(ConfigError::Policy("threshold max_slots must be >= 1"));
                }
                if !threshold_ecpm.is_finite() {
                    return Err(ConfigError::Policy("threshold_ecpm must be finite"));
                }
            }
            PolicyConfig::Utility {
                max_slots,
                annoyance_weight,
            } => {
                if *max_slots == 0 {
                    return Err(ConfigError::Policy("utility max_slots must be >= 1"));
                }
                if !annoyance_weight.is_finite() || *annoyance_weight < 0.0 {
                    return Err(ConfigError::Policy(
                        "annoyance_weight must be non-negative",
                    ));
                }
            }
        }

        if let PricingConfig::SecondPrice { increment_cpm } = &self.pricing {
            if !increment_cpm.is_finite() || *increment_cpm < 0.0 {
                return Err(ConfigError::Pricing("increment_cpm must be non-negative"));
            }
        }

        if !self.fatigue.fatigue_strength.is_finite() || self.fatigue.fatigue_strength < 0.0 {
            return Err(ConfigError::FatigueField {
                field: "fatigue_strength",
                value: self.fatigue.fatigue_strength,
            });
        }
        if !self.fatigue.baseline_noise.is_finite() || self.fatigue.baseline_noise < 0.0 {
            return Err(ConfigError::FatigueField {
                field: "baseline_noise",
                value: self.fatigue.baseline_noise,
            });
        }
        if !self.floor_multiplier.is_finite() || self.floor_multiplier < 0.0 {
            return Err(ConfigError::NegativeFloorMultiplier(self.floor_multiplier));
        }

        for (index, window) in self.regimes.windows(2).enumerate() {
            if window[1].start_tick < window[0].start_tick {
                return Err(ConfigError::UnsortedRegimes { index: index + 1 });
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> SimConfig {
        SimConfig {
            horizon: 10,
            seed: 1,
            policy: PolicyConfig::Fixed {
                slots_per_open: 1,
                every_n_ticks: 1,
            },
            pricing: PricingConfig::SecondPrice { increment_cpm: 0.01 },
            fatigue: FatigueConfig::default(),
            floor_multiplier: 1.0,
            regimes: Vec::new(),
            advertisers: vec![Advertiser {
                id: "a1".to_string(),
                bid_cpm: 10.0,
                quality: 1.0,
                base_click_rate: 0.05,
                formats: vec!["banner".to_string()],
                total_budget: Budget::Unlimited,
                daily_budget: Budget::Capped(1.0),
            }],
            slots: vec![Slot {
                id: "s1".to_string(),
                format: "banner".to_string(),
                floor_cpm: 1.0,
                viewability: 1.0,
            }],
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_zero_horizon_rejected() {
        let mut cfg = base_config();
        cfg.horizon = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroHorizon));
    }

    #[test]
    fn test_empty_lists_rejected() {
        let mut cfg = base_config();
        cfg.advertisers.clear();
        assert_eq!(cfg.validate(), Err(ConfigError::NoAdvertisers));

        let mut cfg = base_config();
        cfg.slots.clear();
        assert_eq!(cfg.validate(), Err(ConfigError::NoSlots));
    }

    #[test]
    fn test_click_rate_out_of_range_rejected() {
        let mut cfg = base_config();
        cfg.advertisers[0].base_click_rate = 1.5;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::AdvertiserField {
                field: "base_click_rate",
                ..
            })
        ));
    }

    #[test]
    fn test_negative_budget_rejected() {
        let mut cfg = base_config();
        cfg.advertisers[0].daily_budget = Budget::Capped(-1.0);
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::AdvertiserField { field: "budget", .. })
        ));
    }

    #[test]
    fn test_viewability_out_of_range_rejected() {
        let mut cfg = base_config();
        cfg.slots[0].viewability = 1.2;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::SlotField {
                field: "viewability",
                ..
            })
        ));
    }

    #[test]
    fn test_zero_cadence_rejected() {
        let mut cfg = base_config();
        cfg.policy = PolicyConfig::Fixed {
            slots_per_open: 1,
            every_n_ticks: 0,
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::Policy(_))));
    }

    #[test]
    fn test_unsorted_regimes_rejected() {
        let mut cfg = base_config();
        cfg.regimes = vec![
            RegimeEntry {
                start_tick: 50,
                bid_multiplier: 1.0,
                click_rate_multiplier: 1.0,
                floor_multiplier_delta: 0.0,
            },
            RegimeEntry {
                start_tick: 10,
                bid_multiplier: 1.0,
                click_rate_multiplier: 1.0,
                floor_multiplier_delta: 0.0,
            },
        ];
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::UnsortedRegimes { index: 1 })
        );
    }

    #[test]
    fn test_config_deserializes_from_json() {
        let json = r#"{
            "horizon": 5,
            "seed": 1,
            "policy": {"mode": "fixed", "slots_per_open": 1, "every_n_ticks": 1},
            "pricing": {"mode": "second_price"},
            "advertisers": [{
                "id": "a1", "bid_cpm": 10, "quality": 1,
                "base_click_rate": 0.05, "formats": ["banner"],
                "daily_budget": 1
            }],
            "slots": [{
                "id": "s1", "format": "banner", "floor_cpm": 1, "viewability": 1
            }]
        }"#;
        let cfg: SimConfig = serde_json::from_str(json).unwrap();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.advertisers[0].daily_budget, Budget::Capped(1.0));
        assert_eq!(cfg.advertisers[0].total_budget, Budget::Unlimited);
        assert!(cfg.fatigue.viewability_enabled);
        assert_eq!(cfg.floor_multiplier, 1.0);
    }
}
