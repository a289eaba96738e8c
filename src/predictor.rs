// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Ad Exchange Simulation Suite ("The Exchange") - Click-Rate Predictor

use crate::types::{Advertiser, Slot};

/// Predicted click-through rate for an (advertiser, slot) pair.
///
/// `clamp(base * user_multiplier * viewability * fatigue + noise, 0, 1)`,
/// where viewability participates only when enabled. `noise` is supplied by
/// the caller, drawn once per (advertiser, slot, tick) evaluation from the
/// run's RNG stream. No side effects.
pub fn predict_click_rate(
    advertiser: &Advertiser,
    slot: &Slot,
    user_multiplier: f64,
    fatigue_multiplier: f64,
    noise: f64,
    viewability_enabled: bool,
) -> f64 {
    let viewability = if viewability_enabled { slot.viewability } else { 1.0 };
    let raw = advertiser.base_click_rate * user_multiplier * viewability * fatigue_multiplier
        + noise;
    raw.clamp(0.0, 1.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
