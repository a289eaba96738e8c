// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Ad Exchange Simulation Suite ("The Exchange") - Fatigue Model

/// Ad pressure: cumulative impressions per elapsed tick.
///
/// A running average over the whole run, not a decaying window. That keeps
/// the model auditable from the event log alone.
pub fn pressure(impressions_so_far: u64, tick: u64) -> f64 {
    impressions_so_far as f64 / tick.max(1) as f64
}

/// Multiplicative click-rate decay from pressure.
///
/// `exp(-strength * pressure)`: strictly decreasing in pressure, bounded in
/// (0, 1]. Strength 0 disables fatigue entirely.
pub fn fatigue_multiplier(pressure: f64, strength: f64) -> f64 {
    (-strength * pressure).exp()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pressure_guards_tick_zero() {
        assert_eq!(pressure(5, 0), 5.0);
        assert_eq!(pressure(5, 1), 5.0);
        assert_eq!(pressure(5, 10), 0.5);
    }

    #[test]
    fn test_pressure_zero_impressions() {
        assert_eq!(pressure(0, 100), 0.0);
    }

    #[test]
    fn test_multiplier_bounded_in_unit_interval() {
        for &p in &[0.0, 0.1, 1.0, 10.0, 1000.0] {
            for &s in &[0.0, 0.5, 2.0, 50.0] {
                let m = fatigue_multiplier(p, s);
                assert!(m > 0.0 && m <= 1.0, "multiplier out of (0,1]: {}", m);
            }
        }
    }

    #[test]
    fn test_multiplier_strictly_decreasing_in_pressure() {
        let lo = fatigue_multiplier(0.5, 1.0);
        let hi = fatigue_multiplier(1.5, 1.0);
        assert!(hi < lo);
    }

    #[test]
    fn test_zero_strength_is_identity() {
        assert_eq!(fatigue_multiplier(42.0, 0.0), 1.0);
    }
}
