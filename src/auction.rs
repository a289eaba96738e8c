// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Ad Exchange Simulation Suite ("The Exchange") - Auction Mechanism

use std::cmp::Ordering;

use crate::types::{Advertiser, FillReason, PacingState, ScoredBid, Slot};

/// Result of one slot auction.
#[derive(Debug, Clone)]
pub struct AuctionOutcome {
    /// Index into the advertiser list, `None` when the slot stays empty.
    pub winner: Option<usize>,
    /// Score of the runner-up, 0.0 when the winner was uncontested.
    /// Second-price-style pricing needs this.
    pub second_best_score: f64,
    /// All candidate rows, sorted descending by score.
    pub scores: Vec<ScoredBid>,
    pub eligible_count: usize,
    pub reason: FillReason,
}

/// Run a single-slot auction.
///
/// Eligibility is format match plus remaining budget. Effective bids are
/// derived from `bid_multiplier` here; advertiser records are never written.
/// `predict` is invoked once per eligible advertiser, in list order — call
/// order matters because the predictor draws noise from the run's RNG.
///
/// The floor check compares the winning candidate's effective bid (unscored)
/// against `effective_floor_cpm`: the floor is a pure reserve price,
/// independent of predicted performance. Ties on exactly equal scores keep
/// list order (stable sort), so the same input ordering always yields the
/// same winner.
pub fn run_auction<F>(
    advertisers: &[Advertiser],
    pacing: &[PacingState],
    slot: &Slot,
    bid_multiplier: f64,
    effective_floor_cpm: f64,
    mut predict: F,
) -> AuctionOutcome
where
    F: FnMut(usize) -> f64,
{
    let mut scores: Vec<ScoredBid> = Vec::new();
    for (index, advertiser) in advertisers.iter().enumerate() {
        if !advertiser.supports_format(&slot.format) {
            continue;
        }
        if !pacing[index].is_eligible(advertiser) {
            continue;
        }
        let effective_bid_cpm = advertiser.bid_cpm * bid_multiplier;
        let predicted_click_rate = predict(index);
        let score = effective_bid_cpm * predicted_click_rate * advertiser.quality;
        scores.push(ScoredBid {
            advertiser_index: index,
            advertiser_id: advertiser.id.clone(),
            effective_bid_cpm,
            predicted_click_rate,
            quality: advertiser.quality,
            score,
            effective_value: score,
        });
    }

    let eligible_count = scores.len();
    if scores.is_empty() {
        return AuctionOutcome {
            winner: None,
            second_best_score: 0.0,
            scores,
            eligible_count,
            reason: FillReason::NoEligible,
        };
    }

    scores.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    if scores[0].effective_bid_cpm < effective_floor_cpm {
        return AuctionOutcome {
            winner: None,
            second_best_score: 0.0,
            scores,
            eligible_count,
            reason: FillReason::BelowFloor,
        };
    }

    let second_best_score = if scores.len() > 1 { scores[1].score } else { 0.0 };
    AuctionOutcome {
        winner: Some(scores[0].advertiser_index),
        second_best_score,
        scores,
        eligible_count,
        reason: FillReason::Filled,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Budget;

    fn advertiser(id: &str, bid_cpm: f64, quality: f64, format: &str) -> Advertiser {
        Advertiser {
            id: id.to_string(),
            bid_cpm,
            quality,
            base_click_rate: 0.05,
            formats: vec![format.to_string()],
            total_budget: Budget::Unlimited,
            daily_budget: Budget::Unlimited,
        }
    }

    fn slot(floor_cpm: f64) -> Slot {
        Slot {
            id: "s1".to_string(),
            format: "banner".to_string(),
            floor_cpm,
            viewability: 1.0,
        }
    }

    fn pacing_for(advertisers: &[Advertiser]) -> Vec<PacingState> {
        advertisers.iter().map(PacingState::new).collect()
    }

    #[test]
    fn test_format_mismatch_yields_no_eligible() {
        let advertisers = vec![advertiser("a", 10.0, 1.0, "video")];
        let pacing = pacing_for(&advertisers);
        let outcome = run_auction(&advertisers, &pacing, &slot(1.0), 1.0, 1.0, |_| 0.05);
        assert_eq!(outcome.reason, FillReason::NoEligible);
        assert!(outcome.winner.is_none());
        assert_eq!(outcome.eligible_count, 0);
    }

    #[test]
    fn test_exhausted_budget_filtered_out() {
        let advertisers = vec![
            advertiser("broke", 10.0, 1.0, "banner"),
            advertiser("solvent", 5.0, 1.0, "banner"),
        ];
        let mut pacing = pacing_for(&advertisers);
        pacing[0].remaining = Budget::Capped(0.0);
        let outcome = run_auction(&advertisers, &pacing, &slot(1.0), 1.0, 1.0, |_| 0.05);
        assert_eq!(outcome.eligible_count, 1);
        assert_eq!(outcome.winner, Some(1));
    }

    #[test]
    fn test_highest_score_wins_and_second_reported() {
        let advertisers = vec![
            advertiser("low", 4.0, 1.0, "banner"),
            advertiser("high", 10.0, 1.0, "banner"),
        ];
        let pacing = pacing_for(&advertisers);
        let outcome = run_auction(&advertisers, &pacing, &slot(1.0), 1.0, 1.0, |_| 0.1);
        assert_eq!(outcome.winner, Some(1));
        assert!((outcome.second_best_score - 0.4).abs() < 1e-12);
        assert_eq!(outcome.scores[0].advertiser_id, "high");
    }

    #[test]
    fn test_quality_can_flip_the_ranking() {
        let advertisers = vec![
            advertiser("quality", 5.0, 2.0, "banner"),
            advertiser("raw_bid", 8.0, 1.0, "banner"),
        ];
        let pacing = pacing_for(&advertisers);
        let outcome = run_auction(&advertisers, &pacing, &slot(1.0), 1.0, 1.0, |_| 0.1);
        // 5 * 0.1 * 2 = 1.0 beats 8 * 0.1 * 1 = 0.8
        assert_eq!(outcome.winner, Some(0));
    }

    #[test]
    fn test_floor_uses_bid_not_score() {
        // High predicted performance cannot rescue a bid under the reserve.
        let advertisers = vec![advertiser("a", 0.5, 10.0, "banner")];
        let pacing = pacing_for(&advertisers);
        let outcome = run_auction(&advertisers, &pacing, &slot(1.0), 1.0, 1.0, |_| 1.0);
        assert_eq!(outcome.reason, FillReason::BelowFloor);
        assert!(outcome.winner.is_none());
        assert_eq!(outcome.eligible_count, 1);
    }

    #[test]
    fn test_bid_multiplier_applies_to_floor_check() {
        let advertisers = vec![advertiser("a", 0.6, 1.0, "banner")];
        let pacing = pacing_for(&advertisers);
        // 0.6 * 2.0 = 1.2 clears the 1.0 floor the raw bid would miss.
        let outcome = run_auction(&advertisers, &pacing, &slot(1.0), 2.0, 1.0, |_| 0.05);
        assert_eq!(outcome.winner, Some(0));
        assert!((outcome.scores[0].effective_bid_cpm - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_single_bidder_second_score_zero() {
        let advertisers = vec![advertiser("solo", 10.0, 1.0, "banner")];
        let pacing = pacing_for(&advertisers);
        let outcome = run_auction(&advertisers, &pacing, &slot(1.0), 1.0, 1.0, |_| 0.05);
        assert_eq!(outcome.winner, Some(0));
        assert_eq!(outcome.second_best_score, 0.0);
    }

    #[test]
    fn test_exact_tie_keeps_input_order() {
        let advertisers = vec![
            advertiser("first", 10.0, 1.0, "banner"),
            advertiser("second", 10.0, 1.0, "banner"),
        ];
        let pacing = pacing_for(&advertisers);
        for _ in 0..5 {
            let outcome =
                run_auction(&advertisers, &pacing, &slot(1.0), 1.0, 1.0, |_| 0.05);
            assert_eq!(outcome.winner, Some(0));
        }
    }

    #[test]
    fn test_predict_called_in_list_order_for_eligible_only() {
        let advertisers = vec![
            advertiser("a", 10.0, 1.0, "banner"),
            advertiser("skip", 10.0, 1.0, "video"),
            advertiser("b", 10.0, 1.0, "banner"),
        ];
        let pacing = pacing_for(&advertisers);
        let mut calls = Vec::new();
        run_auction(&advertisers, &pacing, &slot(1.0), 1.0, 1.0, |idx| {
            calls.push(idx);
            0.05
        });
        assert_eq!(calls, vec![0, 2]);
    }
}
