// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Ad Exchange Simulation Suite ("The Exchange") - Simulation Core

use wasm_bindgen::prelude::*;

use serde::Serialize;

use crate::auction::{self, AuctionOutcome};
use crate::config::{ConfigError, SimConfig};
use crate::fatigue;
use crate::policy::PolicyInputs;
use crate::predictor;
use crate::regime;
use crate::rng::SimRng;
use crate::rolling::{RollingMetrics, RollingSnapshot};
use crate::types::*;

/// Cadence of rolling-window snapshot refreshes in batch mode. Interactive
/// mode refreshes on every step instead.
pub(crate) const ROLLING_FLUSH_TICKS: u64 = 10;

/// How many first-slot candidates each event keeps for explainability.
pub(crate) const TOP_CANDIDATES: usize = 5;

// ─── Errors ──────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A batch run produced the wrong number of events. This is a logic
    /// defect, not a recoverable condition.
    #[error("batch run produced {actual} events for horizon {expected}")]
    TickCountMismatch { expected: u64, actual: u64 },
}

// ─── SimState ────────────────────────────────────────────────────────────────

/// Mutable run-wide accumulator. Owned exclusively by one simulation; never
/// shared across concurrent runs.
#[derive(Debug, Clone)]
pub struct SimState {
    pub tick: u64,
    pub total_revenue: f64,
    pub total_impressions: u64,
    pub total_clicks: u64,
    pub total_filled: u64,
    pub total_opened: u64,
    pub events: Vec<EventResult>,
    pub metrics: RollingMetrics,
    pub current_pressure: f64,
    pub current_fatigue: f64,
}

impl SimState {
    pub fn new() -> Self {
        Self {
            tick: 0,
            total_revenue: 0.0,
            total_impressions: 0,
            total_clicks: 0,
            total_filled: 0,
            total_opened: 0,
            events: Vec::new(),
            metrics: RollingMetrics::default(),
            current_pressure: 0.0,
            current_fatigue: 1.0,
        }
    }
}

impl Default for SimState {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Step ────────────────────────────────────────────────────────────────────

/// One interactive step. `event` is `None` once the horizon is exhausted.
#[derive(Debug, Clone, Serialize)]
pub struct Step {
    pub event: Option<EventResult>,
    pub done: bool,
}

// ─── AuctionSimulation ───────────────────────────────────────────────────────

/// One simulation run: configuration, its own RNG stream, pacing state and
/// the accumulated world state. One owner, one state, one RNG — independent
/// instances may run concurrently without coordination.
#[wasm_bindgen]
pub struct AuctionSimulation {
    pub(crate) config: SimConfig,
    pub(crate) rng: SimRng,
    pub(crate) pacing: Vec<PacingState>,
    pub(crate) state: SimState,
    pub(crate) slot_cursor: usize,
}

// ─── Internal logic (testable, pure Rust) ────────────────────────────────────

impl AuctionSimulation {
    /// Build a simulation from a validated configuration. Fails fast on a
    /// degenerate config instead of running with it.
    pub fn from_config(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = SimRng::new(config.seed);
        let pacing = config.advertisers.iter().map(PacingState::new).collect();
        Ok(Self {
            config,
            rng,
            pacing,
            state: SimState::new(),
            slot_cursor: 0,
        })
    }

    /// Batch mode: run to completion, returning exactly `horizon` events.
    pub fn run(config: SimConfig) -> Result<Vec<EventResult>, SimError> {
        let mut sim = Self::from_config(config)?;
        while !sim.is_done() {
            sim.advance_tick();
            if sim.state.tick % ROLLING_FLUSH_TICKS == 0 {
                sim.state.metrics.refresh();
            }
        }
        sim.state.metrics.refresh();

        let expected = sim.config.horizon;
        let actual = sim.state.events.len() as u64;
        if actual != expected {
            return Err(SimError::TickCountMismatch { expected, actual });
        }
        Ok(std::mem::take(&mut sim.state.events))
    }

    /// Interactive mode: advance one tick. No I/O, never blocks; safe to
    /// call at whatever cadence the external scheduler uses.
    pub fn step_core(&mut self) -> Step {
        if self.is_done() {
            return Step {
                event: None,
                done: true,
            };
        }
        let event = self.advance_tick();
        self.state.metrics.refresh();
        Step {
            event: Some(event),
            done: self.is_done(),
        }
    }

    /// The single per-tick transition both execution modes are driven by.
    /// Appends exactly one event to the run log.
    pub(crate) fn advance_tick(&mut self) -> EventResult {
        let tick = self.state.tick;
        let slot_count = self.config.slots.len();

        // (a) Pressure and fatigue from cumulative impressions.
        let pressure = fatigue::pressure(self.state.total_impressions, tick);
        let fatigue_mult =
            fatigue::fatigue_multiplier(pressure, self.config.fatigue.fatigue_strength);
        self.state.current_pressure = pressure;
        self.state.current_fatigue = fatigue_mult;

        // (b) Active regime for this tick. Applied as derived values only.
        let regime = regime::active(&self.config.regimes, tick);

        // (c) Policy decides how many slots to open.
        let next_slot_format = &self.config.slots[self.slot_cursor % slot_count].format;
        let highest_eligible_bid_cpm = self
            .config
            .advertisers
            .iter()
            .enumerate()
            .filter(|(index, adv)| {
                adv.supports_format(next_slot_format) && self.pacing[*index].is_eligible(adv)
            })
            .map(|(_, adv)| adv.bid_cpm)
            .fold(0.0, f64::max);
        let inputs = PolicyInputs {
            tick,
            impressions_so_far: self.state.total_impressions,
            trailing_ecpm: self.state.metrics.ecpm_estimate(),
            highest_eligible_bid_cpm,
        };
        let slots_to_open = self.config.policy.decide(&inputs);

        // (d) Auction each opened slot, rotating through the inventory.
        let mut results = Vec::with_capacity(slots_to_open as usize);
        let mut top_candidates: Vec<ScoredBid> = Vec::new();
        let mut tick_revenue = 0.0;
        let mut tick_impressions = 0u32;
        let mut tick_clicks = 0u32;
        let mut slots_filled = 0u32;

        for _ in 0..slots_to_open {
            let slot_index = self.slot_cursor % slot_count;
            self.slot_cursor += 1;

            let slot = &self.config.slots[slot_index];
            let effective_floor_cpm =
                slot.floor_cpm * (self.config.floor_multiplier + regime.floor_multiplier_delta);

            let outcome = {
                let advertisers = &self.config.advertisers;
                let fatigue_cfg = &self.config.fatigue;
                let rng = &mut self.rng;
                auction::run_auction(
                    advertisers,
                    &self.pacing,
                    slot,
                    regime.bid_multiplier,
                    effective_floor_cpm,
                    |index| {
                        // One noise draw per (advertiser, slot, tick).
                        let noise = (rng.next() * 2.0 - 1.0) * fatigue_cfg.baseline_noise;
                        predictor::predict_click_rate(
                            &advertisers[index],
                            slot,
                            regime.click_rate_multiplier,
                            fatigue_mult,
                            noise,
                            fatigue_cfg.viewability_enabled,
                        )
                    },
                )
            };

            let AuctionOutcome {
                winner,
                second_best_score,
                scores,
                eligible_count,
                reason,
            } = outcome;

            if results.is_empty() {
                top_candidates = scores.iter().take(TOP_CANDIDATES).cloned().collect();
            }

            let slot_result = match winner {
                None => SlotResult {
                    slot_id: slot.id.clone(),
                    winner: None,
                    price_cpm: 0.0,
                    predicted_click_rate: 0.0,
                    impression: false,
                    click: false,
                    reason,
                    eligible_count,
                    scores,
                },
                Some(winner_index) => {
                    let best = scores[0].clone();
                    let advertiser = &self.config.advertisers[winner_index];
                    let price_cpm = self.config.pricing.clearing_price(
                        best.effective_bid_cpm,
                        best.predicted_click_rate,
                        advertiser.quality,
                        second_best_score,
                        effective_floor_cpm,
                    );
                    let cost = price_cpm / 1000.0;

                    if !self.pacing[winner_index].can_afford(advertiser, cost) {
                        // Attempt recorded, nothing spent, nothing served.
                        SlotResult {
                            slot_id: slot.id.clone(),
                            winner: Some(advertiser.id.clone()),
                            price_cpm,
                            predicted_click_rate: best.predicted_click_rate,
                            impression: false,
                            click: false,
                            reason: FillReason::BudgetExhausted,
                            eligible_count,
                            scores,
                        }
                    } else {
                        let view_probability = if self.config.fatigue.viewability_enabled {
                            slot.viewability
                        } else {
                            1.0
                        };
                        let impression = self.rng.bernoulli(view_probability);
                        let click = impression && self.rng.bernoulli(best.predicted_click_rate);
                        if impression {
                            self.pacing[winner_index].charge(cost);
                            tick_revenue += cost;
                            tick_impressions += 1;
                            if click {
                                tick_clicks += 1;
                            }
                        }
                        slots_filled += 1;
                        SlotResult {
                            slot_id: slot.id.clone(),
                            winner: Some(advertiser.id.clone()),
                            price_cpm,
                            predicted_click_rate: best.predicted_click_rate,
                            impression,
                            click,
                            reason: FillReason::Filled,
                            eligible_count,
                            scores,
                        }
                    }
                }
            };
            results.push(slot_result);
        }

        // (e) Exactly one event per tick, no-op ticks included.
        let event = EventResult {
            tick,
            slots_opened: slots_to_open,
            slots_filled,
            results,
            revenue: tick_revenue,
            impressions: tick_impressions,
            clicks: tick_clicks,
            reason: if slots_to_open == 0 {
                Some(FillReason::NoSlot)
            } else {
                None
            },
            top_candidates,
        };

        self.state.total_revenue += tick_revenue;
        self.state.total_impressions += u64::from(tick_impressions);
        self.state.total_clicks += u64::from(tick_clicks);
        self.state.total_filled += u64::from(slots_filled);
        self.state.total_opened += u64::from(slots_to_open);
        self.state.metrics.push_tick(&event, pressure);
        self.state.events.push(event.clone());
        self.state.tick += 1;

        event
    }

    // ─── Read-only accessors ────────────────────────────────────────────

    pub fn is_done(&self) -> bool {
        self.state.tick >= self.config.horizon
    }

    pub fn current_tick(&self) -> u64 {
        self.state.tick
    }

    pub fn totals(&self) -> Totals {
        Totals {
            tick: self.state.tick,
            revenue: self.state.total_revenue,
            impressions: self.state.total_impressions,
            clicks: self.state.total_clicks,
            slots_filled: self.state.total_filled,
            slots_opened: self.state.total_opened,
        }
    }

    pub fn rolling(&self) -> RollingSnapshot {
        self.state.metrics.snapshot()
    }

    pub fn events(&self) -> &[EventResult] {
        &self.state.events
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn current_pressure(&self) -> f64 {
        self.state.current_pressure
    }

    pub fn current_fatigue(&self) -> f64 {
        self.state.current_fatigue
    }

    /// Remaining pacing budget of advertiser `index`, if it exists.
    pub fn remaining_budget(&self, index: usize) -> Option<Budget> {
        self.pacing.get(index).map(|p| p.remaining)
    }

    /// Cumulative spend of advertiser `index`, if it exists.
    pub fn spent(&self, index: usize) -> Option<f64> {
        self.pacing.get(index).map(|p| p.spent)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
