// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Ad Exchange Simulation Suite ("The Exchange")

pub mod auction;
pub mod config;
pub mod fatigue;
pub mod policy;
pub mod predictor;
pub mod pricing;
pub mod regime;
pub mod rng;
pub mod rolling;
pub mod simulation;
pub mod types;

pub use config::{ConfigError, FatigueConfig, SimConfig};
pub use policy::{PolicyConfig, PolicyInputs};
pub use pricing::PricingConfig;
pub use regime::{Regime, RegimeEntry};
pub use rng::SimRng;
pub use rolling::{RollingMetrics, RollingSnapshot, ROLLING_WINDOW_TICKS};
pub use simulation::{AuctionSimulation, SimError, SimState, Step};
pub use types::*;

use wasm_bindgen::prelude::*;

// ─── WASM Interface ──────────────────────────────────────────────────────────
//
// Thin conversion layer for browser embedding. The renderer pulls one tick
// per animation slice via `step` or a full batch via `run_to_end`; the core
// never touches the DOM.

#[wasm_bindgen]
impl AuctionSimulation {
    /// Build a simulation from a plain JS config object.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<AuctionSimulation, JsValue> {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        let config: SimConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("invalid config: {e}")))?;
        AuctionSimulation::from_config(config).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Advance one tick; returns `{ event, done }`.
    pub fn step(&mut self) -> JsValue {
        let step = self.step_core();
        serde_wasm_bindgen::to_value(&step).unwrap_or(JsValue::NULL)
    }

    /// Drive the remaining ticks to completion and return their events.
    pub fn run_to_end(&mut self) -> JsValue {
        let mut events = Vec::new();
        loop {
            let step = self.step_core();
            if let Some(event) = step.event {
                events.push(event);
            }
            if step.done {
                break;
            }
        }
        serde_wasm_bindgen::to_value(&events).unwrap_or(JsValue::NULL)
    }

    /// Cumulative totals for dashboards.
    pub fn get_totals(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.totals()).unwrap_or(JsValue::NULL)
    }

    /// Rolling-window aggregates for dashboards.
    pub fn get_rolling(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.rolling()).unwrap_or(JsValue::NULL)
    }

    /// Full ordered event history so far.
    pub fn get_events(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.events()).unwrap_or(JsValue::NULL)
    }

    /// Reset to tick zero: reseed the RNG, restore pacing budgets, clear
    /// the event log.
    pub fn reset(&mut self) {
        self.rng.set_seed(self.config.seed);
        for (pacing, advertiser) in self.pacing.iter_mut().zip(&self.config.advertisers) {
            pacing.reset(advertiser);
        }
        self.state = SimState::new();
        self.slot_cursor = 0;
    }
}
