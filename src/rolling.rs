// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Ad Exchange Simulation Suite ("The Exchange") - Rolling Metrics

use serde::{Deserialize, Serialize};

use crate::types::EventResult;

/// Trailing window length, in ticks, for all rolling aggregates.
pub const ROLLING_WINDOW_TICKS: usize = 100;

// ---------------------------------------------------------------------------
// RollingWindow
// ---------------------------------------------------------------------------

/// Fixed-capacity trailing sample window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollingWindow {
    samples: Vec<f64>,
    cap: usize,
}

impl RollingWindow {
    pub fn new(cap: usize) -> Self {
        Self {
            samples: Vec::with_capacity(cap),
            cap,
        }
    }

    pub fn push(&mut self, value: f64) {
        self.samples.push(value);
        if self.samples.len() > self.cap {
            self.samples.remove(0);
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.samples.iter().sum()
    }

    pub fn mean(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.sum() / self.samples.len() as f64
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Cached window aggregates handed to dashboards. Recomputed every 10 ticks
/// in batch mode, every step in interactive mode.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RollingSnapshot {
    pub revenue_per_tick: f64,
    pub click_rate: f64,
    pub fill_rate: f64,
    pub avg_pressure: f64,
    pub ecpm: f64,
}

// ---------------------------------------------------------------------------
// RollingMetrics
// ---------------------------------------------------------------------------

/// Per-tick sample windows over the trailing `ROLLING_WINDOW_TICKS` ticks.
///
/// The window sums back the live policy signal (`ecpm_estimate`); `refresh`
/// only rebuilds the cached snapshot, so refresh cadence never changes
/// simulation outcomes.
#[derive(Debug, Clone)]
pub struct RollingMetrics {
    revenue: RollingWindow,
    impressions: RollingWindow,
    clicks: RollingWindow,
    filled: RollingWindow,
    opened: RollingWindow,
    pressure: RollingWindow,
    snapshot: RollingSnapshot,
}

impl Default for RollingMetrics {
    fn default() -> Self {
        Self::new(ROLLING_WINDOW_TICKS)
    }
}

impl RollingMetrics {
    pub fn new(cap: usize) -> Self {
        Self {
            revenue: RollingWindow::new(cap),
            impressions: RollingWindow::new(cap),
            clicks: RollingWindow::new(cap),
            filled: RollingWindow::new(cap),
            opened: RollingWindow::new(cap),
            pressure: RollingWindow::new(cap),
            snapshot: RollingSnapshot::default(),
        }
    }

    /// Record one tick's event into every window.
    pub fn push_tick(&mut self, event: &EventResult, pressure: f64) {
        self.revenue.push(event.revenue);
        self.impressions.push(f64::from(event.impressions));
        self.clicks.push(f64::from(event.clicks));
        self.filled.push(f64::from(event.slots_filled));
        self.opened.push(f64::from(event.slots_opened));
        self.pressure.push(pressure);
    }

    /// Trailing revenue-per-impression scaled to CPM. `None` until an
    /// impression lands in the window (cold start).
    pub fn ecpm_estimate(&self) -> Option<f64> {
        let impressions = self.impressions.sum();
        if impressions > 0.0 {
            Some(self.revenue.sum() / impressions * 1000.0)
        } else {
            None
        }
    }

    /// Rebuild the cached snapshot from the current windows.
    pub fn refresh(&mut self) {
        let impressions = self.impressions.sum();
        let opened = self.opened.sum();
        self.snapshot = RollingSnapshot {
            revenue_per_tick: self.revenue.mean(),
            click_rate: if impressions > 0.0 {
                self.clicks.sum() / impressions
            } else {
                0.0
            },
            fill_rate: if opened > 0.0 {
                self.filled.sum() / opened
            } else {
                0.0
            },
            avg_pressure: self.pressure.mean(),
            ecpm: self.ecpm_estimate().unwrap_or(0.0),
        };
    }

    pub fn snapshot(&self) -> RollingSnapshot {
        self.snapshot
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
