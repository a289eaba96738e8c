// Per-Tick JSONL Time Series Recorder
// One JSON line per tick for independent analysis

use serde::Serialize;
use std::io::Write;

use auction_engine::{EventResult, FillReason};

#[derive(Debug, Serialize)]
pub struct TickSnapshot {
    pub tick: u64,
    pub slots_opened: u32,
    pub slots_filled: u32,
    pub revenue: f64,
    pub impressions: u32,
    pub clicks: u32,
    pub cumulative_revenue: f64,
    pub reason: Option<FillReason>,
}

impl TickSnapshot {
    pub fn from_event(event: &EventResult, cumulative_revenue: f64) -> Self {
        Self {
            tick: event.tick,
            slots_opened: event.slots_opened,
            slots_filled: event.slots_filled,
            revenue: event.revenue,
            impressions: event.impressions,
            clicks: event.clicks,
            cumulative_revenue,
            reason: event.reason,
        }
    }
}

/// Accumulates snapshots and writes them as JSONL.
pub struct TimeSeriesRecorder {
    snapshots: Vec<TickSnapshot>,
}

impl TimeSeriesRecorder {
    pub fn new() -> Self {
        Self {
            snapshots: Vec::new(),
        }
    }

    pub fn record(&mut self, event: &EventResult, cumulative_revenue: f64) {
        self.snapshots
            .push(TickSnapshot::from_event(event, cumulative_revenue));
    }

    pub fn write_jsonl(&self, path: &std::path::Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::File::create(path)?;
        for snapshot in &self.snapshots {
            let line = serde_json::to_string(snapshot)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
            writeln!(file, "{}", line)?;
        }
        Ok(())
    }
}
