// Benchmark Report Types
// Structured output for offline analysis of Monte Carlo validation runs

use serde::Serialize;

// ─── Statistics (per-metric Monte Carlo aggregation) ────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub mean: f64,
    pub std_dev: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub min: f64,
    pub max: f64,
    pub n: usize,
}

impl Stats {
    pub fn from_samples(samples: &[f64]) -> Self {
        let n = samples.len();
        if n == 0 {
            return Self {
                mean: 0.0,
                std_dev: 0.0,
                ci_lower: 0.0,
                ci_upper: 0.0,
                min: 0.0,
                max: 0.0,
                n: 0,
            };
        }
        let mean = samples.iter().sum::<f64>() / n as f64;
        let variance = if n > 1 {
            samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };
        let std_dev = variance.sqrt();
        let stderr = std_dev / (n as f64).sqrt();
        let z = 1.96; // 95% CI
        Self {
            mean,
            std_dev,
            ci_lower: mean - z * stderr,
            ci_upper: mean + z * stderr,
            min: samples.iter().cloned().fold(f64::INFINITY, f64::min),
            max: samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            n,
        }
    }
}

// ─── Single-Run Result ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct BenchResult {
    pub scenario: String,
    pub name: String,
    pub category: String,
    pub seed: u64,
    pub pass: bool,
    pub ticks: u64,
    pub fill_rate: f64,
    pub revenue: f64,
    pub ecpm: f64,
    pub click_rate: f64,
    pub impressions: u64,
    pub clicks: u64,
    /// Slot outcomes by reason: filled, no_slot, no_eligible, below_floor,
    /// budget_exhausted.
    pub reason_counts: [u64; 5],
    pub determinism_ok: bool,
    pub tick_complete: bool,
    pub budget_violations: u64,
    pub floor_violations: u64,
    pub elapsed_ms: u128,
    pub ticks_per_sec: f64,
}

// ─── Monte Carlo Report (per-scenario aggregation) ──────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct MonteCarloReport {
    pub scenario_name: String,
    pub label: String,
    pub category: String,
    pub n_runs: usize,
    pub pass_rate: f64,
    pub fill_rate: Stats,
    pub revenue: Stats,
    pub ecpm: Stats,
    pub click_rate: Stats,
    pub elapsed_ms: Stats,
    pub all_deterministic: bool,
    pub all_tick_complete: bool,
    pub total_budget_violations: u64,
    pub total_floor_violations: u64,
    pub individual_runs: Vec<BenchResult>,
}

// ─── Invariant Validation Summary ───────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct InvariantValidation {
    pub determinism: bool,
    pub tick_completeness: bool,
    pub budget_monotonicity: bool,
    pub floor_compliance: bool,
}

impl InvariantValidation {
    pub fn all_pass(&self) -> bool {
        self.determinism
            && self.tick_completeness
            && self.budget_monotonicity
            && self.floor_compliance
    }
}

// ─── Top-Level Report ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct BenchReport {
    pub timestamp: String,
    pub version: &'static str,
    pub population_prng: &'static str,
    pub n_runs_per_scenario: usize,
    pub summary: Summary,
    pub invariant_validation: InvariantValidation,
    pub scenarios: Vec<MonteCarloReport>,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: f64,
}
