// Monte Carlo Infrastructure — N runs per scenario with statistical aggregation
// Each scenario runs N times with seeds base..base+N-1; every run is audited
// against the engine's structural invariants on a freshly sampled market.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use auction_engine::*;

use crate::population::PopulationGenerator;
use crate::report::*;
use crate::scenarios::Scenario;
use crate::time_series::TimeSeriesRecorder;

use std::time::Instant;

/// Run a single scenario iteration with a specific seed.
pub fn run_single(
    scenario: &Scenario,
    seed: u64,
    time_series_dir: Option<&std::path::Path>,
) -> BenchResult {
    let mut generator = PopulationGenerator::new(ChaCha8Rng::seed_from_u64(seed));
    let advertisers = generator.advertisers(&scenario.population);
    let slots = generator.slots(&scenario.population);

    let config = SimConfig {
        horizon: scenario.horizon,
        seed: seed as u32,
        policy: scenario.policy.clone(),
        pricing: scenario.pricing.clone(),
        fatigue: scenario.fatigue,
        floor_multiplier: scenario.floor_multiplier,
        regimes: scenario.regimes.clone(),
        advertisers: advertisers.clone(),
        slots: slots.clone(),
    };

    let start = Instant::now();
    let events = AuctionSimulation::run(config.clone()).expect("batch run failed");
    let elapsed = start.elapsed();

    // Determinism audit: an identical config must replay byte-identically.
    let replay = AuctionSimulation::run(config.clone()).expect("batch replay failed");
    let determinism_ok = serde_json::to_string(&events).expect("serialize events")
        == serde_json::to_string(&replay).expect("serialize replay");

    let tick_complete = events.len() as u64 == scenario.horizon;

    // Budget audit: realized charges per advertiser never exceed the cap.
    let mut budget_violations = 0u64;
    for adv in &advertisers {
        if let Budget::Capped(cap) = adv.daily_budget {
            let spent: f64 = events
                .iter()
                .flat_map(|e| e.results.iter())
                .filter(|r| r.impression && r.winner.as_deref() == Some(adv.id.as_str()))
                .map(|r| r.price_cpm / 1000.0)
                .sum();
            if spent > cap + 1e-9 {
                budget_violations += 1;
            }
        }
    }

    // Floor audit: no winner may sit under the effective floor in force at
    // its auction's tick.
    let mut floor_violations = 0u64;
    for event in &events {
        let active = regime::active(&config.regimes, event.tick);
        for result in &event.results {
            if result.winner.is_none() {
                continue;
            }
            let slot = slots
                .iter()
                .find(|s| s.id == result.slot_id)
                .expect("slot id in result");
            let effective_floor =
                slot.floor_cpm * (config.floor_multiplier + active.floor_multiplier_delta);
            if result.scores[0].effective_bid_cpm < effective_floor - 1e-9 {
                floor_violations += 1;
            }
        }
    }

    // Outcome taxonomy counts.
    let mut reason_counts = [0u64; 5];
    for event in &events {
        if event.reason == Some(FillReason::NoSlot) {
            reason_counts[1] += 1;
        }
        for result in &event.results {
            match result.reason {
                FillReason::Filled => reason_counts[0] += 1,
                FillReason::NoSlot => reason_counts[1] += 1,
                FillReason::NoEligible => reason_counts[2] += 1,
                FillReason::BelowFloor => reason_counts[3] += 1,
                FillReason::BudgetExhausted => reason_counts[4] += 1,
            }
        }
    }

    let opened: u64 = events.iter().map(|e| u64::from(e.slots_opened)).sum();
    let filled: u64 = events.iter().map(|e| u64::from(e.slots_filled)).sum();
    let impressions: u64 = events.iter().map(|e| u64::from(e.impressions)).sum();
    let clicks: u64 = events.iter().map(|e| u64::from(e.clicks)).sum();
    let revenue: f64 = events.iter().map(|e| e.revenue).sum();

    let fill_rate = if opened > 0 {
        filled as f64 / opened as f64
    } else {
        0.0
    };
    let ecpm = if impressions > 0 {
        revenue / impressions as f64 * 1000.0
    } else {
        0.0
    };
    let click_rate = if impressions > 0 {
        clicks as f64 / impressions as f64
    } else {
        0.0
    };

    if let Some(dir) = time_series_dir {
        let mut recorder = TimeSeriesRecorder::new();
        let mut cumulative = 0.0;
        for event in &events {
            cumulative += event.revenue;
            recorder.record(event, cumulative);
        }
        let path = dir.join(format!("seed-{}.jsonl", seed));
        if let Err(e) = recorder.write_jsonl(&path) {
            eprintln!("  Warning: failed to write time series: {}", e);
        }
    }

    // Pass evaluation: structural invariants first, scenario bounds second.
    let mut pass =
        determinism_ok && tick_complete && budget_violations == 0 && floor_violations == 0;
    if let Some(min) = scenario.criteria.min_fill_rate {
        if fill_rate < min {
            pass = false;
        }
    }
    if let Some(max) = scenario.criteria.max_fill_rate {
        if fill_rate > max {
            pass = false;
        }
    }
    if let Some(min) = scenario.criteria.min_revenue {
        if revenue < min {
            pass = false;
        }
    }

    let elapsed_secs = elapsed.as_secs_f64().max(0.001);
    BenchResult {
        scenario: scenario.label.to_string(),
        name: scenario.name.to_string(),
        category: scenario.category.to_string(),
        seed,
        pass,
        ticks: scenario.horizon,
        fill_rate,
        revenue,
        ecpm,
        click_rate,
        impressions,
        clicks,
        reason_counts,
        determinism_ok,
        tick_complete,
        budget_violations,
        floor_violations,
        elapsed_ms: elapsed.as_millis(),
        ticks_per_sec: scenario.horizon as f64 / elapsed_secs,
    }
}

/// Run Monte Carlo: N runs of a scenario, aggregate stats.
pub fn run_monte_carlo(
    scenario: &Scenario,
    n_runs: usize,
    base_seed: u64,
    time_series_base: Option<&std::path::Path>,
) -> MonteCarloReport {
    let ts_dir = time_series_base.map(|base| base.join(scenario.name.to_lowercase()));

    let mut results = Vec::with_capacity(n_runs);
    for i in 0..n_runs {
        let seed = base_seed + i as u64;
        results.push(run_single(scenario, seed, ts_dir.as_deref()));
    }

    aggregate(scenario, results)
}

/// Aggregate individual runs into a MonteCarloReport.
fn aggregate(scenario: &Scenario, results: Vec<BenchResult>) -> MonteCarloReport {
    let n = results.len();
    let passed = results.iter().filter(|r| r.pass).count();

    let fill_rate =
        Stats::from_samples(&results.iter().map(|r| r.fill_rate).collect::<Vec<_>>());
    let revenue = Stats::from_samples(&results.iter().map(|r| r.revenue).collect::<Vec<_>>());
    let ecpm = Stats::from_samples(&results.iter().map(|r| r.ecpm).collect::<Vec<_>>());
    let click_rate =
        Stats::from_samples(&results.iter().map(|r| r.click_rate).collect::<Vec<_>>());
    let elapsed_ms =
        Stats::from_samples(&results.iter().map(|r| r.elapsed_ms as f64).collect::<Vec<_>>());

    MonteCarloReport {
        scenario_name: scenario.name.to_string(),
        label: scenario.label.to_string(),
        category: scenario.category.to_string(),
        n_runs: n,
        pass_rate: passed as f64 / n as f64,
        fill_rate,
        revenue,
        ecpm,
        click_rate,
        elapsed_ms,
        all_deterministic: results.iter().all(|r| r.determinism_ok),
        all_tick_complete: results.iter().all(|r| r.tick_complete),
        total_budget_violations: results.iter().map(|r| r.budget_violations).sum(),
        total_floor_violations: results.iter().map(|r| r.floor_violations).sum(),
        individual_runs: results,
    }
}
