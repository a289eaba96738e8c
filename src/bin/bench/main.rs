// Exchange Benchmark Runner v1.0.0 — Monte Carlo Invariant Validation
// Randomized markets per run, seedable PRNG, per-tick audit trail
//
// Usage:
//   cargo run --release --bin bench                     # Run all scenarios (30 runs each)
//   cargo run --release --bin bench -- --runs 5         # Quick mode (5 runs each)
//   cargo run --release --bin bench -- FLOOR_SQUEEZE    # Filter by name
//   cargo run --release --bin bench -- --time-series    # Enable JSONL output
//   cargo run --release --bin bench -- --seed 42        # Custom base seed

mod monte_carlo;
mod population;
mod report;
mod scenarios;
mod time_series;

use report::*;
use scenarios::*;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

// ─── CLI Parsing ────────────────────────────────────────────────────────────

struct CliArgs {
    runs: usize,
    seed: u64,
    time_series: bool,
    filter: Option<String>,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut cli = CliArgs {
        runs: 30,
        seed: 0,
        time_series: false,
        filter: None,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--runs" => {
                i += 1;
                if i < args.len() {
                    cli.runs = args[i].parse().unwrap_or(30);
                }
            }
            "--seed" => {
                i += 1;
                if i < args.len() {
                    cli.seed = args[i].parse().unwrap_or(0);
                }
            }
            "--time-series" => {
                cli.time_series = true;
            }
            arg if !arg.starts_with('-') => {
                cli.filter = Some(arg.to_string());
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
            }
        }
        i += 1;
    }

    cli
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() {
    let cli = parse_args();
    let all_scenarios = scenarios();

    let to_run: Vec<&Scenario> = match &cli.filter {
        Some(f) => {
            let f_lower = f.to_lowercase();
            all_scenarios
                .iter()
                .filter(|s| {
                    s.name.to_lowercase().contains(&f_lower)
                        || s.label.to_lowercase().contains(&f_lower)
                        || s.category.to_lowercase().contains(&f_lower)
                })
                .collect()
        }
        None => all_scenarios.iter().collect(),
    };

    if to_run.is_empty() {
        eprintln!("No scenarios match filter: {:?}", cli.filter);
        std::process::exit(1);
    }

    let ts_dir = if cli.time_series {
        Some(std::path::Path::new("benchmark-results/time-series").to_path_buf())
    } else {
        None
    };

    println!("\n  Exchange Benchmark Runner v1.0.0");
    println!(
        "  Population PRNG: ChaCha8Rng | Runs/scenario: {} | Base seed: {}",
        cli.runs, cli.seed
    );
    println!("  Running {} scenario(s)...\n", to_run.len());
    println!(
        "  {:<28} {:>5} {:>10} {:>12} {:>8} {:>8}",
        "Scenario", "Pass%", "Fill%", "Revenue", "eCPM", "Time"
    );
    println!("  {}", "-".repeat(78));

    let suite_start = Instant::now();
    let mut mc_reports = Vec::new();

    for scenario in &to_run {
        let report = monte_carlo::run_monte_carlo(scenario, cli.runs, cli.seed, ts_dir.as_deref());

        let pass_pct = report.pass_rate * 100.0;
        let fill_mean = report.fill_rate.mean * 100.0;
        let fill_ci = (report.fill_rate.ci_upper - report.fill_rate.ci_lower) / 2.0 * 100.0;
        let status = if pass_pct >= 93.3 { "PASS" } else { "FAIL" };

        println!(
            "  {:<28} {:>4}% {:>6.1}±{:<3.1} {:>12.3} {:>8.2} {:>6.0}ms  {}",
            report.label,
            pass_pct as u32,
            fill_mean,
            fill_ci,
            report.revenue.mean,
            report.ecpm.mean,
            report.elapsed_ms.mean,
            status,
        );

        mc_reports.push(report);
    }

    let suite_elapsed = suite_start.elapsed();

    // ─── Invariant Validation ───────────────────────────────────────────

    let validation = InvariantValidation {
        determinism: mc_reports.iter().all(|r| r.all_deterministic),
        tick_completeness: mc_reports.iter().all(|r| r.all_tick_complete),
        budget_monotonicity: mc_reports.iter().all(|r| r.total_budget_violations == 0),
        floor_compliance: mc_reports.iter().all(|r| r.total_floor_violations == 0),
    };

    // ─── Summary ────────────────────────────────────────────────────────

    let total = mc_reports.len();
    let passed = mc_reports.iter().filter(|r| r.pass_rate >= 0.933).count();
    let failed = total - passed;

    println!("  {}", "-".repeat(78));
    println!(
        "  Total: {}  Passed: {}  Failed: {}  Suite time: {:.1}s\n",
        total,
        passed,
        failed,
        suite_elapsed.as_secs_f64()
    );

    println!("  Invariant Validation:");
    println!(
        "    Determinism:          {}",
        if validation.determinism { "PASS" } else { "FAIL" }
    );
    println!(
        "    Tick Completeness:    {}",
        if validation.tick_completeness { "PASS" } else { "FAIL" }
    );
    println!(
        "    Budget Monotonicity:  {}",
        if validation.budget_monotonicity { "PASS" } else { "FAIL" }
    );
    println!(
        "    Floor Compliance:     {}\n",
        if validation.floor_compliance { "PASS" } else { "FAIL" }
    );

    // ─── Write JSON Report ──────────────────────────────────────────────

    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis();
    let timestamp = format!("{}", ts);

    let all_invariants_pass = validation.all_pass();
    let report = BenchReport {
        timestamp: timestamp.clone(),
        version: "1.0.0",
        population_prng: "ChaCha8Rng",
        n_runs_per_scenario: cli.runs,
        summary: Summary {
            total,
            passed,
            failed,
            pass_rate: passed as f64 / total as f64,
        },
        invariant_validation: validation,
        scenarios: mc_reports,
    };

    let dir = std::path::Path::new("benchmark-results");
    if !dir.exists() {
        std::fs::create_dir_all(dir).expect("Failed to create benchmark-results/");
    }
    let path = dir.join(format!("bench-{}.json", timestamp));
    let json = serde_json::to_string_pretty(&report).expect("Failed to serialize");
    std::fs::write(&path, &json).expect("Failed to write benchmark file");
    println!("  Results saved to: {}\n", path.display());

    if failed > 0 || !all_invariants_pass {
        std::process::exit(1);
    }
}
