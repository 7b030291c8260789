// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `banker run` command: simulate concurrent customers against a bank.
//!
//! ```text
//! totals + knobs → SimulationConfig → Simulation::new → run → report
//! ```

use anyhow::Context;
use banker::ResourceTotals;
use simulation::{Simulation, SimulationConfig, SimulationReport};

/// Builds a configuration from the `run` arguments.
///
/// `totals` may be separate words (`10 5 7`) or a single comma list
/// (`10,5,7`), or a mix of both.
pub fn config_from_args(
    totals: &[String],
    customers: usize,
    seed: Option<u64>,
    rounds: usize,
    max_retries: usize,
    max_delay_ms: u64,
) -> anyhow::Result<SimulationConfig> {
    if totals.is_empty() {
        anyhow::bail!("no resource totals given, e.g. `banker run 10 5 7`");
    }
    let totals = ResourceTotals::parse(&totals.join(" "))
        .context("invalid resource totals")?;

    let mut config = SimulationConfig::new(totals);
    config.customers = customers;
    config.seed = seed;
    config.rounds = rounds;
    config.max_retries = max_retries;
    config.max_delay_ms = max_delay_ms;
    Ok(config)
}

pub async fn execute(config: SimulationConfig, json: bool) -> anyhow::Result<()> {
    let sim = Simulation::new(config.clone()).context("failed to set up simulation")?;

    if json {
        let report = sim.run().await?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("╔══════════════════════════════════════════════════════╗");
    println!("║              banker · Customer Simulation            ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    // ── Configuration ──────────────────────────────────────────
    println!("  Config:");
    println!("   Totals:      {}", config.totals);
    println!("   Customers:   {}", config.customers);
    println!("   Seed:        {}", sim.seed());
    println!("   Rounds:      {}", config.rounds);
    println!("   Max retries: {}", config.max_retries);
    println!("   Max delay:   {} ms", config.max_delay_ms);
    println!();

    // ── Initial state ──────────────────────────────────────────
    let initial = sim.bank().snapshot();
    println!("  Maximum claims:");
    for line in initial.maximum.to_string().lines() {
        println!("   {line}");
    }
    println!();

    println!("  Running {} customers...", config.customers);
    let report = sim.run().await?;
    println!();

    if report.stats.requests > 0 && report.stats.granted == 0 {
        tracing::warn!("no request was granted; every customer gave up");
    }

    print_report(&report);
    Ok(())
}

fn print_report(report: &SimulationReport) {
    println!("  Customers:");
    for c in &report.customers {
        println!(
            "   C{:<3} {:>4} requests  {:>4} granted  {:>4} retries  {:>3} abandoned  {:>3} completions",
            c.customer, c.requests, c.granted, c.retries, c.gave_up, c.completions,
        );
    }
    println!();

    println!("  Bank:");
    println!("   {}", report.stats.summary());
    println!();

    println!("  Final state:");
    println!("   Available:    {:?}", report.final_state.available);
    println!("   Totals:       {:?}", report.final_state.total);
    println!("   Duration:     {:.2} ms", report.duration.as_secs_f64() * 1000.0);
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(words: &[&str]) -> Vec<String> {
        words.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_config_from_words() {
        let c = config_from_args(&args(&["10", "5", "7"]), 3, Some(1), 4, 2, 0).unwrap();
        assert_eq!(c.totals.as_slice(), &[10, 5, 7]);
        assert_eq!(c.customers, 3);
        assert_eq!(c.seed, Some(1));
        assert_eq!(c.rounds, 4);
        assert_eq!(c.max_retries, 2);
        assert_eq!(c.max_delay_ms, 0);
    }

    #[test]
    fn test_config_from_comma_list() {
        let c = config_from_args(&args(&["10,5", "7"]), 5, None, 20, 10, 5).unwrap();
        assert_eq!(c.totals.as_slice(), &[10, 5, 7]);
    }

    #[test]
    fn test_config_rejects_bad_totals() {
        assert!(config_from_args(&[], 5, None, 20, 10, 5).is_err());
        assert!(config_from_args(&args(&["10", "x"]), 5, None, 20, 10, 5).is_err());
        assert!(config_from_args(&args(&["0"]), 5, None, 20, 10, 5).is_err());
    }
}
