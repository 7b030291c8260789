// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `banker check` command: evaluate a fixed allocation state.
//!
//! Loads a scenario (or the textbook 5×3 example), prints its matrices,
//! whether it is safe and in which order customers can finish, then
//! replays the scenario's requests one by one.

use anyhow::Context;
use banker::{Matrix, StateSnapshot};
use simulation::Scenario;
use std::path::PathBuf;

pub fn execute(scenario: Option<PathBuf>) -> anyhow::Result<()> {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║              banker · Safe State Check               ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let (label, scenario) = match scenario {
        Some(path) => {
            let s = Scenario::from_file(&path)
                .with_context(|| format!("failed to load scenario {}", path.display()))?;
            (path.display().to_string(), s)
        }
        None => ("classic 5×3 example".to_string(), Scenario::classic()),
    };
    let bank = scenario.build_bank().context("scenario is not a valid state")?;

    println!("  Scenario: {label}");
    println!("   Totals:    {}", scenario.totals);
    println!();
    print_state(&bank.snapshot());

    if scenario.requests.is_empty() {
        return Ok(());
    }

    // ── Requests ───────────────────────────────────────────────
    println!("  Requests:");
    for (request, outcome) in scenario.replay(&bank) {
        let verdict = match outcome {
            Ok(()) => "granted".to_string(),
            Err(e) => format!("denied: {e}"),
        };
        println!("   C{} {:?}  → {verdict}", request.customer, request.units);
    }
    println!();

    println!("  After replay:");
    print_state(&bank.snapshot());
    Ok(())
}

fn print_state(state: &StateSnapshot) {
    println!("   Available: {:?}", state.available);
    print_matrix("Maximum", &state.maximum);
    print_matrix("Allocation", &state.allocation);
    print_matrix("Need", &state.need);

    match state.safe_sequence() {
        Some(order) => {
            let order: Vec<String> = order.iter().map(|c| format!("C{c}")).collect();
            println!("   Safe:      yes ({})", order.join(" → "));
        }
        None => println!("   Safe:      NO (no completion order exists)"),
    }
    println!();
}

fn print_matrix(name: &str, matrix: &Matrix) {
    println!("   {name}:");
    for line in matrix.to_string().lines() {
        println!("     {line}");
    }
}
