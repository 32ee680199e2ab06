#![deny(warnings)]

//! Headless CLI: initialize a game and play it out year by year with
//! every company on automated control, then print the final standings.

use anyhow::Result;
use sim_core::ConfigPatch;
use sim_runtime::GameHandle;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

fn parse_args() -> ConfigPatch {
    let mut patch = ConfigPatch::default();
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--companies" => patch.companies = it.next().and_then(|s| s.parse().ok()),
            "--countries" => patch.countries = it.next().and_then(|s| s.parse().ok()),
            "--years" => patch.years = it.next().and_then(|s| s.parse().ok()),
            "--trial-year" => {
                patch.trial_year_index = it.next().and_then(|s| s.parse().ok())
            }
            "--capital" => patch.initial_capital = it.next().and_then(|s| s.parse().ok()),
            "--seed" => patch.rng_seed = it.next().and_then(|s| s.parse().ok()),
            _ => {}
        }
    }
    patch
}

fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .init();

    let handle = GameHandle::new();
    let config = handle.start(parse_args())?;
    info!(?config, "game started");

    for _ in 0..config.years {
        let year = handle.advance_year()?;
        let snapshot = handle.snapshot()?;
        info!(year, trial = snapshot.is_trial, "year complete");
    }

    let snapshot = handle.snapshot()?;
    println!(
        "Game over | years: {} | companies: {} | listings: {}",
        snapshot.year,
        snapshot.companies.len(),
        snapshot
            .market_listings
            .values()
            .map(|board| board.len())
            .sum::<usize>()
    );
    let mut standings: Vec<_> = snapshot.companies.values().collect();
    standings.sort_by_key(|c| std::cmp::Reverse(c.total_assets));
    for (rank, company) in standings.iter().enumerate() {
        println!(
            "#{:<2} {} ({}) | assets: {} | cash: {} | brand: {}",
            rank + 1,
            company.name,
            company.country,
            company.total_assets,
            company.cash,
            company.brand_value
        );
    }
    Ok(())
}
