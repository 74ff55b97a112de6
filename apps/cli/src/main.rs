#![deny(warnings)]

//! Headless CLI: seeds a new company (or restores a snapshot), advances a
//! number of days, and prints a KPI line. Events are auto-acknowledged; no
//! one is at the keyboard.

use anyhow::{Context, Result};
use chrono::Utc;
use sim_core::{validate_catalog, validate_state, Catalog, GameState, Severity};
use sim_runtime::{actions, achievements, advance_day, TickTransition};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

struct Args {
    days: u32,
    seed: u64,
    save: Option<String>,
    load: Option<String>,
}

fn parse_args() -> Args {
    let mut args = Args {
        days: 120,
        seed: 42,
        save: None,
        load: None,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--days" => {
                if let Some(v) = it.next().and_then(|s| s.parse().ok()) {
                    args.days = v;
                }
            }
            "--seed" => {
                if let Some(v) = it.next().and_then(|s| s.parse().ok()) {
                    args.seed = v;
                }
            }
            "--save" => args.save = it.next(),
            "--load" => args.load = it.next(),
            _ => {}
        }
    }
    args
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .init();

    let args = parse_args();
    let catalog = Catalog::standard();
    validate_catalog(&catalog).context("catalog is inconsistent")?;

    let mut state = match &args.load {
        Some(path) => {
            let snapshot = persistence::read_file(path)
                .with_context(|| format!("loading snapshot {path}"))?;
            let offline = snapshot.offline_elapsed(Utc::now());
            info!(offline_secs = offline, "snapshot restored");
            snapshot.state
        }
        None => GameState::new_game(&catalog, args.seed),
    };
    validate_state(&state, &catalog).context("restored state violates invariants")?;

    info!(days = args.days, seed = args.seed, "starting headless run");
    let mut game_over = false;
    for _ in 0..args.days {
        let outcome = advance_day(&state, &catalog);
        state = outcome.state;
        achievements::evaluate(&mut state, &catalog);
        if state.active_event.is_some() {
            // Headless: acknowledge and move on.
            let _ = actions::dismiss_event(&mut state);
        }
        if outcome.transition == TickTransition::GameOver {
            game_over = true;
            break;
        }
    }
    validate_state(&state, &catalog).context("post-run state violates invariants")?;

    for entry in state.log.iter().filter(|e| e.severity != Severity::Info) {
        println!("[day {:>3}] {}: {}", entry.day, entry.severity, entry.message);
    }
    println!(
        "KPI | day: {} | money: ${} | rp: {:.0} | staff: {} | morale: {:.0} | rep: {:.0} | \
         cpu inv: {} | gpu inv: {} | cpu share: {:.1}% | gpu share: {:.1}% | game over: {}",
        state.day,
        state.money.round_dp(2),
        state.research_points,
        state.staff_count(),
        state.morale,
        state.reputation,
        state.inventory.cpu,
        state.inventory.gpu,
        state.player_share(sim_core::Product::CPU),
        state.player_share(sim_core::Product::GPU),
        game_over
    );

    if let Some(path) = &args.save {
        persistence::write_file(path, &state)
            .with_context(|| format!("writing snapshot {path}"))?;
        println!("Saved to {path}");
    }

    Ok(())
}
