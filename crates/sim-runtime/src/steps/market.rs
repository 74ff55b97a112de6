//! Market dynamics: demand multiplier, silicon price, era transitions, trend
//! rotation, and rival launch windows.

use rand::Rng;
use sim_core::consts::{
    MARKET_MULT_MAX, MARKET_MULT_MIN, MARKET_MULT_TARGET, SILICON_BASE_PRICE, SILICON_PRICE_MAX,
    SILICON_PRICE_MIN, TREND_PERIOD_DAYS,
};
use sim_core::{Catalog, GameState, Product, RivalLaunch, Severity};

/// Mean-reversion strength of the demand multiplier.
const MULT_ELASTICITY: f32 = 0.05;
const MULT_NOISE: f32 = 0.03;
const BOOM_THRESHOLD: f32 = 1.4;
const CRASH_THRESHOLD: f32 = 0.7;

/// 90/10 smoothing toward the silicon target price.
const SILICON_ALPHA: f32 = 0.1;
const SILICON_NOISE: f32 = 1.0;
const SHORTAGE_THRESHOLD: f32 = 180.0;

const RIVAL_LAUNCH_CHANCE: f64 = 0.02;
const RIVAL_LAUNCH_MIN_DAY: u32 = 20;
const RIVAL_LAUNCH_DAYS: u32 = 10;
const RIVAL_LAUNCH_SUPPRESSION: f32 = 0.75;

pub fn run<R: Rng>(state: &mut GameState, catalog: &Catalog, rng: &mut R) {
    // Demand multiplier: mean reversion plus noise, clamped to its band.
    let noise = sim_econ::uniform_noise(rng, MULT_NOISE);
    let mult = sim_econ::mean_revert(
        state.market_multiplier,
        MARKET_MULT_TARGET,
        MULT_ELASTICITY,
        noise,
    )
    .clamp(MARKET_MULT_MIN, MARKET_MULT_MAX);
    state.market_multiplier = mult;

    // Edge-triggered flavor text: a crossing logs once until the multiplier
    // falls back inside the band.
    if mult > BOOM_THRESHOLD {
        if !state.boom_flagged {
            state.boom_flagged = true;
            state.push_log(Severity::Info, "The market is red hot. Everything sells.");
        }
    } else {
        state.boom_flagged = false;
    }
    if mult < CRASH_THRESHOLD {
        if !state.crash_flagged {
            state.crash_flagged = true;
            state.push_log(Severity::Warning, "Demand craters. Warehouses are filling up.");
        }
    } else {
        state.crash_flagged = false;
    }

    // Silicon price chases a modifier-scaled target.
    let trend_mod = catalog
        .trend_def(state.market_trend)
        .map(|t| t.silicon_modifier)
        .unwrap_or(1.0);
    let event_mod = state
        .active_event
        .as_ref()
        .map(|e| e.silicon_modifier)
        .unwrap_or(1.0);
    let target = SILICON_BASE_PRICE * mult * trend_mod * event_mod;
    let price = sim_econ::exp_smooth(state.silicon_price, target, SILICON_ALPHA)
        + sim_econ::uniform_noise(rng, SILICON_NOISE);
    state.silicon_price = price.clamp(SILICON_PRICE_MIN, SILICON_PRICE_MAX);

    if state.silicon_price > SHORTAGE_THRESHOLD {
        if !state.shortage_flagged {
            state.shortage_flagged = true;
            state.push_log(Severity::Warning, "Silicon shortage: spot prices are spiking.");
        }
    } else {
        state.shortage_flagged = false;
    }

    // Era transitions are a deterministic table lookup on the day counter.
    let era = catalog.era_for_day(state.day);
    if era != state.era {
        state.era = era;
        let name = catalog.era_def(era).map(|e| e.name).unwrap_or("a new era");
        state.push_log(Severity::Info, format!("A new era begins: {name}."));
    }

    // Trend rotation every 45 days, uniformly among the other trends.
    if state.day > 0 && state.day % TREND_PERIOD_DAYS == 0 {
        let others: Vec<_> = catalog
            .trends
            .iter()
            .filter(|t| t.trend != state.market_trend)
            .collect();
        if !others.is_empty() {
            let pick = others[rng.gen_range(0..others.len())];
            state.market_trend = pick.trend;
            state.push_log(Severity::Info, format!("Market shift: {}.", pick.name));
        }
    }

    // Rival launch window: decay an active one, or roll for a new one.
    if let Some(mut launch) = state.rival_launch.take() {
        launch.remaining_days -= 1;
        if launch.remaining_days == 0 {
            let message = format!("{}'s launch hype has faded.", launch.competitor);
            state.push_log(Severity::Info, message);
        } else {
            state.rival_launch = Some(launch);
        }
    } else if state.day > RIVAL_LAUNCH_MIN_DAY
        && !state.competitors.is_empty()
        && rng.gen_bool(RIVAL_LAUNCH_CHANCE)
    {
        let competitor = state.competitors[rng.gen_range(0..state.competitors.len())]
            .name
            .clone();
        let product = if rng.gen_bool(0.5) {
            Product::CPU
        } else {
            Product::GPU
        };
        state.push_log(
            Severity::Warning,
            format!("{competitor} announces a flagship {product}. Demand shifts their way."),
        );
        state.rival_launch = Some(RivalLaunch {
            competitor,
            product,
            demand_suppression: RIVAL_LAUNCH_SUPPRESSION,
            remaining_days: RIVAL_LAUNCH_DAYS,
        });
    }
}
