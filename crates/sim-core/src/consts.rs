//! Numeric bands and buffer capacities shared across the simulation.
//!
//! Step-specific tuning knobs (probabilities, decay rates) live next to the
//! step that uses them in `sim-runtime`; only values that define state
//! invariants or are read by more than one crate belong here.

/// Market demand multiplier band.
pub const MARKET_MULT_MIN: f32 = 0.5;
pub const MARKET_MULT_MAX: f32 = 1.6;
/// Mean-reversion target for the market multiplier.
pub const MARKET_MULT_TARGET: f32 = 0.95;

/// Silicon spot price band (per unit, USD).
pub const SILICON_PRICE_MIN: f32 = 40.0;
pub const SILICON_PRICE_MAX: f32 = 300.0;
/// Baseline silicon price before multiplier/trend/event modifiers.
pub const SILICON_BASE_PRICE: f32 = 100.0;

/// Ticker log ring-buffer capacity.
pub const LOG_CAP: usize = 100;
/// Daily balance history ring-buffer capacity.
pub const FINANCIAL_HISTORY_CAP: usize = 30;
/// Per-listing stock price history capacity.
pub const STOCK_HISTORY_CAP: usize = 30;
/// Maximum simultaneous open contract offers; oldest is evicted past this.
pub const CONTRACT_OFFER_CAP: usize = 5;

/// Consecutive negative-balance days before the company folds.
pub const BANKRUPTCY_LIMIT: u32 = 60;
/// Office rent and brand-awareness decay cadence.
pub const RENT_PERIOD_DAYS: u32 = 7;
/// Market trend reassignment cadence.
pub const TREND_PERIOD_DAYS: u32 = 45;

/// Base daily salary per employee, USD, before the work-policy multiplier.
pub const DAILY_SALARY_USD: i64 = 45;
/// Research points one employee generates per day before modifiers.
pub const RP_PER_STAFF: f64 = 8.0;
