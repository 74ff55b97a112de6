#![deny(warnings)]

//! Economic math for Silicon Magnate.
//!
//! This module provides the validated numeric primitives the tick steps are
//! built from:
//! - Mean reversion and exponential smoothing for market processes
//! - Proportional market-share allocation with a zero-total guard
//! - Contract pricing and penalties
//! - Daily stock-price stepping
//! - Payroll computation

use rand::Rng;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use sim_core::consts::DAILY_SALARY_USD;
use sim_core::WorkPolicy;
use thiserror::Error;

/// Errors produced by economic helpers.
#[derive(Debug, Error, PartialEq)]
pub enum EconError {
    /// A fraction argument must be finite and within [0, 1).
    #[error("invalid fraction: {0}")]
    InvalidFraction(f32),
    /// Numeric conversion to or from floating point failed.
    #[error("non-finite numeric conversion")]
    NonFinite,
}

/// One mean-reversion step: pull `current` toward `target` by `elasticity`,
/// then add `noise`. The caller clamps to its band afterwards.
///
/// Example:
/// let next = mean_revert(1.2, 0.95, 0.05, 0.0);
/// assert!(next < 1.2);
pub fn mean_revert(current: f32, target: f32, elasticity: f32, noise: f32) -> f32 {
    current + (target - current) * elasticity + noise
}

/// Exponential smoothing: keep `1 - alpha` of `current`, take `alpha` of
/// `target`. `alpha` in [0, 1].
pub fn exp_smooth(current: f32, target: f32, alpha: f32) -> f32 {
    current * (1.0 - alpha) + target * alpha
}

/// Allocate shares (summing to 100) proportionally to `scores`.
///
/// Returns `None` when the total is zero, negative, or non-finite; the
/// caller must keep the previous allocation rather than divide by zero.
pub fn allocate_shares(scores: &[f32]) -> Option<Vec<f32>> {
    let total: f32 = scores.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return None;
    }
    Some(
        scores
            .iter()
            .map(|s| (s / total * 100.0).clamp(0.0, 100.0))
            .collect(),
    )
}

/// Contract reward: `units × base_price × markup`.
pub fn contract_reward(base_price: Decimal, units: u64, markup: f32) -> Result<Decimal, EconError> {
    if !markup.is_finite() || markup < 0.0 {
        return Err(EconError::NonFinite);
    }
    let markup = Decimal::from_f32(markup).ok_or(EconError::NonFinite)?;
    Ok(base_price * Decimal::from(units) * markup)
}

/// Contract default penalty as a fraction of the reward.
pub fn contract_penalty(reward: Decimal, fraction: f32) -> Result<Decimal, EconError> {
    if !(0.0..1.0).contains(&fraction) || !fraction.is_finite() {
        return Err(EconError::InvalidFraction(fraction));
    }
    let fraction = Decimal::from_f32(fraction).ok_or(EconError::NonFinite)?;
    Ok(reward * fraction)
}

/// One daily stock step: `price × (1 + noise × volatility × damper)`,
/// floored at 1. `noise` is drawn by the caller from [-1, 1].
pub fn stock_step(price: Decimal, noise: f32, volatility: f32, damper: f32) -> Decimal {
    let factor = 1.0 + noise * volatility * damper;
    let factor = Decimal::from_f32(factor.max(0.0)).unwrap_or(Decimal::ONE);
    (price * factor).max(Decimal::ONE)
}

/// Daily payroll: `headcount × base salary × policy multiplier`, with an
/// optional discount fraction (a hero effect) shaved off.
pub fn payroll(
    headcount: usize,
    policy: WorkPolicy,
    discount: f32,
) -> Result<Decimal, EconError> {
    if !(0.0..1.0).contains(&discount) || !discount.is_finite() {
        return Err(EconError::InvalidFraction(discount));
    }
    let base = Decimal::from(headcount as u64) * Decimal::new(DAILY_SALARY_USD, 0);
    let factor = policy.salary_multiplier() * (1.0 - discount);
    let factor = Decimal::from_f32(factor).ok_or(EconError::NonFinite)?;
    Ok(base * factor)
}

/// Uniform noise in [-band, band], drawn from the injected generator.
pub fn uniform_noise<R: Rng>(rng: &mut R, band: f32) -> f32 {
    if band <= 0.0 {
        return 0.0;
    }
    rng.gen_range(-band..=band)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn mean_revert_pulls_toward_target() {
        let above = mean_revert(1.4, 0.95, 0.05, 0.0);
        let below = mean_revert(0.6, 0.95, 0.05, 0.0);
        assert!(above < 1.4);
        assert!(below > 0.6);
    }

    #[test]
    fn exp_smooth_ninety_ten() {
        let next = exp_smooth(100.0, 200.0, 0.1);
        assert!((next - 110.0).abs() < 1e-4);
    }

    #[test]
    fn allocate_shares_sums_to_hundred() {
        let shares = allocate_shares(&[30.0, 20.0, 50.0]).unwrap();
        let total: f32 = shares.iter().sum();
        assert!((total - 100.0).abs() < 1e-3);
    }

    #[test]
    fn allocate_shares_guards_zero_total() {
        assert_eq!(allocate_shares(&[0.0, 0.0]), None);
        assert_eq!(allocate_shares(&[]), None);
        assert_eq!(allocate_shares(&[f32::NAN, 1.0]), None);
    }

    #[test]
    fn contract_math_matches_markup() {
        let reward = contract_reward(Decimal::new(100, 0), 10, 1.3).unwrap();
        assert_eq!(reward, Decimal::new(1300, 0));
        let penalty = contract_penalty(reward, 0.3).unwrap();
        assert_eq!(penalty, Decimal::new(390, 0));
    }

    #[test]
    fn stock_step_floors_at_one() {
        let crashed = stock_step(Decimal::new(2, 0), -1.0, 0.9, 1.0);
        assert!(crashed >= Decimal::ONE);
    }

    #[test]
    fn payroll_scales_with_policy() {
        let normal = payroll(10, WorkPolicy::Normal, 0.0).unwrap();
        let crunch = payroll(10, WorkPolicy::Crunch, 0.0).unwrap();
        let relaxed = payroll(10, WorkPolicy::Relaxed, 0.0).unwrap();
        assert_eq!(normal, Decimal::new(450, 0));
        assert_eq!(crunch, Decimal::new(675, 0));
        assert_eq!(relaxed, Decimal::new(360, 0));
    }

    #[test]
    fn payroll_rejects_bad_discount() {
        assert!(payroll(1, WorkPolicy::Normal, 1.5).is_err());
        assert!(payroll(1, WorkPolicy::Normal, -0.1).is_err());
    }

    #[test]
    fn noise_is_seeded() {
        let mut a = ChaCha8Rng::seed_from_u64(9);
        let mut b = ChaCha8Rng::seed_from_u64(9);
        assert_eq!(uniform_noise(&mut a, 0.03), uniform_noise(&mut b, 0.03));
        assert_eq!(uniform_noise(&mut a, 0.0), 0.0);
    }

    proptest! {
        #[test]
        fn shares_stay_in_band(a in 0.0f32..1000.0, b in 0.0f32..1000.0, c in 0.0f32..1000.0) {
            prop_assume!(a + b + c > 0.0);
            let shares = allocate_shares(&[a, b, c]).unwrap();
            for s in shares {
                prop_assert!((0.0..=100.0).contains(&s));
            }
        }

        #[test]
        fn smoothing_stays_between_endpoints(cur in 40.0f32..300.0, target in 40.0f32..300.0) {
            let next = exp_smooth(cur, target, 0.1);
            let lo = cur.min(target) - 1e-3;
            let hi = cur.max(target) + 1e-3;
            prop_assert!(next >= lo && next <= hi);
        }

        #[test]
        fn stock_never_below_one(price in 1i64..100_000, noise in -1.0f32..1.0, vol in 0.0f32..0.5) {
            let next = stock_step(Decimal::new(price, 2), noise, vol, 1.0);
            prop_assert!(next >= Decimal::ONE);
        }
    }
}
