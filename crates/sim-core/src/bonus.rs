//! Reputation bonus resolver.
//!
//! Reputation in [0,100] maps linearly onto four multipliers. At zero
//! reputation every multiplier is exactly neutral.

/// Multiplier bundle derived from the reputation score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReputationBonus {
    /// Sale price multiplier, 1.0..=1.20.
    pub price: f32,
    /// Fraction shaved off material purchases, 0.0..=0.10.
    pub material_discount: f32,
    /// Contract payout multiplier, 1.0..=1.25.
    pub contract: f32,
    /// Research speed multiplier, 1.0..=1.15.
    pub research: f32,
}

/// Resolve the bonus bundle for a reputation score. Pure; out-of-band scores
/// are clamped first.
pub fn reputation_bonus(reputation: f32) -> ReputationBonus {
    let r = reputation.clamp(0.0, 100.0) / 100.0;
    ReputationBonus {
        price: 1.0 + 0.20 * r,
        material_discount: 0.10 * r,
        contract: 1.0 + 0.25 * r,
        research: 1.0 + 0.15 * r,
    }
}
