#![deny(warnings)]

//! Rival-company heuristics: technology diffusion, quality growth, and the
//! quality/awareness scoring that drives market-share allocation.

use sim_core::{Catalog, Competitor, GameState, Product};

/// Quality points one tech tier is worth when scoring the player against
/// rivals, whose quality ratings grow on the same scale.
const QUALITY_PER_TIER: f32 = 20.0;

/// Daily probability that the industry's shared tech level advances one tier
/// for a product. Grows slowly with the day counter: breakthroughs come
/// faster in a mature market.
pub fn diffusion_chance(day: u32) -> f64 {
    (0.004 + f64::from(day) * 1.0e-5).min(0.05)
}

/// Quality points a rival gains on its growth day, floored so even passive
/// rivals keep moving.
pub fn quality_growth(aggressiveness: f32) -> f32 {
    (aggressiveness * 0.5).max(0.2)
}

/// A rival's market score: quality amplified by the share it already holds.
pub fn competitor_score(competitor: &Competitor, product: Product) -> f32 {
    let quality = *competitor.quality.get(product);
    let share = *competitor.market_share.get(product);
    quality * (1.0 + share / 100.0)
}

/// The player's market score, derived from tech tier and brand awareness;
/// never stored in the state.
pub fn player_score(state: &GameState, product: Product, catalog: &Catalog) -> f32 {
    let tier = state.tech_level(product, catalog);
    let quality = QUALITY_PER_TIER * f32::from(tier + 1);
    let awareness = *state.brand_awareness.get(product);
    quality * (1.0 + awareness / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use sim_core::PerProduct;

    fn rival(quality: f32, share: f32) -> Competitor {
        Competitor {
            name: "Rival".to_string(),
            aggressiveness: 0.5,
            quality: PerProduct::splat(quality),
            tech_level: PerProduct::splat(0),
            market_share: PerProduct::splat(share),
        }
    }

    #[test]
    fn diffusion_chance_grows_then_caps() {
        assert!(diffusion_chance(0) < diffusion_chance(1000));
        assert_eq!(diffusion_chance(1_000_000), 0.05);
    }

    #[test]
    fn quality_growth_floor() {
        assert_eq!(quality_growth(0.0), 0.2);
        assert!((quality_growth(0.8) - 0.4).abs() < 1e-6);
    }

    #[test]
    fn incumbents_score_higher_at_equal_quality() {
        let small = rival(30.0, 10.0);
        let large = rival(30.0, 40.0);
        assert!(
            competitor_score(&large, Product::CPU) > competitor_score(&small, Product::CPU)
        );
    }

    #[test]
    fn player_score_tracks_tier_and_awareness() {
        let catalog = Catalog::standard();
        let mut state = GameState::new_game(&catalog, 3);
        let base = player_score(&state, Product::CPU, &catalog);
        state.brand_awareness.cpu = 50.0;
        let aware = player_score(&state, Product::CPU, &catalog);
        assert!(aware > base);
    }

    proptest! {
        #[test]
        fn scores_are_nonnegative(quality in 0.0f32..500.0, share in 0.0f32..100.0) {
            let c = rival(quality, share);
            prop_assert!(competitor_score(&c, Product::GPU) >= 0.0);
        }
    }
}
