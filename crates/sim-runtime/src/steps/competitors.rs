//! Rival evolution: industry tech diffusion, periodic quality growth, and
//! the market-share recompute.

use rand::Rng;
use sim_core::{Catalog, GameState, Severity, PRODUCTS};

/// Rivals improve quality every fifth day.
const GROWTH_PERIOD_DAYS: u32 = 5;
/// Chance a rival closes one tier of the gap to the industry level on a
/// growth day.
const CATCH_UP_CHANCE: f64 = 0.1;

pub fn run<R: Rng>(state: &mut GameState, catalog: &Catalog, rng: &mut R) {
    // Industry-wide breakthroughs, independent of any single rival.
    for product in PRODUCTS {
        let chance = sim_ai::diffusion_chance(state.day);
        let current = *state.global_tech_level.get(product);
        if current < catalog.max_tier(product) && rng.gen_bool(chance) {
            *state.global_tech_level.get_mut(product) = current + 1;
            state.push_log(
                Severity::Info,
                format!(
                    "Industry breakthrough: {product} state of the art is now tier {}.",
                    current + 1
                ),
            );
        }
    }

    if state.day % GROWTH_PERIOD_DAYS == 0 {
        for i in 0..state.competitors.len() {
            let growth = sim_ai::quality_growth(state.competitors[i].aggressiveness);
            for product in PRODUCTS {
                *state.competitors[i].quality.get_mut(product) += growth;
                let global = *state.global_tech_level.get(product);
                let tech = state.competitors[i].tech_level.get_mut(product);
                // Rivals never run ahead of the industry.
                if *tech < global && rng.gen_bool(CATCH_UP_CHANCE) {
                    *tech += 1;
                }
            }
        }
    }

    // Market-share recompute. The player's score rides along in the total
    // but is never stored; rivals split what their scores earn them.
    for product in PRODUCTS {
        let mut scores: Vec<f32> = state
            .competitors
            .iter()
            .map(|c| sim_ai::competitor_score(c, product))
            .collect();
        scores.push(sim_ai::player_score(state, product, catalog));
        if let Some(shares) = sim_econ::allocate_shares(&scores) {
            for (competitor, share) in state.competitors.iter_mut().zip(&shares) {
                *competitor.market_share.get_mut(product) = *share;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use sim_core::{PerProduct, Product};

    fn setup() -> (Catalog, GameState, ChaCha8Rng) {
        let catalog = Catalog::standard();
        let state = GameState::new_game(&catalog, 9);
        (catalog, state, ChaCha8Rng::seed_from_u64(9))
    }

    #[test]
    fn shares_with_player_sum_to_hundred() {
        let (catalog, mut state, mut rng) = setup();
        state.day = 5;
        run(&mut state, &catalog, &mut rng);
        for product in PRODUCTS {
            let rivals: f32 = state
                .competitors
                .iter()
                .map(|c| *c.market_share.get(product))
                .sum();
            let total = rivals + state.player_share(product);
            assert!((total - 100.0).abs() < 0.1, "total share was {total}");
        }
    }

    #[test]
    fn rivals_with_zero_quality_lose_the_market() {
        let (catalog, mut state, mut rng) = setup();
        for c in &mut state.competitors {
            c.quality = PerProduct::splat(0.0);
        }
        // Day 1 is not a growth day, so quality stays at zero through the
        // recompute and the player's tier-0 score takes everything.
        state.day = 1;
        run(&mut state, &catalog, &mut rng);
        for c in &state.competitors {
            assert_eq!(*c.market_share.get(Product::CPU), 0.0);
        }
        assert!((state.player_share(Product::CPU) - 100.0).abs() < 0.1);
    }

    #[test]
    fn global_tech_never_exceeds_tree_max() {
        let (catalog, mut state, mut rng) = setup();
        for day in 1..3000 {
            state.day = day;
            run(&mut state, &catalog, &mut rng);
        }
        for product in PRODUCTS {
            assert!(*state.global_tech_level.get(product) <= catalog.max_tier(product));
            for c in &state.competitors {
                assert!(
                    *c.tech_level.get(product) <= *state.global_tech_level.get(product)
                );
            }
        }
    }

    #[test]
    fn quality_grows_only_on_fifth_days() {
        let (catalog, mut state, mut rng) = setup();
        let before = state.competitors[0].quality.cpu;
        state.day = 6;
        run(&mut state, &catalog, &mut rng);
        assert_eq!(state.competitors[0].quality.cpu, before);
        state.day = 10;
        run(&mut state, &catalog, &mut rng);
        assert!(state.competitors[0].quality.cpu > before);
    }
}
