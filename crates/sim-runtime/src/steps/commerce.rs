//! Commerce lifecycle: contract expiry and offers, campaign decay, brand
//! awareness, and daily stock moves.

use rand::Rng;
use sim_core::consts::{CONTRACT_OFFER_CAP, RENT_PERIOD_DAYS, STOCK_HISTORY_CAP};
use sim_core::{Catalog, Contract, GameState, HeroEffect, Product, Severity, PRODUCTS};

const OFFER_CHANCE: f64 = 0.15;
const OFFER_UNITS_MIN: u64 = 20;
const OFFER_UNITS_MAX: u64 = 100;
const OFFER_MARKUP: f32 = 1.3;
const OFFER_PENALTY_FRACTION: f32 = 0.3;
const OFFER_WINDOW_DAYS: u32 = 14;

const DEFAULT_REPUTATION_HIT: f32 = 5.0;
const WEEKLY_AWARENESS_DECAY: f32 = 1.0;
/// Volatility factor while the quant hero is on staff.
const HERO_VOLATILITY_DAMPER: f32 = 0.5;

pub fn run<R: Rng>(state: &mut GameState, catalog: &Catalog, rng: &mut R) {
    expire_contracts(state);
    roll_offer(state, catalog, rng);
    advance_campaigns(state);
    if state.day % RENT_PERIOD_DAYS == 0 {
        for product in PRODUCTS {
            let awareness = state.brand_awareness.get_mut(product);
            *awareness = (*awareness - WEEKLY_AWARENESS_DECAY).clamp(0.0, 100.0);
        }
    }
    update_stocks(state, catalog, rng);
}

/// Overdue contracts are removed exactly once, with one penalty and one log
/// entry each.
fn expire_contracts(state: &mut GameState) {
    let today = state.day;
    let mut kept = Vec::with_capacity(state.active_contracts.len());
    let mut expired = Vec::new();
    for contract in state.active_contracts.drain(..) {
        if contract.deadline_day < today {
            expired.push(contract);
        } else {
            kept.push(contract);
        }
    }
    state.active_contracts = kept;
    for contract in expired {
        state.money -= contract.penalty;
        state.reputation = (state.reputation - DEFAULT_REPUTATION_HIT).clamp(0.0, 100.0);
        state.push_log(
            Severity::Warning,
            format!(
                "Contract #{} defaulted: ${} penalty and a reputation hit.",
                contract.id, contract.penalty
            ),
        );
    }
}

fn roll_offer<R: Rng>(state: &mut GameState, catalog: &Catalog, rng: &mut R) {
    if !rng.gen_bool(OFFER_CHANCE) {
        return;
    }
    let product = if rng.gen_bool(0.5) {
        Product::CPU
    } else {
        Product::GPU
    };
    let units = rng.gen_range(OFFER_UNITS_MIN..=OFFER_UNITS_MAX);
    let tier = state.tech_level(product, catalog);
    let base_price = catalog.tier_price(product, tier);
    let Ok(reward) = sim_econ::contract_reward(base_price, units, OFFER_MARKUP) else {
        return;
    };
    let Ok(penalty) = sim_econ::contract_penalty(reward, OFFER_PENALTY_FRACTION) else {
        return;
    };
    let contract = Contract {
        id: state.next_contract_id,
        product,
        units,
        reward,
        penalty,
        offered_day: state.day,
        deadline_day: state.day + OFFER_WINDOW_DAYS,
    };
    state.next_contract_id += 1;
    state.push_log(
        Severity::Info,
        format!(
            "Contract offer: {units} x {product} for ${reward} (due day {}).",
            contract.deadline_day
        ),
    );
    state.available_contracts.push(contract);
    while state.available_contracts.len() > CONTRACT_OFFER_CAP {
        state.available_contracts.remove(0);
    }
}

fn advance_campaigns(state: &mut GameState) {
    let mut finished = Vec::new();
    for i in 0..state.campaigns.len() {
        let product = state.campaigns[i].product;
        let gain = state.campaigns[i].daily_awareness;
        let awareness = state.brand_awareness.get_mut(product);
        *awareness = (*awareness + gain).clamp(0.0, 100.0);
        state.campaigns[i].remaining_days -= 1;
        if state.campaigns[i].remaining_days == 0 {
            finished.push(product);
        }
    }
    state.campaigns.retain(|c| c.remaining_days > 0);
    for product in finished {
        state.push_log(
            Severity::Info,
            format!("The {product} marketing campaign has wrapped up."),
        );
    }
}

fn update_stocks<R: Rng>(state: &mut GameState, catalog: &Catalog, rng: &mut R) {
    let damper = if state.has_hero_effect(HeroEffect::VolatilityDamping, catalog) {
        HERO_VOLATILITY_DAMPER
    } else {
        1.0
    };
    for listing in &mut state.stocks {
        let noise = rng.gen_range(-1.0f32..=1.0);
        listing.price = sim_econ::stock_step(listing.price, noise, listing.volatility, damper);
        listing.history.push_back(listing.price);
        while listing.history.len() > STOCK_HISTORY_CAP {
            listing.history.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rust_decimal::Decimal;
    use sim_core::Campaign;

    fn setup() -> (Catalog, GameState, ChaCha8Rng) {
        let catalog = Catalog::standard();
        let state = GameState::new_game(&catalog, 13);
        (catalog, state, ChaCha8Rng::seed_from_u64(13))
    }

    #[test]
    fn offer_list_evicts_oldest_past_cap() {
        let (catalog, mut state, _) = setup();
        state.day = 1;
        let mut seed = 0u64;
        while state.available_contracts.len() < CONTRACT_OFFER_CAP {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            roll_offer(&mut state, &catalog, &mut rng);
            seed += 1;
        }
        let oldest = state.available_contracts[0].id;
        // Force one more offer through.
        loop {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let before = state.available_contracts.len();
            roll_offer(&mut state, &catalog, &mut rng);
            seed += 1;
            if state.available_contracts.len() != before
                || state.available_contracts[0].id != oldest
            {
                break;
            }
        }
        assert_eq!(state.available_contracts.len(), CONTRACT_OFFER_CAP);
        assert!(state.available_contracts.iter().all(|c| c.id != oldest));
    }

    #[test]
    fn contracts_inside_deadline_are_untouched() {
        let (catalog, mut state, mut rng) = setup();
        state.day = 5;
        state.active_contracts.push(Contract {
            id: 1,
            product: Product::CPU,
            units: 10,
            reward: Decimal::new(1_000, 0),
            penalty: Decimal::new(300, 0),
            offered_day: 1,
            deadline_day: 5, // due today, not yet overdue
        });
        let money = state.money;
        run(&mut state, &catalog, &mut rng);
        assert_eq!(state.active_contracts.len(), 1);
        assert_eq!(state.money, money);
    }

    #[test]
    fn campaigns_raise_awareness_then_expire() {
        let (catalog, mut state, mut rng) = setup();
        state.day = 1;
        state.brand_awareness.gpu = 10.0;
        state.campaigns.push(Campaign {
            product: Product::GPU,
            remaining_days: 2,
            daily_awareness: 2.0,
        });
        run(&mut state, &catalog, &mut rng);
        assert_eq!(state.brand_awareness.gpu, 12.0);
        assert_eq!(state.campaigns.len(), 1);
        state.day = 2;
        run(&mut state, &catalog, &mut rng);
        assert_eq!(state.brand_awareness.gpu, 14.0);
        assert!(state.campaigns.is_empty());
        assert!(state.log.iter().any(|e| e.message.contains("wrapped up")));
    }

    #[test]
    fn awareness_decays_weekly() {
        let (catalog, mut state, mut rng) = setup();
        state.brand_awareness.cpu = 10.0;
        state.day = 7;
        run(&mut state, &catalog, &mut rng);
        assert_eq!(state.brand_awareness.cpu, 9.0);
        state.day = 8;
        run(&mut state, &catalog, &mut rng);
        assert_eq!(state.brand_awareness.cpu, 9.0);
    }

    #[test]
    fn stock_prices_stay_positive_with_bounded_history() {
        let (catalog, mut state, mut rng) = setup();
        for day in 1..200 {
            state.day = day;
            update_stocks(&mut state, &catalog, &mut rng);
        }
        for listing in &state.stocks {
            assert!(listing.price >= Decimal::ONE);
            assert!(listing.history.len() <= STOCK_HISTORY_CAP);
        }
    }
}
