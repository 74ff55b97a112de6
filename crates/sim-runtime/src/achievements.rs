//! Achievement evaluator: scans the catalog's predicate table against the
//! current state and grants each achievement once, applying its reward.
//!
//! Runs after every tick and after any player action that could satisfy a
//! condition; it is driven by the scheduler and the shell, not by the tick
//! itself.

use sim_core::{AchievementId, Catalog, GameState, Predicate, Severity, PRODUCTS};

fn holds(predicate: &Predicate, state: &GameState, catalog: &Catalog) -> bool {
    match predicate {
        Predicate::MoneyAtLeast(threshold) => state.money >= *threshold,
        Predicate::StaffAtLeast(count) => state.staff_count() >= *count,
        Predicate::TechTierAtLeast(product, tier) => {
            state.tech_level(*product, catalog) >= *tier
        }
        Predicate::UnitsSoldAtLeast(units) => state.units_sold >= *units,
        Predicate::ContractsFulfilledAtLeast(count) => state.contracts_fulfilled >= *count,
        Predicate::AwarenessAtLeast(level) => {
            PRODUCTS
                .iter()
                .any(|p| *state.brand_awareness.get(*p) >= *level)
        }
        Predicate::EraReached(era) => state.era >= *era,
        Predicate::PublicCompany => state.public_company,
    }
}

/// Grant newly satisfied achievements; returns their ids in catalog order.
pub fn evaluate(state: &mut GameState, catalog: &Catalog) -> Vec<AchievementId> {
    let mut granted = Vec::new();
    for def in &catalog.achievements {
        if state.granted_achievements.contains(&def.id) {
            continue;
        }
        if !holds(&def.predicate, state, catalog) {
            continue;
        }
        state.granted_achievements.insert(def.id);
        state.money += def.reward.money;
        state.research_points += def.reward.research_points;
        state.reputation = (state.reputation + def.reward.reputation).clamp(0.0, 100.0);
        state.push_log(
            Severity::Info,
            format!("Achievement unlocked: {}.", def.name),
        );
        granted.push(def.id);
    }
    granted
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn setup() -> (Catalog, GameState) {
        let catalog = Catalog::standard();
        let state = GameState::new_game(&catalog, 8);
        (catalog, state)
    }

    #[test]
    fn achievements_grant_exactly_once() {
        let (catalog, mut state) = setup();
        state.units_sold = 5;
        let first = evaluate(&mut state, &catalog);
        assert!(first.contains(&AchievementId::FirstShipment));
        let money_after = state.money;
        let second = evaluate(&mut state, &catalog);
        assert!(second.is_empty());
        assert_eq!(state.money, money_after);
    }

    #[test]
    fn rewards_are_applied() {
        let (catalog, mut state) = setup();
        state.reputation = 0.0;
        state.money = Decimal::new(150_000, 0);
        let granted = evaluate(&mut state, &catalog);
        assert!(granted.contains(&AchievementId::SixFigures));
        assert_eq!(state.reputation, 5.0);
    }

    #[test]
    fn era_predicate_counts_later_eras_too() {
        let (catalog, mut state) = setup();
        state.era = sim_core::Era::AiGold;
        let granted = evaluate(&mut state, &catalog);
        assert!(granted.contains(&AchievementId::LongGame));
    }

    #[test]
    fn one_pass_can_grant_several() {
        let (catalog, mut state) = setup();
        state.units_sold = 1;
        state.public_company = true;
        let granted = evaluate(&mut state, &catalog);
        assert!(granted.len() >= 2);
        assert!(granted.contains(&AchievementId::PublicDebut));
    }
}
