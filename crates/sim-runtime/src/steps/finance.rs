//! Daily ledger: salaries, hero upkeep, loan payments, weekly rent, and the
//! bankruptcy countdown.

use crate::engine::TickTransition;
use rust_decimal::Decimal;
use sim_core::consts::{BANKRUPTCY_LIMIT, RENT_PERIOD_DAYS};
use sim_core::{Catalog, GameState, HeroEffect, Severity};

/// Payroll fraction shaved off while the operations hero is on staff.
const HERO_SALARY_DISCOUNT: f32 = 0.10;

pub fn run(state: &mut GameState, catalog: &Catalog) -> TickTransition {
    // The timer is judged against the balance the day opened with; today's
    // bills cannot start the countdown on their own.
    let opening_balance = state.money;

    let discount = if state.has_hero_effect(HeroEffect::SalaryDiscount, catalog) {
        HERO_SALARY_DISCOUNT
    } else {
        0.0
    };
    let mut outflow = sim_econ::payroll(state.staff_count(), state.work_policy, discount)
        .unwrap_or(Decimal::ZERO);

    for hero in &state.heroes {
        if let Some(def) = catalog.hero_def(*hero) {
            outflow += def.daily_upkeep;
        }
    }

    let mut repaid = Vec::new();
    for loan in &mut state.loans {
        outflow += loan.daily_payment;
        loan.remaining_days -= 1;
        if loan.remaining_days == 0 {
            repaid.push(loan.id);
        }
    }
    state.loans.retain(|loan| loan.remaining_days > 0);
    for id in repaid {
        state.push_log(Severity::Info, format!("Loan #{id} repaid in full."));
    }

    if state.day % RENT_PERIOD_DAYS == 0 {
        if let Some(office) = catalog.office_def(state.office) {
            if office.weekly_rent > Decimal::ZERO {
                outflow += office.weekly_rent;
                state.push_log(
                    Severity::Info,
                    format!("Weekly rent charged: ${}.", office.weekly_rent),
                );
            }
        }
    }

    state.money -= outflow;

    if opening_balance < Decimal::ZERO {
        state.bankruptcy_timer += 1;
        if state.bankruptcy_timer >= BANKRUPTCY_LIMIT {
            state.push_log(
                Severity::Critical,
                "The creditors have had enough. The company folds.",
            );
            return TickTransition::GameOver;
        }
        if state.bankruptcy_timer == 1 || state.bankruptcy_timer % 10 == 0 {
            state.push_log(
                Severity::Warning,
                format!(
                    "Balance negative for {} day(s); {} until insolvency.",
                    state.bankruptcy_timer,
                    BANKRUPTCY_LIMIT - state.bankruptcy_timer
                ),
            );
        }
    } else {
        state.bankruptcy_timer = 0;
    }

    TickTransition::Running
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_core::{Hero, Loan, WorkPolicy};

    fn setup() -> (Catalog, GameState) {
        let catalog = Catalog::standard();
        let state = GameState::new_game(&catalog, 1);
        (catalog, state)
    }

    #[test]
    fn crunch_policy_inflates_payroll() {
        let (catalog, mut state) = setup();
        state.day = 1;
        let base = state.money;
        state.work_policy = WorkPolicy::Crunch;
        run(&mut state, &catalog);
        // 3 staff x $45 x 1.5
        assert_eq!(base - state.money, Decimal::new(202, 0) + Decimal::new(50, 2));
    }

    #[test]
    fn hero_upkeep_and_discount_both_apply() {
        let (catalog, mut state) = setup();
        state.day = 1;
        state.heroes.push(Hero::Operator);
        let base = state.money;
        run(&mut state, &catalog);
        // Payroll 135 x 0.9 = 121.50, plus $300 upkeep.
        assert_eq!(base - state.money, Decimal::new(42_150, 2));
    }

    #[test]
    fn finished_loans_are_dropped_with_a_log() {
        let (catalog, mut state) = setup();
        state.day = 1;
        state.loans.push(Loan {
            id: 3,
            principal: Decimal::new(1_000, 0),
            daily_payment: Decimal::new(120, 0),
            remaining_days: 1,
        });
        let base = state.money;
        run(&mut state, &catalog);
        assert!(state.loans.is_empty());
        assert_eq!(base - state.money, Decimal::new(120 + 135, 0));
        assert!(state.log.iter().any(|e| e.message.contains("repaid")));
    }

    #[test]
    fn warning_cadence_first_day_then_every_tenth() {
        let (catalog, mut state) = setup();
        state.staff.clear();
        state.money = Decimal::new(-10, 0);
        state.day = 1;
        run(&mut state, &catalog);
        assert_eq!(state.bankruptcy_timer, 1);
        assert!(state
            .log
            .iter()
            .any(|e| e.severity == Severity::Warning && e.message.contains("insolvency")));

        state.log.clear();
        state.bankruptcy_timer = 9;
        run(&mut state, &catalog);
        assert_eq!(state.bankruptcy_timer, 10);
        assert!(state.log.iter().any(|e| e.message.contains("insolvency")));

        state.log.clear();
        state.bankruptcy_timer = 10;
        run(&mut state, &catalog);
        assert_eq!(state.bankruptcy_timer, 11);
        assert!(!state.log.iter().any(|e| e.message.contains("insolvency")));
    }
}
