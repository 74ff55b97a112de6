//! The daily tick.
//!
//! EXECUTION ORDER (fixed, never reordered): finance, market, competitors,
//! workforce, production, commerce, events, unlocks. Later steps depend on
//! values earlier steps finalized; contract rolls read the tech tier,
//! unlock checks read the post-ledger balance.

use crate::steps;
use rand::Rng;
use sim_core::{rng::day_stream, Catalog, GameState};

/// Whether the company survived the day.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickTransition {
    Running,
    /// Sixty consecutive days in the red: the one terminal stage change.
    GameOver,
}

/// Result of one tick: the next state, plus the stage signal.
#[derive(Clone, Debug)]
pub struct TickOutcome {
    pub state: GameState,
    pub transition: TickTransition,
}

/// Advance one day using the state's own seed. The generator is derived from
/// `(seed, day)`, so replaying this day from a snapshot reproduces the live
/// tick exactly.
pub fn advance_day(prev: &GameState, catalog: &Catalog) -> TickOutcome {
    let mut rng = day_stream(prev.rng_seed, prev.day + 1);
    advance_day_with(prev, catalog, &mut rng)
}

/// Advance one day with an injected generator. `prev` is never mutated;
/// the next state is built on a draft and returned whole.
pub fn advance_day_with<R: Rng>(
    prev: &GameState,
    catalog: &Catalog,
    rng: &mut R,
) -> TickOutcome {
    let mut next = prev.clone();
    next.day += 1;

    if steps::finance::run(&mut next, catalog) == TickTransition::GameOver {
        // A dead company gets no market day.
        next.push_financial_record();
        return TickOutcome {
            state: next,
            transition: TickTransition::GameOver,
        };
    }
    steps::market::run(&mut next, catalog, rng);
    steps::competitors::run(&mut next, catalog, rng);
    steps::workforce::run(&mut next, catalog, rng);
    steps::production::run(&mut next, rng);
    steps::commerce::run(&mut next, catalog, rng);
    steps::events::run(&mut next, catalog, rng);
    steps::unlocks::run(&mut next, catalog);

    next.push_financial_record();
    TickOutcome {
        state: next,
        transition: TickTransition::Running,
    }
}
