#![deny(warnings)]

//! The simulation engine: advances a [`sim_core::GameState`] by one day.
//!
//! The tick is a pure function from the previous state to the next one;
//! eight steps applied in a fixed order against a draft, so consumers never
//! observe a partially applied day. Player actions between ticks live in
//! [`actions`]; the achievement evaluator and the cooperative scheduler sit
//! alongside the engine rather than inside it.

pub mod achievements;
pub mod actions;
pub mod engine;
pub mod scheduler;
pub mod steps;

pub use actions::ActionError;
pub use engine::{advance_day, advance_day_with, TickOutcome, TickTransition};
pub use scheduler::{OfflineReport, Scheduler};
