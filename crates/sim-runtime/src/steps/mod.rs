//! The eight tick steps, one module each, applied in the order
//! `engine::advance_day_with` lists them. Every step takes the draft state
//! and mutates it in place; the draft is only published once all steps ran.

pub mod commerce;
pub mod competitors;
pub mod events;
pub mod finance;
pub mod market;
pub mod production;
pub mod unlocks;
pub mod workforce;
