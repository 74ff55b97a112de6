//! Cash-milestone feature unlocks. One-way and idempotent.

use sim_core::{Catalog, GameState, Severity};

pub fn run(state: &mut GameState, catalog: &Catalog) {
    for def in &catalog.unlocks {
        if state.money >= def.cash_threshold && !state.unlocked.contains(&def.feature) {
            state.unlocked.insert(def.feature);
            state.push_log(Severity::Info, format!("{} unlocked.", def.feature));
        }
    }
}
