//! Workforce: research output, the resignation table, and the daily morale
//! drift.
//!
//! Research and resignation are judged against the morale the day opened
//! with; the policy's morale delta lands afterwards. A resignation claims
//! the single active-event slot; and because this step runs before event
//! injection, a resignation always wins the slot for the day.

use rand::Rng;
use sim_core::consts::RP_PER_STAFF;
use sim_core::{
    reputation_bonus, ActiveEvent, Catalog, EventSource, GameState, HeroEffect, Severity,
};

/// Morale band table: (upper bound, chance, min leavers, max leavers).
/// First matching band applies; morale in [25,30) or at 35+ carries no risk.
fn resignation_band(morale: f32) -> Option<(f64, usize, usize)> {
    if morale < 15.0 {
        Some((0.20, 1, 1))
    } else if morale < 20.0 {
        Some((0.10, 3, 3))
    } else if morale < 25.0 {
        Some((0.05, 2, 3))
    } else if (30.0..35.0).contains(&morale) {
        Some((0.02, 1, 1))
    } else {
        None
    }
}

pub fn run<R: Rng>(state: &mut GameState, catalog: &Catalog, rng: &mut R) {
    let headcount = state.staff_count();
    let morale = state.morale;

    // Research points for the day.
    if headcount > 0 {
        let doubling = if state.has_hero_effect(HeroEffect::ResearchDoubling, catalog) {
            2.0
        } else {
            1.0
        };
        let prestige = 1.0 + f64::from(state.prestige) * 0.1;
        let research_bonus = f64::from(reputation_bonus(state.reputation).research);
        let policy = f64::from(state.work_policy.output_multiplier());
        let morale_efficiency = 0.5 + 0.5 * f64::from(morale) / 100.0;
        state.research_points +=
            headcount as f64 * RP_PER_STAFF * doubling * prestige * research_bonus * policy
                * morale_efficiency;
    }

    // At most one resignation event per tick.
    if headcount > 0 {
        if let Some((chance, lo, hi)) = resignation_band(morale) {
            if rng.gen_bool(chance) {
                let batch = if lo == hi { lo } else { rng.gen_range(lo..=hi) };
                let leavers = batch.min(state.staff_count());
                for _ in 0..leavers {
                    state.staff.pop();
                }
                state.push_log(
                    Severity::Warning,
                    format!("{leavers} employee(s) resigned over low morale."),
                );
                if state.active_event.is_none() {
                    state.active_event = Some(ActiveEvent {
                        source: EventSource::Resignation,
                        title: "Resignations".to_string(),
                        message: format!(
                            "{leavers} employee(s) walked out. Morale is at {morale:.0}."
                        ),
                        day: state.day,
                        silicon_modifier: 1.0,
                        remaining_days: 0,
                        acknowledged: false,
                    });
                }
            }
        }
    }

    // Policy-driven morale drift, clamped to its band.
    if state.staff_count() > 0 {
        state.morale =
            (state.morale + state.work_policy.morale_delta()).clamp(0.0, 100.0);
    }
}
