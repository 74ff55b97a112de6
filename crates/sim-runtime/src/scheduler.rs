//! Cooperative tick scheduler.
//!
//! One authoritative state, single-threaded. The scheduler refuses to tick
//! while any acknowledgement gate holds: an unacknowledged event, an active
//! mini-game, or a pending offline report. State replacement is atomic; a
//! consumer reading between ticks only ever sees fully applied days.

use crate::achievements;
use crate::actions;
use crate::engine::{advance_day, TickTransition};
use rust_decimal::Decimal;
use sim_core::{Catalog, GameSpeed, GameState};
use std::time::Duration;

/// Wall-clock length of one simulated day at normal speed.
pub const NORMAL_TICK: Duration = Duration::from_millis(1000);
/// Fast mode shortens the day by a fixed factor.
pub const FAST_TICK: Duration = Duration::from_millis(250);
/// Offline catch-up never replays more than this many days.
pub const OFFLINE_CATCHUP_CAP: u32 = 96;

/// Summary of an offline catch-up replay, shown to the player before live
/// ticking resumes.
#[derive(Clone, Debug, PartialEq)]
pub struct OfflineReport {
    pub days_simulated: u32,
    pub money_before: Decimal,
    pub money_after: Decimal,
    pub ended_in_game_over: bool,
}

pub struct Scheduler {
    state: GameState,
    catalog: Catalog,
    minigame_active: bool,
    pending_report: Option<OfflineReport>,
    game_over: bool,
}

impl Scheduler {
    pub fn new(state: GameState, catalog: Catalog) -> Self {
        Self {
            state,
            catalog,
            minigame_active: false,
            pending_report: None,
            game_over: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn set_minigame_active(&mut self, active: bool) {
        self.minigame_active = active;
    }

    /// Time between ticks at the current speed; `None` while paused.
    pub fn tick_interval(&self) -> Option<Duration> {
        match self.state.speed {
            GameSpeed::Paused => None,
            GameSpeed::Normal => Some(NORMAL_TICK),
            GameSpeed::Fast => Some(FAST_TICK),
        }
    }

    /// True while a human-acknowledgement gate pauses the simulation.
    pub fn blocked(&self) -> bool {
        self.game_over
            || self.minigame_active
            || self.pending_report.is_some()
            || self
                .state
                .active_event
                .as_ref()
                .is_some_and(|e| !e.acknowledged)
    }

    /// Run one day if neither paused nor blocked.
    pub fn try_tick(&mut self) -> Option<TickTransition> {
        if self.blocked() || self.tick_interval().is_none() {
            return None;
        }
        Some(self.tick_once())
    }

    fn tick_once(&mut self) -> TickTransition {
        let outcome = advance_day(&self.state, &self.catalog);
        self.state = outcome.state;
        achievements::evaluate(&mut self.state, &self.catalog);
        if outcome.transition == TickTransition::GameOver {
            self.game_over = true;
        }
        outcome.transition
    }

    /// Replay days missed while the process was away, capped, and park the
    /// summary as a report the player must acknowledge before live ticking
    /// resumes. Events raised mid-replay are auto-acknowledged; nobody was
    /// there to read them.
    pub fn catch_up(&mut self, offline: Duration) -> Option<&OfflineReport> {
        if self.game_over || self.pending_report.is_some() {
            return self.pending_report.as_ref();
        }
        let missed = (offline.as_millis() / NORMAL_TICK.as_millis()) as u32;
        let days = missed.min(OFFLINE_CATCHUP_CAP);
        if days == 0 {
            return None;
        }
        let money_before = self.state.money;
        let mut simulated = 0;
        let mut ended_in_game_over = false;
        for _ in 0..days {
            if self
                .state
                .active_event
                .as_ref()
                .is_some_and(|e| !e.acknowledged)
            {
                let _ = actions::dismiss_event(&mut self.state);
            }
            let transition = self.tick_once();
            simulated += 1;
            if transition == TickTransition::GameOver {
                ended_in_game_over = true;
                break;
            }
        }
        tracing::info!(days = simulated, game_over = ended_in_game_over, "offline catch-up");
        self.pending_report = Some(OfflineReport {
            days_simulated: simulated,
            money_before,
            money_after: self.state.money,
            ended_in_game_over,
        });
        self.pending_report.as_ref()
    }

    /// The player has read the offline report; live ticking may resume.
    pub fn acknowledge_offline_report(&mut self) -> Option<OfflineReport> {
        self.pending_report.take()
    }
}
