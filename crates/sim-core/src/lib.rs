#![deny(warnings)]

//! Core domain models and invariants for Silicon Magnate.
//!
//! This crate defines the serializable game state advanced one simulated day
//! at a time by `sim-runtime`, the static catalog the engine consults, and
//! validation helpers that guarantee the documented invariants.

pub mod bonus;
pub mod catalog;
pub mod consts;
pub mod rng;
pub mod state;
pub mod validate;

pub use bonus::{reputation_bonus, ReputationBonus};
pub use catalog::{
    AchievementDef, AchievementReward, Catalog, CompetitorSeed, EraDef, EventDef, HeroDef,
    HeroEffect, OfficeDef, Predicate, TechDef, TrendDef, UnlockDef,
};
pub use state::{
    AchievementId, ActiveEvent, Campaign, Competitor, Contract, Employee, Era, EventId,
    EventSource, Feature, FinancialRecord, GameSpeed, GameState, Hero, LineSpecialization,
    LineStatus, Loan, LogEntry, MarketTrend, OfficeTier, PerProduct, Product, ProductionLine,
    RivalLaunch, Severity, StockListing, TechId, WorkPolicy, PRODUCTS,
};
pub use validate::{validate_catalog, validate_state, ValidationError};
