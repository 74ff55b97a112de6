//! The game state: one serializable root, replaced wholesale each tick.
//!
//! Every field carries `serde(default)` so snapshots written by older builds
//! keep loading; new fields must always be additive.

use crate::catalog::{Catalog, HeroEffect};
use crate::consts::{FINANCIAL_HISTORY_CAP, LOG_CAP, SILICON_BASE_PRICE};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, VecDeque};
use std::fmt;

/// Product lines the company manufactures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Product {
    CPU,
    GPU,
}

/// Stable iteration order for per-product loops.
pub const PRODUCTS: [Product; 2] = [Product::CPU, Product::GPU];

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Product::CPU => write!(f, "CPU"),
            Product::GPU => write!(f, "GPU"),
        }
    }
}

/// A value tracked separately for each product line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PerProduct<T> {
    pub cpu: T,
    pub gpu: T,
}

impl<T> PerProduct<T> {
    pub fn get(&self, product: Product) -> &T {
        match product {
            Product::CPU => &self.cpu,
            Product::GPU => &self.gpu,
        }
    }

    pub fn get_mut(&mut self, product: Product) -> &mut T {
        match product {
            Product::CPU => &mut self.cpu,
            Product::GPU => &mut self.gpu,
        }
    }
}

impl<T: Copy> PerProduct<T> {
    /// Both slots initialized to the same value.
    pub fn splat(value: T) -> Self {
        Self {
            cpu: value,
            gpu: value,
        }
    }
}

/// Unique identifier for a technology, e.g. "cpu-multicore".
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TechId(pub String);

impl fmt::Display for TechId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Market timeline phases, in chronological order. Ordering is meaningful:
/// event era-gating compares against the current era.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Era {
    #[default]
    Garage,
    PersonalComputing,
    InternetBoom,
    MobileWave,
    AiGold,
}

/// Temporary market preference rewarding or punishing a design attribute.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum MarketTrend {
    #[default]
    SteadyDemand,
    PerformanceCraze,
    EfficiencyPush,
    GamingBoom,
    CryptoSurge,
}

/// Staff mode trading output rate against morale decay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkPolicy {
    Relaxed,
    #[default]
    Normal,
    Crunch,
}

impl WorkPolicy {
    /// Scales the daily salary bill.
    pub fn salary_multiplier(self) -> f32 {
        match self {
            WorkPolicy::Relaxed => 0.8,
            WorkPolicy::Normal => 1.0,
            WorkPolicy::Crunch => 1.5,
        }
    }

    /// Daily morale change while any staff are employed.
    pub fn morale_delta(self) -> f32 {
        match self {
            WorkPolicy::Relaxed => 0.5,
            WorkPolicy::Normal => -0.1,
            WorkPolicy::Crunch => -1.0,
        }
    }

    /// Research output factor, the inverse of the morale trade-off.
    pub fn output_multiplier(self) -> f32 {
        match self {
            WorkPolicy::Relaxed => 0.7,
            WorkPolicy::Normal => 1.0,
            WorkPolicy::Crunch => 1.6,
        }
    }
}

/// Tick cadence selector. Always `Paused` right after a snapshot restore.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameSpeed {
    #[default]
    Paused,
    Normal,
    Fast,
}

/// Features gated behind cash milestones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Feature {
    Loans,
    Contracts,
    Marketing,
    StockMarket,
    CovertOps,
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Feature::Loans => "Loans",
            Feature::Contracts => "Contracts",
            Feature::Marketing => "Marketing",
            Feature::StockMarket => "Stock market",
            Feature::CovertOps => "Covert ops",
        };
        write!(f, "{name}")
    }
}

/// Office tiers, from the founder's garage up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OfficeTier {
    #[default]
    Garage,
    Loft,
    Tower,
    Campus,
}

/// Hireable specialists with a daily upkeep and a passive effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Hero {
    Visionary,
    Quant,
    Operator,
}

/// Narrative events the injection step can activate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventId {
    ChipShortage,
    TradeWar,
    ViralReview,
    PatentDispute,
    DatacenterBoom,
    SolarFlare,
}

/// One-time milestones with a reward attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AchievementId {
    FirstShipment,
    SixFigures,
    FullFloor,
    StateOfTheArt,
    PublicDebut,
    DealMaker,
    HouseholdName,
    LongGame,
}

/// Ticker log severity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// One ticker entry for the notification consumer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub day: u32,
    pub severity: Severity,
    pub message: String,
}

/// End-of-day balance sample for the finance chart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FinancialRecord {
    pub day: u32,
    pub money: Decimal,
}

/// An employee on payroll. Headcount is always derived from this list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub name: String,
    pub hired_day: u32,
}

/// An outstanding loan with a fixed daily payment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: u32,
    pub principal: Decimal,
    pub daily_payment: Decimal,
    pub remaining_days: u32,
}

/// A delivery contract. Lives in exactly one of `available_contracts`
/// (offered) or `active_contracts` (accepted) until fulfilled, expired, or
/// evicted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: u64,
    pub product: Product,
    pub units: u64,
    pub reward: Decimal,
    pub penalty: Decimal,
    pub offered_day: u32,
    pub deadline_day: u32,
}

/// A tradeable listing on the in-game exchange.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StockListing {
    pub symbol: String,
    pub company: String,
    pub price: Decimal,
    pub volatility: f32,
    #[serde(default)]
    pub owned: u64,
    #[serde(default)]
    pub history: VecDeque<Decimal>,
}

/// Whether a production line is currently running.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineStatus {
    #[default]
    Idle,
    Producing,
}

/// Retooling branch of a production line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineSpecialization {
    #[default]
    Standard,
    Speed,
    Quality,
    Efficiency,
}

impl LineSpecialization {
    /// Output scaling relative to a standard line.
    pub fn output_multiplier(self) -> f32 {
        match self {
            LineSpecialization::Standard | LineSpecialization::Efficiency => 1.0,
            LineSpecialization::Speed => 1.5,
            LineSpecialization::Quality => 0.7,
        }
    }

    /// Silicon units consumed per product unit.
    pub fn material_per_unit(self) -> u64 {
        match self {
            LineSpecialization::Efficiency => 6,
            _ => 10,
        }
    }
}

/// A factory line. Efficiency only decays inside the tick; the external
/// maintenance action resets it to 100.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductionLine {
    pub id: u32,
    pub product: Product,
    pub status: LineStatus,
    pub base_daily_output: u32,
    pub specialization: LineSpecialization,
    pub efficiency: f32,
}

/// A running marketing campaign.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub product: Product,
    pub remaining_days: u32,
    pub daily_awareness: f32,
}

/// An AI-driven rival company.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub name: String,
    /// How hard this rival pushes quality, in (0, 1].
    pub aggressiveness: f32,
    pub quality: PerProduct<f32>,
    pub tech_level: PerProduct<u8>,
    pub market_share: PerProduct<f32>,
}

/// A one-shot rival product launch suppressing demand for its duration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RivalLaunch {
    pub competitor: String,
    pub product: Product,
    pub demand_suppression: f32,
    pub remaining_days: u32,
}

/// What put the active event into its slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventSource {
    Catalog(EventId),
    Resignation,
}

/// The single active narrative event. The scheduler refuses to tick until it
/// is acknowledged; after acknowledgement it may linger as a passive market
/// modifier until `remaining_days` runs out.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActiveEvent {
    pub source: EventSource,
    pub title: String,
    pub message: String,
    pub day: u32,
    pub silicon_modifier: f32,
    pub remaining_days: u32,
    #[serde(default)]
    pub acknowledged: bool,
}

fn default_multiplier() -> f32 {
    1.0
}

fn default_silicon_price() -> f32 {
    SILICON_BASE_PRICE
}

fn default_founder_pct() -> f32 {
    100.0
}

/// The whole game, advanced by `sim-runtime::advance_day`. The tick never
/// mutates a previous snapshot; it produces the next value from a draft.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    #[serde(default)]
    pub day: u32,
    #[serde(default)]
    pub money: Decimal,
    #[serde(default)]
    pub research_points: f64,
    #[serde(default)]
    pub silicon: u64,
    #[serde(default = "default_silicon_price")]
    pub silicon_price: f32,
    #[serde(default)]
    pub reputation: f32,
    #[serde(default)]
    pub inventory: PerProduct<u64>,
    #[serde(default)]
    pub researched: BTreeSet<TechId>,
    #[serde(default)]
    pub global_tech_level: PerProduct<u8>,
    #[serde(default)]
    pub era: Era,
    #[serde(default = "default_multiplier")]
    pub market_multiplier: f32,
    #[serde(default)]
    pub market_trend: MarketTrend,
    #[serde(default)]
    pub rival_launch: Option<RivalLaunch>,
    #[serde(default)]
    pub financial_history: VecDeque<FinancialRecord>,
    #[serde(default)]
    pub active_contracts: Vec<Contract>,
    #[serde(default)]
    pub available_contracts: Vec<Contract>,
    #[serde(default)]
    pub next_contract_id: u64,
    #[serde(default)]
    pub stocks: Vec<StockListing>,
    #[serde(default)]
    pub public_company: bool,
    #[serde(default = "default_founder_pct")]
    pub founder_shares_pct: f32,
    #[serde(default)]
    pub loans: Vec<Loan>,
    #[serde(default)]
    pub next_loan_id: u32,
    #[serde(default)]
    pub staff: Vec<Employee>,
    #[serde(default)]
    pub heroes: Vec<Hero>,
    #[serde(default)]
    pub morale: f32,
    #[serde(default)]
    pub work_policy: WorkPolicy,
    #[serde(default)]
    pub lines: Vec<ProductionLine>,
    #[serde(default)]
    pub next_line_id: u32,
    #[serde(default)]
    pub campaigns: Vec<Campaign>,
    #[serde(default)]
    pub brand_awareness: PerProduct<f32>,
    #[serde(default)]
    pub competitors: Vec<Competitor>,
    #[serde(default)]
    pub unlocked: BTreeSet<Feature>,
    #[serde(default)]
    pub log: VecDeque<LogEntry>,
    #[serde(default)]
    pub active_event: Option<ActiveEvent>,
    #[serde(default)]
    pub bankruptcy_timer: u32,
    #[serde(default)]
    pub prestige: u32,
    #[serde(default)]
    pub office: OfficeTier,
    #[serde(default)]
    pub speed: GameSpeed,
    #[serde(default)]
    pub granted_achievements: BTreeSet<AchievementId>,
    #[serde(default)]
    pub units_sold: u64,
    #[serde(default)]
    pub contracts_fulfilled: u32,
    /// One-shot gates so a threshold crossing logs once until re-armed.
    #[serde(default)]
    pub boom_flagged: bool,
    #[serde(default)]
    pub crash_flagged: bool,
    #[serde(default)]
    pub shortage_flagged: bool,
    #[serde(default)]
    pub rng_seed: u64,
}

impl GameState {
    /// A fresh company seeded from the catalog.
    pub fn new_game(catalog: &Catalog, seed: u64) -> Self {
        let founders = ["Ada Park", "Sam Idowu", "June Ko"];
        let mut researched = BTreeSet::new();
        for tech in catalog.tech.iter().filter(|t| t.tier == 0) {
            researched.insert(tech.id.clone());
        }
        let mut state = Self {
            day: 0,
            money: Decimal::new(12_000, 0),
            research_points: 0.0,
            silicon: 600,
            silicon_price: SILICON_BASE_PRICE,
            reputation: 10.0,
            inventory: PerProduct::splat(0),
            researched,
            global_tech_level: PerProduct::splat(0),
            era: Era::Garage,
            market_multiplier: 1.0,
            market_trend: MarketTrend::SteadyDemand,
            rival_launch: None,
            financial_history: VecDeque::new(),
            active_contracts: Vec::new(),
            available_contracts: Vec::new(),
            next_contract_id: 1,
            stocks: catalog.starting_stocks(),
            public_company: false,
            founder_shares_pct: 100.0,
            loans: Vec::new(),
            next_loan_id: 1,
            staff: founders
                .iter()
                .map(|name| Employee {
                    name: (*name).to_string(),
                    hired_day: 0,
                })
                .collect(),
            heroes: Vec::new(),
            morale: 70.0,
            work_policy: WorkPolicy::Normal,
            lines: vec![ProductionLine {
                id: 1,
                product: Product::CPU,
                status: LineStatus::Producing,
                base_daily_output: 10,
                specialization: LineSpecialization::Standard,
                efficiency: 100.0,
            }],
            next_line_id: 2,
            campaigns: Vec::new(),
            brand_awareness: PerProduct::splat(5.0),
            competitors: catalog.roster.iter().map(|c| c.spawn()).collect(),
            unlocked: BTreeSet::new(),
            log: VecDeque::new(),
            active_event: None,
            bankruptcy_timer: 0,
            prestige: 0,
            office: OfficeTier::Garage,
            speed: GameSpeed::Paused,
            granted_achievements: BTreeSet::new(),
            units_sold: 0,
            contracts_fulfilled: 0,
            boom_flagged: false,
            crash_flagged: false,
            shortage_flagged: false,
            rng_seed: seed,
        };
        state.push_log(Severity::Info, "Company founded in a garage.");
        state
    }

    /// Headcount, always derived from the staff list.
    pub fn staff_count(&self) -> usize {
        self.staff.len()
    }

    pub fn total_inventory(&self) -> u64 {
        self.inventory.cpu + self.inventory.gpu
    }

    /// The player's market share is never stored; it is whatever the rivals
    /// have not claimed.
    pub fn player_share(&self, product: Product) -> f32 {
        let rival_total: f32 = self
            .competitors
            .iter()
            .map(|c| *c.market_share.get(product))
            .sum();
        (100.0 - rival_total).clamp(0.0, 100.0)
    }

    /// Highest researched tier for a product; 0 when nothing is researched.
    pub fn tech_level(&self, product: Product, catalog: &Catalog) -> u8 {
        catalog
            .tech
            .iter()
            .filter(|t| t.product == product && self.researched.contains(&t.id))
            .map(|t| t.tier)
            .max()
            .unwrap_or(0)
    }

    pub fn has_hero_effect(&self, effect: HeroEffect, catalog: &Catalog) -> bool {
        self.heroes
            .iter()
            .filter_map(|h| catalog.hero_def(*h))
            .any(|def| def.effect == effect)
    }

    /// Demand factor a sale sees: era, trend, and any rival launch window.
    pub fn demand_modifier(&self, product: Product, catalog: &Catalog) -> f32 {
        let era = catalog
            .era_def(self.era)
            .map(|d| *d.demand.get(product))
            .unwrap_or(1.0);
        let trend = catalog
            .trend_def(self.market_trend)
            .map(|d| *d.demand.get(product))
            .unwrap_or(1.0);
        let launch = match &self.rival_launch {
            Some(launch) if launch.product == product => launch.demand_suppression,
            _ => 1.0,
        };
        era * trend * launch
    }

    /// Append a ticker entry, dropping the oldest past capacity.
    pub fn push_log(&mut self, severity: Severity, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(day = self.day, %severity, "{message}");
        self.log.push_back(LogEntry {
            day: self.day,
            severity,
            message,
        });
        while self.log.len() > LOG_CAP {
            self.log.pop_front();
        }
    }

    /// Record the end-of-day balance sample.
    pub fn push_financial_record(&mut self) {
        self.financial_history.push_back(FinancialRecord {
            day: self.day,
            money: self.money,
        });
        while self.financial_history.len() > FINANCIAL_HISTORY_CAP {
            self.financial_history.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::standard()
    }

    #[test]
    fn new_game_respects_invariants() {
        let state = GameState::new_game(&catalog(), 7);
        assert_eq!(state.day, 0);
        assert_eq!(state.staff_count(), 3);
        assert!(state.active_event.is_none());
        assert_eq!(state.speed, GameSpeed::Paused);
        for product in PRODUCTS {
            let share = state.player_share(product);
            assert!((0.0..=100.0).contains(&share));
        }
    }

    #[test]
    fn tier_zero_techs_are_preresearched() {
        let cat = catalog();
        let state = GameState::new_game(&cat, 7);
        assert_eq!(state.tech_level(Product::CPU, &cat), 0);
        assert!(state.researched.iter().any(|t| t.0.starts_with("cpu")));
        assert!(state.researched.iter().any(|t| t.0.starts_with("gpu")));
    }

    #[test]
    fn log_ring_drops_oldest() {
        let mut state = GameState::new_game(&catalog(), 7);
        for i in 0..(LOG_CAP + 10) {
            state.push_log(Severity::Info, format!("entry {i}"));
        }
        assert_eq!(state.log.len(), LOG_CAP);
        assert!(state.log.front().unwrap().message.contains("entry"));
    }

    #[test]
    fn serde_roundtrip_preserves_state() {
        let state = GameState::new_game(&catalog(), 7);
        let json = serde_json::to_string(&state).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, back);
    }

    #[test]
    fn missing_fields_default_additively() {
        // A bare object restores to an empty but well-formed state.
        let state: GameState = serde_json::from_str("{}").unwrap();
        assert_eq!(state.day, 0);
        assert_eq!(state.market_multiplier, 1.0);
        assert_eq!(state.silicon_price, SILICON_BASE_PRICE);
        assert_eq!(state.founder_shares_pct, 100.0);
        assert_eq!(state.speed, GameSpeed::Paused);
        assert!(state.staff.is_empty());
    }

    #[test]
    fn specialization_material_costs() {
        assert_eq!(LineSpecialization::Standard.material_per_unit(), 10);
        assert_eq!(LineSpecialization::Efficiency.material_per_unit(), 6);
        assert_eq!(LineSpecialization::Speed.output_multiplier(), 1.5);
        assert_eq!(LineSpecialization::Quality.output_multiplier(), 0.7);
    }
}
