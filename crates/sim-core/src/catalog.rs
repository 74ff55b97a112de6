//! Static reference data the engine consults: eras, market trends, tech
//! trees, the rival roster, narrative events, heroes, offices, feature
//! unlock thresholds, and the achievement table.
//!
//! The catalog is read-only at runtime. Tech trees are directed acyclic
//! graphs keyed by [`TechId`] with explicit prerequisite sets; nothing in the
//! engine indexes them positionally.

use crate::state::{
    AchievementId, Competitor, Era, EventId, Feature, Hero, MarketTrend, OfficeTier, PerProduct,
    Product, StockListing, TechId,
};
use rust_decimal::Decimal;
use std::collections::VecDeque;

/// A market era with a fixed start day and per-product demand modifiers.
#[derive(Clone, Debug)]
pub struct EraDef {
    pub era: Era,
    pub name: &'static str,
    pub start_day: u32,
    pub demand: PerProduct<f32>,
}

/// A market trend with demand modifiers and a silicon price modifier.
#[derive(Clone, Debug)]
pub struct TrendDef {
    pub trend: MarketTrend,
    pub name: &'static str,
    pub demand: PerProduct<f32>,
    pub silicon_modifier: f32,
}

/// One node of a product's technology DAG.
#[derive(Clone, Debug)]
pub struct TechDef {
    pub id: TechId,
    pub product: Product,
    pub tier: u8,
    pub name: &'static str,
    /// Unit sale price once this tier is the company's best.
    pub base_price: Decimal,
    pub rp_cost: f64,
    pub prereqs: Vec<TechId>,
}

/// Initial values for one rival company.
#[derive(Clone, Debug)]
pub struct CompetitorSeed {
    pub name: &'static str,
    pub aggressiveness: f32,
    pub quality: PerProduct<f32>,
    pub market_share: PerProduct<f32>,
}

impl CompetitorSeed {
    /// The mutable rival record a new game starts from.
    pub fn spawn(&self) -> Competitor {
        Competitor {
            name: self.name.to_string(),
            aggressiveness: self.aggressiveness,
            quality: self.quality,
            tech_level: PerProduct::splat(0),
            market_share: self.market_share,
        }
    }
}

/// A narrative event the injection step may activate.
#[derive(Clone, Debug)]
pub struct EventDef {
    pub id: EventId,
    pub title: &'static str,
    pub message: &'static str,
    /// Earliest era in which the event can fire.
    pub min_era: Era,
    /// Silicon price modifier while the event lingers.
    pub silicon_modifier: f32,
    /// Days the effect persists after acknowledgement; 0 = narrative only.
    pub duration_days: u32,
}

/// Passive effect a hero provides while on the payroll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeroEffect {
    ResearchDoubling,
    VolatilityDamping,
    SalaryDiscount,
}

#[derive(Clone, Debug)]
pub struct HeroDef {
    pub hero: Hero,
    pub name: &'static str,
    pub daily_upkeep: Decimal,
    pub effect: HeroEffect,
}

#[derive(Clone, Debug)]
pub struct OfficeDef {
    pub tier: OfficeTier,
    pub name: &'static str,
    pub weekly_rent: Decimal,
    pub staff_capacity: usize,
}

/// A cash milestone that one-way-unlocks a feature.
#[derive(Clone, Debug)]
pub struct UnlockDef {
    pub feature: Feature,
    pub cash_threshold: Decimal,
}

/// Achievement conditions, evaluated against the whole state.
#[derive(Clone, Debug)]
pub enum Predicate {
    MoneyAtLeast(Decimal),
    StaffAtLeast(usize),
    TechTierAtLeast(Product, u8),
    UnitsSoldAtLeast(u64),
    ContractsFulfilledAtLeast(u32),
    AwarenessAtLeast(f32),
    EraReached(Era),
    PublicCompany,
}

#[derive(Clone, Debug)]
pub struct AchievementReward {
    pub money: Decimal,
    pub research_points: f64,
    pub reputation: f32,
}

#[derive(Clone, Debug)]
pub struct AchievementDef {
    pub id: AchievementId,
    pub name: &'static str,
    pub predicate: Predicate,
    pub reward: AchievementReward,
}

/// The full static catalog.
#[derive(Clone, Debug)]
pub struct Catalog {
    pub eras: Vec<EraDef>,
    pub trends: Vec<TrendDef>,
    pub tech: Vec<TechDef>,
    pub roster: Vec<CompetitorSeed>,
    pub events: Vec<EventDef>,
    pub heroes: Vec<HeroDef>,
    pub offices: Vec<OfficeDef>,
    pub unlocks: Vec<UnlockDef>,
    pub achievements: Vec<AchievementDef>,
}

fn tech(
    id: &str,
    product: Product,
    tier: u8,
    name: &'static str,
    base_price: i64,
    rp_cost: f64,
    prereqs: &[&str],
) -> TechDef {
    TechDef {
        id: TechId(id.to_string()),
        product,
        tier,
        name,
        base_price: Decimal::new(base_price, 0),
        rp_cost,
        prereqs: prereqs.iter().map(|p| TechId((*p).to_string())).collect(),
    }
}

impl Catalog {
    /// The standard campaign catalog.
    pub fn standard() -> Self {
        let eras = vec![
            EraDef {
                era: Era::Garage,
                name: "Garage Days",
                start_day: 0,
                demand: PerProduct { cpu: 1.0, gpu: 0.8 },
            },
            EraDef {
                era: Era::PersonalComputing,
                name: "Personal Computing",
                start_day: 60,
                demand: PerProduct { cpu: 1.2, gpu: 1.0 },
            },
            EraDef {
                era: Era::InternetBoom,
                name: "Internet Boom",
                start_day: 150,
                demand: PerProduct { cpu: 1.3, gpu: 1.2 },
            },
            EraDef {
                era: Era::MobileWave,
                name: "Mobile Wave",
                start_day: 270,
                demand: PerProduct { cpu: 1.1, gpu: 1.3 },
            },
            EraDef {
                era: Era::AiGold,
                name: "AI Gold Rush",
                start_day: 400,
                demand: PerProduct { cpu: 1.2, gpu: 1.6 },
            },
        ];

        let trends = vec![
            TrendDef {
                trend: MarketTrend::SteadyDemand,
                name: "Steady demand",
                demand: PerProduct { cpu: 1.0, gpu: 1.0 },
                silicon_modifier: 1.0,
            },
            TrendDef {
                trend: MarketTrend::PerformanceCraze,
                name: "Performance craze",
                demand: PerProduct { cpu: 1.25, gpu: 1.1 },
                silicon_modifier: 1.1,
            },
            TrendDef {
                trend: MarketTrend::EfficiencyPush,
                name: "Efficiency push",
                demand: PerProduct { cpu: 0.9, gpu: 0.9 },
                silicon_modifier: 0.85,
            },
            TrendDef {
                trend: MarketTrend::GamingBoom,
                name: "Gaming boom",
                demand: PerProduct {
                    cpu: 1.05,
                    gpu: 1.35,
                },
                silicon_modifier: 1.05,
            },
            TrendDef {
                trend: MarketTrend::CryptoSurge,
                name: "Crypto surge",
                demand: PerProduct { cpu: 0.95, gpu: 1.5 },
                silicon_modifier: 1.2,
            },
        ];

        let tech = vec![
            tech("cpu-8bit", Product::CPU, 0, "8-bit core", 60, 0.0, &[]),
            tech(
                "cpu-16bit",
                Product::CPU,
                1,
                "16-bit core",
                110,
                150.0,
                &["cpu-8bit"],
            ),
            tech(
                "cpu-32bit",
                Product::CPU,
                2,
                "32-bit core",
                190,
                400.0,
                &["cpu-16bit"],
            ),
            tech(
                "cpu-superscalar",
                Product::CPU,
                3,
                "Superscalar pipeline",
                320,
                900.0,
                &["cpu-32bit"],
            ),
            tech(
                "cpu-multicore",
                Product::CPU,
                4,
                "Multicore die",
                540,
                2000.0,
                &["cpu-superscalar"],
            ),
            // Cross-branch prerequisite: the neural tier needs shader know-how.
            tech(
                "cpu-neural",
                Product::CPU,
                5,
                "Neural accelerator",
                900,
                4500.0,
                &["cpu-multicore", "gpu-shader"],
            ),
            tech(
                "gpu-framebuffer",
                Product::GPU,
                0,
                "Framebuffer card",
                50,
                0.0,
                &[],
            ),
            tech(
                "gpu-blitter",
                Product::GPU,
                1,
                "2D blitter",
                95,
                140.0,
                &["gpu-framebuffer"],
            ),
            tech(
                "gpu-3d",
                Product::GPU,
                2,
                "3D rasterizer",
                170,
                380.0,
                &["gpu-blitter"],
            ),
            tech(
                "gpu-shader",
                Product::GPU,
                3,
                "Programmable shaders",
                300,
                850.0,
                &["gpu-3d"],
            ),
            tech(
                "gpu-gpgpu",
                Product::GPU,
                4,
                "GPGPU compute",
                520,
                1900.0,
                &["gpu-shader", "cpu-32bit"],
            ),
            tech(
                "gpu-raytracer",
                Product::GPU,
                5,
                "Hardware ray tracing",
                880,
                4200.0,
                &["gpu-gpgpu"],
            ),
        ];

        let roster = vec![
            CompetitorSeed {
                name: "Macrochip Systems",
                aggressiveness: 0.8,
                quality: PerProduct {
                    cpu: 26.0,
                    gpu: 22.0,
                },
                market_share: PerProduct {
                    cpu: 24.0,
                    gpu: 26.0,
                },
            },
            CompetitorSeed {
                name: "Orchard Computing",
                aggressiveness: 0.55,
                quality: PerProduct {
                    cpu: 22.0,
                    gpu: 18.0,
                },
                market_share: PerProduct {
                    cpu: 20.0,
                    gpu: 18.0,
                },
            },
            CompetitorSeed {
                name: "Helios Semiconductor",
                aggressiveness: 0.7,
                quality: PerProduct {
                    cpu: 24.0,
                    gpu: 26.0,
                },
                market_share: PerProduct {
                    cpu: 22.0,
                    gpu: 24.0,
                },
            },
            CompetitorSeed {
                name: "Kasumi Electronics",
                aggressiveness: 0.4,
                quality: PerProduct {
                    cpu: 18.0,
                    gpu: 20.0,
                },
                market_share: PerProduct {
                    cpu: 18.0,
                    gpu: 20.0,
                },
            },
        ];

        let events = vec![
            EventDef {
                id: EventId::ChipShortage,
                title: "Packaging backlog",
                message: "A substrate supplier halts shipments; spot silicon spikes.",
                min_era: Era::Garage,
                silicon_modifier: 1.35,
                duration_days: 8,
            },
            EventDef {
                id: EventId::ViralReview,
                title: "Viral teardown",
                message: "A magazine teardown of your board goes viral overnight.",
                min_era: Era::Garage,
                silicon_modifier: 1.0,
                duration_days: 0,
            },
            EventDef {
                id: EventId::TradeWar,
                title: "Tariff escalation",
                message: "New tariffs hit imported wafers.",
                min_era: Era::PersonalComputing,
                silicon_modifier: 1.25,
                duration_days: 12,
            },
            EventDef {
                id: EventId::PatentDispute,
                title: "Patent dispute",
                message: "A rival claims your pipeline infringes their patent.",
                min_era: Era::PersonalComputing,
                silicon_modifier: 1.0,
                duration_days: 0,
            },
            EventDef {
                id: EventId::DatacenterBoom,
                title: "Datacenter build-out",
                message: "Hyperscalers are buying every die on the market.",
                min_era: Era::InternetBoom,
                silicon_modifier: 1.15,
                duration_days: 10,
            },
            EventDef {
                id: EventId::SolarFlare,
                title: "Solar flare",
                message: "A solar storm forces fabs to recalibrate steppers.",
                min_era: Era::MobileWave,
                silicon_modifier: 1.1,
                duration_days: 5,
            },
        ];

        let heroes = vec![
            HeroDef {
                hero: Hero::Visionary,
                name: "Dr. Mira Chen",
                daily_upkeep: Decimal::new(400, 0),
                effect: HeroEffect::ResearchDoubling,
            },
            HeroDef {
                hero: Hero::Quant,
                name: "Ansel Brody",
                daily_upkeep: Decimal::new(250, 0),
                effect: HeroEffect::VolatilityDamping,
            },
            HeroDef {
                hero: Hero::Operator,
                name: "Greta Volkov",
                daily_upkeep: Decimal::new(300, 0),
                effect: HeroEffect::SalaryDiscount,
            },
        ];

        let offices = vec![
            OfficeDef {
                tier: OfficeTier::Garage,
                name: "The garage",
                weekly_rent: Decimal::ZERO,
                staff_capacity: 4,
            },
            OfficeDef {
                tier: OfficeTier::Loft,
                name: "Downtown loft",
                weekly_rent: Decimal::new(700, 0),
                staff_capacity: 15,
            },
            OfficeDef {
                tier: OfficeTier::Tower,
                name: "Office tower",
                weekly_rent: Decimal::new(3_000, 0),
                staff_capacity: 40,
            },
            OfficeDef {
                tier: OfficeTier::Campus,
                name: "Corporate campus",
                weekly_rent: Decimal::new(12_000, 0),
                staff_capacity: 120,
            },
        ];

        let unlocks = vec![
            UnlockDef {
                feature: Feature::Loans,
                cash_threshold: Decimal::new(10_000, 0),
            },
            UnlockDef {
                feature: Feature::Contracts,
                cash_threshold: Decimal::new(20_000, 0),
            },
            UnlockDef {
                feature: Feature::Marketing,
                cash_threshold: Decimal::new(50_000, 0),
            },
            UnlockDef {
                feature: Feature::StockMarket,
                cash_threshold: Decimal::new(100_000, 0),
            },
            UnlockDef {
                feature: Feature::CovertOps,
                cash_threshold: Decimal::new(250_000, 0),
            },
        ];

        let achievements = vec![
            AchievementDef {
                id: AchievementId::FirstShipment,
                name: "First shipment",
                predicate: Predicate::UnitsSoldAtLeast(1),
                reward: AchievementReward {
                    money: Decimal::new(1_000, 0),
                    research_points: 0.0,
                    reputation: 1.0,
                },
            },
            AchievementDef {
                id: AchievementId::SixFigures,
                name: "Six figures",
                predicate: Predicate::MoneyAtLeast(Decimal::new(100_000, 0)),
                reward: AchievementReward {
                    money: Decimal::ZERO,
                    research_points: 0.0,
                    reputation: 5.0,
                },
            },
            AchievementDef {
                id: AchievementId::FullFloor,
                name: "Full floor",
                predicate: Predicate::StaffAtLeast(10),
                reward: AchievementReward {
                    money: Decimal::new(5_000, 0),
                    research_points: 0.0,
                    reputation: 0.0,
                },
            },
            AchievementDef {
                id: AchievementId::StateOfTheArt,
                name: "State of the art",
                predicate: Predicate::TechTierAtLeast(Product::CPU, 5),
                reward: AchievementReward {
                    money: Decimal::ZERO,
                    research_points: 500.0,
                    reputation: 5.0,
                },
            },
            AchievementDef {
                id: AchievementId::PublicDebut,
                name: "Public debut",
                predicate: Predicate::PublicCompany,
                reward: AchievementReward {
                    money: Decimal::ZERO,
                    research_points: 0.0,
                    reputation: 10.0,
                },
            },
            AchievementDef {
                id: AchievementId::DealMaker,
                name: "Deal maker",
                predicate: Predicate::ContractsFulfilledAtLeast(10),
                reward: AchievementReward {
                    money: Decimal::new(25_000, 0),
                    research_points: 0.0,
                    reputation: 3.0,
                },
            },
            AchievementDef {
                id: AchievementId::HouseholdName,
                name: "Household name",
                predicate: Predicate::AwarenessAtLeast(80.0),
                reward: AchievementReward {
                    money: Decimal::ZERO,
                    research_points: 0.0,
                    reputation: 5.0,
                },
            },
            AchievementDef {
                id: AchievementId::LongGame,
                name: "The long game",
                predicate: Predicate::EraReached(Era::MobileWave),
                reward: AchievementReward {
                    money: Decimal::ZERO,
                    research_points: 200.0,
                    reputation: 2.0,
                },
            },
        ];

        Self {
            eras,
            trends,
            tech,
            roster,
            events,
            heroes,
            offices,
            unlocks,
            achievements,
        }
    }

    /// Era in effect on a given day (latest era whose start day has passed).
    pub fn era_for_day(&self, day: u32) -> Era {
        self.eras
            .iter()
            .filter(|e| e.start_day <= day)
            .max_by_key(|e| e.start_day)
            .map(|e| e.era)
            .unwrap_or_default()
    }

    pub fn era_def(&self, era: Era) -> Option<&EraDef> {
        self.eras.iter().find(|e| e.era == era)
    }

    pub fn trend_def(&self, trend: MarketTrend) -> Option<&TrendDef> {
        self.trends.iter().find(|t| t.trend == trend)
    }

    pub fn tech_def(&self, id: &TechId) -> Option<&TechDef> {
        self.tech.iter().find(|t| &t.id == id)
    }

    /// Highest tier present in a product's tree.
    pub fn max_tier(&self, product: Product) -> u8 {
        self.tech
            .iter()
            .filter(|t| t.product == product)
            .map(|t| t.tier)
            .max()
            .unwrap_or(0)
    }

    /// Unit base price at a tech tier, falling back to the nearest tier below.
    pub fn tier_price(&self, product: Product, tier: u8) -> Decimal {
        self.tech
            .iter()
            .filter(|t| t.product == product && t.tier <= tier)
            .max_by_key(|t| t.tier)
            .map(|t| t.base_price)
            .unwrap_or(Decimal::new(50, 0))
    }

    pub fn hero_def(&self, hero: Hero) -> Option<&HeroDef> {
        self.heroes.iter().find(|h| h.hero == hero)
    }

    pub fn office_def(&self, tier: OfficeTier) -> Option<&OfficeDef> {
        self.offices.iter().find(|o| o.tier == tier)
    }

    /// Exchange listings a new game opens with, derived from the roster.
    pub fn starting_stocks(&self) -> Vec<StockListing> {
        self.roster
            .iter()
            .map(|seed| {
                let symbol: String = seed
                    .name
                    .chars()
                    .filter(|c| c.is_ascii_alphabetic())
                    .take(4)
                    .collect::<String>()
                    .to_ascii_uppercase();
                let price = Decimal::new(20 + (seed.aggressiveness * 40.0) as i64, 0);
                StockListing {
                    symbol,
                    company: seed.name.to_string(),
                    price,
                    volatility: 0.02 + seed.aggressiveness * 0.04,
                    owned: 0,
                    history: VecDeque::from([price]),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn era_lookup_is_deterministic() {
        let cat = Catalog::standard();
        assert_eq!(cat.era_for_day(0), Era::Garage);
        assert_eq!(cat.era_for_day(59), Era::Garage);
        assert_eq!(cat.era_for_day(60), Era::PersonalComputing);
        assert_eq!(cat.era_for_day(9999), Era::AiGold);
    }

    #[test]
    fn tech_trees_cap_at_tier_five() {
        let cat = Catalog::standard();
        assert_eq!(cat.max_tier(Product::CPU), 5);
        assert_eq!(cat.max_tier(Product::GPU), 5);
    }

    #[test]
    fn tier_price_falls_back_to_lower_tier() {
        let cat = Catalog::standard();
        let t2 = cat.tier_price(Product::CPU, 2);
        assert_eq!(t2, Decimal::new(190, 0));
        // Tier 200 does not exist; highest defined tier answers.
        assert_eq!(cat.tier_price(Product::CPU, 200), Decimal::new(900, 0));
    }

    #[test]
    fn cross_branch_prereqs_reference_real_nodes() {
        let cat = Catalog::standard();
        for def in &cat.tech {
            for prereq in &def.prereqs {
                assert!(cat.tech_def(prereq).is_some(), "missing prereq {prereq}");
            }
        }
    }

    #[test]
    fn starting_stocks_match_roster() {
        let cat = Catalog::standard();
        let stocks = cat.starting_stocks();
        assert_eq!(stocks.len(), cat.roster.len());
        assert!(stocks.iter().all(|s| s.price >= Decimal::ONE));
        assert!(stocks.iter().all(|s| s.symbol.len() == 4));
    }
}
