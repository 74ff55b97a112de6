//! Player actions: immediate state edits applied between ticks.
//!
//! Each handler either applies completely or returns a typed error and
//! leaves the state untouched; resource checks come before any mutation,
//! and every handler upholds the same invariants the tick does.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use sim_core::{
    reputation_bonus, Campaign, Catalog, Employee, Feature, GameState, Hero, LineSpecialization,
    LineStatus, Loan, Product, ProductionLine, Severity, StockListing, TechId, WorkPolicy,
};
use std::collections::VecDeque;
use thiserror::Error;

const LINE_BUILD_COST: i64 = 5_000;
const LINE_RETOOL_COST: i64 = 2_000;
const LINE_MAINTENANCE_COST: i64 = 500;
const CAMPAIGN_DAILY_COST: i64 = 800;
const CAMPAIGN_DAILY_AWARENESS: f32 = 2.0;
const LOAN_INTEREST: f32 = 0.2;
const COVERT_OP_COST: i64 = 10_000;
const IPO_BASE_PROCEEDS: i64 = 250_000;
const IPO_FOUNDER_PCT: f32 = 70.0;

/// Why an action was refused. Nothing is partially applied on error.
#[derive(Debug, Error, PartialEq)]
pub enum ActionError {
    #[error("insufficient funds: need ${needed}, have ${available}")]
    InsufficientFunds { needed: Decimal, available: Decimal },
    #[error("insufficient inventory: need {needed}, have {available}")]
    InsufficientInventory { needed: u64, available: u64 },
    #[error("insufficient research points: need {needed}, have {available}")]
    InsufficientResearch { needed: f64, available: f64 },
    #[error("{0} is not unlocked yet")]
    FeatureLocked(Feature),
    #[error("unknown tech: {0}")]
    UnknownTech(TechId),
    #[error("already researched: {0}")]
    AlreadyResearched(TechId),
    #[error("prerequisite not researched: {0}")]
    MissingPrereq(TechId),
    #[error("the office is at capacity")]
    OfficeFull,
    #[error("the target office cannot hold the current staff")]
    OfficeTooSmall,
    #[error("nobody left to let go")]
    NoStaff,
    #[error("hero is already on the payroll")]
    HeroAlreadyHired,
    #[error("hero is not on the payroll")]
    HeroNotHired,
    #[error("no such contract")]
    NoSuchContract,
    #[error("no such loan")]
    NoSuchLoan,
    #[error("no such stock symbol")]
    NoSuchStock,
    #[error("not enough shares: need {needed}, have {available}")]
    InsufficientShares { needed: u64, available: u64 },
    #[error("no such production line")]
    NoSuchLine,
    #[error("no such competitor")]
    NoSuchCompetitor,
    #[error("the company is already public")]
    AlreadyPublic,
    #[error("no active event to dismiss")]
    NoActiveEvent,
    #[error("argument out of range")]
    BadArgument,
    #[error("non-finite numeric conversion")]
    NonFinite,
}

fn require_unlocked(state: &GameState, feature: Feature) -> Result<(), ActionError> {
    if state.unlocked.contains(&feature) {
        Ok(())
    } else {
        Err(ActionError::FeatureLocked(feature))
    }
}

fn charge(state: &mut GameState, amount: Decimal) -> Result<(), ActionError> {
    if state.money < amount {
        return Err(ActionError::InsufficientFunds {
            needed: amount,
            available: state.money,
        });
    }
    state.money -= amount;
    Ok(())
}

fn decimal_from(value: f32) -> Result<Decimal, ActionError> {
    Decimal::from_f32(value).ok_or(ActionError::NonFinite)
}

/// Hire one engineer, bounded by the office's capacity.
pub fn hire_staff(state: &mut GameState, catalog: &Catalog) -> Result<(), ActionError> {
    let capacity = catalog
        .office_def(state.office)
        .map(|o| o.staff_capacity)
        .unwrap_or(0);
    if state.staff_count() >= capacity {
        return Err(ActionError::OfficeFull);
    }
    let name = format!("Engineer #{:02}", state.staff_count() + 1);
    state.staff.push(Employee {
        name: name.clone(),
        hired_day: state.day,
    });
    state.push_log(Severity::Info, format!("{name} joined the team."));
    Ok(())
}

/// Let the most recent hire go. Costs a little morale.
pub fn fire_staff(state: &mut GameState) -> Result<(), ActionError> {
    let leaver = state.staff.pop().ok_or(ActionError::NoStaff)?;
    state.morale = (state.morale - 2.0).clamp(0.0, 100.0);
    state.push_log(Severity::Info, format!("{} was let go.", leaver.name));
    Ok(())
}

pub fn set_work_policy(state: &mut GameState, policy: WorkPolicy) {
    state.work_policy = policy;
}

pub fn hire_hero(state: &mut GameState, catalog: &Catalog, hero: Hero) -> Result<(), ActionError> {
    if state.heroes.contains(&hero) {
        return Err(ActionError::HeroAlreadyHired);
    }
    let name = catalog
        .hero_def(hero)
        .map(|d| d.name)
        .unwrap_or("A specialist");
    state.heroes.push(hero);
    state.push_log(Severity::Info, format!("{name} signed on."));
    Ok(())
}

pub fn dismiss_hero(state: &mut GameState, hero: Hero) -> Result<(), ActionError> {
    let pos = state
        .heroes
        .iter()
        .position(|h| *h == hero)
        .ok_or(ActionError::HeroNotHired)?;
    state.heroes.remove(pos);
    Ok(())
}

/// Buy silicon at spot, with the reputation material discount applied.
pub fn buy_silicon(
    state: &mut GameState,
    units: u64,
) -> Result<Decimal, ActionError> {
    if units == 0 {
        return Err(ActionError::BadArgument);
    }
    let discount = reputation_bonus(state.reputation).material_discount;
    let unit_price = decimal_from(state.silicon_price * (1.0 - discount))?;
    let cost = (unit_price * Decimal::from(units)).round_dp(2);
    charge(state, cost)?;
    state.silicon += units;
    Ok(cost)
}

/// Build a new idle production line for a product.
pub fn add_line(state: &mut GameState, product: Product) -> Result<u32, ActionError> {
    charge(state, Decimal::new(LINE_BUILD_COST, 0))?;
    let id = state.next_line_id;
    state.next_line_id += 1;
    state.lines.push(ProductionLine {
        id,
        product,
        status: LineStatus::Idle,
        base_daily_output: 10,
        specialization: LineSpecialization::Standard,
        efficiency: 100.0,
    });
    state.push_log(Severity::Info, format!("New {product} line built."));
    Ok(id)
}

fn line_mut(state: &mut GameState, line_id: u32) -> Result<&mut ProductionLine, ActionError> {
    state
        .lines
        .iter_mut()
        .find(|l| l.id == line_id)
        .ok_or(ActionError::NoSuchLine)
}

pub fn set_line_status(
    state: &mut GameState,
    line_id: u32,
    status: LineStatus,
) -> Result<(), ActionError> {
    line_mut(state, line_id)?.status = status;
    Ok(())
}

pub fn retool_line(
    state: &mut GameState,
    line_id: u32,
    specialization: LineSpecialization,
) -> Result<(), ActionError> {
    line_mut(state, line_id)?;
    charge(state, Decimal::new(LINE_RETOOL_COST, 0))?;
    line_mut(state, line_id)?.specialization = specialization;
    Ok(())
}

/// Service a line back to full efficiency.
pub fn maintain_line(state: &mut GameState, line_id: u32) -> Result<(), ActionError> {
    line_mut(state, line_id)?;
    charge(state, Decimal::new(LINE_MAINTENANCE_COST, 0))?;
    line_mut(state, line_id)?.efficiency = 100.0;
    Ok(())
}

/// Research a tech node, enforcing the DAG's prerequisite set.
pub fn research(
    state: &mut GameState,
    catalog: &Catalog,
    tech: &TechId,
) -> Result<(), ActionError> {
    let def = catalog
        .tech_def(tech)
        .ok_or_else(|| ActionError::UnknownTech(tech.clone()))?;
    if state.researched.contains(tech) {
        return Err(ActionError::AlreadyResearched(tech.clone()));
    }
    for prereq in &def.prereqs {
        if !state.researched.contains(prereq) {
            return Err(ActionError::MissingPrereq(prereq.clone()));
        }
    }
    if state.research_points < def.rp_cost {
        return Err(ActionError::InsufficientResearch {
            needed: def.rp_cost,
            available: state.research_points,
        });
    }
    state.research_points -= def.rp_cost;
    state.researched.insert(tech.clone());
    state.push_log(Severity::Info, format!("Research complete: {}.", def.name));
    Ok(())
}

/// Accept an offered contract: it moves to the active list exactly once.
pub fn accept_contract(state: &mut GameState, contract_id: u64) -> Result<(), ActionError> {
    require_unlocked(state, Feature::Contracts)?;
    let pos = state
        .available_contracts
        .iter()
        .position(|c| c.id == contract_id)
        .ok_or(ActionError::NoSuchContract)?;
    let contract = state.available_contracts.remove(pos);
    state.push_log(
        Severity::Info,
        format!("Contract #{} accepted.", contract.id),
    );
    state.active_contracts.push(contract);
    Ok(())
}

/// Deliver on an active contract from inventory.
pub fn fulfill_contract(state: &mut GameState, contract_id: u64) -> Result<Decimal, ActionError> {
    let pos = state
        .active_contracts
        .iter()
        .position(|c| c.id == contract_id)
        .ok_or(ActionError::NoSuchContract)?;
    let (product, units, reward) = {
        let c = &state.active_contracts[pos];
        (c.product, c.units, c.reward)
    };
    let stock = *state.inventory.get(product);
    if stock < units {
        return Err(ActionError::InsufficientInventory {
            needed: units,
            available: stock,
        });
    }
    *state.inventory.get_mut(product) -= units;
    let bonus = reputation_bonus(state.reputation).contract;
    let payout = (reward * decimal_from(bonus)?).round_dp(2);
    state.money += payout;
    state.reputation = (state.reputation + 2.0).clamp(0.0, 100.0);
    state.contracts_fulfilled += 1;
    state.active_contracts.remove(pos);
    state.push_log(
        Severity::Info,
        format!("Contract #{contract_id} delivered for ${payout}."),
    );
    Ok(payout)
}

/// Sell finished units on the open market.
pub fn sell_units(
    state: &mut GameState,
    catalog: &Catalog,
    product: Product,
    units: u64,
) -> Result<Decimal, ActionError> {
    if units == 0 {
        return Err(ActionError::BadArgument);
    }
    let stock = *state.inventory.get(product);
    if stock < units {
        return Err(ActionError::InsufficientInventory {
            needed: units,
            available: stock,
        });
    }
    let tier = state.tech_level(product, catalog);
    let base = catalog.tier_price(product, tier);
    let multiplier = reputation_bonus(state.reputation).price
        * state.market_multiplier
        * state.demand_modifier(product, catalog);
    let unit_price = (base * decimal_from(multiplier)?).round_dp(2);
    let revenue = unit_price * Decimal::from(units);
    *state.inventory.get_mut(product) -= units;
    state.money += revenue;
    state.units_sold += units;
    state.push_log(
        Severity::Info,
        format!("Sold {units} x {product} at ${unit_price} each."),
    );
    Ok(revenue)
}

/// Run a marketing campaign; the whole spend is prepaid.
pub fn launch_campaign(
    state: &mut GameState,
    product: Product,
    days: u32,
) -> Result<(), ActionError> {
    require_unlocked(state, Feature::Marketing)?;
    if days == 0 {
        return Err(ActionError::BadArgument);
    }
    let cost = Decimal::new(CAMPAIGN_DAILY_COST, 0) * Decimal::from(days);
    charge(state, cost)?;
    state.campaigns.push(Campaign {
        product,
        remaining_days: days,
        daily_awareness: CAMPAIGN_DAILY_AWARENESS,
    });
    state.push_log(
        Severity::Info,
        format!("{days}-day {product} campaign launched for ${cost}."),
    );
    Ok(())
}

/// Take a loan repaid in fixed daily installments with 20% flat interest.
pub fn take_loan(
    state: &mut GameState,
    principal: Decimal,
    days: u32,
) -> Result<u32, ActionError> {
    require_unlocked(state, Feature::Loans)?;
    if days == 0 || principal <= Decimal::ZERO {
        return Err(ActionError::BadArgument);
    }
    let total = principal * decimal_from(1.0 + LOAN_INTEREST)?;
    let daily_payment = (total / Decimal::from(days)).round_dp(2);
    let id = state.next_loan_id;
    state.next_loan_id += 1;
    state.loans.push(Loan {
        id,
        principal,
        daily_payment,
        remaining_days: days,
    });
    state.money += principal;
    state.push_log(
        Severity::Info,
        format!("Loan #{id}: ${principal} over {days} days, ${daily_payment}/day."),
    );
    Ok(id)
}

/// Pay a loan off early at the remaining installment value.
pub fn repay_loan(state: &mut GameState, loan_id: u32) -> Result<(), ActionError> {
    let pos = state
        .loans
        .iter()
        .position(|l| l.id == loan_id)
        .ok_or(ActionError::NoSuchLoan)?;
    let payoff = state.loans[pos].daily_payment * Decimal::from(state.loans[pos].remaining_days);
    charge(state, payoff)?;
    state.loans.remove(pos);
    state.push_log(
        Severity::Info,
        format!("Loan #{loan_id} settled early for ${payoff}."),
    );
    Ok(())
}

fn stock_mut<'a>(
    state: &'a mut GameState,
    symbol: &str,
) -> Result<&'a mut StockListing, ActionError> {
    state
        .stocks
        .iter_mut()
        .find(|s| s.symbol == symbol)
        .ok_or(ActionError::NoSuchStock)
}

pub fn buy_stock(state: &mut GameState, symbol: &str, shares: u64) -> Result<(), ActionError> {
    require_unlocked(state, Feature::StockMarket)?;
    if shares == 0 {
        return Err(ActionError::BadArgument);
    }
    let cost = stock_mut(state, symbol)?.price * Decimal::from(shares);
    charge(state, cost)?;
    stock_mut(state, symbol)?.owned += shares;
    Ok(())
}

pub fn sell_stock(state: &mut GameState, symbol: &str, shares: u64) -> Result<(), ActionError> {
    require_unlocked(state, Feature::StockMarket)?;
    if shares == 0 {
        return Err(ActionError::BadArgument);
    }
    let listing = stock_mut(state, symbol)?;
    if listing.owned < shares {
        return Err(ActionError::InsufficientShares {
            needed: shares,
            available: listing.owned,
        });
    }
    listing.owned -= shares;
    let proceeds = listing.price * Decimal::from(shares);
    state.money += proceeds;
    Ok(())
}

/// Go public: cash in on the current market mood, give up 30% of the company.
pub fn ipo(state: &mut GameState) -> Result<Decimal, ActionError> {
    require_unlocked(state, Feature::StockMarket)?;
    if state.public_company {
        return Err(ActionError::AlreadyPublic);
    }
    let proceeds =
        (Decimal::new(IPO_BASE_PROCEEDS, 0) * decimal_from(state.market_multiplier)?).round_dp(2);
    state.public_company = true;
    state.founder_shares_pct = IPO_FOUNDER_PCT;
    state.money += proceeds;
    let price = Decimal::new(25, 0);
    state.stocks.push(StockListing {
        symbol: "MGNT".to_string(),
        company: "Silicon Magnate".to_string(),
        price,
        volatility: 0.06,
        owned: 0,
        history: VecDeque::from([price]),
    });
    state.push_log(
        Severity::Info,
        format!("IPO complete: raised ${proceeds}."),
    );
    Ok(proceeds)
}

/// Apply the outcome of a covert operation. The mini-game that decides
/// `success` runs outside the engine.
pub fn resolve_covert_op(
    state: &mut GameState,
    target: &str,
    success: bool,
) -> Result<(), ActionError> {
    require_unlocked(state, Feature::CovertOps)?;
    if !state.competitors.iter().any(|c| c.name == target) {
        return Err(ActionError::NoSuchCompetitor);
    }
    charge(state, Decimal::new(COVERT_OP_COST, 0))?;
    if success {
        for competitor in state.competitors.iter_mut().filter(|c| c.name == target) {
            competitor.quality.cpu = (competitor.quality.cpu - 3.0).max(0.0);
            competitor.quality.gpu = (competitor.quality.gpu - 3.0).max(0.0);
        }
        state.research_points += 150.0;
        state.push_log(
            Severity::Info,
            format!("Covert op against {target} paid off."),
        );
    } else {
        state.reputation = (state.reputation - 10.0).clamp(0.0, 100.0);
        state.push_log(
            Severity::Warning,
            format!("Covert op against {target} was exposed."),
        );
    }
    Ok(())
}

/// Move into a bigger (or smaller) office; the new landlord takes a deposit.
pub fn upgrade_office(
    state: &mut GameState,
    catalog: &Catalog,
    tier: sim_core::OfficeTier,
) -> Result<(), ActionError> {
    if tier == state.office {
        return Err(ActionError::BadArgument);
    }
    let def = catalog.office_def(tier).ok_or(ActionError::BadArgument)?;
    if def.staff_capacity < state.staff_count() {
        return Err(ActionError::OfficeTooSmall);
    }
    let deposit = def.weekly_rent * Decimal::from(4u32);
    charge(state, deposit)?;
    state.office = tier;
    state.push_log(Severity::Info, format!("Moved into {}.", def.name));
    Ok(())
}

/// Acknowledge the active event so the scheduler can resume. Narrative-only
/// events clear immediately; ones with a lasting effect linger as passive
/// modifiers until the market step retires them.
pub fn dismiss_event(state: &mut GameState) -> Result<(), ActionError> {
    let event = state
        .active_event
        .as_mut()
        .ok_or(ActionError::NoActiveEvent)?;
    event.acknowledged = true;
    if event.remaining_days == 0 {
        state.active_event = None;
    }
    Ok(())
}
