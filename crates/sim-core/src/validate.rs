//! Invariant validation for catalogs and game states.
//!
//! The engine itself keeps every field in band via clamping; validation exists
//! for catalog authoring mistakes and for snapshots arriving from outside the
//! process.

use crate::catalog::Catalog;
use crate::consts::{MARKET_MULT_MAX, MARKET_MULT_MIN, SILICON_PRICE_MAX, SILICON_PRICE_MIN};
use crate::state::{GameState, PRODUCTS};
use std::collections::BTreeSet;
use thiserror::Error;

/// Violations of documented invariants.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A clamped field escaped its band.
    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfBand {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
    /// Duplicate tech id in the catalog.
    #[error("duplicate tech id: {0}")]
    DuplicateTech(String),
    /// A prerequisite references a tech that does not exist.
    #[error("tech prerequisite not found: {0}")]
    PrereqNotFound(String),
    /// Eras must start at day 0 and be listed in ascending start order.
    #[error("era table is not ascending from day 0")]
    BadEraTable,
    /// Fewer than two trends makes reassignment impossible.
    #[error("trend table needs at least two entries")]
    TooFewTrends,
    /// A researched tech id is not in the catalog.
    #[error("researched tech not in catalog: {0}")]
    UnknownResearch(String),
    /// A contract appears in both the active and available lists.
    #[error("contract {0} is both active and available")]
    ContractDoubleHomed(u64),
}

fn check_band(
    field: &'static str,
    value: f32,
    min: f32,
    max: f32,
) -> Result<(), ValidationError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfBand {
            field,
            value,
            min,
            max,
        })
    }
}

/// Validate catalog structure, including tech-DAG cross references.
pub fn validate_catalog(catalog: &Catalog) -> Result<(), ValidationError> {
    let mut ids = BTreeSet::new();
    for def in &catalog.tech {
        if !ids.insert(&def.id) {
            return Err(ValidationError::DuplicateTech(def.id.0.clone()));
        }
    }
    for def in &catalog.tech {
        for prereq in &def.prereqs {
            if !ids.contains(prereq) {
                return Err(ValidationError::PrereqNotFound(prereq.0.clone()));
            }
        }
    }
    let mut last_start = None;
    for era in &catalog.eras {
        match last_start {
            None if era.start_day != 0 => return Err(ValidationError::BadEraTable),
            Some(prev) if era.start_day <= prev => return Err(ValidationError::BadEraTable),
            _ => {}
        }
        last_start = Some(era.start_day);
    }
    if last_start.is_none() {
        return Err(ValidationError::BadEraTable);
    }
    if catalog.trends.len() < 2 {
        return Err(ValidationError::TooFewTrends);
    }
    Ok(())
}

/// Validate a state against the documented bands and structural rules.
pub fn validate_state(state: &GameState, catalog: &Catalog) -> Result<(), ValidationError> {
    check_band("reputation", state.reputation, 0.0, 100.0)?;
    check_band("morale", state.morale, 0.0, 100.0)?;
    check_band(
        "market_multiplier",
        state.market_multiplier,
        MARKET_MULT_MIN,
        MARKET_MULT_MAX,
    )?;
    check_band(
        "silicon_price",
        state.silicon_price,
        SILICON_PRICE_MIN,
        SILICON_PRICE_MAX,
    )?;
    check_band("founder_shares_pct", state.founder_shares_pct, 0.0, 100.0)?;
    for product in PRODUCTS {
        check_band(
            "brand_awareness",
            *state.brand_awareness.get(product),
            0.0,
            100.0,
        )?;
        for competitor in &state.competitors {
            check_band(
                "market_share",
                *competitor.market_share.get(product),
                0.0,
                100.0,
            )?;
        }
    }
    for line in &state.lines {
        check_band("line_efficiency", line.efficiency, 0.0, 100.0)?;
    }
    for tech in &state.researched {
        if catalog.tech_def(tech).is_none() {
            return Err(ValidationError::UnknownResearch(tech.0.clone()));
        }
    }
    for active in &state.active_contracts {
        if state.available_contracts.iter().any(|c| c.id == active.id) {
            return Err(ValidationError::ContractDoubleHomed(active.id));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Contract;
    use crate::state::Product;
    use rust_decimal::Decimal;

    #[test]
    fn standard_catalog_validates() {
        validate_catalog(&Catalog::standard()).unwrap();
    }

    #[test]
    fn new_game_validates() {
        let cat = Catalog::standard();
        let state = GameState::new_game(&cat, 1);
        validate_state(&state, &cat).unwrap();
    }

    #[test]
    fn out_of_band_morale_is_rejected() {
        let cat = Catalog::standard();
        let mut state = GameState::new_game(&cat, 1);
        state.morale = 120.0;
        assert!(matches!(
            validate_state(&state, &cat),
            Err(ValidationError::OutOfBand { field: "morale", .. })
        ));
    }

    #[test]
    fn double_homed_contract_is_rejected() {
        let cat = Catalog::standard();
        let mut state = GameState::new_game(&cat, 1);
        let contract = Contract {
            id: 9,
            product: Product::CPU,
            units: 10,
            reward: Decimal::new(1000, 0),
            penalty: Decimal::new(300, 0),
            offered_day: 0,
            deadline_day: 14,
        };
        state.active_contracts.push(contract.clone());
        state.available_contracts.push(contract);
        assert_eq!(
            validate_state(&state, &cat),
            Err(ValidationError::ContractDoubleHomed(9))
        );
    }
}
