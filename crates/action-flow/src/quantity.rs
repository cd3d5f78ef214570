//! Quantity entry against the remaining order quantity and vehicle capacity.

use crate::locators;
use action_primitives::{read_number, replace_text, ActionError, PageDriver};
use autoplant_core_types::CapacityReadout;
use std::fmt;
use tracing::info;

/// Remaining values may fall short of the requested weight by this much.
pub const WEIGHT_TOLERANCE: f64 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct QuantityShortfall {
    pub threshold: f64,
    pub readout: CapacityReadout,
}

impl fmt::Display for QuantityShortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "insufficient remaining quantity or capacity (need {}, remaining qty {}, vehicle capacity {})",
            self.threshold, self.readout.remaining_qty, self.readout.remaining_capacity
        )
    }
}

/// Whole quantity to enter for `weight`.
///
/// Both remaining values must reach `weight - 5`; the entry is then the floor
/// of the smallest of the three.
pub fn compute_entry_quantity(
    weight: f64,
    readout: CapacityReadout,
) -> Result<i64, QuantityShortfall> {
    let threshold = weight - WEIGHT_TOLERANCE;
    if readout.remaining_qty >= threshold && readout.remaining_capacity >= threshold {
        Ok(readout.limiting().min(weight).floor() as i64)
    } else {
        Err(QuantityShortfall { threshold, readout })
    }
}

pub async fn read_capacity(page: &dyn PageDriver) -> Result<CapacityReadout, ActionError> {
    let remaining_capacity = read_number(page, &locators::remaining_capacity_field()).await?;
    let remaining_qty = read_number(page, &locators::remaining_quantity_field()).await?;
    Ok(CapacityReadout {
        remaining_qty,
        remaining_capacity,
    })
}

/// Read the remaining values, compute the entry and type it into the form.
pub async fn enter_quantity(
    page: &dyn PageDriver,
    weight: f64,
) -> Result<(CapacityReadout, i64), ActionError> {
    let readout = read_capacity(page).await?;
    let quantity = compute_entry_quantity(weight, readout)
        .map_err(|shortfall| ActionError::ConditionNotMet(shortfall.to_string()))?;
    replace_text(page, &locators::quantity_field(), &quantity.to_string()).await?;
    info!(
        weight,
        remaining_qty = readout.remaining_qty,
        remaining_capacity = readout.remaining_capacity,
        quantity,
        "entered quantity"
    );
    Ok((readout, quantity))
}
