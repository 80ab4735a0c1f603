//! Annuity calculations for investment cost terms.
use anyhow::{Result, ensure};

/// Calculates the equivalent periodic cost of a capital expenditure.
///
/// Spreads `capex` over `lifetime` periods at discount rate `wacc`:
///
/// `capex * (wacc * (1 + wacc)^lifetime) / ((1 + wacc)^lifetime - 1)`
///
/// A zero `wacc` degenerates to straight-line depreciation (`capex /
/// lifetime`); the general formula would divide by zero there. This is
/// computed once per technology row when a cost table is loaded and cached as
/// the table's `epc` column.
pub fn equivalent_periodic_cost(capex: f64, wacc: f64, lifetime: u32) -> Result<f64> {
    ensure!(
        lifetime > 0,
        "invalid annuity parameters: lifetime must be positive"
    );
    ensure!(
        wacc >= 0.0,
        "invalid annuity parameters: wacc must be non-negative (got {wacc})"
    );

    if wacc == 0.0 {
        return Ok(capex / f64::from(lifetime));
    }

    let factor = (1.0 + wacc).powi(lifetime.try_into()?);
    Ok(capex * (wacc * factor) / (factor - 1.0))
}
