//! The aggregate emissions-cap constraint.
//!
//! Installed on the optimisation problem after the scenario is assembled and
//! before the solve: one linear inequality summing all fossil fuel drawn from
//! the global pools over the whole horizon, weighted by each fuel's emission
//! factor.
use super::{GraphRef, VariableMap};
use crate::builder::buses::BusRegistry;
use anyhow::Result;
use highs::RowProblem as Problem;
use log::info;

/// CO2-equivalent mass emitted per unit of fuel drawn from each global pool.
pub const EMISSION_FACTORS: [(&str, f64); 2] = [("coal", 0.361), ("natural_gas", 0.204)];

/// Cap total emissions from fuel consumption over the whole horizon.
///
/// For every emitting fuel, the flow variable between the fuel's global
/// source and its global bus is looked up for each period and weighted by the
/// fuel's emission factor; the sum of all terms is constrained to `cap`.
/// Every emitting fuel must be present in the registry and the variable map;
/// a silently skipped fuel would understate emissions without warning, so a
/// failed lookup is fatal.
pub fn add_emission_cap(
    problem: &mut Problem,
    variables: &VariableMap,
    registry: &BusRegistry,
    periods: usize,
    cap: f64,
) -> Result<()> {
    let mut terms = Vec::with_capacity(EMISSION_FACTORS.len() * periods);
    for (fuel, factor) in EMISSION_FACTORS {
        let supply = registry.fuel_supply(fuel)?;
        for period in 0..periods {
            let var = variables.get(
                GraphRef::Node(supply.source),
                GraphRef::Bus(supply.bus),
                period,
            )?;
            terms.push((var, factor));
        }
    }
    problem.add_row(..=cap, terms);

    info!("Installed emission cap of {cap} covering {periods} periods");
    Ok(())
}
