//! Cost parameters per technology, with annuities derived at load time.
use super::{TechnologyID, read_vec_from_csv};
use crate::finance::equivalent_periodic_cost;
use crate::id::lookup;
use anyhow::{Context, Result, ensure};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

/// One row of the cost table as provided by the user.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CostRow {
    /// Technology the row applies to
    pub technology: TechnologyID,
    /// Cost per unit of output
    pub opex_var: f64,
    /// Fixed O&M cost per unit of capacity per period
    pub opex_fix: f64,
    /// Capital expenditure per unit of capacity
    pub capex: f64,
    /// Discount rate used to annuitise the capex
    pub wacc: f64,
    /// Asset lifetime in periods
    pub lifetime: u32,
}

/// Cost parameters of one technology with the derived annuity cached.
#[derive(Debug, Clone, PartialEq)]
pub struct CostEntry {
    /// Cost per unit of output
    pub opex_var: f64,
    /// Fixed O&M cost per unit of capacity per period
    pub opex_fix: f64,
    /// Equivalent periodic cost of the capex
    pub epc: f64,
}

impl CostEntry {
    /// The cost coefficient of one unit of invested capacity per period.
    ///
    /// This is the `ep_costs` value every investment term is created with.
    pub fn ep_costs(&self) -> f64 {
        self.epc + self.opex_fix
    }
}

/// Cost rows keyed by technology.
#[derive(Debug)]
pub struct CostTable(IndexMap<TechnologyID, CostEntry>);

impl CostTable {
    /// Build the table from parsed rows, computing each row's annuity.
    pub fn from_rows(rows: impl IntoIterator<Item = CostRow>) -> Result<Self> {
        let mut table = IndexMap::new();
        for row in rows {
            let epc = equivalent_periodic_cost(row.capex, row.wacc, row.lifetime)
                .with_context(|| format!("bad cost table row for {}", row.technology))?;
            let entry = CostEntry {
                opex_var: row.opex_var,
                opex_fix: row.opex_fix,
                epc,
            };
            ensure!(
                table.insert(row.technology.clone(), entry).is_none(),
                "duplicate cost table row for {}",
                row.technology
            );
        }
        Ok(Self(table))
    }

    /// Read the table from a CSV file.
    pub fn from_path(file_path: &Path) -> Result<Self> {
        Self::from_rows(read_vec_from_csv::<CostRow>(file_path)?)
    }

    /// The cost parameters for `technology`.
    pub fn row(&self, technology: &str) -> Result<&CostEntry> {
        lookup(&self.0, technology, "cost table row")
    }
}
