//! Storage technology parameters.
use super::{TechnologyID, read_vec_from_csv};
use crate::id::lookup;
use anyhow::{Result, ensure};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

/// One row of the storage parameter table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StorageRow {
    /// Storage technology the row applies to
    pub technology: TechnologyID,
    /// Self-discharge per period as a share of stored energy
    pub capacity_loss: f64,
    /// Charging efficiency
    pub efficiency_in: f64,
    /// Discharging efficiency
    pub efficiency_out: f64,
    /// Hours of storage per unit of charging power
    pub energy_power_ratio_in: f64,
    /// Hours of storage per unit of discharging power
    pub energy_power_ratio_out: f64,
}

/// Parameters of one storage technology.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageEntry {
    /// Self-discharge per period as a share of stored energy
    pub capacity_loss: f64,
    /// Charging efficiency
    pub efficiency_in: f64,
    /// Discharging efficiency
    pub efficiency_out: f64,
    /// Hours of storage per unit of charging power
    pub energy_power_ratio_in: f64,
    /// Hours of storage per unit of discharging power
    pub energy_power_ratio_out: f64,
}

/// Storage parameter rows keyed by technology.
#[derive(Debug)]
pub struct StorageParameterTable(IndexMap<TechnologyID, StorageEntry>);

impl StorageParameterTable {
    /// Build the table from parsed rows.
    ///
    /// Energy-to-power ratios are inverted downstream to become
    /// power-per-unit-capacity bounds, so they must be positive.
    pub fn from_rows(rows: impl IntoIterator<Item = StorageRow>) -> Result<Self> {
        let mut table = IndexMap::new();
        for row in rows {
            ensure!(
                row.energy_power_ratio_in > 0.0 && row.energy_power_ratio_out > 0.0,
                "energy-to-power ratios for {} must be positive",
                row.technology
            );
            let entry = StorageEntry {
                capacity_loss: row.capacity_loss,
                efficiency_in: row.efficiency_in,
                efficiency_out: row.efficiency_out,
                energy_power_ratio_in: row.energy_power_ratio_in,
                energy_power_ratio_out: row.energy_power_ratio_out,
            };
            ensure!(
                table.insert(row.technology.clone(), entry).is_none(),
                "duplicate storage parameter row for {}",
                row.technology
            );
        }
        Ok(Self(table))
    }

    /// Read the table from a CSV file.
    pub fn from_path(file_path: &Path) -> Result<Self> {
        Self::from_rows(read_vec_from_csv::<StorageRow>(file_path)?)
    }

    /// The parameters for `technology`.
    pub fn row(&self, technology: &str) -> Result<&StorageEntry> {
        lookup(&self.0, technology, "storage parameter row")
    }
}
