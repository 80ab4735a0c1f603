//! Conversion efficiencies per technology.
use super::{TechnologyID, read_vec_from_csv};
use anyhow::{Context, Result, ensure};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

/// One row of the efficiency table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EfficiencyRow {
    /// Technology the row applies to
    pub technology: TechnologyID,
    /// Output per unit of input
    pub conversion_factor: f64,
}

/// Conversion factors keyed by technology.
pub struct EfficiencyTable(IndexMap<TechnologyID, f64>);

impl EfficiencyTable {
    /// Build the table from parsed rows.
    pub fn from_rows(rows: impl IntoIterator<Item = EfficiencyRow>) -> Result<Self> {
        let mut table = IndexMap::new();
        for row in rows {
            ensure!(
                table
                    .insert(row.technology.clone(), row.conversion_factor)
                    .is_none(),
                "duplicate efficiency table row for {}",
                row.technology
            );
        }
        Ok(Self(table))
    }

    /// Read the table from a CSV file.
    pub fn from_path(file_path: &Path) -> Result<Self> {
        Self::from_rows(read_vec_from_csv::<EfficiencyRow>(file_path)?)
    }

    /// The conversion factor for `technology`.
    pub fn conversion_factor(&self, technology: &str) -> Result<f64> {
        self.0
            .get(technology)
            .copied()
            .with_context(|| format!("no efficiency table row for {technology}"))
    }
}
