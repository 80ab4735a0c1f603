//! Inter-region transmission lines.
use super::read_vec_from_csv;
use crate::region::RegionID;
use anyhow::{Result, ensure};
use serde::Deserialize;
use std::path::Path;

/// One row of the transmission table as provided by the user.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransmissionRow {
    /// Unique name of the line, used as the node label
    pub name: String,
    /// Region the line draws from
    pub from_region: RegionID,
    /// Region the line delivers to
    pub to_region: RegionID,
    /// Line length in km
    pub length: f64,
}

/// One transmission line with its derived losses.
///
/// Lines are directional; bidirectional capacity requires two rows.
#[derive(Debug, Clone, PartialEq)]
pub struct TransmissionEntry {
    /// Unique name of the line, used as the node label
    pub name: String,
    /// Region the line draws from
    pub from_region: RegionID,
    /// Region the line delivers to
    pub to_region: RegionID,
    /// Line length in km
    pub length: f64,
    /// Share of flow lost along the line
    pub losses: f64,
}

/// The transmission lines of one scenario.
#[derive(Debug)]
pub struct TransmissionTable(Vec<TransmissionEntry>);

impl TransmissionTable {
    /// Build the table from parsed rows, deriving each line's losses as
    /// `length * loss_rate_per_100km / 100`.
    pub fn from_rows(
        rows: impl IntoIterator<Item = TransmissionRow>,
        loss_rate_per_100km: f64,
    ) -> Result<Self> {
        ensure!(
            loss_rate_per_100km >= 0.0,
            "transmission loss rate must be non-negative"
        );

        let mut entries = Vec::new();
        for row in rows {
            ensure!(
                row.length >= 0.0,
                "transmission line {} has negative length",
                row.name
            );
            let losses = row.length * loss_rate_per_100km / 100.0;
            ensure!(
                losses < 1.0,
                "transmission line {} would lose its entire flow",
                row.name
            );
            entries.push(TransmissionEntry {
                name: row.name,
                from_region: row.from_region,
                to_region: row.to_region,
                length: row.length,
                losses,
            });
        }
        Ok(Self(entries))
    }

    /// Read the table from a CSV file.
    pub fn from_path(file_path: &Path, loss_rate_per_100km: f64) -> Result<Self> {
        Self::from_rows(
            read_vec_from_csv::<TransmissionRow>(file_path)?,
            loss_rate_per_100km,
        )
    }

    /// The lines of the table, in input order.
    pub fn rows(&self) -> &[TransmissionEntry] {
        &self.0
    }
}
