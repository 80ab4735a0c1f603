//! Demand and renewable feed-in time series per region.
use super::read_vec_from_csv;
use crate::region::RegionID;
use anyhow::{Context, Result, bail, ensure};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

/// One `(region, timestep)` row of the time series table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimeseriesRow {
    /// Region the row applies to
    pub region: RegionID,
    /// Position in the horizon, counted from 0 per region
    pub timestep: usize,
    /// Wind feed-in
    pub wind: f64,
    /// Solar feed-in
    pub solar: f64,
    /// Hydro feed-in
    pub hydro: f64,
    /// Electricity demand in absolute units
    pub demand: f64,
}

/// The profiles of one region.
#[derive(Debug, Default, PartialEq)]
struct RegionSeries {
    wind: Vec<f64>,
    solar: Vec<f64>,
    hydro: Vec<f64>,
    demand: Vec<f64>,
}

/// Time series keyed by region.
#[derive(Debug)]
pub struct TimeseriesTable {
    series: IndexMap<RegionID, RegionSeries>,
}

impl TimeseriesTable {
    /// Build the table from parsed rows.
    ///
    /// Rows must be contiguous per region, counted from timestep 0, and all
    /// regions must cover the same number of timesteps. All values must be
    /// non-negative.
    pub fn from_rows(rows: impl IntoIterator<Item = TimeseriesRow>) -> Result<Self> {
        let mut series: IndexMap<RegionID, RegionSeries> = IndexMap::new();
        for row in rows {
            for (column, value) in [
                ("wind", row.wind),
                ("solar", row.solar),
                ("hydro", row.hydro),
                ("demand", row.demand),
            ] {
                ensure!(
                    value >= 0.0,
                    "negative {column} value for region {} at timestep {}",
                    row.region,
                    row.timestep
                );
            }

            let entry = series.entry(row.region.clone()).or_default();
            ensure!(
                row.timestep == entry.demand.len(),
                "timesteps for region {} must be contiguous from 0 (found {} where {} was expected)",
                row.region,
                row.timestep,
                entry.demand.len()
            );
            entry.wind.push(row.wind);
            entry.solar.push(row.solar);
            entry.hydro.push(row.hydro);
            entry.demand.push(row.demand);
        }
        ensure!(!series.is_empty(), "time series table is empty");

        let periods = series[0].demand.len();
        for (region, entry) in &series {
            ensure!(
                entry.demand.len() == periods,
                "region {region} covers {} timesteps but other regions cover {periods}",
                entry.demand.len()
            );
        }

        Ok(Self { series })
    }

    /// Read the table from a CSV file.
    pub fn from_path(file_path: &Path) -> Result<Self> {
        Self::from_rows(read_vec_from_csv::<TimeseriesRow>(file_path)?)
    }

    /// Iterate over the regions covered by the table.
    pub fn regions(&self) -> impl Iterator<Item = &RegionID> {
        self.series.keys()
    }

    /// The number of timesteps every region covers.
    pub fn periods(&self) -> usize {
        self.series[0].demand.len()
    }

    /// The feed-in profile of a renewable technology in `region`.
    pub fn profile(&self, region: &RegionID, technology: &str) -> Result<&[f64]> {
        let series = self.region_series(region)?;
        let profile = match technology {
            "wind" => &series.wind,
            "solar" => &series.solar,
            "hydro" => &series.hydro,
            _ => bail!("no feed-in profile column for technology {technology}"),
        };
        Ok(profile)
    }

    /// The demand profile of `region`, in absolute units.
    pub fn demand(&self, region: &RegionID) -> Result<&[f64]> {
        Ok(&self.region_series(region)?.demand)
    }

    fn region_series(&self, region: &RegionID) -> Result<&RegionSeries> {
        self.series
            .get(region)
            .with_context(|| format!("no time series data for region {region}"))
    }
}
