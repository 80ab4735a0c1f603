//! Fixtures for tests
use crate::builder::{ScenarioConfig, ScenarioTables};
use crate::carrier::CarrierID;
use crate::input::cost::{CostRow, CostTable};
use crate::input::efficiency::{EfficiencyRow, EfficiencyTable};
use crate::input::storage::{StorageParameterTable, StorageRow};
use crate::input::timeseries::{TimeseriesRow, TimeseriesTable};
use crate::input::transmission::{TransmissionRow, TransmissionTable};
use crate::region::RegionID;
use indexmap::{IndexMap, indexmap};
use itertools::iproduct;
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

#[fixture]
pub fn regions() -> Vec<RegionID> {
    vec!["north".into(), "south".into()]
}

#[fixture]
pub fn carriers() -> Vec<CarrierID> {
    ["electricity", "natural_gas", "coal", "uranium"]
        .into_iter()
        .map(CarrierID::new)
        .collect()
}

#[fixture]
pub fn resource_costs() -> IndexMap<CarrierID, f64> {
    indexmap! {
        CarrierID::new("natural_gas") => 0.0282,
        CarrierID::new("coal") => 0.0088,
        CarrierID::new("uranium") => 0.0078,
    }
}

#[fixture]
pub fn excess() -> IndexMap<CarrierID, bool> {
    ScenarioConfig::default_excess()
}

fn cost_row(technology: &str, opex_var: f64, capex: f64) -> CostRow {
    CostRow {
        technology: technology.into(),
        opex_var,
        opex_fix: 20.0,
        capex,
        wacc: 0.05,
        lifetime: 20,
    }
}

#[fixture]
pub fn cost_table() -> CostTable {
    CostTable::from_rows([
        cost_row("wind", 0.005, 1100.0),
        cost_row("solar", 0.0, 900.0),
        cost_row("hydro", 0.002, 2000.0),
        cost_row("ccgt", 0.003, 750.0),
        cost_row("coal", 0.004, 1300.0),
        cost_row("nuclear", 0.001, 4000.0),
        cost_row("battery", 0.0005, 300.0),
        cost_row("phs", 0.0002, 1000.0),
        cost_row("ptg", 0.001, 800.0),
        cost_row("gas", 0.0001, 50.0),
        cost_row("trm", 0.0005, 400.0),
    ])
    .unwrap()
}

#[fixture]
pub fn efficiency_table() -> EfficiencyTable {
    let row = |technology: &str, conversion_factor| EfficiencyRow {
        technology: technology.into(),
        conversion_factor,
    };
    EfficiencyTable::from_rows([
        row("ccgt", 0.61),
        row("coal", 0.45),
        row("nuclear", 0.33),
        row("ptg", 0.7),
    ])
    .unwrap()
}

#[fixture]
pub fn storage_table() -> StorageParameterTable {
    let row = |technology: &str, efficiency_in, efficiency_out, ratio| StorageRow {
        technology: technology.into(),
        capacity_loss: 0.0,
        efficiency_in,
        efficiency_out,
        energy_power_ratio_in: ratio,
        energy_power_ratio_out: ratio,
    };
    StorageParameterTable::from_rows([
        row("battery", 0.95, 0.95, 4.0),
        row("phs", 0.9, 0.85, 8.0),
        row("gas", 1.0, 0.98, 100.0),
    ])
    .unwrap()
}

#[fixture]
pub fn timeseries(regions: Vec<RegionID>) -> TimeseriesTable {
    let wind = [0.25, 0.3, 0.35, 0.4];
    let demand = [50.0, 51.0, 52.0, 53.0];
    let rows = iproduct!(regions, 0..4usize).map(|(region, timestep)| TimeseriesRow {
        region,
        timestep,
        wind: wind[timestep],
        solar: 0.1,
        hydro: 0.4,
        demand: demand[timestep],
    });
    TimeseriesTable::from_rows(rows).unwrap()
}

#[fixture]
pub fn transmission_table() -> TransmissionTable {
    let row = |name: &str, from_region: &str, to_region: &str| TransmissionRow {
        name: name.to_string(),
        from_region: from_region.into(),
        to_region: to_region.into(),
        length: 250.0,
    };
    TransmissionTable::from_rows(
        [
            row("north_south", "north", "south"),
            row("south_north", "south", "north"),
        ],
        0.016,
    )
    .unwrap()
}

#[fixture]
pub fn scenario_config(
    regions: Vec<RegionID>,
    carriers: Vec<CarrierID>,
    resource_costs: IndexMap<CarrierID, f64>,
    excess: IndexMap<CarrierID, bool>,
) -> ScenarioConfig {
    ScenarioConfig {
        periods: 4,
        regions,
        carriers,
        resource_costs,
        excess,
        res_technologies: vec!["wind".into(), "solar".into(), "hydro".into()],
        conv_technologies: vec![
            ("ccgt".into(), "natural_gas".into()),
            ("coal".into(), "coal".into()),
            ("nuclear".into(), "uranium".into()),
        ],
        storage_technologies: vec!["battery".into(), "phs".into()],
    }
}

/// Owned variants of all scenario tables, for tests that need one value.
pub struct OwnedTables {
    pub costs: CostTable,
    pub efficiencies: EfficiencyTable,
    pub storage_parameter: StorageParameterTable,
    pub timeseries: TimeseriesTable,
    pub transmission: TransmissionTable,
}

impl OwnedTables {
    /// Borrow the owned tables the way the assembler expects them.
    pub fn as_tables(&self) -> ScenarioTables<'_> {
        ScenarioTables {
            costs: &self.costs,
            efficiencies: &self.efficiencies,
            storage_parameter: &self.storage_parameter,
            timeseries: &self.timeseries,
            transmission: &self.transmission,
        }
    }
}

#[fixture]
pub fn scenario_tables_owned(
    cost_table: CostTable,
    efficiency_table: EfficiencyTable,
    storage_table: StorageParameterTable,
    timeseries: TimeseriesTable,
    transmission_table: TransmissionTable,
) -> OwnedTables {
    OwnedTables {
        costs: cost_table,
        efficiencies: efficiency_table,
        storage_parameter: storage_table,
        timeseries,
        transmission: transmission_table,
    }
}
