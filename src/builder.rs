//! Scenario assembly: turns parameter tables into one energy-system graph.
//!
//! The assembler orchestrates the bus registry and technology attachers in a
//! fixed dependency order; it holds no state of its own beyond what it
//! threads between the calls.
pub mod buses;
pub mod technology;

use crate::carrier::{CarrierID, ELECTRICITY};
use crate::input::TechnologyID;
use crate::input::cost::CostTable;
use crate::input::efficiency::EfficiencyTable;
use crate::input::storage::StorageParameterTable;
use crate::input::timeseries::TimeseriesTable;
use crate::input::transmission::TransmissionTable;
use crate::network::EnergySystem;
use crate::region::RegionID;
use anyhow::Result;
use buses::{BusRegistry, create_buses};
use indexmap::{IndexMap, indexmap};
use log::info;
use technology::{
    attach_demand_sinks, attach_dispatchable_transformers, attach_power_to_gas,
    attach_renewable_feeders, attach_storages, attach_transmission_links,
};

/// Everything that defines one scenario beyond the parameter tables.
pub struct ScenarioConfig {
    /// Number of discrete time steps in the horizon
    pub periods: usize,
    /// The modelled regions
    pub regions: Vec<RegionID>,
    /// The carriers to create buses for (electricity plus fuels)
    pub carriers: Vec<CarrierID>,
    /// Flat per-unit price of each global resource
    pub resource_costs: IndexMap<CarrierID, f64>,
    /// Which carriers get an excess sink per region. Passed explicitly at
    /// every build so scenarios can never share a mutated default.
    pub excess: IndexMap<CarrierID, bool>,
    /// Renewable technologies fed by fixed profiles
    pub res_technologies: Vec<TechnologyID>,
    /// Dispatchable power plant technologies and the fuel each consumes
    pub conv_technologies: Vec<(TechnologyID, CarrierID)>,
    /// Electricity storage technologies
    pub storage_technologies: Vec<TechnologyID>,
}

impl ScenarioConfig {
    /// The conventional excess policy: only electricity buses absorb surplus.
    pub fn default_excess() -> IndexMap<CarrierID, bool> {
        indexmap! { CarrierID::new(ELECTRICITY) => true }
    }
}

/// The parameter tables one scenario build reads.
pub struct ScenarioTables<'a> {
    /// Cost rows per technology, annuities already derived
    pub costs: &'a CostTable,
    /// Conversion factors per technology
    pub efficiencies: &'a EfficiencyTable,
    /// Storage parameters per storage technology
    pub storage_parameter: &'a StorageParameterTable,
    /// Demand and feed-in profiles per region
    pub timeseries: &'a TimeseriesTable,
    /// Inter-region lines with derived losses
    pub transmission: &'a TransmissionTable,
}

/// Assemble one fully connected multi-region energy-system graph.
///
/// Construction order matters: buses come first, the power-to-gas chain must
/// run after every attacher that reads the electricity buses it extends from,
/// and transmission (which reads electricity buses only) runs last. Any
/// failure is fatal; a half-built system is never returned.
pub fn assemble_scenario(
    config: &ScenarioConfig,
    tables: &ScenarioTables,
) -> Result<(EnergySystem, BusRegistry)> {
    let mut es = EnergySystem::new(config.periods)?;

    let mut registry = create_buses(
        &mut es,
        &config.carriers,
        &config.regions,
        &config.resource_costs,
        &config.excess,
    )?;

    attach_renewable_feeders(
        &mut es,
        &registry,
        tables.costs,
        tables.timeseries,
        &config.res_technologies,
        None,
    )?;
    attach_dispatchable_transformers(
        &mut es,
        &registry,
        tables.costs,
        tables.efficiencies,
        &config.conv_technologies,
        None,
    )?;
    attach_demand_sinks(&mut es, &registry, tables.timeseries, None)?;
    attach_storages(
        &mut es,
        &registry,
        tables.storage_parameter,
        &config.storage_technologies,
        tables.costs,
        None,
    )?;
    attach_power_to_gas(
        &mut es,
        &mut registry,
        tables.efficiencies,
        tables.storage_parameter,
        tables.costs,
        None,
    )?;
    attach_transmission_links(&mut es, &registry, tables.transmission, tables.costs)?;

    info!(
        "Assembled scenario with {} buses and {} nodes over {} periods",
        es.num_buses(),
        es.num_nodes(),
        es.periods()
    );
    Ok((es, registry))
}
