//! Technology attachers: the builders that hang sources, transformers,
//! demands, storages, power-to-gas chains and transmission links onto the bus
//! skeleton.
//!
//! All attachers share two contracts. If `regions` is omitted they default to
//! every region of the registry (the global pool is structurally excluded).
//! And all table lookups for one technology resolve before any of its nodes
//! are created, so a missing row never leaves a half-built technology behind.
use super::buses::BusRegistry;
use crate::carrier::{CarrierID, ELECTRICITY, NATURAL_GAS, SYNTHETIC_GAS};
use crate::input::TechnologyID;
use crate::input::cost::{CostEntry, CostTable};
use crate::input::efficiency::EfficiencyTable;
use crate::input::storage::{StorageEntry, StorageParameterTable};
use crate::input::timeseries::TimeseriesTable;
use crate::input::transmission::TransmissionTable;
use crate::network::{
    BusId, BusScope, EnergySystem, Flow, Investment, NodeKind, StorageSpec, TransformerOutput,
};
use crate::region::RegionID;
use anyhow::{Result, ensure};
use log::debug;

/// The technology id of the aggregated electrolysis and methanation unit.
const PTG_TECHNOLOGY: &str = "ptg";
/// The storage parameter row used for the gas store on the synthetic-gas bus.
const PTG_STORAGE: &str = "gas";
/// The shared cost/efficiency category of all transmission lines.
const TRANSMISSION_TECHNOLOGY: &str = "trm";

fn regions_or_default(registry: &BusRegistry, regions: Option<&[RegionID]>) -> Vec<RegionID> {
    match regions {
        Some(regions) => regions.to_vec(),
        None => registry.regions().cloned().collect(),
    }
}

/// Attach a fixed-profile source per (region, technology) pair.
///
/// The feed-in profile is non-dispatchable: the flow follows it exactly,
/// scaled by the invested capacity. Profile lengths are validated against the
/// system horizon.
pub fn attach_renewable_feeders(
    es: &mut EnergySystem,
    registry: &BusRegistry,
    costs: &CostTable,
    timeseries: &TimeseriesTable,
    technologies: &[TechnologyID],
    regions: Option<&[RegionID]>,
) -> Result<()> {
    for region in regions_or_default(registry, regions) {
        for technology in technologies {
            let cost = costs.row(technology.as_str())?;
            let profile = timeseries.profile(&region, technology.as_str())?;
            let bus = registry.bus(&region, ELECTRICITY)?;

            let mut flow = Flow::new(bus);
            flow.profile = Some(profile.to_vec());
            flow.variable_costs = cost.opex_var;
            flow.investment = Some(Investment {
                ep_costs: cost.ep_costs(),
            });
            es.add_node(
                &format!("{technology}_{region}"),
                NodeKind::Source { output: flow },
            )?;
        }
        debug!("Attached {} renewable feeders in {region}", technologies.len());
    }
    Ok(())
}

/// Attach a fuel-to-electricity transformer per (region, technology) pair.
///
/// `technologies` maps each power plant technology to the fuel carrier it
/// consumes. Conversion factors must lie in `(0, 1]`; anything else indicates
/// bad input data.
pub fn attach_dispatchable_transformers(
    es: &mut EnergySystem,
    registry: &BusRegistry,
    costs: &CostTable,
    efficiencies: &EfficiencyTable,
    technologies: &[(TechnologyID, CarrierID)],
    regions: Option<&[RegionID]>,
) -> Result<()> {
    for region in regions_or_default(registry, regions) {
        for (technology, fuel) in technologies {
            let cost = costs.row(technology.as_str())?;
            let conversion_factor = efficiencies.conversion_factor(technology.as_str())?;
            ensure!(
                conversion_factor > 0.0 && conversion_factor <= 1.0,
                "conversion factor for {technology} must lie in (0, 1], got {conversion_factor}"
            );
            let fuel_bus = registry.bus(&region, fuel.as_str())?;
            let electricity_bus = registry.bus(&region, ELECTRICITY)?;

            let mut output = Flow::new(electricity_bus);
            output.variable_costs = cost.opex_var;
            output.investment = Some(Investment {
                ep_costs: cost.ep_costs(),
            });
            es.add_node(
                &format!("{technology}_pp_{region}"),
                NodeKind::Transformer {
                    inputs: vec![Flow::new(fuel_bus)],
                    outputs: vec![TransformerOutput {
                        flow: output,
                        conversion_factor,
                    }],
                },
            )?;
        }
    }
    Ok(())
}

/// Attach a fixed demand sink per region.
///
/// The demand series is already in absolute units, so the flow's nominal
/// value is pinned to 1; changing it would rescale the entire demand.
pub fn attach_demand_sinks(
    es: &mut EnergySystem,
    registry: &BusRegistry,
    timeseries: &TimeseriesTable,
    regions: Option<&[RegionID]>,
) -> Result<()> {
    for region in regions_or_default(registry, regions) {
        let demand = timeseries.demand(&region)?;
        let bus = registry.bus(&region, ELECTRICITY)?;

        let mut flow = Flow::new(bus);
        flow.profile = Some(demand.to_vec());
        flow.nominal_value = Some(1.0);
        es.add_node(&format!("demand_{region}"), NodeKind::Sink { input: flow })?;
    }
    Ok(())
}

/// Attach an electricity storage per (region, technology) pair.
pub fn attach_storages(
    es: &mut EnergySystem,
    registry: &BusRegistry,
    parameter: &StorageParameterTable,
    technologies: &[TechnologyID],
    costs: &CostTable,
    regions: Option<&[RegionID]>,
) -> Result<()> {
    for region in regions_or_default(registry, regions) {
        for technology in technologies {
            let params = parameter.row(technology.as_str())?;
            let cost = costs.row(technology.as_str())?;
            let bus = registry.bus(&region, ELECTRICITY)?;
            es.add_node(
                &format!("{technology}_{region}"),
                make_storage(bus, params, cost),
            )?;
        }
    }
    Ok(())
}

/// Attach the power-to-gas chain per region.
///
/// The chain consists of a new synthetic-gas bus, an aggregated electrolysis
/// and methanation transformer from electricity onto it, a lossless injection
/// transformer into the existing gas network (no marginal capacity cost), and
/// a gas store on the synthetic-gas bus.
///
/// This is the one attacher that mutates the registry: every region's carrier
/// set grows by the synthetic-gas entry, and callers that iterate carriers
/// afterwards must account for it.
pub fn attach_power_to_gas(
    es: &mut EnergySystem,
    registry: &mut BusRegistry,
    efficiencies: &EfficiencyTable,
    parameter: &StorageParameterTable,
    costs: &CostTable,
    regions: Option<&[RegionID]>,
) -> Result<()> {
    for region in regions_or_default(registry, regions) {
        // resolve every lookup before touching the registry
        let ptg_cost = costs.row(PTG_TECHNOLOGY)?;
        let conversion_factor = efficiencies.conversion_factor(PTG_TECHNOLOGY)?;
        let store_params = parameter.row(PTG_STORAGE)?;
        let store_cost = costs.row(PTG_STORAGE)?;
        let electricity_bus = registry.bus(&region, ELECTRICITY)?;
        let natural_gas_bus = registry.bus(&region, NATURAL_GAS)?;

        let sng = CarrierID::new(SYNTHETIC_GAS);
        let sng_bus = es.add_bus(
            &format!("{SYNTHETIC_GAS}_{region}"),
            sng.clone(),
            BusScope::Region(region.clone()),
        )?;
        registry.insert_regional(&region, sng, sng_bus)?;

        // electrolysis and methanation aggregated into one unit
        let mut output = Flow::new(sng_bus);
        output.variable_costs = ptg_cost.opex_var;
        output.investment = Some(Investment {
            ep_costs: ptg_cost.ep_costs(),
        });
        es.add_node(
            &format!("{PTG_TECHNOLOGY}_{region}"),
            NodeKind::Transformer {
                inputs: vec![Flow::new(electricity_bus)],
                outputs: vec![TransformerOutput {
                    flow: output,
                    conversion_factor,
                }],
            },
        )?;

        // injection into the existing gas network carries no capacity cost
        let mut injection = Flow::new(natural_gas_bus);
        injection.investment = Some(Investment { ep_costs: 0.0 });
        es.add_node(
            &format!("{SYNTHETIC_GAS}2{NATURAL_GAS}_{region}"),
            NodeKind::Transformer {
                inputs: vec![Flow::new(sng_bus)],
                outputs: vec![TransformerOutput {
                    flow: injection,
                    conversion_factor: 1.0,
                }],
            },
        )?;

        es.add_node(
            &format!("{PTG_STORAGE}_{region}"),
            make_storage(sng_bus, store_params, store_cost),
        )?;
    }
    Ok(())
}

/// Attach one directional transmission transformer per table row.
///
/// All lines share the `trm` cost category; line losses reduce the conversion
/// factor below 1.
pub fn attach_transmission_links(
    es: &mut EnergySystem,
    registry: &BusRegistry,
    transmission: &TransmissionTable,
    costs: &CostTable,
) -> Result<()> {
    let cost = costs.row(TRANSMISSION_TECHNOLOGY)?;
    for row in transmission.rows() {
        let from = registry.bus(&row.from_region, ELECTRICITY)?;
        let to = registry.bus(&row.to_region, ELECTRICITY)?;

        let mut output = Flow::new(to);
        output.variable_costs = cost.opex_var;
        output.investment = Some(Investment {
            ep_costs: cost.ep_costs(),
        });
        es.add_node(
            &row.name,
            NodeKind::Transformer {
                inputs: vec![Flow::new(from)],
                outputs: vec![TransformerOutput {
                    flow: output,
                    conversion_factor: 1.0 - row.losses,
                }],
            },
        )?;
    }
    Ok(())
}

/// A storage node charged and discharged on the same bus.
///
/// Energy-to-power ratios from the parameter table are inverted to become
/// power-per-unit-capacity bounds. Storages start the horizon empty.
fn make_storage(bus: BusId, params: &StorageEntry, cost: &CostEntry) -> NodeKind {
    let mut input = Flow::new(bus);
    input.variable_costs = cost.opex_var;
    let mut output = Flow::new(bus);
    output.variable_costs = cost.opex_var;

    NodeKind::Storage {
        input,
        output,
        spec: StorageSpec {
            capacity_loss: params.capacity_loss,
            inflow_conversion_factor: params.efficiency_in,
            outflow_conversion_factor: params.efficiency_out,
            nominal_input_capacity_ratio: 1.0 / params.energy_power_ratio_in,
            nominal_output_capacity_ratio: 1.0 / params.energy_power_ratio_out,
            initial_capacity: 0.0,
            investment: Some(Investment {
                ep_costs: cost.ep_costs(),
            }),
        },
    }
}
