//! The bus registry: carrier balance points per region plus global fuel pools.
//!
//! The registry is owned exclusively by the scenario assembly that created it.
//! Global buses are held separately from regional ones, so iterating regions
//! can never accidentally include the global pool.
use crate::carrier::{CarrierID, is_global};
use crate::network::{BusId, BusScope, EnergySystem, Flow, NodeId, NodeKind, TransformerOutput};
use crate::region::RegionID;
use anyhow::{Context, Result, ensure};
use indexmap::IndexMap;
use log::info;

/// Typed handles to one global fuel pool: the unconstrained source and the
/// bus it feeds.
///
/// Recorded at creation time so the emission-cap builder never has to
/// reconstruct labels to find these nodes again.
#[derive(Debug, Clone)]
pub struct FuelSupply {
    /// The fuel carrier
    pub carrier: CarrierID,
    /// The source injecting the fuel at a flat price
    pub source: NodeId,
    /// The global bus the source feeds
    pub bus: BusId,
}

/// All buses of one scenario, keyed by `(carrier, region)` with global fuel
/// buses kept apart.
#[derive(Debug, Default)]
pub struct BusRegistry {
    global: IndexMap<CarrierID, BusId>,
    regional: IndexMap<RegionID, IndexMap<CarrierID, BusId>>,
    fuel_supplies: Vec<FuelSupply>,
}

impl BusRegistry {
    /// Iterate over all regions known to the registry.
    pub fn regions(&self) -> impl Iterator<Item = &RegionID> {
        self.regional.keys()
    }

    /// The bus for `carrier` in `region`.
    pub fn bus(&self, region: &RegionID, carrier: &str) -> Result<BusId> {
        let carriers = self
            .regional
            .get(region)
            .with_context(|| format!("unknown region {region}"))?;
        carriers
            .get(carrier)
            .copied()
            .with_context(|| format!("no {carrier} bus in region {region}"))
    }

    /// The global bus for `carrier`.
    pub fn global_bus(&self, carrier: &str) -> Result<BusId> {
        self.global
            .get(carrier)
            .copied()
            .with_context(|| format!("no global bus for carrier {carrier}"))
    }

    /// The carriers with a bus in `region`.
    pub fn carriers(&self, region: &RegionID) -> Result<impl Iterator<Item = &CarrierID>> {
        let carriers = self
            .regional
            .get(region)
            .with_context(|| format!("unknown region {region}"))?;
        Ok(carriers.keys())
    }

    /// The source/bus handles of every global fuel pool.
    pub fn fuel_supplies(&self) -> &[FuelSupply] {
        &self.fuel_supplies
    }

    /// The source/bus handles for one fuel.
    pub fn fuel_supply(&self, carrier: &str) -> Result<&FuelSupply> {
        self.fuel_supplies
            .iter()
            .find(|supply| supply.carrier.as_str() == carrier)
            .with_context(|| format!("no global fuel supply for carrier {carrier}"))
    }

    /// Register a regional bus, enforcing one bus per `(carrier, region)`.
    pub(crate) fn insert_regional(
        &mut self,
        region: &RegionID,
        carrier: CarrierID,
        bus: BusId,
    ) -> Result<()> {
        let carriers = self.regional.entry(region.clone()).or_default();
        ensure!(
            !carriers.contains_key(carrier.as_str()),
            "bus for {carrier} in region {region} created twice"
        );
        carriers.insert(carrier, bus);
        Ok(())
    }
}

/// Create the bus skeleton every technology attaches to.
///
/// For each carrier in [`crate::carrier::GLOBAL_CARRIERS`] that appears in
/// `carriers`, one global bus is created together with an unconstrained
/// source feeding it at the carrier's flat resource cost (an infinite global
/// resource market; a capacity bound is deliberately absent). For every
/// region, one bus per requested carrier is created; carriers the excess
/// policy marks `true` additionally get an unconstrained, costless excess
/// sink, without which the model could be infeasible whenever supply exceeds
/// demand. Each regional bus of a global carrier is connected to its pool by
/// a lossless pass-through transformer.
pub fn create_buses(
    es: &mut EnergySystem,
    carriers: &[CarrierID],
    regions: &[RegionID],
    resource_costs: &IndexMap<CarrierID, f64>,
    excess: &IndexMap<CarrierID, bool>,
) -> Result<BusRegistry> {
    let mut registry = BusRegistry::default();

    // global pools for fossil resources
    for carrier in carriers.iter().filter(|c| is_global(c)) {
        let cost = resource_costs
            .get(carrier.as_str())
            .with_context(|| format!("no resource cost for global carrier {carrier}"))?;
        let bus = es.add_bus(&format!("{carrier}_bus"), carrier.clone(), BusScope::Global)?;
        let mut flow = Flow::new(bus);
        flow.variable_costs = *cost;
        let source = es.add_node(&format!("{carrier}_source"), NodeKind::Source { output: flow })?;
        registry.global.insert(carrier.clone(), bus);
        registry.fuel_supplies.push(FuelSupply {
            carrier: carrier.clone(),
            source,
            bus,
        });
    }

    for region in regions {
        for carrier in carriers {
            let bus = es.add_bus(
                &format!("{carrier}_{region}"),
                carrier.clone(),
                BusScope::Region(region.clone()),
            )?;
            registry.insert_regional(region, carrier.clone(), bus)?;

            // excess sink absorbing surplus production
            if excess.get(carrier.as_str()).copied().unwrap_or(false) {
                es.add_node(
                    &format!("excess_{carrier}_{region}"),
                    NodeKind::Sink {
                        input: Flow::new(bus),
                    },
                )?;
            }

            // connect global and regional buses
            if is_global(carrier) {
                let global = registry.global_bus(carrier.as_str())?;
                es.add_node(
                    &format!("{carrier}_global_{region}"),
                    NodeKind::Transformer {
                        inputs: vec![Flow::new(global)],
                        outputs: vec![TransformerOutput {
                            flow: Flow::new(bus),
                            conversion_factor: 1.0,
                        }],
                    },
                )?;
            }
        }
    }

    info!(
        "Created {} global and {} regional buses across {} regions",
        registry.global.len(),
        es.num_buses() - registry.global.len(),
        regions.len()
    );
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, carriers, excess, regions, resource_costs};
    use crate::network::Node;
    use rstest::rstest;

    fn build(
        carriers: &[CarrierID],
        regions: &[RegionID],
        resource_costs: &IndexMap<CarrierID, f64>,
        excess: &IndexMap<CarrierID, bool>,
    ) -> (EnergySystem, BusRegistry) {
        let mut es = EnergySystem::new(4).unwrap();
        let registry = create_buses(&mut es, carriers, regions, resource_costs, excess).unwrap();
        (es, registry)
    }

    #[rstest]
    fn test_one_bus_per_carrier_and_region(
        carriers: Vec<CarrierID>,
        regions: Vec<RegionID>,
        resource_costs: IndexMap<CarrierID, f64>,
        excess: IndexMap<CarrierID, bool>,
    ) {
        let (es, registry) = build(&carriers, &regions, &resource_costs, &excess);

        // 3 global + one per (carrier, region)
        assert_eq!(es.num_buses(), 3 + carriers.len() * regions.len());
        for region in &regions {
            for carrier in &carriers {
                let bus = registry.bus(region, carrier.as_str()).unwrap();
                assert_eq!(&*es.bus(bus).label, &format!("{carrier}_{region}"));
            }
        }
        assert_eq!(registry.regions().count(), regions.len());
    }

    #[rstest]
    fn test_global_supplies_and_pass_through(
        carriers: Vec<CarrierID>,
        regions: Vec<RegionID>,
        resource_costs: IndexMap<CarrierID, f64>,
        excess: IndexMap<CarrierID, bool>,
    ) {
        let (es, registry) = build(&carriers, &regions, &resource_costs, &excess);

        // one unconstrained source per global carrier, priced at the flat cost
        for fuel in ["natural_gas", "coal", "uranium"] {
            let supply = registry.fuel_supply(fuel).unwrap();
            let Node {
                kind: NodeKind::Source { output },
                ..
            } = es.node(supply.source)
            else {
                panic!("expected a source for {fuel}");
            };
            assert_eq!(output.bus, supply.bus);
            assert_eq!(output.variable_costs, resource_costs[fuel]);
            assert!(output.nominal_value.is_none());
        }

        // one lossless pass-through per (global carrier, region)
        for region in &regions {
            for fuel in ["natural_gas", "coal", "uranium"] {
                let id = es.node_group(&format!("{fuel}_global_{region}")).unwrap();
                let Node {
                    kind: NodeKind::Transformer { inputs, outputs },
                    ..
                } = es.node(id)
                else {
                    panic!("expected a transformer");
                };
                assert_eq!(inputs[0].bus, registry.global_bus(fuel).unwrap());
                assert_eq!(outputs[0].flow.bus, registry.bus(region, fuel).unwrap());
                assert_eq!(outputs[0].conversion_factor, 1.0);
            }
        }
    }

    #[rstest]
    fn test_excess_sinks_follow_policy(
        carriers: Vec<CarrierID>,
        regions: Vec<RegionID>,
        resource_costs: IndexMap<CarrierID, f64>,
        excess: IndexMap<CarrierID, bool>,
    ) {
        let (es, registry) = build(&carriers, &regions, &resource_costs, &excess);

        for region in &regions {
            let id = es
                .node_group(&format!("excess_electricity_{region}"))
                .unwrap();
            let Node {
                kind: NodeKind::Sink { input },
                ..
            } = es.node(id)
            else {
                panic!("expected a sink");
            };
            assert_eq!(input.bus, registry.bus(region, "electricity").unwrap());
            // free curtailment with unconstrained capacity
            assert!(input.nominal_value.is_none());
            assert_eq!(input.variable_costs, 0.0);

            // no excess sink for carriers the policy leaves out
            assert!(es.node_group(&format!("excess_coal_{region}")).is_err());
        }
    }

    #[rstest]
    fn test_missing_resource_cost(
        carriers: Vec<CarrierID>,
        regions: Vec<RegionID>,
        excess: IndexMap<CarrierID, bool>,
    ) {
        let mut es = EnergySystem::new(4).unwrap();
        let result = create_buses(&mut es, &carriers, &regions, &IndexMap::new(), &excess);
        assert_error!(result, "no resource cost for global carrier natural_gas");
    }
}
