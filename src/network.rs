//! The energy-system graph: buses, flows and typed nodes.
//!
//! An [`EnergySystem`] is created once per scenario run with a fixed time
//! horizon and mutated by every builder call; it is never mutated after being
//! handed to the solver. Buses and nodes are addressed through the typed
//! handles returned at creation time, so downstream constraint code never has
//! to reconstruct label strings.
use crate::carrier::CarrierID;
use crate::region::RegionID;
use anyhow::{Context, Result, ensure};
use indexmap::IndexMap;
use std::rc::Rc;

/// Handle to a bus in an [`EnergySystem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BusId(usize);

/// Handle to a node in an [`EnergySystem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Where a bus balances: in one region, or in the shared global pool.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BusScope {
    /// The bus is a global resource pool shared by all regions.
    Global,
    /// The bus balances within a single region.
    Region(RegionID),
}

/// A balance point for one carrier in one region (or globally).
///
/// Inflows must equal outflows in every period; that balance equation is the
/// solver's concern, the builder only guarantees at most one bus exists per
/// `(carrier, scope)` pair.
#[derive(Debug)]
pub struct Bus {
    /// Deterministic label, e.g. `"electricity_north"` or `"coal_bus"`
    pub label: Rc<str>,
    /// The commodity balanced by this bus
    pub carrier: CarrierID,
    /// The region the bus belongs to, or the global pool
    pub scope: BusScope,
}

/// An annuitised investment term attached to a flow whose capacity is a
/// decision variable rather than fixed.
#[derive(Debug, Clone, PartialEq)]
pub struct Investment {
    /// Equivalent periodic cost per unit of capacity built, combining the
    /// annuitised capex and fixed O&M
    pub ep_costs: f64,
}

/// A directed edge between a node and a bus.
#[derive(Debug)]
pub struct Flow {
    /// The bus this flow connects to
    pub bus: BusId,
    /// Fixed (non-dispatchable) per-period values; length must equal the
    /// system horizon
    pub profile: Option<Vec<f64>>,
    /// Cost per unit of flow
    pub variable_costs: f64,
    /// Fixed nominal capacity. For fixed profiles this is the scaling applied
    /// to the profile values.
    pub nominal_value: Option<f64>,
    /// Present when capacity is a decision variable
    pub investment: Option<Investment>,
}

impl Flow {
    /// An unconstrained, costless flow to or from `bus`.
    pub fn new(bus: BusId) -> Self {
        Self {
            bus,
            profile: None,
            variable_costs: 0.0,
            nominal_value: None,
            investment: None,
        }
    }
}

/// One output edge of a transformer with its conversion efficiency.
#[derive(Debug)]
pub struct TransformerOutput {
    /// The output flow
    pub flow: Flow,
    /// Output per unit of input
    pub conversion_factor: f64,
}

/// Parameters of a storage node beyond its input and output flows.
#[derive(Debug)]
pub struct StorageSpec {
    /// Self-discharge per period as a share of stored energy
    pub capacity_loss: f64,
    /// Charging efficiency
    pub inflow_conversion_factor: f64,
    /// Discharging efficiency
    pub outflow_conversion_factor: f64,
    /// Charging power bound per unit of energy capacity
    pub nominal_input_capacity_ratio: f64,
    /// Discharging power bound per unit of energy capacity
    pub nominal_output_capacity_ratio: f64,
    /// Energy stored at the start of the horizon
    pub initial_capacity: f64,
    /// Present when energy capacity is a decision variable
    pub investment: Option<Investment>,
}

/// The node variants the builder creates.
#[derive(Debug)]
pub enum NodeKind {
    /// A single output flow, e.g. fuel injection or renewable feed-in
    Source {
        /// The flow into the connected bus
        output: Flow,
    },
    /// A single input flow, e.g. demand or excess absorption
    Sink {
        /// The flow out of the connected bus
        input: Flow,
    },
    /// N inputs converted into M outputs, each output with its own efficiency
    Transformer {
        /// Flows drawn from input buses
        inputs: Vec<Flow>,
        /// Flows delivered to output buses
        outputs: Vec<TransformerOutput>,
    },
    /// One input flow, one output flow and an energy store between them
    Storage {
        /// The charging flow
        input: Flow,
        /// The discharging flow
        output: Flow,
        /// Loss, efficiency and capacity-ratio parameters
        spec: StorageSpec,
    },
}

/// A labelled node of the energy-system graph.
#[derive(Debug)]
pub struct Node {
    /// Globally unique label
    pub label: Rc<str>,
    /// The node variant and its flows
    pub kind: NodeKind,
}

impl NodeKind {
    /// Iterate over all flows of this node, regardless of direction.
    fn iter_flows(&self) -> Box<dyn Iterator<Item = &Flow> + '_> {
        match self {
            NodeKind::Source { output } => Box::new(std::iter::once(output)),
            NodeKind::Sink { input } => Box::new(std::iter::once(input)),
            NodeKind::Transformer { inputs, outputs } => {
                Box::new(inputs.iter().chain(outputs.iter().map(|o| &o.flow)))
            }
            NodeKind::Storage { input, output, .. } => {
                Box::new([input, output].into_iter())
            }
        }
    }
}

/// Container for the whole energy-system graph over a fixed time horizon.
pub struct EnergySystem {
    periods: usize,
    buses: Vec<Bus>,
    nodes: Vec<Node>,
    /// Name-indexed lookup of all constructed nodes, for downstream
    /// constraint code that only has a label
    groups: IndexMap<Rc<str>, NodeId>,
}

impl EnergySystem {
    /// Create an empty system with a horizon of `periods` discrete steps.
    pub fn new(periods: usize) -> Result<Self> {
        ensure!(periods > 0, "horizon must cover at least one period");
        Ok(Self {
            periods,
            buses: Vec::new(),
            nodes: Vec::new(),
            groups: IndexMap::new(),
        })
    }

    /// The number of discrete time steps in the horizon.
    pub fn periods(&self) -> usize {
        self.periods
    }

    /// Add a bus, returning its handle.
    ///
    /// Labels must be unique across the whole system; the bus registry
    /// additionally guarantees uniqueness per `(carrier, scope)`.
    pub fn add_bus(&mut self, label: &str, carrier: CarrierID, scope: BusScope) -> Result<BusId> {
        self.check_label_free(label)?;
        let id = BusId(self.buses.len());
        self.buses.push(Bus {
            label: Rc::from(label),
            carrier,
            scope,
        });
        Ok(id)
    }

    /// Add a node, returning its handle.
    ///
    /// Validates that every fixed profile matches the horizon and registers
    /// the node under its label in the group map.
    pub fn add_node(&mut self, label: &str, kind: NodeKind) -> Result<NodeId> {
        self.check_label_free(label)?;
        for flow in kind.iter_flows() {
            ensure!(
                flow.bus.0 < self.buses.len(),
                "node {label} references a bus that does not exist"
            );
            if let Some(profile) = &flow.profile {
                ensure!(
                    profile.len() == self.periods,
                    "fixed profile on node {label} has {} values but the horizon is {} periods",
                    profile.len(),
                    self.periods
                );
            }
        }

        let label: Rc<str> = Rc::from(label);
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            label: Rc::clone(&label),
            kind,
        });
        self.groups.insert(label, id);
        Ok(id)
    }

    /// Look up a bus by its handle.
    pub fn bus(&self, id: BusId) -> &Bus {
        &self.buses[id.0]
    }

    /// Look up a node by its handle.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Look up a node by label.
    pub fn node_group(&self, label: &str) -> Result<NodeId> {
        self.groups
            .get(label)
            .copied()
            .with_context(|| format!("no node group named {label}"))
    }

    /// Iterate over all buses with their handles.
    pub fn iter_buses(&self) -> impl Iterator<Item = (BusId, &Bus)> {
        self.buses.iter().enumerate().map(|(i, b)| (BusId(i), b))
    }

    /// Iterate over all nodes with their handles.
    pub fn iter_nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// The number of buses in the system.
    pub fn num_buses(&self) -> usize {
        self.buses.len()
    }

    /// The number of nodes in the system.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    fn check_label_free(&self, label: &str) -> Result<()> {
        ensure!(
            !self.groups.contains_key(label) && !self.buses.iter().any(|b| &*b.label == label),
            "duplicate label {label}"
        );
        Ok(())
    }
}
