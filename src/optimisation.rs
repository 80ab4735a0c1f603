//! Handoff to the external LP solver.
//!
//! This module builds the flow-variable container for an assembled
//! [`EnergySystem`] (one column per flow edge per period) and wraps the
//! blocking solve call. Constraint assembly beyond the emissions cap (balance
//! equations, storage dynamics, investment coupling) is the external solver
//! collaborator's concern, not this crate's.
pub mod emission;

use crate::network::{BusId, EnergySystem, Flow, NodeId, NodeKind};
use anyhow::{Context, Result, anyhow};
use highs::{HighsModelStatus, RowProblem as Problem, Sense};
use indexmap::IndexMap;

/// A decision variable in the optimisation
///
/// Note that this type does **not** include the value of the variable; it just
/// refers to a particular column of the problem.
pub type Variable = highs::Col;

/// One endpoint of a flow edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphRef {
    /// A bus of the energy system
    Bus(BusId),
    /// A node of the energy system
    Node(NodeId),
}

/// Identifies one flow variable: a directed edge and a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlowVarKey {
    /// Where the flow leaves
    pub source: GraphRef,
    /// Where the flow arrives
    pub target: GraphRef,
    /// The time step the variable belongs to
    pub period: usize,
}

/// A map for easy lookup of flow variables in the problem.
///
/// The entries are ordered (see [`IndexMap`]), so the column order is
/// deterministic for a deterministically built system.
#[derive(Default)]
pub struct VariableMap(IndexMap<FlowVarKey, Variable>);

impl VariableMap {
    /// The variable for the edge `source -> target` at `period`.
    pub fn get(&self, source: GraphRef, target: GraphRef, period: usize) -> Result<Variable> {
        let key = FlowVarKey {
            source,
            target,
            period,
        };
        self.0
            .get(&key)
            .copied()
            .with_context(|| format!("no flow variable for {source:?} -> {target:?} at period {period}"))
    }

    /// The number of variables in the map.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map holds no variables.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Add one column per flow edge and period of the assembled system.
///
/// Fixed profiles pin their variable to the profile value (scaled by the
/// flow's nominal value); flows with a fixed nominal capacity are bounded by
/// it; all other flows are unconstrained above zero. The flow's variable cost
/// becomes the objective coefficient.
pub fn add_flow_variables(problem: &mut Problem, es: &EnergySystem) -> VariableMap {
    let mut variables = VariableMap::default();

    for (node_id, node) in es.iter_nodes() {
        let node_ref = GraphRef::Node(node_id);
        match &node.kind {
            NodeKind::Source { output } => {
                add_edge(problem, &mut variables, node_ref, output, Direction::IntoBus, es);
            }
            NodeKind::Sink { input } => {
                add_edge(problem, &mut variables, node_ref, input, Direction::FromBus, es);
            }
            NodeKind::Transformer { inputs, outputs } => {
                for flow in inputs {
                    add_edge(problem, &mut variables, node_ref, flow, Direction::FromBus, es);
                }
                for output in outputs {
                    add_edge(problem, &mut variables, node_ref, &output.flow, Direction::IntoBus, es);
                }
            }
            NodeKind::Storage { input, output, .. } => {
                add_edge(problem, &mut variables, node_ref, input, Direction::FromBus, es);
                add_edge(problem, &mut variables, node_ref, output, Direction::IntoBus, es);
            }
        }
    }

    variables
}

enum Direction {
    IntoBus,
    FromBus,
}

fn add_edge(
    problem: &mut Problem,
    variables: &mut VariableMap,
    node: GraphRef,
    flow: &Flow,
    direction: Direction,
    es: &EnergySystem,
) {
    let (source, target) = match direction {
        Direction::IntoBus => (node, GraphRef::Bus(flow.bus)),
        Direction::FromBus => (GraphRef::Bus(flow.bus), node),
    };

    for period in 0..es.periods() {
        let var = match &flow.profile {
            Some(profile) => {
                let value = profile[period] * flow.nominal_value.unwrap_or(1.0);
                problem.add_column(flow.variable_costs, value..=value)
            }
            None => match flow.nominal_value {
                Some(nominal) => problem.add_column(flow.variable_costs, 0.0..=nominal),
                None => problem.add_column(flow.variable_costs, 0.0..),
            },
        };

        let key = FlowVarKey {
            source,
            target,
            period,
        };
        let existing = variables.0.insert(key, var).is_some();
        assert!(!existing, "Duplicate entry for flow variable");
    }
}

/// The solution returned by the external solver.
#[derive(Debug)]
pub struct Solution {
    solution: highs::Solution,
}

impl Solution {
    /// The value of every column, in creation order.
    pub fn column_values(&self) -> &[f64] {
        self.solution.columns()
    }
}

/// Hand the problem to the external solver.
///
/// This call blocks with no timeout or cancellation semantics of its own;
/// callers needing either must wrap it. Any status other than optimal is an
/// error.
pub fn solve(problem: Problem) -> Result<Solution> {
    let solved = problem.optimise(Sense::Minimise).solve();
    match solved.status() {
        HighsModelStatus::Optimal => Ok(Solution {
            solution: solved.get_solution(),
        }),
        status => Err(anyhow!("Could not solve: {status:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::assemble_scenario;
    use crate::fixture::{assert_error, scenario_config, scenario_tables_owned, OwnedTables};
    use crate::builder::ScenarioConfig;
    use rstest::rstest;

    #[rstest]
    fn test_one_variable_per_flow_and_period(
        scenario_config: ScenarioConfig,
        scenario_tables_owned: OwnedTables,
    ) {
        let tables = scenario_tables_owned.as_tables();
        let (es, _) = assemble_scenario(&scenario_config, &tables).unwrap();

        let mut problem = Problem::default();
        let variables = add_flow_variables(&mut problem, &es);

        // count flow edges over all nodes
        let edges: usize = es
            .iter_nodes()
            .map(|(_, node)| match &node.kind {
                NodeKind::Source { .. } | NodeKind::Sink { .. } => 1,
                NodeKind::Transformer { inputs, outputs } => inputs.len() + outputs.len(),
                NodeKind::Storage { .. } => 2,
            })
            .sum();
        assert_eq!(variables.len(), edges * es.periods());
    }

    #[rstest]
    fn test_missing_variable_is_an_error(
        scenario_config: ScenarioConfig,
        scenario_tables_owned: OwnedTables,
    ) {
        let tables = scenario_tables_owned.as_tables();
        let (es, registry) = assemble_scenario(&scenario_config, &tables).unwrap();

        let mut problem = Problem::default();
        let variables = add_flow_variables(&mut problem, &es);

        let supply = registry.fuel_supply("coal").unwrap();
        assert!(
            variables
                .get(
                    GraphRef::Node(supply.source),
                    GraphRef::Bus(supply.bus),
                    0
                )
                .is_ok()
        );
        // periods beyond the horizon have no variables
        let result = variables.get(
            GraphRef::Node(supply.source),
            GraphRef::Bus(supply.bus),
            es.periods(),
        );
        assert!(result.is_err());

        let empty = VariableMap::default();
        assert!(empty.is_empty());
        assert_error!(
            empty.get(GraphRef::Node(supply.source), GraphRef::Bus(supply.bus), 0),
            format!(
                "no flow variable for Node({:?}) -> Bus({:?}) at period 0",
                supply.source, supply.bus
            )
        );
    }
}
