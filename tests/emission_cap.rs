//! The emissions cap against known fuel flows.
//!
//! With coal drawn at [10, 20] and natural gas at [5, 5] over a two-period
//! horizon, total emissions are 10*0.361 + 20*0.361 + 5*0.204 + 5*0.204 =
//! 12.87. A cap below that must make the problem infeasible; a cap at or
//! above it must not.
use epstrans::builder::buses::create_buses;
use epstrans::carrier::CarrierID;
use epstrans::network::EnergySystem;
use epstrans::optimisation::emission::add_emission_cap;
use epstrans::optimisation::{GraphRef, add_flow_variables, solve};
use highs::RowProblem as Problem;
use indexmap::indexmap;

const PERIODS: usize = 2;

fn capped_problem(cap: f64) -> Problem {
    let mut es = EnergySystem::new(PERIODS).unwrap();
    let carriers: Vec<CarrierID> = ["electricity", "natural_gas", "coal"]
        .into_iter()
        .map(CarrierID::new)
        .collect();
    let registry = create_buses(
        &mut es,
        &carriers,
        &["a".into()],
        &indexmap! {
            CarrierID::new("natural_gas") => 0.0282,
            CarrierID::new("coal") => 0.0088,
        },
        &indexmap! { CarrierID::new("electricity") => true },
    )
    .unwrap();

    let mut problem = Problem::default();
    let variables = add_flow_variables(&mut problem, &es);

    // pin the fuel draws the way the rest of the (out-of-scope) constraint
    // set would: coal at [10, 20], natural gas at [5, 5]
    for (fuel, draws) in [("coal", [10.0, 20.0]), ("natural_gas", [5.0, 5.0])] {
        let supply = registry.fuel_supply(fuel).unwrap();
        for (period, draw) in draws.into_iter().enumerate() {
            let var = variables
                .get(GraphRef::Node(supply.source), GraphRef::Bus(supply.bus), period)
                .unwrap();
            problem.add_row(draw..=draw, [(var, 1.0)]);
        }
    }

    add_emission_cap(&mut problem, &variables, &registry, PERIODS, cap).unwrap();
    problem
}

#[test]
fn test_cap_below_emissions_is_infeasible() {
    let problem = capped_problem(12.0);
    let result = solve(problem);
    assert_eq!(
        result.unwrap_err().to_string(),
        "Could not solve: Infeasible"
    );
}

#[test]
fn test_cap_just_below_the_exact_sum_is_infeasible() {
    let problem = capped_problem(12.86);
    assert!(solve(problem).is_err());
}

#[test]
fn test_cap_at_the_exact_sum_is_feasible() {
    let problem = capped_problem(12.87);
    solve(problem).unwrap();
}

#[test]
fn test_cap_above_emissions_is_feasible() {
    let problem = capped_problem(13.0);
    solve(problem).unwrap();
}
