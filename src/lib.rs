//! Model-assembly layer for multi-region electricity capacity-expansion studies.
//!
//! Given cost, efficiency, storage and transmission parameters plus time-series
//! demand and renewable feed-in data, this crate constructs a graph of
//! energy-carrier buses and typed nodes (sources, sinks, transformers,
//! storages) annotated with operating costs and annuitised investment terms,
//! and installs an aggregate emissions-cap constraint on the optimisation
//! problem handed to the external LP solver. The solve itself is the solver's
//! concern; this crate only builds the structured problem instance.
#![warn(missing_docs)]
pub mod builder;
pub mod carrier;
pub mod finance;
pub mod id;
pub mod input;
pub mod log;
pub mod network;
pub mod optimisation;
pub mod region;

#[cfg(test)]
mod fixture;
