//! Regions are the geographical areas the modelled system is split into.
//!
//! Regions are disjoint; the shared global fuel pools are not a region (see
//! [`crate::builder::buses::BusRegistry`], which keeps them separate rather
//! than under a sentinel key).
use crate::id::define_id_type;

define_id_type! {RegionID}
