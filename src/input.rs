//! Parameter tables consumed by the builder.
//!
//! Each table can be read from a CSV file or built from already-parsed rows.
//! Derived columns (the cost table's `epc`, the transmission table's
//! `losses`) are computed once at load time, before any node creation reads
//! them.
pub mod cost;
pub mod efficiency;
pub mod storage;
pub mod timeseries;
pub mod transmission;

use crate::id::define_id_type;
use anyhow::{Context, Result, ensure};
use serde::de::DeserializeOwned;
use std::path::Path;

define_id_type! {TechnologyID}

/// Read a series of type `T`s from a CSV file into a `Vec<T>`.
pub fn read_vec_from_csv<T: DeserializeOwned>(file_path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(file_path)
        .with_context(|| format!("Could not read {}", file_path.display()))?;

    let mut vec = Vec::new();
    for result in reader.deserialize() {
        let row: T =
            result.with_context(|| format!("Error reading {}", file_path.display()))?;
        vec.push(row);
    }
    ensure!(
        !vec.is_empty(),
        "CSV file {} cannot be empty",
        file_path.display()
    );

    Ok(vec)
}
