//! Kenneth R. French data library.
//!
//! Datasets are published as zipped CSV files named `<dataset>_CSV.zip`.
//! [`FrenchClient`] downloads and unpacks them; [`parse_dataset`] splits the
//! CSV into its description and tables.

pub mod client;
pub mod parser;

pub use client::{FRENCH_LIBRARY_URL, FrenchClient, THREE_FACTOR_DATASET};
pub use parser::{FactorTable, FamaFrenchDataset, parse_dataset};
