//! Output module for persisting and presenting tallies
//!
//! This module handles:
//! - Validating the destination file name
//! - Writing the aggregate as a two-column CSV file
//! - Reading a previously written tally back
//! - Printing a tally to the terminal

mod csv;
mod summary;

pub use csv::{read_tally_csv, write_tally_csv, CsvDestination};
pub use summary::{format_tally, print_tally};
