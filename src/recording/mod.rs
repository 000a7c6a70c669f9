//! Recording module for self-play training data.
//!
//! # Components
//!
//! - `csv_writer`: CSV output and loading of training examples

pub mod csv_writer;

pub use csv_writer::{load_examples_from_csv, CsvWriter};
