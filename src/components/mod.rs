//! Presentational components

mod bio;

pub use bio::{Bio, BioProps};
