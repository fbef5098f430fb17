//! Record module - Rendering of trial statistics as delimited text.

mod csv;

pub use csv::*;
