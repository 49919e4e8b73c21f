//! Presenting aggregates: console tables, CSV files and Plotly HTML charts.

pub mod chart;
pub mod table;

pub use chart::*;
pub use table::*;
