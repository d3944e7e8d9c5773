//! Charts module - Chart and table rendering

mod plotter;
mod table;

pub use plotter::ChartPlotter;
pub use table::PreviewTable;
