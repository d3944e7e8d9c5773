//! Data module - CSV loading, validation and aggregation

mod loader;
mod processor;
mod records;
mod report;

pub use loader::{CsvTable, LoaderError};
pub use processor::{CategorySales, Provenance, RankedReview, RatingsReport, YearRange};
pub use report::{compute_report, Dataset, RawTables, ReportData, SalesReport, SectionError};
