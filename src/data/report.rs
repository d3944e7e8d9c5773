//! Report Module
//! Turns the two loaded tables and a year selection into everything the
//! dashboard draws. Each section succeeds or fails on its own.

use super::loader::{CsvTable, DataLoader, LoaderError};
use super::processor::{
    CategorySales, DataProcessor, ProcessorError, RatingsReport, YearRange,
};
use super::records::{CategoryReview, OrderedProduct, ORDER_ID, PRICE, PRODUCT_CATEGORY};
use crate::config::DashboardConfig;
use polars::prelude::DataFrame;
use serde::Serialize;
use thiserror::Error;

/// An error that stops one analysis section.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SectionError {
    #[error(transparent)]
    Loader(#[from] LoaderError),
    #[error(transparent)]
    Processor(#[from] ProcessorError),
}

/// Both input tables, each either loaded or failed.
#[derive(Debug)]
pub struct RawTables {
    pub orders: Result<CsvTable, LoaderError>,
    pub reviews: Result<CsvTable, LoaderError>,
}

impl RawTables {
    /// Read both files from the configured data directory.
    pub fn load(config: &DashboardConfig) -> Self {
        let orders = DataLoader::load_csv(&config.orders_path());
        if let Err(e) = &orders {
            log::warn!("Orders table unavailable: {}", e);
        }
        let reviews = DataLoader::load_csv(&config.reviews_path());
        if let Err(e) = &reviews {
            log::warn!("Reviews table unavailable: {}", e);
        }
        Self { orders, reviews }
    }
}

/// Best-selling categories for the selected years.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesReport {
    pub selected: YearRange,
    pub top_categories: Vec<CategorySales>,
}

/// Everything one render pass needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportData {
    /// Slider bounds, present whenever delivered years could be derived
    pub year_bounds: Option<YearRange>,
    pub sales: Result<SalesReport, SectionError>,
    pub ratings: Result<RatingsReport, SectionError>,
}

impl ReportData {
    /// JSON of both sections' tables; failed sections serialise as null.
    pub fn tables_json(&self) -> serde_json::Result<String> {
        #[derive(Serialize)]
        struct Tables<'a> {
            sales: Option<&'a SalesReport>,
            ratings: Option<&'a RatingsReport>,
        }

        serde_json::to_string_pretty(&Tables {
            sales: self.sales.as_ref().ok(),
            ratings: self.ratings.as_ref().ok(),
        })
    }
}

/// Validated, typed contents of both tables.
///
/// Built once after loading; only the year filter and the aggregation run
/// again when the selection changes.
#[derive(Debug, Clone)]
pub struct Dataset {
    sales_frame: Result<DataFrame, SectionError>,
    /// Columns checked only after the year range is known
    sales_columns: Result<(), SectionError>,
    year_bounds: Result<YearRange, SectionError>,
    reviews: Result<Vec<CategoryReview>, SectionError>,
}

impl Dataset {
    pub fn from_tables(raw: &RawTables) -> Self {
        let sales_frame = raw
            .orders
            .as_ref()
            .map_err(|e| SectionError::from(e.clone()))
            .and_then(|table| Ok(OrderedProduct::from_table(table)?))
            .and_then(|rows| Ok(DataProcessor::sales_frame(&rows)?));

        let sales_columns = match &raw.orders {
            Ok(table) => table
                .require_columns(&[PRICE, ORDER_ID, PRODUCT_CATEGORY])
                .map_err(SectionError::from),
            Err(e) => Err(e.clone().into()),
        };

        let year_bounds = sales_frame
            .as_ref()
            .map_err(Clone::clone)
            .and_then(|frame| Ok(DataProcessor::year_bounds(frame)?));

        let reviews = match &raw.reviews {
            Ok(table) => CategoryReview::from_table(table).map_err(SectionError::from),
            Err(e) => Err(e.clone().into()),
        };

        Self {
            sales_frame,
            sales_columns,
            year_bounds,
            reviews,
        }
    }

    /// Slider bounds, when delivered years could be derived.
    pub fn year_bounds(&self) -> Option<YearRange> {
        self.year_bounds.as_ref().ok().copied()
    }

    fn compute_sales(
        &self,
        selected: Option<YearRange>,
        top_n: usize,
    ) -> Result<SalesReport, SectionError> {
        let frame = self.sales_frame.as_ref().map_err(Clone::clone)?;
        let bounds = self.year_bounds.clone()?;
        let selected = selected.unwrap_or(bounds).clamp_to(bounds);
        self.sales_columns.clone()?;

        let filtered = DataProcessor::filter_by_year(frame, selected)?;
        log::debug!(
            "{} of {} rows delivered in {}",
            filtered.height(),
            frame.height(),
            selected
        );

        Ok(SalesReport {
            selected,
            top_categories: DataProcessor::top_categories_by_sales(&filtered, top_n)?,
        })
    }
}

/// Pure report computation for `selected` (full range when `None`).
///
/// Each section succeeds or fails on its own. Called again on every change
/// of the year selection with the same `Dataset`.
pub fn compute_report(data: &Dataset, selected: Option<YearRange>, top_n: usize) -> ReportData {
    let sales = data.compute_sales(selected, top_n);
    if let Err(e) = &sales {
        log::warn!("Best-selling section stopped: {}", e);
    }

    let ratings = data
        .reviews
        .as_ref()
        .map(|reviews| DataProcessor::rank_reviews(reviews, top_n))
        .map_err(Clone::clone);
    if let Err(e) = &ratings {
        log::warn!("Rating section stopped: {}", e);
    }

    ReportData {
        year_bounds: data.year_bounds(),
        sales,
        ratings,
    }
}
