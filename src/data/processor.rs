//! Data Processor Module
//! Year filtering, group-by aggregation and top/bottom rankings.

use super::records::{
    CategoryReview, OrderedProduct, DELIVERED_CUSTOMER_DATE, MISSING_CATEGORY, ORDER_ID, PRICE,
    PRODUCT_CATEGORY,
};
use polars::prelude::*;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProcessorError {
    #[error("Year values in column '{column}' are not valid.")]
    InvalidRange { column: String },
    /// Kept as text so the error can be cloned into every report.
    #[error("Aggregation failed: {0}")]
    PolarsError(String),
}

impl From<PolarsError> for ProcessorError {
    fn from(e: PolarsError) -> Self {
        ProcessorError::PolarsError(e.to_string())
    }
}

/// Closed interval of calendar years. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(a: i32, b: i32) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// Restrict `self` to lie within `bounds`.
    pub fn clamp_to(&self, bounds: YearRange) -> YearRange {
        YearRange::new(
            self.start.clamp(bounds.start, bounds.end),
            self.end.clamp(bounds.start, bounds.end),
        )
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Aggregate sales for one product category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySales {
    pub product_category_name: String,
    /// Distinct order ids in the category
    #[serde(rename = "order_id")]
    pub order_count: usize,
    /// Sum of `price_y`, nulls skipped
    #[serde(rename = "price_y")]
    pub total_price: f64,
}

/// Which ranking a review row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Provenance {
    #[serde(rename = "Top 10")]
    Top10,
    #[serde(rename = "Lowest 10")]
    Lowest10,
}

impl Provenance {
    pub fn label(&self) -> &'static str {
        match self {
            Provenance::Top10 => "Top 10",
            Provenance::Lowest10 => "Lowest 10",
        }
    }
}

/// A review row tagged with the ranking that selected it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedReview {
    pub product_category_name_english: String,
    pub review_score: Option<f64>,
    #[serde(rename = "Category")]
    pub provenance: Provenance,
}

/// Highest and lowest rated categories.
///
/// With fewer than `2 * n` categories the two lists share rows; both keep
/// them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingsReport {
    pub top: Vec<RankedReview>,
    pub lowest: Vec<RankedReview>,
}

impl RatingsReport {
    /// Top rows followed by lowest rows, for a single plotting pass.
    pub fn combined(&self) -> Vec<&RankedReview> {
        self.top.iter().chain(self.lowest.iter()).collect()
    }
}

/// Column of the sales frame holding the delivered calendar year.
pub const DELIVERED_YEAR: &str = "delivered_year";

/// Handles filtering and aggregation with Polars.
pub struct DataProcessor;

impl DataProcessor {
    /// Frame with the columns the sales section works on: order id,
    /// category, price and delivered year (null when the date is missing).
    pub fn sales_frame(rows: &[OrderedProduct]) -> Result<DataFrame, ProcessorError> {
        let order_ids: Vec<Option<&str>> = rows.iter().map(|r| r.order_id.as_deref()).collect();
        let categories: Vec<&str> = rows
            .iter()
            .map(|r| r.product_category_name.as_str())
            .collect();
        let prices: Vec<Option<f64>> = rows.iter().map(|r| r.price_y).collect();
        let years: Vec<Option<i32>> = rows.iter().map(OrderedProduct::delivered_year).collect();

        Ok(DataFrame::new(vec![
            Column::new(ORDER_ID.into(), order_ids),
            Column::new(PRODUCT_CATEGORY.into(), categories),
            Column::new(PRICE.into(), prices),
            Column::new(DELIVERED_YEAR.into(), years),
        ])?)
    }

    /// Smallest and largest delivered year among rows with a valid date.
    pub fn year_bounds(frame: &DataFrame) -> Result<YearRange, ProcessorError> {
        let years = frame.column(DELIVERED_YEAR)?.as_materialized_series().i32()?;

        match (years.min(), years.max()) {
            (Some(min), Some(max)) => Ok(YearRange::new(min, max)),
            _ => Err(ProcessorError::InvalidRange {
                column: DELIVERED_CUSTOMER_DATE.to_string(),
            }),
        }
    }

    /// Rows delivered within `range`, inclusive. Rows without a date never match.
    pub fn filter_by_year(
        frame: &DataFrame,
        range: YearRange,
    ) -> Result<DataFrame, ProcessorError> {
        let year = col(DELIVERED_YEAR);
        let filtered = frame
            .clone()
            .lazy()
            .filter(
                year.clone()
                    .gt_eq(lit(range.start))
                    .and(year.lt_eq(lit(range.end))),
            )
            .collect()?;

        Ok(filtered)
    }

    /// Group by category and keep the `n` categories with the most distinct orders.
    ///
    /// Ties on the order count are broken by category name, ascending.
    pub fn top_categories_by_sales(
        frame: &DataFrame,
        n: usize,
    ) -> Result<Vec<CategorySales>, ProcessorError> {
        let grouped = frame
            .clone()
            .lazy()
            .group_by([col(PRODUCT_CATEGORY)])
            .agg([
                col(ORDER_ID).drop_nulls().n_unique().alias(ORDER_ID),
                col(PRICE).sum().alias(PRICE),
            ])
            .sort_by_exprs(
                [col(ORDER_ID), col(PRODUCT_CATEGORY)],
                SortMultipleOptions {
                    descending: vec![true, false],
                    ..Default::default()
                },
            )
            .limit(IdxSize::try_from(n).unwrap_or(IdxSize::MAX))
            .collect()?;

        let names = grouped.column(PRODUCT_CATEGORY)?.as_materialized_series().str()?;
        let counts = grouped.column(ORDER_ID)?.cast(&DataType::UInt64)?;
        let counts = counts.as_materialized_series().u64()?;
        let totals = grouped.column(PRICE)?.cast(&DataType::Float64)?;
        let totals = totals.as_materialized_series().f64()?;

        Ok(names
            .into_iter()
            .zip(counts.into_iter())
            .zip(totals.into_iter())
            .map(|((name, count), total)| CategorySales {
                product_category_name: name.unwrap_or(MISSING_CATEGORY).to_string(),
                order_count: count.unwrap_or(0) as usize,
                total_price: total.unwrap_or(0.0),
            })
            .collect())
    }

    /// Sort by score descending (missing scores last) and tag the first and
    /// last `n` rows.
    pub fn rank_reviews(reviews: &[CategoryReview], n: usize) -> RatingsReport {
        let mut sorted: Vec<&CategoryReview> = reviews.iter().collect();
        sorted.sort_by(|a, b| {
            compare_scores_desc(a.review_score, b.review_score).then_with(|| {
                a.product_category_name_english
                    .cmp(&b.product_category_name_english)
            })
        });

        let tag = |r: &CategoryReview, provenance| RankedReview {
            product_category_name_english: r.product_category_name_english.clone(),
            review_score: r.review_score,
            provenance,
        };

        let top = sorted
            .iter()
            .take(n)
            .map(|&r| tag(r, Provenance::Top10))
            .collect();
        let lowest = sorted[sorted.len().saturating_sub(n)..]
            .iter()
            .map(|&r| tag(r, Provenance::Lowest10))
            .collect();

        RatingsReport { top, lowest }
    }
}

fn compare_scores_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
