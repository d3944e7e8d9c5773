//! Typed Records Module
//! Converts loaded CSV tables into order and review rows.

use super::loader::{CsvTable, LoaderError};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

pub const ORDER_ID: &str = "order_id";
pub const PRODUCT_CATEGORY: &str = "product_category_name";
pub const PRICE: &str = "price_y";
pub const PURCHASE_TIMESTAMP: &str = "order_purchase_timestamp";
pub const APPROVED_AT: &str = "order_approved_at";
pub const DELIVERED_CARRIER_DATE: &str = "order_delivered_carrier_date";
pub const DELIVERED_CUSTOMER_DATE: &str = "order_delivered_customer_date";
pub const ESTIMATED_DELIVERY_DATE: &str = "order_estimated_delivery_date";

pub const CATEGORY_ENGLISH: &str = "product_category_name_english";
pub const REVIEW_SCORE: &str = "review_score";

/// Key used for a row whose category is missing.
pub const MISSING_CATEGORY: &str = "nan";

const DATETIME_FORMATS: [&str; 8] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
];

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

/// Parse a free-form timestamp. Returns `None` for anything unrecognised.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    // Offsets are dropped; the wall-clock time written in the file is kept.
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// One order line of `ordered_products_by_customers.csv`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderedProduct {
    pub order_id: Option<String>,
    pub product_category_name: String,
    pub price_y: Option<f64>,
    pub order_purchase_timestamp: Option<NaiveDateTime>,
    pub order_approved_at: Option<NaiveDateTime>,
    pub order_delivered_carrier_date: Option<NaiveDateTime>,
    pub order_delivered_customer_date: Option<NaiveDateTime>,
    pub order_estimated_delivery_date: Option<NaiveDateTime>,
}

impl OrderedProduct {
    /// Calendar year of the customer delivery, if the date parsed.
    pub fn delivered_year(&self) -> Option<i32> {
        use chrono::Datelike;
        self.order_delivered_customer_date.map(|d| d.year())
    }

    /// Build rows from the orders table.
    ///
    /// Only the delivered-date column is required here; the aggregation
    /// columns are validated separately once a year range exists.
    pub fn from_table(table: &CsvTable) -> Result<Vec<Self>, LoaderError> {
        table.require_columns(&[DELIVERED_CUSTOMER_DATE])?;

        let n = table.get_row_count();
        let order_ids = table.optional_text_column(ORDER_ID)?;
        let categories = table.optional_text_column(PRODUCT_CATEGORY)?;
        let prices = if table.has_column(PRICE) {
            Some(table.numeric_column(PRICE)?)
        } else {
            None
        };

        let purchase = timestamp_column(table, PURCHASE_TIMESTAMP)?;
        let approved = timestamp_column(table, APPROVED_AT)?;
        let carrier = timestamp_column(table, DELIVERED_CARRIER_DATE)?;
        let delivered = timestamp_column(table, DELIVERED_CUSTOMER_DATE)?;
        let estimated = timestamp_column(table, ESTIMATED_DELIVERY_DATE)?;

        let rows = (0..n)
            .map(|i| OrderedProduct {
                order_id: cell(&order_ids, i).cloned().flatten(),
                product_category_name: cell(&categories, i)
                    .cloned()
                    .flatten()
                    .unwrap_or_else(|| MISSING_CATEGORY.to_string()),
                price_y: cell(&prices, i).copied().flatten(),
                order_purchase_timestamp: cell(&purchase, i).copied().flatten(),
                order_approved_at: cell(&approved, i).copied().flatten(),
                order_delivered_carrier_date: cell(&carrier, i).copied().flatten(),
                order_delivered_customer_date: cell(&delivered, i).copied().flatten(),
                order_estimated_delivery_date: cell(&estimated, i).copied().flatten(),
            })
            .collect();

        Ok(rows)
    }
}

/// One row of `category_reviews.csv`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryReview {
    pub product_category_name_english: String,
    pub review_score: Option<f64>,
}

impl CategoryReview {
    /// Build rows from the reviews table. Both columns are required.
    pub fn from_table(table: &CsvTable) -> Result<Vec<Self>, LoaderError> {
        table.require_columns(&[REVIEW_SCORE, CATEGORY_ENGLISH])?;

        let scores = table.numeric_column(REVIEW_SCORE)?;
        let names = table.text_column(CATEGORY_ENGLISH)?;

        Ok(names
            .into_iter()
            .zip(scores)
            .map(|(name, review_score)| CategoryReview {
                product_category_name_english: name
                    .unwrap_or_else(|| MISSING_CATEGORY.to_string()),
                review_score,
            })
            .collect())
    }
}

fn timestamp_column(
    table: &CsvTable,
    column: &str,
) -> Result<Option<Vec<Option<NaiveDateTime>>>, LoaderError> {
    Ok(table.optional_text_column(column)?.map(|values| {
        values
            .iter()
            .map(|v| v.as_deref().and_then(parse_timestamp))
            .collect()
    }))
}

fn cell<T>(column: &Option<Vec<T>>, i: usize) -> Option<&T> {
    column.as_ref().and_then(|values| values.get(i))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use polars::prelude::*;

    fn orders_table(columns: Vec<Column>) -> CsvTable {
        CsvTable::new("orders.csv", DataFrame::new(columns).unwrap())
    }

    #[test]
    fn parses_common_timestamp_shapes() {
        let dt = parse_timestamp("2018-08-13 18:24:27").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day(), dt.hour()), (2018, 8, 13, 18));

        assert_eq!(parse_timestamp("2017-01-05T10:00:00").unwrap().year(), 2017);
        assert_eq!(parse_timestamp("2017-01-05T10:00:00Z").unwrap().year(), 2017);
        assert_eq!(parse_timestamp("2016-10-04").unwrap().year(), 2016);
        assert_eq!(parse_timestamp("12/31/2019 23:59").unwrap().year(), 2019);
        assert_eq!(parse_timestamp(" 2020/02/29 ").unwrap().day(), 29);
    }

    #[test]
    fn offset_timestamps_keep_their_local_year() {
        let dt = parse_timestamp("2018-01-01T00:30:00+01:00").unwrap();
        assert_eq!((dt.year(), dt.hour(), dt.minute()), (2018, 0, 30));

        let dt = parse_timestamp("2017-12-31T23:30:00-03:00").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2017, 12, 31));
    }

    #[test]
    fn unparseable_timestamps_become_none() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("not a date"), None);
        assert_eq!(parse_timestamp("2018-13-45"), None);
    }

    #[test]
    fn orders_require_delivered_date_column() {
        let table = orders_table(vec![
            Column::new(ORDER_ID.into(), ["o1"]),
            Column::new(PRODUCT_CATEGORY.into(), ["a"]),
            Column::new(PRICE.into(), ["1"]),
        ]);

        match OrderedProduct::from_table(&table) {
            Err(LoaderError::MissingColumn { column, .. }) => {
                assert_eq!(column, DELIVERED_CUSTOMER_DATE)
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn orders_coerce_cells_individually() {
        let table = orders_table(vec![
            Column::new(ORDER_ID.into(), [Some("o1"), None]),
            Column::new(PRODUCT_CATEGORY.into(), [Some("toys"), None]),
            Column::new(PRICE.into(), [Some("12.5"), Some("n/a")]),
            Column::new(
                DELIVERED_CUSTOMER_DATE.into(),
                [Some("2018-01-02 10:00:00"), Some("garbage")],
            ),
        ]);

        let rows = OrderedProduct::from_table(&table).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].order_id.as_deref(), Some("o1"));
        assert_eq!(rows[0].price_y, Some(12.5));
        assert_eq!(rows[0].delivered_year(), Some(2018));
        assert_eq!(rows[0].order_purchase_timestamp, None);

        assert_eq!(rows[1].order_id, None);
        assert_eq!(rows[1].product_category_name, MISSING_CATEGORY);
        assert_eq!(rows[1].price_y, None);
        assert_eq!(rows[1].delivered_year(), None);
    }

    #[test]
    fn reviews_require_both_columns() {
        let table = CsvTable::new(
            "category_reviews.csv",
            DataFrame::new(vec![Column::new(CATEGORY_ENGLISH.into(), ["a"])]).unwrap(),
        );
        match CategoryReview::from_table(&table) {
            Err(LoaderError::MissingColumn { column, file }) => {
                assert_eq!(column, REVIEW_SCORE);
                assert_eq!(file, "category_reviews.csv");
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let table = CsvTable::new(
            "category_reviews.csv",
            DataFrame::new(vec![Column::new(REVIEW_SCORE.into(), ["4.0"])]).unwrap(),
        );
        assert_eq!(
            CategoryReview::from_table(&table),
            Err(LoaderError::MissingColumn {
                column: CATEGORY_ENGLISH.to_string(),
                file: "category_reviews.csv".to_string(),
            })
        );
    }
}
