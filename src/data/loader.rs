//! CSV Data Loader Module
//! Handles CSV file loading and column extraction using Polars.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoaderError {
    #[error("File '{}' not found!", .0.display())]
    MissingFile(PathBuf),
    #[error("Column '{column}' not found in '{file}'.")]
    MissingColumn { column: String, file: String },
    /// Polars errors are kept as text so the error can be cloned into every report.
    #[error("Failed to load CSV: {0}")]
    CsvError(String),
}

impl From<PolarsError> for LoaderError {
    fn from(e: PolarsError) -> Self {
        LoaderError::CsvError(e.to_string())
    }
}

/// A CSV file loaded with every column typed as text.
///
/// Coercion to dates and numbers is done per column by the caller, so a
/// value that fails to parse becomes null instead of failing the load.
#[derive(Debug, Clone)]
pub struct CsvTable {
    file_name: String,
    df: DataFrame,
}

impl CsvTable {
    pub fn new(file_name: impl Into<String>, df: DataFrame) -> Self {
        Self {
            file_name: file_name.into(),
            df,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Get the number of rows in the table.
    pub fn get_row_count(&self) -> usize {
        self.df.height()
    }

    /// Get list of column names.
    pub fn get_columns(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.df.column(column).is_ok()
    }

    /// Fail with `MissingColumn` for the first absent column.
    pub fn require_columns(&self, columns: &[&str]) -> Result<(), LoaderError> {
        match columns.iter().find(|c| !self.has_column(c)) {
            Some(column) => Err(self.missing(column)),
            None => Ok(()),
        }
    }

    /// Values of a required column as text. Nulls stay `None`.
    pub fn text_column(&self, column: &str) -> Result<Vec<Option<String>>, LoaderError> {
        let col = self.df.column(column).map_err(|_| self.missing(column))?;
        let as_text = col.cast(&DataType::String)?;
        let ca = as_text.as_materialized_series().str()?;

        Ok(ca
            .into_iter()
            .map(|v| v.map(|s| s.to_string()))
            .collect())
    }

    /// Values of a column that may be absent from the file.
    pub fn optional_text_column(
        &self,
        column: &str,
    ) -> Result<Option<Vec<Option<String>>>, LoaderError> {
        if self.has_column(column) {
            self.text_column(column).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Values of a required column cast to `Float64`.
    ///
    /// The cast is non-strict: free-form text turns into null, and so do
    /// `inf`/`NaN` spellings.
    pub fn numeric_column(&self, column: &str) -> Result<Vec<Option<f64>>, LoaderError> {
        self.require_columns(&[column])?;

        let values = self
            .df
            .clone()
            .lazy()
            .select([col(column)
                .cast(DataType::String)
                .str()
                .strip_chars(lit(" \t\n\r"))
                .cast(DataType::Float64)])
            .collect()?;
        let ca = values.column(column)?.as_materialized_series().f64()?;

        Ok(ca
            .into_iter()
            .map(|v| v.filter(|v| v.is_finite()))
            .collect())
    }

    fn missing(&self, column: &str) -> LoaderError {
        LoaderError::MissingColumn {
            column: column.to_string(),
            file: self.file_name.clone(),
        }
    }
}

/// Handles CSV file loading with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file using Polars.
    ///
    /// Schema inference is disabled so that every column arrives as text;
    /// empty fields load as null.
    pub fn load_csv(file_path: &Path) -> Result<CsvTable, LoaderError> {
        if !file_path.is_file() {
            return Err(LoaderError::MissingFile(file_path.to_path_buf()));
        }

        let df = LazyCsvReader::new(file_path)
            .with_infer_schema_length(Some(0))
            .with_has_header(true)
            .finish()?
            .collect()?;

        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| file_path.display().to_string());

        let table = CsvTable::new(file_name, df);
        log::info!(
            "Loaded {} rows from {}",
            table.get_row_count(),
            file_path.display()
        );
        log::debug!("{} columns: {:?}", table.file_name(), table.get_columns());

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_csv(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).expect("write csv");
        path
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("absent.csv");
        let err = DataLoader::load_csv(&path).unwrap_err();
        assert!(matches!(err, LoaderError::MissingFile(_)));
        assert_eq!(
            err.to_string(),
            format!("File '{}' not found!", path.display())
        );
    }

    #[test]
    fn numeric_looking_categories_stay_text() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_csv(
            &dir,
            "orders.csv",
            "order_id,product_category_name,price_y\no1,007,10.5\no2,1.50,2\n",
        );
        let table = DataLoader::load_csv(&path).expect("load");

        let categories = table.text_column("product_category_name").unwrap();
        assert_eq!(
            categories,
            vec![Some("007".to_string()), Some("1.50".to_string())]
        );
        assert_eq!(table.get_row_count(), 2);
        assert_eq!(table.file_name(), "orders.csv");
    }

    #[test]
    fn numeric_column_coerces_bad_values_to_null() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_csv(
            &dir,
            "reviews.csv",
            "product_category_name_english,review_score\na,4.5\nb,excellent\nc,\nd, 3 \ne,inf\nf,NaN\n",
        );
        let table = DataLoader::load_csv(&path).expect("load");

        let scores = table.numeric_column("review_score").unwrap();
        assert_eq!(
            scores,
            vec![Some(4.5), None, None, Some(3.0), None, None]
        );
    }

    #[test]
    fn numeric_column_requires_the_column() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_csv(&dir, "reviews.csv", "product_category_name_english\na\n");
        let table = DataLoader::load_csv(&path).expect("load");

        assert_eq!(
            table.numeric_column("review_score"),
            Err(LoaderError::MissingColumn {
                column: "review_score".to_string(),
                file: "reviews.csv".to_string(),
            })
        );
    }

    #[test]
    fn require_columns_names_the_first_missing_column() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_csv(&dir, "orders.csv", "order_id,price_y\no1,1\n");
        let table = DataLoader::load_csv(&path).expect("load");

        assert!(table.require_columns(&["order_id", "price_y"]).is_ok());
        match table.require_columns(&["order_id", "product_category_name", "x"]) {
            Err(LoaderError::MissingColumn { column, file }) => {
                assert_eq!(column, "product_category_name");
                assert_eq!(file, "orders.csv");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(table.optional_text_column("order_approved_at").unwrap().is_none());
    }
}
