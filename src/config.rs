//! Dashboard Configuration
//! Default file locations, ranking size and window geometry.

use serde::Serialize;
use std::path::PathBuf;

/// Orders file read for the best-selling analysis.
pub const ORDERS_FILE: &str = "ordered_products_by_customers.csv";
/// Reviews file read for the rating analysis.
pub const REVIEWS_FILE: &str = "category_reviews.csv";

/// Static configuration handed to the app at start-up.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardConfig {
    pub data_dir: PathBuf,
    pub orders_file: String,
    pub reviews_file: String,
    /// Size of each ranking (top sellers, top rated, lowest rated)
    pub top_n: usize,
    pub window_title: String,
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            orders_file: ORDERS_FILE.to_string(),
            reviews_file: REVIEWS_FILE.to_string(),
            top_n: 10,
            window_title: "E-Commerce Public Dataset Analysis".to_string(),
            window_size: [1400.0, 900.0],
            min_window_size: [1000.0, 700.0],
        }
    }
}

impl DashboardConfig {
    pub fn orders_path(&self) -> PathBuf {
        self.data_dir.join(&self.orders_file)
    }

    pub fn reviews_path(&self) -> PathBuf {
        self.data_dir.join(&self.reviews_file)
    }

    /// Single-line JSON for the start-up log.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_point_at_working_directory() {
        let config = DashboardConfig::default();
        assert_eq!(config.orders_path(), PathBuf::from(".").join(ORDERS_FILE));
        assert_eq!(config.reviews_path(), PathBuf::from(".").join(REVIEWS_FILE));
        assert_eq!(config.top_n, 10);
    }

    #[test]
    fn config_logs_as_json() {
        let json = DashboardConfig::default().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["orders_file"], ORDERS_FILE);
        assert_eq!(value["reviews_file"], REVIEWS_FILE);
        assert_eq!(value["top_n"], 10);
        assert_eq!(value["data_dir"], ".");
        assert!(!json.contains('\n'));
    }
}
