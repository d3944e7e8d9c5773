//! Table Preview Module
//! Tabular previews of the computed aggregates, with a copy-as-JSON action.

use crate::data::{CategorySales, RankedReview};
use egui::RichText;
use serde::Serialize;

/// A rendered-ready table: headers, formatted cells and the rows as JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewTable {
    id: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub json: Option<String>,
}

impl PreviewTable {
    pub fn from_sales(id: &str, sales: &[CategorySales]) -> Self {
        let rows = sales
            .iter()
            .map(|s| {
                vec![
                    s.product_category_name.clone(),
                    s.order_count.to_string(),
                    format!("{:.2}", s.total_price),
                ]
            })
            .collect();

        Self {
            id: id.to_string(),
            headers: vec![
                "product_category_name".to_string(),
                "order_id".to_string(),
                "price_y".to_string(),
            ],
            rows,
            json: to_json(sales),
        }
    }

    pub fn from_reviews(id: &str, reviews: &[RankedReview]) -> Self {
        let rows = reviews
            .iter()
            .map(|r| {
                vec![
                    r.product_category_name_english.clone(),
                    r.review_score
                        .map(|s| format!("{:.4}", s))
                        .unwrap_or_else(|| "-".to_string()),
                    r.provenance.label().to_string(),
                ]
            })
            .collect();

        Self {
            id: id.to_string(),
            headers: vec![
                "product_category_name_english".to_string(),
                "review_score".to_string(),
                "Category".to_string(),
            ],
            rows,
            json: to_json(reviews),
        }
    }

    /// Draw the table with a leading row-index column.
    pub fn draw(&self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                if let Some(json) = &self.json {
                    if ui.small_button("📋 Copy JSON").clicked() {
                        ui.ctx().copy_text(json.clone());
                        log::debug!("Copied table '{}' to clipboard", self.id);
                    }
                    ui.add_space(4.0);
                }

                if self.rows.is_empty() {
                    ui.label(RichText::new("No rows").italics());
                    return;
                }

                egui::Grid::new(ui.make_persistent_id(format!("preview_table_{}", self.id)))
                    .striped(true)
                    .min_col_width(40.0)
                    .spacing([16.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("").size(12.0));
                        for header in &self.headers {
                            ui.label(RichText::new(header).strong().size(12.0));
                        }
                        ui.end_row();

                        for (i, row) in self.rows.iter().enumerate() {
                            ui.label(RichText::new(i.to_string()).weak().size(12.0));
                            for cell in row {
                                ui.label(RichText::new(cell).size(12.0));
                            }
                            ui.end_row();
                        }
                    });
            });
    }
}

fn to_json<T: Serialize>(rows: &[T]) -> Option<String> {
    match serde_json::to_string_pretty(rows) {
        Ok(json) => Some(json),
        Err(e) => {
            log::warn!("Could not serialise table rows: {}", e);
            None
        }
    }
}
