//! Report View Widget
//! Central scrollable page: title, the best-seller section and the rating section.
//! A section whose computation failed shows its error in place of its output.

use crate::charts::{ChartPlotter, PreviewTable};
use crate::data::{RatingsReport, ReportData, SalesReport, SectionError};
use egui::{Color32, RichText, ScrollArea};

const ERROR_COLOR: Color32 = Color32::from_rgb(220, 53, 69);
const SECTION_SPACING: f32 = 20.0;

/// Tables derived from the current report, rebuilt only when the report changes.
struct SectionTables {
    best_selling: Option<PreviewTable>,
    top_rated: Option<PreviewTable>,
    lowest_rated: Option<PreviewTable>,
}

/// Scrollable single-page report.
pub struct ReportView {
    tables: SectionTables,
}

impl Default for ReportView {
    fn default() -> Self {
        Self {
            tables: SectionTables {
                best_selling: None,
                top_rated: None,
                lowest_rated: None,
            },
        }
    }
}

impl ReportView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the table previews for a new report.
    pub fn set_report(&mut self, report: &ReportData) {
        let sales = report.sales.as_ref().ok();
        let ratings = report.ratings.as_ref().ok();

        self.tables = SectionTables {
            best_selling: sales
                .map(|s| PreviewTable::from_sales("best_selling", &s.top_categories)),
            top_rated: ratings.map(|r| PreviewTable::from_reviews("top_rated", &r.top)),
            lowest_rated: ratings.map(|r| PreviewTable::from_reviews("lowest_rated", &r.lowest)),
        };
    }

    /// Draw the whole page
    pub fn show(&self, ui: &mut egui::Ui, report: &ReportData) {
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.heading(RichText::new("📊 Data Analysis").size(32.0).strong());
                });
                ui.add_space(SECTION_SPACING);

                Self::section_header(
                    ui,
                    "QUESTION 1",
                    "Which products have the highest purchase volume?",
                );
                match &report.sales {
                    Ok(sales) => self.show_sales(ui, sales),
                    Err(e) => Self::show_error(ui, e),
                }

                ui.add_space(SECTION_SPACING);
                ui.separator();
                ui.add_space(SECTION_SPACING);

                Self::section_header(
                    ui,
                    "QUESTION 2",
                    "Which product categories have the highest and the lowest rating?",
                );
                match &report.ratings {
                    Ok(ratings) => self.show_ratings(ui, ratings),
                    Err(e) => Self::show_error(ui, e),
                }
                ui.add_space(SECTION_SPACING);
            });
    }

    fn section_header(ui: &mut egui::Ui, title: &str, question: &str) {
        ui.label(RichText::new(title).size(20.0).strong());
        ui.label(RichText::new(question).size(18.0));
        ui.add_space(10.0);
    }

    fn show_sales(&self, ui: &mut egui::Ui, sales: &SalesReport) {
        ui.label(
            RichText::new(format!("Delivered {}", sales.selected))
                .size(12.0)
                .color(Color32::GRAY),
        );
        ChartPlotter::draw_sales_bar_chart(ui, &sales.top_categories);

        ui.add_space(10.0);
        ui.label(RichText::new("Best Selling Product:").size(16.0).strong());
        if let Some(table) = &self.tables.best_selling {
            table.draw(ui);
        }
    }

    fn show_ratings(&self, ui: &mut egui::Ui, ratings: &RatingsReport) {
        ChartPlotter::draw_rating_scatter(ui, ratings);

        ui.add_space(10.0);
        ui.label(RichText::new("Top Rated Product:").size(16.0).strong());
        if let Some(table) = &self.tables.top_rated {
            table.draw(ui);
        }

        ui.add_space(10.0);
        ui.label(RichText::new("Lowest Rated Product:").size(16.0).strong());
        if let Some(table) = &self.tables.lowest_rated {
            table.draw(ui);
        }
    }

    fn show_error(ui: &mut egui::Ui, error: &SectionError) {
        egui::Frame::none()
            .fill(ERROR_COLOR.gamma_multiply(0.15))
            .stroke(egui::Stroke::new(1.0, ERROR_COLOR))
            .rounding(5.0)
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(
                    RichText::new(format!("⚠ {}", error))
                        .size(14.0)
                        .color(ERROR_COLOR),
                );
            });
    }
}
