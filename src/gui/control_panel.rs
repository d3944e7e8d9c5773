//! Control Panel Widget
//! Left side panel with the data sources and the year range selection.

use crate::data::{CsvTable, LoaderError, YearRange};
use egui::{Color32, RichText};

/// Load outcome of one input file, as shown in the panel.
#[derive(Debug, Clone)]
pub struct SourceStatus {
    pub file_name: String,
    pub rows: Result<usize, String>,
}

impl SourceStatus {
    pub fn from_load(file_name: &str, table: &Result<CsvTable, LoaderError>) -> Self {
        Self {
            file_name: file_name.to_string(),
            rows: table
                .as_ref()
                .map(CsvTable::get_row_count)
                .map_err(|e| e.to_string()),
        }
    }
}

/// Left side control panel with data sources and the year range slider.
pub struct ControlPanel {
    pub sources: Vec<SourceStatus>,
    bounds: Option<YearRange>,
    start_year: i32,
    end_year: i32,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            bounds: None,
            start_year: 0,
            end_year: 0,
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set slider bounds and select the full range.
    pub fn set_bounds(&mut self, bounds: Option<YearRange>) {
        self.bounds = bounds;
        self.reset();
    }

    /// Return the selection to the full range.
    pub fn reset(&mut self) {
        if let Some(bounds) = self.bounds {
            self.start_year = bounds.start;
            self.end_year = bounds.end;
        }
    }

    /// Currently selected years, if there is anything to select.
    pub fn selected_range(&self) -> Option<YearRange> {
        self.bounds
            .map(|_| YearRange::new(self.start_year, self.end_year))
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 E-Commerce Dashboard")
                    .size(20.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Public Dataset Analysis")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Sources").size(14.0).strong());
        ui.add_space(5.0);

        for source in &self.sources {
            egui::Frame::none()
                .fill(ui.visuals().widgets.noninteractive.bg_fill)
                .rounding(5.0)
                .inner_margin(8.0)
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.label(RichText::new(&source.file_name).size(12.0).strong());
                    match &source.rows {
                        Ok(rows) => {
                            ui.label(
                                RichText::new(format!("{} rows", rows))
                                    .size(11.0)
                                    .color(Color32::GRAY),
                            );
                        }
                        Err(e) => {
                            ui.label(
                                RichText::new(e)
                                    .size(11.0)
                                    .color(Color32::from_rgb(220, 53, 69)),
                            );
                        }
                    }
                });
            ui.add_space(4.0);
        }

        ui.add_space(10.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Year Range Section =====
        ui.label(RichText::new("📅 Year Range").size(14.0).strong());
        ui.add_space(5.0);

        match self.bounds {
            Some(bounds) => {
                let before = (self.start_year, self.end_year);

                ui.add(
                    egui::Slider::new(&mut self.start_year, bounds.start..=bounds.end)
                        .text("From"),
                );
                if self.start_year > self.end_year {
                    self.end_year = self.start_year;
                }

                ui.add(
                    egui::Slider::new(&mut self.end_year, bounds.start..=bounds.end).text("To"),
                );
                if self.end_year < self.start_year {
                    self.start_year = self.end_year;
                }

                if (self.start_year, self.end_year) != before {
                    action = ControlPanelAction::RangeChanged;
                }

                ui.add_space(5.0);
                if ui.small_button("↺ Reset").clicked() {
                    self.reset();
                    action = ControlPanelAction::RangeChanged;
                }
            }
            None => {
                ui.label(
                    RichText::new("No delivery years available")
                        .size(11.0)
                        .color(Color32::GRAY),
                );
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        ui.vertical_centered(|ui| {
            let button = egui::Button::new(RichText::new("📋 Copy Report JSON").size(13.0))
                .min_size(egui::vec2(180.0, 28.0));
            if ui.add(button).clicked() {
                action = ControlPanelAction::CopyReport;
            }
        });
        ui.add_space(8.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Set status line
    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    RangeChanged,
    CopyReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_starts_at_full_range() {
        let mut panel = ControlPanel::new();
        assert_eq!(panel.selected_range(), None);

        panel.set_bounds(Some(YearRange::new(2016, 2018)));
        assert_eq!(panel.selected_range(), Some(YearRange::new(2016, 2018)));

        panel.start_year = 2017;
        panel.reset();
        assert_eq!(panel.selected_range(), Some(YearRange::new(2016, 2018)));
    }

    #[test]
    fn source_status_reports_rows_or_error() {
        let missing: Result<CsvTable, LoaderError> =
            Err(LoaderError::MissingFile("category_reviews.csv".into()));
        let status = SourceStatus::from_load("category_reviews.csv", &missing);
        assert_eq!(
            status.rows,
            Err("File 'category_reviews.csv' not found!".to_string())
        );
    }
}
