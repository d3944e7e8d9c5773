//! Dashboard Main Application
//! Main window with control panel and report view.

use crate::config::DashboardConfig;
use crate::data::{compute_report, Dataset, RawTables, ReportData, YearRange};
use crate::gui::control_panel::SourceStatus;
use crate::gui::{ControlPanel, ControlPanelAction, ReportView};
use egui::SidePanel;

/// Main application window.
pub struct DashboardApp {
    config: DashboardConfig,
    dataset: Dataset,
    report: ReportData,
    control_panel: ControlPanel,
    report_view: ReportView,
}

impl DashboardApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        configure_style(&cc.egui_ctx);

        // Both inputs are read and typed once; only the year selection changes afterwards.
        let tables = RawTables::load(&config);
        let dataset = Dataset::from_tables(&tables);
        let report = compute_report(&dataset, None, config.top_n);

        let mut control_panel = ControlPanel::new();
        control_panel.sources = vec![
            SourceStatus::from_load(&config.orders_file, &tables.orders),
            SourceStatus::from_load(&config.reviews_file, &tables.reviews),
        ];
        control_panel.set_bounds(report.year_bounds);

        let mut app = Self {
            config,
            dataset,
            report,
            control_panel,
            report_view: ReportView::new(),
        };
        app.refresh_view();
        app
    }

    /// Recompute the report for the current selection.
    fn handle_range_changed(&mut self) {
        let selected = self.control_panel.selected_range();
        log::info!(
            "Year range changed to {}",
            selected.map(|r| r.to_string()).unwrap_or_default()
        );

        self.report = compute_report(&self.dataset, selected, self.config.top_n);
        self.refresh_view();
    }

    /// Copy both sections' tables to the clipboard as JSON.
    fn handle_copy_report(&mut self, ctx: &egui::Context) {
        match self.report.tables_json() {
            Ok(json) => {
                ctx.copy_text(json);
                self.control_panel.set_status("Report copied to clipboard");
            }
            Err(e) => {
                log::warn!("Could not serialise report: {}", e);
                self.control_panel
                    .set_status(&format!("Error: could not copy report ({})", e));
            }
        }
    }

    fn refresh_view(&mut self) {
        self.report_view.set_report(&self.report);
        self.control_panel
            .set_status(&status_line(&self.report, self.control_panel.selected_range()));
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::RangeChanged => self.handle_range_changed(),
                        ControlPanelAction::CopyReport => self.handle_copy_report(ctx),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Report
        egui::CentralPanel::default().show(ctx, |ui| {
            self.report_view.show(ui, &self.report);
        });
    }
}

/// One-time look of the whole app: dark visuals and roomier spacing.
fn configure_style(ctx: &egui::Context) {
    ctx.set_visuals(egui::Visuals::dark());
    ctx.style_mut(|style| {
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        style.spacing.slider_width = 160.0;
    });
}

fn status_line(report: &ReportData, selected: Option<YearRange>) -> String {
    let failed = [report.sales.is_err(), report.ratings.is_err()]
        .iter()
        .filter(|f| **f)
        .count();

    match (failed, selected) {
        (0, Some(range)) => format!("Showing {}", range),
        (0, None) => "Ready".to_string(),
        (n, _) => format!("Error: {} of 2 sections stopped", n),
    }
}
