//! Chart Plotter Module
//! Creates the best-seller bar chart and the rating scatter plot using egui_plot.

use crate::data::{CategorySales, Provenance, RatingsReport};
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Corner, GridMark, Legend, Plot, PlotPoints, Points};

/// Sky blue bars for the best sellers
pub const BAR_COLOR: Color32 = Color32::from_rgb(135, 206, 235);
/// Highest rated points
pub const TOP_COLOR: Color32 = Color32::from_rgb(0, 128, 0);
/// Lowest rated points
pub const LOWEST_COLOR: Color32 = Color32::from_rgb(255, 0, 0);

const CHART_HEIGHT: f32 = 380.0;
const BAR_WIDTH: f64 = 0.7;
const POINT_RADIUS: f32 = 6.0;

/// One horizontal bar: its position on the category axis and its length.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSpec {
    pub position: f64,
    pub value: f64,
    pub label: String,
}

/// Points of one provenance group, x being the category index.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub provenance: Provenance,
    pub points: Vec<[f64; 2]>,
}

/// Creates the dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Get color for a provenance group.
    pub fn get_provenance_color(provenance: Provenance) -> Color32 {
        match provenance {
            Provenance::Top10 => TOP_COLOR,
            Provenance::Lowest10 => LOWEST_COLOR,
        }
    }

    /// Lay out bars so the first (largest) category sits at the top.
    pub fn bar_layout(sales: &[CategorySales]) -> Vec<BarSpec> {
        let n = sales.len();
        sales
            .iter()
            .enumerate()
            .map(|(i, s)| BarSpec {
                position: (n - 1 - i) as f64,
                value: s.order_count as f64,
                label: s.product_category_name.clone(),
            })
            .collect()
    }

    /// Category labels in order of first appearance, top rows first.
    pub fn scatter_categories(ratings: &RatingsReport) -> Vec<String> {
        let mut labels: Vec<String> = Vec::new();
        for row in ratings.combined() {
            if !labels.contains(&row.product_category_name_english) {
                labels.push(row.product_category_name_english.clone());
            }
        }
        labels
    }

    /// Split ranked rows into one point series per provenance.
    ///
    /// Rows without a score have no y value and are left out.
    pub fn scatter_series(ratings: &RatingsReport) -> Vec<ScatterSeries> {
        let labels = Self::scatter_categories(ratings);
        let index_of = |name: &str| labels.iter().position(|l| l == name).unwrap_or(0) as f64;

        [
            (Provenance::Top10, &ratings.top),
            (Provenance::Lowest10, &ratings.lowest),
        ]
        .into_iter()
        .map(|(provenance, rows)| ScatterSeries {
            provenance,
            points: rows
                .iter()
                .filter_map(|r| {
                    r.review_score
                        .map(|score| [index_of(&r.product_category_name_english), score])
                })
                .collect(),
        })
        .collect()
    }

    /// Draw the best-seller horizontal bar chart.
    /// X-axis: distinct orders, Y-axis: categories (largest on top)
    pub fn draw_sales_bar_chart(ui: &mut egui::Ui, sales: &[CategorySales]) {
        ui.vertical_centered(|ui| {
            ui.label(RichText::new("Top 10 Best Selling Products").size(20.0).strong());
        });

        let bars = Self::bar_layout(sales);
        let mut y_labels: Vec<String> = vec![String::new(); bars.len()];
        for bar in &bars {
            y_labels[bar.position as usize] = bar.label.clone();
        }
        let n = y_labels.len();

        Plot::new("best_selling_bar_chart")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .allow_zoom(false)
            .allow_drag(false)
            .x_axis_label("Total Sales")
            .y_axis_label("Product Category Name")
            .include_x(0.0)
            .y_grid_spacer(move |_input| category_marks(n))
            .y_axis_formatter(move |mark, _range| category_label(&y_labels, mark.value))
            .show(ui, |plot_ui| {
                let elems: Vec<Bar> = bars
                    .iter()
                    .map(|b| {
                        Bar::new(b.position, b.value)
                            .width(BAR_WIDTH)
                            .name(&b.label)
                            .fill(BAR_COLOR)
                    })
                    .collect();

                plot_ui.bar_chart(
                    BarChart::new(elems)
                        .horizontal()
                        .color(BAR_COLOR)
                        .name("Distinct orders"),
                );
            });
    }

    /// Draw the rating scatter plot.
    /// X-axis: categories, Y-axis: review score, colored by provenance
    pub fn draw_rating_scatter(ui: &mut egui::Ui, ratings: &RatingsReport) {
        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new("Scatter Plot: Products with Highest & Lowest Reviews")
                    .size(14.0)
                    .strong(),
            );
        });

        let x_labels = Self::scatter_categories(ratings);
        let hover_labels = x_labels.clone();
        let n = x_labels.len();
        let series = Self::scatter_series(ratings);

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
            ui.label(RichText::new("Category").size(12.0).strong());
        });

        Plot::new("rating_scatter_plot")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("Product Category")
            .y_axis_label("Review Score")
            .legend(Legend::default().position(Corner::RightTop))
            .include_x(-0.5)
            .include_x(n as f64 - 0.5)
            .x_grid_spacer(move |_input| category_marks(n))
            .x_axis_formatter(move |mark, _range| category_label(&x_labels, mark.value))
            .label_formatter(move |name, value| {
                let category = category_label(&hover_labels, value.x);
                if name.is_empty() || category.is_empty() {
                    String::new()
                } else {
                    format!("{}\n{}\nscore: {:.2}", name, category, value.y)
                }
            })
            .show(ui, |plot_ui| {
                for s in series {
                    let color = Self::get_provenance_color(s.provenance);
                    plot_ui.points(
                        Points::new(PlotPoints::from(s.points))
                            .radius(POINT_RADIUS)
                            .color(color)
                            .name(s.provenance.label()),
                    );
                }
            });
    }
}

/// One grid mark per category index.
fn category_marks(n: usize) -> Vec<GridMark> {
    (0..n)
        .map(|i| GridMark {
            value: i as f64,
            step_size: 1.0,
        })
        .collect()
}

/// Label for an axis value, empty unless it lands on a category index.
fn category_label(labels: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}
