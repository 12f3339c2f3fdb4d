use std::ops::RangeInclusive;

use eframe::egui::{self, Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Plot, PlotPoint, Text};

use crate::data::aggregate::PivotTable;
use crate::data::model::PaymentMethod;
use crate::state::AppState;
use crate::ui::labels::format_currency;

const BAR_WIDTH: f64 = 0.6;
const CHART_HEIGHT: f32 = 380.0;

// ---------------------------------------------------------------------------
// Segment layout (pure, independent of egui)
// ---------------------------------------------------------------------------

/// One labelled segment of a stacked bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Bar position on the x axis (pivot row index).
    pub x: f64,
    pub method: PaymentMethod,
    pub base: f64,
    pub height: f64,
}

impl Segment {
    /// Vertical centre, where the value label goes.
    pub fn label_y(&self) -> f64 {
        self.base + self.height / 2.0
    }
}

/// Stack the present cells of every pivot row in [`PaymentMethod::ALL`]
/// order. Absent cells produce no segment.
pub fn stack_segments(pivot: &PivotTable) -> Vec<Segment> {
    let mut segments = Vec::new();
    for (i, row) in pivot.rows.iter().enumerate() {
        let mut base = 0.0;
        for method in PaymentMethod::ALL {
            if let Some(height) = row.cell(method) {
                segments.push(Segment {
                    x: i as f64,
                    method,
                    base,
                    height,
                });
                base += height;
            }
        }
    }
    segments
}

/// Axis label for a grid mark that falls on a bar position.
fn bar_label(labels: &[String], value: f64) -> String {
    if value.fract().abs() > f64::EPSILON || value < 0.0 {
        return String::new();
    }
    labels.get(value as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Stacked bar chart (central panel)
// ---------------------------------------------------------------------------

/// Render the stacked bar chart of average spending.
pub fn spending_chart(ui: &mut Ui, state: &AppState) {
    let Some(view) = &state.view else {
        return;
    };
    if view.pivot.is_empty() {
        ui.allocate_ui(egui::vec2(ui.available_width(), CHART_HEIGHT), |ui: &mut Ui| {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("No data for the selected filters");
            });
        });
        return;
    }

    let pivot = &view.pivot;
    let symbol = state.config.currency_symbol.clone();
    let labels: Vec<String> = pivot.rows.iter().map(|r| r.label()).collect();

    // One chart per payment method, each stacked on the ones before it.
    // Every chart has a bar for every row so stacking lines up by index.
    let mut charts: Vec<BarChart> = Vec::with_capacity(PaymentMethod::ALL.len());
    for method in PaymentMethod::ALL {
        let bars: Vec<Bar> = pivot
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                Bar::new(i as f64, row.cell(method).unwrap_or(0.0))
                    .width(BAR_WIDTH)
                    .name(row.label())
            })
            .collect();

        let hover_symbol = symbol.clone();
        let chart = BarChart::new(bars)
            .name(method.label())
            .color(state.colors.color_for(method))
            .element_formatter(Box::new(move |bar: &Bar, _chart: &BarChart| {
                format!("{}\n{method}\n{}", bar.name, format_currency(&hover_symbol, bar.value))
            }));
        let chart = {
            let below: Vec<&BarChart> = charts.iter().collect();
            chart.stack_on(&below)
        };
        charts.push(chart);
    }

    let segments = stack_segments(pivot);

    Plot::new("spending_plot")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("Year & Gender")
        .y_axis_label("Average Spending")
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| bar_label(&labels, mark.value))
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(true)
        .allow_boxed_zoom(true)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
            for seg in &segments {
                let text = RichText::new(format_currency(&symbol, seg.height))
                    .size(11.0)
                    .color(Color32::BLACK);
                plot_ui.text(Text::new(PlotPoint::new(seg.x, seg.label_y()), text));
            }
        });
}
