use std::collections::BTreeSet;
use std::fmt::Display;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::FilterSelection;
use crate::state::AppState;
use crate::ui::labels::{chart_title, summary_blocks};
use crate::ui::{plot, table};

const ALL: &str = "All";

// ---------------------------------------------------------------------------
// Left side panel – filter dropdowns
// ---------------------------------------------------------------------------

/// Single-select dropdown offering "All" plus every value in `options`.
/// Returns `true` when the selection changed.
fn select_one<T>(ui: &mut Ui, id: &str, selected: &mut Option<T>, options: &BTreeSet<T>) -> bool
where
    T: Clone + PartialEq + Display,
{
    let current = selected
        .as_ref()
        .map_or_else(|| ALL.to_string(), |v| v.to_string());
    let mut changed = false;

    egui::ComboBox::from_id_salt(id)
        .selected_text(current)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            changed |= ui.selectable_value(selected, None, ALL).changed();
            for value in options {
                changed |= ui
                    .selectable_value(selected, Some(value.clone()), value.to_string())
                    .changed();
            }
        });
    changed
}

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = state.dataset() else {
        ui.label("No dataset loaded.");
        return;
    };

    // Options always come from the full dataset, not the filtered view.
    let distinct = dataset.distinct.clone();
    let mut selection: FilterSelection = state.filters.clone();
    let mut changed = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Age");
            changed |= select_one(ui, "filter_age", &mut selection.age, &distinct.ages);
            ui.add_space(6.0);

            ui.strong("Category");
            changed |= select_one(ui, "filter_category", &mut selection.category, &distinct.categories);
            ui.add_space(6.0);

            ui.strong("Shopping Mall");
            changed |= select_one(ui, "filter_mall", &mut selection.mall, &distinct.malls);
            ui.separator();

            if ui
                .add_enabled(!selection.is_unfiltered(), egui::Button::new("Reset filters"))
                .clicked()
            {
                selection.reset();
                changed = true;
            }
        });

    if changed {
        state.set_filters(selection);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(ds), Some(view)) = (state.dataset(), &state.view) {
            ui.label(format!(
                "{} rows read, {} after removing duplicates, {} matching",
                ds.rows_read,
                ds.len(),
                view.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Central panel – title, chart, table, summary
// ---------------------------------------------------------------------------

/// Render the dashboard body.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    let Some(view) = &state.view else {
        ui.centered_and_justified(|ui: &mut Ui| {
            match &state.status_message {
                Some(msg) => ui.heading(RichText::new(msg).color(Color32::RED)),
                None => ui.heading("Open a transactions file  (File → Open…)"),
            };
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading(chart_title(&state.config.base_title, &state.filters));
            if let Some(notice) = &state.notice {
                ui.label(RichText::new(notice).color(Color32::YELLOW));
            }
            ui.add_space(4.0);

            plot::spending_chart(ui, state);
            ui.separator();

            ui.strong("Average spending by year, gender and payment method");
            table::pivot_table(ui, &view.pivot);
            ui.separator();

            summary_panel(ui, state);
        });
}

fn summary_panel(ui: &mut Ui, state: &AppState) {
    let Some(view) = &state.view else {
        return;
    };
    if !view.summary.has_data() {
        ui.label(RichText::new("Summary statistics: no data").italics());
    }
    for block in summary_blocks(&view.summary, &state.config.currency_symbol) {
        ui.add_space(4.0);
        ui.strong(&block.heading);
        egui::Grid::new(&block.heading)
            .num_columns(2)
            .show(ui, |ui: &mut Ui| {
                for (label, value) in &block.lines {
                    ui.label(label);
                    ui.monospace(value);
                    ui.end_row();
                }
            });
    }
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open transactions")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}
