use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::aggregate::PivotTable;
use crate::data::model::PaymentMethod;

const ROW_HEIGHT: f32 = 18.0;

/// Cell text for the table view; absent methods show a dash.
pub fn cell_text(value: Option<f64>) -> String {
    value.map_or_else(|| "—".to_string(), |v| format!("{v:.2}"))
}

/// Render the pivot as a data table: Year, Gender, one column per method.
pub fn pivot_table(ui: &mut Ui, pivot: &PivotTable) {
    TableBuilder::new(ui)
        .id_salt("pivot_table")
        .striped(true)
        .vscroll(false)
        .column(Column::auto().at_least(60.0))
        .column(Column::auto().at_least(70.0))
        .columns(Column::auto().at_least(100.0), PaymentMethod::ALL.len())
        .header(ROW_HEIGHT + 2.0, |mut header| {
            header.col(|ui: &mut Ui| {
                ui.strong("Year");
            });
            header.col(|ui: &mut Ui| {
                ui.strong("Gender");
            });
            for method in PaymentMethod::ALL {
                header.col(|ui: &mut Ui| {
                    ui.strong(method.label());
                });
            }
        })
        .body(|mut body| {
            for row in &pivot.rows {
                body.row(ROW_HEIGHT, |mut tr| {
                    tr.col(|ui: &mut Ui| {
                        ui.label(row.year.to_string());
                    });
                    tr.col(|ui: &mut Ui| {
                        ui.label(row.gender.label());
                    });
                    for method in PaymentMethod::ALL {
                        tr.col(|ui: &mut Ui| {
                            ui.monospace(cell_text(row.cell(method)));
                        });
                    }
                });
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_cells_render_as_dash() {
        assert_eq!(cell_text(None), "—");
        assert_eq!(cell_text(Some(150.0)), "150.00");
    }
}
