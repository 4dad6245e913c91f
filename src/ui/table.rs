use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::model::AugmentedTable;

const ROW_HEIGHT: f32 = 18.0;

/// Scrollable view of the converted table (`depth, ion, spr, dose`).
pub fn converted_table(ui: &mut Ui, table: &AugmentedTable) {
    TableBuilder::new(ui)
        .striped(true)
        .resizable(false)
        .column(Column::auto().at_least(70.0))
        .column(Column::auto().at_least(70.0))
        .column(Column::auto().at_least(70.0))
        .column(Column::remainder())
        .header(ROW_HEIGHT + 2.0, |mut header| {
            for title in ["Depth (mm)", "Ion (%)", "SPR", "Dose (%)"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, table.len(), |mut row| {
                let r = table.rows[row.index()];
                row.col(|ui| {
                    ui.label(format!("{}", r.depth));
                });
                row.col(|ui| {
                    ui.label(format!("{:.1}", r.ion));
                });
                row.col(|ui| {
                    ui.label(format!("{:.3}", r.spr));
                });
                row.col(|ui| {
                    ui.label(format!("{:.1}", r.dose));
                });
            });
        });
}
