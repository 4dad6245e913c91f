use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct IonDoseApp {
    pub state: AppState,
}

impl eframe::App for IonDoseApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: beam parameters ----
        egui::SidePanel::left("beam_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: converted table ----
        if self.state.show_table {
            if let Some(converted) = &self.state.converted {
                egui::TopBottomPanel::bottom("table_panel")
                    .resizable(true)
                    .default_height(200.0)
                    .show(ctx, |ui| {
                        table::converted_table(ui, converted);
                    });
            }
        }

        // ---- Central panel: plots ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::curve_plots(ui, &self.state);
        });
    }
}
