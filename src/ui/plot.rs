use eframe::egui::{Color32, Ui};
use egui_plot::{Line, Plot, PlotPoints};

use crate::plot::{DEPTH_LABEL, Quantity};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Curve plots (central panel)
// ---------------------------------------------------------------------------

/// Render the visible charts stacked in the central panel.
pub fn curve_plots(ui: &mut Ui, state: &AppState) {
    let converted = match &state.converted {
        Some(t) => t,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a depth-ionisation file to begin  (File → Open…)");
            });
            return;
        }
    };

    let shown: Vec<Quantity> = Quantity::ALL
        .into_iter()
        .filter(|&q| state.is_visible(q))
        .collect();
    if shown.is_empty() {
        return;
    }
    let height = (ui.available_height() / shown.len() as f32 - 8.0).max(120.0);

    for quantity in shown {
        let c = quantity.color();
        let points: PlotPoints = converted.series(quantity.column()).into_iter().collect();

        ui.strong(quantity.title(state.energy_mev));
        Plot::new(quantity.file_suffix())
            .height(height)
            .x_axis_label(DEPTH_LABEL)
            .y_axis_label(quantity.axis_label())
            .allow_boxed_zoom(true)
            .allow_drag(true)
            .allow_scroll(true)
            .allow_zoom(true)
            .show(ui, |plot_ui| {
                let line = Line::new(points)
                    .name(quantity.axis_label())
                    .color(Color32::from_rgb(c.r, c.g, c.b))
                    .width(1.5);
                plot_ui.line(line);
            });
    }
}
