use eframe::egui::{self, Color32, RichText, Ui};

use crate::plot::Quantity;
use crate::spr::{DepthDomain, MM_PER_CM, R50D_MAX_CM, R50D_MIN_CM};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – beam parameters
// ---------------------------------------------------------------------------

/// Render the left parameter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Beam");
    ui.separator();

    ui.strong("R50,D");
    let mut r50d = state.r50d_cm;
    let response = ui.add(
        egui::DragValue::new(&mut r50d)
            .speed(0.01)
            .range(R50D_MIN_CM + 0.01..=R50D_MAX_CM - 0.01)
            .fixed_decimals(2)
            .suffix(" cm"),
    );
    if response.changed() {
        state.set_r50d(r50d);
    }

    ui.strong("Nominal energy");
    ui.add(
        egui::DragValue::new(&mut state.energy_mev)
            .speed(0.5)
            .range(0.5..=50.0)
            .suffix(" MeV"),
    );

    if let Ok(domain) = DepthDomain::for_beam_quality(state.r50d_cm) {
        ui.label(format!(
            "Valid depths: {:.1} – {:.1} mm",
            domain.lower_cm * MM_PER_CM,
            domain.upper_cm * MM_PER_CM
        ));
    }
    ui.separator();

    ui.heading("Charts");
    for quantity in Quantity::ALL {
        let mut checked = state.is_visible(quantity);
        if ui.checkbox(&mut checked, quantity.axis_label()).changed() {
            state.toggle_visible(quantity);
        }
    }
    ui.checkbox(&mut state.show_table, "Show table");
    ui.separator();

    ui.strong("Export");
    ui.add(
        egui::DragValue::new(&mut state.plot_config.dpi)
            .range(72..=1200)
            .suffix(" dpi"),
    );
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
            let has_result = state.converted.is_some();
            if ui
                .add_enabled(has_result, egui::Button::new("Save converted…"))
                .clicked()
            {
                save_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(has_result, egui::Button::new("Export plots…"))
                .clicked()
            {
                export_plots_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(summary) = state.summary() {
            ui.label(summary);
        }

        if let Some(msg) = &state.status_message {
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                Color32::DARK_GREEN
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

const TABLE_EXTENSIONS: &[&str] = &["csv", "json", "parquet", "pq"];

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open depth-ionisation data")
        .add_filter("Supported files", TABLE_EXTENSIONS)
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}

fn save_file_dialog(state: &mut AppState) {
    let mut dialog = rfd::FileDialog::new()
        .set_title("Save converted table")
        .add_filter("Supported files", TABLE_EXTENSIONS);
    if let Some(default) = state.default_output_path() {
        if let Some(dir) = default.parent() {
            dialog = dialog.set_directory(dir);
        }
        if let Some(name) = default.file_name() {
            dialog = dialog.set_file_name(name.to_string_lossy());
        }
    }
    if let Some(path) = dialog.save_file() {
        state.save_converted(&path);
    }
}

fn export_plots_dialog(state: &mut AppState) {
    let mut dialog = rfd::FileDialog::new().set_title("Export plots next to");
    if let Some(default) = state.default_output_path() {
        if let Some(dir) = default.parent() {
            dialog = dialog.set_directory(dir);
        }
        if let Some(name) = default.file_name() {
            dialog = dialog.set_file_name(name.to_string_lossy());
        }
    }
    if let Some(path) = dialog.save_file() {
        let written = state.export_plots(&path);
        log::info!("Exported {written:?}");
    }
}
