use std::path::{Path, PathBuf};

use crate::convert::convert;
use crate::data::filter::valid_indices;
use crate::data::loader::load_table;
use crate::data::model::{AugmentedTable, MeasurementTable};
use crate::data::writer::{output_path, save_table};
use crate::plot::{PlotConfig, Quantity, make_plots};
use crate::spr::DepthDomain;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded measurement (None until user loads a file).
    pub measurement: Option<MeasurementTable>,

    /// File the measurement was loaded from.
    pub source_path: Option<PathBuf>,

    /// Beam quality index R50,D in cm.
    pub r50d_cm: f64,

    /// Nominal beam energy in MeV, used in plot titles.
    pub energy_mev: f64,

    /// Result of the last successful conversion.
    pub converted: Option<AugmentedTable>,

    /// Which charts are shown in the central panel.
    pub visible: [bool; 3],

    /// Whether the converted table is shown below the charts.
    pub show_table: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Rendering options for exported PNGs.
    pub plot_config: PlotConfig,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            measurement: None,
            source_path: None,
            r50d_cm: 5.0,
            energy_mev: 12.0,
            converted: None,
            visible: [true; 3],
            show_table: false,
            status_message: None,
            plot_config: PlotConfig::default(),
        }
    }
}

impl AppState {
    /// Ingest a newly loaded measurement and convert it with the current
    /// R50,D.
    pub fn set_measurement(&mut self, table: MeasurementTable, path: Option<PathBuf>) {
        self.measurement = Some(table);
        self.source_path = path;
        self.status_message = None;
        self.reconvert();
    }

    /// Load a measurement file, reporting failures in the status line.
    pub fn open(&mut self, path: &Path) {
        match load_table(path) {
            Ok(table) => {
                log::info!("Loaded {} rows from {}", table.len(), path.display());
                self.set_measurement(table, Some(path.to_path_buf()));
            }
            Err(e) => {
                log::error!("Failed to load file: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Set R50,D and recompute.
    pub fn set_r50d(&mut self, r50d_cm: f64) {
        self.r50d_cm = r50d_cm;
        self.reconvert();
    }

    /// Recompute the converted curve from the measurement and R50,D.
    pub fn reconvert(&mut self) {
        let Some(table) = &self.measurement else {
            return;
        };
        match convert(table, self.r50d_cm) {
            Ok(out) => {
                self.converted = Some(out);
                self.status_message = None;
            }
            Err(e) => {
                log::warn!("Conversion failed: {e}");
                self.converted = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// `(rows inside the valid depth domain, total rows)` for the summary line.
    pub fn row_counts(&self) -> Option<(usize, usize)> {
        let table = self.measurement.as_ref()?;
        let domain = DepthDomain::for_beam_quality(self.r50d_cm).ok()?;
        Some((valid_indices(table, &domain).len(), table.len()))
    }

    /// One-line description of the loaded measurement for the top bar.
    pub fn summary(&self) -> Option<String> {
        let table = self.measurement.as_ref()?;
        let mut text = format!("{} rows loaded", table.len());
        if let Some((shallow, deep)) = table.depth_span() {
            text.push_str(&format!(" ({shallow:.1} to {deep:.1} mm)"));
        }
        if let Some((kept, _)) = self.row_counts() {
            text.push_str(&format!(", {kept} inside the valid depth range"));
        }
        Some(text)
    }

    pub fn is_visible(&self, quantity: Quantity) -> bool {
        self.visible[quantity_index(quantity)]
    }

    pub fn toggle_visible(&mut self, quantity: Quantity) {
        let idx = quantity_index(quantity);
        self.visible[idx] = !self.visible[idx];
    }

    /// Default location for the converted table.
    pub fn default_output_path(&self) -> Option<PathBuf> {
        self.source_path.as_deref().map(output_path)
    }

    /// Write the converted table to `path`.
    pub fn save_converted(&mut self, path: &Path) {
        let Some(table) = &self.converted else {
            self.status_message = Some("Nothing to save: no converted curve".into());
            return;
        };
        self.status_message = match save_table(table, path) {
            Ok(()) => Some(format!("Saved {}", path.display())),
            Err(e) => {
                log::error!("{e}");
                Some(format!("Error: {e}"))
            }
        };
    }

    /// Render the three charts next to `stem_path`.
    pub fn export_plots(&mut self, stem_path: &Path) -> Vec<PathBuf> {
        let Some(table) = &self.converted else {
            self.status_message = Some("Nothing to plot: no converted curve".into());
            return Vec::new();
        };
        match make_plots(table, stem_path, self.energy_mev, &self.plot_config) {
            Ok(paths) => {
                self.status_message = Some(format!("Exported {} plots", paths.len()));
                paths
            }
            Err(e) => {
                log::error!("{e}");
                self.status_message = Some(format!("Error: {e}"));
                Vec::new()
            }
        }
    }
}

fn quantity_index(quantity: Quantity) -> usize {
    Quantity::ALL
        .iter()
        .position(|&q| q == quantity)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measurement() -> MeasurementTable {
        MeasurementTable::from_pairs(&[
            (1.0, 80.0),
            (10.0, 95.0),
            (20.0, 100.0),
            (40.0, 60.0),
            (55.0, 10.0),
            (80.0, 2.0),
        ])
    }

    #[test]
    fn test_set_measurement_converts() {
        let mut state = AppState::default();
        state.set_measurement(measurement(), None);
        let out = state.converted.as_ref().unwrap();
        assert_eq!(out.len(), 4);
        assert_eq!(state.row_counts(), Some((4, 6)));
        assert!(state.status_message.is_none());
        assert_eq!(
            state.summary().as_deref(),
            Some("6 rows loaded (1.0 to 80.0 mm), 4 inside the valid depth range")
        );
    }

    #[test]
    fn test_invalid_r50d_clears_result() {
        let mut state = AppState::default();
        state.set_measurement(measurement(), None);
        state.set_r50d(25.0);
        assert!(state.converted.is_none());
        assert!(state.status_message.as_deref().unwrap().contains("25"));
        assert_eq!(state.row_counts(), None);
        assert_eq!(state.summary().as_deref(), Some("6 rows loaded (1.0 to 80.0 mm)"));

        state.set_r50d(3.0);
        assert!(state.converted.is_some());
        assert!(state.status_message.is_none());
    }

    #[test]
    fn test_non_finite_cell_reports_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.csv");
        std::fs::write(&path, "depth,ion\n10,90\n20,inf\n").unwrap();
        let mut state = AppState::default();
        state.open(&path);
        assert!(state.measurement.is_some());
        assert!(state.converted.is_none());
        let msg = state.status_message.unwrap();
        assert!(msg.contains("scan.csv") && msg.contains("row 1"), "{msg}");
    }

    #[test]
    fn test_open_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curve.csv");
        std::fs::write(&path, "depth;ion\n1;2\n").unwrap();
        let mut state = AppState::default();
        state.open(&path);
        assert!(state.measurement.is_none());
        assert!(state.status_message.unwrap().contains("curve.csv"));
    }

    #[test]
    fn test_open_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curve.csv");
        std::fs::write(&path, "depth,ion\n10,95\n20,100\n40,60\n").unwrap();

        let mut state = AppState::default();
        state.open(&path);
        let out = state.default_output_path().unwrap();
        assert_eq!(out, dir.path().join("curve_withdose.csv"));
        state.save_converted(&out);
        assert!(out.exists());
        assert!(state.status_message.unwrap().starts_with("Saved"));
    }

    #[test]
    fn test_save_without_result() {
        let mut state = AppState::default();
        state.save_converted(Path::new("never.csv"));
        assert!(state.status_message.as_deref().unwrap().contains("Nothing to save"));
        assert!(state.export_plots(Path::new("never.csv")).is_empty());
        assert!(state.status_message.as_deref().unwrap().contains("Nothing to plot"));
    }

    #[test]
    fn test_toggle_visible() {
        let mut state = AppState::default();
        assert!(state.is_visible(Quantity::Spr));
        state.toggle_visible(Quantity::Spr);
        assert!(!state.is_visible(Quantity::Spr));
        assert!(state.is_visible(Quantity::Dose));
    }
}
