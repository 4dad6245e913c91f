//! Line charts of a converted curve against water depth.
//!
//! Each chart is built as SVG on a [`canvas::Canvas`] in points and
//! rasterised with resvg at [`PlotConfig::dpi`].

pub mod axes;
pub mod canvas;
pub mod png;

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::color::{Rgb, generate_palette};
use crate::data::loader::load_augmented;
use crate::data::model::{AugmentedTable, Column};
use crate::data::writer::derived_path;
use crate::error::{Error, Result};
use axes::Axis;
use canvas::{Canvas, LineStyle, TextAnchor, TextStyle};

pub const DEPTH_LABEL: &str = "Water depth (mm)";

// ---------------------------------------------------------------------------
// Quantity – which column a chart shows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    Dose,
    Ionisation,
    Spr,
}

impl Quantity {
    pub const ALL: [Quantity; 3] = [Quantity::Dose, Quantity::Ionisation, Quantity::Spr];

    pub fn column(self) -> Column {
        match self {
            Quantity::Dose => Column::Dose,
            Quantity::Ionisation => Column::Ion,
            Quantity::Spr => Column::Spr,
        }
    }

    /// Appended to the table's file stem: `curve_withdose_PDD.png`.
    pub fn file_suffix(self) -> &'static str {
        match self {
            Quantity::Dose => "_PDD",
            Quantity::Ionisation => "_PDI",
            Quantity::Spr => "_SPR",
        }
    }

    pub fn axis_label(self) -> &'static str {
        match self {
            Quantity::Dose => "Dose at depth (%)",
            Quantity::Ionisation => "Ionisation at depth (%)",
            Quantity::Spr => "SPR at depth",
        }
    }

    pub fn title(self, energy_mev: f64) -> String {
        match self {
            Quantity::Dose => format!("{energy_mev} MeV electron beam percentage depth dose"),
            Quantity::Ionisation => {
                format!("{energy_mev} MeV electron beam percentage depth ionisation")
            }
            Quantity::Spr => format!(
                "{energy_mev} MeV electron beam mass stopping power ratio (SPR) at depth"
            ),
        }
    }

    pub fn color(self) -> Rgb {
        let palette = generate_palette(Self::ALL.len());
        let idx = Self::ALL.iter().position(|&q| q == self).unwrap_or(0);
        palette[idx]
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Figure width in points.
    pub width_pt: f64,
    /// Figure height in points.
    pub height_pt: f64,
    pub dpi: u32,
    pub line_width: f64,
    pub font_size: f64,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width_pt: 460.8,  // 6.4" * 72
            height_pt: 345.6, // 4.8" * 72
            dpi: 900,
            line_width: 1.5,
            font_size: 10.0,
        }
    }
}

// Plot-area margins in points.
const MARGIN_LEFT: f64 = 58.0;
const MARGIN_RIGHT: f64 = 16.0;
const MARGIN_TOP: f64 = 30.0;
const MARGIN_BOTTOM: f64 = 44.0;
const TICK_LENGTH: f64 = 4.0;

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render one quantity of `table` against depth as an SVG document.
pub fn render_svg(
    table: &AugmentedTable,
    quantity: Quantity,
    energy_mev: f64,
    config: &PlotConfig,
) -> Result<String> {
    let (Some((x_min, x_max)), Some((y_min, y_max))) =
        (table.span(Column::Depth), table.span(quantity.column()))
    else {
        return Err(Error::Render("no rows to plot".into()));
    };
    for (column, lo, hi) in [(Column::Depth, x_min, x_max), (quantity.column(), y_min, y_max)] {
        if !(lo.is_finite() && hi.is_finite()) {
            return Err(Error::Render(format!(
                "`{}` column has no finite range to plot",
                column.name()
            )));
        }
    }
    if let Some(row) = table
        .series(quantity.column())
        .iter()
        .position(|p| !(p[0].is_finite() && p[1].is_finite()))
    {
        return Err(Error::Render(format!("non-finite value in row {row}")));
    }

    let mut canvas = Canvas::new(config.width_pt, config.height_pt);
    let x_axis = Axis::auto_linear(x_min, x_max, 7).with_label(DEPTH_LABEL);
    let y_axis = Axis::auto_linear(y_min, y_max, 6).with_label(quantity.axis_label());

    let left = MARGIN_LEFT;
    let right = config.width_pt - MARGIN_RIGHT;
    let top = MARGIN_TOP;
    let bottom = config.height_pt - MARGIN_BOTTOM;

    draw_axes(&mut canvas, &x_axis, &y_axis, (left, right, top, bottom), config);

    let points: Vec<(f64, f64)> = table
        .series(quantity.column())
        .iter()
        .map(|&[depth, value]| {
            (
                x_axis.data_to_pixel(depth, left, right),
                y_axis.data_to_pixel(value, bottom, top),
            )
        })
        .collect();
    canvas.polyline(&points, &LineStyle::solid(quantity.color(), config.line_width));

    let title_style = TextStyle {
        size: config.font_size * 1.1,
        anchor: TextAnchor::Middle,
        bold: true,
        ..Default::default()
    };
    canvas.text(
        (left + right) / 2.0,
        top - 10.0,
        &quantity.title(energy_mev),
        &title_style,
    );

    Ok(canvas.finish_svg())
}

/// Box frame, ticks, dashed grid and axis labels.
fn draw_axes(
    canvas: &mut Canvas,
    x_axis: &Axis,
    y_axis: &Axis,
    (left, right, top, bottom): (f64, f64, f64, f64),
    config: &PlotConfig,
) {
    let frame = LineStyle::solid(Rgb::BLACK, 0.8);
    let grid = LineStyle::dashed(Rgb::GRID, 0.5);
    let tick_size = config.font_size * 0.85;

    canvas.line(left, top, right, top, &frame);
    canvas.line(left, bottom, right, bottom, &frame);
    canvas.line(left, top, left, bottom, &frame);
    canvas.line(right, top, right, bottom, &frame);

    let x_tick_style = TextStyle {
        size: tick_size,
        anchor: TextAnchor::Middle,
        ..Default::default()
    };
    for (val, label) in x_axis.tick_positions.iter().zip(&x_axis.tick_labels) {
        let px = x_axis.data_to_pixel(*val, left, right);
        canvas.line(px, top, px, bottom, &grid);
        canvas.line(px, bottom, px, bottom + TICK_LENGTH, &frame);
        canvas.text(px, bottom + TICK_LENGTH + tick_size + 1.0, label, &x_tick_style);
    }

    let y_tick_style = TextStyle {
        size: tick_size,
        anchor: TextAnchor::End,
        ..Default::default()
    };
    for (val, label) in y_axis.tick_positions.iter().zip(&y_axis.tick_labels) {
        let py = y_axis.data_to_pixel(*val, bottom, top);
        canvas.line(left, py, right, py, &grid);
        canvas.line(left - TICK_LENGTH, py, left, py, &frame);
        canvas.text(left - TICK_LENGTH - 2.0, py + tick_size * 0.35, label, &y_tick_style);
    }

    let label_style = TextStyle {
        size: config.font_size,
        anchor: TextAnchor::Middle,
        ..Default::default()
    };
    canvas.text((left + right) / 2.0, bottom + 34.0, &x_axis.label, &label_style);
    canvas.text_rotated(14.0, (top + bottom) / 2.0, &y_axis.label, &label_style, -90.0);
}

// ---------------------------------------------------------------------------
// File output
// ---------------------------------------------------------------------------

/// Render the dose, ionisation and SPR charts as PNGs next to `stem_path`
/// (`<stem>_PDD.png`, `<stem>_PDI.png`, `<stem>_SPR.png`).
pub fn make_plots(
    table: &AugmentedTable,
    stem_path: &Path,
    energy_mev: f64,
    config: &PlotConfig,
) -> Result<Vec<PathBuf>> {
    Quantity::ALL
        .iter()
        .map(|&quantity| {
            let svg = render_svg(table, quantity, energy_mev, config)?;
            let bytes = png::svg_to_png(&svg, config.dpi)?;
            let path = derived_path(stem_path, quantity.file_suffix(), "png");
            std::fs::write(&path, bytes).map_err(|e| Error::WriteFailed {
                location: path.display().to_string(),
                reason: e.to_string(),
            })?;
            log::info!("Wrote {}", path.display());
            Ok(path)
        })
        .collect()
}

/// Load a converted table from disk and plot it.
pub fn make_plots_from_file(
    path: &Path,
    energy_mev: f64,
    config: &PlotConfig,
) -> Result<Vec<PathBuf>> {
    let table = load_augmented(path)?;
    make_plots(&table, path, energy_mev, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::DoseRow;

    fn table() -> AugmentedTable {
        AugmentedTable::new(
            [(5.0, 92.0, 1.001, 90.0), (20.0, 100.0, 1.03, 100.0), (45.0, 40.0, 1.08, 42.0)]
                .iter()
                .map(|&(depth, ion, spr, dose)| DoseRow {
                    depth,
                    ion,
                    spr,
                    dose,
                })
                .collect(),
        )
    }

    #[test]
    fn svg_has_title_and_labels() {
        let svg = render_svg(&table(), Quantity::Dose, 12.0, &PlotConfig::default()).unwrap();
        assert!(svg.contains("12 MeV electron beam percentage depth dose"));
        assert!(svg.contains(DEPTH_LABEL));
        assert!(svg.contains("Dose at depth (%)"));
        assert!(svg.contains("<polyline"));
    }

    #[test]
    fn spr_title_and_fractional_energy() {
        let svg = render_svg(&table(), Quantity::Spr, 4.5, &PlotConfig::default()).unwrap();
        assert!(svg.contains("4.5 MeV electron beam mass stopping power ratio (SPR) at depth"));
        assert!(svg.contains("SPR at depth"));
    }

    #[test]
    fn empty_table_is_render_error() {
        let err = render_svg(&AugmentedTable::default(), Quantity::Ionisation, 6.0, &PlotConfig::default())
            .unwrap_err();
        assert!(matches!(err, Error::Render(_)));
    }

    #[test]
    fn non_finite_columns_are_render_errors() {
        let mut t = table();
        t.rows[2].dose = f64::INFINITY;
        let err = render_svg(&t, Quantity::Dose, 6.0, &PlotConfig::default()).unwrap_err();
        assert!(err.to_string().contains("`dose`"), "{err}");

        let mut t = table();
        t.rows[0].spr = f64::NAN;
        let err = render_svg(&t, Quantity::Spr, 6.0, &PlotConfig::default()).unwrap_err();
        assert!(err.to_string().contains("row 0"), "{err}");

        // Other quantities of the same table still plot.
        assert!(render_svg(&t, Quantity::Dose, 6.0, &PlotConfig::default()).is_ok());
    }

    #[test]
    fn infinite_cell_in_converted_file_fails_to_plot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("e6_withdose.csv");
        std::fs::write(&path, "depth,ion,spr,dose\n5,90,1.0,inf\n20,100,1.03,100\n").unwrap();
        let err = make_plots_from_file(&path, 6.0, &PlotConfig::default()).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Render);
        assert!(!dir.path().join("e6_withdose_PDD.png").exists());
    }

    #[test]
    fn series_colours_differ() {
        assert_ne!(Quantity::Dose.color(), Quantity::Ionisation.color());
        assert_ne!(Quantity::Ionisation.color(), Quantity::Spr.color());
    }

    #[test]
    fn config_defaults_fill_missing_fields() {
        let cfg: PlotConfig = serde_json::from_str(r#"{"dpi": 300}"#).unwrap();
        assert_eq!(cfg.dpi, 300);
        assert_eq!(cfg.width_pt, 460.8);
    }

    #[test]
    fn writes_three_pngs() {
        let dir = tempfile::tempdir().unwrap();
        let stem = dir.path().join("e6_withdose.csv");
        let config = PlotConfig {
            dpi: 36,
            ..Default::default()
        };
        let paths = make_plots(&table(), &stem, 6.0, &config).unwrap();
        let names: Vec<String> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![
            "e6_withdose_PDD.png",
            "e6_withdose_PDI.png",
            "e6_withdose_SPR.png",
        ]);
        for p in &paths {
            let img = image::open(p).unwrap();
            assert_eq!((img.width(), img.height()), (230, 173));
        }
    }
}
