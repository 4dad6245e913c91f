//! Ionisation-to-dose conversion.
//!
//! The pipeline runs in three phases, each needing the previous one to have
//! finished over the whole column:
//!
//! ```text
//!  normalise ion (all rows) ─► filter depths ─► spr, dose per row ─► normalise dose ─► round
//! ```
//!
//! Ionisation is normalised *before* depth filtering, so the 100 % reference
//! is the maximum over the full measured curve.
//!
//! Rounding is half-away-from-zero ([`f64::round`] on the scaled value):
//! `ion` and `dose` to one decimal place, `spr` to three.
//!
//! Feeding the output back in with `dose` as the new `ion` column is *not*
//! a no-op: the stopping-power correction is applied again.

use std::path::{Path, PathBuf};

use crate::data::filter::valid_rows;
use crate::data::loader::load_table;
use crate::data::model::{AugmentedTable, DepthSample, DoseRow, MeasurementTable};
use crate::data::writer::{output_path, save_table};
use crate::error::{Error, Result};
use crate::spr::{DepthDomain, MM_PER_CM, evaluate_spr};

/// Value every normalised column peaks at.
pub const PERCENT: f64 = 100.0;

pub const ION_DECIMALS: i32 = 1;
pub const SPR_DECIMALS: i32 = 3;
pub const DOSE_DECIMALS: i32 = 1;

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Convert a measured depth-ionisation curve to a depth-dose curve for a beam
/// of quality `r50d_cm`.
///
/// Rows whose depth is outside `(0.02 R50,D, 1.2 R50,D)` are dropped; the
/// result keeps the input order of the rest. Fails with
/// [`Error::NonFiniteValue`] if any input cell is NaN or infinite, and with
/// [`Error::EmptyAfterFiltering`] when a column has nothing to normalise
/// against.
pub fn convert(table: &MeasurementTable, r50d_cm: f64) -> Result<AugmentedTable> {
    let domain = DepthDomain::for_beam_quality(r50d_cm)?;
    ensure_finite(table)?;

    let ion_max = positive_max("ion", table.rows.iter().map(|r| r.ion))?;
    let normalised: Vec<_> = table
        .rows
        .iter()
        .map(|r| DepthSample::new(r.depth, PERCENT * r.ion / ion_max))
        .collect();

    let kept = valid_rows(&normalised, &domain);
    if kept.is_empty() {
        return Err(Error::EmptyAfterFiltering {
            column: "depth",
            rows: 0,
        });
    }
    log::debug!(
        "{} of {} rows inside ({:.3} cm, {:.3} cm)",
        kept.len(),
        table.len(),
        domain.lower_cm,
        domain.upper_cm
    );

    let mut rows = kept
        .iter()
        .map(|s| {
            let spr = evaluate_spr(s.depth / MM_PER_CM, r50d_cm)?;
            Ok(DoseRow {
                depth: s.depth,
                ion: s.ion,
                spr,
                dose: s.ion * spr,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let dose_max = positive_max("dose", rows.iter().map(|r| r.dose))?;
    for row in &mut rows {
        row.dose = round_to(PERCENT * row.dose / dose_max, DOSE_DECIMALS);
        row.ion = round_to(row.ion, ION_DECIMALS);
        row.spr = round_to(row.spr, SPR_DECIMALS);
    }

    Ok(AugmentedTable::new(rows))
}

/// Load `input`, convert it and write the result next to it as
/// `<stem>_withdose.<ext>` in the same format. Returns the written path.
pub fn convert_file(input: &Path, r50d_cm: f64) -> Result<PathBuf> {
    let table = load_table(input)?;
    let augmented = convert(&table, r50d_cm)?;
    let out = output_path(input);
    save_table(&augmented, &out)?;
    Ok(out)
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10_f64.powi(decimals);
    (value * scale).round() / scale
}

/// Every `depth` and `ion` cell must be finite.
fn ensure_finite(table: &MeasurementTable) -> Result<()> {
    for (row, sample) in table.rows.iter().enumerate() {
        for (column, value) in [("depth", sample.depth), ("ion", sample.ion)] {
            if !value.is_finite() {
                return Err(Error::NonFiniteValue {
                    location: table.source.clone().unwrap_or_else(|| "input table".into()),
                    column,
                    row,
                    value,
                });
            }
        }
    }
    Ok(())
}

/// Largest value of a column, which must be positive and finite to divide by.
fn positive_max(column: &'static str, values: impl Iterator<Item = f64>) -> Result<f64> {
    let mut rows = 0;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        rows += 1;
        max = max.max(v);
    }
    if max.is_finite() && max > 0.0 {
        Ok(max)
    } else {
        Err(Error::EmptyAfterFiltering { column, rows })
    }
}
