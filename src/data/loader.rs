use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::de::DeserializeOwned;

use super::TableFormat;
use super::model::{AugmentedTable, DepthSample, DoseRow, MeasurementTable};
use crate::error::Error;

const MEASUREMENT_COLUMNS: &[&str] = &["depth", "ion"];
const AUGMENTED_COLUMNS: &[&str] = &["depth", "ion", "spr", "dose"];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a measured depth-ionisation table.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with at least `depth` and `ion` columns
/// * `.json`    – `[{ "depth": 1.0, "ion": 12.3 }, ...]`
/// * `.parquet` – numeric `depth` and `ion` columns
///
/// Every failure, whatever its cause, is reported as
/// [`Error::UnreadableTable`] naming the path.
pub fn load_table(path: &Path) -> crate::Result<MeasurementTable> {
    let rows = load_rows::<DepthSample>(path, MEASUREMENT_COLUMNS)
        .map_err(|e| unreadable(path, &e))?;
    log::debug!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(MeasurementTable::new(rows).with_source(path.display().to_string()))
}

/// Load a previously converted table (`depth, ion, spr, dose`).
pub fn load_augmented(path: &Path) -> crate::Result<AugmentedTable> {
    let rows =
        load_rows::<DoseRow>(path, AUGMENTED_COLUMNS).map_err(|e| unreadable(path, &e))?;
    Ok(AugmentedTable::new(rows))
}

/// Parse CSV text from any reader, e.g. an in-memory buffer.
pub fn parse_csv<R: Read>(reader: R, source: &str) -> crate::Result<MeasurementTable> {
    let rows = read_csv::<DepthSample, R>(reader, MEASUREMENT_COLUMNS).map_err(|e| {
        Error::UnreadableTable {
            location: source.to_string(),
            reason: format!("{e:#}"),
        }
    })?;
    Ok(MeasurementTable::new(rows).with_source(source))
}

fn unreadable(path: &Path, err: &anyhow::Error) -> Error {
    Error::UnreadableTable {
        location: path.display().to_string(),
        reason: format!("{err:#}"),
    }
}

fn load_rows<T: DeserializeOwned>(path: &Path, columns: &[&str]) -> Result<Vec<T>> {
    match TableFormat::from_path(path) {
        Some(TableFormat::Csv) => {
            let file = std::fs::File::open(path).context("opening CSV")?;
            read_csv(file, columns)
        }
        Some(TableFormat::Json) => load_json(path),
        Some(TableFormat::Parquet) => {
            let cols = load_parquet_columns(path, columns)?;
            records_from_columns(columns, &cols)
        }
        None => {
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            bail!("Unsupported file extension: .{ext}")
        }
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one measurement per line.
/// Whitespace around fields is ignored; columns other than the required
/// ones are skipped.
fn read_csv<T: DeserializeOwned, R: Read>(reader: R, columns: &[&str]) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    for col in columns {
        if !headers.iter().any(|h| h == col) {
            bail!("CSV missing '{col}' column (found {headers:?})");
        }
    }
    let extra: Vec<&String> = headers
        .iter()
        .filter(|h| !columns.contains(&h.as_str()))
        .collect();
    if !extra.is_empty() {
        log::warn!("Ignoring CSV columns {extra:?}");
    }

    reader
        .deserialize()
        .enumerate()
        .map(|(row_no, result)| result.with_context(|| format!("CSV row {row_no}")))
        .collect()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, as written by `df.to_json(orient='records')`.
fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    serde_json::from_str(&text).context("parsing JSON records")
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Read the named columns of a Parquet file as `f64`.
///
/// Any integer or floating-point physical type is accepted and cast.
/// Null, NaN and infinite cells are an error.
fn load_parquet_columns(path: &Path, columns: &[&str]) -> Result<Vec<Vec<f64>>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut out: Vec<Vec<f64>> = vec![Vec::new(); columns.len()];

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        for (slot, name) in out.iter_mut().zip(columns) {
            let idx = schema
                .index_of(name)
                .map_err(|_| anyhow::anyhow!("Parquet file missing '{name}' column"))?;
            let col = batch.column(idx);
            let as_f64 = cast(col.as_ref(), &DataType::Float64)
                .with_context(|| format!("column '{name}' is not numeric"))?;
            let values = as_f64.as_primitive::<Float64Type>();
            for row in 0..values.len() {
                if values.is_null(row) {
                    bail!("Row {row}: null value in '{name}'");
                }
                let value = values.value(row);
                if !value.is_finite() {
                    bail!("Row {row}: non-finite value {value} in '{name}'");
                }
                slot.push(value);
            }
        }
    }

    Ok(out)
}

/// Re-assemble typed rows from column vectors via serde.
fn records_from_columns<T: DeserializeOwned>(names: &[&str], cols: &[Vec<f64>]) -> Result<Vec<T>> {
    let n_rows = cols.first().map_or(0, Vec::len);
    (0..n_rows)
        .map(|row| {
            let record: serde_json::Map<String, serde_json::Value> = names
                .iter()
                .zip(cols)
                .map(|(name, col)| ((*name).to_string(), serde_json::Value::from(col[row])))
                .collect();
            serde_json::from_value(serde_json::Value::Object(record))
                .with_context(|| format!("Row {row}: invalid values"))
        })
        .collect()
}
