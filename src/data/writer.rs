use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::Float64Array;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use super::TableFormat;
use super::model::{AugmentedTable, Column};
use crate::error::Error;

/// Suffix appended to the input file stem for the converted table.
pub const OUTPUT_SUFFIX: &str = "_withdose";

// ---------------------------------------------------------------------------
// Output naming
// ---------------------------------------------------------------------------

/// Path of the file derived from `input` by appending `suffix` to the stem
/// and using `extension`: `dir/curve.csv` → `dir/curve<suffix>.<extension>`.
pub fn derived_path(input: &Path, suffix: &str, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{stem}{suffix}.{extension}"))
}

/// Where the converted table for `input` is written: same directory, same
/// format, `_withdose` added to the stem.
pub fn output_path(input: &Path) -> PathBuf {
    let ext = input
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "csv".to_string());
    derived_path(input, OUTPUT_SUFFIX, &ext)
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Write an augmented table, choosing the format from `path`'s extension.
pub fn save_table(table: &AugmentedTable, path: &Path) -> crate::Result<()> {
    write_any(table, path).map_err(|e| Error::WriteFailed {
        location: path.display().to_string(),
        reason: format!("{e:#}"),
    })?;
    log::info!("Wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

fn write_any(table: &AugmentedTable, path: &Path) -> Result<()> {
    match TableFormat::from_path(path) {
        Some(TableFormat::Csv) => {
            let file = std::fs::File::create(path).context("creating CSV")?;
            write_csv(table, file)
        }
        Some(TableFormat::Json) => {
            let file = std::fs::File::create(path).context("creating JSON file")?;
            serde_json::to_writer_pretty(std::io::BufWriter::new(file), &table.rows)
                .context("serialising JSON records")
        }
        Some(TableFormat::Parquet) => write_parquet(table, path),
        None => bail!("Unsupported output extension for {}", path.display()),
    }
}

/// CSV with header `depth,ion,spr,dose`, no index column.
pub fn write_csv<W: Write>(table: &AugmentedTable, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    if table.is_empty() {
        // serde only emits the header together with the first record
        wtr.write_record(COLUMNS.iter().map(|c| c.name()))?;
    }
    for row in &table.rows {
        wtr.serialize(row).context("writing CSV row")?;
    }
    wtr.flush().context("flushing CSV")?;
    Ok(())
}

const COLUMNS: [Column; 4] = [Column::Depth, Column::Ion, Column::Spr, Column::Dose];

// ---------------------------------------------------------------------------
// Parquet writer
// ---------------------------------------------------------------------------

fn write_parquet(table: &AugmentedTable, path: &Path) -> Result<()> {
    let schema = Arc::new(Schema::new(
        COLUMNS
            .iter()
            .map(|c| Field::new(c.name(), DataType::Float64, false))
            .collect::<Vec<_>>(),
    ));

    let arrays = COLUMNS
        .iter()
        .map(|&c| Arc::new(Float64Array::from(table.column(c))) as arrow::array::ArrayRef)
        .collect();
    let batch =
        RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_augmented;
    use crate::data::model::DoseRow;

    fn table() -> AugmentedTable {
        AugmentedTable::new(vec![
            DoseRow {
                depth: 10.0,
                ion: 95.2,
                spr: 1.012,
                dose: 93.1,
            },
            DoseRow {
                depth: 20.0,
                ion: 100.0,
                spr: 1.034,
                dose: 100.0,
            },
        ])
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("/data/e12/curve.csv")),
            PathBuf::from("/data/e12/curve_withdose.csv")
        );
        assert_eq!(
            output_path(Path::new("scan.v2.parquet")),
            PathBuf::from("scan.v2_withdose.parquet")
        );
        assert_eq!(
            derived_path(Path::new("out/curve_withdose.csv"), "_PDD", "png"),
            PathBuf::from("out/curve_withdose_PDD.png")
        );
    }

    #[test]
    fn test_csv_layout() {
        let mut buf = Vec::new();
        write_csv(&table(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("depth,ion,spr,dose"));
        assert_eq!(lines.next(), Some("10.0,95.2,1.012,93.1"));
        assert_eq!(lines.next(), Some("20.0,100.0,1.034,100.0"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_empty_csv_has_header() {
        let mut buf = Vec::new();
        write_csv(&AugmentedTable::default(), &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "depth,ion,spr,dose\n");
    }

    #[test]
    fn test_each_format_reloads() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["t.csv", "t.json", "t.parquet"] {
            let path = dir.path().join(name);
            save_table(&table(), &path).unwrap();
            assert_eq!(load_augmented(&path).unwrap(), table(), "{name}");
        }
    }

    #[test]
    fn test_unsupported_output() {
        let dir = tempfile::tempdir().unwrap();
        let err = save_table(&table(), &dir.path().join("t.xlsx")).unwrap_err();
        assert!(matches!(err, Error::WriteFailed { .. }));
    }
}
