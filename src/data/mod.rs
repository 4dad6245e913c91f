//! Data layer: table types, loading, writing and depth filtering.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → MeasurementTable
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  depth-domain predicate → surviving rows
//!   └──────────┘
//!        │   (convert: normalise, SPR, dose)
//!        ▼
//!   ┌──────────┐
//!   │  writer   │  AugmentedTable → <stem>_withdose.<ext>
//!   └──────────┘
//! ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod writer;

/// On-disk table formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Json,
    Parquet,
}

impl TableFormat {
    /// Recognise a format from a path's extension (case-insensitive).
    pub fn from_path(path: &std::path::Path) -> Option<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(TableFormat::Csv),
            "json" => Some(TableFormat::Json),
            "parquet" | "pq" => Some(TableFormat::Parquet),
            _ => None,
        }
    }
}
