//! # iondose
//!
//! Converts a measured depth-ionisation curve of a clinical electron beam
//! into a depth-dose curve using the empirical water-to-air stopping-power
//! ratio of the electron code of practice.
//!
//! ```no_run
//! use std::path::Path;
//!
//! let out = iondose::convert_file(Path::new("e12.csv"), 4.9)?;
//! iondose::plot::make_plots_from_file(&out, 12.0, &Default::default())?;
//! # Ok::<(), iondose::Error>(())
//! ```
//!
//! ## Modules
//!
//! - [`spr`] : stopping-power ratio and its validity domain
//! - [`convert`] : normalisation, depth filtering, dose and rounding
//! - [`data`] : table types, loaders and writers (CSV, JSON, Parquet)
//! - [`plot`] : PDD / PDI / SPR charts rendered to PNG
//! - [`state`], [`app`], [`ui`] : the interactive viewer

pub mod app;
pub mod color;
pub mod convert;
pub mod data;
pub mod error;
pub mod plot;
pub mod spr;
pub mod state;
pub mod ui;

pub use convert::{convert, convert_file};
pub use data::model::{AugmentedTable, DepthSample, DoseRow, MeasurementTable};
pub use error::{Error, ErrorKind, Result};
pub use spr::{DepthDomain, evaluate_spr};

/// Crate version, printed by the `iondose` binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// `This is iondose version <VERSION>.`
pub fn version_banner() -> String {
    format!("This is iondose version {VERSION}.")
}
