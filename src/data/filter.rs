use super::model::{DepthSample, MeasurementTable};
use crate::spr::DepthDomain;

// ---------------------------------------------------------------------------
// Depth-domain row selection
// ---------------------------------------------------------------------------

/// Return indices of rows whose depth lies strictly inside `domain`.
///
/// Depths are stored in mm and compared in cm. Rows sitting exactly on a
/// bound are excluded, as are rows with a NaN depth.
pub fn valid_indices(table: &MeasurementTable, domain: &DepthDomain) -> Vec<usize> {
    table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| domain.contains_mm(row.depth))
        .map(|(i, _)| i)
        .collect()
}

/// Copy the rows inside `domain`, preserving order.
pub fn valid_rows(rows: &[DepthSample], domain: &DepthDomain) -> Vec<DepthSample> {
    rows.iter()
        .filter(|row| domain.contains_mm(row.depth))
        .copied()
        .collect()
}
