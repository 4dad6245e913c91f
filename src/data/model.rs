use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DepthSample – one row of a measured depth-ionisation curve
// ---------------------------------------------------------------------------

/// A single measurement point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthSample {
    /// Water depth in millimetres.
    pub depth: f64,
    /// Raw (or relative) ionisation signal.
    pub ion: f64,
}

impl DepthSample {
    pub fn new(depth: f64, ion: f64) -> Self {
        Self { depth, ion }
    }
}

// ---------------------------------------------------------------------------
// MeasurementTable – the loaded input curve
// ---------------------------------------------------------------------------

/// A measured depth-ionisation curve in source row order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementTable {
    pub rows: Vec<DepthSample>,
    /// Where the table came from (file path), used in messages.
    pub source: Option<String>,
}

impl MeasurementTable {
    pub fn new(rows: Vec<DepthSample>) -> Self {
        Self { rows, source: None }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Build from `(depth_mm, ion)` pairs.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        Self::new(
            pairs
                .iter()
                .map(|&(depth, ion)| DepthSample::new(depth, ion))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Shallowest and deepest depth in mm, if any rows exist.
    pub fn depth_span(&self) -> Option<(f64, f64)> {
        column_span(self.rows.iter().map(|r| r.depth))
    }
}

// ---------------------------------------------------------------------------
// DoseRow / AugmentedTable – converter output
// ---------------------------------------------------------------------------

/// One row of the converted curve. Field order is the output column order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoseRow {
    /// Water depth in millimetres.
    pub depth: f64,
    /// Percentage depth ionisation.
    pub ion: f64,
    /// Water-to-air stopping-power ratio.
    pub spr: f64,
    /// Percentage depth dose.
    pub dose: f64,
}

/// The measurement table restricted to valid depths and extended with
/// `spr` and `dose`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AugmentedTable {
    pub rows: Vec<DoseRow>,
}

/// Column selector for [`AugmentedTable::column`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Depth,
    Ion,
    Spr,
    Dose,
}

impl Column {
    pub fn name(self) -> &'static str {
        match self {
            Column::Depth => "depth",
            Column::Ion => "ion",
            Column::Spr => "spr",
            Column::Dose => "dose",
        }
    }

    fn get(self, row: &DoseRow) -> f64 {
        match self {
            Column::Depth => row.depth,
            Column::Ion => row.ion,
            Column::Spr => row.spr,
            Column::Dose => row.dose,
        }
    }
}

impl AugmentedTable {
    pub fn new(rows: Vec<DoseRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Copy one column out in row order.
    pub fn column(&self, column: Column) -> Vec<f64> {
        self.rows.iter().map(|r| column.get(r)).collect()
    }

    /// `(depth, value)` pairs for plotting `column` against depth.
    pub fn series(&self, column: Column) -> Vec<[f64; 2]> {
        self.rows.iter().map(|r| [r.depth, column.get(r)]).collect()
    }

    /// Minimum and maximum of a column, if the table is non-empty.
    pub fn span(&self, column: Column) -> Option<(f64, f64)> {
        column_span(self.rows.iter().map(|r| column.get(r)))
    }
}

fn column_span(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_output() -> AugmentedTable {
        AugmentedTable::new(vec![
            DoseRow {
                depth: 10.0,
                ion: 90.0,
                spr: 1.01,
                dose: 88.0,
            },
            DoseRow {
                depth: 20.0,
                ion: 100.0,
                spr: 1.03,
                dose: 100.0,
            },
        ])
    }

    #[test]
    fn test_columns_and_series() {
        let t = sample_output();
        assert_eq!(t.column(Column::Ion), vec![90.0, 100.0]);
        assert_eq!(t.series(Column::Dose), vec![[10.0, 88.0], [20.0, 100.0]]);
        assert_eq!(t.span(Column::Spr), Some((1.01, 1.03)));
        assert_eq!(Column::Spr.name(), "spr");
    }

    #[test]
    fn test_measurement_span() {
        let t = MeasurementTable::from_pairs(&[(3.0, 1.0), (1.0, 2.0), (7.0, 0.5)]);
        assert_eq!(t.len(), 3);
        assert_eq!(t.depth_span(), Some((1.0, 7.0)));
        assert_eq!(MeasurementTable::default().depth_span(), None);
    }
}
