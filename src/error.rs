use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Broad category of an [`Error`], so callers can tell bad input values
/// apart from unreadable files without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input values outside the model's validity range, or an undefined
    /// normalisation.
    Domain,
    /// A table could not be read or written.
    Io,
    /// The stopping-power formula produced a degenerate result.
    Computation,
    /// A chart could not be rendered or encoded.
    Render,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("R50,D must be strictly between 1 cm and 20 cm, got {r50d_cm} cm")]
    InvalidBeamQuality { r50d_cm: f64 },

    #[error(
        "z_w must be strictly between 0.02*R50,D and 1.2*R50,D: \
         z_w = {zw_cm} cm falls outside ({lower_cm} cm, {upper_cm} cm)"
    )]
    InvalidDepth {
        zw_cm: f64,
        lower_cm: f64,
        upper_cm: f64,
    },

    #[error("{location}: `{column}` in row {row} is {value}, expected a finite number")]
    NonFiniteValue {
        location: String,
        column: &'static str,
        row: usize,
        value: f64,
    },

    #[error("cannot normalise `{column}`: {rows} row(s) remain and none has a positive finite value")]
    EmptyAfterFiltering { column: &'static str, rows: usize },

    #[error(
        "stopping-power ratio is undefined at z_w = {zw_cm} cm, R50,D = {r50d_cm} cm \
         (denominator {denominator})"
    )]
    DegenerateDenominator {
        zw_cm: f64,
        r50d_cm: f64,
        denominator: f64,
    },

    #[error("{location} is not a readable depth/ionisation table: {reason}")]
    UnreadableTable { location: String, reason: String },

    #[error("failed to write {location}: {reason}")]
    WriteFailed { location: String, reason: String },

    #[error("plot rendering failed: {0}")]
    Render(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidBeamQuality { .. }
            | Error::InvalidDepth { .. }
            | Error::NonFiniteValue { .. }
            | Error::EmptyAfterFiltering { .. } => ErrorKind::Domain,
            Error::UnreadableTable { .. } | Error::WriteFailed { .. } => ErrorKind::Io,
            Error::DegenerateDenominator { .. } => ErrorKind::Computation,
            Error::Render(_) => ErrorKind::Render,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_numeric_context() {
        let err = Error::InvalidDepth {
            zw_cm: 7.5,
            lower_cm: 0.1,
            upper_cm: 6.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("7.5"));
        assert!(msg.contains("0.1"));
        assert!(msg.contains("6"));

        let msg = Error::InvalidBeamQuality { r50d_cm: 25.0 }.to_string();
        assert!(msg.contains("25"));
        assert!(msg.contains("20"));
    }

    #[test]
    fn kinds() {
        assert_eq!(Error::InvalidBeamQuality { r50d_cm: 0.5 }.kind(), ErrorKind::Domain);
        assert_eq!(
            Error::UnreadableTable {
                location: "a.csv".into(),
                reason: "missing".into()
            }
            .kind(),
            ErrorKind::Io
        );
        assert_eq!(
            Error::DegenerateDenominator {
                zw_cm: 1.0,
                r50d_cm: 2.0,
                denominator: 0.0
            }
            .kind(),
            ErrorKind::Computation
        );
        assert_eq!(Error::Render("x".into()).kind(), ErrorKind::Render);
        let err = Error::NonFiniteValue {
            location: "scan.csv".into(),
            column: "ion",
            row: 1,
            value: f64::NAN,
        };
        assert_eq!(err.kind(), ErrorKind::Domain);
        assert_eq!(err.to_string(), "scan.csv: `ion` in row 1 is NaN, expected a finite number");
    }
}
