//! Water-to-air mass stopping-power ratio for clinical electron beams.
//!
//! Empirical rational fit from the electron code of practice:
//!
//! ```text
//! x = ln(R50,D)        y = z_w / R50,D
//!
//!            1.075 - 0.5087 x + 0.0887 x² - 0.084 y
//! s_w,air = ------------------------------------------------
//!           1 - 0.4281 x + 0.0646 x² + 0.00309 x³ - 0.125 y
//! ```
//!
//! valid for `1 cm < R50,D < 20 cm` and `0.02 R50,D < z_w < 1.2 R50,D`.
//! Both depths are in centimetres.

use crate::error::{Error, Result};

/// Lower (exclusive) bound on the beam quality index, in cm.
pub const R50D_MIN_CM: f64 = 1.0;
/// Upper (exclusive) bound on the beam quality index, in cm.
pub const R50D_MAX_CM: f64 = 20.0;

/// Depth-domain bounds as multiples of R50,D.
const DEPTH_LOWER_FACTOR: f64 = 0.02;
const DEPTH_UPPER_FACTOR: f64 = 1.2;

/// Measurement tables store depth in millimetres; the model works in cm.
pub const MM_PER_CM: f64 = 10.0;

const DENOMINATOR_EPS: f64 = 1e-12;

// ---------------------------------------------------------------------------
// DepthDomain – open interval of depths where the fit is valid
// ---------------------------------------------------------------------------

/// The open interval `(0.02 R50,D, 1.2 R50,D)` in centimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthDomain {
    pub lower_cm: f64,
    pub upper_cm: f64,
}

impl DepthDomain {
    /// Validate `r50d_cm` and derive the depth interval for it.
    pub fn for_beam_quality(r50d_cm: f64) -> Result<Self> {
        check_beam_quality(r50d_cm)?;
        Ok(Self {
            lower_cm: DEPTH_LOWER_FACTOR * r50d_cm,
            upper_cm: DEPTH_UPPER_FACTOR * r50d_cm,
        })
    }

    /// Strict containment; both ends are excluded.
    pub fn contains(&self, zw_cm: f64) -> bool {
        self.lower_cm < zw_cm && zw_cm < self.upper_cm
    }

    /// Same test for a depth stored in millimetres.
    pub fn contains_mm(&self, depth_mm: f64) -> bool {
        self.contains(depth_mm / MM_PER_CM)
    }
}

fn check_beam_quality(r50d_cm: f64) -> Result<()> {
    // Written so that NaN fails the check as well.
    if R50D_MIN_CM < r50d_cm && r50d_cm < R50D_MAX_CM {
        Ok(())
    } else {
        Err(Error::InvalidBeamQuality { r50d_cm })
    }
}

// ---------------------------------------------------------------------------
// Evaluator
// ---------------------------------------------------------------------------

/// Stopping-power ratio at depth `zw_cm` for a beam of quality `r50d_cm`.
///
/// Fails with [`Error::InvalidBeamQuality`] or [`Error::InvalidDepth`] when
/// an input lies outside the fit's validity range, and with
/// [`Error::DegenerateDenominator`] if the rational function has no finite
/// value at the requested point.
pub fn evaluate_spr(zw_cm: f64, r50d_cm: f64) -> Result<f64> {
    let domain = DepthDomain::for_beam_quality(r50d_cm)?;
    if !domain.contains(zw_cm) {
        return Err(Error::InvalidDepth {
            zw_cm,
            lower_cm: domain.lower_cm,
            upper_cm: domain.upper_cm,
        });
    }

    let x = r50d_cm.ln();
    let y = zw_cm / r50d_cm;
    let numerator = 1.075 - 0.5087 * x + 0.0887 * x.powi(2) - 0.084 * y;
    let denominator = 1.0 - 0.4281 * x + 0.0646 * x.powi(2) + 0.00309 * x.powi(3) - 0.125 * y;

    checked_ratio(numerator, denominator).ok_or(Error::DegenerateDenominator {
        zw_cm,
        r50d_cm,
        denominator,
    })
}

fn checked_ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator.abs() < DENOMINATOR_EPS {
        return None;
    }
    let ratio = numerator / denominator;
    ratio.is_finite().then_some(ratio)
}
