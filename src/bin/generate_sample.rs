//! Write a synthetic electron-beam depth-ionisation curve as CSV.
//!
//! Usage: `generate_sample [output.csv] [r50_cm]`

use anyhow::{Context, Result};
use iondose::DepthSample;

/// Relative ionisation at depth `z_mm` for a beam whose ionisation falls to
/// 50 % at `r50_mm`: surface build-up, a logistic fall-off and a flat
/// bremsstrahlung tail.
fn ionisation(z_mm: f64, r50_mm: f64) -> f64 {
    let surface = 0.82;
    let buildup = surface + (1.0 - surface) * (1.0 - (-z_mm / (0.15 * r50_mm)).exp());
    let width = 0.06 * r50_mm;
    let falloff = 1.0 / (1.0 + ((z_mm - r50_mm) / width).exp());
    let tail = 0.015;
    buildup * falloff * (1.0 - tail) + tail
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let output_path = args.next().unwrap_or_else(|| "sample_ionisation.csv".to_string());
    let r50_cm: f64 = match args.next() {
        Some(s) => s.parse().with_context(|| format!("'{s}' is not a depth in cm"))?,
        None => 5.0,
    };
    let r50_mm = r50_cm * iondose::spr::MM_PER_CM;

    // Scan from the surface to 1.5 R50 in 0.5 mm steps, in raw chamber units.
    let n_steps = (1.5 * r50_mm / 0.5).ceil() as u32;
    let samples: Vec<DepthSample> = (0..=n_steps)
        .map(|i| {
            let z = 0.5 * f64::from(i);
            DepthSample::new(z, 2.4e-10 * ionisation(z, r50_mm))
        })
        .collect();

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;
    for sample in &samples {
        writer.serialize(sample)?;
    }
    writer.flush()?;

    println!(
        "Wrote {} depths (R50 = {r50_cm} cm) to {output_path}",
        samples.len()
    );
    Ok(())
}
