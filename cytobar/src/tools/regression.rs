//! Ordinary least-squares fit of one channel against another.

use log::warn;
use serde::Serialize;
use statrs::distribution::{
    ContinuousCDF,
    StudentsT,
};
use statrs::statistics::Statistics;

use crate::error::{
    CytoError,
    Result,
};

/// Guards the t statistic against division by zero for perfect fits.
const TINY: f64 = 1.0e-20;

/// Result of [`linear_regression`].
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LinearFit {
    pub slope:     f64,
    pub intercept: f64,
    /// Pearson correlation coefficient.
    pub r_value:   f64,
    /// Two-sided p-value for a zero slope, Student's t with n - 2 dof.
    pub p_value:   f64,
    /// Standard error of the slope.
    pub std_err:   f64,
    pub n:         usize,
}

impl LinearFit {
    pub fn r_squared(&self) -> f64 {
        self.r_value * self.r_value
    }

    pub fn predict(
        &self,
        x: f64,
    ) -> f64 {
        self.intercept + self.slope * x
    }

    /// Multi-line annotation drawn on regression panels.
    pub fn annotation(&self) -> Vec<String> {
        vec![
            format!("Slope = {:.3}", self.slope),
            format!("Intercept = {:.1}", self.intercept),
            format!("R² = {:.3}", self.r_squared()),
            format!("p = {:.3}", self.p_value),
        ]
    }
}

/// Fits `y = intercept + slope * x`.
///
/// Pairs where either value is not finite are skipped. At least three
/// finite pairs with non-constant `x` are required.
pub fn linear_regression(
    x: &[f64],
    y: &[f64],
) -> Result<LinearFit> {
    if x.len() != y.len() {
        return Err(CytoError::SeriesMismatch {
            left:  x.len(),
            right: y.len(),
        });
    }
    let total = x.len();
    let (x, y): (Vec<f64>, Vec<f64>) = x
        .iter()
        .zip(y.iter())
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(a, b)| (*a, *b))
        .unzip();
    let skipped = total - x.len();
    if skipped > 0 {
        warn!("Skipped {skipped} non-finite pairs in regression");
    }

    let n = x.len();
    if n < 3 {
        return Err(CytoError::data_format(format!(
            "regression needs at least 3 finite points, got {n}"
        )));
    }
    let x_mean = x.iter().mean();
    let y_mean = y.iter().mean();
    let (mut ssxm, mut ssym, mut ssxym) = (0.0, 0.0, 0.0);
    for (xi, yi) in x.iter().zip(y.iter()) {
        let (dx, dy) = (xi - x_mean, yi - y_mean);
        ssxm += dx * dx;
        ssym += dy * dy;
        ssxym += dx * dy;
    }
    if ssxm == 0.0 {
        return Err(CytoError::data_format(
            "regression x values are constant",
        ));
    }

    let r_value = if ssym == 0.0 {
        0.0
    }
    else {
        (ssxym / (ssxm * ssym).sqrt()).clamp(-1.0, 1.0)
    };
    let slope = ssxym / ssxm;
    let intercept = y_mean - slope * x_mean;

    let dof = (n - 2) as f64;
    let t = r_value
        * (dof / ((1.0 - r_value + TINY) * (1.0 + r_value + TINY))).sqrt();
    let dist = StudentsT::new(0.0, 1.0, dof)
        .map_err(|e| CytoError::data_format(e.to_string()))?;
    let p_value = 2.0 * dist.sf(t.abs());
    let std_err = ((1.0 - r_value * r_value) * ssym / ssxm / dof).sqrt();

    Ok(LinearFit {
        slope,
        intercept,
        r_value,
        p_value,
        std_err,
        n,
    })
}
