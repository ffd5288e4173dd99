//! Ordinary least squares fit of one variable against another.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};
use thiserror::Error;

/// Keeps the t statistic finite when |r| is exactly 1.
const TINY: f64 = 1.0e-20;

#[derive(Error, Debug, PartialEq)]
pub enum RegressionError {
    #[error("x has {x} values but y has {y}")]
    LengthMismatch { x: usize, y: usize },

    #[error("at least 2 points are needed for a regression, found {0}")]
    TooFewPoints(usize),

    #[error("cannot fit a line when every x value is identical")]
    ConstantX,

    #[error("t distribution unavailable: {0}")]
    Distribution(String),

    #[error("confidence level must lie strictly between 0 and 1, got {0}")]
    InvalidLevel(f64),
}

/// Result of fitting `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Pearson correlation coefficient
    pub r_value: f64,
    /// Two-sided p-value for the null hypothesis that the slope is zero
    pub p_value: f64,
    /// Standard error of the slope
    pub std_err: f64,
    pub n: usize,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Fit a least squares line through `(x[i], y[i])`.
///
/// Uses population (1/n) second moments. The p-value comes from a Student t
/// distribution with `n - 2` degrees of freedom; with exactly two points the
/// fit is exact and the p-value is 1 if both y values match, else 0.
pub fn linear_regression(x: &[f64], y: &[f64]) -> Result<LinearFit, RegressionError> {
    if x.len() != y.len() {
        return Err(RegressionError::LengthMismatch {
            x: x.len(),
            y: y.len(),
        });
    }
    let n = x.len();
    if n < 2 {
        return Err(RegressionError::TooFewPoints(n));
    }
    if x.iter().all(|&value| value == x[0]) {
        return Err(RegressionError::ConstantX);
    }

    let nf = n as f64;
    let x_mean = x.iter().sum::<f64>() / nf;
    let y_mean = y.iter().sum::<f64>() / nf;
    let (mut ssxm, mut ssym, mut ssxym) = (0.0, 0.0, 0.0);
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - x_mean;
        let dy = yi - y_mean;
        ssxm += dx * dx;
        ssym += dy * dy;
        ssxym += dx * dy;
    }
    ssxm /= nf;
    ssym /= nf;
    ssxym /= nf;

    let r_value = if ssxm == 0.0 || ssym == 0.0 {
        0.0
    } else {
        (ssxym / (ssxm * ssym).sqrt()).clamp(-1.0, 1.0)
    };
    let slope = ssxym / ssxm;
    let intercept = y_mean - slope * x_mean;

    let (p_value, std_err) = if n == 2 {
        let p = if y[0] == y[1] { 1.0 } else { 0.0 };
        (p, 0.0)
    } else {
        let df = (n - 2) as f64;
        let t = r_value * (df / ((1.0 - r_value + TINY) * (1.0 + r_value + TINY))).sqrt();
        let dist = StudentsT::new(0.0, 1.0, df)
            .map_err(|e| RegressionError::Distribution(e.to_string()))?;
        let p = (2.0 * dist.sf(t.abs())).clamp(0.0, 1.0);
        let se = ((1.0 - r_value * r_value) * ssym / ssxm / df).sqrt();
        (p, se)
    };

    Ok(LinearFit {
        slope,
        intercept,
        r_value,
        p_value,
        std_err,
        n,
    })
}

/// One point on the confidence band around a fitted line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandPoint {
    pub x: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Confidence band for the mean response of `fit`, evaluated at each of `at`.
///
/// `x` must be the sample the line was fitted on. The half width at `x0` is
/// `t * s * sqrt(1/n + (x0 - mean)^2 / sxx)` with `t` the two-sided Student t
/// quantile for `level` on `n - 2` degrees of freedom. A two point fit has no
/// residual degrees of freedom and yields an empty band.
pub fn confidence_band(
    fit: &LinearFit,
    x: &[f64],
    level: f64,
    at: &[f64],
) -> Result<Vec<BandPoint>, RegressionError> {
    if !(level > 0.0 && level < 1.0) {
        return Err(RegressionError::InvalidLevel(level));
    }
    if x.len() != fit.n {
        return Err(RegressionError::LengthMismatch {
            x: x.len(),
            y: fit.n,
        });
    }
    if fit.n <= 2 {
        return Ok(Vec::new());
    }

    let nf = fit.n as f64;
    let x_mean = x.iter().sum::<f64>() / nf;
    let sxx: f64 = x.iter().map(|xi| (xi - x_mean).powi(2)).sum();
    let df = (fit.n - 2) as f64;
    let dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| RegressionError::Distribution(e.to_string()))?;
    let quantile = dist.inverse_cdf(0.5 + level / 2.0);
    // std_err is s / sqrt(sxx)
    let scale = quantile * fit.std_err;

    Ok(at
        .iter()
        .map(|&x0| {
            let centre = fit.predict(x0);
            let half = scale * (sxx / nf + (x0 - x_mean).powi(2)).sqrt();
            BandPoint {
                x: x0,
                lower: centre - half,
                upper: centre + half,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_known_fit() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 5.0, 4.0, 5.0];
        let fit = linear_regression(&x, &y).unwrap();
        assert_relative_eq!(fit.slope, 0.6, epsilon = 1e-12);
        assert_relative_eq!(fit.intercept, 2.2, epsilon = 1e-12);
        assert_relative_eq!(fit.r_value, 0.6f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(fit.std_err, 0.08f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(fit.p_value, 0.1240, epsilon = 1e-3);
        assert_eq!(fit.n, 5);
        assert_relative_eq!(fit.predict(10.0), 8.2, epsilon = 1e-12);
    }

    #[test]
    fn test_negative_correlation() {
        let rain = [0.0, 2.0, 4.0, 8.0, 16.0];
        let taken = [1000.0, 960.0, 930.0, 850.0, 700.0];
        let fit = linear_regression(&rain, &taken).unwrap();
        assert!(fit.slope < 0.0);
        assert!(fit.r_value < -0.99);
        assert!(fit.p_value < 0.01);
    }

    #[test]
    fn test_perfect_line() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [1.0, 3.0, 5.0, 7.0];
        let fit = linear_regression(&x, &y).unwrap();
        assert_relative_eq!(fit.r_value, 1.0);
        assert_relative_eq!(fit.slope, 2.0, epsilon = 1e-12);
        assert_relative_eq!(fit.intercept, 1.0, epsilon = 1e-12);
        assert_relative_eq!(fit.std_err, 0.0, epsilon = 1e-9);
        assert!(fit.p_value < 1e-6);
    }

    #[test]
    fn test_tiny_p_value_stays_positive() {
        let x: Vec<f64> = (1..=10).map(f64::from).collect();
        let y: Vec<f64> = x
            .iter()
            .map(|&v| 3.0 * v + if v as u32 % 2 == 0 { 0.001 } else { -0.001 })
            .collect();
        let fit = linear_regression(&x, &y).unwrap();
        assert!(fit.r_value < 1.0);
        assert!(fit.p_value > 0.0);
        assert!(fit.p_value < 1e-20);
    }

    #[test]
    fn test_confidence_band() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 5.0, 4.0, 5.0];
        let fit = linear_regression(&x, &y).unwrap();
        let band = confidence_band(&fit, &x, 0.95, &[1.0, 3.0, 5.0]).unwrap();
        assert_eq!(band.len(), 3);

        // s = sqrt(2.4 / 3), t(0.975, 3) = 3.182446
        let s = 0.8f64.sqrt();
        let half_at_mean = 3.182446 * s * (1.0f64 / 5.0).sqrt();
        assert_relative_eq!(band[1].upper - fit.predict(3.0), half_at_mean, epsilon = 1e-4);
        assert_relative_eq!(fit.predict(3.0) - band[1].lower, half_at_mean, epsilon = 1e-4);

        // narrowest at the mean of x, symmetric either side of it
        let width = |p: &BandPoint| p.upper - p.lower;
        assert!(width(&band[0]) > width(&band[1]));
        assert_relative_eq!(width(&band[0]), width(&band[2]), epsilon = 1e-12);
    }

    #[test]
    fn test_confidence_band_edge_cases() {
        let fit = linear_regression(&[0.0, 2.0], &[1.0, 5.0]).unwrap();
        assert!(confidence_band(&fit, &[0.0, 2.0], 0.95, &[1.0])
            .unwrap()
            .is_empty());
        assert_eq!(
            confidence_band(&fit, &[0.0, 2.0], 1.0, &[1.0]),
            Err(RegressionError::InvalidLevel(1.0))
        );
        assert_eq!(
            confidence_band(&fit, &[0.0], 0.95, &[1.0]),
            Err(RegressionError::LengthMismatch { x: 1, y: 2 })
        );
    }

    #[test]
    fn test_flat_y_has_zero_correlation() {
        let fit = linear_regression(&[1.0, 2.0, 3.0], &[4.0, 4.0, 4.0]).unwrap();
        assert_eq!(fit.r_value, 0.0);
        assert_eq!(fit.slope, 0.0);
        assert_relative_eq!(fit.p_value, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_two_points() {
        let fit = linear_regression(&[0.0, 2.0], &[1.0, 5.0]).unwrap();
        assert_relative_eq!(fit.slope, 2.0);
        assert_eq!(fit.p_value, 0.0);
        assert_eq!(fit.std_err, 0.0);

        let flat = linear_regression(&[0.0, 2.0], &[3.0, 3.0]).unwrap();
        assert_eq!(flat.p_value, 1.0);
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            linear_regression(&[1.0], &[2.0]),
            Err(RegressionError::TooFewPoints(1))
        );
        assert_eq!(
            linear_regression(&[], &[]),
            Err(RegressionError::TooFewPoints(0))
        );
        assert_eq!(
            linear_regression(&[3.0, 3.0, 3.0], &[1.0, 2.0, 3.0]),
            Err(RegressionError::ConstantX)
        );
        assert_eq!(
            linear_regression(&[1.0, 2.0], &[1.0]),
            Err(RegressionError::LengthMismatch { x: 2, y: 1 })
        );
    }
}
