//! Ordinary least squares.
//!
//! Trend lines are fitted as a tiny linear regression:
//!
//! ```text
//! minimize Σ (y_i - (a + b x_i))^2
//! ```
//!
//! The design matrix is tall (n rows, 2 columns), so we solve through SVD
//! rather than QR (nalgebra's `QR::solve` expects square systems).

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// A fitted `y = intercept + slope * x` line with its coefficient of determination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit {
    pub intercept: f64,
    pub slope: f64,
    pub r_squared: f64,
}

/// Fit a straight line through `(xs[i], ys[i])`.
///
/// Returns `None` with fewer than two points or when every `x` is identical
/// (the slope is then unidentified).
pub fn fit_line(xs: &[f64], ys: &[f64]) -> Option<LineFit> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }
    let x0 = xs[0];
    if xs[..n].iter().all(|&x| (x - x0).abs() < 1e-12) {
        return None;
    }

    let mut data = Vec::with_capacity(n * 2);
    for &x in &xs[..n] {
        data.push(1.0);
        data.push(x);
    }
    let design = DMatrix::from_row_slice(n, 2, &data);
    let target = DVector::from_row_slice(&ys[..n]);

    let beta = solve_least_squares(&design, &target)?;
    let (intercept, slope) = (beta[0], beta[1]);

    let y_mean = ys[..n].iter().sum::<f64>() / n as f64;
    let sst: f64 = ys[..n].iter().map(|y| (y - y_mean).powi(2)).sum();
    let sse: f64 = xs[..n]
        .iter()
        .zip(&ys[..n])
        .map(|(x, y)| (y - (intercept + slope * x)).powi(2))
        .sum();
    // A flat y gives a perfect (horizontal) fit.
    let r_squared = if sst > 0.0 { 1.0 - sse / sst } else { 1.0 };

    Some(LineFit {
        intercept,
        slope,
        r_squared,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn fit_line_recovers_exact_line() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [-0.01, 0.01, 0.03, 0.05];
        let fit = fit_line(&xs, &ys).unwrap();
        assert!((fit.slope - 0.02).abs() < 1e-10);
        assert!((fit.intercept + 0.03).abs() < 1e-10);
        assert!((fit.r_squared - 1.0).abs() < 1e-10);
    }

    #[test]
    fn fit_line_rejects_degenerate_inputs() {
        assert!(fit_line(&[1.0], &[2.0]).is_none());
        assert!(fit_line(&[3.0, 3.0, 3.0], &[1.0, 2.0, 3.0]).is_none());
    }
}
