// skew-core/src/domain/trend.rs

use serde::Serialize;

/// Least-squares polynomial fitted on x values centred at `center`.
///
/// `coefficients[k]` multiplies `(x - center)^k`. Centring keeps the normal
/// equations well conditioned for calendar years, where raw `x^4` terms
/// reach 1e13.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolynomialFit {
    pub center: f64,
    pub coefficients: Vec<f64>,
}

impl PolynomialFit {
    /// Fits a polynomial of degree `degree` to `(x, y)` points.
    ///
    /// The degree is lowered to `distinct_x - 1` when there are not enough
    /// distinct x values to determine it. Returns `None` for no points.
    pub fn fit(points: &[(f64, f64)], degree: usize) -> Option<Self> {
        if points.is_empty() {
            return None;
        }

        let center = points.iter().map(|(x, _)| x).sum::<f64>() / points.len() as f64;
        let effective = degree.min(distinct_count(points).saturating_sub(1));
        let size = effective + 1;

        // Normal equations: (VᵀV) c = Vᵀy, with V the Vandermonde matrix.
        let mut power_sums = vec![0.0; 2 * effective + 1];
        let mut rhs = vec![0.0; size];
        for &(x, y) in points {
            let t = x - center;
            let mut p = 1.0;
            for (k, sum) in power_sums.iter_mut().enumerate() {
                *sum += p;
                if k < size {
                    rhs[k] += p * y;
                }
                p *= t;
            }
        }

        let mut matrix: Vec<Vec<f64>> = (0..size)
            .map(|row| (0..size).map(|col| power_sums[row + col]).collect())
            .collect();

        let coefficients = solve(&mut matrix, &mut rhs)?;
        Some(Self {
            center,
            coefficients,
        })
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Horner evaluation.
    pub fn evaluate(&self, x: f64) -> f64 {
        let t = x - self.center;
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, c| acc * t + c)
    }
}

fn distinct_count(points: &[(f64, f64)]) -> usize {
    let mut xs: Vec<f64> = points.iter().map(|(x, _)| *x).collect();
    xs.sort_by(f64::total_cmp);
    xs.dedup();
    xs.len()
}

/// Gaussian elimination with partial pivoting. `None` if singular.
fn solve(a: &mut [Vec<f64>], b: &mut [f64]) -> Option<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))?;
        if a[pivot][col].abs() < 1e-12 {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Some(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_recovers_exact_quadratic() -> Result<()> {
        let f = |x: f64| 3.0 - 0.5 * (x - 2014.0) + 0.25 * (x - 2014.0).powi(2);
        let points: Vec<(f64, f64)> = (2010..=2019).map(|y| (y as f64, f(y as f64))).collect();

        let fit = PolynomialFit::fit(&points, 2).context("fit failed")?;
        assert_eq!(fit.degree(), 2);
        for &(x, y) in &points {
            assert!(close(fit.evaluate(x), y), "x={x}");
        }
        Ok(())
    }

    #[test]
    fn test_three_points_are_interpolated() -> Result<()> {
        let points = [(2010.0, 20.0), (2011.0, 25.0), (2012.0, 15.0)];
        let fit = PolynomialFit::fit(&points, 2).context("fit failed")?;
        assert!(close(fit.evaluate(2010.0), 20.0));
        assert!(close(fit.evaluate(2011.0), 25.0));
        assert!(close(fit.evaluate(2012.0), 15.0));
        Ok(())
    }

    #[test]
    fn test_least_squares_on_noisy_line() -> Result<()> {
        let points = [(0.0, 1.0), (1.0, 0.0), (2.0, 3.0), (3.0, 2.0)];
        let fit = PolynomialFit::fit(&points, 1).context("fit failed")?;
        assert!(close(fit.evaluate(0.0), 0.6));
        assert!(close(fit.evaluate(3.0), 2.4));
        Ok(())
    }

    #[test]
    fn test_fit_is_deterministic() -> Result<()> {
        let points: Vec<(f64, f64)> = (2010..=2019)
            .map(|y| (y as f64, 17.5 + ((y * 7919) % 13) as f64))
            .collect();
        let a = PolynomialFit::fit(&points, 2).context("fit failed")?;
        let b = PolynomialFit::fit(&points, 2).context("fit failed")?;
        assert_eq!(a, b);
        Ok(())
    }

    #[test]
    fn test_degree_drops_with_few_distinct_points() -> Result<()> {
        let single = PolynomialFit::fit(&[(2015.0, 35.0)], 2).context("fit failed")?;
        assert_eq!(single.degree(), 0);
        assert!(close(single.evaluate(2030.0), 35.0));

        let pair = PolynomialFit::fit(&[(2010.0, 10.0), (2012.0, 14.0)], 2).context("fit failed")?;
        assert_eq!(pair.degree(), 1);
        assert!(close(pair.evaluate(2011.0), 12.0));

        let repeated = PolynomialFit::fit(&[(2010.0, 10.0), (2010.0, 20.0)], 2)
            .context("fit failed")?;
        assert_eq!(repeated.degree(), 0);
        assert!(close(repeated.evaluate(2010.0), 15.0));
        Ok(())
    }

    #[test]
    fn test_no_points_no_fit() {
        assert!(PolynomialFit::fit(&[], 2).is_none());
    }
}
