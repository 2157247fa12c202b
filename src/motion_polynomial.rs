use nalgebra::{DMatrix, DVector};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::motion::Motion;

/// One-dimensional motion described by a polynomial in `t - offset`.
///
/// Coefficients are stored highest-degree term first, so `[a, b, c]` is
/// `a*(t-offset)^2 + b*(t-offset) + c`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "RawPolynomialMotion"))]
pub struct PolynomialMotion {
    offset: f64,
    coeffs: Vec<f64>,
}

// Deserialized fields go through `new` so an empty list still has degree 0.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawPolynomialMotion {
    offset: f64,
    coeffs: Vec<f64>,
}

#[cfg(feature = "serde")]
impl From<RawPolynomialMotion> for PolynomialMotion {
    fn from(raw: RawPolynomialMotion) -> Self {
        PolynomialMotion::new(raw.offset, raw.coeffs)
    }
}

impl PolynomialMotion {
    /// Creates a new polynomial motion. An empty coefficient list is the zero
    /// polynomial.
    pub fn new(offset: f64, coeffs: impl Into<Vec<f64>>) -> Self {
        let mut coeffs = coeffs.into();
        if coeffs.is_empty() {
            coeffs.push(0.0);
        }
        Self { offset, coeffs }
    }

    /// Polynomial degree, `coeffs().len() - 1`.
    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    /// Coefficients, highest-degree term first.
    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    /// The analytic derivative as its own motion with the same offset.
    ///
    /// The derivative of a constant is the zero constant.
    pub fn derivative(&self) -> PolynomialMotion {
        let degree = self.degree();
        let coeffs: Vec<f64> = self.coeffs[..degree]
            .iter()
            .enumerate()
            .map(|(i, c)| (degree - i) as f64 * c)
            .collect();
        PolynomialMotion::new(self.offset, coeffs)
    }

    // Horner evaluation in local time.
    fn horner(coeffs: &[f64], x: f64) -> f64 {
        coeffs.iter().fold(0.0, |acc, c| acc * x + c)
    }

    // Vandermonde rows [x^D, ..., x, 1] for every local time, times the coefficients.
    fn vandermonde(&self, ts: &[f64]) -> Vec<f64> {
        let degree = self.degree();
        let v = DMatrix::from_fn(ts.len(), degree + 1, |r, c| {
            (ts[r] - self.offset).powi((degree - c) as i32)
        });
        let x = v * DVector::from_column_slice(&self.coeffs);
        x.iter().copied().collect()
    }
}

impl Motion for PolynomialMotion {
    fn offset(&self) -> f64 {
        self.offset
    }

    fn at(&self, t: f64) -> f64 {
        Self::horner(&self.coeffs, t - self.offset)
    }

    fn d_at(&self, t: f64) -> f64 {
        let x = t - self.offset;
        let degree = self.degree();
        self.coeffs[..degree]
            .iter()
            .enumerate()
            .fold(0.0, |acc, (i, c)| acc * x + (degree - i) as f64 * c)
    }

    fn at_many(&self, ts: &[f64]) -> Vec<f64> {
        self.vandermonde(ts)
    }

    fn d_at_many(&self, ts: &[f64]) -> Vec<f64> {
        self.derivative().vandermonde(ts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
        let step = (end - start) / (n - 1) as f64;
        (0..n).map(|i| start + step * i as f64).collect()
    }

    #[test]
    fn constant_motion() {
        let ts = linspace(0.0, 10.0, 100);
        for offset in [0.0, 1.0] {
            let m = PolynomialMotion::new(offset, [0.0, 0.0, 1.0]);
            for (x, v) in m.at_many(&ts).iter().zip(m.d_at_many(&ts)) {
                assert_relative_eq!(*x, 1.0);
                assert_relative_eq!(v, 0.0);
            }
        }
    }

    #[test]
    fn degree_zero_has_zero_velocity() {
        let m = PolynomialMotion::new(3.0, [4.5]);
        assert_eq!(m.degree(), 0);
        assert_eq!(m.at(-20.0), 4.5);
        assert_eq!(m.d_at(7.0), 0.0);
        assert_eq!(m.d_at_many(&[1.0, 2.0]), vec![0.0, 0.0]);
        assert_eq!(m.derivative().coeffs(), &[0.0]);
    }

    #[test]
    fn empty_coeffs_is_zero_polynomial() {
        let m = PolynomialMotion::new(0.0, Vec::new());
        assert_eq!(m.degree(), 0);
        assert_eq!(m.at(5.0), 0.0);
    }

    #[test]
    fn linear_motion() {
        let ts = linspace(0.0, 10.0, 100);
        for offset in [0.0, 1.0] {
            let m = PolynomialMotion::new(offset, [0.0, 1.0, 1.0]);
            let x = m.at_many(&ts);
            let v = m.d_at_many(&ts);
            for (i, t) in ts.iter().enumerate() {
                assert_relative_eq!(x[i], (t - offset) + 1.0, epsilon = 1e-12);
                assert_relative_eq!(v[i], 1.0);
                assert_relative_eq!(m.at(*t), x[i], epsilon = 1e-12);
            }
        }

        let m = PolynomialMotion::new(2.0, [-1.5, 4.0]);
        assert_relative_eq!(m.at(4.0), -1.5 * 2.0 + 4.0);
        assert_relative_eq!(m.d_at(100.0), -1.5);
    }

    #[test]
    fn quadric_motion() {
        let ts = linspace(0.0, 10.0, 100);
        for offset in [0.0, 1.0] {
            let m = PolynomialMotion::new(offset, [1.0, 0.0, 0.0]);
            let x = m.at_many(&ts);
            let v = m.d_at_many(&ts);
            for (i, t) in ts.iter().enumerate() {
                assert_relative_eq!(x[i], (t - offset).powi(2), epsilon = 1e-9);
                assert_relative_eq!(v[i], 2.0 * (t - offset), epsilon = 1e-9);
                assert_relative_eq!(m.d_at(*t), v[i], epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn derivative_keeps_offset() {
        let m = PolynomialMotion::new(1.5, [2.0, -1.0, 3.0, 0.5]);
        let d = m.derivative();
        assert_eq!(d.offset(), 1.5);
        assert_eq!(d.coeffs(), &[6.0, -2.0, 3.0]);
        assert_relative_eq!(d.at(2.5), m.d_at(2.5));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_from_json() {
        let m: PolynomialMotion =
            serde_json::from_str(r#"{ "offset": 1.0, "coeffs": [2.0, 0.5] }"#).unwrap();
        assert_eq!(m, PolynomialMotion::new(1.0, [2.0, 0.5]));

        let empty: PolynomialMotion =
            serde_json::from_str(r#"{ "offset": 0.0, "coeffs": [] }"#).unwrap();
        assert_eq!(empty.degree(), 0);

        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, r#"{"offset":1.0,"coeffs":[2.0,0.5]}"#);
    }
}
