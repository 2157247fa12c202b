use log::debug;
use nalgebra::{Matrix4, Vector4};
use thiserror::Error;

use crate::motion::Motion;
use crate::motion_polynomial::PolynomialMotion;

/// Errors raised while constructing a blend.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum BlendError {
    /// The blend window length was zero, negative or NaN.
    #[error("horizon must be positive, got {0}")]
    InvalidHorizon(f64),
    /// The boundary matrix is singular or non-finite: a horizon so small its
    /// powers underflow, or so large they overflow.
    #[error("blend system is singular for horizon {horizon}")]
    SingularSystem { horizon: f64 },
}

/// Returns a third-degree polynomial that blends `m1` into `m2` over
/// `[tnow, tnow + h]`.
///
/// The cubic lives in local time `tnow` and matches position and velocity of
/// `m1` at `tnow` and of `m2` at `tnow + h`.
pub fn poly_blend_3(
    m1: &dyn Motion,
    m2: &dyn Motion,
    tnow: f64,
    h: f64,
) -> Result<PolynomialMotion, BlendError> {
    if h.is_nan() || h <= 0.0 {
        return Err(BlendError::InvalidHorizon(h));
    }

    let tend = tnow + h;
    #[rustfmt::skip]
    let a = Matrix4::new(
        0.0,           0.0,       0.0, 1.0, // p(0)  = m1(tnow)
        h.powi(3),     h * h,     h,   1.0, // p(h)  = m2(tnow + h)
        0.0,           0.0,       1.0, 0.0, // p'(0) = m1'(tnow)
        3.0 * h * h,   2.0 * h,   1.0, 0.0, // p'(h) = m2'(tnow + h)
    );
    let b = Vector4::new(m1.at(tnow), m2.at(tend), m1.d_at(tnow), m2.d_at(tend));

    // Non-finite boundary values propagate into the coefficients unchecked.
    if !a.iter().all(|x| x.is_finite()) {
        return Err(BlendError::SingularSystem { horizon: h });
    }
    let coeffs = a
        .lu()
        .solve(&b)
        .ok_or(BlendError::SingularSystem { horizon: h })?;

    debug!(
        "blend over [{tnow}, {tend}]: coeffs = [{}, {}, {}, {}]",
        coeffs[0], coeffs[1], coeffs[2], coeffs[3]
    );
    Ok(PolynomialMotion::new(tnow, coeffs.as_slice()))
}

/// Alias of [`poly_blend_3`] under its interface name.
pub fn blend_cubic(
    m1: &dyn Motion,
    m2: &dyn Motion,
    tnow: f64,
    horizon: f64,
) -> Result<PolynomialMotion, BlendError> {
    poly_blend_3(m1, m2, tnow, horizon)
}
