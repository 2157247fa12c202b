//! # motion_blend
//!
//! A small library for blending one-dimensional motions with C1 continuity.
//!
//! This library provides the following modules:
//! - `motion` for the [`Motion`] trait shared by every motion kind.
//! - `motion_polynomial` for motions described by a time-shifted polynomial.
//! - `blend` for solving the cubic that joins two motions over a time window.
//! - `motion_blend` for the piecewise motion made of two motions and their blend.
//! - `flatten` for trimming blend history so chained blends stay shallow.
//! - `motion_blend_executor` for re-planning a live motion as new targets arrive.
//!
//! ```
//! use std::sync::Arc;
//! use motion_blend::{Motion, PiecewiseBlendedMotion, PolynomialMotion};
//!
//! let m1 = Arc::new(PolynomialMotion::new(0.0, [-0.8, 1.0, 0.5]));
//! let m2 = Arc::new(PolynomialMotion::new(1.0, [0.0, 3.0, 5.0]));
//! let mb = PiecewiseBlendedMotion::new(m1.clone(), m2, 2.5, 2.0).unwrap();
//!
//! assert_eq!(mb.at(1.0), m1.at(1.0));
//! assert!((mb.d_at(2.5) - m1.d_at(2.5)).abs() < 1e-9);
//! ```

pub mod blend;
pub mod flatten;
pub mod motion;
pub mod motion_blend;
pub mod motion_blend_executor;
pub mod motion_polynomial;

// Re-export main structs for convenience:
pub use blend::*;
pub use flatten::*;
pub use motion::*;
pub use motion_blend::*;
pub use motion_blend_executor::*;
pub use motion_polynomial::*;
