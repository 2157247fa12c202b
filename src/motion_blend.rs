use log::trace;

use crate::blend::{poly_blend_3, BlendError};
use crate::flatten::flatten;
use crate::motion::{Motion, SharedMotion};
use crate::motion_polynomial::PolynomialMotion;

/// Which piece of a [`PiecewiseBlendedMotion`] owns a given time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Piece {
    First,
    Blend,
    Second,
}

/// A piecewise blended motion with C1 smoothness.
///
/// The motion consists of three pieces:
/// - `m1` when `t < offset`
/// - `blend` when `offset <= t <= offset + horizon`
/// - `m2` when `offset + horizon < t`
///
/// Positions and velocities match up at both joints. The blend is solved once
/// on construction and never changes afterwards.
#[derive(Debug, Clone)]
pub struct PiecewiseBlendedMotion {
    m1: SharedMotion,
    m2: SharedMotion,
    offset: f64,
    horizon: f64,
    blend: PolynomialMotion,
}

impl PiecewiseBlendedMotion {
    /// Blends `m1` into `m2` over `[offset, offset + horizon]`.
    pub fn new(
        m1: SharedMotion,
        m2: SharedMotion,
        offset: f64,
        horizon: f64,
    ) -> Result<Self, BlendError> {
        Self::with_flatten(m1, m2, offset, horizon, false)
    }

    /// Like [`new`](Self::new), optionally flattening `m1` and `m2` at `offset`
    /// first.
    ///
    /// Flattening assumes `t` only increases and values before `offset` are no
    /// longer of interest. Without it, repeated blending nests composites
    /// without bound.
    pub fn with_flatten(
        m1: SharedMotion,
        m2: SharedMotion,
        offset: f64,
        horizon: f64,
        flatten_history: bool,
    ) -> Result<Self, BlendError> {
        let (m1, m2) = if flatten_history {
            (flatten(&m1, offset), flatten(&m2, offset))
        } else {
            (m1, m2)
        };
        let blend = poly_blend_3(m1.as_ref(), m2.as_ref(), offset, horizon)?;
        trace!(
            "composite over [{offset}, {}], child depths {} / {}",
            offset + horizon,
            crate::motion::depth(m1.as_ref()),
            crate::motion::depth(m2.as_ref())
        );
        Ok(Self {
            m1,
            m2,
            offset,
            horizon,
            blend,
        })
    }

    // Reassembles a composite around an already solved blend.
    pub(crate) fn from_parts(
        m1: SharedMotion,
        m2: SharedMotion,
        horizon: f64,
        blend: PolynomialMotion,
    ) -> Self {
        Self {
            m1,
            m2,
            offset: blend.offset(),
            horizon,
            blend,
        }
    }

    /// Motion before the blend window.
    pub fn m1(&self) -> &SharedMotion {
        &self.m1
    }

    /// Motion after the blend window.
    pub fn m2(&self) -> &SharedMotion {
        &self.m2
    }

    /// The cubic authoritative inside the blend window.
    pub fn blend(&self) -> &PolynomialMotion {
        &self.blend
    }

    pub fn horizon(&self) -> f64 {
        self.horizon
    }

    /// Closed blend window `(offset, offset + horizon)`.
    pub fn range(&self) -> (f64, f64) {
        (self.offset, self.offset + self.horizon)
    }

    /// Number of nested composites, counting this one.
    pub fn depth(&self) -> usize {
        let d1 = crate::motion::depth(self.m1.as_ref());
        let d2 = crate::motion::depth(self.m2.as_ref());
        1 + d1.max(d2)
    }

    fn piece(&self, t: f64) -> Piece {
        let (low, high) = self.range();
        if t < low {
            Piece::First
        } else if t > high {
            Piece::Second
        } else {
            Piece::Blend
        }
    }

    // Each piece is evaluated once over the times it owns, then scattered back.
    fn compute_many(&self, ts: &[f64], eval: fn(&dyn Motion, &[f64]) -> Vec<f64>) -> Vec<f64> {
        let mut out = vec![0.0; ts.len()];
        for piece in [Piece::First, Piece::Blend, Piece::Second] {
            let idx: Vec<usize> = (0..ts.len()).filter(|&i| self.piece(ts[i]) == piece).collect();
            if idx.is_empty() {
                continue;
            }
            let sub: Vec<f64> = idx.iter().map(|&i| ts[i]).collect();
            let source: &dyn Motion = match piece {
                Piece::First => self.m1.as_ref(),
                Piece::Blend => &self.blend,
                Piece::Second => self.m2.as_ref(),
            };
            for (i, x) in idx.into_iter().zip(eval(source, &sub)) {
                out[i] = x;
            }
        }
        out
    }
}

impl Motion for PiecewiseBlendedMotion {
    fn offset(&self) -> f64 {
        self.offset
    }

    fn at(&self, t: f64) -> f64 {
        match self.piece(t) {
            Piece::First => self.m1.at(t),
            Piece::Blend => self.blend.at(t),
            Piece::Second => self.m2.at(t),
        }
    }

    fn d_at(&self, t: f64) -> f64 {
        match self.piece(t) {
            Piece::First => self.m1.d_at(t),
            Piece::Blend => self.blend.d_at(t),
            Piece::Second => self.m2.d_at(t),
        }
    }

    fn at_many(&self, ts: &[f64]) -> Vec<f64> {
        self.compute_many(ts, |m, ts| m.at_many(ts))
    }

    fn d_at_many(&self, ts: &[f64]) -> Vec<f64> {
        self.compute_many(ts, |m, ts| m.d_at_many(ts))
    }

    fn as_blend(&self) -> Option<&PiecewiseBlendedMotion> {
        Some(self)
    }
}
