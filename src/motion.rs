use std::fmt::Debug;
use std::sync::Arc;

use crate::motion_blend::PiecewiseBlendedMotion;

/// Shared handle to any motion.
///
/// Composites hold their children through this handle, so one motion can take
/// part in several blends without being copied.
pub type SharedMotion = Arc<dyn Motion>;

/// A one-dimensional motion: position and velocity as pure functions of time.
pub trait Motion: Debug + Send + Sync {
    /// Shift of the motion along the time axis.
    fn offset(&self) -> f64;

    /// Position at time `t`.
    fn at(&self, t: f64) -> f64;

    /// Velocity at time `t`.
    fn d_at(&self, t: f64) -> f64;

    /// Positions at every time in `ts`, in the same order.
    fn at_many(&self, ts: &[f64]) -> Vec<f64> {
        ts.iter().map(|&t| self.at(t)).collect()
    }

    /// Velocities at every time in `ts`, in the same order.
    fn d_at_many(&self, ts: &[f64]) -> Vec<f64> {
        ts.iter().map(|&t| self.d_at(t)).collect()
    }

    /// Returns the composite view if this motion is a blend of two others.
    fn as_blend(&self) -> Option<&PiecewiseBlendedMotion> {
        None
    }
}

/// Number of nested composites reachable from `m`. Leaf motions have depth 0.
pub fn depth(m: &dyn Motion) -> usize {
    m.as_blend().map_or(0, PiecewiseBlendedMotion::depth)
}
