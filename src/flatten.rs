use std::sync::Arc;

use log::trace;

use crate::motion::SharedMotion;
use crate::motion_blend::PiecewiseBlendedMotion;

/// Recursively drops blend history that is no longer reachable from `offset`
/// onwards.
///
/// The returned motion equals `m` for every `t >= offset`; earlier times may
/// differ. Nothing reachable from `m` is modified: composites that survive are
/// rebuilt around their simplified children and reuse the already solved blend.
///
/// - A leaf motion is returned as is.
/// - A composite whose window ended before `offset` is replaced by its
///   flattened `m2`.
/// - A composite whose window contains `offset` keeps its blend and `m2`, while
///   `m1` is replaced by the blend cubic itself.
/// - A composite whose window starts after `offset` keeps its window with both
///   children flattened.
pub fn flatten(m: &SharedMotion, offset: f64) -> SharedMotion {
    let Some(mb) = m.as_blend() else {
        return Arc::clone(m);
    };

    let (low, high) = mb.range();
    if high < offset {
        trace!("flatten at {offset}: window [{low}, {high}] is past, keeping m2");
        return flatten(mb.m2(), offset);
    }

    let m1: SharedMotion = if low <= offset {
        trace!("flatten at {offset}: inside window [{low}, {high}], dropping m1");
        Arc::new(mb.blend().clone())
    } else {
        flatten(mb.m1(), offset)
    };
    let m2 = flatten(mb.m2(), offset);
    Arc::new(PiecewiseBlendedMotion::from_parts(
        m1,
        m2,
        mb.horizon(),
        mb.blend().clone(),
    ))
}
