use std::collections::VecDeque;
use std::sync::Arc;

use log::debug;

use crate::blend::BlendError;
use crate::motion::{self, SharedMotion};
use crate::motion_blend::PiecewiseBlendedMotion;

/// A target motion waiting to be blended in at `start`.
#[derive(Debug, Clone)]
struct PendingTarget {
    motion: SharedMotion,
    start: f64,
    horizon: f64,
}

/// MotionBlendExecutor keeps the live motion of a long-running process and
/// blends in new targets as time advances.
///
/// Every blend flattens the history at its start time, so the nesting depth of
/// [`current`](Self::current) stays bounded no matter how many targets are
/// applied.
#[derive(Debug)]
pub struct MotionBlendExecutor {
    /// Queue of targets, sorted by start time
    pending: VecDeque<PendingTarget>,

    /// The motion currently followed
    current: SharedMotion,

    /// Blend window length used when a target does not bring its own
    horizon: f64,

    /// Offset of the initial motion, or the latest time passed to `advance` if later
    time: f64,

    /// Number of targets blended in so far
    replans: usize,
}

impl MotionBlendExecutor {
    /// Creates an executor following `initial`, blending new targets over
    /// `horizon` by default.
    pub fn new(initial: SharedMotion, horizon: f64) -> Result<Self, BlendError> {
        Self::check_horizon(horizon)?;
        Ok(Self {
            pending: VecDeque::new(),
            time: initial.offset(),
            current: initial,
            horizon,
            replans: 0,
        })
    }

    /// Immediately blends from the current motion into `target` over
    /// `[tnow, tnow + horizon]`, using the default horizon.
    pub fn blend_to(&mut self, target: SharedMotion, tnow: f64) -> Result<(), BlendError> {
        self.blend_to_within(target, tnow, self.horizon)
    }

    /// Immediately blends from the current motion into `target` over
    /// `[tnow, tnow + horizon]`.
    pub fn blend_to_within(
        &mut self,
        target: SharedMotion,
        tnow: f64,
        horizon: f64,
    ) -> Result<(), BlendError> {
        let blended = PiecewiseBlendedMotion::with_flatten(
            Arc::clone(&self.current),
            target,
            tnow,
            horizon,
            true,
        )?;
        self.current = Arc::new(blended);
        self.replans += 1;
        debug!(
            "replan #{} at {tnow}, depth {}",
            self.replans,
            motion::depth(self.current.as_ref())
        );
        Ok(())
    }

    /// Queues `target` to be blended in once time reaches `start`.
    ///
    /// Targets are kept sorted by start time; equal starts keep their insertion
    /// order.
    pub fn add_target(&mut self, target: SharedMotion, start: f64) {
        let idx = self.pending.partition_point(|p| p.start <= start);
        self.pending.insert(
            idx,
            PendingTarget {
                motion: target,
                start,
                horizon: self.horizon,
            },
        );
    }

    /// Advances time to `t`, blending in every queued target whose start has
    /// been reached.
    ///
    /// On error the failing target stays at the front of the queue.
    pub fn advance(&mut self, t: f64) -> Result<(), BlendError> {
        self.time = self.time.max(t);
        while let Some(next) = self.pending.front() {
            if next.start > self.time {
                break;
            }
            let next = next.clone();
            self.blend_to_within(next.motion, next.start, next.horizon)?;
            self.pending.pop_front();
        }
        Ok(())
    }

    /// Sets a new default blend horizon for subsequently queued targets.
    pub fn set_horizon(&mut self, horizon: f64) -> Result<(), BlendError> {
        Self::check_horizon(horizon)?;
        self.horizon = horizon;
        Ok(())
    }

    fn check_horizon(horizon: f64) -> Result<(), BlendError> {
        if horizon.is_nan() || horizon <= 0.0 {
            return Err(BlendError::InvalidHorizon(horizon));
        }
        Ok(())
    }

    /// Returns the motion currently followed.
    pub fn current(&self) -> &SharedMotion {
        &self.current
    }

    /// Returns the position of the current motion at `t`.
    pub fn get_pos(&self, t: f64) -> f64 {
        self.current.at(t)
    }

    /// Returns the velocity of the current motion at `t`.
    pub fn get_vel(&self, t: f64) -> f64 {
        self.current.d_at(t)
    }

    /// Returns the executor time: the initial motion's offset until
    /// [`advance`](Self::advance) moves it forward.
    pub fn get_time(&self) -> f64 {
        self.time
    }

    /// Number of targets blended in so far.
    pub fn replans(&self) -> usize {
        self.replans
    }

    /// Number of targets still waiting in the queue.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion_polynomial::PolynomialMotion;
    use approx::assert_abs_diff_eq;

    fn line(offset: f64, slope: f64, start: f64) -> SharedMotion {
        Arc::new(PolynomialMotion::new(offset, [slope, start]))
    }

    #[test]
    fn rejects_bad_horizon() {
        assert_eq!(
            MotionBlendExecutor::new(line(0.0, 1.0, 0.0), 0.0).unwrap_err(),
            BlendError::InvalidHorizon(0.0)
        );
        let mut ex = MotionBlendExecutor::new(line(0.0, 1.0, 0.0), 1.0).unwrap();
        assert!(ex.set_horizon(-1.0).is_err());
        assert!(ex.blend_to_within(line(0.0, 2.0, 0.0), 1.0, 0.0).is_err());
        assert_eq!(ex.replans(), 0);
    }

    #[test]
    fn depth_stays_bounded() {
        let mut ex = MotionBlendExecutor::new(line(0.0, 1.0, 0.0), 1.0).unwrap();
        for i in 0..200 {
            let t = 0.5 * i as f64;
            let slope = if i % 2 == 0 { -1.0 } else { 1.0 };
            ex.blend_to(line(t, slope, i as f64), t).unwrap();
            assert!(motion::depth(ex.current().as_ref()) <= 2);
        }
        assert_eq!(ex.replans(), 200);
    }

    #[test]
    fn replanning_is_c1_at_blend_start() {
        let mut ex = MotionBlendExecutor::new(line(0.0, 1.0, 0.0), 2.0).unwrap();
        ex.blend_to(line(0.0, -0.5, 10.0), 3.0).unwrap();

        let before = (ex.get_pos(4.0), ex.get_vel(4.0));
        ex.blend_to(line(5.0, 0.0, 4.0), 4.0).unwrap();
        assert_abs_diff_eq!(ex.get_pos(4.0), before.0, epsilon = 1e-9);
        assert_abs_diff_eq!(ex.get_vel(4.0), before.1, epsilon = 1e-9);

        // Past the window the last target alone drives the motion.
        assert_abs_diff_eq!(ex.get_pos(7.0), 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(ex.get_vel(7.0), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn queued_targets_apply_when_due() {
        let mut ex = MotionBlendExecutor::new(line(0.0, 1.0, 0.0), 1.0).unwrap();
        ex.add_target(line(0.0, 2.0, 0.0), 2.0);
        ex.add_target(line(0.0, 3.0, 0.0), 5.0);

        ex.advance(1.0).unwrap();
        assert_eq!(ex.replans(), 0);
        assert_eq!(ex.pending(), 2);

        ex.advance(2.0).unwrap();
        assert_eq!(ex.replans(), 1);
        assert_eq!(ex.current().as_blend().map(|b| b.range()), Some((2.0, 3.0)));

        ex.advance(10.0).unwrap();
        assert_eq!(ex.replans(), 2);
        assert_eq!(ex.pending(), 0);
        assert_eq!(ex.get_time(), 10.0);
        assert_abs_diff_eq!(ex.get_pos(8.0), 24.0, epsilon = 1e-12);
    }

    #[test]
    fn out_of_order_targets_apply_by_start() {
        let mut ex = MotionBlendExecutor::new(line(0.0, 0.0, 0.0), 1.0).unwrap();
        ex.add_target(line(0.0, 0.0, 5.0), 5.0);
        ex.add_target(line(0.0, 0.0, 1.0), 1.0);
        ex.add_target(line(0.0, 0.0, 3.0), 3.0);

        ex.advance(2.5).unwrap();
        assert_eq!(ex.replans(), 1);
        assert_eq!(ex.pending(), 2);
        assert_abs_diff_eq!(ex.get_pos(2.5), 1.0, epsilon = 1e-12);

        ex.advance(4.5).unwrap();
        assert_eq!(ex.replans(), 2);
        assert_abs_diff_eq!(ex.get_pos(4.5), 3.0, epsilon = 1e-12);

        ex.advance(10.0).unwrap();
        assert_eq!(ex.replans(), 3);
        assert_eq!(ex.current().as_blend().map(|b| b.range()), Some((5.0, 6.0)));
        assert_abs_diff_eq!(ex.get_pos(10.0), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn time_does_not_run_backwards() {
        let mut ex = MotionBlendExecutor::new(line(1.0, 1.0, 0.0), 1.0).unwrap();
        assert_eq!(ex.get_time(), 1.0);
        ex.advance(4.0).unwrap();
        ex.advance(3.0).unwrap();
        assert_eq!(ex.get_time(), 4.0);
    }
}
