//! Deciding which layer a drag is turning.
//!
//! While the pointer is held on a face, every move samples the current face
//! plate point and compares it with the press point. Motion along the clicked
//! face's normal is discarded. Of the two remaining components, the larger is
//! the sweep and the smaller is noise; the layer spins about the axis of the
//! smaller one. Nothing is committed until the sweep clearly dominates, which
//! keeps nearly diagonal drags from picking an axis too early.

use glam::{Vec2, Vec3};

use crate::direction::chirality;
use crate::geometry::{Axis, Sign};
use crate::pieces::FacePlate;

/// Commit thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Minimum absolute sweep, in world units.
    pub min_sweep: f32,
    /// Required ratio of sweep to cross-axis motion.
    pub dominance: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_sweep: 0.1,
            dominance: 2.0,
        }
    }
}

/// Drag measured in the plane of the clicked face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sweep {
    /// Axis with the larger motion.
    pub sweep_axis: Axis,
    /// Press point minus current point along `sweep_axis`.
    pub sweep_delta: f32,
    /// Axis with the smaller motion; the layer rotates about it.
    pub rotation_axis: Axis,
    /// Press point minus current point along `rotation_axis`.
    pub other_delta: f32,
}

impl Sweep {
    /// Measures the drag from `start` to `current`, ignoring `normal_axis`.
    pub fn measure(start: Vec3, current: Vec3, normal_axis: Axis) -> Self {
        let delta = start - current;
        let [a, b] = normal_axis.others();
        let (da, db) = (a.of_vec(delta), b.of_vec(delta));
        if da.abs() >= db.abs() {
            Self {
                sweep_axis: a,
                sweep_delta: da,
                rotation_axis: b,
                other_delta: db,
            }
        } else {
            Self {
                sweep_axis: b,
                sweep_delta: db,
                rotation_axis: a,
                other_delta: da,
            }
        }
    }

    /// Returns whether the sweep is strong and clean enough to commit.
    pub fn is_decisive(&self, thresholds: &Thresholds) -> bool {
        let sweep = self.sweep_delta.abs();
        sweep > thresholds.min_sweep && sweep > thresholds.dominance * self.other_delta.abs()
    }
}

/// Which component of pointer motion drives a committed rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    X,
    Y,
}

impl Channel {
    /// Picks the component of `delta` with the larger magnitude. Ties go to y.
    pub fn dominant(delta: Vec2) -> Channel {
        if delta.x.abs() > delta.y.abs() {
            Channel::X
        } else {
            Channel::Y
        }
    }

    /// Returns this channel's component of `delta`.
    pub fn of(self, delta: Vec2) -> f32 {
        match self {
            Channel::X => delta.x,
            Channel::Y => delta.y,
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::X => write!(f, "x"),
            Channel::Y => write!(f, "y"),
        }
    }
}

/// A committed rotation: what to turn, which way, and what drives it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Commit {
    pub axis: Axis,
    /// Multiplier for driving-channel motion. Folds in the sweep direction,
    /// the face chirality, and the direction the pointer was moving at
    /// commit time.
    pub sign: Sign,
    pub channel: Channel,
}

/// Runs one disambiguation step.
///
/// `pointer_delta` is the latest pointer motion in NDC. Returns `None` while
/// the drag is still ambiguous.
pub fn resolve(
    start: Vec3,
    current: Vec3,
    face: FacePlate,
    pointer_delta: Vec2,
    thresholds: &Thresholds,
) -> Option<Commit> {
    let sweep = Sweep::measure(start, current, face.axis);
    if !sweep.is_decisive(thresholds) {
        return None;
    }
    let channel = Channel::dominant(pointer_delta);
    let sign = Sign::of(sweep.sweep_delta)
        * chirality(face, sweep.sweep_axis)?
        * Sign::of(channel.of(pointer_delta));
    Some(Commit {
        axis: sweep.rotation_axis,
        sign,
        channel,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRONT: FacePlate = FacePlate::new(Axis::Z, Sign::Pos);

    #[test]
    fn test_normal_component_is_ignored() {
        let sweep = Sweep::measure(Vec3::new(0.0, 0.0, 1.5), Vec3::new(0.0, 0.05, -3.0), Axis::Z);
        assert_eq!(sweep.sweep_axis, Axis::Y);
        assert!(!sweep.is_decisive(&Thresholds::default()));
    }

    #[test]
    fn test_rotation_axis_is_the_smaller_component() {
        let sweep = Sweep::measure(Vec3::new(0.0, 0.0, 1.5), Vec3::new(0.5, 0.1, 1.5), Axis::Z);
        assert_eq!(sweep.sweep_axis, Axis::X);
        assert_eq!(sweep.rotation_axis, Axis::Y);
        assert!((sweep.sweep_delta + 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_boundary_min_sweep() {
        let thresholds = Thresholds::default();
        for normal in Axis::ALL {
            let [a, b] = normal.others();
            let start = Vec3::ZERO;

            let at_threshold = -a.unit() * 0.1;
            assert!(!Sweep::measure(start, at_threshold, normal).is_decisive(&thresholds));

            let past_threshold = -a.unit() * 0.1001;
            assert!(Sweep::measure(start, past_threshold, normal).is_decisive(&thresholds));

            let past_other_way = b.unit() * 0.1001;
            assert!(Sweep::measure(start, past_other_way, normal).is_decisive(&thresholds));
        }
    }

    #[test]
    fn test_boundary_dominance() {
        let thresholds = Thresholds::default();
        for normal in Axis::ALL {
            let [a, b] = normal.others();
            let start = Vec3::ZERO;

            // sweep exactly twice the cross motion is still ambiguous
            let diagonal = a.unit() * 0.5 + b.unit() * 0.25;
            assert!(!Sweep::measure(start, diagonal, normal).is_decisive(&thresholds));

            let cleaner = a.unit() * 0.5 + b.unit() * 0.24;
            assert!(Sweep::measure(start, cleaner, normal).is_decisive(&thresholds));
        }
    }

    #[test]
    fn test_channel_follows_larger_pointer_component() {
        assert_eq!(Channel::dominant(Vec2::new(0.2, -0.1)), Channel::X);
        assert_eq!(Channel::dominant(Vec2::new(0.05, -0.1)), Channel::Y);
        assert_eq!(Channel::Y.of(Vec2::new(0.05, -0.1)), -0.1);
    }

    #[test]
    fn test_resolve_waits_for_decisive_sweep() {
        let start = Vec3::new(0.0, 0.0, 1.5);
        let thresholds = Thresholds::default();
        assert_eq!(
            resolve(start, Vec3::new(0.05, 0.0, 1.5), FRONT, Vec2::new(0.01, 0.0), &thresholds),
            None
        );
    }

    #[test]
    fn test_resolve_drag_right_on_front_face() {
        // dragging right on the front face turns a horizontal layer about y
        let start = Vec3::new(0.0, 0.0, 1.5);
        let current = Vec3::new(0.4, 0.02, 1.5);
        let commit = resolve(start, current, FRONT, Vec2::new(0.05, 0.0), &Thresholds::default())
            .unwrap();
        assert_eq!(commit.axis, Axis::Y);
        assert_eq!(commit.channel, Channel::X);
        // sweep delta -0.4 (neg) * chirality(+z, x) (neg) * pointer +x (pos)
        assert_eq!(commit.sign, Sign::Pos);
    }

    #[test]
    fn test_resolve_sign_follows_pointer_direction() {
        let start = Vec3::new(0.0, 0.0, 1.5);
        let current = Vec3::new(0.0, -0.4, 1.5);
        let thresholds = Thresholds::default();
        let down = resolve(start, current, FRONT, Vec2::new(0.0, -0.05), &thresholds).unwrap();
        let up = resolve(start, current, FRONT, Vec2::new(0.0, 0.05), &thresholds).unwrap();
        assert_eq!(down.axis, Axis::X);
        assert_eq!(down.sign, -up.sign);
    }
}
