//! Layer grouping, direct-manipulation rotation, and quarter-turn snapping.

use std::f32::consts::FRAC_PI_2;
use std::time::Duration;

use crate::geometry::{round_to_lattice, snap_orientation, Axis, Coord};
use crate::pieces::PieceId;
use crate::scene::{Scene, SceneError};

/// A transient group of the nine pieces sharing one coordinate along an axis.
///
/// Membership is fixed when the group is created. Only the group's own
/// rotation changes until it is disbanded.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerGroup {
    axis: Axis,
    index: i32,
    members: Vec<PieceId>,
    angle: f32,
}

impl LayerGroup {
    /// Moves every piece whose lattice coordinate along `axis` matches
    /// `anchor`'s into a new group.
    pub fn create(scene: &mut impl Scene, axis: Axis, anchor: Coord) -> Result<Self, SceneError> {
        let index = axis.of_coord(anchor);

        let mut members = Vec::new();
        for id in scene.piece_ids() {
            if axis.of_coord(scene.lattice(id)?) == index {
                members.push(id);
            }
        }

        scene.set_group_rotation(axis, 0.0);
        for &id in &members {
            scene.attach(id)?;
        }

        log::debug!("grouped {} pieces at {axis} = {index}", members.len());
        Ok(Self {
            axis,
            index,
            members,
            angle: 0.0,
        })
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Coordinate shared by every member along [`LayerGroup::axis`].
    pub fn index(&self) -> i32 {
        self.index
    }

    pub fn members(&self) -> &[PieceId] {
        &self.members
    }

    /// Current rotation in radians.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Turns the group by `delta` radians.
    pub fn rotate_by(&mut self, scene: &mut impl Scene, delta: f32) {
        self.set_angle(scene, self.angle + delta);
    }

    /// Sets the group's rotation to `angle` radians.
    pub fn set_angle(&mut self, scene: &mut impl Scene, angle: f32) {
        self.angle = angle;
        scene.set_group_rotation(self.axis, angle);
    }

    /// Returns every member to the collection.
    ///
    /// Each piece's world transform is snapped onto the lattice and its
    /// lattice coordinate re-derived, so later layers group the right pieces.
    pub fn disband(self, scene: &mut impl Scene) -> Result<(), SceneError> {
        for &id in &self.members {
            scene.detach(id)?;
            let (position, orientation) = scene.world_transform(id)?;
            scene.place(id, round_to_lattice(position), snap_orientation(orientation))?;
        }
        scene.set_group_rotation(self.axis, 0.0);

        log::debug!(
            "disbanded layer {} = {} after {} quarter turns",
            self.axis,
            self.index,
            quarter_turns(self.angle)
        );
        Ok(())
    }
}

/// Number of whole quarter turns in `angle`, rounded to nearest.
pub fn quarter_turns(angle: f32) -> i32 {
    (angle / FRAC_PI_2).round() as i32
}

/// Chooses the quarter turn a released layer settles on.
///
/// Within `threshold` radians of a quarter turn the angle rounds to it.
/// Otherwise the turn in progress completes: a net-negative remainder goes
/// down to the next lower quarter turn and a positive one up to the next
/// higher.
pub fn snap_angle(angle: f32, threshold: f32) -> f32 {
    let turns = angle / FRAC_PI_2;
    let remainder = (angle % FRAC_PI_2).abs();
    let target = if remainder <= threshold || remainder >= FRAC_PI_2 - threshold {
        turns.round()
    } else if angle < 0.0 {
        turns.floor()
    } else {
        turns.ceil()
    };
    target * FRAC_PI_2
}

/// Linear interpolation of a layer's angle toward its snap target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapTween {
    pub axis: Axis,
    pub start_angle: f32,
    pub end_angle: f32,
    pub start_time: Duration,
    pub duration: Duration,
}

impl SnapTween {
    /// Fraction of the tween completed at `now`, in `0.0..=1.0`.
    pub fn progress(&self, now: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.start_time);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    /// Interpolated angle at `now`. Exactly `end_angle` once finished.
    pub fn sample(&self, now: Duration) -> f32 {
        let t = self.progress(now);
        if t >= 1.0 {
            self.end_angle
        } else {
            self.start_angle + (self.end_angle - self.start_angle) * t
        }
    }

    pub fn is_finished(&self, now: Duration) -> bool {
        self.progress(now) >= 1.0
    }
}
