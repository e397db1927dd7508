//! Axes, signs, rays, and lattice utilities.
//!
//! Pieces live on the integer lattice `{-1, 0, 1}^3`. A quarter turn about a
//! coordinate axis permutes that lattice; everything else in this module is
//! the floating-point glue that maps world space back onto it.

use std::fmt;
use std::ops::{Mul, Neg};

use glam::{Mat3, Quat, Vec3};

/// A 3D coordinate on the piece lattice.
pub type Coord = (i32, i32, i32);

/// One of the three coordinate axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in index order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Returns the component index of this axis (0, 1, or 2).
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Returns the positive unit vector along this axis.
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }

    /// Returns the component of `v` along this axis.
    #[inline]
    pub fn of_vec(self, v: Vec3) -> f32 {
        v[self.index()]
    }

    /// Returns the component of `coord` along this axis.
    #[inline]
    pub const fn of_coord(self, (x, y, z): Coord) -> i32 {
        match self {
            Axis::X => x,
            Axis::Y => y,
            Axis::Z => z,
        }
    }

    /// Returns the two axes perpendicular to this one, in cyclic order.
    pub const fn others(self) -> [Axis; 2] {
        match self {
            Axis::X => [Axis::Y, Axis::Z],
            Axis::Y => [Axis::Z, Axis::X],
            Axis::Z => [Axis::X, Axis::Y],
        }
    }

    /// Returns the axis perpendicular to both `self` and `other`, or `None`
    /// if they are the same axis.
    pub fn third(self, other: Axis) -> Option<Axis> {
        Axis::ALL
            .into_iter()
            .find(|&axis| axis != self && axis != other && self != other)
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

/// Orientation of the triple `(a, b, c)`: `+1` for a right-handed
/// permutation of `(x, y, z)`, `-1` for a left-handed one, `0` if any two
/// axes repeat.
pub fn handedness(a: Axis, b: Axis, c: Axis) -> i32 {
    a.unit().cross(b.unit()).dot(c.unit()).round() as i32
}

/// A positive or negative direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Neg,
    Pos,
}

impl Sign {
    /// Returns the sign of `x`. Zero counts as positive.
    #[inline]
    pub fn of(x: f32) -> Sign {
        if x < 0.0 {
            Sign::Neg
        } else {
            Sign::Pos
        }
    }

    /// Returns the sign of an integer. Zero counts as positive.
    pub const fn of_i32(x: i32) -> Sign {
        if x < 0 {
            Sign::Neg
        } else {
            Sign::Pos
        }
    }

    /// Returns 0 for [`Sign::Neg`] and 1 for [`Sign::Pos`].
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Sign::Neg => 0,
            Sign::Pos => 1,
        }
    }

    pub const fn to_i32(self) -> i32 {
        match self {
            Sign::Neg => -1,
            Sign::Pos => 1,
        }
    }

    pub fn to_f32(self) -> f32 {
        self.to_i32() as f32
    }
}

impl Mul for Sign {
    type Output = Sign;

    fn mul(self, rhs: Sign) -> Sign {
        if self == rhs {
            Sign::Pos
        } else {
            Sign::Neg
        }
    }
}

impl Neg for Sign {
    type Output = Sign;

    fn neg(self) -> Sign {
        match self {
            Sign::Neg => Sign::Pos,
            Sign::Pos => Sign::Neg,
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sign::Neg => write!(f, "-"),
            Sign::Pos => write!(f, "+"),
        }
    }
}

/// A half-line in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    /// Creates a ray, normalizing `direction`.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Returns the point at distance `t` along the ray.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Intersects the ray with an axis-aligned box using the slab test.
    ///
    /// Returns the distance to the entry point, or 0 if the origin is inside
    /// the box. A zero half-extent is allowed and describes a flat plate.
    pub fn intersect_box(&self, center: Vec3, half_extents: Vec3) -> Option<f32> {
        let mut t_enter = 0.0_f32;
        let mut t_exit = f32::INFINITY;

        for axis in Axis::ALL {
            let origin = axis.of_vec(self.origin);
            let direction = axis.of_vec(self.direction);
            let lo = axis.of_vec(center) - axis.of_vec(half_extents);
            let hi = axis.of_vec(center) + axis.of_vec(half_extents);

            if direction.abs() < f32::EPSILON {
                // parallel to this slab: either always inside it or never
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }

            let mut t0 = (lo - origin) / direction;
            let mut t1 = (hi - origin) / direction;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_enter = t_enter.max(t0);
            t_exit = t_exit.min(t1);
            if t_enter > t_exit {
                return None;
            }
        }

        Some(t_enter)
    }

    /// Intersects the ray with a box rotated by `orientation` about its center.
    pub fn intersect_oriented_box(
        &self,
        center: Vec3,
        orientation: Quat,
        half_extents: Vec3,
    ) -> Option<f32> {
        let inverse = orientation.inverse();
        let local = Ray {
            origin: inverse * (self.origin - center),
            direction: inverse * self.direction,
        };
        local.intersect_box(Vec3::ZERO, half_extents)
    }
}

/// Converts a lattice coordinate to a world-space vector.
#[inline]
pub fn coord_to_vec((x, y, z): Coord) -> Vec3 {
    Vec3::new(x as f32, y as f32, z as f32)
}

/// Rounds a world-space position to the nearest lattice coordinate.
#[inline]
pub fn round_to_lattice(v: Vec3) -> Coord {
    let rounded = v.round();
    (rounded.x as i32, rounded.y as i32, rounded.z as i32)
}

/// Rotates a lattice coordinate by `turns` right-handed quarter turns about
/// `axis`. Negative turns rotate the other way.
pub fn quarter_turn(coord: Coord, axis: Axis, turns: i32) -> Coord {
    let once = |(x, y, z): Coord| match axis {
        Axis::X => (x, -z, y),
        Axis::Y => (z, y, -x),
        Axis::Z => (-y, x, z),
    };
    (0..turns.rem_euclid(4)).fold(coord, |c, _| once(c))
}

/// Snaps an orientation to the nearest of the 24 rotations of a cube.
///
/// Only meaningful for orientations already close to one of them, which is
/// always the case once a layer has settled on a quarter turn.
pub fn snap_orientation(orientation: Quat) -> Quat {
    let m = Mat3::from_quat(orientation.normalize());
    let snapped = Mat3::from_cols(m.x_axis.round(), m.y_axis.round(), m.z_axis.round());
    Quat::from_mat3(&snapped).normalize()
}

/// Returns the integer rotation matrix of a lattice-aligned orientation,
/// row-major. Unlike the quaternion this has no sign ambiguity, so two
/// orientations are equal iff their matrices are.
pub fn orientation_matrix(orientation: Quat) -> [[i32; 3]; 3] {
    let m = Mat3::from_quat(orientation.normalize());
    let mut out = [[0; 3]; 3];
    for (row, out_row) in out.iter_mut().enumerate() {
        for (col, cell) in out_row.iter_mut().enumerate() {
            *cell = m.col(col)[row].round() as i32;
        }
    }
    out
}
