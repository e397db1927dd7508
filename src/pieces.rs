//! Piece and face-plate definitions.
//!
//! The puzzle is 27 unit cubes on the lattice `{-1, 0, 1}^3`, plus six
//! invisible plates hugging the outside of the cube that exist only so a ray
//! can tell which face was grabbed.

use std::fmt;
use std::str::FromStr;

use glam::{Quat, Vec3};
use thiserror::Error;

use crate::geometry::{coord_to_vec, Axis, Coord, Sign};

/// Number of pieces in the puzzle.
pub const NUM_PIECES: usize = 27;

/// Edge length of a rendered piece (slightly smaller than 1.0 for visible gaps).
pub const PIECE_SIZE: f32 = 0.95;

/// Distance from the origin to each face plate.
pub const PLATE_OFFSET: f32 = 1.5;

/// Edge length of a face plate; covers the whole face of the puzzle.
pub const PLATE_SIZE: f32 = 3.0;

/// Stable identity of a piece. Survives every rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub u8);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which container currently owns a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parent {
    /// The permanent top-level collection.
    Collection,
    /// The transient layer group.
    Layer,
}

/// One unit cube of the puzzle.
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pub id: PieceId,
    /// Lattice position, re-derived whenever the piece returns to the
    /// collection.
    pub lattice: Coord,
    /// Position relative to the parent container.
    pub position: Vec3,
    /// Orientation relative to the parent container.
    pub orientation: Quat,
    pub parent: Parent,
}

impl Piece {
    /// Creates an unrotated piece sitting in the collection at `lattice`.
    pub fn new(id: PieceId, lattice: Coord) -> Self {
        Self {
            id,
            lattice,
            position: coord_to_vec(lattice),
            orientation: Quat::IDENTITY,
            parent: Parent::Collection,
        }
    }
}

/// Every lattice cell of the cube in x-major order, matching piece ids.
pub fn lattice_cells() -> impl Iterator<Item = Coord> {
    (-1..=1).flat_map(|x| (-1..=1).flat_map(move |y| (-1..=1).map(move |z| (x, y, z))))
}

/// One of the six invisible pick targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FacePlate {
    /// Axis held constant across the plate.
    pub axis: Axis,
    /// Side of the cube the plate sits on.
    pub sign: Sign,
}

impl FacePlate {
    /// All six plates.
    pub const ALL: [FacePlate; 6] = [
        FacePlate::new(Axis::X, Sign::Neg),
        FacePlate::new(Axis::X, Sign::Pos),
        FacePlate::new(Axis::Y, Sign::Neg),
        FacePlate::new(Axis::Y, Sign::Pos),
        FacePlate::new(Axis::Z, Sign::Neg),
        FacePlate::new(Axis::Z, Sign::Pos),
    ];

    pub const fn new(axis: Axis, sign: Sign) -> Self {
        Self { axis, sign }
    }

    /// Outward unit normal.
    pub fn normal(self) -> Vec3 {
        self.axis.unit() * self.sign.to_f32()
    }

    pub fn center(self) -> Vec3 {
        self.normal() * PLATE_OFFSET
    }

    /// Half extents of the plate; zero along its own axis.
    pub fn half_extents(self) -> Vec3 {
        let mut half = Vec3::splat(PLATE_SIZE / 2.0);
        half[self.axis.index()] = 0.0;
        half
    }
}

impl fmt::Display for FacePlate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.sign, self.axis)
    }
}

/// Error returned when parsing a face plate such as `+x` or `-z`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid face {0:?}; expected one of +x, -x, +y, -y, +z, -z")]
pub struct ParseFaceError(String);

impl FromStr for FacePlate {
    type Err = ParseFaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let sign = match chars.next() {
            Some('+') => Sign::Pos,
            Some('-') => Sign::Neg,
            _ => return Err(ParseFaceError(s.to_owned())),
        };
        let axis = match (chars.next(), chars.next()) {
            (Some('x' | 'X'), None) => Axis::X,
            (Some('y' | 'Y'), None) => Axis::Y,
            (Some('z' | 'Z'), None) => Axis::Z,
            _ => return Err(ParseFaceError(s.to_owned())),
        };
        Ok(FacePlate::new(axis, sign))
    }
}
