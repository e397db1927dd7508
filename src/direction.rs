//! Chirality correction for layer rotations.
//!
//! The same drag across the puzzle means opposite layer rotations depending
//! on which face was grabbed. For a grabbed face `(axis, sign)` and a sweep
//! along one of the two in-plane axes, the table below gives the factor that
//! turns the sign of the sweep into the sign of the rotation about the
//! remaining axis.
//!
//! Sweeps are measured as press point minus current point, so a sweep toward
//! negative coordinates reads as positive.

use crate::geometry::{handedness, Axis, Sign};
use crate::pieces::FacePlate;

/// `CHIRALITY[face_axis][face_sign][sweep_axis]`; 0 where the sweep axis is
/// the face normal, which can never be swept.
const CHIRALITY: [[[i8; 3]; 2]; 3] = [
    // x faces: [-x, +x]
    [[0, 1, -1], [0, -1, 1]],
    // y faces
    [[-1, 0, 1], [1, 0, -1]],
    // z faces
    [[1, -1, 0], [-1, 1, 0]],
];

/// Looks up the chirality correction for sweeping along `sweep` after
/// grabbing `face`. Returns `None` if `sweep` is the face's own axis.
pub fn chirality(face: FacePlate, sweep: Axis) -> Option<Sign> {
    match CHIRALITY[face.axis.index()][face.sign.index()][sweep.index()] {
        0 => None,
        value => Some(Sign::of_i32(value.into())),
    }
}

/// Computes the same correction from the orientation of the three axes:
/// `-sign * handedness(face_axis, sweep, rotation_axis)`.
pub fn derived_chirality(face: FacePlate, sweep: Axis) -> Option<Sign> {
    let rotation_axis = face.axis.third(sweep)?;
    let value = -face.sign.to_i32() * handedness(face.axis, sweep, rotation_axis);
    Some(Sign::of_i32(value))
}

/// Formats the whole table, one row per face and sweep axis.
pub fn format_table() -> String {
    let mut output = format!("{:<4} {:<5} {}\n", "face", "sweep", "chirality");
    for face in FacePlate::ALL {
        for sweep in face.axis.others() {
            if let Some(sign) = chirality(face, sweep) {
                output.push_str(&format!(
                    "{:<4} {:<5} {}\n",
                    face.to_string(),
                    sweep.to_string(),
                    sign
                ));
            }
        }
    }
    output
}
