//! Resolving a pointer position to the face plate and piece beneath it.

use glam::{Vec2, Vec3};

use crate::camera::Camera;
use crate::geometry::{round_to_lattice, Coord};
use crate::pieces::{FacePlate, PieceId};
use crate::scene::{HitObject, PickTarget, Scene, SceneError};

/// What a pointer press struck on the puzzle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// World-space point on the face plate.
    pub point: Vec3,
    pub plate: FacePlate,
    /// The first piece under the pointer, if the ray did not slip through a
    /// gap between pieces.
    pub piece: Option<PieceId>,
    /// Lattice position of the clicked piece.
    pub piece_lattice: Coord,
}

/// Casts a ray through `ndc` and returns the nearest face plate it strikes,
/// along with the world-space hit point.
pub fn intersect_plates(
    scene: &impl Scene,
    camera: &Camera,
    ndc: Vec2,
) -> Option<(Vec3, FacePlate)> {
    let ray = camera.ray_through(ndc);
    scene
        .cast_ray(&ray, PickTarget::FacePlates)
        .into_iter()
        .find_map(|hit| match hit.object {
            HitObject::Plate(plate) => Some((hit.point, plate)),
            HitObject::Piece(_) => None,
        })
}

/// Full intersection query used on pointer-down.
///
/// Returns `Ok(None)` when the pointer misses every face plate, which makes
/// the gesture a camera orbit.
pub fn intersect(
    scene: &impl Scene,
    camera: &Camera,
    ndc: Vec2,
) -> Result<Option<Intersection>, SceneError> {
    let Some((point, plate)) = intersect_plates(scene, camera, ndc) else {
        return Ok(None);
    };

    let ray = camera.ray_through(ndc);
    let piece = scene
        .cast_ray(&ray, PickTarget::Pieces)
        .into_iter()
        .find_map(|hit| match hit.object {
            HitObject::Piece(id) => Some(id),
            HitObject::Plate(_) => None,
        });

    let piece_lattice = match piece {
        Some(id) => scene.lattice(id)?,
        None => cell_under_plate_point(point, plate),
    };

    Ok(Some(Intersection {
        point,
        plate,
        piece,
        piece_lattice,
    }))
}

/// Lattice cell directly beneath a point on a face plate.
fn cell_under_plate_point(point: Vec3, plate: FacePlate) -> Coord {
    let inside = point - plate.normal() * 0.5;
    let (x, y, z) = round_to_lattice(inside);
    (x.clamp(-1, 1), y.clamp(-1, 1), z.clamp(-1, 1))
}
