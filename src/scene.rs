//! The scene collaborator: ray casting and parenting of pieces.
//!
//! The interaction core never touches meshes. It asks a [`Scene`] to cast
//! rays, to move pieces between the permanent collection and the layer group,
//! and to turn that group. [`CubeScene`] is the in-memory implementation; a
//! renderer can implement the same trait over its own scene graph.

use glam::{Quat, Vec3};
use thiserror::Error;

use crate::geometry::{coord_to_vec, Axis, Coord, Ray};
use crate::pieces::{lattice_cells, FacePlate, Parent, Piece, PieceId, PIECE_SIZE};

/// Which set of objects a ray is tested against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickTarget {
    FacePlates,
    Pieces,
}

/// The object a ray struck.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitObject {
    Plate(FacePlate),
    Piece(PieceId),
}

/// A single ray hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Distance along the ray.
    pub distance: f32,
    /// World-space point of the hit.
    pub point: Vec3,
    pub object: HitObject,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SceneError {
    #[error("unknown piece {0}")]
    UnknownPiece(PieceId),
    #[error("piece {0} is already in the layer group")]
    AlreadyAttached(PieceId),
    #[error("piece {0} is not in the layer group")]
    NotAttached(PieceId),
}

/// Operations the interaction core needs from the scene graph.
pub trait Scene {
    /// Casts `ray` against `target`, returning hits nearest first.
    fn cast_ray(&self, ray: &Ray, target: PickTarget) -> Vec<Hit>;

    /// Returns every piece, in whichever container it currently lives.
    fn piece_ids(&self) -> Vec<PieceId>;

    /// Returns the lattice position last recorded for `piece`.
    fn lattice(&self, piece: PieceId) -> Result<Coord, SceneError>;

    /// Moves `piece` from the collection into the layer group, keeping its
    /// world transform.
    fn attach(&mut self, piece: PieceId) -> Result<(), SceneError>;

    /// Moves `piece` from the layer group back into the collection, keeping
    /// its world transform.
    fn detach(&mut self, piece: PieceId) -> Result<(), SceneError>;

    /// Sets the layer group's rotation to `angle` radians about `axis`.
    fn set_group_rotation(&mut self, axis: Axis, angle: f32);

    /// Returns the world-space position and orientation of `piece`.
    fn world_transform(&self, piece: PieceId) -> Result<(Vec3, Quat), SceneError>;

    /// Places a piece in the collection at a lattice position with the given
    /// orientation, recording the new lattice position.
    fn place(&mut self, piece: PieceId, lattice: Coord, orientation: Quat)
        -> Result<(), SceneError>;
}

/// In-memory scene: 27 pieces, 6 face plates, and one layer group.
#[derive(Debug, Clone)]
pub struct CubeScene {
    pieces: Vec<Piece>,
    group_axis: Axis,
    group_angle: f32,
}

impl Default for CubeScene {
    fn default() -> Self {
        Self::new()
    }
}

impl CubeScene {
    /// Builds the solved cube. Piece ids follow [`lattice_cells`] order.
    pub fn new() -> Self {
        let pieces = lattice_cells()
            .enumerate()
            .map(|(i, cell)| Piece::new(PieceId(i as u8), cell))
            .collect();
        Self {
            pieces,
            group_axis: Axis::X,
            group_angle: 0.0,
        }
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.0 as usize)
    }

    /// Pieces currently in the permanent collection.
    pub fn collection(&self) -> impl Iterator<Item = PieceId> + '_ {
        self.members_of(Parent::Collection)
    }

    /// Pieces currently in the layer group.
    pub fn layer_members(&self) -> impl Iterator<Item = PieceId> + '_ {
        self.members_of(Parent::Layer)
    }

    /// Current rotation of the layer group.
    pub fn group_rotation(&self) -> (Axis, f32) {
        (self.group_axis, self.group_angle)
    }

    fn members_of(&self, parent: Parent) -> impl Iterator<Item = PieceId> + '_ {
        self.pieces
            .iter()
            .filter(move |piece| piece.parent == parent)
            .map(|piece| piece.id)
    }

    fn group_quat(&self) -> Quat {
        Quat::from_axis_angle(self.group_axis.unit(), self.group_angle)
    }

    fn piece_ref(&self, id: PieceId) -> Result<&Piece, SceneError> {
        self.piece(id).ok_or(SceneError::UnknownPiece(id))
    }

    fn piece_mut(&mut self, id: PieceId) -> Result<&mut Piece, SceneError> {
        self.pieces
            .get_mut(id.0 as usize)
            .ok_or(SceneError::UnknownPiece(id))
    }

    fn world_of(&self, piece: &Piece) -> (Vec3, Quat) {
        match piece.parent {
            Parent::Collection => (piece.position, piece.orientation),
            Parent::Layer => {
                let group = self.group_quat();
                (group * piece.position, group * piece.orientation)
            }
        }
    }
}

impl Scene for CubeScene {
    fn cast_ray(&self, ray: &Ray, target: PickTarget) -> Vec<Hit> {
        let mut hits: Vec<Hit> = match target {
            PickTarget::FacePlates => FacePlate::ALL
                .iter()
                .filter_map(|&plate| {
                    let distance = ray.intersect_box(plate.center(), plate.half_extents())?;
                    Some(Hit {
                        distance,
                        point: ray.at(distance),
                        object: HitObject::Plate(plate),
                    })
                })
                .collect(),
            PickTarget::Pieces => self
                .pieces
                .iter()
                .filter_map(|piece| {
                    let (center, orientation) = self.world_of(piece);
                    let half = Vec3::splat(PIECE_SIZE / 2.0);
                    let distance = ray.intersect_oriented_box(center, orientation, half)?;
                    Some(Hit {
                        distance,
                        point: ray.at(distance),
                        object: HitObject::Piece(piece.id),
                    })
                })
                .collect(),
        };
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    fn piece_ids(&self) -> Vec<PieceId> {
        self.pieces.iter().map(|piece| piece.id).collect()
    }

    fn lattice(&self, piece: PieceId) -> Result<Coord, SceneError> {
        Ok(self.piece_ref(piece)?.lattice)
    }

    fn attach(&mut self, id: PieceId) -> Result<(), SceneError> {
        let inverse_group = self.group_quat().inverse();
        let piece = self.piece_mut(id)?;
        if piece.parent == Parent::Layer {
            return Err(SceneError::AlreadyAttached(id));
        }
        piece.position = inverse_group * piece.position;
        piece.orientation = inverse_group * piece.orientation;
        piece.parent = Parent::Layer;
        Ok(())
    }

    fn detach(&mut self, id: PieceId) -> Result<(), SceneError> {
        let (position, orientation) = self.world_of(self.piece_ref(id)?);
        let piece = self.piece_mut(id)?;
        if piece.parent != Parent::Layer {
            return Err(SceneError::NotAttached(id));
        }
        piece.position = position;
        piece.orientation = orientation;
        piece.parent = Parent::Collection;
        Ok(())
    }

    fn set_group_rotation(&mut self, axis: Axis, angle: f32) {
        self.group_axis = axis;
        self.group_angle = angle;
    }

    fn world_transform(&self, piece: PieceId) -> Result<(Vec3, Quat), SceneError> {
        Ok(self.world_of(self.piece_ref(piece)?))
    }

    fn place(
        &mut self,
        id: PieceId,
        lattice: Coord,
        orientation: Quat,
    ) -> Result<(), SceneError> {
        let piece = self.piece_mut(id)?;
        piece.lattice = lattice;
        piece.position = coord_to_vec(lattice);
        piece.orientation = orientation;
        piece.parent = Parent::Collection;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;
    use crate::geometry::Sign;
    use crate::pieces::NUM_PIECES;

    #[test]
    fn test_new_scene_is_solved() {
        let scene = CubeScene::new();
        assert_eq!(scene.pieces().len(), NUM_PIECES);
        assert_eq!(scene.collection().count(), NUM_PIECES);
        assert_eq!(scene.layer_members().count(), 0);
        for piece in scene.pieces() {
            assert_eq!(piece.position, coord_to_vec(piece.lattice));
        }
    }

    #[test]
    fn test_plate_hits_are_sorted_nearest_first() {
        let scene = CubeScene::new();
        let ray = Ray::new(Vec3::new(0.2, 0.1, 8.0), Vec3::NEG_Z);
        let hits = scene.cast_ray(&ray, PickTarget::FacePlates);
        assert_eq!(hits.len(), 2);
        assert_eq!(
            hits[0].object,
            HitObject::Plate(FacePlate::new(Axis::Z, Sign::Pos))
        );
        assert!(hits[0].distance < hits[1].distance);
    }

    #[test]
    fn test_piece_hit_is_front_piece() {
        let scene = CubeScene::new();
        let ray = Ray::new(Vec3::new(1.0, -1.0, 8.0), Vec3::NEG_Z);
        let hits = scene.cast_ray(&ray, PickTarget::Pieces);
        assert_eq!(hits.len(), 3);
        let HitObject::Piece(front) = hits[0].object else {
            panic!("expected a piece hit");
        };
        assert_eq!(scene.lattice(front), Ok((1, -1, 1)));
    }

    #[test]
    fn test_attach_and_detach_preserve_world_transform() {
        let mut scene = CubeScene::new();
        let id = PieceId(0);
        scene.set_group_rotation(Axis::Y, FRAC_PI_2);
        let before = scene.world_transform(id).unwrap();
        scene.attach(id).unwrap();
        let during = scene.world_transform(id).unwrap();
        assert!((before.0 - during.0).length() < 1e-5);
        assert_eq!(scene.attach(id), Err(SceneError::AlreadyAttached(id)));

        scene.set_group_rotation(Axis::Y, 0.0);
        scene.detach(id).unwrap();
        assert_eq!(scene.detach(id), Err(SceneError::NotAttached(id)));
        assert_eq!(scene.layer_members().count(), 0);
    }

    #[test]
    fn test_group_rotation_moves_members_only() {
        let mut scene = CubeScene::new();
        let corner = scene
            .pieces()
            .iter()
            .find(|piece| piece.lattice == (1, 1, 1))
            .map(|piece| piece.id)
            .unwrap();
        scene.attach(corner).unwrap();
        scene.set_group_rotation(Axis::Y, FRAC_PI_2);
        assert_eq!(scene.group_rotation(), (Axis::Y, FRAC_PI_2));
        let (position, _) = scene.world_transform(corner).unwrap();
        assert!((position - Vec3::new(1.0, 1.0, -1.0)).length() < 1e-5);

        let (untouched, _) = scene.world_transform(PieceId(0)).unwrap();
        assert_eq!(untouched, Vec3::new(-1.0, -1.0, -1.0));
    }

    #[test]
    fn test_unknown_piece_is_rejected() {
        let mut scene = CubeScene::new();
        let bogus = PieceId(99);
        assert_eq!(scene.lattice(bogus), Err(SceneError::UnknownPiece(bogus)));
        assert_eq!(scene.attach(bogus), Err(SceneError::UnknownPiece(bogus)));
    }
}
