//! Cube Turning Library
//!
//! Turns pointer drags on a 2D viewport into layer rotations of a 3x3x3
//! twisty cube. A press on the puzzle watches the drag until it is clear
//! which layer it means to turn, the committed layer follows the pointer,
//! and on release it settles onto the nearest quarter turn. A press off the
//! puzzle orbits the camera instead.
//!
//! [`interaction::Interaction`] is the entry point. The scene it drives is
//! abstracted behind [`scene::Scene`]; [`scene::CubeScene`] is the in-memory
//! implementation.

pub mod camera;
pub mod config;
pub mod direction;
pub mod disambiguation;
pub mod geometry;
pub mod grid;
pub mod input;
pub mod interaction;
pub mod layer;
pub mod picking;
pub mod pieces;
pub mod scene;

pub use camera::Camera;
pub use config::InteractionConfig;
pub use interaction::{Interaction, InteractionError, PhaseKind};
pub use scene::{CubeScene, Scene};
