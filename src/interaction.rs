//! The gesture state machine.
//!
//! [`Interaction`] owns the scene, the camera, and all per-gesture state. A
//! gesture moves through these phases:
//!
//! ```text
//! Idle --down on puzzle--> Probing --decisive sweep--> LayerFound
//! LayerFound --up--> Settling --tween done--> Idle
//! Idle --down off puzzle--> Orbiting --up--> Idle
//! Probing --up--> Idle
//! ```
//!
//! A press is refused while a layer is settling, so a second layer group can
//! never form before the first has been disbanded.

use std::mem;
use std::time::Duration;

use glam::{Vec2, Vec3};
use thiserror::Error;

use crate::camera::Camera;
use crate::config::{ConfigError, InteractionConfig};
use crate::disambiguation::{self, Channel};
use crate::geometry::{Coord, Sign};
use crate::input::{PointerEvent, PointerPhase, Viewport};
use crate::layer::{snap_angle, LayerGroup, SnapTween};
use crate::picking;
use crate::pieces::FacePlate;
use crate::scene::{Scene, SceneError};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InteractionError {
    #[error("a layer is still settling")]
    Settling,
    #[error("a layer is already held by an unreleased pointer")]
    LayerHeld,
    #[error("press arrived {elapsed:?} after the previous one")]
    Debounced { elapsed: Duration },
    #[error("touch event carried no changed touches")]
    NoTouchPoint,
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Observable phase of the current gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    Idle,
    Orbiting,
    Probing,
    LayerFound,
    Settling,
}

/// State captured when a press lands on the puzzle.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Press {
    /// Face plate point under the press.
    start: Vec3,
    plate: FacePlate,
    /// Lattice position of the clicked piece.
    anchor: Coord,
}

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Idle,
    Orbiting,
    Probing(Press),
    LayerFound {
        layer: LayerGroup,
        sign: Sign,
        channel: Channel,
    },
    Settling {
        layer: LayerGroup,
        tween: SnapTween,
    },
}

/// All interaction state: scene, camera, tunables, and the current gesture.
#[derive(Debug, Clone)]
pub struct Interaction<S> {
    scene: S,
    camera: Camera,
    config: InteractionConfig,
    phase: Phase,
    /// Latest pointer position in NDC while a pointer is down.
    pointer: Option<Vec2>,
    /// Time of the last accepted press.
    last_press: Option<Duration>,
}

impl<S: Scene> Interaction<S> {
    /// Creates an interaction without checking `config`. Prefer
    /// [`Interaction::try_new`] for tunables that come from outside.
    pub fn new(scene: S, camera: Camera, config: InteractionConfig) -> Self {
        Self {
            scene,
            camera,
            config,
            phase: Phase::Idle,
            pointer: None,
            last_press: None,
        }
    }

    /// Creates an interaction after validating `config`.
    pub fn try_new(
        scene: S,
        camera: Camera,
        config: InteractionConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(scene, camera, config))
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn phase(&self) -> PhaseKind {
        match self.phase {
            Phase::Idle => PhaseKind::Idle,
            Phase::Orbiting => PhaseKind::Orbiting,
            Phase::Probing(_) => PhaseKind::Probing,
            Phase::LayerFound { .. } => PhaseKind::LayerFound,
            Phase::Settling { .. } => PhaseKind::Settling,
        }
    }

    /// The layer group currently turning or settling, if any.
    pub fn layer(&self) -> Option<&LayerGroup> {
        match &self.phase {
            Phase::LayerFound { layer, .. } | Phase::Settling { layer, .. } => Some(layer),
            _ => None,
        }
    }

    /// Sign and driving channel of the committed rotation, if any.
    pub fn committed(&self) -> Option<(Sign, Channel)> {
        match self.phase {
            Phase::LayerFound { sign, channel, .. } => Some((sign, channel)),
            _ => None,
        }
    }

    /// Whether a snap animation is in flight and needs clock ticks.
    pub fn is_animating(&self) -> bool {
        matches!(self.phase, Phase::Settling { .. })
    }

    /// Dispatches a raw pointer event.
    pub fn handle(
        &mut self,
        event: &PointerEvent,
        viewport: &Viewport,
        now: Duration,
    ) -> Result<PhaseKind, InteractionError> {
        let client = event
            .client_position()
            .ok_or(InteractionError::NoTouchPoint)?;
        let ndc = viewport.to_ndc(client);
        match event.phase() {
            PointerPhase::Down => self.pointer_down(ndc, now),
            PointerPhase::Move => self.pointer_move(ndc),
            PointerPhase::Up => self.pointer_up(now),
        }
    }

    /// Starts a gesture at `ndc`.
    ///
    /// Fails without changing any state while a layer is settling or held,
    /// or if the press falls inside the debounce window of the previous one.
    pub fn pointer_down(
        &mut self,
        ndc: Vec2,
        now: Duration,
    ) -> Result<PhaseKind, InteractionError> {
        match self.phase {
            Phase::Settling { .. } => {
                log::debug!("ignoring press while a layer is settling");
                return Err(InteractionError::Settling);
            }
            Phase::LayerFound { .. } => {
                log::debug!("ignoring press while a layer is held");
                return Err(InteractionError::LayerHeld);
            }
            Phase::Idle | Phase::Orbiting | Phase::Probing(_) => (),
        }
        if let Some(last) = self.last_press {
            let elapsed = now.saturating_sub(last);
            if elapsed < self.config.debounce {
                log::debug!("debounced press {elapsed:?} after the previous one");
                return Err(InteractionError::Debounced { elapsed });
            }
        }

        let hit = picking::intersect(&self.scene, &self.camera, ndc)?;
        self.last_press = Some(now);
        self.pointer = Some(ndc);
        self.phase = match hit {
            Some(hit) => {
                log::debug!(
                    "press on {} face at piece {:?}",
                    hit.plate,
                    hit.piece_lattice
                );
                Phase::Probing(Press {
                    start: hit.point,
                    plate: hit.plate,
                    anchor: hit.piece_lattice,
                })
            }
            None => {
                log::debug!("press off the puzzle; orbiting");
                Phase::Orbiting
            }
        };
        Ok(self.phase())
    }

    /// Continues the gesture with the pointer now at `ndc`. Does nothing
    /// unless a pointer is down.
    pub fn pointer_move(&mut self, ndc: Vec2) -> Result<PhaseKind, InteractionError> {
        let Some(previous) = self.pointer else {
            return Ok(self.phase());
        };
        let delta = ndc - previous;
        self.pointer = Some(ndc);

        match &mut self.phase {
            Phase::Idle | Phase::Settling { .. } => (),
            Phase::Orbiting => self.camera.orbit(delta, self.config.orbit_sensitivity),
            Phase::Probing(press) => {
                let press = *press;
                let Some((current, _)) = picking::intersect_plates(&self.scene, &self.camera, ndc)
                else {
                    return Ok(self.phase());
                };
                let thresholds = self.config.thresholds();
                if let Some(commit) =
                    disambiguation::resolve(press.start, current, press.plate, delta, &thresholds)
                {
                    let layer = LayerGroup::create(&mut self.scene, commit.axis, press.anchor)?;
                    log::debug!(
                        "committed layer {} = {}, sign {}, driven by pointer {}",
                        layer.axis(),
                        layer.index(),
                        commit.sign,
                        commit.channel
                    );
                    self.phase = Phase::LayerFound {
                        layer,
                        sign: commit.sign,
                        channel: commit.channel,
                    };
                }
            }
            Phase::LayerFound {
                layer,
                sign,
                channel,
            } => {
                let step = channel.of(delta) * sign.to_f32() * self.config.rotation_rate;
                layer.rotate_by(&mut self.scene, step);
                log::trace!("layer {} at {:.3} rad", layer.axis(), layer.angle());
            }
        }
        Ok(self.phase())
    }

    /// Ends the gesture at time `now`. A committed layer starts settling
    /// toward its snap target; anything else returns to idle.
    pub fn pointer_up(&mut self, now: Duration) -> Result<PhaseKind, InteractionError> {
        if self.pointer.take().is_none() {
            return Ok(self.phase());
        }

        self.phase = match mem::replace(&mut self.phase, Phase::Idle) {
            Phase::LayerFound { layer, .. } => {
                let target = snap_angle(layer.angle(), self.config.snap_threshold);
                log::debug!(
                    "released layer {} at {:.3} rad; settling to {:.3}",
                    layer.axis(),
                    layer.angle(),
                    target
                );
                let tween = SnapTween {
                    axis: layer.axis(),
                    start_angle: layer.angle(),
                    end_angle: target,
                    start_time: now,
                    duration: self.config.snap_duration,
                };
                Phase::Settling { layer, tween }
            }
            settling @ Phase::Settling { .. } => settling,
            Phase::Idle | Phase::Orbiting | Phase::Probing(_) => Phase::Idle,
        };
        Ok(self.phase())
    }

    /// Advances the snap animation to `now`. Disbands the layer and returns
    /// to idle once it completes. Returns whether another tick is needed.
    ///
    /// A no-op outside of settling.
    pub fn tick(&mut self, now: Duration) -> Result<bool, InteractionError> {
        let Phase::Settling { layer, tween } = &mut self.phase else {
            return Ok(false);
        };
        let angle = tween.sample(now);
        layer.set_angle(&mut self.scene, angle);
        log::trace!("settling layer {} at {angle:.3} rad", layer.axis());
        if !tween.is_finished(now) {
            return Ok(true);
        }

        if let Phase::Settling { layer, .. } = mem::replace(&mut self.phase, Phase::Idle) {
            layer.disband(&mut self.scene)?;
        }
        log::debug!("layer settled");
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::CubeScene;

    fn interaction() -> Interaction<CubeScene> {
        Interaction::new(CubeScene::new(), Camera::default(), InteractionConfig::default())
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_press_on_puzzle_starts_probing() {
        let mut it = interaction();
        assert_eq!(it.pointer_down(Vec2::ZERO, ms(0)), Ok(PhaseKind::Probing));
        assert_eq!(it.pointer_up(ms(10)), Ok(PhaseKind::Idle));
    }

    #[test]
    fn test_press_off_puzzle_orbits() {
        let mut it = interaction();
        assert_eq!(it.pointer_down(Vec2::new(0.9, 0.9), ms(0)), Ok(PhaseKind::Orbiting));
        assert_eq!(it.pointer_move(Vec2::new(0.95, 0.9)), Ok(PhaseKind::Orbiting));
        assert_eq!(it.pointer_up(ms(10)), Ok(PhaseKind::Idle));
    }

    #[test]
    fn test_move_without_press_is_ignored() {
        let mut it = interaction();
        let camera = *it.camera();
        assert_eq!(it.pointer_move(Vec2::new(0.5, 0.5)), Ok(PhaseKind::Idle));
        assert_eq!(*it.camera(), camera);
    }

    #[test]
    fn test_up_without_press_is_noop() {
        let mut it = interaction();
        assert_eq!(it.pointer_up(ms(10)), Ok(PhaseKind::Idle));
        assert_eq!(it.tick(ms(50)), Ok(false));
    }

    #[test]
    fn test_debounce_rejects_quick_second_press() {
        let mut it = interaction();
        it.pointer_down(Vec2::ZERO, ms(1000)).unwrap();
        it.pointer_up(ms(10)).unwrap();
        assert_eq!(
            it.pointer_down(Vec2::ZERO, ms(1100)),
            Err(InteractionError::Debounced { elapsed: ms(100) })
        );
        assert_eq!(it.phase(), PhaseKind::Idle);
        assert_eq!(it.pointer_down(Vec2::ZERO, ms(1300)), Ok(PhaseKind::Probing));
    }

    #[test]
    fn test_drag_commits_then_settles() {
        let mut it = interaction();
        it.pointer_down(Vec2::ZERO, ms(0)).unwrap();
        // front face at distance 6.5 with a 90 degree fov: 0.1 ndc is ~0.65 world units
        assert_eq!(it.pointer_move(Vec2::new(0.1, 0.0)), Ok(PhaseKind::LayerFound));
        let layer = it.layer().unwrap();
        assert_eq!(layer.axis(), crate::geometry::Axis::Y);
        assert_eq!(layer.index(), 0);
        assert_eq!(it.committed(), Some((Sign::Pos, Channel::X)));

        it.pointer_move(Vec2::new(0.3, 0.0)).unwrap();
        assert!((it.layer().unwrap().angle() - 1.0).abs() < 1e-5);

        assert_eq!(it.pointer_up(ms(500)), Ok(PhaseKind::Settling));
        assert_eq!(
            it.pointer_down(Vec2::ZERO, ms(900)),
            Err(InteractionError::Settling)
        );
        assert_eq!(it.tick(ms(600)), Ok(true));
        assert_eq!(it.phase(), PhaseKind::Settling);
        assert_eq!(it.tick(ms(700)), Ok(false));
        assert_eq!(it.phase(), PhaseKind::Idle);
        assert_eq!(it.scene().collection().count(), 27);
    }

    #[test]
    fn test_touch_gesture_through_handle() {
        let mut it = interaction();
        let viewport = Viewport::new(800.0, 800.0);
        let touch = |phase, x: f32, y: f32| PointerEvent::Touch {
            phase,
            changed_touches: vec![Vec2::new(x, y), Vec2::new(10.0, 10.0)],
        };

        // client (400, 400) is the centre of the view, over the front face
        assert_eq!(
            it.handle(&touch(PointerPhase::Down, 400.0, 400.0), &viewport, ms(0)),
            Ok(PhaseKind::Probing)
        );
        // 40 pixels right is 0.1 in ndc
        assert_eq!(
            it.handle(&touch(PointerPhase::Move, 440.0, 400.0), &viewport, ms(16)),
            Ok(PhaseKind::LayerFound)
        );
        assert_eq!(it.layer().unwrap().axis(), crate::geometry::Axis::Y);
        it.handle(&touch(PointerPhase::Move, 520.0, 400.0), &viewport, ms(32))
            .unwrap();
        assert!((it.layer().unwrap().angle() - 1.0).abs() < 1e-4);

        assert_eq!(
            it.handle(&touch(PointerPhase::Up, 520.0, 400.0), &viewport, ms(48)),
            Ok(PhaseKind::Settling)
        );
        assert_eq!(it.tick(ms(300)), Ok(false));
        assert_eq!(it.phase(), PhaseKind::Idle);
    }

    #[test]
    fn test_mouse_gesture_off_puzzle_orbits() {
        let mut it = interaction();
        let viewport = Viewport::new(800.0, 600.0);
        let mouse = |phase, x: f32, y: f32| PointerEvent::Mouse {
            phase,
            client: Vec2::new(x, y),
        };
        let camera = *it.camera();

        assert_eq!(
            it.handle(&mouse(PointerPhase::Down, 20.0, 20.0), &viewport, ms(0)),
            Ok(PhaseKind::Orbiting)
        );
        it.handle(&mouse(PointerPhase::Move, 120.0, 20.0), &viewport, ms(16))
            .unwrap();
        assert_eq!(
            it.handle(&mouse(PointerPhase::Up, 120.0, 20.0), &viewport, ms(32)),
            Ok(PhaseKind::Idle)
        );
        assert_ne!(*it.camera(), camera);
    }

    #[test]
    fn test_try_new_rejects_bad_config() {
        let nan_rate = InteractionConfig {
            rotation_rate: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            Interaction::try_new(CubeScene::new(), Camera::default(), nan_rate),
            Err(ConfigError::NotPositive {
                name: "rotation_rate",
                ..
            })
        ));

        let wide_snap = InteractionConfig {
            snap_threshold: 60_f32.to_radians(),
            ..Default::default()
        };
        assert!(matches!(
            Interaction::try_new(CubeScene::new(), Camera::default(), wide_snap),
            Err(ConfigError::SnapThresholdTooLarge(_))
        ));

        assert!(
            Interaction::try_new(CubeScene::new(), Camera::default(), InteractionConfig::default())
                .is_ok()
        );
    }

    #[test]
    fn test_touch_without_points_is_rejected() {
        let mut it = interaction();
        let event = PointerEvent::Touch {
            phase: PointerPhase::Down,
            changed_touches: vec![],
        };
        assert_eq!(
            it.handle(&event, &Viewport::new(800.0, 800.0), ms(0)),
            Err(InteractionError::NoTouchPoint)
        );
    }
}
