//! Cube Turner
//!
//! Drives the gesture state machine of a 3x3x3 twisty cube from the command
//! line. Gestures are scripted as pointer events against a fixed viewport,
//! and the resulting cube state or camera is printed.

use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use glam::{Vec2, Vec3};
use thiserror::Error;

use cubeturn::config::ConfigError;
use cubeturn::disambiguation::Channel;
use cubeturn::geometry::{Axis, Sign};
use cubeturn::input::{PointerEvent, PointerPhase, Viewport};
use cubeturn::pieces::FacePlate;
use cubeturn::{direction, grid};
use cubeturn::{Camera, CubeScene, Interaction, InteractionConfig, InteractionError, PhaseKind};

/// Number of pointer moves a scripted drag is split into.
const DRAG_STEPS: u32 = 12;

/// Size of the scripted viewport in client pixels.
const VIEWPORT_WIDTH: f32 = 1024.0;
const VIEWPORT_HEIGHT: f32 = 768.0;

/// Interval between animation ticks.
const FRAME: Duration = Duration::from_millis(16);

/// Resolves pointer drags into layer turns of a 3x3x3 cube.
#[derive(Parser)]
#[command(name = "cubeturn")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    tuning: Tuning,
}

/// Overrides for the interaction tunables.
#[derive(clap::Args)]
struct Tuning {
    /// Radians of layer rotation per unit of pointer motion in NDC.
    #[arg(long, global = true)]
    rotation_rate: Option<f32>,
    /// Distance from a quarter turn, in degrees, that rounds instead of completing the turn.
    #[arg(long, global = true)]
    snap_threshold_deg: Option<f32>,
    /// Length of the snap animation in milliseconds.
    #[arg(long, global = true)]
    snap_duration_ms: Option<u64>,
    /// Minimum time between two accepted presses in milliseconds.
    #[arg(long, global = true)]
    debounce_ms: Option<u64>,
}

impl Tuning {
    fn config(&self) -> Result<InteractionConfig, ConfigError> {
        let mut config = InteractionConfig::default();
        if let Some(rate) = self.rotation_rate {
            config.rotation_rate = rate;
        }
        if let Some(degrees) = self.snap_threshold_deg {
            config.snap_threshold = degrees.to_radians();
        }
        if let Some(millis) = self.snap_duration_ms {
            config.snap_duration = Duration::from_millis(millis);
        }
        if let Some(millis) = self.debounce_ms {
            config.debounce = Duration::from_millis(millis);
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Print the direction resolution table.
    Table,
    /// Press the centre of a face, drag, release, and print the cube before and after.
    Turn {
        /// Face to press: +x, -x, +y, -y, +z or -z.
        #[arg(long, default_value = "+z", allow_hyphen_values = true)]
        face: FacePlate,
        /// Screen direction of the drag.
        #[arg(long, value_enum, default_value_t = Drag::Right)]
        drag: Drag,
        /// Length of the drag in normalized device coordinates.
        #[arg(long, default_value_t = 0.3)]
        distance: f32,
    },
    /// Press off the puzzle, drag, and print the camera before and after.
    Orbit {
        /// Horizontal drag in normalized device coordinates.
        #[arg(long, default_value_t = 0.2, allow_hyphen_values = true)]
        dx: f32,
        /// Vertical drag in normalized device coordinates.
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        dy: f32,
    },
}

/// Screen direction of a scripted drag.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Drag {
    Up,
    Down,
    Left,
    Right,
}

impl Drag {
    fn direction(self) -> Vec2 {
        match self {
            Drag::Up => Vec2::Y,
            Drag::Down => Vec2::NEG_Y,
            Drag::Left => Vec2::NEG_X,
            Drag::Right => Vec2::X,
        }
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Interaction(#[from] InteractionError),
    #[error("face {0} is not visible from the camera")]
    FaceHidden(FacePlate),
}

fn main() {
    env_logger::builder()
        .filter_module("cubeturn", log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    let result = cli.tuning.config().map_err(CliError::from).and_then(|config| {
        match cli.command {
            Some(Command::Table) => {
                print!("{}", direction::format_table());
                Ok(())
            }
            Some(Command::Turn {
                face,
                drag,
                distance,
            }) => run_turn(config, face, drag, distance),
            Some(Command::Orbit { dx, dy }) => run_orbit(config, Vec2::new(dx, dy)),
            None => run_turn(config, FacePlate::new(Axis::Z, Sign::Pos), Drag::Right, 0.3),
        }
    });

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Scripts one press-drag-release gesture on a viewport.
struct Gesture<'a> {
    interaction: &'a mut Interaction<CubeScene>,
    viewport: Viewport,
    now: Duration,
}

impl Gesture<'_> {
    fn send(&mut self, phase: PointerPhase, ndc: Vec2) -> Result<PhaseKind, InteractionError> {
        let event = PointerEvent::Mouse {
            phase,
            client: self.viewport.to_client(ndc),
        };
        self.interaction.handle(&event, &self.viewport, self.now)
    }

    /// Presses at `from`, drags by `delta` in even steps, and releases.
    /// Returns the layer held at release, if the drag committed one.
    fn drag(&mut self, from: Vec2, delta: Vec2) -> Result<Option<Committed>, InteractionError> {
        self.send(PointerPhase::Down, from)?;
        for step in 1..=DRAG_STEPS {
            self.now += FRAME;
            self.send(PointerPhase::Move, from + delta * (step as f32 / DRAG_STEPS as f32))?;
        }
        self.now += FRAME;
        let committed = match (self.interaction.layer(), self.interaction.committed()) {
            (Some(layer), Some((sign, channel))) => Some(Committed {
                axis: layer.axis(),
                index: layer.index(),
                angle: layer.angle(),
                sign,
                channel,
            }),
            _ => None,
        };
        self.send(PointerPhase::Up, from + delta)?;
        Ok(committed)
    }

    /// Delivers clock ticks until the snap animation finishes.
    fn settle(&mut self) -> Result<(), InteractionError> {
        while self.interaction.is_animating() {
            self.interaction.tick(self.now)?;
            self.now += FRAME;
        }
        Ok(())
    }
}

/// The layer a scripted drag was turning when it released.
#[derive(Debug, Clone, Copy)]
struct Committed {
    axis: Axis,
    index: i32,
    angle: f32,
    sign: Sign,
    channel: Channel,
}

/// Places the camera where `face` is visible and its two in-plane axes run
/// roughly along the screen axes, so straight screen drags stay decisive.
fn three_quarter_camera(face: FacePlate, aspect: f32) -> Camera {
    let mut position = match face.axis {
        // looking down at the top face (or up at the bottom one) from the front
        Axis::Y => Vec3::new(0.5, 6.0, 5.0),
        Axis::X | Axis::Z => Vec3::new(5.0, 4.0, 6.0),
    };
    if face.sign == Sign::Neg {
        position[face.axis.index()] *= -1.0;
    }
    Camera::new(position, Vec3::Y, aspect)
}

/// Presses the centre of `face`, drags, releases and settles.
fn scripted_turn(
    interaction: &mut Interaction<CubeScene>,
    viewport: Viewport,
    face: FacePlate,
    drag: Drag,
    distance: f32,
) -> Result<Option<Committed>, CliError> {
    let press = interaction
        .camera()
        .project(face.center())
        .ok_or(CliError::FaceHidden(face))?;

    let mut gesture = Gesture {
        interaction,
        viewport,
        now: Duration::ZERO,
    };
    let committed = gesture.drag(press, drag.direction() * distance)?;
    gesture.settle()?;
    Ok(committed)
}

fn run_turn(
    config: InteractionConfig,
    face: FacePlate,
    drag: Drag,
    distance: f32,
) -> Result<(), CliError> {
    let viewport = Viewport::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT);
    let camera = three_quarter_camera(face, viewport.aspect());
    let mut interaction = Interaction::try_new(CubeScene::new(), camera, config)?;
    println!("Before:");
    print!("{}", grid::format_cube(interaction.scene().pieces()));
    println!();

    match scripted_turn(&mut interaction, viewport, face, drag, distance)? {
        Some(committed) => {
            println!(
                "Turned layer {} = {} ({:.1} degrees at release)",
                committed.axis,
                committed.index,
                committed.angle.to_degrees()
            );
            println!(
                "Rotation sign {}, driven by pointer {}",
                committed.sign, committed.channel
            );
        }
        None => println!("No layer committed; the drag was too short or too diagonal"),
    }

    if !grid::is_complete(interaction.scene().pieces()) {
        log::warn!("cube state lost a lattice cell");
    }
    println!();
    println!("After pressing {face} and dragging {drag:?}:");
    print!("{}", grid::format_cube(interaction.scene().pieces()));
    Ok(())
}

fn run_orbit(config: InteractionConfig, delta: Vec2) -> Result<(), CliError> {
    let viewport = Viewport::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT);
    let camera = Camera {
        aspect: viewport.aspect(),
        ..Camera::default()
    };
    let mut interaction = Interaction::try_new(CubeScene::new(), camera, config)?;
    let before = *interaction.camera();

    let mut gesture = Gesture {
        interaction: &mut interaction,
        viewport,
        now: Duration::ZERO,
    };
    // corner of the view, well clear of the puzzle
    gesture.drag(Vec2::new(-0.95, 0.95), delta)?;

    let after = interaction.camera();
    println!("Position: {:.3?} -> {:.3?}", before.position, after.position);
    println!("Up:       {:.3?} -> {:.3?}", before.up, after.up);
    Ok(())
}
