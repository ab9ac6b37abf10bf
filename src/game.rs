use crate::browser;
use crate::config::GameConfig;
use crate::engine::debug_ui::DebugUi;
use crate::engine::input::{InputHandler, KeyPress};
use crate::engine::scene::Material;
use crate::engine::{self, Frame, Game, Renderer};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use futures::join;
use std::cell::Cell;
use std::rc::Rc;

pub mod background;
pub mod obstacles;
pub mod player;
pub mod world;

use self::world::{Materials, World};

/// ┌──────────────────── Flappy Flight ────────────────────┐
/// │                                                       │
/// │  Loading ── initialize() ──► Loaded(Flight)           │
/// │   config.json, images          │                      │
/// │                                ▼                      │
/// │        KeyPress ──► InputHandler ──► acceleration     │
/// │                                        │              │
/// │        Frame ──► World::update ◄───────┘              │
/// │                    ├─► Player     (kinematics)        │
/// │                    ├─► Background (tile recycling)    │
/// │                    ├─► Obstacles  (pulse)             │
/// │                    └─► Camera     (follow)            │
/// │                  DebugUi ◄── FrameReport              │
/// └───────────────────────────────────────────────────────┘
pub enum FlappyBird {
    /// Waiting for configuration and images
    Loading,

    /// Flying, never returns to `Loading`
    Loaded(Flight),
}

impl FlappyBird {
    pub fn new() -> Self {
        FlappyBird::Loading
    }

    async fn load_config() -> GameConfig {
        match browser::fetch_json::<GameConfig>(GameConfig::PATH)
            .await
            .and_then(|config| config.validate().map(|_| config))
        {
            Ok(config) => config,
            Err(err) => {
                log!(
                    "Using default configuration, could not load {} : {:#?}",
                    GameConfig::PATH,
                    err
                );
                GameConfig::default()
            }
        }
    }

    /// A failed image only costs its visuals : log it and keep an empty material
    async fn load_material(path: &str) -> Rc<Material> {
        match engine::load_image(path)
            .await
            .with_context(|| format!("Failed to load image resource from : {}", path))
        {
            Ok(image) => Material::from_image(image),
            Err(err) => {
                error!("{:#?}", err);
                Material::empty()
            }
        }
    }
}

impl Default for FlappyBird {
    fn default() -> Self {
        FlappyBird::new()
    }
}

#[async_trait(?Send)]
impl Game for FlappyBird {
    async fn initialize(&self) -> Result<Box<dyn Game>> {
        match self {
            FlappyBird::Loading => {
                let config = Self::load_config().await;
                let (bird, background, obstacle) = join!(
                    Self::load_material(&config.assets.bird),
                    Self::load_material(&config.assets.background),
                    Self::load_material(&config.assets.obstacle),
                );
                let aspect = browser::canvas_size()?.aspect()?;
                let world = World::new(
                    &config,
                    aspect,
                    Materials {
                        bird,
                        background,
                        obstacle,
                    },
                    &mut rand::thread_rng(),
                );
                let flight = Flight::new(world, &config)?;
                Ok(Box::new(FlappyBird::Loaded(flight)))
            }
            FlappyBird::Loaded(_) => Err(anyhow!("Game is already initialized")),
        }
    }

    fn handle_input(&mut self, press: &KeyPress) {
        if let FlappyBird::Loaded(flight) = self {
            flight.input.dispatch(press);
        }
    }

    fn update(&mut self, frame: &Frame) {
        if let FlappyBird::Loaded(flight) = self {
            flight.update(frame);
        }
    }

    fn draw(&self, renderer: &Renderer) {
        if let FlappyBird::Loaded(flight) = self {
            flight.world.draw(renderer);
        }
    }
}

mod labels {
    pub const SPEED: &str = "speed";
    pub const DELTA_TIME: &str = "deltatime";
    pub const FPS: &str = "fps";
}

pub struct Flight {
    world: World,
    input: InputHandler,
    acceleration: Rc<Cell<f64>>,
    debug: DebugUi,
}

impl Flight {
    fn new(world: World, config: &GameConfig) -> Result<Self> {
        let acceleration = Rc::new(Cell::new(0.0));
        let input = bind_thrust(&acceleration, config);

        let mut debug = DebugUi::new();
        debug.add_label(labels::SPEED, "Speed")?;
        debug.add_label(labels::DELTA_TIME, "Delta time")?;
        debug.add_label(labels::FPS, "FPS")?;

        Ok(Flight {
            world,
            input,
            acceleration,
            debug,
        })
    }

    fn update(&mut self, frame: &Frame) {
        let report = self.world.update(frame, self.acceleration.get());
        if report.recycled > 0 {
            log!("Recycling background at x = {}", report.player_x);
        }
        self.debug.update_value(labels::SPEED, report.speed);
        self.debug.update_value(labels::DELTA_TIME, frame.delta);
        self.debug.update_value(labels::FPS, frame.fps());
    }
}

/// Up key thrusts up, down key thrusts down, releasing either stops thrust
fn bind_thrust(acceleration: &Rc<Cell<f64>>, config: &GameConfig) -> InputHandler {
    let thrust = config.player.acceleration;
    let mut input = InputHandler::new();

    for (key, value) in [(&config.keys.up, thrust), (&config.keys.down, -thrust)] {
        let pressed = acceleration.clone();
        input.on_key_down(key, move || pressed.set(value));
        let released = acceleration.clone();
        input.on_key_up(key, move || released.set(0.0));
    }

    input
}
