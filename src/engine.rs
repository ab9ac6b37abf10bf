use crate::browser;
use anyhow::{anyhow, Error, Result};
// ELI5: web assembly is a single threaded environment, so Rc RefCell > Mutex
use async_trait::async_trait;
use futures::channel::mpsc::UnboundedReceiver;
use futures::channel::oneshot::channel;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{
    // unchecked_ref (unsafe) cast from Javascript type to Rust type
    // - because we control the closure creation and specify the expected type,
    // in principle this should be generally safe (unsafe) code
    JsCast,
    JsValue,
};
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

pub mod debug_ui;
pub mod input;
pub mod scene;

use self::input::KeyPress;
use self::scene::{OrthographicCamera, Sprite};

/// ┌──────────────────── Frame Flow ─────────────────────┐
/// │ requestAnimationFrame(perf)                         │
/// │   ├─► drain KeyPress channel -> Game::handle_input  │
/// │   ├─► FrameClock::tick(perf)  (gate : 1000/60 ms)   │
/// │   │     └─► None : return, nothing touched          │
/// │   ├─► Game::update(&Frame)                          │
/// │   ├─► Game::draw(&Renderer)                         │
/// │   └─► request next frame                            │
/// └─────────────────────────────────────────────────────┘
#[async_trait(?Send)]
pub trait Game {
    async fn initialize(&self) -> Result<Box<dyn Game>>;
    fn handle_input(&mut self, press: &KeyPress);
    fn update(&mut self, frame: &Frame);
    fn draw(&self, renderer: &Renderer);
}

// length of a frame in milliseconds
pub const FRAME_SIZE: f64 = 1.0 / 60.0 * 1000.0;

/// Timing of one accepted frame, in milliseconds
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    pub time: f64,
    pub delta: f64,
}

impl Frame {
    pub fn fps(&self) -> f64 {
        1000.0 / self.delta
    }
}

/// Gate between the host refresh rate and the game update rate
/// - a tick closer than `min_delta` to the last accepted frame is dropped
/// - a dropped tick leaves the clock untouched, so the delta keeps growing
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_frame: f64,
    min_delta: f64,
}

impl FrameClock {
    pub fn new(start: f64) -> Self {
        FrameClock::with_min_delta(start, FRAME_SIZE)
    }

    pub fn with_min_delta(start: f64, min_delta: f64) -> Self {
        FrameClock {
            last_frame: start,
            min_delta,
        }
    }

    pub fn tick(&mut self, now: f64) -> Option<Frame> {
        let delta = now - self.last_frame;
        if delta < self.min_delta {
            return None;
        }
        self.last_frame = now;
        Some(Frame { time: now, delta })
    }

    pub fn last_frame(&self) -> f64 {
        self.last_frame
    }
}

pub struct GameLoop {
    clock: FrameClock,
    input: UnboundedReceiver<KeyPress>,
}

type SharedLoopClosure = Rc<RefCell<Option<browser::LoopClosure>>>;

impl GameLoop {
    pub async fn start(game: impl Game + 'static) -> Result<()> {
        let viewport = browser::fit_canvas_to_window()?;
        viewport.aspect()?;
        let input = input::prepare_input()?;
        let mut game = game.initialize().await?;
        let mut game_loop = GameLoop {
            clock: FrameClock::new(browser::now()?),
            input,
        };
        let renderer = Renderer {
            context: browser::context()?,
            viewport,
        };
        log!("Game loop running on a {}x{} canvas", viewport.width, viewport.height);

        let f: SharedLoopClosure = Rc::new(RefCell::new(None));
        let g = f.clone();
        *g.borrow_mut() = Some(browser::create_raf_closure(move |perf: f64| {
            // schedule first, the loop never stops on its own
            if let Some(callback) = f.borrow().as_ref() {
                if let Err(err) = browser::request_animation_frame(callback) {
                    error!("GameLoop: {:#?}", err);
                }
            }
            game_loop.frame(perf, game.as_mut(), |game| game.draw(&renderer));
        }));

        browser::request_animation_frame(
            g.borrow()
                .as_ref()
                .ok_or_else(|| anyhow!("GameLoop: Loop is None"))?,
        )?;

        Ok(())
    }

    /// One animation frame : step, then draw only if the game was updated
    fn frame(
        &mut self,
        perf: f64,
        game: &mut dyn Game,
        draw: impl FnOnce(&dyn Game),
    ) -> Option<Frame> {
        let frame = self.step(perf, game)?;
        draw(game);
        Some(frame)
    }

    /// Forward pending input, then update the game if the frame gate opens
    fn step(&mut self, perf: f64, game: &mut dyn Game) -> Option<Frame> {
        input::process_input(&mut self.input, |press| game.handle_input(press));
        let frame = self.clock.tick(perf)?;
        game.update(&frame);
        Some(frame)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Width over height, an empty size has no aspect
    pub fn aspect(&self) -> Result<f64> {
        if self.width > 0.0 && self.height > 0.0 {
            Ok(self.width / self.height)
        } else {
            Err(anyhow!(
                "Viewport {}x{} has no area",
                self.width,
                self.height
            ))
        }
    }
}

pub struct Renderer {
    context: CanvasRenderingContext2d,
    viewport: Size,
}

impl Renderer {
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn clear(&self) {
        self.context
            .clear_rect(0.0, 0.0, self.viewport.width, self.viewport.height);
    }

    /// Draw a sprite centred on its projected position
    /// - sprites with an empty material are skipped
    /// - world rotation is counter clockwise, canvas rotation is clockwise
    pub fn draw_sprite(&self, sprite: &Sprite, camera: &OrthographicCamera) {
        let Some(image) = sprite.material().image() else {
            return;
        };
        let transform = sprite.transform();
        let center = camera.project(transform.position, self.viewport);
        let pixels = camera.pixels_per_unit(self.viewport);
        let width = transform.scale.x * pixels;
        let height = transform.scale.y * pixels;

        self.context.save();
        let drawn = self
            .context
            .translate(center.x, center.y)
            .and_then(|_| self.context.rotate(-transform.rotation))
            .and_then(|_| {
                self.context
                    .draw_image_with_html_image_element_and_dw_and_dh(
                        image,
                        -width * 0.5,
                        -height * 0.5,
                        width,
                        height,
                    )
            });
        self.context.restore();

        if let Err(err) = drawn {
            error!("Renderer: could not draw sprite : {:#?}", err);
        }
    }

    /// Mark a world position on screen, debug builds only
    #[cfg(debug_assertions)]
    pub fn draw_crosshair(&self, point: Point) {
        self.context.begin_path();
        self.context.set_stroke_style_str("#FF0000");
        self.context.move_to(point.x - 5.0, point.y);
        self.context.line_to(point.x + 5.0, point.y);
        self.context.move_to(point.x, point.y - 5.0);
        self.context.line_to(point.x, point.y + 5.0);
        self.context.stroke();
    }
}

/// Asynchronously load an image from a given source path
/// # Arguments
/// * `source` - string slice to path/url
/// # Returns
/// * `Ok(HtmlImageElement)` - on load success
/// * `Err` - on load fail
pub async fn load_image(source: &str) -> Result<HtmlImageElement> {
    let image = browser::create_html_image_element()?;
    let (tx, rx) = channel::<Result<(), Error>>();
    let success_tx = Rc::new(RefCell::new(Some(tx)));
    let error_tx = success_tx.clone();

    let success_callback = browser::closure_once(move |_: JsValue| {
        if let Some(tx) = success_tx.borrow_mut().take() {
            let _ = tx.send(Ok(()));
        }
    });

    let error_callback = browser::closure_once(move |err: JsValue| {
        if let Some(tx) = error_tx.borrow_mut().take() {
            let _ = tx.send(Err(anyhow!(
                "[engine.rs::load_image] Error loading image: {:#?}",
                err
            )));
        }
    });

    image.set_onload(Some(success_callback.as_ref().unchecked_ref()));
    image.set_onerror(Some(error_callback.as_ref().unchecked_ref()));
    image.set_src(source);

    // keep callback alive until image is loaded or errors
    success_callback.forget();
    error_callback.forget();

    // ?? - Result<Result<(), Error>, oneshot::Canceled>
    // - first ? yields channel result : Result<(), Error>
    // - second ? yields image load result : () or propagating Error
    rx.await??;

    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[derive(Default)]
    struct CountingGame {
        inputs: usize,
        updates: Vec<Frame>,
    }

    #[async_trait(?Send)]
    impl Game for CountingGame {
        async fn initialize(&self) -> Result<Box<dyn Game>> {
            Err(anyhow!("not used in tests"))
        }

        fn handle_input(&mut self, _press: &KeyPress) {
            self.inputs += 1;
        }

        fn update(&mut self, frame: &Frame) {
            self.updates.push(*frame);
        }

        fn draw(&self, _renderer: &Renderer) {}
    }

    fn game_loop(start: f64) -> (GameLoop, futures::channel::mpsc::UnboundedSender<KeyPress>) {
        let (tx, rx) = futures::channel::mpsc::unbounded();
        let game_loop = GameLoop {
            clock: FrameClock::new(start),
            input: rx,
        };
        (game_loop, tx)
    }

    #[test]
    fn clock_drops_ticks_shorter_than_a_frame() {
        let mut clock = FrameClock::new(1000.0);

        assert_eq!(clock.tick(1010.0), None);
        assert_eq!(clock.last_frame(), 1000.0);

        let frame = clock.tick(1017.0).expect("a full frame passes the gate");
        assert_relative_eq!(frame.delta, 17.0);
        assert_eq!(clock.last_frame(), 1017.0);
    }

    #[test]
    fn dropped_ticks_accumulate_into_the_next_delta() {
        let mut clock = FrameClock::new(0.0);
        assert!(clock.tick(10.0).is_none());
        assert!(clock.tick(15.0).is_none());

        let frame = clock.tick(20.0).expect("20ms is over a frame");
        assert_relative_eq!(frame.delta, 20.0);
        assert_relative_eq!(frame.fps(), 50.0);
    }

    #[test]
    fn gated_step_does_not_update_the_game() {
        let (mut game_loop, _tx) = game_loop(0.0);
        let mut game = CountingGame::default();

        assert!(game_loop.step(FRAME_SIZE - 0.5, &mut game).is_none());
        assert!(game.updates.is_empty());
        assert_eq!(game_loop.clock.last_frame(), 0.0);

        let frame = game_loop.step(17.0, &mut game).expect("frame accepted");
        assert_eq!(game.updates, vec![frame]);
        assert_eq!(game_loop.clock.last_frame(), 17.0);
    }

    #[test]
    fn input_is_forwarded_even_when_the_frame_is_gated() {
        let (mut game_loop, tx) = game_loop(0.0);
        let mut game = CountingGame::default();

        tx.unbounded_send(KeyPress::Down("w".into())).unwrap();
        tx.unbounded_send(KeyPress::Up("w".into())).unwrap();

        assert!(game_loop.step(1.0, &mut game).is_none());
        assert_eq!(game.inputs, 2);
        assert!(game.updates.is_empty());
    }

    #[test]
    fn draws_once_per_accepted_frame_and_never_on_gated_ticks() {
        let (mut game_loop, _tx) = game_loop(0.0);
        let mut game = CountingGame::default();
        let mut draws = Vec::new();

        for perf in [5.0, 10.0, 17.0, 20.0, 34.0, 40.0, 60.0] {
            game_loop.frame(perf, &mut game, |_| draws.push(perf));
        }

        assert_eq!(draws, vec![17.0, 34.0, 60.0]);
        assert_eq!(game.updates.len(), draws.len());
    }

    #[test]
    fn empty_viewport_has_no_aspect() {
        assert!(Size { width: 800.0, height: 0.0 }.aspect().is_err());
        assert!(Size::default().aspect().is_err());
        let aspect = Size { width: 800.0, height: 400.0 }.aspect().unwrap();
        assert_relative_eq!(aspect, 2.0);
    }
}
