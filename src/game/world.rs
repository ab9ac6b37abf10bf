use super::background::BackgroundTiler;
use super::obstacles::ObstacleField;
use super::player::Player;
use crate::config::GameConfig;
use crate::engine::scene::{Material, OrthographicCamera, Vec3};
use crate::engine::{Frame, Renderer};
use rand::Rng;
use std::rc::Rc;

/// Materials a world is built from, empty when their image failed to load
pub struct Materials {
    pub bird: Rc<Material>,
    pub background: Rc<Material>,
    pub obstacle: Rc<Material>,
}

impl Materials {
    pub fn empty() -> Self {
        Materials {
            bird: Material::empty(),
            background: Material::empty(),
            obstacle: Material::empty(),
        }
    }
}

/// What one accepted frame changed, for logging and debug readouts
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameReport {
    pub speed: f64,
    pub recycled: usize,
    pub player_x: f64,
}

/// Everything the frame driver advances
pub struct World {
    player: Player,
    background: BackgroundTiler,
    obstacles: ObstacleField,
    camera: OrthographicCamera,
}

impl World {
    pub fn new(config: &GameConfig, aspect: f64, materials: Materials, rng: &mut impl Rng) -> Self {
        let camera = OrthographicCamera::new(
            config.camera.frustum_size,
            aspect,
            Vec3::new(0.0, 0.0, config.camera.z),
        );
        World {
            player: Player::new(materials.bird, &config.player),
            background: BackgroundTiler::new(materials.background, &camera, &config.background),
            obstacles: ObstacleField::new(materials.obstacle, &camera, &config.obstacles, rng),
            camera,
        }
    }

    /// One accepted frame : kinematics, tiling, obstacles, camera
    pub fn update(&mut self, frame: &Frame, acceleration: f64) -> FrameReport {
        self.player.update(acceleration, frame.delta);
        let player_x = self.player.position().x;
        let recycled = self.background.update(player_x);
        self.obstacles.update(frame.time);
        self.camera.follow(player_x);

        FrameReport {
            speed: self.player.speed(),
            recycled,
            player_x,
        }
    }

    /// Back to front : background, obstacles, bird
    pub fn draw(&self, renderer: &Renderer) {
        renderer.clear();
        self.background
            .tiles()
            .for_each(|tile| renderer.draw_sprite(tile, &self.camera));
        self.obstacles
            .obstacles()
            .iter()
            .for_each(|obstacle| renderer.draw_sprite(obstacle, &self.camera));
        renderer.draw_sprite(&self.player.sprite(), &self.camera);

        #[cfg(debug_assertions)]
        renderer.draw_crosshair(
            self.camera
                .project(self.player.position(), renderer.viewport()),
        );
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn camera(&self) -> &OrthographicCamera {
        &self.camera
    }

    pub fn background(&self) -> &BackgroundTiler {
        &self.background
    }

    pub fn obstacles(&self) -> &ObstacleField {
        &self.obstacles
    }
}
