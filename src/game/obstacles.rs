use crate::config::ObstacleConfig;
use crate::engine::scene::{Material, OrthographicCamera, Scale, Sprite, Transform, Vec3};
use rand::Rng;
use std::rc::Rc;

/// Shared breathing animation : `base + amplitude * sin(time / period)`
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Pulse {
    pub base: f64,
    pub amplitude: f64,
    pub period: f64,
}

impl Pulse {
    pub fn scale_at(&self, time: f64) -> f64 {
        self.base + self.amplitude * (time / self.period).sin()
    }
}

/// Row of obstacles placed once at startup
/// - evenly spaced on x, random y inside the view
/// - every obstacle pulses with the same phase
/// - nothing despawns, respawns or collides
pub struct ObstacleField {
    obstacles: Vec<Sprite>,
    pulse: Pulse,
}

impl ObstacleField {
    pub fn new(
        material: Rc<Material>,
        camera: &OrthographicCamera,
        config: &ObstacleConfig,
        rng: &mut impl Rng,
    ) -> Self {
        let count = Self::count(camera.view_width(), config);
        let half_height = camera.frustum_size * 0.5;
        let pulse = Pulse {
            base: config.base_scale,
            amplitude: config.amplitude,
            period: config.period,
        };

        let obstacles = (1..=count)
            .map(|i| {
                let x = config.start_offset + config.distance * i as f64;
                let y = rng.gen_range(-half_height..=half_height);
                Sprite::new(
                    material.clone(),
                    Transform::at(Vec3::new(x, y, config.depth))
                        .with_scale(Scale::uniform(pulse.base)),
                )
            })
            .collect();

        ObstacleField { obstacles, pulse }
    }

    /// Obstacles covering the first screen, plus the configured extra run
    pub fn count(view_width: f64, config: &ObstacleConfig) -> usize {
        (view_width.ceil() / config.distance).ceil() as usize + config.extra
    }

    /// Apply the pulse for `time` (milliseconds) to every obstacle
    pub fn update(&mut self, time: f64) {
        let scale = Scale::uniform(self.pulse.scale_at(time));
        for obstacle in self.obstacles.iter_mut() {
            obstacle.transform_mut().scale = scale;
        }
    }

    pub fn obstacles(&self) -> &[Sprite] {
        &self.obstacles
    }
}
