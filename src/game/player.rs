use crate::config::PlayerConfig;
use crate::engine::scene::{Material, Scale, Sprite, Transform, Vec3};
use std::rc::Rc;

/// Vertical flight model
/// - thrust accelerates up to `max_speed` in either direction
/// - without thrust the speed bleeds back toward zero
/// - the bird always cruises right at `move_speed`
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Kinematics {
    pub max_speed: f64,
    pub deceleration: f64,
    pub move_speed: f64,
    /// radians
    pub max_tilt: f64,
}

impl Kinematics {
    pub fn from_config(config: &PlayerConfig) -> Self {
        Kinematics {
            max_speed: config.max_speed,
            deceleration: config.deceleration,
            move_speed: config.move_speed,
            max_tilt: config.max_tilt_degrees.to_radians(),
        }
    }

    /// New vertical speed after `delta` milliseconds under `acceleration`
    pub fn integrate(&self, speed: f64, acceleration: f64, delta: f64) -> f64 {
        if acceleration != 0.0 {
            (speed + acceleration * delta).clamp(-self.max_speed, self.max_speed)
        } else if speed > 0.0 {
            (speed - self.deceleration * delta).max(0.0)
        } else {
            (speed + self.deceleration * delta).min(0.0)
        }
    }

    pub fn tilt(&self, speed: f64) -> f64 {
        speed / self.max_speed * self.max_tilt
    }
}

/// Player : a transform-only root that moves, with the bird sprite riding on
/// it and carrying the tilt
#[derive(Debug, Clone)]
pub struct Player {
    root: Transform,
    bird: Sprite,
    speed: f64,
    kinematics: Kinematics,
}

impl Player {
    pub fn new(material: Rc<Material>, config: &PlayerConfig) -> Self {
        Player {
            root: Transform::default(),
            bird: Sprite::new(
                material,
                Transform::default().with_scale(Scale::uniform(config.size)),
            ),
            speed: 0.0,
            kinematics: Kinematics::from_config(config),
        }
    }

    pub fn update(&mut self, acceleration: f64, delta: f64) {
        self.speed = self.kinematics.integrate(self.speed, acceleration, delta);
        self.root
            .translate(self.kinematics.move_speed * delta, self.speed * delta);
        self.bird.transform_mut().rotation = self.kinematics.tilt(self.speed);
    }

    pub fn position(&self) -> Vec3 {
        self.root.position
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn tilt(&self) -> f64 {
        self.bird.transform().rotation
    }

    /// The bird as it should be drawn, placed in world space
    pub fn sprite(&self) -> Sprite {
        let mut sprite = self.bird.clone();
        *sprite.transform_mut() = self.bird.transform().in_parent(&self.root);
        sprite
    }
}
