use super::{Point, Size};
use std::ops::Add;
use std::rc::Rc;
use web_sys::HtmlImageElement;

/// World space position, y up, z toward the camera
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Vec3 { x, y, z }
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Scale {
    pub x: f64,
    pub y: f64,
}

impl Scale {
    pub const fn uniform(value: f64) -> Self {
        Scale { x: value, y: value }
    }
}

impl Default for Scale {
    fn default() -> Self {
        Scale::uniform(1.0)
    }
}

/// Transform-only scene node
/// - rotation is in radians, counter clockwise about the view axis
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: f64,
    pub scale: Scale,
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Transform {
            position,
            ..Default::default()
        }
    }

    pub fn with_scale(mut self, scale: Scale) -> Self {
        self.scale = scale;
        self
    }

    pub fn translate(&mut self, x: f64, y: f64) {
        self.position.x += x;
        self.position.y += y;
    }

    /// Express a child transform in the parent's space
    /// - parents here never rotate or scale their children, only offset them
    pub fn in_parent(&self, parent: &Transform) -> Transform {
        Transform {
            position: parent.position + self.position,
            rotation: parent.rotation + self.rotation,
            scale: self.scale,
        }
    }
}

/// Texture shared by every sprite drawn with it
/// - an empty material (failed or skipped load) draws nothing
#[derive(Debug, Default)]
pub struct Material {
    image: Option<HtmlImageElement>,
}

impl Material {
    pub fn empty() -> Rc<Material> {
        Rc::new(Material { image: None })
    }

    pub fn from_image(image: HtmlImageElement) -> Rc<Material> {
        Rc::new(Material { image: Some(image) })
    }

    pub fn image(&self) -> Option<&HtmlImageElement> {
        self.image.as_ref()
    }
}

/// Renderable : a transform plus the material drawn at it
#[derive(Debug, Clone)]
pub struct Sprite {
    transform: Transform,
    material: Rc<Material>,
}

impl Sprite {
    pub fn new(material: Rc<Material>, transform: Transform) -> Self {
        Sprite {
            transform,
            material,
        }
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn x(&self) -> f64 {
        self.transform.position.x
    }
}

/// Orthographic camera described by its vertical extent
/// ┌──────────── frustum_size * aspect ────────────┐
/// │                                               │ frustum_size
/// │                   position                    │
/// │                                               │
/// └───────────────────────────────────────────────┘
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrthographicCamera {
    pub frustum_size: f64,
    pub aspect: f64,
    pub position: Vec3,
}

impl OrthographicCamera {
    pub fn new(frustum_size: f64, aspect: f64, position: Vec3) -> Self {
        OrthographicCamera {
            frustum_size,
            aspect,
            position,
        }
    }

    pub fn view_width(&self) -> f64 {
        self.frustum_size * self.aspect
    }

    pub fn left(&self) -> f64 {
        self.position.x - self.view_width() * 0.5
    }

    pub fn right(&self) -> f64 {
        self.position.x + self.view_width() * 0.5
    }

    /// Track a target horizontally, y and z never move
    pub fn follow(&mut self, x: f64) {
        self.position.x = x;
    }

    pub fn pixels_per_unit(&self, viewport: Size) -> f64 {
        viewport.height / self.frustum_size
    }

    /// World position to canvas pixels, canvas y grows downward
    pub fn project(&self, world: Vec3, viewport: Size) -> Point {
        let pixels = self.pixels_per_unit(viewport);
        Point {
            x: viewport.width * 0.5 + (world.x - self.position.x) * pixels,
            y: viewport.height * 0.5 - (world.y - self.position.y) * pixels,
        }
    }
}
