use crate::config::BackgroundConfig;
use crate::engine::scene::{Material, OrthographicCamera, Scale, Sprite, Transform, Vec3};
use std::collections::VecDeque;
use std::rc::Rc;

/// Endless background made of a fixed ring of tiles
///
/// ┌──────┬──────┬──────┬──────┬──────┬──────┐
/// │front │      │ camera view │      │ tail │
/// └──────┴──────┴──────┴──────┴──────┴──────┘
///    │                                  ▲
///    └──── player crossed a tile ───────┘
///
/// - the ring never grows or shrinks, tiles are only moved
/// - a recycled tile lands exactly one tile width after the tail
pub struct BackgroundTiler {
    tiles: VecDeque<Sprite>,
    tile_width: f64,
    tiles_crossed: i64,
}

impl BackgroundTiler {
    pub fn new(
        material: Rc<Material>,
        camera: &OrthographicCamera,
        config: &BackgroundConfig,
    ) -> Self {
        let tile_width = camera.frustum_size * config.tile_width_ratio;
        let count = Self::tile_count(camera.view_width(), tile_width);
        // one spare tile behind the left edge of the view
        let left_edge = camera.left() - tile_width;

        let tiles = (0..count)
            .map(|i| {
                let x = left_edge + tile_width * (i as f64 + 0.5);
                Sprite::new(
                    material.clone(),
                    Transform::at(Vec3::new(x, 0.0, config.depth)).with_scale(Scale {
                        x: tile_width,
                        y: camera.frustum_size,
                    }),
                )
            })
            .collect();

        BackgroundTiler {
            tiles,
            tile_width,
            tiles_crossed: 0,
        }
    }

    /// Enough tiles for the view, one behind it, and two ahead of it so the
    /// view is still covered right before the next recycle
    pub fn tile_count(view_width: f64, tile_width: f64) -> usize {
        (view_width / tile_width).ceil() as usize + 3
    }

    /// Recycle one tile for every tile boundary the player crossed since the
    /// last update, returns the number of recycled tiles
    pub fn update(&mut self, player_x: f64) -> usize {
        let crossed = (player_x / self.tile_width).floor() as i64;
        let mut recycled = 0;
        while self.tiles_crossed < crossed {
            self.recycle();
            self.tiles_crossed += 1;
            recycled += 1;
        }
        recycled
    }

    /// Move the front tile right after the tail
    pub fn recycle(&mut self) {
        let Some(tail_x) = self.tail_x() else {
            return;
        };
        if let Some(mut tile) = self.tiles.pop_front() {
            tile.transform_mut().position.x = tail_x + self.tile_width;
            self.tiles.push_back(tile);
        }
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Sprite> {
        self.tiles.iter()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn tile_width(&self) -> f64 {
        self.tile_width
    }

    pub fn tail_x(&self) -> Option<f64> {
        self.tiles.back().map(Sprite::x)
    }

    /// Leftmost and rightmost world x covered by the ring
    pub fn span(&self) -> Option<(f64, f64)> {
        let half = self.tile_width * 0.5;
        let front = self.tiles.front()?.x() - half;
        let tail = self.tiles.back()?.x() + half;
        Some((front, tail))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn camera(aspect: f64) -> OrthographicCamera {
        OrthographicCamera::new(15.0, aspect, Vec3::new(0.0, 0.0, 5.0))
    }

    fn tiler(camera: &OrthographicCamera) -> BackgroundTiler {
        BackgroundTiler::new(Material::empty(), camera, &BackgroundConfig::default())
    }

    #[test]
    fn tiles_are_laid_edge_to_edge() {
        let tiler = tiler(&camera(16.0 / 9.0));
        assert_relative_eq!(tiler.tile_width(), 7.5);
        // ceil(26.67 / 7.5) + 3
        assert_eq!(tiler.len(), 7);

        let xs: Vec<f64> = tiler.tiles().map(Sprite::x).collect();
        for pair in xs.windows(2) {
            assert_relative_eq!(pair[1] - pair[0], 7.5, max_relative = 1e-9);
        }
        for tile in tiler.tiles() {
            assert_eq!(tile.transform().position.z, -2.0);
            assert_eq!(tile.transform().scale, Scale { x: 7.5, y: 15.0 });
        }
    }

    #[test]
    fn ring_size_survives_many_recycles() {
        let mut tiler = tiler(&camera(1.0));
        assert_eq!(tiler.len(), 5);
        for _ in 0..1000 {
            tiler.recycle();
        }
        assert_eq!(tiler.len(), 5);
    }

    #[test]
    fn recycled_tile_lands_one_width_after_the_tail() {
        let mut tiler = tiler(&camera(16.0 / 9.0));
        for _ in 0..50 {
            let tail = tiler.tail_x().unwrap();
            let front = tiler.tiles().next().unwrap().x();
            tiler.recycle();
            assert_eq!(tiler.tail_x().unwrap(), tail + tiler.tile_width());
            assert_ne!(tiler.tiles().next().unwrap().x(), front);
        }
    }

    #[test]
    fn update_recycles_once_per_tile_crossed() {
        let mut tiler = tiler(&camera(16.0 / 9.0));
        assert_eq!(tiler.update(0.0), 0);
        assert_eq!(tiler.update(7.4), 0);
        assert_eq!(tiler.update(7.5), 1);
        assert_eq!(tiler.update(14.0), 0);
        // a long frame can cross several tiles at once
        assert_eq!(tiler.update(38.0), 4);
        assert_eq!(tiler.update(38.0), 0);
    }

    #[test]
    fn ring_covers_the_view_while_scrolling() {
        for aspect in [0.5, 1.0, 4.0 / 3.0, 16.0 / 9.0, 21.0 / 9.0, 3.0] {
            let mut camera = camera(aspect);
            let mut tiler = tiler(&camera);
            let mut x = 0.0;
            while x < 500.0 {
                tiler.update(x);
                camera.follow(x);
                let (left, right) = tiler.span().unwrap();
                assert!(left <= camera.left() - tiler.tile_width() + 1e-9);
                assert!(right >= camera.right() + tiler.tile_width() - 1e-9);
                x += 0.083;
            }
        }
    }
}
