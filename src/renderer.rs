use image::{Rgba, RgbaImage};
use log::debug;

use crate::bounds::{Bounds, HasBounds};
use crate::camera::Camera;
use crate::raster::{draw_line, pack_rgb, unpack_rgb};
use crate::scene::Actor;

/// Pixels in 0x00RRGGBB, row-major from the top-left corner
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    pub fn clear(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.width + x]
    }

    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let [r, g, b] = unpack_rgb(self.pixel(x as usize, y as usize));
            Rgba([r, g, b, 255])
        })
    }
}

/// A scene of actors drawn over a solid background
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    actors: Vec<Actor>,
    background: [f64; 3],
    pub camera: Camera,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Actors draw in insertion order, later ones on top
    pub fn add_actor(&mut self, actor: Actor) -> usize {
        self.actors.push(actor);
        self.actors.len() - 1
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn actor_mut(&mut self, index: usize) -> Option<&mut Actor> {
        self.actors.get_mut(index)
    }

    pub fn set_background(&mut self, rgb: [f64; 3]) {
        self.background = rgb;
    }

    pub fn background(&self) -> [f64; 3] {
        self.background
    }

    /// Union of the bounds of visible actors
    pub fn visible_bounds(&self) -> Option<Bounds> {
        self.actors
            .iter()
            .filter(|actor| actor.visible)
            .filter_map(HasBounds::bounds)
            .reduce(|a, b| a.union(&b))
    }

    /// Fit the camera to everything visible; a no-op on an empty scene
    pub fn reset_camera(&mut self) {
        if let Some(bounds) = self.visible_bounds() {
            self.camera.reset(&bounds);
            debug!(
                "Camera reset: focal point ({:.2}, {:.2}), parallel scale {:.2}",
                self.camera.focal_point.x, self.camera.focal_point.y, self.camera.parallel_scale
            );
        }
    }

    pub fn render(&self, frame: &mut FrameBuffer) {
        frame.clear(pack_rgb(self.background));
        let viewport = (frame.width, frame.height);

        for actor in self.actors.iter().filter(|a| a.visible) {
            let width = actor.property.line_width.max(1) as usize;
            for segment in actor.segments() {
                let start = self.camera.world_to_display(&segment.start, viewport);
                let end = self.camera.world_to_display(&segment.end, viewport);
                draw_line(
                    &mut frame.pixels,
                    start,
                    end,
                    segment.start_color,
                    segment.end_color,
                    width,
                    frame.width,
                    frame.height,
                );
            }
        }
    }
}

/// Render offscreen into an RGBA image of the given size
pub fn render_to_image(renderer: &Renderer, width: usize, height: usize) -> RgbaImage {
    let mut frame = FrameBuffer::new(width, height);
    renderer.render(&mut frame);
    frame.to_rgba_image()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::OutlineFilter;
    use crate::scene::Mapper;

    fn outline_renderer() -> Renderer {
        let bounds = Bounds::new([0.0, 0.0, 0.0], [99.0, 99.0, 0.0]);
        let mut renderer = Renderer::new();
        renderer.add_actor(Actor::new(Mapper::new(OutlineFilter::from_bounds(&bounds))));
        renderer.reset_camera();
        renderer
    }

    #[test]
    fn paints_background_and_lines() {
        let mut renderer = outline_renderer();
        renderer.set_background([0.0, 0.0, 1.0]);
        let mut frame = FrameBuffer::new(50, 50);
        renderer.render(&mut frame);

        assert_eq!(frame.pixel(0, 0), 0x0000FF);
        assert_eq!(frame.pixel(25, 25), 0x0000FF);
        assert!(frame.pixels.iter().any(|&p| p == 0xFFFFFF));
    }

    #[test]
    fn hidden_actors_are_skipped() {
        let mut renderer = outline_renderer();
        renderer.actor_mut(0).unwrap().visible = false;
        let image = render_to_image(&renderer, 40, 30);
        assert_eq!(image.dimensions(), (40, 30));
        assert!(image.pixels().all(|p| p.0 == [0, 0, 0, 255]));
        assert!(renderer.visible_bounds().is_none());
    }

    #[test]
    fn outline_is_symmetric_after_reset() {
        let renderer = outline_renderer();
        let mut frame = FrameBuffer::new(60, 60);
        renderer.render(&mut frame);

        let lit: Vec<usize> = (0..60).filter(|&x| frame.pixel(x, 30) != 0).collect();
        assert_eq!(lit.len(), 2);
        let mirrored = (lit[0] + lit[1]) as isize;
        assert!((mirrored - 60).abs() <= 1);
    }
}
