// src/gui/state.rs - Viewer state shared by the event and render steps

use crate::pipeline::{CONTOUR_ACTOR, OUTLINE_ACTOR};
use crate::renderer::{FrameBuffer, Renderer};

/// Zoom applied per scroll-wheel notch
pub const WHEEL_ZOOM_STEP: f64 = 1.1;
/// Zoom exponent per pixel of vertical right-drag
pub const DRAG_ZOOM_RATE: f64 = 0.01;

/// What the current mouse drag does to the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Pan,
    Zoom,
}

/// Interactive viewer state
pub struct ViewerState {
    pub renderer: Renderer,
    pub frame: FrameBuffer,

    // Mouse state
    pub mouse_x: f32,
    pub mouse_y: f32,
    pub drag: Option<DragMode>,

    pub needs_render: bool,
    pub quit: bool,
    pub status_message: String,
}

impl ViewerState {
    pub fn new(renderer: Renderer, width: usize, height: usize) -> Self {
        Self {
            renderer,
            frame: FrameBuffer::new(width, height),
            mouse_x: 0.0,
            mouse_y: 0.0,
            drag: None,
            needs_render: true,
            quit: false,
            status_message: String::new(),
        }
    }

    pub fn viewport(&self) -> (usize, usize) {
        (self.frame.width, self.frame.height)
    }

    pub fn render(&mut self) {
        self.renderer.render(&mut self.frame);
        self.needs_render = false;
    }

    pub fn reset_camera(&mut self) {
        self.renderer.reset_camera();
        self.status_message = "Camera reset".to_string();
        self.needs_render = true;
    }

    pub fn zoom(&mut self, factor: f64) {
        self.renderer.camera.zoom(factor);
        self.needs_render = true;
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        let viewport = self.viewport();
        self.renderer.camera.pan(dx, dy, viewport);
        self.needs_render = true;
    }

    /// Apply a mouse move while dragging
    pub fn drag_to(&mut self, x: f32, y: f32) {
        let dx = (x - self.mouse_x) as f64;
        let dy = (y - self.mouse_y) as f64;
        match self.drag {
            Some(DragMode::Pan) => self.pan(dx, dy),
            // Dragging up zooms in
            Some(DragMode::Zoom) => self.zoom((-dy * DRAG_ZOOM_RATE).exp()),
            None => {}
        }
        self.mouse_x = x;
        self.mouse_y = y;
    }

    pub fn toggle_scalar_coloring(&mut self) {
        if let Some(actor) = self.renderer.actor_mut(CONTOUR_ACTOR) {
            let visible = !actor.mapper.scalar_visibility();
            actor.mapper.set_scalar_visibility(visible);
            self.status_message = format!("Scalar coloring: {}", if visible { "ON" } else { "OFF" });
            self.needs_render = true;
        }
    }

    pub fn toggle_outline(&mut self) {
        if let Some(actor) = self.renderer.actor_mut(OUTLINE_ACTOR) {
            actor.visible = !actor.visible;
            self.status_message = format!("Outline: {}", if actor.visible { "ON" } else { "OFF" });
            self.needs_render = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::Bounds;
    use crate::outline::OutlineFilter;
    use crate::polydata::PolyData;
    use crate::scene::{Actor, Mapper};
    use assert_approx_eq::assert_approx_eq;

    fn state() -> ViewerState {
        let bounds = Bounds::new([0.0, 0.0, 0.0], [10.0, 10.0, 0.0]);
        let mut renderer = Renderer::new();
        renderer.add_actor(Actor::new(Mapper::new(OutlineFilter::from_bounds(&bounds))));
        let contours = PolyData {
            points: vec![[1.0, 1.0, 0.0], [9.0, 9.0, 0.0]],
            lines: vec![[0, 1]],
            scalars: Some(vec![3.0, 3.0]),
        };
        let mut mapper = Mapper::new(contours);
        mapper.set_scalar_visibility(false);
        renderer.add_actor(Actor::new(mapper));
        renderer.reset_camera();
        ViewerState::new(renderer, 100, 100)
    }

    #[test]
    fn toggles_flip_actor_settings() {
        let mut state = state();
        state.render();
        assert!(!state.needs_render);

        state.toggle_scalar_coloring();
        assert!(state.renderer.actors()[CONTOUR_ACTOR].mapper.scalar_visibility());
        state.toggle_outline();
        assert!(!state.renderer.actors()[OUTLINE_ACTOR].visible);
        assert!(state.needs_render);
    }

    #[test]
    fn dragging_up_zooms_in_and_reset_restores() {
        let mut state = state();
        let initial = state.renderer.camera.parallel_scale;

        state.mouse_y = 50.0;
        state.drag = Some(DragMode::Zoom);
        state.drag_to(0.0, 20.0);
        assert!(state.renderer.camera.parallel_scale < initial);

        state.reset_camera();
        assert_approx_eq!(state.renderer.camera.parallel_scale, initial);
    }
}
