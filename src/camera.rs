use nalgebra::{Matrix3, Point2, Vector2};

use crate::bounds::Bounds;

/// Default vertical view angle in degrees
pub const DEFAULT_VIEW_ANGLE: f64 = 30.0;

/// Looks down the z axis at the xy plane.
///
/// `parallel_scale` is half the visible height in world units. Display
/// coordinates have their origin at the top-left pixel with y pointing down.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub focal_point: Point2<f64>,
    pub parallel_scale: f64,
    pub view_angle: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            focal_point: Point2::origin(),
            parallel_scale: 1.0,
            view_angle: DEFAULT_VIEW_ANGLE,
        }
    }
}

impl Camera {
    /// Center on `bounds` so its bounding sphere fits the view the way a
    /// perspective camera at the fitting distance would see it
    pub fn reset(&mut self, bounds: &Bounds) {
        let center = bounds.center();
        let mut radius = 0.5 * bounds.diagonal_length();
        if radius == 0.0 || !radius.is_finite() {
            radius = 1.0;
        }

        let half_angle = (0.5 * self.view_angle).to_radians();
        self.focal_point = Point2::new(center[0], center[1]);
        self.parallel_scale = radius / half_angle.cos();
    }

    /// Values above 1 move closer
    pub fn zoom(&mut self, factor: f64) {
        if factor > 0.0 && factor.is_finite() {
            self.parallel_scale /= factor;
        }
    }

    /// Shift the view by a display-space drag so the scene follows the cursor
    pub fn pan(&mut self, dx: f64, dy: f64, viewport: (usize, usize)) {
        let scale = self.pixels_per_unit(viewport);
        self.focal_point.x -= dx / scale;
        self.focal_point.y += dy / scale;
    }

    fn pixels_per_unit(&self, viewport: (usize, usize)) -> f64 {
        0.5 * viewport.1 as f64 / self.parallel_scale
    }

    /// Homogeneous world-to-display transform for a viewport of `(width, height)` pixels
    pub fn view_transform(&self, viewport: (usize, usize)) -> Matrix3<f64> {
        let scale = self.pixels_per_unit(viewport);
        let to_center = Matrix3::new_translation(&Vector2::new(
            0.5 * viewport.0 as f64,
            0.5 * viewport.1 as f64,
        ));
        let flip_scale = Matrix3::new_nonuniform_scaling(&Vector2::new(scale, -scale));
        let from_focus = Matrix3::new_translation(&(-self.focal_point.coords));
        to_center * flip_scale * from_focus
    }

    pub fn world_to_display(&self, point: &[f64; 3], viewport: (usize, usize)) -> (f64, f64) {
        let p = self
            .view_transform(viewport)
            .transform_point(&Point2::new(point[0], point[1]));
        (p.x, p.y)
    }

    pub fn display_to_world(&self, x: f64, y: f64, viewport: (usize, usize)) -> Option<(f64, f64)> {
        let inverse = self.view_transform(viewport).try_inverse()?;
        let p = inverse.transform_point(&Point2::new(x, y));
        Some((p.x, p.y))
    }
}
