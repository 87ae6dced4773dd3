use crate::bounds::{Bounds, HasBounds};
use crate::errors::{IsoContourError, Result};

/// 2D structured points with interleaved per-point scalars.
///
/// Point `(i, j)` lives at `origin + (i * spacing[0], j * spacing[1], 0)`.
/// Row `j = 0` is the bottom of the image; y grows upward.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    dimensions: [usize; 2],
    origin: [f64; 3],
    spacing: [f64; 3],
    num_components: usize,
    scalars: Vec<f64>,
}

impl ImageData {
    /// Build an image from interleaved scalars laid out row by row
    pub fn new(dimensions: [usize; 2], num_components: usize, scalars: Vec<f64>) -> Result<Self> {
        if num_components == 0 {
            return Err(IsoContourError::InvalidImage(
                "image must have at least one scalar component".to_string(),
            ));
        }

        let expected = dimensions[0] * dimensions[1] * num_components;
        if scalars.len() != expected {
            return Err(IsoContourError::InvalidImage(format!(
                "expected {} scalars for {}x{}x{}, got {}",
                expected,
                dimensions[0],
                dimensions[1],
                num_components,
                scalars.len()
            )));
        }

        Ok(Self {
            dimensions,
            origin: [0.0; 3],
            spacing: [1.0; 3],
            num_components,
            scalars,
        })
    }

    /// Single-component image from a closure evaluated at every point
    pub fn from_fn<F>(nx: usize, ny: usize, f: F) -> Self
    where
        F: Fn(usize, usize) -> f64,
    {
        let mut scalars = Vec::with_capacity(nx * ny);
        for j in 0..ny {
            for i in 0..nx {
                scalars.push(f(i, j));
            }
        }

        Self {
            dimensions: [nx, ny],
            origin: [0.0; 3],
            spacing: [1.0; 3],
            num_components: 1,
            scalars,
        }
    }

    pub fn with_origin(mut self, origin: [f64; 3]) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_spacing(mut self, spacing: [f64; 3]) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn dimensions(&self) -> [usize; 2] {
        self.dimensions
    }

    pub fn origin(&self) -> [f64; 3] {
        self.origin
    }

    pub fn spacing(&self) -> [f64; 3] {
        self.spacing
    }

    pub fn num_components(&self) -> usize {
        self.num_components
    }

    pub fn number_of_points(&self) -> usize {
        self.dimensions[0] * self.dimensions[1]
    }

    /// Scalar at point `(i, j)` for one component
    #[inline]
    pub fn scalar(&self, i: usize, j: usize, component: usize) -> f64 {
        self.scalars[(j * self.dimensions[0] + i) * self.num_components + component]
    }

    /// World position of point `(i, j)`
    #[inline]
    pub fn point(&self, i: usize, j: usize) -> [f64; 3] {
        [
            self.origin[0] + i as f64 * self.spacing[0],
            self.origin[1] + j as f64 * self.spacing[1],
            self.origin[2],
        ]
    }

    /// Minimum and maximum of one component, skipping NaN samples
    pub fn scalar_range(&self, component: usize) -> Option<(f64, f64)> {
        if component >= self.num_components {
            return None;
        }

        self.scalars
            .iter()
            .skip(component)
            .step_by(self.num_components)
            .filter(|s| !s.is_nan())
            .fold(None, |range, &s| match range {
                None => Some((s, s)),
                Some((lo, hi)) => Some((lo.min(s), hi.max(s))),
            })
    }
}

impl HasBounds for ImageData {
    fn bounds(&self) -> Option<Bounds> {
        let [nx, ny] = self.dimensions;
        if nx == 0 || ny == 0 {
            return None;
        }
        let a = self.point(0, 0);
        let b = self.point(nx - 1, ny - 1);
        // Negative spacing flips the corners
        Bounds::from_points([a, b].iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_scalar_count() {
        let err = ImageData::new([2, 2], 1, vec![0.0; 3]).unwrap_err();
        assert!(matches!(err, IsoContourError::InvalidImage(_)));
    }

    #[test]
    fn range_is_per_component_and_skips_nan() {
        let scalars = vec![1.0, 10.0, f64::NAN, 20.0, -3.0, 30.0, 4.0, 40.0];
        let image = ImageData::new([2, 2], 2, scalars).unwrap();
        assert_eq!(image.scalar_range(0), Some((-3.0, 4.0)));
        assert_eq!(image.scalar_range(1), Some((10.0, 40.0)));
        assert_eq!(image.scalar_range(2), None);
        assert_eq!(image.scalar(1, 1, 1), 40.0);
    }

    #[test]
    fn bounds_follow_origin_and_spacing() {
        let image = ImageData::from_fn(5, 3, |i, j| (i + j) as f64)
            .with_origin([10.0, 20.0, 1.0])
            .with_spacing([0.5, 2.0, 1.0]);
        let b = image.bounds().unwrap();
        assert_eq!(b.min, [10.0, 20.0, 1.0]);
        assert_eq!(b.max, [12.0, 24.0, 1.0]);
    }
}
