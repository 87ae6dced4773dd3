use crate::bounds::{Bounds, HasBounds};

/// Line geometry: points, two-point line cells and optional point scalars
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolyData {
    pub points: Vec<[f64; 3]>,
    pub lines: Vec<[usize; 2]>,
    pub scalars: Option<Vec<f64>>,
}

impl PolyData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn number_of_points(&self) -> usize {
        self.points.len()
    }

    pub fn number_of_lines(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Endpoints of line cell `index`
    pub fn line_endpoints(&self, index: usize) -> ([f64; 3], [f64; 3]) {
        let [a, b] = self.lines[index];
        (self.points[a], self.points[b])
    }

    /// Scalar values at both endpoints of line cell `index`, if scalars exist
    pub fn line_scalars(&self, index: usize) -> Option<(f64, f64)> {
        let scalars = self.scalars.as_ref()?;
        let [a, b] = self.lines[index];
        Some((scalars[a], scalars[b]))
    }

    pub fn scalar_range(&self) -> Option<(f64, f64)> {
        let scalars = self.scalars.as_ref()?;
        scalars.iter().fold(None, |range, &s| match range {
            None => Some((s, s)),
            Some((lo, hi)) => Some((lo.min(s), hi.max(s))),
        })
    }
}

impl HasBounds for PolyData {
    fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.points.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(value: f64, x: f64) -> PolyData {
        PolyData {
            points: vec![[x, 0.0, 0.0], [x, 1.0, 0.0]],
            lines: vec![[0, 1]],
            scalars: Some(vec![value, value]),
        }
    }

    #[test]
    fn line_accessors_follow_cells() {
        let data = segment(2.0, 5.0);
        assert_eq!(data.line_endpoints(0), ([5.0, 0.0, 0.0], [5.0, 1.0, 0.0]));
        assert_eq!(data.line_scalars(0), Some((2.0, 2.0)));
        assert_eq!(data.scalar_range(), Some((2.0, 2.0)));

        let bounds = data.bounds().unwrap();
        assert_eq!(bounds.min, [5.0, 0.0, 0.0]);
        assert_eq!(bounds.max, [5.0, 1.0, 0.0]);
    }

    #[test]
    fn bare_geometry_has_no_scalars() {
        let mut data = segment(1.0, 0.0);
        data.scalars = None;
        assert_eq!(data.line_scalars(0), None);
        assert_eq!(data.scalar_range(), None);
        assert!(PolyData::new().bounds().is_none());
    }
}
