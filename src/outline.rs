use crate::bounds::{Bounds, HasBounds};
use crate::polydata::PolyData;

/// Box edges as pairs of corner indices
const BOX_EDGES: [[usize; 2]; 12] = [
    [0, 1], [2, 3], [4, 5], [6, 7],
    [0, 2], [1, 3], [4, 6], [5, 7],
    [0, 4], [1, 5], [2, 6], [3, 7],
];

/// Wireframe box around the bounds of its input
#[derive(Debug, Clone, Copy, Default)]
pub struct OutlineFilter;

impl OutlineFilter {
    pub fn new() -> Self {
        Self
    }

    /// Outline of any bounded input; empty when the input has no bounds
    pub fn execute<T: HasBounds + ?Sized>(&self, input: &T) -> PolyData {
        match input.bounds() {
            Some(bounds) => Self::from_bounds(&bounds),
            None => PolyData::new(),
        }
    }

    /// Eight corners (x varies fastest, then y, then z) and twelve edges.
    /// Flat bounds give a degenerate box with coincident z faces.
    pub fn from_bounds(bounds: &Bounds) -> PolyData {
        let (lo, hi) = (bounds.min, bounds.max);
        let mut points = Vec::with_capacity(8);
        for z in [lo[2], hi[2]] {
            for y in [lo[1], hi[1]] {
                for x in [lo[0], hi[0]] {
                    points.push([x, y, z]);
                }
            }
        }

        PolyData {
            points,
            lines: BOX_EDGES.to_vec(),
            scalars: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_data::ImageData;

    #[test]
    fn image_outline_is_flat_box() {
        let image = ImageData::from_fn(256, 128, |_, _| 0.0);
        let outline = OutlineFilter::new().execute(&image);

        assert_eq!(outline.number_of_points(), 8);
        assert_eq!(outline.number_of_lines(), 12);
        assert_eq!(outline.points[0], [0.0, 0.0, 0.0]);
        assert_eq!(outline.points[3], [255.0, 127.0, 0.0]);
        assert_eq!(outline.points[7], [255.0, 127.0, 0.0]);
        assert_eq!(outline.bounds(), image.bounds());
    }

    #[test]
    fn every_corner_has_three_edges() {
        let bounds = Bounds::new([0.0, 0.0, 0.0], [1.0, 2.0, 3.0]);
        let outline = OutlineFilter::from_bounds(&bounds);
        let mut uses = [0; 8];
        for (index, [a, b]) in outline.lines.iter().enumerate() {
            uses[*a] += 1;
            uses[*b] += 1;
            let (p, q) = outline.line_endpoints(index);
            let differing = (0..3).filter(|&axis| p[axis] != q[axis]).count();
            assert_eq!(differing, 1);
        }
        assert!(uses.iter().all(|&n| n == 3));
    }

    #[test]
    fn unbounded_input_gives_empty_outline() {
        let outline = OutlineFilter::new().execute(&PolyData::new());
        assert!(outline.is_empty());
    }
}
