/// Axis-aligned bounding box in world coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

/// Anything that occupies a region of world space
pub trait HasBounds {
    /// Bounds of the data, or `None` when there is nothing to bound
    fn bounds(&self) -> Option<Bounds>;
}

impl Bounds {
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a [f64; 3]>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Bounds::new(*first, *first);
        for p in iter {
            bounds.include(p);
        }
        Some(bounds)
    }

    /// Grow the box to contain `p`
    pub fn include(&mut self, p: &[f64; 3]) {
        for axis in 0..3 {
            self.min[axis] = self.min[axis].min(p[axis]);
            self.max[axis] = self.max[axis].max(p[axis]);
        }
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        let mut merged = *self;
        merged.include(&other.min);
        merged.include(&other.max);
        merged
    }

    pub fn center(&self) -> [f64; 3] {
        [
            0.5 * (self.min[0] + self.max[0]),
            0.5 * (self.min[1] + self.max[1]),
            0.5 * (self.min[2] + self.max[2]),
        ]
    }

    pub fn extents(&self) -> [f64; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    pub fn diagonal_length(&self) -> f64 {
        let [dx, dy, dz] = self.extents();
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}
