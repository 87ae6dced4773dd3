use crate::bounds::{Bounds, HasBounds};
use crate::polydata::PolyData;

/// Number of colors in the default lookup table
pub const LOOKUP_TABLE_SIZE: usize = 256;

/// Maps scalars to colors along an HSV ramp (red to blue by default)
#[derive(Debug, Clone, PartialEq)]
pub struct LookupTable {
    range: (f64, f64),
    colors: Vec<[f64; 3]>,
}

fn hsv_to_rgb(h: f64, s: f64, v: f64) -> [f64; 3] {
    let h6 = (h.rem_euclid(1.0)) * 6.0;
    let sector = h6.floor() as u32 % 6;
    let f = h6 - h6.floor();
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match sector {
        0 => [v, t, p],
        1 => [q, v, p],
        2 => [p, v, t],
        3 => [p, q, v],
        4 => [t, p, v],
        _ => [v, p, q],
    }
}

impl Default for LookupTable {
    fn default() -> Self {
        Self::with_hue_range(0.0, 0.6667, (0.0, 1.0))
    }
}

impl LookupTable {
    /// Fully saturated, full value table sweeping `hue_start..=hue_end`
    pub fn with_hue_range(hue_start: f64, hue_end: f64, range: (f64, f64)) -> Self {
        let last = (LOOKUP_TABLE_SIZE - 1) as f64;
        let colors = (0..LOOKUP_TABLE_SIZE)
            .map(|i| {
                let h = hue_start + (hue_end - hue_start) * i as f64 / last;
                hsv_to_rgb(h, 1.0, 1.0)
            })
            .collect();

        Self { range, colors }
    }

    pub fn set_range(&mut self, range: (f64, f64)) {
        self.range = range;
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Color for `value`, clamped into the table range
    pub fn map_value(&self, value: f64) -> [f64; 3] {
        let (lo, hi) = self.range;
        let t = if hi > lo { (value - lo) / (hi - lo) } else { 0.0 };
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let index = (t * (self.colors.len() - 1) as f64).round() as usize;
        self.colors[index]
    }
}

/// A line segment ready for drawing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColoredSegment {
    pub start: [f64; 3],
    pub end: [f64; 3],
    pub start_color: [f64; 3],
    pub end_color: [f64; 3],
}

/// Turns line geometry into colored segments
#[derive(Debug, Clone)]
pub struct Mapper {
    input: PolyData,
    scalar_visibility: bool,
    lookup_table: LookupTable,
}

impl Mapper {
    pub fn new(input: PolyData) -> Self {
        let mut lookup_table = LookupTable::default();
        if let Some(range) = input.scalar_range() {
            lookup_table.set_range(range);
        }

        Self {
            input,
            scalar_visibility: true,
            lookup_table,
        }
    }

    pub fn input(&self) -> &PolyData {
        &self.input
    }

    pub fn set_scalar_range(&mut self, range: (f64, f64)) {
        self.lookup_table.set_range(range);
    }

    pub fn scalar_range(&self) -> (f64, f64) {
        self.lookup_table.range()
    }

    pub fn set_scalar_visibility(&mut self, visible: bool) {
        self.scalar_visibility = visible;
    }

    pub fn scalar_visibility(&self) -> bool {
        self.scalar_visibility
    }

    pub fn colored_segments<'a>(&'a self, fallback: [f64; 3]) -> impl Iterator<Item = ColoredSegment> + 'a {
        (0..self.input.number_of_lines()).map(move |index| {
            let (start, end) = self.input.line_endpoints(index);
            let (start_color, end_color) = match self.input.line_scalars(index) {
                Some((a, b)) if self.scalar_visibility => {
                    (self.lookup_table.map_value(a), self.lookup_table.map_value(b))
                }
                _ => (fallback, fallback),
            };
            ColoredSegment { start, end, start_color, end_color }
        })
    }
}

/// Visual style of an actor
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub color: [f64; 3],
    pub line_width: u32,
}

impl Default for Property {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            line_width: 1,
        }
    }
}

/// Geometry plus style, placed in a renderer
#[derive(Debug, Clone)]
pub struct Actor {
    pub mapper: Mapper,
    pub property: Property,
    pub visible: bool,
}

impl Actor {
    pub fn new(mapper: Mapper) -> Self {
        Self {
            mapper,
            property: Property::default(),
            visible: true,
        }
    }

    pub fn with_color(mut self, color: [f64; 3]) -> Self {
        self.property.color = color;
        self
    }

    pub fn with_line_width(mut self, width: u32) -> Self {
        self.property.line_width = width.max(1);
        self
    }

    pub fn segments(&self) -> impl Iterator<Item = ColoredSegment> + '_ {
        self.mapper.colored_segments(self.property.color)
    }
}

impl HasBounds for Actor {
    fn bounds(&self) -> Option<Bounds> {
        self.mapper.input().bounds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn level_segment(value: f64) -> PolyData {
        PolyData {
            points: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]],
            lines: vec![[0, 1]],
            scalars: Some(vec![value, value]),
        }
    }

    #[test]
    fn default_table_runs_red_to_blue() {
        let table = LookupTable::with_hue_range(0.0, 0.6667, (0.0, 10.0));
        assert_eq!(table.map_value(0.0), [1.0, 0.0, 0.0]);
        let blue = table.map_value(10.0);
        assert_approx_eq!(blue[2], 1.0);
        assert!(blue[0] < 0.01);
        // Clamped outside the range
        assert_eq!(table.map_value(-5.0), table.map_value(0.0));
        assert_eq!(table.map_value(50.0), blue);
    }

    #[test]
    fn mapper_colors_by_scalars_when_visible() {
        let mut mapper = Mapper::new(level_segment(5.0));
        mapper.set_scalar_range((0.0, 5.0));
        let segment = mapper.colored_segments([1.0, 1.0, 1.0]).next().unwrap();
        assert_ne!(segment.start_color, [1.0, 1.0, 1.0]);

        mapper.set_scalar_visibility(false);
        assert!(!mapper.scalar_visibility());
        let segment = mapper.colored_segments([1.0, 1.0, 1.0]).next().unwrap();
        assert_eq!(segment.start_color, [1.0, 1.0, 1.0]);
        assert_eq!(segment.end, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn actor_uses_property_color_without_scalars() {
        let mut data = level_segment(1.0);
        data.scalars = None;
        let actor = Actor::new(Mapper::new(data)).with_color([0.0, 1.0, 0.0]);
        let segments: Vec<_> = actor.segments().collect();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].end_color, [0.0, 1.0, 0.0]);
        assert!(actor.bounds().is_some());
    }
}
