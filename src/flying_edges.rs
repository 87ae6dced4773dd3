//! Flying-edges contouring of 2D images.
//!
//! Each contour level is processed in four passes over image rows:
//!
//! 1. classify every x-edge of every row and record the span of crossings,
//! 2. for each pair of neighbouring rows, count the y-edge crossings and
//!    line segments inside the trimmed span,
//! 3. prefix-sum the per-row counts into output offsets,
//! 4. write points and lines for every row into its own slice of the output.
//!
//! Passes 1, 2 and 4 are independent per row and run on rayon when enabled.
//! Output is identical in serial and parallel mode.

use log::{debug, warn};
use rayon::prelude::*;

use crate::contour_values::ContourValues;
use crate::errors::{IsoContourError, Result};
use crate::image_data::ImageData;
use crate::polydata::PolyData;

// x-edge cases: bit 0 is the left vertex, bit 1 the right vertex
const BELOW: u8 = 0;
const LEFT_ABOVE: u8 = 1;
const RIGHT_ABOVE: u8 = 2;

// Cell edges: 0 = bottom x-edge, 1 = top x-edge, 2 = left y-edge, 3 = right y-edge
const NO_ID: usize = usize::MAX;

/// Segments per cell case. Case bit k is set when vertex k is above the level,
/// with v0 = (i, j), v1 = (i + 1, j), v2 = (i, j + 1), v3 = (i + 1, j + 1).
/// Segments keep the above region on their left.
const LINE_CASES: [&[[usize; 2]]; 16] = [
    &[],
    &[[0, 2]],
    &[[3, 0]],
    &[[3, 2]],
    &[[2, 1]],
    &[[0, 1]],
    &[[3, 0], [2, 1]],
    &[[3, 1]],
    &[[1, 3]],
    &[[0, 2], [1, 3]],
    &[[1, 0]],
    &[[1, 2]],
    &[[2, 3]],
    &[[0, 3]],
    &[[2, 0]],
    &[],
];

#[inline]
fn edge_case(s0: f64, s1: f64, value: f64) -> u8 {
    (s0 >= value) as u8 | ((s1 >= value) as u8) << 1
}

#[inline]
fn is_crossing(case: u8) -> bool {
    case == LEFT_ABOVE || case == RIGHT_ABOVE
}

/// Above/below state of vertex `i` recovered from a row of x-edge cases
#[inline]
fn vertex_above(cases: &[u8], i: usize) -> bool {
    if i < cases.len() {
        cases[i] & LEFT_ABOVE != 0
    } else {
        cases[i - 1] & RIGHT_ABOVE != 0
    }
}

#[inline]
fn interpolation_factor(s0: f64, s1: f64, value: f64) -> f64 {
    let delta = s1 - s0;
    if delta == 0.0 {
        return 0.5;
    }
    let t = (value - s0) / delta;
    if t.is_nan() {
        // NaN or infinite samples: snap onto the endpoint that has a value
        return match (s0.is_finite(), s1.is_finite()) {
            (true, false) => 0.0,
            (false, true) => 1.0,
            _ => 0.5,
        };
    }
    t.clamp(0.0, 1.0)
}

/// Per-row bookkeeping shared between passes
#[derive(Debug, Clone, Copy)]
struct RowMeta {
    x_points: usize,
    y_points: usize,
    lines: usize,
    /// First crossing x-edge of this row
    x_min: usize,
    /// One past the last crossing x-edge of this row
    x_max: usize,
    /// Cell span processed for the row pair (j, j + 1)
    trim: Option<(usize, usize)>,
}

impl RowMeta {
    fn empty(x_cells: usize) -> Self {
        Self {
            x_points: 0,
            y_points: 0,
            lines: 0,
            x_min: x_cells,
            x_max: 0,
            trim: None,
        }
    }

    fn points(&self) -> usize {
        self.x_points + self.y_points
    }
}

/// Output slices owned by one row in pass 4
struct RowOutput<'a> {
    row: usize,
    point_base: usize,
    points: &'a mut [[f64; 3]],
    lines: &'a mut [[usize; 2]],
}

/// Split `slice` into consecutive chunks of the given lengths
fn split_by_counts<'a, T>(
    mut slice: &'a mut [T],
    counts: impl Iterator<Item = usize>,
) -> Vec<&'a mut [T]> {
    let mut chunks = Vec::new();
    for count in counts {
        let (head, tail) = std::mem::take(&mut slice).split_at_mut(count);
        chunks.push(head);
        slice = tail;
    }
    chunks
}

/// Point and line counts produced for one contour level
#[derive(Debug, Clone, PartialEq)]
pub struct LevelSummary {
    pub value: f64,
    pub points: usize,
    pub lines: usize,
}

/// Contour lines of a 2D image at one or more scalar levels
#[derive(Debug, Clone)]
pub struct FlyingEdges2D {
    values: ContourValues,
    compute_scalars: bool,
    array_component: usize,
    parallel: bool,
}

impl FlyingEdges2D {
    pub fn new(values: ContourValues) -> Self {
        Self {
            values,
            compute_scalars: true,
            array_component: 0,
            parallel: true,
        }
    }

    /// Attach the contour level as a scalar on every output point
    pub fn with_compute_scalars(mut self, compute_scalars: bool) -> Self {
        self.compute_scalars = compute_scalars;
        self
    }

    /// Which scalar component of the input is contoured
    pub fn with_array_component(mut self, component: usize) -> Self {
        self.array_component = component;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn values(&self) -> &ContourValues {
        &self.values
    }

    /// Contour `image` at every configured level, levels appended in order
    pub fn execute(&self, image: &ImageData) -> Result<PolyData> {
        self.execute_with_summary(image).map(|(output, _)| output)
    }

    /// Like `execute`, also returning how much geometry each level produced.
    /// Level `k` owns the points and lines that follow those of levels `0..k`.
    pub fn execute_with_summary(&self, image: &ImageData) -> Result<(PolyData, Vec<LevelSummary>)> {
        if self.array_component >= image.num_components() {
            return Err(IsoContourError::InvalidComponent {
                component: self.array_component,
                available: image.num_components(),
            });
        }

        let mut output = PolyData::new();
        if self.compute_scalars {
            output.scalars = Some(Vec::new());
        }
        let mut summary: Vec<LevelSummary> = self
            .values
            .values()
            .iter()
            .map(|&value| LevelSummary { value, points: 0, lines: 0 })
            .collect();

        let [nx, ny] = image.dimensions();
        if nx < 2 || ny < 2 {
            warn!("Image of {}x{} points has no cells to contour", nx, ny);
            return Ok((output, summary));
        }

        for level in summary.iter_mut() {
            let before = (output.number_of_points(), output.number_of_lines());
            self.contour_level(image, level.value, &mut output);
            level.points = output.number_of_points() - before.0;
            level.lines = output.number_of_lines() - before.1;
            debug!("Contour {:.3}: {} points, {} lines", level.value, level.points, level.lines);
        }

        Ok((output, summary))
    }

    fn contour_level(&self, image: &ImageData, value: f64, output: &mut PolyData) {
        let [nx, ny] = image.dimensions();
        let x_cells = nx - 1;

        // Pass 1: x-edge classification
        let mut x_cases = vec![BELOW; x_cells * ny];
        let mut metas: Vec<RowMeta> = if self.parallel {
            x_cases
                .par_chunks_mut(x_cells)
                .enumerate()
                .map(|(j, row)| self.classify_x_edges(image, value, j, row))
                .collect()
        } else {
            x_cases
                .chunks_mut(x_cells)
                .enumerate()
                .map(|(j, row)| self.classify_x_edges(image, value, j, row))
                .collect()
        };

        // Pass 2: y-edges and cell counts per row pair
        let row_cases = |j: usize| &x_cases[j * x_cells..(j + 1) * x_cells];
        let count_pair = |j: usize| {
            Self::count_row_pair(row_cases(j), row_cases(j + 1), &metas[j], &metas[j + 1])
        };
        let counts: Vec<(usize, usize, Option<(usize, usize)>)> = if self.parallel {
            (0..ny - 1).into_par_iter().map(count_pair).collect()
        } else {
            (0..ny - 1).map(count_pair).collect()
        };
        for (meta, (y_points, lines, trim)) in metas.iter_mut().zip(counts) {
            meta.y_points = y_points;
            meta.lines = lines;
            meta.trim = trim;
        }

        // Pass 3: prefix sums
        let point_start = output.points.len();
        let line_start = output.lines.len();
        let mut point_bases = Vec::with_capacity(ny);
        let mut total_points = 0;
        let mut total_lines = 0;
        for meta in &metas {
            point_bases.push(point_start + total_points);
            total_points += meta.points();
            total_lines += meta.lines;
        }
        if total_lines == 0 && total_points == 0 {
            return;
        }

        output.points.resize(point_start + total_points, [0.0; 3]);
        output.lines.resize(line_start + total_lines, [NO_ID; 2]);
        if let Some(scalars) = output.scalars.as_mut() {
            scalars.resize(point_start + total_points, value);
        }

        // Pass 4: generate into disjoint row slices
        let point_chunks = split_by_counts(
            &mut output.points[point_start..],
            metas.iter().map(RowMeta::points),
        );
        let line_chunks = split_by_counts(
            &mut output.lines[line_start..],
            metas.iter().map(|m| m.lines),
        );
        let tasks: Vec<RowOutput> = point_chunks
            .into_iter()
            .zip(line_chunks)
            .enumerate()
            .map(|(row, (points, lines))| RowOutput {
                row,
                point_base: point_bases[row],
                points,
                lines,
            })
            .collect();

        let generate = |task: RowOutput| {
            self.generate_row(image, value, &x_cases, &metas, &point_bases, task)
        };
        if self.parallel {
            tasks.into_par_iter().for_each(generate);
        } else {
            tasks.into_iter().for_each(generate);
        }
    }

    fn classify_x_edges(&self, image: &ImageData, value: f64, j: usize, cases: &mut [u8]) -> RowMeta {
        let mut meta = RowMeta::empty(cases.len());
        let mut s1 = image.scalar(0, j, self.array_component);

        for (i, case) in cases.iter_mut().enumerate() {
            let s0 = s1;
            s1 = image.scalar(i + 1, j, self.array_component);
            *case = edge_case(s0, s1, value);
            if is_crossing(*case) {
                meta.x_points += 1;
                meta.x_min = meta.x_min.min(i);
                meta.x_max = i + 1;
            }
        }

        meta
    }

    /// Trimmed cell span of a row pair. Outside the union of both rows'
    /// crossing spans each row keeps the state of its end vertex, so y-edges
    /// there only cross when those end states differ.
    fn trim_span(cases0: &[u8], cases1: &[u8], m0: &RowMeta, m1: &RowMeta) -> Option<(usize, usize)> {
        let x_cells = cases0.len();
        let mut x_l = m0.x_min.min(m1.x_min);
        let mut x_r = m0.x_max.max(m1.x_max);

        if vertex_above(cases0, 0) != vertex_above(cases1, 0) {
            x_l = 0;
        }
        if vertex_above(cases0, x_cells) != vertex_above(cases1, x_cells) {
            x_r = x_cells;
        }

        (x_l < x_r).then_some((x_l, x_r))
    }

    fn count_row_pair(
        cases0: &[u8],
        cases1: &[u8],
        m0: &RowMeta,
        m1: &RowMeta,
    ) -> (usize, usize, Option<(usize, usize)>) {
        let Some((x_l, x_r)) = Self::trim_span(cases0, cases1, m0, m1) else {
            return (0, 0, None);
        };

        let mut y_points = 0;
        let mut lines = 0;
        for i in x_l..=x_r {
            if vertex_above(cases0, i) != vertex_above(cases1, i) {
                y_points += 1;
            }
            if i < x_r {
                let case = (cases0[i] | cases1[i] << 2) as usize;
                lines += LINE_CASES[case].len();
            }
        }

        (y_points, lines, Some((x_l, x_r)))
    }

    fn generate_row(
        &self,
        image: &ImageData,
        value: f64,
        x_cases: &[u8],
        metas: &[RowMeta],
        point_bases: &[usize],
        task: RowOutput,
    ) {
        let RowOutput { row: j, point_base, points, lines } = task;
        let [nx, ny] = image.dimensions();
        let x_cells = nx - 1;
        let comp = self.array_component;
        let meta = &metas[j];
        let cases0 = &x_cases[j * x_cells..(j + 1) * x_cells];

        // x-edge points of this row
        let mut k = 0;
        for i in meta.x_min..meta.x_max {
            if is_crossing(cases0[i]) {
                let t = interpolation_factor(image.scalar(i, j, comp), image.scalar(i + 1, j, comp), value);
                let p = image.point(i, j);
                points[k] = [p[0] + t * image.spacing()[0], p[1], p[2]];
                k += 1;
            }
        }

        let Some((x_l, x_r)) = meta.trim else {
            return;
        };
        if j + 1 >= ny {
            return;
        }
        let cases1 = &x_cases[(j + 1) * x_cells..(j + 2) * x_cells];

        // Running ids: no edge before x_l crosses, so counters can start there
        let mut x0_id = point_base;
        let mut x1_id = point_bases[j + 1];
        let mut y_id = point_base + meta.x_points;

        let mut emit_y_point = |i: usize, points: &mut [[f64; 3]]| -> usize {
            if vertex_above(cases0, i) == vertex_above(cases1, i) {
                return NO_ID;
            }
            let t = interpolation_factor(image.scalar(i, j, comp), image.scalar(i, j + 1, comp), value);
            let p = image.point(i, j);
            let id = y_id;
            points[id - point_base] = [p[0], p[1] + t * image.spacing()[1], p[2]];
            y_id += 1;
            id
        };

        let mut y_left = emit_y_point(x_l, &mut *points);
        let mut l = 0;
        for i in x_l..x_r {
            let bottom = if is_crossing(cases0[i]) {
                x0_id += 1;
                x0_id - 1
            } else {
                NO_ID
            };
            let top = if is_crossing(cases1[i]) {
                x1_id += 1;
                x1_id - 1
            } else {
                NO_ID
            };
            let y_right = emit_y_point(i + 1, &mut *points);

            let edge_ids = [bottom, top, y_left, y_right];
            let case = (cases0[i] | cases1[i] << 2) as usize;
            for &[a, b] in LINE_CASES[case] {
                debug_assert!(edge_ids[a] != NO_ID && edge_ids[b] != NO_ID);
                lines[l] = [edge_ids[a], edge_ids[b]];
                l += 1;
            }

            y_left = y_right;
        }

        debug_assert_eq!(l, lines.len());
    }
}
