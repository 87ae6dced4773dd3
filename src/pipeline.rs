// src/pipeline.rs - Reader -> contour/outline -> mapped actors

use std::path::{Path, PathBuf};
use log::{debug, info, warn};

use crate::bounds::HasBounds;
use crate::config::Config;
use crate::contour_values::ContourValues;
use crate::errors::{IsoContourError, Result};
use crate::flying_edges::FlyingEdges2D;
pub use crate::flying_edges::LevelSummary;
use crate::image_data::ImageData;
use crate::image_io::read_png;
use crate::outline::OutlineFilter;
use crate::polydata::PolyData;
use crate::renderer::Renderer;
use crate::scene::{Actor, Mapper};

/// Everything the fixed pipeline produces for one image
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub source: PathBuf,
    pub filename: String,
    pub image: ImageData,
    pub scalar_range: (f64, f64),
    pub contour_values: ContourValues,
    pub contours: PolyData,
    /// Geometry produced by each contour level, in level order
    pub level_summary: Vec<LevelSummary>,
    pub outline: PolyData,
}

/// Scalar range to contour: the configured override, else the image range
fn resolve_scalar_range(image: &ImageData, config: &Config) -> Result<(f64, f64)> {
    if let Some([lo, hi]) = config.scalar_range {
        return Ok((lo, hi));
    }

    if config.array_component >= image.num_components() {
        return Err(IsoContourError::InvalidComponent {
            component: config.array_component,
            available: image.num_components(),
        });
    }

    image.scalar_range(config.array_component).ok_or_else(|| {
        IsoContourError::InvalidImage("image has no finite scalars".to_string())
    })
}

/// Contour and outline an image that is already in memory
pub fn process_image_data(
    image: ImageData,
    source: PathBuf,
    filename: String,
    config: &Config,
) -> Result<PipelineOutput> {
    // Step 1: Scalar range of the selected component
    let scalar_range = resolve_scalar_range(&image, config)?;
    debug!("Scalar range for {}: [{}, {}]", filename, scalar_range.0, scalar_range.1);

    // Step 2: Contour levels spanning the range
    let contour_values = ContourValues::generate(config.number_of_contours, scalar_range.0, scalar_range.1);

    // Step 3: Flying-edges contouring
    let (contours, level_summary) = FlyingEdges2D::new(contour_values.clone())
        .with_compute_scalars(config.compute_scalars)
        .with_array_component(config.array_component)
        .with_parallel(config.use_parallel)
        .execute_with_summary(&image)?;

    if contours.is_empty() {
        warn!("No contour lines generated for {}", filename);
    }

    // Step 4: Bounding-box outline
    let outline = OutlineFilter::new().execute(&image);

    info!(
        "{}: {}x{} image, {} levels, {} contour points, {} contour lines",
        filename,
        image.dimensions()[0],
        image.dimensions()[1],
        contour_values.len(),
        contours.number_of_points(),
        contours.number_of_lines()
    );

    Ok(PipelineOutput {
        source,
        filename,
        image,
        scalar_range,
        contour_values,
        contours,
        level_summary,
        outline,
    })
}

/// Read `path` and run the full contour pipeline on it
pub fn run_pipeline(path: &Path, config: &Config) -> Result<PipelineOutput> {
    let input = read_png(path)?;
    info!(
        "Loaded {} ({} component(s))",
        input.path.display(),
        input.data.num_components()
    );

    process_image_data(input.data, input.path, input.filename, config)
}

/// Outline actor first, contour actor on top, camera fitted to both
pub fn build_renderer(output: &PipelineOutput, config: &Config) -> Renderer {
    let mut renderer = Renderer::new();

    let outline_actor = Actor::new(Mapper::new(output.outline.clone()))
        .with_color(config.outline_rgb)
        .with_line_width(config.line_width);
    renderer.add_actor(outline_actor);

    let mut contour_mapper = Mapper::new(output.contours.clone());
    contour_mapper.set_scalar_range(output.scalar_range);
    contour_mapper.set_scalar_visibility(config.color_by_scalars);
    let contour_actor = Actor::new(contour_mapper)
        .with_color(config.contour_rgb)
        .with_line_width(config.line_width);
    renderer.add_actor(contour_actor);

    renderer.set_background(config.background_rgb);
    renderer.reset_camera();

    if let Some(bounds) = output.image.bounds() {
        debug!("Scene bounds: {:?} -> {:?}", bounds.min, bounds.max);
    }

    renderer
}

/// Index of the contour actor inside renderers made by `build_renderer`
pub const CONTOUR_ACTOR: usize = 1;
/// Index of the outline actor inside renderers made by `build_renderer`
pub const OUTLINE_ACTOR: usize = 0;

/// Per-level point and line counts, in level order
pub fn contour_level_summary(output: &PipelineOutput) -> Vec<LevelSummary> {
    output.level_summary.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn bowl() -> ImageData {
        ImageData::from_fn(32, 32, |i, j| {
            let (dx, dy) = (i as f64 - 15.5, j as f64 - 15.5);
            (dx * dx + dy * dy).sqrt()
        })
    }

    fn run(config: &Config) -> PipelineOutput {
        process_image_data(bowl(), PathBuf::from("bowl.png"), "bowl".to_string(), config).unwrap()
    }

    #[test]
    fn levels_span_image_range() {
        let output = run(&Config::default());
        let values = output.contour_values.values();
        assert_eq!(values.len(), 12);
        assert_approx_eq!(values[0], output.scalar_range.0);
        assert_approx_eq!(values[11], output.scalar_range.1);
        assert!(!output.contours.is_empty());
        assert_eq!(output.outline.number_of_lines(), 12);
    }

    #[test]
    fn configured_range_overrides_image() {
        let config = Config {
            scalar_range: Some([2.0, 6.0]),
            number_of_contours: 3,
            ..Config::default()
        };
        let output = run(&config);
        assert_eq!(output.contour_values.values(), &[2.0, 4.0, 6.0]);
    }

    #[test]
    fn summary_counts_every_line() {
        let output = run(&Config::default());
        let summary = contour_level_summary(&output);
        assert_eq!(summary.len(), 12);
        let lines: usize = summary.iter().map(|l| l.lines).sum();
        let points: usize = summary.iter().map(|l| l.points).sum();
        assert_eq!(lines, output.contours.number_of_lines());
        assert_eq!(points, output.contours.number_of_points());
        // The minimum level never crosses
        assert_eq!(summary[0].lines, 0);
    }

    #[test]
    fn summary_without_point_scalars() {
        let config = Config { compute_scalars: false, ..Config::default() };
        let output = run(&config);
        assert!(output.contours.scalars.is_none());

        let summary = contour_level_summary(&output);
        let lines: usize = summary.iter().map(|l| l.lines).sum();
        assert!(lines > 0);
        assert_eq!(lines, output.contours.number_of_lines());
    }

    #[test]
    fn summary_keeps_duplicate_levels_apart() {
        let config = Config {
            scalar_range: Some([2.0, 2.0]),
            number_of_contours: 3,
            ..Config::default()
        };
        let output = run(&config);
        let summary = contour_level_summary(&output);

        assert_eq!(summary.len(), 3);
        assert!(summary[0].lines > 0);
        assert!(summary.iter().all(|level| *level == summary[0]));
        assert_eq!(summary.iter().map(|l| l.lines).sum::<usize>(), output.contours.number_of_lines());
    }

    #[test]
    fn renderer_holds_outline_then_contours() {
        let config = Config::default();
        let output = run(&config);
        let renderer = build_renderer(&output, &config);

        assert_eq!(renderer.actors().len(), 2);
        assert_eq!(renderer.actors()[OUTLINE_ACTOR].mapper.input().number_of_lines(), 12);
        let contour = &renderer.actors()[CONTOUR_ACTOR];
        assert!(!contour.mapper.scalar_visibility());
        assert_eq!(contour.mapper.scalar_range(), output.scalar_range);
        assert_eq!(renderer.background(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn bad_component_is_reported() {
        let config = Config { array_component: 2, ..Config::default() };
        let err = process_image_data(bowl(), PathBuf::new(), String::new(), &config).unwrap_err();
        assert!(matches!(err, IsoContourError::InvalidComponent { .. }));
    }
}
