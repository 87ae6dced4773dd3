// src/lib.rs - Library interface for isocontour_rust

pub mod bounds;
pub mod camera;
pub mod config;
pub mod contour_values;
pub mod errors;
pub mod flying_edges;
pub mod gui;
pub mod image_data;
pub mod image_io;
pub mod outline;
pub mod output;
pub mod pipeline;
pub mod polydata;
pub mod raster;
pub mod renderer;
pub mod scene;

// Re-export commonly used types and functions
pub use errors::{IsoContourError, Result};
pub use config::Config;
pub use bounds::{Bounds, HasBounds};
pub use contour_values::ContourValues;
pub use flying_edges::FlyingEdges2D;
pub use image_data::ImageData;
pub use image_io::{InputImage, read_png, save_image};
pub use outline::OutlineFilter;
pub use polydata::PolyData;

// Re-export scene and rendering
pub use camera::Camera;
pub use renderer::{FrameBuffer, Renderer, render_to_image};
pub use scene::{Actor, LookupTable, Mapper, Property};

// Re-export pipeline entry points
pub use pipeline::{
    build_renderer,
    contour_level_summary,
    process_image_data,
    run_pipeline,
    LevelSummary,
    PipelineOutput,
};
pub use output::{write_contour_csv, write_summary_csv};
pub use gui::run_viewer;
