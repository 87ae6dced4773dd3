use std::path::{Path, PathBuf};
use std::time::Instant;
use clap::Parser;
use log::{info, warn};

use isocontour_rust_lib::config::Config;
use isocontour_rust_lib::errors::{IsoContourError, Result};
use isocontour_rust_lib::image_io::{get_png_files_in_dir, save_image};
use isocontour_rust_lib::output::{write_contour_csv, write_summary_csv};
use isocontour_rust_lib::pipeline::{build_renderer, run_pipeline, PipelineOutput};
use isocontour_rust_lib::{render_to_image, run_viewer};

/// Command-line arguments
#[derive(Parser, Debug)]
#[clap(author, version, about = "Contour lines of a PNG image slice, shown with an outline")]
struct Args {
    /// Path to an input PNG or a directory of PNGs, relative to the working
    /// directory (overrides the configured image and ignores the data root)
    #[clap(short, long)]
    input: Option<String>,

    /// Path to configuration file (built-in defaults when the file is absent)
    #[clap(short, long, default_value = "config.toml")]
    config: String,

    /// Root directory for relative image paths
    #[clap(long)]
    data_root: Option<String>,

    /// Number of contour levels
    #[clap(short = 'n', long)]
    contours: Option<usize>,

    /// Lower end of the contoured scalar range
    #[clap(long, requires = "range_max")]
    range_min: Option<f64>,

    /// Upper end of the contoured scalar range
    #[clap(long, requires = "range_min")]
    range_max: Option<f64>,

    /// Render offscreen and save a PNG snapshot (a directory when the input is a directory)
    #[clap(short, long)]
    snapshot: Option<String>,

    /// Write contour segments as CSV (a directory when the input is a directory)
    #[clap(long)]
    export_csv: Option<String>,

    /// Skip the interactive window
    #[clap(long)]
    no_window: bool,

    /// Enable debug logging
    #[clap(short, long)]
    debug: bool,
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = if Path::new(&args.config).is_file() {
        Config::from_file(&args.config)?
    } else {
        info!("No config file at {}, using defaults", args.config);
        Config::default()
    };

    // Override config with command-line arguments
    if let Some(root) = args.data_root.clone() {
        config.data_root = Some(root);
    }

    if let Some(input) = &args.input {
        config.set_input_path(input)?;
    }

    if let Some(count) = args.contours {
        config.number_of_contours = count;
    }

    if let (Some(lo), Some(hi)) = (args.range_min, args.range_max) {
        config.scalar_range = Some([lo, hi]);
    }

    config.validate()?;
    Ok(config)
}

/// Snapshot and CSV exports for one processed image
fn write_outputs(
    output: &PipelineOutput,
    config: &Config,
    snapshot: Option<PathBuf>,
    csv: Option<PathBuf>,
) -> Result<()> {
    if let Some(path) = snapshot {
        let renderer = build_renderer(output, config);
        let [width, height] = config.window_size;
        save_image(&render_to_image(&renderer, width, height), &path)?;
        info!("Snapshot written to {}", path.display());
    }

    if let Some(path) = csv {
        write_contour_csv(&output.contours, &path)?;
        let summary_path = path.with_file_name(format!("{}_summary.csv", output.filename));
        write_summary_csv(output, &summary_path)?;
        info!("Contours written to {}", path.display());
    }

    Ok(())
}

/// Directory input has no window, so it must write at least one output
fn check_directory_outputs(args: &Args) -> Result<()> {
    if args.snapshot.is_none() && args.export_csv.is_none() {
        return Err(IsoContourError::Config(
            "directory input needs --snapshot and/or --export-csv".to_string(),
        ));
    }
    Ok(())
}

fn process_directory(dir: &Path, args: &Args, config: &Config) -> Result<()> {
    check_directory_outputs(args)?;
    let png_files = get_png_files_in_dir(dir)?;
    info!("Found {} PNG files in {}", png_files.len(), dir.display());

    for path in &png_files {
        let output = run_pipeline(path, config)?;
        let per_file = |root: &Option<String>, suffix: &str| {
            root.as_ref()
                .map(|r| PathBuf::from(r).join(format!("{}{}", output.filename, suffix)))
        };
        write_outputs(
            &output,
            config,
            per_file(&args.snapshot, ".png"),
            per_file(&args.export_csv, ".csv"),
        )?;
    }

    if !args.no_window {
        warn!("Interactive viewing needs a single image; skipping the window");
    }
    Ok(())
}

/// Main function
fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    let default_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let config = load_config(&args)?;
    let start_time = Instant::now();

    let image_path = config.image_path();
    if image_path.is_dir() {
        return process_directory(&image_path, &args, &config);
    }
    if !image_path.is_file() {
        return Err(IsoContourError::InvalidPath(image_path));
    }

    let output = run_pipeline(&image_path, &config)?;
    write_outputs(
        &output,
        &config,
        args.snapshot.as_ref().map(PathBuf::from),
        args.export_csv.as_ref().map(PathBuf::from),
    )?;

    info!("Pipeline completed in {:.2} seconds", start_time.elapsed().as_secs_f64());

    if args.no_window {
        return Ok(());
    }

    run_viewer(build_renderer(&output, &config), &config)
}
