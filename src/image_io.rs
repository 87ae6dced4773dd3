use std::path::{Path, PathBuf};
use std::fs;
use image::{DynamicImage, ImageFormat, Primitive, RgbaImage};
use log::debug;

use crate::errors::{IsoContourError, Result};
use crate::image_data::ImageData;

/// Represents an input image with its metadata
pub struct InputImage {
    pub data: ImageData,
    pub path: PathBuf,
    pub filename: String,
}

/// Get all PNG files from a directory (recursively), sorted by path
pub fn get_png_files_in_dir<P: AsRef<Path>>(dir_path: P) -> Result<Vec<PathBuf>> {
    let dir_path = dir_path.as_ref();

    if !dir_path.exists() {
        return Err(IsoContourError::InvalidPath(dir_path.to_path_buf()));
    }

    if !dir_path.is_dir() {
        return Err(IsoContourError::Config(format!(
            "{} is not a directory", dir_path.display()
        )));
    }

    let mut png_files = Vec::new();
    find_png_files_recursive(dir_path, &mut png_files)?;
    png_files.sort();

    Ok(png_files)
}

/// Helper function to recursively search for PNG files
fn find_png_files_recursive(dir_path: &Path, result: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir_path)? {
        let path = entry?.path();

        if path.is_dir() {
            find_png_files_recursive(&path, result)?;
        } else if path.is_file() {
            if let Some(ext) = path.extension() {
                if ext.to_ascii_lowercase() == "png" {
                    result.push(path);
                }
            }
        }
    }

    Ok(())
}

/// Flip rows so that row 0 is the bottom of the picture and widen samples to f64
fn flipped_scalars<T: Primitive>(raw: &[T], width: usize, height: usize, channels: usize) -> Vec<f64> {
    let row_len = width * channels;
    let mut scalars = Vec::with_capacity(raw.len());
    for row in raw.chunks_exact(row_len).rev().take(height) {
        scalars.extend(row.iter().map(|s| s.to_f64().unwrap_or(0.0)));
    }
    scalars
}

/// Convert a decoded image into scalar point data, keeping native sample values
pub fn image_to_data(img: &DynamicImage) -> Result<ImageData> {
    let (width, height) = (img.width() as usize, img.height() as usize);
    if width == 0 || height == 0 {
        return Err(IsoContourError::InvalidImage("image has no pixels".to_string()));
    }

    let (channels, scalars) = match img {
        DynamicImage::ImageLuma8(buf) => (1, flipped_scalars(buf.as_raw(), width, height, 1)),
        DynamicImage::ImageLumaA8(buf) => (2, flipped_scalars(buf.as_raw(), width, height, 2)),
        DynamicImage::ImageRgb8(buf) => (3, flipped_scalars(buf.as_raw(), width, height, 3)),
        DynamicImage::ImageRgba8(buf) => (4, flipped_scalars(buf.as_raw(), width, height, 4)),
        DynamicImage::ImageLuma16(buf) => (1, flipped_scalars(buf.as_raw(), width, height, 1)),
        DynamicImage::ImageLumaA16(buf) => (2, flipped_scalars(buf.as_raw(), width, height, 2)),
        DynamicImage::ImageRgb16(buf) => (3, flipped_scalars(buf.as_raw(), width, height, 3)),
        DynamicImage::ImageRgba16(buf) => (4, flipped_scalars(buf.as_raw(), width, height, 4)),
        DynamicImage::ImageRgb32F(buf) => (3, flipped_scalars(buf.as_raw(), width, height, 3)),
        DynamicImage::ImageRgba32F(buf) => (4, flipped_scalars(buf.as_raw(), width, height, 4)),
        other => {
            let rgba = other.to_rgba8();
            (4, flipped_scalars(rgba.as_raw(), width, height, 4))
        }
    };

    ImageData::new([width, height], channels, scalars)
}

/// Read a PNG into scalar point data
pub fn read_png<P: AsRef<Path>>(path: P) -> Result<InputImage> {
    let path = path.as_ref();

    if !path.is_file() {
        return Err(IsoContourError::InvalidPath(path.to_path_buf()));
    }

    // Get filename without extension
    let filename = path.file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| IsoContourError::InvalidPath(path.to_path_buf()))?
        .to_string();

    let img = image::open(path)?;
    debug!("Decoded {} as {:?} ({}x{})", path.display(), img.color(), img.width(), img.height());

    Ok(InputImage {
        data: image_to_data(&img)?,
        path: path.to_path_buf(),
        filename,
    })
}

/// Save an RGBA image to the specified path
pub fn save_image<P: AsRef<Path>>(image: &RgbaImage, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    image.save_with_format(path, ImageFormat::Png)?;

    Ok(())
}
