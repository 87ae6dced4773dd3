use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{IsoContourError, Result};

/// Environment variable consulted when no data root is configured
pub const DATA_ROOT_ENV: &str = "ISOCONTOUR_DATA_ROOT";

/// Configuration for the contour viewer
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// Directory holding the input data; falls back to `ISOCONTOUR_DATA_ROOT`, then `.`
    #[serde(default)]
    pub data_root: Option<String>,

    /// Image path relative to the data root (absolute paths bypass the root)
    #[serde(default = "default_image_file")]
    pub image_file: String,

    #[serde(default = "default_number_of_contours")]
    pub number_of_contours: usize,

    /// Overrides the range computed from the image
    #[serde(default)]
    pub scalar_range: Option<[f64; 2]>,

    #[serde(default)]
    pub array_component: usize,

    #[serde(default = "default_true")]
    pub compute_scalars: bool,

    #[serde(default = "default_true")]
    pub use_parallel: bool,

    // Window and scene
    #[serde(default = "default_window_size")]
    pub window_size: [usize; 2],

    #[serde(default = "default_window_title")]
    pub window_title: String,

    #[serde(default = "default_background_rgb")]
    pub background_rgb: [f64; 3],

    #[serde(default = "default_white")]
    pub contour_rgb: [f64; 3],

    #[serde(default = "default_white")]
    pub outline_rgb: [f64; 3],

    /// Color contour lines through the lookup table instead of `contour_rgb`
    #[serde(default)]
    pub color_by_scalars: bool,

    #[serde(default = "default_line_width")]
    pub line_width: u32,
}

fn default_image_file() -> String {
    "Data/fullhead15.png".to_string()
}

fn default_number_of_contours() -> usize {
    12
}

fn default_true() -> bool {
    true
}

fn default_window_size() -> [usize; 2] {
    [300, 300]
}

fn default_window_title() -> String {
    "Isocontour Viewer".to_string()
}

fn default_background_rgb() -> [f64; 3] {
    [0.0, 0.0, 0.0]
}

fn default_white() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}

fn default_line_width() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_root: None,
            image_file: default_image_file(),
            number_of_contours: default_number_of_contours(),
            scalar_range: None,
            array_component: 0,
            compute_scalars: true,
            use_parallel: true,
            window_size: default_window_size(),
            window_title: default_window_title(),
            background_rgb: default_background_rgb(),
            contour_rgb: default_white(),
            outline_rgb: default_white(),
            color_by_scalars: false,
            line_width: default_line_width(),
        }
    }
}

fn validate_color(name: &str, rgb: &[f64; 3]) -> Result<()> {
    if rgb.iter().any(|c| !(0.0..=1.0).contains(c)) {
        return Err(IsoContourError::Config(format!(
            "{} components must be between 0.0 and 1.0", name
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            IsoContourError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;

        toml::from_str(&content).map_err(|source| IsoContourError::ConfigLoad {
            source,
            path: path.to_path_buf(),
        })
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            IsoContourError::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, content)?;

        Ok(())
    }

    /// Data root from config, then environment, then the working directory
    pub fn data_root(&self) -> PathBuf {
        self.data_root
            .clone()
            .or_else(|| env::var(DATA_ROOT_ENV).ok())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Full path of the input image
    pub fn image_path(&self) -> PathBuf {
        let file = Path::new(&self.image_file);
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.data_root().join(file)
        }
    }

    /// Use an input path given on the command line. Relative paths resolve
    /// against the working directory rather than the data root.
    pub fn set_input_path<P: AsRef<Path>>(&mut self, input: P) -> Result<()> {
        let input = input.as_ref();
        let path = if input.is_absolute() {
            input.to_path_buf()
        } else {
            env::current_dir()?.join(input)
        };
        self.image_file = path.to_string_lossy().into_owned();
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.image_file.trim().is_empty() {
            return Err(IsoContourError::Config("image_file must not be empty".to_string()));
        }

        if self.number_of_contours == 0 {
            return Err(IsoContourError::Config(
                "number_of_contours must be > 0".to_string(),
            ));
        }

        if let Some([lo, hi]) = self.scalar_range {
            if !lo.is_finite() || !hi.is_finite() || lo > hi {
                return Err(IsoContourError::Config(format!(
                    "scalar_range [{}, {}] must be finite with min <= max", lo, hi
                )));
            }
        }

        if self.window_size[0] == 0 || self.window_size[1] == 0 {
            return Err(IsoContourError::Config(
                "window_size dimensions must be > 0".to_string(),
            ));
        }

        if self.line_width == 0 {
            return Err(IsoContourError::Config("line_width must be > 0".to_string()));
        }

        validate_color("background_rgb", &self.background_rgb)?;
        validate_color("contour_rgb", &self.contour_rgb)?;
        validate_color("outline_rgb", &self.outline_rgb)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_demo_scene() {
        let config = Config::default();
        assert_eq!(config.number_of_contours, 12);
        assert_eq!(config.window_size, [300, 300]);
        assert_eq!(config.background_rgb, [0.0, 0.0, 0.0]);
        assert_eq!(config.contour_rgb, [1.0, 1.0, 1.0]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            "data_root = \"/data\"\nnumber_of_contours = 4\nscalar_range = [0.0, 100.0]\n",
        )
        .unwrap();
        assert_eq!(config.number_of_contours, 4);
        assert_eq!(config.scalar_range, Some([0.0, 100.0]));
        assert_eq!(config.image_file, "Data/fullhead15.png");
        assert_eq!(config.image_path(), PathBuf::from("/data/Data/fullhead15.png"));
    }

    #[test]
    fn absolute_image_bypasses_root() {
        let config = Config {
            data_root: Some("/data".to_string()),
            image_file: "/tmp/slice.png".to_string(),
            ..Config::default()
        };
        assert_eq!(config.image_path(), PathBuf::from("/tmp/slice.png"));
    }

    #[test]
    fn input_path_ignores_data_root() {
        let mut config = Config {
            data_root: Some("/data".to_string()),
            ..Config::default()
        };
        config.set_input_path("slice.png").unwrap();
        assert_eq!(config.image_path(), env::current_dir().unwrap().join("slice.png"));

        config.set_input_path("/scans/head.png").unwrap();
        assert_eq!(config.image_path(), PathBuf::from("/scans/head.png"));
    }

    #[test]
    fn rejects_bad_values() {
        let bad = [
            Config { number_of_contours: 0, ..Config::default() },
            Config { scalar_range: Some([5.0, 1.0]), ..Config::default() },
            Config { window_size: [0, 300], ..Config::default() },
            Config { contour_rgb: [1.5, 0.0, 0.0], ..Config::default() },
            Config { line_width: 0, ..Config::default() },
        ];
        for config in bad {
            assert!(matches!(config.validate(), Err(IsoContourError::Config(_))));
        }
    }

    #[test]
    fn save_and_reload() {
        let path = std::env::temp_dir().join(format!("isocontour_{}_config.toml", std::process::id()));
        let config = Config {
            scalar_range: Some([10.0, 20.0]),
            color_by_scalars: true,
            ..Config::default()
        };
        config.save_to_file(&path).unwrap();
        assert_eq!(Config::from_file(&path).unwrap(), config);
        fs::remove_file(&path).ok();
    }

    #[test]
    fn malformed_toml_reports_path() {
        let path = std::env::temp_dir().join(format!("isocontour_{}_bad.toml", std::process::id()));
        fs::write(&path, "number_of_contours = \"many\"").unwrap();
        let err = Config::from_file(&path).unwrap_err();
        assert!(matches!(err, IsoContourError::ConfigLoad { .. }));
        fs::remove_file(&path).ok();
    }
}
