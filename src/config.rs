use std::fs;
use std::path::{Path, PathBuf};

use na::Vector3;
use serde::Deserialize;

use crate::error::{Error, Result};

pub const DEFAULT_OUTPUT: &str = "kd_compare_grid.scn";

/// Parameters of the tessellated ground grid.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    /// Cells per axis; the grid holds `2 * resolution^2` triangles.
    pub resolution: u32,
    pub size_x: f64,
    pub size_z: f64,
    /// Local height of the grid plane.
    pub plane_y: f64,
    /// Translation of the grid model inside the room.
    pub translation: [f64; 3],
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            resolution: 120,
            size_x: 400.0,
            size_z: 400.0,
            plane_y: -150.0,
            translation: [0.0, -178.0, 900.0],
        }
    }
}

impl GridConfig {
    pub fn translation(&self) -> Vector3<f64> {
        Vector3::from(self.translation)
    }

    /// `2 * resolution^2`, saturating at `u64::MAX`.
    pub fn triangle_count(&self) -> u64 {
        let cells = u64::from(self.resolution) * u64::from(self.resolution);
        cells.saturating_mul(2)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    pub output: PathBuf,
    pub grid: GridConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            grid: GridConfig::default(),
        }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub output: Option<PathBuf>,
    pub resolution: Option<u32>,
    pub size_x: Option<f64>,
    pub size_z: Option<f64>,
    pub plane_y: Option<f64>,
    pub translation: Option<[f64; 3]>,
}

impl GeneratorConfig {
    pub fn from_toml_str(path: &Path, contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|source| Error::ParseConfig {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| Error::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(path, &contents)
    }

    /// Defaults, then `file` if given, then `overrides`.
    pub fn resolve(file: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let mut config = match file {
            Some(path) => {
                log::debug!("Loading config from {}", path.display());
                Self::load(path)?
            }
            None => Self::default(),
        };
        config.apply(overrides);
        Ok(config)
    }

    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(output) = overrides.output {
            self.output = output;
        }
        if let Some(resolution) = overrides.resolution {
            self.grid.resolution = resolution;
        }
        if let Some(size_x) = overrides.size_x {
            self.grid.size_x = size_x;
        }
        if let Some(size_z) = overrides.size_z {
            self.grid.size_z = size_z;
        }
        if let Some(plane_y) = overrides.plane_y {
            self.grid.plane_y = plane_y;
        }
        if let Some(translation) = overrides.translation {
            self.grid.translation = translation;
        }
    }
}
