use std::path::PathBuf;

use clap::Parser;

use crate::config::Overrides;

#[derive(Debug, Parser)]
#[command(name = "scngen")]
#[command(about = "Generate a Cornell box scene file with a tessellated ground grid", long_about = None)]
pub struct Cli {
    /// Scene file to write
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// TOML file with `output` and a `[grid]` table
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Grid cells per axis (0 gives an empty grid)
    #[arg(short = 'n', long)]
    pub resolution: Option<u32>,

    /// Grid extent along X
    #[arg(long, allow_negative_numbers = true)]
    pub size_x: Option<f64>,

    /// Grid extent along Z
    #[arg(long, allow_negative_numbers = true)]
    pub size_z: Option<f64>,

    /// Grid height
    #[arg(long, allow_negative_numbers = true)]
    pub plane_y: Option<f64>,

    /// Grid model translation
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
    pub translate: Option<Vec<f64>>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            output: self.output.clone(),
            resolution: self.resolution,
            size_x: self.size_x,
            size_z: self.size_z,
            plane_y: self.plane_y,
            translation: self
                .translate
                .as_deref()
                .and_then(|t| <[f64; 3]>::try_from(t).ok()),
        }
    }
}
