extern crate nalgebra as na;
mod cli;
mod config;
mod error;
mod export;
mod scene;
mod scenes;

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;

use cli::Cli;
use config::GeneratorConfig;
use error::{Error, Result};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::builder()
        .filter_level(level)
        .parse_default_env()
        .init();

    match run(&cli) {
        Ok(config) => {
            println!("Generated {}", config.output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            report(&e, &mut io::stderr());
            ExitCode::FAILURE
        }
    }
}

/// Logs `err`, or writes it to `stderr` when error logging is filtered out.
fn report(err: &Error, stderr: &mut impl Write) {
    if log::log_enabled!(log::Level::Error) {
        log::error!("{}", err);
    } else {
        let _ = writeln!(stderr, "error: {}", err);
    }
}

fn run(cli: &Cli) -> Result<GeneratorConfig> {
    let config = GeneratorConfig::resolve(cli.config.as_deref(), cli.overrides())?;
    log::debug!("Resolved config: {:?}", config);

    log::info!(
        "Building scene ({} triangles)...",
        config.grid.triangle_count()
    );
    let now = std::time::Instant::now();
    let scene = scenes::cornell::build_scene(&config.grid)?;
    let build_elapsed = now.elapsed();
    log::debug!(
        "{} materials, {} models, {} triangles",
        scene.materials.len(),
        scene.models.len(),
        scene.triangle_count()
    );

    log::info!("Writing {}...", config.output.display());
    let now = std::time::Instant::now();
    export::write_scene_file(&scene, &config.output)?;
    let write_elapsed = now.elapsed();

    log::info!(
        "Done. Build time: {:?}. Write time: {:?}",
        build_elapsed,
        write_elapsed
    );
    Ok(config)
}
