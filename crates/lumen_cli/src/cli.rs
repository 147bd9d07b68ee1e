use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use crate::scenes::SceneKind;
use crate::settings::RenderSettings;

/// Log levels selectable on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments. Every render option overrides the settings file.
#[derive(Debug, Parser)]
#[command(name = "lumen")]
#[command(about = "Offline CPU path tracer", version)]
pub struct Args {
    /// Demo scene to render
    #[arg(long, value_enum)]
    pub scene: Option<SceneKind>,

    /// JSON settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output PNG path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Image width in pixels; height follows the scene's aspect ratio
    #[arg(long)]
    pub width: Option<u32>,

    /// Number of samples per pixel
    #[arg(long, short = 's')]
    pub samples_per_pixel: Option<u32>,

    /// Maximum bounces per camera ray
    #[arg(long, short = 'd')]
    pub max_depth: Option<u32>,

    /// Seed for scene generation and sampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Bucket edge length in pixels
    #[arg(long)]
    pub bucket_size: Option<u32>,

    /// Image used by the textured scenes
    #[arg(long)]
    pub texture: Option<PathBuf>,

    /// Set the logging level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

impl Args {
    /// Render options given on the command line.
    pub fn settings(&self) -> RenderSettings {
        RenderSettings {
            scene: self.scene,
            output: self.output.clone(),
            width: self.width,
            samples_per_pixel: self.samples_per_pixel,
            max_depth: self.max_depth,
            seed: self.seed,
            bucket_size: self.bucket_size,
            texture: self.texture.clone(),
        }
    }
}
