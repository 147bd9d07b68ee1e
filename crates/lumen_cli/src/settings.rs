//! Render settings file.
//!
//! Every field is optional; anything left out falls back to the command line
//! and then to the scene's own defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lumen_renderer::{Camera, RenderConfig, DEFAULT_BUCKET_SIZE};
use serde::Deserialize;

use crate::scenes::SceneKind;

pub const DEFAULT_OUTPUT: &str = "image.png";
pub const DEFAULT_TEXTURE: &str = "earthmap.jpg";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderSettings {
    pub scene: Option<SceneKind>,
    pub output: Option<PathBuf>,
    pub width: Option<u32>,
    pub samples_per_pixel: Option<u32>,
    pub max_depth: Option<u32>,
    pub seed: Option<u64>,
    pub bucket_size: Option<u32>,
    pub texture: Option<PathBuf>,
}

impl RenderSettings {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Invalid settings in {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Fields set in `other` win.
    pub fn merge(self, other: RenderSettings) -> Self {
        Self {
            scene: other.scene.or(self.scene),
            output: other.output.or(self.output),
            width: other.width.or(self.width),
            samples_per_pixel: other.samples_per_pixel.or(self.samples_per_pixel),
            max_depth: other.max_depth.or(self.max_depth),
            seed: other.seed.or(self.seed),
            bucket_size: other.bucket_size.or(self.bucket_size),
            texture: other.texture.or(self.texture),
        }
    }

    pub fn scene(&self) -> SceneKind {
        self.scene.unwrap_or(SceneKind::RandomSpheres)
    }

    pub fn output(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
    }

    pub fn texture(&self) -> PathBuf {
        self.texture.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_TEXTURE))
    }

    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or(0)
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            seed: self.seed(),
            bucket_size: self.bucket_size.unwrap_or(DEFAULT_BUCKET_SIZE),
        }
    }

    /// Override the scene camera's image settings, keeping its aspect ratio.
    pub fn apply(&self, mut camera: Camera) -> Camera {
        if let Some(width) = self.width {
            let aspect_ratio = camera.image_width as f32 / camera.image_height.max(1) as f32;
            camera = camera.with_aspect_ratio(width, aspect_ratio);
        }
        if let Some(samples) = self.samples_per_pixel {
            camera.samples_per_pixel = samples;
        }
        if let Some(depth) = self.max_depth {
            camera.max_depth = depth;
        }
        camera
    }
}
