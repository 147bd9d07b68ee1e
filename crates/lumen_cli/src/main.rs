use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use lumen_renderer::{render, ImageBuffer};
use rand::rngs::StdRng;
use rand::SeedableRng;

mod cli;
mod scenes;
mod settings;

use cli::Args;
use settings::RenderSettings;

fn save_png(image: &ImageBuffer, path: &Path) -> Result<()> {
    image::save_buffer(
        path,
        &image.to_rgba_bytes(),
        image.width,
        image.height,
        image::ColorType::Rgba8,
    )
    .with_context(|| format!("Failed to write {}", path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    let file_settings = match &args.config {
        Some(path) => RenderSettings::load(path)?,
        None => RenderSettings::default(),
    };
    let settings = file_settings.merge(args.settings());

    let mut scene_rng = StdRng::seed_from_u64(settings.seed());
    let scene = scenes::build(settings.scene(), &settings.texture(), &mut scene_rng);
    let mut camera = settings.apply(scene.camera);

    let image = render(&mut camera, scene.world.as_ref(), &settings.render_config());

    let output = settings.output();
    save_png(&image, &output)?;
    info!("Wrote {}", output.display());

    Ok(())
}
