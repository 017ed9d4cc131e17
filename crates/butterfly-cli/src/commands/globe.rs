//! Globe window and offline texture export

use anyhow::{Context, Result};
use butterfly_core::config::GlobeConfig;
use butterfly_core::AppConfig;
use butterfly_globe::{generate_texture_set, run_window, TextureParams};
use std::path::PathBuf;

pub struct TextureArgs {
    pub out: PathBuf,
    pub seed: Option<u64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

pub fn run(config: &AppConfig, seed: Option<u64>) -> Result<()> {
    let globe = GlobeConfig {
        seed: seed.or(config.globe.seed),
        ..config.globe.clone()
    };
    run_window(&globe).context("Globe window failed")?;
    Ok(())
}

pub fn textures(config: &AppConfig, args: TextureArgs) -> Result<()> {
    let params = texture_params(config, &args);
    let set = generate_texture_set(&params);
    let written = set
        .save_pngs(&args.out)
        .with_context(|| format!("Failed to write textures to {}", args.out.display()))?;

    println!(
        "Generated {}x{} maps{}",
        params.width,
        params.height,
        params
            .seed
            .map(|s| format!(" (seed {})", s))
            .unwrap_or_default()
    );
    for path in written {
        println!("  {}", path.display());
    }
    Ok(())
}

fn texture_params(config: &AppConfig, args: &TextureArgs) -> TextureParams {
    let base = TextureParams::from_config(&config.globe);
    TextureParams {
        width: args.width.unwrap_or(base.width),
        height: args.height.unwrap_or(base.height),
        seed: args.seed.or(base.seed),
    }
}
