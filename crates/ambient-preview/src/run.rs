use anyhow::{Context, Result};
use ambient::{config::load_from_path, Effect, RayField, WarpField};
use tracing_subscriber::EnvFilter;

use crate::cli::{Args, EffectKind};
use crate::{still, window};

pub fn run(args: Args) -> Result<()> {
    initialise_tracing();
    match args.effect {
        EffectKind::Ray => run_effect::<RayField>(&args),
        EffectKind::Warp => run_effect::<WarpField>(&args),
    }
}

fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn run_effect<E: Effect + 'static>(args: &Args) -> Result<()> {
    let config = load_config::<E>(args)?;
    match &args.still {
        Some(output) => {
            let request = still::StillRequest {
                size: args.size,
                pixel_ratio: args.pixel_ratio,
                time: args.time,
            };
            still::export::<E>(config, &request, output)
        }
        None => window::run::<E>(config, args.size),
    }
}

fn load_config<E: Effect>(args: &Args) -> Result<E::Config> {
    let Some(path) = args.config.as_ref() else {
        tracing::debug!(effect = E::NAME, "no config file; using defaults");
        return Ok(E::Config::default());
    };
    let config = load_from_path::<E::Config>(path)
        .with_context(|| format!("failed to load {} options", E::NAME))?;
    tracing::info!(effect = E::NAME, path = %path.display(), "loaded effect options");
    Ok(config)
}
