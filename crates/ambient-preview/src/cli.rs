use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use renderer::SurfaceSize;

#[derive(Parser, Debug)]
#[command(
    name = "ambient-preview",
    author,
    version,
    about = "Preview the ambient shader backgrounds in a window or export a still frame"
)]
pub struct Args {
    /// Effect to render.
    #[arg(value_enum, value_name = "EFFECT")]
    pub effect: EffectKind,

    /// Effect options as TOML or JSON, using the same keys as the web API.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Window or image size in logical pixels (e.g. `1280x720`).
    #[arg(
        long,
        value_name = "WIDTHxHEIGHT",
        value_parser = parse_size,
        default_value = "1280x720"
    )]
    pub size: SurfaceSize,

    /// Render one frame on the CPU and write it as PNG instead of opening a window.
    #[arg(long, value_name = "OUT.png")]
    pub still: Option<PathBuf>,

    /// Seconds of animation to simulate before capturing a still frame.
    #[arg(long, value_name = "SECS", default_value_t = 1.0, value_parser = parse_time)]
    pub time: f64,

    /// Device pixel ratio applied to still frames (capped at 2).
    #[arg(long, value_name = "RATIO", default_value_t = 1.0)]
    pub pixel_ratio: f64,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    #[value(alias = "rays", alias = "rayfield")]
    Ray,
    #[value(alias = "bends", alias = "warpfield")]
    Warp,
}

pub fn parse() -> Args {
    Args::parse()
}

pub fn parse_size(value: &str) -> Result<SurfaceSize, String> {
    let trimmed = value.trim();
    let (width, height) = trimmed
        .split_once(['x', 'X', '×'])
        .ok_or_else(|| "expected WxH format, e.g. 1280x720".to_string())?;

    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| format!("invalid width in '{trimmed}'"))?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| format!("invalid height in '{trimmed}'"))?;

    if width == 0 || height == 0 {
        return Err("dimensions must be greater than zero".to_string());
    }
    Ok(SurfaceSize::new(width, height))
}

fn parse_time(value: &str) -> Result<f64, String> {
    let seconds: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid time '{value}'"))?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err("time must be a non-negative number of seconds".to_string());
    }
    Ok(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_accepts_common_separators() {
        assert_eq!(parse_size("640x480"), Ok(SurfaceSize::new(640, 480)));
        assert_eq!(parse_size(" 800 X 600 "), Ok(SurfaceSize::new(800, 600)));
        assert_eq!(parse_size("32×16"), Ok(SurfaceSize::new(32, 16)));
    }

    #[test]
    fn size_rejects_bad_input() {
        assert!(parse_size("640").is_err());
        assert!(parse_size("0x480").is_err());
        assert!(parse_size("wide x tall").is_err());
    }

    #[test]
    fn still_arguments_parse() {
        let args = Args::try_parse_from([
            "ambient-preview",
            "bends",
            "--size",
            "64x32",
            "--still",
            "out.png",
            "--time",
            "2.5",
        ])
        .unwrap();
        assert_eq!(args.effect, EffectKind::Warp);
        assert_eq!(args.size, SurfaceSize::new(64, 32));
        assert_eq!(args.still, Some(PathBuf::from("out.png")));
        assert_eq!(args.time, 2.5);
        assert_eq!(args.pixel_ratio, 1.0);
        assert!(args.config.is_none());
    }

    #[test]
    fn negative_time_is_rejected() {
        assert!(Args::try_parse_from(["ambient-preview", "ray", "--time", "-1"]).is_err());
    }
}
