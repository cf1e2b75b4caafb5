//! Still-frame export through the CPU reference shaders.

use std::path::Path;
use std::rc::Rc;

use ambient::{rasterize, Effect, Engine, FixedTarget, Viewport};
use anyhow::{anyhow, Context, Result};
use image::{ImageFormat, RgbaImage};
use renderer::{GpuSurface, HeadlessSurface, SurfaceSize};
use scheduler::{FrameTime, SteppedTimeSource, TimeSource};

/// Simulated frame rate used to reach the requested time.
const STILL_FPS: f64 = 60.0;

#[derive(Debug, Clone, Copy)]
pub struct StillRequest {
    /// Logical size of the virtual container.
    pub size: SurfaceSize,
    pub pixel_ratio: f64,
    /// Seconds since the first frame.
    pub time: f64,
}

/// Runs the effect from zero to `request.time` at 60 frames per second and
/// returns the last frame as straight RGBA rows.
pub fn render<E: Effect>(config: E::Config, request: &StillRequest) -> Result<(SurfaceSize, Vec<u8>)> {
    let viewport = Viewport::new(
        f64::from(request.size.width),
        f64::from(request.size.height),
        request.pixel_ratio,
    );
    let target = Rc::new(FixedTarget::new(viewport));
    let mut engine = Engine::<E, HeadlessSurface, _>::mount(Some(target), config, |_, _, _| {
        Ok(HeadlessSurface::new())
    })
    .ok_or_else(|| anyhow!("failed to mount {}", E::NAME))?;

    let mut clock = SteppedTimeSource::new(STILL_FPS);
    let frames = (request.time * STILL_FPS).ceil() as u64;
    for _ in 0..=frames {
        let seconds = clock.sample().seconds().min(request.time);
        engine.frame(FrameTime::from_secs(seconds));
    }

    let size = engine
        .surface()
        .map(GpuSurface::size)
        .ok_or_else(|| anyhow!("{} stopped before the still frame", E::NAME))?;
    Ok((size, rasterize(engine.effect(), size)))
}

pub fn export<E: Effect>(config: E::Config, request: &StillRequest, output: &Path) -> Result<()> {
    let (size, pixels) = render::<E>(config, request)?;
    let image = RgbaImage::from_raw(size.width, size.height, pixels)
        .ok_or_else(|| anyhow!("rendered buffer does not match {}x{}", size.width, size.height))?;
    image
        .save_with_format(output, ImageFormat::Png)
        .with_context(|| format!("failed to write {}", output.display()))?;
    tracing::info!(
        effect = E::NAME,
        width = size.width,
        height = size.height,
        path = %output.display(),
        "still frame written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ambient::{RayField, RayFieldConfig, WarpField, WarpFieldConfig};

    fn request(width: u32, height: u32, time: f64) -> StillRequest {
        StillRequest {
            size: SurfaceSize::new(width, height),
            pixel_ratio: 1.0,
            time,
        }
    }

    #[test]
    fn buffer_matches_device_size() {
        let request = StillRequest {
            pixel_ratio: 3.0,
            ..request(20, 10, 0.25)
        };
        let (size, pixels) = render::<WarpField>(WarpFieldConfig::default(), &request).unwrap();
        assert_eq!(size, SurfaceSize::new(40, 20));
        assert_eq!(pixels.len(), 40 * 20 * 4);
    }

    #[test]
    fn opaque_warp_field_has_full_alpha() {
        let config = WarpFieldConfig {
            colors: vec!["#00ffd1".into()],
            transparent: false,
            ..WarpFieldConfig::default()
        };
        let (_, pixels) = render::<WarpField>(config, &request(8, 8, 0.0)).unwrap();
        assert!(pixels.chunks_exact(4).all(|pixel| pixel[3] == 255));
    }

    #[test]
    fn rays_are_translucent() {
        let config = RayFieldConfig {
            mouse_influence: 0.0,
            noise_amount: 0.0,
            ..RayFieldConfig::default()
        };
        let (size, pixels) = render::<RayField>(config, &request(64, 64, 1.0)).unwrap();
        let alpha = |x: u32, y: u32| pixels[((y * size.width + x) * 4 + 3) as usize];
        // Straight below the anchor the beams are strong; the spread falloff
        // all but removes them at the top corners.
        assert!(alpha(size.width / 2, 0) > 16);
        assert!(alpha(0, 0) < alpha(size.width / 2, 0));
        assert!(alpha(size.width - 1, 0) < alpha(size.width / 2, 0));
    }

    #[test]
    fn export_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rays.png");
        export::<RayField>(RayFieldConfig::default(), &request(16, 9, 0.5), &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}
