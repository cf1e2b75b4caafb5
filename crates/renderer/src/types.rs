/// Device pixel ratios above this are clamped before sizing surfaces; extra
/// resolution buys nothing for soft procedural backgrounds.
pub const MAX_DEVICE_PIXEL_RATIO: f64 = 2.0;

/// Drawing-buffer size in physical (device) pixels. Never zero in either axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    /// Creates a size, clamping each axis to at least one pixel so the GPU
    /// never sees a degenerate surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Converts a CSS (logical) size into device pixels using the capped
    /// device pixel ratio.
    pub fn from_logical(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        let ratio = effective_pixel_ratio(device_pixel_ratio);
        Self::new(to_pixels(width * ratio), to_pixels(height * ratio))
    }

    pub fn as_f32(&self) -> [f32; 2] {
        [self.width as f32, self.height as f32]
    }
}

impl Default for SurfaceSize {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

/// Clamps a reported device pixel ratio into `(0, MAX_DEVICE_PIXEL_RATIO]`,
/// treating nonsense values as 1.
pub fn effective_pixel_ratio(device_pixel_ratio: f64) -> f64 {
    if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio.min(MAX_DEVICE_PIXEL_RATIO)
    } else {
        1.0
    }
}

fn to_pixels(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.floor().min(u32::MAX as f64) as u32
    } else {
        0
    }
}

/// Declares how the host should treat the surface alpha channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceAlpha {
    /// Frames fully cover whatever is behind the surface.
    #[default]
    Opaque,
    /// Frames carry premultiplied coverage and are blended by the compositor.
    Transparent,
}

/// Output color handling for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSpaceMode {
    /// Treat shader outputs as gamma-encoded, like a WebGL canvas does.
    #[default]
    Gamma,
    /// Treat shader outputs as linear and let an sRGB surface encode them.
    Linear,
}

/// Presentation preferences fixed when a surface is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurfaceOptions {
    pub alpha: SurfaceAlpha,
    pub color_space: ColorSpaceMode,
}

impl SurfaceOptions {
    pub fn transparent() -> Self {
        Self {
            alpha: SurfaceAlpha::Transparent,
            ..Self::default()
        }
    }
}
