use anyhow::{Context as AnyhowContext, Result};

use crate::types::{ColorSpaceMode, SurfaceAlpha, SurfaceOptions, SurfaceSize};

pub(crate) struct GpuContext {
    pub _instance: wgpu::Instance,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: SurfaceSize,
    pub surface_format: wgpu::TextureFormat,
    max_dimension: u32,
}

impl GpuContext {
    pub(crate) async fn new(
        instance: wgpu::Instance,
        surface: wgpu::Surface<'static>,
        initial_size: SurfaceSize,
        options: SurfaceOptions,
    ) -> Result<Self> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let adapter_info = adapter.get_info();
        tracing::debug!(
            name = %adapter_info.name,
            backend = ?adapter_info.backend,
            device_type = ?adapter_info.device_type,
            "selected GPU adapter"
        );

        let limits = adapter.limits();
        let max_dimension = limits.max_texture_dimension_2d;
        let initial_size = fit_to_limit(initial_size, max_dimension);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("ambient device"),
                required_features: wgpu::Features::empty(),
                required_limits: limits,
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: wgpu::Trace::default(),
            })
            .await
            .context("failed to create GPU device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = pick_format(&surface_caps.formats, options.color_space)
            .context("surface reports no supported texture formats")?;
        let alpha_mode = pick_alpha_mode(&surface_caps.alpha_modes, options.alpha);
        let present_mode = surface_caps
            .present_modes
            .iter()
            .copied()
            .find(|mode| *mode == wgpu::PresentMode::Fifo)
            .or_else(|| surface_caps.present_modes.first().copied())
            .unwrap_or(wgpu::PresentMode::Fifo);
        tracing::debug!(?surface_format, ?alpha_mode, ?present_mode, "configuring surface");

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: initial_size.width,
            height: initial_size.height,
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        Ok(Self {
            _instance: instance,
            surface,
            device,
            queue,
            config,
            size: initial_size,
            surface_format,
            max_dimension,
        })
    }

    /// Reconfigures the surface, clamping each axis to the device's maximum
    /// texture dimension.
    pub(crate) fn resize(&mut self, new_size: SurfaceSize) {
        let new_size = fit_to_limit(new_size, self.max_dimension);
        if new_size == self.size {
            return;
        }
        self.size = new_size;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    pub(crate) fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.config);
    }
}

fn fit_to_limit(size: SurfaceSize, max_dimension: u32) -> SurfaceSize {
    let clamped = clamp_to_limit(size, max_dimension);
    if clamped != size {
        tracing::warn!(
            requested = ?size,
            ?clamped,
            max_dimension,
            "surface exceeds the GPU texture limit; clamping"
        );
    }
    clamped
}

/// Caps each axis of `size` at `max_dimension`.
fn clamp_to_limit(size: SurfaceSize, max_dimension: u32) -> SurfaceSize {
    SurfaceSize::new(size.width.min(max_dimension), size.height.min(max_dimension))
}

fn pick_format(
    formats: &[wgpu::TextureFormat],
    color_space: ColorSpaceMode,
) -> Option<wgpu::TextureFormat> {
    let want_srgb = matches!(color_space, ColorSpaceMode::Linear);
    let preferred = formats
        .iter()
        .copied()
        .find(|format| format.is_srgb() == want_srgb);
    if preferred.is_none() {
        if let Some(fallback) = formats.first() {
            tracing::warn!(
                ?fallback,
                ?color_space,
                "no surface format matches the requested color space; falling back"
            );
        }
    }
    preferred.or_else(|| formats.first().copied())
}

fn pick_alpha_mode(
    modes: &[wgpu::CompositeAlphaMode],
    alpha: SurfaceAlpha,
) -> wgpu::CompositeAlphaMode {
    let wanted: &[wgpu::CompositeAlphaMode] = match alpha {
        SurfaceAlpha::Opaque => &[wgpu::CompositeAlphaMode::Opaque],
        SurfaceAlpha::Transparent => &[
            wgpu::CompositeAlphaMode::PreMultiplied,
            wgpu::CompositeAlphaMode::PostMultiplied,
        ],
    };
    wanted
        .iter()
        .copied()
        .find(|mode| modes.contains(mode))
        .or_else(|| {
            if alpha == SurfaceAlpha::Transparent {
                tracing::warn!(?modes, "surface cannot composite alpha; frames will be opaque");
            }
            modes.first().copied()
        })
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_axes_clamp_to_texture_limit() {
        assert_eq!(
            clamp_to_limit(SurfaceSize::new(9000, 1200), 8192),
            SurfaceSize::new(8192, 1200)
        );
        assert_eq!(
            clamp_to_limit(SurfaceSize::new(4096, 20000), 2048),
            SurfaceSize::new(2048, 2048)
        );
        let within = SurfaceSize::new(1920, 1080);
        assert_eq!(clamp_to_limit(within, 8192), within);
    }

    #[test]
    fn gamma_prefers_non_srgb_formats() {
        let formats = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Bgra8Unorm,
        ];
        assert_eq!(
            pick_format(&formats, ColorSpaceMode::Gamma),
            Some(wgpu::TextureFormat::Bgra8Unorm)
        );
        assert_eq!(
            pick_format(&formats, ColorSpaceMode::Linear),
            Some(wgpu::TextureFormat::Bgra8UnormSrgb)
        );
        assert_eq!(pick_format(&[], ColorSpaceMode::Gamma), None);
    }

    #[test]
    fn transparent_surfaces_prefer_premultiplied() {
        let modes = [
            wgpu::CompositeAlphaMode::Opaque,
            wgpu::CompositeAlphaMode::PreMultiplied,
        ];
        assert_eq!(
            pick_alpha_mode(&modes, SurfaceAlpha::Transparent),
            wgpu::CompositeAlphaMode::PreMultiplied
        );
        assert_eq!(
            pick_alpha_mode(&modes, SurfaceAlpha::Opaque),
            wgpu::CompositeAlphaMode::Opaque
        );
        assert_eq!(
            pick_alpha_mode(&[wgpu::CompositeAlphaMode::Opaque], SurfaceAlpha::Transparent),
            wgpu::CompositeAlphaMode::Opaque
        );
    }
}
