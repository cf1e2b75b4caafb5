//! `wgpu`-backed [`GpuSurface`].
//!
//! A [`WgpuSurface`] owns the device, the configured presentation surface and
//! the single pipeline of one effect. Native hosts build it from raw window
//! handles; the browser host builds it from a canvas element.

mod context;
mod pipeline;

use anyhow::{anyhow, Context as AnyhowContext, Result};

use crate::compile::ShaderProgram;
use crate::surface::GpuSurface;
use crate::types::{SurfaceOptions, SurfaceSize};
use crate::uniforms::{UniformError, UniformLayout, UniformTable};

use self::context::GpuContext;
use self::pipeline::EffectPipeline;

pub struct WgpuSurface {
    context: GpuContext,
    pipeline: EffectPipeline,
    layout: UniformLayout,
    label: &'static str,
}

impl WgpuSurface {
    /// Creates a surface drawing into an existing native window.
    ///
    /// # Safety
    ///
    /// The window behind `target` must outlive the returned surface.
    #[cfg(not(target_arch = "wasm32"))]
    pub async unsafe fn from_window_handle<T>(
        target: &T,
        size: SurfaceSize,
        options: SurfaceOptions,
        program: &ShaderProgram,
    ) -> Result<Self>
    where
        T: raw_window_handle::HasDisplayHandle + raw_window_handle::HasWindowHandle,
    {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            flags: wgpu::InstanceFlags::default(),
            memory_budget_thresholds: wgpu::MemoryBudgetThresholds::default(),
            backend_options: wgpu::BackendOptions::default(),
        });

        let window_handle = target
            .window_handle()
            .map_err(|err| anyhow!("failed to acquire window handle: {err}"))?;
        let display_handle = target
            .display_handle()
            .map_err(|err| anyhow!("failed to acquire display handle: {err}"))?;

        let surface = unsafe {
            instance.create_surface_unsafe(wgpu::SurfaceTargetUnsafe::RawHandle {
                raw_display_handle: display_handle.as_raw(),
                raw_window_handle: window_handle.as_raw(),
            })
        }
        .context("failed to create rendering surface")?;

        Self::build(instance, surface, size, options, program).await
    }

    /// Creates a surface drawing into a canvas element, preferring WebGPU and
    /// falling back to WebGL2.
    #[cfg(target_arch = "wasm32")]
    pub async fn from_canvas(
        canvas: web_sys::HtmlCanvasElement,
        size: SurfaceSize,
        options: SurfaceOptions,
        program: &ShaderProgram,
    ) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            flags: wgpu::InstanceFlags::default(),
            memory_budget_thresholds: wgpu::MemoryBudgetThresholds::default(),
            backend_options: wgpu::BackendOptions::default(),
        });
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas))
            .context("failed to create canvas surface")?;

        Self::build(instance, surface, size, options, program).await
    }

    async fn build(
        instance: wgpu::Instance,
        surface: wgpu::Surface<'static>,
        size: SurfaceSize,
        options: SurfaceOptions,
        program: &ShaderProgram,
    ) -> Result<Self> {
        let context = GpuContext::new(instance, surface, size, options).await?;

        context.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = EffectPipeline::new(&context.device, context.surface_format, program);
        if let Some(err) = context.device.pop_error_scope().await {
            anyhow::bail!("failed to build `{}` pipeline: {err}", program.label());
        }
        tracing::debug!(
            label = program.label(),
            uniforms = program.layout().len(),
            bytes = program.layout().std140_size(),
            "effect pipeline ready"
        );

        Ok(Self {
            context,
            pipeline,
            layout: program.layout().clone(),
            label: program.label(),
        })
    }

    pub fn label(&self) -> &'static str {
        self.label
    }
}

impl GpuSurface for WgpuSurface {
    fn size(&self) -> SurfaceSize {
        self.context.size
    }

    fn set_size(&mut self, size: SurfaceSize) {
        self.context.resize(size);
    }

    fn draw(&mut self, uniforms: &UniformTable) -> Result<()> {
        if uniforms.layout() != self.layout {
            return Err(UniformError::LayoutMismatch.into());
        }

        let frame = match self.context.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::debug!(label = self.label, "surface lost; reconfiguring");
                self.context.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::trace!(label = self.label, "surface acquire timed out; skipping frame");
                return Ok(());
            }
            Err(err) => return Err(anyhow!("failed to acquire surface texture: {err}")),
        };

        self.context.queue.write_buffer(
            &self.pipeline.uniform_buffer,
            0,
            &uniforms.to_std140(),
        );

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("frame encoder"),
                });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("effect pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_pipeline(&self.pipeline.pipeline);
            render_pass.set_bind_group(0, &self.pipeline.uniform_bind_group, &[]);
            render_pass.draw(0..3, 0..1);
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}
