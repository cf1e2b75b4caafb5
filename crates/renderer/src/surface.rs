use anyhow::Result;

use crate::types::SurfaceSize;
use crate::uniforms::UniformTable;

/// Something an effect can draw one full-screen frame onto.
///
/// Implemented by [`crate::WgpuSurface`] for real output and by
/// [`HeadlessSurface`] wherever a GPU is not available.
pub trait GpuSurface {
    /// Current drawing-buffer size in device pixels.
    fn size(&self) -> SurfaceSize;

    /// Resizes the drawing buffer. Sizes are already clamped to at least 1x1.
    fn set_size(&mut self, size: SurfaceSize);

    /// Uploads `uniforms` and draws one frame.
    fn draw(&mut self, uniforms: &UniformTable) -> Result<()>;
}

impl<T: GpuSurface + ?Sized> GpuSurface for Box<T> {
    fn size(&self) -> SurfaceSize {
        (**self).size()
    }

    fn set_size(&mut self, size: SurfaceSize) {
        (**self).set_size(size)
    }

    fn draw(&mut self, uniforms: &UniformTable) -> Result<()> {
        (**self).draw(uniforms)
    }
}

/// Surface that records what it was asked to draw.
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    size: SurfaceSize,
    last_uniforms: Option<UniformTable>,
    frames: u64,
    resizes: u64,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_uniforms(&self) -> Option<&UniformTable> {
        self.last_uniforms.as_ref()
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames
    }

    pub fn resize_count(&self) -> u64 {
        self.resizes
    }
}

impl GpuSurface for HeadlessSurface {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn set_size(&mut self, size: SurfaceSize) {
        self.resizes += 1;
        self.size = size;
    }

    fn draw(&mut self, uniforms: &UniformTable) -> Result<()> {
        self.frames += 1;
        self.last_uniforms = Some(uniforms.clone());
        Ok(())
    }
}
