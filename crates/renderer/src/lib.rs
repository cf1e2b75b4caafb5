//! GPU plumbing shared by the ambient background effects.
//!
//! Every effect is a single full-screen fragment shader fed by one uniform
//! block. This crate owns the pieces that are identical across effects:
//!
//! ```text
//!   UniformTable ──▶ UniformLayout ──▶ GLSL uniform block ─┐
//!        │                                                 ▼
//!        │                           ShaderProgram (wrapped fragment body)
//!        ▼                                                 │
//!   to_std140() ──▶ GpuSurface::draw ◀── WgpuSurface ◀─────┘
//! ```
//!
//! Hosts create a [`WgpuSurface`] from a native window or a browser canvas,
//! or use [`HeadlessSurface`] when no GPU is involved.

mod compile;
mod gpu;
mod surface;
mod types;
mod uniforms;

pub use compile::ShaderProgram;
pub use gpu::WgpuSurface;
pub use surface::{GpuSurface, HeadlessSurface};
pub use types::{
    effective_pixel_ratio, ColorSpaceMode, SurfaceAlpha, SurfaceOptions, SurfaceSize,
    MAX_DEVICE_PIXEL_RATIO,
};
pub use uniforms::{
    UniformError, UniformKind, UniformLayout, UniformTable, UniformValue, UNIFORM_BLOCK_INSTANCE,
};
