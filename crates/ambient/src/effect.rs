use renderer::{ShaderProgram, SurfaceOptions, SurfaceSize, UniformTable};
use scheduler::FrameTime;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::mount::{Bounds, ClientPoint, Viewport};

/// One procedural background: configuration, per-frame state and the shader
/// that turns that state into pixels.
///
/// Effects never touch the GPU themselves. [`crate::Engine`] asks for the
/// surface size and a fresh uniform snapshot, then hands both to a
/// [`renderer::GpuSurface`].
pub trait Effect: Sized {
    type Config: Clone + Default + DeserializeOwned + Serialize;

    const NAME: &'static str;

    fn new(config: Self::Config) -> Self;

    fn config(&self) -> &Self::Config;

    /// Shader program with the layout of [`Effect::uniforms`].
    fn program(&self) -> ShaderProgram;

    fn surface_options(&self) -> SurfaceOptions;

    /// Applies a new container size and returns the drawing-buffer size.
    fn resize(&mut self, viewport: Viewport) -> SurfaceSize;

    /// Records the latest raw pointer position.
    fn pointer_moved(&mut self, client: ClientPoint, bounds: Bounds);

    /// Advances time and smoothing to the frame at `now`.
    fn advance(&mut self, now: FrameTime);

    /// Snapshot of every uniform for the current state. The names and kinds
    /// never change over the effect's lifetime.
    fn uniforms(&self) -> UniformTable;

    /// CPU evaluation of the fragment shader at one pixel, returning the same
    /// premultiplied RGBA the GPU would write.
    ///
    /// `frag_coord` is in device pixels with a top-left origin (pixel centers
    /// at `.5`).
    fn shade(&self, frag_coord: [f32; 2]) -> [f32; 4];
}
