//! Effect lifecycle shared by every host.
//!
//! ```text
//!   MountPlan::new(target?, config) ──(host builds surface)──▶ MountPlan::attach ──▶ Engine
//!        │ None when target is absent                                      │
//!                                                                          ▼
//!   host frame callback ──▶ Engine::frame(now) ──▶ Continue | Stop
//! ```
//!
//! Surface creation is left to the host because it is synchronous on native
//! targets and asynchronous in the browser. [`Engine::mount`] covers the
//! synchronous case in one call.

use renderer::{GpuSurface, ShaderProgram, SurfaceOptions, SurfaceSize, UniformTable};
use scheduler::{FrameDecision, FrameStats, FrameTime};

use crate::effect::Effect;
use crate::error::MountError;
use crate::mount::{ClientPoint, MountTarget};

/// An effect sized to its target, waiting for a surface.
pub struct MountPlan<E, M> {
    effect: E,
    target: M,
    size: SurfaceSize,
}

impl<E: Effect, M: MountTarget> MountPlan<E, M> {
    /// Builds the effect and applies the initial resize. Returns `None`
    /// (after a debug log) when there is nothing to mount into.
    pub fn new(target: Option<M>, config: E::Config) -> Option<Self> {
        let Some(target) = target else {
            tracing::debug!(effect = E::NAME, "mount target missing; effect disabled");
            return None;
        };
        let mut effect = E::new(config);
        let size = effect.resize(target.viewport());
        Some(Self {
            effect,
            target,
            size,
        })
    }

    pub fn program(&self) -> ShaderProgram {
        self.effect.program()
    }

    pub fn surface_size(&self) -> SurfaceSize {
        self.size
    }

    pub fn surface_options(&self) -> SurfaceOptions {
        self.effect.surface_options()
    }

    pub fn target(&self) -> &M {
        &self.target
    }

    pub fn attach<S: GpuSurface>(self, mut surface: S) -> Engine<E, S, M> {
        if surface.size() != self.size {
            surface.set_size(self.size);
        }
        tracing::info!(
            effect = E::NAME,
            width = self.size.width,
            height = self.size.height,
            "effect mounted"
        );
        Engine {
            effect: self.effect,
            surface: Some(surface),
            target: self.target,
            stats: FrameStats::new(),
        }
    }
}

pub struct Engine<E, S, M> {
    effect: E,
    surface: Option<S>,
    target: M,
    stats: FrameStats,
}

impl<E: Effect, S: GpuSurface, M: MountTarget> Engine<E, S, M> {
    /// Plans and attaches in one step for hosts that create surfaces
    /// synchronously. Surface failures are logged and yield `None`.
    pub fn mount<F>(target: Option<M>, config: E::Config, make_surface: F) -> Option<Self>
    where
        F: FnOnce(&ShaderProgram, SurfaceSize, SurfaceOptions) -> anyhow::Result<S>,
    {
        let plan = MountPlan::<E, M>::new(target, config)?;
        let program = plan.program();
        match make_surface(&program, plan.surface_size(), plan.surface_options()) {
            Ok(surface) => Some(plan.attach(surface)),
            Err(err) => {
                let err = MountError::surface(E::NAME, err);
                tracing::error!(effect = E::NAME, "{err}");
                None
            }
        }
    }

    /// Re-reads the target size and resizes the surface to match.
    pub fn resize(&mut self) {
        let viewport = self.target.viewport();
        let size = self.effect.resize(viewport);
        if let Some(surface) = self.surface.as_mut() {
            if surface.size() != size {
                tracing::debug!(
                    effect = E::NAME,
                    width = size.width,
                    height = size.height,
                    "resizing surface"
                );
                surface.set_size(size);
            }
        }
    }

    pub fn pointer_moved(&mut self, client: ClientPoint) {
        if self.surface.is_none() {
            return;
        }
        let bounds = self.target.bounds();
        self.effect.pointer_moved(client, bounds);
    }

    /// Runs one frame: checks the target is still attached, advances the
    /// effect and draws. Draw failures are logged and do not stop the loop.
    pub fn frame(&mut self, now: FrameTime) -> FrameDecision {
        if self.surface.is_none() {
            return FrameDecision::Stop;
        }
        if !self.target.is_attached() {
            tracing::debug!(effect = E::NAME, "mount target detached; stopping");
            self.stop();
            return FrameDecision::Stop;
        }

        self.effect.advance(now);
        let uniforms = self.effect.uniforms();
        if let Some(surface) = self.surface.as_mut() {
            if let Err(err) = surface.draw(&uniforms) {
                tracing::warn!(effect = E::NAME, "frame draw failed: {err:#}");
            }
        }

        if let Some(fps) = self.stats.record(now) {
            tracing::debug!(effect = E::NAME, fps = f64::from(fps), "frame rate");
        }
        FrameDecision::Continue
    }

    /// Releases the surface. Later frames return [`FrameDecision::Stop`].
    /// Calling it again has no effect.
    pub fn stop(&mut self) {
        if self.surface.take().is_some() {
            tracing::debug!(
                effect = E::NAME,
                frames = self.stats.total_frames(),
                "effect stopped"
            );
        }
    }

    pub fn is_running(&self) -> bool {
        self.surface.is_some()
    }

    /// Uniform snapshot for the current state.
    pub fn uniforms(&self) -> UniformTable {
        self.effect.uniforms()
    }

    pub fn effect(&self) -> &E {
        &self.effect
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }
}
