//! Shader-driven ambient backgrounds.
//!
//! Two effects share one lifecycle:
//! - [`RayField`]: light rays fanning down from above the viewport, bent
//!   toward the pointer.
//! - [`WarpField`]: rotating bands of up to eight colors, warped by noise and
//!   the pointer.
//!
//! An [`Engine`] couples an effect with a [`renderer::GpuSurface`] and a
//! [`MountTarget`]; hosts (the browser frontend, the native preview) feed it
//! resize and pointer events and call [`Engine::frame`] once per display
//! frame until it answers [`scheduler::FrameDecision::Stop`].

pub mod color;
pub mod config;
mod effect;
mod engine;
mod error;
pub mod math;
pub mod mount;
pub mod pointer;
mod raster;
pub mod rayfield;
pub mod warpfield;

pub use config::{ConfigError, RayFieldConfig, RaysOrigin, WarpFieldConfig};
pub use effect::Effect;
pub use engine::{Engine, MountPlan};
pub use error::MountError;
pub use mount::{Bounds, ClientPoint, FixedTarget, MountTarget, Viewport};
pub use raster::rasterize;
pub use rayfield::RayField;
pub use warpfield::WarpField;

