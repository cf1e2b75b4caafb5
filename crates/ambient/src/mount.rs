use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;
use renderer::SurfaceSize;

/// CSS size of a container plus the page's device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub css_width: f64,
    pub css_height: f64,
    pub device_pixel_ratio: f64,
}

impl Viewport {
    pub fn new(css_width: f64, css_height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            css_width,
            css_height,
            device_pixel_ratio,
        }
    }

    /// Drawing-buffer size: CSS size times the capped pixel ratio, never 0.
    pub fn surface_size(&self) -> SurfaceSize {
        SurfaceSize::from_logical(self.css_width, self.css_height, self.device_pixel_ratio)
    }

    /// CSS size with zero (or nonsense) axes replaced by 1.
    pub fn css_size_or_unit(&self) -> [f32; 2] {
        let axis = |value: f64| {
            if value.is_finite() && value > 0.0 {
                value as f32
            } else {
                1.0
            }
        };
        [axis(self.css_width), axis(self.css_height)]
    }
}

/// Container rectangle in client (viewport) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Position of `client` inside the rectangle as fractions of its size,
    /// top-left origin. Zero-sized axes divide by 1.
    pub fn normalize(&self, client: ClientPoint) -> Vec2 {
        let width = if self.width == 0.0 { 1.0 } else { self.width };
        let height = if self.height == 0.0 { 1.0 } else { self.height };
        Vec2::new(
            ((client.x - self.left) / width) as f32,
            ((client.y - self.top) / height) as f32,
        )
    }
}

/// Pointer position in client coordinates, as delivered by input events.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClientPoint {
    pub x: f64,
    pub y: f64,
}

impl ClientPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The element an effect draws into. Engines only ever read from it.
pub trait MountTarget {
    /// Whether the element is still part of the page.
    fn is_attached(&self) -> bool;
    fn viewport(&self) -> Viewport;
    fn bounds(&self) -> Bounds;
}

impl<T: MountTarget + ?Sized> MountTarget for Rc<T> {
    fn is_attached(&self) -> bool {
        (**self).is_attached()
    }

    fn viewport(&self) -> Viewport {
        (**self).viewport()
    }

    fn bounds(&self) -> Bounds {
        (**self).bounds()
    }
}

/// A target whose geometry is set explicitly; used by the native preview and
/// in tests. Interior mutability lets a shared handle resize or detach it.
#[derive(Debug)]
pub struct FixedTarget {
    attached: Cell<bool>,
    viewport: Cell<Viewport>,
    origin: Cell<(f64, f64)>,
}

impl FixedTarget {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            attached: Cell::new(true),
            viewport: Cell::new(viewport),
            origin: Cell::new((0.0, 0.0)),
        }
    }

    pub fn set_viewport(&self, viewport: Viewport) {
        self.viewport.set(viewport);
    }

    pub fn set_origin(&self, left: f64, top: f64) {
        self.origin.set((left, top));
    }

    pub fn detach(&self) {
        self.attached.set(false);
    }
}

impl MountTarget for FixedTarget {
    fn is_attached(&self) -> bool {
        self.attached.get()
    }

    fn viewport(&self) -> Viewport {
        self.viewport.get()
    }

    fn bounds(&self) -> Bounds {
        let viewport = self.viewport.get();
        let (left, top) = self.origin.get();
        Bounds::new(left, top, viewport.css_width, viewport.css_height)
    }
}
