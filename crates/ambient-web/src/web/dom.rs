use ambient::{Bounds, MountTarget, Viewport};
use anyhow::{anyhow, Result};
use renderer::{
    GpuSurface, ShaderProgram, SurfaceOptions, SurfaceSize, UniformTable, WgpuSurface,
};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlCanvasElement, HtmlElement, Window};

/// How an effect's canvas is placed inside its container.
pub(crate) struct CanvasLayout {
    /// Remove whatever the container held before mounting.
    pub replace_children: bool,
    pub style: &'static [(&'static str, &'static str)],
}

/// A page element hosting an effect.
#[derive(Clone)]
pub(crate) struct DomContainer {
    element: HtmlElement,
    window: Window,
}

impl DomContainer {
    pub(crate) fn find(window: &Window, id: &str) -> Option<Self> {
        let element = window
            .document()?
            .get_element_by_id(id)?
            .dyn_into::<HtmlElement>()
            .ok()?;
        Some(Self {
            element,
            window: window.clone(),
        })
    }

    pub(crate) fn insert_canvas(&self, layout: &CanvasLayout) -> Result<HtmlCanvasElement> {
        self.try_insert_canvas(layout)
            .map_err(|err| anyhow!("failed to insert canvas: {err:?}"))
    }

    fn try_insert_canvas(&self, layout: &CanvasLayout) -> Result<HtmlCanvasElement, JsValue> {
        let document = self
            .element
            .owner_document()
            .ok_or_else(|| JsValue::from_str("container has no document"))?;
        let canvas = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()?;
        let style = canvas.style();
        for (property, value) in layout.style {
            style.set_property(property, value)?;
        }
        if layout.replace_children {
            while let Some(child) = self.element.first_child() {
                self.element.remove_child(&child)?;
            }
        }
        self.element.append_child(&canvas)?;
        Ok(canvas)
    }
}

impl MountTarget for DomContainer {
    fn is_attached(&self) -> bool {
        self.element.is_connected()
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(
            f64::from(self.element.client_width()),
            f64::from(self.element.client_height()),
            self.window.device_pixel_ratio(),
        )
    }

    fn bounds(&self) -> Bounds {
        let rect = self.element.get_bounding_client_rect();
        Bounds::new(rect.left(), rect.top(), rect.width(), rect.height())
    }
}

/// A [`WgpuSurface`] that also keeps its canvas' backing store in step with
/// the surface size. Dropping it removes the canvas from the page.
pub(crate) struct CanvasSurface {
    canvas: HtmlCanvasElement,
    inner: WgpuSurface,
}

impl CanvasSurface {
    pub(crate) async fn create(
        canvas: HtmlCanvasElement,
        size: SurfaceSize,
        options: SurfaceOptions,
        program: &ShaderProgram,
    ) -> Result<Self> {
        canvas.set_width(size.width);
        canvas.set_height(size.height);
        match WgpuSurface::from_canvas(canvas.clone(), size, options, program).await {
            Ok(inner) => {
                let surface = Self { canvas, inner };
                surface.sync_canvas();
                Ok(surface)
            }
            Err(err) => {
                canvas.remove();
                Err(err)
            }
        }
    }

    /// Matches the backing store to the surface, which may have been
    /// clamped below the requested size.
    fn sync_canvas(&self) {
        let size = self.inner.size();
        self.canvas.set_width(size.width);
        self.canvas.set_height(size.height);
    }
}

impl GpuSurface for CanvasSurface {
    fn size(&self) -> SurfaceSize {
        self.inner.size()
    }

    fn set_size(&mut self, size: SurfaceSize) {
        self.inner.set_size(size);
        self.sync_canvas();
    }

    fn draw(&mut self, uniforms: &UniformTable) -> Result<()> {
        self.inner.draw(uniforms)
    }
}

impl Drop for CanvasSurface {
    fn drop(&mut self) {
        self.canvas.remove();
    }
}
