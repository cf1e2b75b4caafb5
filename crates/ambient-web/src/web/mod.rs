mod dom;
mod runner;

use std::cell::RefCell;
use std::rc::Rc;

use ambient::{MountError, MountPlan, RayField, WarpField};
use wasm_bindgen::prelude::*;
use web_sys::Window;

use crate::logging::{self, ConsoleMakeWriter};
use crate::presets;

use self::dom::{CanvasSurface, DomContainer};
use self::runner::{EffectLoop, RunningEffect, WebEffect};

thread_local! {
    static PRESETS: RefCell<Vec<EffectHandle>> = const { RefCell::new(Vec::new()) };
}

/// A mounted effect. Dropping every reference to it (or calling
/// [`EffectHandle::stop`]) tears the effect down.
#[wasm_bindgen]
#[derive(Clone)]
pub struct EffectHandle {
    inner: Rc<dyn RunningEffect>,
}

#[wasm_bindgen]
impl EffectHandle {
    /// Cancels the frame loop, removes listeners and the canvas. Safe to
    /// call repeatedly.
    pub fn stop(&self) {
        self.inner.stop();
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.inner.is_running()
    }
}

/// Mounts a RayField into the element with id `container_id`. Resolves to an
/// [`EffectHandle`], or `undefined` when the element is missing, the options
/// are invalid or no GPU surface could be created.
#[wasm_bindgen(js_name = mountRayField)]
pub async fn mount_ray_field(container_id: String, config: JsValue) -> JsValue {
    mount_from_js::<RayField>(&container_id, &config).await
}

/// Mounts a WarpField; see [`mount_ray_field`].
#[wasm_bindgen(js_name = mountWarpField)]
pub async fn mount_warp_field(container_id: String, config: JsValue) -> JsValue {
    mount_from_js::<WarpField>(&container_id, &config).await
}

/// Stops the backgrounds mounted when the module loaded.
#[wasm_bindgen(js_name = stopPresets)]
pub fn stop_presets() {
    let handles = PRESETS.with(|presets| presets.take());
    for handle in handles {
        handle.stop();
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init(ConsoleMakeWriter::browser());

    let Some(window) = web_sys::window() else {
        return;
    };
    let loading = window
        .document()
        .map(|document| document.ready_state() == "loading")
        .unwrap_or(false);
    if !loading {
        wasm_bindgen_futures::spawn_local(mount_presets());
        return;
    }

    let on_ready = Closure::once_into_js(|| wasm_bindgen_futures::spawn_local(mount_presets()));
    if let Err(err) =
        window.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())
    {
        tracing::error!("failed to wait for DOMContentLoaded: {err:?}");
    }
}

async fn mount_presets() {
    let rays = mount::<RayField>(presets::LIGHT_RAYS_CONTAINER, presets::light_rays()).await;
    let bends = mount::<WarpField>(presets::COLOR_BENDS_CONTAINER, presets::color_bends()).await;
    PRESETS.with(|presets| presets.borrow_mut().extend(rays.into_iter().chain(bends)));
}

async fn mount_from_js<E: WebEffect>(container_id: &str, config: &JsValue) -> JsValue {
    let json = if config.is_undefined() || config.is_null() {
        None
    } else {
        match js_sys::JSON::stringify(config) {
            Ok(json) => json.as_string(),
            Err(err) => {
                tracing::error!(effect = E::NAME, "options are not serializable: {err:?}");
                return JsValue::UNDEFINED;
            }
        }
    };
    let config = match crate::config_from_json::<E::Config>(json.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(effect = E::NAME, "invalid options: {err}");
            return JsValue::UNDEFINED;
        }
    };
    match mount::<E>(container_id, config).await {
        Some(handle) => handle.into(),
        None => JsValue::UNDEFINED,
    }
}

async fn mount<E: WebEffect>(container_id: &str, config: E::Config) -> Option<EffectHandle> {
    let window = web_sys::window()?;
    let container = DomContainer::find(&window, container_id);
    let plan = MountPlan::<E, DomContainer>::new(container, config)?;

    let surface = match create_surface(&plan).await {
        Ok(surface) => surface,
        Err(err) => {
            let err = MountError::surface(E::NAME, err);
            tracing::error!(effect = E::NAME, "{err}");
            return None;
        }
    };
    start_loop(window, plan.attach(surface))
}

async fn create_surface<E: WebEffect>(
    plan: &MountPlan<E, DomContainer>,
) -> anyhow::Result<CanvasSurface> {
    let canvas = plan.target().insert_canvas(&E::CANVAS)?;
    let program = plan.program();
    CanvasSurface::create(canvas, plan.surface_size(), plan.surface_options(), &program).await
}

fn start_loop<E: WebEffect>(window: Window, engine: runner::WebEngine<E>) -> Option<EffectHandle> {
    match EffectLoop::start(window, engine) {
        Ok(effect_loop) => Some(EffectHandle {
            inner: effect_loop,
        }),
        Err(err) => {
            tracing::error!(effect = E::NAME, "{err:#}");
            None
        }
    }
}
