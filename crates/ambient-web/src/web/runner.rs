//! The per-effect frame loop and its window listeners.
//!
//! ```text
//!   EffectHandle ──Rc──▶ EffectLoop ──owns──▶ rAF closure, listener closures
//!                            ▲                        │
//!                            └──────── Weak ──────────┘
//! ```
//!
//! Closures only hold a `Weak` back-reference, so releasing the last handle
//! drops the loop, and dropping the loop cancels the pending frame and
//! unregisters every listener.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use ambient::{ClientPoint, Effect, Engine, RayField, WarpField};
use scheduler::FrameTime;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Event, MouseEvent, Window};

use super::dom::{CanvasLayout, CanvasSurface, DomContainer};

pub(crate) type WebEngine<E> = Engine<E, CanvasSurface, DomContainer>;

/// Browser specifics of an effect.
pub(crate) trait WebEffect: Effect + 'static {
    /// Window event that carries pointer positions.
    const POINTER_EVENT: &'static str;
    const CANVAS: CanvasLayout;
}

impl WebEffect for RayField {
    const POINTER_EVENT: &'static str = "mousemove";
    const CANVAS: CanvasLayout = CanvasLayout {
        replace_children: true,
        style: &[
            ("position", "absolute"),
            ("top", "0"),
            ("left", "0"),
            ("width", "100%"),
            ("height", "100%"),
        ],
    };
}

impl WebEffect for WarpField {
    const POINTER_EVENT: &'static str = "pointermove";
    const CANVAS: CanvasLayout = CanvasLayout {
        replace_children: false,
        style: &[("display", "block"), ("width", "100%"), ("height", "100%")],
    };
}

/// Type-erased view of a running loop for the JS handle.
pub(crate) trait RunningEffect {
    fn stop(&self);
    fn is_running(&self) -> bool;
}

struct Listener {
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

pub(crate) struct EffectLoop<E: WebEffect> {
    window: Window,
    engine: RefCell<WebEngine<E>>,
    pending_frame: Cell<Option<i32>>,
    frame_callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
    listeners: RefCell<Vec<Listener>>,
}

impl<E: WebEffect> EffectLoop<E> {
    /// Registers the resize and pointer listeners and requests the first
    /// frame.
    pub(crate) fn start(window: Window, engine: WebEngine<E>) -> anyhow::Result<Rc<Self>> {
        let effect_loop = Rc::new(Self {
            window,
            engine: RefCell::new(engine),
            pending_frame: Cell::new(None),
            frame_callback: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
        });

        let weak = Rc::downgrade(&effect_loop);
        let on_frame = Closure::wrap(Box::new(move |timestamp: f64| {
            if let Some(effect_loop) = weak.upgrade() {
                effect_loop.on_frame(timestamp);
            }
        }) as Box<dyn FnMut(f64)>);
        *effect_loop.frame_callback.borrow_mut() = Some(on_frame);

        effect_loop.listen("resize", |effect_loop, _| {
            effect_loop.engine.borrow_mut().resize();
        })?;
        effect_loop.listen(E::POINTER_EVENT, |effect_loop, event| {
            if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                let client = ClientPoint::new(f64::from(mouse.client_x()), f64::from(mouse.client_y()));
                effect_loop.engine.borrow_mut().pointer_moved(client);
            }
        })?;

        effect_loop.request_frame();
        Ok(effect_loop)
    }

    fn listen(self: &Rc<Self>, event: &'static str, handler: fn(&Self, &Event)) -> anyhow::Result<()> {
        let weak = Rc::downgrade(self);
        let callback = Closure::wrap(Box::new(move |event: Event| {
            if let Some(effect_loop) = weak.upgrade() {
                handler(&effect_loop, &event);
            }
        }) as Box<dyn FnMut(Event)>);
        self.window
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .map_err(|err| anyhow::anyhow!("failed to listen for `{event}`: {err:?}"))?;
        self.listeners.borrow_mut().push(Listener { event, callback });
        Ok(())
    }

    fn request_frame(&self) {
        let frame_callback = self.frame_callback.borrow();
        let Some(callback) = frame_callback.as_ref() else {
            return;
        };
        match self.window.request_animation_frame(callback.as_ref().unchecked_ref()) {
            Ok(id) => self.pending_frame.set(Some(id)),
            Err(err) => {
                tracing::error!(effect = E::NAME, "requestAnimationFrame failed: {err:?}");
                self.pending_frame.set(None);
            }
        }
    }

    fn on_frame(&self, timestamp: f64) {
        self.pending_frame.set(None);
        let decision = self.engine.borrow_mut().frame(FrameTime::from_millis(timestamp));
        if decision.should_continue() {
            self.request_frame();
        } else {
            // The frame closure is still executing; it is released with the loop.
            self.remove_listeners();
        }
    }

    fn remove_listeners(&self) {
        for listener in self.listeners.borrow_mut().drain(..) {
            let removed = self.window.remove_event_listener_with_callback(
                listener.event,
                listener.callback.as_ref().unchecked_ref(),
            );
            if let Err(err) = removed {
                tracing::debug!(effect = E::NAME, event = listener.event, "listener removal failed: {err:?}");
            }
        }
    }

    fn teardown(&self) {
        if let Some(id) = self.pending_frame.take() {
            if let Err(err) = self.window.cancel_animation_frame(id) {
                tracing::debug!(effect = E::NAME, "cancelAnimationFrame failed: {err:?}");
            }
        }
        self.remove_listeners();
        if let Ok(mut engine) = self.engine.try_borrow_mut() {
            engine.stop();
        }
    }
}

impl<E: WebEffect> RunningEffect for EffectLoop<E> {
    fn stop(&self) {
        self.teardown();
    }

    fn is_running(&self) -> bool {
        self.engine
            .try_borrow()
            .map(|engine| engine.is_running())
            .unwrap_or(true)
    }
}

impl<E: WebEffect> Drop for EffectLoop<E> {
    fn drop(&mut self) {
        self.teardown();
    }
}
