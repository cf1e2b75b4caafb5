//! Live preview in a desktop window.
//!
//! The window stands in for the page container: its logical size is the
//! container's CSS size, its scale factor the device pixel ratio, and cursor
//! positions are reported in logical pixels relative to the window origin.

use std::rc::Rc;
use std::sync::Arc;

use ambient::{ClientPoint, Effect, Engine, FixedTarget, Viewport};
use anyhow::{anyhow, Result};
use renderer::{SurfaceSize, WgpuSurface};
use scheduler::{BoxedTimeSource, SystemTimeSource};
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowBuilder};

type Target = Rc<FixedTarget>;

struct Preview<E: Effect> {
    // Declared before `window` so the surface is released first.
    engine: Engine<E, WgpuSurface, Target>,
    target: Target,
    clock: BoxedTimeSource,
    window: Arc<Window>,
}

impl<E: Effect> Preview<E> {
    fn sync_viewport(&mut self) {
        self.target.set_viewport(viewport_of(&self.window));
        self.engine.resize();
    }

    fn cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        let scale = self.window.scale_factor();
        self.engine
            .pointer_moved(ClientPoint::new(position.x / scale, position.y / scale));
    }

    /// Returns `false` once the engine has stopped.
    fn redraw(&mut self) -> bool {
        self.engine.frame(self.clock.sample()).should_continue()
    }
}

fn viewport_of(window: &Window) -> Viewport {
    let physical = window.inner_size();
    let scale = window.scale_factor();
    Viewport::new(
        f64::from(physical.width) / scale,
        f64::from(physical.height) / scale,
        scale,
    )
}

fn is_escape(event: &KeyEvent) -> bool {
    event.state == ElementState::Pressed
        && matches!(event.logical_key, Key::Named(NamedKey::Escape))
}

pub fn run<E: Effect + 'static>(config: E::Config, size: SurfaceSize) -> Result<()> {
    let event_loop =
        EventLoop::new().map_err(|err| anyhow!("failed to create event loop: {err}"))?;
    let window = WindowBuilder::new()
        .with_title(format!("{} preview", E::NAME))
        .with_inner_size(LogicalSize::new(size.width, size.height))
        .build(&event_loop)
        .map_err(|err| anyhow!("failed to create preview window: {err}"))?;
    let window = Arc::new(window);

    let target = Rc::new(FixedTarget::new(viewport_of(&window)));
    let engine = Engine::<E, WgpuSurface, Target>::mount(
        Some(Rc::clone(&target)),
        config,
        |program, size, options| {
            // SAFETY: `Preview` drops the engine (and with it the surface)
            // before its own handle to the window.
            pollster::block_on(unsafe {
                WgpuSurface::from_window_handle(window.as_ref(), size, options, program)
            })
        },
    )
    .ok_or_else(|| anyhow!("failed to start the {} preview", E::NAME))?;

    let mut preview = Preview {
        engine,
        target,
        clock: Box::new(SystemTimeSource::new()),
        window,
    };
    preview.window.request_redraw();

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { window_id, event } if window_id == preview.window.id() => {
                match event {
                    WindowEvent::CloseRequested | WindowEvent::Destroyed => elwt.exit(),
                    WindowEvent::KeyboardInput { event, .. } if is_escape(&event) => elwt.exit(),
                    WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                        preview.sync_viewport();
                    }
                    WindowEvent::CursorMoved { position, .. } => preview.cursor_moved(position),
                    WindowEvent::RedrawRequested => {
                        if !preview.redraw() {
                            elwt.exit();
                        }
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => {
                preview.window.request_redraw();
                elwt.set_control_flow(ControlFlow::Wait);
            }
            _ => {}
        })
        .map_err(|err| anyhow!("window event loop error: {err}"))
}
