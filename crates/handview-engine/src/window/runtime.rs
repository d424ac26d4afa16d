use anyhow::{Context, Result};
use ouroboros::self_referencing;
use std::collections::HashMap;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::winit::translate_window_event;
use crate::input::{InputFrame, InputState};
use crate::time::HostTick;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "handview".to_string(),
            initial_size: LogicalSize::new(960.0, 540.0),
        }
    }
}

/// Entry point for the runtime.
///
/// Owns a single window and drives one `HostTick` per redraw. Redraws are requested
/// continuously while the window has a drawable size, so ticks follow the display
/// refresh when the surface uses FIFO presentation.
pub struct Runtime;

impl Runtime {
    pub fn run<A>(initial: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(initial, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    input_state: InputState,
    input_frame: InputFrame,
    tick_index: u64,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    initial: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    windows: HashMap<WindowId, WindowEntry>,
    exit_requested: bool,

    /// First unrecoverable error; reported from `Runtime::run` after the loop exits.
    fatal: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(initial: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            initial,
            gpu_init,
            app,
            windows: HashMap::new(),
            exit_requested: false,
            fatal: None,
        }
    }

    fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    fn fail(&mut self, err: anyhow::Error) {
        log::error!("{err:#}");
        if self.fatal.is_none() {
            self.fatal = Some(err);
        }
        self.request_exit();
    }

    fn create_window_entry(
        &mut self,
        event_loop: &ActiveEventLoop,
        config: RuntimeConfig,
    ) -> Result<WindowId> {
        let attrs = Window::default_attributes()
            .with_title(config.title)
            .with_inner_size(config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let id = window.id();
        let gpu_init = self.gpu_init.clone();

        let entry = WindowEntryTryBuilder {
            input_state: InputState::default(),
            input_frame: InputFrame::default(),
            tick_index: 0,
            window,
            gpu_builder: |w| {
                pollster::block_on(Gpu::new(w, gpu_init))
                    .context("GPU initialization failed for window")
            },
        }
            .try_build()?;

        self.windows.insert(id, entry);
        self.app.on_window_created(id);
        log::info!("window {id:?} created");
        Ok(id)
    }

    fn destroy_window_entry(&mut self, id: WindowId) {
        if self.windows.contains_key(&id) {
            self.app.on_window_destroyed(id);
            self.windows.remove(&id);
            log::info!("window {id:?} closed");
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId) {
        let mut app_control = AppControl::Continue;

        // Split borrows to avoid `self` capture inside `ouroboros` closures.
        let (app, windows) = (&mut self.app, &mut self.windows);

        if let Some(entry) = windows.get_mut(&window_id) {
            entry.with_mut(|fields| {
                let tick = next_tick(fields.tick_index, Instant::now());

                // Scope to ensure `ctx` is dropped before mutating frame state.
                {
                    let mut ctx = FrameCtx {
                        window: WindowCtx {
                            id: window_id,
                            window: fields.window,
                        },
                        gpu: fields.gpu,
                        input_frame: fields.input_frame,
                        tick,
                    };

                    app_control = app.on_frame(&mut ctx);
                }

                // Clear per-frame deltas after the frame is consumed.
                fields.input_frame.clear();
            });
        }

        if app_control == AppControl::Exit {
            self.request_exit();
            event_loop.exit();
        }
    }

    /// Requests a redraw unless the surface has no drawable area.
    ///
    /// A minimized window never presents, so FIFO pacing would not throttle the loop.
    fn request_redraw(&self, window_id: WindowId) {
        if let Some(entry) = self.windows.get(&window_id) {
            if is_drawable(entry.with_gpu(|gpu| gpu.size())) {
                entry.with_window(|w| w.request_redraw());
            }
        }
    }

    fn request_redraw_all(&self) {
        for id in self.windows.keys() {
            self.request_redraw(*id);
        }
    }
}

/// Produces the host tick for one redraw and advances the window's counter.
fn next_tick(index: &mut u64, now: Instant) -> HostTick {
    let tick = HostTick::new(now, *index);
    *index = index.wrapping_add(1);
    tick
}

fn is_drawable(size: PhysicalSize<u32>) -> bool {
    size.width > 0 && size.height > 0
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !self.windows.is_empty() {
            return;
        }

        if let Err(e) = self.create_window_entry(event_loop, self.initial.clone()) {
            self.fail(e.context("failed to create initial window"));
            event_loop.exit();
            return;
        }

        self.request_redraw_all();
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw: one host tick per presented frame.
        self.request_redraw_all();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let (app, windows) = (&mut self.app, &mut self.windows);

        let Some(entry) = windows.get_mut(&window_id) else {
            return;
        };

        let mut exit_from_app_event = false;

        entry.with_mut(|fields| {
            if let Some(ev) = translate_window_event(&event) {
                fields.input_state.apply_event(fields.input_frame, ev);
            }

            if app.on_window_event(window_id, &event) == AppControl::Exit {
                exit_from_app_event = true;
            }
        });

        if exit_from_app_event {
            self.request_exit();
            event_loop.exit();
            return;
        }

        // Runtime-managed window lifecycle / resize / redraw handling.
        match &event {
            WindowEvent::CloseRequested => {
                self.destroy_window_entry(window_id);
                if self.windows.is_empty() {
                    self.request_exit();
                    event_loop.exit();
                }
            }

            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.windows.get_mut(&window_id) {
                    entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                }
                self.request_redraw(window_id);
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = self.windows.get_mut(&window_id) {
                    let new_size = entry.with_window(|w| w.inner_size());
                    entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                }
                self.request_redraw(window_id);
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop, window_id),

            _ => {}
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // Tear down in a deterministic order: app hooks run before surfaces drop.
        let ids: Vec<WindowId> = self.windows.keys().copied().collect();
        for id in ids {
            self.destroy_window_entry(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn redraws_produce_one_sequential_tick_each() {
        let t0 = Instant::now();
        let mut index = 0;
        let ticks: Vec<HostTick> = (0..3)
            .map(|i| next_tick(&mut index, t0 + Duration::from_millis(i * 16)))
            .collect();
        assert_eq!(ticks.iter().map(|t| t.index).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(index, 3);
    }

    #[test]
    fn tick_index_wraps() {
        let mut index = u64::MAX;
        assert_eq!(next_tick(&mut index, Instant::now()).index, u64::MAX);
        assert_eq!(index, 0);
    }

    #[test]
    fn minimized_window_is_not_drawable() {
        assert!(!is_drawable(PhysicalSize::new(0, 0)));
        assert!(!is_drawable(PhysicalSize::new(800, 0)));
        assert!(!is_drawable(PhysicalSize::new(0, 600)));
        assert!(is_drawable(PhysicalSize::new(800, 600)));
    }
}
