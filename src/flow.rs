//! Flow control and application event loop.
//!
//! A "flow" is a piece of application logic living next to the GUI engine: it
//! builds controls when the window comes up and reacts once per frame (for
//! instance by draining the engine's drag events). [`run`] owns the winit
//! event loop, the window and the [`GuiEngine`], and drives every flow.
//!
//! # Lifecycle
//!
//! Each frame follows this pattern:
//! 1. winit window events are translated into engine input and queued (or
//!    handled at once while the window is unfocused)
//! 2. on redraw the engine runs its update pass (input, clip, update, hover)
//! 3. `on_update` is called on every flow
//! 4. the engine paints and presents to the window

use std::sync::Arc;

use instant::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use crate::{
    context::{GuiConfig, HostWindow, WinitWindow},
    engine::GuiEngine,
    events::InputEvent,
};

/// Application logic driven by [`run`].
///
/// # Lifecycle
///
/// 1. `on_init()` is called once after the window exists; build controls here
/// 2. `on_window_event()` is called for every winit window event
/// 3. `on_update()` is called every frame after the engine's update pass
pub trait GuiFlow {
    fn on_init(&mut self, engine: &mut GuiEngine) -> anyhow::Result<()>;

    fn on_update(&mut self, engine: &mut GuiEngine, dt: Duration);

    fn on_window_event(&mut self, _engine: &mut GuiEngine, _event: &WindowEvent) {}
}

struct App {
    engine: GuiEngine,
    host: Option<WinitWindow>,
    flows: Vec<Box<dyn GuiFlow>>,
    last_time: Instant,
}

impl App {
    fn new(config: GuiConfig, flows: Vec<Box<dyn GuiFlow>>) -> Self {
        Self {
            engine: GuiEngine::new(config),
            host: None,
            flows,
            last_time: Instant::now(),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.host.is_some() {
            return;
        }
        let config = self.engine.config();
        let (width, height) = config.initial_size;
        let window_attributes = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(PhysicalSize::new(width, height));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Unable to create the main window: {}", e);
                event_loop.exit();
                return;
            }
        };
        let host = WinitWindow::new(window);

        let (width, height) = host.client_size();
        self.engine.dispatch(InputEvent::Resized { width, height });

        for flow in self.flows.iter_mut() {
            if let Err(e) = flow.on_init(&mut self.engine) {
                log::error!("Flow initialization failed: {:#}", e);
                event_loop.exit();
                return;
            }
        }

        host.window().request_redraw();
        self.host = Some(host);
        self.last_time = Instant::now();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let host = match self.host.as_mut() {
            Some(host) => host,
            None => return,
        };

        if let Some(input) = host.translate(&event) {
            self.engine.receive_input(&mut *host, input);
        }

        self.flows
            .iter_mut()
            .for_each(|flow| flow.on_window_event(&mut self.engine, &event));

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            // The frame loop stops while unfocused; kick it off again.
            WindowEvent::Focused(true) => host.request_repaint(),
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();

                self.engine.update(&mut *host, dt);
                self.flows
                    .iter_mut()
                    .for_each(|flow| flow.on_update(&mut self.engine, dt));
                self.engine.render(&mut *host);
            }
            _ => {}
        }
    }
}

/// Open a window and run `flows` until the window is closed.
pub fn run(config: GuiConfig, flows: Vec<Box<dyn GuiFlow>>) -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config, flows);
    event_loop.run_app(&mut app)?;

    Ok(())
}
