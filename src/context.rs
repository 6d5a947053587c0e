//! Host-window collaboration and configuration.
//!
//! The engine never owns a window. Instead every frame it is handed something
//! implementing [`HostWindow`], which reports client size, cursor and focus,
//! accepts repaint requests and cursor changes, and presents the finished
//! [`DisplayList`]. [`WinitWindow`] is the implementation used by
//! [`crate::flow::run`]; tests use their own in-memory host.

use std::sync::Arc;

use cgmath::{Point2, Vector2};
use winit::{
    event::{ElementState, WindowEvent},
    window::{CursorIcon, Window},
};

use crate::{events::InputEvent, render::{Color, DisplayList}};

/// Runtime configuration of the GUI engine and its window.
#[derive(Clone, Debug)]
pub struct GuiConfig {
    pub title: String,
    /// Client size used before the host reports its first resize.
    pub initial_size: (u32, u32),
    pub clear_colour: Color,
    /// Start with hover recomputation suspended.
    pub freeze_hover: bool,
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            title: "flow-gui".to_string(),
            initial_size: (1280, 720),
            clear_colour: Color {
                r: 0.12,
                g: 0.12,
                b: 0.14,
                a: 1.0,
            },
            freeze_hover: false,
        }
    }
}

/// What the engine needs from the window it lives in.
pub trait HostWindow {
    fn client_size(&self) -> (u32, u32);

    /// Cursor position in client coordinates.
    fn cursor_position(&self) -> Point2<f32>;

    fn is_focused(&self) -> bool;

    /// Ask the host to schedule another paint.
    fn request_repaint(&mut self);

    fn set_cursor_icon(&mut self, icon: CursorIcon);

    /// Hand over the off-screen frame produced by a paint pass.
    fn present(&mut self, frame: DisplayList);
}

/// Pointer bookkeeping needed to turn winit events into [`InputEvent`]s.
#[derive(Clone, Copy, Debug)]
pub struct MouseState {
    pub coords: Point2<f32>,
    pub inside: bool,
}

impl Default for MouseState {
    fn default() -> Self {
        Self {
            coords: Point2::new(0.0, 0.0),
            inside: false,
        }
    }
}

/// [`HostWindow`] backed by a winit window.
#[derive(Debug)]
pub struct WinitWindow {
    pub(crate) window: Arc<Window>,
    pub mouse: MouseState,
    focused: bool,
    last_frame: Option<DisplayList>,
}

impl WinitWindow {
    pub fn new(window: Arc<Window>) -> Self {
        let focused = window.has_focus();
        Self {
            window,
            mouse: MouseState::default(),
            focused,
            last_frame: None,
        }
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// The frame most recently handed over by the engine.
    pub fn last_frame(&self) -> Option<&DisplayList> {
        self.last_frame.as_ref()
    }

    /// Track pointer and focus state and translate the event into engine
    /// input. Events the engine does not care about yield `None`.
    pub fn translate(&mut self, event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                let position = Point2::new(position.x as f32, position.y as f32);
                let delta: Vector2<f32> = position - self.mouse.coords;
                self.mouse.coords = position;
                self.mouse.inside = true;
                Some(InputEvent::Moved { position, delta })
            }
            WindowEvent::CursorEntered { .. } => {
                self.mouse.inside = true;
                None
            }
            WindowEvent::CursorLeft { .. } => {
                self.mouse.inside = false;
                None
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let position = self.mouse.coords;
                Some(match state {
                    ElementState::Pressed => InputEvent::Pressed {
                        position,
                        button: *button,
                    },
                    ElementState::Released => InputEvent::Released {
                        position,
                        button: *button,
                    },
                })
            }
            WindowEvent::Resized(size) => Some(InputEvent::Resized {
                width: size.width,
                height: size.height,
            }),
            WindowEvent::Focused(focused) => {
                self.focused = *focused;
                None
            }
            _ => None,
        }
    }
}

impl HostWindow for WinitWindow {
    fn client_size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    fn cursor_position(&self) -> Point2<f32> {
        self.mouse.coords
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn request_repaint(&mut self) {
        self.window.request_redraw();
    }

    fn set_cursor_icon(&mut self, icon: CursorIcon) {
        self.window.set_cursor(icon);
    }

    fn present(&mut self, frame: DisplayList) {
        log::trace!(
            "presenting {} draw command(s) at {}x{}",
            frame.len(),
            frame.width,
            frame.height
        );
        self.last_frame = Some(frame);
    }
}
