//! Event types flowing from the host window through the engine to controls.
//!
//! - [`InputEvent`] is raw host input (press, release, move, resize)
//! - [`CursorEvent`] is the payload handed to controls and global handlers
//! - [`GuiEvent`] is what a single control receives during dispatch
//! - [`DragEvent`] is the gesture stream the engine queues for drag consumers

use std::time::Duration;

use cgmath::{Point2, Vector2};
pub use winit::event::MouseButton;

use crate::data_structures::control::ControlId;

/// Raw input as delivered by a host window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    Pressed {
        position: Point2<f32>,
        button: MouseButton,
    },
    Released {
        position: Point2<f32>,
        button: MouseButton,
    },
    Moved {
        position: Point2<f32>,
        delta: Vector2<f32>,
    },
    Resized {
        width: u32,
        height: u32,
    },
}

/// Cursor payload passed to handlers.
///
/// `cursor_pos` is the raw client position, without the pixel-center offset
/// used for containment tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CursorEvent {
    pub cursor_pos: Point2<f32>,
    pub mouse_delta: Vector2<f32>,
    pub button: Option<MouseButton>,
}

impl CursorEvent {
    pub fn at(cursor_pos: Point2<f32>) -> Self {
        Self {
            cursor_pos,
            mouse_delta: Vector2::new(0.0, 0.0),
            button: None,
        }
    }

    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = Some(button);
        self
    }

    pub fn with_delta(mut self, delta: Vector2<f32>) -> Self {
        self.mouse_delta = delta;
        self
    }
}

/// A notification delivered to one control.
///
/// Every variant is fired twice per control: first to the control's widget,
/// then to each broadcast listener registered on that control.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GuiEvent {
    Update(Duration),
    Pressed(CursorEvent),
    Released(CursorEvent),
    Clicked(CursorEvent),
    Moved(CursorEvent),
    Entered(CursorEvent),
    Left(CursorEvent),
    Hovering(CursorEvent),
}

impl GuiEvent {
    pub fn cursor(&self) -> Option<&CursorEvent> {
        match self {
            GuiEvent::Update(_) => None,
            GuiEvent::Pressed(c)
            | GuiEvent::Released(c)
            | GuiEvent::Clicked(c)
            | GuiEvent::Moved(c)
            | GuiEvent::Entered(c)
            | GuiEvent::Left(c)
            | GuiEvent::Hovering(c) => Some(c),
        }
    }
}

/// Gesture stream produced by a primary-button press on a draggable control
/// followed by pointer movement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragEvent {
    Begin {
        target: ControlId,
        origin: Point2<f32>,
    },
    Drag {
        target: ControlId,
        position: Point2<f32>,
    },
    End {
        target: ControlId,
        position: Point2<f32>,
        drop_target: Option<ControlId>,
    },
}

impl DragEvent {
    pub fn target(&self) -> ControlId {
        match self {
            DragEvent::Begin { target, .. }
            | DragEvent::Drag { target, .. }
            | DragEvent::End { target, .. } => *target,
        }
    }
}
