//! Paint recording.
//!
//! Controls do not draw directly to a surface. During the paint pass each
//! control records [`DrawCommand`]s into a [`Painter`], which the engine hands
//! to the host as a finished [`DisplayList`]. Presenting the list (rasterizing
//! it into a window) is the host's business.
//!
//! # Key types
//!
//! - [`Painter`] records commands and tracks the current clip
//! - [`DrawCommand`] is one recorded primitive
//! - [`DisplayList`] is the ordered result of one paint pass

use cgmath::Point2;

use crate::data_structures::geometry::Rect;

/// Colours reuse the GPU backend's linear RGBA type.
pub type Color = wgpu::Color;

/// A single recorded primitive. Every command carries the clip that was
/// active when it was recorded.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    FillRect {
        rect: Rect,
        color: Color,
        clip: Rect,
    },
    StrokeRect {
        rect: Rect,
        color: Color,
        width: f32,
        clip: Rect,
    },
    Line {
        from: Point2<f32>,
        to: Point2<f32>,
        color: Color,
        width: f32,
        clip: Rect,
    },
    Text {
        origin: Point2<f32>,
        text: String,
        color: Color,
        clip: Rect,
    },
}

impl DrawCommand {
    pub fn clip(&self) -> Rect {
        match self {
            DrawCommand::FillRect { clip, .. }
            | DrawCommand::StrokeRect { clip, .. }
            | DrawCommand::Line { clip, .. }
            | DrawCommand::Text { clip, .. } => *clip,
        }
    }
}

/// Output of one paint pass, in paint order (back to front).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DisplayList {
    pub width: u32,
    pub height: u32,
    pub clear_colour: Color,
    pub commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Records draw commands for one frame.
#[derive(Debug)]
pub struct Painter {
    clip: Rect,
    list: DisplayList,
}

impl Painter {
    pub fn new(width: u32, height: u32, clear_colour: Color) -> Self {
        Self {
            clip: Rect::UNBOUNDED,
            list: DisplayList {
                width,
                height,
                clear_colour,
                commands: Vec::new(),
            },
        }
    }

    pub fn clip(&self) -> Rect {
        self.clip
    }

    pub(crate) fn set_clip(&mut self, clip: Rect) {
        self.clip = clip;
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.push(DrawCommand::FillRect {
            rect,
            color,
            clip: self.clip,
        });
    }

    pub fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32) {
        self.push(DrawCommand::StrokeRect {
            rect,
            color,
            width,
            clip: self.clip,
        });
    }

    pub fn line(&mut self, from: Point2<f32>, to: Point2<f32>, color: Color, width: f32) {
        self.push(DrawCommand::Line {
            from,
            to,
            color,
            width,
            clip: self.clip,
        });
    }

    pub fn text(&mut self, origin: Point2<f32>, text: impl Into<String>, color: Color) {
        self.push(DrawCommand::Text {
            origin,
            text: text.into(),
            color,
            clip: self.clip,
        });
    }

    fn push(&mut self, command: DrawCommand) {
        // Fully clipped commands would never reach a pixel.
        if self.clip.is_empty() {
            return;
        }
        self.list.commands.push(command);
    }

    pub fn finish(self) -> DisplayList {
        self.list
    }
}
