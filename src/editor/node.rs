//! Widgets that make up a node graph: nodes, their ports, and link arrows.

use cgmath::{InnerSpace, Point2, Vector2};

use crate::{
    data_structures::{
        control::{Bounds, ControlId, Widget},
        geometry::Rect,
    },
    render::{Color, Painter},
};

pub const NODE_WIDTH: f32 = 160.0;
pub const NODE_HEADER_HEIGHT: f32 = 24.0;
pub const PORT_ROW_HEIGHT: f32 = 20.0;
pub const PORT_SIZE: f32 = 12.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PortDirection {
    Input,
    Output,
}

/// A connector on the left (input) or right (output) edge of a node.
#[derive(Clone, Debug, PartialEq)]
pub struct PortWidget {
    pub node: ControlId,
    pub index: usize,
    pub direction: PortDirection,
    pub name: String,
}

impl PortWidget {
    pub fn is_input(&self) -> bool {
        self.direction == PortDirection::Input
    }

    pub fn is_output(&self) -> bool {
        self.direction == PortDirection::Output
    }

    /// Ports connect only to ports of the other direction.
    pub fn is_compatible(&self, other: &PortWidget) -> bool {
        self.is_input() != other.is_input()
    }
}

impl Widget for PortWidget {
    fn on_paint(&mut self, bounds: &Bounds, painter: &mut Painter) {
        let color = match self.direction {
            PortDirection::Input => Color {
                r: 0.35,
                g: 0.65,
                b: 0.95,
                a: 1.0,
            },
            PortDirection::Output => Color {
                r: 0.95,
                g: 0.65,
                b: 0.3,
                a: 1.0,
            },
        };
        painter.fill_rect(bounds.rect, color);
    }
}

/// A box with a title and rows of ports. The port controls are children of
/// the node control; this widget only remembers their ids by index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeWidget {
    pub title: String,
    pub inputs: Vec<ControlId>,
    pub outputs: Vec<ControlId>,
}

impl NodeWidget {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn port(&self, direction: PortDirection, index: usize) -> Option<ControlId> {
        match direction {
            PortDirection::Input => self.inputs.get(index).copied(),
            PortDirection::Output => self.outputs.get(index).copied(),
        }
    }
}

impl Widget for NodeWidget {
    fn on_paint(&mut self, bounds: &Bounds, painter: &mut Painter) {
        let rect = bounds.rect;
        painter.fill_rect(
            rect,
            Color {
                r: 0.22,
                g: 0.22,
                b: 0.25,
                a: 1.0,
            },
        );
        let header = Rect::new(rect.left, rect.top, rect.right, rect.top + NODE_HEADER_HEIGHT);
        painter.fill_rect(
            header,
            Color {
                r: 0.3,
                g: 0.3,
                b: 0.4,
                a: 1.0,
            },
        );
        painter.text(
            Point2::new(rect.left + 6.0, rect.top + 4.0),
            self.title.clone(),
            Color::WHITE,
        );
        painter.stroke_rect(rect, Color::BLACK, 1.0);
    }
}

/// Size of a node with the given port counts.
pub fn node_size(inputs: usize, outputs: usize) -> Vector2<f32> {
    let rows = inputs.max(outputs) as f32;
    Vector2::new(NODE_WIDTH, NODE_HEADER_HEIGHT + rows * PORT_ROW_HEIGHT + 8.0)
}

/// Rectangle of a port, centered on the node's left or right edge.
pub fn port_rect(node: &Rect, direction: PortDirection, index: usize) -> Rect {
    let x = match direction {
        PortDirection::Input => node.left,
        PortDirection::Output => node.right,
    };
    let y = node.top + NODE_HEADER_HEIGHT + (index as f32 + 0.5) * PORT_ROW_HEIGHT;
    let half = PORT_SIZE * 0.5;
    Rect::new(x - half, y - half, x + half, y + half)
}

/// A straight line with a head at `end`.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrowWidget {
    pub begin: Point2<f32>,
    pub end: Point2<f32>,
    pub color: Color,
}

impl Default for ArrowWidget {
    fn default() -> Self {
        Self {
            begin: Point2::new(0.0, 0.0),
            end: Point2::new(0.0, 0.0),
            color: Color {
                r: 0.85,
                g: 0.85,
                b: 0.85,
                a: 1.0,
            },
        }
    }
}

pub const ARROW_MARGIN: f32 = 8.0;

impl ArrowWidget {
    pub fn set_end_points(&mut self, begin: Point2<f32>, end: Point2<f32>) {
        self.begin = begin;
        self.end = end;
    }

    /// Rectangle enclosing the arrow including its head.
    pub fn bounding_rect(&self) -> Rect {
        Rect::new(
            self.begin.x.min(self.end.x) - ARROW_MARGIN,
            self.begin.y.min(self.end.y) - ARROW_MARGIN,
            self.begin.x.max(self.end.x) + ARROW_MARGIN,
            self.begin.y.max(self.end.y) + ARROW_MARGIN,
        )
    }
}

impl Widget for ArrowWidget {
    fn on_paint(&mut self, _bounds: &Bounds, painter: &mut Painter) {
        painter.line(self.begin, self.end, self.color, 2.0);
        let direction = self.end - self.begin;
        if direction.magnitude2() <= f32::EPSILON {
            return;
        }
        let back = -direction.normalize() * 6.0;
        let side = Vector2::new(-back.y, back.x) * 0.5;
        painter.line(self.end, self.end + back + side, self.color, 2.0);
        painter.line(self.end, self.end + back - side, self.color, 2.0);
    }
}
