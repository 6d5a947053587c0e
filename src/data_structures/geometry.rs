//! Rectangles and padding used for layout, clipping and hit-testing.
//!
//! All coordinates are absolute client-area coordinates in pixels with the
//! y axis pointing down. Positions and offsets use `cgmath` points and vectors.

use cgmath::{Point2, Vector2};

/// An axis-aligned rectangle stored as its four edges.
///
/// A rectangle whose `right < left` or `bottom < top` is empty. Intersections of
/// disjoint rectangles produce such empty rectangles rather than failing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    /// Effectively infinite clip used as the starting clip for every layer.
    ///
    /// Half of `f32::MAX` on the negative side keeps `right - left` finite.
    pub const UNBOUNDED: Rect = Rect {
        left: -f32::MAX * 0.5,
        top: -f32::MAX * 0.5,
        right: f32::MAX,
        bottom: f32::MAX,
    };

    pub const ZERO: Rect = Rect {
        left: 0.0,
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
    };

    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Build a rectangle from its top-left corner and size.
    pub fn from_origin_size(origin: Point2<f32>, size: Vector2<f32>) -> Self {
        Self {
            left: origin.x,
            top: origin.y,
            right: origin.x + size.x,
            bottom: origin.y + size.y,
        }
    }

    pub fn origin(&self) -> Point2<f32> {
        Point2::new(self.left, self.top)
    }

    pub fn size(&self) -> Vector2<f32> {
        Vector2::new(self.width(), self.height())
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Point2<f32> {
        Point2::new(
            self.left + self.width() * 0.5,
            self.top + self.height() * 0.5,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }

    /// Half-open containment: the left and top edges belong to the rectangle,
    /// the right and bottom edges do not.
    pub fn contains(&self, point: Point2<f32>) -> bool {
        point.x >= self.left && point.x < self.right && point.y >= self.top && point.y < self.bottom
    }

    /// Whether `other` lies completely inside `self`. Empty rectangles are
    /// contained in everything.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.is_empty()
            || (other.left >= self.left
                && other.top >= self.top
                && other.right <= self.right
                && other.bottom <= self.bottom)
    }

    pub fn intersect(&self, other: &Rect) -> Rect {
        Rect {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.min(other.bottom),
        }
    }

    pub fn translate(&self, offset: Vector2<f32>) -> Rect {
        Rect {
            left: self.left + offset.x,
            top: self.top + offset.y,
            right: self.right + offset.x,
            bottom: self.bottom + offset.y,
        }
    }

    /// Keep the size but move the top-left corner to `origin`.
    pub fn with_origin(&self, origin: Point2<f32>) -> Rect {
        Rect::from_origin_size(origin, self.size())
    }

    /// Keep the top-left corner but change the size.
    pub fn with_size(&self, size: Vector2<f32>) -> Rect {
        Rect::from_origin_size(self.origin(), size)
    }

    pub fn shrink(&self, padding: &Padding) -> Rect {
        Rect {
            left: self.left + padding.left,
            top: self.top + padding.top,
            right: self.right - padding.right,
            bottom: self.bottom - padding.bottom,
        }
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::ZERO
    }
}

/// Insets between a control's rectangle and its padding rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Padding {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Padding {
    pub fn uniform(amount: f32) -> Self {
        Self {
            left: amount,
            top: amount,
            right: amount,
            bottom: amount,
        }
    }
}

/// Move a pointer position onto the center of the pixel it addresses.
///
/// Two siblings sharing an edge would otherwise both claim the boundary pixel.
pub fn pixel_center(position: Point2<f32>) -> Point2<f32> {
    position + Vector2::new(0.5, 0.5)
}
