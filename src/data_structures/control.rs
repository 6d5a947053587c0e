//! Controls: the nodes of the GUI tree.
//!
//! A [`Control`] carries geometry, visibility state and two kinds of handlers:
//! its [`Widget`] (the per-instance handler, which knows the concrete control
//! variant) and any number of broadcast listeners that receive the control id
//! as an explicit argument. Dispatch always fires the widget first, then the
//! listeners in registration order.

use std::any::Any;
use std::fmt::Debug;

use slotmap::new_key_type;

use crate::{
    data_structures::geometry::{Padding, Rect},
    events::GuiEvent,
    render::{Color, Painter},
};

new_key_type! {
    /// Generational handle of a control. Ids of removed controls never
    /// resolve again, so holding one is a weak reference.
    pub struct ControlId;
}

/// Geometry snapshot handed to handlers together with each event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub id: ControlId,
    pub rect: Rect,
    pub padding_rect: Rect,
    pub visible_rect: Rect,
}

/// Upcast helper so a boxed widget can be checked against its concrete type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Per-instance behaviour of a control variant.
///
/// All methods default to doing nothing, so a widget only implements what it
/// reacts to.
pub trait Widget: AsAny {
    /// Receive an update or pointer notification.
    fn on_event(&mut self, _bounds: &Bounds, _event: &GuiEvent) {}

    /// Record draw commands. The painter's clip is already set to
    /// `bounds.visible_rect`.
    fn on_paint(&mut self, _bounds: &Bounds, _painter: &mut Painter) {}
}

/// Broadcast handler for update and pointer notifications.
pub type EventListener = Box<dyn FnMut(ControlId, &GuiEvent)>;
/// Broadcast handler for paint notifications.
pub type PaintListener = Box<dyn FnMut(ControlId, &mut Painter)>;

/// A widget that does nothing. Useful for plain containers and layers.
#[derive(Debug, Default, Clone, Copy)]
pub struct Blank;

impl Widget for Blank {}

/// A container that fills its rectangle with a solid colour.
#[derive(Debug, Clone, Copy)]
pub struct Panel {
    pub background: Color,
}

impl Panel {
    pub fn new(background: Color) -> Self {
        Self { background }
    }
}

impl Widget for Panel {
    fn on_paint(&mut self, bounds: &Bounds, painter: &mut Painter) {
        painter.fill_rect(bounds.rect, self.background);
    }
}

pub struct Control {
    pub(crate) name: String,
    pub(crate) rect: Rect,
    pub(crate) padding: Padding,
    pub(crate) clip_rect: Rect,
    pub(crate) parent: Option<ControlId>,
    pub(crate) children: Vec<ControlId>,
    pub(crate) hoverable: bool,
    pub(crate) clip_children: bool,
    pub(crate) draggable: bool,
    pub(crate) is_layer: bool,
    pub(crate) context_menu: Option<ControlId>,
    pub(crate) widget: Box<dyn Widget>,
    pub(crate) listeners: Vec<EventListener>,
    pub(crate) paint_listeners: Vec<PaintListener>,
}

impl Control {
    /// Create a detached, hoverable control with an empty rectangle.
    pub fn new(widget: impl Widget) -> Self {
        Self {
            name: String::new(),
            rect: Rect::ZERO,
            padding: Padding::default(),
            clip_rect: Rect::UNBOUNDED,
            parent: None,
            children: Vec::new(),
            hoverable: true,
            clip_children: false,
            draggable: false,
            is_layer: false,
            context_menu: None,
            widget: Box::new(widget),
            listeners: Vec::new(),
            paint_listeners: Vec::new(),
        }
    }

    pub(crate) fn layer() -> Self {
        let mut layer = Self::new(Blank).named("layer");
        layer.is_layer = true;
        layer.hoverable = false;
        layer
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    pub fn hoverable(mut self, hoverable: bool) -> Self {
        self.hoverable = hoverable;
        self
    }

    pub fn clip_children(mut self, clip: bool) -> Self {
        self.clip_children = clip;
        self
    }

    pub fn draggable(mut self, draggable: bool) -> Self {
        self.draggable = draggable;
        self
    }

    pub fn with_listener(mut self, listener: impl FnMut(ControlId, &GuiEvent) + 'static) -> Self {
        self.listeners.push(Box::new(listener));
        self
    }

    pub fn with_paint_listener(
        mut self,
        listener: impl FnMut(ControlId, &mut Painter) + 'static,
    ) -> Self {
        self.paint_listeners.push(Box::new(listener));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Change the rectangle of this control only. Children keep their place;
    /// use [`ControlTree::move_to`](super::tree::ControlTree::move_to) to move
    /// a whole subtree.
    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }

    pub fn set_padding(&mut self, padding: Padding) {
        self.padding = padding;
    }

    pub fn padding_rect(&self) -> Rect {
        self.rect.shrink(&self.padding)
    }

    /// Clip propagated from the parent during the last layout pass.
    pub fn clip_rect(&self) -> Rect {
        self.clip_rect
    }

    /// The part of the padding rectangle that survives the propagated clip.
    pub fn visible_rect(&self) -> Rect {
        self.padding_rect().intersect(&self.clip_rect)
    }

    pub fn parent(&self) -> Option<ControlId> {
        self.parent
    }

    pub fn children(&self) -> &[ControlId] {
        &self.children
    }

    pub fn is_hoverable(&self) -> bool {
        self.hoverable
    }

    pub fn set_hoverable(&mut self, hoverable: bool) {
        self.hoverable = hoverable;
    }

    pub fn is_children_clip_enabled(&self) -> bool {
        self.clip_children
    }

    pub fn set_clip_children(&mut self, clip: bool) {
        self.clip_children = clip;
    }

    pub fn is_draggable(&self) -> bool {
        self.draggable
    }

    pub fn set_draggable(&mut self, draggable: bool) {
        self.draggable = draggable;
    }

    pub fn is_layer(&self) -> bool {
        self.is_layer
    }

    pub fn context_menu(&self) -> Option<ControlId> {
        self.context_menu
    }

    pub fn add_listener(&mut self, listener: impl FnMut(ControlId, &GuiEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn add_paint_listener(&mut self, listener: impl FnMut(ControlId, &mut Painter) + 'static) {
        self.paint_listeners.push(Box::new(listener));
    }

    /// Borrow the widget as its concrete type, if it is one.
    pub fn widget<T: Widget>(&self) -> Option<&T> {
        let widget: &dyn Widget = &*self.widget;
        widget.as_any().downcast_ref::<T>()
    }

    pub fn widget_mut<T: Widget>(&mut self) -> Option<&mut T> {
        let widget: &mut dyn Widget = &mut *self.widget;
        widget.as_any_mut().downcast_mut::<T>()
    }

    pub fn widget_is<T: Widget>(&self) -> bool {
        self.widget::<T>().is_some()
    }

    pub fn bounds(&self, id: ControlId) -> Bounds {
        Bounds {
            id,
            rect: self.rect,
            padding_rect: self.padding_rect(),
            visible_rect: self.visible_rect(),
        }
    }

    /// Fire `event` on the widget, then on every broadcast listener.
    pub(crate) fn fire(&mut self, id: ControlId, event: &GuiEvent) {
        let bounds = self.bounds(id);
        self.widget.on_event(&bounds, event);
        for listener in self.listeners.iter_mut() {
            listener(id, event);
        }
    }

    pub(crate) fn paint(&mut self, id: ControlId, painter: &mut Painter) {
        let bounds = self.bounds(id);
        painter.set_clip(bounds.visible_rect);
        self.widget.on_paint(&bounds, painter);
        for listener in self.paint_listeners.iter_mut() {
            listener(id, painter);
        }
    }
}

impl Debug for Control {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Control")
            .field("name", &self.name)
            .field("rect", &self.rect)
            .field("clip_rect", &self.clip_rect)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("hoverable", &self.hoverable)
            .field("clip_children", &self.clip_children)
            .field("is_layer", &self.is_layer)
            .finish_non_exhaustive()
    }
}
