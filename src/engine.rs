//! The GUI engine: layers, input dispatch and the frame loop.
//!
//! [`GuiEngine`] owns the control tree and the layer stack. It consumes raw
//! [`InputEvent`]s, bubbles pointer notifications from the hovered control up
//! to its layer, and drives a per-frame update and paint pass.
//!
//! # Frame lifecycle
//!
//! 1. Drain queued input (press, release, move, resize)
//! 2. Skip the rest if the host window is not focused
//! 3. Request a host repaint
//! 4. Propagate clip rectangles down every layer
//! 5. Fire `Update` on every control, depth-first across all layers
//! 6. Recompute the hovered control and fire leave/enter/hovering
//!
//! Painting is a separate call ([`GuiEngine::render`]) so a host can tie it to
//! its own redraw cadence.
//!
//! # Pointer gestures
//!
//! A press records its position and button. A release of the same button at
//! the same position is a click. While a drag is running, presses and
//! releases of other buttons neither replace nor end it.
//! A primary-button press on (or inside) a draggable control followed by
//! movement produces a [`DragEvent`] stream, queued for consumers such as the
//! node editor to drain once per frame.

use std::collections::VecDeque;
use std::time::Duration;

use cgmath::{Point2, Vector2};
use log::{debug, trace, warn};
use winit::window::CursorIcon;

use crate::{
    context::{GuiConfig, HostWindow},
    data_structures::{
        control::{Control, ControlId},
        geometry::{Rect, pixel_center},
        tree::ControlTree,
    },
    error::{GuiError, Result},
    events::{CursorEvent, DragEvent, GuiEvent, InputEvent, MouseButton},
    pick,
    render::{DisplayList, Painter},
};

/// Engine-level handler, fired before any control sees the event.
pub type GlobalHandler = Box<dyn FnMut(&CursorEvent)>;

#[derive(Default)]
struct GlobalHandlers {
    pressed: Vec<GlobalHandler>,
    released: Vec<GlobalHandler>,
    clicked: Vec<GlobalHandler>,
    moved: Vec<GlobalHandler>,
}

fn fire_global(handlers: &mut [GlobalHandler], event: &CursorEvent) {
    handlers.iter_mut().for_each(|handler| handler(event));
}

#[derive(Clone, Copy, Debug)]
struct Press {
    position: Point2<f32>,
    button: MouseButton,
    drag_candidate: Option<ControlId>,
    dragging: bool,
}

/// Which controls of an ancestor chain receive a bubbled event.
#[derive(Clone, Copy)]
enum Reach {
    Everyone,
    Containing(Point2<f32>),
    ContainingHoverable(Point2<f32>),
}

pub struct GuiEngine {
    config: GuiConfig,
    tree: ControlTree,
    layers: Vec<ControlId>,
    overlay_layer: ControlId,
    resolution: (u32, u32),
    hovered: Option<ControlId>,
    press: Option<Press>,
    active_overlay: Option<ControlId>,
    hover_frozen: bool,
    cursor_icon: CursorIcon,
    cursor_dirty: bool,
    input_queue: VecDeque<InputEvent>,
    drag_events: VecDeque<DragEvent>,
    handlers: GlobalHandlers,
}

impl GuiEngine {
    pub fn new(config: GuiConfig) -> Self {
        let mut tree = ControlTree::new();
        let (width, height) = config.initial_size;
        let overlay_layer = tree.insert(
            Control::layer()
                .named("overlay")
                .with_rect(Rect::new(0.0, 0.0, width as f32, height as f32)),
        );
        Self {
            hover_frozen: config.freeze_hover,
            resolution: config.initial_size,
            config,
            tree,
            layers: Vec::new(),
            overlay_layer,
            hovered: None,
            press: None,
            active_overlay: None,
            cursor_icon: CursorIcon::Default,
            cursor_dirty: false,
            input_queue: VecDeque::new(),
            drag_events: VecDeque::new(),
            handlers: GlobalHandlers::default(),
        }
    }

    pub fn config(&self) -> &GuiConfig {
        &self.config
    }

    /// Change the live configuration, e.g. the clear colour.
    pub fn configure(&mut self, f: impl FnOnce(&mut GuiConfig)) {
        f(&mut self.config);
    }

    pub fn tree(&self) -> &ControlTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut ControlTree {
        &mut self.tree
    }

    pub fn control(&self, id: ControlId) -> Option<&Control> {
        self.tree.get(id)
    }

    pub fn control_mut(&mut self, id: ControlId) -> Option<&mut Control> {
        self.tree.get_mut(id)
    }

    pub fn resolution(&self) -> (u32, u32) {
        self.resolution
    }

    // ---------------------------------------------------------------- layers

    /// Push a new layer on top of the user layers. The overlay layer always
    /// stays above every user layer.
    pub fn add_layer(&mut self) -> ControlId {
        let (width, height) = self.resolution;
        let layer = self.tree.insert(
            Control::layer().with_rect(Rect::new(0.0, 0.0, width as f32, height as f32)),
        );
        self.layers.push(layer);
        debug!("added layer {:?}, {} user layer(s)", layer, self.layers.len());
        layer
    }

    /// Remove a user layer and everything on it.
    pub fn remove_layer(&mut self, layer: ControlId) -> Result<()> {
        let Some(index) = self.layers.iter().position(|&l| l == layer) else {
            return Err(GuiError::InvalidArgument(format!(
                "{:?} is not a layer of this engine",
                layer
            )));
        };
        self.layers.remove(index);
        self.tree.remove(layer)
    }

    /// User layers in stack order, without the overlay.
    pub fn layers(&self) -> &[ControlId] {
        &self.layers
    }

    /// The reserved top-most layer for context menus and drag visuals.
    pub fn overlay_layer(&self) -> ControlId {
        self.overlay_layer
    }

    /// Every layer in traversal order: user layers, then the overlay.
    pub fn all_layers(&self) -> Vec<ControlId> {
        let mut layers = self.layers.clone();
        layers.push(self.overlay_layer);
        layers
    }

    // -------------------------------------------------------------- controls

    /// Insert `control` and attach it as the front-most child of `parent`.
    pub fn add_control(&mut self, parent: ControlId, control: Control) -> Result<ControlId> {
        let id = self.tree.insert(control);
        if let Err(e) = self.tree.attach(parent, id) {
            self.tree.remove(id)?;
            return Err(e);
        }
        Ok(id)
    }

    /// Remove a control with its subtree. Layers go through
    /// [`GuiEngine::remove_layer`]; the overlay layer cannot be removed.
    pub fn remove_control(&mut self, id: ControlId) -> Result<()> {
        if id == self.overlay_layer {
            return Err(GuiError::InvalidArgument(
                "the overlay layer cannot be removed".to_string(),
            ));
        }
        if self.layers.contains(&id) {
            return self.remove_layer(id);
        }
        self.tree.remove(id)
    }

    /// Register `menu` as the context menu of `owner`. The menu is owned by
    /// `owner` from now on and is removed together with it.
    pub fn set_context_menu(&mut self, owner: ControlId, menu: ControlId) -> Result<()> {
        self.tree.detach(menu)?;
        if let Some(previous) = self.tree.set_context_menu(owner, Some(menu))? {
            if previous != menu {
                if self.active_overlay == Some(previous) {
                    self.active_overlay = None;
                }
                self.tree.remove(previous)?;
            }
        }
        Ok(())
    }

    // --------------------------------------------------------- pointer state

    pub fn hovered(&self) -> Option<ControlId> {
        self.hovered.filter(|&id| self.tree.contains(id))
    }

    pub fn is_hover_frozen(&self) -> bool {
        self.hover_frozen
    }

    /// Suspend (or resume) hover recomputation in the frame loop.
    pub fn set_hover_frozen(&mut self, frozen: bool) {
        self.hover_frozen = frozen;
    }

    pub fn cursor_visual(&self) -> CursorIcon {
        self.cursor_icon
    }

    /// Change the cursor icon; applied to the host on the next update.
    pub fn set_cursor_visual(&mut self, icon: CursorIcon) {
        if self.cursor_icon != icon {
            self.cursor_icon = icon;
            self.cursor_dirty = true;
        }
    }

    pub fn active_overlay(&self) -> Option<ControlId> {
        self.active_overlay.filter(|&id| self.tree.contains(id))
    }

    /// Show `control` on the overlay layer with its top-left corner at
    /// `position`, replacing whatever overlay was active.
    pub fn show_overlay(&mut self, control: ControlId, position: Point2<f32>) -> Result<()> {
        self.dismiss_overlay();
        self.tree.attach(self.overlay_layer, control)?;
        self.tree.move_to(control, position)?;
        self.active_overlay = Some(control);
        debug!("showing overlay {:?} at {:?}", control, position);
        Ok(())
    }

    /// Detach the active overlay. Its owner keeps it for next time.
    pub fn dismiss_overlay(&mut self) {
        if let Some(overlay) = self.active_overlay.take() {
            if self.tree.contains(overlay) {
                if let Err(e) = self.tree.detach(overlay) {
                    warn!("could not dismiss overlay {:?}: {}", overlay, e);
                }
            }
        }
    }

    // -------------------------------------------------------- global handlers

    pub fn on_mouse_pressed(&mut self, handler: impl FnMut(&CursorEvent) + 'static) {
        self.handlers.pressed.push(Box::new(handler));
    }

    pub fn on_mouse_released(&mut self, handler: impl FnMut(&CursorEvent) + 'static) {
        self.handlers.released.push(Box::new(handler));
    }

    pub fn on_mouse_clicked(&mut self, handler: impl FnMut(&CursorEvent) + 'static) {
        self.handlers.clicked.push(Box::new(handler));
    }

    pub fn on_mouse_moved(&mut self, handler: impl FnMut(&CursorEvent) + 'static) {
        self.handlers.moved.push(Box::new(handler));
    }

    // ----------------------------------------------------------------- input

    /// Queue input to be handled at the start of the next [`GuiEngine::update`].
    pub fn push_input(&mut self, event: InputEvent) {
        self.input_queue.push_back(event);
    }

    /// Accept input from `host`. A focused host gets a repaint request so the
    /// next [`GuiEngine::update`] drains the queue; an unfocused host does not
    /// run frames, so its input is handled right away.
    pub fn receive_input(&mut self, host: &mut dyn HostWindow, event: InputEvent) {
        if host.is_focused() {
            self.push_input(event);
            host.request_repaint();
        } else {
            self.process_input();
            self.dispatch(event);
        }
    }

    /// Number of input events waiting for the next update.
    pub fn queued_input(&self) -> usize {
        self.input_queue.len()
    }

    /// Handle every queued input event in arrival order.
    pub fn process_input(&mut self) {
        while let Some(event) = self.input_queue.pop_front() {
            self.dispatch(event);
        }
    }

    /// Handle one input event immediately.
    pub fn dispatch(&mut self, event: InputEvent) {
        match event {
            InputEvent::Pressed { position, button } => self.mouse_pressed(position, button),
            InputEvent::Released { position, button } => self.mouse_released(position, button),
            InputEvent::Moved { position, delta } => self.mouse_moved(position, delta),
            InputEvent::Resized { width, height } => self.resize(width, height),
        }
    }

    /// Take every drag event produced since the last call.
    pub fn drain_drag_events(&mut self) -> Vec<DragEvent> {
        self.drag_events.drain(..).collect()
    }

    pub fn is_dragging(&self) -> bool {
        self.press.is_some_and(|press| press.dragging)
    }

    fn mouse_pressed(&mut self, position: Point2<f32>, button: MouseButton) {
        let event = CursorEvent::at(position).with_button(button);
        fire_global(&mut self.handlers.pressed, &event);

        // A drag stays bound to the button that started it.
        if self.is_dragging() {
            trace!("{:?} press during a drag leaves the drag alone", button);
        } else {
            let drag_candidate = match (button, self.hovered) {
                (MouseButton::Left, Some(hovered)) => {
                    self.tree.find_ancestor(hovered, Control::is_draggable)
                }
                _ => None,
            };
            self.press = Some(Press {
                position,
                button,
                drag_candidate,
                dragging: false,
            });
        }

        match self.hovered {
            Some(hovered) => {
                self.bubble(hovered, GuiEvent::Pressed(event), Reach::Containing(pixel_center(position)));
            }
            None => trace!("press at {:?} with nothing hovered", position),
        }

        self.dismiss_overlay();
    }

    fn mouse_released(&mut self, position: Point2<f32>, button: MouseButton) {
        let event = CursorEvent::at(position).with_button(button);
        fire_global(&mut self.handlers.released, &event);

        let press = match self.press {
            Some(press) if press.button == button => self.press.take(),
            _ => None,
        };
        let click = press.is_some_and(|press| press.position == position);

        self.dismiss_overlay();

        let point = pixel_center(position);
        if let Some(hovered) = self.hovered {
            self.bubble(hovered, GuiEvent::Released(event), Reach::Containing(point));
        }

        if click {
            fire_global(&mut self.handlers.clicked, &event);
            if let Some(hovered) = self.hovered {
                let reached = self.bubble(hovered, GuiEvent::Clicked(event), Reach::Containing(point));
                if button == MouseButton::Right {
                    self.open_context_menu(&reached, position);
                }
            }
        }

        if let Some(Press {
            drag_candidate: Some(target),
            dragging: true,
            ..
        }) = press
        {
            let drop_target = pick::hit_test(&self.tree, &self.all_layers(), position);
            self.drag_events.push_back(DragEvent::End {
                target,
                position,
                drop_target,
            });
        }
    }

    fn mouse_moved(&mut self, position: Point2<f32>, delta: Vector2<f32>) {
        let event = CursorEvent::at(position).with_delta(delta);
        fire_global(&mut self.handlers.moved, &event);

        if let Some(hovered) = self.hovered {
            self.bubble(hovered, GuiEvent::Moved(event), Reach::Containing(pixel_center(position)));
        }

        if let Some(press) = self.press.as_mut() {
            if let Some(target) = press.drag_candidate {
                if !press.dragging && position != press.position {
                    press.dragging = true;
                    self.drag_events.push_back(DragEvent::Begin {
                        target,
                        origin: press.position,
                    });
                }
                if press.dragging {
                    self.drag_events
                        .push_back(DragEvent::Drag { target, position });
                }
            }
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.resolution = (width, height);
        let rect = Rect::new(0.0, 0.0, width as f32, height as f32);
        for layer in self.all_layers() {
            if let Some(layer) = self.tree.get_mut(layer) {
                layer.set_rect(rect);
            }
        }
        debug!("resized to {}x{}", width, height);
    }

    /// The outermost control of the chain that owns a live context menu gets
    /// to show it; `chain` is leaf first.
    fn open_context_menu(&mut self, chain: &[ControlId], position: Point2<f32>) {
        let menu = chain.iter().rev().find_map(|&id| {
            self.tree
                .get(id)
                .and_then(Control::context_menu)
                .filter(|&menu| self.tree.contains(menu))
        });
        if let Some(menu) = menu {
            if let Err(e) = self.show_overlay(menu, position) {
                warn!("could not open context menu {:?}: {}", menu, e);
            }
        }
    }

    /// Fire `event` on `leaf` and its ancestors, leaf first. Returns the
    /// controls that received it.
    fn bubble(&mut self, leaf: ControlId, event: GuiEvent, reach: Reach) -> Vec<ControlId> {
        let chain: Vec<ControlId> = self.tree.ancestors(leaf).collect();
        let mut reached = Vec::with_capacity(chain.len());
        for id in chain {
            let receives = match reach {
                Reach::Everyone => true,
                Reach::Containing(point) => pick::contains(&self.tree, id, point),
                Reach::ContainingHoverable(point) => {
                    pick::contains(&self.tree, id, point)
                        && self.tree.get(id).is_some_and(Control::is_hoverable)
                }
            };
            if !receives {
                continue;
            }
            if let Some(control) = self.tree.get_mut(id) {
                control.fire(id, &event);
                reached.push(id);
            }
        }
        reached
    }

    // ------------------------------------------------------------ frame loop

    /// Recompute the clip of every control, depth-first from every layer.
    pub fn propagate_clip(&mut self) {
        for layer in self.all_layers() {
            let mut stack = vec![(layer, Rect::UNBOUNDED)];
            while let Some((id, clip)) = stack.pop() {
                let Some(control) = self.tree.get_mut(id) else {
                    continue;
                };
                control.clip_rect = clip;
                let child_clip = if control.clip_children {
                    clip.intersect(&control.padding_rect())
                } else {
                    clip
                };
                stack.extend(control.children.iter().map(|&child| (child, child_clip)));
            }
        }
    }

    /// Find the control under `cursor`.
    pub fn hit_test(&self, cursor: Point2<f32>) -> Option<ControlId> {
        pick::hit_test(&self.tree, &self.all_layers(), cursor)
    }

    /// Recompute the hovered control and fire leave, enter or hovering
    /// notifications.
    pub fn update_hover(&mut self, cursor: Point2<f32>) {
        let event = CursorEvent::at(cursor);
        let point = pixel_center(cursor);
        let hovered = self.hit_test(cursor);

        if hovered != self.hovered {
            if let Some(old) = self.hovered {
                self.bubble(old, GuiEvent::Left(event), Reach::Everyone);
            }
            if let Some(new) = hovered {
                self.bubble(new, GuiEvent::Entered(event), Reach::Containing(point));
            }
            trace!("hover {:?} -> {:?}", self.hovered, hovered);
        } else if let Some(current) = hovered {
            self.bubble(current, GuiEvent::Hovering(event), Reach::ContainingHoverable(point));
        }
        self.hovered = hovered;
    }

    /// Run one frame. Does nothing but drain input while the host is not
    /// focused.
    pub fn update(&mut self, host: &mut dyn HostWindow, dt: Duration) {
        self.process_input();
        if !host.is_focused() {
            trace!("host not focused, skipping frame");
            return;
        }

        host.request_repaint();
        self.propagate_clip();

        let event = GuiEvent::Update(dt);
        for id in self.tree.depth_first(&self.all_layers()) {
            if let Some(control) = self.tree.get_mut(id) {
                control.fire(id, &event);
            }
        }

        if self.cursor_dirty {
            host.set_cursor_icon(self.cursor_icon);
            self.cursor_dirty = false;
        }

        if !self.hover_frozen {
            self.update_hover(host.cursor_position());
        }
    }

    /// Paint every control depth-first across all layers.
    pub fn paint(&mut self) -> DisplayList {
        let (width, height) = self.resolution;
        let mut painter = Painter::new(width, height, self.config.clear_colour);
        for id in self.tree.depth_first(&self.all_layers()) {
            if let Some(control) = self.tree.get_mut(id) {
                control.paint(id, &mut painter);
            }
        }
        painter.finish()
    }

    /// Paint and present the result to the host.
    pub fn render(&mut self, host: &mut dyn HostWindow) {
        let frame = self.paint();
        host.present(frame);
    }
}

impl std::fmt::Debug for GuiEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuiEngine")
            .field("config", &self.config)
            .field("controls", &self.tree.len())
            .field("layers", &self.layers)
            .field("overlay_layer", &self.overlay_layer)
            .field("hovered", &self.hovered)
            .field("active_overlay", &self.active_overlay)
            .field("hover_frozen", &self.hover_frozen)
            .finish_non_exhaustive()
    }
}
