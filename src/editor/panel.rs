//! The node panel: a pannable surface of nodes connected by links.
//!
//! The panel composes the engine's control tree with drag gestures. Drag
//! events drained from the engine go through three priority-ordered
//! subscriptions (node drag, port drag, view pan). Every handler checks the
//! concrete widget type of the drag target and ignores targets that are not
//! its own, so each gesture is claimed by at most one of them.

use std::collections::BTreeMap;

use cgmath::{Point2, Vector2};
use log::{debug, warn};

use crate::{
    data_structures::{
        control::{Blank, Control, ControlId},
        geometry::Rect,
    },
    editor::node::{
        ArrowWidget, NodeWidget, PortDirection, PortWidget, node_size, port_rect,
    },
    engine::GuiEngine,
    error::{GuiError, Result},
    events::DragEvent,
};

/// Identity of a link: output `source_port` of `source` feeds input
/// `target_port` of `target`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkKey {
    pub source: ControlId,
    pub source_port: usize,
    pub target: ControlId,
    pub target_port: usize,
}

impl LinkKey {
    pub fn new(source: ControlId, source_port: usize, target: ControlId, target_port: usize) -> Self {
        Self {
            source,
            source_port,
            target,
            target_port,
        }
    }
}

/// What a new node looks like.
#[derive(Clone, Debug, Default)]
pub struct NodeDesc {
    pub title: String,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

impl NodeDesc {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn input(mut self, name: impl Into<String>) -> Self {
        self.inputs.push(name.into());
        self
    }

    pub fn output(mut self, name: impl Into<String>) -> Self {
        self.outputs.push(name.into());
        self
    }
}

type MoveHandler = fn(&mut NodePanel, &mut GuiEngine, ControlId, Point2<f32>);
type EndHandler = fn(&mut NodePanel, &mut GuiEngine, ControlId, Point2<f32>, Option<ControlId>);
type LinkListener = Box<dyn FnMut(&LinkKey)>;

pub struct NodePanel {
    layout: ControlId,
    nodes: Vec<ControlId>,
    links: BTreeMap<LinkKey, ControlId>,
    temporary_arrow: ControlId,
    drag_offset: Vector2<f32>,
    dragged_node: Option<ControlId>,
    dragged_port: Option<ControlId>,
    pan_origin: Point2<f32>,
    on_drag_begin: Vec<MoveHandler>,
    on_drag: Vec<MoveHandler>,
    on_drag_end: Vec<EndHandler>,
    on_link_added: Vec<LinkListener>,
}

impl NodePanel {
    /// Create a panel covering `parent`'s padding rectangle.
    pub fn new(engine: &mut GuiEngine, parent: ControlId) -> Result<Self> {
        let rect = engine
            .control(parent)
            .map(Control::padding_rect)
            .ok_or(GuiError::UnknownControl(parent))?;
        let layout = engine.add_control(
            parent,
            Control::new(Blank)
                .named("node-layout")
                .with_rect(rect)
                .clip_children(true)
                .draggable(true),
        )?;
        let temporary_arrow = engine.tree_mut().insert(
            Control::new(ArrowWidget::default())
                .named("temporary-arrow")
                .hoverable(false),
        );

        let mut panel = Self {
            layout,
            nodes: Vec::new(),
            links: BTreeMap::new(),
            temporary_arrow,
            drag_offset: Vector2::new(0.0, 0.0),
            dragged_node: None,
            dragged_port: None,
            pan_origin: Point2::new(0.0, 0.0),
            on_drag_begin: Vec::new(),
            on_drag: Vec::new(),
            on_drag_end: Vec::new(),
            on_link_added: Vec::new(),
        };

        panel.on_drag_begin.push(Self::on_node_drag_begin);
        panel.on_drag.push(Self::on_node_dragged);
        panel.on_drag_end.push(Self::on_node_drag_end);

        panel.on_drag_begin.push(Self::on_port_drag_begin);
        panel.on_drag.push(Self::on_port_dragged);
        panel.on_drag_end.push(Self::on_port_drag_end);

        panel.on_drag_begin.push(Self::on_pan_view_begin);
        panel.on_drag.push(Self::on_pan_view);

        Ok(panel)
    }

    /// The control everything on the panel hangs under.
    pub fn layout(&self) -> ControlId {
        self.layout
    }

    pub fn nodes(&self) -> &[ControlId] {
        &self.nodes
    }

    pub fn links(&self) -> impl Iterator<Item = &LinkKey> {
        self.links.keys()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn has_link(&self, key: &LinkKey) -> bool {
        self.links.contains_key(key)
    }

    /// The arrow control drawn for `key`.
    pub fn link_arrow(&self, key: &LinkKey) -> Option<ControlId> {
        self.links.get(key).copied()
    }

    pub fn temporary_arrow(&self) -> ControlId {
        self.temporary_arrow
    }

    pub fn dragged_node(&self) -> Option<ControlId> {
        self.dragged_node
    }

    pub fn dragged_port(&self) -> Option<ControlId> {
        self.dragged_port
    }

    pub fn node_position(&self, engine: &GuiEngine, node: ControlId) -> Option<Point2<f32>> {
        engine.control(node).map(|control| control.rect().origin())
    }

    /// Port control `index` of `node` in the given direction.
    pub fn port(
        &self,
        engine: &GuiEngine,
        node: ControlId,
        direction: PortDirection,
        index: usize,
    ) -> Option<ControlId> {
        engine
            .control(node)
            .and_then(|control| control.widget::<NodeWidget>())
            .and_then(|widget| widget.port(direction, index))
    }

    /// Called with every link committed by a port drag.
    pub fn on_link_added(&mut self, listener: impl FnMut(&LinkKey) + 'static) {
        self.on_link_added.push(Box::new(listener));
    }

    // ----------------------------------------------------------- structure

    pub fn add_node(
        &mut self,
        engine: &mut GuiEngine,
        desc: NodeDesc,
        position: Point2<f32>,
    ) -> Result<ControlId> {
        let size = node_size(desc.inputs.len(), desc.outputs.len());
        let rect = Rect::from_origin_size(position, size);
        let node = engine.add_control(
            self.layout,
            Control::new(NodeWidget::new(desc.title.clone()))
                .named(desc.title)
                .with_rect(rect)
                .draggable(true),
        )?;

        let mut inputs = Vec::with_capacity(desc.inputs.len());
        for (index, name) in desc.inputs.into_iter().enumerate() {
            inputs.push(self.add_port(engine, node, PortDirection::Input, index, name)?);
        }
        let mut outputs = Vec::with_capacity(desc.outputs.len());
        for (index, name) in desc.outputs.into_iter().enumerate() {
            outputs.push(self.add_port(engine, node, PortDirection::Output, index, name)?);
        }
        if let Some(widget) = engine
            .control_mut(node)
            .and_then(|control| control.widget_mut::<NodeWidget>())
        {
            widget.inputs = inputs;
            widget.outputs = outputs;
        }

        self.nodes.push(node);
        debug!("added node {:?} at {:?}", node, position);
        Ok(node)
    }

    fn add_port(
        &self,
        engine: &mut GuiEngine,
        node: ControlId,
        direction: PortDirection,
        index: usize,
        name: String,
    ) -> Result<ControlId> {
        let node_rect = engine
            .control(node)
            .map(Control::rect)
            .ok_or(GuiError::UnknownControl(node))?;
        engine.add_control(
            node,
            Control::new(PortWidget {
                node,
                index,
                direction,
                name: name.clone(),
            })
            .named(name)
            .with_rect(port_rect(&node_rect, direction, index))
            .draggable(true),
        )
    }

    /// Remove a node with its ports and every link touching it.
    pub fn remove_node(&mut self, engine: &mut GuiEngine, node: ControlId) -> Result<()> {
        let Some(index) = self.nodes.iter().position(|&n| n == node) else {
            return Err(GuiError::InvalidArgument(
                "node is not shown on this panel".to_string(),
            ));
        };
        self.nodes.remove(index);

        let touching: Vec<LinkKey> = self
            .links
            .keys()
            .filter(|key| key.source == node || key.target == node)
            .copied()
            .collect();
        for key in touching {
            self.remove_link(engine, &key)?;
        }

        if self.dragged_node == Some(node) {
            self.dragged_node = None;
        }
        if let Some(port) = self.dragged_port {
            if engine.tree().ancestors(port).any(|ancestor| ancestor == node) {
                engine.tree_mut().detach(self.temporary_arrow)?;
                self.dragged_port = None;
            }
        }

        engine.remove_control(node)
    }

    /// Connect two ports. Adding an existing link changes nothing and returns
    /// `false`.
    pub fn add_link(&mut self, engine: &mut GuiEngine, key: LinkKey) -> Result<bool> {
        if !self.nodes.contains(&key.source) || !self.nodes.contains(&key.target) {
            return Err(GuiError::InvalidArgument(
                "link endpoints must be nodes shown on this panel".to_string(),
            ));
        }
        if self
            .port(engine, key.source, PortDirection::Output, key.source_port)
            .is_none()
            || self
                .port(engine, key.target, PortDirection::Input, key.target_port)
                .is_none()
        {
            return Err(GuiError::InvalidArgument(format!(
                "no such ports for link {:?}",
                key
            )));
        }
        if self.links.contains_key(&key) {
            return Ok(false);
        }

        let arrow = engine.add_control(
            self.layout,
            Control::new(ArrowWidget::default())
                .named("link")
                .hoverable(false),
        )?;
        self.links.insert(key, arrow);
        self.update_link_position(engine, &key, arrow);
        debug!("added link {:?}", key);
        Ok(true)
    }

    pub fn remove_link(&mut self, engine: &mut GuiEngine, key: &LinkKey) -> Result<()> {
        match self.links.remove(key) {
            Some(arrow) => engine.remove_control(arrow),
            None => Err(GuiError::InvalidArgument(
                "there is no link between the specified nodes".to_string(),
            )),
        }
    }

    /// Remove every node and link and forget any drag in progress.
    pub fn clear(&mut self, engine: &mut GuiEngine) -> Result<()> {
        for (_, arrow) in std::mem::take(&mut self.links) {
            engine.remove_control(arrow)?;
        }
        for node in std::mem::take(&mut self.nodes) {
            engine.remove_control(node)?;
        }
        engine.tree_mut().detach(self.temporary_arrow)?;
        self.dragged_node = None;
        self.dragged_port = None;
        Ok(())
    }

    pub fn offset_all_nodes(&mut self, engine: &mut GuiEngine, offset: Vector2<f32>) {
        for &node in &self.nodes {
            if let Err(e) = engine.tree_mut().translate(node, offset) {
                warn!("could not move node {:?}: {}", node, e);
            }
        }
    }

    pub fn update_link_positions(&mut self, engine: &mut GuiEngine) {
        for (key, &arrow) in &self.links {
            self.update_link_position(engine, key, arrow);
        }
    }

    fn update_link_position(&self, engine: &mut GuiEngine, key: &LinkKey, arrow: ControlId) {
        let source = self
            .port(engine, key.source, PortDirection::Output, key.source_port)
            .and_then(|port| engine.control(port))
            .map(Control::rect);
        let target = self
            .port(engine, key.target, PortDirection::Input, key.target_port)
            .and_then(|port| engine.control(port))
            .map(Control::rect);
        let (Some(source), Some(target)) = (source, target) else {
            warn!("link {:?} points at missing ports", key);
            return;
        };

        let begin = source.center() + Vector2::new(source.width() / 2.0, 0.0);
        let end = target.center() - Vector2::new(target.width() / 2.0, 0.0);
        set_arrow(engine, arrow, begin, end);
    }

    /// Keep the layout covering its parent, e.g. after a window resize.
    pub fn fit_to_parent(&mut self, engine: &mut GuiEngine) {
        let parent_rect = engine
            .control(self.layout)
            .and_then(Control::parent)
            .and_then(|parent| engine.control(parent))
            .map(Control::padding_rect);
        if let (Some(rect), Some(layout)) = (parent_rect, engine.control_mut(self.layout)) {
            if layout.rect() != rect {
                layout.set_rect(rect);
            }
        }
    }

    // --------------------------------------------------------------- drags

    /// Drain the engine's drag events and route them through the handlers.
    pub fn on_frame(&mut self, engine: &mut GuiEngine) {
        self.fit_to_parent(engine);
        for event in engine.drain_drag_events() {
            self.handle_drag(engine, event);
        }
    }

    pub fn handle_drag(&mut self, engine: &mut GuiEngine, event: DragEvent) {
        match event {
            DragEvent::Begin { target, origin } => {
                for handler in self.on_drag_begin.clone() {
                    handler(self, engine, target, origin);
                }
            }
            DragEvent::Drag { target, position } => {
                for handler in self.on_drag.clone() {
                    handler(self, engine, target, position);
                }
            }
            DragEvent::End {
                target,
                position,
                drop_target,
            } => {
                for handler in self.on_drag_end.clone() {
                    handler(self, engine, target, position, drop_target);
                }
            }
        }
    }

    fn is_node(&self, engine: &GuiEngine, control: ControlId) -> bool {
        self.nodes.contains(&control)
            && engine
                .control(control)
                .is_some_and(|c| c.widget_is::<NodeWidget>())
    }

    fn port_widget(&self, engine: &GuiEngine, control: ControlId) -> Option<PortWidget> {
        engine
            .control(control)
            .and_then(|c| c.widget::<PortWidget>())
            .filter(|port| self.nodes.contains(&port.node))
            .cloned()
    }

    fn on_node_drag_begin(&mut self, engine: &mut GuiEngine, control: ControlId, origin: Point2<f32>) {
        if !self.is_node(engine, control) {
            return;
        }
        if let Some(position) = self.node_position(engine, control) {
            self.drag_offset = position - origin;
            self.dragged_node = Some(control);
        }
    }

    fn on_node_dragged(&mut self, engine: &mut GuiEngine, control: ControlId, position: Point2<f32>) {
        if self.is_node(engine, control) {
            if let Err(e) = engine.tree_mut().move_to(control, position + self.drag_offset) {
                warn!("could not move node {:?}: {}", control, e);
            }
            self.update_link_positions(engine);
        }
    }

    fn on_node_drag_end(
        &mut self,
        engine: &mut GuiEngine,
        control: ControlId,
        _position: Point2<f32>,
        _drop_target: Option<ControlId>,
    ) {
        if self.is_node(engine, control) {
            self.dragged_node = None;
        }
    }

    fn on_port_drag_begin(&mut self, engine: &mut GuiEngine, control: ControlId, _origin: Point2<f32>) {
        if self.port_widget(engine, control).is_none() {
            return;
        }
        let tree = engine.tree_mut();
        let attached = tree
            .detach(self.temporary_arrow)
            .and_then(|_| tree.attach(self.layout, self.temporary_arrow));
        if let Err(e) = attached {
            warn!("could not show the temporary arrow: {}", e);
            return;
        }
        self.dragged_port = Some(control);
    }

    fn on_port_dragged(&mut self, engine: &mut GuiEngine, control: ControlId, position: Point2<f32>) {
        let Some(port) = self.port_widget(engine, control) else {
            return;
        };
        let Some(rect) = engine.control(control).map(Control::rect) else {
            return;
        };
        let side = if port.is_output() { 1.0 } else { -1.0 };
        let mut begin = rect.center();
        begin.x += 0.5 * side * rect.width();
        let mut end = position;
        if port.is_input() {
            std::mem::swap(&mut begin, &mut end);
        }
        set_arrow(engine, self.temporary_arrow, begin, end);
    }

    fn on_port_drag_end(
        &mut self,
        engine: &mut GuiEngine,
        control: ControlId,
        _position: Point2<f32>,
        drop_target: Option<ControlId>,
    ) {
        let Some(port) = self.port_widget(engine, control) else {
            return;
        };
        if let Err(e) = engine.tree_mut().detach(self.temporary_arrow) {
            warn!("could not hide the temporary arrow: {}", e);
        }
        self.dragged_port = None;

        let Some(target) = drop_target.and_then(|target| self.port_widget(engine, target)) else {
            return;
        };
        if !port.is_compatible(&target) {
            debug!("dropped {:?} port on a port of the same direction", port.direction);
            return;
        }
        let (source, target) = if port.is_output() {
            (port, target)
        } else {
            (target, port)
        };
        let key = LinkKey::new(source.node, source.index, target.node, target.index);
        match self.add_link(engine, key) {
            Ok(true) => self.on_link_added.iter_mut().for_each(|listener| listener(&key)),
            Ok(false) => debug!("link {:?} already exists", key),
            Err(e) => warn!("could not add link {:?}: {}", key, e),
        }
    }

    fn on_pan_view_begin(&mut self, _engine: &mut GuiEngine, control: ControlId, origin: Point2<f32>) {
        if control == self.layout {
            self.pan_origin = origin;
        }
    }

    fn on_pan_view(&mut self, engine: &mut GuiEngine, control: ControlId, position: Point2<f32>) {
        if control == self.layout {
            let offset = position - self.pan_origin;
            self.pan_origin = position;
            self.offset_all_nodes(engine, offset);
            self.update_link_positions(engine);
        }
    }
}

fn set_arrow(engine: &mut GuiEngine, arrow: ControlId, begin: Point2<f32>, end: Point2<f32>) {
    let Some(control) = engine.control_mut(arrow) else {
        return;
    };
    let rect = match control.widget_mut::<ArrowWidget>() {
        Some(widget) => {
            widget.set_end_points(begin, end);
            widget.bounding_rect()
        }
        None => return,
    };
    control.set_rect(rect);
}

impl std::fmt::Debug for NodePanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodePanel")
            .field("layout", &self.layout)
            .field("nodes", &self.nodes)
            .field("links", &self.links)
            .field("dragged_node", &self.dragged_node)
            .field("dragged_port", &self.dragged_port)
            .finish_non_exhaustive()
    }
}
