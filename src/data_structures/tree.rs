//! Control tree storage and traversal.
//!
//! Controls live in a generational arena. Ownership is expressed through the
//! ordered `children` list of each control; the `parent` field is only a
//! back-link used to walk ancestor chains and never keeps anything alive.
//! Removing a control removes its entire subtree (including owned context
//! menus), so the tree stays acyclic and free of dangling children.

use cgmath::{Point2, Vector2};
use log::debug;
use slotmap::SlotMap;

use crate::{
    data_structures::control::{Control, ControlId},
    error::{GuiError, Result},
};

#[derive(Debug, Default)]
pub struct ControlTree {
    controls: SlotMap<ControlId, Control>,
}

impl ControlTree {
    pub fn new() -> Self {
        Self {
            controls: SlotMap::with_key(),
        }
    }

    /// Insert a detached control and return its id.
    pub fn insert(&mut self, control: Control) -> ControlId {
        let mut control = control;
        control.parent = None;
        control.children.clear();
        self.controls.insert(control)
    }

    pub fn get(&self, id: ControlId) -> Option<&Control> {
        self.controls.get(id)
    }

    pub fn get_mut(&mut self, id: ControlId) -> Option<&mut Control> {
        self.controls.get_mut(id)
    }

    pub fn contains(&self, id: ControlId) -> bool {
        self.controls.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    fn require(&self, id: ControlId) -> Result<&Control> {
        self.controls.get(id).ok_or(GuiError::UnknownControl(id))
    }

    fn require_mut(&mut self, id: ControlId) -> Result<&mut Control> {
        self.controls
            .get_mut(id)
            .ok_or(GuiError::UnknownControl(id))
    }

    /// Attach `child` as the last (front-most) child of `parent`, detaching it
    /// from its previous parent first.
    pub fn attach(&mut self, parent: ControlId, child: ControlId) -> Result<()> {
        self.require(parent)?;
        self.require(child)?;
        if self.ancestors(parent).any(|ancestor| ancestor == child) {
            return Err(GuiError::Cycle { parent, child });
        }
        self.detach(child)?;
        self.require_mut(parent)?.children.push(child);
        self.require_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Unlink `child` from its parent. The control stays alive in the arena.
    /// Detaching an already detached control does nothing.
    pub fn detach(&mut self, child: ControlId) -> Result<()> {
        let parent = self.require(child)?.parent;
        if let Some(parent) = parent {
            if let Some(parent) = self.controls.get_mut(parent) {
                parent.children.retain(|&c| c != child);
            }
            self.require_mut(child)?.parent = None;
        }
        Ok(())
    }

    /// Whether `id` currently hangs under a parent.
    pub fn is_attached(&self, id: ControlId) -> bool {
        self.get(id).is_some_and(|c| c.parent.is_some())
    }

    /// Move `child` to the end of its parent's children so it is painted and
    /// hit-tested after its siblings.
    pub fn move_to_front(&mut self, child: ControlId) -> Result<()> {
        if let Some(parent) = self.require(child)?.parent {
            let siblings = &mut self.require_mut(parent)?.children;
            siblings.retain(|&c| c != child);
            siblings.push(child);
        }
        Ok(())
    }

    /// Remove `id`, its whole subtree and every context menu owned inside it.
    pub fn remove(&mut self, id: ControlId) -> Result<()> {
        self.detach(id)?;
        let mut stack = vec![id];
        let mut removed = 0usize;
        while let Some(next) = stack.pop() {
            if let Some(control) = self.controls.remove(next) {
                removed += 1;
                stack.extend(control.children);
                if let Some(menu) = control.context_menu {
                    if let Some(parent) = self.get(menu).and_then(Control::parent) {
                        if let Some(parent) = self.controls.get_mut(parent) {
                            parent.children.retain(|&c| c != menu);
                        }
                    }
                    stack.push(menu);
                }
            }
        }
        debug!("removed {} control(s) rooted at {:?}", removed, id);
        Ok(())
    }

    /// Give `owner` a context menu. The menu stays detached until the engine
    /// shows it on the overlay layer. Returns the previously owned menu, which
    /// is handed back to the caller rather than destroyed.
    pub fn set_context_menu(
        &mut self,
        owner: ControlId,
        menu: Option<ControlId>,
    ) -> Result<Option<ControlId>> {
        if let Some(menu) = menu {
            self.require(menu)?;
            if menu == owner {
                return Err(GuiError::Cycle {
                    parent: owner,
                    child: menu,
                });
            }
        }
        let control = self.require_mut(owner)?;
        Ok(std::mem::replace(&mut control.context_menu, menu))
    }

    /// Iterate from `id` up to its root, `id` first.
    pub fn ancestors(&self, id: ControlId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.contains(id).then_some(id),
        }
    }

    /// Nearest control on the ancestor chain (self included) matching `pred`.
    pub fn find_ancestor(
        &self,
        id: ControlId,
        mut pred: impl FnMut(&Control) -> bool,
    ) -> Option<ControlId> {
        self.ancestors(id)
            .find(|&ancestor| self.get(ancestor).is_some_and(&mut pred))
    }

    /// Pre-order depth-first listing of every subtree in `roots`, roots in the
    /// given order, parents before children, children in order.
    pub fn depth_first(&self, roots: &[ControlId]) -> Vec<ControlId> {
        let mut order = Vec::new();
        for &root in roots {
            let mut stack = vec![root];
            while let Some(id) = stack.pop() {
                if let Some(control) = self.get(id) {
                    order.push(id);
                    stack.extend(control.children.iter().rev().copied());
                }
            }
        }
        order
    }

    /// Move a control and all its descendants by `offset`.
    pub fn translate(&mut self, id: ControlId, offset: Vector2<f32>) -> Result<()> {
        self.require(id)?;
        for control in self.depth_first(&[id]) {
            if let Some(control) = self.controls.get_mut(control) {
                control.rect = control.rect.translate(offset);
            }
        }
        Ok(())
    }

    /// Move a control's top-left corner to `origin`, dragging its subtree along.
    pub fn move_to(&mut self, id: ControlId, origin: Point2<f32>) -> Result<()> {
        let offset = origin - self.require(id)?.rect.origin();
        self.translate(id, offset)
    }
}

/// Iterator over an ancestor chain, leaf first.
pub struct Ancestors<'a> {
    tree: &'a ControlTree,
    next: Option<ControlId>,
}

impl Iterator for Ancestors<'_> {
    type Item = ControlId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tree.get(current).and_then(Control::parent);
        Some(current)
    }
}
