//! The scene arena and Group operations.

use std::collections::HashMap;

use kurbo::Affine;

use crate::{
    animation::animator::{AnimatorId, DoneFn},
    path::{
        proxy::PathProxy,
        sink::{PathSink, Tee},
    },
    scene::{
        bbox::BoundingRect,
        event::{Eventful, SceneEvent},
        node::{Content, Node, NodeId, NodeKind, TextAlign, TextBaseline},
        storage::Storage,
        text::{TextMeasurer, TextWidthCache},
    },
};

/// Ascent used to place alphabetic-baseline text, in em.
const ALPHABETIC_ASCENT: f64 = 0.8;

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Generational node storage.
#[derive(Debug, Default)]
pub(crate) struct Arena {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl Arena {
    fn insert(&mut self, node: Node) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation += 1;
            slot.node = Some(node);
            return NodeId {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId {
            index,
            generation: 0,
        }
    }

    fn remove(&mut self, id: NodeId) -> Option<Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let node = slot.node.take()?;
        self.free.push(id.index);
        Some(node)
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&Node> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    pub(crate) fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, s)| {
            s.node.as_ref().map(|_| NodeId {
                index: i as u32,
                generation: s.generation,
            })
        })
    }

    fn children_mut(&mut self, id: NodeId) -> Option<&mut Vec<NodeId>> {
        match &mut self.get_mut(id)?.kind {
            NodeKind::Group(g) => Some(&mut g.children),
            NodeKind::Displayable(_) => None,
        }
    }

    /// Pre-order subtree ids, `id` first.
    pub(crate) fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            let Some(node) = self.get(cur) else {
                continue;
            };
            out.push(cur);
            stack.extend(node.children().iter().rev().copied());
        }
        out
    }
}

/// A retained scene: node arena, registered roots and the display list.
///
/// Tree misuse (cycles, stale ids, adding to a displayable) is ignored rather than reported.
pub struct Scene {
    pub(crate) arena: Arena,
    pub(crate) storage: Storage,
    /// Scene-level handlers, run after bubbling reaches the top.
    pub events: Eventful<SceneEvent>,
    pub(crate) text: TextWidthCache,
    pub(crate) hover: Option<NodeId>,
    pub(crate) animator_owner: HashMap<AnimatorId, NodeId>,
    pub(crate) next_animator: u64,
    needs_refresh: bool,
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("roots", &self.storage.roots())
            .field("animators", &self.animator_owner.len())
            .field("needs_refresh", &self.needs_refresh)
            .finish_non_exhaustive()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::with_text_measurer(TextWidthCache::default())
    }

    pub fn with_text_measurer(text: TextWidthCache) -> Self {
        Self {
            arena: Arena::default(),
            storage: Storage::default(),
            events: Eventful::new(),
            text,
            hover: None,
            animator_owner: HashMap::new(),
            next_animator: 0,
            needs_refresh: false,
        }
    }

    pub fn set_text_measurer(&mut self, measurer: Box<dyn TextMeasurer>) {
        self.text = TextWidthCache::new(measurer);
        self.needs_refresh = true;
    }

    /// Move `node` into the scene, detached.
    pub fn create(&mut self, node: Node) -> NodeId {
        let mut node = node;
        node.parent = None;
        self.arena.insert(node)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.get(id).is_some()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.arena.get(id)
    }

    /// Mutable access; the node is marked dirty and a repaint is requested.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let node = self.arena.get_mut(id)?;
        node.mark_dirty();
        self.needs_refresh = true;
        Some(node)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id)?.parent
    }

    /// Request a repaint without touching any node.
    pub fn request_refresh(&mut self) {
        self.needs_refresh = true;
    }

    pub fn needs_refresh(&self) -> bool {
        self.needs_refresh
    }

    pub(crate) fn clear_refresh(&mut self) {
        self.needs_refresh = false;
    }

    /// Mark geometry and transform stale and request a repaint.
    pub fn dirty(&mut self, id: NodeId) {
        if let Some(node) = self.arena.get_mut(id) {
            node.mark_dirty();
            self.needs_refresh = true;
        }
    }

    fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cur = Some(id);
        while let Some(c) = cur {
            if c == ancestor {
                return true;
            }
            cur = self.arena.get(c).and_then(|n| n.parent);
        }
        false
    }

    fn can_adopt(&self, group: NodeId, child: NodeId) -> bool {
        let Some(g) = self.arena.get(group) else {
            return false;
        };
        if !g.is_group() || !self.contains(child) || child == group {
            return false;
        }
        if self.parent(child) == Some(group) {
            return false;
        }
        !self.is_ancestor(child, group)
    }

    fn detach(&mut self, child: NodeId) {
        if let Some(old) = self.parent(child) {
            self.remove(old, child);
        } else if self.storage.is_root(child) {
            self.storage.remove_root(child);
            self.unregister_subtree(child);
        }
    }

    fn attach(&mut self, group: NodeId, child: NodeId) {
        if let Some(node) = self.arena.get_mut(child) {
            node.parent = Some(group);
            node.mark_dirty();
        }
        if self.storage.is_registered(group) {
            self.register_subtree(child);
        }
        self.needs_refresh = true;
    }

    /// Append `child` to `group`, detaching it from its previous parent first.
    pub fn add(&mut self, group: NodeId, child: NodeId) {
        if !self.can_adopt(group, child) {
            return;
        }
        self.detach(child);
        if let Some(children) = self.arena.children_mut(group) {
            children.push(child);
        }
        self.attach(group, child);
    }

    /// Insert `child` before `reference`, which must already be a child of `group`.
    pub fn add_before(&mut self, group: NodeId, child: NodeId, reference: NodeId) {
        if child == reference || !self.can_adopt(group, child) {
            return;
        }
        if !self.children(group).contains(&reference) {
            return;
        }
        self.detach(child);
        let Some(children) = self.arena.children_mut(group) else {
            return;
        };
        let Some(pos) = children.iter().position(|c| *c == reference) else {
            return;
        };
        children.insert(pos, child);
        self.attach(group, child);
    }

    pub fn remove(&mut self, group: NodeId, child: NodeId) {
        let Some(children) = self.arena.children_mut(group) else {
            return;
        };
        let Some(pos) = children.iter().position(|c| *c == child) else {
            return;
        };
        children.remove(pos);
        if let Some(node) = self.arena.get_mut(child) {
            node.parent = None;
        }
        self.unregister_subtree(child);
        self.needs_refresh = true;
    }

    pub fn remove_all(&mut self, group: NodeId) {
        let children = self.children(group).to_vec();
        for child in &children {
            self.unregister_subtree(*child);
            if let Some(node) = self.arena.get_mut(*child) {
                node.parent = None;
            }
        }
        if let Some(list) = self.arena.children_mut(group) {
            list.clear();
        }
        self.needs_refresh = true;
    }

    /// Register `id` as a top-level root of the display list.
    pub fn add_root(&mut self, id: NodeId) {
        if !self.contains(id) || self.storage.is_root(id) {
            return;
        }
        if let Some(old) = self.parent(id) {
            self.remove(old, id);
        }
        self.storage.add_root(id);
        self.register_subtree(id);
        self.needs_refresh = true;
    }

    pub fn remove_root(&mut self, id: NodeId) {
        if self.storage.is_root(id) {
            self.storage.remove_root(id);
            self.unregister_subtree(id);
            self.needs_refresh = true;
        }
    }

    pub fn roots(&self) -> &[NodeId] {
        self.storage.roots()
    }

    fn register_subtree(&mut self, id: NodeId) {
        for n in self.arena.subtree(id) {
            self.storage.add_to_storage(n);
        }
    }

    fn unregister_subtree(&mut self, id: NodeId) {
        for n in self.arena.subtree(id) {
            self.storage.del_from_storage(n);
        }
        if self.hover.is_some_and(|h| !self.storage.is_registered(h)) {
            self.hover = None;
        }
    }

    /// Remove `id` and its subtree from the scene, stopping their animators.
    pub fn destroy(&mut self, id: NodeId) {
        if !self.contains(id) {
            return;
        }
        self.detach(id);
        let mut aborted: Vec<DoneFn> = Vec::new();
        for n in self.arena.subtree(id) {
            if let Some(mut node) = self.arena.remove(n) {
                for mut a in std::mem::take(&mut node.animators) {
                    self.animator_owner.remove(&a.id);
                    aborted.extend(a.stop(&mut node, false));
                }
            }
        }
        self.needs_refresh = true;
        for cb in aborted {
            cb();
        }
    }

    pub fn children(&self, group: NodeId) -> &[NodeId] {
        match self.arena.get(group) {
            Some(n) => n.children(),
            None => &[],
        }
    }

    pub fn child_at(&self, group: NodeId, index: usize) -> Option<NodeId> {
        self.children(group).get(index).copied()
    }

    pub fn child_count(&self, group: NodeId) -> usize {
        self.children(group).len()
    }

    pub fn child_of_name(&self, group: NodeId, name: &str) -> Option<NodeId> {
        self.children(group)
            .iter()
            .copied()
            .find(|c| self.arena.get(*c).and_then(|n| n.name.as_deref()) == Some(name))
    }

    /// Visit direct children in order.
    pub fn each_child(&self, group: NodeId, mut f: impl FnMut(NodeId, &Node)) {
        for c in self.children(group) {
            if let Some(node) = self.arena.get(*c) {
                f(*c, node);
            }
        }
    }

    /// Visit every descendant depth-first, pre-order; the group itself is not visited.
    pub fn traverse(&self, group: NodeId, mut f: impl FnMut(NodeId, &Node)) {
        for c in self.children(group) {
            for n in self.arena.subtree(*c) {
                if let Some(node) = self.arena.get(n) {
                    f(n, node);
                }
            }
        }
    }

    /// Local-space bounds of a node; groups union their visible children.
    pub fn bounding_rect(&self, id: NodeId) -> BoundingRect {
        let Some(node) = self.arena.get(id) else {
            return BoundingRect::default();
        };
        let Some(d) = node.as_displayable() else {
            return self.group_bounding_rect(id);
        };
        let style = &d.style;
        match &d.content {
            Content::Path(shape) => {
                let rect = if d.path_dirty {
                    shape.to_path_proxy().bounding_rect()
                } else {
                    d.path.bounding_rect()
                };
                if style.has_stroke() {
                    rect.inflate(style.line_width / 2.0)
                } else {
                    rect
                }
            }
            Content::Text(t) => {
                let width = self.text.width(&t.text, &style.font());
                let height = style.font_size;
                let x = match style.text_align {
                    TextAlign::Left => t.x,
                    TextAlign::Center => t.x - width / 2.0,
                    TextAlign::Right => t.x - width,
                };
                let y = match style.text_baseline {
                    TextBaseline::Top => t.y,
                    TextBaseline::Middle => t.y - height / 2.0,
                    TextBaseline::Bottom => t.y - height,
                    TextBaseline::Alphabetic => t.y - height * ALPHABETIC_ASCENT,
                };
                BoundingRect::new(x, y, width, height)
            }
            Content::Image(img) => {
                let (w, h) = img.size();
                BoundingRect::new(img.x, img.y, w, h)
            }
        }
    }

    /// Union of non-ignored, visible children's bounds, each mapped by the child's local
    /// transform. A group with nothing to measure yields the zero rect.
    pub fn group_bounding_rect(&self, group: NodeId) -> BoundingRect {
        let mut out: Option<BoundingRect> = None;
        for c in self.children(group) {
            let Some(child) = self.arena.get(*c) else {
                continue;
            };
            if child.ignore || child.invisible {
                continue;
            }
            let mut rect = self.bounding_rect(*c);
            let local = child.transform.get_local_transform();
            if local != Affine::IDENTITY {
                rect.apply_transform(&local);
            }
            match &mut out {
                Some(acc) => acc.union(&rect),
                None => out = Some(rect),
            }
        }
        out.unwrap_or_default()
    }

    /// Rebuild a displayable's recorded path if stale.
    ///
    /// With a live sink the geometry is always rebuilt, recording and drawing in one pass.
    pub fn build_path(
        &mut self,
        id: NodeId,
        live: Option<&mut dyn PathSink>,
    ) -> Option<&PathProxy> {
        let d = self.arena.get_mut(id)?.as_displayable_mut()?;
        let Content::Path(shape) = &d.content else {
            return None;
        };
        match live {
            Some(sink) => {
                d.path.begin();
                shape.build_path(&mut Tee::new(&mut d.path, sink));
                d.path_dirty = false;
            }
            None if d.path_dirty => {
                d.path.begin();
                shape.build_path(&mut d.path);
                d.path_dirty = false;
            }
            None => {}
        }
        Some(&d.path)
    }

    pub(crate) fn alloc_animator_id(&mut self) -> AnimatorId {
        self.next_animator += 1;
        AnimatorId(self.next_animator)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/tree.rs"]
mod tests;
