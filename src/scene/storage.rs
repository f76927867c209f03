//! Registered roots and the z-ordered display list.

use std::collections::HashSet;

use crate::scene::{
    node::{ClipChain, NodeId, NodeKind},
    transform::Transformable,
    tree::{Arena, Scene},
};

/// One drawable in paint order.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayEntry {
    pub id: NodeId,
    /// Clip owners from outermost to innermost, including the node itself when it clips.
    pub clip_chain: ClipChain,
}

#[derive(Debug, Default)]
pub struct Storage {
    roots: Vec<NodeId>,
    registered: HashSet<NodeId>,
    list: Vec<DisplayEntry>,
}

impl Storage {
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn is_root(&self, id: NodeId) -> bool {
        self.roots.contains(&id)
    }

    pub(crate) fn add_root(&mut self, id: NodeId) {
        if !self.is_root(id) {
            self.roots.push(id);
        }
    }

    pub(crate) fn remove_root(&mut self, id: NodeId) {
        self.roots.retain(|r| *r != id);
    }

    pub(crate) fn add_to_storage(&mut self, id: NodeId) {
        self.registered.insert(id);
    }

    pub(crate) fn del_from_storage(&mut self, id: NodeId) {
        self.registered.remove(&id);
    }

    /// `true` when `id` is reachable from a registered root.
    pub fn is_registered(&self, id: NodeId) -> bool {
        self.registered.contains(&id)
    }

    pub fn registered_count(&self) -> usize {
        self.registered.len()
    }

    /// Display list as of the last update.
    pub fn list(&self) -> &[DisplayEntry] {
        &self.list
    }

    /// Refresh world transforms and rebuild the sorted display list.
    #[tracing::instrument(skip(self, arena))]
    pub(crate) fn update_display_list(&mut self, arena: &mut Arena) {
        let mut list = std::mem::take(&mut self.list);
        list.clear();
        let mut clips = ClipChain::new();
        for root in &self.roots {
            collect(arena, *root, None, &mut clips, &mut list);
        }
        // Stable: equal keys keep tree order.
        list.sort_by(|a, b| {
            let (Some(na), Some(nb)) = (arena.get(a.id), arena.get(b.id)) else {
                return std::cmp::Ordering::Equal;
            };
            na.zlevel
                .cmp(&nb.zlevel)
                .then(na.z.total_cmp(&nb.z))
                .then(na.z2.total_cmp(&nb.z2))
        });
        tracing::trace!(len = list.len(), "display list rebuilt");
        self.list = list;
    }
}

fn collect(
    arena: &mut Arena,
    id: NodeId,
    parent: Option<&Transformable>,
    clips: &mut ClipChain,
    out: &mut Vec<DisplayEntry>,
) {
    let Some(node) = arena.get_mut(id) else {
        return;
    };
    if node.ignore {
        return;
    }
    node.transform.update_transform(parent);
    let clipped = node.clip.is_some();
    if clipped {
        clips.push(id);
    }

    match &node.kind {
        NodeKind::Displayable(_) => out.push(DisplayEntry {
            id,
            clip_chain: clips.clone(),
        }),
        NodeKind::Group(g) => {
            let own = node.transform.clone();
            let children = g.children.clone();
            for child in children {
                collect(arena, child, Some(&own), clips, out);
            }
        }
    }

    if clipped {
        clips.pop();
    }
}

impl Scene {
    /// The z-ordered list of displayables reachable from the roots.
    ///
    /// With `update` the world transforms and the list are recomputed first.
    pub fn display_list(&mut self, update: bool) -> &[DisplayEntry] {
        if update {
            self.storage.update_display_list(&mut self.arena);
        }
        self.storage.list()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/storage.rs"]
mod tests;
