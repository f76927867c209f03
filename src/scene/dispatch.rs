//! Pointer hit-testing, hover tracking and event bubbling.

use crate::{
    path::hit::{contain, contain_stroke},
    scene::{
        event::SceneEvent,
        node::{Content, NodeId},
        storage::DisplayEntry,
        tree::Scene,
    },
};

const MOVE_EVENTS: [&str; 2] = ["pointermove", "mousemove"];
const LEAVE_EVENTS: [&str; 2] = ["pointerleave", "mouseleave"];

/// Pointer input in scene (root) coordinates.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PointerEvent {
    /// `"click"`, `"pointermove"`, `"mousedown"`, ...
    pub kind: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub by_touch: bool,
}

impl PointerEvent {
    pub fn new(kind: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            kind: kind.into(),
            x,
            y,
            by_touch: false,
        }
    }

    pub fn touch(mut self) -> Self {
        self.by_touch = true;
        self
    }
}

impl Scene {
    /// Route a pointer event to the topmost displayable under it.
    ///
    /// Move events update hover state and emit `mouseout`, `mousemove` and `mouseover` in that
    /// order. Leave events clear hover and emit `globalout` on the scene. Returns the hit target.
    #[tracing::instrument(skip(self, event), fields(kind = %event.kind))]
    pub fn dispatch(&mut self, event: &PointerEvent) -> Option<NodeId> {
        if LEAVE_EVENTS.contains(&event.kind.as_str()) {
            if let Some(last) = self.hover.take() {
                self.set_hover(last, false);
                self.emit(Some(last), "mouseout", event);
            }
            self.emit(None, "globalout", event);
            return None;
        }

        let target = self.find_hover(event.x, event.y);
        if !MOVE_EVENTS.contains(&event.kind.as_str()) {
            self.emit(target, &event.kind, event);
            return target;
        }

        let last = std::mem::replace(&mut self.hover, target);
        if let Some(l) = last
            && last != target
        {
            self.set_hover(l, false);
            self.emit(Some(l), "mouseout", event);
        }
        self.emit(target, "mousemove", event);
        if let Some(t) = target
            && last != target
        {
            self.set_hover(t, true);
            self.emit(Some(t), "mouseover", event);
        }
        target
    }

    /// Node currently under the pointer, as of the last move event.
    pub fn hovered(&self) -> Option<NodeId> {
        self.hover
    }

    /// Topmost displayable containing `(x, y)`; silent ones are skipped.
    pub fn find_hover(&mut self, x: f64, y: f64) -> Option<NodeId> {
        let entries: Vec<DisplayEntry> = self.display_list(true).to_vec();
        entries
            .iter()
            .rev()
            .find(|e| self.is_hit(e, x, y))
            .map(|e| e.id)
    }

    fn is_hit(&mut self, entry: &DisplayEntry, x: f64, y: f64) -> bool {
        let Some(node) = self.arena.get(entry.id) else {
            return false;
        };
        if node.invisible || node.ignore {
            return false;
        }
        let mut cur = Some(entry.id);
        while let Some(id) = cur {
            let Some(n) = self.arena.get(id) else {
                return false;
            };
            if n.silent {
                return false;
            }
            cur = n.parent;
        }

        for owner in &entry.clip_chain {
            let Some(n) = self.arena.get(*owner) else {
                continue;
            };
            let Some(clip) = &n.clip else {
                continue;
            };
            let p = n.transform.transform_coord_to_local(x, y);
            if !contain(&clip.to_path_proxy(), p.x, p.y) {
                return false;
            }
        }

        let Some(node) = self.arena.get(entry.id) else {
            return false;
        };
        let local = node.transform.transform_coord_to_local(x, y);
        if !(local.x.is_finite() && local.y.is_finite()) {
            return false;
        }
        let Some(d) = node.as_displayable() else {
            return false;
        };
        let is_path = matches!(d.content, Content::Path(_));
        let (fill, stroke, line_width) =
            (d.style.has_fill(), d.style.has_stroke(), d.style.line_width);

        if !is_path {
            return self.bounding_rect(entry.id).contain(local.x, local.y);
        }
        // Cheap reject on the stroke-inflated bounds before walking segments.
        if !self.bounding_rect(entry.id).contain(local.x, local.y) {
            return false;
        }
        let Some(path) = self.build_path(entry.id, None) else {
            return false;
        };
        (fill && contain(path, local.x, local.y))
            || (stroke && contain_stroke(path, line_width, local.x, local.y))
    }

    fn set_hover(&mut self, id: NodeId, on: bool) {
        if let Some(d) = self
            .arena
            .get_mut(id)
            .and_then(|n| n.as_displayable_mut())
        {
            d.hover = on;
        }
    }

    /// Bubble `kind` from `target` up through its ancestors, then to the scene handlers.
    fn emit(&mut self, target: Option<NodeId>, kind: &str, pointer: &PointerEvent) {
        let mut event = SceneEvent::new(kind, target, pointer.x, pointer.y);
        event.by_touch = pointer.by_touch;

        let mut cur = target;
        while let Some(id) = cur {
            let Some(node) = self.arena.get_mut(id) else {
                break;
            };
            event.current_target = Some(id);
            node.events.trigger(kind, &event);
            if event.is_propagation_stopped() {
                return;
            }
            cur = node.parent;
        }
        event.current_target = None;
        self.events.trigger(kind, &event);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/dispatch.rs"]
mod tests;
