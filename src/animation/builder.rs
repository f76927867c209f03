//! Declarative animation entry points on [`Scene`].

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::{
    animation::{
        accessor::{Accessor, AnimRoot},
        animator::{Animator, AnimatorId, AnimatorState, DoneFn},
        ease::Ease,
        value::AnimValue,
    },
    scene::{node::NodeId, tree::Scene},
};

/// Options for [`Scene::animate_to`] and [`Scene::animate_from`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AnimateOpts {
    /// Milliseconds.
    pub duration: f64,
    pub delay: f64,
    pub easing: Ease,
}

impl Default for AnimateOpts {
    fn default() -> Self {
        Self {
            duration: 500.0,
            delay: 0.0,
            easing: Ease::Linear,
        }
    }
}

/// Collects keyframes for one animator; nothing runs until [`AnimatorBuilder::start`].
pub struct AnimatorBuilder<'a> {
    scene: &'a mut Scene,
    node: NodeId,
    animator: Animator,
}

impl AnimatorBuilder<'_> {
    /// Add keyframes at `time` ms for every leaf of `props`.
    ///
    /// The first keyframe of a property at a non-zero time is preceded by one at time 0 holding
    /// the current value.
    pub fn when(mut self, time: f64, props: Value) -> Self {
        let Value::Object(map) = props else {
            tracing::warn!(?props, "animator keyframe must be an object; ignored");
            return self;
        };
        for (key, value) in &map {
            self.keyframe_json(time, key, value);
        }
        self
    }

    fn resolve(&self, key: &str) -> Option<Accessor> {
        let node = self.scene.node(self.node)?;
        let accessor = Accessor::resolve(self.animator.root, key, node);
        if accessor.is_none() {
            tracing::warn!(
                key,
                path = self.animator.root.as_str(),
                "unknown animatable property; ignored"
            );
        }
        accessor
    }

    fn keyframe_json(&mut self, time: f64, key: &str, value: &Value) {
        let Some(accessor) = self.resolve(key) else {
            return;
        };
        let Some(v) = accessor.parse_value(value) else {
            tracing::warn!(key, ?value, "keyframe value has the wrong type; ignored");
            return;
        };
        self.keyframe(accessor, key, time, v);
    }

    pub(crate) fn keyframe(&mut self, accessor: Accessor, key: &str, time: f64, value: AnimValue) {
        let current = self
            .scene
            .node(self.node)
            .and_then(|n| accessor.get(n));
        let (track, created) = self.animator.track_mut(accessor, key);
        if created
            && time != 0.0
            && let Some(cur) = current
        {
            track.insert(0.0, cur);
        }
        track.insert(time.max(0.0), value);
    }

    /// Wait `ms` after the first tick before starting.
    pub fn delay(mut self, ms: f64) -> Self {
        self.animator.delay = ms.max(0.0);
        self
    }

    /// Called every frame with the eased progress.
    pub fn during(mut self, f: impl FnMut(f64) + 'static) -> Self {
        self.animator.during.push(Box::new(f));
        self
    }

    /// Called once when every track has finished. Not called when stopped.
    pub fn done(mut self, f: impl FnOnce() + 'static) -> Self {
        self.animator.done.push(Box::new(f));
        self
    }

    /// Called once if the animator is stopped before it finishes.
    pub fn aborted(mut self, f: impl FnOnce() + 'static) -> Self {
        self.animator.aborted.push(Box::new(f));
        self
    }

    /// Start the animator.
    ///
    /// An animator with nothing to interpolate (no tracks, zero duration, or only unchanged
    /// values) writes its final values and completes before this returns.
    pub fn start(self, easing: Ease) -> AnimatorId {
        let Self {
            scene,
            node,
            mut animator,
        } = self;
        animator.easing = easing;
        let id = animator.id;

        if !animator.needs_animation() {
            if let Some(n) = scene.arena.get_mut(node) {
                animator.apply_final(n);
                scene.request_refresh();
            }
            animator.state = AnimatorState::Done;
            for cb in animator.take_done() {
                cb();
            }
            return id;
        }

        let Some(n) = scene.arena.get_mut(node) else {
            return id;
        };
        animator.state = AnimatorState::Running;
        n.animators.push(animator);
        scene.animator_owner.insert(id, node);
        scene.request_refresh();
        id
    }
}

/// Leaf properties of an `animate_to` target grouped by property path.
fn group_target(target: &Map<String, Value>) -> Vec<(AnimRoot, Map<String, Value>)> {
    let mut out: Vec<(AnimRoot, Map<String, Value>)> = Vec::new();
    let mut push = |root: AnimRoot, key: &str, value: &Value| {
        match out.iter_mut().find(|(r, _)| *r == root) {
            Some((_, m)) => {
                m.insert(key.to_owned(), value.clone());
            }
            None => {
                let mut m = Map::new();
                m.insert(key.to_owned(), value.clone());
                out.push((root, m));
            }
        }
    };
    for (key, value) in target {
        match (AnimRoot::parse(key), value) {
            (Some(root @ (AnimRoot::Style | AnimRoot::Shape)), Value::Object(inner)) => {
                for (k, v) in inner {
                    push(root, k, v);
                }
            }
            _ => push(AnimRoot::Element, key, value),
        }
    }
    out
}

impl Scene {
    /// Begin building an animator for the object at `path` (`""`, `"style"` or `"shape"`).
    ///
    /// Nested paths such as `"style.fill"` are not supported; address leaves through
    /// [`AnimatorBuilder::when`] instead. Returns `None`, with a warning, when the node is gone or has no such object.
    pub fn animate(&mut self, node: NodeId, path: &str, looped: bool) -> Option<AnimatorBuilder<'_>> {
        let Some(n) = self.node(node) else {
            tracing::warn!(?node, "animate on a missing node");
            return None;
        };
        let Some(root) = AnimRoot::parse(path).filter(|r| r.exists_on(n)) else {
            tracing::warn!(?node, path, "property path does not exist; cannot animate");
            return None;
        };
        let id = self.alloc_animator_id();
        Some(AnimatorBuilder {
            scene: self,
            node,
            animator: Animator::new(id, root, looped),
        })
    }

    /// Advance every running animator to absolute time `now_ms`.
    ///
    /// Values are written into nodes and a repaint is requested; nothing is painted here.
    #[tracing::instrument(skip(self))]
    pub fn tick(&mut self, now_ms: f64) {
        let ids: Vec<NodeId> = self
            .arena
            .ids()
            .filter(|id| self.arena.get(*id).is_some_and(|n| n.is_animating()))
            .collect();
        if ids.is_empty() {
            return;
        }

        let mut finished: Vec<DoneFn> = Vec::new();
        for id in ids {
            let Some(node) = self.arena.get_mut(id) else {
                continue;
            };
            let mut animators = std::mem::take(&mut node.animators);
            animators.retain_mut(|a| match a.step(now_ms, node) {
                AnimatorState::Done => {
                    self.animator_owner.remove(&a.id);
                    finished.extend(a.take_done());
                    false
                }
                _ => true,
            });
            node.animators = animators;
        }
        self.request_refresh();

        for cb in finished {
            cb();
        }
    }

    /// Stop one animator. Done callbacks are not fired.
    pub fn stop_animator(&mut self, id: AnimatorId, forward_to_last: bool) {
        let Some(owner) = self.animator_owner.remove(&id) else {
            return;
        };
        let Some(node) = self.arena.get_mut(owner) else {
            return;
        };
        let Some(pos) = node.animators.iter().position(|a| a.id == id) else {
            return;
        };
        let mut animator = node.animators.remove(pos);
        let aborted = animator.stop(node, forward_to_last);
        self.request_refresh();
        for cb in aborted {
            cb();
        }
    }

    /// Stop every animator on `node`.
    pub fn stop_animation(&mut self, node: NodeId, forward_to_last: bool) {
        let Some(n) = self.arena.get_mut(node) else {
            return;
        };
        let animators = std::mem::take(&mut n.animators);
        if animators.is_empty() {
            return;
        }
        let mut aborted = Vec::new();
        for mut a in animators {
            self.animator_owner.remove(&a.id);
            aborted.extend(a.stop(n, forward_to_last));
        }
        self.request_refresh();
        for cb in aborted {
            cb();
        }
    }

    /// Ids of the animators currently running on `node`.
    pub fn animators(&self, node: NodeId) -> Vec<AnimatorId> {
        self.node(node)
            .map(|n| n.animators.iter().map(Animator::id).collect())
            .unwrap_or_default()
    }

    /// Animate from the current values to `target`.
    ///
    /// `target` is an object whose `style` and `shape` members address those objects and whose
    /// other members address the element. `callback` fires once after every spawned animator has
    /// finished; it fires before this returns when nothing needs to move.
    pub fn animate_to(
        &mut self,
        node: NodeId,
        target: Value,
        opts: AnimateOpts,
        callback: Option<Box<dyn FnOnce()>>,
    ) -> Vec<AnimatorId> {
        self.animate_between(node, target, opts, callback, false)
    }

    /// Animate from `source` to the current values.
    ///
    /// The node jumps to `source` immediately.
    pub fn animate_from(
        &mut self,
        node: NodeId,
        source: Value,
        opts: AnimateOpts,
        callback: Option<Box<dyn FnOnce()>>,
    ) -> Vec<AnimatorId> {
        self.animate_between(node, source, opts, callback, true)
    }

    fn animate_between(
        &mut self,
        node: NodeId,
        values: Value,
        opts: AnimateOpts,
        callback: Option<Box<dyn FnOnce()>>,
        reverse: bool,
    ) -> Vec<AnimatorId> {
        let Value::Object(map) = values else {
            tracing::warn!(?node, "animation target must be an object");
            return Vec::new();
        };
        self.stop_animation(node, false);

        let groups = group_target(&map);
        let pending = Rc::new(Cell::new(groups.len()));
        let callback = Rc::new(RefCell::new(callback));
        let finish_one = {
            let pending = pending.clone();
            let callback = callback.clone();
            move || {
                pending.set(pending.get().saturating_sub(1));
                if pending.get() == 0
                    && let Some(cb) = callback.borrow_mut().take()
                {
                    cb();
                }
            }
        };

        let mut ids = Vec::new();
        for (root, props) in groups {
            let Some(mut builder) = self.animate(node, root.as_str(), false) else {
                finish_one();
                continue;
            };
            for (key, value) in &props {
                let Some(accessor) = builder.resolve(key) else {
                    continue;
                };
                let Some(v) = accessor.parse_value(value) else {
                    tracing::warn!(key, ?value, "animation value has the wrong type; ignored");
                    continue;
                };
                if reverse {
                    let Some(current) = builder
                        .scene
                        .node(node)
                        .and_then(|n| accessor.get(n))
                    else {
                        continue;
                    };
                    if let Some(n) = builder.scene.arena.get_mut(node) {
                        accessor.set(n, &v);
                    }
                    builder.keyframe(accessor, key, 0.0, v);
                    builder.keyframe(accessor, key, opts.duration, current);
                } else {
                    builder.keyframe(accessor, key, opts.duration, v);
                }
            }
            let done = finish_one.clone();
            ids.push(builder.delay(opts.delay).done(done).start(opts.easing));
        }
        if pending.get() == 0
            && let Some(cb) = callback.borrow_mut().take()
        {
            cb();
        }
        ids.retain(|id| self.animator_owner.contains_key(id));
        ids
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/builder.rs"]
mod tests;
