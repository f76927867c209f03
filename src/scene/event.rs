//! Named-event handler registry.

use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::scene::node::NodeId;

/// Shared event callback. Identity (for dedup and `off`) is the `Rc` pointer.
pub type Handler<E> = Rc<dyn Fn(&E)>;

/// Hooks consulted around handler invocation.
pub trait EventProcessor {
    /// Decide whether a handler registered with `query` should see `event`.
    fn filter(&self, _event: &str, _query: &Value) -> bool {
        true
    }

    /// Called once after every trigger of `event`.
    fn after_trigger(&self, _event: &str) {}
}

struct Entry<E> {
    handler: Handler<E>,
    one: bool,
    query: Option<Value>,
}

/// Per-object event registry.
pub struct Eventful<E> {
    handlers: HashMap<String, Vec<Entry<E>>>,
    processor: Option<Rc<dyn EventProcessor>>,
}

impl<E> Default for Eventful<E> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
            processor: None,
        }
    }
}

impl<E> fmt::Debug for Eventful<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut counts: Vec<_> = self
            .handlers
            .iter()
            .map(|(k, v)| (k.as_str(), v.len()))
            .collect();
        counts.sort_unstable();
        f.debug_struct("Eventful")
            .field("handlers", &counts)
            .field("processor", &self.processor.is_some())
            .finish()
    }
}

impl<E> Eventful<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_processor(processor: Rc<dyn EventProcessor>) -> Self {
        Self {
            handlers: HashMap::new(),
            processor: Some(processor),
        }
    }

    pub fn set_processor(&mut self, processor: Option<Rc<dyn EventProcessor>>) {
        self.processor = processor;
    }

    /// Register `handler` for `event`. Returns `false` when that exact handler is already there.
    pub fn on(&mut self, event: &str, handler: Handler<E>, query: Option<Value>) -> bool {
        self.register(event, handler, query, false)
    }

    /// Like [`Eventful::on`], but the handler is dropped after its first invocation.
    pub fn one(&mut self, event: &str, handler: Handler<E>, query: Option<Value>) -> bool {
        self.register(event, handler, query, true)
    }

    fn register(&mut self, event: &str, handler: Handler<E>, query: Option<Value>, one: bool) -> bool {
        let list = self.handlers.entry(event.to_owned()).or_default();
        if list.iter().any(|e| Rc::ptr_eq(&e.handler, &handler)) {
            return false;
        }
        list.push(Entry {
            handler,
            one,
            query,
        });
        true
    }

    /// Remove one handler, or every handler of `event` when `handler` is `None`.
    pub fn off(&mut self, event: &str, handler: Option<&Handler<E>>) {
        match handler {
            None => {
                self.handlers.remove(event);
            }
            Some(h) => {
                if let Some(list) = self.handlers.get_mut(event) {
                    list.retain(|e| !Rc::ptr_eq(&e.handler, h));
                    if list.is_empty() {
                        self.handlers.remove(event);
                    }
                }
            }
        }
    }

    pub fn off_all(&mut self) {
        self.handlers.clear();
    }

    /// `true` when nobody listens to `event`.
    pub fn is_silent(&self, event: &str) -> bool {
        self.handlers.get(event).is_none_or(Vec::is_empty)
    }

    pub fn handler_count(&self, event: &str) -> usize {
        self.handlers.get(event).map_or(0, Vec::len)
    }

    /// Invoke every handler of `event` in registration order.
    ///
    /// One-shot handlers that ran are compacted out in the same pass; ones the processor filtered
    /// out stay registered.
    pub fn trigger(&mut self, event: &str, payload: &E) {
        let Self {
            handlers,
            processor,
        } = self;
        let Some(list) = handlers.get_mut(event) else {
            return;
        };

        let mut write = 0;
        for read in 0..list.len() {
            let entry = &list[read];
            let passes = match (processor.as_ref(), entry.query.as_ref()) {
                (Some(p), Some(q)) => p.filter(event, q),
                _ => true,
            };
            if passes {
                (entry.handler)(payload);
            }
            if !(entry.one && passes) {
                list.swap(write, read);
                write += 1;
            }
        }
        list.truncate(write);
        if list.is_empty() {
            handlers.remove(event);
        }

        if let Some(p) = processor {
            p.after_trigger(event);
        }
    }
}

/// Payload delivered to scene handlers.
#[derive(Debug, Clone)]
pub struct SceneEvent {
    /// Event name, e.g. `"click"` or `"mouseover"`.
    pub kind: String,
    /// Node the pointer hit.
    pub target: Option<NodeId>,
    /// Node whose handlers are currently running.
    pub current_target: Option<NodeId>,
    pub x: f64,
    pub y: f64,
    pub by_touch: bool,
    stopped: Rc<Cell<bool>>,
}

impl SceneEvent {
    pub fn new(kind: impl Into<String>, target: Option<NodeId>, x: f64, y: f64) -> Self {
        Self {
            kind: kind.into(),
            target,
            current_target: target,
            x,
            y,
            by_touch: false,
            stopped: Rc::new(Cell::new(false)),
        }
    }

    /// Stop bubbling after the current node's handlers.
    pub fn stop_propagation(&self) {
        self.stopped.set(true);
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.stopped.get()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/event.rs"]
mod tests;
