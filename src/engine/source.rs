//! Event source seam
//!
//! The engine never owns the thing that produces keyboard events; it
//! attaches to one through this trait. A host queue, a test bus, or a
//! platform adapter all look the same from the engine's side: add a
//! keydown listener, keep the id, detach with it later.

use std::rc::Rc;

use crate::core::KeyboardEvent;

/// Callback invoked by an event source for every keydown it produces.
pub type EventListener = Rc<dyn Fn(&KeyboardEvent)>;

/// Opaque handle identifying one attached listener.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Wrap a raw id. Sources mint these however they like; the engine
    /// only stores and returns them.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw id this handle wraps.
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// A producer of keydown events.
///
/// Methods take `&self`: sources are shared behind `Rc` and manage their
/// listener registry with interior mutability.
pub trait EventSource {
    /// Attach a keydown listener, returning the id to detach it with.
    fn add_keydown_listener(&self, listener: EventListener) -> ListenerId;

    /// Detach a previously attached listener. Detaching an unknown id is
    /// a no-op.
    fn remove_keydown_listener(&self, id: ListenerId);
}
