// Copyright 2025 the hotkey-router authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! src/engine/mod.rs
//!
//! The public hotkey engine
//!
//! `HotkeyEngine` ties the core pieces together: spec strings go through
//! the parser into the binding store, and keydown events from an attached
//! `EventSource` go through dispatch to exactly one handler. All methods
//! take `&self` and the mutating ones return `&Self`, so calls chain:
//!
//! ```ignore
//! engine.bind("ctrl-k", open_palette)?.bind("esc", close_palette)?;
//! engine.mount();
//! ```
//!
//! Everything is single-threaded; handlers run synchronously inside the
//! event callback and may re-enter the engine (bind, unbind, unmount)
//! because no internal borrow is held while a handler runs.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::core::dispatch;
use crate::core::parser::parse_hotkey;
use crate::core::store::BindingStore;
use crate::core::types::{KeyHandler, KeyboardEvent, Modifier};
use crate::core::HotkeyError;

pub mod source;
mod trace;

pub use source::{EventListener, EventSource, ListenerId};

#[cfg(test)]
mod tests;

/// Predicate consulted before resolution; return true to skip the event.
///
/// The reference use case is skipping keydowns that originate in editable
/// UI elements. No predicate is installed by default.
pub type IgnorePredicate = Rc<dyn Fn(&KeyboardEvent) -> bool>;

/// Mutable engine internals, shared between the engine handle and the
/// listener closure registered on the event source.
struct EngineState {
    store: BindingStore,
    ignore: Option<IgnorePredicate>,
    debug: bool,
}

/// A hotkey engine bound to one event source.
///
/// Holds the binding store and the listener attachment. Instances are
/// fully independent: two engines on the same source keep separate
/// bindings and dispatch separately.
///
/// # Example
/// ```
/// use std::rc::Rc;
/// use hotkey_router::engine::HotkeyEngine;
/// use hotkey_router::simulator::{EventBus, KeyboardSimulator};
///
/// let bus = Rc::new(EventBus::new());
/// let engine = HotkeyEngine::new(bus.clone());
///
/// engine.bind("ctrl-k", |_| println!("palette"))?;
/// engine.mount();
///
/// let keyboard = KeyboardSimulator::new(Rc::clone(&bus));
/// keyboard.key_down("Control")?;
/// keyboard.key_down("K")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct HotkeyEngine {
    source: Rc<dyn EventSource>,
    state: Rc<RefCell<EngineState>>,
    listener: Cell<Option<ListenerId>>,
}

impl HotkeyEngine {
    /// Creates an engine attached to nothing; call `mount` to start
    /// receiving events.
    pub fn new(source: Rc<dyn EventSource>) -> Self {
        Self {
            source,
            state: Rc::new(RefCell::new(EngineState {
                store: BindingStore::new(),
                ignore: None,
                debug: false,
            })),
            listener: Cell::new(None),
        }
    }

    /// Bind a handler to a hotkey spec.
    ///
    /// # Errors
    /// `HotkeyError::InvalidSpec` or `HotkeyError::UnknownModifier` when
    /// the spec does not parse, `HotkeyError::DuplicateHotkey` when the
    /// combination is already bound.
    pub fn bind<F>(&self, spec: &str, handler: F) -> Result<&Self, HotkeyError>
    where
        F: Fn(&KeyboardEvent) + 'static,
    {
        self.install(spec, Rc::new(handler))?;
        Ok(self)
    }

    /// Bind several spec/handler pairs in input order.
    ///
    /// Not transactional: on the first failure the rest of the batch is
    /// abandoned and earlier entries stay bound.
    pub fn bind_keys<'a, I>(&self, entries: I) -> Result<&Self, HotkeyError>
    where
        I: IntoIterator<Item = (&'a str, KeyHandler)>,
    {
        for (spec, handler) in entries {
            self.install(spec, handler)?;
        }

        Ok(self)
    }

    /// Remove the binding for a hotkey spec.
    ///
    /// # Errors
    /// `HotkeyError::NoSuchHotkey` when the combination is not bound, in
    /// addition to the parse errors `bind` can return.
    pub fn unbind(&self, spec: &str) -> Result<&Self, HotkeyError> {
        let parsed = parse_hotkey(spec)?;
        self.state.borrow_mut().store.remove(&parsed, spec)?;
        Ok(self)
    }

    /// Remove several bindings in input order.
    ///
    /// Not transactional, like `bind_keys`.
    pub fn unbind_keys<'a, I>(&self, specs: I) -> Result<&Self, HotkeyError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for spec in specs {
            self.unbind(spec)?;
        }

        Ok(self)
    }

    /// Drop every binding. Idempotent, never errors.
    pub fn unbind_all(&self) -> &Self {
        self.state.borrow_mut().store.clear();
        self
    }

    /// Attach the keydown listener to the event source.
    ///
    /// Idempotent: mounting an already-mounted engine changes nothing and
    /// registers no second listener.
    pub fn mount(&self) -> &Self {
        if self.listener.get().is_some() {
            return self;
        }

        let state = Rc::downgrade(&self.state);
        let id = self.source.add_keydown_listener(Rc::new(move |ev| {
            if let Some(state) = state.upgrade() {
                dispatch_event(&state, ev);
            }
        }));

        self.listener.set(Some(id));
        self
    }

    /// Detach from the event source. Safe to call when not mounted.
    pub fn unmount(&self) -> &Self {
        if let Some(id) = self.listener.take() {
            self.source.remove_keydown_listener(id);
        }

        self
    }

    /// Tear the engine down: unmount and drop every binding.
    pub fn destruct(&self) {
        self.unmount();
        self.unbind_all();
    }

    /// Toggle the debug trace side channel.
    ///
    /// When on, every received keydown is logged through `tracing::debug!`
    /// in a fixed-width format. Dispatch behavior is unaffected.
    pub fn set_debug_mode(&self, on: bool) -> &Self {
        self.state.borrow_mut().debug = on;
        self
    }

    /// Install or clear the ignore predicate.
    pub fn set_ignore_fn(&self, predicate: Option<IgnorePredicate>) -> &Self {
        self.state.borrow_mut().ignore = predicate;
        self
    }

    /// Whether the engine is currently attached to its event source.
    pub fn is_mounted(&self) -> bool {
        self.listener.get().is_some()
    }

    /// Number of (target key, modifier code) pairs currently bound.
    pub fn binding_count(&self) -> usize {
        self.state.borrow().store.len()
    }

    /// Feed one keydown through the engine directly, bypassing the event
    /// source. Useful for hosts that pump events by hand.
    pub fn dispatch_keydown(&self, ev: &KeyboardEvent) {
        dispatch_event(&self.state, ev);
    }

    fn install(&self, spec: &str, handler: KeyHandler) -> Result<(), HotkeyError> {
        let parsed = parse_hotkey(spec)?;
        self.state.borrow_mut().store.insert(&parsed, handler, spec)
    }
}

impl fmt::Debug for HotkeyEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("HotkeyEngine")
            .field("source", &"<EventSource>")
            .field("bindings", &state.store.len())
            .field("debug", &state.debug)
            .field("mounted", &self.is_mounted())
            .finish()
    }
}

/// The keydown path shared by the mounted listener and `dispatch_keydown`.
fn dispatch_event(state: &RefCell<EngineState>, ev: &KeyboardEvent) {
    let ignore = {
        let state = state.borrow();

        if state.debug {
            debug!(target: "hotkey_router::engine", "{}", trace::format_keydown(ev));
        }

        // Modifier keydowns never dispatch and never reach the predicate
        if Modifier::from_key(&ev.key).is_some() {
            return;
        }

        state.ignore.clone()
    };

    if ignore.is_some_and(|ignore| ignore(ev)) {
        return;
    }

    // Clone the handler out so no borrow is held while it runs; handlers
    // may re-enter the engine
    let handler = dispatch::resolve(&state.borrow().store, ev).cloned();

    if let Some(handler) = handler {
        handler(ev);
    }
}
