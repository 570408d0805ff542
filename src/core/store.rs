//! Binding storage with duplicate and missing detection
//!
//! A two-level map: target key → modifier code → handler. The invariant is
//! at most one handler per (target key, modifier code) pair; bind refuses
//! duplicates, unbind refuses absent pairs. Shift-qualified symbol specs
//! ("shift-[") cascade onto the physical key id ("BracketLeft") so the live
//! shifted event resolves exactly.

use std::collections::HashMap;
use std::rc::Rc;

use crate::core::error::HotkeyError;
use crate::core::keys::resolve_symbol;
use crate::core::types::{HotkeySpec, KeyHandler, ModifierCode};

/// Holds all bindings of one engine instance.
///
/// Lookups are two map hits; a non-match costs nothing beyond them. The
/// store never inspects events, it only answers (key, code) queries from
/// the dispatcher.
pub struct BindingStore {
    /// Target key → modifier code → handler.
    bindings: HashMap<String, HashMap<ModifierCode, KeyHandler>>,
}

impl BindingStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Install a handler for a parsed spec.
    ///
    /// When the spec's modifiers contain Shift and its target is a symbol
    /// character, the handler is also installed under the symbol's physical
    /// key id at the same modifier code. Both slots must be free.
    ///
    /// # Errors
    /// Returns `HotkeyError::DuplicateHotkey` naming the original spec
    /// string when the (target key, modifier code) pair is occupied. A
    /// duplicate on the cascaded slot leaves the primary slot installed;
    /// bind is not transactional.
    pub fn insert(
        &mut self,
        parsed: &HotkeySpec,
        handler: KeyHandler,
        spec: &str,
    ) -> Result<(), HotkeyError> {
        self.insert_at(&parsed.target_key, parsed.modifiers, Rc::clone(&handler), spec)?;

        if parsed.implied_shift {
            if let Some(alternate) = resolve_symbol(&parsed.target_key) {
                self.insert_at(alternate, parsed.modifiers, handler, spec)?;
            }
        }

        Ok(())
    }

    /// Remove the handler for a parsed spec.
    ///
    /// Cascades to the symbol's physical key id identically to `insert`.
    /// A target bucket emptied by the removal is pruned.
    ///
    /// # Errors
    /// Returns `HotkeyError::NoSuchHotkey` when the target key is absent or
    /// present without the requested modifier code.
    pub fn remove(&mut self, parsed: &HotkeySpec, spec: &str) -> Result<(), HotkeyError> {
        self.remove_at(&parsed.target_key, parsed.modifiers, spec)?;

        if parsed.implied_shift {
            if let Some(alternate) = resolve_symbol(&parsed.target_key) {
                self.remove_at(alternate, parsed.modifiers, spec)?;
            }
        }

        Ok(())
    }

    /// Drop every binding. Idempotent.
    pub fn clear(&mut self) {
        self.bindings.clear();
    }

    /// Look up the handler for an exact (target key, modifier code) pair.
    pub fn lookup(&self, key: &str, modifiers: ModifierCode) -> Option<&KeyHandler> {
        self.bindings
            .get(key)
            .and_then(|handlers| handlers.get(&modifiers))
    }

    /// Total number of (target key, modifier code) pairs installed.
    ///
    /// Cascaded symbol slots count separately.
    pub fn len(&self) -> usize {
        self.bindings.values().map(|handlers| handlers.len()).sum()
    }

    /// True when nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    fn insert_at(
        &mut self,
        key: &str,
        modifiers: ModifierCode,
        handler: KeyHandler,
        spec: &str,
    ) -> Result<(), HotkeyError> {
        let handlers = self.bindings.entry(key.to_string()).or_default();

        if handlers.contains_key(&modifiers) {
            return Err(HotkeyError::DuplicateHotkey {
                spec: spec.to_string(),
            });
        }

        handlers.insert(modifiers, handler);

        Ok(())
    }

    fn remove_at(
        &mut self,
        key: &str,
        modifiers: ModifierCode,
        spec: &str,
    ) -> Result<(), HotkeyError> {
        let handlers = self.bindings.get_mut(key).ok_or_else(|| {
            HotkeyError::NoSuchHotkey {
                spec: spec.to_string(),
            }
        })?;

        if handlers.remove(&modifiers).is_none() {
            return Err(HotkeyError::NoSuchHotkey {
                spec: spec.to_string(),
            });
        }

        // Keep the top-level map free of empty buckets
        if handlers.is_empty() {
            self.bindings.remove(key);
        }

        Ok(())
    }
}

impl Default for BindingStore {
    fn default() -> Self {
        Self::new()
    }
}
