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

//! Dispatch resolution tests
//!
//! Tests for keydown resolution against a binding store, built from
//! hand-constructed events:
//! - Value, code, and extracted-digit candidates
//! - The implicit-shift fallback and its exemptions
//! - Explicit-binding precedence over the fallback
//! - Modifier keydowns never dispatching

use std::cell::Cell;
use std::rc::Rc;

use crate::core::dispatch::resolve;
use crate::core::parser::parse_hotkey;
use crate::core::store::BindingStore;
use crate::core::types::{KeyHandler, KeyboardEvent};

/// A handler that counts its invocations.
fn counter() -> (KeyHandler, Rc<Cell<usize>>) {
    let count = Rc::new(Cell::new(0usize));
    let inner = Rc::clone(&count);

    (Rc::new(move |_| inner.set(inner.get() + 1)), count)
}

fn bind(store: &mut BindingStore, spec: &str) -> Rc<Cell<usize>> {
    let (handler, count) = counter();
    let parsed = parse_hotkey(spec).unwrap();
    store.insert(&parsed, handler, spec).unwrap();
    count
}

fn unbind(store: &mut BindingStore, spec: &str) {
    let parsed = parse_hotkey(spec).unwrap();
    store.remove(&parsed, spec).unwrap();
}

/// Resolve and invoke; reports whether anything fired.
fn fire(store: &BindingStore, ev: &KeyboardEvent) -> bool {
    match resolve(store, ev) {
        Some(handler) => {
            handler(ev);
            true
        }
        None => false,
    }
}

fn ev(key: &str, code: &str) -> KeyboardEvent {
    KeyboardEvent::new(key, code)
}

fn shifted(key: &str, code: &str) -> KeyboardEvent {
    KeyboardEvent {
        shift: true,
        ..KeyboardEvent::new(key, code)
    }
}

#[test]
fn test_resolves_by_value() {
    let mut store = BindingStore::new();
    let count = bind(&mut store, "a");

    assert!(fire(&store, &ev("a", "KeyA")));
    assert_eq!(count.get(), 1);
}

#[test]
fn test_resolves_folded_value() {
    let mut store = BindingStore::new();
    let count = bind(&mut store, "A");

    // Case folding applies on both sides
    assert!(fire(&store, &ev("a", "KeyA")));
    assert_eq!(count.get(), 1);
}

#[test]
fn test_resolves_named_keys() {
    let mut store = BindingStore::new();
    let enter = bind(&mut store, "Enter");
    let pgup = bind(&mut store, "pgup");

    assert!(fire(&store, &ev("Enter", "Enter")));
    assert!(fire(&store, &ev("PageUp", "PageUp")));
    assert_eq!(enter.get(), 1);
    assert_eq!(pgup.get(), 1);
}

#[test]
fn test_modifier_keydowns_never_dispatch() {
    let mut store = BindingStore::new();

    // Even a binding whose target token spells a modifier cannot fire
    let count = bind(&mut store, "Control");

    let press = KeyboardEvent {
        ctrl: true,
        ..KeyboardEvent::new("Control", "ControlLeft")
    };

    assert!(!fire(&store, &press));
    assert_eq!(count.get(), 0);
}

#[test]
fn test_exact_modifier_state_is_required() {
    let mut store = BindingStore::new();
    let bare = bind(&mut store, "a");
    let ctrl = bind(&mut store, "ctrl-a");

    let press = KeyboardEvent {
        ctrl: true,
        ..KeyboardEvent::new("a", "KeyA")
    };

    assert!(fire(&store, &press));
    assert_eq!(ctrl.get(), 1);
    assert_eq!(bare.get(), 0);

    // Extra modifiers match nothing
    let press = KeyboardEvent {
        ctrl: true,
        meta: true,
        ..KeyboardEvent::new("a", "KeyA")
    };

    assert!(!fire(&store, &press));
}

#[test]
fn test_shift_digit_resolves_by_extracted_digit() {
    let mut store = BindingStore::new();
    let count = bind(&mut store, "shift-2");

    // Shift+2 produces "@", the binding lives under "2"
    assert!(fire(&store, &shifted("@", "Digit2")));
    assert_eq!(count.get(), 1);
}

#[test]
fn test_bare_symbol_resolves_via_implicit_shift() {
    let mut store = BindingStore::new();
    let count = bind(&mut store, "@");

    assert!(fire(&store, &shifted("@", "Digit2")));
    assert_eq!(count.get(), 1);
}

#[test]
fn test_explicit_binding_beats_implicit_shift() {
    let mut store = BindingStore::new();
    let symbol = bind(&mut store, "@");
    let explicit = bind(&mut store, "shift-2");

    assert!(fire(&store, &shifted("@", "Digit2")));
    assert_eq!(explicit.get(), 1);
    assert_eq!(symbol.get(), 0);

    // Without the explicit binding the fallback takes over
    unbind(&mut store, "shift-2");

    assert!(fire(&store, &shifted("@", "Digit2")));
    assert_eq!(symbol.get(), 1);
}

#[test]
fn test_exact_pass_checks_all_candidates_before_fallback() {
    let mut store = BindingStore::new();
    let symbol = bind(&mut store, "@");
    let chord = bind(&mut store, "ctrl-shift-2");

    let press = KeyboardEvent {
        ctrl: true,
        shift: true,
        ..KeyboardEvent::new("@", "Digit2")
    };

    // The digit candidate carries the exact hit; "@" must not shadow it
    assert!(fire(&store, &press));
    assert_eq!(chord.get(), 1);
    assert_eq!(symbol.get(), 0);
}

#[test]
fn test_uppercase_letter_does_not_fall_back() {
    let mut store = BindingStore::new();
    let count = bind(&mut store, "a");

    // Shift+A produces "A"; the bare-letter binding must not fire
    assert!(!fire(&store, &shifted("A", "KeyA")));
    assert_eq!(count.get(), 0);
}

#[test]
fn test_numpad_keys_are_exempt_from_fallback() {
    let mut store = BindingStore::new();
    let count = bind(&mut store, "4");

    assert!(fire(&store, &ev("4", "Numpad4")));
    assert_eq!(count.get(), 1);

    // Shift+Numpad4 still produces "4", but "shift-4" is not bound and
    // the numpad exemption blocks the fallback
    assert!(!fire(&store, &shifted("4", "Numpad4")));
    assert_eq!(count.get(), 1);
}

#[test]
fn test_digit_and_numpad_paths_both_match() {
    let mut store = BindingStore::new();
    let count = bind(&mut store, "/");

    assert!(fire(&store, &ev("/", "Slash")));
    assert!(fire(&store, &ev("/", "NumpadDivide")));
    assert_eq!(count.get(), 2);
}

#[test]
fn test_plus_matches_numpad_and_shifted_equal() {
    let mut store = BindingStore::new();
    let count = bind(&mut store, "plus");

    // NumpadAdd delivers "+" directly
    assert!(fire(&store, &ev("+", "NumpadAdd")));
    // Shift+Equal delivers "+" and needs the fallback
    assert!(fire(&store, &shifted("+", "Equal")));
    assert_eq!(count.get(), 2);
}

#[test]
fn test_shift_symbol_spec_matches_shifted_event() {
    let mut store = BindingStore::new();
    let count = bind(&mut store, "shift-[");

    // The cascade put the handler under BracketLeft at "S"
    assert!(fire(&store, &shifted("{", "BracketLeft")));
    assert_eq!(count.get(), 1);
}

#[test]
fn test_bare_shifted_symbol_matches_via_fallback() {
    let mut store = BindingStore::new();
    let count = bind(&mut store, "{");

    assert!(fire(&store, &shifted("{", "BracketLeft")));
    assert_eq!(count.get(), 1);
}

#[test]
fn test_unmatched_event_is_silent() {
    let store = BindingStore::new();

    assert!(!fire(&store, &ev("x", "KeyX")));
    assert!(!fire(&store, &shifted("X", "KeyX")));
}

#[test]
fn test_handler_receives_the_raw_event() {
    let mut store = BindingStore::new();

    let seen = Rc::new(Cell::new(false));
    let inner = Rc::clone(&seen);
    let handler: KeyHandler = Rc::new(move |ev| inner.set(ev.repeat));

    let parsed = parse_hotkey("a").unwrap();
    store.insert(&parsed, handler, "a").unwrap();

    let press = KeyboardEvent {
        repeat: true,
        ..KeyboardEvent::new("a", "KeyA")
    };

    assert!(fire(&store, &press));
    assert!(seen.get());
}
