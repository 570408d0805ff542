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

//! src/core/dispatch.rs
//!
//! Keydown resolution
//!
//! Resolves one keyboard event to at most one handler in the binding
//! store. Resolution is synchronous and allocation-light: a candidate-key
//! list, an exact pass, and an implicit-shift fallback pass.
//!
//! # Resolution order
//! 1. Modifier keydowns (Control, Alt, Shift, Meta) never dispatch.
//! 2. Candidate lookup keys, in order: the case-folded character value,
//!    the physical key code, and the bare digit when Shift is held on a
//!    digit or numpad-digit key.
//! 3. Exact pass: each candidate against the live modifier code; the
//!    first hit wins.
//! 4. Fallback pass, only when the exact pass found nothing: a
//!    single-character value typed with Shift on a non-numpad key retries
//!    with Shift stripped from the live code, so a binding on "@" matches
//!    the live Shift+Digit2 event. The raw value is used here, which is
//!    why an uppercase letter never falls back onto its bare-letter
//!    binding.
//!
//! An explicit modifier-qualified binding ("shift-2") therefore always
//! beats the implicit-shift fallback ("@") when both are registered.

use tracing::trace;

use crate::core::keys::{digit_of, fold_value, is_number_key, is_numpad_key};
use crate::core::store::BindingStore;
use crate::core::types::{KeyHandler, KeyboardEvent, Modifier, ModifierCode};

/// Resolve a keydown to its handler, if any.
///
/// Returns `None` for modifier keydowns and for events with no matching
/// binding; neither case is an error.
pub fn resolve<'a>(store: &'a BindingStore, ev: &KeyboardEvent) -> Option<&'a KeyHandler> {
    // Modifiers are never bindable targets
    if Modifier::from_key(&ev.key).is_some() {
        return None;
    }

    let live = ModifierCode::from_event(ev);
    let value = fold_value(&ev.key);

    let digit = if ev.shift && is_number_key(&ev.code) {
        digit_of(&ev.code).map(|d| d.to_string())
    } else {
        None
    };

    let mut candidates: Vec<&str> = Vec::with_capacity(3);
    candidates.push(&value);
    if ev.code != value {
        candidates.push(&ev.code);
    }
    if let Some(digit) = digit.as_deref() {
        candidates.push(digit);
    }

    // Exact pass: every candidate gets a chance at the live code before
    // any fallback is considered
    for key in &candidates {
        if let Some(handler) = store.lookup(key, live) {
            trace!(key, code = %ev.code, modifiers = %live, "matched binding");
            return Some(handler);
        }
    }

    // Fallback pass: forgive the Shift that was needed to type the symbol
    if implicit_shift(ev) {
        let without_shift = live.without_shift();

        if let Some(handler) = store.lookup(&ev.key, without_shift) {
            trace!(
                key = %ev.key,
                code = %ev.code,
                modifiers = %without_shift,
                "matched binding via implicit shift"
            );
            return Some(handler);
        }
    }

    trace!(key = %ev.key, code = %ev.code, modifiers = %live, "no binding matched");
    None
}

/// Whether the event qualifies for the implicit-shift fallback: Shift held,
/// a single-character value, and a non-numpad physical key (numpad values
/// are not produced by Shift).
fn implicit_shift(ev: &KeyboardEvent) -> bool {
    ev.shift && is_single_char(&ev.key) && !is_numpad_key(&ev.code)
}

fn is_single_char(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some() && chars.next().is_none()
}
