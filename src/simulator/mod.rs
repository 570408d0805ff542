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

//! src/simulator/mod.rs
//!
//! In-process keyboard simulation
//!
//! `EventBus` is a minimal keydown event source and `KeyboardSimulator`
//! drives it with synthetic keystrokes: it tracks which physical keys are
//! held and synthesizes the event each press would produce on a US-layout
//! keyboard, including shift-dependent values ("a" becomes "A", "2"
//! becomes "@") and the `repeat` flag for a key held across presses.
//!
//! Key names are physical-key flavored. Letters go by letter ("k" or
//! "KeyK"), the digit row by digit ("2" or "Digit2"), punctuation by
//! character or code name ("[" or "BracketLeft"), and everything else by
//! its code name ("Enter", "Numpad4", "F5", "Control").
//!
//! Key releases update held state only; the bus carries keydowns and
//! nothing else.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use thiserror::Error;

use crate::core::keys::SYMBOL_KEYS;
use crate::core::types::{KeyboardEvent, Modifier};
use crate::engine::source::{EventListener, EventSource, ListenerId};

/// A key name the simulator does not recognize.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("Unknown key name: {name:?}")]
pub struct UnknownKeyError {
    pub name: String,
}

/// A keydown bus with plain listener registration.
///
/// Listeners are invoked in registration order. The listener list is
/// snapshotted before each emit, so a listener may add or remove
/// listeners (mount or unmount an engine) without poisoning the walk.
pub struct EventBus {
    listeners: RefCell<Vec<(ListenerId, EventListener)>>,
    next_id: Cell<u64>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Deliver one keydown to every registered listener.
    pub fn emit_keydown(&self, ev: &KeyboardEvent) {
        let listeners: Vec<EventListener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        for listener in listeners {
            listener(ev);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for EventBus {
    fn add_keydown_listener(&self, listener: EventListener) -> ListenerId {
        let id = ListenerId::new(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    fn remove_keydown_listener(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|(lid, _)| *lid != id);
    }
}

/// Synthesizes keyboard events onto an `EventBus`.
///
/// # Example
/// ```
/// use std::rc::Rc;
/// use hotkey_router::simulator::{EventBus, KeyboardSimulator};
///
/// let bus = Rc::new(EventBus::new());
/// let keyboard = KeyboardSimulator::new(Rc::clone(&bus));
///
/// keyboard.key_down("Shift")?;
/// keyboard.key_down("2")?; // emits key "@", code "Digit2", shift set
/// keyboard.release_all();
/// # Ok::<(), hotkey_router::simulator::UnknownKeyError>(())
/// ```
pub struct KeyboardSimulator {
    bus: Rc<EventBus>,
    held: RefCell<HashSet<String>>,
}

impl KeyboardSimulator {
    pub fn new(bus: Rc<EventBus>) -> Self {
        Self {
            bus,
            held: RefCell::new(HashSet::new()),
        }
    }

    /// Press a key: mark it held and emit the keydown it produces given
    /// the modifiers currently held.
    ///
    /// Pressing a key that is already held emits a repeat, exactly like a
    /// physical key held past its repeat delay.
    pub fn key_down(&self, name: &str) -> Result<(), UnknownKeyError> {
        let def = key_def(name).ok_or_else(|| UnknownKeyError {
            name: name.to_string(),
        })?;

        let repeat = self.held.borrow().contains(&def.code);
        self.held.borrow_mut().insert(def.code.clone());

        let (ctrl, alt, shift, meta) = self.modifier_flags();
        let key = match &def.shifted {
            Some(shifted) if shift => shifted.clone(),
            _ => def.value.clone(),
        };

        self.bus.emit_keydown(&KeyboardEvent {
            key,
            code: def.code,
            ctrl,
            alt,
            shift,
            meta,
            repeat,
        });

        Ok(())
    }

    /// Release a key. Updates held state only; no event is emitted.
    pub fn key_up(&self, name: &str) -> Result<(), UnknownKeyError> {
        let def = key_def(name).ok_or_else(|| UnknownKeyError {
            name: name.to_string(),
        })?;

        self.held.borrow_mut().remove(&def.code);
        Ok(())
    }

    /// Press and immediately release a key.
    pub fn key_press(&self, name: &str) -> Result<(), UnknownKeyError> {
        self.key_down(name)?;
        self.key_up(name)
    }

    /// Press the named keys in order, then release them in reverse order.
    pub fn chord(&self, names: &[&str]) -> Result<(), UnknownKeyError> {
        for name in names {
            self.key_down(name)?;
        }

        for name in names.iter().rev() {
            self.key_up(name)?;
        }

        Ok(())
    }

    /// Release every held key.
    pub fn release_all(&self) {
        self.held.borrow_mut().clear();
    }

    fn modifier_flags(&self) -> (bool, bool, bool, bool) {
        let held = self.held.borrow();
        let down = |prefix: &str| held.iter().any(|code| code.starts_with(prefix));

        (down("Control"), down("Alt"), down("Shift"), down("Meta"))
    }
}

/// What one physical key produces: its code, its base value, and its
/// shifted value when shift changes it.
struct KeyDef {
    code: String,
    value: String,
    shifted: Option<String>,
}

/// Shifted forms of the punctuation keys, in `SYMBOL_KEYS` order.
const SHIFTED_SYMBOLS: [(&str, &str); 11] = [
    ("[", "{"),
    ("]", "}"),
    (";", ":"),
    ("'", "\""),
    ("\\", "|"),
    (",", "<"),
    ("`", "~"),
    ("=", "+"),
    ("-", "_"),
    (".", ">"),
    ("/", "?"),
];

/// Shifted forms of the digit row, indexed by digit.
const SHIFTED_DIGITS: &str = ")!@#$%^&*(";

fn key_def(name: &str) -> Option<KeyDef> {
    // Letters: "k", "K", or "KeyK"
    if let Some(letter) = single_letter(name) {
        return Some(letter_def(letter));
    }
    if let Some(rest) = name.strip_prefix("Key") {
        if let Some(letter) = single_letter(rest) {
            return Some(letter_def(letter));
        }
    }

    // Digit row: "2" or "Digit2"
    if let Some(digit) = single_digit(name) {
        return Some(digit_def(digit));
    }
    if let Some(rest) = name.strip_prefix("Digit") {
        if let Some(digit) = single_digit(rest) {
            return Some(digit_def(digit));
        }
    }

    // Numpad block, immune to shift
    if let Some(rest) = name.strip_prefix("Numpad") {
        let value = match rest {
            "Add" => "+".to_string(),
            "Subtract" => "-".to_string(),
            "Multiply" => "*".to_string(),
            "Divide" => "/".to_string(),
            "Decimal" => ".".to_string(),
            "Enter" => "Enter".to_string(),
            digit => single_digit(digit)?.to_string(),
        };

        return Some(KeyDef {
            code: name.to_string(),
            value,
            shifted: None,
        });
    }

    // Punctuation by character or code name
    for (symbol, code) in SYMBOL_KEYS {
        if name == symbol || name == code {
            let shifted = SHIFTED_SYMBOLS
                .iter()
                .find(|(base, _)| *base == symbol)
                .map(|(_, shifted)| (*shifted).to_string());

            return Some(KeyDef {
                code: code.to_string(),
                value: symbol.to_string(),
                shifted,
            });
        }
    }

    // Modifiers: "Control" presses the left-side key, "ControlRight" the
    // right-side one; both produce key "Control"
    if let Some(modifier) = Modifier::from_key(name) {
        return Some(KeyDef {
            code: format!("{modifier}Left"),
            value: modifier.to_string(),
            shifted: None,
        });
    }
    for side in ["Left", "Right"] {
        if let Some(rest) = name.strip_suffix(side) {
            if let Some(modifier) = Modifier::from_key(rest) {
                return Some(KeyDef {
                    code: name.to_string(),
                    value: modifier.to_string(),
                    shifted: None,
                });
            }
        }
    }

    if name == "Space" || name == " " {
        return Some(KeyDef {
            code: "Space".to_string(),
            value: " ".to_string(),
            shifted: None,
        });
    }

    const NAMED_KEYS: [&str; 14] = [
        "Backspace",
        "Enter",
        "Escape",
        "Tab",
        "Insert",
        "Delete",
        "Home",
        "End",
        "PageUp",
        "PageDown",
        "ArrowUp",
        "ArrowDown",
        "ArrowLeft",
        "ArrowRight",
    ];

    if NAMED_KEYS.contains(&name) {
        return Some(KeyDef {
            code: name.to_string(),
            value: name.to_string(),
            shifted: None,
        });
    }

    // Function keys F1 through F24
    if let Some(digits) = name.strip_prefix('F') {
        let plain = !digits.is_empty()
            && !digits.starts_with('0')
            && digits.chars().all(|c| c.is_ascii_digit());

        if plain {
            if let Ok(n) = digits.parse::<u8>() {
                if (1..=24).contains(&n) {
                    return Some(KeyDef {
                        code: name.to_string(),
                        value: name.to_string(),
                        shifted: None,
                    });
                }
            }
        }
    }

    None
}

fn single_letter(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Some(c),
        _ => None,
    }
}

fn single_digit(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_digit() => Some(c),
        _ => None,
    }
}

fn letter_def(letter: char) -> KeyDef {
    let lower = letter.to_ascii_lowercase();

    KeyDef {
        code: format!("Key{}", letter.to_ascii_uppercase()),
        value: lower.to_string(),
        shifted: Some(lower.to_ascii_uppercase().to_string()),
    }
}

fn digit_def(digit: char) -> KeyDef {
    let index = (digit as usize) - ('0' as usize);

    KeyDef {
        code: format!("Digit{digit}"),
        value: digit.to_string(),
        shifted: SHIFTED_DIGITS.chars().nth(index).map(|c| c.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture(bus: &EventBus) -> Rc<RefCell<Vec<KeyboardEvent>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        bus.add_keydown_listener(Rc::new(move |ev: &KeyboardEvent| {
            sink.borrow_mut().push(ev.clone());
        }));
        seen
    }

    fn rig() -> (Rc<EventBus>, KeyboardSimulator, Rc<RefCell<Vec<KeyboardEvent>>>) {
        let bus = Rc::new(EventBus::new());
        let seen = capture(&bus);
        let keyboard = KeyboardSimulator::new(Rc::clone(&bus));
        (bus, keyboard, seen)
    }

    #[test]
    fn test_letter_keydown_fields() {
        let (_bus, keyboard, seen) = rig();
        keyboard.key_down("a").unwrap();

        let events = seen.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].key, "a");
        assert_eq!(events[0].code, "KeyA");
        assert!(!events[0].ctrl && !events[0].alt && !events[0].shift && !events[0].meta);
        assert!(!events[0].repeat);
    }

    #[test]
    fn test_letter_name_forms_are_equivalent() {
        let (_bus, keyboard, seen) = rig();
        keyboard.key_press("K").unwrap();
        keyboard.key_press("k").unwrap();
        keyboard.key_press("KeyK").unwrap();

        let events = seen.borrow();
        assert!(events.iter().all(|ev| ev.key == "k" && ev.code == "KeyK"));
    }

    #[test]
    fn test_shift_uppercases_letters() {
        let (_bus, keyboard, seen) = rig();
        keyboard.key_down("Shift").unwrap();
        keyboard.key_down("a").unwrap();

        let ev = seen.borrow().last().cloned().unwrap();
        assert_eq!(ev.key, "A");
        assert_eq!(ev.code, "KeyA");
        assert!(ev.shift);
    }

    #[test]
    fn test_shift_rewrites_digit_row() {
        let (_bus, keyboard, seen) = rig();
        keyboard.key_down("Shift").unwrap();
        keyboard.key_down("2").unwrap();

        let ev = seen.borrow().last().cloned().unwrap();
        assert_eq!(ev.key, "@");
        assert_eq!(ev.code, "Digit2");
    }

    #[test]
    fn test_shift_rewrites_punctuation() {
        let (_bus, keyboard, seen) = rig();
        keyboard.key_down("Shift").unwrap();
        keyboard.key_down("[").unwrap();
        keyboard.key_down("Slash").unwrap();

        let events = seen.borrow();
        assert_eq!(events[1].key, "{");
        assert_eq!(events[1].code, "BracketLeft");
        assert_eq!(events[2].key, "?");
        assert_eq!(events[2].code, "Slash");
    }

    #[test]
    fn test_numpad_is_immune_to_shift() {
        let (_bus, keyboard, seen) = rig();
        keyboard.key_down("Shift").unwrap();
        keyboard.key_down("Numpad4").unwrap();
        keyboard.key_down("NumpadAdd").unwrap();

        let events = seen.borrow();
        assert_eq!(events[1].key, "4");
        assert_eq!(events[1].code, "Numpad4");
        assert_eq!(events[2].key, "+");
        assert_eq!(events[2].code, "NumpadAdd");
    }

    #[test]
    fn test_modifier_keydown_reports_own_flag() {
        let (_bus, keyboard, seen) = rig();
        keyboard.key_down("Control").unwrap();

        let events = seen.borrow();
        assert_eq!(events[0].key, "Control");
        assert_eq!(events[0].code, "ControlLeft");
        assert!(events[0].ctrl);
    }

    #[test]
    fn test_right_side_modifier_code() {
        let (_bus, keyboard, seen) = rig();
        keyboard.key_down("ControlRight").unwrap();
        keyboard.key_down("a").unwrap();

        let events = seen.borrow();
        assert_eq!(events[0].code, "ControlRight");
        assert_eq!(events[0].key, "Control");
        assert!(events[1].ctrl);
    }

    #[test]
    fn test_held_key_repeats() {
        let (_bus, keyboard, seen) = rig();
        keyboard.key_down("a").unwrap();
        keyboard.key_down("a").unwrap();
        keyboard.key_up("a").unwrap();
        keyboard.key_down("a").unwrap();

        let events = seen.borrow();
        assert!(!events[0].repeat);
        assert!(events[1].repeat);
        assert!(!events[2].repeat);
    }

    #[test]
    fn test_key_up_releases_shift() {
        let (_bus, keyboard, seen) = rig();
        keyboard.key_down("Shift").unwrap();
        keyboard.key_down("a").unwrap();
        keyboard.key_up("Shift").unwrap();
        keyboard.key_down("a").unwrap();

        let events = seen.borrow();
        assert_eq!(events[1].key, "A");
        assert_eq!(events[2].key, "a");
        assert!(!events[2].shift);
    }

    #[test]
    fn test_release_all_clears_held_state() {
        let (_bus, keyboard, seen) = rig();
        keyboard.key_down("Control").unwrap();
        keyboard.key_down("Shift").unwrap();
        keyboard.release_all();
        keyboard.key_down("a").unwrap();

        let ev = seen.borrow().last().cloned().unwrap();
        assert_eq!(ev.key, "a");
        assert!(!ev.ctrl && !ev.shift);
        assert!(!ev.repeat);
    }

    #[test]
    fn test_chord_presses_in_order_and_releases() {
        let (_bus, keyboard, seen) = rig();
        keyboard.chord(&["Control", "Shift", "k"]).unwrap();
        keyboard.key_down("k").unwrap();

        let events = seen.borrow();
        assert_eq!(events.len(), 4);
        assert_eq!(events[0].key, "Control");
        assert_eq!(events[1].key, "Shift");
        assert_eq!(events[2].key, "K");
        assert!(events[2].ctrl && events[2].shift);
        // Chord released everything, so the trailing press is bare
        assert_eq!(events[3].key, "k");
        assert!(!events[3].ctrl && !events[3].repeat);
    }

    #[test]
    fn test_space_produces_blank_value() {
        let (_bus, keyboard, seen) = rig();
        keyboard.key_down("Space").unwrap();

        let events = seen.borrow();
        assert_eq!(events[0].key, " ");
        assert_eq!(events[0].code, "Space");
    }

    #[test]
    fn test_function_key_range() {
        let (_bus, keyboard, seen) = rig();
        keyboard.key_down("F5").unwrap();
        keyboard.key_down("F24").unwrap();

        let events = seen.borrow();
        assert_eq!(events[0].key, "F5");
        assert_eq!(events[1].code, "F24");

        assert!(keyboard.key_down("F25").is_err());
        assert!(keyboard.key_down("F0").is_err());
    }

    #[test]
    fn test_unknown_key_name() {
        let (_bus, keyboard, _seen) = rig();
        let err = keyboard.key_down("Bogus").unwrap_err();
        assert_eq!(
            err,
            UnknownKeyError {
                name: "Bogus".to_string()
            }
        );
    }

    #[test]
    fn test_removed_listener_stops_receiving() {
        let bus = Rc::new(EventBus::new());
        let seen = capture(&bus);
        let keyboard = KeyboardSimulator::new(Rc::clone(&bus));

        let second = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&second);
        let id = bus.add_keydown_listener(Rc::new(move |ev: &KeyboardEvent| {
            sink.borrow_mut().push(ev.clone());
        }));
        assert_eq!(bus.listener_count(), 2);

        keyboard.key_press("a").unwrap();
        bus.remove_keydown_listener(id);
        keyboard.key_press("b").unwrap();

        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(second.borrow().len(), 1);
        assert_eq!(bus.listener_count(), 1);
    }
}
