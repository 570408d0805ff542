//! src/core/types.rs
//!
//! Core type definitions for hotkey parsing and dispatch
//!
//! This module defines the fundamental types used throughout the engine:
//! - `Modifier`: The four modifier keys (Control, Alt, Shift, Meta)
//! - `ModifierCode`: Canonical, order-independent encoding of held modifiers
//! - `KeyboardEvent`: A keydown snapshot as delivered by an event source
//! - `HotkeySpec`: A parsed hotkey string (target key + modifier code)
//! - `KeyHandler`: The callback type invoked when a combination matches
//!
//! Everything normalizes into these types so that lookups are exact map hits
//! regardless of how a combination was spelled or in which order the
//! modifiers were pressed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

use crate::core::error::HotkeyError;

/// Handler invoked with the original event when its combination matches.
pub type KeyHandler = Rc<dyn Fn(&KeyboardEvent)>;

/// Keyboard modifier keys
///
/// Represents the four standard modifier keys used in hotkey combinations.
/// Each carries a fixed bit value so that any subset of modifiers sums to a
/// unique index into the canonical code table.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Modifier {
    /// Control key (bit 1)
    Control,
    /// Alt/Option key (bit 2)
    Alt,
    /// Shift key (bit 4)
    Shift,
    /// Meta/Command/Windows key (bit 8)
    Meta,
}

impl Modifier {
    /// Fixed bit value used when combining modifiers into a `ModifierCode`.
    pub fn bit(self) -> u8 {
        match self {
            Modifier::Control => 1,
            Modifier::Alt => 2,
            Modifier::Shift => 4,
            Modifier::Meta => 8,
        }
    }

    /// Resolve a spec-string token to a modifier.
    ///
    /// Recognized aliases (case-insensitive):
    /// - "ctrl", "control" → Control
    /// - "alt" → Alt
    /// - "shift" → Shift
    /// - "meta", "cmd", "command" → Meta
    pub fn from_alias(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => Some(Modifier::Control),
            "alt" => Some(Modifier::Alt),
            "shift" => Some(Modifier::Shift),
            "meta" | "cmd" | "command" => Some(Modifier::Meta),
            _ => None,
        }
    }

    /// Match an event's `key` value ("Control", "Alt", "Shift", "Meta").
    ///
    /// Key values are matched exactly; this is how dispatch recognizes that
    /// the pressed key is itself a modifier.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Control" => Some(Modifier::Control),
            "Alt" => Some(Modifier::Alt),
            "Shift" => Some(Modifier::Shift),
            "Meta" => Some(Modifier::Meta),
            _ => None,
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modifier::Control => write!(f, "Control"),
            Modifier::Alt => write!(f, "Alt"),
            Modifier::Shift => write!(f, "Shift"),
            Modifier::Meta => write!(f, "Meta"),
        }
    }
}

/// The 16 canonical modifier-set names, indexed by summed bit values.
///
/// `"_"` is the empty set; letters are always emitted in C, A, S, M order
/// no matter how the set was assembled.
const UNIFIED_CODES: [&str; 16] = [
    "_", "C", "A", "CA", "S", "CS", "AS", "CAS", "M", "CM", "AM", "CAM",
    "SM", "CSM", "ASM", "CASM",
];

/// Canonical, order-independent encoding of a set of held modifiers
///
/// Built by OR-ing `Modifier::bit()` values, so "ctrl-alt" and "alt-ctrl"
/// produce the identical code. Used as the second-level key in the binding
/// store, which is what makes modifier order irrelevant at both bind time
/// and dispatch time.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct ModifierCode(u8);

impl ModifierCode {
    /// No modifiers held; renders as `"_"`.
    pub const NONE: ModifierCode = ModifierCode(0);

    /// Unify spec-string modifier tokens into a single code.
    ///
    /// Duplicates collapse by semantic identity, so "ctrl-control-a" means
    /// the same as "ctrl-a". Token order never changes the result.
    ///
    /// # Errors
    ///
    /// Returns `HotkeyError::UnknownModifier` naming the first token that is
    /// not a recognized modifier alias.
    pub fn from_tokens(tokens: &[&str]) -> Result<Self, HotkeyError> {
        let mut bits = 0u8;

        for token in tokens {
            let modifier = Modifier::from_alias(token).ok_or_else(|| {
                HotkeyError::UnknownModifier {
                    token: (*token).to_string(),
                }
            })?;

            bits |= modifier.bit();
        }

        Ok(ModifierCode(bits))
    }

    /// Unify the live modifier flags of a keyboard event.
    ///
    /// When the event's own key *is* a modifier, that modifier's flag is
    /// excluded: pressing Control alone must not look like
    /// "Control+Control".
    pub fn from_event(ev: &KeyboardEvent) -> Self {
        let mut bits = 0u8;

        if ev.ctrl && ev.key != "Control" {
            bits |= Modifier::Control.bit();
        }
        if ev.alt && ev.key != "Alt" {
            bits |= Modifier::Alt.bit();
        }
        if ev.shift && ev.key != "Shift" {
            bits |= Modifier::Shift.bit();
        }
        if ev.meta && ev.key != "Meta" {
            bits |= Modifier::Meta.bit();
        }

        ModifierCode(bits)
    }

    /// Returns a copy of this code with the given modifier added.
    pub fn with(self, modifier: Modifier) -> Self {
        ModifierCode(self.0 | modifier.bit())
    }

    /// Whether the given modifier is part of this code.
    pub fn contains(self, modifier: Modifier) -> bool {
        self.0 & modifier.bit() != 0
    }

    /// Returns a copy of this code with Shift removed.
    ///
    /// This is the modifier half of the implicit-shift fallback: a live
    /// "S" state retried as "_", "CS" retried as "C", and so on.
    pub fn without_shift(self) -> Self {
        ModifierCode(self.0 & !Modifier::Shift.bit())
    }

    /// True when no modifier is held.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The canonical name of this modifier set.
    pub fn as_str(self) -> &'static str {
        // Only the four modifier bits are ever set, so the sum is < 16
        UNIFIED_CODES[self.0 as usize]
    }
}

impl fmt::Display for ModifierCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A keydown snapshot as delivered by an event source
///
/// Field names follow the conventional keyboard-event shape: `key` is the
/// produced character or named-key value ("a", "@", "Enter", "Control"),
/// `code` is the physical key identifier ("KeyA", "Digit2", "NumpadAdd"),
/// and the four booleans are the live modifier flags. `repeat` is passed
/// through to handlers unmodified; dispatch never branches on it.
#[derive(Clone, Debug, Default)]
pub struct KeyboardEvent {
    /// Produced value ("a", "@", "Enter", "Control")
    pub key: String,

    /// Physical key identifier ("KeyA", "Digit2", "Slash")
    pub code: String,

    /// Control held
    pub ctrl: bool,

    /// Alt held
    pub alt: bool,

    /// Shift held
    pub shift: bool,

    /// Meta held
    pub meta: bool,

    /// Auto-repeat keydown (key was already held)
    pub repeat: bool,
}

impl KeyboardEvent {
    /// Create an event with no modifiers held.
    pub fn new(key: &str, code: &str) -> Self {
        Self {
            key: key.to_string(),
            code: code.to_string(),
            ..Self::default()
        }
    }
}

/// A parsed hotkey string
///
/// The canonical form of a spec like "ctrl-alt-a": its normalized target
/// key plus the unified modifier code. `implied_shift` records whether the
/// code contains Shift; bind and unbind use it to cascade shift-qualified
/// symbol specs onto the physical key that produces the symbol (see the
/// binding store).
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct HotkeySpec {
    /// Normalized target key ("a", "2", "PageUp", "@")
    pub target_key: String,

    /// Unified modifier code
    pub modifiers: ModifierCode,

    /// Whether the modifier code contains Shift
    pub implied_shift: bool,
}

impl fmt::Display for HotkeySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.is_empty() {
            write!(f, "{}", self.target_key)
        } else {
            write!(f, "{}+{}", self.modifiers, self.target_key)
        }
    }
}
