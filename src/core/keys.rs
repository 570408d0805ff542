//! Key name normalization tables and physical-key classification
//!
//! Two frozen tables drive normalization:
//! - `KEY_ALIASES`: human-friendly spec names → canonical key values
//!   ("esc" → "Escape", "plus" → "+")
//! - `SYMBOL_KEYS`: symbol characters → the physical key id that produces
//!   them ("[" → "BracketLeft")
//!
//! The classification helpers below them answer questions about physical
//! key ids ("Digit4", "Numpad7") that the dispatcher needs for digit
//! extraction and for the numpad exemption of the implicit-shift fallback.

/// Human-friendly aliases accepted in hotkey specs, and their canonical
/// key values. Lookups are case-insensitive.
pub const KEY_ALIASES: [(&str, &str); 21] = [
    // Arrows
    ("up", "ArrowUp"),
    ("down", "ArrowDown"),
    ("left", "ArrowLeft"),
    ("right", "ArrowRight"),
    // Symbols
    ("space", " "),
    ("plus", "+"),
    ("minus", "-"),
    ("equal", "="),
    ("underscore", "_"),
    ("quote", "'"),
    ("singlequote", "'"),
    ("quotes", "\""),
    ("doublequotes", "\""),
    ("backquote", "`"),
    ("tilde", "~"),
    ("backslash", "\\"),
    // Others
    ("ins", "Insert"),
    ("del", "Delete"),
    ("esc", "Escape"),
    ("pgup", "PageUp"),
    ("pgdn", "PageDown"),
];

/// Symbol characters and the physical key id that produces each one.
///
/// Used by the binding store to register a shift-qualified symbol spec
/// ("shift-[") under the physical key as well, so the live shifted event
/// (key "{", code "BracketLeft") resolves exactly.
pub const SYMBOL_KEYS: [(&str, &str); 11] = [
    ("[", "BracketLeft"),
    ("]", "BracketRight"),
    (";", "Semicolon"),
    ("'", "Quote"),
    ("\\", "Backslash"),
    (",", "Comma"),
    ("`", "Backquote"),
    ("=", "Equal"),
    ("-", "Minus"),
    (".", "Period"),
    ("/", "Slash"),
];

/// Resolve a spec alias (case-insensitive) to its canonical key value.
pub fn resolve_alias(name: &str) -> Option<&'static str> {
    KEY_ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(name))
        .map(|(_, canonical)| *canonical)
}

/// Resolve a symbol character to the physical key id that produces it.
pub fn resolve_symbol(target: &str) -> Option<&'static str> {
    SYMBOL_KEYS
        .iter()
        .find(|(symbol, _)| *symbol == target)
        .map(|(_, key_id)| *key_id)
}

/// Normalize a spec target token into its canonical key.
///
/// Single letters fold to lowercase, aliases resolve through the table,
/// everything else passes through with its exact spelling (named keys
/// like "PageUp" are expected in canonical casing).
pub fn normalize_target(raw: &str) -> String {
    if is_letter(raw) {
        return raw.to_ascii_lowercase();
    }

    match resolve_alias(raw) {
        Some(canonical) => canonical.to_string(),
        None => raw.to_string(),
    }
}

/// A single ASCII letter.
pub fn is_letter(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(c), None) if c.is_ascii_alphabetic()
    )
}

/// Case-fold an event's key value: single letters lowercase, everything
/// else unchanged.
pub fn fold_value(key: &str) -> String {
    if is_letter(key) {
        key.to_ascii_lowercase()
    } else {
        key.to_string()
    }
}

/// Top-row digit key ("Digit0".."Digit9").
pub fn is_digit_key(code: &str) -> bool {
    code.starts_with("Digit")
}

/// Any numpad key ("Numpad4", "NumpadAdd", ...).
///
/// Numpad keys are exempt from the implicit-shift fallback: their values
/// are not produced by Shift.
pub fn is_numpad_key(code: &str) -> bool {
    code.starts_with("Numpad")
}

/// A numpad digit key ("Numpad0".."Numpad9").
pub fn is_numpad_digit(code: &str) -> bool {
    is_numpad_key(code) && code.chars().last().is_some_and(|c| c.is_ascii_digit())
}

/// A key whose physical id ends in a digit it produces: top-row or numpad.
pub fn is_number_key(code: &str) -> bool {
    is_digit_key(code) || is_numpad_digit(code)
}

/// Extract the digit character from a number key's physical id.
pub fn digit_of(code: &str) -> Option<char> {
    code.chars().last().filter(|c| c.is_ascii_digit())
}
