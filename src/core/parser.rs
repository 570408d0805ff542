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

//! src/core/parser.rs
//!
//! Hotkey spec string parser
//!
//! Turns a human-written spec like "ctrl-alt-a" into a canonical
//! `HotkeySpec`. The grammar is `( modifier "-" )* targetKey`:
//! - Modifier tokens are case-insensitive aliases (ctrl, control, alt,
//!   shift, meta, cmd, command)
//! - The last token is the target key, normalized through the alias table
//! - A lone "-" denotes the Minus key with no modifiers
//!
//! # Architecture
//! The token splitter is a nom combinator; anything it cannot consume
//! completely (empty string, leading/trailing/doubled separator) is an
//! invalid spec. Modifier unification and target normalization live on the
//! core types and key tables, keeping this module a thin grammar layer.

use nom::{
    bytes::complete::take_while1, character::complete::char, combinator::all_consuming,
    multi::separated_list1, IResult, Parser,
};

use crate::core::error::HotkeyError;
use crate::core::keys::normalize_target;
use crate::core::types::{HotkeySpec, Modifier, ModifierCode};

/// Split a spec into its "-"-separated tokens.
///
/// `take_while1` rejects empty tokens, so a leading, trailing, or doubled
/// separator leaves unconsumed input and fails `all_consuming`.
fn spec_tokens(input: &str) -> IResult<&str, Vec<&str>> {
    all_consuming(separated_list1(
        char('-'),
        take_while1(|c: char| c != '-'),
    ))
    .parse(input)
}

/// Parse a hotkey spec string into its canonical form.
///
/// # Arguments
/// * `spec` - A spec string like "ctrl-alt-a", "shift-@", or "pgdn"
///
/// # Errors
/// Returns `HotkeyError::InvalidSpec` for an empty string or a misplaced
/// separator, and `HotkeyError::UnknownModifier` when a non-final token is
/// not a modifier alias.
///
/// # Example
/// ```
/// use hotkey_router::core::parser::parse_hotkey;
///
/// let parsed = parse_hotkey("ctrl-alt-A")?;
/// assert_eq!(parsed.target_key, "a");
/// assert_eq!(parsed.modifiers.as_str(), "CA");
/// # Ok::<(), hotkey_router::core::HotkeyError>(())
/// ```
pub fn parse_hotkey(spec: &str) -> Result<HotkeySpec, HotkeyError> {
    // The separator itself as a target: "-" is the Minus key
    if spec == "-" {
        return Ok(HotkeySpec {
            target_key: "-".to_string(),
            modifiers: ModifierCode::NONE,
            implied_shift: false,
        });
    }

    let (_, mut tokens) = spec_tokens(spec).map_err(|_| HotkeyError::InvalidSpec {
        spec: spec.to_string(),
    })?;

    // separated_list1 yields at least one token
    let target = tokens.pop().ok_or_else(|| HotkeyError::InvalidSpec {
        spec: spec.to_string(),
    })?;

    let modifiers = ModifierCode::from_tokens(&tokens)?;

    Ok(HotkeySpec {
        target_key: normalize_target(target),
        modifiers,
        implied_shift: modifiers.contains(Modifier::Shift),
    })
}
