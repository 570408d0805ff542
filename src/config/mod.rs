//! Keymap file loading and validation.
//!
//! This module reads plain-text keymap files that pair hotkey specs with
//! named actions, one binding per line:
//!
//! ```text
//! # Launcher keys
//! $mainMod = ctrl-alt
//!
//! bind = $mainMod-k, open-palette
//! bind = esc, dismiss
//! ```
//!
//! Key features:
//!
//! - **Variable substitution**: `$name = value` lines define prefixes that
//!   later bind lines can reference. Only the hotkey field must fully
//!   resolve; dollar text in the action is left for the action's runtime
//! - **Line numbers**: every entry and every error carries its source line
//! - **Spec validation**: each hotkey is parsed before it is accepted
//! - **Duplicate detection**: `check_bindings` dry-runs entries against a
//!   binding store and reports every collision
//!
//! Parsing never touches an engine; the loaded entries are plain data for
//! the caller to bind, list, or check.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use hotkey_router::config::load_keymap;
//!
//! let entries = load_keymap(Path::new("keymap.conf"))?;
//! for entry in &entries {
//!     println!("{} -> {}", entry.hotkey, entry.action);
//! }
//! # Ok::<(), hotkey_router::config::KeymapError>(())
//! ```

use nom::bytes::complete::{tag, take_until, take_while1};
use nom::character::complete::{char, space0};
use nom::{IResult, Parser};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::rc::Rc;
use thiserror::Error;

use crate::core::store::BindingStore;
use crate::core::types::{KeyHandler, KeyboardEvent};
use crate::core::{parse_hotkey, HotkeyError};

/// Keymap errors with line number context
#[derive(Debug, Error)]
pub enum KeymapError {
    #[error("Parse error on line {line}: {message}")]
    InvalidSyntax { line: usize, message: String },

    #[error("Undefined variable '${variable}' on line {line}")]
    UndefinedVariable { variable: String, line: usize },

    #[error("Invalid hotkey on line {line}: {source}")]
    InvalidHotkey { line: usize, source: HotkeyError },

    #[error("IO error reading keymap: {0}")]
    IoError(#[from] std::io::Error),
}

/// One bind line of a keymap file.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct KeymapEntry {
    /// The hotkey spec as written (after variable substitution).
    pub hotkey: String,

    /// The action name the binding should trigger.
    pub action: String,

    /// Source line number, starting at 1.
    pub line: usize,
}

/// Parse a complete keymap file
///
/// Comments, blank lines, and variable definitions are skipped; every
/// remaining `bind = <spec>, <action>` line becomes one entry. Each spec
/// is validated with the hotkey parser so that a loaded keymap is known
/// to bind cleanly (duplicates aside; see `check_bindings`).
///
/// # Errors
/// The first malformed bind line, unresolved variable in a hotkey field,
/// or invalid spec aborts the parse with its line number.
pub fn parse_keymap(content: &str) -> Result<Vec<KeymapEntry>, KeymapError> {
    // First pass: collect variable definitions
    let variables = collect_variables(content);

    // Second pass: parse bind lines with variable substitution
    let mut entries = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let line_num = line_num + 1; // Human-readable numbers start at 1

        // Skip empty lines and comments
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() || line_trimmed.starts_with('#') {
            continue;
        }

        // Only process bind lines
        if !line_trimmed.starts_with("bind") {
            continue;
        }

        // Substitute variables before parsing
        let substituted = substitute_variables(line_trimmed, &variables);

        let (hotkey, action) = match parse_bind_line(&substituted) {
            Ok((_, parts)) => parts,
            Err(e) => {
                return Err(KeymapError::InvalidSyntax {
                    line: line_num,
                    message: format!("{:?}", e),
                });
            }
        };

        // A $name left in the hotkey field means the variable was never
        // defined. The action is not checked: text like `exec echo $HOME`
        // belongs to whatever runs the action. A bare "$" stays legal as
        // the shifted-4 symbol.
        if let Some(variable) = unresolved_variable(&hotkey) {
            return Err(KeymapError::UndefinedVariable {
                variable,
                line: line_num,
            });
        }

        parse_hotkey(&hotkey).map_err(|source| KeymapError::InvalidHotkey {
            line: line_num,
            source,
        })?;

        entries.push(KeymapEntry {
            hotkey,
            action,
            line: line_num,
        });
    }

    Ok(entries)
}

/// Read and parse a keymap file from disk.
pub fn load_keymap(path: &Path) -> Result<Vec<KeymapEntry>, KeymapError> {
    let content = fs::read_to_string(path)?;
    parse_keymap(&content)
}

/// Collect variable definitions from a keymap
///
/// Definitions use the form:
/// ```text
/// $mainMod = ctrl-alt
/// $leader = meta
/// ```
///
/// Returns a HashMap mapping variable names to their values
pub fn collect_variables(content: &str) -> HashMap<String, String> {
    let mut variables = HashMap::new();

    for line in content.lines() {
        let line_trimmed = line.trim();

        // Variable definition format: $name = value
        if line_trimmed.starts_with('$') {
            if let Some(equals_pos) = line_trimmed.find('=') {
                let var_name = line_trimmed[1..equals_pos].trim().to_string();
                let var_value = line_trimmed[equals_pos + 1..].trim().to_string();
                variables.insert(var_name, var_value);
            }
        }
    }

    variables
}

/// Substitute variables in a line
///
/// Replaces $varName with its value from the variables HashMap
pub fn substitute_variables(line: &str, variables: &HashMap<String, String>) -> String {
    let mut result = line.to_string();

    for (var_name, var_value) in variables {
        let pattern = format!("${}", var_name);
        result = result.replace(&pattern, var_value);
    }

    result
}

/// Parse a single bind line
///
/// Format: bind = SPEC, ACTION
/// Example: bind = ctrl-alt-k, open-palette
///
/// The action is everything after the first comma, so action strings may
/// themselves contain commas.
pub fn parse_bind_line(input: &str) -> IResult<&str, (String, String)> {
    let (input, _) = tag("bind")(input)?;
    let (input, _) = (space0, char('='), space0).parse(input)?;
    let (input, spec) = take_until(",")(input)?;
    let (input, _) = (space0, char(','), space0).parse(input)?;
    let (input, action) = take_while1(|c: char| c != '\n')(input)?;

    Ok((input, (spec.trim().to_string(), action.trim().to_string())))
}

/// Dry-run entries against a fresh binding store and report collisions.
///
/// Returns one (line, error) pair per entry that failed to install, in
/// file order. Catches exact duplicates, respelled duplicates such as
/// "ctrl-alt-a" after "alt-ctrl-a", and shift-symbol cascade collisions.
pub fn check_bindings(entries: &[KeymapEntry]) -> Vec<(usize, HotkeyError)> {
    let mut store = BindingStore::new();
    let mut problems = Vec::new();

    for entry in entries {
        let handler: KeyHandler = Rc::new(|_: &KeyboardEvent| {});
        let result = parse_hotkey(&entry.hotkey)
            .and_then(|parsed| store.insert(&parsed, handler, &entry.hotkey));

        if let Err(err) = result {
            problems.push((entry.line, err));
        }
    }

    problems
}

/// The name trailing the first `$` in a substituted hotkey field, if any.
fn unresolved_variable(hotkey: &str) -> Option<String> {
    let start = hotkey.find('$')?;
    let name: String = hotkey[start + 1..]
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .collect();

    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}
