//! Debug-mode event trace formatting
//!
//! Renders one keydown per line in a fixed-width layout so a stream of
//! traced events lines up in columns:
//!
//! ```text
//! 🔻a       [ ctrl shift ]        | id:KeyA
//! 🔻Enter                         | id:Enter
//! ```

use crate::core::KeyboardEvent;

/// Format one keydown for the debug trace.
pub(crate) fn format_keydown(ev: &KeyboardEvent) -> String {
    let mut held = Vec::new();

    if ev.ctrl {
        held.push("ctrl");
    }
    if ev.alt {
        held.push("alt");
    }
    if ev.shift {
        held.push("shift");
    }
    if ev.meta {
        held.push("meta");
    }

    let modifiers = if held.is_empty() {
        String::new()
    } else {
        format!("[ {} ]", held.join(" "))
    };

    format!(
        "🔻{} {} | id:{}",
        right_pad(&ev.key, 7),
        right_pad(&modifiers, 21),
        ev.code
    )
}

fn right_pad(s: &str, width: usize) -> String {
    let len = s.chars().count();

    if len < width {
        let mut padded = s.to_string();
        padded.push_str(&" ".repeat(width - len));
        padded
    } else {
        s.to_string()
    }
}
