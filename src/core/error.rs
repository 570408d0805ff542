//! Engine error types
//!
//! Every failure the engine can report is a variant here. All of them are
//! synchronous and fatal to the call that raised them; nothing is retried
//! internally. A keydown that matches no binding is normal control flow,
//! not an error.

use thiserror::Error;

/// Errors raised by parsing, binding, and unbinding.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum HotkeyError {
    /// Empty spec string, or a separator in the wrong place
    /// ("-a", "a-", "ctrl--a").
    #[error("Invalid hotkey spec: {spec:?}")]
    InvalidSpec { spec: String },

    /// A modifier token that is not a recognized alias.
    #[error("Unknown modifier: {token:?}")]
    UnknownModifier { token: String },

    /// bind() on an occupied (target key, modifier code) pair.
    #[error("Duplicate hotkey: {spec:?}")]
    DuplicateHotkey { spec: String },

    /// unbind() on a (target key, modifier code) pair that is not bound.
    #[error("No such hotkey: {spec:?}")]
    NoSuchHotkey { spec: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_offender() {
        let err = HotkeyError::InvalidSpec {
            spec: "a--b".to_string(),
        };
        assert_eq!(format!("{}", err), "Invalid hotkey spec: \"a--b\"");

        let err = HotkeyError::UnknownModifier {
            token: "hyper".to_string(),
        };
        assert_eq!(format!("{}", err), "Unknown modifier: \"hyper\"");

        let err = HotkeyError::DuplicateHotkey {
            spec: "ctrl-a".to_string(),
        };
        assert_eq!(format!("{}", err), "Duplicate hotkey: \"ctrl-a\"");

        let err = HotkeyError::NoSuchHotkey {
            spec: "F5".to_string(),
        };
        assert_eq!(format!("{}", err), "No such hotkey: \"F5\"");
    }
}
