//! Surface Events
//!
//! Keyboard input forwarded by a UI surface. Surfaces report what was
//! pressed; the panel decides what it means.

use serde::{Deserialize, Serialize};

/// A key press relevant to the chat panel
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PanelKey {
    /// Escape: closes the panel
    Escape,
    /// Enter / Return
    Enter,
    /// A printable character
    Char(char),
    /// Anything else
    Other,
}

impl PanelKey {
    /// Map a DOM `KeyboardEvent.key` value
    #[must_use]
    pub fn from_key_name(name: &str) -> Self {
        match name {
            "Escape" | "Esc" => Self::Escape,
            "Enter" => Self::Enter,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Char(c),
                    _ => Self::Other,
                }
            }
        }
    }
}
