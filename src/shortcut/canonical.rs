//! Canonical shortcut serialization and keycap display.
//!
//! A chord serializes to ordered `+`-joined tokens: modifiers first in fixed
//! priority (`CommandOrControl`, `Ctrl`, `Alt`, `Shift`), then the single
//! non-modifier key token. The order is a storage contract: two chords with
//! the same key set serialize identically no matter the physical press order.

/// Cross-platform modifier tokens, in serialization priority order.
pub const MODIFIER_TOKENS: &[&str] = &["CommandOrControl", "Ctrl", "Alt", "Shift"];

/// Modifier keys held during a chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub meta: bool,
    pub control: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.meta || self.control || self.alt || self.shift
    }

    /// Accumulate modifiers seen across key-down events.
    pub fn merge(&mut self, other: Modifiers) {
        self.meta |= other.meta;
        self.control |= other.control;
        self.alt |= other.alt;
        self.shift |= other.shift;
    }
}

impl From<crossterm::event::KeyModifiers> for Modifiers {
    fn from(modifiers: crossterm::event::KeyModifiers) -> Self {
        use crossterm::event::KeyModifiers as Km;
        Self {
            meta: modifiers.intersects(Km::SUPER | Km::META),
            control: modifiers.contains(Km::CONTROL),
            alt: modifiers.contains(Km::ALT),
            shift: modifiers.contains(Km::SHIFT),
        }
    }
}

/// Serialize a chord into canonical form. `Meta` maps to the cross-platform
/// `CommandOrControl` token; the space key token becomes `Space` upstream.
pub fn canonicalize(modifiers: Modifiers, key: Option<&str>) -> String {
    let mut tokens: Vec<&str> = Vec::with_capacity(5);
    if modifiers.meta {
        tokens.push("CommandOrControl");
    }
    if modifiers.control {
        tokens.push("Ctrl");
    }
    if modifiers.alt {
        tokens.push("Alt");
    }
    if modifiers.shift {
        tokens.push("Shift");
    }
    if let Some(key) = key {
        tokens.push(key);
    }
    tokens.join("+")
}

/// Display symbol for one shortcut token (settings-field keycaps).
pub fn keycap(token: &str) -> &str {
    match token {
        "CommandOrControl" | "Command" | "Cmd" => "⌘",
        "Control" | "Ctrl" => "⌃",
        "Shift" => "⇧",
        "Alt" | "Option" => "⌥",
        "Enter" | "Return" => "⏎",
        "Escape" | "Esc" => "⎋",
        "Tab" => "⇥",
        "Delete" | "Backspace" => "⌫",
        "Up" => "↑",
        "Down" => "↓",
        "Left" => "←",
        "Right" => "→",
        other => other,
    }
}

/// Split a canonical shortcut into display keycaps.
pub fn display_keycaps(shortcut: &str) -> Vec<String> {
    if shortcut.is_empty() {
        return Vec::new();
    }
    shortcut
        .split('+')
        .map(|part| keycap(part.trim()).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifier_order_is_fixed() {
        let mods = Modifiers {
            meta: true,
            control: true,
            alt: true,
            shift: true,
        };
        assert_eq!(
            canonicalize(mods, Some("K")),
            "CommandOrControl+Ctrl+Alt+Shift+K"
        );
    }

    #[test]
    fn modifier_only_chords_serialize() {
        let mods = Modifiers {
            control: true,
            ..Modifiers::default()
        };
        assert_eq!(canonicalize(mods, None), "Ctrl");
    }

    #[test]
    fn crossterm_super_and_meta_both_map_to_meta() {
        use crossterm::event::KeyModifiers as Km;
        assert!(Modifiers::from(Km::SUPER).meta);
        assert!(Modifiers::from(Km::META).meta);
        let mods = Modifiers::from(Km::CONTROL | Km::SHIFT);
        assert!(mods.control && mods.shift && !mods.meta && !mods.alt);
    }

    #[test]
    fn keycaps_map_known_tokens_and_pass_through_the_rest() {
        assert_eq!(
            display_keycaps("CommandOrControl+Ctrl+Space"),
            vec!["⌘", "⌃", "Space"]
        );
        assert_eq!(display_keycaps("Ctrl+Shift+F5"), vec!["⌃", "⇧", "F5"]);
        assert!(display_keycaps("").is_empty());
    }
}
