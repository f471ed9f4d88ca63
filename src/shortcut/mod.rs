//! Live shortcut capture.
//!
//! A two-state recorder: idle until explicitly activated, then it swallows
//! raw key events, accumulating held modifiers and the first non-modifier
//! key. Recording ends on a key-up once no modifiers remain held and at
//! least one key was captured, emitting the canonical string; losing focus
//! cancels without emitting.

mod canonical;

pub use canonical::{canonicalize, display_keycaps, keycap, Modifiers, MODIFIER_TOKENS};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

/// A non-modifier key usable in a chord.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChordKey {
    Char(char),
    Function(u8),
    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    /// The laptop `fn` key, reported by platform key-code on hosts that
    /// surface it; terminal input has no equivalent.
    Fn,
}

impl ChordKey {
    /// Canonical token for this key.
    pub fn token(&self) -> String {
        match self {
            ChordKey::Char(c) => c.to_uppercase().to_string(),
            ChordKey::Function(n) => format!("F{n}"),
            ChordKey::Space => "Space".to_string(),
            ChordKey::Enter => "Enter".to_string(),
            ChordKey::Escape => "Escape".to_string(),
            ChordKey::Tab => "Tab".to_string(),
            ChordKey::Backspace => "Backspace".to_string(),
            ChordKey::Delete => "Delete".to_string(),
            ChordKey::Up => "Up".to_string(),
            ChordKey::Down => "Down".to_string(),
            ChordKey::Left => "Left".to_string(),
            ChordKey::Right => "Right".to_string(),
            ChordKey::Fn => "fn".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChordEventKind {
    Press,
    Release,
}

/// One raw key transition as the recorder sees it. `modifiers` reflects what
/// is held at the time of the event.
#[derive(Debug, Clone, PartialEq)]
pub struct ChordEvent {
    pub key: Option<ChordKey>,
    pub modifiers: Modifiers,
    pub kind: ChordEventKind,
}

impl ChordEvent {
    pub fn press(key: Option<ChordKey>, modifiers: Modifiers) -> Self {
        Self {
            key,
            modifiers,
            kind: ChordEventKind::Press,
        }
    }

    pub fn release(modifiers: Modifiers) -> Self {
        Self {
            key: None,
            modifiers,
            kind: ChordEventKind::Release,
        }
    }
}

impl From<&KeyEvent> for ChordEvent {
    fn from(event: &KeyEvent) -> Self {
        let key = match event.code {
            KeyCode::Char(' ') => Some(ChordKey::Space),
            KeyCode::Char(c) => Some(ChordKey::Char(c)),
            KeyCode::F(n) => Some(ChordKey::Function(n)),
            KeyCode::Enter => Some(ChordKey::Enter),
            KeyCode::Esc => Some(ChordKey::Escape),
            KeyCode::Tab => Some(ChordKey::Tab),
            KeyCode::Backspace => Some(ChordKey::Backspace),
            KeyCode::Delete => Some(ChordKey::Delete),
            KeyCode::Up => Some(ChordKey::Up),
            KeyCode::Down => Some(ChordKey::Down),
            KeyCode::Left => Some(ChordKey::Left),
            KeyCode::Right => Some(ChordKey::Right),
            // Bare modifier presses carry no chord key; the held set comes
            // from `modifiers`.
            _ => None,
        };
        let kind = match event.kind {
            KeyEventKind::Release => ChordEventKind::Release,
            KeyEventKind::Press | KeyEventKind::Repeat => ChordEventKind::Press,
        };
        Self {
            key,
            modifiers: Modifiers::from(event.modifiers),
            kind,
        }
    }
}

/// Captures one chord and serializes it on completion.
#[derive(Debug, Default)]
pub struct ShortcutRecorder {
    recording: bool,
    modifiers: Modifiers,
    key: Option<ChordKey>,
}

impl ShortcutRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter recording (click/focus on the field). Clears any previous
    /// working set.
    pub fn begin(&mut self) {
        self.recording = true;
        self.modifiers = Modifiers::default();
        self.key = None;
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Cancel without emitting (focus loss).
    pub fn cancel(&mut self) {
        self.recording = false;
        self.modifiers = Modifiers::default();
        self.key = None;
    }

    /// Feed one key event. Returns the canonical shortcut when the chord
    /// completes; the recorder returns to idle at that point.
    pub fn handle(&mut self, event: &ChordEvent) -> Option<String> {
        if !self.recording {
            return None;
        }
        match event.kind {
            ChordEventKind::Press => {
                self.modifiers.merge(event.modifiers);
                if self.key.is_none() {
                    // First non-modifier key wins.
                    self.key = event.key.clone();
                }
                None
            }
            ChordEventKind::Release => {
                let captured = self.modifiers.any() || self.key.is_some();
                if event.modifiers.any() || !captured {
                    return None;
                }
                let token = self.key.as_ref().map(ChordKey::token);
                let serialized = canonicalize(self.modifiers, token.as_deref());
                self.cancel();
                Some(serialized)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mods(meta: bool, control: bool, alt: bool, shift: bool) -> Modifiers {
        Modifiers {
            meta,
            control,
            alt,
            shift,
        }
    }

    fn press_chord(recorder: &mut ShortcutRecorder, steps: &[ChordEvent]) -> Option<String> {
        let mut emitted = None;
        for step in steps {
            if let Some(result) = recorder.handle(step) {
                emitted = Some(result);
            }
        }
        emitted
    }

    #[test]
    fn serialization_ignores_press_order() {
        // Control, then Shift, then E.
        let mut recorder = ShortcutRecorder::new();
        recorder.begin();
        let first = press_chord(
            &mut recorder,
            &[
                ChordEvent::press(None, mods(false, true, false, false)),
                ChordEvent::press(None, mods(false, true, false, true)),
                ChordEvent::press(Some(ChordKey::Char('e')), mods(false, true, false, true)),
                ChordEvent::release(mods(false, true, false, false)),
                ChordEvent::release(mods(false, false, false, false)),
            ],
        );

        // Shift, then Control, then E.
        recorder.begin();
        let second = press_chord(
            &mut recorder,
            &[
                ChordEvent::press(None, mods(false, false, false, true)),
                ChordEvent::press(None, mods(false, true, false, true)),
                ChordEvent::press(Some(ChordKey::Char('e')), mods(false, true, false, true)),
                ChordEvent::release(mods(false, false, false, true)),
                ChordEvent::release(mods(false, false, false, false)),
            ],
        );

        assert_eq!(first.as_deref(), Some("Ctrl+Shift+E"));
        assert_eq!(first, second);
    }

    #[test]
    fn meta_maps_to_command_or_control_and_space_to_space() {
        let mut recorder = ShortcutRecorder::new();
        recorder.begin();
        let emitted = press_chord(
            &mut recorder,
            &[
                ChordEvent::press(None, mods(true, false, false, false)),
                ChordEvent::press(None, mods(true, true, false, false)),
                ChordEvent::press(Some(ChordKey::Space), mods(true, true, false, false)),
                ChordEvent::release(mods(false, false, false, false)),
            ],
        );
        assert_eq!(emitted.as_deref(), Some("CommandOrControl+Ctrl+Space"));
        assert!(!recorder.is_recording());
    }

    #[test]
    fn first_non_modifier_key_wins() {
        let mut recorder = ShortcutRecorder::new();
        recorder.begin();
        let emitted = press_chord(
            &mut recorder,
            &[
                ChordEvent::press(Some(ChordKey::Char('e')), mods(false, true, false, false)),
                ChordEvent::press(Some(ChordKey::Char('r')), mods(false, true, false, false)),
                ChordEvent::release(mods(false, false, false, false)),
            ],
        );
        assert_eq!(emitted.as_deref(), Some("Ctrl+E"));
    }

    #[test]
    fn modifier_only_chord_emits() {
        let mut recorder = ShortcutRecorder::new();
        recorder.begin();
        let emitted = press_chord(
            &mut recorder,
            &[
                ChordEvent::press(None, mods(false, true, false, false)),
                ChordEvent::release(mods(false, false, false, false)),
            ],
        );
        assert_eq!(emitted.as_deref(), Some("Ctrl"));
    }

    #[test]
    fn release_with_modifiers_still_held_does_not_terminate() {
        let mut recorder = ShortcutRecorder::new();
        recorder.begin();
        assert_eq!(
            recorder.handle(&ChordEvent::press(
                Some(ChordKey::Char('k')),
                mods(false, true, false, true),
            )),
            None
        );
        // Shift released, Control still down: keep recording.
        assert_eq!(
            recorder.handle(&ChordEvent::release(mods(false, true, false, false))),
            None
        );
        assert!(recorder.is_recording());
        assert_eq!(
            recorder
                .handle(&ChordEvent::release(mods(false, false, false, false)))
                .as_deref(),
            Some("Ctrl+Shift+K")
        );
    }

    #[test]
    fn focus_loss_cancels_without_emitting() {
        let mut recorder = ShortcutRecorder::new();
        recorder.begin();
        recorder.handle(&ChordEvent::press(None, mods(false, true, false, false)));
        recorder.cancel();
        assert!(!recorder.is_recording());

        // The release that would have completed the chord is ignored now.
        assert_eq!(
            recorder.handle(&ChordEvent::release(mods(false, false, false, false))),
            None
        );
    }

    #[test]
    fn release_with_nothing_captured_does_not_emit() {
        let mut recorder = ShortcutRecorder::new();
        recorder.begin();
        assert_eq!(
            recorder.handle(&ChordEvent::release(mods(false, false, false, false))),
            None
        );
        assert!(recorder.is_recording());
    }

    #[test]
    fn fn_key_serializes_lowercase() {
        let mut recorder = ShortcutRecorder::new();
        recorder.begin();
        let emitted = press_chord(
            &mut recorder,
            &[
                ChordEvent::press(Some(ChordKey::Fn), mods(false, false, false, false)),
                ChordEvent::release(mods(false, false, false, false)),
            ],
        );
        assert_eq!(emitted.as_deref(), Some("fn"));
    }

    #[test]
    fn crossterm_events_convert_at_the_boundary() {
        use crossterm::event::{KeyEvent, KeyModifiers};

        let event = KeyEvent::new(KeyCode::Char(' '), KeyModifiers::CONTROL | KeyModifiers::SUPER);
        let chord = ChordEvent::from(&event);
        assert_eq!(chord.key, Some(ChordKey::Space));
        assert!(chord.modifiers.meta && chord.modifiers.control);
        assert_eq!(chord.kind, ChordEventKind::Press);

        let event = KeyEvent::new(KeyCode::F(5), KeyModifiers::NONE);
        assert_eq!(ChordEvent::from(&event).key, Some(ChordKey::Function(5)));
    }
}
