//! Key events consumed by the keyboard navigator.

use bitflags::bitflags;

/// Keys the navigator reacts to.
///
/// Left/Right carry no per-key action but still participate in the
/// reposition check that keeps the focused item in view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Move focus to the previous item.
    Up,
    /// Move focus to the next item.
    Down,
    /// No action; triggers the reposition check only.
    Left,
    /// No action; triggers the reposition check only.
    Right,
    /// Jump to the first item.
    Home,
    /// Jump to the last item.
    End,
    /// Move one viewport toward the start.
    PageUp,
    /// Move one viewport toward the end.
    PageDown,
    /// Activate (click) the focused item.
    Space,
    /// Leave the component along the page tab order.
    Tab,
    /// Drop component focus.
    Escape,
}

impl Key {
    /// Whether this key can move the window (and so runs the pre-dispatch
    /// reposition check on the focused item).
    #[must_use]
    pub const fn is_directional(&self) -> bool {
        matches!(
            self,
            Self::Up
                | Self::Down
                | Self::Left
                | Self::Right
                | Self::Home
                | Self::End
                | Self::PageUp
                | Self::PageDown
        )
    }
}

bitflags! {
    /// Modifier keys held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// A keyboard event delivered to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key that was pressed.
    pub key: Key,
    /// Modifier keys held during the event.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a key event with no modifiers.
    #[must_use]
    pub const fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    /// Attach modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Whether Shift is held.
    #[must_use]
    pub const fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }

    /// Convert a crossterm key event into an engine [`KeyEvent`].
    ///
    /// Returns `None` for keys the navigator does not handle.
    #[cfg(feature = "crossterm")]
    #[must_use]
    pub fn from_crossterm(event: crossterm::event::KeyEvent) -> Option<Self> {
        use crossterm::event::{KeyCode as CtKey, KeyModifiers as CtMods};

        let key = match event.code {
            CtKey::Up => Key::Up,
            CtKey::Down => Key::Down,
            CtKey::Left => Key::Left,
            CtKey::Right => Key::Right,
            CtKey::Home => Key::Home,
            CtKey::End => Key::End,
            CtKey::PageUp => Key::PageUp,
            CtKey::PageDown => Key::PageDown,
            CtKey::Char(' ') => Key::Space,
            CtKey::Tab => Key::Tab,
            CtKey::BackTab => return Some(Self::new(Key::Tab).with_modifiers(Modifiers::SHIFT)),
            CtKey::Esc => Key::Escape,
            _ => return None,
        };

        let mut modifiers = Modifiers::NONE;
        if event.modifiers.contains(CtMods::SHIFT) {
            modifiers |= Modifiers::SHIFT;
        }
        if event.modifiers.contains(CtMods::ALT) {
            modifiers |= Modifiers::ALT;
        }
        if event.modifiers.contains(CtMods::CONTROL) {
            modifiers |= Modifiers::CTRL;
        }

        Some(Self::new(key).with_modifiers(modifiers))
    }
}
