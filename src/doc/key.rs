//! Keyboard input as seen by documents.

use bitflags::bitflags;

bitflags! {
    /// Keyboard modifier flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const SHIFT = 0b0000_0001;
        const ALT = 0b0000_0010;
        const CTRL = 0b0000_0100;
    }
}

/// Keys a document reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Backspace,
    Enter,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    Tab,
    /// Shift+Tab.
    BackTab,
    Delete,
    Esc,
    /// A character key (includes space).
    Char(char),
}

impl KeyCode {
    /// Check if this is a navigation key (arrows, home, end, page up/down).
    #[must_use]
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Self::Left
                | Self::Right
                | Self::Up
                | Self::Down
                | Self::Home
                | Self::End
                | Self::PageUp
                | Self::PageDown
        )
    }

    #[must_use]
    pub fn char(&self) -> Option<char> {
        match self {
            Self::Char(c) => Some(*c),
            _ => None,
        }
    }
}

/// A keyboard event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyEvent {
    #[must_use]
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// A key event with no modifiers.
    #[must_use]
    pub fn key(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::empty())
    }

    /// A character key event with no modifiers.
    #[must_use]
    pub fn char(c: char) -> Self {
        Self::key(KeyCode::Char(c))
    }

    #[must_use]
    pub fn with_shift(mut self) -> Self {
        self.modifiers |= KeyModifiers::SHIFT;
        self
    }

    #[must_use]
    pub fn with_ctrl(mut self) -> Self {
        self.modifiers |= KeyModifiers::CTRL;
        self
    }

    #[must_use]
    pub fn shift(&self) -> bool {
        self.modifiers.contains(KeyModifiers::SHIFT)
    }

    #[must_use]
    pub fn ctrl(&self) -> bool {
        self.modifiers.contains(KeyModifiers::CTRL)
    }

    #[must_use]
    pub fn alt(&self) -> bool {
        self.modifiers.contains(KeyModifiers::ALT)
    }
}

/// Keyboard-driven document actions that need no payload beyond the key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DocAction {
    MoveDown,
    MoveUp,
    MoveLeft,
    SkipLeft,
    MoveRight,
    SkipRight,
    SkipDown,
    SkipUp,
    MovePageUp,
    MovePageDown,
    MoveHome,
    MoveEnd,
    MoveHomeFile,
    MoveEndFile,
    DeleteForward,
    Indent,
    Unindent,
    DeleteWord,
}

impl DocAction {
    /// Default key binding. Keys without an action are typed characters.
    #[must_use]
    pub fn from_key(key: KeyEvent) -> Option<Self> {
        let ctrl = key.ctrl();
        let action = match key.code {
            KeyCode::Up if ctrl => Self::SkipUp,
            KeyCode::Up => Self::MoveUp,
            KeyCode::Down if ctrl => Self::SkipDown,
            KeyCode::Down => Self::MoveDown,
            KeyCode::Left if ctrl => Self::SkipLeft,
            KeyCode::Left => Self::MoveLeft,
            KeyCode::Right if ctrl => Self::SkipRight,
            KeyCode::Right => Self::MoveRight,
            KeyCode::PageUp => Self::MovePageUp,
            KeyCode::PageDown => Self::MovePageDown,
            KeyCode::Home if ctrl => Self::MoveHomeFile,
            KeyCode::Home => Self::MoveHome,
            KeyCode::End if ctrl => Self::MoveEndFile,
            KeyCode::End => Self::MoveEnd,
            KeyCode::Delete => Self::DeleteForward,
            KeyCode::Backspace if ctrl => Self::DeleteWord,
            _ => return None,
        };
        Some(action)
    }

    /// Whether the action changes text.
    #[must_use]
    pub fn is_edit(self) -> bool {
        matches!(
            self,
            Self::DeleteForward | Self::Indent | Self::Unindent | Self::DeleteWord
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_modifiers() {
        let key = KeyEvent::key(KeyCode::Left).with_shift().with_ctrl();
        assert!(key.shift());
        assert!(key.ctrl());
        assert!(!key.alt());
        assert!(key.code.is_navigation());
        assert_eq!(KeyEvent::char('x').code.char(), Some('x'));
    }

    #[test]
    fn test_action_bindings() {
        assert_eq!(
            DocAction::from_key(KeyEvent::key(KeyCode::Up)),
            Some(DocAction::MoveUp)
        );
        assert_eq!(
            DocAction::from_key(KeyEvent::key(KeyCode::Right).with_ctrl()),
            Some(DocAction::SkipRight)
        );
        assert_eq!(
            DocAction::from_key(KeyEvent::key(KeyCode::End).with_ctrl().with_shift()),
            Some(DocAction::MoveEndFile)
        );
        assert_eq!(
            DocAction::from_key(KeyEvent::key(KeyCode::Backspace).with_ctrl()),
            Some(DocAction::DeleteWord)
        );
        assert_eq!(DocAction::from_key(KeyEvent::key(KeyCode::Backspace)), None);
        assert_eq!(DocAction::from_key(KeyEvent::char('a')), None);
        assert!(DocAction::Indent.is_edit());
        assert!(!DocAction::MoveUp.is_edit());
    }
}
