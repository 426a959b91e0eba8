use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Backspace,
    Tab,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

impl Key {
    pub fn as_char(&self) -> Option<char> {
        match self {
            Self::Char(c) => Some(*c),
            _ => None,
        }
    }

    /// Case-insensitive comparison against a character key.
    pub fn is(&self, c: char) -> bool {
        self.as_char()
            .is_some_and(|k| k.to_ascii_lowercase() == c.to_ascii_lowercase())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(' ') => write!(f, "space"),
            Self::Char(c) => write!(f, "{}", c),
            Self::Enter => write!(f, "enter"),
            Self::Escape => write!(f, "escape"),
            Self::Backspace => write!(f, "backspace"),
            Self::Tab => write!(f, "tab"),
            Self::ArrowUp => write!(f, "up"),
            Self::ArrowDown => write!(f, "down"),
            Self::ArrowLeft => write!(f, "left"),
            Self::ArrowRight => write!(f, "right"),
        }
    }
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("unknown key '{0}'")]
pub struct ParseKeyError(pub String);

impl FromStr for Key {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Ok(Self::Char(c));
        }

        match s.to_ascii_lowercase().as_str() {
            "space" => Ok(Self::Char(' ')),
            "enter" | "return" => Ok(Self::Enter),
            "escape" | "esc" => Ok(Self::Escape),
            "backspace" => Ok(Self::Backspace),
            "tab" => Ok(Self::Tab),
            "up" => Ok(Self::ArrowUp),
            "down" => Ok(Self::ArrowDown),
            "left" => Ok(Self::ArrowLeft),
            "right" => Ok(Self::ArrowRight),
            _ => Err(ParseKeyError(s.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    PointerMoved { x: f32, y: f32 },
    PointerPressed { x: f32, y: f32 },
    PointerReleased { x: f32, y: f32 },
    KeyPressed(Key),
    KeyReleased(Key),
    Resized { w: u32, h: u32 },
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum InputKind {
    PointerMoved,
    PointerPressed,
    PointerReleased,
    KeyPressed,
    KeyReleased,
    Resized,
}

impl InputEvent {
    pub fn kind(&self) -> InputKind {
        match self {
            Self::PointerMoved { .. } => InputKind::PointerMoved,
            Self::PointerPressed { .. } => InputKind::PointerPressed,
            Self::PointerReleased { .. } => InputKind::PointerReleased,
            Self::KeyPressed(_) => InputKind::KeyPressed,
            Self::KeyReleased(_) => InputKind::KeyReleased,
            Self::Resized { .. } => InputKind::Resized,
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PointerMoved => "pointer_moved",
            Self::PointerPressed => "pointer_pressed",
            Self::PointerReleased => "pointer_released",
            Self::KeyPressed => "key_pressed",
            Self::KeyReleased => "key_released",
            Self::Resized => "resized",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_parse_from_names_and_chars() {
        assert_eq!("r".parse::<Key>(), Ok(Key::Char('r')));
        assert_eq!("space".parse::<Key>(), Ok(Key::Char(' ')));
        assert_eq!("Esc".parse::<Key>(), Ok(Key::Escape));
        assert_eq!("left".parse::<Key>(), Ok(Key::ArrowLeft));
        assert_eq!(
            "banana".parse::<Key>(),
            Err(ParseKeyError("banana".to_string()))
        );
    }

    #[test]
    fn key_is_ignores_case() {
        assert!(Key::Char('R').is('r'));
        assert!(!Key::Enter.is('r'));
    }

    #[test]
    fn events_report_their_kind() {
        assert_eq!(
            InputEvent::PointerPressed { x: 0.0, y: 0.0 }.kind(),
            InputKind::PointerPressed
        );
        assert_eq!(
            InputEvent::KeyReleased(Key::Tab).kind(),
            InputKind::KeyReleased
        );
        assert_eq!(InputKind::Resized.to_string(), "resized");
    }
}
