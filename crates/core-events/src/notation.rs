//! Angle-bracket key notation (`j`, `<Tab>`, `<C-x>`, `<Space>`).
//!
//! Used by the config keymap table and the stdin line protocol. Plain
//! characters stand for themselves; `<lt>` is a literal `<`.

use crate::{KeyCode, KeyEvent, KeyModifiers};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyParseError {
    #[error("unterminated `<` at byte {0}")]
    Unterminated(usize),
    #[error("unknown key name `{0}`")]
    UnknownKey(String),
    #[error("empty key sequence")]
    Empty,
}

/// Parse a whole key sequence such as `"gg"` or `"<C-x>j"`.
pub fn parse_key_sequence(input: &str) -> Result<Vec<KeyEvent>, KeyParseError> {
    if input.is_empty() {
        return Err(KeyParseError::Empty);
    }
    let mut out = Vec::new();
    let mut rest = input;
    while let Some(c) = rest.chars().next() {
        if c == '<' {
            let offset = input.len() - rest.len();
            let close = rest.find('>').ok_or(KeyParseError::Unterminated(offset))?;
            out.push(parse_bracketed(&rest[1..close])?);
            rest = &rest[close + 1..];
        } else {
            out.push(KeyEvent::char(c));
            rest = &rest[c.len_utf8()..];
        }
    }
    Ok(out)
}

fn parse_bracketed(inner: &str) -> Result<KeyEvent, KeyParseError> {
    let mut mods = KeyModifiers::empty();
    let mut name = inner;
    while let Some((prefix, tail)) = name.split_once('-') {
        if tail.is_empty() {
            break;
        }
        let flag = match prefix {
            "C" | "c" => KeyModifiers::CTRL,
            "A" | "a" => KeyModifiers::ALT,
            "M" | "m" => KeyModifiers::META,
            "S" | "s" => KeyModifiers::SHIFT,
            _ => break,
        };
        mods |= flag;
        name = tail;
    }
    let code = match name.to_ascii_lowercase().as_str() {
        "tab" => KeyCode::Tab,
        "space" => KeyCode::Char(' '),
        "cr" | "enter" | "return" => KeyCode::Enter,
        "esc" => KeyCode::Esc,
        "bs" | "backspace" => KeyCode::Backspace,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "lt" => KeyCode::Char('<'),
        _ => {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return Err(KeyParseError::UnknownKey(name.to_string())),
            }
        }
    };
    Ok(KeyEvent::new(code, mods))
}

pub(crate) fn format_key(key: &KeyEvent) -> String {
    let name = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char('<') => "lt".to_string(),
        KeyCode::Char(c) if key.mods.is_empty() => return c.to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "CR".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Backspace => "BS".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
    };
    let mut prefix = String::new();
    for (flag, tag) in [
        (KeyModifiers::CTRL, "C-"),
        (KeyModifiers::ALT, "A-"),
        (KeyModifiers::META, "M-"),
        (KeyModifiers::SHIFT, "S-"),
    ] {
        if key.mods.contains(flag) {
            prefix.push_str(tag);
        }
    }
    format!("<{prefix}{name}>")
}

pub fn format_key_sequence(keys: &[KeyEvent]) -> String {
    keys.iter().map(format_key).collect()
}
