use iocraft::prelude::{KeyCode, KeyEventKind, KeyModifiers};

/// Convert a terminal key event to the canonical key string the dashboard
/// matches on.
///
/// Examples: `"j"`, `"G"`, `"ctrl+c"`, `"alt+d"`, `"enter"`, `"space"`,
/// `"pagedown"`, `"backtab"`, `"1"`.
pub fn key_event_to_string(
    code: KeyCode,
    modifiers: KeyModifiers,
    kind: KeyEventKind,
) -> Option<String> {
    if kind == KeyEventKind::Release {
        return None;
    }

    let base = match code {
        KeyCode::Char(' ') => Some("space".to_owned()),
        KeyCode::Char(c) => {
            // For ctrl+<char>, use lowercase in the key string.
            if modifiers.contains(KeyModifiers::CONTROL) {
                Some(c.to_ascii_lowercase().to_string())
            } else {
                Some(c.to_string())
            }
        }
        KeyCode::Enter => Some("enter".to_owned()),
        KeyCode::Esc => Some("esc".to_owned()),
        KeyCode::Tab => Some("tab".to_owned()),
        KeyCode::BackTab => Some("backtab".to_owned()),
        KeyCode::Up => Some("up".to_owned()),
        KeyCode::Down => Some("down".to_owned()),
        KeyCode::Left => Some("left".to_owned()),
        KeyCode::Right => Some("right".to_owned()),
        KeyCode::PageUp => Some("pageup".to_owned()),
        KeyCode::PageDown => Some("pagedown".to_owned()),
        KeyCode::Home => Some("home".to_owned()),
        KeyCode::End => Some("end".to_owned()),
        _ => None,
    }?;

    // No shift prefix: the char itself encodes the case ('G' vs 'g').
    let mut prefix = String::new();
    if modifiers.contains(KeyModifiers::CONTROL) {
        prefix.push_str("ctrl+");
    }
    if modifiers.contains(KeyModifiers::ALT) {
        prefix.push_str("alt+");
    }

    Some(format!("{prefix}{base}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> Option<String> {
        key_event_to_string(code, modifiers, KeyEventKind::Press)
    }

    #[test]
    fn simple_char() {
        assert_eq!(press(KeyCode::Char('j'), KeyModifiers::empty()), Some("j".to_owned()));
    }

    #[test]
    fn uppercase_has_no_shift_prefix() {
        assert_eq!(press(KeyCode::Char('G'), KeyModifiers::SHIFT), Some("G".to_owned()));
    }

    #[test]
    fn ctrl_and_alt() {
        assert_eq!(press(KeyCode::Char('C'), KeyModifiers::CONTROL), Some("ctrl+c".to_owned()));
        assert_eq!(press(KeyCode::Char('d'), KeyModifiers::ALT), Some("alt+d".to_owned()));
    }

    #[test]
    fn special_keys() {
        let none = KeyModifiers::empty();
        assert_eq!(press(KeyCode::Enter, none), Some("enter".to_owned()));
        assert_eq!(press(KeyCode::Esc, none), Some("esc".to_owned()));
        assert_eq!(press(KeyCode::Char(' '), none), Some("space".to_owned()));
        assert_eq!(press(KeyCode::PageDown, none), Some("pagedown".to_owned()));
        assert_eq!(press(KeyCode::BackTab, KeyModifiers::SHIFT), Some("backtab".to_owned()));
        assert_eq!(press(KeyCode::F(1), none), None);
    }

    #[test]
    fn release_ignored() {
        let s = key_event_to_string(
            KeyCode::Char('j'),
            KeyModifiers::empty(),
            KeyEventKind::Release,
        );
        assert_eq!(s, None);
    }
}
