use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::input::{Command, Direction};

/// What a key press means to the terminal host.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum HostInput {
    Command(Command),
    Quit,
}

/// Translates one key press; unmapped keys yield `None`.
#[must_use]
pub fn map_key(key: KeyEvent) -> Option<HostInput> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(HostInput::Quit);
    }

    let steer = |direction| Some(HostInput::Command(Command::SetDirection(direction)));

    match key.code {
        KeyCode::Up | KeyCode::Char('w' | 'W') => steer(Direction::Up),
        KeyCode::Down | KeyCode::Char('s' | 'S') => steer(Direction::Down),
        KeyCode::Left | KeyCode::Char('a' | 'A') => steer(Direction::Left),
        KeyCode::Right | KeyCode::Char('d' | 'D') => steer(Direction::Right),
        KeyCode::Char(' ') => Some(HostInput::Command(Command::TogglePause)),
        KeyCode::Char('r' | 'R') => Some(HostInput::Command(Command::Restart)),
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Some(HostInput::Quit),
        _ => None,
    }
}

/// Waits up to `timeout` for a key press and translates it.
pub fn poll_input(timeout: Duration) -> io::Result<Option<HostInput>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }

    match event::read()? {
        Event::Key(key) => Ok(map_key(key)),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

    use crate::input::{Command, Direction};

    use super::{HostInput, map_key};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn arrows_and_wasd_map_to_directions() {
        let cases = [
            (KeyCode::Up, Direction::Up),
            (KeyCode::Char('w'), Direction::Up),
            (KeyCode::Down, Direction::Down),
            (KeyCode::Char('S'), Direction::Down),
            (KeyCode::Left, Direction::Left),
            (KeyCode::Char('a'), Direction::Left),
            (KeyCode::Right, Direction::Right),
            (KeyCode::Char('d'), Direction::Right),
        ];

        for (code, expected) in cases {
            assert_eq!(
                map_key(press(code)),
                Some(HostInput::Command(Command::SetDirection(expected)))
            );
        }
    }

    #[test]
    fn space_pauses_and_r_restarts() {
        assert_eq!(
            map_key(press(KeyCode::Char(' '))),
            Some(HostInput::Command(Command::TogglePause))
        );
        assert_eq!(
            map_key(press(KeyCode::Char('r'))),
            Some(HostInput::Command(Command::Restart))
        );
    }

    #[test]
    fn quit_keys() {
        assert_eq!(map_key(press(KeyCode::Char('q'))), Some(HostInput::Quit));
        assert_eq!(map_key(press(KeyCode::Esc)), Some(HostInput::Quit));
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(HostInput::Quit)
        );
    }

    #[test]
    fn releases_and_unmapped_keys_are_ignored() {
        let release = KeyEvent {
            code: KeyCode::Up,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };

        assert_eq!(map_key(release), None);
        assert_eq!(map_key(press(KeyCode::Char('x'))), None);
        assert_eq!(map_key(press(KeyCode::Tab)), None);
    }
}
