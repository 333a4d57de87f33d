// EDB - Ethereum Debugger
// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Keyboard input

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracewalk_engine::{Command, CommandSource, SessionError};
use tracing::debug;

/// Map a key press to a session command
///
/// Releases and repeats are not presses and yield `None`.
pub fn command_for_key(key: KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let command = match key.code {
        KeyCode::Up | KeyCode::Char('k') => Command::Previous,
        KeyCode::Down | KeyCode::Char('j') => Command::Next,
        // Raw mode swallows SIGINT
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Command::Quit,
        KeyCode::Char('q') | KeyCode::Esc => Command::Quit,
        _ => Command::Unrecognized,
    };
    Some(command)
}

/// Blocking command source reading terminal events
#[derive(Debug, Default)]
pub struct KeyCommandSource;

impl CommandSource for KeyCommandSource {
    fn next_command(&mut self) -> Result<Option<Command>, SessionError> {
        loop {
            match event::read()? {
                Event::Key(key) => {
                    if let Some(command) = command_for_key(key) {
                        debug!("Key {:?} -> {:?}", key.code, command);
                        return Ok(Some(command));
                    }
                }
                Event::Resize(width, height) => {
                    debug!("Terminal resized: {}x{}", width, height);
                    return Ok(Some(Command::Redraw));
                }
                _ => {}
            }
        }
    }
}
