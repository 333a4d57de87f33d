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

//! Line-oriented front end for pipes, scripts and dumb terminals

use std::{
    fmt::Write as _,
    io::{BufRead, Write},
};

use tracewalk_engine::{Command, CommandSource, DisplayPayload, Presenter, SessionError};

use crate::view::call_path_line;

/// Format a payload as a block of text
pub fn format_plain(payload: &DisplayPayload) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== Opcode {} ==", payload.position);
    let _ = writeln!(out, "{}", payload.summary);
    let _ = writeln!(out, "{}", call_path_line(&payload.call_path));

    let _ = writeln!(out, "Opcodes:");
    for line in &payload.opcodes {
        let marker = if line.selected { '>' } else { ' ' };
        let _ = writeln!(out, "  {marker} {}", line.op);
    }

    let sections = [
        ("Stack", payload.stack.lines()),
        ("Memory", payload.memory.lines()),
        ("Storage", payload.storage.lines()),
    ];
    for (title, lines) in sections {
        let _ = writeln!(out, "{title}:");
        for line in lines {
            let _ = writeln!(out, "    {line}");
        }
    }
    out
}

/// Writes every payload as text
#[derive(Debug)]
pub struct PlainPresenter<W> {
    out: W,
}

impl<W: Write> PlainPresenter<W> {
    /// Present into `out`
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Give back the writer
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for PlainPresenter<W> {
    fn present(&mut self, payload: &DisplayPayload) -> Result<(), SessionError> {
        writeln!(self.out, "{}", format_plain(payload))?;
        self.out.flush()?;
        Ok(())
    }

    fn farewell(&mut self, message: &str) -> Result<(), SessionError> {
        writeln!(self.out, "{message}")?;
        self.out.flush()?;
        Ok(())
    }
}

/// Reads one command per line, ending at EOF
#[derive(Debug)]
pub struct LineCommandSource<R> {
    input: R,
}

impl<R: BufRead> LineCommandSource<R> {
    /// Read commands from `input`
    pub fn new(input: R) -> Self {
        Self { input }
    }
}

impl<R: BufRead> CommandSource for LineCommandSource<R> {
    fn next_command(&mut self) -> Result<Option<Command>, SessionError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.parse().unwrap_or(Command::Unrecognized)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracewalk_common::StepRecord;
    use tracewalk_engine::{render, DEFAULT_WINDOW_RADIUS};

    #[test]
    fn test_format_plain() {
        let mut step = StepRecord::new("SSTORE", 1);
        step.stack = Some(vec!["0x1".into(), "0x2".into()]);
        let steps = vec![StepRecord::new("PUSH1", 1), step];

        let text = format_plain(&render(&steps, 1, DEFAULT_WINDOW_RADIUS));
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "== Opcode 2 of 2 ==");
        assert!(lines.contains(&"    PUSH1"));
        assert!(lines.contains(&"  > SSTORE"));
        assert!(lines.contains(&"    0x2"));
        assert!(lines.contains(&"    No memory data"));
        assert!(lines.contains(&"    No storage changes"));
    }

    #[test]
    fn test_line_source() {
        let mut source = LineCommandSource::new("next\n\nbogus\nq\n".as_bytes());

        assert_eq!(source.next_command().unwrap(), Some(Command::Next));
        assert_eq!(source.next_command().unwrap(), Some(Command::Unrecognized));
        assert_eq!(source.next_command().unwrap(), Some(Command::Unrecognized));
        assert_eq!(source.next_command().unwrap(), Some(Command::Quit));
        assert_eq!(source.next_command().unwrap(), None);
    }

    #[test]
    fn test_presenter_writes_farewell() {
        let mut presenter = PlainPresenter::new(Vec::new());
        presenter.farewell("Exiting...").unwrap();

        assert_eq!(String::from_utf8(presenter.into_inner()).unwrap(), "Exiting...\n");
    }
}
