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

// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
// SPDX-License-Identifier: AGPL-3.0
//! Front ends for tracewalk sessions
//!
//! The full-screen terminal view is a [`Presenter`] drawing with ratatui, fed
//! by [`KeyCommandSource`]. The plain variants write text and read lines, for
//! use in pipes and scripts.

mod config;
mod input;
mod plain;
mod view;

pub use config::{ColorScheme, Config, ViewConfig, CONFIG_FILE_NAME};
pub use input::{command_for_key, KeyCommandSource};
pub use plain::{format_plain, LineCommandSource, PlainPresenter};
pub use view::{call_path_line, draw, HELP_LINE};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use eyre::Result;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracewalk_engine::{DisplayPayload, Presenter, SessionError};
use tracing::{debug, info};

/// Full-screen terminal presenter
///
/// Owns raw mode and the alternate screen for its whole lifetime; both are
/// restored on drop.
pub struct Tui {
    /// Terminal backend for rendering
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    /// Colors of the view
    theme: ColorScheme,
    /// Closing message, printed once the normal screen is back
    farewell: Option<String>,
}

impl Tui {
    /// Enter the alternate screen
    pub fn new(theme: ColorScheme) -> Result<Self> {
        info!("Initializing TUI");

        enable_raw_mode()?;
        let terminal = rollback_on_error(Self::enter_screen(), || {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            let _ = disable_raw_mode();
        })?;

        Ok(Self { terminal, theme, farewell: None })
    }

    fn enter_screen() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.hide_cursor()?;
        Ok(terminal)
    }

    /// Leave the alternate screen and print the closing message, if any
    pub fn finish(mut self) {
        let farewell = self.farewell.take();
        drop(self);
        if let Some(message) = farewell {
            println!("{message}");
        }
    }
}

impl Presenter for Tui {
    fn present(&mut self, payload: &DisplayPayload) -> Result<(), SessionError> {
        debug!("Drawing step {}", payload.position);
        let theme = &self.theme;
        self.terminal.draw(|frame| draw(frame, payload, theme))?;
        Ok(())
    }

    fn farewell(&mut self, message: &str) -> Result<(), SessionError> {
        self.farewell = Some(message.to_string());
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        // Restore terminal state
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Run `rollback` when `result` is an error, then pass the result through
///
/// No `Tui` exists until setup completes, so `Drop` cannot undo a half-done
/// setup.
fn rollback_on_error<T>(result: Result<T>, rollback: impl FnOnce()) -> Result<T> {
    if result.is_err() {
        rollback();
    }
    result
}

/// Public API for the front ends
pub mod api {
    use super::*;
    use std::io::{BufRead, Write};
    use tracewalk_engine::{
        CommandSource, InteractiveSession, SessionSummary, TraceRenderer, TraceTree,
    };

    /// Run a full-screen session over `tree`
    pub fn run_terminal(
        tree: &TraceTree<'_>,
        renderer: TraceRenderer,
        theme: ColorScheme,
    ) -> Result<SessionSummary> {
        let mut session = InteractiveSession::with_tree(tree, renderer)?;
        let mut tui = Tui::new(theme)?;

        let result = session.run(&mut KeyCommandSource, &mut tui);
        tui.finish();

        let summary = result?;
        info!("TUI session ended after {} renders", summary.renders);
        Ok(summary)
    }

    /// Run a text session over `tree`, reading commands from `source`
    pub fn run_plain<S, W>(
        tree: &TraceTree<'_>,
        renderer: TraceRenderer,
        source: &mut S,
        out: W,
    ) -> Result<SessionSummary>
    where
        S: CommandSource + ?Sized,
        W: Write,
    {
        let mut session = InteractiveSession::with_tree(tree, renderer)?;
        let mut presenter = PlainPresenter::new(out);
        Ok(session.run(source, &mut presenter)?)
    }

    /// Run a text session reading one command per line from `input`
    pub fn run_lines<R, W>(
        tree: &TraceTree<'_>,
        renderer: TraceRenderer,
        input: R,
        out: W,
    ) -> Result<SessionSummary>
    where
        R: BufRead,
        W: Write,
    {
        run_plain(tree, renderer, &mut LineCommandSource::new(input), out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_rollback_runs_on_setup_failure() {
        let rolled_back = Cell::new(false);

        let result: Result<()> =
            rollback_on_error(Err(eyre::eyre!("no terminal")), || rolled_back.set(true));

        assert!(result.is_err());
        assert!(rolled_back.get());
    }

    #[test]
    fn test_rollback_skipped_on_success() {
        let rolled_back = Cell::new(false);

        let value = rollback_on_error(Ok(7), || rolled_back.set(true)).unwrap();

        assert_eq!(value, 7);
        assert!(!rolled_back.get());
    }
}
