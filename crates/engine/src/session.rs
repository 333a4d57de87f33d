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

//! Interactive stepping session
//!
//! The session is a pull-based loop: ask the [`CommandSource`] for the next
//! command, apply it to the navigator, hand the new [`DisplayPayload`] to the
//! [`Presenter`], repeat until the operator quits. Keyboards and scripted
//! command lists are interchangeable sources.

use std::{collections::VecDeque, str::FromStr};

use tracewalk_common::StepRecord;
use tracing::{debug, info};

use crate::{
    error::SessionError,
    navigator::TraceNavigator,
    render::{DisplayPayload, TraceRenderer},
    tree::TraceTree,
};

/// Message handed to the presenter when the session ends
pub const FAREWELL_MESSAGE: &str = "Exiting...";

/// A logical navigation command, independent of the input device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Move to the previous step
    Previous,
    /// Move to the next step
    Next,
    /// Redraw the current step without moving (e.g. after a terminal resize)
    Redraw,
    /// End the session
    Quit,
    /// Input that maps to no command; ignored
    Unrecognized,
}

impl FromStr for Command {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "p" | "prev" | "previous" | "up" | "k" => Self::Previous,
            "n" | "next" | "down" | "j" => Self::Next,
            "r" | "redraw" => Self::Redraw,
            "q" | "quit" | "exit" => Self::Quit,
            _ => Self::Unrecognized,
        })
    }
}

/// Supplies commands to a session, one at a time
pub trait CommandSource {
    /// Wait for the next command. `None` means the input is exhausted or was
    /// cancelled, which ends the session like [`Command::Quit`].
    fn next_command(&mut self) -> Result<Option<Command>, SessionError>;
}

/// Receives what the session wants to show
pub trait Presenter {
    /// Show one step
    fn present(&mut self, payload: &DisplayPayload) -> Result<(), SessionError>;

    /// Show the closing message
    fn farewell(&mut self, message: &str) -> Result<(), SessionError>;
}

/// A fixed list of commands, e.g. from the command line or a test
#[derive(Debug, Clone, Default)]
pub struct ScriptedCommands {
    commands: VecDeque<Command>,
}

impl ScriptedCommands {
    /// Create a source that replays `commands` in order
    pub fn new(commands: impl IntoIterator<Item = Command>) -> Self {
        Self { commands: commands.into_iter().collect() }
    }

    /// Parse a comma or whitespace separated list such as `"next,next,quit"`
    pub fn parse(script: &str) -> Self {
        Self::new(
            script
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|token| !token.is_empty())
                .map(|token| token.parse().unwrap_or(Command::Unrecognized)),
        )
    }

    /// Commands not consumed yet
    pub fn remaining(&self) -> usize {
        self.commands.len()
    }
}

impl CommandSource for ScriptedCommands {
    fn next_command(&mut self) -> Result<Option<Command>, SessionError> {
        Ok(self.commands.pop_front())
    }
}

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Accepting commands
    Running,
    /// The operator quit; no further commands are processed
    Terminated,
}

/// Outcome of a finished session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    /// State the session ended in
    pub state: SessionState,
    /// Index of the last step handed to the presenter
    pub last_rendered_index: usize,
    /// Number of payloads handed to the presenter
    pub renders: usize,
}

/// One interactive walk over a trace
#[derive(Debug)]
pub struct InteractiveSession<'a> {
    navigator: TraceNavigator<'a>,
    tree: Option<&'a TraceTree<'a>>,
    renderer: TraceRenderer,
    state: SessionState,
    last_rendered_index: usize,
    renders: usize,
}

impl<'a> InteractiveSession<'a> {
    /// Create a session over `steps`, positioned at the first step
    pub fn new(steps: &'a [StepRecord], renderer: TraceRenderer) -> Result<Self, SessionError> {
        let navigator = TraceNavigator::new(steps).ok_or(SessionError::EmptyTrace)?;
        Ok(Self {
            navigator,
            tree: None,
            renderer,
            state: SessionState::Running,
            last_rendered_index: 0,
            renders: 0,
        })
    }

    /// Create a session over the steps of `tree`, showing call paths
    pub fn with_tree(
        tree: &'a TraceTree<'a>,
        renderer: TraceRenderer,
    ) -> Result<Self, SessionError> {
        let mut session = Self::new(tree.steps(), renderer)?;
        session.tree = Some(tree);
        Ok(session)
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The cursor
    pub fn navigator(&self) -> &TraceNavigator<'a> {
        &self.navigator
    }

    /// Payload for the current cursor position
    pub fn current_payload(&self) -> DisplayPayload {
        self.renderer.render(self.navigator.steps(), self.navigator.current_index(), self.tree)
    }

    /// Emit the initial render, then process commands until the session terminates
    pub fn run<S, P>(
        &mut self,
        source: &mut S,
        presenter: &mut P,
    ) -> Result<SessionSummary, SessionError>
    where
        S: CommandSource + ?Sized,
        P: Presenter + ?Sized,
    {
        info!("Starting session over {} steps", self.navigator.step_count());
        self.present(presenter)?;

        while self.state == SessionState::Running {
            let command = source.next_command()?.unwrap_or(Command::Quit);
            self.handle(command, presenter)?;
        }

        Ok(self.summary())
    }

    /// Apply a single command
    pub fn handle<P>(
        &mut self,
        command: Command,
        presenter: &mut P,
    ) -> Result<SessionState, SessionError>
    where
        P: Presenter + ?Sized,
    {
        if self.state == SessionState::Terminated {
            return Ok(self.state);
        }

        match command {
            Command::Previous => {
                if !self.navigator.move_previous() {
                    debug!("Previous ignored at the first step");
                }
                self.present(presenter)?;
            }
            Command::Next => {
                if !self.navigator.move_next() {
                    debug!("Next ignored at the last step");
                }
                self.present(presenter)?;
            }
            Command::Redraw => self.present(presenter)?,
            Command::Quit => {
                presenter.farewell(FAREWELL_MESSAGE)?;
                self.state = SessionState::Terminated;
                info!("Session terminated at step {}", self.navigator.current_index() + 1);
            }
            Command::Unrecognized => debug!("Ignoring unrecognized input"),
        }

        Ok(self.state)
    }

    /// Summary of the session so far
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            state: self.state,
            last_rendered_index: self.last_rendered_index,
            renders: self.renders,
        }
    }

    fn present<P: Presenter + ?Sized>(&mut self, presenter: &mut P) -> Result<(), SessionError> {
        let payload = self.current_payload();
        presenter.present(&payload)?;
        self.last_rendered_index = payload.position.index;
        self.renders += 1;
        Ok(())
    }
}
