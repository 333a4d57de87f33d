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

//! Cursor over the linear step sequence
//!
//! Moves past either end are absorbed silently: pressing "down" on the last
//! step simply does nothing.

use tracewalk_common::StepRecord;
use tracing::trace;

/// Tracks the current position within a non-empty step sequence
#[derive(Debug, Clone)]
pub struct TraceNavigator<'a> {
    steps: &'a [StepRecord],
    current_index: usize,
}

impl<'a> TraceNavigator<'a> {
    /// Create a navigator positioned at the first step
    ///
    /// Returns `None` for an empty sequence, which cannot be navigated.
    pub fn new(steps: &'a [StepRecord]) -> Option<Self> {
        if steps.is_empty() {
            return None;
        }
        Some(Self { steps, current_index: 0 })
    }

    /// The step under the cursor
    pub fn current(&self) -> &'a StepRecord {
        &self.steps[self.current_index]
    }

    /// Position of the cursor, always within `0..step_count()`
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Number of steps being navigated
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// The sequence being navigated
    pub fn steps(&self) -> &'a [StepRecord] {
        self.steps
    }

    /// Whether the cursor is on the first step
    pub fn is_at_start(&self) -> bool {
        self.current_index == 0
    }

    /// Whether the cursor is on the last step
    pub fn is_at_end(&self) -> bool {
        self.current_index + 1 == self.steps.len()
    }

    /// Advance by one step. Returns `false` if already on the last step.
    pub fn move_next(&mut self) -> bool {
        if self.is_at_end() {
            trace!("Already at the last step");
            return false;
        }
        self.current_index += 1;
        true
    }

    /// Go back one step. Returns `false` if already on the first step.
    pub fn move_previous(&mut self) -> bool {
        if self.is_at_start() {
            trace!("Already at the first step");
            return false;
        }
        self.current_index -= 1;
        true
    }

    /// Jump to `index`, clamped to the last step. Returns the new position.
    pub fn jump_to(&mut self, index: usize) -> usize {
        self.current_index = index.min(self.steps.len() - 1);
        self.current_index
    }

    /// Jump to the first step
    pub fn first(&mut self) {
        self.current_index = 0;
    }

    /// Jump to the last step
    pub fn last(&mut self) {
        self.current_index = self.steps.len() - 1;
    }
}
